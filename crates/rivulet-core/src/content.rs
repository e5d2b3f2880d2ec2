use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::constants::LIQUID_LEVEL_MAX;
use crate::error::RegistryError;
use crate::types::ContentId;

/// Name of the built-in empty content.
pub const AIR_NAME: &str = "air";
/// Name of the built-in unloaded sentinel.
pub const IGNORE_NAME: &str = "ignore";

/// Liquid behavior of a content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LiquidRole {
    #[default]
    None,
    /// Full, self-sustaining liquid block.
    Source,
    /// Spreading liquid whose param2 carries a level.
    Flowing,
}

fn default_renewable() -> bool {
    true
}

fn default_range() -> u8 {
    LIQUID_LEVEL_MAX as u8 + 1
}

/// Authoring form of a content type, as it appears in RON data files.
/// Liquid alternatives reference other content by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentDef {
    pub name: String,
    #[serde(default)]
    pub liquid: LiquidRole,
    /// Flowing variant of this liquid family.
    #[serde(default)]
    pub flowing_alternative: Option<String>,
    /// Source variant of this liquid family.
    #[serde(default)]
    pub source_alternative: Option<String>,
    /// Whether two adjacent sources create a new one.
    #[serde(default = "default_renewable")]
    pub renewable: bool,
    /// Levels a flowing liquid may move per update. 0 and 1 mean no damping.
    #[serde(default)]
    pub viscosity: u8,
    /// How many levels a liquid spreads before it stops being visible.
    #[serde(default = "default_range")]
    pub range: u8,
    /// Whether liquid may replace this content.
    #[serde(default)]
    pub floodable: bool,
    /// Whether this content falls once the liquid below it drains.
    #[serde(default)]
    pub floats: bool,
}

impl ContentDef {
    /// Solid, non-liquid content with every other property at its default.
    pub fn solid(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            liquid: LiquidRole::None,
            flowing_alternative: None,
            source_alternative: None,
            renewable: default_renewable(),
            viscosity: 0,
            range: default_range(),
            floodable: false,
            floats: false,
        }
    }
}

/// Resolved, immutable content properties used at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentDescriptor {
    pub name: String,
    pub liquid: LiquidRole,
    /// `ContentId::IGNORE` when unset or unresolvable.
    pub flowing_alternative: ContentId,
    /// `ContentId::IGNORE` when unset or unresolvable.
    pub source_alternative: ContentId,
    pub renewable: bool,
    pub viscosity: u8,
    pub range: u8,
    pub floodable: bool,
    pub floats: bool,
}

impl ContentDescriptor {
    fn from_def(def: &ContentDef) -> Self {
        Self {
            name: def.name.clone(),
            liquid: def.liquid,
            flowing_alternative: ContentId::IGNORE,
            source_alternative: ContentId::IGNORE,
            renewable: def.renewable,
            viscosity: def.viscosity,
            range: def.range,
            floodable: def.floodable,
            floats: def.floats,
        }
    }

    /// Spread range clamped to the number of liquid levels.
    pub fn liquid_range(&self) -> u8 {
        self.range.min(LIQUID_LEVEL_MAX as u8 + 1)
    }
}

/// Pending alternative names, kept until `resolve_crossrefs`.
#[derive(Debug, Clone, Default)]
struct PendingRefs {
    flowing: Option<String>,
    source: Option<String>,
}

/// Content table indexed by `ContentId`.
///
/// Always contains `air` and `ignore` at their reserved ids. Register
/// content, then call [`ContentRegistry::resolve_crossrefs`] once so liquid
/// alternatives point at ids instead of names.
#[derive(Debug, Clone)]
pub struct ContentRegistry {
    descriptors: Vec<ContentDescriptor>,
    pending: Vec<PendingRefs>,
    by_name: HashMap<String, ContentId>,
}

impl Default for ContentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentRegistry {
    pub fn new() -> Self {
        let mut air = ContentDef::solid(AIR_NAME);
        air.floodable = true;
        let ignore = ContentDef::solid(IGNORE_NAME);

        let mut registry = Self {
            descriptors: Vec::new(),
            pending: Vec::new(),
            by_name: HashMap::new(),
        };
        registry.push(&air);
        registry.push(&ignore);
        registry
    }

    fn push(&mut self, def: &ContentDef) -> ContentId {
        let id = ContentId(self.descriptors.len() as u16);
        self.descriptors.push(ContentDescriptor::from_def(def));
        self.pending.push(PendingRefs {
            flowing: def.flowing_alternative.clone(),
            source: def.source_alternative.clone(),
        });
        self.by_name.insert(def.name.clone(), id);
        id
    }

    /// Add a content type. Returns its newly assigned id.
    pub fn register(&mut self, def: &ContentDef) -> Result<ContentId, RegistryError> {
        if self.by_name.contains_key(&def.name) {
            return Err(RegistryError::DuplicateName(def.name.clone()));
        }
        if self.descriptors.len() > u16::MAX as usize {
            return Err(RegistryError::Full(self.descriptors.len()));
        }
        Ok(self.push(def))
    }

    /// Register every definition in order.
    pub fn register_all(&mut self, defs: &[ContentDef]) -> Result<Vec<ContentId>, RegistryError> {
        defs.iter().map(|def| self.register(def)).collect()
    }

    /// Turn alternative names into ids. Names that do not resolve become
    /// `ContentId::IGNORE`; each one produces a warning string.
    pub fn resolve_crossrefs(&mut self) -> Vec<String> {
        let mut warnings = Vec::new();
        for (index, refs) in self.pending.iter().enumerate() {
            let owner = &self.descriptors[index].name;
            let flowing = Self::lookup(&self.by_name, owner, refs.flowing.as_deref(), &mut warnings);
            let source = Self::lookup(&self.by_name, owner, refs.source.as_deref(), &mut warnings);
            self.descriptors[index].flowing_alternative = flowing;
            self.descriptors[index].source_alternative = source;
        }
        for warning in &warnings {
            log::warn!("{warning}");
        }
        warnings
    }

    fn lookup(
        by_name: &HashMap<String, ContentId>,
        owner: &str,
        name: Option<&str>,
        warnings: &mut Vec<String>,
    ) -> ContentId {
        let Some(name) = name else {
            return ContentId::IGNORE;
        };
        match by_name.get(name) {
            Some(&id) => id,
            None => {
                warnings.push(format!("Content '{owner}': unknown alternative '{name}'"));
                ContentId::IGNORE
            }
        }
    }

    /// Descriptor for `id`. Unknown ids get the `ignore` descriptor.
    pub fn get(&self, id: ContentId) -> &ContentDescriptor {
        self.descriptors
            .get(id.0 as usize)
            .unwrap_or(&self.descriptors[ContentId::IGNORE.0 as usize])
    }

    pub fn id_of(&self, name: &str) -> Option<ContentId> {
        self.by_name.get(name).copied()
    }

    /// Number of content types, built-ins included.
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}
