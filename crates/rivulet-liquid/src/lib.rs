pub mod backpressure;
pub mod clock;
pub mod config;
pub mod decision;
pub mod hooks;
pub mod neighbors;
pub mod queue;
pub mod rollback;
pub mod system;

mod apply;

#[cfg(test)]
mod test_harness;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use config::{ConfigError, LiquidConfig};
pub use hooks::{ChangeRecord, LiquidHooks, NoHooks};
pub use rollback::{RollbackAction, RollbackJournal, RollbackLog};
pub use system::{LiquidSystem, RunReport};
