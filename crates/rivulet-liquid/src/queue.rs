use std::collections::{HashSet, VecDeque};
use std::hash::Hash;

/// FIFO queue that holds each value at most once.
///
/// Pushing a value already waiting in the queue is a no-op, so a voxel
/// scheduled several times in one invocation is processed once.
#[derive(Debug, Clone)]
pub struct UniqueQueue<T> {
    order: VecDeque<T>,
    members: HashSet<T>,
}

impl<T> Default for UniqueQueue<T> {
    fn default() -> Self {
        Self {
            order: VecDeque::new(),
            members: HashSet::new(),
        }
    }
}

impl<T: Copy + Eq + Hash> UniqueQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `value` unless it is already queued. Returns true if appended.
    pub fn push(&mut self, value: T) -> bool {
        if !self.members.insert(value) {
            return false;
        }
        self.order.push_back(value);
        true
    }

    pub fn pop_front(&mut self) -> Option<T> {
        let value = self.order.pop_front()?;
        self.members.remove(&value);
        Some(value)
    }

    /// Remove up to `count` of the oldest entries. Returns how many were removed.
    pub fn drop_front(&mut self, count: usize) -> usize {
        let count = count.min(self.order.len());
        for value in self.order.drain(..count) {
            self.members.remove(&value);
        }
        count
    }

    pub fn contains(&self, value: &T) -> bool {
        self.members.contains(value)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Entries in processing order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.order.iter()
    }
}
