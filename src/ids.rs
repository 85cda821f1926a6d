//! Task identifier generation.

use std::cell::Cell;
use uuid::Uuid;

/// Produces identifiers for newly created tasks.
///
/// The store skips empty or already used ids and, after repeated
/// collisions, stops asking and uses a random UUID instead.
pub trait IdGenerator {
    fn generate_id(&self) -> String;
}

/// Random UUID v4 identifiers.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn generate_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Predictable `{prefix}{n}` identifiers, for tests and demos.
#[derive(Debug)]
pub struct SequentialIds {
    prefix: String,
    next: Cell<u64>,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: Cell::new(1),
        }
    }
}

impl IdGenerator for SequentialIds {
    fn generate_id(&self) -> String {
        let n = self.next.get();
        self.next.set(n + 1);
        format!("{}{}", self.prefix, n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuids_are_unique() {
        let gen = UuidGenerator;
        let a = gen.generate_id();
        let b = gen.generate_id();
        assert_ne!(a, b);
        assert_eq!(a.len(), 36);
    }

    #[test]
    fn sequential_ids_count_up() {
        let gen = SequentialIds::new("t");
        assert_eq!(gen.generate_id(), "t1");
        assert_eq!(gen.generate_id(), "t2");
    }
}
