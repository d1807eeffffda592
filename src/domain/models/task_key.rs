use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Matsubara frequency used as half of a task key
///
/// Compared and hashed by bit pattern. Frequencies are produced once from the
/// quadrature nodes and copied around unchanged, so bitwise identity is the
/// identity that matters when a drained task is resolved back to its row.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Frequency(pub f64);

impl Frequency {
    pub const fn value(self) -> f64 {
        self.0
    }
}

impl PartialEq for Frequency {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for Frequency {}

impl Hash for Frequency {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies one evaluator invocation: (frequency, order index)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskKey {
    pub xi: Frequency,
    pub m: u32,
}

impl TaskKey {
    pub const fn new(xi: f64, m: u32) -> Self {
        Self {
            xi: Frequency(xi),
            m,
        }
    }
}

impl fmt::Display for TaskKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(xi={}, m={})", self.xi, self.m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_keys_with_same_bits_collide() {
        let mut set = HashSet::new();
        assert!(set.insert(TaskKey::new(1.5, 0)));
        assert!(!set.insert(TaskKey::new(1.5, 0)));
        assert!(set.insert(TaskKey::new(1.5, 1)));
        assert!(set.insert(TaskKey::new(1.25, 0)));
    }

    #[test]
    fn test_signed_zero_is_distinct() {
        assert_ne!(Frequency(0.0), Frequency(-0.0));
    }

    #[test]
    fn test_display() {
        assert_eq!(TaskKey::new(2.5, 3).to_string(), "(xi=2.5, m=3)");
    }
}
