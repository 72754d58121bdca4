//! Identity and seed generation for new drawables.
//!
//! The engine takes an [`IdSource`] at construction so hosts get random ids
//! while tests get a deterministic sequence.

use crate::shapes::ShapeId;
use uuid::Uuid;

/// Hands out shape ids and hand-drawn seeds.
pub trait IdSource {
    /// A fresh id, unique for the lifetime of the engine.
    fn next_id(&mut self) -> ShapeId;

    /// A seed for the hand-drawn jitter of a new shape.
    fn next_seed(&mut self) -> u32;
}

/// splitmix32-style finalizer for spreading counter values.
fn mix32(counter: u32) -> u32 {
    let mut x = counter.wrapping_mul(0x9E37_79B9);
    x ^= x >> 16;
    x = x.wrapping_mul(0x85EB_CA6B);
    x ^= x >> 13;
    x = x.wrapping_mul(0xC2B2_AE35);
    x ^= x >> 16;
    x
}

/// Random v4 ids and seeds.
#[derive(Debug, Default)]
pub struct RandomIds;

impl IdSource for RandomIds {
    fn next_id(&mut self) -> ShapeId {
        Uuid::new_v4()
    }

    fn next_seed(&mut self) -> u32 {
        let bits = Uuid::new_v4().as_u128();
        mix32((bits ^ (bits >> 64)) as u32)
    }
}

/// Deterministic ids (`00000000-…-000000000001`, `…002`, …) and seeds.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    next_id: u128,
    next_seed: u32,
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new()
    }
}

impl SequentialIds {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            next_seed: 1,
        }
    }

    /// The id the `n`th call to `next_id` returns (1-based).
    pub fn nth(n: u128) -> ShapeId {
        Uuid::from_u128(n)
    }
}

impl IdSource for SequentialIds {
    fn next_id(&mut self) -> ShapeId {
        let id = Uuid::from_u128(self.next_id);
        self.next_id += 1;
        id
    }

    fn next_seed(&mut self) -> u32 {
        let seed = mix32(self.next_seed);
        self.next_seed = self.next_seed.wrapping_add(1);
        seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_sequential_ids_are_deterministic() {
        let mut a = SequentialIds::new();
        let mut b = SequentialIds::new();
        for n in 1..=5 {
            let id = a.next_id();
            assert_eq!(id, b.next_id());
            assert_eq!(id, SequentialIds::nth(n));
            assert_eq!(a.next_seed(), b.next_seed());
        }
    }

    #[test]
    fn test_sequential_seeds_differ() {
        let mut ids = SequentialIds::new();
        let seeds: HashSet<u32> = (0..100).map(|_| ids.next_seed()).collect();
        assert_eq!(seeds.len(), 100);
    }

    #[test]
    fn test_random_ids_unique() {
        let mut ids = RandomIds;
        let set: HashSet<ShapeId> = (0..100).map(|_| ids.next_id()).collect();
        assert_eq!(set.len(), 100);
    }
}
