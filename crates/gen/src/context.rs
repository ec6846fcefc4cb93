use std::sync::atomic::{AtomicU64, Ordering};

use devfile_schema::GroupKind;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Shared source of randomness and unique identities for one run.
///
/// Each draw advances the seed counter and seeds a fresh generator from it,
/// so callers on different threads never share generator state.
#[derive(Debug)]
pub struct GenContext {
    seed: AtomicU64,
    unique: AtomicU64,
}

impl GenContext {
    pub fn new(seed: u64) -> Self {
        GenContext {
            seed: AtomicU64::new(seed),
            unique: AtomicU64::new(0),
        }
    }

    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    fn rng(&self) -> SmallRng {
        SmallRng::seed_from_u64(self.seed.fetch_add(1, Ordering::Relaxed).wrapping_add(1))
    }

    /// Letters only, optionally lower-cased.
    pub fn random_string(&self, len: usize, lower: bool) -> String {
        let mut rng = self.rng();
        let s: String = (0..len)
            .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
            .collect();
        if lower {
            s.to_lowercase()
        } else {
            s
        }
    }

    /// A random string followed by a four-digit run-wide counter.
    pub fn unique_string(&self, len: usize, lower: bool) -> String {
        let n = self.unique.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{}{:04}", self.random_string(len, lower), n)
    }

    /// Uniform in `[1, max]`. A zero bound is treated as one.
    pub fn bounded(&self, max: usize) -> usize {
        self.rng().gen_range(1..=max.max(1))
    }

    /// True with probability `success / (success + failure)`.
    pub fn weighted(&self, success: u32, failure: u32) -> bool {
        let total = success + failure;
        if total == 0 {
            return false;
        }
        self.rng().gen_range(0..total) >= failure
    }

    pub fn binary(&self) -> bool {
        self.weighted(1, 1)
    }

    pub fn pick<'a, T>(&self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.rng())
    }

    /// Up to `amount` distinct items in random order.
    pub fn sample<'a, T>(&self, items: &'a [T], amount: usize) -> Vec<&'a T> {
        items.choose_multiple(&mut self.rng(), amount).collect()
    }

    pub fn group_kind(&self) -> GroupKind {
        GroupKind::ALL[self.bounded(GroupKind::ALL.len()) - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_string_alphabet() {
        let ctx = GenContext::new(7);
        let s = ctx.random_string(40, false);
        assert_eq!(s.len(), 40);
        assert!(s.chars().all(|c| c.is_ascii_alphabetic()));
        let lower = ctx.random_string(40, true);
        assert!(lower.chars().all(|c| c.is_ascii_lowercase()));
    }

    #[test]
    fn test_unique_string_suffix() {
        let ctx = GenContext::new(1);
        let a = ctx.unique_string(5, true);
        let b = ctx.unique_string(5, true);
        assert!(a.ends_with("0001"));
        assert!(b.ends_with("0002"));
        assert_eq!(a.len(), 9);
    }

    #[test]
    fn test_bounded_range() {
        let ctx = GenContext::new(3);
        for _ in 0..500 {
            let n = ctx.bounded(6);
            assert!((1..=6).contains(&n));
        }
        assert_eq!(ctx.bounded(0), 1);
    }

    #[test]
    fn test_weighted_extremes() {
        let ctx = GenContext::new(11);
        for _ in 0..100 {
            assert!(ctx.weighted(1, 0));
            assert!(!ctx.weighted(0, 1));
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let a = GenContext::new(42);
        let b = GenContext::new(42);
        assert_eq!(a.random_string(16, false), b.random_string(16, false));
        assert_eq!(a.bounded(1000), b.bounded(1000));
    }

    #[test]
    fn test_sample_distinct() {
        let ctx = GenContext::new(5);
        let items = ["a", "b", "c", "d"];
        let picked = ctx.sample(&items, 3);
        assert_eq!(picked.len(), 3);
        let mut sorted: Vec<_> = picked.iter().map(|s| **s).collect();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), 3);
        assert!(ctx.pick::<u8>(&[]).is_none());
    }
}
