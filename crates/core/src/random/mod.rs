//! Uniform sampling and shuffling shared by the procedural components.
//!
//! Nothing here owns a generator. Callers pass any [`RandomSource`]; every
//! [`rand::Rng`] is one, so tests can inject a seeded `ChaCha8Rng` while a
//! show build may seed from entropy.

use rand::Rng;

/// Strategy interface for the random samples the engine draws.
pub trait RandomSource {
    /// Uniform sample between `min` and `max`. Equal bounds return `min`.
    fn uniform(&mut self, min: f64, max: f64) -> f64;

    /// Uniform index in `0..len`. `len` must be non-zero.
    fn index(&mut self, len: usize) -> usize;
}

impl<R: Rng + ?Sized> RandomSource for R {
    fn uniform(&mut self, min: f64, max: f64) -> f64 {
        if min == max {
            return min;
        }
        min + (max - min) * self.gen::<f64>()
    }

    fn index(&mut self, len: usize) -> usize {
        self.gen_range(0..len)
    }
}

/// Symmetric jitter in `[-amount, amount]`.
pub fn jitter<R: RandomSource + ?Sized>(rng: &mut R, amount: f64) -> f64 {
    rng.uniform(-amount, amount)
}

/// Shuffles `items` in place so every ordering is equally likely.
///
/// Walks from the last index to the first, swapping each element with a
/// uniformly chosen element at or before its own position.
pub fn permute<T, R: RandomSource + ?Sized>(rng: &mut R, items: &mut [T]) {
    for i in (1..items.len()).rev() {
        let j = rng.index(i + 1);
        items.swap(i, j);
    }
}

/// Uniformly chosen element, or `None` for an empty pool.
pub fn choose<'a, T, R: RandomSource + ?Sized>(rng: &mut R, pool: &'a [T]) -> Option<&'a T> {
    if pool.is_empty() {
        None
    } else {
        pool.get(rng.index(pool.len()))
    }
}
