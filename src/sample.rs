//! Synthetic income data for trying the tool out without a dataset.
//!
//! The numbers are fictitious: uniform draws within four income brackets,
//! weighted so that most observations sit in the lowest bracket.

use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

pub const DEFAULT_SEED: u64 = 42;

/// (lower bound, upper bound, observations) per bracket
pub const BRACKETS: [(f64, f64, usize); 4] = [
    (1_420.0, 4_000.0, 600),
    (4_000.0, 10_000.0, 250),
    (10_000.0, 30_000.0, 100),
    (30_000.0, 100_000.0, 50),
];

pub const SAMPLE_SIZE: usize = 1_000;

/// Draws [`SAMPLE_SIZE`] incomes and shuffles them.
/// The same seed always yields the same sequence.
pub fn generate(seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut incomes = Vec::with_capacity(SAMPLE_SIZE);

    for &(low, high, count) in &BRACKETS {
        incomes.extend((0..count).map(|_| rng.random_range(low..high)));
    }
    incomes.shuffle(&mut rng);

    debug!("generated {} sample incomes with seed {seed}", incomes.len());
    incomes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_size() {
        let total: usize = BRACKETS.iter().map(|&(_, _, count)| count).sum();

        assert_eq!(total, SAMPLE_SIZE);
        assert_eq!(generate(DEFAULT_SEED).len(), SAMPLE_SIZE);
    }

    #[test]
    fn test_sample_deterministic() {
        assert_eq!(generate(7), generate(7));
        assert_ne!(generate(7), generate(8));
    }

    #[test]
    fn test_sample_within_brackets() {
        let incomes = generate(DEFAULT_SEED);

        assert!(incomes.iter().all(|&x| (1_420.0..100_000.0).contains(&x)));
    }

    #[test]
    fn test_sample_bracket_counts() {
        let incomes = generate(DEFAULT_SEED);

        for &(low, high, count) in &BRACKETS {
            let in_bracket = incomes.iter().filter(|&&x| x >= low && x < high).count();
            assert_eq!(in_bracket, count);
        }
    }

    #[test]
    fn test_sample_is_shuffled() {
        let incomes = generate(DEFAULT_SEED);

        // The first 600 draws come from the lowest bracket before shuffling
        assert!(incomes[..600].iter().any(|&x| x >= 4_000.0));
    }
}
