// src/core/context.rs
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Seeded random source plus the number of features to alter per perturbed sample.
///
/// Cloning yields an independent generator in the same state, so an explanation
/// run that clones the context consumes exactly the same random stream as any
/// other run made from the same context.
#[derive(Debug, Clone)]
pub struct PerturbationContext {
    seed: u64,
    rng: StdRng,
    no_of_perturbations: usize,
}

impl PerturbationContext {
    pub fn new(seed: u64, no_of_perturbations: usize) -> Self {
        PerturbationContext {
            seed,
            rng: StdRng::seed_from_u64(seed),
            no_of_perturbations,
        }
    }

    /// Context seeded from the thread-local entropy source.
    pub fn from_entropy(no_of_perturbations: usize) -> Self {
        let seed = rand::thread_rng().gen::<u64>();
        Self::new(seed, no_of_perturbations)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn no_of_perturbations(&self) -> usize {
        self.no_of_perturbations
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }
}

impl Default for PerturbationContext {
    fn default() -> Self {
        Self::from_entropy(1)
    }
}
