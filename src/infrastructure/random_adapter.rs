//! Random number generation adapters
//!
//! `ThreadRandom` is the production source. `SeededRandom` replays the same
//! sequence for a given seed, for reproducible sessions.

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use uuid::Uuid;

use crate::application::ports::outbound::RandomPort;

/// Random source backed by `rand::thread_rng()`
#[derive(Debug, Clone, Default)]
pub struct ThreadRandom;

impl ThreadRandom {
    pub fn new() -> Self {
        Self
    }
}

impl RandomPort for ThreadRandom {
    fn gen_index(&self, upper: usize) -> usize {
        rand::thread_rng().gen_range(0..upper.max(1))
    }

    fn gen_bool(&self, probability: f64) -> bool {
        rand::thread_rng().gen_bool(probability.clamp(0.0, 1.0))
    }

    fn gen_uuid(&self) -> Uuid {
        Uuid::new_v4()
    }
}

/// Deterministic random source
#[derive(Debug)]
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut rng)
    }
}

impl RandomPort for SeededRandom {
    fn gen_index(&self, upper: usize) -> usize {
        self.with_rng(|rng| rng.gen_range(0..upper.max(1)))
    }

    fn gen_bool(&self, probability: f64) -> bool {
        self.with_rng(|rng| rng.gen_bool(probability.clamp(0.0, 1.0)))
    }

    fn gen_uuid(&self) -> Uuid {
        let bytes: [u8; 16] = self.with_rng(|rng| rng.gen());
        uuid::Builder::from_random_bytes(bytes).into_uuid()
    }
}
