use uuid::Uuid;

/// Port for randomness, injectable so narrative selection can be seeded
#[cfg_attr(test, mockall::automock)]
pub trait RandomPort: Send + Sync {
    /// Uniform index in `0..upper`; `upper` must be non-zero
    fn gen_index(&self, upper: usize) -> usize;

    /// True with the given probability
    fn gen_bool(&self, probability: f64) -> bool;

    /// Random v4-style uuid for correlation ids
    fn gen_uuid(&self) -> Uuid;
}
