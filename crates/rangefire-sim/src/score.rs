//! Running score kept by the engine, outside the ECS world.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreState {
    pub shots_fired: u32,
    pub hits: u32,
    /// Projectiles that left the range without hitting anything.
    pub misses: u32,
    pub targets_total: u32,
}
