// Adapters layer: concrete implementations for external systems (score grid input, storage).

pub mod score_grid;
pub mod storage;
