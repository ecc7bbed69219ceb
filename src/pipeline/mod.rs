// Pipeline orchestration — one call from raw records to classified,
// scored, presentation-ready accounts.

pub mod process;
pub mod views;
