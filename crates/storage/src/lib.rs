//! Lineup and prediction collaborators consumed by the scoring pipeline.
//!
//! The scheduler only sees the [`LineupSource`] and [`PredictionSource`]
//! traits. [`LineupStore`] and [`PredictionStore`] are the in-memory
//! implementations used by the CLI and tests.

pub mod lineups;
pub mod predictions;
pub mod source;

pub use lineups::LineupStore;
pub use predictions::{PredictionStore, SaveOutcome};
pub use source::{LineupSource, PredictionSource};
