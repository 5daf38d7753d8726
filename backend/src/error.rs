use thiserror::Error;

use crate::providers::ProviderError;

#[derive(Debug, Error)]
pub enum PlanError {
    /// Malformed or out-of-range input, rejected before any network call.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("provider request failed: {0}")]
    Provider(#[from] ProviderError),
    /// Every candidate direction failed; nothing to rank.
    #[error("no valid routes found")]
    EmptyCandidateSet,
    #[error("no parking lots found within the search radius")]
    NoParkingFound,
}
