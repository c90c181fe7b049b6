use crate::model::{GroupId, Money, ParticipantId};
use rust_decimal::Decimal;
use thiserror::Error;

/// A split rule whose numbers do not add up. The caller must ask for a
/// correction; nothing is adjusted automatically.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("split amounts sum to {actual}, expected {expected}")]
    AmountSumMismatch { expected: Money, actual: Money },
    #[error("split percentages sum to {actual}, expected 100")]
    PercentageSumMismatch { actual: Decimal },
}

impl ValidationError {
    /// Absolute distance between the expected and the actual sum.
    pub fn discrepancy(&self) -> Decimal {
        match self {
            Self::AmountSumMismatch { expected, actual } => {
                (actual.as_decimal() - expected.as_decimal()).abs()
            }
            Self::PercentageSumMismatch { actual } => (*actual - Decimal::ONE_HUNDRED).abs(),
        }
    }
}

/// A request that cannot be satisfied whatever the numbers are.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidInput {
    #[error("at least one participant is required")]
    EmptyParticipants,
    #[error("amount must be positive, got {0}")]
    NonPositiveAmount(Money),
    #[error("amount {0} has more than two decimal places")]
    SubCentAmount(Money),
    #[error("participant {0} has a negative share")]
    NegativeShare(ParticipantId),
    #[error("split values are too large to add up")]
    Overflow,
    #[error("participant {0} appears more than once in the split")]
    DuplicateParticipant(ParticipantId),
    #[error("participant {participant} does not belong to group {group}")]
    ParticipantOutsideGroup {
        participant: ParticipantId,
        group: GroupId,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SplitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    InvalidInput(#[from] InvalidInput),
}
