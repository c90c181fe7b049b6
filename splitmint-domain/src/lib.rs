#![warn(clippy::uninlined_format_args)]

pub mod error;
pub mod model;
pub mod services;

pub use error::{InvalidInput, SplitError, ValidationError};
pub use model::{
    Allocation, ExactShare, Expense, ExpenseId, Group, GroupId, Money, NetBalances, Participant,
    ParticipantId, PercentageShare, Settlement, Split, SplitRule, SplitType, TOLERANCE, Transfer,
};
pub use services::{
    BalanceAccumulator, BalanceAggregator, MembershipGuard, ParticipantRemovalPolicy,
    RemovalOutcome, SettlementOptimizer, SplitCalculator, apply_transfers,
};
