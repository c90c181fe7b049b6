pub mod balance_aggregator;
pub mod membership_guard;
pub mod removal_policy;
pub mod settlement_optimizer;
pub mod split_calculator;

pub use balance_aggregator::{BalanceAccumulator, BalanceAggregator};
pub use membership_guard::MembershipGuard;
pub use removal_policy::{ParticipantRemovalPolicy, RemovalOutcome};
pub use settlement_optimizer::{SettlementOptimizer, apply_transfers};
pub use split_calculator::SplitCalculator;
