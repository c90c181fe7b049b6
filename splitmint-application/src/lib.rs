#![warn(clippy::uninlined_format_args)]

pub mod config;
pub mod error;
pub mod ledger_service;
pub mod model;
pub mod ports;

pub use config::LedgerConfig;
pub use error::LedgerError;
pub use ledger_service::LedgerService;
pub use model::{
    ActivityEntry, ActivityReport, Contribution, ExpenseDraft, ExpenseFilter, GroupSummary,
    PersonBalance, RemovalReport, SettlementResult,
};
pub use ports::{LedgerRepository, MemberDirectory, NewExpense};
