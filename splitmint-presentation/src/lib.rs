#![warn(clippy::uninlined_format_args)]

pub mod activity_presenter;
pub mod currency;
pub mod error_presenter;
pub mod settlement_presenter;
pub mod summary_presenter;
pub mod text_table;

pub use activity_presenter::ActivityPresenter;
pub use currency::CurrencyFormatter;
pub use error_presenter::{format_ledger_error, format_parse_error};
pub use settlement_presenter::{SettlementPresenter, SettlementView};
pub use summary_presenter::SummaryPresenter;
