pub mod strings {
    pub const MEMBER: &str = "Member";
    pub const BALANCE: &str = "Balance";
    pub const FROM: &str = "From";
    pub const TO: &str = "To";
    pub const AMOUNT: &str = "Amount";
    pub const PAID: &str = "Paid";
    pub const SHARE: &str = "Share";
    pub const SPEND_SHARE: &str = "% of spend";
    pub const DATE: &str = "Date";
    pub const DESCRIPTION: &str = "Description";
    pub const GROUP: &str = "Group";
    pub const PAID_BY: &str = "Paid by";
    pub const BALANCES_HEADING: &str = "Balances";
    pub const SETTLEMENTS_HEADING: &str = "Settlements";
    pub const SUMMARY_HEADING: &str = "Summary";
    pub const ACTIVITY_HEADING: &str = "Activity";
    pub const NO_ACTIVITY: &str = "No expenses match these filters.";
    pub const ALL_SETTLED: &str = "All settled up. No payments needed.";
    pub const MISSING_MEMBERS_DECLARATION: &str =
        "Could not find a `MEMBERS := ...` declaration before the first expense.";
    pub const USAGE: &str = "Usage: splitmint-interpreter <script-file>";
}

pub use strings::*;

pub fn syntax_error(line: usize, detail: impl std::fmt::Display) -> String {
    format!("Line {line}: Syntax error - {detail}")
}

pub fn unknown_participant(name: impl std::fmt::Display) -> String {
    format!("Unknown participant '{name}'")
}

pub fn members_already_declared() -> &'static str {
    "Members were already declared"
}

pub fn at_line(line: usize, message: impl std::fmt::Display) -> String {
    format!("Line {line}: {message}")
}

pub fn failed_to_read_file(path: impl std::fmt::Display, error: impl std::fmt::Display) -> String {
    format!("Failed to read file '{path}': {error}")
}

pub fn total_spent(amount: impl std::fmt::Display, expense_count: usize) -> String {
    format!("Total spent: {amount} across {expense_count} expense(s)")
}

pub fn average_per_participant(amount: impl std::fmt::Display) -> String {
    format!("Average per participant: {amount}")
}

pub fn participant_removed(
    name: impl std::fmt::Display,
    deleted: usize,
    resplit: usize,
) -> String {
    format!("Removed {name}: {deleted} expense(s) deleted, {resplit} re-split")
}

pub fn expense_needs_review(label: impl std::fmt::Display) -> String {
    format!("Expense {label} no longer adds up to its total and needs to be edited")
}

pub fn this_month(amount: impl std::fmt::Display, expense_count: usize) -> String {
    format!("This month: {amount} across {expense_count} expense(s)")
}

pub fn average_per_expense(amount: impl std::fmt::Display) -> String {
    format!("Average per expense: {amount}")
}
