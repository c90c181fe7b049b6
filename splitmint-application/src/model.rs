use chrono::{DateTime, Datelike, NaiveDate, Utc};
use splitmint_domain::{
    Expense, ExpenseId, GroupId, Money, Participant, ParticipantId, SplitRule, Transfer,
};

/// User input for logging or editing an expense. Shares are computed from
/// `rule` by the split calculator.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseDraft {
    pub description: String,
    pub amount: Money,
    pub payer: ParticipantId,
    pub rule: SplitRule,
    /// Backdates the expense. `None` stamps it with the time it is logged,
    /// or keeps the existing stamp on edit.
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PersonBalance {
    pub id: ParticipantId,
    pub balance: Money,
}

pub struct SettlementResult {
    /// Unrounded balances in roster order.
    pub balances: Vec<PersonBalance>,
    pub transfers: Vec<Transfer>,
}

impl SettlementResult {
    pub fn is_settled(&self) -> bool {
        self.transfers.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RemovalReport {
    pub participant: Participant,
    pub deleted_expenses: Vec<ExpenseId>,
    pub resplit_expenses: Vec<ExpenseId>,
    /// Exact or percentage expenses whose shares no longer cover the total.
    pub unbalanced_expenses: Vec<ExpenseId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Contribution {
    pub participant: ParticipantId,
    pub paid: Money,
    pub share: Money,
    pub balance: Money,
    /// Whole-number percentage of the group's total spend paid by this member.
    pub spend_percentage: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupSummary {
    pub group_id: GroupId,
    pub expense_count: usize,
    pub total_spent: Money,
    pub average_per_participant: Money,
    pub contributions: Vec<Contribution>,
}

/// Criteria for the activity feed. Every field left `None` matches all
/// expenses; set fields must all match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseFilter {
    /// Case-insensitive substring of the description, payer name or group name.
    pub text: Option<String>,
    pub group: Option<GroupId>,
    /// Display name of the payer or of any split member.
    pub participant: Option<String>,
    /// Inclusive lower bound on the expense total.
    pub min_amount: Option<Money>,
    /// Inclusive upper bound on the expense total.
    pub max_amount: Option<Money>,
    /// First UTC day included.
    pub from: Option<NaiveDate>,
    /// Last UTC day included.
    pub to: Option<NaiveDate>,
}

impl ExpenseFilter {
    pub fn matches(&self, entry: &ActivityEntry) -> bool {
        let expense = &entry.expense;
        let day = expense.created_at.date_naive();

        self.text.as_deref().is_none_or(|text| entry.mentions(text))
            && self.group.is_none_or(|group| expense.group_id == group)
            && self
                .participant
                .as_deref()
                .is_none_or(|name| entry.involves(name))
            && self.min_amount.is_none_or(|min| expense.amount >= min)
            && self.max_amount.is_none_or(|max| expense.amount <= max)
            && self.from.is_none_or(|from| day >= from)
            && self.to.is_none_or(|to| day <= to)
    }
}

/// One expense with the names the feed displays and searches.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityEntry {
    pub expense: Expense,
    pub group_name: String,
    pub payer_name: String,
    pub split_names: Vec<String>,
}

impl ActivityEntry {
    fn mentions(&self, text: &str) -> bool {
        let needle = text.to_lowercase();
        [
            self.expense.description.as_str(),
            self.payer_name.as_str(),
            self.group_name.as_str(),
        ]
        .iter()
        .any(|haystack| haystack.to_lowercase().contains(&needle))
    }

    fn involves(&self, name: &str) -> bool {
        self.payer_name == name || self.split_names.iter().any(|split| split == name)
    }

    pub(crate) fn in_month_of(&self, now: DateTime<Utc>) -> bool {
        let created = self.expense.created_at;
        (created.year(), created.month()) >= (now.year(), now.month())
    }
}

/// Expenses across every group, newest first, with feed-wide statistics.
/// The statistics ignore the filter.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityReport {
    pub entries: Vec<ActivityEntry>,
    pub this_month_total: Money,
    pub this_month_count: usize,
    pub average_per_expense: Money,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;
    use splitmint_domain::{Split, SplitType};

    fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 23, 59, 0)
            .single()
            .expect("valid timestamp")
    }

    fn entry(created_at: DateTime<Utc>) -> ActivityEntry {
        ActivityEntry {
            expense: Expense {
                id: ExpenseId(1),
                group_id: GroupId(1),
                description: "Ferry tickets".to_string(),
                amount: Money::from_i64(40),
                payer: ParticipantId(1),
                split_type: SplitType::Equal,
                splits: vec![Split::new(ParticipantId(2), Money::from_i64(40))],
                created_at,
            },
            group_name: "Islands".to_string(),
            payer_name: "Alice".to_string(),
            split_names: vec!["Bob".to_string()],
        }
    }

    #[test]
    fn empty_filter_matches_everything() {
        assert!(ExpenseFilter::default().matches(&entry(at(2024, 6, 1))));
    }

    #[rstest]
    #[case::text_in_group_name(ExpenseFilter { text: Some("ISLAND".to_string()), ..Default::default() }, true)]
    #[case::text_elsewhere(ExpenseFilter { text: Some("bus".to_string()), ..Default::default() }, false)]
    #[case::split_member(ExpenseFilter { participant: Some("Bob".to_string()), ..Default::default() }, true)]
    #[case::name_is_exact(ExpenseFilter { participant: Some("bob".to_string()), ..Default::default() }, false)]
    #[case::late_on_last_day(ExpenseFilter { to: NaiveDate::from_ymd_opt(2024, 6, 1), ..Default::default() }, true)]
    #[case::before_first_day(ExpenseFilter { from: NaiveDate::from_ymd_opt(2024, 6, 2), ..Default::default() }, false)]
    #[case::exact_max(ExpenseFilter { max_amount: Some(Money::from_i64(40)), ..Default::default() }, true)]
    fn filter_criteria(#[case] filter: ExpenseFilter, #[case] expected: bool) {
        assert_eq!(filter.matches(&entry(at(2024, 6, 1))), expected);
    }

    #[rstest]
    #[case::same_month(at(2024, 6, 1), true)]
    #[case::previous_month(at(2024, 5, 31), false)]
    #[case::later_month(at(2024, 7, 3), true)]
    #[case::same_month_last_year(at(2023, 6, 15), false)]
    fn this_month_starts_on_the_first(#[case] created_at: DateTime<Utc>, #[case] expected: bool) {
        assert_eq!(entry(created_at).in_month_of(at(2024, 6, 20)), expected);
    }
}
