use crate::model::{Expense, ExpenseId, ParticipantId, SplitType};
use rust_decimal::Decimal;

/// Ledger after a participant has been taken out of it.
#[derive(Debug, Default, PartialEq)]
pub struct RemovalOutcome {
    /// Expenses that survive, in their original order.
    pub expenses: Vec<Expense>,
    /// Paid by the removed participant, or left without any split.
    pub deleted: Vec<ExpenseId>,
    /// EQUAL expenses whose total was re-divided among the remaining splits.
    pub resplit: Vec<ExpenseId>,
    /// EXACT or PERCENTAGE expenses that lost a share and no longer add up
    /// to their total. They are kept untouched for the caller to correct.
    pub unbalanced: Vec<ExpenseId>,
}

/// Cascade applied when a participant leaves a group.
///
/// - Every expense the participant paid is deleted, never reassigned.
/// - Their split entry is dropped from every other expense; an expense left
///   without splits is deleted.
/// - A surviving EQUAL expense that lost a split is re-divided as
///   `total / remaining` for each remaining split. This does not go through
///   the cent-remainder algorithm used when the expense was logged, so shares
///   may carry sub-cent digits.
/// - EQUAL expenses the participant never shared are not re-divided. They
///   keep the cent-exact shares they were logged with, remainder cents
///   included.
pub struct ParticipantRemovalPolicy;

impl ParticipantRemovalPolicy {
    pub fn apply<I>(expenses: I, removed: ParticipantId) -> RemovalOutcome
    where
        I: IntoIterator<Item = Expense>,
    {
        let mut outcome = RemovalOutcome::default();

        for mut expense in expenses {
            if expense.payer == removed {
                outcome.deleted.push(expense.id);
                continue;
            }

            let before = expense.splits.len();
            expense.splits.retain(|split| split.participant != removed);
            if expense.splits.is_empty() {
                outcome.deleted.push(expense.id);
                continue;
            }

            if expense.splits.len() != before {
                match expense.split_type {
                    SplitType::Equal => {
                        let share = expense.amount / Decimal::from(expense.splits.len());
                        for split in &mut expense.splits {
                            split.amount = share;
                        }
                        outcome.resplit.push(expense.id);
                    }
                    SplitType::Exact | SplitType::Percentage => {
                        if !expense.is_balanced() {
                            outcome.unbalanced.push(expense.id);
                        }
                    }
                }
            }

            outcome.expenses.push(expense);
        }

        outcome
    }
}
