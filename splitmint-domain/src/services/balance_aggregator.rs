use crate::model::{Expense, Money, NetBalances, ParticipantId};

/// Folds expenses into net balances: the payer is credited the full amount
/// and every split participant is debited their share. No rounding happens
/// here.
pub struct BalanceAccumulator {
    balances: NetBalances,
}

impl BalanceAccumulator {
    /// Every roster member starts at zero, so members without expenses still
    /// show up in the result.
    pub fn new<I>(roster: I) -> Self
    where
        I: IntoIterator<Item = ParticipantId>,
    {
        let balances = roster
            .into_iter()
            .map(|participant| (participant, Money::ZERO))
            .collect();
        Self { balances }
    }

    pub fn apply(&mut self, expense: &Expense) {
        *self.balances.entry(expense.payer).or_insert(Money::ZERO) += expense.amount;
        for split in &expense.splits {
            *self
                .balances
                .entry(split.participant)
                .or_insert(Money::ZERO) -= split.amount;
        }
    }

    pub fn balances(&self) -> &NetBalances {
        &self.balances
    }

    pub fn into_balances(self) -> NetBalances {
        self.balances
    }
}

pub struct BalanceAggregator;

impl BalanceAggregator {
    /// Recomputes balances from scratch over `expenses`.
    pub fn net_balances<'e, E, R>(expenses: E, roster: R) -> NetBalances
    where
        E: IntoIterator<Item = &'e Expense>,
        R: IntoIterator<Item = ParticipantId>,
    {
        let mut accumulator = BalanceAccumulator::new(roster);
        for expense in expenses {
            accumulator.apply(expense);
        }
        accumulator.into_balances()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ExpenseId, GroupId, Split, SplitType};
    use chrono::{DateTime, Utc};
    use rstest::rstest;

    const A: ParticipantId = ParticipantId(1);
    const B: ParticipantId = ParticipantId(2);
    const C: ParticipantId = ParticipantId(3);

    fn money(value: &str) -> Money {
        value.parse().expect("valid money")
    }

    fn expense(id: u64, payer: ParticipantId, amount: &str, splits: &[(ParticipantId, &str)]) -> Expense {
        Expense {
            id: ExpenseId(id),
            group_id: GroupId(1),
            description: format!("expense {id}"),
            amount: money(amount),
            payer,
            split_type: SplitType::Exact,
            splits: splits
                .iter()
                .map(|(participant, amount)| Split::new(*participant, money(amount)))
                .collect(),
            created_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    #[test]
    fn payer_in_splits_nets_paid_minus_share() {
        let expenses = [expense(
            1,
            A,
            "100",
            &[(A, "33.34"), (B, "33.33"), (C, "33.33")],
        )];

        let balances = BalanceAggregator::net_balances(&expenses, [A, B, C]);

        assert_eq!(
            balances,
            NetBalances::from_iter([
                (A, money("66.66")),
                (B, money("-33.33")),
                (C, money("-33.33")),
            ])
        );
    }

    #[rstest]
    #[case::no_expenses(vec![], vec![(A, "0"), (B, "0"), (C, "0")])]
    #[case::payer_not_in_splits(
        vec![expense(1, A, "30", &[(B, "15"), (C, "15")])],
        vec![(A, "30"), (B, "-15"), (C, "-15")]
    )]
    #[case::offsetting_expenses(
        vec![
            expense(1, A, "20", &[(B, "20")]),
            expense(2, B, "20", &[(A, "20")]),
        ],
        vec![(A, "0"), (B, "0"), (C, "0")]
    )]
    #[case::unrounded_shares_are_kept(
        vec![expense(1, A, "10", &[(B, "3.333"), (C, "6.667")])],
        vec![(A, "10"), (B, "-3.333"), (C, "-6.667")]
    )]
    fn aggregates_in_roster_order(
        #[case] expenses: Vec<Expense>,
        #[case] expected: Vec<(ParticipantId, &str)>,
    ) {
        let balances = BalanceAggregator::net_balances(&expenses, [A, B, C]);

        let expected: Vec<(ParticipantId, Money)> = expected
            .into_iter()
            .map(|(participant, amount)| (participant, money(amount)))
            .collect();
        let actual: Vec<(ParticipantId, Money)> = balances.into_iter().collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn unknown_participants_are_appended_after_roster() {
        let expenses = [expense(1, ParticipantId(9), "10", &[(A, "10")])];

        let balances = BalanceAggregator::net_balances(&expenses, [A, B]);

        let order: Vec<ParticipantId> = balances.keys().copied().collect();
        assert_eq!(order, vec![A, B, ParticipantId(9)]);
        assert_eq!(balances[&ParticipantId(9)], money("10"));
    }

    #[test]
    fn accumulator_exposes_running_balances() {
        let mut accumulator = BalanceAccumulator::new([A, B]);
        accumulator.apply(&expense(1, A, "8", &[(B, "8")]));
        assert_eq!(accumulator.balances()[&B], money("-8"));
        accumulator.apply(&expense(2, B, "3", &[(A, "3")]));
        assert_eq!(accumulator.balances()[&B], money("-5"));
    }
}
