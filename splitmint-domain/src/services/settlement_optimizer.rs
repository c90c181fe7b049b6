use crate::model::{Money, NetBalances, ParticipantId, Settlement, TOLERANCE, Transfer};

/// Greedy largest-debtor / largest-creditor debt simplification.
///
/// Balances are rounded to the cent first. Parties inside `±0.01` are
/// treated as settled. Debtors and creditors are each sorted by descending
/// amount with a stable sort, so equal amounts keep their input order, and
/// then matched with two pointers. The result holds at most
/// `debtors + creditors - 1` transfers.
pub struct SettlementOptimizer;

impl SettlementOptimizer {
    pub fn optimize(&self, balances: &NetBalances) -> Vec<Transfer> {
        let mut debtors: Vec<(ParticipantId, Money)> = Vec::new();
        let mut creditors: Vec<(ParticipantId, Money)> = Vec::new();
        for (&participant, &balance) in balances {
            let rounded = balance.round_cents();
            if rounded.as_decimal() < -TOLERANCE {
                debtors.push((participant, -rounded));
            } else if rounded.as_decimal() > TOLERANCE {
                creditors.push((participant, rounded));
            }
        }

        debtors.sort_by(|(_, lhs), (_, rhs)| rhs.cmp(lhs));
        creditors.sort_by(|(_, lhs), (_, rhs)| rhs.cmp(lhs));

        let mut transfers = Vec::with_capacity(debtors.len() + creditors.len());
        let (mut i, mut j) = (0, 0);
        while i < debtors.len() && j < creditors.len() {
            let (debtor, owed) = &mut debtors[i];
            let (creditor, due) = &mut creditors[j];

            let amount = (*owed).min(*due);
            if amount.is_positive() {
                transfers.push(Transfer {
                    from: *debtor,
                    to: *creditor,
                    amount: amount.round_cents(),
                });
            }

            *owed -= amount;
            *due -= amount;

            let debtor_done = owed.is_negligible();
            let creditor_done = due.is_negligible();
            if debtor_done {
                i += 1;
            }
            if creditor_done {
                j += 1;
            }
        }

        transfers
    }

    /// Optimizes and returns the balances left once every transfer is paid.
    pub fn settle(&self, balances: NetBalances) -> Settlement {
        let transfers = self.optimize(&balances);
        let new_balances = apply_transfers(balances, &transfers);
        Settlement {
            new_balances,
            transfers,
        }
    }
}

/// Applies suggested payments: the payer's balance rises, the receiver's falls.
pub fn apply_transfers(mut balances: NetBalances, transfers: &[Transfer]) -> NetBalances {
    for transfer in transfers {
        *balances.entry(transfer.from).or_insert(Money::ZERO) += transfer.amount;
        *balances.entry(transfer.to).or_insert(Money::ZERO) -= transfer.amount;
    }
    balances
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    const A: ParticipantId = ParticipantId(1);
    const B: ParticipantId = ParticipantId(2);
    const C: ParticipantId = ParticipantId(3);
    const D: ParticipantId = ParticipantId(4);

    #[fixture]
    fn optimizer() -> SettlementOptimizer {
        SettlementOptimizer
    }

    fn money(value: &str) -> Money {
        value.parse().expect("valid money")
    }

    fn balances(entries: &[(ParticipantId, &str)]) -> NetBalances {
        entries
            .iter()
            .map(|(participant, amount)| (*participant, money(amount)))
            .collect()
    }

    #[rstest]
    #[case::one_creditor_two_debtors(
        &[(A, "66.66"), (B, "-33.33"), (C, "-33.33")],
        vec![(B, A, "33.33"), (C, A, "33.33")]
    )]
    #[case::two_people(&[(A, "-100"), (B, "100")], vec![(A, B, "100")])]
    #[case::largest_matched_first(
        &[(A, "10"), (B, "50"), (C, "-20"), (D, "-40")],
        vec![(D, B, "40"), (C, B, "10"), (C, A, "10")]
    )]
    #[case::equal_amounts_keep_input_order(
        &[(A, "-10"), (B, "-10"), (C, "10"), (D, "10")],
        vec![(A, C, "10"), (B, D, "10")]
    )]
    #[case::all_settled(&[(A, "0"), (B, "0.004"), (C, "-0.004")], vec![])]
    #[case::threshold_is_strict(&[(A, "0.01"), (B, "-0.01")], vec![])]
    #[case::balances_rounded_first(
        &[(A, "3.333"), (B, "-3.333")],
        vec![(B, A, "3.33")]
    )]
    #[case::empty(&[], vec![])]
    fn optimize_cases(
        optimizer: SettlementOptimizer,
        #[case] input: &[(ParticipantId, &str)],
        #[case] expected: Vec<(ParticipantId, ParticipantId, &str)>,
    ) {
        let transfers = optimizer.optimize(&balances(input));

        let expected: Vec<Transfer> = expected
            .into_iter()
            .map(|(from, to, amount)| Transfer {
                from,
                to,
                amount: money(amount),
            })
            .collect();
        assert_eq!(transfers, expected);
    }

    #[rstest]
    fn settle_zeroes_every_balance(optimizer: SettlementOptimizer) {
        let input = balances(&[(A, "45.5"), (B, "-20.25"), (C, "-25.25"), (D, "0")]);

        let settlement = optimizer.settle(input);

        assert_eq!(settlement.transfers.len(), 2);
        assert!(settlement.new_balances.values().all(|balance| balance.is_zero()));
        assert_eq!(settlement.new_balances.len(), 4);
    }

    #[rstest]
    fn optimize_is_idempotent(optimizer: SettlementOptimizer) {
        let input = balances(&[(A, "12"), (B, "12"), (C, "-8"), (D, "-16")]);
        assert_eq!(optimizer.optimize(&input), optimizer.optimize(&input));
    }

    #[test]
    fn apply_transfers_moves_money_from_payer_to_receiver() {
        let after = apply_transfers(
            balances(&[(A, "10"), (B, "-10")]),
            &[Transfer {
                from: B,
                to: A,
                amount: money("4"),
            }],
        );
        assert_eq!(after[&A], money("6"));
        assert_eq!(after[&B], money("-6"));
    }
}
