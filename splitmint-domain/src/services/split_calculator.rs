//! Turns an expense total and a split rule into per-participant allocations.
//!
//! Every successful result sums to the expense total. Two remainder policies
//! are order-dependent and must stay that way:
//! - equal splits hand the leftover cents to the *first* participants in
//!   input order, one cent each;
//! - percentage splits give the *last* participant in input order whatever
//!   is left after the others are rounded, so that participant absorbs the
//!   whole rounding residue. Reordering the input changes who absorbs it.

use crate::{
    error::{InvalidInput, SplitError, ValidationError},
    model::{
        Allocation, ExactShare, Money, ParticipantId, PercentageShare, Split, SplitRule, TOLERANCE,
    },
};
use fxhash::FxHashSet;
use rust_decimal::Decimal;

pub struct SplitCalculator;

impl SplitCalculator {
    /// Applies `rule` to `total` and returns the tagged allocation.
    pub fn allocate(total: Money, rule: &SplitRule) -> Result<Allocation, SplitError> {
        let splits = match rule {
            SplitRule::Equal(participants) => Self::compute_equal_split(total, participants)?,
            SplitRule::Exact(shares) => Self::compute_exact_split(total, shares)?,
            SplitRule::Percentage(shares) => Self::compute_percentage_split(total, shares)?,
        };

        Ok(Allocation {
            split_type: rule.split_type(),
            splits,
        })
    }

    /// Base share is `floor(total / count)` to the cent; the remaining
    /// `total - base * count` cents go one each to the first participants.
    pub fn compute_equal_split(
        total: Money,
        participants: &[ParticipantId],
    ) -> Result<Vec<Split>, SplitError> {
        let total_cents = checked_total_cents(total)?;
        if participants.is_empty() {
            return Err(InvalidInput::EmptyParticipants.into());
        }
        ensure_distinct(participants.iter().copied())?;

        let count = participants.len() as i64;
        let base = total_cents / count;
        let remainder = (total_cents % count) as usize;

        let splits = participants
            .iter()
            .enumerate()
            .map(|(idx, participant)| {
                let mut share = base;
                if idx < remainder {
                    share += 1;
                }
                Split::new(*participant, Money::from_cents(share))
            })
            .collect();

        Ok(splits)
    }

    /// Passes the shares through once they sum to `total` within 0.01.
    pub fn compute_exact_split(
        total: Money,
        shares: &[ExactShare],
    ) -> Result<Vec<Split>, SplitError> {
        checked_total_cents(total)?;
        if shares.is_empty() {
            return Err(InvalidInput::EmptyParticipants.into());
        }
        ensure_distinct(shares.iter().map(|share| share.participant))?;
        if let Some(share) = shares.iter().find(|share| share.amount.is_negative()) {
            return Err(InvalidInput::NegativeShare(share.participant).into());
        }

        let actual = shares
            .iter()
            .try_fold(Decimal::ZERO, |sum, share| {
                sum.checked_add(share.amount.as_decimal())
            })
            .map(Money::from_decimal)
            .ok_or(InvalidInput::Overflow)?;
        if !actual.approx_eq(total) {
            return Err(ValidationError::AmountSumMismatch {
                expected: total,
                actual,
            }
            .into());
        }

        Ok(shares
            .iter()
            .map(|share| Split::new(share.participant, share.amount))
            .collect())
    }

    /// Rounds `total * percentage / 100` to the cent for every participant
    /// but the last, who receives `total` minus everything already handed out.
    /// A sum just over 100 can push that residue below zero, which is refused.
    pub fn compute_percentage_split(
        total: Money,
        shares: &[PercentageShare],
    ) -> Result<Vec<Split>, SplitError> {
        checked_total_cents(total)?;
        let Some((last, leading)) = shares.split_last() else {
            return Err(InvalidInput::EmptyParticipants.into());
        };
        ensure_distinct(shares.iter().map(|share| share.participant))?;
        if let Some(share) = shares.iter().find(|share| share.percentage.is_sign_negative()) {
            return Err(InvalidInput::NegativeShare(share.participant).into());
        }

        let percentage_sum = shares
            .iter()
            .try_fold(Decimal::ZERO, |sum, share| sum.checked_add(share.percentage))
            .ok_or(InvalidInput::Overflow)?;
        if (Decimal::ONE_HUNDRED - percentage_sum).abs() >= TOLERANCE {
            return Err(ValidationError::PercentageSumMismatch {
                actual: percentage_sum,
            }
            .into());
        }

        let mut splits = Vec::with_capacity(shares.len());
        let mut allocated = Money::ZERO;
        for share in leading {
            let amount = (total * share.percentage / Decimal::ONE_HUNDRED).round_cents();
            allocated += amount;
            splits.push(Split::with_percentage(
                share.participant,
                amount,
                share.percentage,
            ));
        }
        let residue = total - allocated;
        if residue.is_negative() {
            return Err(InvalidInput::NegativeShare(last.participant).into());
        }
        splits.push(Split::with_percentage(last.participant, residue, last.percentage));

        Ok(splits)
    }
}

fn checked_total_cents(total: Money) -> Result<i64, InvalidInput> {
    if !total.is_positive() {
        return Err(InvalidInput::NonPositiveAmount(total));
    }
    total.to_cents().ok_or(InvalidInput::SubCentAmount(total))
}

fn ensure_distinct<I>(participants: I) -> Result<(), InvalidInput>
where
    I: IntoIterator<Item = ParticipantId>,
{
    let mut seen = FxHashSet::default();
    for participant in participants {
        if !seen.insert(participant) {
            return Err(InvalidInput::DuplicateParticipant(participant));
        }
    }
    Ok(())
}
