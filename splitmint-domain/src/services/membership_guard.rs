use crate::{
    error::InvalidInput,
    model::{GroupId, ParticipantId, SplitRule},
};
use fxhash::FxHashSet;

/// Rejects payers and split participants that are not on a group's roster.
pub struct MembershipGuard {
    group: GroupId,
    roster: FxHashSet<ParticipantId>,
}

impl MembershipGuard {
    pub fn new<I>(group: GroupId, roster: I) -> Self
    where
        I: IntoIterator<Item = ParticipantId>,
    {
        Self {
            group,
            roster: roster.into_iter().collect(),
        }
    }

    pub fn contains(&self, participant: ParticipantId) -> bool {
        self.roster.contains(&participant)
    }

    pub fn check(&self, payer: ParticipantId, rule: &SplitRule) -> Result<(), InvalidInput> {
        std::iter::once(payer)
            .chain(rule.participants())
            .try_for_each(|participant| self.check_participant(participant))
    }

    fn check_participant(&self, participant: ParticipantId) -> Result<(), InvalidInput> {
        if self.contains(participant) {
            Ok(())
        } else {
            Err(InvalidInput::ParticipantOutsideGroup {
                participant,
                group: self.group,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ExactShare, Money};
    use rstest::{fixture, rstest};

    #[fixture]
    fn guard() -> MembershipGuard {
        MembershipGuard::new(GroupId(1), [ParticipantId(1), ParticipantId(2)])
    }

    #[rstest]
    #[case::members_only(ParticipantId(1), SplitRule::Equal(vec![ParticipantId(1), ParticipantId(2)]), None)]
    #[case::outside_payer(
        ParticipantId(9),
        SplitRule::Equal(vec![ParticipantId(1)]),
        Some(ParticipantId(9))
    )]
    #[case::outside_split(
        ParticipantId(1),
        SplitRule::Exact(vec![ExactShare { participant: ParticipantId(3), amount: Money::from_i64(5) }]),
        Some(ParticipantId(3))
    )]
    fn check_reports_first_outsider(
        guard: MembershipGuard,
        #[case] payer: ParticipantId,
        #[case] rule: SplitRule,
        #[case] outsider: Option<ParticipantId>,
    ) {
        let expected = match outsider {
            None => Ok(()),
            Some(participant) => Err(InvalidInput::ParticipantOutsideGroup {
                participant,
                group: GroupId(1),
            }),
        };
        assert_eq!(guard.check(payer, &rule), expected);
    }
}
