use crate::{
    currency::CurrencyFormatter,
    text_table::{Alignment, TextTableBuilder},
};
use splitmint_application::{MemberDirectory, PersonBalance, SettlementResult};
use splitmint_domain::{ParticipantId, Transfer};
use splitmint_i18n as i18n;
use std::borrow::Cow;

pub struct SettlementPresenter;

pub struct SettlementView {
    pub balance_table: String,
    /// `None` when nobody owes anything.
    pub transfer_table: Option<String>,
}

impl SettlementView {
    pub fn balances_text(&self) -> String {
        format!("{}\n{}", i18n::BALANCES_HEADING, self.balance_table)
    }

    pub fn settlements_text(&self) -> String {
        match &self.transfer_table {
            Some(table) => format!("{}\n{table}", i18n::SETTLEMENTS_HEADING),
            None => format!("{}\n{}\n", i18n::SETTLEMENTS_HEADING, i18n::ALL_SETTLED),
        }
    }
}

impl SettlementPresenter {
    pub fn render(result: &SettlementResult, formatter: &CurrencyFormatter) -> SettlementView {
        let empty_directory = EmptyMemberDirectory;
        Self::render_with_members(result, &empty_directory, formatter)
    }

    pub fn render_with_members(
        result: &SettlementResult,
        member_directory: &dyn MemberDirectory,
        formatter: &CurrencyFormatter,
    ) -> SettlementView {
        let balance_table =
            Self::build_balance_table(&result.balances, member_directory, formatter);
        let transfer_table = if result.transfers.is_empty() {
            None
        } else {
            Some(Self::build_transfer_table(
                &result.transfers,
                member_directory,
                formatter,
            ))
        };

        SettlementView {
            balance_table,
            transfer_table,
        }
    }

    pub fn build_balance_table(
        person_balances: &[PersonBalance],
        member_directory: &dyn MemberDirectory,
        formatter: &CurrencyFormatter,
    ) -> String {
        let mut builder = TextTableBuilder::new()
            .alignments(&[Alignment::Left, Alignment::Right])
            .headers(&[Cow::Borrowed(i18n::MEMBER), Cow::Borrowed(i18n::BALANCE)]);

        for person in person_balances {
            builder = builder.row([
                format_member_label(person.id, member_directory),
                Cow::Owned(formatter.format_signed(person.balance)),
            ]);
        }

        builder.build()
    }

    /// Rows follow the optimizer's order, largest debts first.
    pub fn build_transfer_table(
        transfers: &[Transfer],
        member_directory: &dyn MemberDirectory,
        formatter: &CurrencyFormatter,
    ) -> String {
        let mut builder = TextTableBuilder::new()
            .alignments(&[Alignment::Left, Alignment::Left, Alignment::Right])
            .headers(&[
                Cow::Borrowed(i18n::FROM),
                Cow::Borrowed(i18n::TO),
                Cow::Borrowed(i18n::AMOUNT),
            ]);

        for transfer in transfers {
            builder = builder.row([
                format_member_label(transfer.from, member_directory),
                format_member_label(transfer.to, member_directory),
                Cow::Owned(formatter.format(transfer.amount)),
            ]);
        }

        builder.build()
    }
}

struct EmptyMemberDirectory;

impl MemberDirectory for EmptyMemberDirectory {
    fn display_name(&self, _participant: ParticipantId) -> Option<&str> {
        None
    }
}

pub(crate) fn format_member_label<'a>(
    participant: ParticipantId,
    member_directory: &'a dyn MemberDirectory,
) -> Cow<'a, str> {
    match member_directory.display_name(participant) {
        Some(name) => Cow::Borrowed(name),
        None => Cow::Owned(participant.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use splitmint_domain::Money;
    use std::collections::HashMap;

    fn sample_result() -> SettlementResult {
        SettlementResult {
            balances: vec![
                PersonBalance {
                    id: ParticipantId(1),
                    balance: Money::from_i64(50),
                },
                PersonBalance {
                    id: ParticipantId(2),
                    balance: Money::from_i64(-50),
                },
            ],
            transfers: vec![Transfer {
                from: ParticipantId(2),
                to: ParticipantId(1),
                amount: Money::from_i64(50),
            }],
        }
    }

    #[test]
    fn render_uses_display_name_when_available() {
        let mut directory = HashMap::new();
        directory.insert(ParticipantId(1), "Alice".to_string());
        directory.insert(ParticipantId(2), "Bob".to_string());

        let view = SettlementPresenter::render_with_members(
            &sample_result(),
            &directory,
            &CurrencyFormatter::new("USD"),
        );

        assert!(view.balance_table.contains("Alice   +$50.00"));
        assert!(view.balance_table.contains("Bob     -$50.00"));
        let transfers = view.transfer_table.as_ref().expect("transfer table");
        assert!(transfers.contains("Bob   Alice  $50.00"));
    }

    #[test]
    fn render_falls_back_to_ids_when_missing() {
        let view = SettlementPresenter::render(&sample_result(), &CurrencyFormatter::new("EUR"));

        assert!(view.balance_table.contains("#1"));
        assert!(
            view.transfer_table
                .as_ref()
                .expect("transfer table")
                .contains("#2")
        );
        assert!(view.balance_table.contains("€50.00"));
    }

    #[test]
    fn settled_group_prints_all_settled_line() {
        let result = SettlementResult {
            balances: vec![PersonBalance {
                id: ParticipantId(1),
                balance: Money::ZERO,
            }],
            transfers: Vec::new(),
        };

        let view = SettlementPresenter::render(&result, &CurrencyFormatter::new("USD"));

        assert!(view.transfer_table.is_none());
        assert!(view.settlements_text().contains(i18n::ALL_SETTLED));
        assert!(view.balances_text().starts_with(i18n::BALANCES_HEADING));
    }
}
