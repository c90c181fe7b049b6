use crate::{
    currency::CurrencyFormatter,
    settlement_presenter::format_member_label,
    text_table::{Alignment, TextTableBuilder},
};
use splitmint_application::{GroupSummary, MemberDirectory};
use splitmint_i18n as i18n;
use std::borrow::Cow;

pub struct SummaryPresenter;

impl SummaryPresenter {
    pub fn render_with_members(
        summary: &GroupSummary,
        member_directory: &dyn MemberDirectory,
        formatter: &CurrencyFormatter,
    ) -> String {
        let mut builder = TextTableBuilder::new()
            .alignments(&[
                Alignment::Left,
                Alignment::Right,
                Alignment::Right,
                Alignment::Right,
                Alignment::Right,
            ])
            .headers(&[
                Cow::Borrowed(i18n::MEMBER),
                Cow::Borrowed(i18n::PAID),
                Cow::Borrowed(i18n::SHARE),
                Cow::Borrowed(i18n::BALANCE),
                Cow::Borrowed(i18n::SPEND_SHARE),
            ]);

        for row in &summary.contributions {
            builder = builder.row([
                format_member_label(row.participant, member_directory),
                Cow::Owned(formatter.format(row.paid)),
                Cow::Owned(formatter.format(row.share)),
                Cow::Owned(formatter.format_signed(row.balance)),
                Cow::Owned(format!("{}%", row.spend_percentage)),
            ]);
        }

        format!(
            "{}\n{}\n{}\n{}",
            i18n::SUMMARY_HEADING,
            i18n::total_spent(formatter.format(summary.total_spent), summary.expense_count),
            i18n::average_per_participant(formatter.format(summary.average_per_participant)),
            builder.build()
        )
    }
}
