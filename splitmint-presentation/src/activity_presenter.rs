use crate::{
    currency::CurrencyFormatter,
    text_table::{Alignment, TextTableBuilder},
};
use splitmint_application::ActivityReport;
use splitmint_i18n as i18n;
use std::borrow::Cow;

pub struct ActivityPresenter;

impl ActivityPresenter {
    /// Feed statistics followed by one row per matching expense.
    pub fn render(report: &ActivityReport, formatter: &CurrencyFormatter) -> String {
        let stats = format!(
            "{}\n{}\n{}",
            i18n::ACTIVITY_HEADING,
            i18n::this_month(
                formatter.format(report.this_month_total),
                report.this_month_count
            ),
            i18n::average_per_expense(formatter.format(report.average_per_expense)),
        );
        if report.entries.is_empty() {
            return format!("{stats}\n{}", i18n::NO_ACTIVITY);
        }

        let builder = TextTableBuilder::new()
            .alignments(&[
                Alignment::Left,
                Alignment::Left,
                Alignment::Left,
                Alignment::Left,
                Alignment::Right,
            ])
            .headers(&[
                Cow::Borrowed(i18n::DATE),
                Cow::Borrowed(i18n::DESCRIPTION),
                Cow::Borrowed(i18n::GROUP),
                Cow::Borrowed(i18n::PAID_BY),
                Cow::Borrowed(i18n::AMOUNT),
            ])
            .rows(report.entries.iter().map(|entry| {
                [
                    Cow::Owned(entry.expense.created_at.format("%Y-%m-%d").to_string()),
                    Cow::Borrowed(entry.expense.description.as_str()),
                    Cow::Borrowed(entry.group_name.as_str()),
                    Cow::Borrowed(entry.payer_name.as_str()),
                    Cow::Owned(formatter.format(entry.expense.amount)),
                ]
            }));

        format!("{stats}\n{}", builder.build())
    }
}
