use crate::settlement_presenter::format_member_label;
use splitmint_application::{LedgerError, MemberDirectory};
use splitmint_domain::{InvalidInput, SplitError};
use splitmint_parser::ParseError;

pub fn format_parse_error(error: &ParseError) -> String {
    match error {
        ParseError::SyntaxError { line, detail } => splitmint_i18n::syntax_error(*line, detail),
    }
}

/// Replaces participant ids with display names where the message names one.
pub fn format_ledger_error(error: &LedgerError, member_directory: &dyn MemberDirectory) -> String {
    match error {
        LedgerError::UnknownParticipant(id) => {
            splitmint_i18n::unknown_participant(format_member_label(*id, member_directory))
        }
        LedgerError::Split(SplitError::InvalidInput(InvalidInput::ParticipantOutsideGroup {
            participant,
            ..
        })) => format!(
            "{} is not a member of this group",
            format_member_label(*participant, member_directory)
        ),
        other => other.to_string(),
    }
}
