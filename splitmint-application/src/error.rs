use splitmint_domain::{
    ExpenseId, GroupId, InvalidInput, ParticipantId, SplitError, ValidationError,
};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("group {0} does not exist")]
    UnknownGroup(GroupId),
    #[error("participant {0} does not exist")]
    UnknownParticipant(ParticipantId),
    #[error("expense {0} does not exist")]
    UnknownExpense(ExpenseId),
    #[error("group {group} already has the maximum of {limit} participants")]
    GroupFull { group: GroupId, limit: usize },
    #[error("name must not be empty")]
    EmptyName,
    #[error("group {group} already has a participant named '{name}'")]
    DuplicateName { group: GroupId, name: String },
    #[error(transparent)]
    Split(#[from] SplitError),
}

impl From<InvalidInput> for LedgerError {
    fn from(err: InvalidInput) -> Self {
        Self::Split(err.into())
    }
}

impl From<ValidationError> for LedgerError {
    fn from(err: ValidationError) -> Self {
        Self::Split(err.into())
    }
}

impl LedgerError {
    /// Sum mismatches the user can fix by editing the numbers.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Split(SplitError::Validation(_)))
    }
}
