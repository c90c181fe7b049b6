use chrono::{DateTime, Utc};
use splitmint_domain::{
    Expense, ExpenseId, Group, GroupId, Money, Participant, ParticipantId, Split, SplitType,
};
use std::collections::HashMap;

/// Expense fields before the store assigns an id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub group_id: GroupId,
    pub description: String,
    pub amount: Money,
    pub payer: ParticipantId,
    pub split_type: SplitType,
    pub splits: Vec<Split>,
    pub created_at: DateTime<Utc>,
}

impl NewExpense {
    pub fn into_expense(self, id: ExpenseId) -> Expense {
        Expense {
            id,
            group_id: self.group_id,
            description: self.description,
            amount: self.amount,
            payer: self.payer,
            split_type: self.split_type,
            splits: self.splits,
            created_at: self.created_at,
        }
    }
}

/// Storage for groups, participants and expenses. Listing methods return
/// records in insertion order.
pub trait LedgerRepository: Send + Sync {
    fn insert_group(&mut self, name: String, currency: String) -> Group;
    fn group(&self, id: GroupId) -> Option<Group>;
    fn groups(&self) -> Vec<Group>;
    /// Returns `false` when no group with that id exists.
    fn update_group(&mut self, group: Group) -> bool;
    fn remove_group(&mut self, id: GroupId) -> Option<Group>;

    fn insert_participant(&mut self, group_id: GroupId, name: String) -> Participant;
    fn participant(&self, id: ParticipantId) -> Option<Participant>;
    fn participants(&self, group_id: GroupId) -> Vec<Participant>;
    fn update_participant(&mut self, participant: Participant) -> bool;
    fn remove_participant(&mut self, id: ParticipantId) -> Option<Participant>;

    fn insert_expense(&mut self, expense: NewExpense) -> Expense;
    fn expense(&self, id: ExpenseId) -> Option<Expense>;
    fn expenses(&self, group_id: GroupId) -> Vec<Expense>;
    fn update_expense(&mut self, expense: Expense) -> bool;
    fn remove_expense(&mut self, id: ExpenseId) -> Option<Expense>;
    /// Swaps a group's whole expense list in one step.
    fn replace_expenses(&mut self, group_id: GroupId, expenses: Vec<Expense>);
}

pub trait MemberDirectory: Send + Sync {
    fn display_name(&self, participant: ParticipantId) -> Option<&str>;
}

impl MemberDirectory for HashMap<ParticipantId, String> {
    fn display_name(&self, participant: ParticipantId) -> Option<&str> {
        self.get(&participant).map(String::as_str)
    }
}

impl MemberDirectory for [Participant] {
    fn display_name(&self, participant: ParticipantId) -> Option<&str> {
        self.iter()
            .find(|member| member.id == participant)
            .map(|member| member.name.as_str())
    }
}

impl MemberDirectory for Vec<Participant> {
    fn display_name(&self, participant: ParticipantId) -> Option<&str> {
        self.as_slice().display_name(participant)
    }
}
