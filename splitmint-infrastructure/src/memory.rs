use indexmap::IndexMap;
use splitmint_application::{LedgerRepository, NewExpense};
use splitmint_domain::{Expense, ExpenseId, Group, GroupId, Participant, ParticipantId};

/// Process-local store. Ids are allocated from per-kind counters starting at
/// 1 and are never reused.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    groups: IndexMap<GroupId, Group>,
    participants: IndexMap<ParticipantId, Participant>,
    expenses: IndexMap<ExpenseId, Expense>,
    last_group_id: u64,
    last_participant_id: u64,
    last_expense_id: u64,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LedgerRepository for InMemoryLedger {
    fn insert_group(&mut self, name: String, currency: String) -> Group {
        self.last_group_id += 1;
        let group = Group {
            id: GroupId(self.last_group_id),
            name,
            currency,
        };
        self.groups.insert(group.id, group.clone());
        group
    }

    fn group(&self, id: GroupId) -> Option<Group> {
        self.groups.get(&id).cloned()
    }

    fn groups(&self) -> Vec<Group> {
        self.groups.values().cloned().collect()
    }

    fn update_group(&mut self, group: Group) -> bool {
        match self.groups.get_mut(&group.id) {
            Some(slot) => {
                *slot = group;
                true
            }
            None => false,
        }
    }

    fn remove_group(&mut self, id: GroupId) -> Option<Group> {
        self.groups.shift_remove(&id)
    }

    fn insert_participant(&mut self, group_id: GroupId, name: String) -> Participant {
        self.last_participant_id += 1;
        let participant = Participant {
            id: ParticipantId(self.last_participant_id),
            group_id,
            name,
        };
        self.participants
            .insert(participant.id, participant.clone());
        participant
    }

    fn participant(&self, id: ParticipantId) -> Option<Participant> {
        self.participants.get(&id).cloned()
    }

    fn participants(&self, group_id: GroupId) -> Vec<Participant> {
        self.participants
            .values()
            .filter(|participant| participant.group_id == group_id)
            .cloned()
            .collect()
    }

    fn update_participant(&mut self, participant: Participant) -> bool {
        match self.participants.get_mut(&participant.id) {
            Some(slot) => {
                *slot = participant;
                true
            }
            None => false,
        }
    }

    fn remove_participant(&mut self, id: ParticipantId) -> Option<Participant> {
        self.participants.shift_remove(&id)
    }

    fn insert_expense(&mut self, expense: NewExpense) -> Expense {
        self.last_expense_id += 1;
        let expense = expense.into_expense(ExpenseId(self.last_expense_id));
        self.expenses.insert(expense.id, expense.clone());
        expense
    }

    fn expense(&self, id: ExpenseId) -> Option<Expense> {
        self.expenses.get(&id).cloned()
    }

    fn expenses(&self, group_id: GroupId) -> Vec<Expense> {
        self.expenses
            .values()
            .filter(|expense| expense.group_id == group_id)
            .cloned()
            .collect()
    }

    fn update_expense(&mut self, expense: Expense) -> bool {
        match self.expenses.get_mut(&expense.id) {
            Some(slot) => {
                *slot = expense;
                true
            }
            None => false,
        }
    }

    fn remove_expense(&mut self, id: ExpenseId) -> Option<Expense> {
        self.expenses.shift_remove(&id)
    }

    fn replace_expenses(&mut self, group_id: GroupId, expenses: Vec<Expense>) {
        self.expenses
            .retain(|_, expense| expense.group_id != group_id);
        self.expenses.extend(
            expenses
                .into_iter()
                .map(|expense| (expense.id, Expense { group_id, ..expense })),
        );
    }
}
