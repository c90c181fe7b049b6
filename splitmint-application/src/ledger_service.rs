use crate::{
    config::LedgerConfig,
    error::LedgerError,
    model::{
        ActivityEntry, ActivityReport, Contribution, ExpenseDraft, ExpenseFilter, GroupSummary,
        PersonBalance, RemovalReport, SettlementResult,
    },
    ports::{LedgerRepository, NewExpense},
};
use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use splitmint_domain::{
    Allocation, BalanceAggregator, Expense, ExpenseId, Group, GroupId, MembershipGuard, Money,
    NetBalances, Participant, ParticipantId, ParticipantRemovalPolicy, SettlementOptimizer,
    SplitCalculator, Transfer,
};
use tracing::{debug, info, warn};

/// Entry point for every ledger mutation and query. Balances and settlements
/// are recomputed from the stored expenses on each call.
pub struct LedgerService<R> {
    repository: R,
    config: LedgerConfig,
}

impl<R: LedgerRepository> LedgerService<R> {
    pub fn new(repository: R, config: LedgerConfig) -> Self {
        Self { repository, config }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn create_group(&mut self, name: &str) -> Result<Group, LedgerError> {
        let currency = self.config.default_currency.clone();
        self.create_group_with_currency(name, &currency)
    }

    pub fn create_group_with_currency(
        &mut self,
        name: &str,
        currency: &str,
    ) -> Result<Group, LedgerError> {
        let name = normalize_name(name)?;
        let group = self
            .repository
            .insert_group(name, currency.trim().to_ascii_uppercase());
        info!(group = %group.id, name = %group.name, "group created");
        Ok(group)
    }

    pub fn rename_group(&mut self, id: GroupId, name: &str) -> Result<Group, LedgerError> {
        let mut group = self.group(id)?;
        group.name = normalize_name(name)?;
        if !self.repository.update_group(group.clone()) {
            return Err(LedgerError::UnknownGroup(id));
        }
        Ok(group)
    }

    /// Deletes the group together with its participants and expenses.
    pub fn delete_group(&mut self, id: GroupId) -> Result<Group, LedgerError> {
        self.group(id)?;
        self.repository.replace_expenses(id, Vec::new());
        for participant in self.repository.participants(id) {
            self.repository.remove_participant(participant.id);
        }
        let group = self
            .repository
            .remove_group(id)
            .ok_or(LedgerError::UnknownGroup(id))?;
        info!(group = %id, "group deleted");
        Ok(group)
    }

    pub fn group(&self, id: GroupId) -> Result<Group, LedgerError> {
        self.repository
            .group(id)
            .ok_or(LedgerError::UnknownGroup(id))
    }

    pub fn groups(&self) -> Vec<Group> {
        self.repository.groups()
    }

    pub fn add_participant(
        &mut self,
        group: GroupId,
        name: &str,
    ) -> Result<Participant, LedgerError> {
        self.group(group)?;
        let name = normalize_name(name)?;
        let roster = self.repository.participants(group);

        if let Some(limit) = self
            .config
            .max_participants_per_group
            .filter(|limit| roster.len() >= *limit)
        {
            return Err(LedgerError::GroupFull { group, limit });
        }
        if roster.iter().any(|member| member.name == name) {
            return Err(LedgerError::DuplicateName { group, name });
        }

        let participant = self.repository.insert_participant(group, name);
        debug!(group = %group, participant = %participant.id, "participant added");
        Ok(participant)
    }

    pub fn rename_participant(
        &mut self,
        id: ParticipantId,
        name: &str,
    ) -> Result<Participant, LedgerError> {
        let mut participant = self.participant(id)?;
        let name = normalize_name(name)?;
        let taken = self
            .repository
            .participants(participant.group_id)
            .iter()
            .any(|member| member.id != id && member.name == name);
        if taken {
            return Err(LedgerError::DuplicateName {
                group: participant.group_id,
                name,
            });
        }

        participant.name = name;
        if !self.repository.update_participant(participant.clone()) {
            return Err(LedgerError::UnknownParticipant(id));
        }
        Ok(participant)
    }

    /// Removes a participant and cascades the change through the group's
    /// expenses. Expenses they paid are deleted rather than reassigned.
    pub fn remove_participant(&mut self, id: ParticipantId) -> Result<RemovalReport, LedgerError> {
        let participant = self.participant(id)?;
        let group = participant.group_id;

        let outcome =
            ParticipantRemovalPolicy::apply(self.repository.expenses(group), participant.id);
        self.repository.replace_expenses(group, outcome.expenses);
        self.repository.remove_participant(id);

        info!(
            group = %group,
            participant = %id,
            deleted = outcome.deleted.len(),
            resplit = outcome.resplit.len(),
            "participant removed"
        );
        for expense in &outcome.unbalanced {
            warn!(expense = %expense, "expense no longer adds up after participant removal");
        }

        Ok(RemovalReport {
            participant,
            deleted_expenses: outcome.deleted,
            resplit_expenses: outcome.resplit,
            unbalanced_expenses: outcome.unbalanced,
        })
    }

    pub fn participants(&self, group: GroupId) -> Result<Vec<Participant>, LedgerError> {
        self.group(group)?;
        Ok(self.repository.participants(group))
    }

    /// Looks a participant up by display name inside one group.
    pub fn find_participant(&self, group: GroupId, name: &str) -> Option<Participant> {
        let name = name.trim();
        self.repository
            .participants(group)
            .into_iter()
            .find(|member| member.name == name)
    }

    pub fn log_expense(
        &mut self,
        group: GroupId,
        draft: ExpenseDraft,
    ) -> Result<Expense, LedgerError> {
        let allocation = self.allocate(group, &draft)?;
        let expense = self.repository.insert_expense(NewExpense {
            group_id: group,
            description: draft.description,
            amount: draft.amount,
            payer: draft.payer,
            split_type: allocation.split_type,
            splits: allocation.splits,
            created_at: draft.created_at.unwrap_or_else(Utc::now),
        });
        debug!(
            group = %group,
            expense = %expense.id,
            amount = %expense.amount,
            split_type = %expense.split_type,
            "expense logged"
        );
        Ok(expense)
    }

    /// Recomputes an expense from a new draft. Nothing is written unless the
    /// draft validates.
    pub fn edit_expense(
        &mut self,
        id: ExpenseId,
        draft: ExpenseDraft,
    ) -> Result<Expense, LedgerError> {
        let current = self.expense(id)?;
        let allocation = self.allocate(current.group_id, &draft)?;
        let expense = NewExpense {
            group_id: current.group_id,
            description: draft.description,
            amount: draft.amount,
            payer: draft.payer,
            split_type: allocation.split_type,
            splits: allocation.splits,
            created_at: draft.created_at.unwrap_or(current.created_at),
        }
        .into_expense(id);

        if !self.repository.update_expense(expense.clone()) {
            return Err(LedgerError::UnknownExpense(id));
        }
        debug!(expense = %id, "expense edited");
        Ok(expense)
    }

    pub fn delete_expense(&mut self, id: ExpenseId) -> Result<Expense, LedgerError> {
        let expense = self
            .repository
            .remove_expense(id)
            .ok_or(LedgerError::UnknownExpense(id))?;
        debug!(expense = %id, "expense deleted");
        Ok(expense)
    }

    pub fn expense(&self, id: ExpenseId) -> Result<Expense, LedgerError> {
        self.repository
            .expense(id)
            .ok_or(LedgerError::UnknownExpense(id))
    }

    pub fn expenses(&self, group: GroupId) -> Result<Vec<Expense>, LedgerError> {
        self.group(group)?;
        Ok(self.repository.expenses(group))
    }

    pub fn net_balances(&self, group: GroupId) -> Result<NetBalances, LedgerError> {
        let roster = self.participants(group)?;
        let expenses = self.repository.expenses(group);
        Ok(BalanceAggregator::net_balances(
            &expenses,
            roster.iter().map(|member| member.id),
        ))
    }

    pub fn settlements(&self, group: GroupId) -> Result<Vec<Transfer>, LedgerError> {
        let balances = self.net_balances(group)?;
        Ok(SettlementOptimizer.optimize(&balances))
    }

    pub fn settlement_result(&self, group: GroupId) -> Result<SettlementResult, LedgerError> {
        let balances = self.net_balances(group)?;
        let transfers = SettlementOptimizer.optimize(&balances);
        let balances = balances
            .into_iter()
            .map(|(id, balance)| PersonBalance { id, balance })
            .collect();
        Ok(SettlementResult {
            balances,
            transfers,
        })
    }

    pub fn group_summary(&self, group: GroupId) -> Result<GroupSummary, LedgerError> {
        let roster = self.participants(group)?;
        let expenses = self.repository.expenses(group);
        let balances =
            BalanceAggregator::net_balances(&expenses, roster.iter().map(|member| member.id));

        let total_spent: Money = expenses.iter().map(|expense| expense.amount).sum();
        let average_per_participant = if roster.is_empty() {
            Money::ZERO
        } else {
            total_spent / Decimal::from(roster.len())
        };

        let contributions = roster
            .iter()
            .map(|member| {
                let paid: Money = expenses
                    .iter()
                    .filter(|expense| expense.payer == member.id)
                    .map(|expense| expense.amount)
                    .sum();
                let share: Money = expenses
                    .iter()
                    .map(|expense| expense.share_of(member.id))
                    .sum();
                Contribution {
                    participant: member.id,
                    paid,
                    share,
                    balance: balances.get(&member.id).copied().unwrap_or(Money::ZERO),
                    spend_percentage: spend_percentage(paid, total_spent),
                }
            })
            .collect();

        Ok(GroupSummary {
            group_id: group,
            expense_count: expenses.len(),
            total_spent,
            average_per_participant,
            contributions,
        })
    }

    /// Expenses from every group matching `filter`, newest first.
    pub fn activity(&self, filter: &ExpenseFilter) -> Result<ActivityReport, LedgerError> {
        self.activity_at(filter, Utc::now())
    }

    /// Like [`Self::activity`], with `now` deciding which month counts as
    /// the current one.
    pub fn activity_at(
        &self,
        filter: &ExpenseFilter,
        now: DateTime<Utc>,
    ) -> Result<ActivityReport, LedgerError> {
        if let Some(group) = filter.group {
            self.group(group)?;
        }

        let mut feed = Vec::new();
        for group in self.repository.groups() {
            let roster = self.repository.participants(group.id);
            let name_of = |id: ParticipantId| {
                roster
                    .iter()
                    .find(|member| member.id == id)
                    .map_or_else(|| id.to_string(), |member| member.name.clone())
            };
            for expense in self.repository.expenses(group.id) {
                feed.push(ActivityEntry {
                    group_name: group.name.clone(),
                    payer_name: name_of(expense.payer),
                    split_names: expense
                        .splits
                        .iter()
                        .map(|split| name_of(split.participant))
                        .collect(),
                    expense,
                });
            }
        }

        let total: Money = feed.iter().map(|entry| entry.expense.amount).sum();
        let average_per_expense = if feed.is_empty() {
            Money::ZERO
        } else {
            total / Decimal::from(feed.len())
        };
        let (this_month_count, this_month_total) = feed
            .iter()
            .filter(|entry| entry.in_month_of(now))
            .fold((0, Money::ZERO), |(count, sum), entry| {
                (count + 1, sum + entry.expense.amount)
            });

        let mut entries: Vec<ActivityEntry> =
            feed.into_iter().filter(|entry| filter.matches(entry)).collect();
        entries.sort_by(|a, b| {
            b.expense
                .created_at
                .cmp(&a.expense.created_at)
                .then(b.expense.id.cmp(&a.expense.id))
        });
        debug!(matched = entries.len(), "activity feed built");

        Ok(ActivityReport {
            entries,
            this_month_total,
            this_month_count,
            average_per_expense,
        })
    }

    fn participant(&self, id: ParticipantId) -> Result<Participant, LedgerError> {
        self.repository
            .participant(id)
            .ok_or(LedgerError::UnknownParticipant(id))
    }

    fn allocate(&self, group: GroupId, draft: &ExpenseDraft) -> Result<Allocation, LedgerError> {
        let roster = self.participants(group)?;
        MembershipGuard::new(group, roster.iter().map(|member| member.id))
            .check(draft.payer, &draft.rule)?;
        Ok(SplitCalculator::allocate(draft.amount, &draft.rule)?)
    }
}

fn normalize_name(name: &str) -> Result<String, LedgerError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(LedgerError::EmptyName);
    }
    Ok(name.to_string())
}

fn spend_percentage(paid: Money, total: Money) -> u32 {
    if !total.is_positive() {
        return 0;
    }
    (paid.as_decimal() / total.as_decimal() * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u32()
        .unwrap_or(0)
}
