use crate::{CliResult, bootstrap::InterpreterConfig};
use chrono::NaiveTime;
use splitmint_application::{ExpenseDraft, ExpenseFilter, LedgerError, LedgerService};
use splitmint_domain::{
    ExactShare, GroupId, Money, Participant, ParticipantId, PercentageShare, SplitRule,
};
use splitmint_i18n as i18n;
use splitmint_infrastructure::InMemoryLedger;
use splitmint_parser::{
    ActivityQuery, Command, ExpenseLine, NamedValue, Program, SplitSpec, Statement,
    StatementWithLine,
};
use splitmint_presentation::{
    ActivityPresenter, CurrencyFormatter, SettlementPresenter, SummaryPresenter,
    format_ledger_error,
};
use tracing::{debug, info};

const SCRIPT_GROUP_NAME: &str = "Script";

/// Replays a parsed script against a fresh in-memory ledger.
pub struct ScriptRunner {
    service: LedgerService<InMemoryLedger>,
    group: GroupId,
    formatter: CurrencyFormatter,
    members_declared: bool,
}

impl ScriptRunner {
    pub fn new(config: &InterpreterConfig) -> CliResult<Self> {
        let mut service = LedgerService::new(InMemoryLedger::new(), config.ledger.clone());
        let group = service
            .create_group(SCRIPT_GROUP_NAME)
            .map_err(|err| err.to_string())?;
        Ok(Self {
            service,
            formatter: CurrencyFormatter::new(&group.currency),
            group: group.id,
            members_declared: false,
        })
    }

    /// Returns one output block per command. A script without commands
    /// reports balances and settlements once at the end.
    pub fn run(&mut self, program: &Program<'_>) -> CliResult<Vec<String>> {
        info!(statements = program.statements.len(), "replaying script");

        let mut outputs = Vec::new();
        for statement in &program.statements {
            outputs.extend(self.execute(statement)?);
        }

        if !program.has_command() {
            outputs.push(self.render_command(Command::Balances)?);
            outputs.push(self.render_command(Command::Settle)?);
        }
        Ok(outputs)
    }

    fn execute(&mut self, statement: &StatementWithLine<'_>) -> CliResult<Vec<String>> {
        let line = statement.line;
        debug!(line, "executing statement");

        match &statement.statement {
            Statement::Members(names) => {
                self.declare_members(names, line)?;
                Ok(Vec::new())
            }
            Statement::Expense(expense) => {
                self.require_members(line)?;
                let draft = self.build_draft(expense, line)?;
                self.service
                    .log_expense(self.group, draft)
                    .map_err(|err| self.ledger_error(line, &err))?;
                Ok(Vec::new())
            }
            Statement::Remove(name) => {
                self.require_members(line)?;
                let participant = self.resolve(name, line)?;
                let report = self
                    .service
                    .remove_participant(participant)
                    .map_err(|err| self.ledger_error(line, &err))?;

                let mut notices = vec![i18n::participant_removed(
                    &report.participant.name,
                    report.deleted_expenses.len(),
                    report.resplit_expenses.len(),
                )];
                notices.extend(report.unbalanced_expenses.iter().map(|expense| {
                    let label = self
                        .service
                        .expense(*expense)
                        .map(|expense| format!("\"{}\"", expense.description))
                        .unwrap_or_else(|_| expense.to_string());
                    i18n::expense_needs_review(label)
                }));
                debug!(removed = %participant, "participant removed from script group");
                Ok(vec![notices.join("\n")])
            }
            Statement::Command(command) => Ok(vec![self.render_command(*command)?]),
            Statement::Activity(query) => Ok(vec![self.render_activity(query, line)?]),
        }
    }

    fn declare_members(&mut self, names: &[&str], line: usize) -> CliResult<()> {
        if self.members_declared {
            return Err(i18n::at_line(line, i18n::members_already_declared()).into());
        }
        for name in names {
            self.service
                .add_participant(self.group, name)
                .map_err(|err| self.ledger_error(line, &err))?;
        }
        self.members_declared = true;
        Ok(())
    }

    fn require_members(&self, line: usize) -> CliResult<()> {
        if self.members_declared {
            Ok(())
        } else {
            Err(i18n::at_line(line, i18n::MISSING_MEMBERS_DECLARATION).into())
        }
    }

    fn build_draft(&self, expense: &ExpenseLine<'_>, line: usize) -> CliResult<ExpenseDraft> {
        let payer = self.resolve(expense.payer, line)?;
        let rule = match &expense.split {
            SplitSpec::EqualAll => {
                SplitRule::Equal(self.roster()?.iter().map(|member| member.id).collect())
            }
            SplitSpec::EqualAmong(names) => SplitRule::Equal(
                names
                    .iter()
                    .map(|name| self.resolve(name, line))
                    .collect::<CliResult<_>>()?,
            ),
            SplitSpec::Exact(shares) => SplitRule::Exact(
                shares
                    .iter()
                    .map(|NamedValue { name, value }| -> CliResult<ExactShare> {
                        Ok(ExactShare {
                            participant: self.resolve(name, line)?,
                            amount: Money::from_decimal(*value),
                        })
                    })
                    .collect::<CliResult<_>>()?,
            ),
            SplitSpec::Percent(shares) => SplitRule::Percentage(
                shares
                    .iter()
                    .map(|NamedValue { name, value }| -> CliResult<PercentageShare> {
                        Ok(PercentageShare {
                            participant: self.resolve(name, line)?,
                            percentage: *value,
                        })
                    })
                    .collect::<CliResult<_>>()?,
            ),
        };

        Ok(ExpenseDraft {
            description: expense.description.to_string(),
            amount: Money::from_decimal(expense.amount),
            payer,
            rule,
            created_at: expense
                .date
                .map(|date| date.and_time(NaiveTime::MIN).and_utc()),
        })
    }

    fn render_command(&self, command: Command) -> CliResult<String> {
        let roster = self.roster()?;
        match command {
            Command::Balances | Command::Settle => {
                let result = self
                    .service
                    .settlement_result(self.group)
                    .map_err(|err| err.to_string())?;
                let view =
                    SettlementPresenter::render_with_members(&result, &roster, &self.formatter);
                Ok(match command {
                    Command::Balances => view.balances_text(),
                    _ => view.settlements_text(),
                })
            }
            Command::Summary => {
                let summary = self
                    .service
                    .group_summary(self.group)
                    .map_err(|err| err.to_string())?;
                Ok(SummaryPresenter::render_with_members(
                    &summary,
                    &roster,
                    &self.formatter,
                ))
            }
        }
    }

    fn render_activity(&self, query: &ActivityQuery<'_>, line: usize) -> CliResult<String> {
        if let Some(name) = query.participant {
            self.resolve(name, line)?;
        }
        let filter = ExpenseFilter {
            text: query.text.map(str::to_string),
            group: Some(self.group),
            participant: query.participant.map(str::to_string),
            min_amount: query.min_amount.map(Money::from_decimal),
            max_amount: query.max_amount.map(Money::from_decimal),
            from: query.from,
            to: query.to,
        };
        let report = self
            .service
            .activity(&filter)
            .map_err(|err| self.ledger_error(line, &err))?;
        Ok(ActivityPresenter::render(&report, &self.formatter))
    }

    fn resolve(&self, name: &str, line: usize) -> CliResult<ParticipantId> {
        self.service
            .find_participant(self.group, name)
            .map(|participant| participant.id)
            .ok_or_else(|| i18n::at_line(line, i18n::unknown_participant(name)).into())
    }

    fn roster(&self) -> CliResult<Vec<Participant>> {
        self.service
            .participants(self.group)
            .map_err(|err| err.to_string().into())
    }

    fn ledger_error(&self, line: usize, err: &LedgerError) -> String {
        let roster = self.roster().unwrap_or_default();
        i18n::at_line(line, format_ledger_error(err, &roster))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use splitmint_parser::parse_program;

    fn run_script(script: &str) -> CliResult<Vec<String>> {
        let program = parse_program(script).unwrap();
        let mut runner = ScriptRunner::new(&InterpreterConfig::default())?;
        runner.run(&program)
    }

    #[test]
    fn script_without_commands_prints_balances_and_settlements() {
        let outputs =
            run_script("MEMBERS := A, B, C\nA paid 100 for \"Dinner\" equally\n").unwrap();

        assert_eq!(outputs.len(), 2);
        assert!(outputs[0].starts_with(i18n::BALANCES_HEADING));
        assert!(outputs[0].contains("+$66.66"));
        assert!(outputs[0].contains("-$33.33"));
        assert!(outputs[1].starts_with(i18n::SETTLEMENTS_HEADING));
        assert!(outputs[1].contains("B     A   $33.33"));
        assert!(outputs[1].contains("C     A   $33.33"));
    }

    #[test]
    fn commands_print_at_their_position() {
        let script = "\
MEMBERS := Alice, Bob
!settle
Alice paid 30 for \"Taxi\" equally among Alice, Bob
!settle
!summary
";
        let outputs = run_script(script).unwrap();

        assert_eq!(outputs.len(), 3);
        assert!(outputs[0].contains(i18n::ALL_SETTLED));
        assert!(outputs[1].contains("$15.00"));
        assert!(outputs[2].contains("Total spent: $30.00 across 1 expense(s)"));
    }

    #[test]
    fn remove_reports_cascade() {
        let script = "\
MEMBERS := A, B, C
A paid 90 for \"Hotel\" equally
B paid 30 for \"Snacks\" exactly B 10, C 20
REMOVE A
REMOVE C
!balances
";
        let outputs = run_script(script).unwrap();

        assert_eq!(outputs[0], "Removed A: 1 expense(s) deleted, 0 re-split");
        assert!(outputs[1].starts_with("Removed C: 0 expense(s) deleted, 0 re-split"));
        assert!(outputs[1].contains("\"Snacks\""));
        assert!(outputs[2].contains("+$20.00"));
    }

    #[test]
    fn unknown_names_are_reported_with_line() {
        let err =
            run_script("MEMBERS := A, B\nA paid 10 for \"Tea\" equally among A, Zed").unwrap_err();
        assert_eq!(err, "Line 2: Unknown participant 'Zed'");
    }

    #[test]
    fn expense_before_members_is_rejected() {
        let err = run_script("A paid 10 for \"Tea\" equally").unwrap_err();
        assert!(err.starts_with("Line 1: "));
        assert!(err.contains("MEMBERS"));
    }

    #[test]
    fn invalid_split_is_reported_with_line() {
        let script = "MEMBERS := A, B, C\n\nA paid 100 for \"Hotel\" exactly A 40, B 35, C 26";
        let err = run_script(script).unwrap_err();
        assert_eq!(err, "Line 3: split amounts sum to 101, expected 100");
    }

    #[test]
    fn overflowing_split_is_reported_with_line() {
        let script = "MEMBERS := A, B\nA paid 100 for \"x\" exactly A 79228162514264337593543950335, B 1";
        let err = run_script(script).unwrap_err();
        assert_eq!(err, "Line 2: split values are too large to add up");
    }

    #[test]
    fn member_named_like_a_keyword_can_pay() {
        let outputs = run_script("MEMBERS := Remove, B\nRemove paid 10 for \"x\" equally\n!balances")
            .unwrap();
        assert!(outputs[0].contains("+$5.00"));
    }

    #[test]
    fn activity_lists_dated_expenses_newest_first() {
        let script = "\
MEMBERS := Alice, Bob
Alice paid 90 for \"Hotel\" on 2024-03-10 equally
Bob paid 20 for \"Taxi\" on 2024-04-02 equally
Bob paid 12 for \"Coffee\" on 2024-04-05 equally among Bob
!activity involving Alice
!activity matching \"TAXI\"
!activity min 15 from 2024-04-01
";
        let outputs = run_script(script).unwrap();

        assert_eq!(outputs.len(), 3);
        assert!(outputs[0].starts_with(i18n::ACTIVITY_HEADING));
        assert!(outputs[0].contains("Average per expense: $40.67"));
        let taxi = outputs[0].find("Taxi").unwrap();
        let hotel = outputs[0].find("Hotel").unwrap();
        assert!(taxi < hotel);
        assert!(!outputs[0].contains("Coffee"));

        assert!(outputs[1].contains("2024-04-02  Taxi"));
        assert!(!outputs[1].contains("Hotel"));

        assert!(outputs[2].contains("Taxi"));
        assert!(!outputs[2].contains("Hotel"));
        assert!(!outputs[2].contains("Coffee"));
    }

    #[test]
    fn activity_rejects_unknown_participant() {
        let err = run_script("MEMBERS := A\n!activity involving Zed").unwrap_err();
        assert_eq!(err, "Line 2: Unknown participant 'Zed'");
    }

    #[test]
    fn participant_limit_applies_to_members() {
        let err = run_script("MEMBERS := A, B, C, D, E").unwrap_err();
        assert!(err.starts_with("Line 1: "));
        assert!(err.contains("maximum of 4"));
    }
}
