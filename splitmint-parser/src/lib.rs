#![warn(clippy::uninlined_format_args)]

mod i18n;

use chrono::NaiveDate;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, tag_no_case, take_till, take_until, take_while1},
    character::complete::{char, digit1, multispace1, space1},
    combinator::{map_res, opt, recognize},
    multi::{many0, separated_list1},
    sequence::{delimited, preceded},
};
use rust_decimal::Decimal;

/// A name paired with an amount or a percentage, e.g. `Alice 40`.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedValue<'a> {
    pub name: &'a str,
    pub value: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SplitSpec<'a> {
    /// `equally`: every member on the roster when the line runs.
    EqualAll,
    /// `equally among A, B`
    EqualAmong(Vec<&'a str>),
    /// `exactly A 40, B 60`
    Exact(Vec<NamedValue<'a>>),
    /// `by percent A 50, B 50`
    Percent(Vec<NamedValue<'a>>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseLine<'a> {
    pub payer: &'a str,
    pub amount: Decimal,
    pub description: &'a str,
    /// `on 2024-05-01`
    pub date: Option<NaiveDate>,
    pub split: SplitSpec<'a>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Balances,
    Settle,
    Summary,
}

/// `!activity` with optional clauses in any order. A repeated clause
/// overrides the earlier one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivityQuery<'a> {
    /// `matching "text"`
    pub text: Option<&'a str>,
    /// `involving Name`
    pub participant: Option<&'a str>,
    /// `min 10`
    pub min_amount: Option<Decimal>,
    /// `max 50`
    pub max_amount: Option<Decimal>,
    /// `from 2024-05-01`
    pub from: Option<NaiveDate>,
    /// `to 2024-05-31`
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement<'a> {
    Members(Vec<&'a str>),
    Expense(ExpenseLine<'a>),
    Remove(&'a str),
    Command(Command),
    Activity(ActivityQuery<'a>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatementWithLine<'a> {
    pub line: usize,
    pub statement: Statement<'a>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Program<'a> {
    pub statements: Vec<StatementWithLine<'a>>,
}

impl Program<'_> {
    pub fn has_command(&self) -> bool {
        self.statements
            .iter()
            .any(|stmt| {
                matches!(
                    stmt.statement,
                    Statement::Command(_) | Statement::Activity(_)
                )
            })
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("Syntax error at line {line}: {detail}")]
    SyntaxError { line: usize, detail: String },
}

impl ParseError {
    pub fn line(&self) -> usize {
        match self {
            Self::SyntaxError { line, .. } => *line,
        }
    }
}

fn sp(input: &str) -> IResult<&str, &str> {
    fn comment(input: &str) -> IResult<&str, &str> {
        delimited(tag("/*"), take_until("*/"), tag("*/")).parse(input)
    }

    fn line_comment(input: &str) -> IResult<&str, &str> {
        recognize((tag("//"), take_till(|c| c == '\n'))).parse(input)
    }

    recognize(many0(alt((multispace1, comment, line_comment)))).parse(input)
}

fn identifier(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '_' || c == '-' || c == '.')(input)
}

fn quoted(input: &str) -> IResult<&str, &str> {
    delimited(char('"'), take_till(|c| c == '"'), char('"')).parse(input)
}

// Alice, or "Mary Ann" for names with spaces
fn name(input: &str) -> IResult<&str, &str> {
    alt((quoted, identifier)).parse(input)
}

fn name_list(input: &str) -> IResult<&str, Vec<&str>> {
    separated_list1((sp, char(','), sp), name).parse(input)
}

fn amount(input: &str) -> IResult<&str, Decimal> {
    map_res(
        recognize((digit1, opt((char('.'), digit1)))),
        |digits: &str| digits.parse::<Decimal>(),
    )
    .parse(input)
}

fn date(input: &str) -> IResult<&str, NaiveDate> {
    map_res(
        recognize((digit1, char('-'), digit1, char('-'), digit1)),
        |text: &str| NaiveDate::parse_from_str(text, "%Y-%m-%d"),
    )
    .parse(input)
}

fn named_value(input: &str) -> IResult<&str, NamedValue<'_>> {
    (name, sp, amount, opt(char('%')))
        .map(|(name, _, value, _)| NamedValue { name, value })
        .parse(input)
}

fn named_values(input: &str) -> IResult<&str, Vec<NamedValue<'_>>> {
    separated_list1((sp, char(','), sp), named_value).parse(input)
}

fn split_spec(input: &str) -> IResult<&str, SplitSpec<'_>> {
    alt((
        (
            tag_no_case("equally"),
            opt((sp, tag_no_case("among"), sp, name_list)),
        )
            .map(|(_, among)| match among {
                Some((_, _, _, names)) => SplitSpec::EqualAmong(names),
                None => SplitSpec::EqualAll,
            }),
        (tag_no_case("exactly"), sp, named_values).map(|(_, _, shares)| SplitSpec::Exact(shares)),
        (
            tag_no_case("by"),
            sp,
            tag_no_case("percent"),
            sp,
            named_values,
        )
            .map(|(_, _, _, _, shares)| SplitSpec::Percent(shares)),
    ))
    .parse(input)
}

// {payer} paid {amount} for "{description}" [on {date}] {split}
fn expense(input: &str) -> IResult<&str, ExpenseLine<'_>> {
    (
        name,
        sp,
        tag_no_case("paid"),
        sp,
        amount,
        sp,
        tag_no_case("for"),
        sp,
        quoted,
        sp,
        opt((tag_no_case("on"), sp, date, sp)),
        split_spec,
    )
        .map(
            |(payer, _, _, _, amount, _, _, _, description, _, date, split)| ExpenseLine {
                payer,
                amount,
                description,
                date: date.map(|(_, _, date, _)| date),
                split,
            },
        )
        .parse(input)
}

// MEMBERS := Alice, Bob
fn members(input: &str) -> IResult<&str, Vec<&str>> {
    (tag_no_case("MEMBERS"), sp, tag(":="), sp, name_list)
        .map(|(_, _, _, _, names)| names)
        .parse(input)
}

fn remove(input: &str) -> IResult<&str, &str> {
    (tag_no_case("REMOVE"), space1, name)
        .map(|(_, _, name)| name)
        .parse(input)
}

fn command(input: &str) -> IResult<&str, Command> {
    alt((
        tag_no_case("!balances").map(|_| Command::Balances),
        tag_no_case("!settle").map(|_| Command::Settle),
        tag_no_case("!summary").map(|_| Command::Summary),
    ))
    .parse(input)
}

enum ActivityClause<'a> {
    Text(&'a str),
    Participant(&'a str),
    Min(Decimal),
    Max(Decimal),
    From(NaiveDate),
    To(NaiveDate),
}

fn activity_clause(input: &str) -> IResult<&str, ActivityClause<'_>> {
    alt((
        preceded((tag_no_case("matching"), sp), quoted).map(ActivityClause::Text),
        preceded((tag_no_case("involving"), sp), name).map(ActivityClause::Participant),
        preceded((tag_no_case("min"), sp), amount).map(ActivityClause::Min),
        preceded((tag_no_case("max"), sp), amount).map(ActivityClause::Max),
        preceded((tag_no_case("from"), sp), date).map(ActivityClause::From),
        preceded((tag_no_case("to"), sp), date).map(ActivityClause::To),
    ))
    .parse(input)
}

// !activity [matching "text"] [involving Name] [min N] [max N] [from DATE] [to DATE]
fn activity(input: &str) -> IResult<&str, ActivityQuery<'_>> {
    preceded(
        tag_no_case("!activity"),
        many0(preceded(space1, activity_clause)),
    )
    .map(|clauses| {
        clauses
            .into_iter()
            .fold(ActivityQuery::default(), |mut query, clause| {
                match clause {
                    ActivityClause::Text(text) => query.text = Some(text),
                    ActivityClause::Participant(name) => query.participant = Some(name),
                    ActivityClause::Min(value) => query.min_amount = Some(value),
                    ActivityClause::Max(value) => query.max_amount = Some(value),
                    ActivityClause::From(date) => query.from = Some(date),
                    ActivityClause::To(date) => query.to = Some(date),
                }
                query
            })
    })
    .parse(input)
}

// Expense lines go first so that members named like a keyword can still pay.
fn statement(input: &str) -> IResult<&str, Statement<'_>> {
    alt((
        expense.map(Statement::Expense),
        members.map(Statement::Members),
        remove.map(Statement::Remove),
        activity.map(Statement::Activity),
        command.map(Statement::Command),
    ))
    .parse(input)
}

fn statement_with_sp(input: &str) -> IResult<&str, Statement<'_>> {
    (sp, statement, sp).map(|(_, stmt, _)| stmt).parse(input)
}

/// Parses a ledger script, one statement per line. Blank lines and comments
/// are skipped; the first malformed line aborts with its 1-based number.
pub fn parse_program<'a>(input: &'a str) -> Result<Program<'a>, ParseError> {
    let mut statements = Vec::new();

    for (idx, line) in input.lines().enumerate() {
        let (rest, _) = sp(line).map_err(|e| ParseError::SyntaxError {
            line: idx + 1,
            detail: i18n::syntax_error_detail(e),
        })?;
        if rest.trim().is_empty() {
            continue;
        }
        match statement_with_sp(rest) {
            Ok((rest, stmt)) => {
                if !rest.trim().is_empty() {
                    return Err(ParseError::SyntaxError {
                        line: idx + 1,
                        detail: i18n::syntax_error_unparsed_detail(rest.trim()),
                    });
                }
                statements.push(StatementWithLine {
                    line: idx + 1,
                    statement: stmt,
                });
            }
            Err(e) => {
                return Err(ParseError::SyntaxError {
                    line: idx + 1,
                    detail: i18n::syntax_error_detail(e),
                });
            }
        }
    }

    Ok(Program { statements })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn dec(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    fn named(name: &'static str, value: &str) -> NamedValue<'static> {
        NamedValue {
            name,
            value: dec(value),
        }
    }

    #[rstest]
    #[case::plain("Alice", vec!["Alice"])]
    #[case::comma_separated("Alice, Bob,Carol", vec!["Alice", "Bob", "Carol"])]
    #[case::quoted("\"Mary Ann\", Bob", vec!["Mary Ann", "Bob"])]
    fn test_name_list(#[case] input: &str, #[case] expected: Vec<&str>) {
        let (rest, names) = name_list(input).unwrap();
        assert_eq!(rest, "");
        assert_eq!(names, expected);
    }

    #[rstest]
    #[case::integer("100", "100")]
    #[case::cents("12.34", "12.34")]
    #[case::sub_cent("0.005", "0.005")]
    fn test_amount(#[case] input: &str, #[case] expected: &str) {
        let (_, value) = amount(input).unwrap();
        assert_eq!(value, dec(expected));
    }

    #[rstest]
    #[case::equal_all(
        "Alice paid 100 for \"Dinner\" equally",
        ExpenseLine {
            payer: "Alice",
            amount: dec("100"),
            description: "Dinner",
            date: None,
            split: SplitSpec::EqualAll,
        }
    )]
    #[case::equal_among(
        "Alice paid 60 for \"Taxi\" equally among Alice, Bob",
        ExpenseLine {
            payer: "Alice",
            amount: dec("60"),
            description: "Taxi",
            date: None,
            split: SplitSpec::EqualAmong(vec!["Alice", "Bob"]),
        }
    )]
    #[case::exact(
        "Bob paid 101 for \"Hotel\" exactly Alice 40, Bob 35, Carol 26",
        ExpenseLine {
            payer: "Bob",
            amount: dec("101"),
            description: "Hotel",
            date: None,
            split: SplitSpec::Exact(vec![
                named("Alice", "40"),
                named("Bob", "35"),
                named("Carol", "26"),
            ]),
        }
    )]
    #[case::percent(
        "Carol PAID 100 for \"Groceries\" by percent Alice 33.33%, Bob 33.33, Carol 33.34",
        ExpenseLine {
            payer: "Carol",
            amount: dec("100"),
            description: "Groceries",
            date: None,
            split: SplitSpec::Percent(vec![
                named("Alice", "33.33"),
                named("Bob", "33.33"),
                named("Carol", "33.34"),
            ]),
        }
    )]
    #[case::quoted_payer(
        "\"Mary Ann\" paid 12.50 for \"\" equally",
        ExpenseLine {
            payer: "Mary Ann",
            amount: dec("12.50"),
            description: "",
            date: None,
            split: SplitSpec::EqualAll,
        }
    )]
    #[case::dated(
        "Alice paid 45 for \"Museum\" on 2024-04-20 equally among Alice, Bob",
        ExpenseLine {
            payer: "Alice",
            amount: dec("45"),
            description: "Museum",
            date: NaiveDate::from_ymd_opt(2024, 4, 20),
            split: SplitSpec::EqualAmong(vec!["Alice", "Bob"]),
        }
    )]
    #[case::keyword_named_payer(
        "Remove paid 10 for \"x\" equally",
        ExpenseLine {
            payer: "Remove",
            amount: dec("10"),
            description: "x",
            date: None,
            split: SplitSpec::EqualAll,
        }
    )]
    fn test_expense(#[case] input: &str, #[case] expected: ExpenseLine<'_>) {
        let (_, stmt) = statement(input).unwrap();
        assert_eq!(stmt, Statement::Expense(expected));
    }

    #[rstest]
    #[case::members("MEMBERS := Alice, Bob", Statement::Members(vec!["Alice", "Bob"]))]
    #[case::remove("REMOVE Bob", Statement::Remove("Bob"))]
    #[case::remove_quoted("remove \"Mary Ann\"", Statement::Remove("Mary Ann"))]
    #[case::balances("!balances", Statement::Command(Command::Balances))]
    #[case::settle("!settle", Statement::Command(Command::Settle))]
    #[case::summary("!SUMMARY", Statement::Command(Command::Summary))]
    #[case::remove_member_named_paid("REMOVE paid", Statement::Remove("paid"))]
    #[case::activity_plain("!activity", Statement::Activity(ActivityQuery::default()))]
    #[case::activity_filtered(
        "!activity matching \"hotel\" involving Bob min 10 max 99.5 from 2024-03-01 to 2024-03-31",
        Statement::Activity(ActivityQuery {
            text: Some("hotel"),
            participant: Some("Bob"),
            min_amount: Some(dec("10")),
            max_amount: Some(dec("99.5")),
            from: NaiveDate::from_ymd_opt(2024, 3, 1),
            to: NaiveDate::from_ymd_opt(2024, 3, 31),
        })
    )]
    #[case::activity_repeated_clause(
        "!ACTIVITY min 5 min 8",
        Statement::Activity(ActivityQuery {
            min_amount: Some(dec("8")),
            ..ActivityQuery::default()
        })
    )]
    fn test_parse_simple_statements(#[case] input: &str, #[case] expected: Statement<'_>) {
        let (_, stmt) = statement(input).unwrap();
        assert_eq!(stmt, expected);
    }

    #[rstest]
    #[case::trailing_line_comment("!settle // pay up")]
    #[case::inline_comment("Alice paid 10 /*cash*/ for \"Tea\" equally")]
    #[case::adjacent_comment("REMOVE Bob/* left early */")]
    fn test_accepts_comments(#[case] input: &str) {
        let program = parse_program(input).expect("Should accept comments");
        assert_eq!(program.statements.len(), 1);
    }

    #[test]
    fn test_full_script_keeps_line_numbers() {
        let script = "// trip\nMEMBERS := Alice, Bob\n\nAlice paid 10 for \"Tea\" equally\n!balances\n";
        let program = parse_program(script).unwrap();

        let lines: Vec<usize> = program.statements.iter().map(|stmt| stmt.line).collect();
        assert_eq!(lines, vec![2, 4, 5]);
        assert!(program.has_command());
    }

    #[rstest]
    #[case::missing_split("Alice paid 10 for \"Tea\"", 1)]
    #[case::unknown_keyword("MEMBERS := Alice\nAlice spent 10", 2)]
    #[case::trailing_input("!settle now", 1)]
    #[case::unterminated_comment("Alice paid 10 /*cash for \"Tea\" equally", 1)]
    #[case::unterminated_quote("\n\nAlice paid 10 for \"Tea equally", 3)]
    #[case::missing_share_amount("Bob paid 5 for \"Gum\" exactly Alice", 1)]
    #[case::invalid_date("Bob paid 5 for \"Gum\" on 2024-02-30 equally", 1)]
    #[case::unknown_activity_clause("!activity since 2024-01-01", 1)]
    fn test_syntax_errors_report_line(#[case] input: &str, #[case] line: usize) {
        let err = parse_program(input).unwrap_err();
        assert!(matches!(err, ParseError::SyntaxError { .. }));
        assert_eq!(err.line(), line);
    }

    #[test]
    fn test_activity_counts_as_command() {
        let program = parse_program("MEMBERS := A\n!activity involving A").unwrap();
        assert!(program.has_command());
    }

    #[test]
    fn test_comment_only_program_is_empty() {
        let program = parse_program("   // nothing yet\n/* still nothing */").unwrap();
        assert!(program.statements.is_empty());
        assert!(!program.has_command());
    }
}
