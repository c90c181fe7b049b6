use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign},
    str::FromStr,
};

/// Absolute tolerance applied to every amount and percentage comparison.
pub const TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ParticipantId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExpenseId(pub u64);

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Fixed-point amount in a currency-agnostic unit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(num: i64, scale: u32) -> Self {
        Self(Decimal::new(num, scale))
    }

    pub fn from_i64(value: i64) -> Self {
        Self(Decimal::from(value))
    }

    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    pub fn from_decimal(value: Decimal) -> Self {
        Self(value)
    }

    pub fn as_decimal(self) -> Decimal {
        self.0
    }

    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    pub fn is_positive(self) -> bool {
        self.0 > Decimal::ZERO
    }

    pub fn is_negative(self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Rounds half away from zero to two decimal places.
    pub fn round_cents(self) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Whole cents, or `None` when the amount carries sub-cent precision or
    /// does not fit in an `i64`.
    pub fn to_cents(self) -> Option<i64> {
        let scaled = self.0.checked_mul(Decimal::ONE_HUNDRED)?;
        if !scaled.fract().is_zero() {
            return None;
        }
        scaled.to_i64()
    }

    /// `true` when `|self - other| < 0.01`.
    pub fn approx_eq(self, other: Self) -> bool {
        (self.0 - other.0).abs() < TOLERANCE
    }

    /// `true` when `|self| < 0.01`.
    pub fn is_negligible(self) -> bool {
        self.0.abs() < TOLERANCE
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s).map(Self)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Mul<Decimal> for Money {
    type Output = Self;

    fn mul(self, rhs: Decimal) -> Self::Output {
        Self(self.0 * rhs)
    }
}

impl Div<Decimal> for Money {
    type Output = Self;

    fn div(self, rhs: Decimal) -> Self::Output {
        Self(self.0 / rhs)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    /// Display-only currency code; amounts are never converted.
    pub currency: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Participant {
    pub id: ParticipantId,
    pub group_id: GroupId,
    pub name: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SplitType {
    Equal,
    Exact,
    Percentage,
}

impl fmt::Display for SplitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Equal => "EQUAL",
            Self::Exact => "EXACT",
            Self::Percentage => "PERCENTAGE",
        };
        f.write_str(label)
    }
}

/// A participant's allocated cost within one expense.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Split {
    pub participant: ParticipantId,
    pub amount: Money,
    pub percentage: Option<Decimal>,
}

impl Split {
    pub fn new(participant: ParticipantId, amount: Money) -> Self {
        Self {
            participant,
            amount,
            percentage: None,
        }
    }

    pub fn with_percentage(participant: ParticipantId, amount: Money, percentage: Decimal) -> Self {
        Self {
            participant,
            amount,
            percentage: Some(percentage),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expense {
    pub id: ExpenseId,
    pub group_id: GroupId,
    pub description: String,
    pub amount: Money,
    pub payer: ParticipantId,
    pub split_type: SplitType,
    pub splits: Vec<Split>,
    pub created_at: DateTime<Utc>,
}

impl Expense {
    pub fn split_total(&self) -> Money {
        self.splits.iter().map(|split| split.amount).sum()
    }

    /// Whether the stored allocation still matches the total within tolerance.
    pub fn is_balanced(&self) -> bool {
        self.split_total().approx_eq(self.amount)
    }

    pub fn share_of(&self, participant: ParticipantId) -> Money {
        self.splits
            .iter()
            .filter(|split| split.participant == participant)
            .map(|split| split.amount)
            .sum()
    }

    pub fn involves(&self, participant: ParticipantId) -> bool {
        self.payer == participant
            || self
                .splits
                .iter()
                .any(|split| split.participant == participant)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExactShare {
    pub participant: ParticipantId,
    pub amount: Money,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PercentageShare {
    pub participant: ParticipantId,
    pub percentage: Decimal,
}

/// How an expense total is divided. Input order is significant for the
/// equal and percentage rules.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SplitRule {
    Equal(Vec<ParticipantId>),
    Exact(Vec<ExactShare>),
    Percentage(Vec<PercentageShare>),
}

impl SplitRule {
    pub fn split_type(&self) -> SplitType {
        match self {
            Self::Equal(_) => SplitType::Equal,
            Self::Exact(_) => SplitType::Exact,
            Self::Percentage(_) => SplitType::Percentage,
        }
    }

    pub fn participants(&self) -> Vec<ParticipantId> {
        match self {
            Self::Equal(ids) => ids.clone(),
            Self::Exact(shares) => shares.iter().map(|share| share.participant).collect(),
            Self::Percentage(shares) => shares.iter().map(|share| share.participant).collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Allocation {
    pub split_type: SplitType,
    pub splits: Vec<Split>,
}

/// Net position per participant: positive is owed money, negative owes.
/// Iteration follows roster order.
pub type NetBalances = IndexMap<ParticipantId, Money>;

/// A suggested payment: `from` pays `to`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transfer {
    pub from: ParticipantId,
    pub to: ParticipantId,
    pub amount: Money,
}

#[derive(Debug, PartialEq)]
pub struct Settlement {
    pub new_balances: NetBalances,
    pub transfers: Vec<Transfer>,
}
