use splitmint_domain::Money;

const SYMBOLS: &[(&str, &str)] = &[
    ("USD", "$"),
    ("EUR", "€"),
    ("GBP", "£"),
    ("JPY", "¥"),
    ("INR", "₹"),
];

/// en-US style amounts: `$1,234.50`, `-€3.00`, `CHF 12.00`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyFormatter {
    code: String,
    symbol: Option<&'static str>,
}

impl CurrencyFormatter {
    pub fn new(code: &str) -> Self {
        let code = code.trim().to_ascii_uppercase();
        let symbol = SYMBOLS
            .iter()
            .find(|(known, _)| *known == code)
            .map(|(_, symbol)| *symbol);
        Self { code, symbol }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn format(&self, amount: Money) -> String {
        let rounded = amount.round_cents();
        let sign = if rounded.is_negative() { "-" } else { "" };
        let digits = group_thousands(&format!("{:.2}", rounded.abs().as_decimal()));
        match self.symbol {
            Some(symbol) => format!("{sign}{symbol}{digits}"),
            None => format!("{sign}{} {digits}", self.code),
        }
    }

    /// Like [`format`](Self::format) but marks credits with a leading `+`.
    pub fn format_signed(&self, amount: Money) -> String {
        let formatted = self.format(amount);
        if amount.round_cents().is_negative() {
            formatted
        } else {
            format!("+{formatted}")
        }
    }
}

fn group_thousands(plain: &str) -> String {
    let (integer, fraction) = plain.split_once('.').unwrap_or((plain, ""));
    let mut grouped = String::with_capacity(plain.len() + integer.len() / 3);
    for (idx, digit) in integer.chars().enumerate() {
        if idx > 0 && (integer.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if !fraction.is_empty() {
        grouped.push('.');
        grouped.push_str(fraction);
    }
    grouped
}
