/// Per-group participant cap: the owner plus three others.
pub const DEFAULT_MAX_PARTICIPANTS: usize = 4;
pub const DEFAULT_CURRENCY: &str = "USD";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    /// `None` disables the per-group participant limit.
    pub max_participants_per_group: Option<usize>,
    /// Currency code given to groups created without an explicit one.
    pub default_currency: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            max_participants_per_group: Some(DEFAULT_MAX_PARTICIPANTS),
            default_currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

impl LedgerConfig {
    pub fn with_participant_limit(mut self, limit: Option<usize>) -> Self {
        self.max_participants_per_group = limit;
        self
    }

    pub fn with_default_currency(mut self, currency: impl Into<String>) -> Self {
        self.default_currency = currency.into();
        self
    }
}
