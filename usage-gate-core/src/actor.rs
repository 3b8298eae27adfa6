use serde::{Deserialize, Serialize};

/// Fixed storage key for the anonymous visitor counter.
///
/// All anonymous usage within one local profile accumulates under this key;
/// anonymous visitors are not distinguished from each other.
pub const ANONYMOUS_COUNTER_KEY: &str = "free_usage_count";

/// Stable identifier for an authenticated account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(pub String);

impl AccountId {
    pub fn new(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The actor performing transformations: an anonymous visitor or an
/// authenticated account holder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Actor {
    Anonymous,
    Authenticated { id: AccountId },
}

impl Actor {
    /// Resolve an optional account id into an explicit actor descriptor.
    ///
    /// This is the whole of identity resolution: callers hand in whatever
    /// account identity they hold (or none), and every Gate operation takes
    /// the resulting descriptor as a parameter. No ambient session state.
    pub fn resolve(account: Option<AccountId>) -> Self {
        match account {
            Some(id) => Actor::Authenticated { id },
            None => Actor::Anonymous,
        }
    }

    /// The storage key this actor's count lives under.
    pub fn storage_key(&self) -> &str {
        match self {
            Actor::Anonymous => ANONYMOUS_COUNTER_KEY,
            Actor::Authenticated { id } => &id.0,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Actor::Authenticated { .. })
    }
}
