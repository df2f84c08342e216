//! Fixed-window accounting primitives.

use std::fmt;
use std::str::FromStr;

/// Namespace prepended to every client identity.
pub const DEFAULT_KEY_PREFIX: &str = "httprate:";

/// Store record key for one client's counting window.
///
/// The key does not encode the window start; the store's TTL ends the window
/// and the next request opens a new one under the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WindowKey(String);

impl WindowKey {
    pub fn new(prefix: &str, client_addr: &str) -> Self {
        Self(format!("{}{}", prefix, client_addr))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WindowKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of evaluating one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Forward to the inner handler.
    Admit,
    /// The client's window is full.
    Reject,
    /// The store could not be read and the policy is [`FailurePolicy::Closed`].
    Unavailable,
}

/// What to do with a request when the window counter cannot be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Admit the request; a store outage turns limiting into a no-op.
    #[default]
    Open,
    /// Refuse the request with `503 Service Unavailable`.
    Closed,
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "closed" => Ok(Self::Closed),
            other => Err(format!(
                "unknown failure policy '{}', expected 'open' or 'closed'",
                other
            )),
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Open => f.write_str("open"),
            Self::Closed => f.write_str("closed"),
        }
    }
}
