//! Typed errors for the conversion node.

use thiserror::Error;

/// Errors raised while processing a single item.
///
/// `Clone` so a pass-level credential failure can be attached to every item
/// when failure-tolerant mode is on.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum NodeError {
    /// Credential profile missing or its API key empty. Raised before any
    /// network call is attempted.
    #[error("credential profile '{0}' is missing or has an empty API key")]
    Credential(String),

    /// The outbound request failed: DNS, connection, or a non-2xx status.
    #[error("exchange rate request failed: {0}")]
    Request(String),

    /// A response arrived but did not report success. The message matches
    /// what the host surfaces to users.
    #[error("Failed to get exchange rate")]
    Upstream,

    /// Amount was zero and the response carried no explicit rate, so no
    /// finite rate can be derived.
    #[error("cannot derive a rate for a zero amount without one in the response")]
    ZeroAmount,
}

/// A failed pass in intolerant mode: the first item error, tagged with the
/// position of the item that caused it.
#[derive(Debug, Clone, Error)]
#[error("item {item_index}: {source}")]
pub struct ExecutionError {
    /// Zero-based index of the failing input item.
    pub item_index: usize,
    #[source]
    pub source: NodeError,
}
