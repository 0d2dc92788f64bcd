//! Error types for cartograph operations.
//!
//! ## Error Philosophy
//!
//! The engine follows a "best effort" approach to graph construction:
//! - Dangling edges, duplicate ids, and malformed confidences are dropped
//!   or clamped and *counted* in `BuildStats`, never raised — the graph
//!   must always render whatever valid subset remains
//! - Only lookup failures (unknown symbol) and boundary failures (payload
//!   I/O, a failed impact fetch) surface as errors
//! - An impact failure leaves the highlight map empty; it never takes the
//!   rest of the graph down with it

use thiserror::Error;

/// Result type for cartograph operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for cartograph operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Impact analysis was requested for a symbol name that does not exist
    /// in the graph
    #[error("symbol not found: {0}")]
    SymbolNotFound(String),

    /// A node id was referenced that does not exist in the graph
    #[error("node not found: {0}")]
    NodeNotFound(String),

    /// The impact provider (local or remote) failed; the message is
    /// user-visible and the blast-radius map is left empty
    #[error("impact request failed: {0}")]
    Impact(String),

    /// The raw graph payload could not be decoded
    #[error("invalid graph payload: {0}")]
    Payload(#[from] serde_json::Error),

    /// File system operation failed (CLI payload loading)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration or arguments
    #[error("configuration error: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_not_found_names_the_symbol() {
        let err = Error::SymbolNotFound("AuthService::login".to_string());
        assert!(err.to_string().contains("AuthService::login"));
    }

    #[test]
    fn impact_error_carries_user_visible_message() {
        let err = Error::Impact("indexing service unreachable".to_string());
        assert!(err.to_string().contains("indexing service unreachable"));
    }
}
