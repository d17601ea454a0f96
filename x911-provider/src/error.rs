use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for all 911 request operations.
///
/// Local variants ([`InvalidArgument`](Self::InvalidArgument),
/// [`NotImplemented`](Self::NotImplemented), [`InvalidSequence`](Self::InvalidSequence),
/// [`UnsupportedAction`](Self::UnsupportedAction)) are raised before the account
/// executor is touched. The remaining variants are produced by the executor and
/// surfaced to the caller unchanged; [`ParseError`](Self::ParseError) is also
/// raised locally when a response payload cannot be decoded.
///
/// All variants are serializable for structured error reporting.
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum X911Error {
    /// A request argument failed local validation (missing, unknown, or not text).
    #[error("[{action}] Invalid argument '{param}': {detail}")]
    InvalidArgument {
        /// Wire id of the action being built.
        action: String,
        /// Name of the offending parameter.
        param: String,
        /// Description of what's wrong.
        detail: String,
    },

    /// The operation is declared by the remote API but not implemented by this client.
    #[error("[{action}] Not implemented")]
    NotImplemented {
        /// Wire id of the unimplemented action.
        action: String,
    },

    /// An accessor was used after the wrong kind of request.
    #[error("Only meaningful after {expected}, last action was {actual}")]
    InvalidSequence {
        /// Action that must precede the accessor.
        expected: String,
        /// Action that actually produced the response.
        actual: String,
    },

    /// The configured environment does not offer this action.
    #[error("[{action}] Not available in the {environment} environment")]
    UnsupportedAction {
        /// Wire id of the refused action.
        action: String,
        /// Environment the client was built for.
        environment: String,
    },

    /// A network-level error reported by the account executor.
    #[error("[{action}] Network error: {detail}")]
    NetworkError {
        /// Wire id of the action in flight.
        action: String,
        /// Error details.
        detail: String,
    },

    /// The executor gave up waiting for the remote API.
    #[error("[{action}] Request timeout: {detail}")]
    Timeout {
        /// Wire id of the action in flight.
        action: String,
        /// Error details.
        detail: String,
    },

    /// The account credentials were rejected by the remote API.
    #[error("[{action}] Invalid credentials")]
    InvalidCredentials {
        /// Wire id of the action in flight.
        action: String,
        /// Original fault message, if available.
        raw_message: Option<String>,
    },

    /// The remote API answered with a fault this crate does not classify.
    #[error("[{action}] Remote fault: {raw_message}")]
    RemoteFault {
        /// Wire id of the action in flight.
        action: String,
        /// Raw fault code, if available.
        raw_code: Option<String>,
        /// Raw fault message.
        raw_message: String,
    },

    /// The response payload could not be decoded.
    #[error("[{action}] Parse error: {detail}")]
    ParseError {
        /// Wire id of the action whose response failed to decode.
        action: String,
        /// Details about the parse failure.
        detail: String,
    },
}

impl X911Error {
    /// 是否为预期行为（调用方输入、使用顺序等），用于日志分级。
    ///
    /// 返回 `true` 时应使用 `warn` 级别，`false` 时使用 `error` 级别。
    /// **新增变体时请同步更新此方法。**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument { .. }
                | Self::NotImplemented { .. }
                | Self::InvalidSequence { .. }
                | Self::UnsupportedAction { .. }
                | Self::InvalidCredentials { .. }
        )
    }

    /// Whether the error was raised locally, before any request reached the executor.
    #[must_use]
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument { .. }
                | Self::NotImplemented { .. }
                | Self::InvalidSequence { .. }
                | Self::UnsupportedAction { .. }
        )
    }
}

/// Convenience type alias for `Result<T, X911Error>`.
pub type Result<T> = std::result::Result<T, X911Error>;
