use std::fmt;
use thiserror::Error;

/// Error codes for PromptLane SDK operations
///
/// Each error kind has a unique code that can be used for programmatic error
/// handling and troubleshooting. Error codes follow the pattern `PXXX` where
/// X is a digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// `P001`: Invalid or incomplete connection configuration
    Config = 1,
    /// `P002`: Resource not found
    NotFound = 2,
    /// `P003`: Input rejected by backend validation
    Validation = 3,
    /// `P004`: Authentication failed or insufficient permissions
    Authentication = 4,
    /// `P005`: API rate limit exceeded
    RateLimited = 5,
    /// `P006`: Network or connection failure
    Transport = 6,
    /// `P007`: Serialization error
    Serialization = 7,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{:03}", *self as u16)
    }
}

/// Error types for PromptLane SDK operations
///
/// Backend failures are translated into this taxonomy at the adapter
/// boundary; the SDK performs no local recovery, retry, or suppression, so
/// every failure surfaces to the caller as one of these variants.
///
/// # Examples
///
/// ```rust
/// use promptlane_sdk_rs::core::{Error, Result};
///
/// fn handle(result: Result<String>) {
///     match result {
///         Ok(name) => println!("project: {}", name),
///         Err(Error::NotFound { resource, id }) => {
///             eprintln!("no {} with id {}", resource, id);
///         }
///         Err(e) => eprintln!("error {}: {}", e.code(), e),
///     }
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid or incomplete connection configuration `[P001]`
    ///
    /// Raised at client construction when the chosen connection mode is
    /// missing a required parameter, and by write calls on write-through
    /// resources when no API connection is configured.
    #[error("[{code}] Invalid configuration: {0}", code = ErrorCode::Config)]
    Config(String),

    /// The identifier did not resolve to a record `[P002]`
    ///
    /// Raised by either adapter: a 404 from the API, or no matching row
    /// from the database.
    #[error("[{code}] {resource} {id} not found", code = ErrorCode::NotFound)]
    NotFound {
        /// Resource namespace the lookup ran against (`projects`, `prompts`, ...)
        resource: String,
        /// The id or key that failed to resolve
        id: String,
    },

    /// Input rejected by backend validation `[P003]`
    ///
    /// A 4xx validation response from the API's business logic, or a
    /// constraint violation from the database.
    #[error("[{code}] Validation error: {0}", code = ErrorCode::Validation)]
    Validation(String),

    /// Authentication failed or insufficient permissions `[P004]`
    #[error("[{code}] Authentication failed: {0}", code = ErrorCode::Authentication)]
    Authentication(String),

    /// API rate limit exceeded `[P005]`
    #[error("[{code}] Rate limit exceeded. Please wait before retrying.", code = ErrorCode::RateLimited)]
    RateLimited,

    /// Network or connection failure `[P006]`
    ///
    /// Wraps the underlying transport's error text without
    /// reinterpretation: HTTP network/timeout errors and database
    /// connectivity failures both land here.
    #[error("[{code}] Transport error: {0}", code = ErrorCode::Transport)]
    Transport(String),

    /// JSON serialization or deserialization error `[P007]`
    #[error("[{code}] Serialization error: {0}", code = ErrorCode::Serialization)]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Get the error code for this error
    ///
    /// # Example
    ///
    /// ```rust
    /// use promptlane_sdk_rs::core::Error;
    ///
    /// let error = Error::RateLimited;
    /// assert_eq!(error.code().to_string(), "P005");
    /// ```
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::Config(_) => ErrorCode::Config,
            Error::NotFound { .. } => ErrorCode::NotFound,
            Error::Validation(_) => ErrorCode::Validation,
            Error::Authentication(_) => ErrorCode::Authentication,
            Error::RateLimited => ErrorCode::RateLimited,
            Error::Transport(_) => ErrorCode::Transport,
            Error::Serialization(_) => ErrorCode::Serialization,
        }
    }

    /// Check if this error is worth retrying by the caller
    ///
    /// The SDK itself never retries; this classifies transient failures
    /// (connectivity, rate limiting) against permanent ones (bad input,
    /// missing records, bad credentials).
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::Transport(_) | Error::RateLimited)
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new not-found error
    pub fn not_found(resource: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: id.into(),
        }
    }

    /// Create a new validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a new transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }
}

/// Type alias for Results with PromptLane SDK errors
///
/// # Examples
///
/// ```rust
/// use promptlane_sdk_rs::core::Result;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(Error::config("bad").code(), ErrorCode::Config);
        assert_eq!(
            Error::not_found("projects", "abc").code(),
            ErrorCode::NotFound
        );
        assert_eq!(Error::validation("bad").code(), ErrorCode::Validation);
        assert_eq!(
            Error::Authentication("denied".to_string()).code(),
            ErrorCode::Authentication
        );
        assert_eq!(Error::RateLimited.code(), ErrorCode::RateLimited);
        assert_eq!(Error::transport("down").code(), ErrorCode::Transport);
    }

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::Config.to_string(), "P001");
        assert_eq!(ErrorCode::NotFound.to_string(), "P002");
        assert_eq!(ErrorCode::Validation.to_string(), "P003");
        assert_eq!(ErrorCode::Authentication.to_string(), "P004");
        assert_eq!(ErrorCode::RateLimited.to_string(), "P005");
        assert_eq!(ErrorCode::Transport.to_string(), "P006");
        assert_eq!(ErrorCode::Serialization.to_string(), "P007");
    }

    #[test]
    fn test_error_messages_include_codes() {
        let error = Error::not_found("prompts", "welcome-email");
        assert!(error.to_string().contains("[P002]"));
        assert!(error.to_string().contains("prompts"));
        assert!(error.to_string().contains("welcome-email"));

        let error = Error::config("base_url is required");
        assert!(error.to_string().contains("[P001]"));
    }

    #[test]
    fn test_is_recoverable() {
        assert!(Error::transport("connection reset").is_recoverable());
        assert!(Error::RateLimited.is_recoverable());

        assert!(!Error::config("missing api_key").is_recoverable());
        assert!(!Error::not_found("teams", "t1").is_recoverable());
        assert!(!Error::validation("name is required").is_recoverable());
        assert!(!Error::Authentication("bad key".to_string()).is_recoverable());
    }

    #[test]
    fn test_serde_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let error: Error = json_error.into();
        assert_eq!(error.code(), ErrorCode::Serialization);
    }
}
