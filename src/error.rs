//! Error types for the record stores.

use thiserror::Error;

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, DeskError>;

/// Errors that can occur while authenticating, validating or persisting.
///
/// A returned error always means no record was mutated and nothing was
/// written to the backing file.
#[derive(Error, Debug)]
pub enum DeskError {
    /// Failed to read or write a backing file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to serialize a store
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// PIN is not a key of the account store
    #[error("Invalid PIN")]
    InvalidPin,

    /// Username/password pair does not match the user store
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// An account operation was attempted without a logged-in PIN
    #[error("Not logged in")]
    NotLoggedIn,

    /// Old PIN given to a PIN change differs from the session PIN
    #[error("Old PIN is incorrect")]
    PinMismatch,

    /// Target PIN of a PIN change already belongs to an account
    #[error("New PIN already in use")]
    PinInUse,

    /// Free-text input that should have been a number
    #[error("Invalid {field}: '{value}' is not a number")]
    InvalidNumber { field: &'static str, value: String },

    /// Deposit or withdrawal amount of zero or less
    #[error("Amount must be positive.")]
    NonPositiveAmount,

    /// Amount, or the balance it would produce, has no room for cents
    #[error("Amount is too large.")]
    AmountTooLarge,

    /// Quantity, price or balance below zero
    #[error("Value for {field} must not be negative")]
    NegativeValue { field: &'static str },

    /// Required text input left blank
    #[error("Value for {field} must not be empty")]
    EmptyField { field: &'static str },

    /// Well-formed store file holding a record that fails validation
    #[error("Stored record '{id}' is invalid: {reason}")]
    InvalidRecord { id: String, reason: String },

    /// Withdrawal larger than the current balance
    #[error("Insufficient funds.")]
    InsufficientFunds,

    /// Edit or delete of a product id that is not stored
    #[error("Product not found.")]
    ProductNotFound { id: String },

    /// Session PIN no longer maps to an account
    #[error("Account not found")]
    AccountNotFound,

    /// Malformed command line
    #[error("{0}")]
    Usage(String),
}
