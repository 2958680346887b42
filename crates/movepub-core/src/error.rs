//! Error types for each pipeline boundary.
//!
//! - [`FileReadError`] - a selected file could not be read as text
//! - [`PreconditionError`] - an action was triggered before its inputs exist
//! - [`CompileError`] - the compiler request failed or returned garbage
//! - [`PublishError`] - building, signing or confirming the publish transaction failed
//! - [`WalletError`] - injected wallet interop errors
//! - [`ChainError`] - fullnode REST errors while waiting for a transaction
//! - [`ManifestError`] - `Move.toml` could not be summarized

use thiserror::Error;

/// A single file of the selection failed to read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Error reading file: {name} ({reason})")]
pub struct FileReadError {
    /// Name of the file that failed.
    pub name: String,
    /// Reason reported by the file source.
    pub reason: String,
}

impl FileReadError {
    pub fn new(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Missing input for a requested action.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreconditionError {
    #[error("Please upload a Move project folder")]
    NoFiles,
    #[error("Please connect your wallet")]
    NoAccount,
    #[error("Connected account has no address")]
    EmptySender,
    #[error("Nothing to publish, compile the package first")]
    NoCompileResult,
    #[error("Another operation is in progress")]
    Busy,
}

/// Failure of the compile request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// Request could not be sent or the connection failed.
    #[error("Network error: {0}")]
    Network(String),
    /// Compiler responded with a non-2xx status. `body` holds the
    /// compiler's diagnostic text, trimmed and truncated.
    #[error("HTTP error {status}{}", detail(.body))]
    Http { status: u16, body: String },
    /// Response body was not a JSON object.
    #[error("Invalid compiler response: {0}")]
    InvalidJson(String),
    /// Request body could not be encoded.
    #[error("Failed to encode compile request: {0}")]
    Encode(String),
    /// A compile request is already in flight.
    #[error("A compile request is already in progress")]
    Busy,
}

fn detail(body: &str) -> String {
    if body.is_empty() {
        String::new()
    } else {
        format!(": {}", body)
    }
}

/// Terminal failure of a publish attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PublishError {
    /// Compiled artifact is not valid hex; nothing was sent to the wallet.
    #[error("Malformed {field}: {reason}")]
    HexDecode { field: &'static str, reason: String },
    /// User declined the signature or the wallet failed to submit.
    #[error("Signing rejected: {0}")]
    SigningRejected(String),
    /// Transaction was submitted but not confirmed.
    #[error("Transaction not confirmed: {0}")]
    ConfirmationFailure(String),
}

/// Wallet-related errors for the injected Aptos wallet.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalletError {
    #[error("Browser window not available")]
    NoWindow,
    #[error("Aptos wallet not installed. Please install a wallet extension.")]
    NotInstalled,
    #[error("Failed to create wallet request")]
    RequestCreationFailed,
    #[error("Wallet request rejected: {0}")]
    RequestRejected(String),
    #[error("No account returned from wallet")]
    NoAccount,
    #[error("Unexpected wallet response: {0}")]
    InvalidResponse(String),
}

/// Errors while waiting for a transaction on chain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("HTTP error: {0}")]
    Http(u16),
    #[error("Invalid fullnode response: {0}")]
    InvalidResponse(String),
    #[error("Transaction failed: {0}")]
    Failed(String),
    #[error("Timed out waiting for transaction {0}")]
    Timeout(String),
}

/// Manifest summary errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ManifestError {
    #[error("Move.toml is empty")]
    Empty,
    #[error("Move.toml parse error: {0}")]
    Parse(String),
    #[error("Move.toml has no [package] name")]
    MissingPackageName,
}

/// Any failure surfaced by a session operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error(transparent)]
    FileRead(#[from] FileReadError),
    #[error(transparent)]
    Precondition(#[from] PreconditionError),
    #[error(transparent)]
    Compile(#[from] CompileError),
}
