//! Application configuration.
//!
//! Centralizes the constants used by the compile and publish pipeline.
//! Endpoint and request mode can be overridden at build time through
//! `MOVEPUB_COMPILER_URL` and `MOVEPUB_COMPILE_MODE`.

use tracing::Level;

// =============================================================================
// Package Layout
// =============================================================================

/// File name of the package manifest. Compared case-sensitively.
pub const MANIFEST_FILE_NAME: &str = "Move.toml";

/// Placeholder value for a named address the publisher must supply.
pub const ADDRESS_PLACEHOLDER: &str = "_";

// =============================================================================
// Compiler Service
// =============================================================================

const DEFAULT_COMPILER_BASE_URL: &str = "https://web-compiler-275734728368.us-central1.run.app";

/// Base URL of the remote compiler service.
pub const COMPILER_BASE_URL: &str = match option_env!("MOVEPUB_COMPILER_URL") {
    Some(url) => url,
    None => DEFAULT_COMPILER_BASE_URL,
};

/// Full URL of the compile endpoint.
pub fn compile_endpoint() -> String {
    format!("{}/compile", COMPILER_BASE_URL.trim_end_matches('/'))
}

/// Shape of the address information sent alongside the package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompileMode {
    /// User-supplied `namedAddresses` map.
    #[default]
    NamedAddresses,
    /// The connected account address as `senderAddress`.
    SenderAddress,
}

impl CompileMode {
    /// Parse a mode name as given in `MOVEPUB_COMPILE_MODE`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "named" | "named-addresses" | "named_addresses" => Some(Self::NamedAddresses),
            "sender" | "sender-address" | "sender_address" => Some(Self::SenderAddress),
            _ => None,
        }
    }
}

/// Mode this build was configured with.
pub fn compile_mode() -> CompileMode {
    option_env!("MOVEPUB_COMPILE_MODE")
        .and_then(CompileMode::from_name)
        .unwrap_or_default()
}

// =============================================================================
// Chain Configuration
// =============================================================================

/// On-chain entry point that publishes a package.
pub const PUBLISH_PACKAGE_FUNCTION: &str = "0x1::code::publish_package_txn";

/// How long to wait for a submitted transaction to be committed.
pub const CONFIRMATION_TIMEOUT_MS: u32 = 20_000;

/// Delay between confirmation polls.
pub const CONFIRMATION_POLL_INTERVAL_MS: u32 = 1_000;

/// Block explorer used for transaction links.
pub const EXPLORER_BASE_URL: &str = "https://explorer.aptoslabs.com";

/// Fullnode REST endpoints per network.
pub mod fullnode {
    pub const MAINNET: &str = "https://api.mainnet.aptoslabs.com/v1";
    pub const TESTNET: &str = "https://api.testnet.aptoslabs.com/v1";
    pub const DEVNET: &str = "https://api.devnet.aptoslabs.com/v1";
    pub const LOCAL: &str = "http://127.0.0.1:8080/v1";
}

/// localStorage key remembering that the user connected a wallet.
pub const WALLET_SESSION_KEY: &str = "movepub_wallet_session";

// =============================================================================
// Logging
// =============================================================================

/// Default log level for the browser console.
pub const LOG_LEVEL: Level = if cfg!(debug_assertions) {
    Level::DEBUG
} else {
    Level::INFO
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_endpoint() {
        assert!(compile_endpoint().ends_with("/compile"));
        assert!(!compile_endpoint().contains("//compile"));
    }

    #[test]
    fn test_compile_mode_names() {
        assert_eq!(
            CompileMode::from_name("sender"),
            Some(CompileMode::SenderAddress)
        );
        assert_eq!(
            CompileMode::from_name(" Named-Addresses "),
            Some(CompileMode::NamedAddresses)
        );
        assert_eq!(CompileMode::from_name("both"), None);
        assert_eq!(CompileMode::default(), CompileMode::NamedAddresses);
    }
}
