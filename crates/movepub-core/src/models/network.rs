//! Chain network reported by the wallet.

use crate::config::{EXPLORER_BASE_URL, fullnode};

/// Network the connected wallet is on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Network {
    Mainnet,
    Testnet,
    Devnet,
    Local,
    /// Anything that is not a well-known Aptos network.
    Custom { name: String, url: Option<String> },
}

impl Network {
    /// Map a wallet-reported network name (case-insensitive).
    pub fn from_name(name: &str, url: Option<String>) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "mainnet" => Self::Mainnet,
            "testnet" => Self::Testnet,
            "devnet" => Self::Devnet,
            "local" | "localhost" => Self::Local,
            _ => Self::Custom {
                name: name.trim().to_string(),
                url,
            },
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Testnet => "testnet",
            Self::Devnet => "devnet",
            Self::Local => "local",
            Self::Custom { name, .. } => name,
        }
    }

    /// Fullnode REST endpoint for the chain client.
    ///
    /// Custom networks without a URL have none.
    pub fn fullnode_url(&self) -> Option<String> {
        match self {
            Self::Mainnet => Some(fullnode::MAINNET.to_string()),
            Self::Testnet => Some(fullnode::TESTNET.to_string()),
            Self::Devnet => Some(fullnode::DEVNET.to_string()),
            Self::Local => Some(fullnode::LOCAL.to_string()),
            Self::Custom { url, .. } => url.clone(),
        }
    }

    /// Explorer link for a transaction on this network.
    pub fn explorer_txn_url(&self, hash: &str) -> String {
        format!(
            "{}/txn/{}?network={}",
            EXPLORER_BASE_URL,
            hash,
            self.name()
        )
    }
}

/// Check a wallet network name.
///
/// Names that look like Aptos networks must be one of the known ones; any
/// other name is a custom network and accepted as is.
pub fn is_valid_network_name(name: &str) -> bool {
    let lower = name.trim().to_ascii_lowercase();
    if lower.is_empty() {
        return false;
    }
    match lower.strip_prefix("aptos") {
        Some(rest) => {
            let rest = rest.trim_start_matches([' ', '-', '_']);
            !matches!(Network::from_name(rest, None), Network::Custom { .. })
        }
        None => true,
    }
}
