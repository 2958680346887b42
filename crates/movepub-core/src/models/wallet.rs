use super::network::Network;

/// Number of leading characters kept when shortening an address.
const PREFIX_LEN: usize = 6;
/// Number of trailing characters kept when shortening an address.
const SUFFIX_LEN: usize = 4;

/// Wallet connection state
#[derive(Clone, Debug, Default, PartialEq)]
pub enum WalletState {
    #[default]
    Disconnected,
    Connecting,
    Connected {
        address: String,
        network: Option<Network>,
    },
}

impl WalletState {
    /// Check if wallet is connected
    pub fn is_connected(&self) -> bool {
        matches!(self, WalletState::Connected { .. })
    }

    /// Connected account address
    pub fn address(&self) -> Option<&str> {
        match self {
            WalletState::Connected { address, .. } => Some(address),
            _ => None,
        }
    }

    /// Network if connected and reported
    pub fn network(&self) -> Option<&Network> {
        match self {
            WalletState::Connected { network, .. } => network.as_ref(),
            _ => None,
        }
    }

    /// Format address for display (0x1234...abcd)
    pub fn display_name(&self) -> String {
        match self {
            WalletState::Connected { address, .. } if address.len() > PREFIX_LEN + SUFFIX_LEN => {
                format!(
                    "{}...{}",
                    &address[..PREFIX_LEN],
                    &address[address.len() - SUFFIX_LEN..]
                )
            }
            WalletState::Connected { address, .. } => address.clone(),
            WalletState::Connecting => "connecting...".to_string(),
            WalletState::Disconnected => "not connected".to_string(),
        }
    }
}
