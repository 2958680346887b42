//! Publish orchestration.
//!
//! A publish attempt is a linear state machine:
//!
//! ```text
//! Building -> Signing -> Submitted -> Confirmed
//!     \          \           \
//!      +----------+-----------+----> Failed
//! ```
//!
//! Each non-terminal state has one handler producing the next state. There
//! are no retries; a new attempt needs a new compile result.

use tracing::{debug, info, warn};

use crate::error::{ChainError, PublishError, WalletError};
use crate::models::{CompileResult, Network, PublishPayload, TransactionHash};

/// Signs and submits a transaction on the user's behalf.
#[allow(async_fn_in_trait)]
pub trait Wallet {
    async fn sign_and_submit(&self, payload: &PublishPayload)
    -> Result<TransactionHash, WalletError>;
}

/// Waits for a submitted transaction to be committed.
#[allow(async_fn_in_trait)]
pub trait ChainClient {
    async fn wait_for_transaction(&self, hash: &TransactionHash) -> Result<(), ChainError>;
}

/// State of a publish attempt.
#[derive(Clone, Debug, PartialEq)]
pub enum PublishState {
    /// Decoding the compiled artifact.
    Building(CompileResult),
    /// Waiting for the wallet to sign and submit.
    Signing(PublishPayload),
    /// Submitted, waiting for confirmation.
    Submitted(TransactionHash),
    Confirmed(TransactionHash),
    Failed(PublishError),
}

/// Payload-free view of [`PublishState`] for display.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PublishPhase {
    #[default]
    Idle,
    Building,
    Signing,
    Submitted,
    Confirmed,
    Failed,
}

impl PublishPhase {
    pub fn is_in_progress(self) -> bool {
        matches!(self, Self::Building | Self::Signing | Self::Submitted)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Building => "building transaction",
            Self::Signing => "waiting for wallet signature",
            Self::Submitted => "waiting for confirmation",
            Self::Confirmed => "confirmed",
            Self::Failed => "failed",
        }
    }
}

impl PublishState {
    pub fn phase(&self) -> PublishPhase {
        match self {
            Self::Building(_) => PublishPhase::Building,
            Self::Signing(_) => PublishPhase::Signing,
            Self::Submitted(_) => PublishPhase::Submitted,
            Self::Confirmed(_) => PublishPhase::Confirmed,
            Self::Failed(_) => PublishPhase::Failed,
        }
    }
}

/// Terminal result of a publish attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PublishOutcome {
    Confirmed(TransactionHash),
    Failed(PublishError),
}

/// Runs publish attempts against a wallet and a chain client.
pub struct Publisher<W, C> {
    wallet: W,
    chain: C,
    network: Option<Network>,
}

impl<W: Wallet, C: ChainClient> Publisher<W, C> {
    pub fn new(wallet: W, chain: C) -> Self {
        Self {
            wallet,
            chain,
            network: None,
        }
    }

    /// Network used for explorer links in the outcome notification.
    #[must_use]
    pub fn with_network(mut self, network: Option<Network>) -> Self {
        self.network = network;
        self
    }

    pub fn network(&self) -> Option<&Network> {
        self.network.as_ref()
    }

    /// Drive one attempt to a terminal state.
    ///
    /// `observe` sees every state, the terminal one exactly once.
    pub async fn publish(
        &self,
        result: CompileResult,
        mut observe: impl FnMut(&PublishState),
    ) -> PublishOutcome {
        let mut state = PublishState::Building(result);
        loop {
            observe(&state);
            state = match state {
                PublishState::Building(result) => self.build(&result),
                PublishState::Signing(payload) => self.sign(&payload).await,
                PublishState::Submitted(hash) => self.confirm(hash).await,
                PublishState::Confirmed(hash) => {
                    info!(%hash, "package published");
                    return PublishOutcome::Confirmed(hash);
                }
                PublishState::Failed(error) => {
                    warn!(%error, "publish failed");
                    return PublishOutcome::Failed(error);
                }
            };
        }
    }

    fn build(&self, result: &CompileResult) -> PublishState {
        match PublishPayload::from_compile_result(result) {
            Ok(payload) => {
                debug!(
                    metadata_bytes = payload.metadata.len(),
                    modules = payload.modules.len(),
                    "built publish payload"
                );
                PublishState::Signing(payload)
            }
            Err(error) => PublishState::Failed(error),
        }
    }

    async fn sign(&self, payload: &PublishPayload) -> PublishState {
        match self.wallet.sign_and_submit(payload).await {
            Ok(hash) => {
                info!(%hash, "transaction submitted");
                PublishState::Submitted(hash)
            }
            Err(error) => PublishState::Failed(PublishError::SigningRejected(error.to_string())),
        }
    }

    async fn confirm(&self, hash: TransactionHash) -> PublishState {
        match self.chain.wait_for_transaction(&hash).await {
            Ok(()) => PublishState::Confirmed(hash),
            Err(error) => PublishState::Failed(PublishError::ConfirmationFailure(error.to_string())),
        }
    }
}
