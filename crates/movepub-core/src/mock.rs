//! In-memory collaborators for tests and offline development.
//!
//! Enabled with the `mock` feature.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use crate::collector::SelectedFile;
use crate::compiler::CompileTransport;
use crate::error::{ChainError, CompileError, FileReadError, WalletError};
use crate::models::{PublishPayload, TransactionHash};
use crate::publish::{ChainClient, Wallet};

/// A selected file with fixed content.
#[derive(Clone, Debug)]
pub struct MockFile {
    name: String,
    content: Result<String, String>,
}

impl MockFile {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: Ok(content.into()),
        }
    }

    /// File whose read fails with `reason`.
    pub fn failing(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: Err(reason.into()),
        }
    }
}

impl SelectedFile for MockFile {
    fn name(&self) -> String {
        self.name.clone()
    }

    async fn read_text(&self) -> Result<String, FileReadError> {
        self.content
            .clone()
            .map_err(|reason| FileReadError::new(&self.name, reason))
    }
}

#[derive(Default)]
struct TransportState {
    responses: RefCell<VecDeque<Result<String, CompileError>>>,
    requests: RefCell<Vec<String>>,
}

/// Compile transport replaying queued responses in order.
///
/// Clones share the queue and the request log. An exhausted queue answers
/// with a network error.
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Rc<TransportState>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response body.
    #[must_use]
    pub fn respond(self, body: impl Into<String>) -> Self {
        self.state.responses.borrow_mut().push_back(Ok(body.into()));
        self
    }

    /// Queue a failure.
    #[must_use]
    pub fn fail(self, error: CompileError) -> Self {
        self.state.responses.borrow_mut().push_back(Err(error));
        self
    }

    /// Request bodies received so far.
    pub fn requests(&self) -> Vec<String> {
        self.state.requests.borrow().clone()
    }
}

impl CompileTransport for MockTransport {
    async fn post_json(&self, _url: &str, body: String) -> Result<String, CompileError> {
        self.state.requests.borrow_mut().push(body);
        self.state
            .responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(CompileError::Network("no response queued".to_string())))
    }
}

/// Wallet returning a fixed reply and recording what it was asked to sign.
#[derive(Clone)]
pub struct MockWallet {
    reply: Result<String, WalletError>,
    calls: Rc<Cell<usize>>,
    signed: Rc<RefCell<Vec<PublishPayload>>>,
}

impl MockWallet {
    pub fn submitting(hash: impl Into<String>) -> Self {
        Self::with_reply(Ok(hash.into()))
    }

    pub fn rejecting(error: WalletError) -> Self {
        Self::with_reply(Err(error))
    }

    fn with_reply(reply: Result<String, WalletError>) -> Self {
        Self {
            reply,
            calls: Rc::default(),
            signed: Rc::default(),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    /// Payloads passed to the wallet, oldest first.
    pub fn signed(&self) -> Vec<PublishPayload> {
        self.signed.borrow().clone()
    }
}

impl Wallet for MockWallet {
    async fn sign_and_submit(
        &self,
        payload: &PublishPayload,
    ) -> Result<TransactionHash, WalletError> {
        self.calls.set(self.calls.get() + 1);
        self.signed.borrow_mut().push(payload.clone());
        self.reply.clone().map(TransactionHash::new)
    }
}

/// Chain client with a fixed confirmation result.
#[derive(Clone, Debug)]
pub struct MockChain {
    reply: Result<(), ChainError>,
}

impl MockChain {
    pub fn confirming() -> Self {
        Self { reply: Ok(()) }
    }

    pub fn failing(error: ChainError) -> Self {
        Self { reply: Err(error) }
    }
}

impl ChainClient for MockChain {
    async fn wait_for_transaction(&self, _hash: &TransactionHash) -> Result<(), ChainError> {
        self.reply.clone()
    }
}
