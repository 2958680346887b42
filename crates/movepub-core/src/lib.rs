//! Core pipeline for compiling and publishing Move packages from the browser.
//!
//! - [`collector`] reads a directory selection into a [`models::ProjectBundle`]
//! - [`compiler`] posts the bundle to the remote compiler
//! - [`publish`] turns the compiler output into a publish transaction and
//!   drives it through the wallet and the chain
//! - [`session`] owns the state between those steps
//!
//! Browser collaborators live in [`wallet`] (injected Aptos wallet) and
//! [`chain`] (fullnode REST polling).

pub mod chain;
pub mod collector;
pub mod compiler;
pub mod config;
pub mod error;
pub mod log;
pub mod models;
pub mod publish;
pub mod session;
pub mod wallet;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use chain::RestChainClient;
pub use collector::{SelectedFile, collect_package, files_from_list};
pub use compiler::{BusyFlag, CompileTransport, CompilerClient, HttpTransport};
pub use publish::{ChainClient, PublishOutcome, PublishPhase, PublishState, Publisher, Wallet};
pub use session::{Session, SessionEvent};
pub use wallet::InjectedWallet;
