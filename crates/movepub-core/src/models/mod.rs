//! Data models and types for the pipeline.
//!
//! Contains domain types for:
//! - [`ProjectBundle`], [`SourceFile`], [`ManifestFile`] - Extracted package contents
//! - [`NamedAddressRegistry`], [`NamedAddresses`] - User-supplied named addresses
//! - [`CompileRequest`], [`AddressTarget`] - Compiler request payload
//! - [`CompileResult`], [`PublishPayload`], [`TransactionHash`] - Compiler output and publish transaction
//! - [`Network`], [`WalletState`] - Wallet connection
//! - [`Notification`] - User-visible outcomes

mod bundle;
mod compiled;
mod named_address;
mod network;
mod notification;
mod request;
mod wallet;

pub use bundle::{BundleSummary, ManifestFile, ManifestSummary, ProjectBundle, SourceFile};
pub use compiled::{CompileResult, PublishPayload, TransactionHash, decode_hex};
pub use named_address::{EntryField, NamedAddressEntry, NamedAddressRegistry, NamedAddresses};
pub use network::{Network, is_valid_network_name};
pub use notification::{Notification, NotificationKind};
pub use request::{AddressTarget, CompileRequest, build_compile_request};
pub use wallet::WalletState;
