//! UI components built with Leptos.
//!
//! - [`header`] - Title bar with wallet connection
//! - [`upload`] - Package folder picker and selection summary
//! - [`named_addresses`] - Named-address editor
//! - [`compile`] - Compile action, compiler output and publish action
//! - [`toast`] - Notification toasts
//! - [`icons`] - Centralized icon definitions (change theme here)

pub mod compile;
pub mod header;
pub mod icons;
pub mod named_addresses;
pub mod toast;
pub mod upload;

pub use compile::CompilePanel;
pub use header::WalletHeader;
pub use named_addresses::NamedAddressPanel;
pub use toast::Toaster;
pub use upload::UploadPanel;
