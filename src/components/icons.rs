//! Centralized icon definitions.
//!
//! Icon theme is configured in `config.rs` via `ICON_THEME`.
//! This module maps semantic icon names to the selected theme's icons.

use icondata::Icon;

use crate::config::IconTheme;

// =============================================================================
// Theme Imports
// =============================================================================

mod lucide {
    pub use icondata::{
        LuCircleAlert as Alert, LuCircleCheck as Success, LuCpu as Compile,
        LuExternalLink as ExternalLink, LuFolderOpen as Folder, LuGlobe as Network,
        LuLoader as Spinner, LuPlus as Plus, LuUpload as Publish, LuTrash2 as Trash,
        LuUser as User, LuWallet as Wallet, LuX as Close,
    };
}

mod bootstrap {
    pub use icondata::{
        BsArrowRepeat as Spinner, BsBoxArrowUpRight as ExternalLink,
        BsCheckCircleFill as Success, BsCpu as Compile, BsExclamationCircleFill as Alert,
        BsFolder2Open as Folder, BsGlobe as Network, BsPerson as User, BsPlusLg as Plus,
        BsUpload as Publish, BsTrash as Trash, BsWallet2 as Wallet, BsXLg as Close,
    };
}

// =============================================================================
// Icon Constants (selected based on theme)
// =============================================================================

macro_rules! themed_icon {
    ($name:ident, $theme_name:ident) => {
        pub const $name: Icon = match crate::config::ICON_THEME {
            IconTheme::Lucide => lucide::$theme_name,
            IconTheme::Bootstrap => bootstrap::$theme_name,
        };
    };
}

themed_icon!(ALERT, Alert);
themed_icon!(CLOSE, Close);
themed_icon!(COMPILE, Compile);
themed_icon!(EXTERNAL_LINK, ExternalLink);
themed_icon!(FOLDER, Folder);
themed_icon!(NETWORK, Network);
themed_icon!(PLUS, Plus);
themed_icon!(PUBLISH, Publish);
themed_icon!(SPINNER, Spinner);
themed_icon!(SUCCESS, Success);
themed_icon!(TRASH, Trash);
themed_icon!(USER, User);
themed_icon!(WALLET, Wallet);
