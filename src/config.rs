//! Presentation configuration.
//!
//! Pipeline constants (endpoints, timeouts, compile mode) live in
//! `movepub_core::config`; this module only holds what the UI needs.

// =============================================================================
// Application Metadata
// =============================================================================

/// Application name displayed in the header.
pub const APP_NAME: &str = "movepub";

/// Short description under the title.
pub const APP_TAGLINE: &str = "Compile and publish Move packages from your browser";

// =============================================================================
// Notifications
// =============================================================================

/// How long a toast stays on screen.
pub const TOAST_DURATION_MS: u32 = 6_000;

/// Maximum number of toasts shown at once; the oldest is dropped first.
pub const MAX_TOASTS: usize = 4;

// =============================================================================
// UI Configuration
// =============================================================================

/// Icon theme selection.
///
/// Available themes:
/// - `Bootstrap` - Familiar, slightly bolder (default)
/// - `Lucide` - Minimal, thin strokes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[allow(dead_code)]
pub enum IconTheme {
    #[default]
    Bootstrap,
    Lucide,
}

/// Current icon theme used throughout the application.
pub const ICON_THEME: IconTheme = IconTheme::Bootstrap;
