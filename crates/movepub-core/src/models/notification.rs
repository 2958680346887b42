//! User-visible outcome messages.

use std::sync::atomic::{AtomicUsize, Ordering};

use super::compiled::TransactionHash;
use super::network::Network;

/// Visual variant of a notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Destructive,
}

/// A toast-style message with a unique ID for keyed rendering.
#[derive(Clone, Debug)]
pub struct Notification {
    pub id: usize,
    pub kind: NotificationKind,
    pub title: String,
    pub description: String,
    /// Optional link, e.g. to the transaction in the explorer.
    pub link: Option<String>,
}

static NOTIFICATION_COUNTER: AtomicUsize = AtomicUsize::new(0);

impl Notification {
    fn new(kind: NotificationKind, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: NOTIFICATION_COUNTER.fetch_add(1, Ordering::Relaxed),
            kind,
            title: title.into(),
            description: description.into(),
            link: None,
        }
    }

    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(NotificationKind::Success, title, description)
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(NotificationKind::Destructive, title, description)
    }

    #[must_use]
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    /// Notification for a confirmed publish transaction.
    pub fn published(hash: &TransactionHash, network: Option<&Network>) -> Self {
        let notification = Self::success("Success", format!("Transaction {}", hash));
        match network {
            Some(network) => notification.with_link(network.explorer_txn_url(hash.as_str())),
            None => notification,
        }
    }

    /// Notification for a failed publish attempt.
    pub fn publish_failed(error: impl std::fmt::Display) -> Self {
        Self::error(
            "Transaction submission failed",
            format!("Your transaction failed to submit. {}", error),
        )
    }
}

impl PartialEq for Notification {
    fn eq(&self, other: &Self) -> bool {
        // ID is for rendering only
        self.kind == other.kind
            && self.title == other.title
            && self.description == other.description
            && self.link == other.link
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PublishError;

    #[test]
    fn test_unique_ids() {
        let a = Notification::success("a", "");
        let b = Notification::success("a", "");
        assert_ne!(a.id, b.id);
        assert_eq!(a, b);
    }

    #[test]
    fn test_published() {
        let hash = TransactionHash::new("0xdeadbeef");
        let n = Notification::published(&hash, Some(&Network::Testnet));
        assert_eq!(n.kind, NotificationKind::Success);
        assert_eq!(n.title, "Success");
        assert_eq!(n.description, "Transaction 0xdeadbeef");
        assert_eq!(
            n.link.as_deref(),
            Some("https://explorer.aptoslabs.com/txn/0xdeadbeef?network=testnet")
        );
        assert_eq!(Notification::published(&hash, None).link, None);
    }

    #[test]
    fn test_publish_failed() {
        let n = Notification::publish_failed(PublishError::SigningRejected(
            "User rejected the request".to_string(),
        ));
        assert_eq!(n.kind, NotificationKind::Destructive);
        assert_eq!(n.title, "Transaction submission failed");
        assert_eq!(
            n.description,
            "Your transaction failed to submit. Signing rejected: User rejected the request"
        );
    }
}
