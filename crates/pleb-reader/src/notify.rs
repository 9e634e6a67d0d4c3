//! Transient action notifications.
//!
//! Action results arrive out-of-band as [`ActionEvent`]s. Each one becomes a
//! short-lived [`Notification`]; failures are reported, never retried.

use std::collections::VecDeque;

use chrono::{DateTime, TimeDelta, Utc};
use pleb_core::{ActionEvent, ActionKind};

/// How long a notification stays visible by default, in seconds.
pub const DEFAULT_NOTIFICATION_TTL_SECS: i64 = 3;

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

impl NotificationLevel {
    /// CSS class suffix.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// A user-visible message about an action result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    pub note_id: String,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Describe an action result.
    pub fn from_action(event: &ActionEvent, now: DateTime<Utc>) -> Self {
        let (level, message) = match event {
            ActionEvent::Succeeded {
                action,
                amount_sats,
                ..
            } => {
                let message = match (action, amount_sats) {
                    (ActionKind::Like, _) => "Liked".to_string(),
                    (ActionKind::Repost, _) => "Reposted".to_string(),
                    (ActionKind::Reply, _) => "Reply sent".to_string(),
                    (ActionKind::Zap, Some(sats)) => format!("Zapped {sats} sats"),
                    (ActionKind::Zap, None) => "Zapped".to_string(),
                };
                (NotificationLevel::Success, message)
            }
            ActionEvent::Failed { action, error, .. } => (
                NotificationLevel::Error,
                format!("{} failed: {error}", capitalize(action.as_str())),
            ),
        };

        Self {
            level,
            message,
            note_id: event.note_id().to_string(),
            created_at: now,
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Notifications waiting to be shown, oldest first.
#[derive(Debug, Clone)]
pub struct NotificationQueue {
    ttl: TimeDelta,
    items: VecDeque<Notification>,
}

impl NotificationQueue {
    pub fn new(ttl: TimeDelta) -> Self {
        Self {
            ttl,
            items: VecDeque::new(),
        }
    }

    /// Queue a notification for an action result.
    pub fn push(&mut self, event: &ActionEvent, now: DateTime<Utc>) -> &Notification {
        let notification = Notification::from_action(event, now);
        match notification.level {
            NotificationLevel::Success => {
                tracing::info!(note_id = %notification.note_id, action = %event.action(), "action succeeded");
            }
            NotificationLevel::Error => {
                tracing::warn!(
                    note_id = %notification.note_id,
                    action = %event.action(),
                    message = %notification.message,
                    "action failed"
                );
            }
        }
        self.items.push_back(notification);
        &self.items[self.items.len() - 1]
    }

    /// Notifications still visible at `now`.
    pub fn active(&self, now: DateTime<Utc>) -> Vec<&Notification> {
        self.items
            .iter()
            .filter(|n| now - n.created_at < self.ttl)
            .collect()
    }

    /// Drop expired notifications, returning how many were removed.
    pub fn expire(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.items.len();
        let ttl = self.ttl;
        self.items.retain(|n| now - n.created_at < ttl);
        before - self.items.len()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for NotificationQueue {
    fn default() -> Self {
        Self::new(TimeDelta::seconds(DEFAULT_NOTIFICATION_TTL_SECS))
    }
}
