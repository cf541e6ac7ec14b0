//! Notification surface
//!
//! Success and failure messages fan out to any number of subscribers (a
//! toast area, a status bar) over a broadcast channel. Publishing never
//! blocks and never fails: with no subscribers the message is only logged,
//! and slow subscribers skip what they lagged behind on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub level: Level,
    pub message: String,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct Notifier {
    tx: broadcast::Sender<Notification>,
}

impl Notifier {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.tx.subscribe()
    }

    pub fn publish(&self, level: Level, message: impl Into<String>) {
        let message = message.into();
        match level {
            Level::Error => tracing::error!(%message, "notification"),
            Level::Warning => tracing::warn!(%message, "notification"),
            Level::Info | Level::Success => tracing::info!(%message, "notification"),
        }
        let _ = self.tx.send(Notification {
            level,
            message,
            at: Utc::now(),
        });
    }

    pub fn info(&self, message: impl Into<String>) {
        self.publish(Level::Info, message);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.publish(Level::Success, message);
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.publish(Level::Warning, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.publish(Level::Error, message);
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(64)
    }
}
