use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Maximum alert body length, in characters
pub const MAX_MESSAGE_LEN: usize = 1000;
/// Maximum stored dispatch failure reason, in characters
pub const MAX_ERROR_MESSAGE_LEN: usize = 500;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Info,
    Warning,
    Error,
    Critical,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Info,
        Severity::Warning,
        Severity::Error,
        Severity::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = UnknownVariant;

    /// Exact, case-sensitive match on the upper-case name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Severity::ALL
            .into_iter()
            .find(|severity| severity.as_str() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "severity",
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlertStatus {
    #[default]
    Pending,
    Sent,
    Failed,
}

impl AlertStatus {
    pub const ALL: [AlertStatus; 3] = [AlertStatus::Pending, AlertStatus::Sent, AlertStatus::Failed];

    pub fn as_str(&self) -> &'static str {
        match self {
            AlertStatus::Pending => "PENDING",
            AlertStatus::Sent => "SENT",
            AlertStatus::Failed => "FAILED",
        }
    }

    /// SENT and FAILED accept no further transitions.
    pub fn is_final(&self) -> bool {
        !matches!(self, AlertStatus::Pending)
    }
}

impl fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlertStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AlertStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "status",
                value: s.to_string(),
            })
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("alert {id} is already {status}")]
    AlreadyFinal { id: i64, status: AlertStatus },
}

/// A new alert that no store may accept.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidAlert {
    #[error("message too long: {len} characters (max {max})")]
    MessageTooLong { len: usize, max: usize },
}

/// Caller input for a new alert. Identity, status and timestamps are not
/// part of it; the engine and the store own those.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAlert {
    pub title: String,
    pub message: String,
    pub severity: Severity,
    pub target_service: String,
}

impl NewAlert {
    pub fn new(
        title: impl Into<String>,
        message: impl Into<String>,
        severity: Severity,
        target_service: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            severity,
            target_service: target_service.into(),
        }
    }

    /// Check the bounds every store relies on.
    pub fn check(&self) -> Result<(), InvalidAlert> {
        let len = self.message.chars().count();
        if len > MAX_MESSAGE_LEN {
            return Err(InvalidAlert::MessageTooLong {
                len,
                max: MAX_MESSAGE_LEN,
            });
        }
        Ok(())
    }
}

/// An alert that has been stamped but not yet stored. Always PENDING.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAlert {
    pub title: String,
    pub message: String,
    pub severity: Severity,
    pub target_service: String,
    pub created_at: DateTime<Utc>,
}

impl PendingAlert {
    pub fn new(alert: NewAlert, created_at: DateTime<Utc>) -> Self {
        Self {
            title: alert.title,
            message: alert.message,
            severity: alert.severity,
            target_service: alert.target_service,
            created_at,
        }
    }

    /// Attach the store-assigned id.
    pub fn with_id(self, id: i64) -> Alert {
        Alert {
            id,
            title: self.title,
            message: self.message,
            severity: self.severity,
            target_service: self.target_service,
            status: AlertStatus::Pending,
            created_at: self.created_at,
            sent_at: None,
            error_message: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: i64,
    pub title: String,
    pub message: String,
    pub severity: Severity,
    pub target_service: String,
    pub status: AlertStatus,
    pub created_at: DateTime<Utc>,
    pub sent_at: Option<DateTime<Utc>>,
    pub error_message: Option<String>,
}

impl Alert {
    pub fn mark_sent(&mut self, at: DateTime<Utc>) -> Result<(), TransitionError> {
        self.ensure_pending()?;
        self.status = AlertStatus::Sent;
        self.sent_at = Some(at);
        Ok(())
    }

    /// Record a failed dispatch. The reason is cut to
    /// [`MAX_ERROR_MESSAGE_LEN`] characters.
    pub fn mark_failed(&mut self, reason: &str) -> Result<(), TransitionError> {
        self.ensure_pending()?;
        self.status = AlertStatus::Failed;
        self.error_message = Some(truncate_chars(reason, MAX_ERROR_MESSAGE_LEN));
        Ok(())
    }

    fn ensure_pending(&self) -> Result<(), TransitionError> {
        if self.status.is_final() {
            return Err(TransitionError::AlreadyFinal {
                id: self.id,
                status: self.status,
            });
        }
        Ok(())
    }
}

pub fn truncate_chars(value: &str, max_chars: usize) -> String {
    match value.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => value[..byte_idx].to_string(),
        None => value.to_string(),
    }
}
