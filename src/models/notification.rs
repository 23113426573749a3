use serde::{Deserialize, Serialize};

/// Kinds of in-app notifications the dispatcher emits. Serialized
/// snake_case into the sink's `kind` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    ApplicationReceived,
    ApplicationForwarded,
    ApplicationDecision,
}

impl NotificationKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            NotificationKind::ApplicationReceived => "application_received",
            NotificationKind::ApplicationForwarded => "application_forwarded",
            NotificationKind::ApplicationDecision => "application_decision",
        }
    }
}
