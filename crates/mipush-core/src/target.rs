//! Recipient descriptors.
//!
//! Exactly one [`Target`] applies per request. List variants carry owned
//! ids and are comma-joined at encode time; their size bounds are checked
//! by the encoder before any network call.

use serde::{Deserialize, Serialize};

use crate::message::Message;

/// Boolean operator combining several topics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TopicOp {
    /// Devices subscribed to any topic.
    Union,
    /// Devices subscribed to every topic.
    Intersection,
    /// Devices subscribed to the first topic but none of the others.
    Except,
}

impl TopicOp {
    /// Wire value for the `topic_op` field.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Union => "UNION",
            Self::Intersection => "INTERSECTION",
            Self::Except => "EXCEPT",
        }
    }
}

impl std::fmt::Display for TopicOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TopicOp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "UNION" => Ok(Self::Union),
            "INTERSECTION" => Ok(Self::Intersection),
            "EXCEPT" => Ok(Self::Except),
            other => Err(format!("unknown topic operator: {other}")),
        }
    }
}

/// Who a request is addressed to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Target {
    /// One registration id.
    RegId(String),
    /// Up to 1000 registration ids.
    RegIds(Vec<String>),
    /// One alias.
    Alias(String),
    /// Up to 1000 aliases.
    Aliases(Vec<String>),
    /// One user account.
    UserAccount(String),
    /// Up to 1000 user accounts.
    UserAccounts(Vec<String>),
    /// Every subscriber of one topic.
    Topic(String),
    /// Two to five topics combined with an operator.
    Topics {
        /// Topic names.
        topics: Vec<String>,
        /// How the topics combine.
        op: TopicOp,
    },
    /// Every device of the configured packages.
    All,
}

impl Target {
    /// Short name for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RegId(_) => "regid",
            Self::RegIds(_) => "regids",
            Self::Alias(_) => "alias",
            Self::Aliases(_) => "aliases",
            Self::UserAccount(_) => "user_account",
            Self::UserAccounts(_) => "user_accounts",
            Self::Topic(_) => "topic",
            Self::Topics { .. } => "topics",
            Self::All => "all",
        }
    }
}

/// Recipient kind of a batch entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetType {
    /// `target` is a registration id.
    RegId,
    /// `target` is an alias.
    Alias,
    /// `target` is a user account.
    UserAccount,
}

/// One entry of a mixed batch send: its own message and recipient.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TargetedMessage {
    /// Message for this recipient.
    pub message: Message,
    /// Recipient id, alias, or account.
    pub target: String,
    /// How to interpret `target`.
    pub target_type: TargetType,
}

impl TargetedMessage {
    /// Pair a message with its recipient.
    #[must_use]
    pub fn new(message: Message, target: impl Into<String>, target_type: TargetType) -> Self {
        Self {
            message,
            target: target.into(),
            target_type,
        }
    }

    /// Replace the recipient.
    #[must_use]
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }

    /// Replace the recipient kind.
    #[must_use]
    pub fn with_target_type(mut self, target_type: TargetType) -> Self {
        self.target_type = target_type;
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
