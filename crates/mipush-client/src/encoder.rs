//! Request parameter encoding.
//!
//! Turns a [`Message`] plus a [`Target`] into an ordered list of form
//! fields. Zero values (empty strings, zero times, zero ids, `false`) are
//! left out so the provider applies its own defaults. Encoding is pure and
//! deterministic: the same input always yields the same field order.

use std::collections::BTreeMap;

use mipush_core::constants::{MAX_TARGETS, MAX_TOPICS, MIN_MULTI_TOPICS, TOPIC_SEPARATOR};
use mipush_core::{Message, PushError, PushResult, Target, TargetedMessage, TopicOp};
use serde::Serialize;

// ─────────────────────────────────────────────────────────────────────────────
// Form fields
// ─────────────────────────────────────────────────────────────────────────────

/// Ordered `key=value` pairs for a form body or query string.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormFields(Vec<(String, String)>);

impl FormFields {
    /// Empty field list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field unconditionally.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.push((key.into(), value.into()));
    }

    /// Append a field unless `value` is empty.
    pub fn push_non_empty(&mut self, key: &str, value: &str) {
        if !value.is_empty() {
            self.push(key, value);
        }
    }

    /// Append an epoch-millisecond field only when it is positive.
    pub fn push_positive(&mut self, key: &str, value: i64) {
        if value > 0 {
            self.push(key, value.to_string());
        }
    }

    /// Append a numeric field unless it is zero.
    pub fn push_non_zero(&mut self, key: &str, value: i64) {
        if value != 0 {
            self.push(key, value.to_string());
        }
    }

    /// Builder form of [`FormFields::push`].
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(key, value);
        self
    }

    /// First value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Field names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no field was added.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `application/x-www-form-urlencoded` rendering, also used for query strings.
    pub fn to_urlencoded(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.0.iter())
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Encoder
// ─────────────────────────────────────────────────────────────────────────────

/// Encodes requests for one configured set of packages.
#[derive(Clone, Debug)]
pub struct Encoder {
    restricted_package_name: String,
}

impl Encoder {
    /// Encoder for the given package names (comma-joined on the wire).
    pub fn new(package_names: &[String]) -> Self {
        Self {
            restricted_package_name: package_names.join(","),
        }
    }

    /// The comma-joined package list.
    pub fn restricted_package_name(&self) -> &str {
        &self.restricted_package_name
    }

    /// Common message fields shared by every send and broadcast.
    pub fn message_fields(&self, msg: &Message) -> FormFields {
        let mut form = FormFields::new();
        form.push_non_empty("restricted_package_name", &self.restricted_package_name);
        form.push_positive("time_to_live", msg.time_to_live());
        form.push_non_empty("payload", msg.payload());
        form.push_non_empty("title", msg.title());
        form.push_non_empty("description", msg.description());
        form.push_non_zero("notify_type", i64::from(msg.notify_type().value()));
        if msg.pass_through() {
            form.push("pass_through", "1");
        }
        form.push_non_zero("notify_id", msg.notify_id());
        form.push_positive("time_to_send", msg.time_to_send());
        for (key, value) in msg.extra() {
            form.push(format!("extra.{key}"), value.as_str());
        }
        form
    }

    /// Message fields followed by the target fields.
    ///
    /// List targets must hold 1 to 1000 entries and multi-topic targets 2 to
    /// 5 topics; anything else is rejected before any I/O.
    pub fn encode_send(&self, msg: &Message, target: &Target) -> PushResult<FormFields> {
        let target_fields = encode_target(target)?;
        let mut form = self.message_fields(msg);
        form.0.extend(target_fields.0);
        Ok(form)
    }

    /// Body of a batch send: every entry's message serialized into one
    /// `messages` JSON field.
    ///
    /// All entries must share the first entry's target type.
    pub fn encode_targeted_list(&self, list: &[TargetedMessage]) -> PushResult<FormFields> {
        let Some(first) = list.first() else {
            return Err(PushError::invalid_input("targeted message list is empty"));
        };
        check_len("targeted message", list.len())?;
        if let Some(other) = list.iter().find(|m| m.target_type != first.target_type) {
            return Err(PushError::invalid_input(format!(
                "targeted message list mixes {:?} and {:?} targets",
                first.target_type, other.target_type
            )));
        }

        let entries: Vec<WireEntry> = list
            .iter()
            .map(|m| WireEntry {
                target: m.target.clone(),
                message: WireMessage::new(&m.message, &self.restricted_package_name),
            })
            .collect();

        let mut form = FormFields::new();
        form.push("messages", serde_json::to_string(&entries)?);
        form.push_positive("time_to_send", first.message.time_to_send());
        Ok(form)
    }

    /// Topic subscription fields for registration ids (comma-joined).
    pub fn subscription_by_regids(
        &self,
        reg_ids: &[String],
        topic: &str,
        category: &str,
    ) -> PushResult<FormFields> {
        check_list("registration id", reg_ids)?;
        Ok(self.subscription("registration_id", &reg_ids.join(","), topic, category))
    }

    /// Topic subscription fields for aliases (comma-joined).
    pub fn subscription_by_aliases(
        &self,
        aliases: &[String],
        topic: &str,
        category: &str,
    ) -> PushResult<FormFields> {
        check_list("alias", aliases)?;
        Ok(self.subscription("aliases", &aliases.join(","), topic, category))
    }

    fn subscription(&self, id_key: &str, ids: &str, topic: &str, category: &str) -> FormFields {
        let mut form = FormFields::new()
            .with(id_key, ids)
            .with("topic", topic)
            .with("restricted_package_name", self.restricted_package_name.as_str());
        form.push_non_empty("category", category);
        form
    }

    /// Query for the aliases or topics of one registration id.
    pub fn registration_query(&self, reg_id: &str) -> FormFields {
        FormFields::new()
            .with("restricted_package_name", self.restricted_package_name.as_str())
            .with("registration_id", reg_id)
    }
}

/// Target-specific fields for `target`.
pub fn encode_target(target: &Target) -> PushResult<FormFields> {
    let mut form = FormFields::new();
    match target {
        Target::RegId(id) => form.push("registration_id", id.as_str()),
        Target::RegIds(ids) => {
            check_list("registration id", ids)?;
            form.push("registration_id", ids.join(","));
        }
        Target::Alias(alias) => form.push("alias", alias.as_str()),
        Target::Aliases(aliases) => {
            check_list("alias", aliases)?;
            form.push("alias", aliases.join(","));
        }
        Target::UserAccount(account) => form.push("user_account", account.as_str()),
        Target::UserAccounts(accounts) => {
            check_list("user account", accounts)?;
            form.push("user_account", accounts.join(","));
        }
        Target::Topic(topic) => form.push("topic", topic.as_str()),
        Target::Topics { topics, op } => {
            check_topics(topics)?;
            form.push("topic_op", op.as_str());
            form.push("topics", topics.join(TOPIC_SEPARATOR));
        }
        Target::All => {}
    }
    Ok(form)
}

/// Multi-topic target, validated.
pub fn multi_topic(topics: &[String], op: TopicOp) -> PushResult<Target> {
    check_topics(topics)?;
    Ok(Target::Topics {
        topics: topics.to_vec(),
        op,
    })
}

// ── Queries ─────────────────────────────────────────────────────────────────

/// Daily counters query. Dates are `yyyyMMdd`.
pub fn stats_query(start_date: &str, end_date: &str, package_name: &str) -> FormFields {
    FormFields::new()
        .with("start_date", start_date)
        .with("end_date", end_date)
        .with("restricted_package_name", package_name)
}

/// Status of one message.
pub fn message_status_query(msg_id: &str) -> FormFields {
    FormFields::new().with("msg_id", msg_id)
}

/// Status of every message sent under a job key.
pub fn job_key_status_query(job_key: &str) -> FormFields {
    FormFields::new().with("job_key", job_key)
}

/// Status of messages sent in `[begin, end]` (epoch ms).
pub fn period_status_query(begin_time: i64, end_time: i64) -> FormFields {
    FormFields::new()
        .with("begin_time", begin_time.to_string())
        .with("end_time", end_time.to_string())
}

/// Scheduled job addressed by message id.
pub fn job_id_fields(msg_id: &str) -> FormFields {
    FormFields::new().with("job_id", msg_id)
}

/// Scheduled job addressed by job key.
pub fn job_key_fields(job_key: &str) -> FormFields {
    FormFields::new().with("job_key", job_key)
}

// ── Bounds ──────────────────────────────────────────────────────────────────

fn check_len(kind: &str, len: usize) -> PushResult<()> {
    if len == 0 {
        return Err(PushError::invalid_input(format!("{kind} list is empty")));
    }
    if len > MAX_TARGETS {
        return Err(PushError::invalid_input(format!(
            "{kind} list has {len} entries, limit is {MAX_TARGETS}"
        )));
    }
    Ok(())
}

fn check_list(kind: &str, ids: &[String]) -> PushResult<()> {
    check_len(kind, ids.len())
}

fn check_topics(topics: &[String]) -> PushResult<()> {
    if !(MIN_MULTI_TOPICS..=MAX_TOPICS).contains(&topics.len()) {
        return Err(PushError::invalid_input(format!(
            "multi-topic broadcast needs {MIN_MULTI_TOPICS} to {MAX_TOPICS} topics, got {}",
            topics.len()
        )));
    }
    Ok(())
}

// ── Batch wire shape ────────────────────────────────────────────────────────

#[derive(Serialize)]
struct WireEntry {
    target: String,
    message: WireMessage,
}

#[derive(Serialize)]
struct WireMessage {
    #[serde(skip_serializing_if = "String::is_empty")]
    restricted_package_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    payload: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    description: String,
    #[serde(skip_serializing_if = "is_zero")]
    pass_through: i64,
    #[serde(skip_serializing_if = "is_zero")]
    notify_type: i64,
    #[serde(skip_serializing_if = "is_zero")]
    time_to_live: i64,
    #[serde(skip_serializing_if = "is_zero")]
    time_to_send: i64,
    #[serde(skip_serializing_if = "is_zero")]
    notify_id: i64,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    extra: BTreeMap<String, String>,
}

impl WireMessage {
    fn new(msg: &Message, restricted_package_name: &str) -> Self {
        Self {
            restricted_package_name: restricted_package_name.to_string(),
            payload: msg.payload().to_string(),
            title: msg.title().to_string(),
            description: msg.description().to_string(),
            pass_through: i64::from(msg.pass_through()),
            notify_type: i64::from(msg.notify_type().value()),
            time_to_live: msg.time_to_live(),
            time_to_send: msg.time_to_send(),
            notify_id: msg.notify_id(),
            extra: msg.extra().clone(),
        }
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_zero(v: &i64) -> bool {
    *v == 0
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
