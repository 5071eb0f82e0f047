//! # `MiPushClient`
//!
//! One async method per provider endpoint. Each method:
//! 1. validates local bounds (list sizes, topic counts) and fails with
//!    [`PushError::InvalidInput`] before any I/O,
//! 2. encodes the request fields,
//! 3. runs the request through the [`Executor`] (retry + cancellation),
//! 4. decodes the body into the endpoint's result type.
//!
//! The client holds only immutable configuration and is cheap to share
//! behind an `Arc`.

use std::sync::Arc;
use std::time::Duration;

use mipush_core::{
    AliasesResult, BatchStatusResult, InvalidRegIdsResult, Message, PlainResult, PushError,
    PushResult, SendResult, SingleStatusResult, StatsResult, Target, TargetType, TargetedMessage,
    TopicOp, TopicsResult,
};
use mipush_settings::PushSettings;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

use crate::decoder::decode;
use crate::encoder::{self, Encoder, FormFields};
use crate::endpoints::{Endpoint, HostKind};
use crate::executor::Executor;
use crate::transport::{ReqwestTransport, Transport};

/// Async client for the Xiaomi push HTTP API.
#[derive(Clone, Debug)]
pub struct MiPushClient {
    host: String,
    feedback_host: String,
    multi_package: bool,
    encoder: Encoder,
    executor: Executor,
}

impl MiPushClient {
    /// Client over HTTPS with the settings' timeout and attempt ceiling.
    pub fn new(settings: &PushSettings) -> PushResult<Self> {
        let transport =
            ReqwestTransport::new(Duration::from_millis(settings.request_timeout_ms))?;
        Self::with_transport(settings, Arc::new(transport))
    }

    /// Client over a custom [`Transport`].
    pub fn with_transport(
        settings: &PushSettings,
        transport: Arc<dyn Transport>,
    ) -> PushResult<Self> {
        settings
            .validate()
            .map_err(|e| PushError::config(e.to_string()))?;
        let executor = Executor::new(transport, &settings.app_secret, settings.max_attempts)?;
        debug!(
            host = %settings.host,
            packages = settings.package_names.len(),
            max_attempts = settings.max_attempts,
            "push client ready"
        );
        Ok(Self {
            host: settings.host.trim_end_matches('/').to_string(),
            feedback_host: settings.feedback_host.trim_end_matches('/').to_string(),
            multi_package: settings.has_multiple_packages(),
            encoder: Encoder::new(&settings.package_names),
            executor,
        })
    }

    // ── Sends ────────────────────────────────────────────────────────

    /// Send to one registration id.
    #[instrument(skip_all, fields(kind = "regid"))]
    pub async fn send(
        &self,
        msg: &Message,
        reg_id: &str,
        cancel: &CancellationToken,
    ) -> PushResult<SendResult> {
        self.send_to(msg, &Target::RegId(reg_id.to_string()), cancel)
            .await
    }

    /// Send to 1 to 1000 registration ids.
    #[instrument(skip_all, fields(kind = "regids", count = reg_ids.len()))]
    pub async fn send_to_list(
        &self,
        msg: &Message,
        reg_ids: &[String],
        cancel: &CancellationToken,
    ) -> PushResult<SendResult> {
        self.send_to(msg, &Target::RegIds(reg_ids.to_vec()), cancel)
            .await
    }

    /// Send a different message to each recipient in one request.
    ///
    /// Every entry must share the first entry's target type. A single entry
    /// is sent through the matching single-recipient endpoint.
    #[instrument(skip_all, fields(count = list.len()))]
    pub async fn send_targeted_list(
        &self,
        list: &[TargetedMessage],
        cancel: &CancellationToken,
    ) -> PushResult<SendResult> {
        if let [only] = list {
            let target = match only.target_type {
                TargetType::RegId => Target::RegId(only.target.clone()),
                TargetType::Alias => Target::Alias(only.target.clone()),
                TargetType::UserAccount => Target::UserAccount(only.target.clone()),
            };
            return self.send_to(&only.message, &target, cancel).await;
        }

        let fields = self.encoder.encode_targeted_list(list)?;
        let endpoint = match list[0].target_type {
            TargetType::RegId => Endpoint::MultiMessagesRegIds,
            TargetType::Alias => Endpoint::MultiMessagesAliases,
            TargetType::UserAccount => Endpoint::MultiMessagesUserAccounts,
        };
        self.call(endpoint, &fields, cancel).await
    }

    /// Send to one alias.
    #[instrument(skip_all, fields(kind = "alias"))]
    pub async fn send_to_alias(
        &self,
        msg: &Message,
        alias: &str,
        cancel: &CancellationToken,
    ) -> PushResult<SendResult> {
        self.send_to(msg, &Target::Alias(alias.to_string()), cancel)
            .await
    }

    /// Send to 1 to 1000 aliases.
    #[instrument(skip_all, fields(kind = "aliases", count = aliases.len()))]
    pub async fn send_to_alias_list(
        &self,
        msg: &Message,
        aliases: &[String],
        cancel: &CancellationToken,
    ) -> PushResult<SendResult> {
        self.send_to(msg, &Target::Aliases(aliases.to_vec()), cancel)
            .await
    }

    /// Send to one user account.
    #[instrument(skip_all, fields(kind = "user_account"))]
    pub async fn send_to_user_account(
        &self,
        msg: &Message,
        account: &str,
        cancel: &CancellationToken,
    ) -> PushResult<SendResult> {
        self.send_to(msg, &Target::UserAccount(account.to_string()), cancel)
            .await
    }

    /// Send to 1 to 1000 user accounts.
    #[instrument(skip_all, fields(kind = "user_accounts", count = accounts.len()))]
    pub async fn send_to_user_account_list(
        &self,
        msg: &Message,
        accounts: &[String],
        cancel: &CancellationToken,
    ) -> PushResult<SendResult> {
        self.send_to(msg, &Target::UserAccounts(accounts.to_vec()), cancel)
            .await
    }

    // ── Broadcasts ───────────────────────────────────────────────────

    /// Broadcast to every subscriber of `topic`.
    #[instrument(skip_all, fields(kind = "topic"))]
    pub async fn broadcast(
        &self,
        msg: &Message,
        topic: &str,
        cancel: &CancellationToken,
    ) -> PushResult<SendResult> {
        self.send_to(msg, &Target::Topic(topic.to_string()), cancel)
            .await
    }

    /// Broadcast to every device of the configured packages.
    #[instrument(skip_all, fields(kind = "all"))]
    pub async fn broadcast_all(
        &self,
        msg: &Message,
        cancel: &CancellationToken,
    ) -> PushResult<SendResult> {
        self.send_to(msg, &Target::All, cancel).await
    }

    /// Broadcast to 1 to 5 topics combined with `op`. One topic is sent as
    /// a plain [`MiPushClient::broadcast`].
    #[instrument(skip_all, fields(kind = "topics", count = topics.len(), op = %op))]
    pub async fn multi_topic_broadcast(
        &self,
        msg: &Message,
        topics: &[String],
        op: TopicOp,
        cancel: &CancellationToken,
    ) -> PushResult<SendResult> {
        if let [topic] = topics {
            return self.broadcast(msg, topic, cancel).await;
        }
        let target = encoder::multi_topic(topics, op)?;
        self.send_to(msg, &target, cancel).await
    }

    // ── Scheduled jobs ───────────────────────────────────────────────

    /// Whether a scheduled message is still pending; see
    /// [`PlainResult::job_exists`].
    #[instrument(skip_all)]
    pub async fn check_schedule_job_exist(
        &self,
        msg_id: &str,
        cancel: &CancellationToken,
    ) -> PushResult<PlainResult> {
        self.call(Endpoint::ScheduleJobExist, &encoder::job_id_fields(msg_id), cancel)
            .await
    }

    /// Cancel a scheduled message by message id.
    #[instrument(skip_all)]
    pub async fn delete_schedule_job(
        &self,
        msg_id: &str,
        cancel: &CancellationToken,
    ) -> PushResult<PlainResult> {
        self.call(Endpoint::ScheduleJobDelete, &encoder::job_id_fields(msg_id), cancel)
            .await
    }

    /// Cancel a scheduled message by job key.
    #[instrument(skip_all)]
    pub async fn delete_schedule_job_by_job_key(
        &self,
        job_key: &str,
        cancel: &CancellationToken,
    ) -> PushResult<PlainResult> {
        self.call(
            Endpoint::ScheduleJobDeleteByJobKey,
            &encoder::job_key_fields(job_key),
            cancel,
        )
        .await
    }

    // ── Stats and traces ─────────────────────────────────────────────

    /// Daily delivery counters for `package_name` between two `yyyyMMdd` dates.
    #[instrument(skip_all)]
    pub async fn stats(
        &self,
        start_date: &str,
        end_date: &str,
        package_name: &str,
        cancel: &CancellationToken,
    ) -> PushResult<StatsResult> {
        let query = encoder::stats_query(start_date, end_date, package_name);
        self.call(Endpoint::Stats, &query, cancel).await
    }

    /// Delivery trace of one message.
    #[instrument(skip_all)]
    pub async fn message_status(
        &self,
        msg_id: &str,
        cancel: &CancellationToken,
    ) -> PushResult<SingleStatusResult> {
        let query = encoder::message_status_query(msg_id);
        self.call(Endpoint::MessageStatus, &query, cancel).await
    }

    /// Delivery traces of every message sent under `job_key`.
    #[instrument(skip_all)]
    pub async fn message_status_by_job_key(
        &self,
        job_key: &str,
        cancel: &CancellationToken,
    ) -> PushResult<BatchStatusResult> {
        let query = encoder::job_key_status_query(job_key);
        self.call(Endpoint::MessagesStatus, &query, cancel).await
    }

    /// Delivery traces of messages sent between two epoch-ms instants.
    #[instrument(skip_all)]
    pub async fn message_status_period(
        &self,
        begin_time: i64,
        end_time: i64,
        cancel: &CancellationToken,
    ) -> PushResult<BatchStatusResult> {
        let query = encoder::period_status_query(begin_time, end_time);
        self.call(Endpoint::MessagesStatus, &query, cancel).await
    }

    // ── Topic subscriptions ──────────────────────────────────────────

    /// Subscribe one registration id to `topic`. An empty `category` is omitted.
    #[instrument(skip_all)]
    pub async fn subscribe_topic(
        &self,
        reg_id: &str,
        topic: &str,
        category: &str,
        cancel: &CancellationToken,
    ) -> PushResult<PlainResult> {
        self.subscribe_topic_for_list(&[reg_id.to_string()], topic, category, cancel)
            .await
    }

    /// Subscribe 1 to 1000 registration ids to `topic`.
    #[instrument(skip_all, fields(count = reg_ids.len()))]
    pub async fn subscribe_topic_for_list(
        &self,
        reg_ids: &[String],
        topic: &str,
        category: &str,
        cancel: &CancellationToken,
    ) -> PushResult<PlainResult> {
        let fields = self.encoder.subscription_by_regids(reg_ids, topic, category)?;
        self.call(Endpoint::TopicSubscribe, &fields, cancel).await
    }

    /// Unsubscribe one registration id from `topic`.
    #[instrument(skip_all)]
    pub async fn unsubscribe_topic(
        &self,
        reg_id: &str,
        topic: &str,
        category: &str,
        cancel: &CancellationToken,
    ) -> PushResult<PlainResult> {
        self.unsubscribe_topic_for_list(&[reg_id.to_string()], topic, category, cancel)
            .await
    }

    /// Unsubscribe 1 to 1000 registration ids from `topic`.
    #[instrument(skip_all, fields(count = reg_ids.len()))]
    pub async fn unsubscribe_topic_for_list(
        &self,
        reg_ids: &[String],
        topic: &str,
        category: &str,
        cancel: &CancellationToken,
    ) -> PushResult<PlainResult> {
        let fields = self.encoder.subscription_by_regids(reg_ids, topic, category)?;
        self.call(Endpoint::TopicUnsubscribe, &fields, cancel).await
    }

    /// Subscribe aliases to `topic`.
    #[instrument(skip_all, fields(count = aliases.len()))]
    pub async fn subscribe_topic_by_alias(
        &self,
        aliases: &[String],
        topic: &str,
        category: &str,
        cancel: &CancellationToken,
    ) -> PushResult<PlainResult> {
        let fields = self.encoder.subscription_by_aliases(aliases, topic, category)?;
        self.call(Endpoint::TopicSubscribeByAlias, &fields, cancel)
            .await
    }

    /// Unsubscribe aliases from `topic`.
    #[instrument(skip_all, fields(count = aliases.len()))]
    pub async fn unsubscribe_topic_by_alias(
        &self,
        aliases: &[String],
        topic: &str,
        category: &str,
        cancel: &CancellationToken,
    ) -> PushResult<PlainResult> {
        let fields = self.encoder.subscription_by_aliases(aliases, topic, category)?;
        self.call(Endpoint::TopicUnsubscribeByAlias, &fields, cancel)
            .await
    }

    // ── Lookups ──────────────────────────────────────────────────────

    /// Registration ids the provider has marked invalid (feedback host).
    #[instrument(skip_all)]
    pub async fn invalid_registration_ids(
        &self,
        cancel: &CancellationToken,
    ) -> PushResult<InvalidRegIdsResult> {
        self.call(Endpoint::InvalidRegIds, &FormFields::new(), cancel)
            .await
    }

    /// Aliases bound to a registration id.
    #[instrument(skip_all)]
    pub async fn aliases_of(
        &self,
        reg_id: &str,
        cancel: &CancellationToken,
    ) -> PushResult<AliasesResult> {
        let query = self.encoder.registration_query(reg_id);
        self.call(Endpoint::AliasAll, &query, cancel).await
    }

    /// Topics a registration id is subscribed to.
    #[instrument(skip_all)]
    pub async fn topics_of(
        &self,
        reg_id: &str,
        cancel: &CancellationToken,
    ) -> PushResult<TopicsResult> {
        let query = self.encoder.registration_query(reg_id);
        self.call(Endpoint::TopicAll, &query, cancel).await
    }

    // ── Internals ────────────────────────────────────────────────────

    async fn send_to(
        &self,
        msg: &Message,
        target: &Target,
        cancel: &CancellationToken,
    ) -> PushResult<SendResult> {
        let fields = self.encoder.encode_send(msg, target)?;
        let endpoint = match target {
            Target::RegId(_) | Target::RegIds(_) => Endpoint::RegId,
            Target::Alias(_) | Target::Aliases(_) => Endpoint::Alias,
            Target::UserAccount(_) | Target::UserAccounts(_) => Endpoint::UserAccount,
            Target::Topic(_) => Endpoint::Topic,
            Target::Topics { .. } => Endpoint::MultiTopic,
            Target::All => Endpoint::All,
        };
        let result: SendResult = self.call(endpoint, &fields, cancel).await?;
        debug!(
            kind = target.kind(),
            code = result.code,
            message_id = result.message_id().unwrap_or_default(),
            "push sent"
        );
        Ok(result)
    }

    fn url(&self, endpoint: Endpoint) -> String {
        let host = match endpoint.host() {
            HostKind::Api => &self.host,
            HostKind::Feedback => &self.feedback_host,
        };
        format!("{host}{}", endpoint.resolve(self.multi_package))
    }

    async fn call<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        fields: &FormFields,
        cancel: &CancellationToken,
    ) -> PushResult<T> {
        let url = self.url(endpoint);
        let body = self
            .executor
            .execute(endpoint.method(), &url, fields, cancel)
            .await?;
        decode(&body)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
