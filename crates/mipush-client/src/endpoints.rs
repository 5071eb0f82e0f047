//! Provider endpoint table.

use reqwest::Method;

/// Which configured host serves an endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostKind {
    /// The main API host.
    Api,
    /// The feedback host (invalid registration ids).
    Feedback,
}

/// Every HTTP endpoint the client calls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endpoint {
    /// Send to registration ids.
    RegId,
    /// Batch send, registration id targets.
    MultiMessagesRegIds,
    /// Batch send, alias targets.
    MultiMessagesAliases,
    /// Batch send, user account targets.
    MultiMessagesUserAccounts,
    /// Send to aliases.
    Alias,
    /// Send to user accounts.
    UserAccount,
    /// Broadcast to one topic.
    Topic,
    /// Broadcast to every device.
    All,
    /// Broadcast to a topic expression.
    MultiTopic,
    /// Does a scheduled job exist.
    ScheduleJobExist,
    /// Delete a scheduled job by message id.
    ScheduleJobDelete,
    /// Delete a scheduled job by job key.
    ScheduleJobDeleteByJobKey,
    /// Daily delivery counters.
    Stats,
    /// Status of one message.
    MessageStatus,
    /// Status of several messages.
    MessagesStatus,
    /// Subscribe registration ids to a topic.
    TopicSubscribe,
    /// Unsubscribe registration ids from a topic.
    TopicUnsubscribe,
    /// Subscribe aliases to a topic.
    TopicSubscribeByAlias,
    /// Unsubscribe aliases from a topic.
    TopicUnsubscribeByAlias,
    /// Registration ids the provider has marked invalid.
    InvalidRegIds,
    /// Aliases of a registration id.
    AliasAll,
    /// Topics of a registration id.
    TopicAll,
}

impl Endpoint {
    /// URL path. Topic and broadcast-all switch to their v3 form when more
    /// than one package is configured.
    pub fn resolve(self, multi_package: bool) -> &'static str {
        match self {
            Self::RegId => "/v3/message/regid",
            Self::MultiMessagesRegIds => "/v2/multi_messages/regids",
            Self::MultiMessagesAliases => "/v2/multi_messages/aliases",
            Self::MultiMessagesUserAccounts => "/v2/multi_messages/user_accounts",
            Self::Alias => "/v3/message/alias",
            Self::UserAccount => "/v2/message/user_account",
            Self::Topic if multi_package => "/v3/message/multi_topic",
            Self::Topic => "/v2/message/topic",
            Self::All if multi_package => "/v3/message/all",
            Self::All => "/v2/message/all",
            Self::MultiTopic => "/v3/message/multi_topic",
            Self::ScheduleJobExist => "/v2/schedule_job/exist",
            Self::ScheduleJobDelete => "/v2/schedule_job/delete",
            Self::ScheduleJobDeleteByJobKey => "/v3/schedule_job/delete",
            Self::Stats => "/v1/stats/message/counters",
            Self::MessageStatus => "/v1/trace/message/status",
            Self::MessagesStatus => "/v1/trace/messages/status",
            Self::TopicSubscribe => "/v2/topic/subscribe",
            Self::TopicUnsubscribe => "/v2/topic/unsubscribe",
            Self::TopicSubscribeByAlias => "/v2/topic/subscribe/alias",
            Self::TopicUnsubscribeByAlias => "/v2/topic/unsubscribe/alias",
            Self::InvalidRegIds => "/v1/feedback/fetch_invalid_regids",
            Self::AliasAll => "/v1/alias/all",
            Self::TopicAll => "/v1/topic/all",
        }
    }

    /// HTTP method; queries are GET, everything else POST.
    pub fn method(self) -> Method {
        match self {
            Self::Stats
            | Self::MessageStatus
            | Self::MessagesStatus
            | Self::InvalidRegIds
            | Self::AliasAll
            | Self::TopicAll => Method::GET,
            _ => Method::POST,
        }
    }

    /// Host serving this endpoint.
    pub fn host(self) -> HostKind {
        match self {
            Self::InvalidRegIds => HostKind::Feedback,
            _ => HostKind::Api,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multi_package_switches_topic_and_all() {
        assert_eq!(Endpoint::Topic.resolve(false), "/v2/message/topic");
        assert_eq!(Endpoint::Topic.resolve(true), "/v3/message/multi_topic");
        assert_eq!(Endpoint::All.resolve(false), "/v2/message/all");
        assert_eq!(Endpoint::All.resolve(true), "/v3/message/all");
    }

    #[test]
    fn other_paths_ignore_package_count() {
        for ep in [Endpoint::RegId, Endpoint::Alias, Endpoint::MultiTopic, Endpoint::Stats] {
            assert_eq!(ep.resolve(false), ep.resolve(true));
        }
    }

    #[test]
    fn queries_are_get() {
        assert_eq!(Endpoint::Stats.method(), Method::GET);
        assert_eq!(Endpoint::TopicAll.method(), Method::GET);
        assert_eq!(Endpoint::RegId.method(), Method::POST);
        assert_eq!(Endpoint::ScheduleJobExist.method(), Method::POST);
    }

    #[test]
    fn feedback_host_only_for_invalid_regids() {
        assert_eq!(Endpoint::InvalidRegIds.host(), HostKind::Feedback);
        assert_eq!(Endpoint::AliasAll.host(), HostKind::Api);
    }
}
