//! Typed response shapes.
//!
//! Every endpoint answers with the same envelope ([`ApiResponse`]) and an
//! endpoint-specific `data` payload. Fields missing from a body decode to
//! their defaults; a body that is not JSON of the right shape is a decode
//! error. Nothing here interprets the provider's `code`; callers inspect it.

use serde::{Deserialize, Serialize};

/// Common response envelope.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<D> {
    /// `"ok"` or `"error"`.
    #[serde(default)]
    pub result: String,
    /// Provider trace id for support requests.
    #[serde(default)]
    pub trace_id: String,
    /// Provider status code; `0` is success.
    #[serde(default)]
    pub code: i64,
    /// Human-readable status.
    #[serde(default)]
    pub description: String,
    /// Extra detail, usually on success.
    #[serde(default)]
    pub info: String,
    /// Failure reason, usually on error.
    #[serde(default)]
    pub reason: String,
    /// Endpoint-specific payload.
    pub data: Option<D>,
}

impl<D> ApiResponse<D> {
    /// Whether the provider reported success.
    pub fn is_ok(&self) -> bool {
        self.code == 0 && self.result != "error"
    }
}

/// Payload of the send endpoints.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendData {
    /// Provider-assigned message id.
    #[serde(default)]
    pub id: String,
}

/// Result of any send operation.
pub type SendResult = ApiResponse<SendData>;

impl SendResult {
    /// Provider-assigned message id, if the send succeeded.
    pub fn message_id(&self) -> Option<&str> {
        self.data
            .as_ref()
            .map(|d| d.id.as_str())
            .filter(|id| !id.is_empty())
    }
}

/// Result of schedule-job and subscription operations.
pub type PlainResult = ApiResponse<serde_json::Value>;

impl PlainResult {
    /// For schedule-job existence checks: the provider answers code `0`
    /// when the job is still pending.
    pub fn job_exists(&self) -> bool {
        self.is_ok()
    }
}

/// Delivery counters for one day.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsCounter {
    /// Day in `yyyyMMdd` form.
    pub date: String,
    /// Recipients addressed by alias.
    pub alias_recipients: i64,
    /// Recipients addressed by user account.
    #[serde(rename = "useraccount_recipients")]
    pub user_account_recipients: i64,
    /// Recipients addressed by registration id.
    pub regid_recipients: i64,
    /// Messages received by devices.
    pub received: i64,
    /// Recipients addressed by topic or broadcast.
    pub broadcast_recipients: i64,
    /// Notification taps.
    pub click: i64,
    /// Recipients addressed individually.
    pub single_recipients: i64,
}

/// Payload of the stats endpoint.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsData {
    /// One entry per day in the requested range.
    #[serde(default)]
    pub data: Vec<StatsCounter>,
}

/// Result of a delivery stats query.
pub type StatsResult = ApiResponse<StatsData>;

/// Delivery trace of one message.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageStatus {
    /// Message id.
    pub id: String,
    /// Delivered / resolved ratio, e.g. `"98.5%"`.
    pub delivery_rate: String,
    /// Devices the message reached.
    pub delivered: i64,
    /// Devices the target resolved to.
    pub resolved: i64,
    /// Devices the message was sent to.
    pub msg_send: i64,
    /// Raw recipient counter before filtering.
    pub raw_counter: i64,
    /// Remaining lifetime as reported by the provider.
    pub time_to_live: String,
    /// Click / delivered ratio.
    pub click_rate: String,
    /// Message kind, e.g. `"Common"`.
    pub msg_type: String,
    /// Creation time, human readable.
    pub create_time: String,
    /// Creation time in epoch ms.
    pub create_timestamp: i64,
    /// Notification taps.
    pub click: i64,
}

/// Payload of the single-message status endpoint.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SingleStatusData {
    /// The message's trace.
    #[serde(default)]
    pub data: MessageStatus,
}

/// Result of a single message status query.
pub type SingleStatusResult = ApiResponse<SingleStatusData>;

/// Payload of the batch status endpoint (by job key or by period).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchStatusData {
    /// One trace per matching message.
    #[serde(default)]
    pub data: Vec<MessageStatus>,
}

/// Result of a batch message status query.
pub type BatchStatusResult = ApiResponse<BatchStatusData>;

/// Payload of the listing endpoints.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListData {
    /// Listed ids, aliases, or topics.
    #[serde(default)]
    pub list: Vec<String>,
}

/// Result of the invalid registration id feedback query.
pub type InvalidRegIdsResult = ApiResponse<ListData>;

/// Aliases bound to a registration id.
pub type AliasesResult = ApiResponse<ListData>;

/// Topics a registration id is subscribed to.
pub type TopicsResult = ApiResponse<ListData>;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_result_decodes() {
        let body = r#"{"result":"ok","trace_id":"Xlm0","code":0,"data":{"id":"sdm_1"},"description":"成功","info":"Received push messages for 1 REGID"}"#;
        let result: SendResult = serde_json::from_str(body).unwrap();
        assert!(result.is_ok());
        assert_eq!(result.trace_id, "Xlm0");
        assert_eq!(result.message_id(), Some("sdm_1"));
        assert_eq!(result.info, "Received push messages for 1 REGID");
    }

    #[test]
    fn error_result_decodes_without_data() {
        let body = r#"{"result":"error","code":22022,"reason":"bad regid","description":"失败"}"#;
        let result: SendResult = serde_json::from_str(body).unwrap();
        assert!(!result.is_ok());
        assert_eq!(result.code, 22022);
        assert_eq!(result.reason, "bad regid");
        assert_eq!(result.message_id(), None);
    }

    #[test]
    fn plain_result_keeps_raw_data() {
        let body = r#"{"result":"ok","code":0,"data":{"anything":[1,2]}}"#;
        let result: PlainResult = serde_json::from_str(body).unwrap();
        assert!(result.job_exists());
        assert_eq!(result.data.unwrap()["anything"][1], 2);
    }

    #[test]
    fn job_missing() {
        let body = r#"{"result":"error","code":20301,"description":"job not exist"}"#;
        let result: PlainResult = serde_json::from_str(body).unwrap();
        assert!(!result.job_exists());
    }

    #[test]
    fn stats_decodes() {
        let body = r#"{"result":"ok","code":0,"data":{"data":[{"date":"20240101","alias_recipients":1,"useraccount_recipients":2,"regid_recipients":3,"received":4,"broadcast_recipients":5,"click":6,"single_recipients":7}]}}"#;
        let result: StatsResult = serde_json::from_str(body).unwrap();
        let day = &result.data.unwrap().data[0];
        assert_eq!(day.date, "20240101");
        assert_eq!(day.user_account_recipients, 2);
        assert_eq!(day.single_recipients, 7);
    }

    #[test]
    fn batch_status_decodes() {
        let body = r#"{"result":"ok","code":0,"data":{"data":[{"id":"m1","delivered":10,"resolved":12,"delivery_rate":"83%"},{"id":"m2"}]}}"#;
        let result: BatchStatusResult = serde_json::from_str(body).unwrap();
        let data = result.data.unwrap().data;
        assert_eq!(data.len(), 2);
        assert_eq!(data[0].delivered, 10);
        assert_eq!(data[0].delivery_rate, "83%");
        assert_eq!(data[1].id, "m2");
        assert_eq!(data[1].delivered, 0);
    }

    #[test]
    fn list_decodes() {
        let body = r#"{"result":"ok","code":0,"data":{"list":["a","b"]}}"#;
        let result: TopicsResult = serde_json::from_str(body).unwrap();
        assert_eq!(result.data.unwrap().list, vec!["a", "b"]);
    }

    #[test]
    fn wrong_shape_is_error() {
        let body = r#"{"result":"ok","code":"zero"}"#;
        assert!(serde_json::from_str::<SendResult>(body).is_err());
    }
}
