//! Push message value object.
//!
//! A [`Message`] is built once with consuming `with_*` setters and is then
//! only read. Scheduled-send and expiry times are epoch milliseconds and are
//! clamped to a maximum horizon from "now": requests beyond the horizon are
//! silently pulled back to `now + horizon`, never rejected.
//!
//! Zero values (empty strings, `0` times, `0` notify id, `false`
//! pass-through) mean "use the provider default" and are left out of the
//! encoded request entirely.

use std::collections::BTreeMap;
use std::ops::BitOr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Maximum delay between now and a scheduled send (7 days).
pub const MAX_TIME_TO_SEND: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Maximum lifetime of an undelivered message (14 days).
pub const MAX_TIME_TO_LIVE: Duration = Duration::from_secs(14 * 24 * 60 * 60);

/// Extension keys written by the convenience setters.
pub mod extra_keys {
    /// Enables smooth delivery for large pushes.
    pub const FLOW_CONTROL: &str = "flow_control";
    /// Deduplication key for scheduled jobs.
    pub const JOB_KEY: &str = "jobkey";
    /// Delivery receipt callback url.
    pub const CALLBACK: &str = "callback";
    /// Delivery receipt callback type.
    pub const CALLBACK_TYPE: &str = "callback.type";
    /// What tapping the notification does.
    pub const NOTIFY_EFFECT: &str = "notify_effect";
    /// Activity intent uri for [`NOTIFY_EFFECT`] `2`.
    pub const INTENT_URI: &str = "intent_uri";
    /// Web url for [`NOTIFY_EFFECT`] `3`.
    pub const WEB_URI: &str = "web_uri";
    /// iOS badge number.
    pub const BADGE: &str = "badge";
    /// iOS notification category.
    pub const CATEGORY: &str = "category";
    /// iOS sound file url.
    pub const SOUND_URL: &str = "sound_url";
}

/// Notification alert style bit set.
///
/// Values combine with `|`. [`NotifyType::DEFAULT_ALL`] (`-1`) asks the
/// device to use every default effect.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotifyType(i32);

impl NotifyType {
    /// No explicit effect; omitted from requests.
    pub const NONE: Self = Self(0);
    /// All default effects.
    pub const DEFAULT_ALL: Self = Self(-1);
    /// Default sound.
    pub const DEFAULT_SOUND: Self = Self(1);
    /// Default vibration.
    pub const DEFAULT_VIBRATE: Self = Self(2);
    /// Default LED lights.
    pub const DEFAULT_LIGHTS: Self = Self(4);

    /// Create from a raw provider value.
    #[must_use]
    pub const fn from_raw(value: i32) -> Self {
        Self(value)
    }

    /// Raw provider value.
    #[must_use]
    pub const fn value(self) -> i32 {
        self.0
    }
}

impl BitOr for NotifyType {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// A push notification and its delivery options.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    title: String,
    description: String,
    payload: String,
    time_to_live: i64,
    time_to_send: i64,
    notify_id: i64,
    pass_through: bool,
    notify_type: NotifyType,
    extra: BTreeMap<String, String>,
}

impl Message {
    /// New Android notification with a title and body text.
    #[must_use]
    pub fn android(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            payload: String::new(),
            time_to_live: 0,
            time_to_send: 0,
            notify_id: 0,
            pass_through: false,
            notify_type: NotifyType::DEFAULT_ALL,
            extra: BTreeMap::new(),
        }
    }

    /// New iOS notification. iOS alerts carry only body text.
    #[must_use]
    pub fn ios(description: impl Into<String>) -> Self {
        Self::android(String::new(), description)
    }

    // ── Setters ──────────────────────────────────────────────────────

    /// Set the opaque payload delivered to the app.
    #[must_use]
    pub fn with_payload(mut self, payload: impl Into<String>) -> Self {
        self.payload = payload.into();
        self
    }

    /// Deliver silently to the app instead of showing a notification.
    #[must_use]
    pub fn with_pass_through(mut self, pass_through: bool) -> Self {
        self.pass_through = pass_through;
        self
    }

    /// Set the alert effects.
    #[must_use]
    pub fn with_notify_type(mut self, notify_type: NotifyType) -> Self {
        self.notify_type = notify_type;
        self
    }

    /// Set the notification id; messages sharing an id replace each other.
    #[must_use]
    pub fn with_notify_id(mut self, notify_id: i64) -> Self {
        self.notify_id = notify_id;
        self
    }

    /// Schedule delivery at `epoch_ms`, clamped to now + 7 days.
    #[must_use]
    pub fn with_time_to_send(self, epoch_ms: i64) -> Self {
        self.with_time_to_send_at(epoch_ms, now_ms())
    }

    /// Schedule delivery `delay` from now, clamped to 7 days.
    #[must_use]
    pub fn with_send_delay(self, delay: Duration) -> Self {
        let now = now_ms();
        self.with_time_to_send_at(now.saturating_add(duration_ms(delay)), now)
    }

    /// Schedule delivery relative to an explicit clock reading.
    #[must_use]
    pub fn with_time_to_send_at(mut self, epoch_ms: i64, now_ms: i64) -> Self {
        self.time_to_send = clamp_to_horizon(epoch_ms, now_ms, MAX_TIME_TO_SEND);
        self
    }

    /// Expire the message at `epoch_ms`, clamped to now + 14 days.
    #[must_use]
    pub fn with_time_to_live(self, epoch_ms: i64) -> Self {
        self.with_time_to_live_at(epoch_ms, now_ms())
    }

    /// Expire the message relative to an explicit clock reading.
    #[must_use]
    pub fn with_time_to_live_at(mut self, epoch_ms: i64, now_ms: i64) -> Self {
        self.time_to_live = clamp_to_horizon(epoch_ms, now_ms, MAX_TIME_TO_LIVE);
        self
    }

    /// Add an arbitrary extension entry, sent as `extra.<key>`.
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let _ = self.extra.insert(key.into(), value.into());
        self
    }

    /// Turn smooth (flow-controlled) delivery on.
    #[must_use]
    pub fn with_flow_control(self) -> Self {
        self.with_extra(extra_keys::FLOW_CONTROL, "1")
    }

    /// Turn smooth delivery off.
    #[must_use]
    pub fn without_flow_control(mut self) -> Self {
        let _ = self.extra.remove(extra_keys::FLOW_CONTROL);
        self
    }

    /// Tag the message with a job key for deduplication and status lookups.
    #[must_use]
    pub fn with_job_key(self, job_key: impl Into<String>) -> Self {
        self.with_extra(extra_keys::JOB_KEY, job_key)
    }

    /// Request delivery receipts at `url`.
    #[must_use]
    pub fn with_callback(self, url: impl Into<String>) -> Self {
        self.with_extra(extra_keys::CALLBACK, url)
            .with_extra(extra_keys::CALLBACK_TYPE, "3")
    }

    /// Open the app's launcher activity on tap.
    #[must_use]
    pub fn with_launcher_activity(self) -> Self {
        self.with_extra(extra_keys::NOTIFY_EFFECT, "1")
    }

    /// Open a specific activity (intent uri) on tap.
    #[must_use]
    pub fn with_jump_activity(self, intent_uri: impl Into<String>) -> Self {
        self.with_extra(extra_keys::NOTIFY_EFFECT, "2")
            .with_extra(extra_keys::INTENT_URI, intent_uri)
    }

    /// Open a web page on tap.
    #[must_use]
    pub fn with_jump_web_url(self, url: impl Into<String>) -> Self {
        self.with_extra(extra_keys::NOTIFY_EFFECT, "3")
            .with_extra(extra_keys::WEB_URI, url)
    }

    /// iOS badge number.
    #[must_use]
    pub fn with_badge(self, badge: i64) -> Self {
        self.with_extra(extra_keys::BADGE, badge.to_string())
    }

    /// iOS notification category.
    #[must_use]
    pub fn with_category(self, category: impl Into<String>) -> Self {
        self.with_extra(extra_keys::CATEGORY, category)
    }

    /// iOS sound file url.
    #[must_use]
    pub fn with_sound_url(self, sound_url: impl Into<String>) -> Self {
        self.with_extra(extra_keys::SOUND_URL, sound_url)
    }

    // ── Accessors ────────────────────────────────────────────────────

    /// Notification title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Notification body text.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Opaque app payload.
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Expiry time in epoch ms, `0` for the provider default.
    pub fn time_to_live(&self) -> i64 {
        self.time_to_live
    }

    /// Scheduled send time in epoch ms, `0` for immediate.
    pub fn time_to_send(&self) -> i64 {
        self.time_to_send
    }

    /// Notification id, `0` when unset.
    pub fn notify_id(&self) -> i64 {
        self.notify_id
    }

    /// Whether the message is delivered silently to the app.
    pub fn pass_through(&self) -> bool {
        self.pass_through
    }

    /// Alert effects.
    pub fn notify_type(&self) -> NotifyType {
        self.notify_type
    }

    /// Extension entries, ordered by key.
    pub fn extra(&self) -> &BTreeMap<String, String> {
        &self.extra
    }
}

/// Clamp `requested` so it lies no further than `horizon` past `now_ms`.
pub fn clamp_to_horizon(requested: i64, now_ms: i64, horizon: Duration) -> i64 {
    requested.min(now_ms.saturating_add(duration_ms(horizon)))
}

/// Current wall-clock time in epoch milliseconds.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

fn duration_ms(duration: Duration) -> i64 {
    i64::try_from(duration.as_millis()).unwrap_or(i64::MAX)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const NOW: i64 = 1_700_000_000_000;
    const DAY_MS: i64 = 24 * 60 * 60 * 1000;

    // -- constructors --

    #[test]
    fn android_defaults() {
        let msg = Message::android("Hi", "Body");
        assert_eq!(msg.title(), "Hi");
        assert_eq!(msg.description(), "Body");
        assert_eq!(msg.notify_type(), NotifyType::DEFAULT_ALL);
        assert_eq!(msg.time_to_send(), 0);
        assert_eq!(msg.time_to_live(), 0);
        assert!(!msg.pass_through());
        assert!(msg.extra().is_empty());
    }

    #[test]
    fn ios_has_no_title() {
        let msg = Message::ios("Body");
        assert_eq!(msg.title(), "");
        assert_eq!(msg.description(), "Body");
    }

    // -- clamping --

    #[test]
    fn time_to_send_within_horizon_kept() {
        let msg = Message::android("t", "d").with_time_to_send_at(NOW + DAY_MS, NOW);
        assert_eq!(msg.time_to_send(), NOW + DAY_MS);
    }

    #[test]
    fn time_to_send_beyond_horizon_clamped() {
        let msg = Message::android("t", "d").with_time_to_send_at(NOW + 30 * DAY_MS, NOW);
        assert_eq!(msg.time_to_send(), NOW + 7 * DAY_MS);
    }

    #[test]
    fn time_to_live_beyond_horizon_clamped() {
        let msg = Message::android("t", "d").with_time_to_live_at(NOW + 20 * DAY_MS, NOW);
        assert_eq!(msg.time_to_live(), NOW + 14 * DAY_MS);
    }

    #[test]
    fn time_to_live_within_horizon_kept() {
        let msg = Message::android("t", "d").with_time_to_live_at(NOW + 13 * DAY_MS, NOW);
        assert_eq!(msg.time_to_live(), NOW + 13 * DAY_MS);
    }

    #[test]
    fn send_delay_beyond_horizon_clamped_to_wall_clock() {
        let before = now_ms();
        let msg = Message::android("t", "d").with_send_delay(Duration::from_secs(30 * 86_400));
        let after = now_ms();
        assert!(msg.time_to_send() >= before + 7 * DAY_MS);
        assert!(msg.time_to_send() <= after + 7 * DAY_MS);
    }

    #[test]
    fn wall_clock_setter_clamps() {
        let far = now_ms() + 100 * DAY_MS;
        let msg = Message::android("t", "d").with_time_to_send(far);
        let limit = now_ms() + 7 * DAY_MS;
        assert!(msg.time_to_send() <= limit);
        assert!(limit - msg.time_to_send() < 5_000);
    }

    proptest! {
        #[test]
        fn clamp_never_exceeds_horizon(offset in 0i64..(60 * DAY_MS)) {
            let msg = Message::android("t", "d")
                .with_time_to_send_at(NOW + offset, NOW)
                .with_time_to_live_at(NOW + offset, NOW);
            prop_assert!(msg.time_to_send() <= NOW + 7 * DAY_MS);
            prop_assert!(msg.time_to_live() <= NOW + 14 * DAY_MS);
            prop_assert_eq!(msg.time_to_send(), (NOW + offset).min(NOW + 7 * DAY_MS));
        }
    }

    // -- extras --

    #[test]
    fn flow_control_toggle() {
        let msg = Message::android("t", "d").with_flow_control();
        assert_eq!(msg.extra().get("flow_control").map(String::as_str), Some("1"));
        let msg = msg.without_flow_control();
        assert!(msg.extra().get("flow_control").is_none());
    }

    #[test]
    fn callback_sets_type() {
        let msg = Message::android("t", "d").with_callback("https://example.com/cb");
        assert_eq!(msg.extra()["callback"], "https://example.com/cb");
        assert_eq!(msg.extra()["callback.type"], "3");
    }

    #[test]
    fn jump_web_url_sets_effect() {
        let msg = Message::android("t", "d").with_jump_web_url("https://example.com");
        assert_eq!(msg.extra()["notify_effect"], "3");
        assert_eq!(msg.extra()["web_uri"], "https://example.com");
    }

    #[test]
    fn jump_activity_sets_effect() {
        let msg = Message::android("t", "d").with_jump_activity("intent:#Intent;end");
        assert_eq!(msg.extra()["notify_effect"], "2");
        assert_eq!(msg.extra()["intent_uri"], "intent:#Intent;end");
    }

    #[test]
    fn ios_extras() {
        let msg = Message::ios("d")
            .with_badge(3)
            .with_category("chat")
            .with_sound_url("ping.caf");
        assert_eq!(msg.extra()["badge"], "3");
        assert_eq!(msg.extra()["category"], "chat");
        assert_eq!(msg.extra()["sound_url"], "ping.caf");
    }

    #[test]
    fn later_extra_overwrites() {
        let msg = Message::android("t", "d")
            .with_launcher_activity()
            .with_jump_web_url("https://example.com");
        assert_eq!(msg.extra()["notify_effect"], "3");
    }

    // -- notify type --

    #[test]
    fn notify_type_combines() {
        let combined = NotifyType::DEFAULT_SOUND | NotifyType::DEFAULT_VIBRATE;
        assert_eq!(combined.value(), 3);
        assert_eq!(NotifyType::default(), NotifyType::NONE);
    }

    #[test]
    fn notify_type_serializes_as_number() {
        let json = serde_json::to_string(&NotifyType::DEFAULT_ALL).unwrap();
        assert_eq!(json, "-1");
    }
}
