//! # mipush-core
//!
//! Foundation types for the Xiaomi push client.
//!
//! This crate provides the shared vocabulary the client and CLI depend on:
//!
//! - **Messages**: [`Message`] value object with consuming `with_*` setters
//!   and horizon clamping for scheduled delivery and expiry
//! - **Targets**: [`Target`] enum naming exactly one recipient kind per request,
//!   plus [`TargetedMessage`] for mixed batch sends
//! - **Results**: [`ApiResponse`] envelope with per-endpoint payload shapes
//! - **Errors**: [`PushError`] hierarchy via `thiserror`
//! - **Logging**: [`logging::init_subscriber`] for the `tracing` subscriber

#![deny(unsafe_code)]

pub mod constants;
pub mod errors;
pub mod logging;
pub mod message;
pub mod results;
pub mod target;

pub use errors::{PushError, PushResult, TransportError};
pub use message::{Message, NotifyType};
pub use results::{
    AliasesResult, ApiResponse, BatchStatusData, BatchStatusResult, InvalidRegIdsResult,
    ListData, MessageStatus, PlainResult, SendData, SendResult, SingleStatusData,
    SingleStatusResult, StatsCounter, StatsData, StatsResult, TopicsResult,
};
pub use target::{Target, TargetType, TargetedMessage, TopicOp};
