//! # mipush-client
//!
//! Async client for the Xiaomi push HTTP API.
//!
//! - [`encoder`]: message + target → ordered form fields
//! - [`endpoints`]: endpoint paths, methods, and hosts
//! - [`transport`]: the one-exchange [`Transport`] seam and its `reqwest` implementation
//! - [`executor`]: headers, bounded immediate retry, cancellation
//! - [`decoder`]: JSON body → typed result
//! - [`client`]: the [`MiPushClient`] facade
//!
//! ```no_run
//! use mipush_client::MiPushClient;
//! use mipush_core::Message;
//! use mipush_settings::PushSettings;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn run() -> mipush_core::PushResult<()> {
//! let settings = PushSettings::new("secret", vec!["com.example.app".into()]);
//! let client = MiPushClient::new(&settings)?;
//! let msg = Message::android("Hello", "World");
//! let result = client.send(&msg, "reg-id", &CancellationToken::new()).await?;
//! println!("{:?}", result.message_id());
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]

pub mod client;
pub mod decoder;
pub mod encoder;
pub mod endpoints;
pub mod executor;
pub mod transport;

pub use client::MiPushClient;
pub use encoder::{Encoder, FormFields};
pub use endpoints::Endpoint;
pub use executor::Executor;
pub use transport::{PreparedRequest, RawResponse, ReqwestTransport, Transport};
