//! # mipush
//!
//! Command line client for the Xiaomi push API. Loads settings, runs one
//! operation, and prints the decoded result as pretty JSON on stdout.

#![deny(unsafe_code)]

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use mipush_client::MiPushClient;
use mipush_core::constants::{BRANDS, PRICE_RANGES, brand_code, price_range};
use mipush_core::{Message, TopicOp};
use mipush_settings::PushSettings;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

/// Xiaomi push client.
#[derive(Parser, Debug)]
#[command(name = "mipush", about = "Xiaomi push command line client", version)]
struct Cli {
    /// Settings file (defaults to `~/.mipush/settings.json`).
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Log level filter; `RUST_LOG` wins when set.
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Send to one or more registration ids.
    Send {
        /// Registration ids.
        #[arg(required = true)]
        reg_ids: Vec<String>,
        #[command(flatten)]
        message: MessageArgs,
    },
    /// Send to one or more aliases.
    SendAlias {
        /// Aliases.
        #[arg(required = true)]
        aliases: Vec<String>,
        #[command(flatten)]
        message: MessageArgs,
    },
    /// Send to one or more user accounts.
    SendAccount {
        /// User accounts.
        #[arg(required = true)]
        accounts: Vec<String>,
        #[command(flatten)]
        message: MessageArgs,
    },
    /// Broadcast to one topic, or up to five combined with `--op`.
    Broadcast {
        /// Topics.
        #[arg(required = true)]
        topics: Vec<String>,
        /// How several topics combine: union, intersection, or except.
        #[arg(long, default_value = "union")]
        op: TopicOp,
        #[command(flatten)]
        message: MessageArgs,
    },
    /// Broadcast to every device of the configured packages.
    BroadcastAll {
        #[command(flatten)]
        message: MessageArgs,
    },
    /// Delivery status by message id, job key, or time window.
    Status {
        /// Message id.
        msg_id: Option<String>,
        /// Job key instead of a message id.
        #[arg(long, conflicts_with = "msg_id")]
        job_key: Option<String>,
        /// Window start (epoch ms), with `--end`.
        #[arg(long, requires = "end", conflicts_with_all = ["msg_id", "job_key"])]
        begin: Option<i64>,
        /// Window end (epoch ms), with `--begin`.
        #[arg(long, requires = "begin")]
        end: Option<i64>,
    },
    /// Daily delivery counters between two `yyyyMMdd` dates.
    Stats {
        /// First day.
        start: String,
        /// Last day.
        end: String,
        /// Package (defaults to the first configured package).
        #[arg(long)]
        package: Option<String>,
    },
    /// Registration ids the provider has marked invalid.
    InvalidRegids,
    /// Aliases bound to a registration id.
    Aliases {
        /// Registration id.
        reg_id: String,
    },
    /// Topics a registration id is subscribed to.
    Topics {
        /// Registration id.
        reg_id: String,
    },
}

/// Message options shared by the send and broadcast commands.
#[derive(Args, Debug)]
struct MessageArgs {
    /// Notification title.
    #[arg(long, default_value = "")]
    title: String,
    /// Notification body.
    #[arg(long)]
    description: String,
    /// Payload delivered to the app.
    #[arg(long)]
    payload: Option<String>,
    /// Deliver silently to the app instead of showing a notification.
    #[arg(long)]
    pass_through: bool,
    /// Notification id; equal ids replace each other on the device.
    #[arg(long)]
    notify_id: Option<i64>,
    /// Schedule delivery this many seconds from now (at most 7 days).
    #[arg(long)]
    delay_secs: Option<u64>,
    /// Restrict to a handset brand (display name or model code).
    #[arg(long, conflicts_with = "price")]
    brand: Option<String>,
    /// Restrict to a handset price bucket: 0-999, 1000-1999, 2000-3999, 4000+.
    #[arg(long, value_parser = parse_price)]
    price: Option<&'static str>,
    /// Extra `key=value` pair, repeatable.
    #[arg(long = "extra", value_parser = parse_key_val)]
    extras: Vec<(String, String)>,
}

impl MessageArgs {
    fn build(&self) -> Result<Message> {
        let mut msg = Message::android(self.title.clone(), self.description.clone())
            .with_pass_through(self.pass_through);
        if let Some(payload) = &self.payload {
            msg = msg.with_payload(payload.clone());
        }
        if let Some(id) = self.notify_id {
            msg = msg.with_notify_id(id);
        }
        if let Some(secs) = self.delay_secs {
            msg = msg.with_send_delay(Duration::from_secs(secs));
        }
        if let Some(brand) = &self.brand {
            msg = msg.with_extra("model", resolve_brand(brand)?);
        }
        if let Some(price) = self.price {
            msg = msg.with_extra("model", price);
        }
        for (key, value) in &self.extras {
            msg = msg.with_extra(key.clone(), value.clone());
        }
        Ok(msg)
    }
}

fn resolve_brand(brand: &str) -> Result<&str> {
    if let Some(code) = brand_code(brand) {
        return Ok(code);
    }
    if BRANDS.iter().any(|(_, code)| *code == brand) {
        return Ok(brand);
    }
    bail!("unknown brand: {brand}")
}

fn parse_price(s: &str) -> Result<&'static str, String> {
    price_range(s).ok_or_else(|| {
        format!(
            "unknown price range {s:?}, expected one of {}",
            PRICE_RANGES.join(", ")
        )
    })
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got {s:?}"))?;
    if key.is_empty() {
        return Err(format!("empty key in {s:?}"));
    }
    Ok((key.to_string(), value.to_string()))
}

fn load_settings(path: Option<&PathBuf>) -> Result<PushSettings> {
    match path {
        Some(path) => mipush_settings::load_settings_from_path(path)
            .with_context(|| format!("Failed to load settings from {}", path.display())),
        None => mipush_settings::load_settings().context("Failed to load settings"),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run(command: Command, settings: &PushSettings, cancel: &CancellationToken) -> Result<()> {
    let client = MiPushClient::new(settings).context("Failed to create push client")?;

    match command {
        Command::Send { reg_ids, message } => {
            let msg = message.build()?;
            let result = if let [reg_id] = reg_ids.as_slice() {
                client.send(&msg, reg_id, cancel).await?
            } else {
                client.send_to_list(&msg, &reg_ids, cancel).await?
            };
            print_json(&result)
        }
        Command::SendAlias { aliases, message } => {
            let msg = message.build()?;
            let result = if let [alias] = aliases.as_slice() {
                client.send_to_alias(&msg, alias, cancel).await?
            } else {
                client.send_to_alias_list(&msg, &aliases, cancel).await?
            };
            print_json(&result)
        }
        Command::SendAccount { accounts, message } => {
            let msg = message.build()?;
            let result = if let [account] = accounts.as_slice() {
                client.send_to_user_account(&msg, account, cancel).await?
            } else {
                client.send_to_user_account_list(&msg, &accounts, cancel).await?
            };
            print_json(&result)
        }
        Command::Broadcast { topics, op, message } => {
            let msg = message.build()?;
            print_json(&client.multi_topic_broadcast(&msg, &topics, op, cancel).await?)
        }
        Command::BroadcastAll { message } => {
            let msg = message.build()?;
            print_json(&client.broadcast_all(&msg, cancel).await?)
        }
        Command::Status {
            msg_id,
            job_key,
            begin,
            end,
        } => match (msg_id, job_key, begin, end) {
            (Some(id), None, None, None) => print_json(&client.message_status(&id, cancel).await?),
            (None, Some(key), None, None) => {
                print_json(&client.message_status_by_job_key(&key, cancel).await?)
            }
            (None, None, Some(begin), Some(end)) => {
                print_json(&client.message_status_period(begin, end, cancel).await?)
            }
            _ => bail!("status needs a message id, --job-key, or --begin with --end"),
        },
        Command::Stats {
            start,
            end,
            package,
        } => {
            let package = package
                .or_else(|| settings.package_names.first().cloned())
                .context("stats needs --package when no package is configured")?;
            print_json(&client.stats(&start, &end, &package, cancel).await?)
        }
        Command::InvalidRegids => print_json(&client.invalid_registration_ids(cancel).await?),
        Command::Aliases { reg_id } => print_json(&client.aliases_of(&reg_id, cancel).await?),
        Command::Topics { reg_id } => print_json(&client.topics_of(&reg_id, cancel).await?),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    if args.json_logs {
        mipush_core::logging::init_json_subscriber(&args.log_level);
    } else {
        mipush_core::logging::init_subscriber(&args.log_level);
    }

    let settings = load_settings(args.settings.as_ref())?;
    tracing::debug!(?settings, "settings loaded");

    let cancel = CancellationToken::new();
    let ctrl_c_token = cancel.clone();
    drop(tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received, cancelling");
            ctrl_c_token.cancel();
        }
    }));

    run(args.command, &settings, &cancel).await
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("mipush").chain(args.iter().copied())).unwrap()
    }

    // ── argument parsing ────────────────────────────────────────────

    #[test]
    fn send_with_message_options() {
        let cli = parse(&[
            "send",
            "r1",
            "r2",
            "--title",
            "Hi",
            "--description",
            "Body",
            "--extra",
            "k=v",
            "--log-level",
            "debug",
        ]);
        assert_eq!(cli.log_level, "debug");
        assert_matches!(cli.command, Command::Send { ref reg_ids, ref message } => {
            assert_eq!(reg_ids, &vec!["r1".to_string(), "r2".to_string()]);
            assert_eq!(message.title, "Hi");
            assert_eq!(message.extras, vec![("k".to_string(), "v".to_string())]);
        });
    }

    #[test]
    fn broadcast_parses_operator() {
        let cli = parse(&["broadcast", "a", "b", "--op", "except", "--description", "d"]);
        assert_matches!(cli.command, Command::Broadcast { op: TopicOp::Except, .. });
    }

    #[test]
    fn send_requires_description() {
        let result = Cli::try_parse_from(["mipush", "send", "r1"]);
        assert!(result.is_err());
    }

    #[test]
    fn status_begin_requires_end() {
        assert!(Cli::try_parse_from(["mipush", "status", "--begin", "1"]).is_err());
        let cli = parse(&["status", "--begin", "1", "--end", "2"]);
        assert_matches!(cli.command, Command::Status { begin: Some(1), end: Some(2), .. });
    }

    #[test]
    fn global_settings_flag() {
        let cli = parse(&["--settings", "/tmp/s.json", "invalid-regids"]);
        assert_eq!(cli.settings, Some(PathBuf::from("/tmp/s.json")));
        assert_matches!(cli.command, Command::InvalidRegids);
    }

    // ── message building ────────────────────────────────────────────

    #[test]
    fn build_message_applies_options() {
        let cli = parse(&[
            "broadcast-all",
            "--description",
            "d",
            "--payload",
            "p",
            "--pass-through",
            "--notify-id",
            "9",
            "--brand",
            "小米",
        ]);
        let Command::BroadcastAll { message } = cli.command else {
            panic!("wrong command");
        };
        let msg = message.build().unwrap();
        assert_eq!(msg.payload(), "p");
        assert!(msg.pass_through());
        assert_eq!(msg.notify_id(), 9);
        assert_eq!(msg.extra().get("model").map(String::as_str), brand_code("小米"));
    }

    #[test]
    fn brand_accepts_code_and_rejects_unknown() {
        let (_, code) = BRANDS[1];
        assert_eq!(resolve_brand(code).unwrap(), code);
        assert!(resolve_brand("no-such-brand").is_err());
    }

    #[test]
    fn price_fills_model_filter() {
        let cli = parse(&["send", "r1", "--description", "d", "--price", "2000-3999"]);
        let Command::Send { message, .. } = cli.command else {
            panic!("wrong command");
        };
        let msg = message.build().unwrap();
        assert_eq!(msg.extra().get("model").map(String::as_str), Some("2000-3999"));
    }

    #[test]
    fn price_rejects_unknown_bucket_and_brand_together() {
        assert!(Cli::try_parse_from(["mipush", "send", "r1", "--description", "d", "--price", "5000+"]).is_err());
        assert!(
            Cli::try_parse_from([
                "mipush", "send", "r1", "--description", "d", "--price", "4000+", "--brand", "OPPO",
            ])
            .is_err()
        );
    }

    #[test]
    fn key_val_parsing() {
        assert_eq!(parse_key_val("a=b=c").unwrap(), ("a".into(), "b=c".into()));
        assert!(parse_key_val("novalue").is_err());
        assert!(parse_key_val("=v").is_err());
    }
}
