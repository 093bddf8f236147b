//! Chat command handling.
//!
//! Parses `!farm <id>` messages and answers them with an embed-like
//! [`Reply`] built from the farm's report. Callers are rate limited by a
//! [`CooldownTracker`] shared with the HTTP API.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::cooldown::{wait_secs, CooldownTracker};
use crate::fetch::{FarmSource, FetchError};
use crate::models::Category;
use crate::report::FarmReport;
use crate::validate::validate;

/// Word that starts a farm command.
pub const COMMAND_PREFIX: &str = "!farm";

/// Embed accent colour.
pub const EMBED_COLOR: u32 = 0x00cc66;

pub const MISSING_ID_REPLY: &str = "❌ Please provide a farm ID.";
pub const INVALID_ID_REPLY: &str = "❌ Farm IDs may only contain letters and digits.";
pub const SCHEMA_MISMATCH_REPLY: &str =
    "⚠️ Failed to parse farm data (schema mismatch). Please check the farm ID.";
pub const FETCH_FAILED_REPLY: &str = "⚠️ Failed to fetch or parse data.";

/// Why a message could not be turned into a [`FarmCommand`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("message is not a farm command")]
    NotACommand,

    #[error("farm command is missing a farm id")]
    MissingFarmId,
}

/// A parsed `!farm <id>` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FarmCommand {
    pub farm_id: String,
}

impl FarmCommand {
    /// Parse a chat message. Anything after the farm id is ignored.
    pub fn parse(content: &str) -> Result<Self, CommandError> {
        let mut words = content.split_whitespace();
        if words.next() != Some(COMMAND_PREFIX) {
            return Err(CommandError::NotACommand);
        }

        match words.next() {
            Some(id) => Ok(Self {
                farm_id: id.to_string(),
            }),
            None => Err(CommandError::MissingFarmId),
        }
    }
}

/// One titled block of an embed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/// Rich reply shaped like a chat embed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Embed {
    pub title: String,
    pub color: u32,
    pub fields: Vec<EmbedField>,
}

impl Embed {
    /// Render a farm report: one field per category, then one per
    /// non-empty order summary.
    pub fn from_report(farm_id: &str, report: &FarmReport) -> Self {
        let mut fields = vec![
            EmbedField {
                name: "Coins".to_string(),
                value: report.coins.to_string(),
                inline: true,
            },
            EmbedField {
                name: "Balance".to_string(),
                value: format!("{} SFL", report.balance),
                inline: true,
            },
        ];

        fields.extend(Category::ALL.into_iter().map(|category| EmbedField {
            name: category.title().to_string(),
            value: report.section_text(category),
            inline: false,
        }));

        // Summary lines start with their own header.
        for summary in [&report.coin_orders, &report.sfl_orders] {
            if let Some((header, lines)) = summary.split_first() {
                fields.push(EmbedField {
                    name: header.clone(),
                    value: lines.join("\n"),
                    inline: false,
                });
            }
        }

        Self {
            title: format!("🌾 Farm Status: {}", farm_id),
            color: EMBED_COLOR,
            fields,
        }
    }

    pub fn field(&self, name: &str) -> Option<&EmbedField> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// What the bot answers with.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Reply {
    Text { content: String },
    Embed(Embed),
}

impl Reply {
    pub fn text(content: impl Into<String>) -> Self {
        Reply::Text {
            content: content.into(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Reply::Text { content } => Some(content),
            Reply::Embed(_) => None,
        }
    }

    pub fn as_embed(&self) -> Option<&Embed> {
        match self {
            Reply::Embed(embed) => Some(embed),
            Reply::Text { .. } => None,
        }
    }
}

/// Text shown to a caller who is still cooling down.
pub fn cooldown_reply(remaining: std::time::Duration) -> Reply {
    Reply::text(format!(
        "⏳ Please wait {}s before checking another farm.",
        wait_secs(remaining)
    ))
}

fn fetch_error_reply(err: &FetchError) -> Reply {
    match err {
        FetchError::InvalidFarmId(_) => Reply::text(INVALID_ID_REPLY),
        _ => match err.status() {
            Some(status) => Reply::text(format!(
                "❌ Failed to fetch farm data (status: {})",
                status
            )),
            None => Reply::text(FETCH_FAILED_REPLY),
        },
    }
}

/// Answers chat messages. Cheap to clone; clones share the source and the
/// cooldown tracker.
#[derive(Clone)]
pub struct Dispatcher {
    source: Arc<dyn FarmSource>,
    cooldowns: Arc<RwLock<CooldownTracker>>,
}

impl Dispatcher {
    pub fn new(source: Arc<dyn FarmSource>, cooldowns: Arc<RwLock<CooldownTracker>>) -> Self {
        Self { source, cooldowns }
    }

    /// Dispatcher with its own tracker.
    pub fn with_window(source: Arc<dyn FarmSource>, window: std::time::Duration) -> Self {
        Self::new(source, Arc::new(RwLock::new(CooldownTracker::new(window))))
    }

    /// Answer one message. `None` means the message was not meant for us.
    pub async fn handle(&self, author: &str, content: &str, now: DateTime<Utc>) -> Option<Reply> {
        let command = match FarmCommand::parse(content) {
            Ok(command) => command,
            Err(CommandError::NotACommand) => return None,
            Err(CommandError::MissingFarmId) => return Some(Reply::text(MISSING_ID_REPLY)),
        };

        {
            let mut cooldowns = self.cooldowns.write().await;
            cooldowns.prune(now);
            if let Err(remaining) = cooldowns.check(author, now) {
                info!("{} is cooling down for {:?}", author, remaining);
                return Some(cooldown_reply(remaining));
            }
        }

        Some(self.farm_reply(&command.farm_id, now).await)
    }

    async fn farm_reply(&self, farm_id: &str, now: DateTime<Utc>) -> Reply {
        info!("Looking up farm {} via {}", farm_id, self.source.name());

        let raw = match self.source.fetch_farm(farm_id).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Fetching farm {} failed: {}", farm_id, e);
                return fetch_error_reply(&e);
            }
        };

        match validate(&raw) {
            Ok(doc) => {
                let report = FarmReport::build(&doc, now.timestamp_millis());
                Reply::Embed(Embed::from_report(farm_id, &report))
            }
            Err(e) => {
                warn!("Farm {} rejected: {}", farm_id, e);
                Reply::text(SCHEMA_MISMATCH_REPLY)
            }
        }
    }
}
