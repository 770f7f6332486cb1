//! Runtime configuration, read from a JSON file.

use std::path::Path;

use anyhow::Context as _;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::vim::IllegalTargetPolicy;

/// Which side the keyboard plays
#[derive(
    Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize, JsonSchema, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum PlayAs {
    White,
    Black,
    /// Whoever is to move in the displayed position
    #[default]
    SideToMove,
    /// Piece keys do nothing
    Spectator,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "snake_case")]
pub struct Config {
    pub play_as: PlayAs,
    /// Starting position in FEN, the standard position when absent
    pub start_fen: Option<String>,
    /// What a typed target that is not a legal move does
    pub illegal_target: IllegalTargetPolicy,
    /// Default tracing filter, overridden by RUST_LOG
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            play_as: PlayAs::default(),
            start_fen: None,
            illegal_target: IllegalTargetPolicy::default(),
            log_filter: "vim_chess=info".to_string(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// JSON schema of the config file, pretty printed
    pub fn schema() -> anyhow::Result<String> {
        let schema = schemars::schema_for!(Config);
        serde_json::to_string_pretty(&schema).context("serializing config schema")
    }
}
