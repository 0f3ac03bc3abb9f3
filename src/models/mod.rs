//! Data collections rendered by the site.

mod experiment;

pub use experiment::{find_experiment, Detail, DetailBody, Experiment, Link};

use serde::{Deserialize, Serialize};

/// An entry in the lab log list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub date: String,
    pub content: String,
}

/// A blog post hosted elsewhere, shown as a linked card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalPost {
    pub id: String,
    pub title: String,
    pub url: String,
    /// Explicit thumbnail. When absent the OGP image of `url` is looked up.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumb: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
}

impl ExternalPost {
    pub fn thumb(&self) -> Option<&str> {
        self.thumb.as_deref().filter(|s| !s.is_empty())
    }

    pub fn desc(&self) -> Option<&str> {
        self.desc.as_deref().filter(|s| !s.is_empty())
    }
}
