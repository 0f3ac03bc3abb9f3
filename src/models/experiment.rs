//! Experiment records shown as cards and in the detail modal.

use serde::{Deserialize, Serialize};

/// A single experiment card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experiment {
    pub id: String,
    pub title: String,
    pub date: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub summary: String,
    /// Thumbnail URL. The post collector writes an empty string when a post
    /// has no image, so empty is treated the same as absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub detail: Detail,
}

impl Experiment {
    /// The image URL, if one is set and non-empty.
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref().filter(|s| !s.is_empty())
    }
}

/// An external link attached to an experiment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub label: String,
    pub url: String,
}

/// Detail payload rendered in the modal.
///
/// Either carries a unified Markdown `content` string or the older
/// goal/steps/result fields. When `content` is present it always wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Detail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(default)]
    pub links: Vec<Link>,
}

/// The body shape selected for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailBody<'a> {
    Content(&'a str),
    Legacy {
        goal: Option<&'a str>,
        steps: Option<&'a str>,
        result: Option<&'a str>,
    },
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

impl Detail {
    /// Build a content-only detail.
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Default::default()
        }
    }

    /// Select the body shape: unified content if set, legacy fields otherwise.
    pub fn body(&self) -> DetailBody<'_> {
        match non_empty(&self.content) {
            Some(content) => DetailBody::Content(content),
            None => DetailBody::Legacy {
                goal: non_empty(&self.goal),
                steps: non_empty(&self.steps),
                result: non_empty(&self.result),
            },
        }
    }
}

/// Find an experiment by identifier.
pub fn find_experiment<'a>(experiments: &'a [Experiment], id: &str) -> Option<&'a Experiment> {
    experiments.iter().find(|e| e.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_wins_over_legacy_fields() {
        let detail = Detail {
            content: Some("# Notes".to_string()),
            goal: Some("goal".to_string()),
            ..Default::default()
        };
        assert_eq!(detail.body(), DetailBody::Content("# Notes"));
    }

    #[test]
    fn test_empty_content_falls_back_to_legacy() {
        let detail = Detail {
            content: Some(String::new()),
            goal: Some("g".to_string()),
            result: Some("r".to_string()),
            ..Default::default()
        };
        assert_eq!(
            detail.body(),
            DetailBody::Legacy {
                goal: Some("g"),
                steps: None,
                result: Some("r"),
            }
        );
    }

    #[test]
    fn test_empty_image_is_absent() {
        let exp: Experiment = serde_json::from_value(serde_json::json!({
            "id": "exp-001",
            "title": "T",
            "date": "2025-11-25",
            "tags": [],
            "image": "",
            "summary": "",
            "detail": { "content": "x", "links": [] }
        }))
        .unwrap();
        assert_eq!(exp.image(), None);
    }

    #[test]
    fn test_deserialize_legacy_detail() {
        let exp: Experiment = serde_json::from_value(serde_json::json!({
            "id": "exp-000",
            "title": "Old",
            "date": "2024-05-01",
            "detail": { "goal": "g", "steps": "s" }
        }))
        .unwrap();
        assert!(exp.tags.is_empty());
        assert!(exp.detail.links.is_empty());
        assert!(matches!(exp.detail.body(), DetailBody::Legacy { .. }));
    }
}
