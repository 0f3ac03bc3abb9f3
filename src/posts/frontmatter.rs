//! YAML front matter of Markdown posts.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Deserializer};
use serde_yaml::Value;

use crate::models::Link;

/// Fields read from a post's front matter block.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    #[serde(deserialize_with = "scalar")]
    pub id: Option<String>,
    #[serde(deserialize_with = "scalar")]
    pub title: Option<String>,
    #[serde(deserialize_with = "scalar")]
    pub date: Option<String>,
    #[serde(deserialize_with = "scalar_list")]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "scalar")]
    pub image: Option<String>,
    #[serde(deserialize_with = "scalar")]
    pub summary: Option<String>,
    pub links: Option<Vec<Link>>,
}

fn scalar_to_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Accept any scalar as a string.
fn scalar<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(value.and_then(scalar_to_string).filter(|s| !s.is_empty()))
}

fn scalar_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    let values = Option::<Vec<Value>>::deserialize(d)?;
    Ok(values
        .unwrap_or_default()
        .into_iter()
        .filter_map(scalar_to_string)
        .collect())
}

/// Top-level single-line scalar fields, read as free text.
static SCALAR_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^(id|title|date|image|summary):[ \t]*(\S.*?)[ \t]*$").unwrap()
});

/// Quote plain scalar values so `:` and ` #` inside them stay part of the text.
///
/// Values that already open a YAML quote, flow collection or block scalar
/// are left alone.
fn quote_plain_scalars(yaml: &str) -> Cow<'_, str> {
    SCALAR_LINE.replace_all(yaml, |caps: &Captures| {
        let value = &caps[2];
        if value.starts_with(['"', '\'', '[', '{', '|', '>']) {
            return caps[0].to_string();
        }
        format!("{}: '{}'", &caps[1], value.replace('\'', "''"))
    })
}

/// Split `---\n<front matter>\n---\n<body>` into its parts.
///
/// Returns `None` when the text does not start with a front matter block.
/// The body is trimmed.
pub fn split_front_matter(text: &str) -> Option<(&str, &str)> {
    let rest = text.strip_prefix("---\n")?;
    let end = rest.find("\n---\n").map(|i| (i, i + 5)).or_else(|| {
        rest.strip_suffix("\n---")
            .map(|fm| (fm.len(), rest.len()))
    })?;
    Some((&rest[..end.0], rest[end.1..].trim()))
}

pub fn parse_front_matter(yaml: &str) -> Result<FrontMatter, serde_yaml::Error> {
    if yaml.trim().is_empty() {
        return Ok(FrontMatter::default());
    }
    serde_yaml::from_str(&quote_plain_scalars(yaml))
}

#[cfg(test)]
mod tests {
    use super::*;

    const POST: &str = "---\nid: exp-001\ntitle: RAG baseline\ndate: 2025-11-25\ntags: [LLM, RAG, 2025]\nimage: ./img/cover.png\nsummary: First try\nlinks:\n  - label: GitHub\n    url: https://github.com/example/rag\n---\n\n# Notes\n\nBody text.\n";

    #[test]
    fn test_split_front_matter() {
        let (fm, body) = split_front_matter(POST).unwrap();
        assert!(fm.starts_with("id: exp-001"));
        assert!(fm.ends_with("url: https://github.com/example/rag"));
        assert_eq!(body, "# Notes\n\nBody text.");
    }

    #[test]
    fn test_split_requires_leading_block() {
        assert!(split_front_matter("# Just markdown\n").is_none());
        assert!(split_front_matter("---\nid: x\nno closing fence").is_none());
        assert_eq!(split_front_matter("---\nid: x\n---"), Some(("id: x", "")));
    }

    #[test]
    fn test_parse_fields() {
        let (fm, _) = split_front_matter(POST).unwrap();
        let fm = parse_front_matter(fm).unwrap();
        assert_eq!(fm.id.as_deref(), Some("exp-001"));
        assert_eq!(fm.date.as_deref(), Some("2025-11-25"));
        assert_eq!(fm.tags, vec!["LLM", "RAG", "2025"]);
        assert_eq!(fm.image.as_deref(), Some("./img/cover.png"));
        let links = fm.links.unwrap();
        assert_eq!(links[0].label, "GitHub");
    }

    #[test]
    fn test_missing_and_empty_fields() {
        let fm = parse_front_matter("id: 7\nsummary:\n").unwrap();
        assert_eq!(fm.id.as_deref(), Some("7"));
        assert_eq!(fm.title, None);
        assert_eq!(fm.summary, None);
        assert!(fm.tags.is_empty());
        assert!(fm.links.is_none());
    }

    #[test]
    fn test_plain_scalars_keep_colons_and_hashes() {
        let fm = parse_front_matter(
            "id: 011\ntitle: RAG: first look\nsummary: lr #2 sweep\ntags: [a, b]\n",
        )
        .unwrap();
        assert_eq!(fm.id.as_deref(), Some("011"));
        assert_eq!(fm.title.as_deref(), Some("RAG: first look"));
        assert_eq!(fm.summary.as_deref(), Some("lr #2 sweep"));
        assert_eq!(fm.tags, vec!["a", "b"]);
    }

    #[test]
    fn test_quoted_scalars_are_unchanged() {
        let fm = parse_front_matter("title: \"It's: quoted\"\nsummary: 'a ''b'''\n").unwrap();
        assert_eq!(fm.title.as_deref(), Some("It's: quoted"));
        assert_eq!(fm.summary.as_deref(), Some("a 'b'"));
    }
}
