//! Markdown to HTML conversion for experiment detail text.

use pulldown_cmark::{html, Options, Parser};

use crate::utils::html_escape;

/// Converts lightweight markup into display HTML.
pub trait MarkdownConverter: Send + Sync {
    fn to_html(&self, markdown: &str) -> String;
}

/// CommonMark with the GitHub extensions used in posts.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommonMark;

impl CommonMark {
    fn options() -> Options {
        Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_TASKLISTS
    }
}

impl MarkdownConverter for CommonMark {
    fn to_html(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, Self::options());
        let mut html_output = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut html_output, parser);
        html_output
    }
}

/// Convert `text` with `converter`, or show it as escaped plain text when no
/// converter is available.
pub fn render_markdown(converter: Option<&dyn MarkdownConverter>, text: &str) -> String {
    match converter {
        Some(converter) if !text.is_empty() => converter.to_html(text),
        _ => html_escape(text).into_owned(),
    }
}
