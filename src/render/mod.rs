//! Markup produced for the page containers and the modal.

pub mod cards;
pub mod markdown;

pub use cards::{
    render_experiments, render_external_posts, render_logs, tag_list, ExternalCard, ExternalGrid,
    Thumbnail,
};
pub use markdown::{render_markdown, CommonMark, MarkdownConverter};
