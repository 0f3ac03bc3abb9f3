//! Card markup for experiments, lab logs and external blog posts.
//!
//! Every renderer tolerates a missing collection or a missing container by
//! doing nothing, so partial pages render without errors.

use std::fmt::Write as _;

use tracing::debug;

use crate::dom::{Container, Document};
use crate::models::{Experiment, ExternalPost, LogEntry};
use crate::utils::html_escape;

/// Label shown in the date slot of external post cards.
const EXTERNAL_LABEL: &str = "CDLE Blog";

/// Shown when an external post has no description.
const MISSING_DESC: &str = "CDLEブログの紹介文をここに追加してください。";

/// Render tags as `<span class="tag">` elements.
pub fn tag_list(tags: &[String]) -> String {
    tags.iter().fold(String::new(), |mut out, tag| {
        let _ = write!(out, r#"<span class="tag">{}</span>"#, html_escape(tag));
        out
    })
}

fn experiment_card(exp: &Experiment) -> String {
    let image = exp
        .image()
        .map(|src| {
            format!(
                r#"
            <div class="card-image-container">
                <img src="{}" alt="{}" class="card-image" loading="lazy">
            </div>"#,
                html_escape(src),
                html_escape(&exp.title)
            )
        })
        .unwrap_or_default();

    format!(
        r#"
        <article class="experiment-card" data-id="{id}">{image}
            <div class="card-header">
                <span class="card-date">{date}</span>
                <h3 class="card-title">{title}</h3>
            </div>
            <div class="card-tags">{tags}</div>
            <p class="card-summary">{summary}</p>
            <div class="card-footer">
                <span class="card-link">View Details &rarr;</span>
            </div>
        </article>"#,
        id = html_escape(&exp.id),
        image = image,
        date = html_escape(&exp.date),
        title = html_escape(&exp.title),
        tags = tag_list(&exp.tags),
        summary = html_escape(&exp.summary),
    )
}

/// Render experiment cards into the experiments grid and make each clickable.
///
/// Returns the number of cards rendered.
pub fn render_experiments(doc: &mut Document, experiments: Option<&[Experiment]>) -> usize {
    let (Some(experiments), Some(grid)) =
        (experiments, doc.container_mut(Container::ExperimentsGrid))
    else {
        debug!("Skipping experiments: no data or no grid");
        return 0;
    };

    grid.set_inner_html(experiments.iter().map(experiment_card).collect());
    for exp in experiments {
        grid.register_click_target(exp.id.clone());
    }
    experiments.len()
}

/// Render the lab log list. Log entries are not interactive.
pub fn render_logs(doc: &mut Document, logs: Option<&[LogEntry]>) -> usize {
    let (Some(logs), Some(list)) = (logs, doc.container_mut(Container::LabLogList)) else {
        debug!("Skipping lab logs: no data or no list");
        return 0;
    };

    let html: String = logs
        .iter()
        .map(|log| {
            format!(
                r#"
        <div class="log-item">
            <span class="log-date">{}</span>
            <p class="log-content">{}</p>
        </div>"#,
                html_escape(&log.date),
                html_escape(&log.content)
            )
        })
        .collect();
    list.set_inner_html(html);
    logs.len()
}

/// Thumbnail state of one external post card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Thumbnail {
    /// Set on the post record; never looked up.
    Explicit(String),
    /// Placeholder shown while the OGP image of the URL is unresolved.
    Pending { ogp_url: String },
    /// Placeholder replaced by a resolved OGP image.
    Resolved(String),
}

#[derive(Debug, Clone)]
pub struct ExternalCard {
    pub post: ExternalPost,
    pub thumbnail: Thumbnail,
}

/// External post cards, kept structured so thumbnails can be swapped in
/// after the initial render.
#[derive(Debug, Clone)]
pub struct ExternalGrid {
    cards: Vec<ExternalCard>,
    placeholder: String,
}

impl ExternalGrid {
    pub fn new(posts: &[ExternalPost], placeholder: impl Into<String>) -> Self {
        let cards = posts
            .iter()
            .map(|post| ExternalCard {
                thumbnail: match post.thumb() {
                    Some(thumb) => Thumbnail::Explicit(thumb.to_string()),
                    None => Thumbnail::Pending {
                        ogp_url: post.url.clone(),
                    },
                },
                post: post.clone(),
            })
            .collect();
        Self {
            cards,
            placeholder: placeholder.into(),
        }
    }

    pub fn cards(&self) -> &[ExternalCard] {
        &self.cards
    }

    /// Cards still showing the placeholder, as `(index, url)` pairs.
    pub fn pending(&self) -> Vec<(usize, String)> {
        self.cards
            .iter()
            .enumerate()
            .filter_map(|(i, card)| match &card.thumbnail {
                Thumbnail::Pending { ogp_url } => Some((i, ogp_url.clone())),
                _ => None,
            })
            .collect()
    }

    /// Replace the placeholder of card `index` with a resolved image.
    pub fn set_resolved(&mut self, index: usize, image: String) {
        if let Some(card) = self.cards.get_mut(index) {
            if matches!(card.thumbnail, Thumbnail::Pending { .. }) {
                card.thumbnail = Thumbnail::Resolved(image);
            }
        }
    }

    fn card_html(&self, card: &ExternalCard) -> String {
        let post = &card.post;
        let url = html_escape(&post.url);
        let title = html_escape(&post.title);

        let (src, ogp_attr) = match &card.thumbnail {
            Thumbnail::Explicit(src) | Thumbnail::Resolved(src) => (src.as_str(), String::new()),
            Thumbnail::Pending { ogp_url } => (
                self.placeholder.as_str(),
                format!(r#" data-ogp-url="{}""#, html_escape(ogp_url)),
            ),
        };

        let summary = match post.desc() {
            Some(desc) => html_escape(desc).into_owned(),
            None => format!(r#"<span class="cdle-desc-placeholder">{}</span>"#, MISSING_DESC),
        };

        format!(
            r#"
        <article class="cdle-card experiment-card">
            <a href="{url}" target="_blank" rel="noopener" class="cdle-thumb-link">
                <div class="card-image-container">
                    <img src="{src}"{ogp_attr} alt="{title}" class="card-image cdle-thumb" loading="lazy">
                </div>
            </a>
            <div class="card-header">
                <span class="card-date">{label}</span>
                <h3 class="card-title">{title}</h3>
            </div>
            <p class="card-summary">{summary}</p>
            <div class="card-footer">
                <a class="card-link" href="{url}" target="_blank" rel="noopener">View Details →</a>
            </div>
        </article>"#,
            url = url,
            src = html_escape(src),
            ogp_attr = ogp_attr,
            title = title,
            label = EXTERNAL_LABEL,
            summary = summary,
        )
    }

    pub fn render(&self) -> String {
        self.cards.iter().map(|card| self.card_html(card)).collect()
    }

    /// Write the current markup into the external grid, if the page has one.
    pub fn mount(&self, doc: &mut Document) -> bool {
        match doc.container_mut(Container::ExternalGrid) {
            Some(grid) => {
                grid.set_inner_html(self.render());
                true
            }
            None => false,
        }
    }
}

/// Render external post cards with placeholders for missing thumbnails.
///
/// Returns the grid so pending thumbnails can be resolved and re-mounted;
/// `None` when there is no data or no container.
pub fn render_external_posts(
    doc: &mut Document,
    posts: Option<&[ExternalPost]>,
    placeholder: &str,
) -> Option<ExternalGrid> {
    let posts = posts?;
    let grid = ExternalGrid::new(posts, placeholder);
    if !grid.mount(doc) {
        debug!("Skipping external posts: no grid");
        return None;
    }
    Some(grid)
}
