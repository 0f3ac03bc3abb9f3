//! Experiment detail modal.

use std::fmt::Write as _;

use tracing::debug;

use crate::dom::{ids, Document, ModalImage};
use crate::error::SiteError;
use crate::models::{DetailBody, Experiment, Link};
use crate::render::{render_markdown, tag_list, MarkdownConverter};
use crate::utils::html_escape;

/// Modal visibility.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ModalState {
    #[default]
    Closed,
    Open,
}

/// Keyboard keys the page reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` name.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Escape" | "Esc" => Key::Escape,
            _ => Key::Other,
        }
    }
}

/// Drives the modal between closed and open.
#[derive(Debug, Default)]
pub struct ModalController {
    state: ModalState,
    shown: Option<String>,
}

fn legacy_section(heading: &str, text: Option<&str>, md: Option<&dyn MarkdownConverter>) -> String {
    text.map(|text| {
        format!(
            r#"<div class="modal-section"><h4>{}</h4><p>{}</p></div>"#,
            heading,
            render_markdown(md, text)
        )
    })
    .unwrap_or_default()
}

fn links_html(links: &[Link]) -> String {
    if links.is_empty() {
        return r#"<span class="modal-links-empty">No links available</span>"#.to_string();
    }
    links.iter().fold(String::new(), |mut out, link| {
        let _ = write!(
            out,
            r#"
            <a href="{}" target="_blank" rel="noopener" class="modal-link-btn">
                {} ↗
            </a>"#,
            html_escape(&link.url),
            html_escape(&link.label)
        );
        out
    })
}

/// Build the modal body markup for `exp`.
pub fn modal_body(exp: &Experiment, md: Option<&dyn MarkdownConverter>) -> String {
    let mut body = match exp.detail.body() {
        DetailBody::Content(content) => format!(
            r#"<div class="modal-markdown">{}</div>"#,
            render_markdown(md, content)
        ),
        DetailBody::Legacy { goal, steps, result } => [
            legacy_section("Goal", goal, md),
            legacy_section("Steps / Method", steps, md),
            legacy_section("Result / Learning", result, md),
        ]
        .concat(),
    };

    let _ = write!(
        body,
        r#"<div class="modal-section"><h4>Links</h4><div id="{}" class="modal-links">{}</div></div>"#,
        ids::MODAL_LINKS,
        links_html(&exp.detail.links)
    );
    body
}

impl ModalController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ModalState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == ModalState::Open
    }

    /// Id of the experiment currently displayed.
    pub fn shown(&self) -> Option<&str> {
        self.shown.as_deref()
    }

    /// Check the modal wiring. A page without a modal is fine; a modal
    /// without its close control or overlay is not.
    pub fn init(&self, doc: &Document) -> Result<(), SiteError> {
        let Some(modal) = doc.modal() else {
            debug!("No modal on page");
            return Ok(());
        };
        if !modal.has_close_control {
            return Err(SiteError::MissingElement(ids::MODAL_CLOSE));
        }
        if !modal.has_overlay {
            return Err(SiteError::MissingElement(ids::MODAL_OVERLAY));
        }
        Ok(())
    }

    /// Show `exp`, replacing whatever the modal displayed before.
    pub fn open(
        &mut self,
        doc: &mut Document,
        exp: &Experiment,
        md: Option<&dyn MarkdownConverter>,
    ) -> Result<(), SiteError> {
        let body = modal_body(exp, md);
        let modal = doc
            .modal_mut()
            .ok_or(SiteError::MissingElement(ids::MODAL))?;

        modal.date = exp.date.clone();
        modal.title = exp.title.clone();
        modal.header_image = exp.image().map(|src| ModalImage {
            src: src.to_string(),
            alt: exp.title.clone(),
        });
        modal.tags_html = tag_list(&exp.tags);
        modal.body_html = body;
        modal.active = true;
        doc.set_scroll_locked(true);

        self.state = ModalState::Open;
        self.shown = Some(exp.id.clone());
        debug!("Opened modal for {}", exp.id);
        Ok(())
    }

    /// Hide the modal and restore scrolling. No-op when already closed.
    pub fn close(&mut self, doc: &mut Document) {
        if self.state == ModalState::Closed {
            return;
        }
        if let Some(modal) = doc.modal_mut() {
            modal.active = false;
        }
        doc.set_scroll_locked(false);
        self.state = ModalState::Closed;
        self.shown = None;
    }

    /// Handle a key press. Escape closes an open modal.
    pub fn handle_key(&mut self, doc: &mut Document, key: Key) {
        if key == Key::Escape && self.is_open() {
            self.close(doc);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Detail;
    use crate::render::CommonMark;

    fn legacy(goal: Option<&str>, steps: Option<&str>, result: Option<&str>) -> Experiment {
        Experiment {
            id: "exp-000".to_string(),
            title: "Legacy".to_string(),
            date: "2024-05-01".to_string(),
            tags: vec![],
            summary: String::new(),
            image: Some("images/old.png".to_string()),
            detail: Detail {
                goal: goal.map(str::to_string),
                steps: steps.map(str::to_string),
                result: result.map(str::to_string),
                links: vec![Link {
                    label: "GitHub".to_string(),
                    url: "https://github.com/example/repo".to_string(),
                }],
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_content_renders_single_block() {
        let mut exp = legacy(Some("g"), Some("s"), Some("r"));
        exp.detail.content = Some("## Notes\n\n*done*".to_string());
        let body = modal_body(&exp, Some(&CommonMark));

        assert_eq!(body.matches(r#"class="modal-markdown""#).count(), 1);
        assert!(body.contains("<h2>Notes</h2>"));
        assert!(!body.contains("<h4>Goal</h4>"));
        assert!(!body.contains("<h4>Result / Learning</h4>"));
    }

    #[test]
    fn test_legacy_sections_only_for_present_fields() {
        let all = modal_body(&legacy(Some("g"), Some("s"), Some("r")), Some(&CommonMark));
        assert!(all.contains("<h4>Goal</h4>"));
        assert!(all.contains("<h4>Steps / Method</h4>"));
        assert!(all.contains("<h4>Result / Learning</h4>"));
        assert!(!all.contains("modal-markdown"));

        let partial = modal_body(&legacy(Some("g"), None, Some("r")), Some(&CommonMark));
        assert!(partial.contains("<h4>Goal</h4>"));
        assert!(!partial.contains("<h4>Steps / Method</h4>"));
        assert!(partial.contains("<h4>Result / Learning</h4>"));
    }

    #[test]
    fn test_links_section() {
        let body = modal_body(&legacy(None, None, None), None);
        assert!(body.contains(r#"href="https://github.com/example/repo" target="_blank""#));
        assert!(body.contains("GitHub ↗"));

        let mut exp = legacy(None, None, None);
        exp.detail.links.clear();
        assert!(modal_body(&exp, None).contains("No links available"));
    }

    #[test]
    fn test_open_replaces_header_image_and_locks_scroll() {
        let mut doc = Document::standard();
        let mut modal = ModalController::new();

        let with_image = legacy(Some("g"), None, None);
        modal.open(&mut doc, &with_image, None).unwrap();
        assert_eq!(
            doc.modal().unwrap().header_image.as_ref().map(|i| i.src.as_str()),
            Some("images/old.png")
        );
        assert!(doc.is_scroll_locked());

        let mut without_image = legacy(None, None, Some("r"));
        without_image.id = "exp-002".to_string();
        without_image.image = None;
        modal.open(&mut doc, &without_image, None).unwrap();
        assert!(doc.modal().unwrap().header_image.is_none());
        assert_eq!(modal.shown(), Some("exp-002"));
        assert_eq!(modal.state(), ModalState::Open);
    }

    #[test]
    fn test_escape_when_closed_is_noop() {
        let mut doc = Document::standard();
        let mut modal = ModalController::new();
        modal.handle_key(&mut doc, Key::Escape);
        assert_eq!(modal.state(), ModalState::Closed);
        assert!(!doc.is_scroll_locked());
    }

    #[test]
    fn test_escape_closes_open_modal() {
        let mut doc = Document::standard();
        let mut modal = ModalController::new();
        modal.open(&mut doc, &legacy(Some("g"), None, None), None).unwrap();

        modal.handle_key(&mut doc, Key::Other);
        assert!(modal.is_open());

        modal.handle_key(&mut doc, Key::from_name("Escape"));
        assert_eq!(modal.state(), ModalState::Closed);
        assert!(!doc.is_scroll_locked());
        assert!(!doc.modal().unwrap().active);
    }

    #[test]
    fn test_open_without_modal_fails() {
        let mut doc = Document::new();
        let mut modal = ModalController::new();
        let err = modal
            .open(&mut doc, &legacy(None, None, None), None)
            .unwrap_err();
        assert!(matches!(err, SiteError::MissingElement("experiment-modal")));
        assert!(!doc.is_scroll_locked());
    }

    #[test]
    fn test_init_requires_close_control_and_overlay() {
        let modal = ModalController::new();
        assert!(modal.init(&Document::new()).is_ok());
        assert!(modal.init(&Document::standard()).is_ok());

        let broken = Document::new().with_modal(crate::dom::ModalElements {
            has_overlay: false,
            ..Default::default()
        });
        assert!(matches!(
            modal.init(&broken),
            Err(SiteError::MissingElement("modal-overlay"))
        ));
    }
}
