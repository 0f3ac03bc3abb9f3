//! In-memory model of the page elements the renderer touches.
//!
//! Only the fixed set of touchpoints is modeled: the three card containers,
//! the modal skeleton, the theme toggle, the root `data-theme` attribute and
//! the body scroll lock. Any of them may be absent, which is how partial
//! pages are represented.

use std::collections::HashMap;

use crate::theme::Theme;

/// Element identifiers shared with the page template.
pub mod ids {
    pub const EXPERIMENTS_GRID: &str = "experiments-grid";
    pub const LAB_LOG_LIST: &str = "lab-log-list";
    pub const EXTERNAL_GRID: &str = "cdle-grid";
    pub const MODAL: &str = "experiment-modal";
    pub const MODAL_CLOSE: &str = "modal-close";
    pub const MODAL_OVERLAY: &str = "modal-overlay";
    pub const MODAL_DATE: &str = "modal-date";
    pub const MODAL_TITLE: &str = "modal-title";
    pub const MODAL_TAGS: &str = "modal-tags";
    pub const MODAL_BODY: &str = "modal-body";
    pub const MODAL_LINKS: &str = "modal-links";
    pub const THEME_TOGGLE: &str = "theme-toggle";
}

/// Card containers filled by the renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Container {
    ExperimentsGrid,
    LabLogList,
    ExternalGrid,
}

impl Container {
    pub const ALL: [Container; 3] = [
        Container::ExperimentsGrid,
        Container::LabLogList,
        Container::ExternalGrid,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Container::ExperimentsGrid => ids::EXPERIMENTS_GRID,
            Container::LabLogList => ids::LAB_LOG_LIST,
            Container::ExternalGrid => ids::EXTERNAL_GRID,
        }
    }
}

/// A container element: its markup plus the card ids that respond to clicks.
#[derive(Debug, Clone, Default)]
pub struct Element {
    inner_html: String,
    click_targets: Vec<String>,
}

impl Element {
    pub fn inner_html(&self) -> &str {
        &self.inner_html
    }

    /// Replace the markup. Click targets registered for the old markup are dropped.
    pub fn set_inner_html(&mut self, html: String) {
        self.inner_html = html;
        self.click_targets.clear();
    }

    pub fn register_click_target(&mut self, data_id: impl Into<String>) {
        self.click_targets.push(data_id.into());
    }

    pub fn is_click_target(&self, data_id: &str) -> bool {
        self.click_targets.iter().any(|id| id == data_id)
    }
}

/// Header image shown at the top of the modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalImage {
    pub src: String,
    pub alt: String,
}

/// The modal skeleton.
#[derive(Debug, Clone)]
pub struct ModalElements {
    /// Mirrors the `active` class on the modal root.
    pub active: bool,
    pub date: String,
    pub title: String,
    pub header_image: Option<ModalImage>,
    pub tags_html: String,
    pub body_html: String,
    pub has_close_control: bool,
    pub has_overlay: bool,
}

impl Default for ModalElements {
    fn default() -> Self {
        Self {
            active: false,
            date: String::new(),
            title: String::new(),
            header_image: None,
            tags_html: String::new(),
            body_html: String::new(),
            has_close_control: true,
            has_overlay: true,
        }
    }
}

/// The theme toggle button and its icon glyph.
#[derive(Debug, Clone)]
pub struct ThemeToggle {
    pub icon: String,
}

impl Default for ThemeToggle {
    fn default() -> Self {
        Self {
            icon: Theme::Light.icon().to_string(),
        }
    }
}

/// The page being rendered.
#[derive(Debug, Clone, Default)]
pub struct Document {
    data_theme: Option<Theme>,
    scroll_locked: bool,
    containers: HashMap<Container, Element>,
    modal: Option<ModalElements>,
    theme_toggle: Option<ThemeToggle>,
}

impl Document {
    /// An empty page with no touchpoints.
    pub fn new() -> Self {
        Self::default()
    }

    /// The full page layout produced by the page template.
    pub fn standard() -> Self {
        let mut doc = Self::new()
            .with_modal(ModalElements::default())
            .with_theme_toggle();
        for container in Container::ALL {
            doc = doc.with_container(container);
        }
        doc
    }

    pub fn with_container(mut self, container: Container) -> Self {
        self.containers.insert(container, Element::default());
        self
    }

    pub fn with_modal(mut self, modal: ModalElements) -> Self {
        self.modal = Some(modal);
        self
    }

    pub fn with_theme_toggle(mut self) -> Self {
        self.theme_toggle = Some(ThemeToggle::default());
        self
    }

    pub fn container(&self, container: Container) -> Option<&Element> {
        self.containers.get(&container)
    }

    pub fn container_mut(&mut self, container: Container) -> Option<&mut Element> {
        self.containers.get_mut(&container)
    }

    pub fn modal(&self) -> Option<&ModalElements> {
        self.modal.as_ref()
    }

    pub fn modal_mut(&mut self) -> Option<&mut ModalElements> {
        self.modal.as_mut()
    }

    pub fn theme_toggle(&self) -> Option<&ThemeToggle> {
        self.theme_toggle.as_ref()
    }

    pub fn theme_toggle_mut(&mut self) -> Option<&mut ThemeToggle> {
        self.theme_toggle.as_mut()
    }

    /// The root `data-theme` attribute.
    pub fn data_theme(&self) -> Option<Theme> {
        self.data_theme
    }

    pub fn set_data_theme(&mut self, theme: Theme) {
        self.data_theme = Some(theme);
    }

    /// Whether background scrolling is suppressed (`overflow: hidden` on body).
    pub fn is_scroll_locked(&self) -> bool {
        self.scroll_locked
    }

    pub fn set_scroll_locked(&mut self, locked: bool) {
        self.scroll_locked = locked;
    }
}
