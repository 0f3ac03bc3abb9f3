//! Page composition: renders every section and routes UI events.

use tracing::{debug, info};

use crate::config::{Config, DEFAULT_PLACEHOLDER};
use crate::dom::{Container, Document};
use crate::error::SiteError;
use crate::modal::{Key, ModalController};
use crate::models::{find_experiment, Experiment, ExternalPost, LogEntry};
use crate::ogp::{MicrolinkClient, OgpError, OgpResolver};
use crate::preferences::{FilePreferences, MemoryPreferences, PreferenceStore};
use crate::render::{
    render_experiments, render_external_posts, render_logs, CommonMark, ExternalGrid,
    MarkdownConverter,
};
use crate::theme::{Theme, ThemeController};

/// User interaction delivered to the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// Click on an experiment card, identified by its `data-id`.
    CardClick(String),
    CloseClick,
    OverlayClick,
    KeyDown(Key),
    ThemeToggleClick,
}

/// What `bootstrap` rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BootstrapReport {
    pub experiments: usize,
    pub logs: usize,
    pub external_posts: usize,
    pub thumbnails_resolved: usize,
    pub theme: Theme,
}

/// The composed page controller.
///
/// Owns the data collections, the OGP resolver and its cache, the theme
/// and modal controllers, and the optional Markdown converter.
pub struct Site {
    experiments: Option<Vec<Experiment>>,
    logs: Option<Vec<LogEntry>>,
    external_posts: Option<Vec<ExternalPost>>,
    placeholder: String,
    resolver: OgpResolver,
    markdown: Option<Box<dyn MarkdownConverter>>,
    preferences: Box<dyn PreferenceStore + Send>,
    system_prefers_dark: bool,
    modal: ModalController,
    theme: ThemeController,
    external_grid: Option<ExternalGrid>,
}

/// Builder for [`Site`].
///
/// Only the resolver is required. Collections default to absent, Markdown
/// conversion to CommonMark, and preferences to an in-memory store.
pub struct SiteBuilder {
    resolver: OgpResolver,
    experiments: Option<Vec<Experiment>>,
    logs: Option<Vec<LogEntry>>,
    external_posts: Option<Vec<ExternalPost>>,
    placeholder: String,
    markdown: Option<Box<dyn MarkdownConverter>>,
    preferences: Option<Box<dyn PreferenceStore + Send>>,
    system_prefers_dark: bool,
}

impl SiteBuilder {
    pub fn experiments(mut self, experiments: Option<Vec<Experiment>>) -> Self {
        self.experiments = experiments;
        self
    }

    pub fn logs(mut self, logs: Option<Vec<LogEntry>>) -> Self {
        self.logs = logs;
        self
    }

    pub fn external_posts(mut self, posts: Option<Vec<ExternalPost>>) -> Self {
        self.external_posts = posts;
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Set the Markdown converter; `None` shows detail text as plain text.
    pub fn markdown(mut self, converter: Option<Box<dyn MarkdownConverter>>) -> Self {
        self.markdown = converter;
        self
    }

    pub fn preferences(mut self, store: impl PreferenceStore + Send + 'static) -> Self {
        self.preferences = Some(Box::new(store));
        self
    }

    pub fn system_prefers_dark(mut self, dark: bool) -> Self {
        self.system_prefers_dark = dark;
        self
    }

    pub fn build(self) -> Site {
        Site {
            experiments: self.experiments,
            logs: self.logs,
            external_posts: self.external_posts,
            placeholder: self.placeholder,
            resolver: self.resolver,
            markdown: self.markdown,
            preferences: self
                .preferences
                .unwrap_or_else(|| Box::new(MemoryPreferences::new())),
            system_prefers_dark: self.system_prefers_dark,
            modal: ModalController::new(),
            theme: ThemeController::new(),
            external_grid: None,
        }
    }
}

impl Site {
    pub fn builder(resolver: OgpResolver) -> SiteBuilder {
        SiteBuilder {
            resolver,
            experiments: None,
            logs: None,
            external_posts: None,
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            markdown: Some(Box::new(CommonMark)),
            preferences: None,
            system_prefers_dark: false,
        }
    }

    /// Compose a site from configuration: Microlink resolver, file-backed
    /// preferences, and CommonMark unless `plain` is set.
    pub fn from_config(
        config: &Config,
        experiments: Option<Vec<Experiment>>,
        plain: bool,
    ) -> Result<Self, OgpError> {
        let client = MicrolinkClient::new(
            config.ogp.endpoint.clone(),
            &config.ogp.user_agent,
            config.ogp.timeout(),
        )?;
        let markdown: Option<Box<dyn MarkdownConverter>> = if plain {
            None
        } else {
            Some(Box::new(CommonMark))
        };

        Ok(Site::builder(OgpResolver::new(client))
            .experiments(experiments)
            .logs(config.logs.clone())
            .external_posts(config.external_posts.clone())
            .placeholder(config.placeholder_thumbnail.clone())
            .markdown(markdown)
            .preferences(FilePreferences::open(config.preferences_path()))
            .system_prefers_dark(config.theme.prefers_dark)
            .build())
    }

    pub fn modal(&self) -> &ModalController {
        &self.modal
    }

    pub fn theme(&self) -> &ThemeController {
        &self.theme
    }

    pub fn resolver(&self) -> &OgpResolver {
        &self.resolver
    }

    pub fn external_grid(&self) -> Option<&ExternalGrid> {
        self.external_grid.as_ref()
    }

    pub fn experiments(&self) -> Option<&[Experiment]> {
        self.experiments.as_deref()
    }

    /// Render the page and wire its controllers.
    ///
    /// Order: experiments, logs, external posts, theme, modal. Thumbnail
    /// lookups for external posts settle last; they only touch the external
    /// grid. A broken modal skeleton is reported after the lookups finish.
    pub async fn bootstrap(&mut self, doc: &mut Document) -> Result<BootstrapReport, SiteError> {
        let experiments = render_experiments(doc, self.experiments.as_deref());
        let logs = render_logs(doc, self.logs.as_deref());
        let mut grid =
            render_external_posts(doc, self.external_posts.as_deref(), &self.placeholder);

        let theme = self
            .theme
            .init(doc, &*self.preferences, self.system_prefers_dark);
        let modal_ready = self.modal.init(doc);

        let thumbnails_resolved = match grid.as_mut() {
            Some(grid) => self.resolver.resolve_grid(doc, grid).await,
            None => 0,
        };
        let external_posts = grid.as_ref().map_or(0, |g| g.cards().len());
        self.external_grid = grid;

        info!(
            "Rendered {} experiment(s), {} log(s), {} external post(s); {} thumbnail(s) resolved",
            experiments, logs, external_posts, thumbnails_resolved
        );
        modal_ready?;

        Ok(BootstrapReport {
            experiments,
            logs,
            external_posts,
            thumbnails_resolved,
            theme,
        })
    }

    /// Handle one UI event.
    pub fn dispatch(&mut self, doc: &mut Document, event: UiEvent) -> Result<(), SiteError> {
        match event {
            UiEvent::CardClick(id) => self.click_card(doc, &id),
            UiEvent::CloseClick | UiEvent::OverlayClick => {
                self.modal.close(doc);
                Ok(())
            }
            UiEvent::KeyDown(key) => {
                self.modal.handle_key(doc, key);
                Ok(())
            }
            UiEvent::ThemeToggleClick => {
                if doc.theme_toggle().is_none() {
                    debug!("No theme toggle on page");
                    return Ok(());
                }
                self.theme.toggle(doc, &mut *self.preferences)?;
                Ok(())
            }
        }
    }

    /// Open the modal for a rendered card. Unknown ids are ignored.
    fn click_card(&mut self, doc: &mut Document, id: &str) -> Result<(), SiteError> {
        let rendered = doc
            .container(Container::ExperimentsGrid)
            .is_some_and(|grid| grid.is_click_target(id));
        if !rendered {
            debug!("Ignoring click on unknown card {}", id);
            return Ok(());
        }

        let Some(exp) = self
            .experiments
            .as_deref()
            .and_then(|exps| find_experiment(exps, id))
        else {
            debug!("No experiment with id {}", id);
            return Ok(());
        };
        self.modal.open(doc, exp, self.markdown.as_deref())
    }
}
