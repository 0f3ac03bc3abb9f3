//! labsite - renderer for the AI Experimental Lab static site.
//!
//! Renders experiment cards, lab log entries and external blog cards into a
//! page model, resolves blog thumbnails through OGP metadata, and drives the
//! detail modal and the light/dark theme.

pub mod config;
pub mod dom;
pub mod error;
pub mod modal;
pub mod models;
pub mod ogp;
pub mod posts;
pub mod preferences;
pub mod render;
pub mod site;
pub mod templates;
pub mod theme;
pub mod utils;

pub use config::Config;
pub use dom::Document;
pub use error::{ConfigError, SiteError};
pub use site::{BootstrapReport, Site, SiteBuilder, UiEvent};
pub use theme::Theme;
