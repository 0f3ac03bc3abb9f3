//! Collects Markdown posts into the experiments data file.
//!
//! Each `*.md` file in the posts directory carries a YAML front matter
//! block and a Markdown body. Files starting with `_` are templates and
//! are skipped. Results are sorted newest first by their `date` string.

mod frontmatter;
mod images;

pub use frontmatter::{parse_front_matter, split_front_matter, FrontMatter};
pub use images::{
    is_external, normalize_rel_path, resolve_image_path, ImageOptimizer, WEB_IMAGE_SUBDIR,
};

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::error::ConfigError;
use crate::models::{Detail, Experiment};

/// Errors raised while collecting posts.
#[derive(Debug, Error)]
pub enum PostError {
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid front matter in {path}: {source}")]
    FrontMatter {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to encode experiments: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Turns a directory of posts into experiment records.
#[derive(Debug, Clone)]
pub struct PostCollector {
    posts_dir: PathBuf,
    optimizer: ImageOptimizer,
}

impl PostCollector {
    pub fn new(root: impl Into<PathBuf>, posts_dir: impl Into<PathBuf>) -> Self {
        Self {
            posts_dir: posts_dir.into(),
            optimizer: ImageOptimizer::new(root),
        }
    }

    /// Parse one post. `Ok(None)` when the file has no front matter.
    pub fn parse_str(&self, text: &str, path: &Path) -> Result<Option<Experiment>, PostError> {
        let text = text.replace("\r\n", "\n");
        let Some((fm_text, body)) = split_front_matter(&text) else {
            warn!("Skipping {}: no front matter found", path.display());
            return Ok(None);
        };

        let fm = parse_front_matter(fm_text).map_err(|source| PostError::FrontMatter {
            path: path.to_path_buf(),
            source,
        })?;

        let id = fm.id.unwrap_or_default();
        let image = fm.image.map(|raw| {
            let rel = resolve_image_path(self.optimizer.root(), path, &raw);
            self.optimizer.optimize(&rel, &id)
        });
        let content = self.optimizer.rewrite_body_images(body, path, &id).into_owned();

        Ok(Some(Experiment {
            title: fm.title.unwrap_or_else(|| "No Title".to_string()),
            date: fm.date.unwrap_or_default(),
            tags: fm.tags,
            image: image.filter(|s| !s.is_empty()),
            summary: fm.summary.unwrap_or_default(),
            detail: Detail {
                links: fm.links.unwrap_or_default(),
                ..Detail::content(content)
            },
            id,
        }))
    }

    pub fn parse_file(&self, path: &Path) -> Result<Option<Experiment>, PostError> {
        let text = fs::read_to_string(path).map_err(|source| PostError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.parse_str(&text, path)
    }

    /// Markdown files in the posts directory, templates excluded, in name order.
    fn post_files(&self) -> Result<Vec<PathBuf>, PostError> {
        let entries = fs::read_dir(&self.posts_dir).map_err(|source| PostError::Io {
            path: self.posts_dir.clone(),
            source,
        })?;

        let mut files: Vec<PathBuf> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "md"))
            .filter(|p| {
                !p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with('_'))
            })
            .collect();
        files.sort();
        Ok(files)
    }

    /// Parse every post, newest first.
    ///
    /// Posts with malformed front matter are skipped with a warning so one
    /// bad file does not block the rest.
    pub fn collect(&self) -> Result<Vec<Experiment>, PostError> {
        let mut experiments = Vec::new();
        for path in self.post_files()? {
            debug!("Processing {}", path.display());
            match self.parse_file(&path) {
                Ok(Some(exp)) => experiments.push(exp),
                Ok(None) => {}
                Err(e @ PostError::FrontMatter { .. }) => warn!("{}", e),
                Err(e) => return Err(e),
            }
        }

        experiments.sort_by(|a, b| b.date.cmp(&a.date));
        info!("Collected {} experiment(s)", experiments.len());
        Ok(experiments)
    }
}

/// Write experiments as pretty-printed JSON.
pub fn write_experiments(path: &Path, experiments: &[Experiment]) -> Result<(), PostError> {
    let json = serde_json::to_string_pretty(experiments)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| PostError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, json).map_err(|source| PostError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the experiments data file. A missing file means no experiment data.
pub fn load_experiments(path: &Path) -> Result<Option<Vec<Experiment>>, ConfigError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("No experiments data at {}", path.display());
            return Ok(None);
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    serde_json::from_str(&text)
        .map(Some)
        .map_err(|source| ConfigError::Data {
            path: path.to_path_buf(),
            source,
        })
}
