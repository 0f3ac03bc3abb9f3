//! Image path resolution and optional WebP optimization for posts.

use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::warn;

/// Where optimized images are written, relative to the site root.
pub const WEB_IMAGE_SUBDIR: &str = "posts/web_images";

/// `![alt](path)` image references in Markdown.
static BODY_IMAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(!\[[^\]]*\]\()([^)]+)(\))").unwrap());

/// Whether `path` points off-site and must be left untouched.
pub fn is_external(path: &str) -> bool {
    path.starts_with("http://") || path.starts_with("https://") || path.starts_with("data:")
}

/// Use forward slashes regardless of how the path was written.
pub fn normalize_rel_path(path: &str) -> String {
    path.replace('\\', "/")
}

fn relative_to_root(root: &Path, candidate: &Path) -> Option<String> {
    let candidate = candidate.canonicalize().ok()?;
    let root = root.canonicalize().ok()?;
    let rel = candidate.strip_prefix(&root).ok()?;
    Some(normalize_rel_path(&rel.to_string_lossy()))
}

/// Resolve an image path written in `md_path` to a path relative to `root`.
///
/// Tried relative to the Markdown file first, then relative to the root.
/// If neither exists the root-relative form is returned anyway.
pub fn resolve_image_path(root: &Path, md_path: &Path, raw: &str) -> String {
    let raw = normalize_rel_path(raw.trim());
    if is_external(&raw) {
        return raw;
    }

    let stripped = raw.trim_start_matches(['.', '/']);
    let md_dir = md_path.parent().unwrap_or_else(|| Path::new("."));

    if let Some(rel) = relative_to_root(root, &md_dir.join(stripped)) {
        return rel;
    }
    if let Some(rel) = relative_to_root(root, &root.join(stripped)) {
        return rel;
    }

    warn!("Image not found: {}", root.join(stripped).display());
    stripped.to_string()
}

/// Produces lightweight copies of post images.
///
/// Without the `webp` feature, or when conversion fails, the original
/// root-relative path is kept.
#[derive(Debug, Clone)]
pub struct ImageOptimizer {
    root: PathBuf,
}

impl ImageOptimizer {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Return the web path to use for the root-relative image `rel`.
    pub fn optimize(&self, rel: &str, exp_id: &str) -> String {
        if rel.is_empty() {
            return String::new();
        }
        let rel = normalize_rel_path(rel);
        let rel = rel.trim_start_matches('/');

        if rel.starts_with(WEB_IMAGE_SUBDIR) {
            return rel.to_string();
        }

        let source = self.root.join(rel);
        if source.is_dir() {
            warn!("Image path is a directory: {}", source.display());
            return rel.to_string();
        }
        if !source.exists() {
            warn!("Image not found: {}", source.display());
            return rel.to_string();
        }

        self.convert(&source, rel, exp_id)
            .unwrap_or_else(|| rel.to_string())
    }

    /// Output file name: experiment id (or source stem) plus a short path hash.
    pub fn output_name(rel: &str, exp_id: &str) -> String {
        let base = if exp_id.is_empty() {
            Path::new(rel)
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default()
        } else {
            exp_id.to_string()
        };
        let hash = blake3::hash(rel.as_bytes()).to_hex();
        format!("{}-{}.webp", base, &hash.as_str()[..4])
    }

    /// Encode `source` as WebP and keep it only if it is smaller.
    ///
    /// The `image` encoder is lossless, so photos often come out larger than
    /// their JPEG source; those keep the original file.
    #[cfg(feature = "webp")]
    fn convert(&self, source: &Path, rel: &str, exp_id: &str) -> Option<String> {
        let encoded = match Self::encode_webp(source) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Failed to optimize image {}: {}", source.display(), e);
                return None;
            }
        };
        if !Self::worth_keeping(encoded.len() as u64, source) {
            tracing::debug!("WebP not smaller than {}, keeping original", source.display());
            return None;
        }

        let name = Self::output_name(rel, exp_id);
        let out_dir = self.root.join(WEB_IMAGE_SUBDIR);
        let written = std::fs::create_dir_all(&out_dir)
            .and_then(|_| std::fs::write(out_dir.join(&name), &encoded));
        match written {
            Ok(()) => Some(format!("{}/{}", WEB_IMAGE_SUBDIR, name)),
            Err(e) => {
                warn!("Failed to write optimized image {}: {}", name, e);
                None
            }
        }
    }

    #[cfg(feature = "webp")]
    fn encode_webp(source: &Path) -> Result<Vec<u8>, image::ImageError> {
        let img = image::open(source)?;
        let mut out = std::io::Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(img.to_rgba8())
            .write_to(&mut out, image::ImageFormat::WebP)?;
        Ok(out.into_inner())
    }

    /// Whether an encoded size beats the file at `source`.
    #[cfg(any(feature = "webp", test))]
    fn worth_keeping(encoded_len: u64, source: &Path) -> bool {
        std::fs::metadata(source).map_or(true, |m| encoded_len < m.len())
    }

    #[cfg(not(feature = "webp"))]
    fn convert(&self, _source: &Path, _rel: &str, _exp_id: &str) -> Option<String> {
        None
    }

    /// Rewrite local `![alt](path)` references in `body` to optimized paths.
    pub fn rewrite_body_images<'a>(&self, body: &'a str, md_path: &Path, exp_id: &str) -> Cow<'a, str> {
        BODY_IMAGE.replace_all(body, |caps: &Captures| {
            let path = caps[2].trim();
            if is_external(path) {
                return caps[0].to_string();
            }
            let rel = resolve_image_path(&self.root, md_path, path);
            format!("{}{}{}", &caps[1], self.optimize(&rel, exp_id), &caps[3])
        })
    }
}
