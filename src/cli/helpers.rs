//! Shared helper functions for CLI commands.

use std::path::Path;

use console::style;

use labsite::config::Config;
use labsite::dom::Document;
use labsite::posts::load_experiments;
use labsite::site::Site;

/// Load experiment data, compose the site and render a full document.
pub async fn bootstrap_site(config: &Config, plain: bool) -> anyhow::Result<(Site, Document)> {
    let experiments = load_experiments(&config.data_file)?;
    if experiments.is_none() {
        println!(
            "{} No experiments data at {} (run `labsite build` first)",
            style("!").yellow(),
            config.data_file.display()
        );
    }

    let mut site = Site::from_config(config, experiments, plain)?;
    let mut doc = Document::standard();
    site.bootstrap(&mut doc).await?;
    Ok((site, doc))
}

/// Write `contents` to `path`, creating parent directories.
pub fn write_output(path: &Path, contents: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, contents)?;
    Ok(())
}
