//! Full page rendering command.

use std::path::PathBuf;

use console::style;

use labsite::config::Config;
use labsite::templates::render_page;

use crate::cli::helpers::{bootstrap_site, write_output};

pub async fn cmd_render(
    config: &Config,
    output: Option<PathBuf>,
    plain: bool,
) -> anyhow::Result<()> {
    let (site, doc) = bootstrap_site(config, plain).await?;
    let output = output.unwrap_or_else(|| config.output.clone());
    write_output(&output, &render_page(&config.title, &doc))?;

    println!(
        "{} Rendered {} ({} theme)",
        style("✓").green(),
        output.display(),
        site.theme().current()
    );
    Ok(())
}
