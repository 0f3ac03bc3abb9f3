//! Modal preview command.

use std::path::PathBuf;

use console::style;

use labsite::config::Config;
use labsite::site::UiEvent;
use labsite::templates::render_page;

use crate::cli::helpers::{bootstrap_site, write_output};

pub async fn cmd_show(
    config: &Config,
    id: &str,
    plain: bool,
    page: Option<PathBuf>,
) -> anyhow::Result<()> {
    let (mut site, mut doc) = bootstrap_site(config, plain).await?;
    site.dispatch(&mut doc, UiEvent::CardClick(id.to_string()))?;

    if !site.modal().is_open() {
        println!("{} No experiment card with id {}", style("✗").red(), id);
        return Ok(());
    }

    if let Some(modal) = doc.modal() {
        println!("{} {}", style(&modal.date).dim(), style(&modal.title).bold());
        if let Some(image) = &modal.header_image {
            println!("  image: {}", image.src);
        }
        println!();
        println!("{}", modal.body_html);
    }

    if let Some(path) = page {
        write_output(&path, &render_page(&config.title, &doc))?;
        println!("{} Wrote {}", style("✓").green(), path.display());
    }
    Ok(())
}
