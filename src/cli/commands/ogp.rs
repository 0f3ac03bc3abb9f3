//! OGP thumbnail lookup command.

use console::style;

use labsite::config::Config;
use labsite::ogp::{MicrolinkClient, OgpResolver};

pub async fn cmd_ogp(config: &Config, url: &str) -> anyhow::Result<()> {
    let client = MicrolinkClient::new(
        config.ogp.endpoint.clone(),
        &config.ogp.user_agent,
        config.ogp.timeout(),
    )?;
    let resolver = OgpResolver::new(client);

    match resolver.resolve_thumbnail(Some(url)).await {
        Some(image) => println!("{} {}", style("✓").green(), image),
        None => println!(
            "{} No thumbnail for {} (placeholder {} will be used)",
            style("✗").red(),
            url,
            config.placeholder_thumbnail
        ),
    }
    Ok(())
}
