//! Post collection command.

use console::style;

use labsite::config::Config;
use labsite::posts::{write_experiments, PostCollector};

pub async fn cmd_build(config: &Config) -> anyhow::Result<()> {
    println!(
        "{} Collecting posts from {}",
        style("→").cyan(),
        config.posts_dir.display()
    );

    let collector = PostCollector::new(&config.root_dir, &config.posts_dir);
    let experiments = collector.collect()?;
    write_experiments(&config.data_file, &experiments)?;

    println!(
        "{} Wrote {} experiment(s) to {}",
        style("✓").green(),
        experiments.len(),
        config.data_file.display()
    );
    Ok(())
}
