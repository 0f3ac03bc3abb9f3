//! CLI parser and command dispatch.

mod build;
mod ogp;
mod render;
mod show;
mod theme;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use labsite::config::Config;

#[derive(Parser)]
#[command(name = "labsite")]
#[command(about = "Renderer and post collector for the AI Experimental Lab site")]
#[command(version)]
pub struct Cli {
    /// Config file path (defaults to ./labsite.toml if present)
    #[arg(short, long, global = true, env = "LABSITE_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Collect Markdown posts into the experiments data file
    Build,

    /// Render the full page to HTML
    Render {
        /// Output file (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Show detail text as plain text instead of converting Markdown
        #[arg(long)]
        plain: bool,
    },

    /// Open an experiment's detail modal and print it
    Show {
        /// Experiment ID
        id: String,
        /// Show detail text as plain text instead of converting Markdown
        #[arg(long)]
        plain: bool,
        /// Also write the page with the modal open to this file
        #[arg(long)]
        page: Option<PathBuf>,
    },

    /// Show or toggle the persisted theme
    Theme {
        #[command(subcommand)]
        action: Option<ThemeAction>,
    },

    /// Resolve the OGP thumbnail of a URL
    Ogp {
        /// Target page URL
        url: String,
    },
}

#[derive(Subcommand)]
enum ThemeAction {
    /// Print the active theme
    Show,
    /// Switch between light and dark and persist the choice
    Toggle,
}

/// Parse arguments and run the selected command.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Build => build::cmd_build(&config).await,
        Commands::Render { output, plain } => render::cmd_render(&config, output, plain).await,
        Commands::Show { id, plain, page } => show::cmd_show(&config, &id, plain, page).await,
        Commands::Theme { action } => match action.unwrap_or(ThemeAction::Show) {
            ThemeAction::Show => theme::cmd_theme(&config, false),
            ThemeAction::Toggle => theme::cmd_theme(&config, true),
        },
        Commands::Ogp { url } => ogp::cmd_ogp(&config, &url).await,
    }
}
