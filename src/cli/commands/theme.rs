//! Theme preference command.

use console::style;

use labsite::config::Config;
use labsite::dom::Document;
use labsite::preferences::FilePreferences;
use labsite::theme::ThemeController;

pub fn cmd_theme(config: &Config, toggle: bool) -> anyhow::Result<()> {
    let mut store = FilePreferences::open(config.preferences_path());
    let mut doc = Document::standard();
    let mut controller = ThemeController::new();
    let theme = controller.init(&mut doc, &store, config.theme.prefers_dark);

    if !toggle {
        println!("{} {}", theme.icon(), theme);
        return Ok(());
    }

    let theme = controller.toggle(&mut doc, &mut store)?;
    println!(
        "{} Switched to {} {} (saved to {})",
        style("✓").green(),
        theme,
        theme.icon(),
        store.path().display()
    );
    Ok(())
}
