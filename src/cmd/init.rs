//! Init command implementation
//!
//! Handles the `sitecfg init` command which writes a starter `sitecfg.toml`
//! with the host's common exemplar settings.

use anyhow::Result;
use console::{style, Emoji};
use std::env;

use crate::config;

static ROCKET: Emoji = Emoji("🚀", ">");
static CHECKMARK: Emoji = Emoji("✅", "[OK]");
static INFO: Emoji = Emoji("ℹ️", "i");

/// Write a starter configuration file into the current directory
///
/// Refuses to overwrite an existing `sitecfg.toml`.
///
/// # Examples
///
/// ```no_run
/// use sitecfg::cmd::init::cmd_init;
///
/// cmd_init()?;
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn cmd_init() -> Result<()> {
    println!(
        "{} {} Initializing site configuration",
        ROCKET,
        style("sitecfg init").bold()
    );
    println!();

    let project_root = env::current_dir()?;

    // Check if config file already exists
    if config::ConfigLoader::exists(&project_root) {
        println!(
            "{} Config file already exists: {}",
            style("⚠️").yellow(),
            style(config::CONFIG_FILE_NAME).cyan()
        );
        println!("   Delete it first or edit manually to update.");
        return Ok(());
    }

    let starter = config::ConfigFile::starter();
    config::ConfigLoader::save(&starter, &project_root)?;

    println!(
        "{} Created {}",
        CHECKMARK,
        style(config::CONFIG_FILE_NAME).cyan().bold()
    );
    println!();
    println!("{}  Starter contents:", INFO);
    println!(
        "   {} {} remote image patterns (pexels, placehold.co)",
        style("•").dim(),
        starter
            .images
            .as_ref()
            .map_or(0, |i| i.remote_patterns.len())
    );
    println!(
        "   {} 1 permanent redirect (/old-page -> /new-page)",
        style("•").dim()
    );
    println!(
        "   {} global X-Content-Type-Options header",
        style("•").dim()
    );
    println!();
    println!("{}  Next Steps:", style("💡").bold());
    println!(
        "   1. Review and customize {} for your site",
        config::CONFIG_FILE_NAME
    );
    println!(
        "   2. Run {} to validate the configuration",
        style("sitecfg check").cyan()
    );
    println!(
        "   3. Run {} to inspect the resolved settings",
        style("sitecfg show").cyan()
    );
    println!();

    Ok(())
}
