//! Show command implementation
//!
//! Prints the resolved configuration: the declared record merged over the
//! host defaults, exactly what the host would consume at startup.

use anyhow::Result;
use console::style;
use std::env;

use crate::config::{ConfigLoader, ConfigResolver};

/// Print the resolved configuration for the current directory
pub fn cmd_show(json: bool) -> Result<()> {
    let project_root = env::current_dir()?;
    let config = ConfigLoader::load(&project_root)?;
    let resolved = ConfigResolver::resolve(&config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&resolved)?);
        return Ok(());
    }

    println!("{}", style("Resolved site configuration").bold());
    println!();
    println!("{}", style("build").cyan());
    println!(
        "   ignore type errors: {}",
        resolved.typescript.ignore_build_errors
    );
    println!(
        "   ignore lint failures: {}",
        resolved.eslint.ignore_during_builds
    );
    if let Some(output) = resolved.output {
        println!("   output: {:?}", output);
    }
    println!("   dist dir: {}", resolved.dist_dir);
    println!();

    println!("{}", style("images").cyan());
    for pattern in &resolved.images.remote_patterns {
        println!(
            "   allow {}://{}{}",
            pattern.protocol, pattern.hostname, pattern.pathname
        );
    }
    println!(
        "   formats: {}",
        resolved
            .images
            .formats
            .iter()
            .map(|f| f.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!("   minimum cache TTL: {}s", resolved.images.minimum_cache_ttl);
    println!();

    println!("{}", style("routing").cyan());
    println!(
        "   {} redirect(s), {} rewrite(s), {} header rule(s)",
        resolved.redirects.len(),
        resolved.rewrites.len(),
        resolved.headers.len()
    );
    if let Some(ref i18n) = resolved.i18n {
        println!();
        println!("{}", style("i18n").cyan());
        println!("   locales: {}", i18n.locales.join(", "));
        println!("   default: {}", i18n.default_locale);
        for domain in &i18n.domains {
            println!("   {} -> {}", domain.domain, domain.default_locale);
        }
    }

    Ok(())
}
