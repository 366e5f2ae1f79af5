//! Route and headers command implementations
//!
//! Evaluates the configured rules for a concrete request path, mirroring
//! what the host's routing layer would do: redirects first, then rewrites;
//! header rules accumulate across every match.

use anyhow::Result;
use console::style;
use serde_json::json;
use std::env;

use crate::config::{ConfigLoader, ConfigResolver};

/// Evaluate redirect and rewrite rules for a request path
pub fn cmd_route(path: &str, json: bool) -> Result<()> {
    let router = load_router()?;

    let redirect = router.match_redirect(path);
    let rewrite = if redirect.is_none() {
        router.match_rewrite(path)
    } else {
        // A redirect short-circuits evaluation; rewrites never run.
        None
    };

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "path": path,
                "redirect": redirect,
                "rewrite": rewrite,
            }))?
        );
        return Ok(());
    }

    match (redirect, rewrite) {
        (Some(m), _) => {
            println!(
                "{} {} {} {}",
                style(path).cyan(),
                style("redirects to").bold(),
                style(&m.destination).green(),
                style(format!("({})", m.status)).dim()
            );
        }
        (None, Some(m)) => {
            println!(
                "{} {} {} {}",
                style(path).cyan(),
                style("rewrites to").bold(),
                style(&m.destination).green(),
                style("(URL unchanged)").dim()
            );
        }
        (None, None) => {
            println!("{} matches no redirect or rewrite rule", style(path).cyan());
        }
    }
    Ok(())
}

/// Print the accumulated response headers for a request path
pub fn cmd_headers(path: &str, json: bool) -> Result<()> {
    let router = load_router()?;
    let headers = router.headers_for(path);

    if json {
        let entries: Vec<_> = headers
            .iter()
            .map(|(key, value)| json!({ "key": key, "value": value }))
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({ "path": path, "headers": entries }))?
        );
        return Ok(());
    }

    if headers.is_empty() {
        println!("{} matches no header rule", style(path).cyan());
        return Ok(());
    }
    println!("{}", style(path).cyan());
    for (key, value) in headers {
        println!("   {}: {}", style(key).bold(), value);
    }
    Ok(())
}

fn load_router() -> Result<crate::routing::Router> {
    let project_root = env::current_dir()?;
    let config = ConfigLoader::load(&project_root)?;
    let resolved = ConfigResolver::resolve(&config)?;
    Ok(resolved.router()?)
}
