//! Check command implementation
//!
//! Loads the configuration, runs the built-in validators and attempts
//! defaults resolution. Exit is non-zero when any error-severity issue is
//! found, so CI can gate on it.

use anyhow::Result;
use console::{style, Emoji};
use serde_json::json;
use std::env;

use crate::config::{ConfigLoader, ConfigResolver, ValidationSeverity, ValidatorRegistry};

static CHECKMARK: Emoji = Emoji("✅", "[OK]");
static CROSS: Emoji = Emoji("❌", "[FAIL]");
static WARN: Emoji = Emoji("⚠️", "[WARN]");

/// Validate the configuration in the current directory
pub fn cmd_check(json: bool) -> Result<()> {
    let project_root = env::current_dir()?;
    let config = ConfigLoader::load(&project_root)?;

    let registry = ValidatorRegistry::with_builtins();
    let result = registry.validate_all(&config);

    if json {
        let issues: Vec<_> = result
            .issues
            .iter()
            .map(|issue| {
                json!({
                    "severity": issue.severity.as_str(),
                    "field": issue.field,
                    "message": issue.message,
                    "suggestion": issue.suggestion,
                })
            })
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "valid": result.is_valid(),
                "issues": issues,
            }))?
        );
    } else {
        for issue in &result.issues {
            let marker = match issue.severity {
                ValidationSeverity::Error => format!("{} {}", CROSS, style("error").red().bold()),
                ValidationSeverity::Warning => {
                    format!("{} {}", WARN, style("warning").yellow().bold())
                }
                ValidationSeverity::Info => format!("{}", style("info").dim()),
            };
            println!("{} [{}] {}", marker, style(&issue.field).cyan(), issue.message);
            if let Some(ref suggestion) = issue.suggestion {
                println!("   {} {}", style("help:").dim(), suggestion);
            }
        }
        if !result.issues.is_empty() {
            println!();
        }
    }

    if result.has_errors() {
        // Configuration is all-or-nothing: any error aborts before serving.
        return Err(crate::error::SiteCfgError::ValidationFailed {
            count: result.errors().len(),
        }
        .into());
    }

    // Resolution re-checks the invariants and exercises defaults merging.
    let resolved = ConfigResolver::resolve(&config)?;
    resolved.router()?;

    if !json {
        println!(
            "{} {} is valid ({} warning(s))",
            CHECKMARK,
            style(crate::config::CONFIG_FILE_NAME).cyan(),
            result.warnings().len()
        );
    }
    Ok(())
}
