//! Completions command implementation
//!
//! Handles the `sitecfg completions` command which generates
//! shell completion scripts for bash, zsh, fish, etc.

use clap_complete::{generate, Shell};

/// Generate shell completion scripts
///
/// Outputs completion script for the specified shell to stdout.
/// Users can redirect this to their shell's completion directory.
///
/// # Examples
///
/// ```bash
/// # Bash
/// sitecfg completions bash > /etc/bash_completion.d/sitecfg
///
/// # Zsh
/// sitecfg completions zsh > ~/.zfunc/_sitecfg
/// ```
pub fn cmd_completions(shell: Shell) {
    // We need to re-create the command structure here since Cli is in main.rs
    use clap::{Arg, Command};

    let mut cmd = Command::new("sitecfg")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Typed site configuration contract")
        .subcommand(Command::new("init").about("Write a starter sitecfg.toml"))
        .subcommand(Command::new("check").about("Validate the configuration"))
        .subcommand(Command::new("show").about("Print the resolved configuration"))
        .subcommand(
            Command::new("route")
                .about("Evaluate redirect and rewrite rules for a path")
                .arg(Arg::new("path").required(true)),
        )
        .subcommand(
            Command::new("headers")
                .about("Print accumulated headers for a path")
                .arg(Arg::new("path").required(true)),
        )
        .subcommand(Command::new("completions").about("Generate shell completions"));

    let bin_name = "sitecfg".to_string();
    generate(shell, &mut cmd, bin_name, &mut std::io::stdout());
}
