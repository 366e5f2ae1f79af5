use clap::{Parser, Subcommand};
use clap_complete::Shell;
use sitecfg::cmd;
use std::process;

/// Typed site configuration contract
///
/// sitecfg models a web application's build/serve configuration as a typed,
/// validated record: image allow-lists, redirect/rewrite/header rules,
/// locale tables and runtime flags, checked before anything serves traffic.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter sitecfg.toml
    Init,

    /// Validate the configuration
    Check {
        /// Output issues as JSON (for CI integration)
        #[arg(long)]
        json: bool,
    },

    /// Print the resolved configuration (declared record over host defaults)
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Evaluate redirect and rewrite rules for a request path
    Route {
        /// Request path, e.g. /blog/my-post
        path: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the accumulated response headers for a request path
    Headers {
        /// Request path, e.g. /api/users
        path: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    // Initialize logger (use RUST_LOG env var to control verbosity)
    env_logger::init();

    let cli = Cli::parse();

    let result = match &cli.command {
        Some(Commands::Init) => cmd::cmd_init(),
        Some(Commands::Check { json }) => cmd::cmd_check(*json),
        Some(Commands::Show { json }) => cmd::cmd_show(*json),
        Some(Commands::Route { path, json }) => cmd::cmd_route(path, *json),
        Some(Commands::Headers { path, json }) => cmd::cmd_headers(path, *json),
        Some(Commands::Completions { shell }) => {
            cmd::cmd_completions(*shell);
            Ok(())
        }
        None => {
            // No subcommand provided, show help
            println!("sitecfg v{}", env!("CARGO_PKG_VERSION"));
            println!("Typed site configuration contract\n");
            println!("Usage: sitecfg <COMMAND>\n");
            println!("Commands:");
            println!("  init     Write a starter sitecfg.toml");
            println!("  check    Validate the configuration");
            println!("  show     Print the resolved configuration");
            println!("  route    Evaluate redirect/rewrite rules for a path");
            println!("  headers  Print accumulated headers for a path");
            println!("\nRun 'sitecfg <COMMAND> --help' for more information on a command.");
            Ok(())
        }
    };

    if let Err(e) = result {
        use sitecfg::error::ErrorFormatter;
        eprintln!("{}", ErrorFormatter::format(&e));
        let exit_code = ErrorFormatter::exit_code(&e);
        process::exit(exit_code);
    }
}
