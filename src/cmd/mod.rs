//! Command handlers for the sitecfg CLI
//!
//! Each submodule handles a specific CLI command over the configuration
//! library: authoring (`init`), validation (`check`), inspection (`show`)
//! and rule evaluation (`route`, `headers`).

pub mod check;
pub mod completions;
pub mod init;
pub mod route;
pub mod show;

// Re-export command functions for convenient access
pub use check::cmd_check;
pub use completions::cmd_completions;
pub use init::cmd_init;
pub use route::{cmd_headers, cmd_route};
pub use show::cmd_show;
