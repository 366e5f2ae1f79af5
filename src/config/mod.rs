//! Configuration record, loading and validation for sitecfg
//!
//! This module provides:
//! - The typed configuration record (`ConfigFile`) and its sections
//! - `sitecfg.toml` load/save support
//! - Defaults resolution into a fully-populated `ResolvedConfig`
//! - Pluggable validation of the contract invariants

pub mod file;
pub mod loader;
pub mod resolver;
pub mod validator;

pub use file::{
    ConfigFile, EslintToggles, ExperimentalFlags, FetchLogging, LoggingOptions, OutputMode,
    TurboRule, TypescriptToggles, CONFIG_FILE_NAME,
};
pub use loader::ConfigLoader;
pub use resolver::{ConfigResolver, ResolvedConfig, ResolvedImagePolicy};
pub use validator::{
    ConfigValidator, ValidationIssue, ValidationResult, ValidationSeverity, ValidatorRegistry,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_module_exports_are_accessible() {
        // Ensure all exports compile and are accessible
        let _: Option<ConfigFile> = None;
        let _: Option<ResolvedConfig> = None;
    }

    #[test]
    fn test_config_file_name_constant_is_correct() {
        assert_eq!(CONFIG_FILE_NAME, "sitecfg.toml");
    }

    #[test]
    fn test_starter_config_resolves_cleanly() {
        let resolved = ConfigResolver::resolve(&ConfigFile::starter()).unwrap();
        assert_eq!(resolved.images.remote_patterns.len(), 2);
    }
}
