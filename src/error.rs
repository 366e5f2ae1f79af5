//! Enhanced error types with contextual suggestions
//!
//! All failures here are configuration-contract violations detected before
//! the host starts serving: malformed patterns, unsupported image formats,
//! locale-membership violations, unreadable config files. They are fatal at
//! build start; there is no retry or partial-success path.
//!
//! Each variant carries enough context to render an actionable message and
//! a sysexits-style exit code for CI.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-contract errors raised while loading or resolving a site
/// configuration.
#[derive(Error, Debug)]
pub enum SiteCfgError {
    /// Configuration file could not be read
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// Path to config file
        path: PathBuf,
        #[source]
        /// IO error source
        source: std::io::Error,
    },

    /// A redirect/rewrite/header source did not compile as a path pattern
    #[error("Invalid route pattern '{pattern}': {reason}")]
    InvalidRoutePattern {
        /// The offending source pattern
        pattern: String,
        /// Why compilation failed
        reason: String,
    },

    /// A destination references a parameter its source does not bind
    #[error("Destination '{destination}' references unbound parameter ':{param}'")]
    UnboundRouteParam {
        /// The destination string
        destination: String,
        /// The unbound parameter name
        param: String,
    },

    /// A remote image pattern is not a well-formed URL tuple
    #[error("Invalid remote pattern '{protocol}://{hostname}{pathname}': {reason}")]
    InvalidRemotePattern {
        /// Pattern protocol
        protocol: String,
        /// Pattern hostname
        hostname: String,
        /// Pattern pathname glob
        pathname: String,
        /// Why the tuple is rejected
        reason: String,
    },

    /// A locale is used that is not in the declared locale set
    #[error("Locale '{locale}' is not in the declared locale set")]
    UnknownLocale {
        /// The undeclared locale tag
        locale: String,
        /// Locales that are declared
        available: Vec<String>,
    },

    /// A locale domain mapping names an invalid serving domain
    #[error("Invalid locale domain: '{domain}'")]
    InvalidLocaleDomain {
        /// The rejected domain string
        domain: String,
    },

    /// An image output format outside the supported set
    #[error("Unsupported image format: '{format}'")]
    UnsupportedImageFormat {
        /// The rejected format string
        format: String,
        /// Formats the host supports
        supported: Vec<String>,
    },

    /// One or more validators reported error-severity issues
    #[error("Configuration has {count} validation error(s)")]
    ValidationFailed {
        /// Number of error-severity issues
        count: usize,
    },

    /// Generic I/O error with context
    #[error("I/O error: {context}")]
    Io {
        /// Context about where the error occurred
        context: String,
        #[source]
        /// IO error source
        source: std::io::Error,
    },
}

impl SiteCfgError {
    /// Get actionable suggestion for resolving this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use sitecfg::error::SiteCfgError;
    ///
    /// let error = SiteCfgError::UnknownLocale {
    ///     locale: "de".to_string(),
    ///     available: vec!["en-US".to_string(), "fr".to_string()],
    /// };
    ///
    /// let suggestion = error.suggestion();
    /// assert!(suggestion.unwrap().contains("en-US"));
    /// ```
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::ConfigNotFound { .. } => {
                Some("Run 'sitecfg init' to create a configuration file".to_string())
            }
            Self::InvalidRoutePattern { .. } => Some(
                "Route sources use literal segments, ':name', ':name*' and regex groups \
                 like '(.*)'"
                    .to_string(),
            ),
            Self::UnboundRouteParam { param, .. } => Some(format!(
                "Add ':{}' to the rule's source pattern or remove it from the destination",
                param
            )),
            Self::InvalidRemotePattern { .. } => Some(
                "Remote patterns need an http/https protocol, a bare hostname and a \
                 pathname glob starting with '/'"
                    .to_string(),
            ),
            Self::UnknownLocale { available, .. } => Some(format!(
                "Declared locales: {}\nAdd the locale to 'locales' or use a declared one",
                available.join(", ")
            )),
            Self::InvalidLocaleDomain { .. } => {
                Some("Domain entries take a bare hostname such as 'example.fr'".to_string())
            }
            Self::UnsupportedImageFormat { supported, .. } => {
                Some(format!("Supported formats: {}", supported.join(", ")))
            }
            Self::ValidationFailed { .. } => {
                Some("Fix the issues listed above and re-run 'sitecfg check'".to_string())
            }
            Self::Io { context, .. } => Some(format!(
                "Check file permissions and that {} is accessible",
                context
            )),
        }
    }

    /// Get appropriate exit code for this error, following sysexits.h.
    ///
    /// # Examples
    ///
    /// ```
    /// use sitecfg::error::SiteCfgError;
    ///
    /// let error = SiteCfgError::UnsupportedImageFormat {
    ///     format: "image/bmp".to_string(),
    ///     supported: vec!["image/webp".to_string()],
    /// };
    /// assert_eq!(error.exit_code(), 65); // EX_DATAERR
    /// ```
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConfigNotFound { .. } => 66, // EX_NOINPUT
            Self::Io { .. } => 74,             // EX_IOERR
            // All contract violations are data errors
            _ => 65, // EX_DATAERR
        }
    }
}

/// Formats errors for CLI display with suggestions.
pub struct ErrorFormatter;

impl ErrorFormatter {
    /// Format error with its cause chain and any suggestion
    pub fn format(error: &anyhow::Error) -> String {
        use console::style;

        let mut output = String::new();

        // Main error message
        output.push_str(&format!("{} {}\n", style("error:").red().bold(), error));

        // Error chain (caused by)
        let mut source = error.source();
        let mut indent = 1;
        while let Some(err) = source {
            output.push_str(&format!(
                "{}{} {}\n",
                "  ".repeat(indent),
                style("caused by:").yellow(),
                err
            ));
            source = err.source();
            indent += 1;
        }

        if let Some(sc_error) = error.downcast_ref::<SiteCfgError>() {
            if let Some(suggestion) = sc_error.suggestion() {
                output.push_str(&format!(
                    "\n{} {}\n",
                    style("help:").cyan().bold(),
                    suggestion
                ));
            }
        }

        output
    }

    /// Get exit code from error
    pub fn exit_code(error: &anyhow::Error) -> i32 {
        if let Some(sc_error) = error.downcast_ref::<SiteCfgError>() {
            sc_error.exit_code()
        } else {
            1 // Generic error
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_locale_lists_available_locales() {
        let err = SiteCfgError::UnknownLocale {
            locale: "de".to_string(),
            available: vec!["en-US".to_string(), "fr".to_string()],
        };
        let suggestion = err.suggestion().unwrap();
        assert!(suggestion.contains("en-US"));
        assert!(suggestion.contains("fr"));
        assert_eq!(err.exit_code(), 65);
    }

    #[test]
    fn test_config_not_found_suggests_init() {
        let err = SiteCfgError::ConfigNotFound {
            path: PathBuf::from("sitecfg.toml"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert!(err.suggestion().unwrap().contains("sitecfg init"));
        assert_eq!(err.exit_code(), 66);
    }

    #[test]
    fn test_formatter_renders_chain_and_suggestion() {
        let err: anyhow::Error = SiteCfgError::InvalidRoutePattern {
            pattern: "/broken[".to_string(),
            reason: "unclosed character class".to_string(),
        }
        .into();

        let rendered = ErrorFormatter::format(&err);
        assert!(rendered.contains("Invalid route pattern"));
        assert!(rendered.contains("help:"));
        assert_eq!(ErrorFormatter::exit_code(&err), 65);
    }

    #[test]
    fn test_generic_error_exit_code_is_one() {
        let err = anyhow::anyhow!("something else went wrong");
        assert_eq!(ErrorFormatter::exit_code(&err), 1);
    }
}
