//! Configuration file data structures
//!
//! The top-level record a project declares in `sitecfg.toml`. Every section
//! is optional; an absent section means the host's built-in default. Wire
//! names are camelCase to match the host schema exactly, so a record
//! round-trips bit-for-bit through serialization.

use crate::i18n::LocalePolicy;
use crate::images::ImagePolicy;
use crate::routing::{HeaderRule, RedirectRule, RewriteRule};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Configuration file name
pub const CONFIG_FILE_NAME: &str = "sitecfg.toml";

/// Type-check toggles consumed at build time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct TypescriptToggles {
    /// Do not abort the build on type errors
    pub ignore_build_errors: bool,
}

/// Lint toggles consumed at build time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct EslintToggles {
    /// Do not abort the build on lint failures
    pub ignore_during_builds: bool,
    /// Directories the linter runs on
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dirs: Option<Vec<String>>,
}

/// Bundler rule for a turbo-style file transform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TurboRule {
    /// Loader chain applied to matching files
    pub loaders: Vec<String>,
    /// Output filename pattern
    #[serde(rename = "as")]
    pub output: String,
}

/// Flags for features the host has not stabilized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ExperimentalFlags {
    /// Partial prerendering
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ppr: Option<bool>,
    /// Per-glob bundler transform rules
    #[serde(skip_serializing_if = "Option::is_none")]
    pub turbo_rules: Option<BTreeMap<String, TurboRule>>,
}

/// Build output layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Self-contained output for container deployments
    Standalone,
    /// Fully static export
    Export,
}

/// Fetch-logging options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct FetchLogging {
    /// Log full request URLs instead of truncated ones
    pub full_url: bool,
}

/// Host logging options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct LoggingOptions {
    /// Logging of build-time fetches
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetches: Option<FetchLogging>,
}

/// The site configuration record.
///
/// Immutable after construction: the host reads it once at build/start time
/// and resolution produces a new value rather than mutating this one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ConfigFile {
    /// Type-check toggles
    #[serde(skip_serializing_if = "Option::is_none")]
    pub typescript: Option<TypescriptToggles>,

    /// Lint toggles
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eslint: Option<EslintToggles>,

    /// Image optimization policy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<ImagePolicy>,

    /// Literal environment bindings exposed to build-time code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env: Option<BTreeMap<String, String>>,

    /// Names of process environment variables passed through at load time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env_passthrough: Option<Vec<String>>,

    /// Ordered redirect rules; first match wins
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirects: Option<Vec<RedirectRule>>,

    /// Ordered rewrite rules; first match wins
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rewrites: Option<Vec<RewriteRule>>,

    /// Header rules; all matches accumulate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<Vec<HeaderRule>>,

    /// Locale policy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub i18n: Option<LocalePolicy>,

    /// Unstable feature flags
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experimental: Option<ExperimentalFlags>,

    /// Build output layout
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<OutputMode>,

    /// Compress responses
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compress: Option<bool>,

    /// Emit the host's advertising header
    #[serde(skip_serializing_if = "Option::is_none")]
    pub powered_by_header: Option<bool>,

    /// Generate ETags for pages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generate_etags: Option<bool>,

    /// Extensions recognized as pages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_extensions: Option<Vec<String>>,

    /// Serve paths with a trailing slash
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trailing_slash: Option<bool>,

    /// CDN prefix for static assets
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_prefix: Option<String>,

    /// Path prefix the whole application is served under
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_path: Option<String>,

    /// Build output directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dist_dir: Option<String>,

    /// Host logging options
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingOptions>,

    /// Values available to server-side code only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_runtime_config: Option<serde_json::Value>,

    /// Values available to both server and client code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_runtime_config: Option<serde_json::Value>,
}

impl ConfigFile {
    /// A starter record with the host's common exemplar settings, written
    /// by `sitecfg init`.
    pub fn starter() -> Self {
        use crate::images::RemotePattern;
        use crate::routing::HeaderEntry;

        Self {
            typescript: Some(TypescriptToggles {
                ignore_build_errors: false,
            }),
            eslint: Some(EslintToggles {
                ignore_during_builds: false,
                dirs: None,
            }),
            images: Some(ImagePolicy {
                remote_patterns: vec![
                    RemotePattern {
                        protocol: "https".to_string(),
                        hostname: "images.pexels.com".to_string(),
                        port: String::new(),
                        pathname: "/**".to_string(),
                    },
                    RemotePattern {
                        protocol: "https".to_string(),
                        hostname: "placehold.co".to_string(),
                        port: String::new(),
                        pathname: "/**".to_string(),
                    },
                ],
                ..Default::default()
            }),
            redirects: Some(vec![RedirectRule {
                source: "/old-page".to_string(),
                destination: "/new-page".to_string(),
                permanent: true,
            }]),
            headers: Some(vec![HeaderRule {
                source: "/(.*)".to_string(),
                headers: vec![HeaderEntry {
                    key: "X-Content-Type-Options".to_string(),
                    value: "nosniff".to_string(),
                }],
            }]),
            ..Default::default()
        }
    }
}
