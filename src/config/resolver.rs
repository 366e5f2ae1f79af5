//! Defaults resolution
//!
//! Merges a declared record over the host's built-in defaults, exactly once
//! at startup, producing a fully-populated `ResolvedConfig`. Resolution is
//! where the contract invariants are enforced; a violation aborts before
//! anything serves traffic.

use super::file::{
    ConfigFile, EslintToggles, ExperimentalFlags, LoggingOptions, OutputMode, TypescriptToggles,
};
use crate::error::SiteCfgError;
use crate::i18n::LocalePolicy;
use crate::images::{ImageFormat, RemotePattern};
use crate::routing::{HeaderRule, RedirectRule, RewriteRule, Router};
use serde::Serialize;
use std::collections::BTreeMap;

/// Host defaults for responsive breakpoints of full-width images.
pub const DEFAULT_DEVICE_SIZES: &[u32] = &[640, 750, 828, 1080, 1200, 1920, 2048, 3840];
/// Host defaults for fixed image sizes.
pub const DEFAULT_IMAGE_SIZES: &[u32] = &[16, 32, 48, 64, 96, 128, 256, 384];
/// Host default minimum cache lifetime for optimized images, in seconds.
pub const DEFAULT_MINIMUM_CACHE_TTL: u64 = 60;
/// Host default page extensions.
pub const DEFAULT_PAGE_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx"];
/// Host default build output directory.
pub const DEFAULT_DIST_DIR: &str = "dist";

/// Image policy with every field populated.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedImagePolicy {
    /// Allowed remote sources
    pub remote_patterns: Vec<RemotePattern>,
    /// Output formats in preference order
    pub formats: Vec<ImageFormat>,
    /// Responsive breakpoints
    pub device_sizes: Vec<u32>,
    /// Fixed sizes
    pub image_sizes: Vec<u32>,
    /// Minimum cache lifetime in seconds
    #[serde(rename = "minimumCacheTTL")]
    pub minimum_cache_ttl: u64,
    /// SVG sources allowed
    #[serde(rename = "dangerouslyAllowSVG")]
    pub dangerously_allow_svg: bool,
    /// Content-Disposition type for served images
    pub content_disposition_type: String,
    /// CSP applied to served images
    pub content_security_policy: Option<String>,
}

/// The fully-populated configuration the host consumes.
///
/// Produced once at startup, then passed explicitly to the components that
/// need it; never a global and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedConfig {
    /// Type-check toggles
    pub typescript: TypescriptToggles,
    /// Lint toggles
    pub eslint: EslintToggles,
    /// Image policy
    pub images: ResolvedImagePolicy,
    /// Environment bindings, passthrough names already resolved
    pub env: BTreeMap<String, String>,
    /// Redirect rules in evaluation order
    pub redirects: Vec<RedirectRule>,
    /// Rewrite rules in evaluation order
    pub rewrites: Vec<RewriteRule>,
    /// Header rules in evaluation order
    pub headers: Vec<HeaderRule>,
    /// Locale policy; absent means no i18n routing
    pub i18n: Option<LocalePolicy>,
    /// Unstable feature flags
    pub experimental: ExperimentalFlags,
    /// Build output layout; absent means the host default layout
    pub output: Option<OutputMode>,
    /// Compress responses
    pub compress: bool,
    /// Emit the host's advertising header
    pub powered_by_header: bool,
    /// Generate ETags for pages
    pub generate_etags: bool,
    /// Extensions recognized as pages
    pub page_extensions: Vec<String>,
    /// Serve paths with a trailing slash
    pub trailing_slash: bool,
    /// CDN prefix for static assets
    pub asset_prefix: Option<String>,
    /// Path prefix the application is served under
    pub base_path: String,
    /// Build output directory
    pub dist_dir: String,
    /// Host logging options
    pub logging: LoggingOptions,
    /// Server-only runtime values
    pub server_runtime_config: serde_json::Value,
    /// Shared runtime values
    pub public_runtime_config: serde_json::Value,
}

impl ResolvedConfig {
    /// Compile the routing rule lists.
    ///
    /// Resolution already validated every pattern, so this only fails if
    /// the config was constructed by hand with bad rules.
    pub fn router(&self) -> Result<Router, SiteCfgError> {
        Router::compile(&self.redirects, &self.rewrites, &self.headers)
    }
}

/// Handles defaults merging and invariant enforcement
pub struct ConfigResolver;

impl ConfigResolver {
    /// Merge a record over the host defaults and enforce invariants.
    ///
    /// # Examples
    ///
    /// ```
    /// use sitecfg::config::{ConfigFile, ConfigResolver};
    ///
    /// let resolved = ConfigResolver::resolve(&ConfigFile::default())?;
    /// assert!(resolved.compress);
    /// assert_eq!(resolved.images.minimum_cache_ttl, 60);
    /// # Ok::<(), sitecfg::error::SiteCfgError>(())
    /// ```
    pub fn resolve(config: &ConfigFile) -> Result<ResolvedConfig, SiteCfgError> {
        let images = config.images.clone().unwrap_or_default();
        for pattern in &images.remote_patterns {
            pattern.validate()?;
        }

        if let Some(ref i18n) = config.i18n {
            i18n.validate()?;
        }

        let redirects = config.redirects.clone().unwrap_or_default();
        let rewrites = config.rewrites.clone().unwrap_or_default();
        let headers = config.headers.clone().unwrap_or_default();
        // Compile once now so malformed patterns abort startup, not serving.
        Router::compile(&redirects, &rewrites, &headers)?;

        let mut env = config.env.clone().unwrap_or_default();
        for name in config.env_passthrough.iter().flatten() {
            // Unset process variables stay absent, never empty strings.
            if let Ok(value) = std::env::var(name) {
                env.insert(name.clone(), value);
            }
        }

        Ok(ResolvedConfig {
            typescript: config.typescript.clone().unwrap_or_default(),
            eslint: config.eslint.clone().unwrap_or_default(),
            images: ResolvedImagePolicy {
                remote_patterns: images.remote_patterns,
                formats: images.formats.unwrap_or_else(|| vec![ImageFormat::Webp]),
                device_sizes: images
                    .device_sizes
                    .unwrap_or_else(|| DEFAULT_DEVICE_SIZES.to_vec()),
                image_sizes: images
                    .image_sizes
                    .unwrap_or_else(|| DEFAULT_IMAGE_SIZES.to_vec()),
                minimum_cache_ttl: images.minimum_cache_ttl.unwrap_or(DEFAULT_MINIMUM_CACHE_TTL),
                dangerously_allow_svg: images.dangerously_allow_svg.unwrap_or(false),
                content_disposition_type: images
                    .content_disposition_type
                    .unwrap_or_else(|| "attachment".to_string()),
                content_security_policy: images.content_security_policy,
            },
            env,
            redirects,
            rewrites,
            headers,
            i18n: config.i18n.clone(),
            experimental: config.experimental.clone().unwrap_or_default(),
            output: config.output,
            compress: config.compress.unwrap_or(true),
            powered_by_header: config.powered_by_header.unwrap_or(true),
            generate_etags: config.generate_etags.unwrap_or(true),
            page_extensions: config.page_extensions.clone().unwrap_or_else(|| {
                DEFAULT_PAGE_EXTENSIONS.iter().map(|s| s.to_string()).collect()
            }),
            trailing_slash: config.trailing_slash.unwrap_or(false),
            asset_prefix: config.asset_prefix.clone(),
            base_path: config.base_path.clone().unwrap_or_default(),
            dist_dir: config
                .dist_dir
                .clone()
                .unwrap_or_else(|| DEFAULT_DIST_DIR.to_string()),
            logging: config.logging.clone().unwrap_or_default(),
            server_runtime_config: config
                .server_runtime_config
                .clone()
                .unwrap_or(serde_json::Value::Null),
            public_runtime_config: config
                .public_runtime_config
                .clone()
                .unwrap_or(serde_json::Value::Null),
        })
    }
}
