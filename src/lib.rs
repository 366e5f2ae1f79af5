#![warn(missing_docs)]
#![warn(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! sitecfg library
//!
//! Models a web application's build/serve configuration contract as a
//! typed, validated, immutable record: image optimization allow-lists,
//! redirect/rewrite/header rules, locale tables, module-resolution
//! fallbacks and runtime flags. The record is constructed once at startup
//! by merging the declared file over host defaults, then passed explicitly
//! to whatever needs it; every contract violation is fatal before anything
//! serves traffic.
//!
//! # Basic Example
//!
//! Resolving a record and evaluating routing rules:
//!
//! ```
//! use sitecfg::config::{ConfigFile, ConfigResolver};
//! use sitecfg::routing::RedirectRule;
//!
//! let config = ConfigFile {
//!     redirects: Some(vec![RedirectRule {
//!         source: "/old-page".to_string(),
//!         destination: "/new-page".to_string(),
//!         permanent: true,
//!     }]),
//!     ..Default::default()
//! };
//!
//! let resolved = ConfigResolver::resolve(&config)?;
//! let router = resolved.router()?;
//!
//! let m = router.match_redirect("/old-page").unwrap();
//! assert_eq!(m.destination, "/new-page");
//! assert_eq!(m.status, 308);
//! # Ok::<(), sitecfg::error::SiteCfgError>(())
//! ```
//!
//! # Advanced Example: Image Allow-List
//!
//! The remote-pattern list is a security boundary; anything unlisted is
//! denied:
//!
//! ```
//! use sitecfg::images::{ImagePolicy, RemotePattern};
//! use url::Url;
//!
//! let policy = ImagePolicy {
//!     remote_patterns: vec![RemotePattern {
//!         protocol: "https".to_string(),
//!         hostname: "images.pexels.com".to_string(),
//!         port: String::new(),
//!         pathname: "/**".to_string(),
//!     }],
//!     ..Default::default()
//! };
//!
//! let listed = Url::parse("https://images.pexels.com/photos/1.jpg").unwrap();
//! let unlisted = Url::parse("https://elsewhere.example/photos/1.jpg").unwrap();
//! assert!(policy.allows(&listed));
//! assert!(!policy.allows(&unlisted));
//! ```
//!
//! # Advanced Example: Client Build Graph
//!
//! The module-resolution hook disables platform-native modules for client
//! bundles and is idempotent:
//!
//! ```
//! use sitecfg::bundler::{apply_resolution_hook, BuildTarget, GraphConfig, ModuleFallback};
//!
//! let graph = apply_resolution_hook(GraphConfig::default(), BuildTarget::Client);
//! assert_eq!(graph.resolve_fallback.get("fs"), Some(&ModuleFallback::Disabled));
//!
//! let again = apply_resolution_hook(graph.clone(), BuildTarget::Client);
//! assert_eq!(graph, again);
//! ```

/// Module-graph transformation hook for the bundling step
pub mod bundler;
/// Command handlers for CLI operations
pub mod cmd;
/// Configuration record, loading, resolution and validation
pub mod config;
/// Enhanced error types with contextual suggestions
pub mod error;
/// Locale policy and per-domain defaults
pub mod i18n;
/// Image optimization policy and remote-pattern allow-list
pub mod images;
/// Infrastructure traits for filesystem access
pub mod infra;
/// Redirect, rewrite and header rule evaluation
pub mod routing;
