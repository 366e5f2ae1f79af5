//! Module-graph transformation hook
//!
//! Mirrors the webpack-style callback the host invokes while constructing
//! its bundling graph: a pure function from (graph config, build target) to
//! a modified graph config. For client bundles, platform-native module
//! names are mapped to an inert fallback so nothing tries to resolve them
//! in the browser; for every target an asset rule teaches the graph to
//! treat image and font files as assets.
//!
//! The hook runs synchronously during graph construction, never at request
//! time, and is idempotent: applying it twice changes nothing.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Platform-native module names that must not resolve in client bundles.
pub const PLATFORM_NATIVE_MODULES: &[&str] =
    &["fs", "net", "tls", "dns", "timers", "child_process"];

/// File extensions recognized by the asset rule.
const ASSET_EXTENSION_TEST: &str = r"(?i)\.(png|jpe?g|gif|svg|eot|ttf|woff2?)$";

/// Which bundle the graph is being built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildTarget {
    /// Server-side bundle; platform-native modules resolve normally
    Server,
    /// Client-side bundle; platform-native modules are disabled
    Client,
}

/// Replacement applied when resolution of a module name is suppressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleFallback {
    /// Resolve to an inert, always-false value
    Disabled,
}

/// How matched modules are treated by the bundler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleType {
    /// Emit the file as a static asset
    Asset,
}

/// A module-handling rule keyed on a filename test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleRule {
    /// Regex source matched against module filenames
    pub test: String,
    /// Treatment for matching modules
    pub module_type: ModuleType,
}

impl ModuleRule {
    /// The asset rule appended by the hook.
    pub fn asset() -> Self {
        Self {
            test: ASSET_EXTENSION_TEST.to_string(),
            module_type: ModuleType::Asset,
        }
    }

    /// Whether a filename is matched by this rule.
    pub fn applies_to(&self, filename: &str) -> bool {
        regex::Regex::new(&self.test)
            .map(|re| re.is_match(filename))
            .unwrap_or(false)
    }
}

/// The in-progress module-graph configuration handed to the hook.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GraphConfig {
    /// Module-name resolution fallbacks
    pub resolve_fallback: BTreeMap<String, ModuleFallback>,
    /// Module-handling rules, applied in order
    pub module_rules: Vec<ModuleRule>,
}

/// Transform a graph configuration for the given build target.
///
/// Pure: consumes the input and returns the modified value; existing
/// fallbacks and rules are preserved.
///
/// # Examples
///
/// ```
/// use sitecfg::bundler::{apply_resolution_hook, BuildTarget, GraphConfig, ModuleFallback};
///
/// let graph = apply_resolution_hook(GraphConfig::default(), BuildTarget::Client);
/// assert_eq!(graph.resolve_fallback.get("fs"), Some(&ModuleFallback::Disabled));
/// assert_eq!(graph.module_rules.len(), 1);
///
/// // Idempotent: a second application changes nothing.
/// let again = apply_resolution_hook(graph.clone(), BuildTarget::Client);
/// assert_eq!(graph, again);
/// ```
pub fn apply_resolution_hook(mut graph: GraphConfig, target: BuildTarget) -> GraphConfig {
    if target == BuildTarget::Client {
        for name in PLATFORM_NATIVE_MODULES {
            graph
                .resolve_fallback
                .insert((*name).to_string(), ModuleFallback::Disabled);
        }
    }

    let asset_rule = ModuleRule::asset();
    if !graph.module_rules.contains(&asset_rule) {
        graph.module_rules.push(asset_rule);
    }

    graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_client_target_disables_all_platform_modules() {
        let graph = apply_resolution_hook(GraphConfig::default(), BuildTarget::Client);
        for name in PLATFORM_NATIVE_MODULES {
            assert_eq!(
                graph.resolve_fallback.get(*name),
                Some(&ModuleFallback::Disabled),
                "{} should be disabled",
                name
            );
        }
    }

    #[test]
    fn test_server_target_leaves_fallbacks_untouched() {
        let graph = apply_resolution_hook(GraphConfig::default(), BuildTarget::Server);
        assert!(graph.resolve_fallback.is_empty());
        // The asset rule is still appended for server builds.
        assert_eq!(graph.module_rules.len(), 1);
    }

    #[test]
    fn test_existing_fallbacks_are_preserved() {
        let mut graph = GraphConfig::default();
        graph
            .resolve_fallback
            .insert("crypto".to_string(), ModuleFallback::Disabled);

        let graph = apply_resolution_hook(graph, BuildTarget::Client);
        assert!(graph.resolve_fallback.contains_key("crypto"));
        assert_eq!(
            graph.resolve_fallback.len(),
            PLATFORM_NATIVE_MODULES.len() + 1
        );
    }

    #[test]
    fn test_hook_is_idempotent_on_client_graphs() {
        let once = apply_resolution_hook(GraphConfig::default(), BuildTarget::Client);
        let twice = apply_resolution_hook(once.clone(), BuildTarget::Client);
        assert_eq!(once, twice);
        assert_eq!(twice.module_rules.len(), 1);
    }

    #[test]
    fn test_asset_rule_recognizes_image_and_font_files() {
        let rule = ModuleRule::asset();
        for file in [
            "logo.png", "photo.JPG", "photo.jpeg", "anim.gif", "icon.svg", "font.eot",
            "font.ttf", "font.woff", "font.woff2",
        ] {
            assert!(rule.applies_to(file), "{} should be an asset", file);
        }
        assert!(!rule.applies_to("index.ts"));
        assert!(!rule.applies_to("data.json"));
    }

    #[test]
    fn test_graph_config_snapshot_round_trip() {
        let graph = apply_resolution_hook(GraphConfig::default(), BuildTarget::Client);
        let json = serde_json::to_string(&graph).unwrap();
        let back: GraphConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(graph, back);
    }

    proptest! {
        // Idempotence holds from any starting graph, not just the default.
        #[test]
        fn prop_hook_idempotent_from_any_start(
            extra in proptest::collection::btree_map("[a-z]{1,8}", Just(ModuleFallback::Disabled), 0..5)
        ) {
            let start = GraphConfig {
                resolve_fallback: extra,
                module_rules: Vec::new(),
            };
            let once = apply_resolution_hook(start, BuildTarget::Client);
            let twice = apply_resolution_hook(once.clone(), BuildTarget::Client);
            prop_assert_eq!(once, twice);
        }
    }
}
