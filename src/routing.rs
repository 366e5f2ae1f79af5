//! Redirect, rewrite and header rule evaluation
//!
//! Rules are declared as ordered lists in the configuration record and
//! evaluated once per request path by the host. Redirects and rewrites are
//! first-match-wins in declaration order; header rules accumulate across
//! every matching entry with last-write-wins per header name.
//!
//! Source patterns support literal segments, named single-segment params
//! (`:slug`), named multi-segment wildcards (`:slug*`) and inline regex
//! groups (`(.*)`). Destinations may reference named params bound by their
//! source; captured text is substituted verbatim.

use crate::error::SiteCfgError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// HTTP status used for `permanent: true` redirects.
pub const STATUS_PERMANENT_REDIRECT: u16 = 308;
/// HTTP status used for `permanent: false` redirects.
pub const STATUS_TEMPORARY_REDIRECT: u16 = 307;

/// A client-visible redirect rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RedirectRule {
    /// Source path pattern
    pub source: String,
    /// Destination path or absolute URL
    pub destination: String,
    /// Whether the redirect is permanent (308) or temporary (307)
    pub permanent: bool,
}

/// An internal rewrite rule; the visible URL does not change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RewriteRule {
    /// Source path pattern
    pub source: String,
    /// Internal destination path or absolute URL
    pub destination: String,
}

/// A header name/value pair emitted verbatim on matching responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeaderEntry {
    /// Header name
    pub key: String,
    /// Header value
    pub value: String,
}

/// Headers applied to every response whose path matches `source`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HeaderRule {
    /// Path pattern selecting responses
    pub source: String,
    /// Headers to emit
    pub headers: Vec<HeaderEntry>,
}

/// A compiled source pattern.
///
/// # Examples
///
/// ```
/// use sitecfg::routing::PathPattern;
///
/// let pattern = PathPattern::compile("/blog/:slug*").unwrap();
/// let params = pattern.matches("/blog/my-post").unwrap();
/// assert_eq!(params.get("slug").map(String::as_str), Some("my-post"));
/// assert!(pattern.matches("/about").is_none());
/// ```
#[derive(Debug, Clone)]
pub struct PathPattern {
    source: String,
    regex: Regex,
    params: Vec<String>,
}

impl PathPattern {
    /// Compile a source string into an anchored matcher.
    pub fn compile(source: &str) -> Result<Self, SiteCfgError> {
        if !source.starts_with('/') {
            return Err(SiteCfgError::InvalidRoutePattern {
                pattern: source.to_string(),
                reason: "pattern must start with '/'".to_string(),
            });
        }

        let mut pattern = String::from("^");
        let mut params = Vec::new();

        // Leading '/' makes the first split element empty; skip it.
        for segment in source.split('/').skip(1) {
            if let Some(rest) = segment.strip_prefix(':') {
                let (name, wildcard) = match rest.strip_suffix('*') {
                    Some(name) => (name, true),
                    None => (rest, false),
                };
                if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
                {
                    return Err(SiteCfgError::InvalidRoutePattern {
                        pattern: source.to_string(),
                        reason: format!("invalid parameter name ':{}'", name),
                    });
                }
                if params.iter().any(|p| p == name) {
                    return Err(SiteCfgError::InvalidRoutePattern {
                        pattern: source.to_string(),
                        reason: format!("duplicate parameter ':{}'", name),
                    });
                }
                params.push(name.to_string());
                if wildcard {
                    // Matches zero or more trailing segments, separators included.
                    pattern.push_str(&format!("(?:/(?P<{}>.+))?", name));
                } else {
                    pattern.push_str(&format!("/(?P<{}>[^/]+)", name));
                }
            } else if segment.contains('(') || segment.contains(')') {
                // Inline regex group; validity is checked by the final compile.
                pattern.push('/');
                pattern.push_str(segment);
            } else {
                pattern.push('/');
                pattern.push_str(&regex::escape(segment));
            }
        }
        pattern.push('$');

        let regex = Regex::new(&pattern).map_err(|e| SiteCfgError::InvalidRoutePattern {
            pattern: source.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            source: source.to_string(),
            regex,
            params,
        })
    }

    /// The original source string.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Named parameters bound by this pattern, in order of appearance.
    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// Match a request path, returning captured parameter values.
    ///
    /// A wildcard parameter that matched zero segments is present with an
    /// empty value so destination substitution stays total.
    pub fn matches(&self, path: &str) -> Option<BTreeMap<String, String>> {
        let captures = self.regex.captures(path)?;
        let mut values = BTreeMap::new();
        for name in &self.params {
            let value = captures
                .name(name)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();
            values.insert(name.clone(), value);
        }
        Some(values)
    }
}

/// Parameter names referenced by a destination string.
pub fn destination_params(destination: &str) -> Vec<String> {
    // ':' followed by an identifier; '://' in absolute URLs never matches
    // because '/' is not an identifier character.
    let finder = match Regex::new(r":([A-Za-z_][A-Za-z0-9_]*)\*?") {
        Ok(r) => r,
        Err(_) => return Vec::new(),
    };
    finder
        .captures_iter(destination)
        .map(|c| c[1].to_string())
        .collect()
}

/// Substitute captured parameter values into a destination string.
fn substitute(destination: &str, values: &BTreeMap<String, String>) -> String {
    let mut out = destination.to_string();
    // Longest names first so ':id' never clobbers a later ':id2' token.
    let mut names: Vec<&String> = values.keys().collect();
    names.sort_by_key(|n| std::cmp::Reverse(n.len()));
    for name in names {
        let value = &values[name];
        for token in [format!(":{}*", name), format!(":{}", name)] {
            out = out.replace(&token, value);
        }
    }
    // A wildcard that matched nothing can leave '//' or a dangling '/'.
    while out.contains("//") && !out.contains("://") {
        out = out.replace("//", "/");
    }
    if out.len() > 1 && out.ends_with('/') && !destination.ends_with('/') {
        out.pop();
    }
    out
}

/// Outcome of redirect evaluation for a request path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RedirectMatch {
    /// Substituted redirect target
    pub destination: String,
    /// HTTP status (308 permanent, 307 temporary)
    pub status: u16,
}

/// Outcome of rewrite evaluation; the visible URL is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RewriteMatch {
    /// Substituted internal destination
    pub destination: String,
}

#[derive(Debug)]
struct CompiledRedirect {
    pattern: PathPattern,
    destination: String,
    permanent: bool,
}

#[derive(Debug)]
struct CompiledRewrite {
    pattern: PathPattern,
    destination: String,
}

#[derive(Debug)]
struct CompiledHeaderRule {
    pattern: PathPattern,
    headers: Vec<HeaderEntry>,
}

/// Compiled rule lists for a configuration record.
///
/// Built once from the resolved configuration; evaluation order is the
/// declaration order of the underlying arrays.
#[derive(Debug)]
pub struct Router {
    redirects: Vec<CompiledRedirect>,
    rewrites: Vec<CompiledRewrite>,
    headers: Vec<CompiledHeaderRule>,
}

impl Router {
    /// Compile rule lists, rejecting malformed sources and destinations that
    /// reference parameters their source does not bind.
    pub fn compile(
        redirects: &[RedirectRule],
        rewrites: &[RewriteRule],
        headers: &[HeaderRule],
    ) -> Result<Self, SiteCfgError> {
        let mut compiled_redirects = Vec::with_capacity(redirects.len());
        for rule in redirects {
            let pattern = PathPattern::compile(&rule.source)?;
            check_destination(&pattern, &rule.destination)?;
            compiled_redirects.push(CompiledRedirect {
                pattern,
                destination: rule.destination.clone(),
                permanent: rule.permanent,
            });
        }

        let mut compiled_rewrites = Vec::with_capacity(rewrites.len());
        for rule in rewrites {
            let pattern = PathPattern::compile(&rule.source)?;
            check_destination(&pattern, &rule.destination)?;
            compiled_rewrites.push(CompiledRewrite {
                pattern,
                destination: rule.destination.clone(),
            });
        }

        let mut compiled_headers = Vec::with_capacity(headers.len());
        for rule in headers {
            compiled_headers.push(CompiledHeaderRule {
                pattern: PathPattern::compile(&rule.source)?,
                headers: rule.headers.clone(),
            });
        }

        Ok(Self {
            redirects: compiled_redirects,
            rewrites: compiled_rewrites,
            headers: compiled_headers,
        })
    }

    /// First matching redirect rule, with parameters substituted.
    ///
    /// # Examples
    ///
    /// ```
    /// use sitecfg::routing::{RedirectRule, Router};
    ///
    /// let rules = vec![RedirectRule {
    ///     source: "/blog/:slug*".to_string(),
    ///     destination: "/posts/:slug*".to_string(),
    ///     permanent: false,
    /// }];
    /// let router = Router::compile(&rules, &[], &[]).unwrap();
    ///
    /// let m = router.match_redirect("/blog/my-post").unwrap();
    /// assert_eq!(m.destination, "/posts/my-post");
    /// assert_eq!(m.status, 307);
    /// ```
    pub fn match_redirect(&self, path: &str) -> Option<RedirectMatch> {
        for rule in &self.redirects {
            if let Some(values) = rule.pattern.matches(path) {
                return Some(RedirectMatch {
                    destination: substitute(&rule.destination, &values),
                    status: if rule.permanent {
                        STATUS_PERMANENT_REDIRECT
                    } else {
                        STATUS_TEMPORARY_REDIRECT
                    },
                });
            }
        }
        None
    }

    /// First matching rewrite rule, with parameters substituted.
    pub fn match_rewrite(&self, path: &str) -> Option<RewriteMatch> {
        for rule in &self.rewrites {
            if let Some(values) = rule.pattern.matches(path) {
                return Some(RewriteMatch {
                    destination: substitute(&rule.destination, &values),
                });
            }
        }
        None
    }

    /// Accumulated headers for a response path.
    ///
    /// Every matching rule contributes its entries in declaration order; a
    /// later value for an already-set header name replaces the earlier one.
    pub fn headers_for(&self, path: &str) -> Vec<(String, String)> {
        let mut ordered: Vec<String> = Vec::new();
        let mut values: BTreeMap<String, String> = BTreeMap::new();

        for rule in &self.headers {
            if rule.pattern.matches(path).is_some() {
                for entry in &rule.headers {
                    if !values.contains_key(&entry.key) {
                        ordered.push(entry.key.clone());
                    }
                    values.insert(entry.key.clone(), entry.value.clone());
                }
            }
        }

        ordered
            .into_iter()
            .map(|key| {
                let value = values.remove(&key).unwrap_or_default();
                (key, value)
            })
            .collect()
    }
}

fn check_destination(pattern: &PathPattern, destination: &str) -> Result<(), SiteCfgError> {
    for param in destination_params(destination) {
        if !pattern.params().iter().any(|p| *p == param) {
            return Err(SiteCfgError::UnboundRouteParam {
                destination: destination.to_string(),
                param,
            });
        }
    }
    Ok(())
}
