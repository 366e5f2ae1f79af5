//! Image optimization policy
//!
//! The remote-pattern allow-list is a security boundary: the host's image
//! optimizer may only fetch sources matching a listed (protocol, hostname,
//! port, pathname) tuple. Anything else is denied by default.

use crate::error::SiteCfgError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

/// Output formats the host's optimizer can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageFormat {
    /// WebP output
    #[serde(rename = "image/webp")]
    Webp,
    /// AVIF output
    #[serde(rename = "image/avif")]
    Avif,
}

impl ImageFormat {
    /// MIME-style name as it appears on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageFormat::Webp => "image/webp",
            ImageFormat::Avif => "image/avif",
        }
    }

    /// Names of all supported formats, for error messages.
    pub fn supported_names() -> Vec<String> {
        vec!["image/webp".to_string(), "image/avif".to_string()]
    }
}

/// An allow-list entry describing permitted external image sources.
///
/// `pathname` is a glob where `*` matches one path segment and `**` matches
/// any number of segments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RemotePattern {
    /// URL scheme, `http` or `https`
    pub protocol: String,
    /// Exact hostname
    pub hostname: String,
    /// Port, empty for the scheme default
    #[serde(default)]
    pub port: String,
    /// Pathname glob, e.g. `/**` or `/images/**`
    #[serde(default = "default_pathname")]
    pub pathname: String,
}

fn default_pathname() -> String {
    "/**".to_string()
}

impl RemotePattern {
    /// Check the tuple for well-formedness.
    ///
    /// The tuple must independently describe at least one plausible URL, so
    /// validation constructs its canonical example and parses it.
    pub fn validate(&self) -> Result<(), SiteCfgError> {
        let reject = |reason: &str| SiteCfgError::InvalidRemotePattern {
            protocol: self.protocol.clone(),
            hostname: self.hostname.clone(),
            pathname: self.pathname.clone(),
            reason: reason.to_string(),
        };

        if self.protocol != "http" && self.protocol != "https" {
            return Err(reject("protocol must be 'http' or 'https'"));
        }
        if self.hostname.is_empty() || self.hostname.contains('/') || self.hostname.contains(':') {
            return Err(reject("hostname must be a bare host, without port or path"));
        }
        if !self.port.is_empty() && self.port.parse::<u16>().is_err() {
            return Err(reject("port must be empty or a number"));
        }
        if !self.pathname.starts_with('/') {
            return Err(reject("pathname must start with '/'"));
        }
        pathname_regex(&self.pathname).map_err(|_| reject("pathname glob does not compile"))?;

        let example = self.example_url();
        let parsed = Url::parse(&example).map_err(|_| reject("tuple does not form a valid URL"))?;
        if parsed.host_str() != Some(self.hostname.as_str()) {
            return Err(reject("hostname is not a valid URL host"));
        }
        Ok(())
    }

    /// A canonical URL this pattern matches, used for validation and
    /// diagnostics.
    pub fn example_url(&self) -> String {
        let path = self
            .pathname
            .replace("**", "example.png")
            .replace('*', "example.png");
        let port = if self.port.is_empty() {
            String::new()
        } else {
            format!(":{}", self.port)
        };
        format!("{}://{}{}{}", self.protocol, self.hostname, port, path)
    }

    /// Whether a URL is covered by this pattern.
    ///
    /// # Examples
    ///
    /// ```
    /// use sitecfg::images::RemotePattern;
    /// use url::Url;
    ///
    /// let pattern = RemotePattern {
    ///     protocol: "https".to_string(),
    ///     hostname: "images.pexels.com".to_string(),
    ///     port: String::new(),
    ///     pathname: "/**".to_string(),
    /// };
    ///
    /// let allowed = Url::parse("https://images.pexels.com/photos/1.jpg").unwrap();
    /// let denied = Url::parse("https://evil.example/photos/1.jpg").unwrap();
    /// assert!(pattern.matches(&allowed));
    /// assert!(!pattern.matches(&denied));
    /// ```
    pub fn matches(&self, url: &Url) -> bool {
        if url.scheme() != self.protocol {
            return false;
        }
        if url.host_str() != Some(self.hostname.as_str()) {
            return false;
        }
        if !self.port.is_empty() {
            let want: Option<u16> = self.port.parse().ok();
            if want.is_none() || url.port_or_known_default() != want {
                return false;
            }
        }
        match pathname_regex(&self.pathname) {
            Ok(re) => re.is_match(url.path()),
            Err(_) => false,
        }
    }
}

/// Compile a pathname glob into an anchored regex.
fn pathname_regex(glob: &str) -> Result<Regex, regex::Error> {
    let mut pattern = String::from("^");
    let mut chars = glob.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '*' {
            if chars.peek() == Some(&'*') {
                chars.next();
                pattern.push_str(".*");
            } else {
                pattern.push_str("[^/]+");
            }
        } else {
            pattern.push_str(&regex::escape(&c.to_string()));
        }
    }
    pattern.push('$');
    Regex::new(&pattern)
}

/// Image optimization settings for the host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ImagePolicy {
    /// Allowed remote sources; empty means no remote optimization
    pub remote_patterns: Vec<RemotePattern>,
    /// Output formats in preference order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formats: Option<Vec<ImageFormat>>,
    /// Responsive breakpoints for full-width images
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_sizes: Option<Vec<u32>>,
    /// Fixed sizes for constrained images
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_sizes: Option<Vec<u32>>,
    /// Minimum cache lifetime for optimized images, in seconds
    #[serde(rename = "minimumCacheTTL", skip_serializing_if = "Option::is_none")]
    pub minimum_cache_ttl: Option<u64>,
    /// Allow SVG sources through the optimizer
    #[serde(rename = "dangerouslyAllowSVG", skip_serializing_if = "Option::is_none")]
    pub dangerously_allow_svg: Option<bool>,
    /// Content-Disposition type for served images
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_disposition_type: Option<String>,
    /// Content-Security-Policy applied to served images
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_security_policy: Option<String>,
}

impl ImagePolicy {
    /// Whether a remote URL may be optimized. Deny by default.
    pub fn allows(&self, url: &Url) -> bool {
        self.remote_patterns.iter().any(|p| p.matches(url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(protocol: &str, hostname: &str, pathname: &str) -> RemotePattern {
        RemotePattern {
            protocol: protocol.to_string(),
            hostname: hostname.to_string(),
            port: String::new(),
            pathname: pathname.to_string(),
        }
    }

    #[test]
    fn test_every_pattern_matches_its_own_example_url() {
        for p in [
            pattern("https", "images.pexels.com", "/**"),
            pattern("https", "placehold.co", "/**"),
            pattern("https", "cdn.example.com", "/images/**"),
        ] {
            p.validate().unwrap();
            let example = Url::parse(&p.example_url()).unwrap();
            assert!(p.matches(&example), "pattern should match {}", example);
        }
    }

    #[test]
    fn test_foreign_host_is_denied() {
        let policy = ImagePolicy {
            remote_patterns: vec![pattern("https", "images.pexels.com", "/**")],
            ..Default::default()
        };
        let foreign = Url::parse("https://attacker.example/photo.jpg").unwrap();
        assert!(!policy.allows(&foreign));
    }

    #[test]
    fn test_empty_allow_list_denies_everything() {
        let policy = ImagePolicy::default();
        let url = Url::parse("https://images.pexels.com/photos/1.jpg").unwrap();
        assert!(!policy.allows(&url));
    }

    #[test]
    fn test_scoped_pathname_limits_matches() {
        let p = pattern("https", "cdn.example.com", "/images/**");
        assert!(p.matches(&Url::parse("https://cdn.example.com/images/a/b.png").unwrap()));
        assert!(!p.matches(&Url::parse("https://cdn.example.com/files/a.png").unwrap()));
    }

    #[test]
    fn test_single_star_matches_one_segment_only() {
        let p = pattern("https", "cdn.example.com", "/avatars/*");
        assert!(p.matches(&Url::parse("https://cdn.example.com/avatars/u1.png").unwrap()));
        assert!(!p.matches(&Url::parse("https://cdn.example.com/avatars/u1/full.png").unwrap()));
    }

    #[test]
    fn test_protocol_mismatch_is_denied() {
        let p = pattern("https", "images.pexels.com", "/**");
        assert!(!p.matches(&Url::parse("http://images.pexels.com/a.jpg").unwrap()));
    }

    #[test]
    fn test_explicit_port_must_match() {
        let mut p = pattern("https", "cdn.example.com", "/**");
        p.port = "8443".to_string();
        assert!(p.matches(&Url::parse("https://cdn.example.com:8443/a.png").unwrap()));
        assert!(!p.matches(&Url::parse("https://cdn.example.com/a.png").unwrap()));
    }

    #[test]
    fn test_validate_rejects_bad_protocol() {
        let p = pattern("ftp", "cdn.example.com", "/**");
        assert!(matches!(
            p.validate(),
            Err(SiteCfgError::InvalidRemotePattern { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_hostname_with_path() {
        let p = pattern("https", "cdn.example.com/images", "/**");
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_relative_pathname() {
        let p = pattern("https", "cdn.example.com", "images/**");
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_numeric_port() {
        let mut p = pattern("https", "cdn.example.com", "/**");
        p.port = "https".to_string();
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_image_format_serde_uses_mime_names() {
        let json = serde_json::to_string(&ImageFormat::Webp).unwrap();
        assert_eq!(json, "\"image/webp\"");
        let back: ImageFormat = serde_json::from_str("\"image/avif\"").unwrap();
        assert_eq!(back, ImageFormat::Avif);
    }

    #[test]
    fn test_unsupported_format_string_fails_deserialization() {
        assert!(serde_json::from_str::<ImageFormat>("\"image/bmp\"").is_err());
    }
}
