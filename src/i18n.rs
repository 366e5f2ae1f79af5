//! Locale policy: supported locales, default locale and per-domain
//! defaults.
//!
//! The host's request router uses the domain table to pick a locale without
//! a path prefix when a request arrives on a mapped domain.

use crate::error::SiteCfgError;
use serde::{Deserialize, Serialize};

/// Maps a serving domain to its default locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LocaleDomain {
    /// Serving domain, e.g. `example.fr`
    pub domain: String,
    /// Locale selected for requests on this domain
    pub default_locale: String,
}

/// Internationalization settings.
///
/// # Examples
///
/// ```
/// use sitecfg::i18n::LocalePolicy;
///
/// let policy = LocalePolicy {
///     locales: vec!["en-US".into(), "fr".into()],
///     default_locale: "en-US".into(),
///     domains: Vec::new(),
/// };
/// assert!(policy.validate().is_ok());
/// assert!(policy.is_supported("fr"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LocalePolicy {
    /// Locales the application is built for
    pub locales: Vec<String>,
    /// Locale used when no other selection applies
    pub default_locale: String,
    /// Per-domain locale defaults
    #[serde(default)]
    pub domains: Vec<LocaleDomain>,
}

impl LocalePolicy {
    /// Enforce the membership invariants: `default_locale` and every domain
    /// default must be in `locales`, and every tag must be well-formed.
    pub fn validate(&self) -> Result<(), SiteCfgError> {
        for tag in &self.locales {
            if !is_well_formed_tag(tag) {
                return Err(SiteCfgError::UnknownLocale {
                    locale: tag.clone(),
                    available: self.locales.clone(),
                });
            }
        }

        if !self.is_supported(&self.default_locale) {
            return Err(SiteCfgError::UnknownLocale {
                locale: self.default_locale.clone(),
                available: self.locales.clone(),
            });
        }

        for domain in &self.domains {
            if domain.domain.is_empty() || domain.domain.contains('/') || domain.domain.contains(':')
            {
                return Err(SiteCfgError::InvalidLocaleDomain {
                    domain: domain.domain.clone(),
                });
            }
            if !self.is_supported(&domain.default_locale) {
                return Err(SiteCfgError::UnknownLocale {
                    locale: domain.default_locale.clone(),
                    available: self.locales.clone(),
                });
            }
        }
        Ok(())
    }

    /// Whether a locale tag is in the declared set.
    pub fn is_supported(&self, tag: &str) -> bool {
        self.locales.iter().any(|l| l == tag)
    }

    /// Default locale for a serving domain, if mapped. Host comparison is
    /// case-insensitive per DNS.
    pub fn locale_for_domain(&self, host: &str) -> Option<&str> {
        self.domains
            .iter()
            .find(|d| d.domain.eq_ignore_ascii_case(host))
            .map(|d| d.default_locale.as_str())
    }
}

/// Language tag shape check: `xx`/`xxx` optionally followed by `-XX` region.
fn is_well_formed_tag(tag: &str) -> bool {
    let mut parts = tag.split('-');
    let lang = match parts.next() {
        Some(l) => l,
        None => return false,
    };
    if !(2..=3).contains(&lang.len()) || !lang.chars().all(|c| c.is_ascii_lowercase()) {
        return false;
    }
    match parts.next() {
        None => parts.next().is_none(),
        Some(region) => {
            parts.next().is_none()
                && region.len() == 2
                && region.chars().all(|c| c.is_ascii_uppercase())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_policy() -> LocalePolicy {
        LocalePolicy {
            locales: vec![
                "en-US".to_string(),
                "fr".to_string(),
                "nl-NL".to_string(),
                "es".to_string(),
            ],
            default_locale: "en-US".to_string(),
            domains: vec![
                LocaleDomain {
                    domain: "example.com".to_string(),
                    default_locale: "en-US".to_string(),
                },
                LocaleDomain {
                    domain: "example.fr".to_string(),
                    default_locale: "fr".to_string(),
                },
            ],
        }
    }

    #[test]
    fn test_sample_policy_is_valid() {
        sample_policy().validate().unwrap();
    }

    #[test]
    fn test_default_locale_outside_set_is_rejected() {
        let mut policy = sample_policy();
        policy.default_locale = "de".to_string();
        let err = policy.validate().unwrap_err();
        match err {
            SiteCfgError::UnknownLocale { locale, available } => {
                assert_eq!(locale, "de");
                assert_eq!(available.len(), 4);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_domain_default_outside_set_is_rejected() {
        let mut policy = sample_policy();
        policy.domains.push(LocaleDomain {
            domain: "example.de".to_string(),
            default_locale: "de".to_string(),
        });
        assert!(policy.validate().is_err());
    }

    #[test]
    fn test_malformed_locale_tag_is_rejected() {
        let mut policy = sample_policy();
        policy.locales.push("English".to_string());
        assert!(policy.validate().is_err());
    }

    #[test]
    fn test_domain_lookup_is_case_insensitive() {
        let policy = sample_policy();
        assert_eq!(policy.locale_for_domain("EXAMPLE.FR"), Some("fr"));
        assert_eq!(policy.locale_for_domain("example.com"), Some("en-US"));
        assert_eq!(policy.locale_for_domain("example.nl"), None);
    }

    #[test]
    fn test_tag_shape_check() {
        assert!(is_well_formed_tag("en"));
        assert!(is_well_formed_tag("en-US"));
        assert!(is_well_formed_tag("nld"));
        assert!(!is_well_formed_tag("EN"));
        assert!(!is_well_formed_tag("en-us"));
        assert!(!is_well_formed_tag("e"));
        assert!(!is_well_formed_tag("en-US-x"));
        assert!(!is_well_formed_tag(""));
    }
}
