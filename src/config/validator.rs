//! Configuration validation system
//!
//! Pluggable validation over the typed record. The built-in validators
//! cover the contract invariants: remote-pattern well-formedness, route
//! pattern compilation, locale membership and image-policy sanity. Errors
//! here are what the host would fatally reject at build start; warnings are
//! advisory.

use super::file::ConfigFile;
use crate::images::ImageFormat;
use crate::routing::{destination_params, PathPattern};
use parking_lot::Mutex;
use std::sync::Arc;

/// Validation severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ValidationSeverity {
    /// Informational message
    Info,
    /// Warning - should be addressed but not blocking
    Warning,
    /// Error - must be fixed
    Error,
}

impl ValidationSeverity {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationSeverity::Info => "INFO",
            ValidationSeverity::Warning => "WARNING",
            ValidationSeverity::Error => "ERROR",
        }
    }
}

/// A validation issue found in configuration
///
/// # Examples
///
/// ```
/// use sitecfg::config::validator::{ValidationIssue, ValidationSeverity};
///
/// let issue = ValidationIssue::error("i18n.defaultLocale", "not in locale set");
/// assert_eq!(issue.severity, ValidationSeverity::Error);
///
/// let warning = ValidationIssue::warning("images", "SVG allowed without a CSP")
///     .with_suggestion("Set images.contentSecurityPolicy when allowing SVG");
/// assert!(warning.suggestion.is_some());
/// ```
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    /// Severity level
    pub severity: ValidationSeverity,
    /// Field or section that has the issue
    pub field: String,
    /// Description of the issue
    pub message: String,
    /// Suggested fix (if available)
    pub suggestion: Option<String>,
}

impl ValidationIssue {
    /// Create a new validation issue
    pub fn new(
        severity: ValidationSeverity,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            field: field.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    /// Add a suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Create an error issue
    pub fn error(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ValidationSeverity::Error, field, message)
    }

    /// Create a warning issue
    pub fn warning(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ValidationSeverity::Warning, field, message)
    }

    /// Create an info issue
    pub fn info(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ValidationSeverity::Info, field, message)
    }
}

/// Result of configuration validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    /// Issues found during validation
    pub issues: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Create an empty (passing) validation result
    pub fn success() -> Self {
        Self::default()
    }

    /// Add an issue
    pub fn add_issue(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }

    /// Whether validation passed (no errors; warnings allowed)
    pub fn is_valid(&self) -> bool {
        !self.has_errors()
    }

    /// Check if there are any errors
    pub fn has_errors(&self) -> bool {
        self.issues
            .iter()
            .any(|i| i.severity == ValidationSeverity::Error)
    }

    /// Get only errors
    pub fn errors(&self) -> Vec<&ValidationIssue> {
        self.issues
            .iter()
            .filter(|i| i.severity == ValidationSeverity::Error)
            .collect()
    }

    /// Get only warnings
    pub fn warnings(&self) -> Vec<&ValidationIssue> {
        self.issues
            .iter()
            .filter(|i| i.severity == ValidationSeverity::Warning)
            .collect()
    }
}

/// Trait for pluggable configuration validators
pub trait ConfigValidator: Send + Sync {
    /// Validator name
    fn name(&self) -> &str;

    /// Validate the typed record
    fn validate(&self, config: &ConfigFile) -> ValidationResult;

    /// Get validator priority (lower runs first)
    fn priority(&self) -> u32 {
        100
    }
}

/// Registry for managing configuration validators
#[derive(Default)]
pub struct ValidatorRegistry {
    validators: Mutex<Vec<Arc<dyn ConfigValidator>>>,
}

impl ValidatorRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the contract's built-in validators
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        registry.register(Arc::new(RemotePatternValidator));
        registry.register(Arc::new(RouteRuleValidator));
        registry.register(Arc::new(LocaleValidator));
        registry.register(Arc::new(ImagePolicyValidator));
        registry
    }

    /// Register a validator
    pub fn register(&self, validator: Arc<dyn ConfigValidator>) {
        let mut validators = self.validators.lock();
        validators.push(validator);
        // Sort by priority
        validators.sort_by_key(|v| v.priority());
    }

    /// Run all validators
    pub fn validate_all(&self, config: &ConfigFile) -> ValidationResult {
        let validators = self.validators.lock();

        let mut result = ValidationResult::success();
        for validator in validators.iter() {
            log::debug!("running validator '{}'", validator.name());
            for issue in validator.validate(config).issues {
                result.add_issue(issue);
            }
        }
        result
    }

    /// Get validator count
    pub fn count(&self) -> usize {
        self.validators.lock().len()
    }
}

/// Checks remote image patterns for well-formedness.
pub struct RemotePatternValidator;

impl ConfigValidator for RemotePatternValidator {
    fn name(&self) -> &str {
        "remote-patterns"
    }

    fn validate(&self, config: &ConfigFile) -> ValidationResult {
        let mut result = ValidationResult::success();
        let Some(ref images) = config.images else {
            return result;
        };

        for (index, pattern) in images.remote_patterns.iter().enumerate() {
            if let Err(e) = pattern.validate() {
                result.add_issue(
                    ValidationIssue::error(
                        format!("images.remotePatterns[{}]", index),
                        e.to_string(),
                    )
                    .with_suggestion(
                        "Each entry needs protocol http/https, a bare hostname and a \
                         '/'-rooted pathname glob",
                    ),
                );
            }
        }
        result
    }

    fn priority(&self) -> u32 {
        10
    }
}

/// Compiles every route source and checks destination parameters.
pub struct RouteRuleValidator;

impl RouteRuleValidator {
    fn check_rule(
        result: &mut ValidationResult,
        field: String,
        source: &str,
        destination: Option<&str>,
    ) {
        let pattern = match PathPattern::compile(source) {
            Ok(p) => p,
            Err(e) => {
                result.add_issue(ValidationIssue::error(field, e.to_string()));
                return;
            }
        };
        if let Some(destination) = destination {
            for param in destination_params(destination) {
                if !pattern.params().iter().any(|p| *p == param) {
                    result.add_issue(
                        ValidationIssue::error(
                            field.clone(),
                            format!("destination references unbound parameter ':{}'", param),
                        )
                        .with_suggestion(format!("Bind ':{}' in the source pattern", param)),
                    );
                }
            }
        }
    }
}

impl ConfigValidator for RouteRuleValidator {
    fn name(&self) -> &str {
        "route-rules"
    }

    fn validate(&self, config: &ConfigFile) -> ValidationResult {
        let mut result = ValidationResult::success();

        for (i, rule) in config.redirects.iter().flatten().enumerate() {
            Self::check_rule(
                &mut result,
                format!("redirects[{}]", i),
                &rule.source,
                Some(&rule.destination),
            );
        }
        for (i, rule) in config.rewrites.iter().flatten().enumerate() {
            Self::check_rule(
                &mut result,
                format!("rewrites[{}]", i),
                &rule.source,
                Some(&rule.destination),
            );
        }
        for (i, rule) in config.headers.iter().flatten().enumerate() {
            Self::check_rule(&mut result, format!("headers[{}]", i), &rule.source, None);
            if rule.headers.is_empty() {
                result.add_issue(ValidationIssue::warning(
                    format!("headers[{}]", i),
                    "rule matches paths but sets no headers",
                ));
            }
        }
        result
    }

    fn priority(&self) -> u32 {
        20
    }
}

/// Enforces locale membership invariants.
pub struct LocaleValidator;

impl ConfigValidator for LocaleValidator {
    fn name(&self) -> &str {
        "locales"
    }

    fn validate(&self, config: &ConfigFile) -> ValidationResult {
        let mut result = ValidationResult::success();
        let Some(ref i18n) = config.i18n else {
            return result;
        };

        if i18n.locales.is_empty() {
            result.add_issue(ValidationIssue::error(
                "i18n.locales",
                "locale set must not be empty",
            ));
            return result;
        }
        if let Err(e) = i18n.validate() {
            result.add_issue(
                ValidationIssue::error("i18n", e.to_string()).with_suggestion(format!(
                    "Declared locales: {}",
                    i18n.locales.join(", ")
                )),
            );
        }
        result
    }

    fn priority(&self) -> u32 {
        30
    }
}

/// Sanity checks on the image policy beyond pattern shape.
pub struct ImagePolicyValidator;

impl ConfigValidator for ImagePolicyValidator {
    fn name(&self) -> &str {
        "image-policy"
    }

    fn validate(&self, config: &ConfigFile) -> ValidationResult {
        let mut result = ValidationResult::success();
        let Some(ref images) = config.images else {
            return result;
        };

        for (field, sizes) in [
            ("images.deviceSizes", &images.device_sizes),
            ("images.imageSizes", &images.image_sizes),
        ] {
            if let Some(sizes) = sizes {
                if sizes.is_empty() {
                    result.add_issue(ValidationIssue::error(field, "size table must not be empty"));
                } else if sizes.windows(2).any(|w| w[0] >= w[1]) {
                    result.add_issue(ValidationIssue::error(
                        field,
                        "sizes must be strictly ascending",
                    ));
                } else if sizes.iter().any(|s| *s == 0 || *s > 10_000) {
                    result.add_issue(ValidationIssue::error(
                        field,
                        "sizes must be between 1 and 10000 pixels",
                    ));
                }
            }
        }

        if images.minimum_cache_ttl == Some(0) {
            result.add_issue(ValidationIssue::error(
                "images.minimumCacheTTL",
                "cache lifetime must be at least 1 second",
            ));
        }

        if let Some(ref formats) = images.formats {
            if formats.is_empty() {
                result.add_issue(ValidationIssue::error(
                    "images.formats",
                    format!(
                        "at least one output format is required ({})",
                        ImageFormat::supported_names().join(", ")
                    ),
                ));
            }
        }

        if images.dangerously_allow_svg == Some(true)
            && images.content_security_policy.is_none()
        {
            result.add_issue(
                ValidationIssue::warning(
                    "images.dangerouslyAllowSVG",
                    "SVG sources allowed without a content security policy",
                )
                .with_suggestion("Set images.contentSecurityPolicy when allowing SVG"),
            );
        }
        result
    }

    fn priority(&self) -> u32 {
        40
    }
}
