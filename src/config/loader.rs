//! Dataset loader
//!
//! Pipeline:
//! 1. Size limit check
//! 2. UTF-8 BOM strip
//! 3. Environment variable expansion (pre-parse, on raw text)
//! 4. YAML parsing and empty-file rejection
//! 5. Deserialization to typed config
//! 6. Validation
//! 7. Freeze with `Arc`

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_yaml::Value;
use tracing::debug;

use crate::config::schema::DatasetConfig;
use crate::config::validation::Validator;
use crate::error::ConfigError;
use crate::resolver::DeadlineDraft;

// ============================================================================
// Public API
// ============================================================================

/// Limits guarding against oversized datasets.
#[derive(Debug, Clone)]
pub struct ConfigLimits {
    /// Maximum dataset file size in bytes.
    pub max_config_size: usize,

    /// Maximum number of deadline drafts.
    pub max_deadlines: usize,

    /// Maximum number of subjects.
    pub max_subjects: usize,
}

impl Default for ConfigLimits {
    fn default() -> Self {
        Self {
            max_config_size: env_or("PHASEGATE_MAX_CONFIG_SIZE", 10 * 1024 * 1024),
            max_deadlines: env_or("PHASEGATE_MAX_DEADLINES", 10_000),
            max_subjects: env_or("PHASEGATE_MAX_SUBJECTS", 100_000),
        }
    }
}

/// Result of loading a dataset file.
#[derive(Debug)]
pub struct LoadResult {
    /// The loaded and validated dataset.
    pub config: Arc<DatasetConfig>,

    /// Warnings encountered during loading.
    pub warnings: Vec<LoadWarning>,
}

/// Warning during dataset loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadWarning {
    /// Warning message.
    pub message: String,

    /// Location where the warning occurred.
    pub location: Option<String>,
}

impl std::fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.location {
            Some(location) => write!(f, "{} at {location}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Dataset loader.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    limits: ConfigLimits,
}

impl ConfigLoader {
    /// Creates a loader with the given limits.
    #[must_use]
    pub const fn new(limits: ConfigLimits) -> Self {
        Self { limits }
    }

    /// Loads, validates and freezes a dataset file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or too large, an environment
    /// reference cannot be resolved, parsing fails, or validation reports
    /// errors.
    pub fn load(&self, path: &Path) -> Result<LoadResult, ConfigError> {
        let raw = self.read_limited(path)?;
        self.load_str(&raw, path)
    }

    /// Runs the pipeline on already-read text. `path` is used for messages.
    ///
    /// # Errors
    ///
    /// Same as [`ConfigLoader::load`], minus the file checks.
    pub fn load_str(&self, raw: &str, path: &Path) -> Result<LoadResult, ConfigError> {
        let mut warnings = Vec::new();
        let config: DatasetConfig = parse_document(raw, path, &mut warnings)?;

        let result = Validator::new().validate(&config, &self.limits);
        if result.has_errors() {
            return Err(ConfigError::ValidationError {
                path: path.display().to_string(),
                errors: result.errors,
            });
        }

        warnings.extend(result.warnings.into_iter().map(|issue| LoadWarning {
            message: issue.message,
            location: Some(issue.path),
        }));

        debug!(
            path = %path.display(),
            deadlines = config.deadlines.len(),
            subjects = config.subjects.len(),
            warnings = warnings.len(),
            "dataset loaded"
        );

        Ok(LoadResult {
            config: Arc::new(config),
            warnings,
        })
    }

    /// Loads a single deadline draft, as used by `phasegate evaluate`.
    ///
    /// The draft is not normalized here; see [`DeadlineDraft::into_record`].
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not describe a
    /// draft.
    pub fn load_draft(&self, path: &Path) -> Result<(DeadlineDraft, Vec<LoadWarning>), ConfigError> {
        let raw = self.read_limited(path)?;
        let mut warnings = Vec::new();
        let draft = parse_document(&raw, path, &mut warnings)?;
        Ok((draft, warnings))
    }

    fn read_limited(&self, path: &Path) -> Result<String, ConfigError> {
        let metadata = std::fs::metadata(path).map_err(|_| ConfigError::MissingFile {
            path: path.to_path_buf(),
        })?;

        let file_size = usize::try_from(metadata.len()).unwrap_or(usize::MAX);
        if file_size > self.limits.max_config_size {
            return Err(ConfigError::InvalidValue {
                field: "file_size".to_string(),
                value: format!("{file_size} bytes"),
                expected: format!("at most {} bytes", self.limits.max_config_size),
            });
        }

        std::fs::read_to_string(path).map_err(|_| ConfigError::MissingFile {
            path: path.to_path_buf(),
        })
    }
}

/// BOM strip, env substitution, YAML parse, typed deserialization.
fn parse_document<T: DeserializeOwned>(
    raw: &str,
    path: &Path,
    warnings: &mut Vec<LoadWarning>,
) -> Result<T, ConfigError> {
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);

    let mut env_sub = EnvSubstitution::new();
    let substituted = env_sub
        .substitute(raw, path)
        .map_err(|e| with_path(e, path))?;
    warnings.extend(env_sub.warnings);

    let root: Value = serde_yaml::from_str(&substituted).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        line: e.location().map(|l| l.line()),
        message: e.to_string(),
    })?;

    if root.is_null() {
        return Err(ConfigError::ParseError {
            path: path.to_path_buf(),
            line: None,
            message: "dataset file is empty".to_string(),
        });
    }

    serde_yaml::from_value(root).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        line: None,
        message: format!("failed to deserialize dataset: {e}"),
    })
}

/// Fills in the source path on parse errors raised before it was known.
fn with_path(error: ConfigError, path: &Path) -> ConfigError {
    match error {
        ConfigError::ParseError {
            path: p,
            line,
            message,
        } if p.as_os_str().is_empty() => ConfigError::ParseError {
            path: path.to_path_buf(),
            line,
            message,
        },
        other => other,
    }
}

// ============================================================================
// Environment Variable Substitution
// ============================================================================

/// Pre-parse environment variable substitution on raw YAML text.
struct EnvSubstitution {
    warnings: Vec<LoadWarning>,
}

type Chars<'a> = std::iter::Peekable<std::str::Chars<'a>>;

impl EnvSubstitution {
    const fn new() -> Self {
        Self {
            warnings: Vec::new(),
        }
    }

    /// Supports:
    /// - `${VAR}` - value, or empty string with a warning if unset
    /// - `${VAR:-default}` - default if unset
    /// - `${VAR:?message}` - error if unset
    /// - `$$` - literal `$`
    fn substitute(&mut self, raw_yaml: &str, source_path: &Path) -> Result<String, ConfigError> {
        let mut result = String::with_capacity(raw_yaml.len());
        let mut chars = raw_yaml.chars().peekable();

        while let Some(c) = chars.next() {
            if c != '$' {
                result.push(c);
                continue;
            }
            match chars.peek() {
                Some('$') => {
                    chars.next();
                    result.push('$');
                }
                Some('{') => {
                    chars.next();
                    let spec = parse_var_spec(&mut chars)?;
                    match (std::env::var(&spec.name), spec.fallback) {
                        (Ok(value), _) => result.push_str(&value),
                        (Err(_), Fallback::Default(default)) => result.push_str(&default),
                        (Err(_), Fallback::Required(message)) => {
                            return Err(ConfigError::EnvVarNotSet {
                                var: spec.name,
                                location: message,
                            });
                        }
                        (Err(_), Fallback::Empty) => {
                            self.warnings.push(LoadWarning {
                                message: format!(
                                    "environment variable '{}' is not set, using empty string",
                                    spec.name
                                ),
                                location: Some(source_path.display().to_string()),
                            });
                        }
                    }
                }
                _ => result.push(c),
            }
        }

        Ok(result)
    }
}

enum Fallback {
    Empty,
    Default(String),
    Required(String),
}

struct VarSpec {
    name: String,
    fallback: Fallback,
}

/// Parses the inside of `${...}`; the opening brace is already consumed.
fn parse_var_spec(chars: &mut Chars<'_>) -> Result<VarSpec, ConfigError> {
    let mut name = String::new();

    while let Some(c) = chars.next() {
        match c {
            '}' => {
                return Ok(VarSpec {
                    name,
                    fallback: Fallback::Empty,
                });
            }
            ':' => match chars.peek() {
                Some('-') => {
                    chars.next();
                    let default = read_until_close(chars, &name)?;
                    return Ok(VarSpec {
                        name,
                        fallback: Fallback::Default(default),
                    });
                }
                Some('?') => {
                    chars.next();
                    let message = read_until_close(chars, &name)?;
                    return Ok(VarSpec {
                        name,
                        fallback: Fallback::Required(message),
                    });
                }
                _ => name.push(':'),
            },
            _ => name.push(c),
        }
    }

    Err(unclosed(&name))
}

/// Reads up to the matching `}`, allowing nested braces.
fn read_until_close(chars: &mut Chars<'_>, name: &str) -> Result<String, ConfigError> {
    let mut value = String::new();
    let mut depth = 1usize;

    for c in chars.by_ref() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(value);
                }
            }
            _ => {}
        }
        value.push(c);
    }

    Err(unclosed(name))
}

fn unclosed(name: &str) -> ConfigError {
    ConfigError::ParseError {
        path: PathBuf::new(),
        line: None,
        message: format!("unclosed environment variable reference: ${{{name}"),
    }
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// ============================================================================
// Tests
// ============================================================================
