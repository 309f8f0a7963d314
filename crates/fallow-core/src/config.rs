//! `fallow.toml` discovery, loading, and path filtering
//!
//! A config file is discovered by walking parent directories from the
//! analysis root. It carries include/exclude globs applied to analyzed
//! paths and the rule switches handed to the registry. Unknown keys are
//! collected as warnings instead of failing the load, so a typo degrades
//! to a notice rather than silently disabling analysis.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::rules::{Confidence, Severity};

pub const CONFIG_FILENAME: &str = "fallow.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid TOML in '{path}': {message}")]
    Parse { path: PathBuf, message: String },
}

#[derive(Debug, Clone, Default)]
pub struct ConfigResult {
    pub config: Config,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub rules: RulesConfig,
}

impl Config {
    /// True when `path` passes the include/exclude filters. An empty
    /// include list admits everything; exclude wins over include.
    pub fn is_path_included(&self, path: &str) -> bool {
        if matches_any(&self.exclude, path) {
            return false;
        }
        self.include.is_empty() || matches_any(&self.include, path)
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct RulesConfig {
    pub enabled: Vec<String>,
    pub disabled: Vec<String>,
    #[serde(default)]
    pub severity: HashMap<String, SeverityValue>,
    pub quality: Option<bool>,
    pub security: Option<bool>,
    pub min_confidence: Option<ConfidenceValue>,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum SeverityValue {
    Error,
    Warning,
    Info,
    Hint,
}

impl From<SeverityValue> for Severity {
    fn from(value: SeverityValue) -> Self {
        match value {
            SeverityValue::Error => Severity::Error,
            SeverityValue::Warning => Severity::Warning,
            SeverityValue::Info => Severity::Info,
            SeverityValue::Hint => Severity::Hint,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceValue {
    High,
    Medium,
    Low,
}

impl From<ConfidenceValue> for Confidence {
    fn from(value: ConfidenceValue) -> Self {
        match value {
            ConfidenceValue::High => Confidence::High,
            ConfidenceValue::Medium => Confidence::Medium,
            ConfidenceValue::Low => Confidence::Low,
        }
    }
}

/// Walks `start_dir` and its ancestors for the nearest `fallow.toml`.
pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();
    loop {
        let candidate = current.join(CONFIG_FILENAME);
        if candidate.exists() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    Ok(read_config(path)?.0)
}

/// Loads a config and reports unknown keys as warnings.
pub fn load_config_with_warnings(path: &Path) -> Result<ConfigResult, ConfigError> {
    let (config, content) = read_config(path)?;
    let warnings = unknown_key_warnings(&content);
    Ok(ConfigResult { config, warnings })
}

pub fn load_config_or_default(start_dir: &Path) -> Config {
    find_config_file(start_dir)
        .and_then(|path| load_config(&path).ok())
        .unwrap_or_default()
}

pub fn load_config_or_default_with_warnings(start_dir: &Path) -> ConfigResult {
    find_config_file(start_dir)
        .and_then(|path| load_config_with_warnings(&path).ok())
        .unwrap_or_default()
}

fn read_config(path: &Path) -> Result<(Config, String), ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.message().to_string(),
    })?;
    Ok((config, content))
}

const TOP_LEVEL_KEYS: &[&str] = &["include", "exclude", "rules"];
const RULES_KEYS: &[&str] = &[
    "enabled",
    "disabled",
    "severity",
    "quality",
    "security",
    "min_confidence",
];

fn unknown_key_warnings(content: &str) -> Vec<String> {
    let Ok(table) = content.parse::<toml::Table>() else {
        return Vec::new();
    };

    let mut warnings = unknown_keys(&table, TOP_LEVEL_KEYS, None);
    if let Some(toml::Value::Table(rules)) = table.get("rules") {
        warnings.extend(unknown_keys(rules, RULES_KEYS, Some("[rules]")));
    }
    warnings
}

fn unknown_keys(table: &toml::Table, known: &[&str], section: Option<&str>) -> Vec<String> {
    table
        .keys()
        .filter(|key| !known.contains(&key.as_str()))
        .map(|key| match section {
            Some(section) => format!("Unknown config option in {section}: '{key}'"),
            None => format!("Unknown config option: '{key}'"),
        })
        .collect()
}

fn matches_any(patterns: &[String], path: &str) -> bool {
    patterns.iter().any(|pattern| glob_matches(pattern, path))
}

/// Matches `path` against a glob pattern. `**` crosses directory
/// separators, `*` and `?` do not.
pub fn glob_matches(pattern: &str, path: &str) -> bool {
    match glob_to_regex(pattern) {
        Some(re) => re.is_match(path),
        None => false,
    }
}

fn glob_to_regex(pattern: &str) -> Option<regex::Regex> {
    let mut regex_str = String::with_capacity(pattern.len() * 2);
    regex_str.push('^');

    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' => {
                if chars.peek() == Some(&'*') {
                    chars.next();
                    if chars.peek() == Some(&'/') {
                        // "**/" also matches zero directories.
                        chars.next();
                        regex_str.push_str("(?:[^/]*/)*");
                    } else {
                        regex_str.push_str(".*");
                    }
                } else {
                    regex_str.push_str("[^/]*");
                }
            }
            '?' => regex_str.push_str("[^/]"),
            c if "\\^$.|+()[]{}".contains(c) => {
                regex_str.push('\\');
                regex_str.push(c);
            }
            c => regex_str.push(c),
        }
    }

    regex_str.push('$');
    regex::Regex::new(&regex_str).ok()
}
