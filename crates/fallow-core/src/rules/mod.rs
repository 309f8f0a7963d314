//! Rule trait, metadata, and the registry the engine runs files through
//!
//! A rule inspects one [`ParsedFile`] and returns diagnostics. The registry
//! owns the registered rules and applies the configuration switches: an
//! optional allowlist, a denylist, per-rule severity overrides, and
//! category toggles. Rules are addressable by id (`Q001`) or by name
//! (`no-unused-bindings`) everywhere a switch takes a rule reference.

pub mod quality;

use std::collections::{HashMap, HashSet};

use crate::config::RulesConfig;
use crate::diagnostic::Diagnostic;
use crate::exceptions::InvariantViolation;
use crate::parser::ParsedFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
    Info,
    Hint,
}

/// How certain a diagnostic is to be a real finding. The engine can drop
/// everything below a configured floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Confidence {
    #[default]
    High,
    Medium,
    Low,
}

impl Confidence {
    pub fn level(&self) -> u8 {
        match self {
            Confidence::High => 3,
            Confidence::Medium => 2,
            Confidence::Low => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleCategory {
    Quality,
    Security,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMetadata {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: RuleCategory,
    pub severity: Severity,
    pub docs_url: Option<&'static str>,
    pub examples: Option<&'static str>,
}

impl RuleMetadata {
    /// True when `reference` is this rule's id or name.
    fn matches(&self, reference: &str) -> bool {
        self.id == reference || self.name == reference
    }
}

/// Failure of a rule run. Rules are total over well-formed input; the only
/// current source of failure is a broken scope-graph invariant, which
/// aborts the whole analysis of the file rather than producing partial
/// results.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    #[error("scope graph invariant broken: {0}")]
    Invariant(#[from] InvariantViolation),
}

pub trait Rule: Send + Sync {
    fn metadata(&self) -> &RuleMetadata;
    fn check(&self, file: &ParsedFile) -> Result<Vec<Diagnostic>, RuleError>;
}

#[derive(Default)]
pub struct RuleRegistry {
    rules: Vec<Box<dyn Rule>>,
    /// Allowlist of rule ids/names; empty means every registered rule runs.
    enabled: HashSet<String>,
    /// Denylist, applied after the allowlist.
    disabled: HashSet<String>,
    severity_overrides: HashMap<String, Severity>,
    disabled_categories: HashSet<RuleCategory>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, rule: Box<dyn Rule>) {
        self.rules.push(rule);
    }

    /// Replaces the registry's switches with the ones from `config`.
    pub fn configure(&mut self, config: &RulesConfig) {
        self.enabled = config.enabled.iter().cloned().collect();
        self.disabled = config.disabled.iter().cloned().collect();
        self.severity_overrides = config
            .severity
            .iter()
            .map(|(rule_ref, value)| (rule_ref.clone(), (*value).into()))
            .collect();

        self.disabled_categories.clear();
        if config.quality == Some(false) {
            self.disabled_categories.insert(RuleCategory::Quality);
        }
        if config.security == Some(false) {
            self.disabled_categories.insert(RuleCategory::Security);
        }
    }

    pub fn rules(&self) -> impl Iterator<Item = &dyn Rule> {
        self.rules.iter().map(|r| r.as_ref())
    }

    /// Runs every active rule over `file` and collects the diagnostics,
    /// with severity overrides applied. The first failing rule aborts the
    /// run.
    pub fn run_all(&self, file: &ParsedFile) -> Result<Vec<Diagnostic>, RuleError> {
        let mut all = Vec::new();
        for rule in self.rules() {
            if !self.is_active(rule.metadata()) {
                continue;
            }
            let mut diagnostics = rule.check(file)?;
            if let Some(severity) = self.severity_override_for(rule.metadata()) {
                for diagnostic in &mut diagnostics {
                    diagnostic.severity = severity;
                }
            }
            all.append(&mut diagnostics);
        }
        Ok(all)
    }

    fn is_active(&self, metadata: &RuleMetadata) -> bool {
        if self.disabled_categories.contains(&metadata.category) {
            return false;
        }
        if !self.enabled.is_empty() && !referenced_in(&self.enabled, metadata) {
            return false;
        }
        !referenced_in(&self.disabled, metadata)
    }

    fn severity_override_for(&self, metadata: &RuleMetadata) -> Option<Severity> {
        self.severity_overrides
            .get(metadata.id)
            .or_else(|| self.severity_overrides.get(metadata.name))
            .copied()
    }

    pub fn is_rule_enabled(&self, id_or_name: &str) -> bool {
        self.rules()
            .find(|r| r.metadata().matches(id_or_name))
            .is_some_and(|r| self.is_active(r.metadata()))
    }

    pub fn get_rule(&self, id: &str) -> Option<&dyn Rule> {
        self.rules().find(|r| r.metadata().id == id)
    }

    pub fn get_rule_by_name(&self, name: &str) -> Option<&dyn Rule> {
        self.rules().find(|r| r.metadata().name == name)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

fn referenced_in(set: &HashSet<String>, metadata: &RuleMetadata) -> bool {
    set.contains(metadata.id) || set.contains(metadata.name)
}

/// Generates the struct and constructor for a rule, leaving only the
/// `Rule` impl to write by hand.
#[macro_export]
macro_rules! declare_rule {
    (
        $name:ident,
        id = $id:literal,
        name = $rule_name:literal,
        description = $desc:literal,
        category = $cat:ident,
        severity = $sev:ident
        $(, docs_url = $url:literal)?
        $(, examples = $examples:literal)?
    ) => {
        pub struct $name {
            metadata: $crate::rules::RuleMetadata,
        }

        impl $name {
            pub fn new() -> Self {
                Self {
                    metadata: $crate::rules::RuleMetadata {
                        id: $id,
                        name: $rule_name,
                        description: $desc,
                        category: $crate::rules::RuleCategory::$cat,
                        severity: $crate::rules::Severity::$sev,
                        docs_url: declare_rule!(@option $($url)?),
                        examples: declare_rule!(@option $($examples)?),
                    },
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }
    };
    (@option $value:literal) => { Some($value) };
    (@option) => { None };
}
