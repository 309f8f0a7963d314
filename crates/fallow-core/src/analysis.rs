//! Analysis engine for code analysis and diagnostic generation
//!
//! Provides the top-level entry point: parse diagnostics, rule execution,
//! inline disable filtering, and the configured confidence floor.

use std::path::Path;

use tracing::{debug, warn};

use crate::config::{Config, load_config_or_default_with_warnings};
use crate::diagnostic::Diagnostic;
use crate::parser::ParsedFile;
use crate::rules::quality::NoUnusedBindings;
use crate::rules::{Confidence, RuleError, RuleRegistry, Severity};

pub struct AnalysisEngine {
    registry: RuleRegistry,
    min_confidence: Option<Confidence>,
}

impl AnalysisEngine {
    pub fn new() -> Self {
        Self {
            registry: create_default_registry(),
            min_confidence: None,
        }
    }

    pub fn with_config(config: &Config) -> Self {
        let mut registry = create_default_registry();
        registry.configure(&config.rules);
        Self {
            registry,
            min_confidence: config.rules.min_confidence.map(Into::into),
        }
    }

    /// Builds an engine from the nearest `fallow.toml` above `start_dir`,
    /// falling back to defaults when none exists. Unknown config keys are
    /// logged, not fatal.
    pub fn from_dir(start_dir: &Path) -> Self {
        let result = load_config_or_default_with_warnings(start_dir);
        for warning in &result.warnings {
            warn!(%warning, "configuration warning");
        }
        Self::with_config(&result.config)
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    pub fn analyze(&self, file: &ParsedFile) -> Result<Vec<Diagnostic>, RuleError> {
        let mut diagnostics = Vec::new();
        let disable_directives = file.disable_directives();

        for error in file.errors() {
            let diagnostic = Diagnostic::new(
                "PARSE",
                Severity::Error,
                &error.message,
                &file.metadata().filename,
                error.line,
                error.column,
            );
            if !disable_directives.is_disabled(diagnostic.line, &diagnostic.rule_id) {
                diagnostics.push(diagnostic);
            }
        }

        let rule_diagnostics = self.registry.run_all(file)?;
        for diagnostic in rule_diagnostics {
            if !disable_directives.is_disabled(diagnostic.line, &diagnostic.rule_id) {
                diagnostics.push(diagnostic);
            }
        }

        if let Some(min) = self.min_confidence {
            diagnostics.retain(|d| d.confidence.level() >= min.level());
        }

        debug!(
            file = %file.metadata().filename,
            count = diagnostics.len(),
            "analysis complete"
        );

        Ok(diagnostics)
    }
}

impl Default for AnalysisEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn create_default_registry() -> RuleRegistry {
    let mut registry = RuleRegistry::new();

    registry.register(Box::new(NoUnusedBindings::new()));

    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{Rule, RuleCategory, RuleMetadata};

    fn make_parsed_file(filename: &str, content: &str) -> ParsedFile {
        ParsedFile::from_source(filename, content)
    }

    #[test]
    fn analyze_reports_unused_binding() {
        let engine = AnalysisEngine::new();
        let file = make_parsed_file("test.ts", "const x = 1;");

        let diagnostics = engine.analyze(&file).unwrap();

        assert!(
            diagnostics.iter().any(|d| d.rule_id == "Q001"),
            "Expected Q001 diagnostic for unused const"
        );
    }

    #[test]
    fn analyze_clean_file_reports_nothing() {
        let engine = AnalysisEngine::new();
        let file = make_parsed_file("test.ts", "export const x = 1;");

        let diagnostics = engine.analyze(&file).unwrap();

        assert!(diagnostics.is_empty());
    }

    #[test]
    fn syntax_errors_become_diagnostics() {
        let engine = AnalysisEngine::new();
        let file = make_parsed_file("test.js", "const = ;");

        let diagnostics = engine.analyze(&file).unwrap();

        assert!(
            diagnostics.iter().any(|d| d.rule_id == "PARSE"),
            "Expected PARSE diagnostic for syntax error"
        );
    }

    #[test]
    fn disable_next_line_suppresses_diagnostic() {
        let engine = AnalysisEngine::new();
        let file = make_parsed_file(
            "test.ts",
            r#"// fallow-disable-next-line Q001
const x = 1;"#,
        );

        let diagnostics = engine.analyze(&file).unwrap();

        assert!(
            !diagnostics.iter().any(|d| d.rule_id == "Q001"),
            "Q001 should be suppressed by disable comment"
        );
    }

    #[test]
    fn disable_line_suppresses_diagnostic() {
        let engine = AnalysisEngine::new();
        let file = make_parsed_file("test.ts", "const x = 1; // fallow-disable-line Q001");

        let diagnostics = engine.analyze(&file).unwrap();

        assert!(
            !diagnostics.iter().any(|d| d.rule_id == "Q001"),
            "Q001 should be suppressed by disable comment"
        );
    }

    #[test]
    fn disable_next_line_all_rules() {
        let engine = AnalysisEngine::new();
        let file = make_parsed_file(
            "test.ts",
            r#"// fallow-disable-next-line
const x = 1;"#,
        );

        let diagnostics = engine.analyze(&file).unwrap();

        assert!(
            diagnostics.is_empty(),
            "All diagnostics should be suppressed"
        );
    }

    #[test]
    fn disable_does_not_affect_other_lines() {
        let engine = AnalysisEngine::new();
        let file = make_parsed_file(
            "test.ts",
            r#"// fallow-disable-next-line Q001
const x = 1;
const y = 2;"#,
        );

        let diagnostics = engine.analyze(&file).unwrap();

        let line_2 = diagnostics.iter().any(|d| d.rule_id == "Q001" && d.line == 2);
        let line_3 = diagnostics.iter().any(|d| d.rule_id == "Q001" && d.line == 3);

        assert!(!line_2, "Q001 on line 2 should be suppressed");
        assert!(line_3, "Q001 on line 3 should NOT be suppressed");
    }

    #[test]
    fn with_config_disables_rule() {
        let config: Config = toml::from_str(
            r#"
[rules]
disabled = ["Q001"]
"#,
        )
        .unwrap();
        let engine = AnalysisEngine::with_config(&config);
        let file = make_parsed_file("test.ts", "const x = 1;");

        let diagnostics = engine.analyze(&file).unwrap();

        assert!(diagnostics.is_empty());
    }

    #[test]
    fn with_config_overrides_severity() {
        let config: Config = toml::from_str(
            r#"
[rules.severity]
Q001 = "error"
"#,
        )
        .unwrap();
        let engine = AnalysisEngine::with_config(&config);
        let file = make_parsed_file("test.ts", "const x = 1;");

        let diagnostics = engine.analyze(&file).unwrap();

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity, Severity::Error);
    }

    #[test]
    fn min_confidence_keeps_high_confidence_diagnostics() {
        let config: Config = toml::from_str(
            r#"
[rules]
min_confidence = "high"
"#,
        )
        .unwrap();
        let engine = AnalysisEngine::with_config(&config);
        let file = make_parsed_file("test.ts", "const x = 1;");

        let diagnostics = engine.analyze(&file).unwrap();

        assert!(
            diagnostics.iter().any(|d| d.rule_id == "Q001"),
            "High confidence diagnostics pass the floor"
        );
    }

    struct LowConfidenceRule {
        metadata: RuleMetadata,
    }

    impl LowConfidenceRule {
        fn new() -> Self {
            Self {
                metadata: RuleMetadata {
                    id: "T900",
                    name: "low-confidence-test",
                    description: "Emits a low confidence diagnostic",
                    category: RuleCategory::Quality,
                    severity: Severity::Warning,
                    docs_url: None,
                    examples: None,
                },
            }
        }
    }

    impl Rule for LowConfidenceRule {
        fn metadata(&self) -> &RuleMetadata {
            &self.metadata
        }

        fn check(&self, file: &ParsedFile) -> Result<Vec<Diagnostic>, RuleError> {
            Ok(vec![
                Diagnostic::new(
                    "T900",
                    Severity::Warning,
                    "speculative finding",
                    &file.metadata().filename,
                    1,
                    0,
                )
                .with_confidence(Confidence::Low),
            ])
        }
    }

    #[test]
    fn min_confidence_drops_low_confidence_diagnostics() {
        let mut registry = RuleRegistry::new();
        registry.register(Box::new(LowConfidenceRule::new()));
        let engine = AnalysisEngine {
            registry,
            min_confidence: Some(Confidence::Medium),
        };
        let file = make_parsed_file("test.ts", "export const x = 1;");

        let diagnostics = engine.analyze(&file).unwrap();

        assert!(
            diagnostics.is_empty(),
            "Low confidence diagnostic should be filtered out"
        );
    }

    #[test]
    fn from_dir_applies_discovered_config() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        std::fs::write(
            dir.path().join(crate::config::CONFIG_FILENAME),
            "[rules]\ndisabled = [\"Q001\"]",
        )
        .unwrap();

        let engine = AnalysisEngine::from_dir(dir.path());
        let file = make_parsed_file("test.ts", "const x = 1;");

        let diagnostics = engine.analyze(&file).unwrap();

        assert!(diagnostics.is_empty());
    }

    #[test]
    fn from_dir_without_config_uses_defaults() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");

        let engine = AnalysisEngine::from_dir(dir.path());
        let file = make_parsed_file("test.ts", "const x = 1;");

        let diagnostics = engine.analyze(&file).unwrap();

        assert!(diagnostics.iter().any(|d| d.rule_id == "Q001"));
    }

    #[test]
    fn registry_exposes_registered_rules() {
        let engine = AnalysisEngine::new();

        assert!(engine.registry().get_rule("Q001").is_some());
        assert!(engine.registry().is_rule_enabled("no-unused-bindings"));
    }
}
