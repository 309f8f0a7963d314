//! # Fallow
//!
//! Scope-graph based unused-binding analyzer for JavaScript and TypeScript.
//!
//! Fallow parses a source file with SWC, builds a lexical scope graph
//! holding every declared binding and reference edge, applies the
//! TypeScript declaration-form exceptions (signature parameters, enum
//! members, parameter properties, mapped-type key binders, `this`
//! parameters, ambient declarations, self-referencing namespaces), and
//! reports the bindings that are never used.
//!
//! ```
//! use fallow_core::analysis::AnalysisEngine;
//! use fallow_core::parser::ParsedFile;
//!
//! let engine = AnalysisEngine::new();
//! let file = ParsedFile::from_source("example.ts", "const unused = 1;");
//! let diagnostics = engine.analyze(&file).unwrap();
//!
//! assert_eq!(diagnostics.len(), 1);
//! assert_eq!(diagnostics[0].message, "'unused' is defined but never used");
//! ```

pub mod analysis;
pub mod config;
pub mod diagnostic;
pub mod disable_comments;
pub mod exceptions;
pub mod parser;
pub mod rules;
pub mod semantic;

pub use analysis::AnalysisEngine;
pub use config::{Config, RulesConfig};
pub use diagnostic::{Diagnostic, Fix, FixKind};
pub use parser::{Language, ParsedFile};
pub use rules::{Confidence, Rule, RuleError, RuleRegistry, Severity};
pub use semantic::{ScopeGraphBuilder, SemanticModel};
