//! Diagnostic reporting for analysis results
//!
//! Diagnostics are the single output channel for every rule: a rule id,
//! a severity, a message, and a position, optionally extended with an end
//! position, a human suggestion, and machine-applicable fixes.

use crate::rules::{Confidence, Severity};

#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub rule_id: String,
    pub severity: Severity,
    pub confidence: Confidence,
    pub message: String,
    pub file: String,
    /// 1-based line of the primary position.
    pub line: usize,
    /// 0-based column of the primary position.
    pub column: usize,
    pub end_line: Option<usize>,
    pub end_column: Option<usize>,
    pub suggestion: Option<String>,
    pub fixes: Vec<Fix>,
}

impl Diagnostic {
    pub fn new(
        rule_id: impl Into<String>,
        severity: Severity,
        message: impl Into<String>,
        file: impl Into<String>,
        line: usize,
        column: usize,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            severity,
            confidence: Confidence::default(),
            message: message.into(),
            file: file.into(),
            line,
            column,
            end_line: None,
            end_column: None,
            suggestion: None,
            fixes: Vec::new(),
        }
    }

    pub fn with_end(mut self, end_line: usize, end_column: usize) -> Self {
        self.end_line = Some(end_line);
        self.end_column = Some(end_column);
        self
    }

    pub fn with_confidence(mut self, confidence: Confidence) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn with_fix(mut self, fix: Fix) -> Self {
        self.fixes.push(fix);
        self
    }
}

/// A machine-applicable edit attached to a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fix {
    pub title: String,
    pub kind: FixKind,
    pub line: usize,
    pub column: usize,
    pub end_line: usize,
    pub end_column: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixKind {
    ReplaceWith { new_text: String },
    InsertBefore { text: String },
}

impl Fix {
    pub fn replace(
        title: impl Into<String>,
        new_text: impl Into<String>,
        line: usize,
        column: usize,
        end_line: usize,
        end_column: usize,
    ) -> Self {
        Self {
            title: title.into(),
            kind: FixKind::ReplaceWith {
                new_text: new_text.into(),
            },
            line,
            column,
            end_line,
            end_column,
        }
    }

    pub fn insert_before(
        title: impl Into<String>,
        text: impl Into<String>,
        line: usize,
        column: usize,
    ) -> Self {
        Self {
            title: title.into(),
            kind: FixKind::InsertBefore { text: text.into() },
            line,
            column,
            end_line: line,
            end_column: column,
        }
    }
}
