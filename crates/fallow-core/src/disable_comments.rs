//! Inline disable comment directives for suppressing diagnostics
//!
//! Supports ESLint-style disable comments:
//! - `// fallow-disable-next-line Q001` - disable Q001 for the next line
//! - `// fallow-disable-line Q001` - disable Q001 for the current line
//! - `// fallow-disable-next-line` - disable all rules for the next line
//! - `// fallow-disable-line` - disable all rules for the current line
//! - `// fallow-disable-next-line Q001, Q002` - disable multiple rules

use std::collections::HashMap;
use std::collections::hash_map::Entry;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisableDirective {
    pub line: usize,
    pub rule_ids: Vec<String>,
}

impl DisableDirective {
    pub fn new(line: usize, rule_ids: Vec<String>) -> Self {
        Self { line, rule_ids }
    }

    pub fn for_all_rules(line: usize) -> Self {
        Self {
            line,
            rule_ids: Vec::new(),
        }
    }

    pub fn disables_all(&self) -> bool {
        self.rule_ids.is_empty()
    }

    pub fn disables_rule(&self, rule_id: &str) -> bool {
        self.rule_ids.is_empty() || self.rule_ids.iter().any(|id| id == rule_id)
    }

    /// Folds another directive for the same line into this one. An
    /// all-rules directive on either side wins.
    fn merge(&mut self, other: DisableDirective) {
        if self.disables_all() {
            return;
        }
        if other.disables_all() {
            self.rule_ids.clear();
            return;
        }
        for id in other.rule_ids {
            if !self.rule_ids.contains(&id) {
                self.rule_ids.push(id);
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DisableDirectives {
    by_line: HashMap<usize, DisableDirective>,
}

impl DisableDirectives {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_source(source: &str) -> Self {
        let mut directives = Self::new();

        for (line_idx, line) in source.lines().enumerate() {
            let line_num = line_idx + 1;

            if let Some(comment_start) = line_comment_start(line) {
                let comment = line[comment_start + 2..].trim();

                if let Some(rest) = directive_args(comment, "fallow-disable-next-line") {
                    let rule_ids = parse_rule_ids(rest);
                    let target_line = line_num + 1;
                    directives.add(DisableDirective::new(target_line, rule_ids));
                } else if let Some(rest) = directive_args(comment, "fallow-disable-line") {
                    let rule_ids = parse_rule_ids(rest);
                    directives.add(DisableDirective::new(line_num, rule_ids));
                }
            }
        }

        directives
    }

    pub fn add(&mut self, directive: DisableDirective) {
        match self.by_line.entry(directive.line) {
            Entry::Occupied(mut existing) => existing.get_mut().merge(directive),
            Entry::Vacant(slot) => {
                slot.insert(directive);
            }
        }
    }

    pub fn is_disabled(&self, line: usize, rule_id: &str) -> bool {
        self.by_line
            .get(&line)
            .is_some_and(|d| d.disables_rule(rule_id))
    }

    pub fn directives(&self) -> impl Iterator<Item = &DisableDirective> {
        self.by_line.values()
    }

    pub fn is_empty(&self) -> bool {
        self.by_line.is_empty()
    }

    pub fn len(&self) -> usize {
        self.by_line.len()
    }
}

/// Strips the directive keyword and returns the argument tail. The keyword
/// must end at a word boundary, so `fallow-disable-lineX` is not a
/// directive.
/// Finds the first `//` that starts a line comment, skipping over `//`
/// sequences inside single-, double-, or backtick-quoted literals.
/// Quotes opened on an earlier line (multi-line template literals) are
/// not tracked.
fn line_comment_start(line: &str) -> Option<usize> {
    let bytes = line.as_bytes();
    let mut quote: Option<u8> = None;
    let mut i = 0;
    while i < bytes.len() {
        match quote {
            Some(q) => match bytes[i] {
                b'\\' => i += 1,
                b if b == q => quote = None,
                _ => {}
            },
            None => match bytes[i] {
                b'\'' | b'"' | b'`' => quote = Some(bytes[i]),
                b'/' if bytes.get(i + 1) == Some(&b'/') => return Some(i),
                _ => {}
            },
        }
        i += 1;
    }
    None
}

fn directive_args<'a>(comment: &'a str, keyword: &str) -> Option<&'a str> {
    let rest = comment.strip_prefix(keyword)?;
    if rest.is_empty() || rest.starts_with([' ', '\t']) {
        Some(rest)
    } else {
        None
    }
}

fn parse_rule_ids(rest: &str) -> Vec<String> {
    let trimmed = rest.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    trimmed
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
