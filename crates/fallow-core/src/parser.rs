//! SWC parsing frontend
//!
//! [`ParsedFile`] is the unit the rest of the crate works on: it owns the
//! source text, the parsed module (when SWC produced one), the recovered
//! parse errors, the inline disable directives, and the source map that
//! turns byte spans back into line/column positions.

use swc_common::sync::Lrc;
use swc_common::{FileName, SourceMap, Span, Spanned};
use swc_ecma_parser::{
    EsSyntax, StringInput, Syntax, TsSyntax, lexer::Lexer, parse_file_as_module,
};

use crate::disable_comments::DisableDirectives;

pub use swc_ecma_ast::{EsVersion, Module};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    JavaScript,
    TypeScript,
    Jsx,
    Tsx,
}

/// Maps a file extension to the language SWC should parse it as. Anything
/// unrecognized is treated as plain JavaScript.
pub fn detect_language(filename: &str) -> Language {
    let ext = filename.rsplit('.').next().unwrap_or("").to_lowercase();
    match ext.as_str() {
        "ts" | "mts" | "cts" => Language::TypeScript,
        "tsx" => Language::Tsx,
        "jsx" => Language::Jsx,
        _ => Language::JavaScript,
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("{message} at {line}:{column}")]
pub struct ParseError {
    /// 1-based line of the error position.
    pub line: usize,
    /// 0-based column of the error position.
    pub column: usize,
    pub span_lo: u32,
    pub span_hi: u32,
    pub message: String,
}

impl ParseError {
    fn from_swc(error: &swc_ecma_parser::error::Error, source_map: &SourceMap) -> Self {
        let span = error.span();
        let loc = source_map.lookup_char_pos(span.lo);
        Self {
            line: loc.line,
            column: loc.col_display,
            span_lo: span.lo.0,
            span_hi: span.hi.0,
            message: error.kind().msg().to_string(),
        }
    }
}

#[derive(Debug)]
pub struct ParseResult {
    pub module: Option<Module>,
    pub errors: Vec<ParseError>,
}

impl ParseResult {
    pub fn is_ok(&self) -> bool {
        self.module.is_some()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMetadata {
    pub filename: String,
    pub language: Language,
    pub line_count: usize,
    pub has_errors: bool,
}

pub struct ParsedFile {
    source: String,
    metadata: FileMetadata,
    ast_module: Option<Module>,
    errors: Vec<ParseError>,
    source_map: Lrc<SourceMap>,
    disable_directives: DisableDirectives,
}

impl std::fmt::Debug for ParsedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParsedFile")
            .field("metadata", &self.metadata)
            .field("has_module", &self.ast_module.is_some())
            .field("error_count", &self.errors.len())
            .finish()
    }
}

impl ParsedFile {
    /// Parses `source` with recovery. A file with syntax errors still gets
    /// a `ParsedFile`; callers check [`module`](Self::module) and
    /// [`errors`](Self::errors).
    pub fn from_source(filename: &str, source: &str) -> Self {
        let language = detect_language(filename);
        let source_map: Lrc<SourceMap> = Default::default();
        let result =
            Parser::for_file(filename).parse_module_recovering_with(&source_map, source);

        let metadata = FileMetadata {
            filename: filename.to_string(),
            language,
            line_count: source.lines().count(),
            has_errors: result.has_errors(),
        };

        Self {
            source: source.to_string(),
            metadata,
            ast_module: result.module,
            errors: result.errors,
            source_map,
            disable_directives: DisableDirectives::from_source(source),
        }
    }

    pub fn metadata(&self) -> &FileMetadata {
        &self.metadata
    }

    pub fn module(&self) -> Option<&Module> {
        self.ast_module.as_ref()
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn disable_directives(&self) -> &DisableDirectives {
        &self.disable_directives
    }

    /// Converts a span start to a 1-based line and 0-based column.
    pub fn span_to_location(&self, span: Span) -> (usize, usize) {
        // BytePos(0) marks a synthetic span.
        if span.lo.0 == 0 {
            return (1, 0);
        }
        let loc = self.source_map.lookup_char_pos(span.lo);
        (loc.line, loc.col_display)
    }

    /// Converts a span to (line, column, end_line, end_column). Lines are
    /// 1-based, columns 0-based, the end position exclusive.
    pub fn span_to_range(&self, span: Span) -> (usize, usize, usize, usize) {
        if span.lo.0 == 0 {
            return (1, 0, 1, 0);
        }
        let start = self.source_map.lookup_char_pos(span.lo);
        let end = self.source_map.lookup_char_pos(span.hi);
        (start.line, start.col_display, end.line, end.col_display)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParserBuilder {
    jsx: bool,
    typescript: bool,
    decorators: bool,
}

impl ParserBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn jsx(mut self, enabled: bool) -> Self {
        self.jsx = enabled;
        self
    }

    pub fn typescript(mut self, enabled: bool) -> Self {
        self.typescript = enabled;
        self
    }

    pub fn decorators(mut self, enabled: bool) -> Self {
        self.decorators = enabled;
        self
    }

    pub fn build(self) -> Parser {
        let syntax = if self.typescript {
            Syntax::Typescript(TsSyntax {
                tsx: self.jsx,
                decorators: self.decorators,
                ..Default::default()
            })
        } else {
            Syntax::Es(EsSyntax {
                jsx: self.jsx,
                decorators: self.decorators,
                ..Default::default()
            })
        };
        Parser { syntax }
    }
}

#[derive(Debug, Clone)]
pub struct Parser {
    syntax: Syntax,
}

impl Parser {
    pub fn new() -> Self {
        Self {
            syntax: Syntax::Es(Default::default()),
        }
    }

    /// Picks the syntax from the file extension. TypeScript files get
    /// decorator support since annotated classes are common in real code.
    pub fn for_file(filename: &str) -> Self {
        match detect_language(filename) {
            Language::JavaScript => Self::new(),
            Language::TypeScript => Self::builder().typescript(true).decorators(true).build(),
            Language::Jsx => Self::builder().jsx(true).build(),
            Language::Tsx => Self::builder()
                .typescript(true)
                .jsx(true)
                .decorators(true)
                .build(),
        }
    }

    pub fn builder() -> ParserBuilder {
        ParserBuilder::new()
    }

    /// Strict parse: the first syntax error fails the whole parse.
    pub fn parse_module(&self, code: &str) -> Result<Module, ParseError> {
        let source_map: Lrc<SourceMap> = Default::default();
        let fm = source_map
            .new_source_file(FileName::Custom("input.js".into()).into(), code.to_string());

        let lexer = Lexer::new(
            self.syntax,
            Default::default(),
            StringInput::from(&*fm),
            None,
        );
        swc_ecma_parser::Parser::new_from(lexer)
            .parse_module()
            .map_err(|e| ParseError::from_swc(&e, &source_map))
    }

    /// Parses with error recovery: syntax errors are collected instead of
    /// aborting, so a partial AST is still produced when SWC can recover.
    pub fn parse_module_recovering(&self, code: &str) -> ParseResult {
        let source_map: Lrc<SourceMap> = Default::default();
        self.parse_module_recovering_with(&source_map, code)
    }

    /// Same as [`parse_module_recovering`](Self::parse_module_recovering),
    /// with the caller supplying the source map so spans stay resolvable
    /// after parsing.
    pub fn parse_module_recovering_with(
        &self,
        source_map: &Lrc<SourceMap>,
        code: &str,
    ) -> ParseResult {
        let fm = source_map
            .new_source_file(FileName::Custom("input.js".into()).into(), code.to_string());

        let mut recovered = Vec::new();
        let outcome = parse_file_as_module(
            &fm,
            self.syntax,
            EsVersion::latest(),
            None,
            &mut recovered,
        );

        let mut errors: Vec<ParseError> = recovered
            .iter()
            .map(|e| ParseError::from_swc(e, source_map))
            .collect();

        let module = match outcome {
            Ok(module) => Some(module),
            Err(fatal) => {
                errors.push(ParseError::from_swc(&fatal, source_map));
                None
            }
        };

        ParseResult { module, errors }
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}
