//! Lexers — turn text into tagged tokens for the highlight cache.
//!
//! A [`Lexer`] takes any string (usually a window of lines joined with
//! `\n`) and returns [`Token`]s that borrow from it. The tokens tile the
//! input exactly: concatenating their texts gives the input back, so the
//! cache can recover line and column positions by walking them in order.
//!
//! Files in a recognized [`Language`] get a [`TreeSitterLexer`], which
//! parses the window with that language's tree-sitter grammar and
//! classifies syntax nodes by kind. Rules shared by every grammar
//! (comments, strings, numbers, punctuation) live here; identifier rules
//! and keyword lists live in one submodule per language family. Nested
//! nodes override their ancestors byte by byte (an escape sequence inside
//! a string wins over the string), then runs of the same tag are merged.
//! Everything else gets [`PlainLexer`].
//!
//! The window may start or end in the middle of a construct. tree-sitter
//! recovers from that with error nodes, and the highlight cache's margin
//! keeps the damage away from the lines actually on screen.

mod c;
mod data;
mod go;
mod js;
mod python;
mod rust;
mod shell;

use std::path::Path;

use tree_sitter::{Node, Parser};

// ---------------------------------------------------------------------------
// Tokens
// ---------------------------------------------------------------------------

/// What a token is, as far as colouring is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TokenTag {
    #[default]
    Text,
    Keyword,
    String,
    Comment,
    Number,
    Constant,
    Function,
    Type,
    Macro,
    Attribute,
    Variable,
    Property,
    Operator,
    Punctuation,
    Label,
    Escape,
}

impl TokenTag {
    /// Tags whose node children are not classified separately.
    const fn is_leaf(self) -> bool {
        matches!(self, Self::Comment | Self::Attribute | Self::Constant)
    }
}

/// A tagged slice of the lexer's input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'t> {
    pub tag: TokenTag,
    pub text: &'t str,
}

impl<'t> Token<'t> {
    #[inline]
    #[must_use]
    pub const fn new(tag: TokenTag, text: &'t str) -> Self {
        Self { tag, text }
    }
}

// ---------------------------------------------------------------------------
// Lexer trait
// ---------------------------------------------------------------------------

/// Tokenizer capability used by the highlight cache.
pub trait Lexer {
    /// Short name for logs and the status line.
    fn name(&self) -> &'static str;

    /// Split `text` into tokens whose texts concatenate to `text`.
    fn tokenize<'t>(&mut self, text: &'t str) -> Vec<Token<'t>>;
}

/// Fallback: the whole input is one `Text` token.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainLexer;

impl Lexer for PlainLexer {
    fn name(&self) -> &'static str {
        "plain"
    }

    fn tokenize<'t>(&mut self, text: &'t str) -> Vec<Token<'t>> {
        if text.is_empty() {
            Vec::new()
        } else {
            vec![Token::new(TokenTag::Text, text)]
        }
    }
}

/// Pick a lexer for a file by extension. Unnamed buffers and unknown
/// extensions are plain text.
#[must_use]
pub fn detect(path: Option<&Path>) -> Box<dyn Lexer> {
    let Some(language) = path.and_then(Language::from_path) else {
        return Box::new(PlainLexer);
    };
    if let Some(lexer) = TreeSitterLexer::new(language) {
        return Box::new(lexer);
    }
    tracing::warn!(language = language.name(), "tree-sitter grammar unavailable; using plain lexer");
    Box::new(PlainLexer)
}

// ---------------------------------------------------------------------------
// Languages
// ---------------------------------------------------------------------------

/// A language with a bundled tree-sitter grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Rust,
    Go,
    Python,
    C,
    Cpp,
    JavaScript,
    TypeScript,
    Tsx,
    Json,
    Toml,
    Bash,
}

impl Language {
    /// The language for `path`'s extension, compared case-insensitively.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        let language = match ext.as_str() {
            "rs" => Self::Rust,
            "go" => Self::Go,
            "py" | "pyi" => Self::Python,
            "c" | "h" => Self::C,
            "cc" | "cpp" | "cxx" | "hh" | "hpp" | "hxx" => Self::Cpp,
            "js" | "mjs" | "cjs" | "jsx" => Self::JavaScript,
            "ts" | "mts" | "cts" => Self::TypeScript,
            "tsx" => Self::Tsx,
            "json" => Self::Json,
            "toml" => Self::Toml,
            "sh" | "bash" => Self::Bash,
            _ => return None,
        };
        Some(language)
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Rust => "rust",
            Self::Go => "go",
            Self::Python => "python",
            Self::C => "c",
            Self::Cpp => "cpp",
            Self::JavaScript => "javascript",
            Self::TypeScript => "typescript",
            Self::Tsx => "tsx",
            Self::Json => "json",
            Self::Toml => "toml",
            Self::Bash => "bash",
        }
    }

    fn grammar(self) -> tree_sitter::Language {
        match self {
            Self::Rust => tree_sitter_rust::language(),
            Self::Go => tree_sitter_go::language(),
            Self::Python => tree_sitter_python::language(),
            Self::C => tree_sitter_c::language(),
            Self::Cpp => tree_sitter_cpp::language(),
            Self::JavaScript => tree_sitter_javascript::language(),
            Self::TypeScript => tree_sitter_typescript::language_typescript(),
            Self::Tsx => tree_sitter_typescript::language_tsx(),
            Self::Json => tree_sitter_json::language(),
            Self::Toml => tree_sitter_toml::language(),
            Self::Bash => tree_sitter_bash::language(),
        }
    }

    /// Language-specific rules for named nodes, mostly identifiers.
    fn classify_named(self, node: Node<'_>, src: &str) -> Option<TokenTag> {
        match self {
            Self::Rust => rust::classify(node, src),
            Self::Go => go::classify(node),
            Self::Python => python::classify(node),
            Self::C | Self::Cpp => c::classify(node),
            Self::JavaScript | Self::TypeScript | Self::Tsx => js::classify(node),
            Self::Json | Self::Toml => data::classify(node),
            Self::Bash => shell::classify(node),
        }
    }

    fn is_keyword(self, kind: &str) -> bool {
        match self {
            Self::Rust => rust::is_keyword(kind),
            Self::Go => go::is_keyword(kind),
            Self::Python => python::is_keyword(kind),
            Self::C | Self::Cpp => c::is_keyword(kind),
            Self::JavaScript | Self::TypeScript | Self::Tsx => js::is_keyword(kind),
            Self::Json => data::is_json_keyword(kind),
            Self::Toml => data::is_toml_keyword(kind),
            Self::Bash => shell::is_keyword(kind),
        }
    }
}

// ---------------------------------------------------------------------------
// tree-sitter
// ---------------------------------------------------------------------------

pub struct TreeSitterLexer {
    language: Language,
    parser: Parser,
}

impl TreeSitterLexer {
    /// A lexer for `language`, or `None` if its grammar fails to load.
    #[must_use]
    pub fn new(language: Language) -> Option<Self> {
        let mut parser = Parser::new();
        parser.set_language(language.grammar()).ok()?;
        Some(Self { language, parser })
    }

    #[must_use]
    pub const fn language(&self) -> Language {
        self.language
    }
}

impl Lexer for TreeSitterLexer {
    fn name(&self) -> &'static str {
        self.language.name()
    }

    fn tokenize<'t>(&mut self, text: &'t str) -> Vec<Token<'t>> {
        if text.is_empty() {
            return Vec::new();
        }
        let Some(tree) = self.parser.parse(text, None) else {
            return PlainLexer.tokenize(text);
        };

        let mut tags = vec![TokenTag::Text; text.len()];
        let mut stack = vec![tree.root_node()];
        while let Some(node) = stack.pop() {
            if let Some(tag) = classify(self.language, node, text) {
                let end = node.end_byte().min(text.len());
                let start = node.start_byte().min(end);
                tags[start..end].fill(tag);
                if tag.is_leaf() {
                    continue;
                }
            }
            for i in (0..node.child_count()).rev() {
                if let Some(child) = node.child(i) {
                    stack.push(child);
                }
            }
        }
        coalesce(text, &tags)
    }
}

impl std::fmt::Debug for TreeSitterLexer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeSitterLexer")
            .field("language", &self.language)
            .finish_non_exhaustive()
    }
}

/// Merge per-byte tags into tokens, splitting only on char boundaries.
fn coalesce<'t>(text: &'t str, tags: &[TokenTag]) -> Vec<Token<'t>> {
    let mut tokens = Vec::new();
    let mut start = 0;
    for (i, _) in text.char_indices().skip(1) {
        if tags[i] != tags[start] {
            tokens.push(Token::new(tags[start], &text[start..i]));
            start = i;
        }
    }
    tokens.push(Token::new(tags[start], &text[start..]));
    tokens
}

// ---------------------------------------------------------------------------
// Node classification
// ---------------------------------------------------------------------------

fn classify(language: Language, node: Node<'_>, src: &str) -> Option<TokenTag> {
    let kind = node.kind();
    if !node.is_named() {
        return classify_anonymous(language, kind);
    }
    if let Some(tag) = language.classify_named(node, src) {
        return Some(tag);
    }
    if kind.contains("comment") {
        Some(TokenTag::Comment)
    } else if kind == "escape_sequence" {
        Some(TokenTag::Escape)
    } else if kind.contains("string") || kind.contains("regex") || kind == "char_literal" {
        Some(TokenTag::String)
    } else if is_number_kind(kind) {
        Some(TokenTag::Number)
    } else if matches!(kind, "type_identifier" | "primitive_type" | "predefined_type") {
        Some(TokenTag::Type)
    } else if matches!(kind, "attribute_item" | "inner_attribute_item" | "decorator") {
        Some(TokenTag::Attribute)
    } else if node.child_count() == 0 && language.is_keyword(kind) {
        // `true`, `nil`, `this` and friends are named leaves in most grammars.
        Some(TokenTag::Keyword)
    } else {
        None
    }
}

fn classify_anonymous(language: Language, kind: &str) -> Option<TokenTag> {
    if language.is_keyword(kind) {
        Some(TokenTag::Keyword)
    } else if is_punctuation(kind) {
        Some(TokenTag::Punctuation)
    } else if kind.chars().all(|c| "+-*/%=!<>&|^?@~".contains(c)) {
        Some(TokenTag::Operator)
    } else {
        None
    }
}

fn is_number_kind(kind: &str) -> bool {
    kind.contains("integer")
        || kind.contains("float")
        || kind.contains("number")
        || matches!(kind, "int_literal" | "imaginary_literal")
}

fn is_punctuation(kind: &str) -> bool {
    matches!(
        kind,
        "(" | ")" | "[" | "]" | "{" | "}" | "," | ";" | ":" | "::" | "." | "#" | "->" | "=>"
    )
}

/// Whether `node` is the child stored under `field` in `parent`.
fn is_field(parent: Node<'_>, field: &str, node: Node<'_>) -> bool {
    parent
        .child_by_field_name(field)
        .is_some_and(|n| n.start_byte() == node.start_byte() && n.end_byte() == node.end_byte())
}

/// Whether `node` is the callee of a call node of kind `call`.
fn is_callee(node: Node<'_>, call: &str) -> bool {
    node.parent()
        .is_some_and(|parent| parent.kind() == call && is_field(parent, "function", node))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    pub(crate) fn joined(tokens: &[Token<'_>]) -> String {
        tokens.iter().map(|t| t.text).collect()
    }

    pub(crate) fn has(tokens: &[Token<'_>], tag: TokenTag, text: &str) -> bool {
        tokens.iter().any(|t| t.tag == tag && t.text == text)
    }

    /// Tokenize `src` with `language`, checking the tokens tile the input.
    pub(crate) fn lex(language: Language, src: &str) -> Vec<Token<'_>> {
        let mut lexer = TreeSitterLexer::new(language).unwrap();
        let tokens = lexer.tokenize(src);
        assert_eq!(joined(&tokens), src);
        tokens
    }

    // -- plain --

    #[test]
    fn plain_is_one_text_token() {
        let mut lexer = PlainLexer;
        assert_eq!(
            lexer.tokenize("a\nb"),
            vec![Token::new(TokenTag::Text, "a\nb")]
        );
        assert!(lexer.tokenize("").is_empty());
    }

    // -- detection --

    #[test]
    fn detect_by_extension() {
        let cases = [
            ("src/main.rs", "rust"),
            ("main.go", "go"),
            ("tool.py", "python"),
            ("stubs.pyi", "python"),
            ("main.c", "c"),
            ("main.h", "c"),
            ("main.cc", "cpp"),
            ("main.cpp", "cpp"),
            ("main.cxx", "cpp"),
            ("main.hh", "cpp"),
            ("main.hpp", "cpp"),
            ("main.hxx", "cpp"),
            ("app.js", "javascript"),
            ("app.mjs", "javascript"),
            ("app.cjs", "javascript"),
            ("app.jsx", "javascript"),
            ("app.ts", "typescript"),
            ("app.mts", "typescript"),
            ("app.cts", "typescript"),
            ("app.tsx", "tsx"),
            ("package.json", "json"),
            ("Cargo.toml", "toml"),
            ("build.sh", "bash"),
            ("env.bash", "bash"),
            ("MAIN.RS", "rust"),
        ];
        for (path, name) in cases {
            assert_eq!(detect(Some(Path::new(path))).name(), name, "{path}");
        }
    }

    #[test]
    fn unknown_files_are_plain() {
        assert_eq!(detect(None).name(), "plain");
        assert_eq!(detect(Some(Path::new("notes.txt"))).name(), "plain");
        assert_eq!(detect(Some(Path::new("Makefile"))).name(), "plain");
        assert_eq!(detect(Some(Path::new(".rs"))).name(), "plain");
    }

    #[test]
    fn every_language_highlights_a_keyword() {
        let cases = [
            ("a.rs", "fn main() {}\n", "fn"),
            ("a.go", "package main\n", "package"),
            ("a.py", "def f():\n    pass\n", "def"),
            ("a.c", "int f(void) { return 0; }\n", "return"),
            ("a.cpp", "class A {};\n", "class"),
            ("a.js", "function f() { return 1; }\n", "function"),
            ("a.ts", "const x: number = 1;\n", "const"),
            ("a.tsx", "const x = 1;\n", "const"),
            ("a.json", "{\"a\": true}\n", "true"),
            ("a.toml", "a = false\n", "false"),
            ("a.sh", "if true; then\n  echo\nfi\n", "fi"),
        ];
        for (path, src, keyword) in cases {
            let mut lexer = detect(Some(Path::new(path)));
            assert_ne!(lexer.name(), "plain", "{path}");
            let tokens = lexer.tokenize(src);
            assert_eq!(joined(&tokens), src, "{path}");
            assert!(has(&tokens, TokenTag::Keyword, keyword), "{path}: {tokens:?}");
        }
    }

    // -- coalesce --

    #[test]
    fn coalesce_merges_runs_on_char_boundaries() {
        let text = "aé+";
        let mut tags = vec![TokenTag::Text; text.len()];
        tags[3] = TokenTag::Operator;
        assert_eq!(
            coalesce(text, &tags),
            vec![
                Token::new(TokenTag::Text, "aé"),
                Token::new(TokenTag::Operator, "+"),
            ]
        );
    }

    #[test]
    fn number_kinds() {
        assert!(is_number_kind("integer_literal"));
        assert!(is_number_kind("number_literal"));
        assert!(is_number_kind("float"));
        assert!(is_number_kind("int_literal"));
        assert!(!is_number_kind("identifier"));
    }
}
