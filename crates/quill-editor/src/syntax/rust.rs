//! Rust (tree-sitter-rust).

use tree_sitter::Node;

use super::{TokenTag, is_callee, is_field};

pub(super) fn classify(node: Node<'_>, src: &str) -> Option<TokenTag> {
    match node.kind() {
        "boolean_literal" => Some(TokenTag::Constant),
        "lifetime" | "label" => Some(TokenTag::Label),
        "self" | "crate" | "super" | "mutable_specifier" => Some(TokenTag::Keyword),
        "field_identifier" => Some(classify_field(node)),
        "identifier" => Some(classify_identifier(node, src)),
        _ => None,
    }
}

fn classify_identifier(node: Node<'_>, src: &str) -> TokenTag {
    let Some(parent) = node.parent() else {
        return TokenTag::Variable;
    };
    match parent.kind() {
        "function_item" | "function_signature_item" if is_field(parent, "name", node) => {
            TokenTag::Function
        }
        "call_expression" if is_field(parent, "function", node) => TokenTag::Function,
        "macro_invocation" if is_field(parent, "macro", node) => TokenTag::Macro,
        "macro_definition" if is_field(parent, "name", node) => TokenTag::Macro,
        "scoped_identifier"
            if is_field(parent, "name", node) && is_callee(parent, "call_expression") =>
        {
            TokenTag::Function
        }
        "const_item" | "static_item" if is_field(parent, "name", node) => TokenTag::Constant,
        _ if node.utf8_text(src.as_bytes()).is_ok_and(is_screaming_case) => TokenTag::Constant,
        _ => TokenTag::Variable,
    }
}

fn classify_field(node: Node<'_>) -> TokenTag {
    let called = node
        .parent()
        .is_some_and(|parent| parent.kind() == "field_expression" && is_callee(parent, "call_expression"));
    if called {
        TokenTag::Function
    } else {
        TokenTag::Property
    }
}

/// `MAX_LEN`-style names.
fn is_screaming_case(name: &str) -> bool {
    name.chars().count() > 1
        && name.chars().any(|c| c.is_ascii_uppercase())
        && name
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

pub(super) fn is_keyword(kind: &str) -> bool {
    matches!(
        kind,
        "as" | "async"
            | "await"
            | "break"
            | "const"
            | "continue"
            | "default"
            | "dyn"
            | "else"
            | "enum"
            | "extern"
            | "fn"
            | "for"
            | "if"
            | "impl"
            | "in"
            | "let"
            | "loop"
            | "macro_rules!"
            | "match"
            | "mod"
            | "move"
            | "pub"
            | "ref"
            | "return"
            | "static"
            | "struct"
            | "trait"
            | "type"
            | "union"
            | "unsafe"
            | "use"
            | "where"
            | "while"
            | "yield"
    )
}
