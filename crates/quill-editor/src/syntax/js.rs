//! JavaScript, TypeScript and TSX (tree-sitter-javascript,
//! tree-sitter-typescript).

use tree_sitter::Node;

use super::{TokenTag, is_callee, is_field};

pub(super) fn classify(node: Node<'_>) -> Option<TokenTag> {
    match node.kind() {
        "identifier" => classify_identifier(node),
        "property_identifier" => Some(classify_property(node)),
        "shorthand_property_identifier" => Some(TokenTag::Property),
        _ => None,
    }
}

fn classify_identifier(node: Node<'_>) -> Option<TokenTag> {
    let parent = node.parent()?;
    match parent.kind() {
        "function_declaration"
        | "function"
        | "function_expression"
        | "generator_function_declaration"
        | "generator_function"
            if is_field(parent, "name", node) =>
        {
            Some(TokenTag::Function)
        }
        "call_expression" if is_field(parent, "function", node) => Some(TokenTag::Function),
        "class_declaration" | "class" if is_field(parent, "name", node) => Some(TokenTag::Type),
        "new_expression" if is_field(parent, "constructor", node) => Some(TokenTag::Type),
        _ => None,
    }
}

fn classify_property(node: Node<'_>) -> TokenTag {
    let Some(parent) = node.parent() else {
        return TokenTag::Property;
    };
    match parent.kind() {
        "method_definition" if is_field(parent, "name", node) => TokenTag::Function,
        "member_expression" if is_callee(parent, "call_expression") => TokenTag::Function,
        _ => TokenTag::Property,
    }
}

pub(super) fn is_keyword(kind: &str) -> bool {
    is_js_keyword(kind) || is_ts_keyword(kind)
}

fn is_js_keyword(kind: &str) -> bool {
    matches!(
        kind,
        "async"
            | "await"
            | "break"
            | "case"
            | "catch"
            | "class"
            | "const"
            | "continue"
            | "debugger"
            | "default"
            | "delete"
            | "do"
            | "else"
            | "export"
            | "extends"
            | "finally"
            | "for"
            | "from"
            | "function"
            | "if"
            | "import"
            | "in"
            | "instanceof"
            | "let"
            | "new"
            | "of"
            | "return"
            | "static"
            | "super"
            | "switch"
            | "this"
            | "throw"
            | "try"
            | "typeof"
            | "var"
            | "void"
            | "while"
            | "with"
            | "yield"
            | "null"
            | "undefined"
            | "true"
            | "false"
    )
}

fn is_ts_keyword(kind: &str) -> bool {
    matches!(
        kind,
        "abstract"
            | "as"
            | "declare"
            | "enum"
            | "implements"
            | "interface"
            | "keyof"
            | "namespace"
            | "private"
            | "protected"
            | "public"
            | "readonly"
            | "type"
    )
}
