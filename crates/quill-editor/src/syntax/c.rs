//! C and C++ (tree-sitter-c, tree-sitter-cpp). The C++ grammar extends
//! the C one, so both share these rules.

use tree_sitter::Node;

use super::{TokenTag, is_callee, is_field};

pub(super) fn classify(node: Node<'_>) -> Option<TokenTag> {
    match node.kind() {
        "statement_identifier" => Some(TokenTag::Label),
        "identifier" => classify_identifier(node),
        "field_identifier" => Some(classify_field(node)),
        _ => None,
    }
}

fn classify_identifier(node: Node<'_>) -> Option<TokenTag> {
    let parent = node.parent()?;
    match parent.kind() {
        "function_declarator" if is_field(parent, "declarator", node) => Some(TokenTag::Function),
        "call_expression" if is_field(parent, "function", node) => Some(TokenTag::Function),
        "preproc_def" | "preproc_function_def" if is_field(parent, "name", node) => {
            Some(TokenTag::Macro)
        }
        _ => None,
    }
}

fn classify_field(node: Node<'_>) -> TokenTag {
    let Some(parent) = node.parent() else {
        return TokenTag::Property;
    };
    match parent.kind() {
        "function_declarator" if is_field(parent, "declarator", node) => TokenTag::Function,
        "field_expression" if is_callee(parent, "call_expression") => TokenTag::Function,
        _ => TokenTag::Property,
    }
}

pub(super) fn is_keyword(kind: &str) -> bool {
    is_c_keyword(kind) || is_cpp_keyword(kind)
}

fn is_c_keyword(kind: &str) -> bool {
    matches!(
        kind,
        "auto"
            | "break"
            | "case"
            | "const"
            | "continue"
            | "default"
            | "do"
            | "else"
            | "enum"
            | "extern"
            | "for"
            | "goto"
            | "if"
            | "inline"
            | "register"
            | "restrict"
            | "return"
            | "sizeof"
            | "static"
            | "struct"
            | "switch"
            | "typedef"
            | "union"
            | "volatile"
            | "while"
            | "#include"
            | "#define"
            | "#if"
            | "#ifdef"
            | "#ifndef"
            | "#elif"
            | "#else"
            | "#endif"
            | "defined"
            | "true"
            | "false"
            | "null"
    )
}

fn is_cpp_keyword(kind: &str) -> bool {
    matches!(
        kind,
        "catch"
            | "class"
            | "constexpr"
            | "decltype"
            | "delete"
            | "explicit"
            | "friend"
            | "mutable"
            | "namespace"
            | "new"
            | "noexcept"
            | "nullptr"
            | "operator"
            | "private"
            | "protected"
            | "public"
            | "static_assert"
            | "template"
            | "this"
            | "throw"
            | "try"
            | "typename"
            | "using"
            | "virtual"
    )
}
