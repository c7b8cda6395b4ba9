//! Go (tree-sitter-go).

use tree_sitter::Node;

use super::{TokenTag, is_callee, is_field};

pub(super) fn classify(node: Node<'_>) -> Option<TokenTag> {
    match node.kind() {
        "label_name" => Some(TokenTag::Label),
        "identifier" => classify_identifier(node),
        "field_identifier" => classify_field(node),
        _ => None,
    }
}

fn classify_identifier(node: Node<'_>) -> Option<TokenTag> {
    let parent = node.parent()?;
    match parent.kind() {
        "function_declaration" if is_field(parent, "name", node) => Some(TokenTag::Function),
        "call_expression" if is_field(parent, "function", node) => Some(TokenTag::Function),
        "const_spec" if is_field(parent, "name", node) => Some(TokenTag::Constant),
        _ => None,
    }
}

fn classify_field(node: Node<'_>) -> Option<TokenTag> {
    let parent = node.parent()?;
    match parent.kind() {
        "method_declaration" | "method_spec" if is_field(parent, "name", node) => {
            Some(TokenTag::Function)
        }
        "selector_expression" if is_callee(parent, "call_expression") => Some(TokenTag::Function),
        "selector_expression" | "field_declaration" => Some(TokenTag::Property),
        _ => None,
    }
}

pub(super) fn is_keyword(kind: &str) -> bool {
    matches!(
        kind,
        "break"
            | "case"
            | "chan"
            | "const"
            | "continue"
            | "default"
            | "defer"
            | "else"
            | "fallthrough"
            | "for"
            | "func"
            | "go"
            | "goto"
            | "if"
            | "import"
            | "interface"
            | "map"
            | "package"
            | "range"
            | "return"
            | "select"
            | "struct"
            | "switch"
            | "type"
            | "var"
            | "true"
            | "false"
            | "nil"
            | "iota"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::Language;
    use crate::syntax::tests::{has, lex};

    #[test]
    fn functions_calls_and_strings() {
        let src = "package main\n\nfunc main() {\n\tfmt.Println(\"hi\", nil)\n}\n";
        let tokens = lex(Language::Go, src);
        assert!(has(&tokens, TokenTag::Keyword, "package"));
        assert!(has(&tokens, TokenTag::Keyword, "func"));
        assert!(has(&tokens, TokenTag::Keyword, "nil"));
        assert!(has(&tokens, TokenTag::Function, "main"));
        assert!(has(&tokens, TokenTag::Function, "Println"));
        assert!(has(&tokens, TokenTag::String, "\"hi\""));
    }
}
