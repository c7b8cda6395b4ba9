//! Bash (tree-sitter-bash).

use tree_sitter::Node;

use super::TokenTag;

pub(super) fn classify(node: Node<'_>) -> Option<TokenTag> {
    match node.kind() {
        "command_name" => Some(TokenTag::Function),
        "variable_name" | "special_variable_name" => Some(TokenTag::Variable),
        "file_descriptor" => Some(TokenTag::Number),
        _ => None,
    }
}

pub(super) fn is_keyword(kind: &str) -> bool {
    matches!(
        kind,
        "if" | "then"
            | "else"
            | "elif"
            | "fi"
            | "case"
            | "esac"
            | "for"
            | "while"
            | "until"
            | "do"
            | "done"
            | "in"
            | "function"
            | "select"
            | "local"
            | "declare"
            | "export"
            | "readonly"
            | "unset"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::Language;
    use crate::syntax::tests::{has, lex};

    #[test]
    fn keywords_commands_and_variables() {
        let src = "if [ -n \"$x\" ]; then\n  echo hi # greet\nfi\n";
        let tokens = lex(Language::Bash, src);
        assert!(has(&tokens, TokenTag::Keyword, "if"));
        assert!(has(&tokens, TokenTag::Keyword, "then"));
        assert!(has(&tokens, TokenTag::Keyword, "fi"));
        assert!(has(&tokens, TokenTag::Function, "echo"));
        assert!(has(&tokens, TokenTag::Variable, "x"));
        assert!(has(&tokens, TokenTag::Comment, "# greet"));
    }
}
