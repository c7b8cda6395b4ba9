//! Python (tree-sitter-python).

use tree_sitter::Node;

use super::{TokenTag, is_callee, is_field};

pub(super) fn classify(node: Node<'_>) -> Option<TokenTag> {
    if node.kind() != "identifier" {
        return None;
    }
    let parent = node.parent()?;
    match parent.kind() {
        "function_definition" if is_field(parent, "name", node) => Some(TokenTag::Function),
        "class_definition" if is_field(parent, "name", node) => Some(TokenTag::Type),
        "call" if is_field(parent, "function", node) => Some(TokenTag::Function),
        "attribute" if is_field(parent, "attribute", node) => {
            if is_callee(parent, "call") {
                Some(TokenTag::Function)
            } else {
                Some(TokenTag::Property)
            }
        }
        _ => None,
    }
}

pub(super) fn is_keyword(kind: &str) -> bool {
    matches!(
        kind,
        "and"
            | "as"
            | "assert"
            | "async"
            | "await"
            | "break"
            | "case"
            | "class"
            | "continue"
            | "def"
            | "del"
            | "elif"
            | "else"
            | "except"
            | "finally"
            | "for"
            | "from"
            | "global"
            | "if"
            | "import"
            | "in"
            | "is"
            | "lambda"
            | "match"
            | "nonlocal"
            | "not"
            | "or"
            | "pass"
            | "raise"
            | "return"
            | "try"
            | "while"
            | "with"
            | "yield"
            | "true"
            | "false"
            | "none"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::Language;
    use crate::syntax::tests::{has, lex};

    #[test]
    fn definitions_and_calls() {
        let src = "class Greeter:\n    def greet(self, name):\n        return len(name)\n\nGreeter().greet(None)\n";
        let tokens = lex(Language::Python, src);
        assert!(has(&tokens, TokenTag::Keyword, "class"));
        assert!(has(&tokens, TokenTag::Keyword, "def"));
        assert!(has(&tokens, TokenTag::Keyword, "return"));
        assert!(has(&tokens, TokenTag::Type, "Greeter"));
        assert!(has(&tokens, TokenTag::Function, "greet"));
        assert!(has(&tokens, TokenTag::Function, "len"));
    }

    #[test]
    fn comments_and_strings() {
        let tokens = lex(Language::Python, "x = 'a'  # note\n");
        assert!(has(&tokens, TokenTag::String, "'a'"));
        assert!(has(&tokens, TokenTag::Comment, "# note"));
    }
}
