//! JSON and TOML (tree-sitter-json, tree-sitter-toml).

use tree_sitter::Node;

use super::TokenTag;

pub(super) fn classify(node: Node<'_>) -> Option<TokenTag> {
    match node.kind() {
        "bare_key" | "quoted_key" => Some(TokenTag::Property),
        "offset_date_time" | "local_date_time" | "local_date" | "local_time" => {
            Some(TokenTag::Number)
        }
        _ => None,
    }
}

pub(super) fn is_json_keyword(kind: &str) -> bool {
    matches!(kind, "true" | "false" | "null")
}

pub(super) fn is_toml_keyword(kind: &str) -> bool {
    matches!(kind, "true" | "false" | "boolean")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::Language;
    use crate::syntax::tests::{has, lex};

    #[test]
    fn json_literals() {
        let tokens = lex(Language::Json, "{\"a\": true, \"b\": null, \"c\": 1.5}\n");
        assert!(has(&tokens, TokenTag::Keyword, "true"));
        assert!(has(&tokens, TokenTag::Keyword, "null"));
        assert!(has(&tokens, TokenTag::Number, "1.5"));
        assert!(has(&tokens, TokenTag::Punctuation, "{"));
    }

    #[test]
    fn toml_keys_and_values() {
        let src = "[package]\nname = \"quill\"\nenabled = true\n";
        let tokens = lex(Language::Toml, src);
        assert!(has(&tokens, TokenTag::Keyword, "true"));
        assert!(has(&tokens, TokenTag::Property, "name"));
        assert!(has(&tokens, TokenTag::String, "\"quill\""));
    }
}
