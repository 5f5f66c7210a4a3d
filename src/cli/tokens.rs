//! Token listing, one `KIND literal` line per token

use crate::Lexer;

pub fn list_tokens(expression: &str) -> Vec<String> {
    Lexer::new(expression).map(|t| t.to_string()).collect()
}

#[test]
fn test_list_tokens() {
    assert_eq!(
        list_tokens("body =~ 'todo'"),
        vec!["IDENT body", "REG_EQ =~", "STR 'todo'"]
    );
}
