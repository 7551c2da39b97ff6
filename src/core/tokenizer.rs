/// Splits a command line on whitespace. A double-quoted span joins into the
/// surrounding token with the quotes removed; an unterminated quote runs to
/// the end of the line.
pub fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut in_quotes = false;

    for c in line.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                in_token = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if in_token {
        tokens.push(current);
    }
    tokens
}

/// The text after the first token exactly as typed, minus the whitespace
/// separating it from the head and any trailing whitespace.
pub fn rest_after_head(line: &str) -> &str {
    let line = line.trim();
    let mut in_quotes = false;
    for (i, c) in line.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            c if c.is_whitespace() && !in_quotes => return line[i..].trim_start(),
            _ => {}
        }
    }
    ""
}

/// Rebuilds a command line from tokens, quoting the ones `tokenize` would
/// otherwise split.
pub fn join_tokens(tokens: &[String]) -> String {
    tokens
        .iter()
        .map(|token| {
            if token.is_empty() || token.contains(char::is_whitespace) {
                format!("\"{}\"", token)
            } else {
                token.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_join_tokens_quotes_spaced_tokens() {
        let tokens = tokenize(r#"echo "a b" c """#);
        assert_eq!(join_tokens(&tokens), r#"echo "a b" c """#);
        assert_eq!(tokenize(&join_tokens(&tokens)), tokens);
    }

    #[test]
    fn test_rest_after_head_keeps_spacing() {
        assert_eq!(rest_after_head("  async echo   spaced  "), "echo   spaced");
        assert_eq!(rest_after_head(r#""my cmd" "a  b""#), r#""a  b""#);
        assert_eq!(rest_after_head("stats"), "");
        assert_eq!(rest_after_head(""), "");
    }

    #[test]
    fn test_plain_words() {
        assert_eq!(tokenize("  echo   hello\tworld "), vec!["echo", "hello", "world"]);
    }

    #[test]
    fn test_quoted_span_is_one_token() {
        assert_eq!(tokenize(r#"echo "a b""#), vec!["echo", "a b"]);
        assert_eq!(tokenize(r#"writefile f.txt "x  y" z"#), vec!["writefile", "f.txt", "x  y", "z"]);
    }

    #[test]
    fn test_quotes_join_adjacent_text() {
        assert_eq!(tokenize(r#"pre"mid dle"post"#), vec!["premid dlepost"]);
    }

    #[test]
    fn test_unterminated_quote_runs_to_end() {
        assert_eq!(tokenize(r#"echo "a b"#), vec!["echo", "a b"]);
    }

    #[test]
    fn test_empty_quotes_yield_empty_token() {
        assert_eq!(tokenize(r#"echo """#), vec!["echo", ""]);
    }

    #[test]
    fn test_blank_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \t ").is_empty());
    }

    proptest! {
        #[test]
        fn unquoted_words_match_split_whitespace(line in "[a-z ]{0,40}") {
            let expected: Vec<String> = line.split_whitespace().map(String::from).collect();
            prop_assert_eq!(tokenize(&line), expected);
        }

        #[test]
        fn quoted_argument_survives(word in "[a-z]{1,8}( [a-z]{1,8}){0,3}") {
            let tokens = tokenize(&format!("echo \"{}\"", word));
            prop_assert_eq!(tokens, vec!["echo".to_string(), word]);
        }
    }
}
