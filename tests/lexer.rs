//! Integration tests for pdep-lexer crate.

use pdep_lexer::{Lexer, Token, TokenKind, Tokenizer};

fn lex(source: &str) -> Vec<TokenKind> {
    Lexer::new(source).map(|t| t.kind).collect()
}

fn lex_php(source: &str) -> Vec<TokenKind> {
    Lexer::new_php(source).map(|t| t.kind).collect()
}

fn tokens(source: &str) -> Vec<Token> {
    Lexer::new(source).tokenize()
}

// ============================================================================
// Tags and Inline HTML
// ============================================================================

#[test]
fn test_inline_html_and_tags() {
    assert_eq!(
        lex("<p><?php echo 1; ?>\n</p>"),
        vec![
            TokenKind::InlineHtml,
            TokenKind::OpenTag,
            TokenKind::Echo,
            TokenKind::LNumber,
            TokenKind::Semicolon,
            TokenKind::CloseTag,
            TokenKind::InlineHtml,
        ]
    );
}

#[test]
fn test_close_tag_swallows_one_newline() {
    let tokens = tokens("<?php ?>\n\nx");
    let html = tokens.last().unwrap();
    assert_eq!(html.kind, TokenKind::InlineHtml);
    assert_eq!(html.image, "\nx");
}

#[test]
fn test_open_tag_with_echo() {
    assert_eq!(
        lex("<?= $a ?>"),
        vec![
            TokenKind::OpenTagWithEcho,
            TokenKind::Variable,
            TokenKind::CloseTag,
        ]
    );
}

#[test]
fn test_empty_source() {
    assert!(lex("").is_empty());
}

// ============================================================================
// Words and Variables
// ============================================================================

#[test]
fn test_keywords_are_case_insensitive() {
    assert_eq!(
        lex_php("CLASS Function callable CALLABLE"),
        vec![
            TokenKind::Class,
            TokenKind::Function,
            TokenKind::Callable,
            TokenKind::Callable,
        ]
    );
}

#[test]
fn test_identifiers_and_variables() {
    assert_eq!(
        lex_php("foo $bar $$baz $"),
        vec![
            TokenKind::String,
            TokenKind::Variable,
            TokenKind::Dollar,
            TokenKind::Variable,
            TokenKind::Dollar,
        ]
    );
}

#[test]
fn test_magic_constants() {
    let kinds = lex_php("__CLASS__ __DIR__ __FILE__ __FUNCTION__ __LINE__ __METHOD__ __NAMESPACE__ __TRAIT__");
    assert_eq!(kinds.len(), 8);
    assert!(kinds.iter().all(|k| k.is_magic_constant()));
}

#[test]
fn test_keyword_after_object_operator_is_identifier() {
    assert_eq!(
        lex_php("$a->list"),
        vec![
            TokenKind::Variable,
            TokenKind::ObjectOperator,
            TokenKind::String,
        ]
    );
}

#[test]
fn test_casts() {
    assert_eq!(
        lex_php("(int) ( string )(array)(x)"),
        vec![
            TokenKind::IntCast,
            TokenKind::StringCast,
            TokenKind::ArrayCast,
            TokenKind::ParenthesisOpen,
            TokenKind::String,
            TokenKind::ParenthesisClose,
        ]
    );
}

// ============================================================================
// Literals
// ============================================================================

#[test]
fn test_numbers() {
    assert_eq!(
        lex_php("42 3.25 0xFF 0b1010 1e3 .5 1_000"),
        vec![
            TokenKind::LNumber,
            TokenKind::DNumber,
            TokenKind::LNumber,
            TokenKind::LNumber,
            TokenKind::DNumber,
            TokenKind::DNumber,
            TokenKind::LNumber,
        ]
    );
}

#[test]
fn test_strings_keep_quotes() {
    let tokens = tokens(r#"<?php 'a\'b' "c$d""#);
    assert_eq!(tokens[1].kind, TokenKind::ConstantEncapsedString);
    assert_eq!(tokens[1].image, r"'a\'b'");
    assert_eq!(tokens[2].kind, TokenKind::ConstantEncapsedString);
    assert_eq!(tokens[2].image, r#""c$d""#);
}

#[test]
fn test_unterminated_string_is_unknown() {
    assert_eq!(lex_php("'abc"), vec![TokenKind::Unknown]);
}

#[test]
fn test_quotes_inside_interpolation_stay_in_string() {
    let cases = [
        r#""{$a["k"]}""#,
        r#""{$o->m("x")}""#,
        r#""pre ${a["b"]} post""#,
        r#""{$a[$b{"c"}]}!""#,
        "`{$a['x']}`",
    ];
    for source in cases {
        let tokens = tokens(&format!("<?php {source};"));
        assert_eq!(tokens.len(), 3, "{source}");
        assert_eq!(tokens[1].kind, TokenKind::ConstantEncapsedString, "{source}");
        assert_eq!(tokens[1].image, source);
        assert_eq!(tokens[2].kind, TokenKind::Semicolon);
    }
}

#[test]
fn test_braces_without_dollar_are_plain_text() {
    let tokens = tokens(r#"<?php "{ "; '{$a'"#);
    assert_eq!(tokens[1].image, r#""{ ""#);
    assert_eq!(tokens[3].kind, TokenKind::ConstantEncapsedString);
    assert_eq!(tokens[3].image, "'{$a'");
}

#[test]
fn test_unclosed_interpolation_is_unknown() {
    assert_eq!(lex_php(r#""{$a["k"]"#), vec![TokenKind::Unknown]);
}

// ============================================================================
// Comments
// ============================================================================

#[test]
fn test_comment_kinds() {
    assert_eq!(
        lex_php("// a\n# b\n/* c */ /** d */ /**/"),
        vec![
            TokenKind::Comment,
            TokenKind::Comment,
            TokenKind::Comment,
            TokenKind::DocComment,
            TokenKind::Comment,
        ]
    );
}

#[test]
fn test_line_comment_stops_at_close_tag() {
    assert_eq!(
        lex("<?php // x ?>y"),
        vec![
            TokenKind::OpenTag,
            TokenKind::Comment,
            TokenKind::CloseTag,
            TokenKind::InlineHtml,
        ]
    );
}

// ============================================================================
// Operators
// ============================================================================

#[test]
fn test_longest_operator_wins() {
    assert_eq!(
        lex_php("<=> ** **= ?? ... === !== <<= >>"),
        vec![
            TokenKind::Spaceship,
            TokenKind::Pow,
            TokenKind::PowEqual,
            TokenKind::Coalesce,
            TokenKind::Ellipsis,
            TokenKind::IsIdentical,
            TokenKind::IsNotIdentical,
            TokenKind::SlEqual,
            TokenKind::Sr,
        ]
    );
}

// ============================================================================
// Heredoc
// ============================================================================

#[test]
fn test_heredoc_tokens() {
    let tokens = tokens("<?php $a = <<<EOT\nline one\nline two\nEOT;\n");
    let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::OpenTag,
            TokenKind::Variable,
            TokenKind::Equal,
            TokenKind::StartHeredoc,
            TokenKind::EncapsedAndWhitespace,
            TokenKind::EndHeredoc,
            TokenKind::Semicolon,
        ]
    );
    assert_eq!(tokens[4].image, "line one\nline two");
    assert_eq!(tokens[5].image, "EOT");
}

#[test]
fn test_nowdoc_and_empty_heredoc() {
    assert_eq!(
        lex_php("<<<'EOT'\nEOT;"),
        vec![
            TokenKind::StartHeredoc,
            TokenKind::EndHeredoc,
            TokenKind::Semicolon,
        ]
    );
}

#[test]
fn test_unterminated_heredoc() {
    assert_eq!(lex_php("<<<EOT\nnever closed"), vec![TokenKind::Unknown]);
}

// ============================================================================
// Positions
// ============================================================================

#[test]
fn test_positions_across_lines() {
    let tokens = tokens("<?php\n  $a =\n\t1;");
    let variable = &tokens[1];
    assert_eq!((variable.span.start.line, variable.span.start.column), (2, 3));
    let number = &tokens[3];
    assert_eq!((number.span.start.line, number.span.start.column), (3, 2));
    assert_eq!(usize::from(number.span.start.offset), 14);
}

#[test]
fn test_positions_after_heredoc() {
    let source = "<?php\n$a = <<<EOT\nx\ny\nEOT;\n$b;";
    let tokens = tokens(source);

    let end = tokens.iter().find(|t| t.kind == TokenKind::EndHeredoc).unwrap();
    assert_eq!((end.span.start.line, end.span.start.column), (5, 1));

    let b = tokens.iter().find(|t| t.image == "$b").unwrap();
    assert_eq!((b.span.start.line, b.span.start.column), (6, 1));
    assert_eq!(&source[b.span.range()], "$b");
}

#[test]
fn test_columns_count_characters() {
    let tokens = tokens("<?php 'é' $x");
    let x = tokens.last().unwrap();
    assert_eq!(x.span.start.column, 11);
    assert_eq!(&"<?php 'é' $x"[x.span.range()], "$x");
}

#[test]
fn test_tokens_are_monotonic() {
    let tokens = tokens("<?php /** d */ class A { function f() { return [1, 2] <=> $x; } }");
    for pair in tokens.windows(2) {
        assert!(pair[0].span.end <= pair[1].span.start);
    }
}

// ============================================================================
// Tokenizer
// ============================================================================

#[test]
fn test_tokenizer_peek_and_next() {
    let mut tokenizer = Tokenizer::new("<?php f();", "t.php");
    assert_eq!(tokenizer.peek(), TokenKind::OpenTag);
    assert_eq!(tokenizer.next().map(|t| t.kind), Some(TokenKind::OpenTag));
    assert_eq!(tokenizer.peek_token().map(|t| t.image.as_str()), Some("f"));
    let rest: Vec<TokenKind> = std::iter::from_fn(|| tokenizer.next()).map(|t| t.kind).collect();
    assert_eq!(
        rest,
        vec![
            TokenKind::String,
            TokenKind::ParenthesisOpen,
            TokenKind::ParenthesisClose,
            TokenKind::Semicolon,
        ]
    );
    assert_eq!(tokenizer.peek(), TokenKind::Eof);
    assert_eq!(tokenizer.source_file(), "t.php");
}
