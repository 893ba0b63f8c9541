//! Depth-aware scanning over token slices.
//!
//! Every splitting decision in the parser happens at parenthesis depth 0;
//! quoted literals are already single tokens, so quote state never leaks
//! into these helpers.

use crate::lexer::{Keyword, Span, Token, TokenKind};
use crate::model::Logic;

/// Yields `(index, token)` for tokens outside any parentheses.
///
/// An opening parenthesis at depth 0 is itself yielded; the tokens it
/// encloses and its closing partner are not. Stray closing parentheses
/// never drive the depth below zero.
pub(crate) fn top_level(tokens: &[Token]) -> impl Iterator<Item = (usize, &Token)> + '_ {
    let mut depth = 0usize;
    tokens.iter().enumerate().filter(move |(_, token)| match token.kind {
        TokenKind::LeftParen => {
            depth += 1;
            depth == 1
        }
        TokenKind::RightParen => {
            let was_nested = depth > 0;
            depth = depth.saturating_sub(1);
            !was_nested
        }
        _ => depth == 0,
    })
}

/// Finds the index of the parenthesis closing the one at `open`.
pub(crate) fn matching_paren(tokens: &[Token], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, token) in tokens.iter().enumerate().skip(open) {
        match token.kind {
            TokenKind::LeftParen => depth += 1,
            TokenKind::RightParen => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Index of the first depth-0 occurrence of `keyword`.
pub(crate) fn find_keyword(tokens: &[Token], keyword: Keyword) -> Option<usize> {
    top_level(tokens)
        .find(|(_, token)| token.is_keyword(keyword))
        .map(|(i, _)| i)
}

/// Splits on depth-0 tokens matching `is_separator`, keeping empty pieces.
pub(crate) fn split_top_level(
    tokens: &[Token],
    is_separator: impl Fn(&Token) -> bool,
) -> Vec<&[Token]> {
    let mut pieces = Vec::new();
    let mut start = 0;
    for (i, token) in top_level(tokens) {
        if is_separator(token) {
            pieces.push(&tokens[start..i]);
            start = i + 1;
        }
    }
    pieces.push(&tokens[start..]);
    pieces
}

/// Splits a comma-separated list at depth 0, dropping empty items.
pub(crate) fn split_commas(tokens: &[Token]) -> Vec<&[Token]> {
    split_top_level(tokens, |t| t.kind == TokenKind::Comma)
        .into_iter()
        .filter(|piece| !piece.is_empty())
        .collect()
}

/// Splits a predicate chain on depth-0 `AND` / `OR`.
///
/// Each segment is paired with the connective that followed it (`None` for
/// the last one). The `AND` that separates the bounds of a `BETWEEN` is not
/// a split point.
pub(crate) fn split_logical(tokens: &[Token]) -> Vec<(&[Token], Option<Logic>)> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut open_between = false;
    for (i, token) in top_level(tokens) {
        let logic = match token.as_keyword() {
            Some(Keyword::Between) => {
                open_between = true;
                continue;
            }
            Some(Keyword::And) if open_between => {
                open_between = false;
                continue;
            }
            Some(Keyword::And) => Logic::And,
            Some(Keyword::Or) => Logic::Or,
            _ => continue,
        };
        segments.push((&tokens[start..i], Some(logic)));
        start = i + 1;
        open_between = false;
    }
    segments.push((&tokens[start..], None));
    segments
}

/// Span covering a token slice (empty slices give an empty span).
pub(crate) fn span_of(tokens: &[Token]) -> Span {
    match (tokens.first(), tokens.last()) {
        (Some(first), Some(last)) => first.span.merge(last.span),
        _ => Span::default(),
    }
}

/// Source text of a token slice, trimmed.
pub(crate) fn text_of<'s>(source: &'s str, tokens: &[Token]) -> &'s str {
    if tokens.is_empty() {
        return "";
    }
    span_of(tokens).text(source)
}

/// Strips parentheses that wrap the whole slice, e.g. `(SELECT ...)`.
pub(crate) fn unwrap_parens(mut tokens: &[Token]) -> &[Token] {
    while tokens.len() >= 2
        && tokens[0].kind == TokenKind::LeftParen
        && matching_paren(tokens, 0) == Some(tokens.len() - 1)
    {
        tokens = &tokens[1..tokens.len() - 1];
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    fn lex(sql: &str) -> Vec<Token> {
        Lexer::new(sql).tokenize()
    }

    fn texts<'s>(sql: &'s str, pieces: &[&[Token]]) -> Vec<&'s str> {
        pieces.iter().map(|p| text_of(sql, p)).collect()
    }

    #[test]
    fn test_split_commas_respects_parens_and_quotes() {
        let sql = "a, COUNT(b, c), 'x,y', (d)";
        let tokens = lex(sql);
        assert_eq!(
            texts(sql, &split_commas(&tokens)),
            vec!["a", "COUNT(b, c)", "'x,y'", "(d)"]
        );
    }

    #[test]
    fn test_split_commas_drops_empty_items() {
        let sql = "a,,b,";
        let tokens = lex(sql);
        assert_eq!(texts(sql, &split_commas(&tokens)), vec!["a", "b"]);
    }

    #[test]
    fn test_split_logical_keeps_between_bounds() {
        let sql = "a = 1 AND b BETWEEN 2 AND 3 OR (c = 1 OR d = 2)";
        let tokens = lex(sql);
        let segments = split_logical(&tokens);
        let shape: Vec<_> = segments
            .iter()
            .map(|(seg, logic)| (text_of(sql, seg), *logic))
            .collect();
        assert_eq!(
            shape,
            vec![
                ("a = 1", Some(Logic::And)),
                ("b BETWEEN 2 AND 3", Some(Logic::Or)),
                ("(c = 1 OR d = 2)", None),
            ]
        );
    }

    #[test]
    fn test_top_level_skips_nested_tokens() {
        let tokens = lex("x (SELECT y) z");
        let kept: Vec<usize> = top_level(&tokens).map(|(i, _)| i).collect();
        assert_eq!(kept, vec![0, 1, 5]);
    }

    #[test]
    fn test_stray_close_paren_stays_at_depth_zero() {
        let tokens = lex("a ) , b");
        assert_eq!(split_commas(&tokens).len(), 2);
    }

    #[test]
    fn test_matching_paren() {
        let tokens = lex("(a (b) c) d");
        assert_eq!(matching_paren(&tokens, 0), Some(5));
        assert_eq!(matching_paren(&tokens, 2), Some(4));
        assert_eq!(matching_paren(&lex("(a"), 0), None);
    }

    #[test]
    fn test_unwrap_parens() {
        let sql = "((SELECT a FROM t))";
        let tokens = lex(sql);
        assert_eq!(text_of(sql, unwrap_parens(&tokens)), "SELECT a FROM t");

        let sql = "(a) + (b)";
        let tokens = lex(sql);
        assert_eq!(unwrap_parens(&tokens).len(), tokens.len());
    }
}
