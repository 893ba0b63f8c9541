//! Splits one statement into its clauses at depth-0 keywords.

use crate::lexer::{Keyword, Token, TokenKind};

use super::error::Clause;
use super::scan::top_level;

/// Where one clause starts.
#[derive(Debug, Clone, Copy)]
struct Boundary {
    clause: Clause,
    /// First token of the clause, keywords included.
    head: usize,
    /// First token after the clause keywords.
    body: usize,
}

/// The token slices of a single `SELECT` statement, one per clause.
///
/// Join slices keep their leading `[kind] [OUTER] JOIN` keywords; every
/// other slice holds only the clause body.
#[derive(Debug, Default)]
pub(crate) struct Clauses<'t> {
    pub select: Option<&'t [Token]>,
    pub from: Option<&'t [Token]>,
    pub joins: Vec<&'t [Token]>,
    pub filter: Option<&'t [Token]>,
    pub group_by: Option<&'t [Token]>,
    pub order_by: Option<&'t [Token]>,
    pub limit: Option<&'t [Token]>,
    pub offset: Option<&'t [Token]>,
    /// Tokens ahead of the first clause, and repeated clauses (whole,
    /// keywords included). Both are left out of the query.
    pub stray: Vec<(Clause, &'t [Token])>,
}

impl<'t> Clauses<'t> {
    /// Splits `tokens`. Clauses may appear in any order; a clause runs until
    /// the next clause keyword. The first occurrence of a repeated clause
    /// wins.
    pub(crate) fn split(tokens: &'t [Token]) -> Self {
        let boundaries = boundaries(tokens);
        let mut clauses = Self::default();

        let preamble_end = boundaries.first().map_or(tokens.len(), |b| b.head);
        if preamble_end > 0 {
            clauses
                .stray
                .push((Clause::Statement, &tokens[..preamble_end]));
        }

        for (i, boundary) in boundaries.iter().enumerate() {
            let end = boundaries.get(i + 1).map_or(tokens.len(), |next| next.head);
            let body = &tokens[boundary.body.min(end)..end];
            let slot = match boundary.clause {
                Clause::Join => {
                    clauses.joins.push(&tokens[boundary.head..end]);
                    continue;
                }
                Clause::Select => &mut clauses.select,
                Clause::From => &mut clauses.from,
                Clause::Where => &mut clauses.filter,
                Clause::GroupBy => &mut clauses.group_by,
                Clause::OrderBy => &mut clauses.order_by,
                Clause::Limit => &mut clauses.limit,
                Clause::Offset => &mut clauses.offset,
                _ => continue,
            };
            if slot.is_some() {
                clauses
                    .stray
                    .push((boundary.clause, &tokens[boundary.head..end]));
            } else {
                *slot = Some(body);
            }
        }
        clauses
    }
}

/// Finds every depth-0 clause keyword in order.
fn boundaries(tokens: &[Token]) -> Vec<Boundary> {
    let mut found: Vec<Boundary> = Vec::new();
    let followed_by_by = |i: usize| tokens.get(i + 1).is_some_and(|t| t.is_keyword(Keyword::By));

    for (i, token) in top_level(tokens) {
        let TokenKind::Keyword(keyword) = token.kind else {
            continue;
        };
        let (clause, head, body) = match keyword {
            Keyword::Select => (Clause::Select, i, i + 1),
            Keyword::From => (Clause::From, i, i + 1),
            Keyword::Where => (Clause::Where, i, i + 1),
            Keyword::Group if followed_by_by(i) => (Clause::GroupBy, i, i + 2),
            Keyword::Order if followed_by_by(i) => (Clause::OrderBy, i, i + 2),
            Keyword::Limit => (Clause::Limit, i, i + 1),
            Keyword::Offset => (Clause::Offset, i, i + 1),
            Keyword::Join => (Clause::Join, join_head(tokens, i), i + 1),
            _ => continue,
        };
        // A join head never reaches back into the previous clause keyword.
        let floor = found.last().map_or(0, |prev| prev.body);
        found.push(Boundary {
            clause,
            head: head.max(floor),
            body,
        });
    }
    found
}

/// Walks back from `JOIN` over `OUTER` and the join-kind keyword.
fn join_head(tokens: &[Token], join: usize) -> usize {
    let keyword_at = |i: usize| tokens.get(i).and_then(Token::as_keyword);
    let mut head = join;
    if head > 0 && keyword_at(head - 1) == Some(Keyword::Outer) {
        head -= 1;
    }
    if head > 0
        && matches!(
            keyword_at(head - 1),
            Some(Keyword::Inner | Keyword::Left | Keyword::Right | Keyword::Full)
        )
    {
        head -= 1;
    }
    head
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;
    use crate::parser::scan::text_of;

    fn split(sql: &str, check: impl Fn(&str, &Clauses<'_>)) {
        let tokens = Lexer::new(sql).tokenize();
        let clauses = Clauses::split(&tokens);
        check(sql, &clauses);
    }

    fn body(sql: &str, slice: Option<&[Token]>) -> Option<String> {
        slice.map(|s| text_of(sql, s).to_string())
    }

    #[test]
    fn test_split_all_clauses() {
        let sql = "SELECT a, b FROM t LEFT OUTER JOIN u ON t.id = u.id JOIN v \
                   WHERE a = 1 GROUP BY a ORDER BY b DESC LIMIT 5 OFFSET 10";
        split(sql, |sql, c| {
            assert_eq!(body(sql, c.select).as_deref(), Some("a, b"));
            assert_eq!(body(sql, c.from).as_deref(), Some("t"));
            let joins: Vec<_> = c.joins.iter().map(|j| text_of(sql, j)).collect();
            assert_eq!(joins, vec!["LEFT OUTER JOIN u ON t.id = u.id", "JOIN v"]);
            assert_eq!(body(sql, c.filter).as_deref(), Some("a = 1"));
            assert_eq!(body(sql, c.group_by).as_deref(), Some("a"));
            assert_eq!(body(sql, c.order_by).as_deref(), Some("b DESC"));
            assert_eq!(body(sql, c.limit).as_deref(), Some("5"));
            assert_eq!(body(sql, c.offset).as_deref(), Some("10"));
            assert!(c.stray.is_empty());
        });
    }

    #[test]
    fn test_nested_keywords_are_not_boundaries() {
        let sql = "SELECT (SELECT MAX(x) FROM y) AS m FROM t WHERE a IN (SELECT b FROM c)";
        split(sql, |sql, c| {
            assert_eq!(
                body(sql, c.select).as_deref(),
                Some("(SELECT MAX(x) FROM y) AS m")
            );
            assert_eq!(body(sql, c.from).as_deref(), Some("t"));
            assert_eq!(
                body(sql, c.filter).as_deref(),
                Some("a IN (SELECT b FROM c)")
            );
        });
    }

    #[test]
    fn test_preamble_and_duplicates_are_stray() {
        let sql = "EXPLAIN SELECT a FROM t WHERE x = 1 WHERE y = 2";
        split(sql, |sql, c| {
            assert_eq!(body(sql, c.filter).as_deref(), Some("x = 1"));
            let stray: Vec<_> = c
                .stray
                .iter()
                .map(|(clause, s)| (*clause, text_of(sql, s)))
                .collect();
            assert_eq!(
                stray,
                vec![
                    (Clause::Statement, "EXPLAIN"),
                    (Clause::Where, "WHERE y = 2")
                ]
            );
        });
    }

    #[test]
    fn test_group_without_by_is_not_a_clause() {
        let sql = "SELECT a FROM t ORDER x";
        split(sql, |sql, c| {
            assert_eq!(body(sql, c.from).as_deref(), Some("t ORDER x"));
            assert!(c.order_by.is_none());
        });
    }

    #[test]
    fn test_bare_join_keyword() {
        split("SELECT a FROM t JOIN", |_, c| {
            assert_eq!(c.joins.len(), 1);
            assert_eq!(c.joins[0].len(), 1);
        });
    }
}
