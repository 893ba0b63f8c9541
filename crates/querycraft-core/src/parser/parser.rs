//! Document-level parser: CTE separation, UNION chains and clause assembly.

use serde::Serialize;
use tracing::{debug, trace};

use super::clauses::Clauses;
use super::error::{Clause, Diagnostic, ParseError};
use super::interpret;
use super::scan::{self, split_commas, split_logical, top_level, unwrap_parens};
use crate::lexer::{normalize, Keyword, Lexer, Token, TokenKind};
use crate::model::{Cte, Document, Logic, Query};

/// The result of a lenient parse: the document plus everything that was
/// left out of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parsed {
    pub document: Document,
    pub diagnostics: Vec<Diagnostic>,
    /// The normalized SQL that diagnostic spans point into.
    pub normalized: String,
}

/// SQL parser.
pub struct Parser<'a> {
    input: &'a str,
}

impl<'a> Parser<'a> {
    /// Creates a new parser for the given input.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self { input }
    }

    /// Parses the whole input into a document.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` if the input is empty or whitespace only.
    /// Anything else parses; unusable pieces become diagnostics.
    pub fn parse_document(&self) -> Result<Parsed, ParseError> {
        if self.input.trim().is_empty() {
            return Err(ParseError::no_sql(self.input));
        }

        let normalized = normalize(self.input);
        let mut tokens = Lexer::new(&normalized).tokenize();
        while tokens.last().is_some_and(|t| t.kind == TokenKind::Semicolon) {
            tokens.pop();
        }
        debug!(tokens = tokens.len(), "parsing SQL document");

        let mut builder = DocumentBuilder::new(&normalized);
        let document = builder.document(&tokens);
        let diagnostics = builder.diagnostics;
        debug!(
            queries = document.queries.len(),
            ctes = document.ctes().len(),
            diagnostics = diagnostics.len(),
            "parsed SQL document"
        );
        Ok(Parsed {
            document,
            diagnostics,
            normalized,
        })
    }
}

/// Walks the token stream and collects diagnostics along the way.
struct DocumentBuilder<'s> {
    source: &'s str,
    diagnostics: Vec<Diagnostic>,
}

impl<'s> DocumentBuilder<'s> {
    const fn new(source: &'s str) -> Self {
        Self {
            source,
            diagnostics: Vec::new(),
        }
    }

    /// Records the diagnostic of a failed interpretation.
    fn keep<T>(&mut self, result: Result<T, Diagnostic>) -> Option<T> {
        result.map_err(|diagnostic| self.push(diagnostic)).ok()
    }

    fn push(&mut self, diagnostic: Diagnostic) {
        trace!(%diagnostic, "dropped");
        self.diagnostics.push(diagnostic);
    }

    fn report(&mut self, clause: Clause, message: &str, tokens: &[Token]) {
        self.push(Diagnostic::new(clause, message, self.source, tokens));
    }

    fn document(&mut self, tokens: &[Token]) -> Document {
        let mut document = Document::default();
        if tokens.is_empty() {
            self.report(Clause::Statement, "input holds only comments", tokens);
            return document;
        }

        let (cte_region, main_region) = separate_ctes(tokens);
        if let Some(region) = cte_region {
            if main_region.is_empty() {
                self.report(Clause::With, "WITH is not followed by a main SELECT", tokens);
            }
            for cte in self.ctes(region) {
                let name = cte.name.clone();
                if document.insert_cte(cte).is_some() {
                    self.push(Diagnostic {
                        clause: Clause::Cte,
                        message: String::from("duplicate CTE name, later definition kept"),
                        fragment: name,
                        span: scan::span_of(region),
                    });
                }
            }
        }
        if !main_region.is_empty() {
            document.queries = self.union_chain(main_region);
        }
        document
    }

    /// Splits the `WITH` region into definitions.
    fn ctes(&mut self, region: &[Token]) -> Vec<Cte> {
        let mut ctes = Vec::new();
        for definition in split_commas(region) {
            let Some((name, body)) = cte_parts(definition) else {
                self.report(Clause::Cte, "expected `name AS ( query )`", definition);
                continue;
            };
            if !Cte::is_valid_name(name) {
                self.report(Clause::Cte, "CTE name is not an ASCII identifier", definition);
                continue;
            }
            trace!(name, "CTE definition");
            ctes.push(Cte::new(name, self.union_chain(body)));
        }
        ctes
    }

    /// Splits a region on depth-0 `UNION [ALL]` and parses each statement.
    ///
    /// An empty statement (what is left of a placeholder comment) becomes an
    /// empty query, so the chain keeps its length and connectives.
    fn union_chain(&mut self, region: &[Token]) -> Vec<Query> {
        let mut queries: Vec<Query> = Vec::new();
        for (statement, all_next) in split_unions(region) {
            let mut query = if statement.is_empty() {
                Query::default()
            } else {
                self.query(statement)
            };
            query.name = format!("Query {}", queries.len() + 1);
            query.union_all_next = all_next.unwrap_or(false);
            queries.push(query);
        }
        trace!(statements = queries.len(), "UNION chain");
        queries
    }

    /// Parses one `SELECT` statement.
    fn query(&mut self, statement: &[Token]) -> Query {
        let statement = unwrap_parens(statement);
        let clauses = Clauses::split(statement);
        let source = self.source;
        let mut query = Query::default();

        for (clause, tokens) in &clauses.stray {
            let message = if *clause == Clause::Statement {
                "text outside any clause ignored"
            } else {
                "repeated clause ignored"
            };
            self.report(*clause, message, tokens);
        }

        match clauses.select {
            Some(items) if !items.is_empty() => {
                query.fields = split_commas(items)
                    .into_iter()
                    .map(|item| interpret::field(source, item))
                    .collect();
            }
            Some(_) => self.report(Clause::Select, "empty select list", statement),
            None => self.report(Clause::Select, "statement has no SELECT", statement),
        }

        if let Some(body) = clauses.from {
            if let Some(table) = self.keep(interpret::from_table(source, body)) {
                query.selected_tables.push(table);
            }
            if top_level(body).any(|(_, t)| t.kind == TokenKind::Comma) {
                self.report(Clause::From, "only the first table is used", body);
            }
        }

        for tokens in clauses.joins {
            let Some((mut join, on)) = self.keep(interpret::join_target(source, tokens)) else {
                continue;
            };
            match on {
                Some(body) if !body.is_empty() => {
                    for (condition, logic) in split_logical(body) {
                        if logic == Some(Logic::Or) {
                            self.report(
                                Clause::Join,
                                "OR between join conditions read as AND",
                                condition,
                            );
                        }
                        if let Some(c) = self.keep(interpret::join_condition(source, condition)) {
                            join.on.push(c);
                        }
                    }
                }
                Some(_) => self.report(Clause::Join, "ON without conditions", tokens),
                None => {}
            }
            query.joins.push(join);
        }

        if let Some(body) = clauses.filter {
            for (segment, logic) in split_logical(body) {
                if let Some(filter) = self.keep(interpret::filter(source, segment)) {
                    query.filters.push(filter.then(logic.unwrap_or_default()));
                }
            }
        }

        if let Some(body) = clauses.group_by {
            query.group_by = split_commas(body)
                .into_iter()
                .map(|item| scan::text_of(source, item).to_string())
                .collect();
        }
        if let Some(body) = clauses.order_by {
            query.order_by = split_commas(body)
                .into_iter()
                .map(|item| interpret::order_item(source, item))
                .collect();
        }
        if let Some(body) = clauses.limit {
            query.limit = self.keep(interpret::count(Clause::Limit, source, body));
        }
        if let Some(body) = clauses.offset {
            query.offset = self.keep(interpret::count(Clause::Offset, source, body));
        }

        trace!(
            fields = query.fields.len(),
            joins = query.joins.len(),
            filters = query.filters.len(),
            "statement"
        );
        query
    }
}

/// Splits a leading `WITH` region off the main statement.
///
/// The region runs to the first depth-0 `SELECT`, or to a `UNION` when the
/// first main statement is empty; without either, everything after `WITH`
/// is CTE text and the main region is empty.
fn separate_ctes(tokens: &[Token]) -> (Option<&[Token]>, &[Token]) {
    match tokens.split_first() {
        Some((with, rest)) if with.is_keyword(Keyword::With) => {
            let main = top_level(rest).find(|(_, token)| {
                token.is_keyword(Keyword::Select) || token.is_keyword(Keyword::Union)
            });
            match main {
                Some((start, _)) => (Some(&rest[..start]), &rest[start..]),
                None => (Some(rest), &[]),
            }
        }
        _ => (None, tokens),
    }
}

/// Matches `name AS ( body )` and returns the name and body. The body may
/// be empty, as it is when it only held a placeholder comment.
fn cte_parts(definition: &[Token]) -> Option<(&str, &[Token])> {
    let [name, as_kw, open, .., close] = definition else {
        return None;
    };
    let name = name.as_identifier()?;
    let wraps_body = as_kw.is_keyword(Keyword::As)
        && open.kind == TokenKind::LeftParen
        && close.kind == TokenKind::RightParen
        && scan::matching_paren(definition, 2) == Some(definition.len() - 1);
    wraps_body.then_some((name, &definition[3..definition.len() - 1]))
}

/// Splits on depth-0 `UNION [ALL]`, pairing each statement with the kind
/// of boundary after it: `Some(true)` for `UNION ALL`, `Some(false)` for
/// `UNION`, `None` for the last statement.
fn split_unions(region: &[Token]) -> Vec<(&[Token], Option<bool>)> {
    let mut statements = Vec::new();
    let mut start = 0;
    for (i, token) in top_level(region) {
        if !token.is_keyword(Keyword::Union) {
            continue;
        }
        let all = region
            .get(i + 1)
            .is_some_and(|t| t.is_keyword(Keyword::All));
        statements.push((&region[start..i], Some(all)));
        start = i + 1 + usize::from(all);
    }
    statements.push((&region[start..], None));
    statements
}
