//! Interpreters for individual clause pieces.
//!
//! Each function turns one token slice into a model value, or explains why
//! it could not with a [`Diagnostic`].

use crate::lexer::{Keyword, Token, TokenKind};
use crate::model::{
    Aggregate, Direction, Field, Filter, Join, JoinCondition, JoinKind, Operator, OrderSpec,
    CUSTOM_FIELD,
};

use super::error::{Clause, Diagnostic};
use super::scan::{find_keyword, matching_paren, text_of, top_level};

/// Reads one `SELECT` list item.
///
/// Any text is a valid field: whatever is not a column reference or a
/// whole-expression aggregate call is kept verbatim as an expression.
pub(crate) fn field(source: &str, item: &[Token]) -> Field {
    let (expr, alias) = split_alias(item);
    let mut field = Field {
        alias: alias.map(str::to_string),
        ..Field::default()
    };
    let operand = match aggregate_call(expr) {
        Some((agg, argument)) => {
            field.agg = Some(agg);
            argument
        }
        None => expr,
    };
    let text = text_of(source, operand);
    describe_operand(&mut field, operand, text);
    field.expression = Some(text.to_string());
    field
}

/// Separates a trailing alias: `expr AS name` or `expr name`.
///
/// A bare trailing word is an alias only when whitespace precedes it and
/// the token before it could end an expression.
fn split_alias(item: &[Token]) -> (&[Token], Option<&str>) {
    let [.., previous, last] = item else {
        return (item, None);
    };
    let Some(alias) = last.as_identifier() else {
        return (item, None);
    };
    if !last.is_spaced_from(previous) {
        return (item, None);
    }
    let n = item.len();
    if previous.is_keyword(Keyword::As) {
        if n >= 3 {
            return (&item[..n - 2], Some(alias));
        }
        return (item, None);
    }
    if previous.kind.expects_operand() {
        return (item, None);
    }
    (&item[..n - 1], Some(alias))
}

/// Matches `AGG( ... )` spanning the whole slice and returns its argument.
fn aggregate_call(tokens: &[Token]) -> Option<(Aggregate, &[Token])> {
    let [name, open, ..] = tokens else {
        return None;
    };
    let agg = name.as_identifier().and_then(Aggregate::from_name)?;
    if open.kind != TokenKind::LeftParen || matching_paren(tokens, 1)? != tokens.len() - 1 {
        return None;
    }
    let argument = &tokens[2..tokens.len() - 1];
    if argument.is_empty() {
        return None;
    }
    Some((agg, argument))
}

/// Fills in `table` and `name` from the shape of the operand.
fn describe_operand(field: &mut Field, tokens: &[Token], text: &str) {
    let kinds: Vec<&TokenKind> = tokens.iter().map(|t| &t.kind).collect();
    match kinds.as_slice() {
        [TokenKind::Star] => field.name = String::from("*"),
        [TokenKind::Identifier(table), TokenKind::Dot, TokenKind::Star] => {
            field.table = Some(table.clone());
            field.name = String::from("*");
        }
        [TokenKind::Identifier(table), TokenKind::Dot, TokenKind::Identifier(column)] => {
            field.table = Some(table.clone());
            field.name = column.clone();
        }
        _ if !kinds.contains(&&TokenKind::LeftParen) && !text.is_empty() => {
            field.name = text.to_string();
        }
        _ => field.name = String::from(CUSTOM_FIELD),
    }
}

/// Reads the base table from a `FROM` body: the first contiguous run of
/// name tokens (`t`, `schema.t`).
pub(crate) fn from_table(source: &str, tokens: &[Token]) -> Result<String, Diagnostic> {
    let Some(first) = tokens.first() else {
        return Err(Diagnostic::new(
            Clause::From,
            "missing table name",
            source,
            tokens,
        ));
    };
    if first.as_identifier().is_none() {
        return Err(Diagnostic::new(
            Clause::From,
            "expected a table name",
            source,
            tokens,
        ));
    }
    let run = name_run(tokens);
    Ok(text_of(source, &tokens[..run]).to_string())
}

/// Length of the leading `name(.name)*` run with no whitespace inside.
fn name_run(tokens: &[Token]) -> usize {
    let mut end = 1;
    while let [previous, dot, next, ..] = &tokens[end - 1..] {
        let joined = dot.kind == TokenKind::Dot
            && !dot.is_spaced_from(previous)
            && !next.is_spaced_from(dot)
            && next.as_identifier().is_some();
        if !joined {
            break;
        }
        end += 2;
    }
    end
}

/// Reads `[kind] [OUTER] JOIN table [[AS] alias] [ON ...]`, returning the
/// join (without conditions) and the `ON` body, if any.
pub(crate) fn join_target<'t>(
    source: &str,
    tokens: &'t [Token],
) -> Result<(Join, Option<&'t [Token]>), Diagnostic> {
    let mut rest = tokens;
    let mut kind = JoinKind::Inner;
    if let Some(found) = rest
        .first()
        .and_then(Token::as_keyword)
        .and_then(JoinKind::from_keyword)
    {
        kind = found;
        rest = &rest[1..];
    }
    if rest.first().is_some_and(|t| t.is_keyword(Keyword::Outer)) {
        rest = &rest[1..];
    }
    if rest.first().is_some_and(|t| t.is_keyword(Keyword::Join)) {
        rest = &rest[1..];
    }

    if rest.first().and_then(Token::as_identifier).is_none() {
        return Err(Diagnostic::new(
            Clause::Join,
            "expected a table name after JOIN",
            source,
            tokens,
        ));
    }
    let run = name_run(rest);
    let join = Join::new(kind, text_of(source, &rest[..run]));
    rest = &rest[run..];

    // Table alias, kept out of the model.
    if rest.first().is_some_and(|t| t.is_keyword(Keyword::As)) {
        rest = &rest[1..];
    }
    if rest.first().and_then(Token::as_identifier).is_some() {
        rest = &rest[1..];
    }

    match rest.split_first() {
        None => Ok((join, None)),
        Some((on, body)) if on.is_keyword(Keyword::On) => Ok((join, Some(body))),
        Some(_) => Err(Diagnostic::new(
            Clause::Join,
            "expected ON after the joined table",
            source,
            tokens,
        )),
    }
}

/// Reads one `left op right` join condition.
pub(crate) fn join_condition(source: &str, tokens: &[Token]) -> Result<JoinCondition, Diagnostic> {
    let found = top_level(tokens)
        .find(|(_, token)| token.kind.is_comparison())
        .and_then(|(i, token)| Operator::from_comparison(&token.kind).map(|op| (i, op)));
    match found {
        Some((i, op)) if i > 0 && i + 1 < tokens.len() => Ok(JoinCondition::new(
            text_of(source, &tokens[..i]),
            op,
            text_of(source, &tokens[i + 1..]),
        )),
        _ => Err(Diagnostic::new(
            Clause::Join,
            "expected `left op right` condition",
            source,
            tokens,
        )),
    }
}

/// Reads one `WHERE` predicate. The connective is set by the caller.
pub(crate) fn filter(source: &str, segment: &[Token]) -> Result<Filter, Diagnostic> {
    let fail = |message: &str| Err(Diagnostic::new(Clause::Where, message, source, segment));

    let Some((i, op, value)) = find_operator(segment) else {
        return fail("no supported operator in condition");
    };
    if i == 0 {
        return fail("condition has no field");
    }
    let field = text_of(source, &segment[..i]).to_string();

    let value = match op {
        Some(Operator::IsNull | Operator::IsNotNull) => String::new(),
        Some(Operator::Between) => between_value(source, value),
        Some(_) => text_of(source, value).to_string(),
        None => return fail("negated operators are not supported"),
    };
    let op = op.unwrap_or_default();
    if value.is_empty() && !op.is_null_check() {
        return fail("condition has no value");
    }
    Ok(Filter::new(field, op, value))
}

/// First depth-0 operator in a predicate: its index, the operator (`None`
/// for an unsupported negated form) and the tokens after it.
fn find_operator(segment: &[Token]) -> Option<(usize, Option<Operator>, &[Token])> {
    let keyword_at = |i: usize| segment.get(i).and_then(Token::as_keyword);
    top_level(segment).find_map(|(i, token)| {
        if let Some(op) = Operator::from_comparison(&token.kind) {
            return Some((i, Some(op), &segment[i + 1..]));
        }
        let single = |op| Some((i, Some(op), &segment[i + 1..]));
        match token.as_keyword()? {
            Keyword::Like => single(Operator::Like),
            Keyword::In => single(Operator::In),
            Keyword::Between => single(Operator::Between),
            Keyword::Is => match (keyword_at(i + 1), keyword_at(i + 2)) {
                (Some(Keyword::Null), _) => Some((i, Some(Operator::IsNull), &segment[i + 2..])),
                (Some(Keyword::Not), Some(Keyword::Null)) => {
                    Some((i, Some(Operator::IsNotNull), &segment[i + 3..]))
                }
                _ => None,
            },
            Keyword::Not => match keyword_at(i + 1) {
                Some(Keyword::Like | Keyword::In | Keyword::Between) => Some((i, None, &[][..])),
                _ => None,
            },
            _ => None,
        }
    })
}

/// Stores `lo AND hi` as `lo,hi`.
fn between_value(source: &str, tokens: &[Token]) -> String {
    match find_keyword(tokens, Keyword::And) {
        Some(and) => format!(
            "{},{}",
            text_of(source, &tokens[..and]),
            text_of(source, &tokens[and + 1..])
        ),
        None => text_of(source, tokens).to_string(),
    }
}

/// Reads one `ORDER BY` item with its optional direction.
pub(crate) fn order_item(source: &str, item: &[Token]) -> OrderSpec {
    let direction = match item.split_last() {
        Some((last, rest)) if !rest.is_empty() => match last.as_keyword() {
            Some(Keyword::Asc) => Some((Direction::Asc, rest)),
            Some(Keyword::Desc) => Some((Direction::Desc, rest)),
            _ => None,
        },
        _ => None,
    };
    match direction {
        Some((dir, expr)) => OrderSpec::new(text_of(source, expr), dir),
        None => OrderSpec::new(text_of(source, item), Direction::Asc),
    }
}

/// Reads the unsigned integer of a `LIMIT` or `OFFSET` clause.
pub(crate) fn count(clause: Clause, source: &str, tokens: &[Token]) -> Result<u64, Diagnostic> {
    match tokens {
        [Token {
            kind: TokenKind::Number(digits),
            ..
        }] => digits.parse().map_err(|_| {
            Diagnostic::new(clause, "expected an unsigned integer", source, tokens)
        }),
        _ => Err(Diagnostic::new(
            clause,
            "expected an unsigned integer",
            source,
            tokens,
        )),
    }
}
