use log::trace;

use crate::{
    ast::{CompiledPath, Operation},
    error::{PathError, Result},
    filter::compile_filter,
    lexer::tokenize,
};

/// Turns the segment tokens of one path into operations.
pub struct Parser {
    source: String,
    tokens: Vec<String>,
}

impl Parser {
    /// Tokenize `path`; fails if it does not start with `$` or `@`.
    pub fn new(path: &str) -> Result<Self> {
        Ok(Parser {
            source: path.to_string(),
            tokens: tokenize(path)?,
        })
    }

    /// Segment tokens, root marker first.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn parse(self) -> Result<CompiledPath> {
        // the root marker only anchors the path; it is not a step
        let operations = self
            .tokens
            .iter()
            .skip(1)
            .map(|token| {
                let op = parse_operation(token)?;
                trace!("compiled `{}` into {} step on `{}`", token, op.kind, op.key);
                Ok(op)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(CompiledPath::new(&self.source, operations))
    }
}

/// Compile a path string into a reusable [`CompiledPath`].
///
/// # Examples
///
/// ```
/// use jpath::{compile, OpKind};
///
/// let path = compile("$.store.book[0,1].price").unwrap();
/// let kinds: Vec<OpKind> = path.operations().iter().map(|op| op.kind).collect();
/// assert_eq!(kinds, vec![OpKind::Key, OpKind::Index, OpKind::Key]);
/// ```
pub fn compile(path: &str) -> Result<CompiledPath> {
    Parser::new(path)?.parse()
}

/// Compile a path known to be valid, such as a string literal.
///
/// # Panics
///
/// Panics if `path` does not compile.
pub fn must_compile(path: &str) -> CompiledPath {
    match compile(path) {
        Ok(compiled) => compiled,
        Err(e) => panic!("invalid path `{}`: {}", path, e),
    }
}

/// Classify one segment token.
pub fn parse_operation(token: &str) -> Result<Operation> {
    match token {
        "$" => return Ok(Operation::root()),
        "*" => return Ok(Operation::scan()),
        _ => {}
    }

    let Some(bracket) = token.find('[') else {
        if token.is_empty() {
            return Err(PathError::MalformedPath("empty key segment".into()));
        }
        return Ok(Operation::key(token));
    };

    let key = &token[..bracket];
    let tail = &token[bracket..];
    if tail.len() < 3 {
        return Err(PathError::MalformedPath(format!(
            "bracket should hold at least one character: {}",
            tail
        )));
    }
    let body = tail
        .strip_prefix('[')
        .and_then(|t| t.strip_suffix(']'))
        .ok_or_else(|| PathError::MalformedPath(format!("unclosed bracket: {}", tail)))?;

    if body.contains('?') {
        let expr = body
            .strip_prefix("?(")
            .and_then(|b| b.strip_suffix(')'))
            .ok_or_else(|| {
                PathError::MalformedPath(format!("filter should be in `?( <expr> )` form: {}", body))
            })?;
        return Ok(Operation::filter(key, compile_filter(expr.trim_matches(' '))?));
    }

    if body.contains(':') {
        let bounds: Vec<&str> = body.split(':').collect();
        let [from, to] = bounds.as_slice() else {
            return Err(PathError::MalformedPath(format!(
                "only support one range(from, to): {}",
                body
            )));
        };
        return Ok(Operation::range(key, parse_bound(from), parse_bound(to)));
    }

    if body == "*" {
        return Ok(Operation::range(key, None, None));
    }

    let indices = body
        .split(',')
        .map(|piece| {
            let piece = piece.trim();
            piece
                .parse::<i64>()
                .map_err(|e| PathError::MalformedPath(format!("invalid index `{}`: {}", piece, e)))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Operation::index(key, indices))
}

/// Blank or non-integer bounds are unbounded.
fn parse_bound(bound: &str) -> Option<i64> {
    bound.trim().parse::<i64>().ok()
}
