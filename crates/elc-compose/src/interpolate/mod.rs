//! Variable interpolation.
//!
//! Expressions are parsed into [`Segment`]s and evaluated against the set of
//! variables resolved so far. Substitution is single-pass: text produced by a
//! substitution is never scanned again.

pub mod parser;

use elc_common::error::{ElcError, Result};

pub use self::parser::{Segment, parse_expression};
use crate::vars::VarMap;

/// Evaluates parsed segments against `scope`, appending to `out`.
fn evaluate(segments: &[Segment], scope: &VarMap, out: &mut String) -> Result<()> {
    for segment in segments {
        match segment {
            Segment::Literal(text) => out.push_str(text),
            Segment::Reference { name, default: None } => {
                let value = scope
                    .get(name)
                    .ok_or_else(|| ElcError::UndefinedVariable { name: name.clone() })?;
                out.push_str(value);
            }
            Segment::Reference {
                name,
                default: Some(fallback),
            } => match scope.get(name) {
                Some(value) if !value.is_empty() => out.push_str(value),
                _ => evaluate(fallback, scope, out)?,
            },
        }
    }
    Ok(())
}

/// Interpolates a single raw expression against already-resolved variables.
///
/// # Errors
///
/// Returns [`ElcError::InvalidExpression`] if the expression is malformed and
/// [`ElcError::UndefinedVariable`] if a reference without a default names a
/// variable absent from `scope`.
pub fn interpolate(expression: &str, scope: &VarMap) -> Result<String> {
    let segments = parse_expression(expression)?;
    let mut out = String::with_capacity(expression.len());
    evaluate(&segments, scope, &mut out)?;
    Ok(out)
}

/// Resolves `raw` declarations in order, inserting each result into `scope`.
///
/// Each entry sees the ambient variables, everything resolved by enclosing
/// scopes, and the entries declared before it. An entry is evaluated before
/// it is bound, so `X: ${X:-fallback}` reads the enclosing value of `X`.
///
/// # Errors
///
/// Propagates the first interpolation error.
pub fn resolve_into(raw: &VarMap, scope: &mut VarMap) -> Result<()> {
    for (name, expression) in raw.iter() {
        let value = interpolate(expression, scope).inspect_err(|e| {
            tracing::debug!(variable = name, error = %e, "failed to resolve variable");
        })?;
        scope.insert(name, value);
    }
    Ok(())
}
