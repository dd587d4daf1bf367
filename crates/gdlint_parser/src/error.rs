use gdlint_text_size::TextSize;
use thiserror::Error;

/// The sole parser-level hard failure (§4.1 "Failure modes", §7
/// "Parser-internal fatal"). Everything else — unexpected characters,
/// unbalanced brackets, a missing keyword — is recoverable and surfaces as
/// an `INVALID_TOKEN` leaf plus a downstream 1xxx diagnostic, never as an
/// `Err`.
#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum ParseError {
    #[error("nesting too deep: exceeded max_depth of {max_depth} frames at {at:?}")]
    NestingTooDeep { max_depth: usize, at: TextSize },
}
