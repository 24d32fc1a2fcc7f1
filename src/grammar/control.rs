//! Control lines: `SET`, `UNSET` and `DEFINE`.
//!
//! These lines carry no statement. `SET`/`UNSET` update the ambient
//! provenance; `DEFINE` and document metadata are recognized and skipped.

use std::collections::BTreeSet;

use super::error::{GrammarError, GrammarResult};
use super::lexer::{self, Token, TokenKind};
use crate::provenance::{AnnotationValue, Citation};

/// A parsed control line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Control {
    SetCitation(Citation),
    SetEvidence(String),
    SetAnnotation { key: String, value: AnnotationValue },
    Unset(String),
    UnsetAll,
    /// Recognized but without effect on the graph (`DEFINE`, `SET DOCUMENT`,
    /// statement groups). Holds the keyword for logging.
    Ignored(String),
}

/// Whether a line is a control line rather than a statement.
pub fn is_control(line: &str) -> bool {
    let first = line.split_whitespace().next().unwrap_or_default();
    matches!(first, "SET" | "UNSET" | "DEFINE")
}

/// Parse a control line.
pub fn parse_control(line: &str) -> GrammarResult<Control> {
    let invalid = |message: &str| GrammarError::InvalidSet {
        fragment: line.to_string(),
        message: message.to_string(),
    };

    let mut words = line.split_whitespace();
    match words.next() {
        Some("DEFINE") => return Ok(Control::Ignored("DEFINE".into())),
        Some("SET") if words.next() == Some("DOCUMENT") => {
            return Ok(Control::Ignored("SET DOCUMENT".into()));
        }
        Some("SET") | Some("UNSET") => {}
        _ => return Err(invalid("expected SET, UNSET or DEFINE")),
    }

    let tokens = lexer::tokenize(line)?;
    let keyword = tokens.first().and_then(Token::word).unwrap_or_default();

    if keyword == "UNSET" {
        return match tokens.get(1).map(|t| &t.kind) {
            Some(TokenKind::Word(key)) if tokens.len() == 2 => Ok(match key.as_str() {
                "ALL" => Control::UnsetAll,
                "STATEMENT_GROUP" => Control::Ignored("UNSET STATEMENT_GROUP".into()),
                _ => Control::Unset(key.clone()),
            }),
            _ => Err(invalid("UNSET takes a single key")),
        };
    }

    let key = match tokens.get(1).map(|t| &t.kind) {
        Some(TokenKind::Word(key)) | Some(TokenKind::Quoted(key)) => key.clone(),
        _ => return Err(invalid("missing key after SET")),
    };
    if tokens.get(2).map(|t| &t.kind) != Some(&TokenKind::Equals) {
        return Err(invalid("expected '=' after the key"));
    }
    let values = values(&tokens[3..]).ok_or_else(|| invalid("expected a value or {list}"))?;

    match key.as_str() {
        "Citation" => {
            let Values::List(items) = values else {
                return Err(invalid("a citation is a {type, name, reference} list"));
            };
            if items.len() < 3 {
                return Err(invalid("a citation needs type, name and reference"));
            }
            let citation = Citation::new(items[0].clone(), items[1].clone(), items[2].clone());
            if let Some(field) = citation.missing_field() {
                return Err(invalid(&format!("citation {field} is empty")));
            }
            Ok(Control::SetCitation(citation))
        }
        "Evidence" | "SupportingText" => match values {
            Values::Single(text) => Ok(Control::SetEvidence(text)),
            Values::List(_) => Err(invalid("evidence is a single string")),
        },
        "STATEMENT_GROUP" => Ok(Control::Ignored("SET STATEMENT_GROUP".into())),
        _ => {
            let value = match values {
                Values::Single(v) => AnnotationValue::Single(v),
                Values::List(items) => AnnotationValue::Set(items.into_iter().collect::<BTreeSet<_>>()),
            };
            Ok(Control::SetAnnotation { key, value })
        }
    }
}

enum Values {
    Single(String),
    List(Vec<String>),
}

/// `"v"`, `v` or `{"a", "b"}` occupying the whole token slice.
fn values(tokens: &[Token]) -> Option<Values> {
    match tokens {
        [single] => match &single.kind {
            TokenKind::Word(v) | TokenKind::Quoted(v) => Some(Values::Single(v.clone())),
            _ => None,
        },
        [open, inner @ .., close]
            if open.kind == TokenKind::LBrace && close.kind == TokenKind::RBrace =>
        {
            let mut items = Vec::new();
            for (i, token) in inner.iter().enumerate() {
                match (&token.kind, i % 2) {
                    (TokenKind::Word(v) | TokenKind::Quoted(v), 0) => items.push(v.clone()),
                    (TokenKind::Comma, 1) => {}
                    _ => return None,
                }
            }
            if items.is_empty() || inner.len() % 2 == 0 {
                return None;
            }
            Some(Values::List(items))
        }
        _ => None,
    }
}
