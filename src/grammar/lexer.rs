//! Lexer: BEL statement text → tokens with byte spans.
//!
//! The token set is small: bare words, quoted strings, punctuation and the
//! relation symbols (`->`, `-|`, `=>`, `=|`, `--`, `:>`, `>>`). Symbols are
//! emitted as [`TokenKind::Word`] so the parser resolves every relation
//! through a single keyword table.

use super::error::{GrammarError, GrammarResult};

/// Byte-level source span for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// Keyword, bare name, number or relation symbol.
    Word(String),
    /// Double-quoted string with escapes already resolved.
    Quoted(String),
    LParen,
    RParen,
    Comma,
    Colon,
    LBrace,
    RBrace,
    Equals,
}

/// A single lexical token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    /// The token's text as written, for error messages.
    pub fn fragment(&self) -> String {
        match &self.kind {
            TokenKind::Word(w) => w.clone(),
            TokenKind::Quoted(q) => format!("\"{q}\""),
            TokenKind::LParen => "(".into(),
            TokenKind::RParen => ")".into(),
            TokenKind::Comma => ",".into(),
            TokenKind::Colon => ":".into(),
            TokenKind::LBrace => "{".into(),
            TokenKind::RBrace => "}".into(),
            TokenKind::Equals => "=".into(),
        }
    }

    /// The bare word, if this token is one.
    pub fn word(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Word(w) => Some(w),
            _ => None,
        }
    }
}

const TWO_CHAR_SYMBOLS: [&str; 7] = ["->", "-|", "=>", "=|", "--", ":>", ">>"];

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '.' | '-' | '?' | '*' | '\'')
}

/// Tokenize a single BEL line.
pub fn tokenize(input: &str) -> GrammarResult<Vec<Token>> {
    let mut tokens = Vec::new();
    let bytes = input.as_bytes();
    let mut pos = 0;

    while pos < input.len() {
        let rest = &input[pos..];
        let Some(c) = rest.chars().next() else { break };

        if c.is_whitespace() {
            pos += c.len_utf8();
            continue;
        }

        if let Some(sym) = TWO_CHAR_SYMBOLS.iter().find(|s| rest.starts_with(**s)) {
            tokens.push(Token {
                kind: TokenKind::Word((*sym).to_string()),
                span: Span {
                    start: pos,
                    end: pos + 2,
                },
            });
            pos += 2;
            continue;
        }

        let single = match c {
            '(' => Some(TokenKind::LParen),
            ')' => Some(TokenKind::RParen),
            ',' => Some(TokenKind::Comma),
            ':' => Some(TokenKind::Colon),
            '{' => Some(TokenKind::LBrace),
            '}' => Some(TokenKind::RBrace),
            '=' => Some(TokenKind::Equals),
            _ => None,
        };
        if let Some(kind) = single {
            tokens.push(Token {
                kind,
                span: Span {
                    start: pos,
                    end: pos + 1,
                },
            });
            pos += 1;
            continue;
        }

        if c == '"' {
            let (value, end) = lex_quoted(input, pos)?;
            tokens.push(Token {
                kind: TokenKind::Quoted(value),
                span: Span { start: pos, end },
            });
            pos = end;
            continue;
        }

        if is_word_char(c) {
            let start = pos;
            let mut end = pos;
            for (offset, ch) in rest.char_indices() {
                if !is_word_char(ch) {
                    break;
                }
                // `A->B` written without spaces still splits at the symbol.
                if ch == '-' && matches!(bytes.get(start + offset + 1), Some(b'>' | b'|' | b'-')) {
                    break;
                }
                end = start + offset + ch.len_utf8();
            }
            if end == start {
                // A lone '-' ahead of a symbol character is not a word.
                return Err(GrammarError::UnexpectedCharacter {
                    position: pos,
                    fragment: c.to_string(),
                });
            }
            tokens.push(Token {
                kind: TokenKind::Word(input[start..end].to_string()),
                span: Span { start, end },
            });
            pos = end;
            continue;
        }

        return Err(GrammarError::UnexpectedCharacter {
            position: pos,
            fragment: c.to_string(),
        });
    }

    Ok(tokens)
}

/// Lex a quoted string starting at `start` (which points at the opening
/// quote). Returns the unescaped value and the byte offset after the
/// closing quote.
fn lex_quoted(input: &str, start: usize) -> GrammarResult<(String, usize)> {
    let mut value = String::new();
    let mut chars = input[start + 1..].char_indices();
    while let Some((offset, ch)) = chars.next() {
        match ch {
            '\\' => match chars.next() {
                Some((_, '"')) => value.push('"'),
                Some((_, '\\')) => value.push('\\'),
                Some((_, other)) => {
                    value.push('\\');
                    value.push(other);
                }
                None => break,
            },
            '"' => return Ok((value, start + 1 + offset + 1)),
            _ => value.push(ch),
        }
    }
    Err(GrammarError::UnterminatedString { position: start })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).unwrap().into_iter().map(|t| t.kind).collect()
    }

    fn word(w: &str) -> TokenKind {
        TokenKind::Word(w.into())
    }

    #[test]
    fn tokenize_simple_term() {
        assert_eq!(
            kinds("p(HGNC:AKT1)"),
            vec![
                word("p"),
                TokenKind::LParen,
                word("HGNC"),
                TokenKind::Colon,
                word("AKT1"),
                TokenKind::RParen,
            ]
        );
    }

    #[test]
    fn tokenize_quoted_with_escape() {
        assert_eq!(
            kinds(r#"a(CHEBI:"say \"hi\"")"#)[4],
            TokenKind::Quoted("say \"hi\"".into())
        );
    }

    #[test]
    fn relation_symbols_split_without_spaces() {
        let k = kinds("p(HGNC:A)->p(HGNC:B)");
        assert!(k.contains(&word("->")));
        assert_eq!(kinds("a -| b"), vec![word("a"), word("-|"), word("b")]);
        assert_eq!(kinds("g :> r"), vec![word("g"), word(":>"), word("r")]);
    }

    #[test]
    fn hyphenated_names_stay_whole() {
        assert_eq!(kinds("MGI:Il-6")[2], word("Il-6"));
    }

    #[test]
    fn spans_are_byte_offsets() {
        let tokens = tokenize("bp(GO:x)").unwrap();
        assert_eq!(tokens[0].span, Span { start: 0, end: 2 });
        assert_eq!(tokens[5].span, Span { start: 7, end: 8 });
    }

    #[test]
    fn unterminated_string_is_error() {
        let err = tokenize(r#"a(CHEBI:"oops)"#).unwrap_err();
        assert_eq!(err, GrammarError::UnterminatedString { position: 8 });
    }

    #[test]
    fn unexpected_character_is_error() {
        assert!(matches!(
            tokenize("p(HGNC:AKT1) ; x"),
            Err(GrammarError::UnexpectedCharacter { position: 13, .. })
        ));
    }

    #[test]
    fn set_line_tokens() {
        assert_eq!(
            kinds(r#"SET Citation = {"PubMed", "t", "1"}"#),
            vec![
                word("SET"),
                word("Citation"),
                TokenKind::Equals,
                TokenKind::LBrace,
                TokenKind::Quoted("PubMed".into()),
                TokenKind::Comma,
                TokenKind::Quoted("t".into()),
                TokenKind::Comma,
                TokenKind::Quoted("1".into()),
                TokenKind::RBrace,
            ]
        );
    }
}
