//! Reader for the value representations the interpreter prints at its prompt.
//!
//! Only the shapes produced by the commands in [`crate::protocol`] are
//! understood: integers, lists of string literals and bytes literals.

use std::{iter::Peekable, str::Chars};

use crate::error::{Error, UpyResult};

fn malformed(what: &str, text: &str) -> Error {
    Error::UnexpectedBehavior(format!("malformed {what} in reply: {text:?}"))
}

/// Parses a printed integer such as `32768`.
pub fn parse_int(text: &str) -> UpyResult<u32> {
    text.trim().parse().map_err(|_| malformed("integer", text))
}

/// Parses a printed `bytes`, e.g. `b'0a1f'`.
pub fn parse_bytes(text: &str) -> UpyResult<Vec<u8>> {
    let trimmed = text.trim();
    let body = trimmed
        .strip_prefix('b')
        .ok_or_else(|| malformed("bytes", text))?;

    let mut chars = body.chars().peekable();
    let value = read_literal(&mut chars).ok_or_else(|| malformed("bytes", text))?;
    if chars.next().is_some() {
        return Err(malformed("bytes", text));
    }

    value
        .chars()
        .map(|c| u8::try_from(u32::from(c)).map_err(|_| malformed("bytes", text)))
        .collect()
}

/// Parses a printed list of strings, e.g. `['lib', 'main.py']`.
pub fn parse_str_list(text: &str) -> UpyResult<Vec<String>> {
    let mut chars = text.trim().chars().peekable();
    let mut items = vec![];

    if chars.next() != Some('[') {
        return Err(malformed("list", text));
    }

    loop {
        skip_whitespace(&mut chars);
        match chars.peek() {
            Some(']') => {
                let _ = chars.next();
                break;
            }
            Some('\'' | '"') => {
                items.push(read_literal(&mut chars).ok_or_else(|| malformed("list", text))?);
                skip_whitespace(&mut chars);
                match chars.next() {
                    Some(',') => continue,
                    Some(']') => break,
                    _ => return Err(malformed("list", text)),
                }
            }
            _ => return Err(malformed("list", text)),
        }
    }

    match chars.next() {
        None => Ok(items),
        Some(_) => Err(malformed("list", text)),
    }
}

fn skip_whitespace(chars: &mut Peekable<Chars<'_>>) {
    while chars.peek().is_some_and(|c| c.is_whitespace()) {
        let _ = chars.next();
    }
}

fn read_hex(chars: &mut Peekable<Chars<'_>>, digits: usize) -> Option<char> {
    let text: String = chars.by_ref().take(digits).collect();
    if text.len() != digits {
        return None;
    }
    u32::from_str_radix(&text, 16).ok().and_then(char::from_u32)
}

/// Reads one quoted literal, resolving escapes. The quote character is
/// whichever of `'` or `"` opens the literal.
fn read_literal(chars: &mut Peekable<Chars<'_>>) -> Option<String> {
    let quote = chars.next().filter(|c| *c == '\'' || *c == '"')?;
    let mut value = String::new();

    loop {
        match chars.next()? {
            c if c == quote => return Some(value),
            '\\' => {
                let escaped = match chars.next()? {
                    'n' => '\n',
                    'r' => '\r',
                    't' => '\t',
                    '0' => '\0',
                    'x' => read_hex(chars, 2)?,
                    'u' => read_hex(chars, 4)?,
                    'U' => read_hex(chars, 8)?,
                    other => other,
                };
                value.push(escaped);
            }
            c => value.push(c),
        }
    }
}
