//! Phase 2: Key and value readers
//!
//! Each reader scans forward for quotes or its structural terminator (`=`
//! for keys, a space for values) and accumulates one token:
//! - A quote opens a quoted segment; the next unescaped quote closes it and
//!   ends the token. Only whitespace may sit between the closing quote and
//!   the terminator.
//! - A quote preceded by a backslash is a literal quote. The backslash is
//!   dropped.
//! - Inside a quoted value, spaces are content. Inside a quoted key, an `=`
//!   is an error.
//!
//! Failures carry the remainder reached so the parser can keep its offset
//! bookkeeping exact.

use tracing::trace;

use crate::error::TokenError;
use crate::scanner::{read_to_next, Scan};

const KEY_DELIMITERS: [char; 3] = ['"', '\'', '='];
const VALUE_DELIMITERS: [char; 3] = ['"', '\'', ' '];

/// What ended the most recent scan, after escape handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mark {
    /// The buffer ran out.
    End,
    /// An unescaped quote character.
    Quote(char),
    /// A backslash-escaped quote, already folded into the token.
    EscapedQuote,
    /// `=` when reading a key, a space when reading a value.
    Terminator,
}

/// A reader that stopped on malformed input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadFailure<'a> {
    pub error: TokenError,
    /// Unread input at the point of failure.
    pub rest: &'a str,
}

/// A token and the input left after it, or the reason reading stopped.
pub type ReadResult<'a> = std::result::Result<(String, &'a str), ReadFailure<'a>>;

/// Append a scanned piece to `token` and classify what stopped the scan.
fn absorb(token: &mut String, scan: &Scan<'_>) -> Mark {
    match scan.delimiter {
        None => {
            token.push_str(scan.consumed);
            Mark::End
        }
        Some(quote @ ('"' | '\'')) => match scan.consumed.strip_suffix('\\') {
            Some(head) => {
                token.push_str(head);
                token.push(quote);
                Mark::EscapedQuote
            }
            None => {
                token.push_str(scan.consumed);
                Mark::Quote(quote)
            }
        },
        Some(_) => {
            token.push_str(scan.consumed);
            Mark::Terminator
        }
    }
}

/// Finish a token whose closing quote was just read.
fn after_closing_quote(token: String, rest: &str, terminator: char) -> ReadResult<'_> {
    let tail = read_to_next(rest, &[terminator]);
    if !tail.consumed.trim().is_empty() {
        return Err(ReadFailure {
            error: TokenError::TrailingCharacters,
            rest: tail.rest,
        });
    }
    Ok((token, tail.rest))
}

/// Read a key from the start of `buf`.
///
/// A key is everything before the next `=`, or a single or double quoted
/// group before it. Whitespace before the `=` of an unquoted key is kept.
/// Returns the key and the input after the `=`.
pub fn read_key(buf: &str) -> ReadResult<'_> {
    let mut key = String::new();
    let mut need_closing_quote = false;
    let mut scan = read_to_next(buf, &KEY_DELIMITERS);

    loop {
        let mark = absorb(&mut key, &scan);
        let rest = scan.rest;

        if let Mark::Quote(quote) = mark {
            if need_closing_quote {
                return after_closing_quote(key, rest, '=');
            }
            trace!(%quote, "quoted key segment");
            need_closing_quote = true;
        }

        if mark == Mark::Terminator || rest.is_empty() {
            if need_closing_quote {
                return Err(ReadFailure {
                    error: TokenError::UnclosedQuote,
                    rest,
                });
            }
            return Ok((key, rest));
        }

        scan = read_to_next(rest, &KEY_DELIMITERS);
    }
}

/// Read a value from the start of `buf`.
///
/// A value is everything up to the next space, or a single or double quoted
/// group (which may contain spaces) before it. Returns the value and the
/// input after the space.
pub fn read_value(buf: &str) -> ReadResult<'_> {
    let mut value = String::new();
    let mut need_closing_quote = false;
    let mut scan = read_to_next(buf, &VALUE_DELIMITERS);

    loop {
        let mark = absorb(&mut value, &scan);
        let rest = scan.rest;

        match mark {
            Mark::Quote(_) if need_closing_quote => {
                return after_closing_quote(value, rest, ' ');
            }
            Mark::Quote(quote) => {
                trace!(%quote, "quoted value segment");
                need_closing_quote = true;
            }
            Mark::Terminator if !need_closing_quote => return Ok((value, rest)),
            // embedded space
            Mark::Terminator => value.push(' '),
            Mark::End | Mark::EscapedQuote => {}
        }

        if rest.is_empty() {
            if need_closing_quote {
                return Err(ReadFailure {
                    error: TokenError::UnclosedQuote,
                    rest,
                });
            }
            return Ok((value, rest));
        }

        scan = read_to_next(rest, &VALUE_DELIMITERS);
    }
}
