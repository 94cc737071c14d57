//! Quote and comment blanking.
//!
//! One left-to-right pass per line. Literal contents are overwritten with
//! [`FILLER`], block comments with spaces, and a line comment is cut off
//! after being classified. Nothing before a cut moves.

use super::{CommentType, EndTag, Lines, FILLER};
use crate::diagnostics::{Diagnostic, DiagnosticSink, Stage};
use crate::place::Place;

/// State carried from one line to the next.
#[derive(Debug, Default)]
struct Carry {
    in_block_comment: bool,
    open_quote: Option<u8>,
    in_message: bool,
}

pub(super) fn blank_literals_and_comments(lines: &mut Lines, sink: &mut dyn DiagnosticSink) {
    let mut carry = Carry::default();

    for idx in 1..=lines.line_count() {
        let mut bytes = std::mem::take(&mut lines.text[idx]).into_bytes();
        let starts_message =
            !carry.in_block_comment && carry.open_quote.is_none() && is_message_directive(&bytes);
        if starts_message || carry.in_message {
            // free text such as `#error don't` is not code; the directive
            // pass blanks it along with any continuation lines
            carry.in_message = bytes.last() == Some(&b'\\');
            lines.text[idx] = String::from_utf8_lossy(&bytes).into_owned();
            continue;
        }
        let comment = scrub_line(&mut bytes, idx, &mut carry, sink);

        if let Some(quote) = carry.open_quote {
            if lines.raw[idx].ends_with('\\') {
                // literal continues on the next line; keep the marker visible
                if let Some(last) = bytes.last_mut() {
                    *last = b'\\';
                }
            } else {
                sink.report(Diagnostic::warning(
                    Stage::Scrub,
                    Place::new(idx, bytes.len()),
                    format!("unterminated {} literal", literal_name(quote)),
                ));
                carry.open_quote = None;
            }
        }

        if let Some((col, body)) = comment {
            lines.comment[idx] = CommentType::classify(&body);
            lines.comment_col[idx] = Some(col);
            lines.end_tag[idx] = EndTag::parse(&body);
        }

        lines.text[idx] = String::from_utf8(bytes)
            .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned());
    }

    if carry.in_block_comment {
        let last = lines.line_count();
        sink.report(Diagnostic::warning(
            Stage::Scrub,
            Place::new(last, lines.text(last).len()),
            "block comment is not closed at end of file",
        ));
    }
}

/// Blanks one line in place. Returns the column and body of a line comment.
fn scrub_line(
    bytes: &mut Vec<u8>,
    line: usize,
    carry: &mut Carry,
    sink: &mut dyn DiagnosticSink,
) -> Option<(usize, String)> {
    let mut i = 0;
    while i < bytes.len() {
        if carry.in_block_comment {
            if bytes[i] == b'*' && bytes.get(i + 1) == Some(&b'/') {
                bytes[i] = b' ';
                bytes[i + 1] = b' ';
                carry.in_block_comment = false;
                i += 2;
            } else {
                bytes[i] = b' ';
                i += 1;
            }
            continue;
        }

        if let Some(quote) = carry.open_quote {
            match bytes[i] {
                b'\\' => {
                    bytes[i] = FILLER;
                    if let Some(escaped) = bytes.get_mut(i + 1) {
                        *escaped = FILLER;
                    }
                    i += 2;
                }
                b if b == quote => {
                    carry.open_quote = None;
                    i += 1;
                }
                _ => {
                    bytes[i] = FILLER;
                    i += 1;
                }
            }
            continue;
        }

        let next = bytes.get(i + 1).copied();
        match bytes[i] {
            b'"' => carry.open_quote = Some(b'"'),
            b'\'' if !is_digit_separator(bytes.as_slice(), i) => carry.open_quote = Some(b'\''),
            b'/' if next == Some(b'/') => {
                let body = String::from_utf8_lossy(&bytes[i + 2..]).into_owned();
                let continued = body.trim_end().ends_with('\\');
                bytes.truncate(i);
                if continued {
                    bytes.push(b'\\');
                }
                return Some((i, body));
            }
            b'/' if next == Some(b'*') => {
                bytes[i] = b' ';
                bytes[i + 1] = b' ';
                carry.in_block_comment = true;
                i += 2;
                continue;
            }
            b'*' if next == Some(b'/') => {
                sink.report(Diagnostic::warning(
                    Stage::Scrub,
                    Place::new(line, i),
                    "'*/' outside of a block comment",
                ));
                i += 2;
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// A `'` between two digits of a numeric literal, as in `1'000'000`.
fn is_digit_separator(bytes: &[u8], i: usize) -> bool {
    if i == 0 || !bytes.get(i + 1).is_some_and(u8::is_ascii_alphanumeric) {
        return false;
    }
    let mut start = i;
    while start > 0 && (bytes[start - 1].is_ascii_alphanumeric() || bytes[start - 1] == b'\'') {
        start -= 1;
    }
    start < i && bytes[start].is_ascii_digit()
}

fn is_message_directive(bytes: &[u8]) -> bool {
    let text = String::from_utf8_lossy(bytes);
    let Some(rest) = text.trim_start().strip_prefix('#') else {
        return false;
    };
    let rest = rest.trim_start();
    rest.starts_with("error") || rest.starts_with("warning")
}

fn literal_name(quote: u8) -> &'static str {
    if quote == b'"' {
        "string"
    } else {
        "character"
    }
}
