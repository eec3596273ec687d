//! Display masks for phone numbers and tax identifiers.
//!
//! The masks are applied progressively: a partially typed value renders only
//! the punctuation boundaries reached so far, so the same functions serve live
//! typing and final display.

use crate::domain::document::digits;
use crate::domain::types::ClientKind;

const PHONE_MAX_DIGITS: usize = 11;

/// Masks a phone number as `(DD) DDDD-DDDD` or, with 11 digits, `(DD) DDDDD-DDDD`.
pub fn format_phone(value: &str) -> String {
    let raw: String = digits(value).chars().take(PHONE_MAX_DIGITS).collect();
    if raw.len() <= 2 {
        return raw;
    }

    let (area, rest) = raw.split_at(2);
    let split = if raw.len() == PHONE_MAX_DIGITS { 5 } else { 4 };

    let mut out = format!("({area}) ");
    if rest.len() > split {
        out.push_str(&rest[..split]);
        out.push('-');
        out.push_str(&rest[split..]);
    } else {
        out.push_str(rest);
    }
    out
}

/// Masks a document as a CPF (`DDD.DDD.DDD-DD`) or CNPJ (`DD.DDD.DDD/DDDD-DD`).
///
/// Digits beyond the length of the kind are dropped, which is what happens
/// when a client is switched from PJ to PF after the document was typed.
pub fn format_document(value: &str, kind: ClientKind) -> String {
    let raw: String = digits(value).chars().take(kind.document_len()).collect();
    match kind {
        ClientKind::PF => mask(&raw, &[(3, '.'), (6, '.'), (9, '-')]),
        ClientKind::PJ => mask(&raw, &[(2, '.'), (5, '.'), (8, '/'), (12, '-')]),
    }
}

/// Inserts each separator before the digit at its position, once that digit exists.
fn mask(raw: &str, separators: &[(usize, char)]) -> String {
    let mut out = String::with_capacity(raw.len() + separators.len());
    for (i, c) in raw.chars().enumerate() {
        if let Some((_, sep)) = separators.iter().find(|(pos, _)| *pos == i) {
            out.push(*sep);
        }
        out.push(c);
    }
    out
}
