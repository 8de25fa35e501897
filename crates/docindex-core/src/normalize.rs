//! Canonicalization of raw extracted text.
//!
//! Text pulled out of PDFs and exported files tends to carry decomposed
//! accents, byte-order marks, zero-width formatting characters, stray
//! control bytes, tab-aligned columns, and long runs of blank lines.
//! [`normalize`] rewrites all of that into a stable form before chunking.
//!
//! # Rules
//!
//! 1. Unicode canonical composition (NFC).
//! 2. Drop the byte-order mark.
//! 3. Drop zero-width space, zero-width non-joiner, and zero-width joiner.
//! 4. Drop C0 control characters other than `\n` and `\t`. Nothing is
//!    inserted in their place.
//! 5. Replace each `\t` with a space.
//! 6. Collapse runs of spaces to a single space.
//! 7. Collapse runs of three or more newlines to exactly two.
//!
//! Rules 2 through 7 run as one pass over the composed text. Dropping
//! characters can leave a base letter directly before a combining mark it
//! was separated from, so the result is recomposed when it is no longer in
//! NFC. That keeps `normalize` idempotent.

use unicode_normalization::{is_nfc, UnicodeNormalization};

const BYTE_ORDER_MARK: char = '\u{feff}';
const ZERO_WIDTH_SPACE: char = '\u{200b}';
const ZERO_WIDTH_NON_JOINER: char = '\u{200c}';
const ZERO_WIDTH_JOINER: char = '\u{200d}';

/// Longest newline run kept in the output (one blank line).
const MAX_NEWLINE_RUN: usize = 2;

/// Normalize raw document text. Total over all `&str` input.
///
/// ```rust
/// use docindex_core::normalize;
///
/// assert_eq!(normalize("\u{feff}col1\tcol2\n\n\n\nnext"), "col1 col2\n\nnext");
/// ```
pub fn normalize(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let composed: String = raw.nfc().collect();
    let mut out = String::with_capacity(composed.len());
    let mut space_run = 0usize;
    let mut newline_run = 0usize;

    for c in composed.chars() {
        let c = match c {
            '\t' => ' ',
            '\n' => '\n',
            // U+FEFF is a BOM at position 0 and a zero-width no-break space
            // anywhere else; both are invisible.
            BYTE_ORDER_MARK | ZERO_WIDTH_SPACE | ZERO_WIDTH_NON_JOINER | ZERO_WIDTH_JOINER => {
                continue
            }
            c if is_c0_control(c) => continue,
            c => c,
        };

        match c {
            ' ' => {
                newline_run = 0;
                space_run += 1;
                if space_run > 1 {
                    continue;
                }
            }
            '\n' => {
                space_run = 0;
                newline_run += 1;
                if newline_run > MAX_NEWLINE_RUN {
                    continue;
                }
            }
            _ => {
                space_run = 0;
                newline_run = 0;
            }
        }
        out.push(c);
    }

    if is_nfc(&out) {
        out
    } else {
        out.nfc().collect()
    }
}

fn is_c0_control(c: char) -> bool {
    (c as u32) < 0x20
}
