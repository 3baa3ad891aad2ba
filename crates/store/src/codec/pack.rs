//! Packing token sequences into text
//!
//! Literal characters are written as themselves. A dictionary code is written
//! as [`ESCAPE`] followed by `code - DICTIONARY_BASE` in base-16384 digits,
//! most significant first: continuation digits come from `U+0100..U+40FF`, the
//! final digit from `U+4100..U+80FF`. A literal `ESCAPE` is doubled.
//!
//! Phrase codes therefore cost two characters for the first 16384 dictionary
//! entries, never more than the two literals they replace.

use super::{Token, DICTIONARY_BASE};
use cellar_core::{Error, Result};

/// Introduces a dictionary code in packed text
pub const ESCAPE: char = '\u{1}';

const RADIX: u32 = 0x4000;
const CONTINUATION_BASE: u32 = 0x0100;
const FINAL_BASE: u32 = 0x4100;

/// Pack tokens produced by [`super::compress`] into text
pub fn pack(tokens: &[Token]) -> String {
    let mut out = String::with_capacity(tokens.len());
    for &token in tokens {
        if token >= DICTIONARY_BASE {
            out.push(ESCAPE);
            push_code(&mut out, token - DICTIONARY_BASE);
            continue;
        }
        let c = char::from_u32(token).unwrap_or(char::REPLACEMENT_CHARACTER);
        if c == ESCAPE {
            out.push(ESCAPE);
        }
        out.push(c);
    }
    out
}

/// Recover the token sequence from packed text
pub fn unpack(packed: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::with_capacity(packed.len());
    let mut chars = packed.chars().enumerate();

    while let Some((position, c)) = chars.next() {
        if c != ESCAPE {
            tokens.push(c as Token);
            continue;
        }

        let mut offset: u64 = 0;
        let mut first_digit = true;
        loop {
            let Some((_, digit)) = chars.next() else {
                return Err(Error::decode(format!(
                    "dangling escape at position {position} in compressed text"
                )));
            };
            let value = digit as u32;
            if digit == ESCAPE && first_digit {
                // doubled escape is a literal
                tokens.push(ESCAPE as Token);
                break;
            } else if (CONTINUATION_BASE..CONTINUATION_BASE + RADIX).contains(&value) {
                offset = offset * u64::from(RADIX) + u64::from(value - CONTINUATION_BASE);
                check_offset(offset, position)?;
                first_digit = false;
            } else if (FINAL_BASE..FINAL_BASE + RADIX).contains(&value) {
                offset = offset * u64::from(RADIX) + u64::from(value - FINAL_BASE);
                check_offset(offset, position)?;
                tokens.push(DICTIONARY_BASE + offset as Token);
                break;
            } else {
                return Err(Error::decode(format!(
                    "invalid code digit {digit:?} after escape at position {position}"
                )));
            }
        }
    }

    Ok(tokens)
}

fn push_code(out: &mut String, mut offset: u32) {
    let mut digits = [0u32; 3];
    let mut len = 0;
    loop {
        digits[len] = offset % RADIX;
        len += 1;
        offset /= RADIX;
        if offset == 0 {
            break;
        }
    }
    for &digit in digits[1..len].iter().rev() {
        out.push(digit_char(CONTINUATION_BASE + digit));
    }
    out.push(digit_char(FINAL_BASE + digits[0]));
}

fn digit_char(value: u32) -> char {
    // digit ranges sit below the surrogate block
    char::from_u32(value).unwrap_or(char::REPLACEMENT_CHARACTER)
}

fn check_offset(offset: u64, position: usize) -> Result<()> {
    if offset > u64::from(Token::MAX - DICTIONARY_BASE) {
        return Err(Error::decode(format!(
            "dictionary code after escape at position {position} is out of range"
        )));
    }
    Ok(())
}
