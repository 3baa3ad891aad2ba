//! Adaptive dictionary (LZW) compression over text
//!
//! The dictionary is implicitly seeded with every Unicode scalar value, so a
//! single character is its own code. Codes for longer phrases start at
//! [`DICTIONARY_BASE`], just above the literal range, which keeps phrase codes
//! and literal characters apart for any input.
//!
//! [`compress`]/[`decompress`] work on [`Token`] sequences. The envelope stores
//! text, so [`compress_text`]/[`decompress_text`] additionally pack tokens into
//! a string (see the `pack` module).

mod pack;

pub use pack::{pack, unpack, ESCAPE};

use cellar_core::{Error, Result};
use std::collections::HashMap;

/// One emitted code: a Unicode scalar value or a dictionary code
pub type Token = u32;

/// First dictionary code, one above the largest Unicode scalar value
pub const DICTIONARY_BASE: Token = 0x11_0000;

/// Compress `input` into a token sequence
pub fn compress(input: &str) -> Vec<Token> {
    let mut chars = input.chars();
    let Some(first) = chars.next() else {
        return Vec::new();
    };

    let mut dictionary: HashMap<(Token, char), Token> = HashMap::new();
    let mut next_code = DICTIONARY_BASE;
    let mut phrase = first as Token;
    let mut out = Vec::new();

    for c in chars {
        if let Some(&code) = dictionary.get(&(phrase, c)) {
            phrase = code;
            continue;
        }
        out.push(phrase);
        if next_code < Token::MAX {
            dictionary.insert((phrase, c), next_code);
            next_code += 1;
        }
        phrase = c as Token;
    }
    out.push(phrase);
    out
}

/// Rebuild the text a token sequence was compressed from
pub fn decompress(tokens: &[Token]) -> Result<String> {
    let Some((&first, rest)) = tokens.split_first() else {
        return Ok(String::new());
    };
    if first >= DICTIONARY_BASE {
        return Err(Error::decode(format!(
            "compressed stream starts with dictionary code {first}"
        )));
    }

    // entries[i] holds the phrase for code DICTIONARY_BASE + i
    let mut entries: Vec<String> = Vec::new();
    let mut previous = literal(first, 0)?.to_string();
    let mut out = previous.clone();

    for (offset, &token) in rest.iter().enumerate() {
        let position = offset + 1;
        let phrase = if token < DICTIONARY_BASE {
            literal(token, position)?.to_string()
        } else {
            let index = (token - DICTIONARY_BASE) as usize;
            match entries.get(index) {
                Some(known) => known.clone(),
                // The encoder used the entry it created on the previous step
                None if index == entries.len() => {
                    let mut synthesized = previous.clone();
                    synthesized.push(leading_char(&previous)?);
                    synthesized
                }
                None => {
                    return Err(Error::decode(format!(
                        "token {token} at position {position} refers to an unknown dictionary code"
                    )))
                }
            }
        };

        out.push_str(&phrase);
        if DICTIONARY_BASE as usize + entries.len() < Token::MAX as usize {
            let mut entry = previous;
            entry.push(leading_char(&phrase)?);
            entries.push(entry);
        }
        previous = phrase;
    }

    Ok(out)
}

/// Compress `input` and pack the tokens into text
pub fn compress_text(input: &str) -> String {
    pack(&compress(input))
}

/// Unpack and decompress text produced by [`compress_text`]
pub fn decompress_text(packed: &str) -> Result<String> {
    decompress(&unpack(packed)?)
}

fn literal(token: Token, position: usize) -> Result<char> {
    char::from_u32(token).ok_or_else(|| {
        Error::decode(format!(
            "token {token} at position {position} is not a valid character"
        ))
    })
}

fn leading_char(phrase: &str) -> Result<char> {
    phrase
        .chars()
        .next()
        .ok_or_else(|| Error::decode("empty phrase in compressed stream"))
}
