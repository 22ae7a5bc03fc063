//! Layer-declaration extraction from the macro-resolved keymap source.
//!
//! A declaration is `ZMK_BASE_LAYER(name, bindings…)` or
//! `ZMK_LAYER(name, bindings…)`. The raw block runs to the parenthesis
//! matching the opener, with nesting depth and comment state tracked
//! explicitly so a `)` inside a nested call or a comment never ends the
//! span early.

use log::warn;

use crate::model::{GUARD_MACRO, LAYER_CONSTRUCTS, Layer};

/// Cut every `#ifndef ZMK_BASE_LAYER … #endif` span, inclusive.
///
/// The guard carries fallback definitions of the layer construct itself,
/// which would otherwise produce false layer matches. Only this one guard
/// name is handled; all other directives pass through untouched.
pub fn strip_guard_block(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    loop {
        let Some(start) = find_guard_start(rest) else {
            out.push_str(rest);
            return out;
        };
        out.push_str(&rest[..start]);
        let after = &rest[start..];
        match after.find("#endif") {
            Some(endif) => {
                let end = endif + "#endif".len();
                // swallow the remainder of the #endif line as well
                let line_end = after[end..]
                    .find('\n')
                    .map(|n| end + n + 1)
                    .unwrap_or(after.len());
                rest = &after[line_end..];
            }
            None => {
                warn!("unterminated #ifndef {GUARD_MACRO} block, dropping trailing text");
                return out;
            }
        }
    }
}

fn find_guard_start(text: &str) -> Option<usize> {
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        if let Some(rest) = line.trim_start().strip_prefix("#ifndef") {
            let name = rest.trim_start();
            if name.starts_with(GUARD_MACRO)
                && !name[GUARD_MACRO.len()..]
                    .starts_with(|c: char| c.is_ascii_alphanumeric() || c == '_')
            {
                return Some(offset);
            }
        }
        offset += line.len();
    }
    None
}

/// Scan the whole source for layer declarations, in order of appearance.
///
/// Every match is yielded, duplicates included; the assembly step decides
/// which one wins. An unterminated declaration is dropped with a warning.
pub fn extract_layers(text: &str) -> Vec<Layer> {
    let bytes = text.as_bytes();
    let mut layers = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let Some((at, len)) = next_construct(text, i) else {
            break;
        };
        let mut j = at + len;
        while j < bytes.len() && bytes[j].is_ascii_whitespace() {
            j += 1;
        }
        if j >= bytes.len() || bytes[j] != b'(' {
            i = at + len;
            continue;
        }
        match read_arguments(text, j) {
            Some((name, block, end)) => {
                let name = canonicalize(name.trim());
                if name.is_empty() {
                    warn!("layer declaration without a name, skipping");
                } else {
                    layers.push(Layer {
                        name,
                        block: block.to_string(),
                    });
                }
                i = end;
            }
            None => {
                warn!("unterminated layer declaration, skipping");
                i = at + len;
            }
        }
    }

    layers
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Earliest whole-word occurrence of either construct name at or after `from`.
fn next_construct(text: &str, from: usize) -> Option<(usize, usize)> {
    let bytes = text.as_bytes();
    let mut best: Option<(usize, usize)> = None;

    for name in LAYER_CONSTRUCTS {
        let mut at = from;
        while let Some(pos) = text[at..].find(name) {
            let start = at + pos;
            let end = start + name.len();
            let left_ok = start == 0 || !is_word_byte(bytes[start - 1]);
            let right_ok = end == bytes.len() || !is_word_byte(bytes[end]);
            if left_ok && right_ok {
                if best.is_none_or(|(b, _)| start < b) {
                    best = Some((start, name.len()));
                }
                break;
            }
            at = end;
        }
    }

    best
}

/// Read `(name, block)` starting at the opening parenthesis.
///
/// Returns the name span, the raw block span and the byte offset just past
/// the matching `)`. Parenthesis depth and comment state are tracked so the
/// span only ends on the real closer.
fn read_arguments(text: &str, open: usize) -> Option<(&str, &str, usize)> {
    let bytes = text.as_bytes();
    let mut depth = 1usize;
    let mut name_end = None;
    let mut k = open + 1;

    while k < bytes.len() {
        match bytes[k] {
            b'/' if bytes.get(k + 1) == Some(&b'/') => {
                k = text[k..].find('\n').map(|n| k + n).unwrap_or(bytes.len());
                continue;
            }
            b'/' if bytes.get(k + 1) == Some(&b'*') => {
                k = match text[k + 2..].find("*/") {
                    Some(n) => k + 2 + n + 2,
                    None => return None,
                };
                continue;
            }
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    let name_end = name_end.unwrap_or(k);
                    let block_start = if name_end < k { name_end + 1 } else { name_end };
                    return Some((&text[open + 1..name_end], &text[block_start..k], k + 1));
                }
            }
            b',' if depth == 1 && name_end.is_none() => name_end = Some(k),
            _ => {}
        }
        k += 1;
    }

    None
}

/// First letter upper-cased, rest unchanged.
fn canonicalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}
