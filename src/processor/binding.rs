//! Classification of one binding token into a behavior plus parameters.
//!
//! Never fails: any behavior name is accepted verbatim, validity is not
//! this stage's concern.

use crate::model::{BEHAVIOR_MARKER, ParsedBinding, SENTINEL_NONE, SENTINEL_TRANS};

pub fn parse_binding(token: &str) -> ParsedBinding {
    if token == SENTINEL_TRANS {
        return ParsedBinding::transparent();
    }
    if token == SENTINEL_NONE {
        return ParsedBinding::none();
    }

    let original = token.to_string();
    let clean = token.strip_prefix(BEHAVIOR_MARKER).unwrap_or(token).trim();

    // function-call shape: lt(NAV, 0)
    if let Some((behavior, args)) = split_call(clean) {
        let args = args.trim();
        let params = if args.contains(',') {
            args.split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(String::from)
                .collect()
        } else if args.is_empty() {
            Vec::new()
        } else {
            vec![args.to_string()]
        };
        return ParsedBinding {
            original,
            behavior: behavior.to_string(),
            params,
        };
    }

    // space-separated shape: kp A, mt LSHIFT A
    let mut words = clean.split_whitespace();
    let behavior = words.next().unwrap_or_default().to_string();
    let params = words.map(String::from).collect();

    ParsedBinding {
        original,
        behavior,
        params,
    }
}

/// Whole-token `ident(args)` shape, nothing before or after.
fn split_call(text: &str) -> Option<(&str, &str)> {
    let open = text.find('(')?;
    if !text.ends_with(')') {
        return None;
    }
    let ident = text[..open].trim_end();
    let mut cs = ident.chars();
    let first = cs.next()?;
    if !(first.is_ascii_alphabetic() || first == '_') {
        return None;
    }
    if !cs.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return None;
    }
    Some((ident, &text[open + 1..text.len() - 1]))
}
