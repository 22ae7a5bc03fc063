//! Iterative `#define` substitution over the combined keymap source.
//!
//! Macros may reference other macros, so a single pass is not enough:
//! substitution repeats until a pass makes no replacement, capped at
//! `MACRO_PASS_LIMIT` passes so a cyclic definition cannot spin forever.
//! Names carrying an excluded prefix stay literal in the output.

use indexmap::IndexMap;
use log::{debug, warn};

use crate::model::{EXCLUDED_MACRO_PREFIXES, MACRO_PASS_LIMIT};

/// Collect every object-like `#define NAME value` in the source.
///
/// Function-like macros (`#define FOO(x) …`) are skipped, a trailing line
/// comment is stripped from the value, and a later definition of the same
/// name overwrites an earlier one.
pub fn collect_defines(text: &str) -> IndexMap<String, String> {
    let mut defines = IndexMap::new();

    for line in text.lines() {
        let Some(rest) = line.trim_start().strip_prefix("#define") else {
            continue;
        };
        if !rest.starts_with(|c: char| c.is_whitespace()) {
            continue;
        }
        let rest = rest.trim_start();
        let name_end = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(rest.len());
        if name_end == 0 {
            continue;
        }
        let (name, value) = rest.split_at(name_end);
        if value.starts_with('(') {
            // function-like, not ours to expand
            continue;
        }
        let value = strip_trailing_comment(value).trim();
        if value.is_empty() {
            continue;
        }
        defines.insert(name.to_string(), value.to_string());
    }

    defines
}

/// Substitute defined names throughout `text` until a fixed point.
///
/// An undefined reference is not an error, it simply stays in the text.
pub fn resolve(text: &str) -> String {
    let defines = collect_defines(text);
    let mut current = text.to_string();
    let mut pass = 0;

    loop {
        let mut substituted = 0usize;
        for (name, value) in &defines {
            if EXCLUDED_MACRO_PREFIXES.iter().any(|p| name.starts_with(p)) {
                continue;
            }
            let (next, count) = replace_whole_word(&current, name, value);
            if count > 0 {
                current = next;
                substituted += count;
            }
        }
        pass += 1;
        debug!("macro pass {pass}: {substituted} substitutions");
        if substituted == 0 {
            break;
        }
        if pass >= MACRO_PASS_LIMIT {
            warn!(
                "macros still substituting after {MACRO_PASS_LIMIT} passes, \
                 definitions are probably cyclic"
            );
            break;
        }
    }

    current
}

fn strip_trailing_comment(value: &str) -> &str {
    let end = [value.find("//"), value.find("/*")]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(value.len());
    &value[..end]
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Replace whole-word occurrences of `name` with `value`.
///
/// An occurrence touching an identifier character on either side is left
/// alone, so `NAV` never fires inside `NAVX`.
fn replace_whole_word(text: &str, name: &str, value: &str) -> (String, usize) {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut count = 0;
    let mut i = 0;

    while let Some(pos) = text[i..].find(name) {
        let start = i + pos;
        let end = start + name.len();
        let left_ok = start == 0 || !is_word_byte(bytes[start - 1]);
        let right_ok = end == bytes.len() || !is_word_byte(bytes[end]);
        if left_ok && right_ok {
            out.push_str(&text[i..start]);
            out.push_str(value);
            count += 1;
        } else {
            out.push_str(&text[i..end]);
        }
        i = end;
    }
    out.push_str(&text[i..]);

    (out, count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitutes_define() {
        let src = "#define FOO &kp A\nBAR FOO BAZ";
        let resolved = resolve(src);
        assert!(resolved.contains("BAR &kp A BAZ"), "got: {resolved}");
    }

    #[test]
    fn test_whole_word_boundaries() {
        let src = "#define NAV 1\nNAV NAVX XNAV NAV_X";
        let resolved = resolve(src);
        assert!(resolved.contains("1 NAVX XNAV NAV_X"), "got: {resolved}");
    }

    #[test]
    fn test_excluded_prefix_stays_literal() {
        let src = "#define MAC_SPC &kp LCMD\nrow: MAC_SPC";
        let resolved = resolve(src);
        assert!(resolved.contains("row: MAC_SPC"), "got: {resolved}");
    }

    #[test]
    fn test_transitive_chain() {
        let src = "#define INNER &kp A\n#define OUTER INNER\nuse: OUTER";
        let resolved = resolve(src);
        assert!(resolved.contains("use: &kp A"), "got: {resolved}");
    }

    #[test]
    fn test_idempotent() {
        let src = "#define INNER &kp A\n#define OUTER INNER\nuse: OUTER NAVX";
        let once = resolve(src);
        let twice = resolve(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_value_comment_stripped() {
        let defines = collect_defines("#define SPC &kp SPACE // space bar\n");
        assert_eq!(defines.get("SPC").map(String::as_str), Some("&kp SPACE"));
    }

    #[test]
    fn test_function_like_skipped() {
        let defines = collect_defines("#define WRAP(x) (x)\n#define PLAIN 1\n");
        assert!(!defines.contains_key("WRAP"));
        assert_eq!(defines.get("PLAIN").map(String::as_str), Some("1"));
    }

    #[test]
    fn test_undefined_reference_untouched() {
        let src = "#define FOO 1\nFOO MISSING";
        let resolved = resolve(src);
        assert!(resolved.contains("1 MISSING"), "got: {resolved}");
    }

    #[test]
    fn test_cyclic_definitions_terminate() {
        // A references B and vice versa; the pass cap has to kick in.
        let src = "#define A B\n#define B A\nrow: A B";
        let resolved = resolve(src);
        assert!(resolved.contains("row:"));
    }
}
