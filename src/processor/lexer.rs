//! Hand-written scanner that splits a layer's raw binding block into
//! individual binding tokens.
//!
//! Comments are stripped first; after that only three token shapes exist.
//! Everything else in the block (row separators, box-drawing art, stray
//! words) is layout noise and gets discarded.
//
//  Token shapes, tried in this order:
//
//      Invocation ::= '&' Ident [ '(' balanced ')' ] Word*
//      Constant   ::= ("U_" | "CRGB_") [A-Za-z0-9_]*
//      Sentinel   ::= "___" | "XXX"
//
//  Trailing parameter words of an invocation stay on the same line; a
//  token ends at a comma, at end of line, or where the next token begins.

use std::iter::Peekable;
use std::str::Chars;

use crate::model::{BEHAVIOR_MARKER, CONST_PREFIXES, SENTINEL_NONE, SENTINEL_TRANS};

/// Tokenize one raw binding block. Token order equals visual key order.
pub fn scan_bindings(block: &str) -> Vec<String> {
    let clean = strip_comments(block);
    BindingScanner::new(&clean).collect()
}

/// Remove `//` line comments and `/* … */` block comments.
pub fn strip_comments(block: &str) -> String {
    let mut out = String::with_capacity(block.len());
    let mut chars = block.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '/' && chars.peek() == Some(&'/') {
            for c in chars.by_ref() {
                if c == '\n' {
                    out.push('\n');
                    break;
                }
            }
        } else if c == '/' && chars.peek() == Some(&'*') {
            chars.next();
            let mut prev = '\0';
            for c in chars.by_ref() {
                if prev == '*' && c == '/' {
                    break;
                }
                prev = c;
            }
            out.push(' ');
        } else {
            out.push(c);
        }
    }

    out
}

#[derive(Clone)]
pub struct BindingScanner<'a> {
    chars: Peekable<Chars<'a>>,
}

impl<'a> BindingScanner<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            chars: src.chars().peekable(),
        }
    }

    fn next_char(&mut self) -> Option<char> {
        self.chars.next()
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn read_word(&mut self) -> String {
        let mut word = String::new();
        while let Some(c) = self.peek_char() {
            if is_word_char(c) {
                word.push(c);
                self.next_char();
            } else {
                break;
            }
        }
        word
    }

    /// `&ident`, optional `(…)` args, optional same-line bare words.
    fn read_invocation(&mut self) -> Option<String> {
        let mut tok = String::new();
        tok.push(self.next_char().unwrap_or('\0')); // the marker
        let ident = self.read_word();
        if ident.is_empty() {
            return None; // stray marker, not a binding
        }
        tok.push_str(&ident);

        // the argument list may sit behind spaces on the same line
        let mut probe = self.chars.clone();
        while matches!(probe.peek(), Some(&' ') | Some(&'\t')) {
            probe.next();
        }
        if probe.peek() == Some(&'(') {
            self.chars = probe;
            tok.push_str(&self.read_parens());
        }

        // trailing bare parameter words, still on this line
        loop {
            let mut probe = self.chars.clone();
            let mut sep = false;
            while matches!(probe.peek(), Some(&' ') | Some(&'\t')) {
                probe.next();
                sep = true;
            }
            if !sep {
                break;
            }
            let mut word = String::new();
            while let Some(&c) = probe.peek() {
                if is_word_char(c) {
                    word.push(c);
                    probe.next();
                } else {
                    break;
                }
            }
            if word.is_empty() || starts_new_token(&word) {
                break;
            }
            self.chars = probe;
            tok.push(' ');
            tok.push_str(&word);
        }

        Some(tok)
    }

    /// Balanced parenthesized span, nesting tracked, may cross lines.
    fn read_parens(&mut self) -> String {
        let mut out = String::new();
        let mut depth = 0usize;
        while let Some(c) = self.next_char() {
            out.push(c);
            match c {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                _ => {}
            }
        }
        out
    }
}

impl<'a> Iterator for BindingScanner<'a> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            // commas and whitespace separate bindings
            while let Some(c) = self.peek_char() {
                if c == ',' || c.is_whitespace() {
                    self.next_char();
                } else {
                    break;
                }
            }
            match self.peek_char()? {
                c if c == BEHAVIOR_MARKER => {
                    if let Some(tok) = self.read_invocation() {
                        return Some(tok);
                    }
                }
                c if is_word_char(c) => {
                    let word = self.read_word();
                    if starts_new_token(&word) {
                        return Some(word);
                    }
                    // anything else is layout noise, dropped
                }
                _ => {
                    self.next_char();
                }
            }
        }
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Words that are bindings in their own right and therefore end the
/// trailing-parameter run of a preceding invocation.
fn starts_new_token(word: &str) -> bool {
    word == SENTINEL_TRANS
        || word == SENTINEL_NONE
        || CONST_PREFIXES.iter().any(|p| word.starts_with(p))
}
