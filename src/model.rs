// static configuration tables for the keymap pipeline
pub const SENTINEL_TRANS: &str = "___";
pub const SENTINEL_NONE: &str = "XXX";
pub const BEHAVIOR_MARKER: char = '&';

/// Constant-style token families recognized as standalone bindings.
pub const CONST_PREFIXES: &[&str] = &["U_", "CRGB_"];

/// Macro names carrying one of these prefixes are never substituted.
pub const EXCLUDED_MACRO_PREFIXES: &[&str] = &["MAC_"];
pub const MACRO_PASS_LIMIT: usize = 10;

/// The two construct names that declare a layer.
pub const LAYER_CONSTRUCTS: &[&str] = &["ZMK_BASE_LAYER", "ZMK_LAYER"];

/// `#ifndef` guard whose block holds fallback definitions of the layer
/// construct itself; it is excised before layer extraction.
pub const GUARD_MACRO: &str = "ZMK_BASE_LAYER";

pub const DEFAULT_LAYER_ORDER: &[&str] = &[
    "Base", "Nav", "Fn", "Num", "Sys", "Mouse", "Numsym", "Buttons",
];

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One key binding after tokenizing and classification.
///
/// `behavior` is the invocation name with the leading marker stripped;
/// `params` keeps the argument order of the source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedBinding {
    pub original: String,
    pub behavior: String,
    pub params: Vec<String>,
}

impl ParsedBinding {
    /// The "defer to the layer below" sentinel.
    pub fn transparent() -> Self {
        Self {
            original: SENTINEL_TRANS.into(),
            behavior: "trans".into(),
            params: Vec::new(),
        }
    }

    /// The "no action" sentinel.
    pub fn none() -> Self {
        Self {
            original: SENTINEL_NONE.into(),
            behavior: "none".into(),
            params: Vec::new(),
        }
    }
}

/// A layer declaration as found in the source: canonicalized name plus the
/// raw binding block between the construct's parentheses.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub name: String,
    pub block: String,
}

/// One physical key from the layout-geometry document.
///
/// Only the fields the writers look at are typed; everything else rides
/// along in `rest` and is written back out unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyGeometry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rx: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ry: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(flatten)]
    pub rest: serde_json::Value,
}

/// Fully processed output handed to `writer`.
#[derive(Debug, Serialize)]
pub struct KeymapDocument {
    pub layout: Vec<KeyGeometry>,
    pub layer_order: Vec<String>,
    pub keymap: IndexMap<String, Vec<ParsedBinding>>,
    pub sensors: Vec<serde_json::Value>,
}
