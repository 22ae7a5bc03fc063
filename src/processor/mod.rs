//! The functional core: macro resolution, layer extraction, binding
//! tokenization and classification, and visual→physical remapping.
//!
//! Nothing in here aborts on malformed keymap text; every anomaly
//! degrades to a documented default and a diagnostic.

pub mod binding;
pub mod layers;
pub mod lexer;
pub mod macros;
pub mod remap;

use indexmap::IndexMap;
use log::{debug, info, warn};

use crate::model::ParsedBinding;
use remap::PhysicalIndexMap;

/// Runs every processing pass and returns the per-layer bindings, keyed
/// and ordered exactly by `layer_order`.
pub fn run(
    keymap_text: &str,
    layer_order: &[String],
    expected_positions: usize,
    index_map: &PhysicalIndexMap,
) -> IndexMap<String, Vec<ParsedBinding>> {
    let resolved = macros::resolve(keymap_text);
    let scannable = layers::strip_guard_block(&resolved);

    let mut found: IndexMap<String, Vec<ParsedBinding>> = IndexMap::new();
    for layer in layers::extract_layers(&scannable) {
        let tokens = lexer::scan_bindings(&layer.block);
        debug!("layer {}: {} raw bindings", layer.name, tokens.len());

        let parsed: Vec<ParsedBinding> = tokens.iter().map(|t| binding::parse_binding(t)).collect();
        let remapped = index_map.remap(parsed, expected_positions);

        info!("found layer {}", layer.name);
        if found.insert(layer.name.clone(), remapped).is_some() {
            warn!(
                "layer {} declared more than once, keeping the later declaration",
                layer.name
            );
        }
    }

    // assemble exactly `layer_order`, defaulting and defensively sizing
    let mut keymap = IndexMap::with_capacity(layer_order.len());
    for name in layer_order {
        let mut bindings = match found.shift_remove(name) {
            Some(b) => b,
            None => {
                warn!("layer {name} not found in the keymap source, filling with transparent");
                Vec::new()
            }
        };
        if bindings.len() != expected_positions {
            debug!(
                "layer {name}: sizing {} bindings to {expected_positions}",
                bindings.len()
            );
            bindings.resize_with(expected_positions, ParsedBinding::transparent);
        }
        keymap.insert(name.clone(), bindings);
    }

    for name in found.keys() {
        warn!("layer {name} is not in the configured layer order, dropping");
    }

    keymap
}
