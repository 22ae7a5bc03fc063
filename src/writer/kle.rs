//! Emit a keyboard-layout-editor grid from the physical geometry.
//!
//! KLE wants a list of rows, each row alternating a property object and a
//! label string per key. Vertical coordinates in the source geometry are
//! absolute; inside a row they are rebased on the row's first key.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::{Map, Value, json};

use crate::model::{KeyGeometry, KeymapDocument};

pub fn emit(doc: &KeymapDocument, out_dir: &Path) -> Result<()> {
    let rows = build_rows(&doc.layout);
    let path = out_dir.join("keymap_kle.json");
    let json = serde_json::to_string_pretty(&rows)?;
    fs::write(&path, json).with_context(|| format!("Writing {}", path.display()))?;
    Ok(())
}

/// Break the key stream into rows. A new row starts when the vertical
/// coordinate moves by more than half a key unit.
fn build_rows(layout: &[KeyGeometry]) -> Vec<Value> {
    let mut rows: Vec<Value> = Vec::new();
    let mut row: Vec<Value> = Vec::new();
    let mut row_y: Option<f64> = None;

    for key in layout {
        let y = key.y.unwrap_or(0.0);
        match row_y {
            None => row_y = Some(y),
            Some(current) if (y - current).abs() > 0.5 => {
                rows.push(Value::Array(std::mem::take(&mut row)));
                row_y = Some(y);
            }
            Some(_) => {}
        }
        let base = row_y.unwrap_or(0.0);

        let mut props = Map::new();
        if let Some(x) = key.x {
            props.insert("x".into(), json!(x));
        }
        if key.y.is_some() {
            props.insert("y".into(), json!(y - base));
        }
        if let Some(r) = key.r {
            props.insert("r".into(), json!(r));
        }
        if let Some(rx) = key.rx {
            props.insert("rx".into(), json!(rx));
        }
        if let Some(ry) = key.ry {
            props.insert("ry".into(), json!(ry));
        }
        row.push(Value::Object(props));
        row.push(Value::String(key.label.clone().unwrap_or_default()));
    }
    if !row.is_empty() {
        rows.push(Value::Array(row));
    }

    rows
}
