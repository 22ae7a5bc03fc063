//! Emit the structured keymap document.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::model::KeymapDocument;

pub fn emit(doc: &KeymapDocument, out_dir: &Path) -> Result<()> {
    let path = out_dir.join("keymap_data.json");
    let json = serde_json::to_string_pretty(doc)?;
    fs::write(&path, json).with_context(|| format!("Writing {}", path.display()))?;
    Ok(())
}
