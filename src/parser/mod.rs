use anyhow::{Result, anyhow};
use serde_json::Value;

use crate::model::KeyGeometry;

/// Pull the physical key list out of the layout-geometry document.
///
/// The document is expected to carry `layouts.default_layout.layout`, an
/// array with one entry per physical key; its length defines how many
/// positions every layer must fill. A missing path or a non-array is a
/// hard error, there is no meaningful default for the geometry.
pub fn load_layout(json: &str) -> Result<Vec<KeyGeometry>> {
    let root: Value = serde_json::from_str(json)?;

    let layout = root
        .get("layouts")
        .and_then(|v| v.get("default_layout"))
        .and_then(|v| v.get("layout"))
        .and_then(|v| v.as_array())
        .ok_or_else(|| anyhow!("file has no `layouts.default_layout.layout` array"))?;

    let mut keys = Vec::with_capacity(layout.len());
    for (i, key) in layout.iter().enumerate() {
        let key: KeyGeometry = serde_json::from_value(key.clone())
            .map_err(|e| anyhow!("layout key {i} is malformed: {e}"))?;
        keys.push(key);
    }

    Ok(keys)
}

/// Sensor metadata from the base config document, passed through
/// unchanged. An absent `sensors` key simply means none.
pub fn load_sensors(json: &str) -> Result<Vec<Value>> {
    let root: Value = serde_json::from_str(json)?;
    Ok(root
        .get("sensors")
        .and_then(|v| v.as_array())
        .cloned()
        .unwrap_or_default())
}
