pub mod cli;
pub mod model;
pub mod parser;
pub mod processor;
pub mod writer;

use anyhow::Context;
use clap::Parser;
use log::info;

use processor::remap::PhysicalIndexMap;

pub fn run() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // 1. ── Parse ──────────────────────────────────────────────────────
    let mut combined = String::new();
    for path in &args.keymaps {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Reading {}", path.display()))?;
        combined.push_str(&text);
        combined.push('\n');
    }

    let layout_json = std::fs::read_to_string(&args.layout)
        .with_context(|| format!("Reading {}", args.layout.display()))?;
    let layout = parser::load_layout(&layout_json).with_context(|| "Parsing layout JSON")?;

    let sensors = match &args.base {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Reading {}", path.display()))?;
            parser::load_sensors(&json).with_context(|| "Parsing base JSON")?
        }
        None => Vec::new(),
    };

    // 2. ── Process ────────────────────────────────────────────────────
    let layer_order: Vec<String> = match args.layers {
        Some(layers) => layers,
        None => model::DEFAULT_LAYER_ORDER.iter().map(|s| s.to_string()).collect(),
    };
    let expected_positions = layout.len();
    info!("layout has {expected_positions} physical keys");

    let index_map = PhysicalIndexMap::eyelash_corne();
    let keymap = processor::run(&combined, &layer_order, expected_positions, &index_map);

    let doc = model::KeymapDocument {
        layout,
        layer_order,
        keymap,
        sensors,
    };

    // 3. ── Write outputs ──────────────────────────────────────────────
    std::fs::create_dir_all(&args.output)
        .with_context(|| format!("Creating {}", args.output.display()))?;

    writer::json::emit(&doc, &args.output).with_context(|| "Writing keymap document")?;
    writer::kle::emit(&doc, &args.output).with_context(|| "Writing KLE grid")?;

    Ok(())
}
