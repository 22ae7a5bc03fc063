use std::fs;

use zmkmap_rust::model::{KeymapDocument, ParsedBinding};
use zmkmap_rust::parser::{load_layout, load_sensors};
use zmkmap_rust::processor;
use zmkmap_rust::processor::remap::PhysicalIndexMap;

fn layer_order(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

#[test]
fn parses_layout_fixture() {
    let json = fs::read_to_string("tests/layout.json").unwrap();
    let layout = load_layout(&json).expect("valid layout");

    assert_eq!(layout.len(), 48);
    assert_eq!(layout[0].label.as_deref(), Some("K0"));
    assert_eq!(layout[47].y, Some(3.0));
}

#[test]
fn processes_fixture_keymap_end_to_end() {
    let keymap_text = fs::read_to_string("tests/eyelash.keymap").unwrap();
    let layout_json = fs::read_to_string("tests/layout.json").unwrap();
    let layout = load_layout(&layout_json).expect("valid layout");

    let order = layer_order(&["Base", "Nav", "Fn"]);
    let map = PhysicalIndexMap::eyelash_corne();
    let keymap = processor::run(&keymap_text, &order, layout.len(), &map);

    // exactly the configured layers, in order
    let keys: Vec<&String> = keymap.keys().collect();
    assert_eq!(keys, ["Base", "Nav", "Fn"]);

    // Base: bindings are P0..P47 in visual order; spot-check the
    // permutation into physical slots
    let base = &keymap["Base"];
    assert_eq!(base.len(), 48);
    assert_eq!(base[0].params, vec!["P0"]); // left top row start
    assert_eq!(base[7].params, vec!["P6"]); // right top row starts past the joystick key
    assert_eq!(base[6].params, vec!["P42"]); // joystick up
    assert_eq!(base[34].params, vec!["P46"]); // joystick press
    assert_eq!(base[35].params, vec!["P47"]); // encoder
    assert_eq!(base[13].params, vec!["P12"]); // home row left
    assert_eq!(base[22].params, vec!["P18"]); // home row right
    assert_eq!(base[47].params, vec!["P41"]); // last thumb

    // Nav: sentinels, a resolved macro, a nested call; the rest padded
    let nav = &keymap["Nav"];
    assert_eq!(nav.len(), 48);
    assert_eq!(nav[0], ParsedBinding::transparent());
    assert_eq!(nav[1], ParsedBinding::none());
    assert_eq!(nav[2].behavior, "kp");
    assert_eq!(nav[2].params, vec!["SPACE"]);
    assert_eq!(nav[3].behavior, "lt");
    assert_eq!(nav[3].params, vec!["NAV_LAYER", "TAB"]);
    assert!(nav[4..].iter().all(|b| *b == ParsedBinding::transparent()));

    // Fn is not in the source at all
    assert!(keymap["Fn"].iter().all(|b| *b == ParsedBinding::transparent()));
}

#[test]
fn writes_both_output_documents() {
    let keymap_text = fs::read_to_string("tests/eyelash.keymap").unwrap();
    let layout_json = fs::read_to_string("tests/layout.json").unwrap();
    let base_json = fs::read_to_string("tests/base.json").unwrap();

    let layout = load_layout(&layout_json).expect("valid layout");
    let sensors = load_sensors(&base_json).expect("valid base");
    let order = layer_order(&["Base", "Nav"]);
    let map = PhysicalIndexMap::eyelash_corne();
    let keymap = processor::run(&keymap_text, &order, layout.len(), &map);

    let doc = KeymapDocument {
        layout,
        layer_order: order,
        keymap,
        sensors,
    };

    let out_dir = std::env::temp_dir().join("zmkmap-pipeline-test");
    fs::create_dir_all(&out_dir).unwrap();
    zmkmap_rust::writer::json::emit(&doc, &out_dir).expect("keymap document written");
    zmkmap_rust::writer::kle::emit(&doc, &out_dir).expect("kle grid written");

    let written = fs::read_to_string(out_dir.join("keymap_data.json")).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(parsed["layer_order"], serde_json::json!(["Base", "Nav"]));
    assert_eq!(parsed["keymap"]["Base"].as_array().unwrap().len(), 48);
    assert_eq!(parsed["keymap"]["Base"][0]["behavior"], "kp");
    assert_eq!(parsed["sensors"][0]["type"], "EC11");
    assert_eq!(parsed["layout"].as_array().unwrap().len(), 48);

    let kle = fs::read_to_string(out_dir.join("keymap_kle.json")).unwrap();
    let kle: serde_json::Value = serde_json::from_str(&kle).unwrap();
    // 48 keys across four geometry rows, props + label per key
    assert_eq!(kle.as_array().unwrap().len(), 4);
    assert_eq!(kle[0].as_array().unwrap().len(), 13 * 2);
    assert_eq!(kle[0][1], "K0");
}
