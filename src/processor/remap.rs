//! Visual-order to physical-slot permutation.
//!
//! The order bindings are written in the keymap source follows the
//! author's column groups per hand; downstream geometry numbers keys row
//! by row instead. The correspondence is a fixed, hand-authored
//! permutation applied here with explicit fallbacks, so a bad index
//! degrades one binding instead of aborting the layer.

use std::collections::HashMap;

use log::warn;

use crate::model::ParsedBinding;

/// Fixed visual→physical permutation applied to each layer.
///
/// Injectivity is checked once at construction; remapping itself cannot
/// fail.
#[derive(Debug, Clone)]
pub struct PhysicalIndexMap {
    map: HashMap<usize, usize>,
}

impl PhysicalIndexMap {
    /// Build a map from `(visual, physical)` pairs. A duplicated visual
    /// index or a duplicated physical target is rejected.
    pub fn new(pairs: &[(usize, usize)]) -> Result<Self, String> {
        let mut map = HashMap::with_capacity(pairs.len());
        let mut targets = HashMap::with_capacity(pairs.len());

        for &(visual, physical) in pairs {
            if map.insert(visual, physical).is_some() {
                return Err(format!("visual index {visual} mapped twice"));
            }
            if let Some(prev) = targets.insert(physical, visual) {
                return Err(format!(
                    "physical index {physical} targeted by both visual {prev} and {visual}"
                ));
            }
        }

        Ok(Self { map })
    }

    /// Permutation for the 48-key eyelash Corne.
    ///
    /// Visual order walks the keymap source: six-key row groups per hand
    /// (left groups written pinky-first), then thumbs, then the joystick
    /// cluster and the rotary encoder. Physical numbering walks the
    /// geometry row by row:
    ///
    /// ```text
    /// ╭────────────────────────╮             ╭────╮      ╭─────────────────────────╮
    /// │  0   1   2   3   4   5 │         ╭───╯  6 ╰───╮  │   7   8   9  10  11  12 │
    /// │ 13  14  15  16  17  18 │ ╭────╮  │ 19  20  21 │  │  22  23  24  25  26  27 │
    /// │ 28  29  30  31  32  33 │ │ 34 │  ╰───╮ 35 ╭───╯  │  36  37  38  39  40  41 │
    /// ╰───────────╮ 42  43  44 │ ╰────╯      ╰────╯      │  45  46  47 ╭───────────╯
    ///             ╰────────────╯                         ╰─────────────╯
    /// ```
    pub fn eyelash_corne() -> Self {
        #[rustfmt::skip]
        const PAIRS: &[(usize, usize)] = &[
            // top row, left then right
            (0, 0), (1, 1), (2, 2), (3, 3), (4, 4), (5, 5),
            (6, 7), (7, 8), (8, 9), (9, 10), (10, 11), (11, 12),
            // home row
            (12, 13), (13, 14), (14, 15), (15, 16), (16, 17), (17, 18),
            (18, 22), (19, 23), (20, 24), (21, 25), (22, 26), (23, 27),
            // bottom row
            (24, 28), (25, 29), (26, 30), (27, 31), (28, 32), (29, 33),
            (30, 36), (31, 37), (32, 38), (33, 39), (34, 40), (35, 41),
            // thumbs
            (36, 42), (37, 43), (38, 44),
            (39, 45), (40, 46), (41, 47),
            // joystick cluster
            (42, 6), (43, 19), (44, 20), (45, 21), (46, 34),
            // rotary encoder
            (47, 35),
        ];
        Self::new(PAIRS).expect("eyelash corne table is a valid permutation")
    }

    pub fn get(&self, visual: usize) -> Option<usize> {
        self.map.get(&visual).copied()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Remap a layer's bindings from visual order into physical slots.
    ///
    /// Fallbacks, none of them fatal: an out-of-range target drops the
    /// binding, an unmapped visual index passes through to the same slot
    /// number, and a slot that is already occupied keeps its first
    /// occupant. Unfilled slots come back transparent, so the result is
    /// always exactly `expected` long.
    pub fn remap(&self, bindings: Vec<ParsedBinding>, expected: usize) -> Vec<ParsedBinding> {
        let mut slots: Vec<Option<ParsedBinding>> = vec![None; expected];

        for (visual, binding) in bindings.into_iter().enumerate() {
            let slot = match self.get(visual) {
                Some(physical) if physical < expected => physical,
                Some(physical) => {
                    warn!(
                        "physical index {physical} for visual index {visual} is out of \
                         range (expected < {expected}), dropping {:?}",
                        binding.original
                    );
                    continue;
                }
                None if visual < expected => {
                    warn!("visual index {visual} has no physical mapping, passing through");
                    visual
                }
                None => {
                    warn!(
                        "visual index {visual} has no physical mapping and is out of \
                         range, dropping {:?}",
                        binding.original
                    );
                    continue;
                }
            };
            match &slots[slot] {
                Some(occupant) => warn!(
                    "slot {slot} already holds {:?}, dropping colliding {:?} from visual \
                     index {visual}",
                    occupant.original, binding.original
                ),
                None => slots[slot] = Some(binding),
            }
        }

        slots
            .into_iter()
            .map(|s| s.unwrap_or_else(ParsedBinding::transparent))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::binding::parse_binding;

    fn kp(key: &str) -> ParsedBinding {
        parse_binding(&format!("&kp {key}"))
    }

    #[test]
    fn test_remap_with_passthrough_collision() {
        // visual 0 → slot 2, visual 1 → slot 0, visual 2 unmapped.
        // The pass-through of visual 2 lands on the occupied slot 2 and
        // loses: first occupant wins.
        let map = PhysicalIndexMap::new(&[(0, 2), (1, 0)]).expect("valid map");
        let bindings = vec![kp("A"), kp("B"), parse_binding("___")];

        let remapped = map.remap(bindings, 5);

        assert_eq!(remapped.len(), 5);
        assert_eq!(remapped[0], kp("B"));
        assert_eq!(remapped[1], ParsedBinding::transparent());
        assert_eq!(remapped[2], kp("A"));
        assert_eq!(remapped[3], ParsedBinding::transparent());
        assert_eq!(remapped[4], ParsedBinding::transparent());
    }

    #[test]
    fn test_remap_length_is_always_expected() {
        let map = PhysicalIndexMap::new(&[(0, 0), (1, 1)]).expect("valid map");
        for n in [0usize, 1, 2, 7] {
            let bindings = (0..n).map(|i| kp(&format!("K{i}"))).collect();
            assert_eq!(map.remap(bindings, 4).len(), 4, "{n} inputs");
        }
    }

    #[test]
    fn test_out_of_range_target_dropped() {
        let map = PhysicalIndexMap::new(&[(0, 9)]).expect("valid map");
        let remapped = map.remap(vec![kp("A")], 5);
        assert!(remapped.iter().all(|b| *b == ParsedBinding::transparent()));
    }

    #[test]
    fn test_unmapped_out_of_range_dropped() {
        let map = PhysicalIndexMap::new(&[]).expect("valid map");
        let remapped = map.remap(vec![kp("A"), kp("B"), kp("C")], 2);
        assert_eq!(remapped, vec![kp("A"), kp("B")]);
    }

    #[test]
    fn test_construction_rejects_duplicates() {
        assert!(PhysicalIndexMap::new(&[(0, 1), (0, 2)]).is_err());
        assert!(PhysicalIndexMap::new(&[(0, 1), (2, 1)]).is_err());
    }

    #[test]
    fn test_eyelash_corne_is_a_permutation() {
        let map = PhysicalIndexMap::eyelash_corne();
        assert_eq!(map.len(), 48);

        // every physical slot 0..48 is hit exactly once
        let mut seen = vec![false; 48];
        for visual in 0..48 {
            let physical = map.get(visual).expect("total over 0..48");
            assert!(physical < 48);
            assert!(!seen[physical], "slot {physical} hit twice");
            seen[physical] = true;
        }
    }

    #[test]
    fn test_eyelash_corne_spot_checks() {
        let map = PhysicalIndexMap::eyelash_corne();
        // right-hand top row starts one past the joystick key
        assert_eq!(map.get(6), Some(7));
        // joystick cluster interleaves into the upper rows
        assert_eq!(map.get(42), Some(6));
        assert_eq!(map.get(46), Some(34));
        // encoder is the last visual entry
        assert_eq!(map.get(47), Some(35));
    }
}
