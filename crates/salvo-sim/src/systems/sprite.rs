//! Sprite-sheet frame selection and decorative spin.

use std::f64::consts::TAU;

use hecs::{Entity, World};

use salvo_core::outfit::SpriteSheet;
use salvo_core::types::normalize_angle;

use crate::weapon::{SpriteFrame, Weapon};

/// Pick the sheet cell whose angular shard contains `dir`.
///
/// The sheet holds `cols × rows` evenly spaced headings laid out row-major,
/// with cell 0 centred on heading 0.
pub fn frame_for(dir: f64, sheet: &SpriteSheet) -> SpriteFrame {
    let cols = sheet.cols.max(1);
    let cells = cols * sheet.rows.max(1);
    let shard = TAU / f64::from(cells);
    let cell = ((normalize_angle(dir) + shard / 2.0) / shard) as u32 % cells;
    SpriteFrame {
        col: cell % cols,
        row: cell / cols,
    }
}

/// Refresh frame and spin for every live weapon in `layer`.
pub fn run(world: &mut World, layer: &[Entity], dt: f64) {
    for &entity in layer {
        let Ok(weapon) = world.query_one_mut::<&mut Weapon>(entity) else {
            continue;
        };
        if weapon.is_destroyed() {
            continue;
        }
        let effects = &weapon.outfit.effects;
        weapon.sprite = frame_for(weapon.solid.dir, &effects.sprite);
        if effects.spin != 0.0 {
            weapon.spin = (weapon.spin + effects.spin * dt).rem_euclid(TAU);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_single_cell_sheet() {
        let sheet = SpriteSheet::default();
        assert_eq!(frame_for(2.0, &sheet), SpriteFrame { col: 0, row: 0 });
    }

    #[test]
    fn test_frames_follow_heading() {
        let sheet = SpriteSheet { cols: 4, rows: 2 };
        // Eight shards of 45°.
        assert_eq!(frame_for(0.0, &sheet), SpriteFrame { col: 0, row: 0 });
        assert_eq!(frame_for(PI / 4.0, &sheet), SpriteFrame { col: 1, row: 0 });
        assert_eq!(frame_for(PI, &sheet), SpriteFrame { col: 0, row: 1 });
        assert_eq!(frame_for(7.0 * PI / 4.0, &sheet), SpriteFrame { col: 3, row: 1 });
    }

    #[test]
    fn test_heading_near_full_turn_wraps_to_first_cell() {
        let sheet = SpriteSheet { cols: 4, rows: 2 };
        assert_eq!(frame_for(TAU - 0.01, &sheet), SpriteFrame { col: 0, row: 0 });
    }
}
