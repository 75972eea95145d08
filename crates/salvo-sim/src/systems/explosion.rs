//! Area explosions that take out projectiles in flight.

use glam::DVec2;
use hecs::{Entity, World};

use salvo_core::enums::ExplosionMask;
use salvo_core::types::FactionId;

use crate::weapon::Weapon;

/// Mark every live bolt or munition strictly inside `radius` of `center`
/// destroyed when `mask` covers its category. Weapons belonging to `spare`
/// are left alone. Returns how many weapons were marked.
pub fn run(
    world: &mut World,
    layer: &[Entity],
    center: DVec2,
    radius: f64,
    spare: Option<FactionId>,
    mask: ExplosionMask,
) -> usize {
    let radius_sq = radius * radius;
    let mut marked = 0;

    for &entity in layer {
        let Ok(weapon) = world.query_one_mut::<&mut Weapon>(entity) else {
            continue;
        };
        if weapon.is_destroyed() || !mask.affects(weapon.category()) {
            continue;
        }
        if spare == Some(weapon.faction) {
            continue;
        }
        if weapon.solid.pos.distance_squared(center) < radius_sq {
            weapon.destroy();
            marked += 1;
        }
    }
    marked
}
