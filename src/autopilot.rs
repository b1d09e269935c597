//! Idle/demo mode - AI flies the player plane
//!
//! Lines the player's shots up with the closest visible enemy ahead and fires
//! while aligned. Produces the same intents a keyboard would.

use crate::sim::{Entity, Intent, Level, Sprite};

/// Vertical slack, in pixels, before the autopilot corrects course
const ALIGN_TOLERANCE: f32 = 12.0;

/// Intents for the next tick; empty unless the level is running
pub fn plan(level: &Level) -> Vec<Intent> {
    if !level.is_active() {
        return Vec::new();
    }
    let Some(player) = level.player().filter(|p| !p.is_destroyed()) else {
        return Vec::new();
    };

    let screen = level.screen();
    let target = level
        .registry()
        .enemies()
        .iter()
        .filter(|e| !e.is_destroyed() && e.bounds().is_on_screen(screen))
        .filter(|e| e.center().x > player.center().x)
        .min_by(|a, b| a.position().x.total_cmp(&b.position().x));

    let Some(target) = target else {
        return vec![Intent::StopVertical, Intent::StopHorizontal];
    };

    let error = target.center().y - shot_line(player);
    let mut intents = vec![Intent::StopHorizontal];
    if error > ALIGN_TOLERANCE {
        intents.push(Intent::MoveDown);
    } else if error < -ALIGN_TOLERANCE {
        intents.push(Intent::MoveUp);
    } else {
        intents.push(Intent::StopVertical);
        intents.push(Intent::Fire);
    }
    intents
}

/// Height at which the player's shots travel
fn shot_line(player: &Entity) -> f32 {
    let muzzle = player.muzzle().unwrap_or_else(|| player.position());
    muzzle.y + Sprite::PlayerShot.size().y * 0.5
}
