//! Text lines for the debug overlay. Drawing them is the renderer's business.

use crate::sim::Simulation;

pub fn debug_lines(sim: &Simulation, smoothed_fps: f64) -> Vec<String> {
    let snap = sim.snapshot();
    let player = &sim.player;
    let report = &sim.last_report;
    vec![
        format!("frame {}  fps {:.0}", sim.frame, smoothed_fps),
        format!(
            "pos ({:.2}, {:.2})  vel ({:.2}, {:.2})",
            snap.position.x, snap.position.y, snap.velocity.x, snap.velocity.y
        ),
        format!(
            "screen {}/{}  offset {:.0}",
            snap.active_screen,
            sim.level.screen_count() - 1,
            sim.level.screen_vertical_offset(snap.position.y)
        ),
        format!(
            "state {}  ground {}  facing {}",
            snap.state.label(),
            snap.is_on_ground,
            if snap.is_facing_right { "right" } else { "left" }
        ),
        format!(
            "charge {:.2}s  anim {:.2}s",
            player.jump_hold_time, snap.animation_time
        ),
        format!(
            "contacts x{} y{} embedded {}",
            report.clipped_x, report.clipped_y, report.skipped_embedded
        ),
    ]
}
