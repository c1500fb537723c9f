//! Frame driver: owns all mutable game state and advances it one frame at a time.

use glam::Vec2;
use sky_core::time::clamp_dt;
use sky_core::units::world_to_screen_pixels;

use crate::collision::{CollisionResolver, ResolveReport};
use crate::controller::{FrameInput, Player, PlayerController, PlayerState, StepEvent};
use crate::level::Level;
use crate::tuning::PhysicsTuning;

/// Read-only view of the frame handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSnapshot {
    pub position: Vec2,
    pub position_px: Vec2,
    pub velocity: Vec2,
    pub is_facing_right: bool,
    pub animation_time: f32,
    pub is_on_ground: bool,
    pub state: PlayerState,
    pub active_screen: usize,
}

pub struct Simulation {
    pub level: Level,
    pub player: Player,
    pub controller: PlayerController,
    pub resolver: CollisionResolver,
    pub show_debug: bool,
    pub frame: u64,
    pub last_report: ResolveReport,
    tile_pixels: f32,
}

impl Simulation {
    pub fn new(level: Level, tuning: &PhysicsTuning) -> Self {
        let player = Player::new(level.spawn(), tuning.controller.half_extent());
        Self {
            level,
            player,
            controller: PlayerController::new(tuning.controller),
            resolver: CollisionResolver::new(tuning.collision),
            show_debug: false,
            frame: 0,
            last_report: ResolveReport::default(),
            tile_pixels: tuning.tile_pixels,
        }
    }

    pub fn active_screen_index(&self) -> usize {
        self.level.active_screen_index(self.player.position.y)
    }

    /// Controller first, then collision against whichever screen the
    /// player ended up in. `dt` is clamped here.
    pub fn step(&mut self, input: &FrameInput, dt: f32) -> StepEvent {
        let dt = clamp_dt(dt);
        if input.debug_pressed {
            self.show_debug = !self.show_debug;
            log::info!(
                "Debug text {}",
                if self.show_debug { "enabled" } else { "disabled" }
            );
        }

        let screen_before = self.active_screen_index();
        let event = self.controller.update(
            &mut self.player,
            input,
            dt,
            &self.level,
            &self.resolver,
        );

        let y = self.player.position.y;
        let grid = self.level.active_screen(y);
        let offset = self.level.screen_vertical_offset(y);
        let half = self.player.half_extent;
        self.last_report = self.resolver.resolve(
            grid,
            offset,
            &mut self.player.position,
            &mut self.player.velocity,
            half,
        );
        self.frame += 1;

        match event {
            StepEvent::Launched(velocity) => {
                log::debug!("frame {}: launched with velocity {velocity}", self.frame)
            }
            StepEvent::Landed => log::debug!("frame {}: landed", self.frame),
            StepEvent::None => {}
        }
        let screen_after = self.active_screen_index();
        if screen_after != screen_before {
            log::info!(
                "Entered screen {} (from {}) at y = {:.2}",
                screen_after,
                screen_before,
                self.player.position.y
            );
        }
        event
    }

    pub fn snapshot(&self) -> RenderSnapshot {
        let player = &self.player;
        RenderSnapshot {
            position: player.position,
            position_px: world_to_screen_pixels(player.position, self.tile_pixels),
            velocity: player.velocity,
            is_facing_right: player.is_facing_right,
            animation_time: player.animation_time,
            is_on_ground: player.is_on_ground,
            state: player.state(self.controller.config.moving_threshold),
            active_screen: self.active_screen_index(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::SENTINEL_SCREEN;
    use crate::tile::TileGrid;

    const DT: f32 = 1.0 / 60.0;

    /// Two 8x12 screens. Screen 1 has a full floor (top at world y = -1);
    /// screen 2 has a ledge on its row 8 with a gap in the middle.
    fn two_screen_level(spawn: Vec2) -> Level {
        let mut lower = vec![""; 11];
        lower.push("########");
        let mut upper = vec![""; 8];
        upper.push("##    ##");
        let screens = vec![
            TileGrid::from_rows(8, 12, &lower).expect("valid screen"),
            TileGrid::from_rows(8, 12, &upper).expect("valid screen"),
        ];
        Level::new("test", screens, spawn).expect("valid level")
    }

    #[test]
    fn dropped_player_lands_and_rests_on_floor() {
        let mut sim = Simulation::new(
            two_screen_level(Vec2::new(3.5, -5.0)),
            &PhysicsTuning::default(),
        );
        let mut was_airborne = false;
        for _ in 0..120 {
            sim.step(&FrameInput::default(), DT);
            was_airborne |= !sim.player.is_on_ground;
        }
        assert!(was_airborne);
        assert!(sim.player.is_on_ground);
        assert_eq!(sim.player.velocity.y, 0.0);
        assert!((sim.player.position.y - (-1.0 - 0.4)).abs() < 1e-4);
        assert_eq!(sim.snapshot().state, PlayerState::Idle);
    }

    #[test]
    fn rising_through_screen_boundary_switches_active_screen() {
        let mut sim = Simulation::new(
            two_screen_level(Vec2::new(3.5, -11.8)),
            &PhysicsTuning::default(),
        );
        assert_eq!(sim.active_screen_index(), 1);
        sim.player.velocity = Vec2::new(0.0, -20.0);
        sim.step(&FrameInput::default(), DT);
        assert_eq!(sim.active_screen_index(), 2);
        assert!(sim.player.position.y < -12.0);
        assert!(sim.player.velocity.y < 0.0);
    }

    #[test]
    fn heights_outside_the_level_map_to_sentinel() {
        let mut sim = Simulation::new(
            two_screen_level(Vec2::new(3.5, -30.0)),
            &PhysicsTuning::default(),
        );
        assert_eq!(sim.snapshot().active_screen, SENTINEL_SCREEN);
        sim.step(&FrameInput::default(), DT);
        assert!(!sim.player.is_on_ground);
    }

    #[test]
    fn long_frames_are_clamped() {
        let mut sim = Simulation::new(
            two_screen_level(Vec2::new(3.5, -6.0)),
            &PhysicsTuning::default(),
        );
        sim.step(&FrameInput::default(), 5.0);
        // One 0.1s step: vy = gravity * 0.1, dy = vy * 0.1.
        let gravity = sim.controller.config.gravity;
        assert!((sim.player.velocity.y - gravity * 0.1).abs() < 1e-4);
        assert!((sim.player.position.y - (-6.0 + gravity * 0.01)).abs() < 1e-4);
    }

    #[test]
    fn debug_toggle_flips_on_each_press() {
        let mut sim = Simulation::new(
            two_screen_level(Vec2::new(3.5, -1.4)),
            &PhysicsTuning::default(),
        );
        let press = FrameInput {
            debug_pressed: true,
            ..Default::default()
        };
        sim.step(&press, DT);
        assert!(sim.show_debug);
        sim.step(&FrameInput::default(), DT);
        assert!(sim.show_debug);
        sim.step(&press, DT);
        assert!(!sim.show_debug);
        assert_eq!(sim.frame, 3);
    }

    #[test]
    fn snapshot_reports_pixels() {
        let sim = Simulation::new(
            two_screen_level(Vec2::new(3.5, -1.4)),
            &PhysicsTuning::default(),
        );
        let snap = sim.snapshot();
        assert_eq!(snap.position_px, sim.player.position * PhysicsTuning::default().tile_pixels);
        assert!(snap.is_facing_right);
        assert_eq!(snap.active_screen, 1);
    }
}
