use glam::Vec2;
use serde::Deserialize;
use sky_core::input::{InputState, Key};

use crate::collision::{Aabb, CollisionResolver};
use crate::level::Level;

const LEFT_KEYS: &[Key] = &[Key::Left, Key::A];
const RIGHT_KEYS: &[Key] = &[Key::Right, Key::D];
const JUMP_KEYS: &[Key] = &[Key::Space, Key::Up, Key::W];
const DEBUG_KEYS: &[Key] = &[Key::F3];

/// One frame of player intent, already reduced to booleans.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameInput {
    pub left: bool,
    pub right: bool,
    pub left_pressed: bool,
    pub right_pressed: bool,
    pub jump_held: bool,
    pub jump_pressed: bool,
    pub jump_released: bool,
    pub debug_pressed: bool,
}

impl FrameInput {
    pub fn from_state(input: &InputState) -> Self {
        Self {
            left: input.any_held(LEFT_KEYS),
            right: input.any_held(RIGHT_KEYS),
            left_pressed: input.any_just_pressed(LEFT_KEYS),
            right_pressed: input.any_just_pressed(RIGHT_KEYS),
            jump_held: input.any_held(JUMP_KEYS),
            jump_pressed: input.any_just_pressed(JUMP_KEYS),
            jump_released: input.any_just_released(JUMP_KEYS),
            debug_pressed: input.any_just_pressed(DEBUG_KEYS),
        }
    }

    /// -1, 0 or 1. Opposite directions cancel.
    pub fn horizontal(&self) -> f32 {
        (self.right as i32 - self.left as i32) as f32
    }
}

/// Movement tuning in tile units and seconds. World +Y is down.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct ControllerConfig {
    pub gravity: f32,
    /// Ground friction is exponential damping: `vx /= 1 + dt * ground_friction`.
    /// Large values approach an instant stop.
    pub ground_friction: f32,
    pub walk_accel: f32,
    pub max_speed: f32,
    /// Jump strength gained per second of charging.
    pub charge_rate: f32,
    pub min_jump_strength: f32,
    pub max_jump_strength: f32,
    pub jump_power: f32,
    /// Horizontal launch bias at unit strength; divided by the actual strength.
    pub jump_steer: f32,
    pub half_width: f32,
    pub half_height: f32,
    pub probe_half_width: f32,
    pub probe_half_height: f32,
    /// Horizontal speed above which a grounded player counts as walking.
    pub moving_threshold: f32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            gravity: 40.0,
            ground_friction: 12.0,
            walk_accel: 40.0,
            max_speed: 25.0,
            charge_rate: 4.0,
            min_jump_strength: 1.0,
            max_jump_strength: 4.0,
            jump_power: 10.0,
            jump_steer: 0.6,
            half_width: 0.3,
            half_height: 0.4,
            probe_half_width: 0.25,
            probe_half_height: 0.05,
            moving_threshold: 0.05,
        }
    }
}

impl ControllerConfig {
    pub fn half_extent(&self) -> Vec2 {
        Vec2::new(self.half_width, self.half_height)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.half_width <= 0.0 || self.half_height <= 0.0 {
            return Err("Controller validation failed: player half-extent must be > 0".to_string());
        }
        if self.probe_half_width <= 0.0 || self.probe_half_height <= 0.0 {
            return Err("Controller validation failed: probe half-extent must be > 0".to_string());
        }
        if self.min_jump_strength <= 0.0 || self.max_jump_strength < self.min_jump_strength {
            return Err(
                "Controller validation failed: need 0 < min_jump_strength <= max_jump_strength"
                    .to_string(),
            );
        }
        if self.max_speed <= 0.0 {
            return Err("Controller validation failed: max_speed must be > 0".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    Idle,
    Walking,
    Charging,
    Airborne,
}

impl PlayerState {
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Walking => "walking",
            Self::Charging => "charging",
            Self::Airborne => "airborne",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Player {
    pub position: Vec2,
    pub velocity: Vec2,
    pub half_extent: Vec2,
    /// Seconds jump has been held while grounded.
    pub jump_hold_time: f32,
    /// Result of this frame's ground probe.
    pub is_on_ground: bool,
    pub is_facing_right: bool,
    pub animation_time: f32,
}

impl Player {
    pub fn new(position: Vec2, half_extent: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            half_extent,
            jump_hold_time: 0.0,
            is_on_ground: false,
            is_facing_right: true,
            animation_time: 0.0,
        }
    }

    pub fn state(&self, moving_threshold: f32) -> PlayerState {
        if !self.is_on_ground {
            PlayerState::Airborne
        } else if self.jump_hold_time > 0.0 {
            PlayerState::Charging
        } else if self.velocity.x.abs() > moving_threshold {
            PlayerState::Walking
        } else {
            PlayerState::Idle
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepEvent {
    None,
    Launched(Vec2),
    Landed,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PlayerController {
    pub config: ControllerConfig,
}

impl PlayerController {
    pub fn new(config: ControllerConfig) -> Self {
        Self { config }
    }

    /// Advance velocity and position by `dt`. Collision correction of the
    /// new position is the caller's job and must run right after this.
    pub fn update(
        &self,
        player: &mut Player,
        input: &FrameInput,
        dt: f32,
        level: &Level,
        resolver: &CollisionResolver,
    ) -> StepEvent {
        let cfg = &self.config;
        let was_on_ground = player.is_on_ground;
        let mut event = StepEvent::None;

        player.velocity.y += cfg.gravity * dt;
        player.is_on_ground = self.probe_ground(player, level, resolver);

        if player.is_on_ground {
            player.velocity.x /= 1.0 + dt * cfg.ground_friction;

            if input.jump_released {
                let velocity = self.launch_velocity(player.jump_hold_time, input.horizontal());
                player.velocity = velocity;
                event = StepEvent::Launched(velocity);
            }

            if input.jump_pressed {
                // Crouch pose starts from its first frame.
                player.animation_time = 0.0;
            }
            if input.jump_held {
                player.jump_hold_time += dt;
            } else {
                player.jump_hold_time = 0.0;
                self.walk(player, input, dt);
            }

            if player.jump_hold_time == 0.0 && player.velocity.x.abs() > cfg.moving_threshold {
                player.animation_time += dt;
            }
            if !was_on_ground && event == StepEvent::None {
                event = StepEvent::Landed;
            }
        } else {
            player.jump_hold_time = 0.0;
        }

        player.velocity = player.velocity.clamp_length_max(cfg.max_speed);
        player.position += player.velocity * dt;
        event
    }

    /// Thin box just under the feet, narrower than the body so walls
    /// beside the player do not read as ground.
    pub fn ground_probe(&self, player: &Player) -> Aabb {
        Aabb::new(
            Vec2::new(player.position.x, player.position.y + player.half_extent.y),
            Vec2::new(self.config.probe_half_width, self.config.probe_half_height),
        )
    }

    fn probe_ground(&self, player: &Player, level: &Level, resolver: &CollisionResolver) -> bool {
        let probe = self.ground_probe(player);
        let grid = level.active_screen(probe.center.y);
        let offset = level.screen_vertical_offset(probe.center.y);
        resolver.overlaps_solid(grid, offset, probe)
    }

    /// Launch velocity for a jump charged for `hold_time` seconds. Bigger
    /// charges leave less room for horizontal steering.
    pub fn launch_velocity(&self, hold_time: f32, horizontal: f32) -> Vec2 {
        let cfg = &self.config;
        let strength =
            (hold_time * cfg.charge_rate).clamp(cfg.min_jump_strength, cfg.max_jump_strength) / 2.0;
        let bias = horizontal * cfg.jump_steer / strength;
        Vec2::new(bias, -1.0).normalize() * strength * cfg.jump_power
    }

    fn walk(&self, player: &mut Player, input: &FrameInput, dt: f32) {
        let accel = self.config.walk_accel * dt;
        if input.left {
            player.velocity.x -= accel;
        }
        if input.right {
            player.velocity.x += accel;
        }

        if input.left_pressed {
            player.is_facing_right = false;
            player.animation_time = 0.0;
        }
        if input.right_pressed {
            player.is_facing_right = true;
            player.animation_time = 0.0;
        }
        match (input.left, input.right) {
            (true, false) => player.is_facing_right = false,
            (false, true) => player.is_facing_right = true,
            _ => {}
        }
    }
}
