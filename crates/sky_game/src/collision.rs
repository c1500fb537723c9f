//! Box-vs-tile collision against a single screen.
//!
//! Every solid tile whose unit cell could touch the box is tested with a
//! separating-axis check: `surf = |center - tile_center| - (half + 0.5)` per
//! axis. A positive component means the two boxes are apart on that axis.
//!
//! Resolution pushes the box out along one axis per tile (the clip axis).
//! A tile only counts as a real boundary on an axis if its neighbour on the
//! box's side of that axis is open. With no open side the box is embedded in
//! solid geometry and the tile is left alone; with two open sides the
//! shallower penetration wins. Tiles are visited in row-major order and each
//! sees the corrections made by the ones before it, so this is a single-pass
//! approximation, not a contact solver.
//!
//! Boxes are given in world space; `screen_offset` is the world Y of the
//! screen's row 0 (see `Level::screen_vertical_offset`).

use glam::Vec2;
use serde::Deserialize;

use crate::tile::TileGrid;

const TILE_HALF: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub center: Vec2,
    pub half: Vec2,
}

impl Aabb {
    pub fn new(center: Vec2, half: Vec2) -> Self {
        Self { center, half }
    }
}

/// What happens to horizontal velocity pointing into a wall.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum WallResponse {
    Stop,
    Bounce { factor: f32 },
}

/// What happens to vertical velocity when the box is clipped vertically.
/// Vertical contacts never bounce.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum GroundClamp {
    /// Zero only a component pointing into the surface.
    #[default]
    IntoSurface,
    /// Zero the vertical component on any vertical clip.
    Zero,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct CollisionConfig {
    pub wall_response: WallResponse,
    pub ground_clamp: GroundClamp,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            wall_response: WallResponse::Bounce { factor: 0.5 },
            ground_clamp: GroundClamp::IntoSurface,
        }
    }
}

/// Per-call tally of what `resolve` did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveReport {
    pub clipped_x: u32,
    pub clipped_y: u32,
    /// Overlapping tiles with no open side on either axis.
    pub skipped_embedded: u32,
}

impl ResolveReport {
    pub fn any_contact(&self) -> bool {
        self.clipped_x + self.clipped_y + self.skipped_embedded > 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    X,
    Y,
}

/// Separating-axis measurements of one box against one tile, in screen-local space.
#[derive(Debug, Clone, Copy)]
struct TileContact {
    tile_center: Vec2,
    size_sum: Vec2,
    surf: Vec2,
    /// Which side of the tile the box sits on per axis (-1 = left/above).
    side: (i32, i32),
}

impl TileContact {
    fn measure(local_center: Vec2, half: Vec2, x: i32, y: i32) -> Self {
        let tile_center = Vec2::new(x as f32 + TILE_HALF, y as f32 + TILE_HALF);
        let size_sum = half + Vec2::splat(TILE_HALF);
        let delta = local_center - tile_center;
        let surf = delta.abs() - size_sum;
        let side = (side_of(delta.x), side_of(delta.y));
        Self {
            tile_center,
            size_sum,
            surf,
            side,
        }
    }

    fn separated(&self) -> bool {
        self.surf.x > 0.0 || self.surf.y > 0.0
    }
}

fn side_of(delta: f32) -> i32 {
    if delta > 0.0 {
        1
    } else {
        -1
    }
}

/// Inclusive tile range `(x0, x1, y0, y1)` whose cells could touch the box.
fn tile_range(local_center: Vec2, half: Vec2) -> (i32, i32, i32, i32) {
    let min = (local_center - half).floor();
    let max = (local_center + half).floor();
    (min.x as i32, max.x as i32, min.y as i32, max.y as i32)
}

fn to_local(center: Vec2, screen_offset: f32) -> Vec2 {
    Vec2::new(center.x, center.y - screen_offset)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CollisionResolver {
    pub config: CollisionConfig,
}

impl CollisionResolver {
    pub fn new(config: CollisionConfig) -> Self {
        Self { config }
    }

    /// True if the box touches or overlaps any solid tile of `grid`.
    pub fn overlaps_solid(&self, grid: &TileGrid, screen_offset: f32, aabb: Aabb) -> bool {
        let local = to_local(aabb.center, screen_offset);
        let (x0, x1, y0, y1) = tile_range(local, aabb.half);
        for y in y0..=y1 {
            for x in x0..=x1 {
                if !grid.is_solid(x, y) {
                    continue;
                }
                if !TileContact::measure(local, aabb.half, x, y).separated() {
                    return true;
                }
            }
        }
        false
    }

    /// Push `center` out of every solid tile it overlaps and clip `velocity`
    /// on the axis of each correction.
    pub fn resolve(
        &self,
        grid: &TileGrid,
        screen_offset: f32,
        center: &mut Vec2,
        velocity: &mut Vec2,
        half: Vec2,
    ) -> ResolveReport {
        let mut report = ResolveReport::default();
        let (x0, x1, y0, y1) = tile_range(to_local(*center, screen_offset), half);

        for y in y0..=y1 {
            for x in x0..=x1 {
                if !grid.is_solid(x, y) {
                    continue;
                }
                let contact = TileContact::measure(to_local(*center, screen_offset), half, x, y);
                if contact.separated() {
                    continue;
                }

                let (side_x, side_y) = contact.side;
                let open_x = !grid.is_solid(x + side_x, y);
                let open_y = !grid.is_solid(x, y + side_y);
                let axis = match (open_x, open_y) {
                    (false, false) => {
                        report.skipped_embedded += 1;
                        continue;
                    }
                    (true, false) => Axis::X,
                    (false, true) => Axis::Y,
                    (true, true) if contact.surf.x > contact.surf.y => Axis::X,
                    (true, true) => Axis::Y,
                };

                match axis {
                    Axis::X => {
                        let side = side_x as f32;
                        center.x = contact.tile_center.x + side * contact.size_sum.x;
                        velocity.x = self.clip_horizontal(velocity.x, side);
                        report.clipped_x += 1;
                    }
                    Axis::Y => {
                        let side = side_y as f32;
                        center.y = contact.tile_center.y + side * contact.size_sum.y + screen_offset;
                        velocity.y = self.clip_vertical(velocity.y, side);
                        report.clipped_y += 1;
                    }
                }
            }
        }

        if report.any_contact() {
            log::trace!("collision resolve: {report:?}");
        }
        report
    }

    fn clip_horizontal(&self, vx: f32, side: f32) -> f32 {
        if vx * side >= 0.0 {
            return vx;
        }
        match self.config.wall_response {
            WallResponse::Stop => 0.0,
            WallResponse::Bounce { factor } => -vx * factor,
        }
    }

    fn clip_vertical(&self, vy: f32, side: f32) -> f32 {
        match self.config.ground_clamp {
            GroundClamp::IntoSurface if vy * side >= 0.0 => vy,
            _ => 0.0,
        }
    }
}
