//! Vertically stacked screens.
//!
//! World +Y points down and one world unit is one tile. Screens are authored
//! bottom to top: array index 1 is the lowest playable screen, higher indices
//! sit above it, and index 0 is a reserved empty sentinel that stands in for
//! anything outside the authored range. The active screen is never stored;
//! it is recomputed from the player's height whenever it is needed.

use glam::Vec2;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::tile::TileGrid;

pub const SENTINEL_SCREEN: usize = 0;

#[derive(Debug, Deserialize, Clone)]
pub struct LevelFile {
    pub version: String,
    pub level_id: String,
    pub width: i32,
    pub height: i32,
    pub spawn: SpawnPoint,
    /// Playable screens, lowest first. Each screen is a list of rows, top row first.
    pub screens: Vec<Vec<String>>,
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct SpawnPoint {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone)]
pub struct Level {
    pub version: String,
    pub level_id: String,
    width: i32,
    height: i32,
    spawn: Vec2,
    screens: Vec<TileGrid>,
}

impl Level {
    /// `screens` are the playable screens, lowest first. The sentinel is added here.
    pub fn new(level_id: &str, screens: Vec<TileGrid>, spawn: Vec2) -> Result<Self, String> {
        let Some(first) = screens.first() else {
            return Err("Level validation failed: no screens".to_string());
        };
        let (width, height) = (first.width(), first.height());
        for (i, screen) in screens.iter().enumerate() {
            if screen.width() != width || screen.height() != height {
                return Err(format!(
                    "Level validation failed: screen {} is {}x{}, expected {width}x{height}",
                    i + 1,
                    screen.width(),
                    screen.height()
                ));
            }
        }
        if !spawn.is_finite() {
            return Err("Level validation failed: spawn point is not finite".to_string());
        }

        let mut all = Vec::with_capacity(screens.len() + 1);
        all.push(TileGrid::empty(width, height));
        all.extend(screens);
        Ok(Self {
            version: String::new(),
            level_id: level_id.to_string(),
            width,
            height,
            spawn,
            screens: all,
        })
    }

    pub fn from_file(file: LevelFile) -> Result<Self, String> {
        let mut screens = Vec::with_capacity(file.screens.len());
        for (i, rows) in file.screens.iter().enumerate() {
            let grid = TileGrid::from_rows(file.width, file.height, rows)
                .map_err(|e| format!("screen {}: {e}", i + 1))?;
            if grid.solid_count() == 0 {
                log::warn!(
                    "Level '{}' screen {} has no solid tiles. This is allowed but often accidental.",
                    file.level_id,
                    i + 1
                );
            }
            screens.push(grid);
        }
        let mut level = Self::new(
            &file.level_id,
            screens,
            Vec2::new(file.spawn.x, file.spawn.y),
        )?;
        level.version = file.version;
        Ok(level)
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn spawn(&self) -> Vec2 {
        self.spawn
    }

    /// Number of entries including the sentinel.
    pub fn screen_count(&self) -> usize {
        self.screens.len()
    }

    #[cfg(test)]
    pub fn screen(&self, index: usize) -> Option<&TileGrid> {
        self.screens.get(index)
    }

    /// How many whole screens above the world origin `y_world` lies.
    pub fn screen_height_index(&self, y_world: f32) -> i32 {
        (-y_world / self.height as f32).floor() as i32
    }

    /// Index into the screen list for the screen containing `y_world`,
    /// or the sentinel when the height is outside the authored range.
    pub fn active_screen_index(&self, y_world: f32) -> usize {
        let index = self.screen_height_index(y_world) + 1;
        if index >= 1 && (index as usize) < self.screens.len() {
            index as usize
        } else {
            SENTINEL_SCREEN
        }
    }

    /// World Y of row 0 of the screen containing `y_world`.
    pub fn screen_vertical_offset(&self, y_world: f32) -> f32 {
        -((self.screen_height_index(y_world) + 1) * self.height) as f32
    }

    pub fn active_screen(&self, y_world: f32) -> &TileGrid {
        &self.screens[self.active_screen_index(y_world)]
    }
}

pub fn load_level_from_path(path: &Path) -> Result<Level, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let file: LevelFile = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse level JSON {}: {e}", path.display()))?;
    Level::from_file(file).map_err(|e| format!("{}: {e}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "sky_level_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    fn three_screen_level() -> Level {
        let screens = (0..3)
            .map(|_| TileGrid::from_rows(4, 10, &["####"]).expect("valid screen"))
            .collect();
        Level::new("test", screens, Vec2::new(1.5, -2.0)).expect("valid level")
    }

    #[test]
    fn sentinel_is_prepended() {
        let level = three_screen_level();
        assert_eq!(level.screen_count(), 4);
        assert_eq!(level.screen(SENTINEL_SCREEN).map(|s| s.solid_count()), Some(0));
        assert_eq!(level.screen(1).map(|s| s.solid_count()), Some(4));
    }

    #[test]
    fn lowest_screen_spans_first_band_above_origin() {
        let level = three_screen_level();
        assert_eq!(level.active_screen_index(-0.5), 1);
        assert_eq!(level.active_screen_index(-9.99), 1);
        assert_eq!(level.active_screen_index(0.0), 1);
        assert_eq!(level.screen_vertical_offset(-0.5), -10.0);
        assert_eq!(level.active_screen_index(-10.0), 2);
        assert_eq!(level.screen_vertical_offset(-10.0), -20.0);
    }

    #[test]
    fn rising_one_screen_height_advances_index_by_one() {
        let level = three_screen_level();
        for &y in &[-0.25_f32, -3.0, -7.5, -12.0] {
            let below = level.screen_height_index(y);
            let above = level.screen_height_index(y - level.height() as f32);
            assert_eq!(above, below + 1);
            let offset_step =
                level.screen_vertical_offset(y) - level.screen_vertical_offset(y - 10.0);
            assert_eq!(offset_step, 10.0);
        }
    }

    #[test]
    fn offset_is_monotonic_and_local_y_stays_in_screen() {
        let level = three_screen_level();
        let mut previous = level.screen_vertical_offset(0.0);
        let mut y = 0.0_f32;
        while y > -30.0 {
            let offset = level.screen_vertical_offset(y);
            assert!(offset <= previous);
            let local = y - offset;
            assert!(local > 0.0 && local <= 10.0, "local y {local} at world {y}");
            previous = offset;
            y -= 0.25;
        }
    }

    #[test]
    fn heights_outside_authored_range_fall_back_to_sentinel() {
        let level = three_screen_level();
        assert_eq!(level.active_screen_index(-30.5), SENTINEL_SCREEN);
        assert_eq!(level.active_screen_index(-500.0), SENTINEL_SCREEN);
        assert_eq!(level.active_screen_index(3.0), SENTINEL_SCREEN);
        assert_eq!(level.active_screen(3.0).solid_count(), 0);
    }

    #[test]
    fn new_rejects_mismatched_screen_sizes() {
        let screens = vec![TileGrid::empty(4, 10), TileGrid::empty(5, 10)];
        let err = Level::new("bad", screens, Vec2::ZERO).expect_err("size mismatch");
        assert!(err.contains("screen 2"));
        assert!(Level::new("bad", Vec::new(), Vec2::ZERO).is_err());
    }

    #[test]
    fn load_level_valid_file_parses() {
        let path = temp_file_path("valid");
        fs::write(
            &path,
            r#####"{
              "version":"0.1",
              "level_id":"test",
              "width":4,
              "height":3,
              "spawn":{"x":1.5,"y":-1.5},
              "screens":[
                ["", "", "####"],
                ["#  #"]
              ]
            }"#####,
        )
        .expect("write temp file");

        let level = load_level_from_path(&path).expect("valid level should load");
        assert_eq!(level.screen_count(), 3);
        assert_eq!(level.spawn(), Vec2::new(1.5, -1.5));
        assert_eq!(level.version, "0.1");
        assert!(level.active_screen(-1.5).is_solid(1, 2));
        assert!(level.active_screen(-3.5).is_solid(0, 0));
        assert!(!level.active_screen(-3.5).is_solid(1, 0));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn load_level_reports_bad_screen() {
        let path = temp_file_path("bad_row");
        fs::write(
            &path,
            r#####"{
              "version":"0.1",
              "level_id":"test",
              "width":2,
              "height":2,
              "spawn":{"x":0.5,"y":-0.5},
              "screens":[["###"]]
            }"#####,
        )
        .expect("write temp file");

        let err = load_level_from_path(&path).expect_err("overlong row should fail");
        assert!(err.contains("screen 1"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn from_file_rejects_oversized_screens() {
        let file = LevelFile {
            version: "0.1".to_string(),
            level_id: "huge".to_string(),
            width: 70_000,
            height: 70_000,
            spawn: SpawnPoint { x: 0.5, y: -0.5 },
            screens: vec![vec!["#".to_string()]],
        };
        let err = Level::from_file(file).expect_err("oversized screen should fail");
        assert!(err.contains("screen 1"));
        assert!(err.contains("Tile grid validation failed"));
    }

    #[test]
    fn shipped_tower_level_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../assets/levels/tower.json");
        let level = load_level_from_path(&path).expect("shipped level should load");
        assert_eq!(level.screen_count(), 4);
        assert_eq!(level.active_screen_index(level.spawn().y), 1);
    }
}
