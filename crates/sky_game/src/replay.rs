use serde::Deserialize;
use sky_core::input::{InputState, Key};
use std::fs;
use std::path::Path;

use crate::controller::FrameInput;

#[derive(Debug, Deserialize, Clone)]
pub struct ReplaySequence {
    #[serde(default = "default_dt")]
    pub fixed_dt: f32,
    pub frames: Vec<ReplayFrame>,
}

/// Keys held during `repeat` consecutive frames.
#[derive(Debug, Deserialize, Clone)]
pub struct ReplayFrame {
    #[serde(default)]
    pub left: bool,
    #[serde(default)]
    pub right: bool,
    #[serde(default)]
    pub jump: bool,
    #[serde(default)]
    pub debug: bool,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

impl ReplaySequence {
    /// Feed the recorded key states through an `InputState` so press and
    /// release edges come out exactly as they would from a keyboard.
    pub fn expanded_inputs(&self) -> Vec<FrameInput> {
        let mut input = InputState::new();
        let mut out = Vec::new();
        for frame in &self.frames {
            for _ in 0..frame.repeat.max(1) {
                input.set_key(Key::Left, frame.left);
                input.set_key(Key::Right, frame.right);
                input.set_key(Key::Space, frame.jump);
                input.set_key(Key::F3, frame.debug);
                out.push(FrameInput::from_state(&input));
                input.end_frame();
            }
        }
        out
    }

    pub fn total_frames(&self) -> u64 {
        self.frames.iter().map(|f| f.repeat.max(1) as u64).sum()
    }
}

pub fn load_replay_from_path(path: &Path) -> Result<ReplaySequence, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let replay: ReplaySequence = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse replay JSON {}: {e}", path.display()))?;
    validate_replay(&replay)?;
    Ok(replay)
}

fn validate_replay(replay: &ReplaySequence) -> Result<(), String> {
    if replay.fixed_dt <= 0.0 || !replay.fixed_dt.is_finite() {
        return Err("Replay validation failed: fixed_dt must be > 0".to_string());
    }
    if replay.frames.is_empty() {
        return Err("Replay validation failed: frames list is empty".to_string());
    }
    Ok(())
}

const fn default_dt() -> f32 {
    1.0 / 60.0
}

const fn default_repeat() -> u32 {
    1
}
