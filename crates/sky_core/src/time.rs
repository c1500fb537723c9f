/// Smallest simulation step handed to the game; guards against zero-length frames.
pub const MIN_DT: f32 = 0.0001;
/// Largest simulation step; a hitch longer than this is simulated as this much time.
pub const MAX_DT: f32 = 0.1;

const FPS_SAMPLE_COUNT: usize = 60;

/// Clamp a raw frame delta into the range the simulation is stable for.
pub fn clamp_dt(dt: f32) -> f32 {
    dt.clamp(MIN_DT, MAX_DT)
}

/// Variable-step frame clock. Each frame yields one clamped `sim_dt`.
pub struct FrameClock {
    pub frame_count: u64,
    pub total_time: f64,
    /// Unclamped wall-clock delta of the last frame, in seconds.
    pub real_dt: f64,
    /// Delta handed to the simulation this frame.
    pub sim_dt: f32,

    fps_samples: [f64; FPS_SAMPLE_COUNT],
    fps_sample_index: usize,
    pub smoothed_fps: f64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            frame_count: 0,
            total_time: 0.0,
            real_dt: 0.0,
            sim_dt: 1.0 / 60.0,
            fps_samples: [1.0 / 60.0; FPS_SAMPLE_COUNT],
            fps_sample_index: 0,
            smoothed_fps: 60.0,
        }
    }

    /// Feed one measured frame delta and return the clamped simulation step.
    pub fn advance(&mut self, real_dt: f64) -> f32 {
        self.real_dt = real_dt;
        if real_dt > MAX_DT as f64 {
            log::warn!(
                "Frame took {:.1}ms, clamping simulation step to {}ms",
                real_dt * 1000.0,
                MAX_DT * 1000.0
            );
        }
        self.sim_dt = clamp_dt(real_dt as f32);
        self.total_time += self.sim_dt as f64;
        self.frame_count += 1;

        self.fps_samples[self.fps_sample_index] = real_dt;
        self.fps_sample_index = (self.fps_sample_index + 1) % FPS_SAMPLE_COUNT;
        let avg_dt: f64 = self.fps_samples.iter().sum::<f64>() / FPS_SAMPLE_COUNT as f64;
        self.smoothed_fps = if avg_dt > 0.0 { 1.0 / avg_dt } else { 0.0 };

        self.sim_dt
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
