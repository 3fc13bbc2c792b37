use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// RGBA color, channels in [0, 1].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// 8-bit quantization, channels clamped first.
    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }
}

/// Simulation parameters. Immutable once the engine is created.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    pub seed: u32,
    pub width: i32,
    pub height: i32,
    #[serde(default = "default_alive")]
    pub alive: Color,
    #[serde(default = "default_dead")]
    pub dead: Color,
}

fn default_alive() -> Color {
    Color::WHITE
}

fn default_dead() -> Color {
    Color::BLACK
}

impl GridConfig {
    pub fn new(seed: u32, width: i32, height: i32) -> Self {
        Self {
            seed,
            width,
            height,
            alive: Color::WHITE,
            dead: Color::BLACK,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.width <= 0 || self.height <= 0 {
            return Err(EngineError::InvalidConfig(format!(
                "grid must be at least 1x1, got {}x{}",
                self.width, self.height
            )));
        }
        // wrap_index multiplies y by width in i32; keep the product in range.
        if self.width.checked_mul(self.height).is_none() {
            return Err(EngineError::InvalidConfig(format!(
                "{}x{} cells overflows the index space",
                self.width, self.height
            )));
        }
        Ok(())
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    #[inline]
    pub fn w(&self) -> usize {
        self.width as usize
    }

    #[inline]
    pub fn h(&self) -> usize {
        self.height as usize
    }

    pub fn visual(&self, alive: bool) -> Color {
        if alive { self.alive } else { self.dead }
    }
}

/// How a generation's index space is split across workers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SchedulerPolicy {
    #[default]
    Sequential,
    RowParallel,
    FullyParallel,
}

impl SchedulerPolicy {
    pub const ALL: [SchedulerPolicy; 3] = [
        SchedulerPolicy::Sequential,
        SchedulerPolicy::RowParallel,
        SchedulerPolicy::FullyParallel,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SchedulerPolicy::Sequential => "sequential",
            SchedulerPolicy::RowParallel => "row-parallel",
            SchedulerPolicy::FullyParallel => "fully-parallel",
        }
    }
}

/// Where the visual representation goes after each swap.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PublishMode {
    #[default]
    PerEntity,
    SharedBuffer,
}

/// Execution options. None of these change the simulated result.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    pub policy: SchedulerPolicy,
    pub publish_mode: PublishMode,
    /// 0 = rayon's default pool size.
    pub worker_count: usize,
    /// Grain of the row-parallel policy.
    pub rows_per_chunk: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            policy: SchedulerPolicy::Sequential,
            publish_mode: PublishMode::PerEntity,
            worker_count: 0,
            rows_per_chunk: 1,
        }
    }
}

impl EngineOptions {
    pub fn new(policy: SchedulerPolicy, publish_mode: PublishMode) -> Self {
        Self {
            policy,
            publish_mode,
            ..Self::default()
        }
    }

    pub fn with_workers(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count;
        self
    }

    pub fn with_rows_per_chunk(mut self, rows_per_chunk: usize) -> Self {
        self.rows_per_chunk = rows_per_chunk;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.rows_per_chunk == 0 {
            return Err(EngineError::InvalidConfig(
                "rows_per_chunk must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
