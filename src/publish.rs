use std::sync::{Arc, RwLock, RwLockWriteGuard};

use rayon::prelude::*;

use crate::config::{Color, GridConfig, PublishMode};
use crate::error::{EngineError, Result};

/// Host-side receiver for one cell's color (a renderable entity, a UI tile).
pub trait CellSink: Send {
    fn set_color(&mut self, color: Color);
}

impl<F: FnMut(Color) + Send> CellSink for F {
    fn set_color(&mut self, color: Color) {
        self(color)
    }
}

/// Grayscale intensity for a cell.
#[inline]
pub fn intensity(alive: bool) -> u8 {
    if alive { 255 } else { 0 }
}

/// RGBA8, gray replicated into r/g/b, fully opaque.
#[inline]
pub fn pack_pixel(alive: bool) -> [u8; 4] {
    let v = intensity(alive);
    [v, v, v, 255]
}

/// Shared row-major RGBA8 image, one pixel per cell. Clones share storage;
/// the engine writes after each swap and hosts read between steps.
#[derive(Clone, Debug)]
pub struct PixelBuffer {
    rgba: Arc<RwLock<Vec<u8>>>,
    w: usize,
    h: usize,
}

impl PixelBuffer {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            rgba: Arc::new(RwLock::new(vec![0u8; w * h * 4])),
            w,
            h,
        }
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn height(&self) -> usize {
        self.h
    }

    /// Run `f` over the raw bytes under a read lock.
    pub fn read<R>(&self, f: impl FnOnce(&[u8]) -> R) -> Result<R> {
        let guard = self.rgba.read().map_err(|_| EngineError::BufferPoisoned)?;
        Ok(f(&guard))
    }

    pub fn snapshot(&self) -> Result<Vec<u8>> {
        self.read(|rgba| rgba.to_vec())
    }

    pub fn pixel(&self, index: usize) -> Result<[u8; 4]> {
        let len = self.w * self.h;
        if index >= len {
            return Err(EngineError::IndexOutOfRange { index, len });
        }
        self.read(|rgba| {
            let mut px = [0u8; 4];
            px.copy_from_slice(&rgba[index * 4..index * 4 + 4]);
            px
        })
    }

    pub fn to_image(&self) -> Result<image::RgbaImage> {
        let rgba = self.snapshot()?;
        image::RgbaImage::from_raw(self.w as u32, self.h as u32, rgba).ok_or(
            EngineError::PreconditionViolation("pixel buffer size does not match its dimensions"),
        )
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<u8>>> {
        self.rgba.write().map_err(|_| EngineError::BufferPoisoned)
    }
}

/// Emits the visual form of the current generation. One mode per run.
pub enum Publisher {
    PerEntity {
        sinks: Vec<Option<Box<dyn CellSink>>>,
        alive: Color,
        dead: Color,
    },
    SharedBuffer(PixelBuffer),
}

impl Publisher {
    pub fn new(mode: PublishMode, config: &GridConfig) -> Self {
        match mode {
            PublishMode::PerEntity => Self::per_entity(config),
            PublishMode::SharedBuffer => Self::SharedBuffer(PixelBuffer::new(config.w(), config.h())),
        }
    }

    pub fn per_entity(config: &GridConfig) -> Self {
        let mut sinks = Vec::with_capacity(config.cell_count());
        sinks.resize_with(config.cell_count(), || None);
        Self::PerEntity {
            sinks,
            alive: config.alive,
            dead: config.dead,
        }
    }

    /// Publish into a host-supplied buffer.
    pub fn shared(buffer: PixelBuffer) -> Self {
        Self::SharedBuffer(buffer)
    }

    pub fn mode(&self) -> PublishMode {
        match self {
            Self::PerEntity { .. } => PublishMode::PerEntity,
            Self::SharedBuffer(_) => PublishMode::SharedBuffer,
        }
    }

    pub fn pixel_buffer(&self) -> Result<PixelBuffer> {
        match self {
            Self::SharedBuffer(buffer) => Ok(buffer.clone()),
            Self::PerEntity { .. } => Err(EngineError::PreconditionViolation(
                "shared pixel buffer requested in per-entity mode",
            )),
        }
    }

    /// Attach a sink for `index`, replacing any previous one, and push the
    /// cell's current color to it.
    pub fn register(&mut self, index: usize, mut sink: Box<dyn CellSink>, alive_now: bool) -> Result<()> {
        match self {
            Self::PerEntity { sinks, alive, dead } => {
                let len = sinks.len();
                let slot = sinks
                    .get_mut(index)
                    .ok_or(EngineError::IndexOutOfRange { index, len })?;
                sink.set_color(if alive_now { *alive } else { *dead });
                *slot = Some(sink);
                Ok(())
            }
            Self::SharedBuffer(_) => Err(EngineError::PreconditionViolation(
                "entity sinks registered in shared-buffer mode",
            )),
        }
    }

    pub fn publish(&mut self, cells: &[bool]) -> Result<()> {
        match self {
            Self::PerEntity { sinks, alive, dead } => {
                if sinks.len() != cells.len() {
                    return Err(EngineError::PreconditionViolation(
                        "sink table does not match cell count",
                    ));
                }
                for (slot, &is_alive) in sinks.iter_mut().zip(cells) {
                    if let Some(sink) = slot {
                        sink.set_color(if is_alive { *alive } else { *dead });
                    }
                }
                Ok(())
            }
            Self::SharedBuffer(buffer) => {
                let w = buffer.w;
                if w * buffer.h != cells.len() {
                    return Err(EngineError::PreconditionViolation(
                        "pixel buffer does not match cell count",
                    ));
                }
                let mut rgba = buffer.write()?;
                rgba.par_chunks_mut(w * 4)
                    .zip(cells.par_chunks(w))
                    .for_each(|(row, states)| {
                        for (px, &is_alive) in row.chunks_exact_mut(4).zip(states) {
                            px.copy_from_slice(&pack_pixel(is_alive));
                        }
                    });
                Ok(())
            }
        }
    }
}
