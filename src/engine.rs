use std::time::Instant;

use tracing::{debug, info};

use crate::config::{EngineOptions, GridConfig, PublishMode, SchedulerPolicy};
use crate::error::{EngineError, Result};
use crate::grid::coords;
use crate::init::initialize;
use crate::publish::{CellSink, PixelBuffer, Publisher};
use crate::scheduler::Scheduler;
use crate::state::StateStore;

pub struct Timing {
    pub name: &'static str,
    pub ms: f64,
}

/// One simulation: config, double-buffered state, scheduler and publisher.
/// Dropping it releases everything; worker pools are joined on drop.
pub struct Engine {
    config: GridConfig,
    store: StateStore,
    scheduler: Scheduler,
    publisher: Publisher,
    generation: u64,
}

impl Engine {
    /// Validate, seed generation 0 from `config.seed` and publish it.
    pub fn create(config: GridConfig, options: EngineOptions) -> Result<Self> {
        config.validate()?;
        options.validate()?;
        let store = initialize(&config)?;
        Self::assemble(config, options, store)
    }

    /// Like `create`, but generation 0 is `cells` instead of a seeded fill.
    pub fn from_cells(config: GridConfig, options: EngineOptions, cells: Vec<bool>) -> Result<Self> {
        config.validate()?;
        options.validate()?;
        if cells.len() != config.cell_count() {
            return Err(EngineError::InvalidConfig(format!(
                "{} cells supplied for a {}x{} grid",
                cells.len(),
                config.width,
                config.height
            )));
        }
        Self::assemble(config, options, StateStore::from_cells(cells))
    }

    fn assemble(config: GridConfig, options: EngineOptions, store: StateStore) -> Result<Self> {
        let scheduler = Scheduler::new(&options)?;
        let mut publisher = Publisher::new(options.publish_mode, &config);
        publisher.publish(store.current())?;

        info!(
            width = config.width,
            height = config.height,
            seed = config.seed,
            policy = options.policy.name(),
            workers = scheduler.workers(),
            mode = ?options.publish_mode,
            "engine created"
        );

        Ok(Self {
            config,
            store,
            scheduler,
            publisher,
            generation: 0,
        })
    }

    /// Advance one generation: compute, swap, publish.
    pub fn step(&mut self) -> Result<()> {
        self.step_timed().map(|_| ())
    }

    pub fn step_timed(&mut self) -> Result<Vec<Timing>> {
        let mut timings = Vec::with_capacity(3);

        let t = Instant::now();
        let (current, next) = self.store.split()?;
        self.scheduler
            .run(current, next, self.config.width, self.config.height);
        timings.push(Timing {
            name: "compute",
            ms: t.elapsed().as_secs_f64() * 1000.0,
        });

        let t = Instant::now();
        self.store.swap()?;
        timings.push(Timing {
            name: "swap",
            ms: t.elapsed().as_secs_f64() * 1000.0,
        });

        let t = Instant::now();
        self.publisher.publish(self.store.current())?;
        timings.push(Timing {
            name: "publish",
            ms: t.elapsed().as_secs_f64() * 1000.0,
        });

        self.generation += 1;
        debug!(
            generation = self.generation,
            compute_ms = timings[0].ms,
            publish_ms = timings[2].ms,
            "generation complete"
        );
        Ok(timings)
    }

    pub fn step_n(&mut self, generations: u64) -> Result<()> {
        for _ in 0..generations {
            self.step()?;
        }
        Ok(())
    }

    pub fn current_state(&self, index: usize) -> Result<bool> {
        let len = self.store.len();
        self.store
            .current()
            .get(index)
            .copied()
            .ok_or(EngineError::IndexOutOfRange { index, len })
    }

    pub fn cells(&self) -> &[bool] {
        self.store.current()
    }

    pub fn population(&self) -> usize {
        self.store.population()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn policy(&self) -> SchedulerPolicy {
        self.scheduler.policy()
    }

    pub fn publish_mode(&self) -> PublishMode {
        self.publisher.mode()
    }

    /// Only in shared-buffer mode. The handle stays valid for the engine's
    /// lifetime and is rewritten in place after every step.
    pub fn shared_pixel_buffer(&self) -> Result<PixelBuffer> {
        self.publisher.pixel_buffer()
    }

    /// Only in per-entity mode. The sink receives the cell's current color
    /// now and again after every step.
    pub fn register_sink(&mut self, index: usize, sink: Box<dyn CellSink>) -> Result<()> {
        let alive = self.current_state(index)?;
        self.publisher.register(index, sink, alive)
    }

    /// Layout position of a cell, grid centred on the origin.
    pub fn cell_position(&self, index: usize) -> Result<(f32, f32)> {
        let len = self.store.len();
        if index >= len {
            return Err(EngineError::IndexOutOfRange { index, len });
        }
        let (x, y) = coords(index, self.config.w());
        Ok((
            x as f32 - self.config.width as f32 / 2.0,
            y as f32 - self.config.height as f32 / 2.0,
        ))
    }

    /// Stop at a generation boundary and release all buffers.
    pub fn destroy(self) {
        debug!(generation = self.generation, "engine destroyed");
    }
}
