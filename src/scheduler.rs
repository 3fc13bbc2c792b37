use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::config::{EngineOptions, SchedulerPolicy};
use crate::error::Result;
use crate::kernel::step_index;

/// Drives one generation's compute phase. Every policy writes each index of
/// `next` exactly once from the immutable `current`, and returns only after
/// all workers are done, so results are identical across policies.
pub struct Scheduler {
    policy: SchedulerPolicy,
    rows_per_chunk: usize,
    /// Dedicated pool when a worker count is configured; otherwise rayon's
    /// global pool. Unused by the sequential policy.
    pool: Option<ThreadPool>,
}

impl Scheduler {
    pub fn new(options: &EngineOptions) -> Result<Self> {
        options.validate()?;
        let pool = match (options.policy, options.worker_count) {
            (SchedulerPolicy::Sequential, _) | (_, 0) => None,
            (_, n) => Some(
                ThreadPoolBuilder::new()
                    .num_threads(n)
                    .thread_name(|i| format!("lifegrid-worker-{i}"))
                    .build()?,
            ),
        };
        Ok(Self {
            policy: options.policy,
            rows_per_chunk: options.rows_per_chunk,
            pool,
        })
    }

    pub fn policy(&self) -> SchedulerPolicy {
        self.policy
    }

    /// Number of threads the compute phase runs on.
    pub fn workers(&self) -> usize {
        match (self.policy, &self.pool) {
            (SchedulerPolicy::Sequential, _) => 1,
            (_, Some(pool)) => pool.current_num_threads(),
            (_, None) => rayon::current_num_threads(),
        }
    }

    /// Compute `next` from `current`. Blocks until every index is written.
    pub fn run(&self, current: &[bool], next: &mut [bool], width: i32, height: i32) {
        debug_assert_eq!(current.len(), next.len());
        debug_assert_eq!(current.len(), width as usize * height as usize);

        match &self.pool {
            Some(pool) => pool.install(|| self.dispatch(current, next, width, height)),
            None => self.dispatch(current, next, width, height),
        }
    }

    fn dispatch(&self, current: &[bool], next: &mut [bool], width: i32, height: i32) {
        match self.policy {
            SchedulerPolicy::Sequential => run_sequential(current, next, width, height),
            SchedulerPolicy::RowParallel => {
                run_row_chunks(current, next, width, height, self.rows_per_chunk)
            }
            SchedulerPolicy::FullyParallel => run_per_cell(current, next, width, height),
        }
    }
}

fn run_sequential(current: &[bool], next: &mut [bool], width: i32, height: i32) {
    for (i, out) in next.iter_mut().enumerate() {
        *out = step_index(current, i, width, height);
    }
}

/// One work unit per `rows_per_chunk` contiguous rows.
fn run_row_chunks(
    current: &[bool],
    next: &mut [bool],
    width: i32,
    height: i32,
    rows_per_chunk: usize,
) {
    let chunk = (width as usize).saturating_mul(rows_per_chunk);
    next.par_chunks_mut(chunk)
        .enumerate()
        .for_each(|(c, rows)| {
            let base = c * chunk;
            for (i, out) in rows.iter_mut().enumerate() {
                *out = step_index(current, base + i, width, height);
            }
        });
}

/// One work unit per cell; rayon decides how units map onto threads.
fn run_per_cell(current: &[bool], next: &mut [bool], width: i32, height: i32) {
    next.par_iter_mut()
        .enumerate()
        .for_each(|(i, out)| *out = step_index(current, i, width, height));
}
