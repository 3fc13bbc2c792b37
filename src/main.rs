use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use lifegrid::{Engine, EngineOptions, GridConfig, PublishMode, SchedulerPolicy};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Policy {
    Sequential,
    RowParallel,
    FullyParallel,
}

impl From<Policy> for SchedulerPolicy {
    fn from(p: Policy) -> Self {
        match p {
            Policy::Sequential => SchedulerPolicy::Sequential,
            Policy::RowParallel => SchedulerPolicy::RowParallel,
            Policy::FullyParallel => SchedulerPolicy::FullyParallel,
        }
    }
}

#[derive(Parser, Debug)]
#[command(version, about = "Run Game of Life on a torus and save the final frame as PNG")]
struct Args {
    #[arg(long, default_value_t = 42)]
    seed: u32,
    #[arg(long, default_value_t = 512)]
    width: i32,
    #[arg(long, default_value_t = 512)]
    height: i32,
    #[arg(long, short = 'n', default_value_t = 100)]
    generations: u64,
    #[arg(long, value_enum, default_value_t = Policy::RowParallel)]
    policy: Policy,
    /// Worker threads; 0 uses every core.
    #[arg(long, default_value_t = 0)]
    workers: usize,
    #[arg(long, default_value_t = 1)]
    rows_per_chunk: usize,
    #[arg(long, default_value = "artifacts")]
    out: PathBuf,
    /// Rerun under every policy and fail unless all final states agree.
    #[arg(long)]
    verify: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("failed to create {}", args.out.display()))?;

    let config = GridConfig::new(args.seed, args.width, args.height);
    let options = EngineOptions::new(args.policy.into(), PublishMode::SharedBuffer)
        .with_workers(args.workers)
        .with_rows_per_chunk(args.rows_per_chunk);

    let mut engine = Engine::create(config.clone(), options.clone())?;
    let frame = engine.shared_pixel_buffer()?;

    let mut compute_ms = 0.0;
    let mut publish_ms = 0.0;
    for _ in 0..args.generations {
        for t in engine.step_timed()? {
            match t.name {
                "compute" => compute_ms += t.ms,
                "publish" => publish_ms += t.ms,
                _ => {}
            }
        }
    }

    eprintln!("\nTimings over {} generations:", args.generations);
    eprintln!("  {:20} {:8.1} ms", "compute", compute_ms);
    eprintln!("  {:20} {:8.1} ms", "publish", publish_ms);
    info!(
        generation = engine.generation(),
        population = engine.population(),
        "simulation finished"
    );

    let path = args.out.join(format!("life_{}_{}.png", args.seed, engine.generation()));
    frame
        .to_image()?
        .save(&path)
        .with_context(|| format!("failed to save {}", path.display()))?;
    info!(path = %path.display(), "saved frame");

    if args.verify {
        for policy in SchedulerPolicy::ALL {
            let opts = EngineOptions {
                policy,
                ..options.clone()
            };
            let mut other = Engine::create(config.clone(), opts)?;
            other.step_n(args.generations)?;
            if other.cells() != engine.cells() {
                bail!("{} diverged from {}", policy.name(), engine.policy().name());
            }
            info!(policy = policy.name(), "policy agrees");
        }
    }

    Ok(())
}
