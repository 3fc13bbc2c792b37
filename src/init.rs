use crate::config::GridConfig;
use crate::error::Result;
use crate::rng::Rng;
use crate::state::StateStore;

/// Probability threshold: a cell starts alive iff its draw is below this.
const ALIVE_BELOW: f32 = 0.5;

/// Fill the initial generation from `config.seed`.
/// One draw per cell in row-major order on a single stream, so the grid is
/// independent of how later generations are scheduled.
pub fn initialize(config: &GridConfig) -> Result<StateStore> {
    config.validate()?;
    let mut rng = Rng::from_grid_seed(config.seed);
    let cells = (0..config.cell_count())
        .map(|_| rng.next_f32() < ALIVE_BELOW)
        .collect();
    Ok(StateStore::from_cells(cells))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_grid() {
        let cfg = GridConfig::new(1234, 32, 16);
        let a = initialize(&cfg).unwrap();
        let b = initialize(&cfg).unwrap();
        assert_eq!(a.current(), b.current());
    }

    #[test]
    fn different_seeds_differ() {
        let a = initialize(&GridConfig::new(1, 32, 32)).unwrap();
        let b = initialize(&GridConfig::new(2, 32, 32)).unwrap();
        assert_ne!(a.current(), b.current());
    }

    #[test]
    fn roughly_half_alive() {
        let store = initialize(&GridConfig::new(99, 100, 100)).unwrap();
        let alive = store.population();
        assert!((4000..6000).contains(&alive), "population {alive}");
    }

    #[test]
    fn rejects_empty_grid() {
        assert!(initialize(&GridConfig::new(0, 0, 10)).is_err());
    }
}
