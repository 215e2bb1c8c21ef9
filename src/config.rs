use crate::algorithms::{Algorithm, FinderOptions, Heuristic};
use crate::controller::{Settings, DEFAULT_SETTLE_FACTOR};
use crate::error::ConfigError;
use crate::grid::DiagonalMovement;
use clap::Parser;
use std::time::Duration;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    #[arg(long, default_value_t = 16)]
    pub grid_cols: usize,

    #[arg(long, default_value_t = 16)]
    pub grid_rows: usize,

    /// a_star, dijkstra, best_first, breadth_first or ida_star
    #[arg(long, default_value = "a_star")]
    pub algorithm: String,

    /// manhattan, euclidean, octile or chebyshev
    #[arg(long, default_value = "manhattan")]
    pub heuristic: String,

    #[arg(long, default_value_t = 1.0)]
    pub weight: f64,

    #[arg(long, default_value_t = false)]
    pub allow_diagonal: bool,

    #[arg(long, default_value_t = false)]
    pub dont_cross_corners: bool,

    #[arg(long, default_value_t = 40)]
    pub num_walls: usize,

    /// Seed for wall placement; random when omitted
    #[arg(long)]
    pub seed: Option<u64>,

    /// Pause between replayed steps
    #[arg(long, default_value_t = 50)]
    pub delay_ms: u64,

    /// How long a cell takes to change colour
    #[arg(long, default_value_t = 50)]
    pub animation_ms: u64,

    #[arg(long, default_value_t = DEFAULT_SETTLE_FACTOR)]
    pub settle_factor: f64,

    #[arg(long, default_value_t = false)]
    pub no_visualization: bool,

    #[arg(long, default_value_t = false)]
    pub quiet: bool,
}

impl Config {
    pub fn settings(&self) -> Result<Settings, ConfigError> {
        if !(self.weight.is_finite() && self.weight > 0.0) {
            return Err(ConfigError::InvalidWeight(self.weight));
        }
        if !(self.settle_factor.is_finite() && self.settle_factor >= 0.0) {
            return Err(ConfigError::InvalidSettleFactor(self.settle_factor));
        }

        let finder = FinderOptions {
            algorithm: self.algorithm.parse::<Algorithm>()?,
            heuristic: self.heuristic.parse::<Heuristic>()?,
            weight: self.weight,
            diagonal: DiagonalMovement::from_flags(self.allow_diagonal, self.dont_cross_corners),
            ..FinderOptions::default()
        };

        let mut settings = Settings::for_grid(self.grid_cols, self.grid_rows).with_finder(finder);
        settings.settle_factor = self.settle_factor;
        validate_grid(&settings)?;
        Ok(settings)
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn animation(&self) -> Duration {
        Duration::from_millis(self.animation_ms)
    }
}

/// Both default markers must fit inside the grid on different cells.
pub fn validate_grid(settings: &Settings) -> Result<(), ConfigError> {
    let fits = |x: usize, y: usize| x < settings.cols && y < settings.rows;
    let start = settings.default_start;
    let end = settings.default_end;
    if !fits(start.x, start.y) || !fits(end.x, end.y) || start == end {
        return Err(ConfigError::GridTooSmall {
            cols: settings.cols,
            rows: settings.rows,
        });
    }
    Ok(())
}
