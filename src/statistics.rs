use crate::grid::Position;
use std::fmt;
use std::time::Duration;

/// Summary shown once a replay finishes.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchStats {
    pub algorithm: String,
    /// Sum of the Euclidean lengths of the path segments.
    pub path_length: f64,
    pub time_spent: Duration,
    pub operation_count: usize,
    pub path: Vec<Position>,
    /// Optimal cost computed independently of the visualized finder.
    pub reference_cost: Option<f64>,
}

impl SearchStats {
    pub fn found(&self) -> bool {
        !self.path.is_empty()
    }

    /// Visualized path cost relative to the optimum; 1.0 means optimal.
    pub fn efficiency(&self) -> Option<f64> {
        match self.reference_cost {
            Some(optimal) if optimal > 0.0 && self.found() => Some(self.path_length / optimal),
            _ => None,
        }
    }

    pub fn time_spent_ms(&self) -> f64 {
        self.time_spent.as_secs_f64() * 1000.0
    }
}

impl fmt::Display for SearchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Algorithm: {}", self.algorithm)?;
        if self.found() {
            writeln!(f, "Path length: {:.4}", self.path_length)?;
            writeln!(f, "Path steps: {}", self.path.len().saturating_sub(1))?;
        } else {
            writeln!(f, "Path length: no path")?;
        }
        writeln!(f, "Time spent: {:.4}ms", self.time_spent_ms())?;
        writeln!(f, "Operations: {}", self.operation_count)?;

        match self.reference_cost {
            Some(cost) => writeln!(f, "Optimal cost: {:.4}", cost)?,
            None => writeln!(f, "Optimal cost: unreachable")?,
        }
        if let Some(ratio) = self.efficiency() {
            writeln!(f, "Route efficiency: {:.3}", ratio)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(path: Vec<Position>, path_length: f64, reference_cost: Option<f64>) -> SearchStats {
        SearchStats {
            algorithm: "A*".to_string(),
            path_length,
            time_spent: Duration::from_micros(1500),
            operation_count: 42,
            path,
            reference_cost,
        }
    }

    #[test]
    fn display_reports_summary() {
        let path = vec![Position::new(0, 0), Position::new(1, 0), Position::new(2, 0)];
        let text = stats(path, 2.0, Some(2.0)).to_string();
        assert!(text.contains("Path length: 2.0000"));
        assert!(text.contains("Path steps: 2"));
        assert!(text.contains("Time spent: 1.5000ms"));
        assert!(text.contains("Operations: 42"));
        assert!(text.contains("Route efficiency: 1.000"));
    }

    #[test]
    fn missing_path_has_no_efficiency() {
        let summary = stats(Vec::new(), 0.0, None);
        assert!(!summary.found());
        assert_eq!(summary.efficiency(), None);
        assert!(summary.to_string().contains("no path"));
    }
}
