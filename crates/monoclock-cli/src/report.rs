//! Time source capability report.
//!
//! Probes which raw time sources answer on this host and what source
//! selection would pick, for the `probe` subcommand.

use monoclock_common::SourcePreference;
use monoclock_core::{monotonic_available, wall_clock_available, Clock};
use serde::Serialize;

/// Outcome of probing the host's time sources.
#[derive(Debug, Serialize)]
pub struct SourceReport {
    /// Whether `clock_gettime(CLOCK_MONOTONIC)` answers.
    pub monotonic_available: bool,
    /// Whether the wall clock answers.
    pub wall_clock_available: bool,
    /// Name of the source selection picked, if any.
    pub selected: Option<&'static str>,
    /// Seconds per raw tick of the selected source.
    pub resolution: Option<f64>,
    /// Whether the selected source is immune to clock adjustments.
    pub monotonic: Option<bool>,
    /// Selection failure, if no source was usable.
    pub error: Option<String>,
}

impl SourceReport {
    /// Probe the host and run selection with the given preference.
    #[must_use]
    pub fn probe(preference: SourcePreference) -> Self {
        let monotonic = monotonic_available();
        let wall_clock = wall_clock_available();

        match Clock::with_preference(preference) {
            Ok(clock) => Self {
                monotonic_available: monotonic,
                wall_clock_available: wall_clock,
                selected: Some(clock.source().name()),
                resolution: Some(clock.resolution()),
                monotonic: Some(clock.is_monotonic()),
                error: None,
            },
            Err(e) => Self {
                monotonic_available: monotonic,
                wall_clock_available: wall_clock,
                selected: None,
                resolution: None,
                monotonic: None,
                error: Some(e.to_string()),
            },
        }
    }

    /// Render the report as human-readable lines.
    #[must_use]
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "monotonic clock:  {}\n",
            if self.monotonic_available {
                "available"
            } else {
                "not available"
            }
        ));
        out.push_str(&format!(
            "wall clock:       {}\n",
            if self.wall_clock_available {
                "available"
            } else {
                "not available"
            }
        ));
        match (self.selected, self.resolution) {
            (Some(name), Some(resolution)) => {
                out.push_str(&format!("selected source:  {name}\n"));
                out.push_str(&format!("resolution:       {resolution:e} s/tick\n"));
                if self.monotonic == Some(false) {
                    out.push_str(
                        "note:             elapsed time can move backward if the \
                         system clock is adjusted\n",
                    );
                }
            }
            _ => {
                if let Some(err) = &self.error {
                    out.push_str(&format!("selection failed: {err}\n"));
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_auto_selects() {
        let report = SourceReport::probe(SourcePreference::Auto);
        assert!(report.selected.is_some());
        assert!(report.error.is_none());
        assert!(report.resolution.unwrap() > 0.0);
    }

    #[test]
    fn test_probe_wall_clock_notes_regression() {
        let report = SourceReport::probe(SourcePreference::WallClock);
        assert_eq!(report.selected, Some("wall_clock"));
        assert_eq!(report.resolution, Some(1e-6));
        let text = report.render_text();
        assert!(text.contains("move backward"));
    }

    #[test]
    fn test_report_serializes() {
        let report = SourceReport::probe(SourcePreference::Auto);
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("monotonic_available"));
    }
}
