//! Explorer configuration.
//!
//! Every tunable constant of the three engines lives here. Each section
//! falls back to its defaults field by field, so a JSON document only needs
//! to name what it overrides.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::linalg::Vec2;

// ── Control ranges ──────────────────────────────────────────

/// Range and step of a slider-style control.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl ControlRange {
    pub const fn new(min: f64, max: f64, step: f64) -> Self {
        ControlRange { min, max, step }
    }

    /// Clamp `value` into the range and quantize it to the nearest step
    /// counted from the lower bound. Non-finite input lands on the lower
    /// bound. Swapped bounds are read in ascending order.
    pub fn snap(&self, value: f64) -> f64 {
        let (lo, hi) = if self.min <= self.max {
            (self.min, self.max)
        } else {
            (self.max, self.min)
        };
        if !value.is_finite() {
            return lo;
        }
        let clamped = value.max(lo).min(hi);
        if !(self.step > 0.0) {
            return clamped;
        }
        let steps = ((clamped - lo) / self.step).round();
        (lo + steps * self.step).max(lo).min(hi)
    }

    fn validate(&self, field: &'static str) -> ConfigResult<()> {
        if !(self.min.is_finite() && self.max.is_finite() && self.step.is_finite()) {
            return Err(ConfigError::invalid(field, "bounds and step must be finite"));
        }
        if self.min > self.max {
            return Err(ConfigError::invalid(
                field,
                format!("min {} exceeds max {}", self.min, self.max),
            ));
        }
        if self.step < 0.0 {
            return Err(ConfigError::invalid(field, "step must not be negative"));
        }
        Ok(())
    }
}

// ── Basis explorer ──────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BasisConfig {
    /// `|det M|` below this is treated as singular.
    pub degeneracy_threshold: f64,
    /// Slider range for every basis-vector component.
    pub component_range: ControlRange,
    /// Slider range for the probe vector components.
    pub probe_range: ControlRange,
    /// Probe vector used at start-up.
    pub default_probe: Vec2,
}

impl Default for BasisConfig {
    fn default() -> Self {
        BasisConfig {
            degeneracy_threshold: 0.001,
            component_range: ControlRange::new(-2.0, 2.0, 0.1),
            probe_range: ControlRange::new(-4.0, 4.0, 0.1),
            default_probe: Vec2::new(1.0, 1.0),
        }
    }
}

impl BasisConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.degeneracy_threshold.is_finite() && self.degeneracy_threshold >= 0.0) {
            return Err(ConfigError::invalid(
                "basis.degeneracy_threshold",
                "must be a finite, non-negative number",
            ));
        }
        self.component_range.validate("basis.component_range")?;
        self.probe_range.validate("basis.probe_range")?;
        if !self.default_probe.is_finite() {
            return Err(ConfigError::invalid("basis.default_probe", "must be finite"));
        }
        Ok(())
    }
}

// ── Sampling demo ───────────────────────────────────────────

/// Upper bound on the number of steps in the dense time grid.
pub const MAX_GRID_INTERVALS: usize = 1_000_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    /// Frequency of the reference sine, in Hz.
    pub signal_frequency: f64,
    /// End of the time axis, in seconds.
    pub time_end: f64,
    /// Spacing of the dense time grid, in seconds.
    pub time_step: f64,
    /// Sampling frequency at the left edge of the canvas.
    pub fs_min: f64,
    /// Sampling frequency at the right edge of the canvas.
    pub fs_max: f64,
    /// Hard cap on the number of sample points.
    pub max_samples: usize,
    /// Sample times closer than this to the previous one are dropped.
    pub duplicate_tolerance: f64,
    pub canvas_width: f64,
    pub canvas_height: f64,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        SamplingConfig {
            signal_frequency: 0.5,
            time_end: 6.0,
            time_step: 0.01,
            fs_min: 0.1,
            fs_max: 5.1,
            max_samples: 1000,
            duplicate_tolerance: 1e-9,
            canvas_width: 800.0,
            canvas_height: 300.0,
        }
    }
}

impl SamplingConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.signal_frequency.is_finite() && self.signal_frequency > 0.0) {
            return Err(ConfigError::invalid("sampling.signal_frequency", "must be positive"));
        }
        if !(self.time_end.is_finite() && self.time_end > 0.0) {
            return Err(ConfigError::invalid("sampling.time_end", "must be positive"));
        }
        if !(self.time_step.is_finite() && self.time_step > 0.0) {
            return Err(ConfigError::invalid("sampling.time_step", "must be positive"));
        }
        if self.time_end / self.time_step > MAX_GRID_INTERVALS as f64 {
            return Err(ConfigError::invalid(
                "sampling.time_step",
                "time grid would exceed one million points",
            ));
        }
        if !(self.fs_min.is_finite() && self.fs_max.is_finite()) {
            return Err(ConfigError::invalid("sampling.fs_min", "frequency bounds must be finite"));
        }
        if self.fs_min > self.fs_max {
            return Err(ConfigError::invalid(
                "sampling.fs_max",
                format!("fs_max {} is below fs_min {}", self.fs_max, self.fs_min),
            ));
        }
        if self.max_samples == 0 {
            return Err(ConfigError::invalid("sampling.max_samples", "must be at least 1"));
        }
        if !(self.duplicate_tolerance.is_finite() && self.duplicate_tolerance >= 0.0) {
            return Err(ConfigError::invalid(
                "sampling.duplicate_tolerance",
                "must be a finite, non-negative number",
            ));
        }
        if !(self.canvas_width.is_finite() && self.canvas_width > 0.0) {
            return Err(ConfigError::invalid("sampling.canvas_width", "must be positive"));
        }
        if !(self.canvas_height.is_finite() && self.canvas_height > 0.0) {
            return Err(ConfigError::invalid("sampling.canvas_height", "must be positive"));
        }
        Ok(())
    }
}

// ── Signum approximation ────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignumConfig {
    pub alpha_range: ControlRange,
    pub default_alpha: f64,
    /// Curves span `[-x_extent, x_extent]`.
    pub x_extent: f64,
    /// Grid subdivisions per half-axis.
    pub subdivisions: usize,
}

impl Default for SignumConfig {
    fn default() -> Self {
        SignumConfig {
            alpha_range: ControlRange::new(0.01, 0.3, 0.001),
            default_alpha: 0.2,
            x_extent: 3.0,
            subdivisions: 50,
        }
    }
}

impl SignumConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        self.alpha_range.validate("signum.alpha_range")?;
        if !self.default_alpha.is_finite() {
            return Err(ConfigError::invalid("signum.default_alpha", "must be finite"));
        }
        if !(self.x_extent.is_finite() && self.x_extent > 0.0) {
            return Err(ConfigError::invalid("signum.x_extent", "must be positive"));
        }
        if self.subdivisions == 0 {
            return Err(ConfigError::invalid("signum.subdivisions", "must be at least 1"));
        }
        Ok(())
    }
}

// ── Top level ───────────────────────────────────────────────

/// Configuration for all three explorers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    pub basis: BasisConfig,
    pub sampling: SamplingConfig,
    pub signum: SignumConfig,
}

impl ExplorerConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(source: &str) -> ConfigResult<Self> {
        let config: ExplorerConfig = serde_json::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        self.basis.validate()?;
        self.sampling.validate()?;
        self.signum.validate()
    }
}
