//! Two-sided exponential approximation of `sgn(x)`.
//!
//! `G(x) = -exp(α·x)` for `x ≤ 0` and `G(x) = exp(-α·x)` for `x ≥ 0`. The
//! curve jumps from −1 to +1 at the origin and flattens toward `sgn(x)` as
//! `α → 0`; it backs the Hilbert-transform sigmoid plot.

use serde::{Deserialize, Serialize};

use crate::config::SignumConfig;

/// One vertex of a plotted branch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Both branches of `G(x)` for one value of `α`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignumState {
    pub alpha: f64,
    /// Branch on `[-extent, 0]`, ending exactly at `x = 0`.
    pub negative: Vec<Point>,
    /// Branch on `[0, extent]`, starting exactly at `x = 0`.
    pub positive: Vec<Point>,
}

/// Evaluate both branches on `subdivisions + 1` evenly spaced points each.
pub fn approximate_signum(alpha: f64, extent: f64, subdivisions: usize) -> SignumState {
    let step = extent / subdivisions.max(1) as f64;
    let negative = (0..=subdivisions)
        .map(|i| {
            // Counted from the origin so the last point is exactly 0.
            let x = -((subdivisions - i) as f64 * step);
            Point {
                x,
                y: -(alpha * x).exp(),
            }
        })
        .collect();
    let positive = (0..=subdivisions)
        .map(|i| {
            let x = i as f64 * step;
            Point {
                x,
                y: (-alpha * x).exp(),
            }
        })
        .collect();
    SignumState {
        alpha,
        negative,
        positive,
    }
}

/// A control change emitted by the UI layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SignumEvent {
    /// The `α` slider moved.
    Alpha { value: f64 },
}

#[derive(Debug, Clone)]
pub struct SignumEngine {
    config: SignumConfig,
    state: SignumState,
}

impl SignumEngine {
    pub fn new(config: SignumConfig) -> Self {
        let state = approximate_signum(config.default_alpha, config.x_extent, config.subdivisions);
        SignumEngine { config, state }
    }

    pub fn state(&self) -> &SignumState {
        &self.state
    }

    /// Set alpha directly, without slider snapping.
    pub fn set_alpha(&mut self, alpha: f64) -> &SignumState {
        self.state = approximate_signum(alpha, self.config.x_extent, self.config.subdivisions);
        &self.state
    }

    pub fn apply(&mut self, event: SignumEvent) -> &SignumState {
        match event {
            SignumEvent::Alpha { value } => {
                let alpha = self.config.alpha_range.snap(value);
                self.set_alpha(alpha)
            }
        }
    }
}

impl Default for SignumEngine {
    fn default() -> Self {
        SignumEngine::new(SignumConfig::default())
    }
}
