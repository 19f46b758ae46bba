//! Shannon sampling demo: sampling and sinc reconstruction of a sine.
//!
//! The reference signal `sin(2π·f0·t)` is laid on a dense time grid once.
//! Each change of the sampling frequency resamples it and rebuilds the
//! Whittaker–Shannon reconstruction over the whole grid.

use std::f64::consts::PI;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::sinc::reconstruct;
use crate::config::{MAX_GRID_INTERVALS, SamplingConfig};
use crate::supersede::{LatestSlot, Ticket};

// ── Reference signal ────────────────────────────────────────

/// The fixed continuous-time sine and its dense time grid.
#[derive(Debug, Clone)]
pub struct ReferenceSignal {
    pub frequency: f64,
    pub time_end: f64,
    pub max_samples: usize,
    pub duplicate_tolerance: f64,
    time_vector: Arc<[f64]>,
    original: Arc<[f64]>,
}

impl ReferenceSignal {
    pub fn new(config: &SamplingConfig) -> Self {
        let time_vector = time_grid(config.time_end, config.time_step);
        let original: Arc<[f64]> = time_vector
            .iter()
            .map(|&t| sine(config.signal_frequency, t))
            .collect();
        ReferenceSignal {
            frequency: config.signal_frequency,
            time_end: config.time_end,
            max_samples: config.max_samples,
            duplicate_tolerance: config.duplicate_tolerance,
            time_vector,
            original,
        }
    }

    pub fn value_at(&self, t: f64) -> f64 {
        sine(self.frequency, t)
    }

    pub fn time_vector(&self) -> &[f64] {
        &self.time_vector
    }

    pub fn original_signal(&self) -> &[f64] {
        &self.original
    }

    /// `2 · f0`.
    pub fn nyquist_frequency(&self) -> f64 {
        2.0 * self.frequency
    }
}

fn sine(frequency: f64, t: f64) -> f64 {
    (2.0 * PI * frequency * t).sin()
}

/// `k · step` for `k = 0..=floor(end / step)`. Indexing avoids the drift of
/// repeated addition, so the endpoint is hit exactly when it lies on the grid.
///
/// At most [`MAX_GRID_INTERVALS`] steps are laid out; a finer grid stops short
/// of `end`.
fn time_grid(end: f64, step: f64) -> Arc<[f64]> {
    if !(end >= 0.0 && step > 0.0) {
        return Arc::from([0.0]);
    }
    let wanted = (end / step + 1e-9).floor();
    if wanted > MAX_GRID_INTERVALS as f64 {
        log::warn!("time grid of {wanted} steps capped at {MAX_GRID_INTERVALS}");
    }
    let last = (wanted as usize).min(MAX_GRID_INTERVALS);
    (0..=last).map(|k| (k as f64 * step).min(end)).collect()
}

// ── Sampling ────────────────────────────────────────────────

/// Sample instants and values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleSet {
    pub times: Vec<f64>,
    pub values: Vec<f64>,
    /// The sample cap stopped the walk before the end of the signal.
    pub truncated: bool,
}

/// Sample the reference from `t = 0` to `time_end` at period `1 / fs`.
///
/// The last instant is clamped to `time_end` when it overshoots by less
/// than half a period. Instants within `duplicate_tolerance` of the previous
/// one are skipped, and at most `max_samples` points are recorded.
/// Non-positive or non-finite `fs` yields no samples.
pub fn sample_signal(reference: &ReferenceSignal, fs: f64) -> SampleSet {
    let mut set = SampleSet::default();
    if !(fs > 0.0 && fs.is_finite()) {
        return set;
    }

    let ts = 1.0 / fs;
    if !ts.is_finite() {
        // Subnormal fs: the first period already runs past any time axis.
        set.times.push(0.0);
        set.values.push(reference.value_at(0.0));
        return set;
    }
    let end = reference.time_end;
    let tol = reference.duplicate_tolerance;
    let max = reference.max_samples;
    // Every recorded point costs at most a couple of candidates once skips
    // jump past the tolerance window.
    let budget = max.saturating_mul(4).saturating_add(4);

    let mut n: u64 = 0;
    for _ in 0..budget {
        let raw = n as f64 * ts;
        n = n.saturating_add(1);

        if raw > end + ts / 2.0 {
            break;
        }
        if raw > end && set.times.last().is_some_and(|&last| last >= end) {
            break;
        }
        let t = raw.min(end);
        if let Some(&last) = set.times.last() {
            if (t - last).abs() < tol {
                let clear = ((last + tol) / ts).ceil();
                n = n.max(clear as u64);
                continue;
            }
        }

        set.times.push(t);
        set.values.push(reference.value_at(t));
        if set.times.len() >= max {
            set.truncated = raw < end;
            break;
        }
    }

    if set.truncated {
        log::warn!(
            "sampling at {fs:.3} Hz hit the {max}-sample cap at t = {:.4}",
            set.times.last().copied().unwrap_or_default()
        );
    }
    set
}

/// Aliasing predicate: below Nyquist, or no usable sampling rate at all.
pub fn is_aliasing(fs: f64, nyquist: f64) -> bool {
    !(fs > 0.0) || fs < nyquist
}

/// Everything that depends on the sampling frequency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SamplingDerived {
    pub sampling_frequency: f64,
    pub sampled_time_points: Vec<f64>,
    pub sampled_values: Vec<f64>,
    pub reconstructed_signal: Vec<f64>,
    pub is_aliasing: bool,
    pub truncated: bool,
}

/// Sample the reference at `fs` and reconstruct it over its time grid.
pub fn compute_sampling(fs: f64, reference: &ReferenceSignal) -> SamplingDerived {
    let samples = sample_signal(reference, fs);
    let reconstructed_signal = if samples.times.is_empty() {
        vec![0.0; reference.time_vector().len()]
    } else {
        reconstruct(&samples.times, &samples.values, fs, reference.time_vector())
    };
    log::debug!(
        "resampled at {fs:.3} Hz: {} points, reconstruction over {} grid points",
        samples.times.len(),
        reconstructed_signal.len()
    );
    SamplingDerived {
        sampling_frequency: fs,
        is_aliasing: is_aliasing(fs, reference.nyquist_frequency()),
        sampled_time_points: samples.times,
        sampled_values: samples.values,
        reconstructed_signal,
        truncated: samples.truncated,
    }
}

/// Map a pointer x position on a canvas of `width` pixels to a sampling
/// frequency in `[fs_min, fs_max]`.
///
/// The position is clamped to the canvas before normalizing and the result
/// is clamped again. A non-finite position counts as the left edge. An
/// unusable width maps everything to `fs_min`.
pub fn frequency_for_position(position: f64, width: f64, fs_min: f64, fs_max: f64) -> f64 {
    let normalized = if width.is_finite() && width > 0.0 {
        // f64::max maps NaN to the other operand.
        position.max(0.0).min(width) / width
    } else {
        0.0
    };
    let fs = fs_min + normalized * (fs_max - fs_min);
    fs.max(fs_min).min(fs_max)
}

// ── Jobs ────────────────────────────────────────────────────

/// A self-contained recompute request. It can run on another thread; its
/// result is only applied if no newer request was issued meanwhile.
#[derive(Debug, Clone)]
pub struct SamplingJob {
    pub ticket: Ticket,
    pub fs: f64,
    reference: Arc<ReferenceSignal>,
}

impl SamplingJob {
    pub fn run(&self) -> SamplingDerived {
        compute_sampling(self.fs, &self.reference)
    }
}

// ── Control events ──────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SamplingEvent {
    PointerMoved { x: f64 },
    CanvasResized { width: f64, height: f64 },
}

// ── Engine ──────────────────────────────────────────────────

/// Owns the control inputs and the latest applied sampling result.
#[derive(Debug, Clone)]
pub struct SamplingEngine {
    config: SamplingConfig,
    reference: Arc<ReferenceSignal>,
    control_position: f64,
    canvas_width: f64,
    canvas_height: f64,
    derived: LatestSlot<SamplingDerived>,
}

impl SamplingEngine {
    pub fn new(config: SamplingConfig) -> Self {
        let reference = Arc::new(ReferenceSignal::new(&config));
        log::info!(
            "sampling reference: f0 = {} Hz, Nyquist = {} Hz, {} grid points",
            reference.frequency,
            reference.nyquist_frequency(),
            reference.time_vector().len()
        );
        let control_position = config.canvas_width / 2.0;
        let fs = frequency_for_position(control_position, config.canvas_width, config.fs_min, config.fs_max);
        let derived = LatestSlot::new(compute_sampling(fs, &reference));
        SamplingEngine {
            canvas_width: config.canvas_width,
            canvas_height: config.canvas_height,
            config,
            reference,
            control_position,
            derived,
        }
    }

    pub fn reference(&self) -> &ReferenceSignal {
        &self.reference
    }

    /// The most recently applied result.
    pub fn derived(&self) -> &SamplingDerived {
        self.derived.get()
    }

    pub fn control_position(&self) -> f64 {
        self.control_position
    }

    /// Sampling frequency the current inputs ask for. May be ahead of
    /// `derived().sampling_frequency` while a job is in flight.
    pub fn target_frequency(&self) -> f64 {
        frequency_for_position(
            self.control_position,
            self.canvas_width,
            self.config.fs_min,
            self.config.fs_max,
        )
    }

    pub fn set_control_position(&mut self, x: f64) -> &SamplingDerived {
        self.control_position = x;
        self.refresh()
    }

    /// Resize keeps the pointer's pixel position, so fs shifts with the width.
    pub fn set_canvas_width(&mut self, width: f64) -> &SamplingDerived {
        if !(width.is_finite() && width > 0.0) {
            log::warn!("canvas width {width} is unusable, falling back to fs_min");
        }
        self.canvas_width = width;
        self.refresh()
    }

    pub fn set_canvas_size(&mut self, width: f64, height: f64) -> &SamplingDerived {
        self.canvas_height = height;
        self.set_canvas_width(width)
    }

    pub fn apply(&mut self, event: SamplingEvent) -> &SamplingDerived {
        match event {
            SamplingEvent::PointerMoved { x } => self.set_control_position(x),
            SamplingEvent::CanvasResized { width, height } => self.set_canvas_size(width, height),
        }
    }

    /// Issue a job for the current inputs, superseding any in-flight job.
    pub fn request(&mut self) -> SamplingJob {
        SamplingJob {
            ticket: self.derived.issue(),
            fs: self.target_frequency(),
            reference: Arc::clone(&self.reference),
        }
    }

    /// Apply a finished job's result. Stale results are discarded.
    pub fn complete(&mut self, ticket: Ticket, result: SamplingDerived) -> bool {
        let accepted = self.derived.offer(ticket, result);
        if !accepted {
            log::warn!("discarding superseded sampling result {ticket:?}");
        }
        accepted
    }

    /// Recompute synchronously through the same request/complete path.
    pub fn refresh(&mut self) -> &SamplingDerived {
        let job = self.request();
        let result = job.run();
        self.complete(job.ticket, result);
        self.derived.get()
    }

    pub fn snapshot(&self) -> SamplingSnapshot<'_> {
        let derived = self.derived.get();
        SamplingSnapshot {
            time_vector: self.reference.time_vector(),
            original_signal: self.reference.original_signal(),
            sampled_time_points: &derived.sampled_time_points,
            sampled_values: &derived.sampled_values,
            reconstructed_signal: &derived.reconstructed_signal,
            sampling_frequency: derived.sampling_frequency,
            nyquist_frequency: self.reference.nyquist_frequency(),
            is_aliasing: derived.is_aliasing,
            canvas_width: self.canvas_width,
            canvas_height: self.canvas_height,
        }
    }
}

impl Default for SamplingEngine {
    fn default() -> Self {
        SamplingEngine::new(SamplingConfig::default())
    }
}

/// Borrowed view handed to the renderer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SamplingSnapshot<'a> {
    pub time_vector: &'a [f64],
    pub original_signal: &'a [f64],
    pub sampled_time_points: &'a [f64],
    pub sampled_values: &'a [f64],
    pub reconstructed_signal: &'a [f64],
    pub sampling_frequency: f64,
    pub nyquist_frequency: f64,
    pub is_aliasing: bool,
    pub canvas_width: f64,
    pub canvas_height: f64,
}
