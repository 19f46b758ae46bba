//! Primal/dual basis explorer.
//!
//! Given a primal basis `e1, e2` (the columns of `M`) and a probe vector in
//! standard coordinates, computes `det M`, `M⁻¹`, the dual basis (rows of
//! `M⁻¹`), and the probe's contravariant (primal) and covariant (dual)
//! components.
//!
//! A near-singular basis is not an error: the inverse-dependent fields are
//! NaN-filled and `invertible` is false. The covariant components are plain
//! projections and stay valid either way.

use serde::{Deserialize, Serialize};

use crate::config::BasisConfig;
use crate::linalg::{Mat2, Vec2};

/// Derived state of the basis explorer, rewritten in full on every update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BasisState {
    pub e1: Vec2,
    pub e2: Vec2,
    pub epsilon1: Vec2,
    pub epsilon2: Vec2,
    #[serde(rename = "detM")]
    pub det_m: f64,
    #[serde(rename = "M_inv")]
    pub m_inv: Mat2,
    pub v_std: Vec2,
    pub v_primal: Vec2,
    pub v_dual: Vec2,
    /// False when `|det M|` fell below the degeneracy threshold.
    pub invertible: bool,
}

impl BasisState {
    /// `M⁻¹`, if the basis was invertible.
    pub fn inverse(&self) -> Option<Mat2> {
        self.invertible.then_some(self.m_inv)
    }

    /// `(ε¹, ε²)`, if the basis was invertible.
    pub fn dual_basis(&self) -> Option<(Vec2, Vec2)> {
        self.invertible.then_some((self.epsilon1, self.epsilon2))
    }

    /// Contravariant components of the probe, if the basis was invertible.
    pub fn primal_components(&self) -> Option<Vec2> {
        self.invertible.then_some(self.v_primal)
    }

    /// Covariant components of the probe. Always defined.
    pub fn dual_components(&self) -> Vec2 {
        self.v_dual
    }
}

/// Compute the full derived state from the current inputs.
///
/// `threshold` is the degeneracy cutoff on `|det M|`.
pub fn recompute(e1: Vec2, e2: Vec2, v_std: Vec2, threshold: f64) -> BasisState {
    let m = Mat2::from_columns(e1, e2);
    let det_m = m.determinant();

    // Covariant components: projections onto the basis vectors.
    let v_dual = Vec2::new(v_std.dot(e1), v_std.dot(e2));

    match m.inverse(threshold) {
        Some(m_inv) => BasisState {
            e1,
            e2,
            epsilon1: m_inv.row(0),
            epsilon2: m_inv.row(1),
            det_m,
            m_inv,
            v_std,
            v_primal: m_inv.mul_vec(v_std),
            v_dual,
            invertible: true,
        },
        None => BasisState {
            e1,
            e2,
            epsilon1: Vec2::NAN,
            epsilon2: Vec2::NAN,
            det_m,
            m_inv: Mat2::NAN,
            v_std,
            v_primal: Vec2::NAN,
            v_dual,
            invertible: false,
        },
    }
}

// ── Control events ──────────────────────────────────────────

/// Which primal basis vector a control addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BasisVector {
    E1,
    E2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
}

/// A control change emitted by the UI layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BasisEvent {
    /// A basis-vector slider moved.
    Component {
        vector: BasisVector,
        axis: Axis,
        value: f64,
    },
    /// A probe-vector slider moved.
    Probe { axis: Axis, value: f64 },
    /// Restore the standard basis.
    Reset,
}

// ── Engine ──────────────────────────────────────────────────

/// Owns the basis inputs and the derived state.
///
/// Every mutation path ends in [`BasisEngine::refresh`], so the state is
/// always consistent with the current `e1`, `e2` and probe.
#[derive(Debug, Clone)]
pub struct BasisEngine {
    config: BasisConfig,
    e1: Vec2,
    e2: Vec2,
    v_std: Vec2,
    state: BasisState,
}

impl BasisEngine {
    pub fn new(config: BasisConfig) -> Self {
        let e1 = Vec2::new(1.0, 0.0);
        let e2 = Vec2::new(0.0, 1.0);
        let v_std = config.default_probe;
        let state = recompute(e1, e2, v_std, config.degeneracy_threshold);
        BasisEngine {
            config,
            e1,
            e2,
            v_std,
            state,
        }
    }

    pub fn state(&self) -> &BasisState {
        &self.state
    }

    pub fn config(&self) -> &BasisConfig {
        &self.config
    }

    pub fn set_basis(&mut self, e1: Vec2, e2: Vec2) -> &BasisState {
        self.e1 = e1;
        self.e2 = e2;
        self.refresh()
    }

    pub fn set_e1(&mut self, e1: Vec2) -> &BasisState {
        self.e1 = e1;
        self.refresh()
    }

    pub fn set_e2(&mut self, e2: Vec2) -> &BasisState {
        self.e2 = e2;
        self.refresh()
    }

    pub fn set_probe(&mut self, v_std: Vec2) -> &BasisState {
        self.v_std = v_std;
        self.refresh()
    }

    /// Back to the standard basis. The probe is left alone.
    pub fn reset(&mut self) -> &BasisState {
        self.e1 = Vec2::new(1.0, 0.0);
        self.e2 = Vec2::new(0.0, 1.0);
        self.refresh()
    }

    /// Apply a UI control event. Slider values are snapped to their range.
    pub fn apply(&mut self, event: BasisEvent) -> &BasisState {
        match event {
            BasisEvent::Component {
                vector,
                axis,
                value,
            } => {
                let value = self.config.component_range.snap(value);
                let target = match vector {
                    BasisVector::E1 => &mut self.e1,
                    BasisVector::E2 => &mut self.e2,
                };
                set_axis(target, axis, value);
                self.refresh()
            }
            BasisEvent::Probe { axis, value } => {
                let value = self.config.probe_range.snap(value);
                set_axis(&mut self.v_std, axis, value);
                self.refresh()
            }
            BasisEvent::Reset => self.reset(),
        }
    }

    /// Recompute everything from the stored inputs.
    pub fn refresh(&mut self) -> &BasisState {
        let was_invertible = self.state.invertible;
        self.state = recompute(self.e1, self.e2, self.v_std, self.config.degeneracy_threshold);
        if was_invertible != self.state.invertible {
            log::debug!(
                "basis became {} (det M = {:.6})",
                if self.state.invertible { "invertible" } else { "degenerate" },
                self.state.det_m
            );
        }
        &self.state
    }
}

impl Default for BasisEngine {
    fn default() -> Self {
        BasisEngine::new(BasisConfig::default())
    }
}

fn set_axis(v: &mut Vec2, axis: Axis, value: f64) {
    match axis {
        Axis::X => v.x = value,
        Axis::Y => v.y = value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ControlRange;

    const EPS: f64 = 1e-3;
    const TOL: f64 = 1e-6;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < TOL
    }

    fn sample_bases() -> Vec<(Vec2, Vec2)> {
        vec![
            (Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)),
            (Vec2::new(2.0, 1.0), Vec2::new(-0.5, 1.5)),
            (Vec2::new(-1.3, 0.4), Vec2::new(0.7, 1.9)),
            (Vec2::new(0.1, 0.0), Vec2::new(0.0, 0.1)),
            (Vec2::new(2.0, 2.0), Vec2::new(-2.0, 1.9)),
            (Vec2::new(0.0, -1.0), Vec2::new(1.0, 0.0)),
        ]
    }

    #[test]
    fn determinant_matches_formula() {
        for (e1, e2) in sample_bases() {
            let s = recompute(e1, e2, Vec2::new(0.3, -0.2), EPS);
            assert_eq!(s.det_m, e1.x * e2.y - e1.y * e2.x);
        }
    }

    #[test]
    fn inverse_roundtrip_both_sides() {
        for (e1, e2) in sample_bases() {
            let s = recompute(e1, e2, Vec2::default(), EPS);
            assert!(s.invertible);
            let m = Mat2::from_columns(e1, e2);
            for prod in [m.mul(&s.m_inv), s.m_inv.mul(&m)] {
                for i in 0..2 {
                    for j in 0..2 {
                        let expected = if i == j { 1.0 } else { 0.0 };
                        assert!(
                            close(prod.0[i][j], expected),
                            "M·M⁻¹ not identity for {e1:?}, {e2:?}: {prod:?}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn dual_basis_is_biorthogonal() {
        for (e1, e2) in sample_bases() {
            let s = recompute(e1, e2, Vec2::default(), EPS);
            assert!(close(s.epsilon1.dot(e1), 1.0));
            assert!(close(s.epsilon1.dot(e2), 0.0));
            assert!(close(s.epsilon2.dot(e1), 0.0));
            assert!(close(s.epsilon2.dot(e2), 1.0));
        }
    }

    #[test]
    fn primal_components_reconstruct_probe() {
        let e1 = Vec2::new(2.0, 1.0);
        let e2 = Vec2::new(-0.5, 1.5);
        let v = Vec2::new(1.25, -3.0);
        let s = recompute(e1, e2, v, EPS);
        let back = Vec2::new(
            s.v_primal.x * e1.x + s.v_primal.y * e2.x,
            s.v_primal.x * e1.y + s.v_primal.y * e2.y,
        );
        assert!(close(back.x, v.x) && close(back.y, v.y));
    }

    #[test]
    fn parallel_basis_is_degenerate() {
        let v = Vec2::new(3.0, 4.0);
        let s = recompute(Vec2::new(1.0, 0.0), Vec2::new(2.0, 0.0), v, EPS);
        assert_eq!(s.det_m, 0.0);
        assert!(!s.invertible);
        assert!(s.m_inv.is_nan());
        assert!(s.epsilon1.is_nan() && s.epsilon2.is_nan());
        assert!(s.v_primal.is_nan());
        assert!(s.v_dual.is_finite());
        assert_eq!(s.v_dual, Vec2::new(3.0, 6.0));
        assert_eq!(s.inverse(), None);
        assert_eq!(s.dual_basis(), None);
        assert_eq!(s.primal_components(), None);
        assert_eq!(s.dual_components(), Vec2::new(3.0, 6.0));
    }

    #[test]
    fn zero_basis_does_not_panic() {
        let s = recompute(Vec2::default(), Vec2::default(), Vec2::new(1.0, 1.0), EPS);
        assert!(!s.invertible);
        assert_eq!(s.v_dual, Vec2::new(0.0, 0.0));
    }

    #[test]
    fn threshold_boundary() {
        // det = 0.001 exactly is still invertible; just below is not.
        let at = recompute(Vec2::new(0.001, 0.0), Vec2::new(0.0, 1.0), Vec2::default(), EPS);
        assert!(at.invertible);
        let below = recompute(Vec2::new(0.000999, 0.0), Vec2::new(0.0, 1.0), Vec2::default(), EPS);
        assert!(!below.invertible);
    }

    #[test]
    fn identity_scenario() {
        let s = recompute(Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0), Vec2::new(3.0, 4.0), EPS);
        assert_eq!(s.det_m, 1.0);
        assert_eq!(s.m_inv, Mat2::IDENTITY);
        assert_eq!(s.v_primal, Vec2::new(3.0, 4.0));
        assert_eq!(s.v_dual, Vec2::new(3.0, 4.0));
        assert_eq!(s.primal_components(), Some(Vec2::new(3.0, 4.0)));
    }

    #[test]
    fn probe_change_uses_current_basis() {
        let mut engine = BasisEngine::default();
        engine.set_basis(Vec2::new(1.0, 0.0), Vec2::new(2.0, 0.0));
        let s = *engine.set_probe(Vec2::new(2.0, 5.0));
        assert!(!s.invertible);
        assert!(s.v_primal.is_nan());
        assert_eq!(s.v_dual, Vec2::new(2.0, 4.0));

        engine.set_e2(Vec2::new(0.0, 2.0));
        let s = *engine.set_probe(Vec2::new(2.0, 4.0));
        assert!(s.invertible);
        assert!(close(s.v_primal.x, 2.0) && close(s.v_primal.y, 2.0));
    }

    #[test]
    fn every_update_rewrites_all_fields() {
        let mut engine = BasisEngine::default();
        let before = *engine.set_probe(Vec2::new(1.0, 2.0));
        let after = *engine.set_e1(Vec2::new(2.0, 0.0));
        assert_eq!(after, recompute(Vec2::new(2.0, 0.0), Vec2::new(0.0, 1.0), Vec2::new(1.0, 2.0), EPS));
        assert_ne!(before.epsilon1, after.epsilon1);
    }

    #[test]
    fn engine_starts_at_identity() {
        let engine = BasisEngine::default();
        let s = engine.state();
        assert_eq!(s.e1, Vec2::new(1.0, 0.0));
        assert_eq!(s.e2, Vec2::new(0.0, 1.0));
        assert_eq!(s.v_std, BasisConfig::default().default_probe);
        assert!(s.invertible);
    }

    #[test]
    fn events_snap_and_reset() {
        let mut engine = BasisEngine::default();
        engine.apply(BasisEvent::Component {
            vector: BasisVector::E1,
            axis: Axis::Y,
            value: 0.46,
        });
        engine.apply(BasisEvent::Component {
            vector: BasisVector::E2,
            axis: Axis::X,
            value: 7.0,
        });
        let s = *engine.state();
        assert!(close(s.e1.y, 0.5));
        assert_eq!(s.e2.x, 2.0);

        engine.apply(BasisEvent::Probe {
            axis: Axis::X,
            value: -1.04,
        });
        assert!(close(engine.state().v_std.x, -1.0));

        let s = *engine.apply(BasisEvent::Reset);
        assert_eq!(s.e1, Vec2::new(1.0, 0.0));
        assert_eq!(s.e2, Vec2::new(0.0, 1.0));
        assert!(close(s.v_std.x, -1.0));
    }

    #[test]
    fn swapped_slider_bounds_still_snap() {
        let mut engine = BasisEngine::new(BasisConfig {
            component_range: ControlRange::new(2.0, -2.0, 0.1),
            probe_range: ControlRange::new(4.0, -4.0, 0.1),
            ..BasisConfig::default()
        });
        let s = *engine.apply(BasisEvent::Component {
            vector: BasisVector::E1,
            axis: Axis::X,
            value: 3.0,
        });
        assert_eq!(s.e1.x, 2.0);
        assert!(s.invertible);
        let s = *engine.apply(BasisEvent::Probe {
            axis: Axis::Y,
            value: -4.5,
        });
        assert_eq!(s.v_std.y, -4.0);
    }

    #[test]
    fn configured_threshold_is_honoured() {
        let config = BasisConfig {
            degeneracy_threshold: 0.5,
            ..BasisConfig::default()
        };
        let mut engine = BasisEngine::new(config);
        let s = engine.set_basis(Vec2::new(0.6, 0.0), Vec2::new(0.0, 0.6));
        assert!(!s.invertible, "det 0.36 is below the 0.5 threshold");
    }

    #[test]
    fn snapshot_field_names() {
        let s = recompute(Vec2::new(1.0, 0.0), Vec2::new(2.0, 0.0), Vec2::new(1.0, 1.0), EPS);
        let json = serde_json::to_value(s).unwrap();
        for key in ["e1", "e2", "epsilon1", "epsilon2", "detM", "M_inv", "v_std", "v_primal", "v_dual", "invertible"] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
        // serde_json writes NaN as null
        assert!(json["epsilon1"]["x"].is_null());
        assert_eq!(json["v_dual"]["y"], 2.0);
    }

    #[test]
    fn event_json_shape() {
        let event: BasisEvent =
            serde_json::from_str(r#"{ "type": "component", "vector": "e2", "axis": "y", "value": 1.5 }"#).unwrap();
        assert_eq!(
            event,
            BasisEvent::Component {
                vector: BasisVector::E2,
                axis: Axis::Y,
                value: 1.5
            }
        );
        let reset: BasisEvent = serde_json::from_str(r#"{ "type": "reset" }"#).unwrap();
        assert_eq!(reset, BasisEvent::Reset);
    }
}
