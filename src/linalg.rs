//! Minimal 2D vector and 2×2 matrix types for the basis explorer.

use serde::{Deserialize, Serialize};

/// A 2D vector serialized as `{ "x": .., "y": .. }`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    /// Both components NaN: the "undefined, do not draw" sentinel.
    pub const NAN: Vec2 = Vec2 {
        x: f64::NAN,
        y: f64::NAN,
    };

    pub const fn new(x: f64, y: f64) -> Self {
        Vec2 { x, y }
    }

    pub fn dot(self, other: Vec2) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// True when neither component is NaN or infinite.
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn is_nan(self) -> bool {
        self.x.is_nan() || self.y.is_nan()
    }
}

/// A 2×2 matrix stored row-major, serialized as `[[a, b], [c, d]]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Mat2(pub [[f64; 2]; 2]);

impl Mat2 {
    pub const IDENTITY: Mat2 = Mat2([[1.0, 0.0], [0.0, 1.0]]);
    pub const NAN: Mat2 = Mat2([[f64::NAN, f64::NAN], [f64::NAN, f64::NAN]]);

    /// Build a matrix whose columns are `c1` and `c2`.
    pub fn from_columns(c1: Vec2, c2: Vec2) -> Self {
        Mat2([[c1.x, c2.x], [c1.y, c2.y]])
    }

    pub fn row(&self, i: usize) -> Vec2 {
        Vec2::new(self.0[i][0], self.0[i][1])
    }

    pub fn determinant(&self) -> f64 {
        let [[a, b], [c, d]] = self.0;
        a * d - b * c
    }

    /// Adjugate-based inverse. Returns `None` when `|det| < threshold`.
    pub fn inverse(&self, threshold: f64) -> Option<Mat2> {
        let det = self.determinant();
        if !(det.abs() >= threshold) {
            return None;
        }
        let inv_det = 1.0 / det;
        let [[a, b], [c, d]] = self.0;
        Some(Mat2([
            [inv_det * d, inv_det * -b],
            [inv_det * -c, inv_det * a],
        ]))
    }

    pub fn mul_vec(&self, v: Vec2) -> Vec2 {
        Vec2::new(self.row(0).dot(v), self.row(1).dot(v))
    }

    pub fn mul(&self, other: &Mat2) -> Mat2 {
        let a = &self.0;
        let b = &other.0;
        let mut out = [[0.0; 2]; 2];
        for (i, row) in out.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = a[i][0] * b[0][j] + a[i][1] * b[1][j];
            }
        }
        Mat2(out)
    }

    pub fn is_nan(&self) -> bool {
        self.0.iter().flatten().any(|v| v.is_nan())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_layout() {
        let m = Mat2::from_columns(Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0));
        assert_eq!(m.0, [[1.0, 3.0], [2.0, 4.0]]);
        assert_eq!(m.determinant(), -2.0);
    }

    #[test]
    fn inverse_roundtrip() {
        let m = Mat2([[2.0, 1.0], [-0.5, 1.5]]);
        let inv = m.inverse(1e-3).expect("invertible");
        let id = m.mul(&inv);
        for i in 0..2 {
            for j in 0..2 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((id.0[i][j] - expected).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn inverse_rejects_near_singular() {
        let m = Mat2([[1.0, 2.0], [0.0, 0.0005]]);
        assert!(m.inverse(1e-3).is_none());
        assert!(m.inverse(1e-4).is_some());
    }

    #[test]
    fn inverse_rejects_nan_determinant() {
        let m = Mat2([[f64::NAN, 0.0], [0.0, 1.0]]);
        assert!(m.inverse(1e-3).is_none());
    }

    #[test]
    fn nan_sentinels() {
        assert!(Vec2::NAN.is_nan());
        assert!(!Vec2::NAN.is_finite());
        assert!(Mat2::NAN.is_nan());
        assert!(!Mat2::IDENTITY.is_nan());
    }
}
