use thiserror::Error;

/// Determinants below this magnitude are treated as a collapsed cell.
const SINGULAR_EPS: f64 = 1e-8;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LatticeError {
    #[error("lattice matrix contains a non-finite component")]
    NonFinite,
    #[error("lattice vectors are linearly dependent (determinant {0:.3e})")]
    Singular(f64),
}

/// Periodic cell described by three row vectors `a`, `b`, `c` in Å.
#[derive(Debug, Clone, PartialEq)]
pub struct Lattice {
    matrix: [[f64; 3]; 3],
    inverse: [[f64; 3]; 3],
}

impl Lattice {
    pub fn new(matrix: [[f64; 3]; 3]) -> Result<Self, LatticeError> {
        if matrix.iter().flatten().any(|v| !v.is_finite()) {
            return Err(LatticeError::NonFinite);
        }

        let det = determinant(&matrix);
        if det.abs() < SINGULAR_EPS {
            return Err(LatticeError::Singular(det));
        }

        Ok(Self {
            matrix,
            inverse: invert(&matrix, det),
        })
    }

    #[inline]
    pub fn matrix(&self) -> &[[f64; 3]; 3] {
        &self.matrix
    }

    pub fn determinant(&self) -> f64 {
        determinant(&self.matrix)
    }

    pub fn volume(&self) -> f64 {
        self.determinant().abs()
    }

    pub fn lengths(&self) -> [f64; 3] {
        self.matrix.map(|v| norm(&v))
    }

    /// Cell angles `(alpha, beta, gamma)` in degrees.
    pub fn angles(&self) -> [f64; 3] {
        let [a, b, c] = &self.matrix;
        [angle_between(b, c), angle_between(a, c), angle_between(a, b)]
    }

    pub fn to_cartesian(&self, frac: [f64; 3]) -> [f64; 3] {
        let m = &self.matrix;
        std::array::from_fn(|k| frac[0] * m[0][k] + frac[1] * m[1][k] + frac[2] * m[2][k])
    }

    pub fn to_fractional(&self, cart: [f64; 3]) -> [f64; 3] {
        let inv = &self.inverse;
        std::array::from_fn(|k| cart[0] * inv[0][k] + cart[1] * inv[1][k] + cart[2] * inv[2][k])
    }

    /// The same cell with every vector reversed, which flips the handedness.
    pub fn negated(&self) -> Self {
        let flip = |m: &[[f64; 3]; 3]| m.map(|row| row.map(|v| -v));
        Self {
            matrix: flip(&self.matrix),
            inverse: flip(&self.inverse),
        }
    }
}

fn determinant(m: &[[f64; 3]; 3]) -> f64 {
    m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
        - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
}

fn invert(m: &[[f64; 3]; 3], det: f64) -> [[f64; 3]; 3] {
    let cof = |r0: usize, r1: usize, c0: usize, c1: usize| m[r0][c0] * m[r1][c1] - m[r0][c1] * m[r1][c0];
    [
        [cof(1, 2, 1, 2) / det, -cof(0, 2, 1, 2) / det, cof(0, 1, 1, 2) / det],
        [-cof(1, 2, 0, 2) / det, cof(0, 2, 0, 2) / det, -cof(0, 1, 0, 2) / det],
        [cof(1, 2, 0, 1) / det, -cof(0, 2, 0, 1) / det, cof(0, 1, 0, 1) / det],
    ]
}

fn norm(v: &[f64; 3]) -> f64 {
    (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
}

fn angle_between(u: &[f64; 3], v: &[f64; 3]) -> f64 {
    let dot = u[0] * v[0] + u[1] * v[1] + u[2] * v[2];
    (dot / (norm(u) * norm(v))).clamp(-1.0, 1.0).acos().to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() <= eps
    }

    fn hexagonal() -> Lattice {
        Lattice::new([
            [1.5957990235943282, -2.764004284915705, 0.0],
            [1.5957990235946695, 2.7640042849149173, 0.0],
            [0.0, 0.0, 12.47890117404454],
        ])
        .unwrap()
    }

    #[test]
    fn rejects_singular_matrix() {
        let err = Lattice::new([[1.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 0.0, 1.0]]).unwrap_err();
        assert!(matches!(err, LatticeError::Singular(_)));
    }

    #[test]
    fn rejects_non_finite_matrix() {
        let err = Lattice::new([[f64::NAN, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]).unwrap_err();
        assert_eq!(err, LatticeError::NonFinite);
    }

    #[test]
    fn cubic_volume_lengths_and_angles() {
        let lattice = Lattice::new([[4.0, 0.0, 0.0], [0.0, 4.0, 0.0], [0.0, 0.0, 4.0]]).unwrap();
        assert!(approx_eq(lattice.volume(), 64.0, 1e-12));
        assert_eq!(lattice.lengths(), [4.0, 4.0, 4.0]);
        for angle in lattice.angles() {
            assert!(approx_eq(angle, 90.0, 1e-9));
        }
    }

    #[test]
    fn hexagonal_gamma_is_120_degrees() {
        let [alpha, beta, gamma] = hexagonal().angles();
        assert!(approx_eq(alpha, 90.0, 1e-6));
        assert!(approx_eq(beta, 90.0, 1e-6));
        assert!(approx_eq(gamma, 120.0, 1e-6));
    }

    #[test]
    fn fractional_and_cartesian_conversions_invert_each_other() {
        let lattice = hexagonal();
        let frac = [1.0 / 3.0, 2.0 / 3.0, 0.25];
        let cart = lattice.to_cartesian(frac);
        let back = lattice.to_fractional(cart);
        for k in 0..3 {
            assert!(approx_eq(frac[k], back[k], 1e-12));
        }
    }

    #[test]
    fn negated_flips_determinant_sign() {
        let lattice = hexagonal();
        let flipped = lattice.negated();
        assert!(approx_eq(flipped.determinant(), -lattice.determinant(), 1e-9));
        let cart = flipped.to_cartesian([0.5, 0.0, 0.0]);
        assert!(approx_eq(cart[0], -0.7978995117971641, 1e-12));
    }
}
