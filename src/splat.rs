use glam::*;

use crate::{
    RawRecord, ReconstructError,
    layout::{SH_KEPT_LEN, SH_KEPT_PER_CHANNEL, SH_REST_PER_CHANNEL},
};

/// The zeroth order SH normalization constant.
pub const SH_C0: f32 = 0.282_094_8;

/// The decoded splat.
///
/// This is the render-ready form of a [`RawRecord`], produced by [`Splat::reconstruct`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Splat {
    pub position: Vec3,
    /// Unit quaternion.
    pub rotation: Quat,
    pub scale: Vec3,
    /// Upper triangle of the 3D covariance, `[00, 01, 02, 11, 12, 22]`.
    pub covariance: [f32; 6],
    /// In (0, 1).
    pub opacity: f32,
    /// The DC term followed by the first three higher order coefficients, each as RGB.
    pub sh: [Vec3; SH_KEPT_PER_CHANNEL],
}

impl Splat {
    /// Reconstruct from a [`RawRecord`].
    pub fn reconstruct(record: &RawRecord) -> Result<Self, ReconstructError> {
        // Position
        let position = Vec3::from_array(record.pos);

        // Rotation
        let [w, x, y, z] = record.rot;
        // f64, so the sum of squares of any finite f32 neither overflows nor underflows.
        let raw = Vec4::new(x, y, z, w).as_dvec4();
        let norm = raw.length();
        if norm == 0.0 {
            return Err(ReconstructError::DegenerateRotation);
        }
        let rotation = Quat::from_vec4((raw / norm).as_vec4());

        // Scale
        let scale = Vec3::from_array(record.scale).exp();

        // Covariance
        let covariance = covariance_from_rot_scale(rotation, scale);

        // Opacity
        let opacity = sigmoid(record.opacity);

        // Spherical harmonics
        let sh = std::array::from_fn(|i| match i {
            0 => Vec3::from_array(record.sh_dc),
            i => Vec3::new(
                record.sh_rest[i - 1],
                record.sh_rest[i - 1 + SH_REST_PER_CHANNEL],
                record.sh_rest[i - 1 + 2 * SH_REST_PER_CHANNEL],
            ),
        });

        Ok(Self {
            position,
            rotation,
            scale,
            covariance,
            opacity,
            sh,
        })
    }

    /// Get the view independent base color from the DC term.
    ///
    /// The result is not clamped to `[0, 1]`.
    pub fn base_color(&self) -> Vec3 {
        Vec3::splat(0.5) + self.sh[0] * SH_C0
    }

    /// Get the product of the scale components.
    pub fn volume(&self) -> f32 {
        self.scale.element_product()
    }

    /// Get the SH coefficients flattened as `[k0.r, k0.g, k0.b, k1.r, ...]`.
    pub fn sh_coefficients(&self) -> [f32; SH_KEPT_LEN] {
        std::array::from_fn(|i| self.sh[i / 3][i % 3])
    }

    /// Get the full symmetric covariance matrix.
    pub fn covariance_matrix(&self) -> Mat3 {
        let [xx, xy, xz, yy, yz, zz] = self.covariance;
        Mat3::from_cols(
            Vec3::new(xx, xy, xz),
            Vec3::new(xy, yy, yz),
            Vec3::new(xz, yz, zz),
        )
    }
}

impl TryFrom<&RawRecord> for Splat {
    type Error = ReconstructError;

    fn try_from(record: &RawRecord) -> Result<Self, Self::Error> {
        Self::reconstruct(record)
    }
}

impl TryFrom<RawRecord> for Splat {
    type Error = ReconstructError;

    fn try_from(record: RawRecord) -> Result<Self, Self::Error> {
        Self::reconstruct(&record)
    }
}

/// Compute the upper triangle of `R * S * (R * S)^T`.
pub fn covariance_from_rot_scale(rot: Quat, scale: Vec3) -> [f32; 6] {
    let r = Mat3::from_quat(rot);
    let s = Mat3::from_diagonal(scale);
    let m = r * s;
    let sigma = m * m.transpose();

    [
        sigma.x_axis.x,
        sigma.x_axis.y,
        sigma.x_axis.z,
        sigma.y_axis.y,
        sigma.y_axis.z,
        sigma.z_axis.z,
    ]
}

/// Logistic activation, kept strictly inside (0, 1) under [`prim@f32`] rounding.
pub fn sigmoid(x: f32) -> f32 {
    const MAX_BELOW_ONE: f32 = 1.0 - f32::EPSILON / 2.0;

    (1.0 / (1.0 + (-x).exp())).clamp(f32::MIN_POSITIVE, MAX_BELOW_ONE)
}
