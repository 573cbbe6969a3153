use std::io::Write;

use glam::*;
use serde::{Deserialize, Serialize};

use crate::{DatasetError, Splat, layout::SH_KEPT_LEN};

/// The number of position values per splat.
pub const POSITION_LEN: usize = 3;

/// The number of covariance values per splat.
pub const COV3D_LEN: usize = 6;

/// The flattened, index aligned splat dataset.
///
/// Splat `i` occupies `opacities[i]`, `positions[3i..3i + 3]`, `cov3ds[6i..6i + 6]` and
/// `sh_coefficients[12i..12i + 12]`. A dataset can not be modified after assembly.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dataset {
    opacities: Vec<f32>,
    sh_coefficients: Vec<f32>,
    positions: Vec<f32>,
    cov3ds: Vec<f32>,
    gaussian_count: usize,
}

impl Dataset {
    /// Assemble from splats, preserving their order.
    pub fn from_splats(splats: &[Splat]) -> Self {
        let n = splats.len();
        let mut dataset = Self {
            opacities: Vec::with_capacity(n),
            sh_coefficients: Vec::with_capacity(n * SH_KEPT_LEN),
            positions: Vec::with_capacity(n * POSITION_LEN),
            cov3ds: Vec::with_capacity(n * COV3D_LEN),
            gaussian_count: 0,
        };
        splats.iter().for_each(|splat| dataset.push(splat));
        dataset
    }

    fn push(&mut self, splat: &Splat) {
        self.opacities.push(splat.opacity);
        self.sh_coefficients.extend_from_slice(&splat.sh_coefficients());
        self.positions.extend_from_slice(&splat.position.to_array());
        self.cov3ds.extend_from_slice(&splat.covariance);
        self.gaussian_count += 1;
    }

    /// Get the opacities, one per splat.
    pub fn opacities(&self) -> &[f32] {
        &self.opacities
    }

    /// Get the SH coefficients, [`SH_KEPT_LEN`] per splat.
    pub fn sh_coefficients(&self) -> &[f32] {
        &self.sh_coefficients
    }

    /// Get the positions, [`POSITION_LEN`] per splat.
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    /// Get the covariance upper triangles, [`COV3D_LEN`] per splat.
    pub fn cov3ds(&self) -> &[f32] {
        &self.cov3ds
    }

    /// Get the number of splats.
    pub fn len(&self) -> usize {
        self.gaussian_count
    }

    /// Check if there are no splats.
    pub fn is_empty(&self) -> bool {
        self.gaussian_count == 0
    }

    /// Get the axis aligned bounds of the positions as `(min, max)`.
    ///
    /// Returns [`None`] if the dataset is empty.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        self.positions
            .chunks_exact(POSITION_LEN)
            .map(Vec3::from_slice)
            .fold(None, |bounds, pos| match bounds {
                None => Some((pos, pos)),
                Some((min, max)) => Some((min.min(pos), max.max(pos))),
            })
    }

    /// Write the dataset as JSON to a file.
    ///
    /// The file is not created if the dataset is not finite, see [`Dataset::write_json`].
    pub fn write_json_file(
        &self,
        path: impl AsRef<std::path::Path>,
        pretty: bool,
    ) -> Result<(), DatasetError> {
        self.check_finite()?;

        let file = std::fs::File::create(path)?;
        let mut writer = std::io::BufWriter::new(file);
        self.serialize_json(&mut writer, pretty)?;
        writer.flush()?;
        Ok(())
    }

    /// Write the dataset as JSON.
    ///
    /// Fails with [`DatasetError::NonFinite`] if any value is NaN or infinite, JSON has no
    /// representation for them.
    pub fn write_json(&self, writer: &mut impl Write, pretty: bool) -> Result<(), DatasetError> {
        self.check_finite()?;
        self.serialize_json(writer, pretty)
    }

    fn serialize_json(&self, writer: &mut impl Write, pretty: bool) -> Result<(), DatasetError> {
        match pretty {
            true => serde_json::to_writer_pretty(writer, self)?,
            false => serde_json::to_writer(writer, self)?,
        }
        Ok(())
    }

    /// Find the first value, in field order, that is not finite.
    fn check_finite(&self) -> Result<(), DatasetError> {
        [
            ("opacities", &self.opacities, 1),
            ("sh_coefficients", &self.sh_coefficients, SH_KEPT_LEN),
            ("positions", &self.positions, POSITION_LEN),
            ("cov3ds", &self.cov3ds, COV3D_LEN),
        ]
        .into_iter()
        .try_for_each(|(field, values, stride)| {
            match values.iter().position(|value| !value.is_finite()) {
                Some(i) => Err(DatasetError::NonFinite {
                    field,
                    index: i / stride,
                }),
                None => Ok(()),
            }
        })
    }

    /// Read a dataset from a JSON file.
    pub fn read_json_file(path: impl AsRef<std::path::Path>) -> Result<Self, DatasetError> {
        let bytes = std::fs::read(path)?;
        Self::from_json_slice(&bytes)
    }

    /// Read a dataset from JSON.
    ///
    /// Fails with [`DatasetError::LengthMismatch`] if a sequence does not match `gaussian_count`.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, DatasetError> {
        let fields = serde_json::from_slice::<DatasetFields>(bytes)?;
        let n = fields.gaussian_count;

        [
            ("opacities", fields.opacities.len(), n),
            ("sh_coefficients", fields.sh_coefficients.len(), n * SH_KEPT_LEN),
            ("positions", fields.positions.len(), n * POSITION_LEN),
            ("cov3ds", fields.cov3ds.len(), n * COV3D_LEN),
        ]
        .into_iter()
        .try_for_each(|(field, len, expected)| match len == expected {
            true => Ok(()),
            false => Err(DatasetError::LengthMismatch {
                field,
                len,
                expected,
            }),
        })?;

        Ok(Self {
            opacities: fields.opacities,
            sh_coefficients: fields.sh_coefficients,
            positions: fields.positions,
            cov3ds: fields.cov3ds,
            gaussian_count: n,
        })
    }
}

impl FromIterator<Splat> for Dataset {
    fn from_iter<T: IntoIterator<Item = Splat>>(iter: T) -> Self {
        let mut dataset = Self::default();
        iter.into_iter().for_each(|splat| dataset.push(&splat));
        dataset
    }
}

impl From<&[Splat]> for Dataset {
    fn from(splats: &[Splat]) -> Self {
        Self::from_splats(splats)
    }
}

/// Unvalidated [`Dataset`] document.
#[derive(Deserialize)]
struct DatasetFields {
    opacities: Vec<f32>,
    sh_coefficients: Vec<f32>,
    positions: Vec<f32>,
    cov3ds: Vec<f32>,
    gaussian_count: usize,
}
