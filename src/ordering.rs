use itertools::Itertools;

use crate::Splat;

/// The order of splats in the assembled [`Dataset`](crate::Dataset).
///
/// Every strategy sorts by descending key. Ties keep their input order.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SplatOrder {
    /// Keep file order.
    #[default]
    None,

    /// By [`Splat::volume`].
    BySize,

    /// By the luma of [`Splat::base_color`].
    ByBrightness,

    /// By [`Splat::opacity`].
    ByOpacity,
}

impl SplatOrder {
    /// All the variants.
    pub const ALL: [Self; 4] = [
        Self::None,
        Self::BySize,
        Self::ByBrightness,
        Self::ByOpacity,
    ];

    /// Get the name used on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::BySize => "size",
            Self::ByBrightness => "brightness",
            Self::ByOpacity => "opacity",
        }
    }

    /// Get the sort key of a splat, [`None`] for [`SplatOrder::None`].
    pub fn key(&self, splat: &Splat) -> Option<f32> {
        match self {
            Self::None => None,
            Self::BySize => Some(splat.volume()),
            Self::ByBrightness => Some(luma(splat.base_color().to_array())),
            Self::ByOpacity => Some(splat.opacity),
        }
    }

    /// Compute the permutation of `0..splats.len()` for this order.
    ///
    /// `permutation[i]` is the input index of the splat placed at `i`.
    pub fn permutation(&self, splats: &[Splat]) -> Vec<usize> {
        let Some(keys) = splats
            .iter()
            .map(|splat| self.key(splat))
            .collect::<Option<Vec<_>>>()
        else {
            return (0..splats.len()).collect();
        };

        (0..splats.len())
            .sorted_by(|&a, &b| keys[b].total_cmp(&keys[a]))
            .collect()
    }

    /// Reorder the splats.
    pub fn apply(&self, splats: Vec<Splat>) -> Vec<Splat> {
        match self {
            Self::None => splats,
            _ => permute(&splats, &self.permutation(&splats)),
        }
    }
}

impl std::fmt::Display for SplatOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for SplatOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|order| order.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                format!(
                    "unknown order {s:?}, expected one of: {}",
                    Self::ALL.iter().join(", ")
                )
            })
    }
}

/// Gather `items` by `permutation`.
pub fn permute<T: Copy>(items: &[T], permutation: &[usize]) -> Vec<T> {
    permutation.iter().map(|&i| items[i]).collect()
}

/// Rec. 601 luma of an RGB triple.
pub fn luma([r, g, b]: [f32; 3]) -> f32 {
    0.299 * r + 0.587 * g + 0.114 * b
}
