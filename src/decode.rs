use rayon::prelude::*;

use crate::{Dataset, DecodeError, RawRecord, ReconstructError, RecordFile, Splat, SplatOrder};

/// Options of [`decode`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// The order of splats in the output.
    pub order: SplatOrder,

    /// Whether to reconstruct records on the rayon thread pool.
    pub parallel: bool,
}

/// Read and decode a splat file into a [`Dataset`].
pub fn decode_file(
    path: impl AsRef<std::path::Path>,
    options: &DecodeOptions,
) -> Result<Dataset, DecodeError> {
    let file = RecordFile::read_from_file(path)?;
    decode(&file, options)
}

/// Decode the records of a splat file into a [`Dataset`].
///
/// Fails on the first record, in file order, that can not be reconstructed.
pub fn decode(file: &RecordFile, options: &DecodeOptions) -> Result<Dataset, DecodeError> {
    log::info!("Decoding {} splats", file.len());

    let splats = reconstruct_all(file, options.parallel)?;
    let splats = options.order.apply(splats);
    let dataset = Dataset::from_splats(&splats);

    log::info!(
        "Decoded {} splats in {} order",
        dataset.len(),
        options.order
    );

    Ok(dataset)
}

fn reconstruct_all(file: &RecordFile, parallel: bool) -> Result<Vec<Splat>, DecodeError> {
    let reconstruct = |(index, record): (usize, RawRecord)| {
        Splat::reconstruct(&record).map_err(|err| match err {
            ReconstructError::DegenerateRotation => DecodeError::DegenerateRotation { index },
        })
    };

    match parallel {
        true => file
            .par_records()
            .enumerate()
            .map(reconstruct)
            .collect::<Vec<_>>()
            .into_iter()
            .collect(),
        false => file.records().enumerate().map(reconstruct).collect(),
    }
}
