use thiserror::Error;

/// The error type for [`RecordFile::read_from_file`](crate::RecordFile::read_from_file) and
/// [`RecordFile::from_bytes`](crate::RecordFile::from_bytes).
#[derive(Debug, Error)]
pub enum ReadRecordFileError {
    #[error("input file not found: {}", path.display())]
    NotFound { path: std::path::PathBuf },
    #[error("malformed header: {0}")]
    MalformedHeader(#[from] MalformedHeaderError),
    #[error(
        "truncated record {index}: record at byte offset {offset} \
        exceeds file length {file_len}"
    )]
    TruncatedRecord {
        index: usize,
        offset: usize,
        file_len: usize,
    },
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

/// The reason a header failed to parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedHeaderError {
    #[error("missing `end_header` terminator")]
    MissingTerminator,
    #[error("missing newline after `end_header`")]
    MissingTerminatorNewline,
    #[error("header is not valid UTF-8")]
    InvalidUtf8,
    #[error("missing `element vertex` declaration")]
    MissingVertexElement,
    #[error("invalid vertex count: {0:?}")]
    InvalidVertexCount(String),
}

/// The error type for [`RecordFile::read_record`](crate::RecordFile::read_record).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadRecordError {
    #[error("record index out of bounds: {index} >= {count}")]
    IndexOutOfBounds { index: usize, count: usize },
}

/// The error type for [`Splat::reconstruct`](crate::Splat::reconstruct).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconstructError {
    #[error("rotation quaternion has zero norm")]
    DegenerateRotation,
}

/// The error type for [`decode`](crate::decode) and [`decode_file`](crate::decode_file).
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("{0}")]
    Read(#[from] ReadRecordFileError),
    #[error("degenerate rotation in record {index}")]
    DegenerateRotation { index: usize },
}

/// The error type for [`Dataset`](crate::Dataset) serialization.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    #[error("{field} length mismatch: {len} != {expected}")]
    LengthMismatch {
        field: &'static str,
        len: usize,
        expected: usize,
    },
    #[error("non-finite value in {field} of splat {index}")]
    NonFinite { field: &'static str, index: usize },
}
