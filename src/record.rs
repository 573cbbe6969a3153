use std::io::Write;

use bytemuck::Zeroable;
use rayon::prelude::*;

use crate::{
    MalformedHeaderError, ReadRecordError, ReadRecordFileError,
    layout::{self, PROPERTY_COUNT, RECORD_STRIDE},
};

/// The POD representation of a splat record as stored in the file body.
///
/// Fields are stored as arrays because using glam types would add padding
/// according to C alignment rules.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct RawRecord {
    pub pos: [f32; 3],
    pub normal: [f32; 3],
    pub sh_dc: [f32; 3],
    pub sh_rest: [f32; 3 * layout::SH_REST_PER_CHANNEL],
    pub opacity: f32,
    pub scale: [f32; 3],
    /// Stored as `w, x, y, z`.
    pub rot: [f32; 4],
}

const _: () = assert!(std::mem::size_of::<RawRecord>() == RECORD_STRIDE);

impl RawRecord {
    /// Create from the flat list of properties, in [`layout::PROPERTY_NAMES`] order.
    pub fn from_properties(properties: [f32; PROPERTY_COUNT]) -> Self {
        bytemuck::cast(properties)
    }

    /// Get the flat list of properties, in [`layout::PROPERTY_NAMES`] order.
    pub fn properties(&self) -> &[f32; PROPERTY_COUNT] {
        bytemuck::cast_ref(self)
    }

    /// Get the value of a property by index.
    pub fn property(&self, index: usize) -> Option<f32> {
        self.properties().get(index).copied()
    }

    /// Decode from exactly [`RECORD_STRIDE`] little endian bytes.
    fn from_le_bytes(bytes: &[u8]) -> Self {
        debug_assert_eq!(bytes.len(), RECORD_STRIDE);

        if cfg!(target_endian = "little") {
            return bytemuck::pod_read_unaligned(bytes);
        }

        let mut record = Self::zeroed();
        bytemuck::cast_mut::<_, [f32; PROPERTY_COUNT]>(&mut record)
            .iter_mut()
            .zip(bytes.chunks_exact(layout::PROPERTY_SIZE))
            .for_each(|(value, chunk)| {
                *value = f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
            });
        record
    }

    fn write_le(&self, writer: &mut impl Write) -> Result<(), std::io::Error> {
        if cfg!(target_endian = "little") {
            return writer.write_all(bytemuck::bytes_of(self));
        }

        self.properties()
            .iter()
            .try_for_each(|value| writer.write_all(&value.to_le_bytes()))
    }
}

/// Header of a splat file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    /// The number of records declared by `element vertex`.
    pub count: usize,

    /// Byte offset of the first record, right after the `end_header` line.
    pub header_end: usize,
}

impl RecordHeader {
    /// Parse the textual header at the start of `bytes`.
    ///
    /// The header ends at the first line that is exactly [`layout::END_HEADER`], a trailing
    /// `\r` is tolerated. The count is the last token of the first
    /// [`layout::ELEMENT_VERTEX`] line.
    pub fn parse(bytes: &[u8]) -> Result<Self, MalformedHeaderError> {
        let mut count = None;
        let mut offset = 0;

        for line in bytes.split_inclusive(|&b| b == b'\n') {
            offset += line.len();

            let line = std::str::from_utf8(line).map_err(|_| MalformedHeaderError::InvalidUtf8)?;
            let has_newline = line.ends_with('\n');
            let content = line.trim_end_matches('\n').trim_end_matches('\r');

            if content == layout::END_HEADER {
                if !has_newline {
                    return Err(MalformedHeaderError::MissingTerminatorNewline);
                }

                return Ok(Self {
                    count: count.ok_or(MalformedHeaderError::MissingVertexElement)?,
                    header_end: offset,
                });
            }

            if count.is_none() {
                count = Self::parse_vertex_count(content)?;
            }
        }

        Err(MalformedHeaderError::MissingTerminator)
    }

    /// Returns [`None`] if `line` is not a vertex element declaration.
    fn parse_vertex_count(line: &str) -> Result<Option<usize>, MalformedHeaderError> {
        let Some(rest) = line.trim_start().strip_prefix(layout::ELEMENT_VERTEX) else {
            return Ok(None);
        };

        if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
            return Ok(None);
        }

        rest.split_whitespace()
            .last()
            .and_then(|token| token.parse::<usize>().ok())
            .map(Some)
            .ok_or_else(|| MalformedHeaderError::InvalidVertexCount(line.to_string()))
    }
}

/// A splat file read fully into memory.
///
/// The body is validated to hold every declared record on construction, so
/// [`RecordFile::records`] cannot fail.
#[derive(Debug, Clone)]
pub struct RecordFile {
    bytes: Vec<u8>,
    header: RecordHeader,
}

impl RecordFile {
    /// Read a splat file.
    pub fn read_from_file(path: impl AsRef<std::path::Path>) -> Result<Self, ReadRecordFileError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|err| match err.kind() {
            std::io::ErrorKind::NotFound => ReadRecordFileError::NotFound {
                path: path.to_path_buf(),
            },
            _ => err.into(),
        })?;

        Self::from_bytes(bytes)
    }

    /// Create from the bytes of a splat file.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, ReadRecordFileError> {
        let header = RecordHeader::parse(&bytes)?;
        log::debug!(
            "Parsed header: {} records starting at byte {}",
            header.count,
            header.header_end
        );

        let file_len = bytes.len();
        match layout::record_offset(header.header_end, header.count) {
            Some(end) if end <= file_len => {
                if end < file_len {
                    log::warn!("Ignoring {} trailing bytes after last record", file_len - end);
                }
            }
            _ => {
                let index = (file_len - header.header_end) / RECORD_STRIDE;
                return Err(ReadRecordFileError::TruncatedRecord {
                    index,
                    offset: header.header_end + index * RECORD_STRIDE,
                    file_len,
                });
            }
        }

        Ok(Self { bytes, header })
    }

    /// Get the parsed header.
    pub fn header(&self) -> RecordHeader {
        self.header
    }

    /// Get the number of records.
    pub fn len(&self) -> usize {
        self.header.count
    }

    /// Check if there are no records.
    pub fn is_empty(&self) -> bool {
        self.header.count == 0
    }

    /// Read the record at `index`.
    pub fn read_record(&self, index: usize) -> Result<RawRecord, ReadRecordError> {
        if index >= self.len() {
            return Err(ReadRecordError::IndexOutOfBounds {
                index,
                count: self.len(),
            });
        }

        let start = index * RECORD_STRIDE;
        Ok(RawRecord::from_le_bytes(&self.body()[start..start + RECORD_STRIDE]))
    }

    /// Iterate over the records in file order.
    pub fn records(&self) -> impl ExactSizeIterator<Item = RawRecord> + '_ {
        self.body()
            .chunks_exact(RECORD_STRIDE)
            .map(RawRecord::from_le_bytes)
    }

    /// Iterate over the records in file order on the rayon thread pool.
    pub fn par_records(&self) -> impl IndexedParallelIterator<Item = RawRecord> + '_ {
        self.body()
            .par_chunks_exact(RECORD_STRIDE)
            .map(RawRecord::from_le_bytes)
    }

    /// The declared records, validated to be in bounds by [`RecordFile::from_bytes`].
    fn body(&self) -> &[u8] {
        let start = self.header.header_end;
        &self.bytes[start..start + self.header.count * RECORD_STRIDE]
    }

    /// Write records to a splat file.
    pub fn write_records_file(
        path: impl AsRef<std::path::Path>,
        records: &[RawRecord],
    ) -> Result<(), std::io::Error> {
        let file = std::fs::File::create(path)?;
        let mut writer = std::io::BufWriter::new(file);
        Self::write_records(&mut writer, records)?;
        writer.flush()
    }

    /// Write records to a splat buffer.
    ///
    /// The output is binary little endian with the properties of [`layout::PROPERTY_NAMES`].
    pub fn write_records(
        writer: &mut impl Write,
        records: &[RawRecord],
    ) -> Result<(), std::io::Error> {
        writeln!(writer, "ply")?;
        writeln!(writer, "format binary_little_endian 1.0")?;
        writeln!(writer, "{} {}", layout::ELEMENT_VERTEX, records.len())?;
        for property in layout::PROPERTY_NAMES {
            writeln!(writer, "property float {property}")?;
        }
        writeln!(writer, "{}", layout::END_HEADER)?;

        records.iter().try_for_each(|record| record.write_le(writer))
    }
}
