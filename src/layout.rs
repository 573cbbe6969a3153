//! Layout of a binary splat record.
//!
//! Each record is [`PROPERTY_COUNT`] little endian [`prim@f32`] properties, in the order of
//! [`PROPERTY_NAMES`]. The ranges below index into that property list.

use std::ops::Range;

/// The number of properties per record.
pub const PROPERTY_COUNT: usize = 62;

/// The size of a single property in bytes.
pub const PROPERTY_SIZE: usize = std::mem::size_of::<f32>();

/// The size of a single record in bytes.
pub const RECORD_STRIDE: usize = PROPERTY_COUNT * PROPERTY_SIZE;

/// The number of color channels.
pub const CHANNEL_COUNT: usize = 3;

/// The number of higher order SH coefficients stored per channel.
pub const SH_REST_PER_CHANNEL: usize = 15;

/// The number of SH coefficients kept per channel, including the DC term.
pub const SH_KEPT_PER_CHANNEL: usize = 4;

/// The number of SH values kept per splat.
pub const SH_KEPT_LEN: usize = SH_KEPT_PER_CHANNEL * CHANNEL_COUNT;

/// Position, `x, y, z`.
pub const POSITION: Range<usize> = 0..3;
/// Normal, not decoded.
pub const NORMAL: Range<usize> = 3..6;
/// DC term of the SH, one per channel.
pub const SH_DC: Range<usize> = 6..9;
/// Higher order SH, one contiguous block of [`SH_REST_PER_CHANNEL`] per channel.
pub const SH_REST: Range<usize> = 9..9 + SH_REST_PER_CHANNEL * CHANNEL_COUNT;
/// Opacity before the logistic activation.
pub const OPACITY: usize = SH_REST.end;
/// Log space scale.
pub const SCALE: Range<usize> = OPACITY + 1..OPACITY + 4;
/// Rotation, stored as `w, x, y, z`.
pub const ROTATION: Range<usize> = SCALE.end..SCALE.end + 4;

/// The header token terminating the textual header.
pub const END_HEADER: &str = "end_header";

/// The header line prefix declaring the record count.
pub const ELEMENT_VERTEX: &str = "element vertex";

/// Byte offset of the record at `index`, relative to the end of the header.
///
/// Returns [`None`] on overflow.
pub fn record_offset(header_end: usize, index: usize) -> Option<usize> {
    index
        .checked_mul(RECORD_STRIDE)
        .and_then(|offset| offset.checked_add(header_end))
}

/// The list of properties in a record.
pub const PROPERTY_NAMES: [&str; PROPERTY_COUNT] = [
    "x",
    "y",
    "z",
    "nx",
    "ny",
    "nz",
    "f_dc_0",
    "f_dc_1",
    "f_dc_2",
    "f_rest_0",
    "f_rest_1",
    "f_rest_2",
    "f_rest_3",
    "f_rest_4",
    "f_rest_5",
    "f_rest_6",
    "f_rest_7",
    "f_rest_8",
    "f_rest_9",
    "f_rest_10",
    "f_rest_11",
    "f_rest_12",
    "f_rest_13",
    "f_rest_14",
    "f_rest_15",
    "f_rest_16",
    "f_rest_17",
    "f_rest_18",
    "f_rest_19",
    "f_rest_20",
    "f_rest_21",
    "f_rest_22",
    "f_rest_23",
    "f_rest_24",
    "f_rest_25",
    "f_rest_26",
    "f_rest_27",
    "f_rest_28",
    "f_rest_29",
    "f_rest_30",
    "f_rest_31",
    "f_rest_32",
    "f_rest_33",
    "f_rest_34",
    "f_rest_35",
    "f_rest_36",
    "f_rest_37",
    "f_rest_38",
    "f_rest_39",
    "f_rest_40",
    "f_rest_41",
    "f_rest_42",
    "f_rest_43",
    "f_rest_44",
    "opacity",
    "scale_0",
    "scale_1",
    "scale_2",
    "rot_0",
    "rot_1",
    "rot_2",
    "rot_3",
];
