/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Fixed size HDRE header

use std::io::Read;

use bytemuck::{Pod, Zeroable};
use log::{debug, trace, warn};

use crate::errors::HdreDecodeErrors;
use crate::options::HdreOptions;

/// Array type tag for payloads stored as 32-bit floats,
/// the only payload type supported.
pub const FLOAT32_ARRAY_TAG: u32 = 3;

/// Number of floats reserved for spherical harmonics coefficients
/// (nine RGB coefficients).
pub const MAX_SH_COEFFS: usize = 27;

/// Size in bytes of the header block at the start of every file
pub const HEADER_SIZE: usize = core::mem::size_of::<RawHeader>();

/// On-disk header layout, native endian, every field 4 bytes wide.
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct RawHeader {
    format_tag:       u32,
    version:          f32,
    num_channels:     u32,
    bits_per_channel: u32,
    max_luminance:    f32,
    includes_sh:      u32,
    num_sh_coeffs:    u32,
    sh_coeffs:        [f32; MAX_SH_COEFFS],
    width:            u32,
    height:           u32,
    payload_offset:   u32
}

/// How face orientation has to be fixed up after reading a level.
///
/// Exporters disagreed on vertical orientation before version 3.0,
/// later exporters pre-flip the base level themselves.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum OrientationPolicy {
    /// `2.0 <= version < 3.0`: every level is flipped and the
    /// `+Y`/`-Y` faces are exchanged
    Legacy,
    /// `version >= 3.0`: the base level is left untouched, every other
    /// level is flipped
    PreFlippedBase
}

impl OrientationPolicy {
    /// Policy for a file version, `None` for versions that can
    /// no longer be decoded
    pub fn from_version(version: f32) -> Option<OrientationPolicy> {
        if version >= 3.0 {
            Some(OrientationPolicy::PreFlippedBase)
        } else if version >= 2.0 {
            Some(OrientationPolicy::Legacy)
        } else {
            None
        }
    }
}

/// A validated HDRE header
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct HdreHeader {
    version:          f32,
    num_channels:     usize,
    bits_per_channel: u32,
    max_luminance:    f32,
    includes_sh:      bool,
    num_sh_coeffs:    usize,
    sh_coeffs:        [f32; MAX_SH_COEFFS],
    width:            usize,
    height:           usize,
    payload_offset:   u64,
    policy:           OrientationPolicy
}

impl HdreHeader {
    /// Read and validate the header from the start of `reader`.
    ///
    /// Exactly [`HEADER_SIZE`] bytes are consumed, callers must seek to
    /// [`payload_offset`](Self::payload_offset) themselves before
    /// reading pixels.
    pub fn parse<R: Read>(reader: &mut R, options: &HdreOptions) -> Result<Self, HdreDecodeErrors> {
        let mut bytes = [0_u8; HEADER_SIZE];

        let found = read_fully(reader, &mut bytes)?;

        if found != HEADER_SIZE {
            return Err(HdreDecodeErrors::TruncatedHeader(found));
        }
        let raw: RawHeader = bytemuck::pod_read_unaligned(&bytes);

        Self::from_raw(&raw, options)
    }

    /// Parse a header from the first [`HEADER_SIZE`] bytes of `bytes`
    pub fn from_bytes(bytes: &[u8], options: &HdreOptions) -> Result<Self, HdreDecodeErrors> {
        if bytes.len() < HEADER_SIZE {
            return Err(HdreDecodeErrors::TruncatedHeader(bytes.len()));
        }
        let raw: RawHeader = bytemuck::pod_read_unaligned(&bytes[..HEADER_SIZE]);

        Self::from_raw(&raw, options)
    }

    fn from_raw(raw: &RawHeader, options: &HdreOptions) -> Result<Self, HdreDecodeErrors> {
        trace!("Format tag: {}", raw.format_tag);
        trace!("Version: {}", raw.version);

        if raw.format_tag != FLOAT32_ARRAY_TAG {
            return Err(HdreDecodeErrors::UnsupportedFormat(raw.format_tag));
        }
        let policy = OrientationPolicy::from_version(raw.version)
            .ok_or(HdreDecodeErrors::UnsupportedVersion(raw.version))?;

        if raw.num_channels == 0 {
            return Err(HdreDecodeErrors::InvalidHeader("zero channels"));
        }
        if raw.width == 0 || raw.height == 0 {
            return Err(HdreDecodeErrors::InvalidHeader("zero sized faces"));
        }
        let includes_sh = raw.includes_sh != 0;

        let (num_sh_coeffs, sh_coeffs) = if includes_sh {
            let count = raw.num_sh_coeffs as usize;

            if count > MAX_SH_COEFFS {
                return Err(HdreDecodeErrors::InvalidHeader(
                    "too many spherical harmonics coefficients"
                ));
            }
            (count, raw.sh_coeffs)
        } else {
            (0, [0.0; MAX_SH_COEFFS])
        };

        let limits = options.decoder_options();
        let width = raw.width as usize;
        let mut height = raw.height as usize;

        if width != height {
            if limits.get_strict_mode() {
                return Err(HdreDecodeErrors::NonSquareFace(width, height));
            }
            warn!("Non square faces {width}x{height}, using {width} for both dimensions");
            height = width;
        }
        if height > limits.get_max_height() {
            return Err(HdreDecodeErrors::TooLargeDimensions(
                "height",
                limits.get_max_height(),
                height
            ));
        }
        if width > limits.get_max_width() {
            return Err(HdreDecodeErrors::TooLargeDimensions(
                "width",
                limits.get_max_width(),
                width
            ));
        }
        if (raw.payload_offset as usize) < HEADER_SIZE {
            return Err(HdreDecodeErrors::InvalidHeader(
                "payload offset overlaps the header"
            ));
        }
        trace!("Channels: {}", raw.num_channels);
        trace!("Bits per channel: {}", raw.bits_per_channel);
        trace!("Max luminance: {}", raw.max_luminance);
        trace!("Width: {width}");
        trace!("Height: {height}");
        trace!("Payload offset: {}", raw.payload_offset);
        debug!("Orientation policy: {:?}", policy);

        Ok(HdreHeader {
            version: raw.version,
            num_channels: raw.num_channels as usize,
            bits_per_channel: raw.bits_per_channel,
            max_luminance: raw.max_luminance,
            includes_sh,
            num_sh_coeffs,
            sh_coeffs,
            width,
            height,
            payload_offset: u64::from(raw.payload_offset),
            policy
        })
    }

    /// Format version stored in the file
    pub const fn version(&self) -> f32 {
        self.version
    }
    /// Number of interleaved channels per pixel
    pub const fn num_channels(&self) -> usize {
        self.num_channels
    }
    /// Bits per channel as reported by the exporter
    pub const fn bits_per_channel(&self) -> u32 {
        self.bits_per_channel
    }
    /// Maximum luminance as reported by the exporter
    pub const fn max_luminance(&self) -> f32 {
        self.max_luminance
    }
    /// Edge length of the base level faces
    pub const fn width(&self) -> usize {
        self.width
    }
    pub const fn height(&self) -> usize {
        self.height
    }
    /// Absolute byte offset of the pixel payload
    pub const fn payload_offset(&self) -> u64 {
        self.payload_offset
    }
    pub const fn includes_sh(&self) -> bool {
        self.includes_sh
    }
    /// Number of spherical harmonics coefficients, zero when
    /// the file carries none
    pub const fn num_sh_coeffs(&self) -> usize {
        self.num_sh_coeffs
    }
    /// Spherical harmonics coefficients, if present in the file
    pub fn sh_coefficients(&self) -> Option<&[f32]> {
        self.includes_sh
            .then_some(&self.sh_coeffs[..self.num_sh_coeffs])
    }
    /// Orientation fix up derived from the version
    pub const fn orientation_policy(&self) -> OrientationPolicy {
        self.policy
    }
}

/// Fill `buf` from `reader`, stopping early only at end of stream.
///
/// Returns the number of bytes actually read.
pub(crate) fn read_fully<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize, HdreDecodeErrors> {
    let mut filled = 0;

    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(HdreDecodeErrors::IoErrors(e))
        }
    }
    Ok(filled)
}

/// Build a raw header block, used by tests to synthesize files
#[cfg(test)]
pub(crate) fn raw_header_bytes(
    format_tag: u32, version: f32, num_channels: u32, width: u32, payload_offset: u32
) -> [u8; HEADER_SIZE] {
    let mut raw = RawHeader::zeroed();
    raw.format_tag = format_tag;
    raw.version = version;
    raw.num_channels = num_channels;
    raw.bits_per_channel = 32;
    raw.width = width;
    raw.height = width;
    raw.payload_offset = payload_offset;

    let mut out = [0; HEADER_SIZE];
    out.copy_from_slice(bytemuck::bytes_of(&raw));
    out
}

#[cfg(test)]
mod tests {
    use zune_core::options::DecoderOptions;

    use super::*;

    fn parse(bytes: &[u8]) -> Result<HdreHeader, HdreDecodeErrors> {
        HdreHeader::from_bytes(bytes, &HdreOptions::default())
    }

    #[test]
    fn header_is_packed() {
        assert_eq!(HEADER_SIZE, 148);
    }

    #[test]
    fn policy_boundaries() {
        assert_eq!(OrientationPolicy::from_version(1.99), None);
        assert_eq!(
            OrientationPolicy::from_version(2.0),
            Some(OrientationPolicy::Legacy)
        );
        assert_eq!(
            OrientationPolicy::from_version(2.9),
            Some(OrientationPolicy::Legacy)
        );
        assert_eq!(
            OrientationPolicy::from_version(3.0),
            Some(OrientationPolicy::PreFlippedBase)
        );
    }

    #[test]
    fn reject_non_float_payload() {
        let bytes = raw_header_bytes(1, 3.0, 3, 16, HEADER_SIZE as u32);
        assert!(matches!(
            parse(&bytes),
            Err(HdreDecodeErrors::UnsupportedFormat(1))
        ));
    }

    #[test]
    fn reject_old_version() {
        let bytes = raw_header_bytes(3, 1.5, 3, 16, HEADER_SIZE as u32);
        assert!(matches!(
            parse(&bytes),
            Err(HdreDecodeErrors::UnsupportedVersion(_))
        ));
    }

    #[test]
    fn reject_short_header() {
        let bytes = raw_header_bytes(3, 3.0, 3, 16, HEADER_SIZE as u32);
        assert!(matches!(
            parse(&bytes[..100]),
            Err(HdreDecodeErrors::TruncatedHeader(100))
        ));
    }

    #[test]
    fn sh_absent_leaves_defaults() {
        let mut bytes = raw_header_bytes(3, 3.0, 3, 16, HEADER_SIZE as u32);
        // garbage coefficients with the flag cleared
        bytes[28..32].copy_from_slice(&1.5_f32.to_ne_bytes());
        bytes[24..28].copy_from_slice(&9_u32.to_ne_bytes());

        let header = parse(&bytes).unwrap();
        assert!(!header.includes_sh());
        assert_eq!(header.num_sh_coeffs(), 0);
        assert!(header.sh_coefficients().is_none());
    }

    #[test]
    fn sh_present() {
        let mut bytes = raw_header_bytes(3, 3.0, 3, 16, HEADER_SIZE as u32);
        bytes[20..24].copy_from_slice(&1_u32.to_ne_bytes());
        bytes[24..28].copy_from_slice(&9_u32.to_ne_bytes());
        bytes[28..32].copy_from_slice(&1.5_f32.to_ne_bytes());

        let header = parse(&bytes).unwrap();
        assert_eq!(header.num_sh_coeffs(), 9);
        assert_eq!(header.sh_coefficients().unwrap().len(), 9);
        assert_eq!(header.sh_coefficients().unwrap()[0], 1.5);
    }

    #[test]
    fn non_square_depends_on_strictness() {
        let mut bytes = raw_header_bytes(3, 3.0, 3, 16, HEADER_SIZE as u32);
        bytes[140..144].copy_from_slice(&8_u32.to_ne_bytes());

        assert!(matches!(
            parse(&bytes),
            Err(HdreDecodeErrors::NonSquareFace(16, 8))
        ));

        let lenient = HdreOptions::new(DecoderOptions::default().set_strict_mode(false));
        let header = HdreHeader::from_bytes(&bytes, &lenient).unwrap();
        assert_eq!(header.width(), 16);
        assert_eq!(header.height(), 16);
    }

    #[test]
    fn reject_zero_sized_faces() {
        let bytes = raw_header_bytes(3, 3.0, 3, 0, HEADER_SIZE as u32);
        assert!(matches!(
            parse(&bytes),
            Err(HdreDecodeErrors::InvalidHeader("zero sized faces"))
        ));
    }

    #[test]
    fn reject_overlapping_payload() {
        let bytes = raw_header_bytes(3, 3.0, 3, 16, 12);
        assert!(matches!(
            parse(&bytes),
            Err(HdreDecodeErrors::InvalidHeader(_))
        ));
    }

    #[test]
    fn reject_large_faces() {
        let bytes = raw_header_bytes(3, 3.0, 3, 64, HEADER_SIZE as u32);
        let options = HdreOptions::new(
            DecoderOptions::default()
                .set_max_width(32)
                .set_max_height(32)
        );
        assert!(matches!(
            HdreHeader::from_bytes(&bytes, &options),
            Err(HdreDecodeErrors::TooLargeDimensions(_, 32, 64))
        ));
    }
}
