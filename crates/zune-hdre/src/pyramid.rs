/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Payload reading and mip chain partitioning

use alloc::vec;
use alloc::vec::Vec;
use core::ops::Range;
use std::io::{Read, Seek, SeekFrom};

use log::trace;

use crate::asset::MipLevel;
use crate::errors::HdreDecodeErrors;
use crate::header::{read_fully, HdreHeader};

/// Number of faces of a cubemap
pub const N_FACES: usize = 6;

/// Number of mip levels HDRE exporters write
pub const DEFAULT_MIP_LEVELS: usize = 6;

/// Edge length of mip level `level` for a base edge of `width`,
/// i.e `floor(width / 2^level)`
pub const fn level_width(width: usize, level: usize) -> usize {
    if level >= usize::BITS as usize {
        0
    } else {
        width >> level
    }
}

/// Number of floats stored for one level, all six faces included
fn level_size(width: usize, num_channels: usize, level: usize) -> Option<usize> {
    let edge = level_width(width, level);

    edge.checked_mul(edge)?
        .checked_mul(num_channels)?
        .checked_mul(N_FACES)
}

/// Number of floats in the payload of a file with the given base edge,
/// channel count and level count.
///
/// Returns `None` if the size does not fit in a `usize`
pub fn payload_size(width: usize, num_channels: usize, levels: usize) -> Option<usize> {
    (0..levels).try_fold(0_usize, |acc, level| {
        acc.checked_add(level_size(width, num_channels, level)?)
    })
}

/// Float ranges of every level inside the flat payload, in level order
fn level_ranges(width: usize, num_channels: usize, levels: usize) -> Vec<Range<usize>> {
    let mut offset = 0;

    (0..levels)
        .map(|level| {
            // sizes were validated by payload_size before reading
            let size = level_size(width, num_channels, level).unwrap_or(0);
            let range = offset..offset + size;
            offset += size;
            range
        })
        .collect()
}

/// Seek to the payload and read exactly the number of floats the header
/// describes.
pub(crate) fn read_payload<R: Read + Seek>(
    stream: &mut R, header: &HdreHeader, levels: usize
) -> Result<Vec<f32>, HdreDecodeErrors> {
    let too_large = || {
        HdreDecodeErrors::TooLargeDimensions("payload", usize::MAX, header.width())
    };
    let data_size = payload_size(header.width(), header.num_channels(), levels).ok_or_else(too_large)?;
    let expected_bytes = data_size
        .checked_mul(core::mem::size_of::<f32>())
        .ok_or_else(too_large)?;

    trace!("Payload floats: {data_size}");

    // check what the stream can provide before allocating for it
    let end = stream.seek(SeekFrom::End(0))?;
    let available = end.saturating_sub(header.payload_offset());

    if available < expected_bytes as u64 {
        return Err(HdreDecodeErrors::TruncatedPayload(
            expected_bytes,
            usize::try_from(available).unwrap_or(usize::MAX)
        ));
    }
    stream.seek(SeekFrom::Start(header.payload_offset()))?;

    let mut data = vec![0.0_f32; data_size];
    let found = read_fully(stream, bytemuck::cast_slice_mut(&mut data))?;

    if found != expected_bytes {
        return Err(HdreDecodeErrors::TruncatedPayload(expected_bytes, found));
    }
    Ok(data)
}

/// Partition the flat payload into levels, each level split into six
/// faces and normalized for orientation.
///
/// Output does not depend on `use_threads`, levels land in their slot
/// in level order either way.
pub(crate) fn build_levels(
    data: &[f32], header: &HdreHeader, levels: usize, use_threads: bool
) -> Vec<MipLevel> {
    let width = header.width();
    let num_channels = header.num_channels();
    let policy = header.orientation_policy();
    let ranges = level_ranges(width, num_channels, levels);

    let extract = |(level, range): (usize, &Range<usize>)| {
        MipLevel::extract(
            &data[range.clone()],
            level_width(width, level),
            num_channels,
            policy,
            level == 0
        )
    };

    if use_threads && levels > 1 {
        std::thread::scope(|s| {
            let handles: Vec<_> = ranges
                .iter()
                .enumerate()
                .map(|item| s.spawn(move || extract(item)))
                .collect();

            handles
                .into_iter()
                .map(|handle| {
                    handle
                        .join()
                        .unwrap_or_else(|e| std::panic::resume_unwind(e))
                })
                .collect()
        })
    } else {
        ranges.iter().enumerate().map(extract).collect()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::header::{raw_header_bytes, HEADER_SIZE};
    use crate::options::HdreOptions;

    fn header_with_offset(payload_offset: u32) -> HdreHeader {
        let bytes = raw_header_bytes(3, 3.0, 1, 4, payload_offset);
        HdreHeader::parse(&mut &bytes[..], &HdreOptions::default()).unwrap()
    }

    #[test]
    fn level_width_floors() {
        assert_eq!(level_width(256, 0), 256);
        assert_eq!(level_width(256, 5), 8);
        assert_eq!(level_width(5, 1), 2);
        assert_eq!(level_width(5, 3), 0);
        assert_eq!(level_width(5, 200), 0);
    }

    #[test]
    fn payload_size_sums_levels() {
        // 4x4, 2x2, 1x1 with one channel
        assert_eq!(payload_size(4, 1, 3), Some((16 + 4 + 1) * 6));
        // 256 down to 8 with rgb
        let expected: usize = [256, 128, 64, 32, 16, 8]
            .iter()
            .map(|w| w * w * 3 * 6)
            .sum();
        assert_eq!(payload_size(256, 3, DEFAULT_MIP_LEVELS), Some(expected));
    }

    #[test]
    fn payload_size_overflow() {
        assert_eq!(payload_size(usize::MAX, 4, 1), None);
    }

    #[test]
    fn ranges_are_contiguous() {
        let ranges = level_ranges(8, 3, 4);
        assert_eq!(ranges[0], 0..8 * 8 * 3 * 6);
        for pair in ranges.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
        assert_eq!(ranges[3].end, payload_size(8, 3, 4).unwrap());
    }

    #[test]
    fn short_payload_reports_what_is_available() {
        let header = header_with_offset(HEADER_SIZE as u32);
        let mut file = header_with_offset_bytes(HEADER_SIZE as u32);
        file.extend_from_slice(&[0; 40]);

        assert!(matches!(
            read_payload(&mut Cursor::new(file), &header, 3),
            Err(HdreDecodeErrors::TruncatedPayload(504, 40))
        ));
    }

    #[test]
    fn offset_past_the_end_has_nothing_available() {
        let header = header_with_offset(4096);
        let file = header_with_offset_bytes(4096);

        assert!(matches!(
            read_payload(&mut Cursor::new(file), &header, 3),
            Err(HdreDecodeErrors::TruncatedPayload(504, 0))
        ));
    }

    fn header_with_offset_bytes(payload_offset: u32) -> Vec<u8> {
        raw_header_bytes(3, 3.0, 1, 4, payload_offset).to_vec()
    }
}
