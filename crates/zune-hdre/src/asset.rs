/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use alloc::vec::Vec;
use std::fs::File;
use std::io::{BufReader, Cursor};
use std::path::Path;

use log::{info, trace};

use crate::decoder::HdreDecoder;
use crate::errors::HdreDecodeErrors;
use crate::header::{HdreHeader, OrientationPolicy};
use crate::options::HdreOptions;
use crate::orientation::normalize_level;
use crate::pyramid::{level_width, N_FACES};

/// The six faces of a cubemap in file order
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum CubeFace {
    PositiveX,
    NegativeX,
    PositiveY,
    NegativeY,
    PositiveZ,
    NegativeZ
}

impl CubeFace {
    /// All faces, in the order they are stored
    pub const ALL: [CubeFace; N_FACES] = [
        CubeFace::PositiveX,
        CubeFace::NegativeX,
        CubeFace::PositiveY,
        CubeFace::NegativeY,
        CubeFace::PositiveZ,
        CubeFace::NegativeZ
    ];

    /// Position of the face inside a level
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn from_index(index: usize) -> Option<CubeFace> {
        if index < N_FACES {
            Some(Self::ALL[index])
        } else {
            None
        }
    }
}

/// One level of the mip chain.
///
/// The same pixels are available packed, all faces back to back, and
/// as six separate buffers.
#[derive(Debug, Clone, PartialEq)]
pub struct MipLevel {
    width:       usize,
    faces_array: Vec<f32>,
    faces:       [Vec<f32>; N_FACES]
}

impl MipLevel {
    /// Copy the faces of one level out of `level_data` and fix
    /// their orientation.
    pub(crate) fn extract(
        level_data: &[f32], width: usize, num_channels: usize, policy: OrientationPolicy,
        is_base_level: bool
    ) -> MipLevel {
        let face_size = width * width * num_channels;

        let mut faces: [Vec<f32>; N_FACES] =
            core::array::from_fn(|j| level_data[j * face_size..(j + 1) * face_size].to_vec());

        normalize_level(&mut faces, width, num_channels, policy, is_base_level);

        let faces_array = faces.concat();

        MipLevel {
            width,
            faces_array,
            faces
        }
    }

    /// Edge length of every face in this level
    pub const fn width(&self) -> usize {
        self.width
    }
    /// Same as width, faces are square
    pub const fn height(&self) -> usize {
        self.width
    }
    /// All six faces, face-major
    pub fn faces_array(&self) -> &[f32] {
        &self.faces_array
    }
    /// The six faces as separate buffers, indexable by [`CubeFace::index`]
    pub fn faces(&self) -> &[Vec<f32>; N_FACES] {
        &self.faces
    }
    pub fn face(&self, face: CubeFace) -> &[f32] {
        &self.faces[face.index()]
    }
}

/// A decoded HDRE file
///
/// Owns the payload as read from disk and the normalized mip chain
/// built from it.
#[derive(Debug, Clone, PartialEq)]
pub struct HdreAsset {
    header: HdreHeader,
    data:   Vec<f32>,
    levels: Vec<MipLevel>
}

impl HdreAsset {
    pub(crate) fn new(header: HdreHeader, data: Vec<f32>, levels: Vec<MipLevel>) -> HdreAsset {
        HdreAsset {
            header,
            data,
            levels
        }
    }

    /// Decode the file at `path` with default options
    pub fn open<P: AsRef<Path>>(path: P) -> Result<HdreAsset, HdreDecodeErrors> {
        Self::open_with_options(path, HdreOptions::default())
    }

    /// Decode the file at `path`
    pub fn open_with_options<P: AsRef<Path>>(
        path: P, options: HdreOptions
    ) -> Result<HdreAsset, HdreDecodeErrors> {
        let path = path.as_ref();

        let file = File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => HdreDecodeErrors::NotFound(path.to_path_buf()),
            _ => HdreDecodeErrors::IoErrors(e)
        })?;
        let asset = HdreDecoder::new_with_options(BufReader::new(file), options).decode()?;

        info!(
            "'{}' (v{}) loaded successfully",
            path.display(),
            asset.version()
        );
        Ok(asset)
    }

    /// Decode a file already in memory
    pub fn from_bytes(bytes: &[u8]) -> Result<HdreAsset, HdreDecodeErrors> {
        Self::from_bytes_with_options(bytes, HdreOptions::default())
    }

    pub fn from_bytes_with_options(
        bytes: &[u8], options: HdreOptions
    ) -> Result<HdreAsset, HdreDecodeErrors> {
        HdreDecoder::new_with_options(Cursor::new(bytes), options).decode()
    }

    pub const fn header(&self) -> &HdreHeader {
        &self.header
    }
    pub const fn version(&self) -> f32 {
        self.header.version()
    }
    pub const fn num_channels(&self) -> usize {
        self.header.num_channels()
    }
    pub const fn bits_per_channel(&self) -> u32 {
        self.header.bits_per_channel()
    }
    pub const fn max_luminance(&self) -> f32 {
        self.header.max_luminance()
    }
    /// Spherical harmonics coefficients, if the file carries them
    pub fn sh_coefficients(&self) -> Option<&[f32]> {
        self.header.sh_coefficients()
    }
    /// Base level edge length
    pub const fn width(&self) -> usize {
        self.header.width()
    }
    pub const fn height(&self) -> usize {
        self.header.height()
    }
    pub fn num_levels(&self) -> usize {
        self.levels.len()
    }
    /// Edge length of level `level`, `floor(width / 2^level)`
    pub const fn level_width(&self, level: usize) -> usize {
        level_width(self.header.width(), level)
    }

    /// The payload as stored in the file: level-major, then face-major,
    /// then row-major interleaved pixels.
    ///
    /// Orientation fix ups are not applied to this buffer.
    pub fn raw_buffer(&self) -> &[f32] {
        &self.data
    }

    pub fn levels(&self) -> &[MipLevel] {
        &self.levels
    }

    /// Return mip level `n`, or `None` if the chain is shorter
    pub fn get_level(&self, n: usize) -> Option<&MipLevel> {
        self.levels.get(n)
    }

    /// Return mip level `n`
    ///
    /// # Panics
    /// If `n` is not below [`num_levels`](Self::num_levels)
    pub fn level(&self, n: usize) -> &MipLevel {
        match self.levels.get(n) {
            Some(level) => level,
            None => panic!(
                "Mip level {n} out of range, asset has {} levels",
                self.levels.len()
            )
        }
    }

    /// The six faces of level `n`
    ///
    /// # Panics
    /// If `n` is not below [`num_levels`](Self::num_levels)
    pub fn faces(&self, n: usize) -> &[Vec<f32>; N_FACES] {
        self.level(n).faces()
    }

    /// A single face of level `n`
    ///
    /// # Panics
    /// If `n` is not below [`num_levels`](Self::num_levels)
    pub fn face(&self, n: usize, face: CubeFace) -> &[f32] {
        self.level(n).face(face)
    }

    /// Drop every buffer owned by the asset.
    ///
    /// Consumes the asset, so teardown happens exactly once.
    pub fn release(self) {
        trace!(
            "Releasing {} payload floats and {} levels",
            self.data.len(),
            self.levels.len()
        );
        drop(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn face_indices_round_trip() {
        for (i, face) in CubeFace::ALL.iter().enumerate() {
            assert_eq!(face.index(), i);
            assert_eq!(CubeFace::from_index(i), Some(*face));
        }
        assert_eq!(CubeFace::from_index(6), None);
    }

    #[test]
    fn extract_keeps_packed_and_split_views_equal() {
        let data: Vec<f32> = (0..2 * 2 * 3 * 6).map(|x| x as f32).collect();

        let level = MipLevel::extract(&data, 2, 3, OrientationPolicy::Legacy, false);

        assert_eq!(level.width(), 2);
        assert_eq!(level.faces_array(), &level.faces().concat()[..]);
        assert_eq!(level.face(CubeFace::PositiveX).len(), 12);
    }

    #[test]
    fn extract_base_without_fix_up() {
        let data: Vec<f32> = (0..4 * 6).map(|x| x as f32).collect();

        let level = MipLevel::extract(&data, 2, 1, OrientationPolicy::PreFlippedBase, true);

        assert_eq!(level.faces_array(), &data[..]);
        assert_eq!(level.face(CubeFace::NegativeZ), &data[20..24]);
    }
}
