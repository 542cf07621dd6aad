/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Face orientation fix ups
//!
//! Both operations are their own inverse, applying either of them twice
//! restores the original data.

use log::trace;

use crate::asset::CubeFace;
use crate::header::OrientationPolicy;
use crate::pyramid::N_FACES;

/// Reverse the row order of a single square face.
///
/// A row is `width * num_channels` floats, row `r` is exchanged with row
/// `width - 1 - r`, the middle row of an odd sized face stays in place.
pub fn flip_rows(face: &mut [f32], width: usize, num_channels: usize) {
    let row_size = width * num_channels;

    debug_assert_eq!(face.len(), row_size * width);

    for top in 0..width / 2 {
        let bottom = width - 1 - top;
        // every top row lies before the split, every bottom row after it
        let (upper, lower) = face.split_at_mut(bottom * row_size);

        upper[top * row_size..(top + 1) * row_size].swap_with_slice(&mut lower[..row_size]);
    }
}

/// Exchange the whole `+Y` and `-Y` faces of a level
pub fn swap_face_pair(faces: &mut [Vec<f32>; N_FACES]) {
    faces.swap(CubeFace::PositiveY.index(), CubeFace::NegativeY.index());
}

/// Bring the six faces of one level to the orientation renderers expect.
///
/// `is_base_level` is true for level zero, which files of version 3.0 and
/// above already store flipped.
pub fn normalize_level(
    faces: &mut [Vec<f32>; N_FACES], width: usize, num_channels: usize,
    policy: OrientationPolicy, is_base_level: bool
) {
    match policy {
        OrientationPolicy::Legacy => {
            trace!("Flipping rows and Y sides of {width}x{width} level");
            faces
                .iter_mut()
                .for_each(|face| flip_rows(face, width, num_channels));
            swap_face_pair(faces);
        }
        OrientationPolicy::PreFlippedBase if is_base_level => {}
        OrientationPolicy::PreFlippedBase => {
            trace!("Flipping rows of {width}x{width} level");
            faces
                .iter_mut()
                .for_each(|face| flip_rows(face, width, num_channels));
        }
    }
}

#[cfg(test)]
mod tests {
    use nanorand::{Rng, WyRand};

    use super::*;

    fn random_face(width: usize, channels: usize, rng: &mut WyRand) -> Vec<f32> {
        (0..width * width * channels)
            .map(|_| rng.generate::<u32>() as f32)
            .collect()
    }

    fn sequential_faces(face_size: usize) -> [Vec<f32>; N_FACES] {
        core::array::from_fn(|j| {
            (0..face_size)
                .map(|k| (j * face_size + k) as f32)
                .collect()
        })
    }

    #[test]
    fn flip_rows_reverses_row_order() {
        // 3x3 face, 2 channels
        let mut face: Vec<f32> = (0..18).map(|x| x as f32).collect();
        flip_rows(&mut face, 3, 2);

        let expected: Vec<f32> = [12, 13, 14, 15, 16, 17, 6, 7, 8, 9, 10, 11, 0, 1, 2, 3, 4, 5]
            .iter()
            .map(|x| *x as f32)
            .collect();
        assert_eq!(face, expected);
    }

    #[test]
    fn flip_rows_twice_is_identity() {
        let mut rng = WyRand::new_seed(42);

        for (width, channels) in [(1, 3), (2, 4), (7, 3), (16, 1)] {
            let original = random_face(width, channels, &mut rng);
            let mut face = original.clone();

            flip_rows(&mut face, width, channels);
            flip_rows(&mut face, width, channels);

            assert_eq!(face, original, "width {width} channels {channels}");
        }
    }

    #[test]
    fn flip_rows_empty_face() {
        let mut face: Vec<f32> = vec![];
        flip_rows(&mut face, 0, 3);
        assert!(face.is_empty());
    }

    #[test]
    fn swap_face_pair_twice_is_identity() {
        let original = sequential_faces(4);
        let mut faces = original.clone();

        swap_face_pair(&mut faces);
        assert_eq!(faces[2], original[3]);
        assert_eq!(faces[3], original[2]);
        assert_eq!(faces[0], original[0]);

        swap_face_pair(&mut faces);
        assert_eq!(faces, original);
    }

    #[test]
    fn pre_flipped_base_is_untouched() {
        let original = sequential_faces(4);
        let mut faces = original.clone();

        normalize_level(&mut faces, 2, 1, OrientationPolicy::PreFlippedBase, true);
        assert_eq!(faces, original);
    }

    #[test]
    fn pre_flipped_upper_levels_do_not_swap() {
        let original = sequential_faces(4);
        let mut faces = original.clone();

        normalize_level(&mut faces, 2, 1, OrientationPolicy::PreFlippedBase, false);

        for (face, source) in faces.iter().zip(original.iter()) {
            assert_eq!(&face[..2], &source[2..]);
            assert_eq!(&face[2..], &source[..2]);
        }
    }

    #[test]
    fn legacy_flips_and_swaps_base() {
        let original = sequential_faces(4);
        let mut faces = original.clone();

        normalize_level(&mut faces, 2, 1, OrientationPolicy::Legacy, true);

        let mut expected = original.clone();
        expected.iter_mut().for_each(|f| flip_rows(f, 2, 1));
        expected.swap(2, 3);

        assert_eq!(faces, expected);
    }
}
