/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! An HDRE cubemap decoder
//!
//! HDRE files store a pre-filtered environment as a mip chain of six
//! square cubemap faces of 32-bit floats, optionally accompanied by
//! spherical harmonics coefficients for diffuse lighting.
//!
//! # Features
//! - Minimal interface, few dependencies
//! - No unsafe
//! - Fuzz tested decoder
//! - Optional multi-threaded level extraction via the `threads` feature
//!
//! # Usage notes
//! The decoder returns an owned [`HdreAsset`], the asset keeps the payload
//! exactly as stored on disk in [`raw_buffer`](HdreAsset::raw_buffer) and
//! exposes every mip level both as one face-major buffer and as six
//! separate face buffers. Face orientation is normalized on load according
//! to the format version found in the header.
//!
//! Data is read in native byte order, files are not portable between
//! machines of different endianness.
//!
//! ```no_run
//! use zune_hdre::{CubeFace, HdreAsset};
//!
//! let asset = HdreAsset::open("environment.hdre").unwrap();
//! let top = asset.face(0, CubeFace::PositiveY);
//! println!("{} floats in the top face", top.len());
//! ```
//!
//! For renderers that request the same environment from many places,
//! [`AssetRegistry`] memoizes decoded assets by path.
#![forbid(unsafe_code)]
extern crate alloc;
extern crate core;
pub extern crate zune_core;

pub use asset::{CubeFace, HdreAsset, MipLevel};
pub use decoder::HdreDecoder;
pub use errors::HdreDecodeErrors;
pub use header::{HdreHeader, OrientationPolicy, FLOAT32_ARRAY_TAG, HEADER_SIZE, MAX_SH_COEFFS};
pub use options::HdreOptions;
pub use pyramid::{level_width, payload_size, DEFAULT_MIP_LEVELS, N_FACES};
pub use registry::{AssetRegistry, AssetSource, FileSource};

mod asset;
mod decoder;
mod errors;
mod header;
mod options;
pub mod orientation;
mod pyramid;
mod registry;
