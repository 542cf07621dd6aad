/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use core::convert::From;
use core::fmt::{Debug, Display, Formatter};
use std::path::PathBuf;

/// HDRE decoding errors
///
/// Every error is terminal for the decode attempt that produced it,
/// no partially decoded asset is handed out.
pub enum HdreDecodeErrors {
    /// The payload is not stored as a Float32 array
    UnsupportedFormat(u32),
    /// Files older than version 2.0 are no longer supported
    UnsupportedVersion(f32),
    /// Less bytes than the fixed header size were available
    TruncatedHeader(usize),
    /// The payload is shorter than what the header describes,
    /// expected bytes, found bytes
    TruncatedPayload(usize, usize),
    /// Header contains contradicting or impossible values
    InvalidHeader(&'static str),
    /// Cubemap faces must be square
    NonSquareFace(usize, usize),
    /// Too large dimensions for a given dimension
    TooLargeDimensions(&'static str, usize, usize),
    /// The requested file does not exist
    NotFound(PathBuf),
    IoErrors(std::io::Error)
}

impl Debug for HdreDecodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            HdreDecodeErrors::UnsupportedFormat(tag) => {
                writeln!(
                    f,
                    "ArrayType {tag} not supported, only Float32Array payloads can be decoded"
                )
            }
            HdreDecodeErrors::UnsupportedVersion(version) => {
                writeln!(
                    f,
                    "Version {version} is below 2.0 and no longer supported, re-export the environment"
                )
            }
            HdreDecodeErrors::TruncatedHeader(found) => {
                writeln!(
                    f,
                    "Truncated header, expected {} bytes but found {found}",
                    crate::header::HEADER_SIZE
                )
            }
            HdreDecodeErrors::TruncatedPayload(expected, found) => {
                writeln!(
                    f,
                    "Truncated payload, expected {expected} bytes but found {found}"
                )
            }
            HdreDecodeErrors::InvalidHeader(reason) => {
                writeln!(f, "Invalid header: {reason}")
            }
            HdreDecodeErrors::NonSquareFace(width, height) => {
                writeln!(f, "Cubemap faces must be square, found {width}x{height}")
            }
            HdreDecodeErrors::TooLargeDimensions(dimension, expected, found) => {
                writeln!(
                    f,
                    "Too large dimensions for {dimension} , {found} exceeds {expected}"
                )
            }
            HdreDecodeErrors::NotFound(path) => {
                writeln!(f, "File {} not found", path.display())
            }
            HdreDecodeErrors::IoErrors(err) => {
                writeln!(f, "I/O error {:?}", err)
            }
        }
    }
}

impl From<std::io::Error> for HdreDecodeErrors {
    fn from(value: std::io::Error) -> Self {
        HdreDecodeErrors::IoErrors(value)
    }
}

impl Display for HdreDecodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "{:?}", self)
    }
}

impl std::error::Error for HdreDecodeErrors {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HdreDecodeErrors::IoErrors(err) => Some(err),
            _ => None
        }
    }
}
