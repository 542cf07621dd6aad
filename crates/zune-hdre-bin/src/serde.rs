use std::ffi::OsString;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use zune_hdre::{level_width, HdreHeader};

pub struct Metadata<'a> {
    file:       OsString,
    size:       u64,
    mip_levels: usize,
    header:     &'a HdreHeader
}

impl<'a> Metadata<'a> {
    pub fn new(file: OsString, size: u64, mip_levels: usize, header: &'a HdreHeader) -> Metadata<'a> {
        Metadata {
            file,
            size,
            mip_levels,
            header
        }
    }
}

impl<'a> Serialize for Metadata<'a> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer
    {
        let levels: Vec<usize> = (0..self.mip_levels)
            .map(|level| level_width(self.header.width(), level))
            .collect();

        let mut state = serializer.serialize_struct("HdreMetadata", 4)?;

        state.serialize_field("file", &self.file.to_string_lossy())?;
        state.serialize_field("size", &self.size)?;
        state.serialize_field("header", self.header)?;
        state.serialize_field("level_widths", &levels)?;

        state.end()
    }
}
