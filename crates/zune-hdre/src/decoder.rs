/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use core::option::Option::{self, *};
use core::result::Result::{self, *};
use std::io::{Read, Seek, SeekFrom};

use log::{debug, trace};

use crate::asset::HdreAsset;
use crate::errors::HdreDecodeErrors;
use crate::header::HdreHeader;
use crate::options::HdreOptions;
use crate::pyramid::{build_levels, payload_size, read_payload};

/// A simple HDRE decoder
///
/// The decoder reads the header at the start of the stream, then seeks
/// to the payload offset the header announces. Nothing is kept between
/// two decoders, independent files can be decoded on separate threads.
pub struct HdreDecoder<R: Read + Seek> {
    stream:  R,
    options: HdreOptions,
    header:  Option<HdreHeader>
}

impl<R> HdreDecoder<R>
where
    R: Read + Seek
{
    /// Create a new HDRE decoder
    ///
    /// # Arguments
    ///
    /// * `data`: Raw HDRE file contents, anything seekable
    ///
    /// returns: HdreDecoder
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use zune_hdre::HdreDecoder;
    /// let file_data = std::io::BufReader::new(std::fs::File::open("sample.hdre").unwrap());
    /// let decoder = HdreDecoder::new(file_data);
    /// ```
    pub fn new(data: R) -> HdreDecoder<R> {
        Self::new_with_options(data, HdreOptions::default())
    }

    /// Create a new HDRE decoder with the specified options
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::io::BufReader;
    /// use zune_hdre::zune_core::options::DecoderOptions;
    /// use zune_hdre::{HdreDecoder, HdreOptions};
    /// let file_data = std::fs::File::open("sample.hdre").unwrap();
    /// // refuse faces wider than 512 px
    /// let options = HdreOptions::new(DecoderOptions::default().set_max_width(512));
    /// let decoder = HdreDecoder::new_with_options(BufReader::new(file_data), options);
    /// ```
    pub fn new_with_options(data: R, options: HdreOptions) -> HdreDecoder<R> {
        HdreDecoder {
            stream: data,
            options,
            header: None
        }
    }

    /// Decode and validate the header.
    ///
    /// Calling this more than once is a no-op.
    pub fn decode_headers(&mut self) -> Result<(), HdreDecodeErrors> {
        if self.header.is_some() {
            return Ok(());
        }
        self.stream.seek(SeekFrom::Start(0))?;

        let header = HdreHeader::parse(&mut self.stream, &self.options)?;

        self.header = Some(header);
        Ok(())
    }

    /// The decoded header, or `None` if the headers weren't decoded
    pub const fn header(&self) -> Option<&HdreHeader> {
        self.header.as_ref()
    }

    /// Base face dimensions as a tuple of width and height
    /// or `None` if the headers haven't been decoded.
    pub fn dimensions(&self) -> Option<(usize, usize)> {
        self.header.map(|h| (h.width(), h.height()))
    }

    /// Number of floats in the payload
    ///
    /// # Returns
    ///  - `None`: Indicates the headers were not decoded or
    ///  the size calculation overflows a usize
    pub fn output_buffer_size(&self) -> Option<usize> {
        let header = self.header.as_ref()?;

        payload_size(
            header.width(),
            header.num_channels(),
            self.options.mip_levels()
        )
    }

    /// Decode the whole file
    ///
    /// # Returns
    /// - `Ok(HdreAsset)`: The payload and its normalized mip chain
    /// - `Err(HdreDecodeErrors)`: Indicates an unrecoverable
    ///  error occurred during decoding, nothing is returned in that case.
    pub fn decode(&mut self) -> Result<HdreAsset, HdreDecodeErrors> {
        self.decode_headers()?;

        let header = match self.header {
            Some(header) => header,
            None => return Err(HdreDecodeErrors::InvalidHeader("headers not decoded"))
        };
        let levels = self.options.mip_levels();

        let data = read_payload(&mut self.stream, &header, levels)?;

        trace!("Read {} payload floats", data.len());

        let use_threads = self.options.use_threads();
        debug!(
            "Building {levels} levels {}",
            if use_threads { "on threads" } else { "serially" }
        );
        let mip_levels = build_levels(&data, &header, levels, use_threads);

        Ok(HdreAsset::new(header, data, mip_levels))
    }
}
