/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::ffi::OsStr;
use std::fs::File;
use std::io::BufReader;

use log::warn;
use zune_hdre::{HdreDecodeErrors, HdreDecoder, HdreOptions};

use crate::serde::Metadata;

/// Decode headers of an input file and print them to standard output.
pub fn probe_input_file(in_file: &OsStr, options: HdreOptions) -> Result<(), HdreDecodeErrors> {
    let file = File::open(in_file)?;
    let size = file.metadata()?.len();

    let mut decoder = HdreDecoder::new_with_options(BufReader::new(file), options);
    decoder.decode_headers()?;

    if let Some(header) = decoder.header() {
        let metadata = Metadata::new(in_file.to_os_string(), size, options.mip_levels(), header);

        match serde_json::to_string_pretty(&metadata) {
            Ok(json) => println!("{json}"),
            Err(e) => warn!("Could not serialize metadata: {e}")
        }
    }
    Ok(())
}
