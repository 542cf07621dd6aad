/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::path::{Path, PathBuf};

use clap::ArgMatches;
use log::{info, warn};
use zune_hdre::{AssetRegistry, HdreDecodeErrors, HdreOptions};

use crate::file_io::dump_faces;
use crate::probe_files::probe_input_file;

pub(crate) fn run_workflow_from_cmd(
    args: &ArgMatches, options: HdreOptions
) -> Result<(), HdreDecodeErrors> {
    let probe = *args.get_one::<bool>("probe").unwrap_or(&false);
    let out_dir = args.get_one::<String>("out").map(PathBuf::from);

    if !probe && out_dir.is_none() {
        warn!("Nothing to do, pass --probe or --out");
    }
    // the same input may be listed more than once
    let registry = AssetRegistry::new().with_options(options);

    for in_file in args.get_raw("in").into_iter().flatten() {
        info!("Processing {:?}", in_file);

        if probe {
            probe_input_file(in_file, options)?;
        }
        if let Some(dir) = &out_dir {
            let asset = registry.get(in_file)?;
            let stem = Path::new(in_file)
                .file_stem()
                .map_or_else(|| PathBuf::from("hdre"), PathBuf::from);

            dump_faces(&asset, &dir.join(stem))?;
        }
    }
    Ok(())
}
