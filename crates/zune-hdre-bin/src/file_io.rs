/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use log::{debug, info};
use zune_hdre::{CubeFace, HdreAsset};

/// Write every face of every level to `dir` as raw native endian floats
pub fn dump_faces(asset: &HdreAsset, dir: &Path) -> Result<usize, std::io::Error> {
    create_dir_all(dir)?;

    let mut written = 0;

    for (n, level) in asset.levels().iter().enumerate() {
        for face in CubeFace::ALL {
            let path = dir.join(format!("level{n}_face{}.raw", face.index()));
            let mut writer = BufWriter::new(File::create(&path)?);

            writer.write_all(bytemuck::cast_slice(level.face(face)))?;
            writer.flush()?;

            debug!(
                "Wrote {}x{} {:?} face to {}",
                level.width(),
                level.height(),
                face,
                path.display()
            );
            written += 1;
        }
    }
    info!("Wrote {written} faces to {}", dir.display());

    Ok(written)
}
