/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Path keyed memoization of decoded assets

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, info, trace};
use parking_lot::Mutex;

use crate::asset::HdreAsset;
use crate::decoder::HdreDecoder;
use crate::errors::HdreDecodeErrors;
use crate::options::HdreOptions;

/// Where the registry gets its bytes from
pub trait AssetSource {
    type Reader: Read + Seek;

    /// Open the file at `path` for reading
    fn open(&self, path: &Path) -> Result<Self::Reader, std::io::Error>;
}

/// Reads assets from the filesystem
#[derive(Debug, Default, Copy, Clone)]
pub struct FileSource;

impl AssetSource for FileSource {
    type Reader = BufReader<File>;

    fn open(&self, path: &Path) -> Result<Self::Reader, std::io::Error> {
        Ok(BufReader::new(File::open(path)?))
    }
}

type Slot = Arc<Mutex<Option<Arc<HdreAsset>>>>;

/// Decoded assets keyed by path.
///
/// Each path owns a slot with its own lock, so a file requested from
/// several threads at once is decoded by the first caller while the rest
/// wait for its result. Different paths decode concurrently.
///
/// Only successful decodes are remembered, a failed path is tried
/// again on the next request.
pub struct AssetRegistry<S: AssetSource = FileSource> {
    source:  S,
    options: HdreOptions,
    slots:   Mutex<HashMap<PathBuf, Slot>>
}

impl AssetRegistry<FileSource> {
    /// Create a registry that reads from the filesystem
    pub fn new() -> AssetRegistry<FileSource> {
        Self::with_source(FileSource)
    }
}

impl Default for AssetRegistry<FileSource> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: AssetSource> AssetRegistry<S> {
    pub fn with_source(source: S) -> AssetRegistry<S> {
        AssetRegistry {
            source,
            options: HdreOptions::default(),
            slots: Mutex::new(HashMap::new())
        }
    }

    /// Options used for every decode done by this registry
    pub fn with_options(mut self, options: HdreOptions) -> Self {
        self.options = options;
        self
    }

    pub const fn options(&self) -> &HdreOptions {
        &self.options
    }

    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Return the asset stored at `path`, decoding it on first request
    pub fn get<P: AsRef<Path>>(&self, path: P) -> Result<Arc<HdreAsset>, HdreDecodeErrors> {
        let path = path.as_ref();

        loop {
            let slot = {
                let mut slots = self.slots.lock();
                Arc::clone(slots.entry(path.to_path_buf()).or_default())
            };
            let mut guard = slot.lock();

            if let Some(asset) = guard.as_ref() {
                trace!("Registry hit for '{}'", path.display());
                return Ok(Arc::clone(asset));
            }
            // a failed load may have dropped this slot while we waited on it
            if !self.is_current(path, &slot) {
                continue;
            }
            let asset = match self.load(path) {
                Ok(asset) => Arc::new(asset),
                Err(e) => {
                    drop(guard);
                    self.forget_empty(path, &slot);
                    return Err(e);
                }
            };
            *guard = Some(Arc::clone(&asset));

            return Ok(asset);
        }
    }

    /// Whether `path` has been decoded and is held by the registry.
    ///
    /// Waits for a decode of that path still in flight.
    pub fn contains<P: AsRef<Path>>(&self, path: P) -> bool {
        let slot = self.slots.lock().get(path.as_ref()).cloned();

        slot.is_some_and(|slot| slot.lock().is_some())
    }

    /// Remove `path` from the registry, returning the asset if it was loaded.
    ///
    /// Handles already given out stay valid.
    pub fn evict<P: AsRef<Path>>(&self, path: P) -> Option<Arc<HdreAsset>> {
        let slot = self.slots.lock().remove(path.as_ref())?;
        let asset = slot.lock().take();

        if asset.is_some() {
            debug!("Evicted '{}'", path.as_ref().display());
        }
        asset
    }

    /// Drop every asset held by the registry
    pub fn clear(&self) {
        let slots: Vec<Slot> = self.slots.lock().drain().map(|(_, slot)| slot).collect();

        for slot in slots {
            slot.lock().take();
        }
    }

    /// Number of decoded assets held
    pub fn len(&self) -> usize {
        let slots: Vec<Slot> = self.slots.lock().values().cloned().collect();

        slots.iter().filter(|slot| slot.lock().is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn load(&self, path: &Path) -> Result<HdreAsset, HdreDecodeErrors> {
        let reader = self.source.open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => HdreDecodeErrors::NotFound(path.to_path_buf()),
            _ => HdreDecodeErrors::IoErrors(e)
        })?;
        let asset = HdreDecoder::new_with_options(reader, self.options).decode()?;

        info!(
            "'{}' (v{}) loaded successfully",
            path.display(),
            asset.version()
        );
        Ok(asset)
    }

    fn is_current(&self, path: &Path, slot: &Slot) -> bool {
        self.slots
            .lock()
            .get(path)
            .is_some_and(|current| Arc::ptr_eq(current, slot))
    }

    /// Remove the slot for `path` if it is still `slot` and nobody
    /// filled it in the meantime.
    ///
    /// Never blocks on the slot while the map is locked. A slot locked by
    /// another caller is left for that caller to fill.
    fn forget_empty(&self, path: &Path, slot: &Slot) {
        let mut slots = self.slots.lock();

        if let Some(current) = slots.get(path) {
            if Arc::ptr_eq(current, slot) && current.try_lock().is_some_and(|g| g.is_none()) {
                slots.remove(path);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_not_found() {
        let registry = AssetRegistry::new();
        let path = "/this/path/does/not/exist.hdre";

        match registry.get(path) {
            Err(HdreDecodeErrors::NotFound(p)) => assert_eq!(p, PathBuf::from(path)),
            other => panic!("unexpected result {:?}", other.map(|_| ()))
        }
        assert!(!registry.contains(path));
        assert!(registry.is_empty());
    }
}
