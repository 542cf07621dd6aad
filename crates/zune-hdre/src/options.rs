/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Decoder options
//!
//! Dimension limits and strictness come from the shared
//! [`DecoderOptions`], this only adds what is specific to HDRE.

use zune_core::options::DecoderOptions;

use crate::pyramid::DEFAULT_MIP_LEVELS;

/// Options that influence how an HDRE file is decoded
#[derive(Debug, Copy, Clone)]
pub struct HdreOptions {
    /// Limits and strict mode shared with the other zune decoders
    ///
    /// In lenient mode non square faces are decoded using the width
    /// for both dimensions after logging a warning.
    decoder:     DecoderOptions,
    /// Number of mip levels stored in the payload
    ///
    /// - Default value: 6
    mip_levels:  usize,
    /// Whether mip levels are extracted on separate threads.
    ///
    /// Only respected when the `threads` feature is enabled.
    ///
    /// - Default value: true
    use_threads: bool
}

impl Default for HdreOptions {
    fn default() -> Self {
        Self::new(DecoderOptions::default())
    }
}

impl HdreOptions {
    /// Create HDRE options on top of shared decoder options
    pub fn new(decoder: DecoderOptions) -> HdreOptions {
        HdreOptions {
            decoder,
            mip_levels: DEFAULT_MIP_LEVELS,
            use_threads: true
        }
    }
    pub const fn decoder_options(&self) -> &DecoderOptions {
        &self.decoder
    }
    /// Number of mip levels the decoder expects in the payload
    pub const fn mip_levels(&self) -> usize {
        self.mip_levels
    }
    /// Whether level extraction may be spread across threads
    pub const fn use_threads(&self) -> bool {
        cfg!(feature = "threads") && self.use_threads
    }

    /// Replace the shared decoder options
    pub fn set_decoder_options(mut self, decoder: DecoderOptions) -> Self {
        self.decoder = decoder;
        self
    }
    /// Set the number of mip levels stored in the payload.
    ///
    /// A value of zero is clamped to one, the base level is always present.
    pub fn set_mip_levels(mut self, levels: usize) -> Self {
        self.mip_levels = levels.max(1);
        self
    }
    /// Set whether the decoder may use threads
    pub fn set_use_threads(mut self, yes: bool) -> Self {
        self.use_threads = yes;
        self
    }
}

#[cfg(test)]
mod tests {
    use zune_core::options::DecoderOptions;

    use super::HdreOptions;

    #[test]
    fn zero_levels_clamped_to_base() {
        let options = HdreOptions::default().set_mip_levels(0);
        assert_eq!(options.mip_levels(), 1);
    }

    #[test]
    fn defaults() {
        let options = HdreOptions::default();
        assert_eq!(options.decoder_options().get_max_width(), 16384);
        assert_eq!(options.decoder_options().get_max_height(), 16384);
        assert!(options.decoder_options().get_strict_mode());
        assert_eq!(options.mip_levels(), 6);
    }

    #[test]
    fn shared_limits_are_kept() {
        let decoder = DecoderOptions::default()
            .set_max_width(32)
            .set_strict_mode(false);
        let options = HdreOptions::new(decoder).set_mip_levels(3);

        assert_eq!(options.decoder_options().get_max_width(), 32);
        assert!(!options.decoder_options().get_strict_mode());
        assert_eq!(options.mip_levels(), 3);
    }

    #[test]
    fn threads_can_be_disabled() {
        let options = HdreOptions::default().set_use_threads(false);
        assert!(!options.use_threads());
    }
}
