#![no_main]

use libfuzzer_sys::fuzz_target;
use zune_hdre::zune_core::options::DecoderOptions;

fuzz_target!(|data: &[u8]| {
    // keep allocations small, headers can claim huge faces
    let limits = DecoderOptions::default()
        .set_max_width(1024)
        .set_max_height(1024);
    let options = zune_hdre::HdreOptions::new(limits);
    let _ = zune_hdre::HdreAsset::from_bytes_with_options(data, options);
});
