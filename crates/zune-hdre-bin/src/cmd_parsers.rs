use clap::ArgMatches;
use zune_hdre::zune_core::options::DecoderOptions;
use zune_hdre::HdreOptions;

pub mod global_options;

pub fn get_decoder_options(options: &ArgMatches) -> HdreOptions {
    let max_width = *options.get_one::<usize>("max-width").unwrap();
    let max_height = *options.get_one::<usize>("max-height").unwrap();
    let mip_levels = *options.get_one::<usize>("mip-levels").unwrap();
    let strict_mode = !*options.get_one::<bool>("no-strict").unwrap();
    let use_threads = !*options.get_one::<bool>("single-thread").unwrap();

    let limits = DecoderOptions::default()
        .set_max_height(max_height)
        .set_max_width(max_width)
        .set_strict_mode(strict_mode);

    HdreOptions::new(limits)
        .set_mip_levels(mip_levels)
        .set_use_threads(use_threads)
}
