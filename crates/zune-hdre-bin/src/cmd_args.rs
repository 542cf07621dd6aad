use clap::{value_parser, Arg, ArgAction, Command};

#[rustfmt::skip]
pub fn create_cmd_args() -> Command {
    Command::new("zune-hdre")
        .about("Inspect and unpack HDRE cubemap environments")
        .arg(Arg::new("in")
            .short('i')
            .help("Input file to read data from")
            .long("input")
            .action(ArgAction::Append)
            .required(true))
        .arg(Arg::new("out")
            .short('o')
            .long("out")
            .help("Directory to write raw face data to")
            .long_help("Directory to write raw face data to.\nEvery face of every level is written as native endian f32 values to <out>/<input stem>/level{L}_face{F}.raw"))
        .arg(Arg::new("probe")
            .long("probe")
            .action(ArgAction::SetTrue)
            .help("Print header information of the inputs as JSON"))
        .arg(Arg::new("debug")
            .long("debug")
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display debug information and higher"))
        .arg(Arg::new("trace")
            .long("trace")
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display very verbose information"))
        .arg(Arg::new("warn")
            .long("warn")
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display warnings and errors"))
        .arg(Arg::new("info")
            .long("info")
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display information about the decoding options"))
        .arg(Arg::new("mip-levels")
            .long("mip-levels")
            .help_heading("ADVANCED")
            .help("Number of mip levels stored in the files")
            .value_parser(value_parser!(usize))
            .default_value("6"))
        .arg(Arg::new("max-width")
            .long("max-width")
            .help_heading("ADVANCED")
            .help("Maximum face width, larger files are rejected")
            .value_parser(value_parser!(usize))
            .default_value("16384"))
        .arg(Arg::new("max-height")
            .long("max-height")
            .help_heading("ADVANCED")
            .help("Maximum face height, larger files are rejected")
            .value_parser(value_parser!(usize))
            .default_value("16384"))
        .arg(Arg::new("no-strict")
            .long("no-strict")
            .action(ArgAction::SetTrue)
            .help_heading("ADVANCED")
            .help("Decode non square faces instead of rejecting them"))
        .arg(Arg::new("single-thread")
            .long("single-thread")
            .action(ArgAction::SetTrue)
            .help_heading("ADVANCED")
            .help("Build mip levels on the calling thread only"))
}
