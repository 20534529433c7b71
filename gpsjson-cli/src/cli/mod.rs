use std::path::{Path, PathBuf};

use clap::{value_parser, Arg, ArgAction, ArgMatches, ColorChoice, Command};
use gpsjson::prelude::SamplingPolicy;

mod position;
mod sky;

pub use position::PositionOpts;
pub use sky::SkyOpts;

/// Default output dimensions, in pixels
pub const DEFAULT_DIMENSIONS: (u32, u32) = (1024, 1024);

pub struct Cli {
    /// Arguments passed by user
    pub matches: ArgMatches,
}

impl Default for Cli {
    fn default() -> Self {
        Self::new()
    }
}

impl Cli {
    /// Build new command line interface
    pub fn new() -> Self {
        Self {
            matches: Self::command().get_matches(),
        }
    }

    /// Command line definition
    pub fn command() -> Command {
        Command::new("gpsjsonplot")
            .version(env!("CARGO_PKG_VERSION"))
            .about("GPSD JSON telemetry plotter")
            .long_about(
                "gpsjsonplot reads a GPSD JSON log (one message per line)
and renders either a local position scatter plot (TPV messages)
or a satellite sky plot (SKY messages).",
            )
            .arg_required_else_help(true)
            .subcommand_required(true)
            .color(ColorChoice::Always)
            .arg(
                Arg::new("quiet")
                    .short('q')
                    .long("quiet")
                    .global(true)
                    .action(ArgAction::SetTrue)
                    .help("Only report errors and malformed records."),
            )
            .subcommand(position::subcommand())
            .subcommand(sky::subcommand())
    }

    /// True when -q (quiet) option is active
    pub fn quiet(&self) -> bool {
        self.matches.get_flag("quiet")
    }
}

/*
 * Input, output and sampling options shared by all opmodes
 */
fn common_args(cmd: Command) -> Command {
    cmd.next_help_heading("Input / Output")
        .arg(
            Arg::new("json")
                .short('j')
                .long("json")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .action(ArgAction::Set)
                .required(true)
                .help("GPSD JSON log. Gzip compressed files (.gz) are supported."),
        )
        .arg(
            Arg::new("outfile")
                .short('o')
                .long("outfile")
                .value_name("IMG")
                .value_parser(value_parser!(PathBuf))
                .action(ArgAction::Set)
                .required(true)
                .help("Output image. The .svg extension selects vector rendering, anything else is rendered as a bitmap."),
        )
        .arg(
            Arg::new("width")
                .long("width")
                .value_name("PIXELS")
                .value_parser(value_parser!(u32).range(64..))
                .action(ArgAction::Set)
                .help("Image width (default: 1024)."),
        )
        .arg(
            Arg::new("height")
                .long("height")
                .value_name("PIXELS")
                .value_parser(value_parser!(u32).range(64..))
                .action(ArgAction::Set)
                .help("Image height (default: 1024)."),
        )
        .next_help_heading("Sampling")
        .arg(
            Arg::new("every")
                .short('e')
                .long("every")
                .value_name("K")
                .value_parser(value_parser!(u64).range(1..))
                .action(ArgAction::Set)
                .conflicts_with("count")
                .help("Keep every K-th line of the input."),
        )
        .arg(
            Arg::new("count")
                .short('n')
                .long("n")
                .value_name("N")
                .value_parser(value_parser!(u64))
                .action(ArgAction::Set)
                .help("Keep N lines, evenly spaced over the input. 0 keeps all lines."),
        )
}

/// Input file
fn input(matches: &ArgMatches) -> &Path {
    matches
        .get_one::<PathBuf>("json")
        .map(|path| path.as_path())
        .unwrap_or(Path::new(""))
}

/// Output file
fn output(matches: &ArgMatches) -> &Path {
    matches
        .get_one::<PathBuf>("outfile")
        .map(|path| path.as_path())
        .unwrap_or(Path::new(""))
}

/// Sampling policy: --every takes precedence, `default` applies otherwise
fn sampling_policy(matches: &ArgMatches, default: SamplingPolicy) -> SamplingPolicy {
    if let Some(every) = matches.get_one::<u64>("every") {
        SamplingPolicy::stride(*every as usize)
    } else if let Some(n) = matches.get_one::<u64>("count") {
        SamplingPolicy::uniform(*n as usize)
    } else {
        default
    }
}

/// Image dimensions
fn dimensions(matches: &ArgMatches) -> (u32, u32) {
    let width = matches
        .get_one::<u32>("width")
        .copied()
        .unwrap_or(DEFAULT_DIMENSIONS.0);
    let height = matches
        .get_one::<u32>("height")
        .copied()
        .unwrap_or(DEFAULT_DIMENSIONS.1);
    (width, height)
}

#[cfg(test)]
mod test {
    use super::*;

    fn parse(args: &[&str]) -> Result<ArgMatches, clap::Error> {
        Cli::command().try_get_matches_from(args)
    }

    #[test]
    fn position_defaults() {
        let matches = parse(&["gpsjsonplot", "pos", "-j", "gps.json", "-o", "pos.png"]).unwrap();
        assert!(!matches.get_flag("quiet"));
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, "pos");
        let opts = PositionOpts::from_matches(sub);
        assert_eq!(opts.input, PathBuf::from("gps.json"));
        assert_eq!(opts.output, PathBuf::from("pos.png"));
        assert_eq!(opts.policy, SamplingPolicy::stride(10));
        assert_eq!(opts.contour_levels, 6);
        assert_eq!(opts.dimensions, DEFAULT_DIMENSIONS);
    }

    #[test]
    fn sky_defaults() {
        let matches = parse(&["gpsjsonplot", "-q", "sky", "--json", "gps.json.gz", "--outfile", "sky.svg"])
            .unwrap();
        assert!(matches.get_flag("quiet"));
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, "sky");
        let opts = SkyOpts::from_matches(sub);
        assert_eq!(opts.input, PathBuf::from("gps.json.gz"));
        assert_eq!(opts.policy, SamplingPolicy::uniform(50));
    }

    #[test]
    fn sampling_options() {
        let matches = parse(&["gpsjsonplot", "pos", "-j", "a", "-o", "b", "--n", "200"]).unwrap();
        let (_, sub) = matches.subcommand().unwrap();
        assert_eq!(
            PositionOpts::from_matches(sub).policy,
            SamplingPolicy::uniform(200)
        );

        let matches = parse(&["gpsjsonplot", "sky", "-j", "a", "-o", "b", "--every", "3"]).unwrap();
        let (_, sub) = matches.subcommand().unwrap();
        assert_eq!(SkyOpts::from_matches(sub).policy, SamplingPolicy::stride(3));

        // exclusive
        assert!(parse(&["gpsjsonplot", "pos", "-j", "a", "-o", "b", "-e", "3", "-n", "4"]).is_err());
        // null stride
        assert!(parse(&["gpsjsonplot", "pos", "-j", "a", "-o", "b", "-e", "0"]).is_err());
    }

    #[test]
    fn quiet_after_subcommand() {
        let matches = parse(&["gpsjsonplot", "sky", "-j", "a", "-o", "b", "-q"]).unwrap();
        assert!(matches.get_flag("quiet"));
    }

    #[test]
    fn missing_arguments() {
        assert!(parse(&["gpsjsonplot", "pos", "-j", "a"]).is_err());
        assert!(parse(&["gpsjsonplot", "sky", "-o", "b"]).is_err());
        assert!(parse(&["gpsjsonplot", "track", "-j", "a", "-o", "b"]).is_err());
    }

    #[test]
    fn dimensions_and_contours() {
        let matches = parse(&[
            "gpsjsonplot", "pos", "-j", "a", "-o", "b", "--width", "800", "--height", "600",
            "--contour", "0",
        ])
        .unwrap();
        let (_, sub) = matches.subcommand().unwrap();
        let opts = PositionOpts::from_matches(sub);
        assert_eq!(opts.dimensions, (800, 600));
        assert_eq!(opts.contour_levels, 0);
    }
}
