// Position (TPV) opmode
use std::path::PathBuf;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use gpsjson::prelude::SamplingPolicy;

/// Default number of density contour levels
pub const DEFAULT_CONTOUR_LEVELS: usize = 6;

pub fn subcommand() -> Command {
    let cmd = Command::new("pos")
        .visible_alias("position")
        .arg_required_else_help(true)
        .about("Scatter plot of TPV fixes, in meters around the mean location.")
        .long_about(
            "Scatter plot of TPV fixes, in meters around the mean location,
with density contours and marginal distributions.
By default, every 10th line of the input is considered.",
        );
    super::common_args(cmd).next_help_heading("Rendering").arg(
        Arg::new("contour")
            .short('c')
            .long("contour")
            .value_name("LEVELS")
            .value_parser(value_parser!(usize))
            .action(ArgAction::Set)
            .help("Number of density contour levels (default: 6). 0 disables the overlay."),
    )
}

/// Position plot options, defined by user
#[derive(Debug, Clone, PartialEq)]
pub struct PositionOpts {
    pub input: PathBuf,
    pub output: PathBuf,
    pub policy: SamplingPolicy,
    pub contour_levels: usize,
    pub dimensions: (u32, u32),
}

impl PositionOpts {
    pub fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            input: super::input(matches).to_path_buf(),
            output: super::output(matches).to_path_buf(),
            policy: super::sampling_policy(matches, SamplingPolicy::default()),
            contour_levels: matches
                .get_one::<usize>("contour")
                .copied()
                .unwrap_or(DEFAULT_CONTOUR_LEVELS),
            dimensions: super::dimensions(matches),
        }
    }
}
