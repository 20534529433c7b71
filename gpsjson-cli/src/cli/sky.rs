// Sky (SKY) opmode
use std::path::PathBuf;

use clap::{ArgMatches, Command};
use gpsjson::prelude::SamplingPolicy;

pub fn subcommand() -> Command {
    let cmd = Command::new("sky")
        .visible_alias("skyplot")
        .arg_required_else_help(true)
        .about("Polar plot of satellite positions, colored by SNR.")
        .long_about(
            "Polar plot of satellite positions, colored by SNR.
The most recent SKY message is emphasized.
By default, 50 lines evenly spaced over the input are considered.",
        );
    super::common_args(cmd)
}

/// Sky plot options, defined by user
#[derive(Debug, Clone, PartialEq)]
pub struct SkyOpts {
    pub input: PathBuf,
    pub output: PathBuf,
    pub policy: SamplingPolicy,
    pub dimensions: (u32, u32),
}

impl SkyOpts {
    pub fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            input: super::input(matches).to_path_buf(),
            output: super::output(matches).to_path_buf(),
            policy: super::sampling_policy(
                matches,
                SamplingPolicy::uniform(SamplingPolicy::DEFAULT_COUNT),
            ),
            dimensions: super::dimensions(matches),
        }
    }
}
