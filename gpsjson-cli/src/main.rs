//! Command line tool to plot GPSD JSON telemetry.
//! Refer to README for command line arguments.
mod cli; // command line interface
mod plot;

use cli::{Cli, PositionOpts, SkyOpts};

use gpsjson::prelude::{
    sample_path, LocalFrame, PositionFix, SampleSet, SkyFrame, SkyPlotOpts, SkyProjection,
};

use env_logger::{Builder, Target};
use log::LevelFilter;

#[macro_use]
extern crate log;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    GpsJsonError(#[from] gpsjson::Error),
    #[error("rendering error: {0}")]
    RenderingError(String),
}

/*
 * Reports the sampling outcome
 */
fn summary<M>(set: &SampleSet<M>) {
    info!(
        "{} record(s) retained, {} candidate line(s) out of {} ({})",
        set.len(),
        set.candidates,
        set.total_lines,
        set.policy
    );
    if !set.diagnostics.is_empty() {
        warn!("{} malformed record(s) skipped", set.diagnostics.len());
    }
}

/*
 * Position (TPV) opmode
 */
fn position(opts: &PositionOpts) -> Result<(), Error> {
    info!("position plot: {}", opts.input.display());
    let set: SampleSet<PositionFix> = sample_path(&opts.input, opts.policy)?;
    summary(&set);

    let frame = LocalFrame::from_fixes(&set.records)?;
    info!(
        "mean location: {:.8}°N {:.8}°E - {}",
        frame.origin.0,
        frame.origin.1,
        plot::position::description(&frame)
    );

    plot::position::render(&frame, opts)?;
    info!("\"{}\" has been generated", opts.output.display());
    Ok(())
}

/*
 * Sky (SKY) opmode
 */
fn sky(opts: &SkyOpts) -> Result<(), Error> {
    info!("sky plot: {}", opts.input.display());
    let set: SampleSet<SkyFrame> = sample_path(&opts.input, opts.policy)?;
    summary(&set);

    let projection = SkyProjection::project(&set.records, &SkyPlotOpts::default())?;
    info!(
        "{} satellite position(s), {} invalid observation(s) dropped",
        projection.len(),
        projection.invalid
    );

    plot::skyplot::render(&projection, opts)?;
    info!("\"{}\" has been generated", opts.output.display());
    Ok(())
}

fn run(cli: &Cli) -> Result<(), Error> {
    match cli.matches.subcommand() {
        Some(("pos", submatches)) => position(&PositionOpts::from_matches(submatches)),
        Some(("sky", submatches)) => sky(&SkyOpts::from_matches(submatches)),
        _ => Ok(()),
    }
}

pub fn main() {
    let cli = Cli::new();

    let mut builder = Builder::from_default_env();
    builder
        .target(Target::Stdout)
        .format_timestamp_secs()
        .format_module_path(false);
    if cli.quiet() {
        builder.filter_level(LevelFilter::Error);
    } else if std::env::var_os("RUST_LOG").is_none() {
        builder.filter_level(LevelFilter::Info);
    }
    builder.init();

    if let Err(e) = run(&cli) {
        error!("{}", e);
        std::process::exit(1);
    }
}
