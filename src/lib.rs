#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

/*
 * gpsjson: GPSD telemetry parsing, sampling and projection.
 *
 * Data flow:
 *   raw lines -> record decoding -> sampling
 *     -> local plane projection (+ density) -> position plot
 *     -> sky geometry projection            -> sky plot
 *
 * Rendering is left to the caller (see gpsjson-cli).
 */

pub mod constants;
pub mod density;
pub mod local;
pub mod reader;
pub mod record;
pub mod sampling;
pub mod sky;
pub mod skyplot;
pub mod tpv;

mod error;

#[cfg(test)]
mod tests;

pub use error::{Error, ParsingError, Stage};

/// Package to include all basic structures
pub mod prelude {
    pub use crate::density::DensityGrid;
    pub use crate::local::LocalFrame;
    pub use crate::reader::BufferedReader;
    pub use crate::record::Message;
    pub use crate::sampling::{sample, sample_lines, sample_path, SampleSet, SamplingPolicy};
    pub use crate::sky::{SatelliteObservation, SkyFrame};
    pub use crate::skyplot::{Marker, PointColor, SkyPlotOpts, SkyPoint, SkyProjection};
    pub use crate::tpv::PositionFix;
    pub use crate::{Error, ParsingError, Stage};
}
