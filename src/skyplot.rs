//! Sky plot geometry.
//!
//! Satellites are projected on a polar plot: the radius is the zenith angle
//! (`90° - elevation`, so the zenith is the center and the horizon the rim)
//! and the angle is the azimuth, with north on top, increasing clockwise.
//! This convention is fixed: renderers should use [SkyPoint::to_cartesian].
use itertools::Itertools;
use log::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    constants::ZENITH_ELEVATION,
    prelude::{SatelliteObservation, SkyFrame},
    Error, Stage,
};

/// Converts an elevation angle (degrees) to a sky plot radius
pub fn elevation_to_radius(elevation: f64) -> f64 {
    ZENITH_ELEVATION - elevation
}

/// Marker shape
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Marker {
    /// Satellite used in the fix
    Circle,
    /// Satellite in view, but not used in the fix
    Triangle,
    /// Current (most recent) satellite position
    Hexagon,
}

/// Point color
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PointColor {
    /// Position on the colormap [0, 1], from the SNR
    /// normalized within its own frame
    Gradient(f64),
    /// Solid accent color, reserved to the current frame
    Accent,
}

/// Sky plot options
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SkyPlotOpts {
    /// Marker size for past positions
    pub marker_size: u32,
    /// Marker size for the current frame
    pub current_marker_size: u32,
}

impl Default for SkyPlotOpts {
    fn default() -> Self {
        Self {
            marker_size: 3,
            current_marker_size: 7,
        }
    }
}

/// [SkyPoint] is one drawable satellite position.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SkyPoint {
    /// Angle in degrees, clockwise from north
    pub azimuth: f64,
    /// Radius in degrees, 0 at zenith, 90 on the horizon
    pub radius: f64,
    /// SNR in dB-Hz
    pub snr: f64,
    /// Accent for the current frame, SNR gradient otherwise
    pub color: PointColor,
    /// Marker size, in pixels
    pub size: u32,
    /// Marker shape, see [Marker]
    pub marker: Marker,
    /// Drawing order, higher is drawn on top
    pub z_order: usize,
    /// Satellite used in the fix
    pub used: bool,
    /// PRN, when reported
    pub prn: Option<u16>,
}

impl SkyPoint {
    /// Returns (x, y) cartesian coordinates, north being +y and east +x.
    pub fn to_cartesian(&self) -> (f64, f64) {
        let theta = self.azimuth.to_radians();
        (self.radius * theta.sin(), self.radius * theta.cos())
    }
}

/// [SkyProjection] gathers all drawable points of a sky plot.
#[derive(Debug, Clone, Default)]
pub struct SkyProjection {
    /// Drawable points, in drawing order
    pub points: Vec<SkyPoint>,
    /// Number of frames that were projected
    pub frames: usize,
    /// Number of observations that were dropped
    pub invalid: usize,
    /// SNR (min, max) accross all frames, when at least one point exists
    pub snr_range: Option<(f64, f64)>,
}

impl SkyProjection {
    /// Projects all frames, the last one being the current frame.
    pub fn project(frames: &[SkyFrame], opts: &SkyPlotOpts) -> Result<Self, Error> {
        let current = frames.len().checked_sub(1);
        Self::project_with_current(frames, current, opts)
    }

    /// Projects all frames, `current` being the index of the frame
    /// to emphasize. The current frame is always projected last.
    pub fn project_with_current(
        frames: &[SkyFrame],
        current: Option<usize>,
        opts: &SkyPlotOpts,
    ) -> Result<Self, Error> {
        if frames.is_empty() {
            return Err(Error::EmptyDataset { stage: Stage::Sky });
        }

        let mut projection = Self {
            frames: frames.len(),
            ..Default::default()
        };

        for (z_order, frame) in frames.iter().enumerate() {
            if Some(z_order) != current {
                projection.project_frame(frame, z_order, false, opts);
            }
        }
        if let Some(frame) = current.and_then(|index| frames.get(index)) {
            projection.project_frame(frame, frames.len(), true, opts);
        }

        projection.snr_range = projection
            .points
            .iter()
            .map(|point| point.snr)
            .minmax()
            .into_option();

        if projection.invalid > 0 {
            debug!(
                "{} invalid satellite observation(s) dropped",
                projection.invalid
            );
        }
        Ok(projection)
    }

    fn project_frame(&mut self, frame: &SkyFrame, z_order: usize, current: bool, opts: &SkyPlotOpts) {
        let valid: Vec<&SatelliteObservation> = frame.valid_satellites().collect();
        self.invalid += frame.satellites.len() - valid.len();

        let (min, max) = match valid.iter().map(|sat| sat.snr).minmax().into_option() {
            Some(minmax) => minmax,
            None => return,
        };

        for sat in valid {
            let used = sat.used.unwrap_or_default();
            let (color, size, marker) = if current {
                (PointColor::Accent, opts.current_marker_size, Marker::Hexagon)
            } else {
                let norm = if max > min {
                    (sat.snr - min) / (max - min)
                } else {
                    0.0
                };
                let marker = if used {
                    Marker::Circle
                } else {
                    Marker::Triangle
                };
                (PointColor::Gradient(norm), opts.marker_size, marker)
            };
            self.points.push(SkyPoint {
                azimuth: sat.azimuth,
                radius: elevation_to_radius(sat.elevation),
                snr: sat.snr,
                color,
                size,
                marker,
                z_order,
                used,
                prn: sat.prn,
            });
        }
    }

    /// Number of drawable points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when nothing may be drawn
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
