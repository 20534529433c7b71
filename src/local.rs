//! Local tangent plane projection of position fixes.
//!
//! The projection is an equirectangular approximation: a constant
//! [METERS_PER_DEGREE] scaling, the longitude axis being shrunk by the
//! cosine of the mean latitude. There is no ellipsoid nor curvature
//! correction: this is only accurate over small areas (tens of km at most),
//! which is what a static receiver produces.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use statrs::statistics::Statistics;

use crate::{constants::METERS_PER_DEGREE, prelude::PositionFix, Error, Stage};

/// Offsets from the first value, and their mean.
/// Identical values have an exact null offset.
fn offsets(values: impl Iterator<Item = f64>) -> (Vec<f64>, f64) {
    let mut first = None;
    let offsets: Vec<f64> = values
        .map(|value| value - *first.get_or_insert(value))
        .collect();
    let mean = offsets.iter().mean();
    (offsets, mean)
}

/// Local plane summary of a set of [PositionFix]es.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LocalFrame {
    /// Origin (mean latitude, mean longitude) in decimal degrees
    pub origin: (f64, f64),
    /// Meters per degree, along (longitude, latitude) axes
    pub meters_per_degree: (f64, f64),
    /// (x, y) coordinates in meters, one per fix:
    /// x points east, y points north.
    pub points: Vec<(f64, f64)>,
    /// Standard deviation of x coordinates, in meters
    pub std_x: f64,
    /// Standard deviation of y coordinates, in meters
    pub std_y: f64,
    /// Standard deviation of the altitude, in meters
    pub std_alt: f64,
    /// Symmetric plot bound in meters, used on both axes
    pub lim: f64,
}

impl LocalFrame {
    /// Projects all fixes on the plane tangent to their arithmetic mean.
    pub fn from_fixes(fixes: &[PositionFix]) -> Result<Self, Error> {
        let first = fixes.first().ok_or(Error::EmptyDataset {
            stage: Stage::Position,
        })?;

        // the mean is evaluated relative to the first fix,
        // so coincident fixes project exactly onto the origin
        let (dlat, dlat_mean) = offsets(fixes.iter().map(|fix| fix.latitude));
        let (dlon, dlon_mean) = offsets(fixes.iter().map(|fix| fix.longitude));
        let (dalt, _) = offsets(fixes.iter().map(|fix| fix.altitude));

        let origin = (first.latitude + dlat_mean, first.longitude + dlon_mean);
        let meters_per_degree = (
            METERS_PER_DEGREE * origin.0.to_radians().cos(),
            METERS_PER_DEGREE,
        );

        let x: Vec<f64> = dlon
            .iter()
            .map(|dlon| (dlon - dlon_mean) * meters_per_degree.0)
            .collect();
        let y: Vec<f64> = dlat
            .iter()
            .map(|dlat| (dlat - dlat_mean) * meters_per_degree.1)
            .collect();

        let lim = x.iter().abs_max().max(y.iter().abs_max()).ceil();

        Ok(Self {
            origin,
            meters_per_degree,
            std_x: x.iter().population_std_dev(),
            std_y: y.iter().population_std_dev(),
            std_alt: dalt.iter().population_std_dev(),
            points: x.into_iter().zip(y).collect(),
            lim,
        })
    }

    /// Number of projected fixes
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false: a [LocalFrame] has at least one point
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns the symmetric (min, max) bounds.
    /// When all fixes coincide, `lim` is zero and
    /// `fallback` is returned instead, for the plot to remain drawable.
    pub fn bounds(&self, fallback: f64) -> (f64, f64) {
        if self.lim > 0.0 {
            (-self.lim, self.lim)
        } else {
            (-fallback, fallback)
        }
    }

    /// X coordinates (meters east of origin)
    pub fn x(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|(x, _)| *x)
    }

    /// Y coordinates (meters north of origin)
    pub fn y(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|(_, y)| *y)
    }
}

#[cfg(test)]
mod test {
    use super::LocalFrame;
    use crate::{prelude::PositionFix, Error, Stage};

    fn fix(latitude: f64, longitude: f64, altitude: f64) -> PositionFix {
        PositionFix {
            index: 0,
            latitude,
            longitude,
            altitude,
            mode: Some(3),
            time: None,
        }
    }

    #[test]
    fn empty_dataset() {
        match LocalFrame::from_fixes(&[]) {
            Err(Error::EmptyDataset { stage }) => assert_eq!(stage, Stage::Position),
            other => panic!("expecting empty dataset error, got {:?}", other),
        }
    }

    #[test]
    fn single_fix() {
        let frame = LocalFrame::from_fixes(&[fix(52.2, 21.0, 110.0)]).unwrap();
        assert_eq!(frame.origin, (52.2, 21.0));
        assert_eq!(frame.points, vec![(0.0, 0.0)]);
        assert_eq!(frame.std_x, 0.0);
        assert_eq!(frame.std_y, 0.0);
        assert_eq!(frame.std_alt, 0.0);
        assert_eq!(frame.lim, 0.0);
        assert_eq!(frame.bounds(1.0), (-1.0, 1.0));
    }

    #[test]
    fn equator_projection() {
        let fixes = [fix(0.001, 0.0, 10.0), fix(-0.001, 0.0, 20.0)];
        let frame = LocalFrame::from_fixes(&fixes).unwrap();
        assert_eq!(frame.origin, (0.0, 0.0));
        assert_eq!(frame.meters_per_degree, (111_000.0, 111_000.0));
        assert!((frame.points[0].1 - 111.0).abs() < 1e-9);
        assert!((frame.points[1].1 + 111.0).abs() < 1e-9);
        assert!((frame.std_y - 111.0).abs() < 1e-9);
        assert_eq!(frame.std_x, 0.0);
        assert_eq!(frame.std_alt, 5.0);
        assert_eq!(frame.lim, 111.0);
        assert_eq!(frame.bounds(1.0), (-111.0, 111.0));
    }

    #[test]
    fn longitude_is_scaled() {
        // at 60° latitude, one degree of longitude is half as long
        let fixes = [fix(60.0, 10.001, 0.0), fix(60.0, 9.999, 0.0)];
        let frame = LocalFrame::from_fixes(&fixes).unwrap();
        assert!((frame.meters_per_degree.0 - 55_500.0).abs() < 1e-6);
        assert!((frame.points[0].0 - 55.5).abs() < 1e-6);
        assert!((frame.points[1].0 + 55.5).abs() < 1e-6);
        assert!(frame.y().all(|y| y == 0.0));
        assert_eq!(frame.lim, 56.0);
    }

    #[test]
    fn lim_is_symmetric() {
        let fixes = [
            fix(45.0, 5.0, 0.0),
            fix(45.0002, 5.0003, 0.0),
            fix(44.9995, 5.0001, 0.0),
        ];
        let frame = LocalFrame::from_fixes(&fixes).unwrap();
        let max = frame
            .points
            .iter()
            .fold(0.0_f64, |max, (x, y)| max.max(x.abs()).max(y.abs()));
        assert!(frame.lim >= max);
        assert!(frame.lim < max + 1.0);
        assert_eq!(frame.len(), 3);
    }
}
