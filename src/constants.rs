//! Constants

/// Approximate length of one degree of latitude, in meters.
/// Also used for longitude, scaled by the cosine of the latitude.
pub const METERS_PER_DEGREE: f64 = 111_000.0;

/// Elevation of the zenith, in degrees.
/// Sky plot radius is the complementary angle of the elevation.
pub const ZENITH_ELEVATION: f64 = 90.0;

/// Lowest proportion of the probability mass, left outside
/// of the outermost density contour.
pub const DENSITY_THRESHOLD: f64 = 0.05;
