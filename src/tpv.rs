//! TPV (Time Position Velocity) messages
use serde_json::Value;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    record::{required_f64, Message, Object},
    ParsingError,
};

/// [PositionFix] is one position solution reported by the receiver.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PositionFix {
    /// 0-based line index, within the source
    pub index: usize,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Altitude in meters
    pub altitude: f64,
    /// NMEA fix mode (0: unknown, 1: no fix, 2: 2D, 3: 3D), when reported
    pub mode: Option<u8>,
    /// ISO8601 timestamp, when reported
    pub time: Option<String>,
}

impl Message for PositionFix {
    const CLASS: &'static str = "TPV";

    fn from_object(index: usize, object: &Object) -> Result<Self, ParsingError> {
        Ok(Self {
            index,
            latitude: required_f64(index, object, "lat")?,
            longitude: required_f64(index, object, "lon")?,
            altitude: required_f64(index, object, "alt")?,
            mode: object
                .get("mode")
                .and_then(Value::as_u64)
                .and_then(|mode| u8::try_from(mode).ok()),
            time: object
                .get("time")
                .and_then(Value::as_str)
                .map(|time| time.to_string()),
        })
    }
}

impl PositionFix {
    /// Returns (latitude, longitude, altitude) triplet
    pub fn to_geodetic(&self) -> (f64, f64, f64) {
        (self.latitude, self.longitude, self.altitude)
    }
}

#[cfg(test)]
mod test {
    use super::PositionFix;
    use crate::{record::decode, ParsingError};

    #[test]
    fn tpv_parsing() {
        let line = r#"{"class":"TPV","device":"/dev/ttyACM0","mode":3,"time":"2023-11-20T10:15:02.000Z","ept":0.005,"lat":52.229676,"lon":21.012229,"alt":112.400,"epx":2.412,"epy":2.907,"epv":6.210,"track":0.0000,"speed":0.012,"climb":0.000}"#;
        let fix = decode::<PositionFix>(3, line).unwrap().unwrap();
        assert_eq!(fix.index, 3);
        assert_eq!(fix.to_geodetic(), (52.229676, 21.012229, 112.4));
        assert_eq!(fix.mode, Some(3));
        assert_eq!(fix.time.as_deref(), Some("2023-11-20T10:15:02.000Z"));
    }

    #[test]
    fn tpv_without_fix() {
        // mode 1: no fix, GPSD omits the coordinates
        let line = r#"{"class":"TPV","device":"/dev/ttyACM0","mode":1}"#;
        let err = decode::<PositionFix>(0, line).unwrap_err();
        assert!(matches!(
            err,
            ParsingError::MissingField {
                line: 1,
                field: "lat"
            }
        ));
    }

    #[test]
    fn tpv_missing_altitude() {
        let line = r#"{"class":"TPV","mode":2,"lat":52.2,"lon":21.0}"#;
        let err = decode::<PositionFix>(9, line).unwrap_err();
        assert!(matches!(
            err,
            ParsingError::MissingField {
                line: 10,
                field: "alt"
            }
        ));
    }

    #[test]
    fn tpv_integer_coordinates() {
        let line = r#"{"class":"TPV","lat":52,"lon":21,"alt":100}"#;
        let fix = decode::<PositionFix>(0, line).unwrap().unwrap();
        assert_eq!(fix.to_geodetic(), (52.0, 21.0, 100.0));
        assert!(fix.mode.is_none());
        assert!(fix.time.is_none());
    }
}
