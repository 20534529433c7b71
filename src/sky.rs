//! SKY (satellites in view) messages
use serde_json::Value;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    record::{f64_or_nan, Message, Object},
    ParsingError,
};

/// One satellite, as reported in a SKY message.
/// Missing numerical fields are NaN: unknown is never confused with zero.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SatelliteObservation {
    /// PRN identification number, when reported
    pub prn: Option<u16>,
    /// Azimuth in degrees, clockwise from north [0, 360]
    pub azimuth: f64,
    /// Elevation in degrees above the horizon [0, 90]
    pub elevation: f64,
    /// Signal to noise ratio in dB-Hz
    pub snr: f64,
    /// Whether this satellite contributed to the current fix.
    /// None when not reported.
    pub used: Option<bool>,
}

impl SatelliteObservation {
    /// Builds Self from one entry of the `satellites` array.
    /// This never fails: unusable fields are marked as unknown.
    pub(crate) fn from_value(value: &Value) -> Self {
        match value.as_object() {
            Some(object) => Self {
                prn: object
                    .get("PRN")
                    .and_then(Value::as_u64)
                    .and_then(|prn| u16::try_from(prn).ok()),
                azimuth: f64_or_nan(object, "az"),
                elevation: f64_or_nan(object, "el"),
                snr: f64_or_nan(object, "ss"),
                used: object.get("used").and_then(Value::as_bool),
            },
            None => Self {
                prn: None,
                azimuth: f64::NAN,
                elevation: f64::NAN,
                snr: f64::NAN,
                used: None,
            },
        }
    }

    /// An observation may only be projected when all its attributes are known
    pub fn is_valid(&self) -> bool {
        self.azimuth.is_finite()
            && self.elevation.is_finite()
            && self.snr.is_finite()
            && self.used.is_some()
    }
}

/// [SkyFrame] is one satellite visibility snapshot.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SkyFrame {
    /// 0-based line index, within the source
    pub index: usize,
    /// ISO8601 timestamp, when reported
    pub time: Option<String>,
    /// Satellites in view, in reported order
    pub satellites: Vec<SatelliteObservation>,
}

impl Message for SkyFrame {
    const CLASS: &'static str = "SKY";

    fn from_object(index: usize, object: &Object) -> Result<Self, ParsingError> {
        let satellites = match object.get("satellites").and_then(Value::as_array) {
            Some(entries) => entries
                .iter()
                .map(SatelliteObservation::from_value)
                .collect(),
            None => Vec::new(),
        };
        Ok(Self {
            index,
            satellites,
            time: object
                .get("time")
                .and_then(Value::as_str)
                .map(|time| time.to_string()),
        })
    }
}

impl SkyFrame {
    /// Iterates over observations that may be projected
    pub fn valid_satellites(&self) -> impl Iterator<Item = &SatelliteObservation> + '_ {
        self.satellites.iter().filter(|sat| sat.is_valid())
    }
}

#[cfg(test)]
mod test {
    use super::SkyFrame;
    use crate::record::decode;

    #[test]
    fn sky_parsing() {
        let line = r#"{"class":"SKY","device":"/dev/ttyACM0","time":"2023-11-20T10:15:02.000Z","xdop":0.54,"ydop":0.71,"satellites":[{"PRN":5,"el":38.0,"az":297.0,"ss":41.0,"used":true},{"PRN":13,"el":11.0,"az":37.0,"ss":0.0,"used":false},{"PRN":15,"el":5.0,"az":130.0,"used":false}]}"#;
        let frame = decode::<SkyFrame>(12, line).unwrap().unwrap();
        assert_eq!(frame.index, 12);
        assert_eq!(frame.satellites.len(), 3);

        let sat = frame.satellites[0];
        assert_eq!(sat.prn, Some(5));
        assert_eq!(sat.azimuth, 297.0);
        assert_eq!(sat.elevation, 38.0);
        assert_eq!(sat.snr, 41.0);
        assert_eq!(sat.used, Some(true));
        assert!(sat.is_valid());

        // zero SNR is a valid measurement
        assert!(frame.satellites[1].is_valid());
        assert_eq!(frame.satellites[1].snr, 0.0);

        // missing SNR is unknown, not zero
        assert!(frame.satellites[2].snr.is_nan());
        assert!(!frame.satellites[2].is_valid());

        assert_eq!(frame.valid_satellites().count(), 2);
    }

    #[test]
    fn missing_used_flag_is_invalid() {
        let line = r#"{"class":"SKY","satellites":[{"PRN":5,"el":38.0,"az":297.0,"ss":41.0}]}"#;
        let frame = decode::<SkyFrame>(0, line).unwrap().unwrap();
        assert_eq!(frame.satellites[0].used, None);
        assert_eq!(frame.valid_satellites().count(), 0);
    }

    #[test]
    fn sky_without_satellites() {
        let line = r#"{"class":"SKY","device":"/dev/ttyACM0","nSat":0}"#;
        let frame = decode::<SkyFrame>(0, line).unwrap().unwrap();
        assert!(frame.satellites.is_empty());
    }

    #[test]
    fn non_object_entries() {
        let line = r#"{"class":"SKY","satellites":[42,{"el":"high","az":10.0,"ss":30.0,"used":true}]}"#;
        let frame = decode::<SkyFrame>(0, line).unwrap().unwrap();
        assert_eq!(frame.satellites.len(), 2);
        assert!(!frame.satellites[0].is_valid());
        assert!(frame.satellites[1].elevation.is_nan());
        assert_eq!(frame.valid_satellites().count(), 0);
    }
}
