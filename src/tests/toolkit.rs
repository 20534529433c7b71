use std::path::PathBuf;

/// Returns the path to given test resource
pub fn test_resource(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("test_resources")
        .join(name)
}

/// Builds a valid TPV line
pub fn tpv_line(lat: f64, lon: f64, alt: f64) -> String {
    format!(
        r#"{{"class":"TPV","device":"/dev/ttyACM0","mode":3,"lat":{},"lon":{},"alt":{}}}"#,
        lat, lon, alt
    )
}

/// Builds a valid SKY line, from (azimuth, elevation, snr, used) tuples
pub fn sky_line(satellites: &[(f64, f64, f64, bool)]) -> String {
    let satellites = satellites
        .iter()
        .map(|(az, el, ss, used)| {
            format!(
                r#"{{"az":{},"el":{},"ss":{},"used":{}}}"#,
                az, el, ss, used
            )
        })
        .collect::<Vec<_>>()
        .join(",");
    format!(r#"{{"class":"SKY","satellites":[{}]}}"#, satellites)
}
