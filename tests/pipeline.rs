use gpsjson::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::io::Cursor;

/*
 * Random GPSD like stream: TPV, SKY, other classes and garbage.
 * Also returns the number of malformed lines.
 */
fn random_stream(rng: &mut StdRng, lines: usize) -> (String, usize) {
    let mut content = String::new();
    let mut malformed = 0;
    for _ in 0..lines {
        let line = match rng.gen_range(0..5) {
            0 => format!(
                r#"{{"class":"TPV","mode":3,"lat":{},"lon":{},"alt":{}}}"#,
                rng.gen_range(45.0..45.001),
                rng.gen_range(5.0..5.001),
                rng.gen_range(190.0..210.0)
            ),
            1 => {
                let satellites = (0..rng.gen_range(0..8))
                    .map(|_| {
                        if rng.gen_bool(0.2) {
                            // unusable entry
                            format!(r#"{{"az":{},"el":{}}}"#, rng.gen_range(0..360), 10)
                        } else {
                            format!(
                                r#"{{"az":{},"el":{},"ss":{},"used":{}}}"#,
                                rng.gen_range(0.0..360.0),
                                rng.gen_range(0.0..90.0),
                                rng.gen_range(10.0..50.0),
                                rng.gen_bool(0.5)
                            )
                        }
                    })
                    .collect::<Vec<_>>()
                    .join(",");
                format!(r#"{{"class":"SKY","satellites":[{}]}}"#, satellites)
            },
            2 => String::from(r#"{"class":"PPS","device":"/dev/pps0"}"#),
            3 => String::from(r#"{"class":"TPV","lat":"#),
            _ => String::from("garbage"),
        };
        content.push_str(&line);
        content.push('\n');
    }
    (content, malformed)
}

#[test]
fn stride_candidates() {
    let mut rng = StdRng::seed_from_u64(0);
    for _ in 0..20 {
        let lines = rng.gen_range(0..200);
        let (content, malformed) = random_stream(&mut rng, lines);
        for every in 1..15 {
            let set: SampleSet<PositionFix> =
                sample(Cursor::new(content.as_bytes()), SamplingPolicy::stride(every))
                    .unwrap();
            assert_eq!(set.total_lines, lines);
            assert_eq!(set.candidates, lines.div_ceil(every));
            assert!(set.len() <= set.candidates);
            // every line is validated, candidate or not
            assert_eq!(set.diagnostics.len(), malformed);
            assert!(set.iter().all(|fix| fix.index % every == 0));
            assert!(set.records.windows(2).all(|w| w[0].index < w[1].index));
        }
    }
}

#[test]
fn uniform_candidates() {
    let mut rng = StdRng::seed_from_u64(1);
    for _ in 0..20 {
        let lines = rng.gen_range(0..200);
        let (content, _) = random_stream(&mut rng, lines);
        for n in 0..60 {
            let set: SampleSet<SkyFrame> =
                sample(Cursor::new(content.as_bytes()), SamplingPolicy::uniform(n)).unwrap();
            if n == 0 {
                assert_eq!(set.candidates, lines);
            } else {
                assert!(set.candidates <= n);
                assert!(set.len() <= n);
            }
            assert!(set.records.windows(2).all(|w| w[0].index < w[1].index));
        }
    }
}

#[test]
fn sky_point_count() {
    let mut rng = StdRng::seed_from_u64(2);
    for _ in 0..20 {
        let (content, _) = random_stream(&mut rng, 300);
        let set: SampleSet<SkyFrame> =
            sample(Cursor::new(content.as_bytes()), SamplingPolicy::uniform(50)).unwrap();
        if set.is_empty() {
            continue;
        }
        let projection =
            SkyProjection::project(&set.records, &SkyPlotOpts::default()).unwrap();

        let pairs: usize = set.iter().map(|frame| frame.satellites.len()).sum();
        let valid: usize = set.iter().map(|frame| frame.valid_satellites().count()).sum();
        assert!(projection.len() <= pairs);
        assert_eq!(projection.len(), valid);
        assert_eq!(projection.len(), pairs - projection.invalid);

        // current frame on top
        let current = set.last().unwrap().valid_satellites().count();
        let (past, last) = projection.points.split_at(projection.len() - current);
        assert!(last.iter().all(|p| p.color == PointColor::Accent));
        assert!(past.iter().all(|p| p.color != PointColor::Accent));
        assert!(projection.points.windows(2).all(|w| w[0].z_order <= w[1].z_order));

        for point in &projection.points {
            assert!((0.0..=90.0).contains(&point.radius));
            if let PointColor::Gradient(t) = point.color {
                assert!((0.0..=1.0).contains(&t));
            }
        }
    }
}

#[test]
fn position_bounds() {
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..20 {
        let (content, _) = random_stream(&mut rng, 300);
        let set: SampleSet<PositionFix> =
            sample(Cursor::new(content.as_bytes()), SamplingPolicy::stride(1)).unwrap();
        if set.is_empty() {
            continue;
        }
        let frame = LocalFrame::from_fixes(&set.records).unwrap();
        assert_eq!(frame.len(), set.len());
        assert!(frame.lim >= 0.0);
        for (x, y) in &frame.points {
            assert!(x.abs() <= frame.lim);
            assert!(y.abs() <= frame.lim);
        }
        let mean_x = frame.x().sum::<f64>() / frame.len() as f64;
        let mean_y = frame.y().sum::<f64>() / frame.len() as f64;
        assert!(mean_x.abs() < 1e-6);
        assert!(mean_y.abs() < 1e-6);
    }
}
