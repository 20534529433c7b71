//! Sky plot: satellite positions on a polar grid, colored by SNR.
//! Plotters has no polar coordinates: the grid is drawn on a square
//! cartesian chart, north up, east right.
use plotters::{
    coord::Shift,
    prelude::*,
    style::text_anchor::{HPos, Pos, VPos},
};

use gpsjson::{
    prelude::{Marker, PointColor, SkyPoint, SkyProjection},
    skyplot::elevation_to_radius,
};

use super::{draw_footnote, footnote, rendering_error, split_footnote, viridis, Format};
use crate::{cli::SkyOpts, Error};

/// Current frame color
const ACCENT: RGBColor = RGBColor(255, 140, 0);
const GRID: RGBColor = RGBColor(180, 180, 180);

/// Horizon radius
const RIM: f64 = 90.0;
/// Chart half width, leaves room for azimuth labels
const RANGE: f64 = 105.0;

const TITLE: &str = "Satellite Positions with SNR";

/// Footnote describing the dataset
pub fn description(projection: &SkyProjection) -> String {
    format!("{} data samples", projection.frames)
}

/// Renders the sky plot to the output file
pub fn render(projection: &SkyProjection, opts: &SkyOpts) -> Result<(), Error> {
    let text = footnote(&description(projection));
    match Format::from_path(&opts.output) {
        Format::Svg => {
            let root = SVGBackend::new(&opts.output, opts.dimensions).into_drawing_area();
            draw(&root, projection, &text).map_err(rendering_error)?;
        },
        Format::Bitmap => {
            let root = BitMapBackend::new(&opts.output, opts.dimensions).into_drawing_area();
            draw(&root, projection, &text).map_err(rendering_error)?;
        },
    }
    Ok(())
}

/// Azimuth label, cardinal points are named
fn azimuth_label(azimuth: u16) -> String {
    match azimuth {
        0 => "N".to_string(),
        90 => "E".to_string(),
        180 => "S".to_string(),
        270 => "W".to_string(),
        _ => format!("{}°", azimuth),
    }
}

/// Regular polygon, pointing up, in pixels around its anchor
fn vertices(sides: usize, size: i32) -> Vec<(i32, i32)> {
    (0..sides)
        .map(|k| {
            let theta = (k as f64 * 360.0 / sides as f64 - 90.0).to_radians();
            let size = size as f64;
            (
                (size * theta.cos()).round() as i32,
                (size * theta.sin()).round() as i32,
            )
        })
        .collect()
}

fn point_color(point: &SkyPoint) -> RGBColor {
    match point.color {
        PointColor::Gradient(t) => viridis(t),
        PointColor::Accent => ACCENT,
    }
}

/// Filled marker with a thin edge, anchored at given coordinates
fn glyph<'a, DB: DrawingBackend + 'a, C: Clone + 'a>(
    anchor: C,
    marker: Marker,
    size: i32,
    color: RGBColor,
) -> DynElement<'a, DB, C> {
    let fill = color.mix(0.85).filled();
    let edge = BLACK.mix(0.6).stroke_width(1);
    let anchor = EmptyElement::at(anchor);
    let polygon = |sides: usize| {
        let shape = vertices(sides, size);
        let mut outline = shape.clone();
        outline.push(shape[0]);
        (Polygon::new(shape, fill), PathElement::new(outline, edge))
    };
    match marker {
        Marker::Circle => {
            (anchor + Circle::new((0, 0), size, fill) + Circle::new((0, 0), size, edge)).into_dyn()
        },
        Marker::Triangle => {
            let (shape, outline) = polygon(3);
            (anchor + shape + outline).into_dyn()
        },
        Marker::Hexagon => {
            let (shape, outline) = polygon(6);
            (anchor + shape + outline).into_dyn()
        },
    }
}

fn draw<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    projection: &SkyProjection,
    footnote: &str,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    root.fill(&WHITE)?;
    let root = root.titled(TITLE, ("sans-serif", 20))?;

    let (plot, footer) = split_footnote(&root);
    let (width, _) = plot.dim_in_pixel();
    let (polar, colorbar) = plot.split_horizontally(width as i32 - width as i32 / 8);

    // square polar area, for rings to remain circular
    let (w, h) = polar.dim_in_pixel();
    let side = w.min(h);
    let (dx, dy) = (((w - side) / 2) as i32, ((h - side) / 2) as i32);
    let polar = polar.margin(dy, dy, dx, dx);

    let mut chart = ChartBuilder::on(&polar)
        .margin(10)
        .build_cartesian_2d(-RANGE..RANGE, -RANGE..RANGE)?;

    // elevation rings
    for elevation in (0..90).step_by(15) {
        let radius = elevation_to_radius(elevation as f64);
        let ring: Vec<(f64, f64)> = (0..=360)
            .map(|deg| {
                let theta = (deg as f64).to_radians();
                (radius * theta.sin(), radius * theta.cos())
            })
            .collect();
        chart.draw_series(std::iter::once(PathElement::new(ring, GRID.stroke_width(1))))?;
        chart.draw_series(std::iter::once(Text::new(
            format!("{}°", elevation),
            (2.0, radius - 2.0),
            ("sans-serif", 11).into_font().color(&GRID),
        )))?;
    }

    // azimuth spokes
    let label_style = ("sans-serif", 14)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Center));
    for azimuth in (0..360_u16).step_by(30) {
        let theta = (azimuth as f64).to_radians();
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(0.0, 0.0), (RIM * theta.sin(), RIM * theta.cos())],
            GRID.stroke_width(1),
        )))?;
        chart.draw_series(std::iter::once(Text::new(
            azimuth_label(azimuth),
            ((RIM + 8.0) * theta.sin(), (RIM + 8.0) * theta.cos()),
            label_style.clone(),
        )))?;
    }

    let mut points: Vec<&SkyPoint> = projection.points.iter().collect();
    points.sort_by_key(|point| point.z_order);
    chart.draw_series(points.into_iter().map(|point| {
        glyph::<DB, _>(
            point.to_cartesian(),
            point.marker,
            point.size as i32,
            point_color(point),
        )
    }))?;

    // legend
    let entries = [
        ("current sat position", Marker::Hexagon, ACCENT),
        ("used", Marker::Circle, viridis(0.5)),
        ("not used", Marker::Triangle, viridis(0.5)),
    ];
    for (label, marker, color) in entries {
        chart
            .draw_series(std::iter::empty::<Circle<(f64, f64), i32>>())?
            .label(label)
            .legend(move |(x, y)| glyph::<DB, _>((x, y), marker, 5, color));
    }
    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::LowerLeft)
        .border_style(&BLACK)
        .background_style(WHITE.filled())
        .draw()?;

    if let Some(range) = projection.snr_range {
        draw_colorbar(&colorbar, range)?;
    }

    draw_footnote(&footer, footnote)?;
    root.present()?;
    Ok(())
}

/*
 * Vertical colormap legend, over the SNR range
 */
fn draw_colorbar<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    range: (f64, f64),
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let (min, max) = if range.1 > range.0 {
        range
    } else {
        (range.0 - 0.5, range.1 + 0.5)
    };

    let mut chart = ChartBuilder::on(area)
        .margin_top(60)
        .margin_bottom(60)
        .margin_right(20)
        .y_label_area_size(50)
        .build_cartesian_2d(0.0..1.0, min..max)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .disable_x_axis()
        .y_desc("SNR (dB-Hz)")
        .y_label_formatter(&|snr| format!("{:.0}", snr))
        .draw()?;

    const STEPS: usize = 100;
    chart.draw_series((0..STEPS).map(|k| {
        let t0 = k as f64 / STEPS as f64;
        let t1 = (k + 1) as f64 / STEPS as f64;
        Rectangle::new(
            [(0.0, min + t0 * (max - min)), (1.0, min + t1 * (max - min))],
            viridis((t0 + t1) / 2.0).filled(),
        )
    }))?;
    Ok(())
}
