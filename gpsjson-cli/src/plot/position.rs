//! Position scatter plot, with density overlay and marginals.
use plotters::{coord::Shift, prelude::*};

use gpsjson::{
    density::{marginal, DensityGrid},
    prelude::LocalFrame,
};

use super::{draw_footnote, footnote, rendering_error, split_footnote, Format};
use crate::{cli::PositionOpts, Error};

const SILVER: RGBColor = RGBColor(192, 192, 192);

/// Plot half width (meters), when all fixes coincide
const FALLBACK_LIM: f64 = 1.0;

const CONTOUR_RESOLUTION: usize = 100;
const MARGINAL_RESOLUTION: usize = 200;

const MARGIN: u32 = 5;
const X_LABEL_AREA: u32 = 40;
const Y_LABEL_AREA: u32 = 60;

/// Footnote describing the dataset
pub fn description(frame: &LocalFrame) -> String {
    format!(
        "{} points. STD: alt: {:.2}m lat: {:.2}m, lon: {:.2}m",
        frame.len(),
        frame.std_alt,
        frame.std_y,
        frame.std_x
    )
}

/// Renders the position plot to the output file
pub fn render(frame: &LocalFrame, opts: &PositionOpts) -> Result<(), Error> {
    let text = footnote(&description(frame));
    match Format::from_path(&opts.output) {
        Format::Svg => {
            let root = SVGBackend::new(&opts.output, opts.dimensions).into_drawing_area();
            draw(&root, frame, opts.contour_levels, &text).map_err(rendering_error)?;
        },
        Format::Bitmap => {
            let root = BitMapBackend::new(&opts.output, opts.dimensions).into_drawing_area();
            draw(&root, frame, opts.contour_levels, &text).map_err(rendering_error)?;
        },
    }
    Ok(())
}

fn draw<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    frame: &LocalFrame,
    contour_levels: usize,
    footnote: &str,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    root.fill(&WHITE)?;

    let (plot, footer) = split_footnote(root);
    let (width, height) = plot.dim_in_pixel();
    let (top, bottom) = plot.split_vertically(height as i32 / 6);
    let split = width as i32 - width as i32 / 6;
    let (top_strip, _) = top.split_horizontally(split);
    let (joint, right_strip) = bottom.split_horizontally(split);

    let (min, max) = frame.bounds(FALLBACK_LIM);

    let mut chart = ChartBuilder::on(&joint)
        .margin(MARGIN)
        .x_label_area_size(X_LABEL_AREA)
        .y_label_area_size(Y_LABEL_AREA)
        .build_cartesian_2d(min..max, min..max)?;

    chart
        .configure_mesh()
        .x_desc("Longitude (meters from mean)")
        .y_desc("Latitude (meters from mean)")
        .x_label_formatter(&|x| format!("{:.1}", x))
        .y_label_formatter(&|y| format!("{:.1}", y))
        .draw()?;

    chart.draw_series(frame.points.iter().map(|point| {
        EmptyElement::at(*point)
            + Circle::new((0, 0), 3, SILVER.filled())
            + Circle::new((0, 0), 3, BLACK.stroke_width(1))
    }))?;

    if contour_levels > 0 {
        match DensityGrid::estimate(&frame.points, (min, max), CONTOUR_RESOLUTION) {
            Some(grid) => {
                let levels = grid.levels(contour_levels);
                debug!("{} density level(s)", levels.len());
                // denser is darker
                for (k, level) in levels.iter().enumerate() {
                    let alpha = 0.3 + 0.7 * (k + 1) as f64 / levels.len() as f64;
                    chart.draw_series(grid.contour(*level).into_iter().map(|(a, b)| {
                        PathElement::new(vec![a, b], RED.mix(alpha).stroke_width(1))
                    }))?;
                }
            },
            None => debug!("no spread: density overlay skipped"),
        }
    }

    chart
        .draw_series(std::iter::once(Cross::new(
            (0.0, 0.0),
            8,
            RED.stroke_width(3),
        )))?
        .label("Mean Location")
        .legend(|(x, y)| Cross::new((x, y), 5, RED.stroke_width(2)));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .border_style(&BLACK)
        .background_style(WHITE.filled())
        .draw()?;

    let x: Vec<f64> = frame.x().collect();
    let y: Vec<f64> = frame.y().collect();
    draw_marginal(&top_strip, &x, (min, max), false)?;
    draw_marginal(&right_strip, &y, (min, max), true)?;

    draw_footnote(&footer, footnote)?;
    root.present()?;
    Ok(())
}

/*
 * Draws a 1D density strip, aligned with the main chart.
 * The vertical strip has density along x.
 */
fn draw_marginal<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    data: &[f64],
    bounds: (f64, f64),
    vertical: bool,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let curve = match marginal(data, bounds, MARGINAL_RESOLUTION) {
        Some(curve) => curve,
        None => return Ok(()),
    };

    let peak = curve.iter().map(|(_, density)| *density).fold(0.0, f64::max) * 1.05;
    let (min, max) = bounds;

    let mut builder = ChartBuilder::on(area);
    builder.margin(MARGIN);

    let (curve, outline) = if vertical {
        builder.x_label_area_size(X_LABEL_AREA);
        let curve: Vec<(f64, f64)> = curve.into_iter().map(|(node, d)| (d, node)).collect();
        let mut outline = vec![(0.0, min)];
        outline.extend(curve.iter().copied());
        outline.push((0.0, max));
        (curve, outline)
    } else {
        builder.y_label_area_size(Y_LABEL_AREA);
        let mut outline = vec![(min, 0.0)];
        outline.extend(curve.iter().copied());
        outline.push((max, 0.0));
        (curve, outline)
    };

    let (x_range, y_range) = if vertical {
        (0.0..peak, min..max)
    } else {
        (min..max, 0.0..peak)
    };

    let mut chart = builder.build_cartesian_2d(x_range, y_range)?;
    chart.draw_series(std::iter::once(Polygon::new(
        outline,
        SILVER.mix(0.6).filled(),
    )))?;
    chart.draw_series(std::iter::once(PathElement::new(
        curve,
        BLACK.stroke_width(1),
    )))?;
    Ok(())
}
