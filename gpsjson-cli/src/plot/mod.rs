use std::path::Path;

use hifitime::Epoch;
use plotters::{
    coord::Shift,
    prelude::*,
    style::text_anchor::{HPos, Pos, VPos},
};

use crate::Error;

pub mod position;
pub mod skyplot;

/// Footnote strip height, in pixels
const FOOTNOTE_HEIGHT: u32 = 30;

/// Output image format, deduced from the file extension
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Format {
    /// Vector graphics
    Svg,
    /// Bitmap, encoded according to the extension (PNG, BMP..)
    Bitmap,
}

impl Format {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("svg") => Self::Svg,
            _ => Self::Bitmap,
        }
    }
}

/// Maps a normalized value to the SNR colormap
pub fn viridis(t: f64) -> RGBColor {
    let color = colorous::VIRIDIS.eval_continuous(t.clamp(0.0, 1.0));
    RGBColor(color.r, color.g, color.b)
}

/// Current UTC date and time, as printed in footnotes
pub fn timestamp() -> Option<String> {
    match Epoch::now() {
        Ok(now) => {
            let (y, m, d, hh, mm, ss, _) = now.to_gregorian_utc();
            Some(format!(
                "{:04}-{:02}-{:02} {:02}:{:02}:{:02} UTC",
                y, m, d, hh, mm, ss
            ))
        },
        Err(e) => {
            warn!("failed to determine current time: {}", e);
            None
        },
    }
}

/// Appends the current date and time to given footnote
pub fn footnote(text: &str) -> String {
    match timestamp() {
        Some(timestamp) => format!("{} | {}", timestamp, text),
        None => text.to_string(),
    }
}

/// Splits the root area into (plot, footnote) areas
pub fn split_footnote<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
) -> (DrawingArea<DB, Shift>, DrawingArea<DB, Shift>) {
    let (_, height) = root.dim_in_pixel();
    let height = height.saturating_sub(FOOTNOTE_HEIGHT);
    root.split_vertically(height as i32)
}

/// Draws the footnote, right aligned
pub fn draw_footnote<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    text: &str,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let (width, height) = area.dim_in_pixel();
    let style = TextStyle::from(("monospace", 12).into_font())
        .color(&BLACK)
        .pos(Pos::new(HPos::Right, VPos::Center));
    area.draw_text(text, &style, (width as i32 - 10, height as i32 / 2))
}

/// Converts a drawing failure
pub fn rendering_error<E: std::error::Error + Send + Sync>(e: DrawingAreaErrorKind<E>) -> Error {
    Error::RenderingError(e.to_string())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn output_format() {
        assert_eq!(Format::from_path(Path::new("sky.svg")), Format::Svg);
        assert_eq!(Format::from_path(Path::new("/tmp/SKY.SVG")), Format::Svg);
        assert_eq!(Format::from_path(Path::new("pos.png")), Format::Bitmap);
        assert_eq!(Format::from_path(Path::new("pos.bmp")), Format::Bitmap);
        assert_eq!(Format::from_path(Path::new("pos")), Format::Bitmap);
    }

    #[test]
    fn colormap_bounds() {
        let low = viridis(0.0);
        let high = viridis(1.0);
        assert_ne!(low, high);
        assert_eq!(viridis(-1.0), low);
        assert_eq!(viridis(2.0), high);
    }

    #[test]
    fn footnote_content() {
        let text = footnote("12 data samples");
        assert!(text.ends_with("12 data samples"));
    }
}
