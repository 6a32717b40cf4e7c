use crate::braille::BrailleCanvas;
use crate::map::geometry::draw_line;

/// A geographic line (sequence of lon/lat coordinates)
pub type LineString = Vec<(f64, f64)>;

/// A map outline for one view: polylines plus their geographic bounding box.
/// Rendering stretch-fits the box into the canvas with a fixed margin, the
/// same way the original placed its raster maps.
pub struct OutlineSheet {
    lines: Vec<LineString>,
    min_lon: f64,
    min_lat: f64,
    max_lon: f64,
    max_lat: f64,
}

impl OutlineSheet {
    pub fn new(lines: Vec<LineString>) -> Self {
        let mut min_lon = f64::INFINITY;
        let mut min_lat = f64::INFINITY;
        let mut max_lon = f64::NEG_INFINITY;
        let mut max_lat = f64::NEG_INFINITY;

        for line in &lines {
            for &(lon, lat) in line {
                min_lon = min_lon.min(lon);
                min_lat = min_lat.min(lat);
                max_lon = max_lon.max(lon);
                max_lat = max_lat.max(lat);
            }
        }

        // Degenerate sheet gets a unit box so rendering stays well-defined
        if !min_lon.is_finite() {
            min_lon = 0.0;
            min_lat = 0.0;
            max_lon = 1.0;
            max_lat = 1.0;
        }

        Self {
            lines,
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(|line| line.len() < 2)
    }

    /// Draw the outline into the canvas, stretch-fit with a 4% margin.
    /// Latitude grows upward, pixel rows grow downward.
    pub fn render(&self, canvas: &mut BrailleCanvas) {
        let pw = canvas.pixel_width() as f64;
        let ph = canvas.pixel_height() as f64;
        if pw < 4.0 || ph < 4.0 {
            return;
        }

        let margin_x = pw * 0.04;
        let margin_y = ph * 0.04;
        let map_w = pw - margin_x * 2.0;
        let map_h = ph - margin_y * 2.0;

        let span_lon = (self.max_lon - self.min_lon).max(1e-9);
        let span_lat = (self.max_lat - self.min_lat).max(1e-9);

        let project = |lon: f64, lat: f64| -> (i32, i32) {
            let x = margin_x + (lon - self.min_lon) / span_lon * map_w;
            let y = margin_y + (1.0 - (lat - self.min_lat) / span_lat) * map_h;
            (x.round() as i32, y.round() as i32)
        };

        for line in &self.lines {
            let mut prev: Option<(i32, i32)> = None;
            for &(lon, lat) in line {
                let (px, py) = project(lon, lat);
                if let Some((prev_x, prev_y)) = prev {
                    draw_line(canvas, prev_x, prev_y, px, py);
                }
                prev = Some((px, py));
            }
        }
    }
}

/// Coarse contiguous-US outline used when the national GeoJSON asset is
/// missing, the flat-color-placeholder analogue.
pub fn national_fallback() -> OutlineSheet {
    OutlineSheet::new(vec![vec![
        (-124.7, 48.4),
        (-110.0, 49.0),
        (-95.2, 49.0),
        (-88.4, 48.3),
        (-84.8, 46.9),
        (-82.4, 45.3),
        (-82.1, 42.5),
        (-79.0, 43.3),
        (-76.8, 43.6),
        (-74.8, 45.0),
        (-71.5, 45.0),
        (-69.2, 47.4),
        (-67.8, 47.1),
        (-66.9, 44.8),
        (-70.2, 43.6),
        (-70.0, 41.7),
        (-74.0, 40.5),
        (-75.5, 39.2),
        (-75.9, 36.9),
        (-75.5, 35.2),
        (-80.9, 32.0),
        (-80.0, 26.8),
        (-80.4, 25.2),
        (-81.8, 26.0),
        (-82.7, 27.9),
        (-84.0, 30.1),
        (-85.3, 29.7),
        (-89.1, 29.2),
        (-90.2, 29.1),
        (-93.8, 29.7),
        (-97.1, 27.9),
        (-97.1, 25.9),
        (-99.1, 26.4),
        (-101.4, 29.8),
        (-103.1, 29.0),
        (-104.9, 30.6),
        (-106.5, 31.8),
        (-108.2, 31.8),
        (-111.1, 31.3),
        (-114.8, 32.5),
        (-117.1, 32.5),
        (-118.4, 33.7),
        (-120.6, 34.5),
        (-122.0, 36.9),
        (-123.0, 38.0),
        (-124.4, 40.3),
        (-124.1, 43.4),
        (-124.0, 46.3),
        (-124.7, 48.4),
    ]])
}

/// Coarse California outline fallback for the regional view
pub fn regional_fallback() -> OutlineSheet {
    OutlineSheet::new(vec![vec![
        (-124.4, 42.0),
        (-120.0, 42.0),
        (-120.0, 39.0),
        (-114.6, 35.0),
        (-114.6, 34.3),
        (-114.1, 34.3),
        (-114.5, 32.8),
        (-117.1, 32.5),
        (-118.4, 33.7),
        (-120.6, 34.5),
        (-121.9, 36.6),
        (-122.5, 37.7),
        (-123.0, 38.3),
        (-123.8, 39.7),
        (-124.4, 40.3),
        (-124.1, 41.1),
        (-124.4, 42.0),
    ]])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_cover_all_lines() {
        let sheet = OutlineSheet::new(vec![
            vec![(-10.0, 5.0), (0.0, 8.0)],
            vec![(3.0, -2.0), (7.0, 1.0)],
        ]);
        assert_eq!(sheet.min_lon, -10.0);
        assert_eq!(sheet.max_lon, 7.0);
        assert_eq!(sheet.min_lat, -2.0);
        assert_eq!(sheet.max_lat, 8.0);
    }

    #[test]
    fn test_empty_sheet_is_well_defined() {
        let sheet = OutlineSheet::new(Vec::new());
        assert!(sheet.is_empty());

        // Rendering nothing must not panic or draw
        let mut canvas = BrailleCanvas::new(10, 5);
        sheet.render(&mut canvas);
        assert!(canvas.to_string().chars().all(|c| c == '\u{2800}' || c == '\n'));
    }

    #[test]
    fn test_render_marks_pixels() {
        let mut canvas = BrailleCanvas::new(20, 10);
        national_fallback().render(&mut canvas);
        let drawn = canvas
            .to_string()
            .chars()
            .filter(|&c| c != '\u{2800}' && c != '\n')
            .count();
        assert!(drawn > 0);
    }

    #[test]
    fn test_fallbacks_are_closed_rings() {
        for sheet in [national_fallback(), regional_fallback()] {
            assert!(!sheet.is_empty());
            let ring = &sheet.lines[0];
            assert_eq!(ring.first(), ring.last());
        }
    }
}
