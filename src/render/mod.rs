//! SVG output for scans and calibration curves.
//!
//! Two artifacts: a scatter of the reconstructed cloud as two orthographic
//! panels (top view and elevation), and the response curve overlaid with the
//! calibration points it was fitted from. Reporting "no data" for an empty
//! cloud happens here, not in the processing core.

use crate::calibration::CalibrationModel;
use crate::core::types::{CalibrationPoint, Point3D, PointCloud};
use crate::error::Result;
use std::path::Path;
use svg::node::element::{Circle, Polyline, Rectangle, Text};
use svg::Document;

/// Colorblind-friendly palette (Okabe-Ito).
mod colors {
    /// Cloud points - blue
    pub const CLOUD: &str = "#0072B2";
    /// Response curve - vermillion
    pub const CURVE: &str = "#D55E00";
    /// Calibration datapoints - black
    pub const CAL_POINTS: &str = "#000000";
    /// Panel frames and labels - gray
    pub const FRAME: &str = "#999999";
}

/// Reading range the analog front end is usable over; the curve plot spans it.
const CURVE_READING_RANGE: std::ops::RangeInclusive<i32> = 80..=1023;

/// Distance ceiling for the curve plot, in centimeters.
const CURVE_DISTANCE_CEILING: f64 = 200.0;

/// Scatter renderer for reconstructed point clouds.
pub struct CloudRenderer {
    /// Side length of each square panel in pixels
    panel_size: f64,
    /// Margin around and between panels
    margin: f64,
    /// Point mark radius
    point_radius: f64,
}

impl CloudRenderer {
    /// Create a renderer with default geometry (500px panels).
    pub fn new() -> Self {
        Self {
            panel_size: 500.0,
            margin: 40.0,
            point_radius: 2.5,
        }
    }

    /// Render the cloud to an SVG file.
    ///
    /// An empty cloud is reported with a warning and produces no file; that
    /// is not an error.
    pub fn render<P: AsRef<Path>>(&self, cloud: &PointCloud, path: P) -> Result<()> {
        let Some(bounds) = cloud.bounds() else {
            log::warn!("No datapoints to plot (try adjusting the threshold)");
            return Ok(());
        };

        let width = 2.0 * self.panel_size + 3.0 * self.margin;
        let height = self.panel_size + 2.0 * self.margin;
        let mut doc = Document::new()
            .set("width", width)
            .set("height", height)
            .set("viewBox", (0.0, 0.0, width, height));

        // Left panel: top view (x across, y up). Right panel: elevation
        // (x across, z up).
        type Project = fn(&Point3D) -> (f64, f64);
        let panels: [(&str, f64, Project); 2] = [
            ("top view (x/y)", self.margin, |p| (p.x, p.y)),
            (
                "elevation (x/z)",
                2.0 * self.margin + self.panel_size,
                |p| (p.x, p.z),
            ),
        ];

        for (label, origin_x, project) in panels {
            let (min, max) = (
                project(&bounds.min),
                project(&bounds.max),
            );
            doc = doc.add(self.panel_frame(origin_x, label));
            for point in cloud.iter() {
                let (h, v) = project(point);
                let (px, py) = self.to_pixels(h, v, min, max, origin_x);
                doc = doc.add(
                    Circle::new()
                        .set("cx", px)
                        .set("cy", py)
                        .set("r", self.point_radius)
                        .set("fill", colors::CLOUD),
                );
            }
        }

        svg::save(path.as_ref(), &doc)?;
        log::info!(
            "Rendered {} points to {}",
            cloud.len(),
            path.as_ref().display()
        );
        Ok(())
    }

    fn panel_frame(&self, origin_x: f64, label: &str) -> svg::node::element::Group {
        svg::node::element::Group::new()
            .add(
                Rectangle::new()
                    .set("x", origin_x)
                    .set("y", self.margin)
                    .set("width", self.panel_size)
                    .set("height", self.panel_size)
                    .set("fill", "none")
                    .set("stroke", colors::FRAME),
            )
            .add(
                Text::new(label)
                    .set("x", origin_x)
                    .set("y", self.margin - 8.0)
                    .set("fill", colors::FRAME)
                    .set("font-size", 14),
            )
    }

    /// Map a projected coordinate pair into panel pixels (SVG y grows down).
    fn to_pixels(
        &self,
        h: f64,
        v: f64,
        min: (f64, f64),
        max: (f64, f64),
        origin_x: f64,
    ) -> (f64, f64) {
        let span_h = (max.0 - min.0).max(1e-9);
        let span_v = (max.1 - min.1).max(1e-9);
        // One scale for both axes keeps the aspect ratio honest
        let scale = (self.panel_size / span_h).min(self.panel_size / span_v);

        let px = origin_x + (h - min.0) * scale;
        let py = self.margin + self.panel_size - (v - min.1) * scale;
        (px, py)
    }
}

impl Default for CloudRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Render the response curve with its calibration datapoints overlaid.
///
/// Readings whose evaluation lands on the curve's pole are skipped; the
/// plotted distance axis is clamped to the usable ceiling.
pub fn render_fit_curve<P: AsRef<Path>>(
    model: &CalibrationModel,
    points: &[CalibrationPoint],
    path: P,
) -> Result<()> {
    let (width, height) = (640.0, 480.0);
    let margin = 40.0;
    let (inner_w, inner_h) = (width - 2.0 * margin, height - 2.0 * margin);

    let reading_min = f64::from(*CURVE_READING_RANGE.start());
    let reading_max = f64::from(*CURVE_READING_RANGE.end());
    let to_px = |reading: f64, distance: f64| {
        let x = margin + (reading - reading_min) / (reading_max - reading_min) * inner_w;
        let d = distance.clamp(0.0, CURVE_DISTANCE_CEILING);
        let y = height - margin - d / CURVE_DISTANCE_CEILING * inner_h;
        (x, y)
    };

    let curve: Vec<String> = CURVE_READING_RANGE
        .filter_map(|reading| {
            let distance = model.evaluate(f64::from(reading)).ok()?;
            let (x, y) = to_px(f64::from(reading), distance);
            Some(format!("{:.1},{:.1}", x, y))
        })
        .collect();

    let mut doc = Document::new()
        .set("width", width)
        .set("height", height)
        .set("viewBox", (0.0, 0.0, width, height))
        .add(
            Rectangle::new()
                .set("x", margin)
                .set("y", margin)
                .set("width", inner_w)
                .set("height", inner_h)
                .set("fill", "none")
                .set("stroke", colors::FRAME),
        )
        .add(
            Polyline::new()
                .set("points", curve.join(" "))
                .set("fill", "none")
                .set("stroke", colors::CURVE)
                .set("stroke-width", 1.5),
        )
        .add(
            Text::new("reading vs distance (cm)")
                .set("x", margin)
                .set("y", margin - 8.0)
                .set("fill", colors::FRAME)
                .set("font-size", 14),
        );

    for point in points {
        let (x, y) = to_px(point.reading, point.distance_cm);
        doc = doc.add(
            Circle::new()
                .set("cx", x)
                .set("cy", y)
                .set("r", 3.5)
                .set("fill", colors::CAL_POINTS),
        );
    }

    svg::save(path.as_ref(), &doc)?;
    log::info!("Rendered fit curve to {}", path.as_ref().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Point3D;

    #[test]
    fn test_render_cloud_writes_svg() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.svg");

        let cloud: PointCloud = [
            Point3D::new(10.0, 0.0, 5.0),
            Point3D::new(0.0, 10.0, 5.0),
            Point3D::new(-10.0, -10.0, 0.0),
        ]
        .into_iter()
        .collect();

        CloudRenderer::new().render(&cloud, &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("<svg"));
        assert!(contents.contains("circle"));
    }

    #[test]
    fn test_render_empty_cloud_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.svg");

        CloudRenderer::new()
            .render(&PointCloud::new(), &path)
            .unwrap();

        assert!(!path.exists());
    }

    #[test]
    fn test_render_single_point_cloud() {
        // Degenerate bounds (zero span) must not divide by zero
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("one.svg");

        let cloud: PointCloud = [Point3D::new(1.0, 2.0, 3.0)].into_iter().collect();
        CloudRenderer::new().render(&cloud, &path).unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_render_fit_curve() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("curve.svg");

        let points = vec![
            CalibrationPoint::new(520.0, 15.0),
            CalibrationPoint::new(206.0, 60.0),
        ];
        render_fit_curve(&CalibrationModel::default(), &points, &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("polyline"));
        assert!(contents.contains("circle"));
    }
}
