//! Chart JSON writer.
//!
//! Output document:
//!
//! ```json
//! {
//!   "candles":  [{ "time", "open", "high", "low", "close" }],
//!   "volume":   [{ "time", "value", "color": "#26a69a" | "#ef5350" }],
//!   "overlays": [{ "window", "label", "points": [{ "time", "value" }] }]
//! }
//! ```

use crate::domain::error::KlineError;
use crate::domain::indicator::MovingAveragePoint;
use crate::domain::ohlcv::{PricePoint, VolumePoint};
use crate::domain::series::ChartSeries;
use crate::ports::render_port::RenderPort;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Serialize)]
struct ChartDocument<'a> {
    candles: &'a [PricePoint],
    volume: Vec<VolumeBar>,
    overlays: Vec<OverlayLine<'a>>,
}

#[derive(Serialize)]
struct VolumeBar {
    time: i64,
    value: f64,
    color: &'static str,
}

#[derive(Serialize)]
struct OverlayLine<'a> {
    window: usize,
    label: String,
    points: &'a [MovingAveragePoint],
}

impl<'a> ChartDocument<'a> {
    fn new(chart: &'a ChartSeries) -> Self {
        Self {
            candles: &chart.price,
            volume: chart.volume.iter().map(VolumeBar::from).collect(),
            overlays: chart
                .overlays
                .iter()
                .map(|o| OverlayLine {
                    window: o.window,
                    label: o.label(),
                    points: &o.points,
                })
                .collect(),
        }
    }
}

impl From<&VolumePoint> for VolumeBar {
    fn from(point: &VolumePoint) -> Self {
        Self {
            time: point.time,
            value: point.value,
            color: point.color.hex(),
        }
    }
}

/// Serializes a chart to a pretty-printed JSON string.
pub fn chart_to_json(chart: &ChartSeries) -> Result<String, KlineError> {
    Ok(serde_json::to_string_pretty(&ChartDocument::new(chart))?)
}

pub struct JsonRenderAdapter {
    output_path: PathBuf,
}

impl JsonRenderAdapter {
    pub fn new(output_path: PathBuf) -> Self {
        Self { output_path }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    fn create_output(&self) -> Result<File, KlineError> {
        if let Some(parent) = self.output_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| KlineError::Render {
                    reason: format!("cannot create {}: {}", parent.display(), e),
                })?;
            }
        }
        File::create(&self.output_path).map_err(|e| KlineError::Render {
            reason: format!("cannot write {}: {}", self.output_path.display(), e),
        })
    }
}

impl RenderPort for JsonRenderAdapter {
    fn render(&self, chart: &ChartSeries) -> Result<(), KlineError> {
        let mut writer = BufWriter::new(self.create_output()?);
        serde_json::to_writer_pretty(&mut writer, &ChartDocument::new(chart))?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        info!(
            path = %self.output_path.display(),
            candles = chart.price.len(),
            volume = chart.volume.len(),
            overlays = chart.overlays.len(),
            "chart written"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::MovingAverageOverlay;
    use crate::domain::ohlcv::BarColor;
    use serde_json::Value;
    use tempfile::TempDir;

    fn sample_chart() -> ChartSeries {
        ChartSeries {
            price: vec![
                PricePoint {
                    time: 1_740_965_400,
                    open: 11.52,
                    high: 11.60,
                    low: 11.50,
                    close: 11.55,
                },
                PricePoint {
                    time: 1_740_965_700,
                    open: 11.55,
                    high: 11.70,
                    low: 11.40,
                    close: 11.45,
                },
            ],
            volume: vec![
                VolumePoint {
                    time: 1_740_965_400,
                    value: 3726.0,
                    color: BarColor::Up,
                },
                VolumePoint {
                    time: 1_740_965_700,
                    value: 5000.0,
                    color: BarColor::Down,
                },
            ],
            overlays: vec![MovingAverageOverlay {
                window: 2,
                points: vec![MovingAveragePoint {
                    time: 1_740_965_700,
                    value: 11.5,
                }],
            }],
        }
    }

    #[test]
    fn render_writes_chart_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("chart.json");
        let adapter = JsonRenderAdapter::new(path.clone());

        adapter.render(&sample_chart()).unwrap();

        let doc: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(doc["candles"].as_array().unwrap().len(), 2);
        assert_eq!(doc["candles"][0]["time"], 1_740_965_400);
        assert_eq!(doc["candles"][1]["close"], 11.45);
        assert_eq!(doc["volume"][0]["color"], "#26a69a");
        assert_eq!(doc["volume"][1]["color"], "#ef5350");
        assert_eq!(doc["volume"][1]["value"], 5000.0);
        assert_eq!(doc["overlays"][0]["window"], 2);
        assert_eq!(doc["overlays"][0]["label"], "MA2");
        assert_eq!(doc["overlays"][0]["points"][0]["value"], 11.5);
    }

    #[test]
    fn empty_chart_renders_empty_arrays() {
        let chart = ChartSeries {
            price: Vec::new(),
            volume: Vec::new(),
            overlays: Vec::new(),
        };
        let doc: Value = serde_json::from_str(&chart_to_json(&chart).unwrap()).unwrap();
        assert_eq!(doc["candles"], Value::Array(Vec::new()));
        assert_eq!(doc["volume"], Value::Array(Vec::new()));
        assert_eq!(doc["overlays"], Value::Array(Vec::new()));
    }

    #[test]
    fn unwritable_path_is_a_render_error() {
        let dir = TempDir::new().unwrap();
        // The output path is an existing directory.
        let adapter = JsonRenderAdapter::new(dir.path().to_path_buf());
        assert!(matches!(
            adapter.render(&sample_chart()),
            Err(KlineError::Render { .. })
        ));
    }

    #[test]
    fn blocked_parent_dir_is_a_render_error() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("charts");
        fs::write(&blocker, "not a directory").unwrap();

        let adapter = JsonRenderAdapter::new(blocker.join("chart.json"));
        let err = adapter.render(&sample_chart()).unwrap_err();
        assert!(matches!(&err, KlineError::Render { reason } if reason.contains("cannot create")));
        assert_eq!(err.exit_status(), 3);
    }
}
