use std::io::Write;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::data_handling::{Datapoint, SeriesRegistry};

/// Series labels that belong on one y-axis.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct AxisOptions {
    #[serde(default)]
    pub labels: Vec<String>,
}

/// The part of the chart configuration the feed needs to build a dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartOptions {
    pub yaxes: Vec<AxisOptions>,
}

impl ChartOptions {
    pub fn new(yaxes: Vec<AxisOptions>) -> Self {
        ChartOptions { yaxes }
    }

    /// 1-based y-axis index for `label`. When several axes list it, the last one wins.
    pub fn yaxis_for(&self, label: &str) -> Option<usize> {
        self.yaxes
            .iter()
            .enumerate()
            .filter(|(_, axis)| axis.labels.iter().any(|l| l == label))
            .map(|(k, _)| k + 1)
            .last()
    }
}

/// One line in the dataset handed to the chart widget.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotSeries {
    pub label: String,
    pub data: Vec<Datapoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<usize>,
}

/// Ordered series list, serialized as `[{label, data: [[ms, value], ...]}, ...]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Dataset {
    series: Vec<PlotSeries>,
}

impl Dataset {
    pub fn from_registry(registry: &SeriesRegistry, options: &ChartOptions) -> Self {
        let series = registry
            .iter()
            .map(|s| PlotSeries {
                label: s.label().to_string(),
                data: s.points().copied().collect(),
                yaxis: options.yaxis_for(s.label()),
            })
            .collect();
        Dataset { series }
    }

    pub fn series(&self) -> &[PlotSeries] {
        &self.series
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// The chart widget. Draw requests are fire-and-forget.
pub trait Renderer {
    fn draw(&mut self, dataset: &Dataset);
}

impl<F: FnMut(&Dataset)> Renderer for F {
    fn draw(&mut self, dataset: &Dataset) {
        self(dataset)
    }
}

/// Logs one summary line per series.
#[derive(Debug, Default)]
pub struct LogRenderer;

impl Renderer for LogRenderer {
    fn draw(&mut self, dataset: &Dataset) {
        for series in dataset.series() {
            match series.data.last() {
                Some(dp) => info!(
                    "{}: {} points, latest {} @ {}",
                    series.label,
                    series.data.len(),
                    dp.value,
                    dp.timestamp
                ),
                None => info!("{}: no points", series.label),
            }
        }
    }
}

/// Writes each dataset as one JSON line, ready for the chart widget.
#[derive(Debug)]
pub struct JsonRenderer<W: Write> {
    out: W,
}

impl<W: Write> JsonRenderer<W> {
    pub fn new(out: W) -> Self {
        JsonRenderer { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for JsonRenderer<W> {
    fn draw(&mut self, dataset: &Dataset) {
        let res = serde_json::to_writer(&mut self.out, dataset)
            .map_err(std::io::Error::from)
            .and_then(|_| self.out.write_all(b"\n"))
            .and_then(|_| self.out.flush());
        if let Err(e) = res {
            warn!("Failed to write dataset: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_handling::Column;
    use crate::feed::Snapshot;

    fn seeded(snapshot: &str, options: &ChartOptions) -> Dataset {
        let mut registry = SeriesRegistry::new(4);
        registry.seed(&Snapshot::parse(snapshot).unwrap());
        Dataset::from_registry(&registry, options)
    }

    fn options() -> ChartOptions {
        ChartOptions::new(vec![
            AxisOptions {
                labels: vec!["eth0 in".into(), "eth0 out".into()],
            },
            AxisOptions {
                labels: vec!["conns".into()],
            },
        ])
    }

    #[test]
    fn test_yaxis_assignment() {
        let options = options();
        assert_eq!(options.yaxis_for("eth0 in"), Some(1));
        assert_eq!(options.yaxis_for("conns"), Some(2));
        assert_eq!(options.yaxis_for("other"), None);

        let overlapping = ChartOptions::new(vec![
            AxisOptions { labels: vec!["x".into()] },
            AxisOptions { labels: vec!["x".into()] },
        ]);
        assert_eq!(overlapping.yaxis_for("x"), Some(2));
    }

    #[test]
    fn test_dataset_json_shape() {
        let dataset = seeded(
            r#"[{"label":"conns","data":[[1,5]]},{"label":"misc","data":[[2,6]]}]"#,
            &options(),
        );
        assert_eq!(
            serde_json::to_string(&dataset).unwrap(),
            r#"[{"label":"conns","data":[[1000,5.0]],"yaxis":2},{"label":"misc","data":[[2000,6.0]]}]"#
        );
    }

    #[test]
    fn test_dataset_from_registry_keeps_order() {
        let mut registry = SeriesRegistry::new(4);
        registry.apply_column(
            &Column::parse(r#"{"b":["2013-01-01 00-00-00",1],"a":["2013-01-01 00-00-00",2]}"#)
                .unwrap(),
        );
        let dataset = Dataset::from_registry(&registry, &ChartOptions::default());
        let labels: Vec<&str> = dataset.series().iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["b", "a"]);
    }

    #[test]
    fn test_json_renderer_writes_lines() {
        let dataset = seeded(r#"[{"label":"A","data":[[1,1]]}]"#, &ChartOptions::default());

        let mut renderer = JsonRenderer::new(Vec::new());
        renderer.draw(&dataset);
        renderer.draw(&dataset);
        let out = String::from_utf8(renderer.into_inner()).unwrap();
        assert_eq!(out.lines().count(), 2);
        assert!(out.starts_with(r#"[{"label":"A""#));
    }
}
