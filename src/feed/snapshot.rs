use log::{debug, info};
use serde::Deserialize;

use crate::data_handling::timestamp::seconds_to_millis;
use crate::data_handling::Datapoint;
use crate::error::{FeedError, FeedResult};

/// Wire shape of one snapshot series, times in epoch seconds.
#[derive(Debug, Deserialize)]
struct RawSeries {
    label: String,
    #[serde(default)]
    data: Vec<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotSeries {
    pub label: String,
    pub data: Vec<Datapoint>,
}

/// Historical dataset used to initialize a chart, times already in milliseconds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    series: Vec<SnapshotSeries>,
}

impl Snapshot {
    pub fn parse(text: &str) -> FeedResult<Self> {
        let raw: Vec<RawSeries> =
            serde_json::from_str(text).map_err(|e| FeedError::Snapshot(e.to_string()))?;
        Ok(Self::from_raw(raw))
    }

    fn from_raw(raw: Vec<RawSeries>) -> Self {
        let series = raw
            .into_iter()
            .map(|s| SnapshotSeries {
                label: s.label,
                data: s
                    .data
                    .into_iter()
                    .map(|(secs, value)| Datapoint::new(seconds_to_millis(secs), value))
                    .collect(),
            })
            .collect();
        Snapshot { series }
    }

    pub fn series(&self) -> &[SnapshotSeries] {
        &self.series
    }

    /// True when no series carries a point.
    pub fn is_empty(&self) -> bool {
        self.series.iter().all(|s| s.data.is_empty())
    }
}

/// Fetches the snapshot served at `url`.
pub async fn fetch_snapshot(url: &str) -> FeedResult<Snapshot> {
    info!("Fetching snapshot from {}", url);
    let response = reqwest::get(url)
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| FeedError::Snapshot(e.to_string()))?;

    let raw: Vec<RawSeries> = response
        .json()
        .await
        .map_err(|e| FeedError::Snapshot(e.to_string()))?;
    debug!("Snapshot holds {} series", raw.len());

    Ok(Snapshot::from_raw(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seconds_become_millis() {
        let snapshot = Snapshot::parse(
            r#"[{"label":"eth0 in","data":[[1356998400,10],[1356998401.25,11]]}]"#,
        )
        .unwrap();
        assert_eq!(
            snapshot.series(),
            &[SnapshotSeries {
                label: "eth0 in".into(),
                data: vec![
                    Datapoint::new(1_356_998_400_000, 10.0),
                    Datapoint::new(1_356_998_401_250, 11.0),
                ],
            }]
        );
    }

    #[test]
    fn test_empty_and_malformed() {
        assert!(Snapshot::parse("[]").unwrap().is_empty());
        assert!(matches!(Snapshot::parse("{}"), Err(FeedError::Snapshot(_))));
        assert!(matches!(
            Snapshot::parse(r#"[{"label":"A","data":[[1]]}]"#),
            Err(FeedError::Snapshot(_))
        ));
    }

    #[test]
    fn test_missing_data_is_empty_series() {
        let snapshot = Snapshot::parse(r#"[{"label":"A"}]"#).unwrap();
        assert_eq!(snapshot.series()[0].data, vec![]);
        assert!(snapshot.is_empty());
        assert!(!Snapshot::parse(r#"[{"label":"A"},{"label":"B","data":[[1,2]]}]"#)
            .unwrap()
            .is_empty());
    }
}
