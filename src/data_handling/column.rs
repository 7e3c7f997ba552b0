use std::fmt;

use serde::de::{self, Deserialize, Deserializer, MapAccess, Visitor};

use crate::error::{FeedError, FeedResult};

/// One observation inside a column, timestamp still in feed text form.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnEntry {
    pub label: String,
    pub timestamp_text: String,
    pub value: f64,
}

/// One streaming update: `{"label": ["YYYY-MM-DD HH-MM-SS", value], ...}`.
///
/// Entries keep document order and duplicate labels are preserved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Column {
    entries: Vec<ColumnEntry>,
}

impl Column {
    pub fn new(entries: Vec<ColumnEntry>) -> Self {
        Column { entries }
    }

    /// Validates a text payload into a column. Anything that is not an object of
    /// `[string, number]` pairs is rejected as a whole.
    pub fn parse(text: &str) -> FeedResult<Self> {
        serde_json::from_str(text).map_err(|e| FeedError::Parse(e.to_string()))
    }

    pub fn entries(&self) -> &[ColumnEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

struct ColumnVisitor;

impl<'de> Visitor<'de> for ColumnVisitor {
    type Value = Column;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an object mapping labels to [timestamp, value] pairs")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Column, A::Error> {
        let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some(label) = map.next_key::<String>()? {
            let (timestamp_text, value) = map.next_value::<(String, f64)>().map_err(|e| {
                de::Error::custom(format!("entry {:?}: {}", label, e))
            })?;
            entries.push(ColumnEntry {
                label,
                timestamp_text,
                value,
            });
        }
        Ok(Column { entries })
    }
}

impl<'de> Deserialize<'de> for Column {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ColumnVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_column() {
        let column =
            Column::parse(r#"{"eth0 in":["2013-01-01 00-00-00",12],"eth0 out":["2013-01-01 00-00-00",3.5]}"#)
                .unwrap();
        assert_eq!(
            column.entries(),
            &[
                ColumnEntry {
                    label: "eth0 in".into(),
                    timestamp_text: "2013-01-01 00-00-00".into(),
                    value: 12.0,
                },
                ColumnEntry {
                    label: "eth0 out".into(),
                    timestamp_text: "2013-01-01 00-00-00".into(),
                    value: 3.5,
                },
            ]
        );
    }

    #[test]
    fn test_parse_keeps_duplicates_in_order() {
        let column =
            Column::parse(r#"{"A":["2013-01-01 00-00-00",1],"A":["2013-01-01 00-00-01",2]}"#).unwrap();
        let values: Vec<f64> = column.entries().iter().map(|e| e.value).collect();
        assert_eq!(values, vec![1.0, 2.0]);
    }

    #[test]
    fn test_parse_empty_object() {
        assert!(Column::parse("{}").unwrap().is_empty());
    }

    #[test]
    fn test_reject_malformed() {
        for text in [
            "Ping",
            "",
            "[]",
            "null",
            r#"{"A":"2013-01-01 00-00-00"}"#,
            r#"{"A":["2013-01-01 00-00-00"]}"#,
            r#"{"A":["2013-01-01 00-00-00",1,2]}"#,
            r#"{"A":["2013-01-01 00-00-00","1"]}"#,
            r#"{"A":[1357000000,1]}"#,
            r#"{"A":["2013-01-01 00-00-00",null]}"#,
            r#"{"A":["2013-01-01 00-00-00",1]"#,
        ] {
            assert!(
                matches!(Column::parse(text), Err(FeedError::Parse(_))),
                "{:?} should be rejected",
                text
            );
        }
    }
}
