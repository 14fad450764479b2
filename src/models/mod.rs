//! Typed records built from aggregated API payloads
//!
//! This is the normalization layer downstream of ingestion. Each model is
//! built from an [`AggregatedRecord`] (or a raw course listing entry), runs
//! HTML-bearing fields through the rich-text extractor, and offers the
//! display helpers and flat export rows the output writers consume.

mod announcement;
mod assignment;
mod course;
mod fields;
mod module;

pub use announcement::{sort_newest_first, Announcement, MESSAGE_PREVIEW_CHARS, RECENT_DAYS};
pub use assignment::{upcoming_only, Assignment};
pub use course::Course;
pub use module::{flatten_modules, Module, ModuleItem};

use crate::aggregate::AggregatedRecord;
use crate::ModelError;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Ordered `(column, value)` pairs for one exported row
pub type ExportRow = Vec<(&'static str, String)>;

/// An export row that serializes as one object, columns in row order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowRecord(pub ExportRow);

impl Serialize for RowRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (column, value) in &self.0 {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

/// Converts every record, skipping (and logging) the ones that are malformed
pub fn normalize<T, F>(records: &[AggregatedRecord], convert: F) -> Vec<T>
where
    F: Fn(&AggregatedRecord) -> Result<T, ModelError>,
{
    records
        .iter()
        .filter_map(|record| match convert(record) {
            Ok(model) => Some(model),
            Err(e) => {
                tracing::warn!(
                    "Skipping malformed record from course {}: {}",
                    record.course_id(),
                    e
                );
                None
            }
        })
        .collect()
}
