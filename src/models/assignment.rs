use crate::aggregate::AggregatedRecord;
use crate::models::fields::{
    bool_or, f64_field, format_points, format_timestamp, parse_timestamp, require_id, str_field,
    str_or,
};
use crate::models::ExportRow;
use crate::richtext::extract_text;
use crate::ModelError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

/// A course assignment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assignment {
    pub id: String,
    pub name: String,
    pub course_id: String,
    pub course_name: String,
    pub due_at: Option<String>,
    pub points_possible: Option<f64>,
    pub html_url: String,
    pub submission_types: Vec<String>,
    /// Raw HTML description
    pub description: Option<String>,
    /// Description converted to plain text
    pub description_text: Option<String>,
    pub lock_at: Option<String>,
    pub unlock_at: Option<String>,
    pub has_submitted_submissions: bool,
}

impl Assignment {
    pub fn from_record(record: &AggregatedRecord) -> Result<Self, ModelError> {
        let raw = record.payload();
        let description = str_field(raw, "description").filter(|d| !d.trim().is_empty());
        let description_text = description.as_deref().map(extract_text);

        Ok(Self {
            id: require_id(raw)?,
            name: str_or(raw, "name", "Untitled Assignment"),
            course_id: record.course_id().to_string(),
            course_name: record.course_name().to_string(),
            due_at: str_field(raw, "due_at"),
            points_possible: f64_field(raw, "points_possible"),
            html_url: str_or(raw, "html_url", ""),
            submission_types: raw
                .get("submission_types")
                .and_then(Value::as_array)
                .map(|types| {
                    types
                        .iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
            description,
            description_text,
            lock_at: str_field(raw, "lock_at"),
            unlock_at: str_field(raw, "unlock_at"),
            has_submitted_submissions: bool_or(raw, "has_submitted_submissions", false),
        })
    }

    pub fn due_date_formatted(&self) -> String {
        format_timestamp(self.due_at.as_deref(), "No due date")
    }

    /// `online_text_entry` becomes `Online Text Entry`; several are comma-joined
    pub fn submission_types_formatted(&self) -> String {
        if self.submission_types.is_empty() {
            return "None".to_string();
        }
        self.submission_types
            .iter()
            .map(|t| title_case(&t.replace('_', " ")))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn due(&self) -> Option<DateTime<Utc>> {
        self.due_at.as_deref().and_then(parse_timestamp)
    }

    /// Past its due date; assignments without a parsable due date never are
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.due().is_some_and(|due| now > due)
    }

    pub fn is_upcoming(&self, now: DateTime<Utc>) -> bool {
        self.due().is_some_and(|due| now < due)
    }

    pub fn export_row(&self) -> ExportRow {
        let points = match self.points_possible {
            Some(p) if p != 0.0 => format_points(p),
            _ => "N/A".to_string(),
        };

        vec![
            ("Course", self.course_name.clone()),
            ("Assignment", self.name.clone()),
            ("Due Date", self.due_date_formatted()),
            ("Points", points),
            ("Submission Type", self.submission_types_formatted()),
            ("Canvas Link", self.html_url.clone()),
            ("Canvas ID", self.id.clone()),
        ]
    }
}

/// Keeps assignments that are still upcoming or have no due date
pub fn upcoming_only(assignments: Vec<Assignment>, now: DateTime<Utc>) -> Vec<Assignment> {
    assignments
        .into_iter()
        .filter(|a| a.due_at.is_none() || a.is_upcoming(now))
        .collect()
}

fn title_case(s: &str) -> String {
    s.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::CourseContext;
    use chrono::TimeZone;
    use serde_json::json;

    fn record(payload: Value) -> AggregatedRecord {
        AggregatedRecord::new(CourseContext::new("456", "Test Course"), payload)
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_from_record_basic() {
        let assignment = Assignment::from_record(&record(json!({
            "id": 123,
            "name": "Case Memo",
            "due_at": "2026-02-15T23:59:00Z",
            "points_possible": 100.0,
            "html_url": "https://school.instructure.com/courses/456/assignments/123",
            "submission_types": ["online_upload", "online_text_entry"],
            "description": "<p>Write <b>two</b> pages.</p>",
            "has_submitted_submissions": true
        })))
        .unwrap();

        assert_eq!(assignment.id, "123");
        assert_eq!(assignment.course_id, "456");
        assert_eq!(assignment.course_name, "Test Course");
        assert_eq!(assignment.description_text.as_deref(), Some("Write two pages."));
        assert!(assignment.has_submitted_submissions);
        assert_eq!(
            assignment.submission_types_formatted(),
            "Online Upload, Online Text Entry"
        );
        assert_eq!(assignment.due_date_formatted(), "02/15/2026 11:59 PM");
    }

    #[test]
    fn test_missing_optional_fields() {
        let assignment = Assignment::from_record(&record(json!({"id": "9"}))).unwrap();
        assert_eq!(assignment.name, "Untitled Assignment");
        assert_eq!(assignment.submission_types_formatted(), "None");
        assert!(assignment.description.is_none());
        assert!(!assignment.has_submitted_submissions);
    }

    #[test]
    fn test_missing_id_rejected() {
        assert_eq!(
            Assignment::from_record(&record(json!({"name": "x"}))),
            Err(ModelError::MissingField("id"))
        );
    }

    #[test]
    fn test_null_due_date() {
        let assignment =
            Assignment::from_record(&record(json!({"id": 1, "due_at": null}))).unwrap();
        assert!(assignment.due_at.is_none());
        assert_eq!(assignment.due_date_formatted(), "No due date");
        assert!(!assignment.is_overdue(now()));
        assert!(!assignment.is_upcoming(now()));
    }

    #[test]
    fn test_invalid_due_date_shown_raw() {
        let assignment =
            Assignment::from_record(&record(json!({"id": 1, "due_at": "not-a-date"}))).unwrap();
        assert_eq!(assignment.due_date_formatted(), "not-a-date");
        assert!(!assignment.is_overdue(now()));
    }

    #[test]
    fn test_overdue_and_upcoming() {
        let past = Assignment::from_record(&record(
            json!({"id": 1, "due_at": "2026-01-15T12:00:00Z"}),
        ))
        .unwrap();
        let future = Assignment::from_record(&record(
            json!({"id": 2, "due_at": "2026-03-15T12:00:00Z"}),
        ))
        .unwrap();

        assert!(past.is_overdue(now()));
        assert!(!past.is_upcoming(now()));
        assert!(future.is_upcoming(now()));
        assert!(!future.is_overdue(now()));
    }

    #[test]
    fn test_upcoming_only_keeps_undated() {
        let assignments = vec![
            Assignment::from_record(&record(json!({"id": 1, "due_at": "2026-01-15T12:00:00Z"})))
                .unwrap(),
            Assignment::from_record(&record(json!({"id": 2, "due_at": "2026-03-15T12:00:00Z"})))
                .unwrap(),
            Assignment::from_record(&record(json!({"id": 3}))).unwrap(),
        ];

        let ids: Vec<String> = upcoming_only(assignments, now())
            .into_iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(ids, vec!["2", "3"]);
    }

    #[test]
    fn test_export_row() {
        let assignment = Assignment::from_record(&record(
            json!({"id": 5, "name": "Quiz", "points_possible": 0}),
        ))
        .unwrap();
        let row = assignment.export_row();

        let columns: Vec<&str> = row.iter().map(|(c, _)| *c).collect();
        assert_eq!(
            columns,
            vec![
                "Course",
                "Assignment",
                "Due Date",
                "Points",
                "Submission Type",
                "Canvas Link",
                "Canvas ID"
            ]
        );
        assert_eq!(row[0].1, "Test Course");
        assert_eq!(row[3].1, "N/A");
    }
}
