use crate::aggregate::AggregatedRecord;
use crate::models::fields::{format_timestamp, parse_timestamp, require_id, str_field, str_or};
use crate::models::ExportRow;
use crate::richtext::{extract, Link};
use crate::ModelError;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use serde_json::Value;

/// Characters of message text kept in the preview column
pub const MESSAGE_PREVIEW_CHARS: usize = 500;

/// Window, in days, within which an announcement counts as recent
pub const RECENT_DAYS: i64 = 7;

/// A course announcement with its HTML body normalized
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Announcement {
    pub id: String,
    pub title: String,
    pub course_id: String,
    pub course_name: String,
    pub posted_at: Option<String>,
    pub author: String,
    pub html_url: String,
    pub message_html: Option<String>,
    pub message_text: Option<String>,
    pub embedded_links: Vec<Link>,
    pub attachments: Vec<Value>,
}

impl Announcement {
    pub fn from_record(record: &AggregatedRecord) -> Result<Self, ModelError> {
        let raw = record.payload();

        let message_html = str_field(raw, "message").filter(|m| !m.is_empty());
        let (message_text, embedded_links) = match message_html.as_deref() {
            Some(html) => {
                let extraction = extract(html);
                (Some(extraction.text), extraction.links)
            }
            None => (None, Vec::new()),
        };

        let author = raw
            .get("author")
            .and_then(|a| a.get("display_name"))
            .and_then(Value::as_str)
            .unwrap_or("Unknown")
            .to_string();

        Ok(Self {
            id: require_id(raw)?,
            title: str_or(raw, "title", "Untitled Announcement"),
            course_id: record.course_id().to_string(),
            course_name: record.course_name().to_string(),
            posted_at: str_field(raw, "posted_at"),
            author,
            html_url: str_or(raw, "html_url", ""),
            message_html,
            message_text,
            embedded_links,
            attachments: raw
                .get("attachments")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default(),
        })
    }

    pub fn posted_date_formatted(&self) -> String {
        format_timestamp(self.posted_at.as_deref(), "Unknown")
    }

    /// First [`MESSAGE_PREVIEW_CHARS`] characters of the plain-text message
    pub fn message_preview(&self) -> String {
        self.message_text
            .as_deref()
            .map(|text| text.chars().take(MESSAGE_PREVIEW_CHARS).collect())
            .unwrap_or_default()
    }

    /// Posted within the last [`RECENT_DAYS`] days
    pub fn is_recent(&self, now: DateTime<Utc>) -> bool {
        self.posted_at
            .as_deref()
            .and_then(parse_timestamp)
            .is_some_and(|posted| posted > now - Duration::days(RECENT_DAYS))
    }

    pub fn export_row(&self) -> ExportRow {
        vec![
            ("Course", self.course_name.clone()),
            ("Title", self.title.clone()),
            ("Posted Date", self.posted_date_formatted()),
            ("Author", self.author.clone()),
            ("Message Preview", self.message_preview()),
            ("Embedded Links", self.embedded_links.len().to_string()),
            ("Attachments", self.attachments.len().to_string()),
            ("Canvas Link", self.html_url.clone()),
            ("Canvas ID", self.id.clone()),
        ]
    }
}

/// Orders announcements newest first; undated ones sort last
pub fn sort_newest_first(announcements: &mut [Announcement]) {
    announcements.sort_by(|a, b| b.posted_at.cmp(&a.posted_at));
}
