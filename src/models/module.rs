use crate::aggregate::{AggregatedRecord, CourseContext};
use crate::models::fields::{
    bool_or, f64_field, format_points, format_timestamp, id_field, require_id, str_field, str_or,
};
use crate::models::ExportRow;
use crate::ModelError;
use serde::Serialize;
use serde_json::Value;

/// One entry inside a course module (page, assignment, file, link, ...)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleItem {
    pub id: String,
    pub module_id: String,
    pub module_name: String,
    pub course_id: String,
    pub course_name: String,
    pub position: i64,
    pub title: String,
    #[serde(rename = "type")]
    pub item_type: String,
    pub html_url: String,
    pub published: bool,
    pub indent: u32,
    pub due_at: Option<String>,
    pub points_possible: Option<f64>,
}

impl ModuleItem {
    /// Builds an item from its raw JSON inside a module's `items` array
    ///
    /// Due date and points come from the expanded `content_details`.
    pub fn from_value(
        value: &Value,
        module_id: &str,
        module_name: &str,
        course: &CourseContext,
    ) -> Result<Self, ModelError> {
        let details = value.get("content_details").filter(|d| d.is_object());

        Ok(Self {
            id: require_id(value)?,
            module_id: id_field(value, "module_id").unwrap_or_else(|| module_id.to_string()),
            module_name: module_name.to_string(),
            course_id: course.id.clone(),
            course_name: course.name.clone(),
            position: value.get("position").and_then(Value::as_i64).unwrap_or(0),
            title: str_or(value, "title", "Untitled Item"),
            item_type: str_or(value, "type", "Unknown"),
            html_url: str_or(value, "html_url", ""),
            published: bool_or(value, "published", true),
            indent: value
                .get("indent")
                .and_then(Value::as_u64)
                .and_then(|i| u32::try_from(i).ok())
                .unwrap_or(0),
            due_at: details.and_then(|d| str_field(d, "due_at")),
            points_possible: details.and_then(|d| f64_field(d, "points_possible")),
        })
    }

    /// Title prefixed with two spaces per indent level
    pub fn title_with_indent(&self) -> String {
        format!("{}{}", "  ".repeat(self.indent as usize), self.title)
    }

    pub fn due_date_formatted(&self) -> String {
        format_timestamp(self.due_at.as_deref(), "No due date")
    }

    pub fn export_row(&self) -> ExportRow {
        vec![
            ("Course", self.course_name.clone()),
            ("Module", self.module_name.clone()),
            ("Item Title", self.title_with_indent()),
            ("Item Type", self.item_type.clone()),
            (
                "Published",
                if self.published { "Yes" } else { "No" }.to_string(),
            ),
            ("Due Date", self.due_date_formatted()),
            (
                "Points",
                self.points_possible
                    .map_or_else(|| "N/A".to_string(), format_points),
            ),
            ("Canvas Link", self.html_url.clone()),
        ]
    }
}

/// A course module with its nested items
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Module {
    pub id: String,
    pub name: String,
    pub course_id: String,
    pub course_name: String,
    pub items: Vec<ModuleItem>,
}

impl Module {
    /// Builds a module and its items; malformed items are skipped
    pub fn from_record(record: &AggregatedRecord) -> Result<Self, ModelError> {
        let raw = record.payload();
        let id = require_id(raw)?;
        let name = str_or(raw, "name", "Untitled Module");

        let items = raw
            .get("items")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| {
                        ModuleItem::from_value(item, &id, &name, record.course())
                            .map_err(|e| {
                                tracing::warn!("Skipping item in module {}: {}", id, e);
                            })
                            .ok()
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            id,
            name,
            course_id: record.course_id().to_string(),
            course_name: record.course_name().to_string(),
            items,
        })
    }
}

/// Flattens modules into their items, preserving module then item order
pub fn flatten_modules(modules: Vec<Module>) -> Vec<ModuleItem> {
    modules.into_iter().flat_map(|m| m.items).collect()
}
