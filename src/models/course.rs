use crate::aggregate::CourseContext;
use crate::models::fields::{require_id, str_field};
use crate::ModelError;
use serde::Serialize;
use serde_json::Value;

/// A course from the course listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Course {
    pub id: String,
    pub name: String,
    pub course_code: Option<String>,
    pub workflow_state: Option<String>,
}

impl Course {
    pub fn from_value(value: &Value) -> Result<Self, ModelError> {
        let id = require_id(value)?;
        let name = str_field(value, "name")
            .filter(|n| !n.trim().is_empty())
            .ok_or(ModelError::MissingField("name"))?;

        Ok(Self {
            id,
            name,
            course_code: str_field(value, "course_code"),
            workflow_state: str_field(value, "workflow_state"),
        })
    }

    pub fn context(&self) -> CourseContext {
        CourseContext::new(self.id.clone(), self.name.clone())
    }
}
