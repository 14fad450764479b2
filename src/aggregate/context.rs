use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// Name attached to explicitly requested courses missing from the course listing
pub const UNKNOWN_COURSE_NAME: &str = "Unknown Course";

/// Field injected into flattened records carrying the course id
pub const COURSE_ID_FIELD: &str = "_course_id";

/// Field injected into flattened records carrying the course name
pub const COURSE_NAME_FIELD: &str = "_course_name";

/// The (course id, course name) pair attached to every record from a course
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CourseContext {
    pub id: String,
    pub name: String,
}

impl CourseContext {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A raw API record tagged with the course it came from
///
/// Each record owns its own copy of the course context and is never mutated
/// after the aggregator creates it.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedRecord {
    course: CourseContext,
    payload: Value,
}

impl AggregatedRecord {
    pub fn new(course: CourseContext, payload: Value) -> Self {
        Self { course, payload }
    }

    pub fn course(&self) -> &CourseContext {
        &self.course
    }

    pub fn course_id(&self) -> &str {
        &self.course.id
    }

    pub fn course_name(&self) -> &str {
        &self.course.name
    }

    /// The record exactly as the API returned it
    pub fn payload(&self) -> &Value {
        &self.payload
    }

    /// Looks up a top-level payload field
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.payload.get(key)
    }

    /// Flattens into one JSON object with the course fields injected
    ///
    /// Payload fields with the injected names are overwritten. A payload that
    /// is not an object is placed under a `value` key.
    pub fn into_value(self) -> Value {
        let mut object = match self.payload {
            Value::Object(map) => map,
            other => {
                let mut map = Map::new();
                map.insert("value".to_string(), other);
                map
            }
        };
        object.insert(COURSE_ID_FIELD.to_string(), Value::String(self.course.id));
        object.insert(
            COURSE_NAME_FIELD.to_string(),
            Value::String(self.course.name),
        );
        Value::Object(object)
    }
}

impl Serialize for AggregatedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.clone().into_value().serialize(serializer)
    }
}

/// Canvas ids arrive as numbers or strings; both become strings
pub(crate) fn id_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
