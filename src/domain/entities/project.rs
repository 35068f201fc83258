use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

// ───── Database Models ───────────────────────────────────────────────

#[derive(Debug, sqlx::FromRow)]
pub struct ProjectRow {
    pub id: Uuid,
    pub title: String,
    pub description: Vec<String>,
    pub image_grid: String,
    pub image_list: String,
    pub link: String,
    pub date: String,
    pub tags: Vec<String>,
    pub technologies: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ───── API Models ───────────────────────────────────────────────────

/// Stored file names of the two image slots. An empty string means "no image".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUrl {
    pub grid: String,
    pub list: String,
}

impl ImageUrl {
    pub fn new(grid: impl Into<String>, list: impl Into<String>) -> Self {
        Self { grid: grid.into(), list: list.into() }
    }

    /// Non-empty stored names, grid first.
    pub fn stored_names(&self) -> impl Iterator<Item = &str> {
        [self.grid.as_str(), self.list.as_str()]
            .into_iter()
            .filter(|name| !name.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    pub description: Vec<String>,
    pub image_url: ImageUrl,
    pub link: String,
    pub date: String,
    pub tags: Vec<String>,
    pub technologies: Vec<String>,
}

impl From<ProjectRow> for Project {
    fn from(row: ProjectRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            image_url: ImageUrl::new(row.image_grid, row.image_list),
            link: row.link,
            date: row.date,
            tags: row.tags,
            technologies: row.technologies,
        }
    }
}

// ───── Input ────────────────────────────────────────────────────────

/// Non-image fields submitted on create/update.
///
/// `None` means the client did not send the field: inserts store an empty value,
/// updates keep whatever was stored before. Keys such as `id`, `imageUrl` or
/// `projectData` are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectPayload {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "one_or_many")]
    pub description: Option<Vec<String>>,

    #[serde(default)]
    pub link: Option<String>,

    #[serde(default)]
    pub date: Option<String>,

    #[serde(default, deserialize_with = "one_or_many")]
    pub tags: Option<Vec<String>>,

    #[serde(default, deserialize_with = "one_or_many")]
    pub technologies: Option<Vec<String>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

/// Plain form fields arrive as single strings; JSON clients send arrays.
fn one_or_many<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<OneOrMany>::deserialize(deserializer)?.map(|value| match value {
        OneOrMany::One(single) => vec![single],
        OneOrMany::Many(many) => many,
    }))
}

/// Outcome of decoding the `projectData` part of a submission.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedProject {
    /// `projectData` (or a JSON request body) parsed as JSON.
    Parsed(ProjectPayload),
    /// `projectData` was missing or not JSON; the raw form fields were used instead.
    PassedThrough(ProjectPayload),
}

impl DecodedProject {
    pub fn payload(&self) -> &ProjectPayload {
        match self {
            DecodedProject::Parsed(payload) | DecodedProject::PassedThrough(payload) => payload,
        }
    }

    pub fn into_payload(self) -> ProjectPayload {
        match self {
            DecodedProject::Parsed(payload) | DecodedProject::PassedThrough(payload) => payload,
        }
    }

    pub fn is_parsed(&self) -> bool {
        matches!(self, DecodedProject::Parsed(_))
    }
}

/// Decodes a submission: `project_data` is tried as JSON first and, failing that,
/// the raw text fields of the form are taken as the object.
///
/// Only a structurally wrong object (say, `title` given as a number) is an error;
/// a `projectData` that simply isn't JSON never is.
pub fn decode_project_data(
    project_data: Option<&str>,
    raw_fields: &Map<String, Value>,
) -> Result<DecodedProject, serde_json::Error> {
    if let Some(raw) = project_data {
        if let Ok(value) = serde_json::from_str::<Value>(raw) {
            return Ok(DecodedProject::Parsed(serde_json::from_value(value)?));
        }
    }

    let payload = serde_json::from_value(Value::Object(raw_fields.clone()))?;
    Ok(DecodedProject::PassedThrough(payload))
}

/// Adds one text field to the raw form object. Repeated names and names ending in
/// `[]` collect into arrays.
pub fn push_form_field(fields: &mut Map<String, Value>, name: &str, value: String) {
    let (key, force_array) = match name.strip_suffix("[]") {
        Some(stripped) => (stripped, true),
        None => (name, false),
    };

    match fields.get_mut(key) {
        Some(Value::Array(items)) => items.push(Value::String(value)),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, Value::String(value)]);
        }
        None if force_array => {
            fields.insert(key.to_string(), Value::Array(vec![Value::String(value)]));
        }
        None => {
            fields.insert(key.to_string(), Value::String(value));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(pairs: &[(&str, &str)]) -> Map<String, Value> {
        let mut map = Map::new();
        for (name, value) in pairs {
            push_form_field(&mut map, name, value.to_string());
        }
        map
    }

    #[test]
    fn project_data_json_is_parsed() {
        let raw = r#"{"title":"Kaboom","description":["a","b"],"tags":["Game"],"date":"2024-10"}"#;
        let decoded = decode_project_data(Some(raw), &Map::new()).unwrap();

        assert!(decoded.is_parsed());
        let payload = decoded.payload();
        assert_eq!(payload.title.as_deref(), Some("Kaboom"));
        assert_eq!(payload.description, Some(vec!["a".to_string(), "b".to_string()]));
        assert_eq!(payload.technologies, None);
    }

    #[test]
    fn non_json_project_data_falls_back_to_raw_fields() {
        let raw = fields(&[
            ("projectData", "not json at all"),
            ("title", "FindWord"),
            ("tags[]", "Website"),
            ("tags[]", "Game"),
            ("description", "One paragraph"),
        ]);

        let decoded = decode_project_data(Some("not json at all"), &raw).unwrap();

        assert!(!decoded.is_parsed());
        let payload = decoded.into_payload();
        assert_eq!(payload.title.as_deref(), Some("FindWord"));
        assert_eq!(payload.tags, Some(vec!["Website".to_string(), "Game".to_string()]));
        assert_eq!(payload.description, Some(vec!["One paragraph".to_string()]));
    }

    #[test]
    fn missing_project_data_passes_fields_through() {
        let raw = fields(&[("link", "https://example.com")]);
        let decoded = decode_project_data(None, &raw).unwrap();

        assert_eq!(
            decoded,
            DecodedProject::PassedThrough(ProjectPayload {
                link: Some("https://example.com".into()),
                ..Default::default()
            })
        );
    }

    #[test]
    fn parsed_json_with_wrong_shape_is_an_error() {
        assert!(decode_project_data(Some(r#"{"title": 42}"#), &Map::new()).is_err());
        assert!(decode_project_data(Some("[1, 2]"), &Map::new()).is_err());
    }

    #[test]
    fn ignores_server_owned_keys() {
        let raw = r#"{"_id":"681a07f2","__v":0,"imageUrl":{"grid":"x","list":"y"},"title":"Square Game"}"#;
        let payload = decode_project_data(Some(raw), &Map::new()).unwrap().into_payload();
        assert_eq!(payload.title.as_deref(), Some("Square Game"));
    }

    #[test]
    fn repeated_plain_names_become_arrays() {
        let raw = fields(&[("technologies", "Rust"), ("technologies", "Postgres")]);
        assert_eq!(raw.get("technologies"), Some(&json!(["Rust", "Postgres"])));
    }

    #[test]
    fn project_serializes_with_camel_case_image_url() {
        let project = Project {
            id: Uuid::nil(),
            title: "t".into(),
            description: vec![],
            image_url: ImageUrl::new("gridImage-1-123456789.png", ""),
            link: String::new(),
            date: "2025-01".into(),
            tags: vec![],
            technologies: vec![],
        };

        let value = serde_json::to_value(&project).unwrap();
        assert_eq!(value["imageUrl"]["grid"], "gridImage-1-123456789.png");
        assert_eq!(value["imageUrl"]["list"], "");
        assert_eq!(
            project.image_url.stored_names().collect::<Vec<_>>(),
            vec!["gridImage-1-123456789.png"]
        );
    }
}
