use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Storage-assigned scheme identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemeId(Uuid);

impl SchemeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for SchemeId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for SchemeId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl FromStr for SchemeId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

impl fmt::Display for SchemeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Serial number label. Generated numbers are numeric, but stored documents
/// may carry string labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Srno {
    Number(u64),
    Text(String),
}

/// Everything stored for a scheme except its identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemeDocument {
    pub schemename: String,
    pub ministry: String,
    pub desc: String,
    pub place: String,
    #[serde(rename = "timeOfSchemeAdded", alias = "timeOfschemeAdded")]
    pub time_of_scheme_added: String,
    pub date: String,
    pub srno: Srno,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scheme {
    pub id: SchemeId,
    #[serde(flatten)]
    pub document: SchemeDocument,
}

impl Scheme {
    pub fn new(id: SchemeId, document: SchemeDocument) -> Self {
        Self { id, document }
    }

    pub fn name(&self) -> &str {
        &self.document.schemename
    }
}

/// Client-editable fields applied by an update. Absent fields keep their
/// stored value; `id`, `timeOfSchemeAdded`, `date` and `srno` never change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemeUpdate {
    pub schemename: Option<String>,
    pub ministry: Option<String>,
    pub desc: Option<String>,
    pub place: Option<String>,
}

impl SchemeUpdate {
    pub fn apply(&self, document: &mut SchemeDocument) {
        if let Some(v) = &self.schemename { document.schemename = v.clone(); }
        if let Some(v) = &self.ministry { document.ministry = v.clone(); }
        if let Some(v) = &self.desc { document.desc = v.clone(); }
        if let Some(v) = &self.place { document.place = v.clone(); }
    }

    /// JSON object holding only the supplied fields, suitable for a JSONB merge.
    pub fn to_json_patch(&self) -> Value {
        let mut patch = Map::new();
        let fields = [
            ("schemename", &self.schemename),
            ("ministry", &self.ministry),
            ("desc", &self.desc),
            ("place", &self.place),
        ];
        for (key, value) in fields {
            if let Some(v) = value {
                patch.insert(key.to_string(), Value::String(v.clone()));
            }
        }
        Value::Object(patch)
    }
}

/// Result of a multi-document delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteSummary {
    pub acknowledged: bool,
    #[serde(rename = "deletedCount")]
    pub deleted_count: u64,
}

impl DeleteSummary {
    pub fn deleted(count: u64) -> Self {
        Self { acknowledged: true, deleted_count: count }
    }
}
