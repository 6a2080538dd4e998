/// Request and response bodies for the schemes API
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::database::models::{DeleteSummary, Scheme};

/// A JSON body that may hold one item or an array of items.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    // Listed first so arrays never reach the single-item arm.
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

/// One element of a batch-create body. Any other supplied fields are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewSchemeRequest {
    pub schemename: String,
    pub ministry: String,
    pub desc: String,
    pub place: String,
}

/// One element of a batch-update body.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UpdateSchemeRequest {
    #[serde(default, alias = "_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub schemename: Option<String>,
    #[serde(default)]
    pub ministry: Option<String>,
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default)]
    pub place: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeleteByNamesRequest {
    #[serde(default, rename = "schemeNames")]
    pub scheme_names: Option<OneOrMany<String>>,
}

/// Kept loose so that a missing or non-array `identifiers` gets the
/// operation's own 400 message instead of a generic JSON error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BulkDeleteRequest {
    #[serde(default)]
    pub identifiers: Option<Value>,
}

impl BulkDeleteRequest {
    /// The identifiers, if present as a non-empty array of strings.
    pub fn identifier_list(&self) -> Option<Vec<String>> {
        let values = self.identifiers.as_ref()?.as_array()?;
        if values.is_empty() {
            return None;
        }
        values.iter().map(|v| v.as_str().map(str::to_string)).collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatedSchemesResponse {
    pub message: String,
    pub data: Vec<Scheme>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BulkDeleteResponse {
    pub message: String,
    #[serde(rename = "deletedSchemes")]
    pub deleted_schemes: DeleteSummary,
}
