//! CMIS Browser Binding response envelopes

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CmisError, Result};

pub const PROP_OBJECT_ID: &str = "cmis:objectId";
pub const PROP_NAME: &str = "cmis:name";
pub const PROP_BASE_TYPE_ID: &str = "cmis:baseTypeId";

/// Object envelope returned by create operations, children and query results.
///
/// Requests are sent with `succinct=true`, so the server normally answers with
/// `succinctProperties`. Some servers ignore the flag and answer with the
/// verbose `properties` map whose entries wrap the value in `{ "value": .. }`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CmisResponse {
    #[serde(rename = "succinctProperties", default)]
    pub succinct_properties: HashMap<String, Value>,

    #[serde(default)]
    pub properties: HashMap<String, PropertyData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PropertyData {
    #[serde(default)]
    pub value: Value,
}

impl CmisResponse {
    /// String value of a property, succinct form first
    pub fn property(&self, id: &str) -> Option<&str> {
        self.succinct_properties
            .get(id)
            .and_then(Value::as_str)
            .or_else(|| self.properties.get(id).and_then(|p| p.value.as_str()))
    }

    pub fn object_id(&self) -> Option<&str> {
        self.property(PROP_OBJECT_ID)
    }

    pub fn name(&self) -> Option<&str> {
        self.property(PROP_NAME)
    }

    /// Convert into a [`CmisObject`], failing if the id is absent
    pub fn into_object(self, action: &'static str) -> Result<CmisObject> {
        let id = self
            .object_id()
            .ok_or(CmisError::MissingObjectId { action })?
            .to_string();

        Ok(CmisObject {
            name: self.name().unwrap_or_default().to_string(),
            base_type_id: self.property(PROP_BASE_TYPE_ID).map(String::from),
            id,
        })
    }
}

/// A CMIS object reduced to what the preview suite needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CmisObject {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub base_type_id: Option<String>,
}

/// `cmisselector=children` response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChildrenResponse {
    #[serde(default)]
    pub objects: Vec<ChildEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChildEntry {
    pub object: CmisResponse,
}

/// `cmisselector=query` response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub results: Vec<CmisResponse>,
}

/// One repository entry of `cmisselector=repositoryInfo`, keyed by repository id
#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryInfo {
    #[serde(rename = "repositoryId", default)]
    pub repository_id: String,

    #[serde(rename = "rootFolderId")]
    pub root_folder_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_succinct_envelope() {
        let json = r#"{
            "succinctProperties": {
                "cmis:objectId": "f-123",
                "cmis:name": "playwright-preview-test-1700000000000",
                "cmis:baseTypeId": "cmis:folder"
            }
        }"#;
        let response: CmisResponse = serde_json::from_str(json).unwrap();
        let object = response.into_object("create folder").unwrap();

        assert_eq!(object.id, "f-123");
        assert_eq!(object.name, "playwright-preview-test-1700000000000");
        assert_eq!(object.base_type_id.as_deref(), Some("cmis:folder"));
    }

    #[test]
    fn test_verbose_envelope_fallback() {
        let json = r#"{
            "properties": {
                "cmis:objectId": { "id": "cmis:objectId", "value": "d-9" },
                "cmis:name": { "id": "cmis:name", "value": "画像サンプル.png" }
            }
        }"#;
        let response: CmisResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.object_id(), Some("d-9"));
        assert_eq!(response.name(), Some("画像サンプル.png"));
    }

    #[test]
    fn test_missing_object_id() {
        let response: CmisResponse = serde_json::from_str(r#"{"succinctProperties": {}}"#).unwrap();
        let err = response.into_object("create document").unwrap_err();
        assert!(matches!(err, CmisError::MissingObjectId { action: "create document" }));
    }
}
