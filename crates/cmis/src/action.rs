//! Browser Binding form actions
//!
//! Each POST to the browser binding carries a `cmisaction` field plus the
//! action's arguments. Properties travel as indexed `propertyId[i]` /
//! `propertyValue[i]` pairs.

use reqwest::multipart::{Form, Part};

use crate::error::Result;
use crate::samples::SampleFile;

/// A write operation against the browser binding
#[derive(Debug, Clone)]
pub enum CmisAction<'a> {
    CreateFolder {
        name: &'a str,
    },
    CreateDocument {
        file: &'a SampleFile,
    },
    DeleteTree {
        folder_id: &'a str,
        all_versions: bool,
        continue_on_failure: bool,
    },
}

impl<'a> CmisAction<'a> {
    pub fn name(&self) -> &'static str {
        match self {
            CmisAction::CreateFolder { .. } => "createFolder",
            CmisAction::CreateDocument { .. } => "createDocument",
            CmisAction::DeleteTree { .. } => "deleteTree",
        }
    }

    /// Human-readable label used in error messages
    pub fn label(&self) -> &'static str {
        match self {
            CmisAction::CreateFolder { .. } => "create folder",
            CmisAction::CreateDocument { .. } => "upload document",
            CmisAction::DeleteTree { .. } => "delete folder tree",
        }
    }

    /// Text fields of the form, in wire order
    pub fn fields(&self) -> Vec<(String, String)> {
        let mut fields = vec![("cmisaction".to_string(), self.name().to_string())];

        match self {
            CmisAction::CreateFolder { name } => {
                push_properties(&mut fields, &[("cmis:objectTypeId", "cmis:folder"), ("cmis:name", name)]);
                fields.push(("succinct".to_string(), "true".to_string()));
            }
            CmisAction::CreateDocument { file } => {
                push_properties(
                    &mut fields,
                    &[("cmis:objectTypeId", "cmis:document"), ("cmis:name", file.file_name)],
                );
                fields.push(("succinct".to_string(), "true".to_string()));
            }
            CmisAction::DeleteTree { folder_id, all_versions, continue_on_failure } => {
                fields.push(("folderId".to_string(), folder_id.to_string()));
                // The server resolves the target from objectId
                fields.push(("objectId".to_string(), folder_id.to_string()));
                fields.push(("allVersions".to_string(), all_versions.to_string()));
                fields.push(("continueOnFailure".to_string(), continue_on_failure.to_string()));
            }
        }

        fields
    }

    /// Build the multipart body for this action
    pub fn into_form(self) -> Result<Form> {
        let mut form = Form::new();
        for (key, value) in self.fields() {
            form = form.text(key, value);
        }

        if let CmisAction::CreateDocument { file } = self {
            let part = Part::bytes(file.content)
                .file_name(file.file_name)
                .mime_str(file.mime_type)?;
            form = form.part("content", part);
        }

        Ok(form)
    }
}

fn push_properties(fields: &mut Vec<(String, String)>, properties: &[(&str, &str)]) {
    for (i, (id, value)) in properties.iter().enumerate() {
        fields.push((format!("propertyId[{i}]"), id.to_string()));
        fields.push((format!("propertyValue[{i}]"), value.to_string()));
    }
}
