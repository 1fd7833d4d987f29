//! Resource schema description
//!
//! ```yaml
//! resource: maintenance_assignment_dynamic_scope
//! description: Assigns a maintenance configuration to a dynamic scope
//! fields:
//!   - name: name
//!     type: string
//!     required: true
//!     force_new: true
//!   - name: filter
//!     type: block
//!     required: true
//!     fields:
//!       - name: locations
//!         type: set
//!         elem: string
//!         optional: true
//! ```

use crate::error::{CodegenError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

static FIELD_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9_]*$").expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Bool,
    Int,
    Float,
    List,
    Set,
    Map,
    Block,
}

impl FieldType {
    pub fn is_scalar(self) -> bool {
        matches!(
            self,
            FieldType::String | FieldType::Bool | FieldType::Int | FieldType::Float
        )
    }

    pub fn is_collection(self) -> bool {
        matches!(self, FieldType::List | FieldType::Set | FieldType::Map)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSchema {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FieldType,
    /// Element type of a list, set or map
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elem: Option<FieldType>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub computed: bool,
    #[serde(default)]
    pub force_new: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Nested fields of a block
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldSchema>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceSchema {
    pub resource: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub fields: Vec<FieldSchema>,
}

impl ResourceSchema {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let schema: Self = serde_yaml::from_str(&content).map_err(|source| CodegenError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        schema.validate()?;
        Ok(schema)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let schema: Self = serde_yaml::from_str(content).map_err(|source| CodegenError::Parse {
            path: "<inline>".into(),
            source,
        })?;
        schema.validate()?;
        Ok(schema)
    }

    pub fn validate(&self) -> Result<()> {
        if !FIELD_NAME.is_match(&self.resource) {
            return Err(invalid(&self.resource, "resource name must be snake_case"));
        }
        if self.fields.is_empty() {
            return Err(invalid(&self.resource, "resource has no fields"));
        }
        validate_fields(&self.resource, &self.fields)
    }
}

fn validate_fields(path: &str, fields: &[FieldSchema]) -> Result<()> {
    let mut seen = HashSet::new();
    for field in fields {
        let qualified = format!("{path}.{}", field.name);
        if !FIELD_NAME.is_match(&field.name) {
            return Err(invalid(&qualified, "field names must be snake_case"));
        }
        if !seen.insert(field.name.as_str()) {
            return Err(invalid(&qualified, "duplicate field"));
        }
        field.validate(&qualified)?;
    }
    Ok(())
}

impl FieldSchema {
    fn validate(&self, qualified: &str) -> Result<()> {
        match (self.required, self.optional, self.computed) {
            (true, true, _) => return Err(invalid(qualified, "cannot be both required and optional")),
            (true, _, true) => return Err(invalid(qualified, "cannot be both required and computed")),
            (false, false, false) => {
                return Err(invalid(qualified, "one of required, optional or computed must be set"));
            }
            _ => {}
        }

        match (self.kind, self.elem) {
            (kind, None) if kind.is_collection() => {
                return Err(invalid(qualified, "collections need an `elem` type"));
            }
            (kind, Some(elem)) if kind.is_collection() && !elem.is_scalar() => {
                return Err(invalid(qualified, "`elem` must be a scalar type"));
            }
            (kind, Some(_)) if !kind.is_collection() => {
                return Err(invalid(qualified, "`elem` is only valid on list, set and map"));
            }
            _ => {}
        }

        if self.kind == FieldType::Block {
            if self.fields.is_empty() {
                return Err(invalid(qualified, "block has no fields"));
            }
            validate_fields(qualified, &self.fields)?;
        } else if !self.fields.is_empty() {
            return Err(invalid(qualified, "only blocks can have nested fields"));
        }
        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> CodegenError {
    CodegenError::InvalidField {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}
