//! Request definitions for the dashboard.
//!
//! The YAML file is a display aid for the front-end: a list of named
//! `{type, args}` requests it issues against `/resource`. It is re-read on
//! every `/status` call so edits show up without a restart.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::app::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub args: serde_json::Map<String, serde_json::Value>,
}

pub fn load_request_defs(path: &Path) -> Result<Vec<RequestDef>> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&content)?)
}
