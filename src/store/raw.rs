//! The persisted record shapes: one record per node, connections present
//! only as string keys, never as object references.

use crate::error::{ConversionError, PersistError};
use bincode::config::standard;
use bincode::serde::{decode_from_slice, encode_to_vec};
use serde::{Deserialize, Serialize};
use std::fs;

/// A persisted connection key. At most one per source port.
///
/// Externally tagged so the same records round-trip through both the JSON
/// and the bincode helpers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RawLink {
    SectionInput { section: String, input: String },
    Output { output: String },
    Procedure { procedure: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProperty {
    pub name: String,
    pub value: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawInput {
    pub name: String,
    pub argument_type: String,
    #[serde(default)]
    pub link: Option<RawLink>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSectionInput {
    pub name: String,
    pub parameter_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSectionOutput {
    pub name: String,
    pub argument_type: String,
    #[serde(default)]
    pub link: Option<RawLink>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSection {
    pub name: String,
    pub source_class_name: String,
    pub location: String,
    #[serde(default)]
    pub properties: Vec<RawProperty>,
    #[serde(default)]
    pub inputs: Vec<RawSectionInput>,
    #[serde(default)]
    pub outputs: Vec<RawSectionOutput>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProcedureOutput {
    pub name: String,
    pub argument_type: String,
    #[serde(default)]
    pub link: Option<RawLink>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProcedureNext {
    pub argument_type: String,
    #[serde(default)]
    pub link: Option<RawLink>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProcedure {
    pub name: String,
    pub resource: String,
    pub source_name: String,
    pub procedure_name: String,
    #[serde(default)]
    pub properties: Vec<RawProperty>,
    #[serde(default)]
    pub outputs: Vec<RawProcedureOutput>,
    pub next: RawProcedureNext,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawOutput {
    pub name: String,
    pub parameter_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawException {
    pub class_name: String,
    #[serde(default)]
    pub link: Option<RawLink>,
}

/// The complete persisted form of an activity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawActivity {
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<RawInput>,
    #[serde(default)]
    pub sections: Vec<RawSection>,
    #[serde(default)]
    pub procedures: Vec<RawProcedure>,
    #[serde(default)]
    pub outputs: Vec<RawOutput>,
    #[serde(default)]
    pub exceptions: Vec<RawException>,
}

impl RawActivity {
    /// Saves the raw activity to a file in the bincode format.
    pub fn save(&self, path: &str) -> Result<(), PersistError> {
        let bytes = self.to_bytes()?;
        fs::write(path, bytes).map_err(|e| PersistError::File {
            path: path.to_string(),
            message: e.to_string(),
        })
    }

    /// Loads a raw activity from a bincode file.
    pub fn from_file(path: &str) -> Result<Self, PersistError> {
        let bytes = fs::read(path).map_err(|e| PersistError::File {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        Self::from_bytes(&bytes)
    }

    /// Serializes the raw activity to bincode bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, PersistError> {
        encode_to_vec(self, standard()).map_err(|e| PersistError::Encode(e.to_string()))
    }

    /// Deserializes a raw activity from bincode bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PersistError> {
        decode_from_slice(bytes, standard())
            .map(|(raw, _)| raw) // bincode 2 returns a tuple (data, bytes_read)
            .map_err(|e| PersistError::Decode(e.to_string()))
    }

    /// Serializes the raw activity to a JSON string.
    pub fn to_json(&self) -> Result<String, PersistError> {
        serde_json::to_string_pretty(self).map_err(|e| PersistError::Encode(e.to_string()))
    }

    /// Deserializes a raw activity from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, PersistError> {
        serde_json::from_str(json).map_err(|e| PersistError::Decode(e.to_string()))
    }
}

/// A trait for custom data models that can be converted into a raw activity.
///
/// This is the extension point for keeping the engine format-agnostic: parse
/// your own configuration format into your own structs, then implement this
/// trait to provide the translation into the canonical record shapes, and
/// hand the result to [`load`](crate::store::load).
pub trait IntoActivity {
    /// Consumes the object and converts it into the canonical persisted form.
    fn into_activity(self) -> Result<RawActivity, ConversionError>;
}
