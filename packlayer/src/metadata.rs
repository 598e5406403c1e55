//! Pack metadata (`pack.mcmeta`) sections.
//!
//! A metadata document is a JSON object whose top-level keys are sections.
//! Containers hand out raw sections; a [`MetadataSectionReader`] turns one
//! into a typed value.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{PackError, PackResult};
use crate::resource::PackType;

/// Name of the root-level metadata file inside a pack.
pub const PACK_METADATA_FILE: &str = "pack.mcmeta";

/// Decodes one named section of a metadata document.
pub trait MetadataSectionReader {
    /// The decoded section type.
    type Output;

    /// Top-level key of the section this reader understands.
    fn section_name(&self) -> &str;

    /// Decode the raw section value.
    fn read(&self, value: &Value) -> Result<Self::Output, String>;
}

/// The `pack` section: human description and format number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackMetadataSection {
    /// Human-readable description.
    pub description: String,

    /// Pack format number.
    pub pack_format: u32,
}

impl PackMetadataSection {
    /// Create a new pack section.
    pub fn new(description: impl Into<String>, pack_format: u32) -> Self {
        Self {
            description: description.into(),
            pack_format,
        }
    }

    /// Section synthesized for packs that ship without metadata.
    pub fn synthesized(name: &str, kind: PackType) -> Self {
        Self::new(name, kind.default_pack_format())
    }

    /// Encode as a raw section value.
    pub fn to_value(&self) -> PackResult<Value> {
        serde_json::to_value(self).map_err(|e| PackError::InvalidMetadata {
            pack: self.description.clone(),
            reason: e.to_string(),
        })
    }
}

/// Reader for the `pack` section.
#[derive(Debug, Clone, Copy, Default)]
pub struct PackMetadataReader;

impl MetadataSectionReader for PackMetadataReader {
    type Output = PackMetadataSection;

    fn section_name(&self) -> &str {
        "pack"
    }

    fn read(&self, value: &Value) -> Result<Self::Output, String> {
        serde_json::from_value(value.clone()).map_err(|e| e.to_string())
    }
}

/// Parse a whole metadata document into its top-level object.
pub fn parse_mcmeta(bytes: &[u8]) -> Result<serde_json::Map<String, Value>, String> {
    match serde_json::from_slice::<Value>(bytes).map_err(|e| e.to_string())? {
        Value::Object(map) => Ok(map),
        other => Err(format!("expected a JSON object, found {}", json_kind(&other))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mcmeta_sections() {
        let doc = br#"{"pack": {"description": "Test", "pack_format": 9}, "filter": {}}"#;
        let sections = parse_mcmeta(doc).unwrap();

        assert_eq!(sections.len(), 2);
        let pack = PackMetadataReader.read(&sections["pack"]).unwrap();
        assert_eq!(pack, PackMetadataSection::new("Test", 9));
    }

    #[test]
    fn test_parse_mcmeta_rejects_non_object() {
        let err = parse_mcmeta(b"[1, 2]").unwrap_err();
        assert!(err.contains("an array"));
        assert!(parse_mcmeta(b"{not json").is_err());
    }

    #[test]
    fn test_reader_rejects_wrong_shape() {
        let value = serde_json::json!({"description": "x"});
        assert!(PackMetadataReader.read(&value).is_err());
    }

    #[test]
    fn test_synthesized_section_uses_kind_format() {
        let section = PackMetadataSection::synthesized("my_pack", PackType::ServerData);
        assert_eq!(section.description, "my_pack");
        assert_eq!(section.pack_format, PackType::ServerData.default_pack_format());

        let decoded = PackMetadataReader.read(&section.to_value().unwrap()).unwrap();
        assert_eq!(decoded, section);
    }

    #[test]
    fn test_to_value_uses_mcmeta_keys() {
        let value = PackMetadataSection::new("Textures", 12).to_value().unwrap();
        assert_eq!(
            value,
            serde_json::json!({"description": "Textures", "pack_format": 12})
        );
    }
}
