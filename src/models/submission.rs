use crate::error::StoreError;
use percent_encoding::percent_decode_str;
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Submission(Map<String, Value>);

impl Submission {
    /// Decodes a form payload. The whole payload is unescaped before it is
    /// split, and every segment needs exactly one `=`.
    pub fn from_form(raw: &str) -> Result<Self, StoreError> {
        let plus_decoded = raw.replace('+', " ");
        let decoded = percent_decode_str(&plus_decoded).decode_utf8_lossy();

        let mut fields = Map::new();
        for segment in decoded.split('&') {
            let mut parts = segment.split('=');
            match (parts.next(), parts.next(), parts.next()) {
                (Some(name), Some(value), None) => {
                    fields.insert(name.to_string(), Value::String(value.to_string()));
                }
                _ => {
                    return Err(StoreError::MalformedSegment {
                        segment: segment.to_string(),
                    })
                }
            }
        }
        Ok(Self(fields))
    }

    pub fn field_count(&self) -> usize {
        self.0.len()
    }
}
