//! Field identifiers and values.
use bytes::Bytes;

/// Identifier for one form field.
///
/// # Summary
/// Newtype around a field name string so values, rules, and step plans
/// cannot accidentally mix identifiers with display labels.
///
/// # Example
/// ```rust
/// use hms_forms::FieldId;
///
/// let id = FieldId::new("guardian_phone");
/// assert_eq!(id.as_str(), "guardian_phone");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId(String);

impl FieldId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FieldId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FieldId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A file attached to a form, e.g. the registration photo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub file_name: String,
    pub content_type: String,
    /// Cheaply cloneable; multipart assembly does not copy the payload.
    pub bytes: Bytes,
}

impl FileUpload {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }
}

/// A value a user has entered for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    File(FileUpload),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(value) => Some(value),
            FieldValue::File(_) => None,
        }
    }

    pub fn as_file(&self) -> Option<&FileUpload> {
        match self {
            FieldValue::Text(_) => None,
            FieldValue::File(upload) => Some(upload),
        }
    }
}
