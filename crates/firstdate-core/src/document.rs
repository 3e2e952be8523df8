//! Document conventions for the hosted document store.
//!
//! Pure string helpers, no backend dependency. These define the canonical
//! attribute names of a questionnaire submission document.

use uuid::Uuid;

/// A stored document as returned by the backend: attribute name to value,
/// in the order the backend returned them.
pub type Document = serde_json::Map<String, serde_json::Value>;

/// Attribute names used in submission documents.
pub mod field {
    pub const STUDENT_ID: &str = "studentId";
    pub const IDENTITY: &str = "identity";
    pub const PREFERRED_DATE: &str = "preferredDate";
    pub const YEAR_OF_STUDY: &str = "yearOfStudy";
    pub const PARTNER_PREFERENCE: &str = "partnerPreference";
    pub const DATE_TYPE: &str = "dateType";
    pub const RELATIONSHIP_TYPE: &str = "relationshipType";
    pub const INTERESTED_IN: &str = "interestedIn";
    pub const USER_ID: &str = "userId";
    pub const SUBMITTED_AT: &str = "submittedAt";
    pub const SCHEMA_VERSION: &str = "schemaVersion";

    /// Legacy timestamp attribute written by v1 clients.
    pub const CREATED_AT: &str = "createdAt";
    /// Legacy alias of [`RELATIONSHIP_TYPE`].
    pub const DATE_FORMAT: &str = "dateFormat";
    /// Legacy alias of [`INTERESTED_IN`].
    pub const YEAR_PREFERENCE: &str = "yearPreference";
}

/// Backend-managed attributes all start with this prefix (`$id`, `$createdAt`, ...).
pub const SYSTEM_PREFIX: char = '$';

pub const DOCUMENT_ID: &str = "$id";
pub const DOCUMENT_CREATED_AT: &str = "$createdAt";

/// Generate a new document id. The backend caps ids at 36 characters and
/// disallows a leading special character, so the hyphen-free form is used.
pub fn new_document_id() -> String {
    Uuid::new_v4().simple().to_string()
}

pub fn document_id(doc: &Document) -> Option<&str> {
    doc.get(DOCUMENT_ID).and_then(|v| v.as_str())
}

pub fn is_system_field(name: &str) -> bool {
    name.starts_with(SYSTEM_PREFIX)
}
