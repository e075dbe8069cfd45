use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata record for one uploaded file, as stored in the search index.
///
/// Documents are created at upload time and never updated in place. The
/// `filename` is not guaranteed unique across the index.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub filename: String,
    /// Location of the blob, as reported by the blob store.
    pub path: String,
    /// Bytes written for the upload.
    pub size: u64,
    /// Client-declared MIME type. Untrusted.
    #[serde(default)]
    pub content_type: Option<String>,
    pub upload_date: DateTime<Utc>,
}

impl Document {
    /// Build a document stamped with the current time.
    pub fn new(
        filename: impl Into<String>,
        path: impl Into<String>,
        size: u64,
        content_type: Option<String>,
    ) -> Self {
        Self {
            filename: filename.into(),
            path: path.into(),
            size,
            content_type,
            upload_date: Utc::now(),
        }
    }

    /// Override the upload timestamp.
    pub fn with_upload_date(mut self, upload_date: DateTime<Utc>) -> Self {
        self.upload_date = upload_date;
        self
    }
}

/// Search results are projected down to the file name only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub filename: String,
}

impl From<Document> for SearchHit {
    fn from(doc: Document) -> Self {
        Self {
            filename: doc.filename,
        }
    }
}

/// Outcome reported for each file of an upload.
///
/// Only `Success` exists: a failing file aborts the whole request instead of
/// being reported individually.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    Success,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub filename: String,
    pub status: UploadStatus,
}

impl UploadedFile {
    pub fn success(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            status: UploadStatus::Success,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn document_json_shape() {
        let date = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let doc = Document::new("a.txt", "uploads/a.txt", 3, Some("text/plain".into()))
            .with_upload_date(date);
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["filename"], "a.txt");
        assert_eq!(value["path"], "uploads/a.txt");
        assert_eq!(value["size"], 3);
        assert_eq!(value["content_type"], "text/plain");
        assert_eq!(value["upload_date"], "2024-03-01T12:00:00Z");
    }

    #[test]
    fn document_without_content_type_deserializes() {
        let json = r#"{"filename":"a","path":"p","size":1,"upload_date":"2024-01-01T00:00:00Z"}"#;
        let doc: Document = serde_json::from_str(json).unwrap();
        assert!(doc.content_type.is_none());
    }

    #[test]
    fn hit_keeps_only_filename() {
        let hit = SearchHit::from(Document::new("x.png", "uploads/x.png", 10, None));
        assert_eq!(serde_json::to_value(hit).unwrap(), serde_json::json!({ "filename": "x.png" }));
    }

    #[test]
    fn upload_status_literal() {
        let json = serde_json::to_value(UploadedFile::success("f")).unwrap();
        assert_eq!(json, serde_json::json!({ "filename": "f", "status": "success" }));
    }
}
