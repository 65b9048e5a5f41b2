use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One detected face instance, written by the upstream detection pipeline.
/// This service only ever reads these documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaceRecord {
    pub face_id: String,
    /// Photo this face was cropped from.
    pub photo_id: String,
    pub embedding: Vec<f32>,
    /// Identity assigned by the matcher; `None` or empty means unknown.
    #[serde(default)]
    pub matched_name: Option<String>,
    pub detected_at: DateTime<Utc>,
    /// Bounding box and detector details, passed through untouched.
    #[serde(default)]
    pub detector_meta: serde_json::Value,
}

impl FaceRecord {
    /// Whether the matcher assigned this face a known identity.
    pub fn is_matched(&self) -> bool {
        self.matched_name.as_deref().is_some_and(|n| !n.is_empty())
    }
}

/// Per-photo view of a detected face, embedded in `PhotoRecord`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaceSummary {
    pub face_id: String,
    #[serde(default)]
    pub matched_name: Option<String>,
}

impl FaceSummary {
    pub fn is_matched(&self) -> bool {
        self.matched_name.as_deref().is_some_and(|n| !n.is_empty())
    }
}

/// One CCTV capture event with its detected faces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoRecord {
    pub photo_id: String,
    pub file_name: String,
    pub captured_at: DateTime<Utc>,
    /// Detection order as produced by the detector.
    #[serde(default)]
    pub faces: Vec<FaceSummary>,
}

impl PhotoRecord {
    /// Matched person names on this photo: the deduplicated union over its
    /// faces, in detection order. Derived rather than stored so it cannot
    /// disagree with the face list.
    pub fn matched_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        for face in &self.faces {
            if let Some(name) = face.matched_name.as_deref() {
                if !name.is_empty() && !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
    }
}

/// A named reference identity with one or more ground-truth embeddings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnownFaceRecord {
    pub name: String,
    pub embeddings: Vec<Vec<f32>>,
}

// Wire shapes for the HTTP surface.

#[derive(Debug, Deserialize)]
pub struct KnownFacesRequest {
    pub names: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct KnownFacesResponse {
    pub results: Vec<PhotoRecord>,
    pub skipped_names: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct PhotoListResponse {
    pub results: Vec<PhotoRecord>,
}

#[derive(Debug, Serialize)]
pub struct KnownFaceListResponse {
    pub results: Vec<KnownFaceRecord>,
}

#[derive(Debug, Serialize)]
pub struct SimilarFace {
    pub face: FaceRecord,
    pub similarity: f32,
}

#[derive(Debug, Serialize)]
pub struct SimilaritySearchResponse {
    pub results: Vec<SimilarFace>,
    pub threshold: f32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_face_record_decodes_with_optional_fields_absent() {
        let doc = json!({
            "face_id": "f1",
            "photo_id": "p1",
            "embedding": [0.1, 0.2],
            "detected_at": "2025-01-01T12:00:00Z"
        });
        let face: FaceRecord = serde_json::from_value(doc).unwrap();
        assert_eq!(face.matched_name, None);
        assert!(face.detector_meta.is_null());
        assert!(!face.is_matched());
    }

    #[test]
    fn test_face_record_missing_required_field_is_an_error() {
        // No silent defaults for required fields: a document without an
        // embedding is corrupt, not an empty vector.
        let doc = json!({
            "face_id": "f1",
            "photo_id": "p1",
            "detected_at": "2025-01-01T12:00:00Z"
        });
        assert!(serde_json::from_value::<FaceRecord>(doc).is_err());
    }

    #[test]
    fn test_empty_matched_name_counts_as_unmatched() {
        let summary = FaceSummary {
            face_id: "f1".to_string(),
            matched_name: Some(String::new()),
        };
        assert!(!summary.is_matched());
    }

    #[test]
    fn test_detector_meta_round_trips_untouched() {
        let doc = json!({
            "face_id": "f1",
            "photo_id": "p1",
            "embedding": [1.0],
            "matched_name": "Danil",
            "detected_at": "2025-01-01T12:00:00Z",
            "detector_meta": {"bbox": [10, 20, 64, 64], "confidence": 0.97}
        });
        let face: FaceRecord = serde_json::from_value(doc.clone()).unwrap();
        assert_eq!(face.detector_meta, doc["detector_meta"]);
        assert!(face.is_matched());
    }
}
