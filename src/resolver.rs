//! Membership queries over already-fetched photo records: which photos show
//! a named person, and which show only unidentified visitors.

use std::collections::HashSet;

use crate::model::{KnownFaceRecord, PhotoRecord};

/// Result of a known-person lookup. Names that occur nowhere land in
/// `skipped` instead of failing the request.
#[derive(Debug)]
pub struct KnownMatches {
    pub matches: Vec<PhotoRecord>,
    pub skipped: Vec<String>,
}

/// Find photos whose matched names intersect `names`.
///
/// A requested name counts as present when it is either a registered known
/// face or a matched name on at least one photo; otherwise it is skipped (in
/// request order). Matching photos are deduplicated by `photo_id` and kept
/// in stored order. An empty request yields empty matches and empty skips.
pub fn find_known(
    names: &[String],
    photos: &[PhotoRecord],
    known_faces: &[KnownFaceRecord],
) -> KnownMatches {
    let registered: HashSet<&str> = known_faces.iter().map(|k| k.name.as_str()).collect();
    let mut photo_names: HashSet<&str> = HashSet::new();
    for photo in photos {
        photo_names.extend(photo.matched_names());
    }

    let mut requested: Vec<&str> = Vec::new();
    let mut skipped = Vec::new();
    for name in names {
        if registered.contains(name.as_str()) || photo_names.contains(name.as_str()) {
            if !requested.contains(&name.as_str()) {
                requested.push(name);
            }
        } else {
            skipped.push(name.clone());
        }
    }

    let matches = photos
        .iter()
        .filter(|photo| {
            photo
                .matched_names()
                .iter()
                .any(|n| requested.contains(n))
        })
        .cloned()
        .collect();

    KnownMatches { matches, skipped }
}

/// Find photos showing only unidentified visitors.
///
/// Photo-level policy: a photo qualifies only when it has at least one
/// detected face and zero matched names across all of them. One matched
/// face among several unmatched ones disqualifies the photo, and a photo
/// with no faces has no visitor to report.
pub fn find_unknown(photos: &[PhotoRecord]) -> Vec<PhotoRecord> {
    photos
        .iter()
        .filter(|photo| !photo.faces.is_empty() && photo.matched_names().is_empty())
        .cloned()
        .collect()
}
