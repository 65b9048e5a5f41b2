//! S3/MinIO-backed document store client.
//!
//! The detection pipeline writes JSON documents under fixed prefixes
//! (`photos/`, `faces/`, `known_faces/`) plus raw image objects under
//! `images/`. This service only reads. Listing is keyed and S3 lists keys
//! lexicographically, so the fetch order is the pipeline's insertion order.

use anyhow::{Context, Result};
use aws_config::Region;
use aws_sdk_s3::{config::Builder, Client};
use bytes::Bytes;
use serde::de::DeserializeOwned;

use crate::config::StoreConfig;
use crate::model::{FaceRecord, KnownFaceRecord, PhotoRecord};

const PHOTOS_PREFIX: &str = "photos/";
const FACES_PREFIX: &str = "faces/";
const KNOWN_FACES_PREFIX: &str = "known_faces/";
const IMAGES_PREFIX: &str = "images/";

#[derive(Clone)]
pub struct DocStore {
    client: Client,
    bucket: String,
}

impl DocStore {
    pub fn connect(config: &StoreConfig) -> Self {
        let creds = aws_sdk_s3::config::Credentials::new(
            &config.access_key,
            &config.secret_key,
            None,
            None,
            "static",
        );

        let s3_config = Builder::new()
            .endpoint_url(&config.endpoint)
            .region(Region::new("us-east-1"))
            .credentials_provider(creds)
            .force_path_style(true)
            .build();

        Self {
            client: Client::from_conf(s3_config),
            bucket: config.bucket.clone(),
        }
    }

    /// Storage connectivity probe for the health check.
    pub async fn ping(&self) -> Result<()> {
        self.client
            .head_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .context("document store unreachable")?;
        Ok(())
    }

    /// All photo capture records, in stored (insertion) order.
    pub async fn fetch_photos(&self) -> Result<Vec<PhotoRecord>> {
        self.fetch_documents(PHOTOS_PREFIX).await
    }

    /// All named reference identities.
    pub async fn fetch_known_faces(&self) -> Result<Vec<KnownFaceRecord>> {
        self.fetch_documents(KNOWN_FACES_PREFIX).await
    }

    /// The similarity corpus: every detected face paired with its embedding.
    pub async fn fetch_face_vectors(&self) -> Result<Vec<(FaceRecord, Vec<f32>)>> {
        let faces: Vec<FaceRecord> = self.fetch_documents(FACES_PREFIX).await?;
        Ok(faces
            .into_iter()
            .map(|face| {
                let vector = face.embedding.clone();
                (face, vector)
            })
            .collect())
    }

    /// Most recent capture by timestamp, or `None` when the store is empty.
    pub async fn latest_photo(&self) -> Result<Option<PhotoRecord>> {
        let photos = self.fetch_photos().await?;
        Ok(photos.into_iter().max_by_key(|p| p.captured_at))
    }

    /// Raw image bytes for a stored object, or `None` when absent.
    pub async fn fetch_image(&self, name: &str) -> Result<Option<Bytes>> {
        let key = format!("{IMAGES_PREFIX}{name}");
        let response = match self.client
            .get_object()
            .bucket(&self.bucket)
            .key(&key)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_no_such_key())
                {
                    return Ok(None);
                }
                return Err(err).with_context(|| format!("failed to get object {key}"));
            }
        };

        let data = response
            .body
            .collect()
            .await
            .with_context(|| format!("failed to read object body for {key}"))?;
        Ok(Some(data.into_bytes()))
    }

    /// List every key under `prefix`, fetch each object, and decode it.
    /// A document that fails to decode is a data-integrity fault and fails
    /// the whole fetch rather than being dropped.
    async fn fetch_documents<T: DeserializeOwned>(&self, prefix: &str) -> Result<Vec<T>> {
        let keys = self.list_objects(prefix).await?;
        let mut documents = Vec::with_capacity(keys.len());
        for key in keys {
            let data = self.get_object(&key).await?;
            let doc: T = serde_json::from_slice(&data)
                .with_context(|| format!("malformed document at {key}"))?;
            documents.push(doc);
        }
        Ok(documents)
    }

    async fn get_object(&self, key: &str) -> Result<Bytes> {
        let response = self.client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .with_context(|| format!("failed to get object {key}"))?;

        let data = response
            .body
            .collect()
            .await
            .with_context(|| format!("failed to read object body for {key}"))?;

        Ok(data.into_bytes())
    }

    async fn list_objects(&self, prefix: &str) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        let mut continuation: Option<String> = None;

        loop {
            let response = self.client
                .list_objects_v2()
                .bucket(&self.bucket)
                .prefix(prefix)
                .set_continuation_token(continuation.take())
                .send()
                .await
                .with_context(|| format!("failed to list objects under {prefix}"))?;

            if let Some(contents) = response.contents {
                for object in contents {
                    if let Some(key) = object.key {
                        keys.push(key);
                    }
                }
            }

            match response.next_continuation_token {
                Some(token) => continuation = Some(token),
                None => break,
            }
        }

        Ok(keys)
    }
}
