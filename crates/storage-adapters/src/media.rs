//! # Local media store
//!
//! Filesystem implementation of `MediaStorage` with content-addressable
//! naming: the SHA-256 of the blob is its id, files are sharded two levels
//! deep, and identical uploads deduplicate for free. A WebP thumbnail is
//! written next to each original.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use domains::{Error, FieldErrors, MediaStorage, Result};
use mime::Mime;
use sha2::{Digest, Sha256};
use tokio::fs;

const THUMBNAIL_EDGE: u32 = 320;

pub struct LocalMediaStore {
    /// Root directory for all uploads (e.g., "./data/media").
    root: PathBuf,
    /// Public URL prefix (e.g., "/media").
    url_prefix: String,
    /// Upload size cap in bytes.
    max_bytes: usize,
}

impl LocalMediaStore {
    pub fn new(root: PathBuf, url_prefix: String, max_bytes: usize) -> Self {
        Self {
            root,
            url_prefix,
            max_bytes,
        }
    }

    /// "ab/cd/abcdef..." under the root.
    fn sharded_path(&self, media_id: &str) -> PathBuf {
        let mut path = self.root.clone();
        path.push(&media_id[0..2]);
        path.push(&media_id[2..4]);
        path.push(media_id);
        path
    }

    fn write_thumbnail(&self, img: &image::DynamicImage, original: &Path, media_id: &str) -> Result<()> {
        let thumb = img.thumbnail(THUMBNAIL_EDGE, THUMBNAIL_EDGE);
        let mut thumb_path = original
            .parent()
            .expect("sharded path always has a parent")
            .to_path_buf();
        thumb_path.push(format!("thumb_{media_id}.webp"));
        thumb
            .save_with_format(thumb_path, image::ImageFormat::WebP)
            .map_err(|e| Error::Internal(anyhow::anyhow!("thumbnail encode failed: {e}")))?;
        Ok(())
    }
}

#[async_trait]
impl MediaStorage for LocalMediaStore {
    async fn save(&self, data: Bytes, _content_type: &Mime) -> Result<String> {
        if data.is_empty() {
            return Err(FieldErrors::single("file", "empty upload"));
        }
        if data.len() > self.max_bytes {
            return Err(FieldErrors::single(
                "file",
                format!("exceeds the {} byte limit", self.max_bytes),
            ));
        }

        // Decode before anything touches disk, so an undecodable upload
        // leaves no partial state behind.
        let img = image::ImageReader::new(Cursor::new(data.as_ref()))
            .with_guessed_format()
            .map_err(|e| Error::Internal(anyhow::anyhow!("format sniffing failed: {e}")))?
            .decode()
            .map_err(|_| FieldErrors::single("file", "could not be decoded as an image"))?;

        let media_id = hex::encode(Sha256::digest(&data));
        let target = self.sharded_path(&media_id);
        let parent = target.parent().expect("sharded path always has a parent");
        fs::create_dir_all(parent)
            .await
            .map_err(|e| Error::Internal(anyhow::anyhow!("media dir creation failed: {e}")))?;

        // Content addressing: an existing file is the same bytes.
        if fs::try_exists(&target)
            .await
            .map_err(|e| Error::Internal(anyhow::anyhow!("media stat failed: {e}")))?
        {
            return Ok(media_id);
        }

        fs::write(&target, &data)
            .await
            .map_err(|e| Error::Internal(anyhow::anyhow!("media write failed: {e}")))?;
        self.write_thumbnail(&img, &target, &media_id)?;
        tracing::debug!(media = %media_id, bytes = data.len(), "media stored");
        Ok(media_id)
    }

    fn url(&self, media_id: &str) -> String {
        format!(
            "{}/{}/{}/{}",
            self.url_prefix,
            &media_id[0..2],
            &media_id[2..4],
            media_id
        )
    }

    fn thumbnail_url(&self, media_id: &str) -> String {
        format!(
            "{}/{}/{}/thumb_{}.webp",
            self.url_prefix,
            &media_id[0..2],
            &media_id[2..4],
            media_id
        )
    }
}
