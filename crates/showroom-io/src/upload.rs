//! Tile image upload validation and storage.

use indexmap::IndexMap;

use crate::error::UploadError;
use crate::store::now_millis;

/// Which uploads are accepted.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadPolicy {
    /// Accepted MIME types.
    pub accepted_types: Vec<String>,
    /// Largest accepted payload in bytes.
    pub max_bytes: usize,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            accepted_types: vec!["image/jpeg".into(), "image/png".into(), "image/webp".into()],
            max_bytes: 10 * 1024 * 1024,
        }
    }
}

impl UploadPolicy {
    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    pub fn with_type(mut self, content_type: impl Into<String>) -> Self {
        self.accepted_types.push(content_type.into());
        self
    }

    pub fn check(&self, content_type: &str, size: usize) -> Result<(), UploadError> {
        if !self.accepted_types.iter().any(|t| t == content_type) {
            return Err(UploadError::InvalidFileType {
                content_type: content_type.to_string(),
            });
        }
        if size > self.max_bytes {
            return Err(UploadError::FileTooLarge {
                size,
                max: self.max_bytes,
            });
        }
        Ok(())
    }
}

/// An image file as received from the user.
#[derive(Debug, Clone, PartialEq)]
pub struct ImagePayload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImagePayload {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Extension for the stored name: the original file's extension, or one
    /// derived from the MIME type when the name has none.
    pub fn extension(&self) -> &str {
        match self.file_name.rsplit_once('.') {
            Some((_, ext)) if !ext.is_empty() => ext,
            _ => match self.content_type.as_str() {
                "image/jpeg" => "jpg",
                "image/png" => "png",
                "image/webp" => "webp",
                _ => "bin",
            },
        }
    }
}

/// A stored image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    pub name: String,
    /// Public reference usable as a tile image URL.
    pub url: String,
}

/// Where uploaded images end up.
pub trait ImageStorage {
    /// Store an object under `name` and return its public URL. Existing
    /// names are never overwritten.
    fn put(&mut self, name: &str, content_type: &str, bytes: &[u8]) -> Result<String, UploadError>;
}

/// Validate and store an uploaded tile image as `tile-{millis}.{ext}`.
///
/// Nothing is stored when validation fails.
pub fn upload_image(
    policy: &UploadPolicy,
    storage: &mut dyn ImageStorage,
    payload: &ImagePayload,
) -> Result<StoredImage, UploadError> {
    policy.check(&payload.content_type, payload.bytes.len())?;

    let name = format!("tile-{}.{}", now_millis(), payload.extension());
    let url = storage.put(&name, &payload.content_type, &payload.bytes)?;

    log::info!("uploaded {} ({} bytes) as {}", payload.file_name, payload.bytes.len(), name);
    Ok(StoredImage { name, url })
}

/// In-memory storage serving objects under a URL prefix.
#[derive(Debug, Clone)]
pub struct MemoryImageStorage {
    base_url: String,
    objects: IndexMap<String, (String, Vec<u8>)>,
}

impl Default for MemoryImageStorage {
    fn default() -> Self {
        Self::new("/uploads")
    }
}

impl MemoryImageStorage {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            objects: IndexMap::new(),
        }
    }

    /// Content type and bytes of a stored object.
    pub fn get(&self, name: &str) -> Option<(&str, &[u8])> {
        self.objects.get(name).map(|(t, b)| (t.as_str(), b.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl ImageStorage for MemoryImageStorage {
    fn put(&mut self, name: &str, content_type: &str, bytes: &[u8]) -> Result<String, UploadError> {
        if self.objects.contains_key(name) {
            return Err(UploadError::Storage(format!("object {} already exists", name)));
        }
        self.objects
            .insert(name.to_string(), (content_type.to_string(), bytes.to_vec()));
        Ok(format!("{}/{}", self.base_url.trim_end_matches('/'), name))
    }
}
