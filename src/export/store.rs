//! File stores for exported blobs (S3, R2, GCS, Azure, local, memory)

use crate::error::{Error, Result};
use async_trait::async_trait;
use bytes::Bytes;
use object_store::aws::AmazonS3Builder;
use object_store::azure::MicrosoftAzureBuilder;
use object_store::gcp::GoogleCloudStorageBuilder;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::path::{Path as ObjectPath, PathPart};
use object_store::{Attribute, Attributes, ObjectStore, PutOptions, PutPayload};
use std::sync::Arc;
use tracing::info;

/// Named, typed file content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    /// File name including extension
    pub name: String,
    /// MIME type
    pub content_type: String,
    /// File content
    pub bytes: Bytes,
}

impl Blob {
    /// Create a blob
    pub fn new(
        name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }
}

/// Destination for exported files
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Store `blob` and return a URL identifying the new file
    async fn create_file(&self, blob: Blob) -> Result<String>;
}

/// A folder in an object store, parsed from a URL
#[derive(Debug, Clone)]
pub struct ObjectStoreFolder {
    store: Arc<dyn ObjectStore>,
    /// Path prefix within the bucket/container
    prefix: String,
    /// URL root used when reporting file locations
    root: String,
    scheme: String,
}

impl ObjectStoreFolder {
    /// Parse a folder URL and create the matching object store
    ///
    /// Supported formats:
    /// - `s3://bucket/path/` - AWS S3
    /// - `r2://bucket/path/` - Cloudflare R2 (S3-compatible)
    /// - `gs://bucket/path/` - Google Cloud Storage
    /// - `az://container/path/` - Azure Blob Storage
    /// - `memory://` - in-process store
    /// - `/local/path/` or `file:///local/path/` - Local filesystem
    pub fn parse(url: &str) -> Result<Self> {
        let url = url.trim();
        if url.is_empty() {
            return Err(Error::missing_parameter("target"));
        }

        if url.starts_with("s3://") {
            Self::parse_s3(url, false)
        } else if url.starts_with("r2://") {
            Self::parse_s3(url, true)
        } else if url.starts_with("gs://") {
            Self::parse_gcs(url)
        } else if url.starts_with("az://") {
            Self::parse_azure(url)
        } else if url.starts_with("memory://") {
            Ok(Self::in_memory())
        } else {
            Self::parse_local(url)
        }
    }

    /// An in-process store, mostly useful for tests and dry runs
    pub fn in_memory() -> Self {
        Self {
            store: Arc::new(InMemory::new()),
            prefix: String::new(),
            root: "memory://".to_string(),
            scheme: "memory".to_string(),
        }
    }

    fn split_bucket<'a>(url: &'a str, scheme: &str) -> Result<(&'a str, String)> {
        let without_scheme = url
            .strip_prefix(&format!("{scheme}://"))
            .ok_or_else(|| Error::config(format!("Invalid {scheme} URL: {url}")))?;

        let (bucket, prefix) = match without_scheme.find('/') {
            Some(idx) => (
                &without_scheme[..idx],
                without_scheme[idx + 1..].trim_end_matches('/').to_string(),
            ),
            None => (without_scheme, String::new()),
        };
        if bucket.is_empty() {
            return Err(Error::config(format!("Missing bucket in {scheme} URL: {url}")));
        }
        Ok((bucket, prefix))
    }

    /// Parse S3 or R2 URL
    fn parse_s3(url: &str, is_r2: bool) -> Result<Self> {
        let scheme = if is_r2 { "r2" } else { "s3" };
        let (bucket, prefix) = Self::split_bucket(url, scheme)?;

        let mut builder = AmazonS3Builder::from_env().with_bucket_name(bucket);

        // R2 needs an account endpoint; AWS_ENDPOINT is already read by from_env()
        if is_r2 {
            if let Ok(endpoint) = std::env::var("R2_ENDPOINT_URL") {
                builder = builder.with_endpoint(endpoint);
            }
        }

        let store = builder
            .build()
            .map_err(|e| Error::config(format!("Failed to create {scheme} client: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            prefix,
            root: format!("{scheme}://{bucket}"),
            scheme: scheme.to_string(),
        })
    }

    /// Parse GCS URL
    fn parse_gcs(url: &str) -> Result<Self> {
        let (bucket, prefix) = Self::split_bucket(url, "gs")?;

        let store = GoogleCloudStorageBuilder::from_env()
            .with_bucket_name(bucket)
            .build()
            .map_err(|e| Error::config(format!("Failed to create GCS client: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            prefix,
            root: format!("gs://{bucket}"),
            scheme: "gs".to_string(),
        })
    }

    /// Parse Azure Blob URL
    fn parse_azure(url: &str) -> Result<Self> {
        let (container, prefix) = Self::split_bucket(url, "az")?;

        let store = MicrosoftAzureBuilder::from_env()
            .with_container_name(container)
            .build()
            .map_err(|e| Error::config(format!("Failed to create Azure client: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            prefix,
            root: format!("az://{container}"),
            scheme: "az".to_string(),
        })
    }

    /// Parse local filesystem path
    fn parse_local(path: &str) -> Result<Self> {
        let path = path.strip_prefix("file://").unwrap_or(path);

        std::fs::create_dir_all(path)
            .map_err(|e| Error::config(format!("Failed to create directory {path}: {e}")))?;

        let store = LocalFileSystem::new_with_prefix(path)
            .map_err(|e| Error::config(format!("Failed to create local store: {e}")))?;
        let absolute = std::fs::canonicalize(path)?;

        Ok(Self {
            store: Arc::new(store),
            prefix: String::new(),
            root: format!("file://{}", absolute.display()),
            scheme: "file".to_string(),
        })
    }

    /// Check if this is a cloud destination
    pub fn is_cloud(&self) -> bool {
        !matches!(self.scheme.as_str(), "file" | "memory")
    }

    /// Get the scheme (s3, r2, gs, az, file, memory)
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Path of `filename` inside the folder. The filename is one segment;
    /// a `/` in it is percent-encoded rather than opening a subdirectory.
    fn object_path(&self, filename: &str) -> ObjectPath {
        ObjectPath::from(self.prefix.as_str()).child(PathPart::from(filename))
    }

    /// URL reported for a stored object
    fn location(&self, path: &ObjectPath) -> String {
        if self.root.ends_with('/') {
            format!("{}{path}", self.root)
        } else {
            format!("{}/{path}", self.root)
        }
    }

    /// Read a file back from the folder
    pub async fn read(&self, filename: &str) -> Result<Bytes> {
        let path = self.object_path(filename);
        let result = self
            .store
            .get(&path)
            .await
            .map_err(|e| Error::store(format!("Failed to read {path}: {e}")))?;
        result
            .bytes()
            .await
            .map_err(|e| Error::store(format!("Failed to read {path}: {e}")))
    }
}

#[async_trait]
impl FileStore for ObjectStoreFolder {
    async fn create_file(&self, blob: Blob) -> Result<String> {
        let path = self.object_path(&blob.name);

        // Local stores reject object attributes
        let mut opts = PutOptions::default();
        if self.is_cloud() {
            let mut attributes = Attributes::new();
            attributes.insert(Attribute::ContentType, blob.content_type.clone().into());
            opts.attributes = attributes;
        }

        self.store
            .put_opts(&path, PutPayload::from(blob.bytes), opts)
            .await
            .map_err(|e| Error::store(format!("Failed to write {path}: {e}")))?;

        let location = self.location(&path);
        info!("Stored {} ({}) at {location}", blob.name, blob.content_type);
        Ok(location)
    }
}
