use bytes::Bytes;

/// The S3-compatible object API bridges gproxy's file surface onto the S3
/// bucket the Bedrock batch jobs read/write from; it is a thin object-store
/// facade (`PutObject`/`GetObject`/`HeadObject`/`DeleteObject`/`ListObjects`),
/// not a general S3 client — only the subset the file/batch routes need.
#[derive(Debug, Clone)]
pub struct PutObjectRequest {
    pub bucket: String,
    pub key: String,
    pub body: Bytes,
    pub content_type: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PutObjectResponse {
    /// canonical file id; the XML response wraps this as `ETag`.
    pub file_id: String,
}

#[derive(Debug, Clone)]
pub struct GetObjectRequest {
    pub bucket: String,
    pub key: String,
}

#[derive(Debug, Clone)]
pub struct GetObjectResponse {
    pub body: Bytes,
    pub content_type: String,
}

#[derive(Debug, Clone)]
pub struct HeadObjectRequest {
    pub bucket: String,
    pub key: String,
}

#[derive(Debug, Clone, Copy)]
pub struct HeadObjectResponse {
    pub content_length: u64,
}

#[derive(Debug, Clone)]
pub struct DeleteObjectRequest {
    pub bucket: String,
    pub key: String,
}

#[derive(Debug, Clone)]
pub struct ListObjectsRequest {
    pub bucket: String,
    pub prefix: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ListObjectsEntry {
    pub key: String,
    pub size: u64,
    pub last_modified: String,
}

#[derive(Debug, Clone)]
pub struct ListObjectsResponse {
    pub bucket: String,
    pub entries: Vec<ListObjectsEntry>,
}
