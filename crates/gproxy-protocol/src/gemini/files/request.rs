use bytes::Bytes;

/// The resumable upload protocol's start request declares name/size/type up
/// front; the actual bytes land in a second request against the session URL
/// it returns. Collapsed to one hop here since the gateway always has the
/// full body in hand before forwarding.
#[derive(Debug, Clone)]
pub struct CreateFileRequest {
    pub file: Bytes,
    pub display_name: Option<String>,
    pub mime_type: String,
}

#[derive(Debug, Clone)]
pub struct GetFileRequest {
    /// canonical `files-XYZ`; decoded back to `files/XYZ` before being sent
    /// upstream.
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct DeleteFileRequest {
    pub name: String,
}

#[derive(Debug, Clone, Default)]
pub struct ListFilesRequest {
    pub page_size: Option<i64>,
    pub page_token: Option<String>,
}
