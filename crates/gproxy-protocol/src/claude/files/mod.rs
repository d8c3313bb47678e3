pub mod request;
pub mod response;

pub use request::{
    CreateFileRequest, DeleteFileRequest, GetFileContentRequest, GetFileRequest, ListFilesRequest,
};
pub use response::{DeleteFileResponse, FileContent, FileMetadata, ListFilesResponse};
