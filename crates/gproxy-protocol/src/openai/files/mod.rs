pub mod request;
pub mod response;

pub use request::{
    CreateFileRequest, DeleteFileRequest, FilePurpose, GetFileContentRequest, GetFileRequest,
    ListFilesRequest,
};
pub use response::{DeleteFileResponse, FileContent, FileObject, FileStatus, ListFilesResponse};
