pub mod request;
pub mod response;

pub use request::{
    CreateContainerFileRequest, CreateContainerRequest, DeleteContainerFileRequest,
    DeleteContainerRequest, GetContainerFileContentRequest, GetContainerFileRequest,
    GetContainerRequest, ListContainerFilesRequest, ListContainersRequest,
};
pub use response::{
    Container, ContainerFile, ContainerFileContent, ContainerStatus, DeleteContainerFileResponse,
    DeleteContainerResponse, ListContainerFilesResponse, ListContainersResponse,
};
