// src/core/mod.rs
//! Network layer: transport seam, request state and per-resource clients

pub mod request_state;
pub mod resources;
pub mod service_client;
pub mod transport;

pub use request_state::{RequestConfig, RequestOverrides, RequestSnapshot, RequestState};
pub use resources::{
    CreatePost, DeleteApplication, DeletePost, GetDashboard, GetPostByShare, MarkFavourite,
    RequestInterview, SubmitApplication,
};
pub use service_client::ServiceClient;
pub use transport::{
    ApiRequest, FilePart, HttpMethod, MultipartForm, ReqwestTransport, RequestBody, RequestError,
    Transport,
};
