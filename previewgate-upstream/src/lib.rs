pub mod client;
pub mod error;
pub mod request;
pub mod response;

pub use client::{TlsPolicy, UpstreamClient, UpstreamClientBuilder};
pub use error::UpstreamError;
pub use request::GraphQLRequest;
pub use response::UpstreamResponse;
