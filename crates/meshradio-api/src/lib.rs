// meshradio-api: Async client for the MeshRadio station control API and status stream

pub mod error;
pub mod models;
pub mod station;
pub mod stream;
pub mod transport;

pub use error::Error;
pub use models::{CommandAck, StatusPayload, WireMode};
pub use station::StationClient;
pub use stream::{CloseReason, StreamEvent};
pub use transport::TransportConfig;
