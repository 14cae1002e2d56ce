//! HTTP/JSON clients for the TeTRES analysis server.
//!
//! The server exposes a uniform CRUD surface per entity plus a
//! submit-and-poll interface for long-running estimation jobs.  This
//! crate wraps both behind typed clients:
//!
//! - [`EntityClient`]: generic list/get/insert/update/delete/years
//!   client with a locally cached list and broadcast change
//!   notifications,
//! - [`EstimationClient`]: job submission, fixed-interval result
//!   polling and zip result download,
//! - [`InfraLoader`]: roadway-network snapshot fetch with disk-cache
//!   fallback.
//!
//! Every operation can be awaited directly ("please wait" usage) or
//! dispatched onto a background task with the outcome delivered through
//! the client's event channel.

pub mod config;
pub mod entity;
pub mod error;
pub mod estimation;
pub mod events;
pub mod http;
pub mod infra_loader;
pub mod protocol;
pub mod routes;
pub mod sysconfig;
pub mod urls;

pub use config::ClientConfig;
pub use entity::EntityClient;
pub use error::ApiError;
pub use estimation::{EstimationClient, EstimationError};
pub use events::{DataEvent, JobEvent};
pub use http::{ensure_envelope_success, FormData, HttpGateway};
pub use infra_loader::{InfraLoader, InfraSource};
pub use protocol::{Envelope, ResultStatus};
pub use routes::ReliabilityRouteClient;
pub use sysconfig::SystemConfigClient;
pub use urls::{ApiUrls, EndpointSet};
