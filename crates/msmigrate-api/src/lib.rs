// msmigrate-api: Async Rust binding for the Meraki Dashboard API endpoints
// needed to copy configuration between switches.

pub mod client;
pub mod devices;
pub mod error;
pub mod models;
pub mod organizations;
pub mod switch;
pub mod transport;

pub use client::{DEFAULT_BASE_URL, DashboardClient};
pub use error::Error;
pub use models::{
    CloneResult, Device, DeviceUpdate, Organization, SwitchPort, WRITABLE_PORT_ATTRIBUTES,
};
pub use transport::{DEFAULT_TIMEOUT, TransportConfig};
