// Adapters layer: concrete implementations of the domain ports.

pub mod http_transport;
pub mod registry;

pub use http_transport::HttpTransport;
pub use registry::StaticTenantRegistry;
