//! Service layer
//!
//! - `ServiceFactory`: builds the transport and traversal from configuration

pub mod factory;

pub use factory::ServiceFactory;
