//! Security handlers for PDF encryption

mod standard;

pub use standard::StandardSecurityHandler;
