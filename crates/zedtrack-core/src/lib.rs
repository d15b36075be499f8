pub mod config;
pub mod device;
pub mod error;
pub mod logging;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod point;
pub mod session;
pub mod snapshot;
pub mod transform;
