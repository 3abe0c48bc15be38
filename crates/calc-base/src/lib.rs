pub mod api;
pub mod config;
pub mod constants;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod session;
