pub mod error;
#[cfg(test)]
pub mod mock;
pub mod monitor;
pub mod region;
pub mod service;
pub mod singleton;

pub use error::*;
pub use monitor::*;
pub use region::*;
pub use service::*;
pub use singleton::*;
