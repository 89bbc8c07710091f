pub mod error;
pub mod reporting;
pub mod sample;
pub mod service;
pub mod session;

pub use error::*;
pub use reporting::*;
pub use service::*;
pub use session::*;
