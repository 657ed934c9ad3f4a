pub mod error;
pub mod service;
pub mod views;

pub use error::*;
pub use service::*;
pub use views::*;
