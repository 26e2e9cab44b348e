pub mod error;
pub mod export;
pub mod registry;
pub mod series;
pub mod service;
pub mod traits;
pub mod types;

pub use error::*;
pub use registry::{Company, CompanyRegistry};
pub use service::ForecastService;
pub use traits::*;
pub use types::*;
