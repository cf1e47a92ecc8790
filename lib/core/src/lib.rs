pub mod config;
pub mod error;
pub mod module;
pub mod time;

pub use config::ServiceConfig;
pub use error::ServiceError;
pub use module::Module;
pub use time::now_utc;
