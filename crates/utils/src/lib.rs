pub mod config;
pub mod credential;
pub mod errors;
pub mod logger;

pub use config::EnvLoader;
pub use config::*;
pub use credential::*;
pub use errors::*;
pub use logger::*;
