pub mod config;
pub mod error;
pub mod security;
pub mod transport;

pub use config::CliConfig;
pub use error::{AclError, Result, Validated, ValidationError, ValidationErrors};
