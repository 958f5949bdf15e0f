pub mod app;
pub mod config;
pub mod error;
pub mod logging;

pub use app::App;
pub use config::Config;
pub use error::Error;
