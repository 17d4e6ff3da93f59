pub mod config;
pub mod error;
pub mod files;
pub mod job;
pub mod results;
pub mod task;
pub mod template;

pub use config::*;
pub use error::*;
pub use files::*;
pub use job::*;
pub use results::*;
pub use task::*;
pub use template::*;
