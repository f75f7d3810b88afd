//! StudyFlow Core - Shared functionality for the StudyFlow tools
//!
//! Both the study timer and the todo list keep their files under the same
//! data and config directories, resolved here.

pub mod config;
pub mod paths;

pub use config::Config;
pub use paths::Paths;
