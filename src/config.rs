//! configuration loading, validation and global access
pub mod instance;
pub mod options;
pub mod validate;
