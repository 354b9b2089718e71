//! Command modules for the template store CLI.
//!
//! - `config_cmd`: Configuration file management
//! - `template_cmd`: Template operations against the backend

pub mod config_cmd;
pub mod template_cmd;
