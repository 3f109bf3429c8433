//! Concrete adapter implementations for ports.

pub mod email;
pub mod file_config_adapter;
pub mod log_mail_adapter;
pub mod sqlite_adapter;
pub mod web;
