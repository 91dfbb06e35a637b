pub mod aggregate;
pub mod billing;
pub mod config;
pub mod error;
pub mod formatter;
pub mod html;
pub mod job;
pub mod logging;
pub mod mailer;
pub mod models;
