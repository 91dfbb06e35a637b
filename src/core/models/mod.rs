pub mod cost;
pub mod report;
pub mod window;
