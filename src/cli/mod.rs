pub mod config_cmd;
pub mod lambda_cmd;
pub mod output;
pub mod renderer;
pub mod run_cmd;
