pub mod browser;
pub mod cmd;
pub mod common;
pub mod utils;
