pub mod cli;
pub mod config;
pub mod content;
pub mod domain;
pub mod errors;
pub mod logging;
pub mod publish;
pub mod services;
pub mod sources;
pub mod storage;
