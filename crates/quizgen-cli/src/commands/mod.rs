pub mod attempt;
pub mod download;
pub mod export;
pub mod generate;
pub mod init;
pub mod list_models;
pub mod quiz;
pub mod take;
