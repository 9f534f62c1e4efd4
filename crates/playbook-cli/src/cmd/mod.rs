pub mod exercise;
pub mod init;
pub mod progress;
pub mod respond;
