pub mod error;
pub mod evaluate;
pub mod exercise;
pub mod io;
pub mod modality;
pub mod paths;
pub mod presentation;
pub mod progress;
pub mod requirement;
pub mod response;
pub mod snapshot;

pub use error::{PlaybookError, Result};
