pub mod config;
pub mod error;
pub mod io;
pub mod lock;
pub mod mail;
pub mod notify;
pub mod rotation;
pub mod smtp;

pub use error::{Result, RotamailError};
