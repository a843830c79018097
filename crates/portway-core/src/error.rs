use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Value validation errors
    #[error("Invalid baud rate: {0}")]
    InvalidBaudRate(String),

    #[error("Invalid port name: {0}")]
    InvalidPortName(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
