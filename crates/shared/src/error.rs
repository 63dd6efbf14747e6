use thiserror::Error;

/// Validation failure while decoding a server-encoded value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("expected 5 to 7 timestamp components, got {0}")]
    ComponentCount(usize),
    #[error("timestamp component `{0}` is out of range")]
    OutOfRange(&'static str),
    #[error("invalid calendar date {year}-{month}-{day}")]
    InvalidDate { year: i32, month: u32, day: u32 },
    #[error("invalid time of day {hour}:{minute}:{second}")]
    InvalidTime { hour: u32, minute: u32, second: u32 },
}
