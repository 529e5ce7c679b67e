use thiserror::Error;

/// Errors that can occur while interpreting bus protocol values
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// Event code is not one of the reserved quiz codes
    #[error("Event code {code} is not reserved by the quiz protocol. Expected 1 (ANSWER), 5 (DAMAGE) or 99 (ROUND_START)")]
    UnknownEventCode { code: u8 },
}
