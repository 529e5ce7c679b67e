pub mod bus_message;
pub mod codec;
pub mod constants;
pub mod error;
