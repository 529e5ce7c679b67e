//! # Quizduel Shared
//! Identities, bus events and service wire types shared by every quizduel
//! peer.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod grading;
mod messages;
mod pipeline;
mod protocol;
mod types;

pub use grading::{GradeRequest, GradeResponse, PlayerGrade, SCORE_SCALE};
pub use messages::{
    bus_message::{BusEvent, BusMessage},
    codec::{decode, encode, ByteReader, ByteWriter},
    constants::{HEADER_BYTES, MAX_TEXT_BYTES},
    error::{DecodeError, EncodeError},
};
pub use pipeline::PipelineResponse;
pub use protocol::{EventCode, ProtocolError};
pub use types::{PeerRole, PlayerId, PlayerIdError, RoundIndex};
