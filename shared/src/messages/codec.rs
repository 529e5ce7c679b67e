use crate::{
    messages::{
        bus_message::{BusEvent, BusMessage},
        constants::{HEADER_BYTES, MAX_TEXT_BYTES},
        error::{DecodeError, EncodeError},
    },
    protocol::EventCode,
    types::PlayerId,
};

/// Growable little-endian byte writer for bus payloads
pub struct ByteWriter {
    buffer: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self {
        Self {
            buffer: Vec::with_capacity(64),
        }
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buffer.push(value);
    }

    pub fn write_u16(&mut self, value: u16) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_f32(&mut self, value: f32) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    /// Writes a u16 length prefix followed by the UTF-8 bytes
    pub fn write_str(&mut self, field: &'static str, value: &str) -> Result<(), EncodeError> {
        let bytes = value.as_bytes();
        let Ok(len) = u16::try_from(bytes.len()) else {
            return Err(EncodeError::TextTooLong {
                field,
                len: bytes.len(),
                limit: MAX_TEXT_BYTES,
            });
        };
        self.write_u16(len);
        self.buffer.extend_from_slice(bytes);
        Ok(())
    }

    pub fn bytes_written(&self) -> usize {
        self.buffer.len()
    }

    pub fn to_bytes(self) -> Vec<u8> {
        self.buffer
    }
}

impl Default for ByteWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Cursor over an incoming bus payload
pub struct ByteReader<'b> {
    buffer: &'b [u8],
    cursor: usize,
}

impl<'b> ByteReader<'b> {
    pub fn new(buffer: &'b [u8]) -> Self {
        Self { buffer, cursor: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.cursor
    }

    fn take(&mut self, field: &'static str, needed: usize) -> Result<&'b [u8], DecodeError> {
        let remaining = self.remaining();
        if remaining < needed {
            return Err(DecodeError::Truncated {
                field,
                needed,
                remaining,
            });
        }
        let slice = &self.buffer[self.cursor..self.cursor + needed];
        self.cursor += needed;
        Ok(slice)
    }

    pub fn read_u8(&mut self, field: &'static str) -> Result<u8, DecodeError> {
        Ok(self.take(field, 1)?[0])
    }

    pub fn read_u16(&mut self, field: &'static str) -> Result<u16, DecodeError> {
        let bytes = self.take(field, 2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    pub fn read_f32(&mut self, field: &'static str) -> Result<f32, DecodeError> {
        let bytes = self.take(field, 4)?;
        Ok(f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub fn read_str(&mut self, field: &'static str) -> Result<String, DecodeError> {
        let len = self.read_u16(field)? as usize;
        let bytes = self.take(field, len)?;
        std::str::from_utf8(bytes)
            .map(str::to_string)
            .map_err(|_| DecodeError::InvalidUtf8 { field })
    }
}

/// Serializes a message into its wire form
pub fn encode(message: &BusMessage) -> Result<Vec<u8>, EncodeError> {
    let mut writer = ByteWriter::new();
    writer.write_u8(message.code().to_u8());
    writer.write_u8(message.origin.to_tag());
    writer.write_u16(message.event.round());

    match &message.event {
        BusEvent::Answer { player, text, .. } => {
            writer.write_str("player", player)?;
            writer.write_str("text", text)?;
        }
        BusEvent::Damage { target, amount, .. } => {
            writer.write_str("target", target)?;
            writer.write_f32(*amount);
        }
        BusEvent::RoundStart { .. } => {}
    }

    Ok(writer.to_bytes())
}

/// Reads one message from its wire form. The whole buffer must be consumed.
pub fn decode(payload: &[u8]) -> Result<BusMessage, DecodeError> {
    if payload.len() < HEADER_BYTES {
        return Err(DecodeError::Truncated {
            field: "header",
            needed: HEADER_BYTES,
            remaining: payload.len(),
        });
    }

    let mut reader = ByteReader::new(payload);
    let code = EventCode::try_from(reader.read_u8("code")?)?;
    let origin = PlayerId::from_tag(reader.read_u8("origin")?)?;
    let round = reader.read_u16("round")?;

    let event = match code {
        EventCode::Answer => BusEvent::Answer {
            round,
            player: reader.read_str("player")?,
            text: reader.read_str("text")?,
        },
        EventCode::Damage => BusEvent::Damage {
            round,
            target: reader.read_str("target")?,
            amount: reader.read_f32("amount")?,
        },
        EventCode::RoundStart => BusEvent::RoundStart { round },
    };

    if reader.remaining() > 0 {
        return Err(DecodeError::TrailingBytes {
            count: reader.remaining(),
        });
    }

    Ok(BusMessage { origin, event })
}
