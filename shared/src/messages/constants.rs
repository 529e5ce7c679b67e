// Wire layout sizes

/// Code (u8) + origin tag (u8) + round (u16)
pub const HEADER_BYTES: usize = 4;

/// Strings carry a u16 length prefix, so one field can hold at most this
/// many UTF-8 bytes. Longer answers are rejected at encode time rather than
/// silently cut.
pub const MAX_TEXT_BYTES: usize = u16::MAX as usize;
