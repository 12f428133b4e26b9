// Wire format constants for the v1 framed protocol
pub const MAGIC_CODE_BYTES: [u8; 2] = [0xda, 0xda];
pub const PROTOCOL_VERSION: u8 = 0x01;

pub const V1_HEADER_LENGTH: usize = 16; // Fixed header size, not including the head map
pub const TOTAL_LENGTH_OFFSET: usize = 3; // Total length field starts at byte 3 (4 bytes long)
pub const HEAD_LENGTH_OFFSET: usize = 7; // Head length field starts at byte 7 (2 bytes long)
pub const MESSAGE_TYPE_OFFSET: usize = 9;
pub const CODEC_OFFSET: usize = 10;
pub const COMPRESSOR_OFFSET: usize = 11;
pub const REQUEST_ID_OFFSET: usize = 12; // Request ID starts at byte 12 (4 bytes long)

/// Upper bound on a single frame. A header declaring more than this is
/// treated as stream corruption and closes the connection.
pub const MAX_PACKAGE_LENGTH: usize = 16 * 1024 * 1024;
