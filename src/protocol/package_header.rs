use crate::constants::{
    CODEC_OFFSET, COMPRESSOR_OFFSET, HEAD_LENGTH_OFFSET, MAGIC_CODE_BYTES, MAX_PACKAGE_LENGTH,
    MESSAGE_TYPE_OFFSET, REQUEST_ID_OFFSET, TOTAL_LENGTH_OFFSET, V1_HEADER_LENGTH,
};
use crate::protocol::{decode_head_map, MessageType, ProtocolError};
use std::collections::HashMap;

/// Parsed v1 frame header.
///
/// Layout, big-endian:
///
/// ```text
/// 0     1     2     3     4     5     6     7     8     9    10    11    12    13    14    15    16
/// +-----+-----+-----+-----+-----+-----+-----+-----+-----+-----+-----+-----+-----+-----+-----+-----+
/// |   magic   | ver |     total length      | head len  | typ |codec|comp |      request id       |
/// +-----------+-----+-----------------------+-----------+-----+-----+-----+-----------------------+
/// |                              head map [optional]                                              |
/// +-----------------------------------------------------------------------------------------------+
/// |                                         body                                                  |
/// +-----------------------------------------------------------------------------------------------+
/// ```
///
/// `total_length` covers header, head map and body; `head_length` covers the
/// fixed header plus the head map, so `body_length = total_length - head_length`.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageHeader {
    pub version: u8,
    pub total_length: u32,
    pub head_length: u16,
    pub message_type: MessageType,
    pub codec: u8,
    pub compressor: u8,
    pub id: i32,
    pub head_map: HashMap<String, String>,
}

impl PackageHeader {
    pub fn body_length(&self) -> u32 {
        self.total_length - self.head_length as u32
    }

    /// Parses a header (including the head map) from the front of `data`.
    ///
    /// Returns `NotEnoughData` without mutating anything when fewer bytes
    /// than the fixed header, or fewer than `head_length`, are available.
    /// Magic, size, and type violations are connection-fatal.
    pub fn unmarshal(data: &[u8]) -> Result<PackageHeader, ProtocolError> {
        if data.len() < V1_HEADER_LENGTH {
            return Err(ProtocolError::NotEnoughData);
        }

        if data[0..2] != MAGIC_CODE_BYTES {
            return Err(ProtocolError::IllegalMagic);
        }
        let version = data[2];

        let total_length = u32::from_be_bytes(
            data[TOTAL_LENGTH_OFFSET..HEAD_LENGTH_OFFSET]
                .try_into()
                .map_err(|_| ProtocolError::NotEnoughData)?,
        );
        if total_length as usize > MAX_PACKAGE_LENGTH {
            return Err(ProtocolError::TooLargePackage {
                total_length: total_length as usize,
            });
        }

        let head_length = u16::from_be_bytes(
            data[HEAD_LENGTH_OFFSET..MESSAGE_TYPE_OFFSET]
                .try_into()
                .map_err(|_| ProtocolError::NotEnoughData)?,
        );
        if (head_length as usize) < V1_HEADER_LENGTH || head_length as u32 > total_length {
            return Err(ProtocolError::InvalidHeadLength {
                head_length,
                total_length,
            });
        }

        let message_type = MessageType::try_from(data[MESSAGE_TYPE_OFFSET])
            .map_err(|_| ProtocolError::InvalidMessageType(data[MESSAGE_TYPE_OFFSET]))?;
        let codec = data[CODEC_OFFSET];
        let compressor = data[COMPRESSOR_OFFSET];
        let id = u32::from_be_bytes(
            data[REQUEST_ID_OFFSET..V1_HEADER_LENGTH]
                .try_into()
                .map_err(|_| ProtocolError::NotEnoughData)?,
        ) as i32;

        // The head map is part of the header; wait for all of it before
        // reporting success so a partial read never yields a half-built map.
        let head_map = if head_length as usize > V1_HEADER_LENGTH {
            if data.len() < head_length as usize {
                return Err(ProtocolError::NotEnoughData);
            }
            decode_head_map(&data[V1_HEADER_LENGTH..head_length as usize])
        } else {
            HashMap::new()
        };

        Ok(PackageHeader {
            version,
            total_length,
            head_length,
            message_type,
            codec,
            compressor,
            id,
            head_map,
        })
    }
}
