//! Typed PD messages: header plus either a standard or an extended payload

use {
    crate::header::{ExtendedHeader, Header, MessageType},
    byteorder::{ByteOrder, LittleEndian},
    heapless::Vec,
};

/// Capacity of a standard payload, the NDO field is 3 bits wide
pub const MAX_DATA_OBJECTS: usize = 7;

/// Capacity of an extended payload, the largest extended message defined by USB PD
pub const MAX_EXTENDED_DATA: usize = 260;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Fewer payload bytes than the headers announce
    Truncated,
    /// Extended data size exceeds `MAX_EXTENDED_DATA`
    ExtendedDataTooLarge { size: u16 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Payload {
    /// Data objects, as many as the header's NDO field
    Standard(Vec<u32, MAX_DATA_OBJECTS>),
    Extended {
        header: ExtendedHeader,
        data: Vec<u8, MAX_EXTENDED_DATA>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Message {
    header: Header,
    payload: Payload,
}

impl Message {
    /// Builds a standard message, the header's NDO and extended fields follow `objects`
    pub fn standard(header: Header, objects: Vec<u32, MAX_DATA_OBJECTS>) -> Self {
        let header = header
            .with_extended(false)
            .with_num_objects(objects.len() as u8);

        Self {
            header,
            payload: Payload::Standard(objects),
        }
    }

    /// Builds an extended message, the header's NDO counts 4 byte chunks of extended header plus data
    pub fn extended(header: Header, data: Vec<u8, MAX_EXTENDED_DATA>) -> Self {
        let chunks = (2 + data.len() + 3) / 4;
        let header = header
            .with_extended(true)
            .with_num_objects(chunks.min(MAX_DATA_OBJECTS) as u8);

        Self {
            header,
            payload: Payload::Extended {
                header: ExtendedHeader(0).with_data_size(data.len() as u16),
                data,
            },
        }
    }

    /// Parses the bytes following the message header, excluding the CRC
    pub fn parse(header: Header, payload: &[u8]) -> Result<Self, ParseError> {
        let payload = if header.extended() {
            if payload.len() < 2 {
                return Err(ParseError::Truncated);
            }

            let extended_header = ExtendedHeader::from_bytes(&payload[..2]);
            let size = extended_header.data_size();
            if usize::from(size) > MAX_EXTENDED_DATA {
                return Err(ParseError::ExtendedDataTooLarge { size });
            }

            let data = payload
                .get(2..2 + usize::from(size))
                .ok_or(ParseError::Truncated)?;

            Payload::Extended {
                header: extended_header,
                data: Vec::from_slice(data).map_err(|_| ParseError::ExtendedDataTooLarge { size })?,
            }
        } else {
            let len = usize::from(header.num_objects()) * 4;
            let objects = payload.get(..len).ok_or(ParseError::Truncated)?;

            Payload::Standard(
                objects
                    .chunks_exact(4)
                    .take(MAX_DATA_OBJECTS)
                    .map(LittleEndian::read_u32)
                    .collect(),
            )
        };

        Ok(Self { header, payload })
    }

    pub fn header(&self) -> Header {
        self.header
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn message_type(&self) -> MessageType {
        self.header.message_type()
    }

    /// Data objects of a standard message, empty for extended messages
    pub fn data_objects(&self) -> &[u32] {
        match &self.payload {
            Payload::Standard(objects) => objects.as_slice(),
            Payload::Extended { .. } => &[],
        }
    }

    /// Number of bytes for header and payload
    pub fn len(&self) -> usize {
        match &self.payload {
            Payload::Standard(objects) => 2 + objects.len() * 4,
            Payload::Extended { data, .. } => 4 + data.len(),
        }
    }

    /// Serializes header and payload into `buf`, which must hold at least `len()` bytes
    pub fn to_bytes(&self, buf: &mut [u8]) -> usize {
        self.header.to_bytes(&mut buf[..2]);

        match &self.payload {
            Payload::Standard(objects) => {
                for (chunk, object) in buf[2..].chunks_exact_mut(4).zip(objects) {
                    LittleEndian::write_u32(chunk, *object);
                }
            }
            Payload::Extended { header, data } => {
                header.to_bytes(&mut buf[2..4]);
                buf[4..4 + data.len()].copy_from_slice(data);
            }
        }

        self.len()
    }
}
