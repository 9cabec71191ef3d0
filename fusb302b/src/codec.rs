//! Conversion between messages and FUSB302B FIFO frames
//!
//! TX frames are the SOP ordered set, a `PackSym` token carrying the packet length, the packet,
//! then CRC/EOP/TX off tokens. RX frames are a single SOP token, the packet and the 4 byte CRC.

use {
    crate::token::{self, Token, MAX_PACKED_LEN, SOP, TRAILER},
    usb_pd::{
        header::{ExtendedHeader, Header},
        message::{Message, ParseError, MAX_EXTENDED_DATA},
    },
};

/// Largest TX frame
pub const FRAME_CAPACITY: usize = SOP.len() + 1 + MAX_PACKED_LEN + TRAILER.len();

const CRC_LEN: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncodeError {
    /// Packet does not fit a single `PackSym` token
    TooLong { len: usize },
    BufferTooSmall,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError<E> {
    /// Reading from the FIFO failed
    Source(E),
    /// Leading byte is not an SOP token
    UnexpectedToken(u8),
    Parse(ParseError),
}

impl<E> From<ParseError> for DecodeError<E> {
    fn from(e: ParseError) -> Self {
        Self::Parse(e)
    }
}

/// Sequential byte source, usually the RX FIFO
pub trait Source {
    type Error;

    fn read(&mut self, buf: &mut [u8]) -> Result<(), Self::Error>;
}

/// A slice ran out of bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Exhausted;

impl Source for &[u8] {
    type Error = Exhausted;

    fn read(&mut self, buf: &mut [u8]) -> Result<(), Exhausted> {
        if self.len() < buf.len() {
            return Err(Exhausted);
        }

        let (head, tail) = self.split_at(buf.len());
        buf.copy_from_slice(head);
        *self = tail;

        Ok(())
    }
}

/// Writes the TX frame for `message` into `buf`, returning the frame length
pub fn encode(message: &Message, buf: &mut [u8]) -> Result<usize, EncodeError> {
    let len = message.len();
    if len > MAX_PACKED_LEN {
        return Err(EncodeError::TooLong { len });
    }

    let frame_len = SOP.len() + 1 + len + TRAILER.len();
    if buf.len() < frame_len {
        return Err(EncodeError::BufferTooSmall);
    }

    buf[..SOP.len()].copy_from_slice(&SOP);
    buf[SOP.len()] = Token::PackSym as u8 | len as u8;

    let start = SOP.len() + 1;
    message.to_bytes(&mut buf[start..start + len]);
    buf[start + len..frame_len].copy_from_slice(&TRAILER);

    Ok(frame_len)
}

/// Reads one RX frame from `source`
///
/// Token and header come in one read, the payload and CRC in another, so no read is ever
/// empty. Exactly the bytes of the frame are consumed on success. On error the source is left
/// somewhere inside the frame and must be flushed.
pub fn decode<S: Source>(source: &mut S) -> Result<Message, DecodeError<S::Error>> {
    let mut head = [0u8; 3];
    source.read(&mut head).map_err(DecodeError::Source)?;
    if !token::is_rx_sop(head[0]) {
        return Err(DecodeError::UnexpectedToken(head[0]));
    }
    let header = Header::from_bytes(&head[1..]);

    // payload followed by the CRC, which was checked by the transceiver
    let mut buf = [0u8; 2 + MAX_EXTENDED_DATA + CRC_LEN];

    let (start, len) = if header.extended() {
        source.read(&mut buf[..2]).map_err(DecodeError::Source)?;

        let size = ExtendedHeader::from_bytes(&buf[..2]).data_size();
        if usize::from(size) > MAX_EXTENDED_DATA {
            return Err(ParseError::ExtendedDataTooLarge { size }.into());
        }

        (2, 2 + usize::from(size))
    } else {
        (0, usize::from(header.num_objects()) * 4)
    };

    source
        .read(&mut buf[start..len + CRC_LEN])
        .map_err(DecodeError::Source)?;

    Ok(Message::parse(header, &buf[..len])?)
}
