//! FUSB302B FIFO token encoding

/// Tokens written to the TX FIFO
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    TxOn = 0xa1,
    Sop1 = 0x12,
    Sop2 = 0x13,
    Sop3 = 0x1b,
    Reset1 = 0x15,
    Reset2 = 0x16,
    /// Lower 5 bits carry the number of packet bytes that follow
    PackSym = 0x80,
    JamCrc = 0xff,
    Eop = 0x14,
    TxOff = 0xfe,
}

/// Start-of-packet ordered set for SOP messages
pub const SOP: [u8; 4] = [
    Token::Sop1 as u8,
    Token::Sop1 as u8,
    Token::Sop1 as u8,
    Token::Sop2 as u8,
];

/// CRC, end-of-packet and transmitter shutdown
pub const TRAILER: [u8; 3] = [Token::JamCrc as u8, Token::Eop as u8, Token::TxOff as u8];

/// Largest byte count a `PackSym` token can carry
pub const MAX_PACKED_LEN: usize = 0x1f;

/// Top three bits of the token preceding each message in the RX FIFO
const RX_TOKEN_MASK: u8 = 0b1110_0000;

/// RX token of an SOP message, SOP' and SOP'' use other patterns under the same mask
pub const RX_SOP: u8 = 0b1110_0000;

/// Whether the leading RX FIFO byte marks an SOP message
pub fn is_rx_sop(token: u8) -> bool {
    token & RX_TOKEN_MASK == RX_SOP
}
