use crate::{header::SpecificationRevision, CcPin};

/// Number of automatic transceiver retries when no GoodCRC is received
pub const RETRY_COUNT: u8 = 3;

/// Retransmit automatically when no GoodCRC is received
pub const AUTO_RETRY: bool = true;

/// Specification revision written into every outgoing header, wire code `0b10`
pub const SPEC_REVISION: SpecificationRevision = SpecificationRevision::R3_0;

/// State of an attached port, created once the CC line is known
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Session {
    cc: CcPin,
    spec_revision: SpecificationRevision,
    /// ID for next USB PD message
    next_message_id: u8,
    retries: u8,
    auto_retry: bool,
}

impl Session {
    pub fn new(cc: CcPin) -> Self {
        Self {
            cc,
            spec_revision: SPEC_REVISION,
            next_message_id: 0,
            retries: RETRY_COUNT,
            auto_retry: AUTO_RETRY,
        }
    }

    pub fn cc(&self) -> CcPin {
        self.cc
    }

    pub fn spec_revision(&self) -> SpecificationRevision {
        self.spec_revision
    }

    pub fn retries(&self) -> u8 {
        self.retries
    }

    pub fn auto_retry(&self) -> bool {
        self.auto_retry
    }

    /// Returns the current message ID and advances the 3 bit counter
    pub fn next_message_id(&mut self) -> u8 {
        let id = self.next_message_id;
        self.next_message_id = (id + 1) % 8;
        id
    }
}
