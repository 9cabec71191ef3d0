use {
    crate::{DataRole, PowerRole},
    byteorder::{ByteOrder, LittleEndian},
    proc_bitfield::bitfield,
};

/// Specification Revision field of the message header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpecificationRevision {
    R1_0,
    R2_0,
    R3_0,
    Reserved,
}

impl From<u8> for SpecificationRevision {
    fn from(value: u8) -> Self {
        match value & 0b11 {
            0b00 => Self::R1_0,
            0b01 => Self::R2_0,
            0b10 => Self::R3_0,
            _ => Self::Reserved,
        }
    }
}

impl From<SpecificationRevision> for u8 {
    fn from(value: SpecificationRevision) -> Self {
        match value {
            SpecificationRevision::R1_0 => 0b00,
            SpecificationRevision::R2_0 => 0b01,
            SpecificationRevision::R3_0 => 0b10,
            SpecificationRevision::Reserved => 0b11,
        }
    }
}

bitfield! {
    /// 16-bit message header, transmitted low byte first
    #[derive(Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub struct Header(pub u16): Debug, FromRaw, IntoRaw {
        pub extended: bool @ 15,
        pub num_objects: u8 @ 12..=14,
        pub message_id: u8 @ 9..=11,
        pub port_power_role: bool [get PowerRole, set PowerRole] @ 8,
        pub spec_revision: u8 [get SpecificationRevision, set SpecificationRevision] @ 6..=7,
        pub port_data_role: bool [get DataRole, set DataRole] @ 5,
        pub message_type_raw: u8 @ 0..=3,
    }
}

impl Header {
    pub fn from_bytes(buf: &[u8]) -> Self {
        Header(LittleEndian::read_u16(buf))
    }

    pub fn to_bytes(&self, buf: &mut [u8]) {
        LittleEndian::write_u16(buf, self.0);
    }

    /// Header for a sink-originated data message
    pub fn data(
        message_type: DataMessageType,
        num_objects: u8,
        message_id: u8,
        spec_revision: SpecificationRevision,
    ) -> Self {
        Header(0)
            .with_message_type_raw(message_type as u8)
            .with_num_objects(num_objects)
            .with_message_id(message_id)
            .with_spec_revision(spec_revision)
            .with_port_power_role(PowerRole::Sink)
            .with_port_data_role(DataRole::Ufp)
    }

    pub fn message_type(&self) -> MessageType {
        if self.extended() {
            MessageType::Extended(self.message_type_raw())
        } else if self.num_objects() == 0 {
            MessageType::Control(self.message_type_raw().into())
        } else {
            MessageType::Data(self.message_type_raw().into())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MessageType {
    Control(ControlMessageType),
    Data(DataMessageType),
    /// Extended messages are carried but not interpreted
    Extended(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControlMessageType {
    GoodCRC = 0b0001,
    GotoMin = 0b0010,
    Accept = 0b0011,
    Reject = 0b0100,
    Ping = 0b0101,
    PsRdy = 0b0110,
    GetSourceCap = 0b0111,
    GetSinkCap = 0b1000,
    DrSwap = 0b1001,
    PrSwap = 0b1010,
    VconnSwap = 0b1011,
    Wait = 0b1100,
    SoftReset = 0b1101,
    DataReset = 0b1110,
    DataResetComplete = 0b1111,
    Reserved,
}

impl From<u8> for ControlMessageType {
    fn from(value: u8) -> Self {
        match value {
            0b0001 => Self::GoodCRC,
            0b0010 => Self::GotoMin,
            0b0011 => Self::Accept,
            0b0100 => Self::Reject,
            0b0101 => Self::Ping,
            0b0110 => Self::PsRdy,
            0b0111 => Self::GetSourceCap,
            0b1000 => Self::GetSinkCap,
            0b1001 => Self::DrSwap,
            0b1010 => Self::PrSwap,
            0b1011 => Self::VconnSwap,
            0b1100 => Self::Wait,
            0b1101 => Self::SoftReset,
            0b1110 => Self::DataReset,
            0b1111 => Self::DataResetComplete,
            _ => Self::Reserved,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataMessageType {
    SourceCapabilities = 0b0001,
    Request = 0b0010,
    Bist = 0b0011,
    SinkCapabilities = 0b0100,
    BatteryStatus = 0b0101,
    Alert = 0b0110,
    GetCountryInfo = 0b0111,
    EnterUsb = 0b1000,
    EprRequest = 0b1001,
    EprMode = 0b1010,
    SourceInfo = 0b1011,
    Revision = 0b1100,
    VendorDefined = 0b1111,
    Reserved,
}

impl From<u8> for DataMessageType {
    fn from(value: u8) -> Self {
        match value {
            0b0001 => Self::SourceCapabilities,
            0b0010 => Self::Request,
            0b0011 => Self::Bist,
            0b0100 => Self::SinkCapabilities,
            0b0101 => Self::BatteryStatus,
            0b0110 => Self::Alert,
            0b0111 => Self::GetCountryInfo,
            0b1000 => Self::EnterUsb,
            0b1001 => Self::EprRequest,
            0b1010 => Self::EprMode,
            0b1011 => Self::SourceInfo,
            0b1100 => Self::Revision,
            0b1111 => Self::VendorDefined,
            _ => Self::Reserved,
        }
    }
}

bitfield! {
    /// Header that follows the message header of an extended message
    #[derive(Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub struct ExtendedHeader(pub u16): Debug, FromRaw, IntoRaw {
        /// Number of data bytes that follow, 0..=511
        pub data_size: u16 @ 0..=8,
    }
}

impl ExtendedHeader {
    pub fn from_bytes(buf: &[u8]) -> Self {
        ExtendedHeader(LittleEndian::read_u16(buf))
    }

    pub fn to_bytes(&self, buf: &mut [u8]) {
        LittleEndian::write_u16(buf, self.0);
    }
}
