use {
    byteorder::{ByteOrder, LittleEndian},
    proc_bitfield::bitfield,
};

/// Kind of a power data object, bits 30..=31
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Kind {
    FixedSupply,
    Battery,
    VariableSupply,
    Augmented,
}

impl From<u8> for Kind {
    fn from(value: u8) -> Self {
        match value & 0b11 {
            0b00 => Self::FixedSupply,
            0b01 => Self::Battery,
            0b10 => Self::VariableSupply,
            _ => Self::Augmented,
        }
    }
}

impl From<Kind> for u8 {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::FixedSupply => 0b00,
            Kind::Battery => 0b01,
            Kind::VariableSupply => 0b10,
            Kind::Augmented => 0b11,
        }
    }
}

bitfield! {
    #[derive(Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub struct PowerDataObjectRaw(pub u32): Debug, FromRaw, IntoRaw {
        pub kind: u8 [get Kind, set Kind] @ 30..=31,
    }
}

bitfield! {
    #[derive(Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub struct FixedSupply(pub u32): Debug, FromRaw, IntoRaw {
        /// Fixed supply
        pub kind: u8 @ 30..=31,
        /// Dual-role power
        pub dual_role_power: bool @ 29,
        /// USB suspend supported
        pub usb_suspend_supported: bool @ 28,
        /// Unconstrained power
        pub unconstrained_power: bool @ 27,
        /// USB communications capable
        pub usb_communications_capable: bool @ 26,
        /// Dual-role data
        pub dual_role_data: bool @ 25,
        /// Voltage in 50mV units
        pub voltage: u16 @ 10..=19,
        /// Maximum current in 10mA units
        pub max_current: u16 @ 0..=9,
    }
}

impl FixedSupply {
    pub fn voltage_mv(&self) -> u32 {
        u32::from(self.voltage()) * 50
    }

    pub fn max_current_ma(&self) -> u32 {
        u32::from(self.max_current()) * 10
    }
}

bitfield! {
    /// Request data object for a fixed supply PDO
    #[derive(Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub struct RequestDataObject(pub u32): Debug, FromRaw, IntoRaw {
        /// Index of the requested PDO plus one
        pub object_position: u8 @ 28..=30,
        /// Operating current in 10mA units
        pub operating_current: u16 @ 10..=19,
        /// Maximum operating current in 10mA units
        pub maximum_operating_current: u16 @ 0..=9,
    }
}

impl RequestDataObject {
    pub fn to_bytes(&self, buf: &mut [u8]) {
        LittleEndian::write_u32(buf, self.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_from_top_bits() {
        assert_eq!(PowerDataObjectRaw(0x0001_912c).kind(), Kind::FixedSupply);
        assert_eq!(PowerDataObjectRaw(0x4000_0000).kind(), Kind::Battery);
        assert_eq!(PowerDataObjectRaw(0x8000_0000).kind(), Kind::VariableSupply);
        assert_eq!(PowerDataObjectRaw(0xc000_0000).kind(), Kind::Augmented);
    }

    #[test]
    fn fixed_supply_units() {
        // 5V 3A
        let pdo = FixedSupply(0x0001_912c);
        assert_eq!(pdo.voltage_mv(), 5000);
        assert_eq!(pdo.max_current_ma(), 3000);
    }

    #[test]
    fn request_layout() {
        let rdo = RequestDataObject(0)
            .with_object_position(3)
            .with_operating_current(20)
            .with_maximum_operating_current(50);

        assert_eq!(rdo.0, (3 << 28) | (20 << 10) | 50);

        let mut buf = [0; 4];
        rdo.to_bytes(&mut buf);
        assert_eq!(buf, [0x32, 0x50, 0x00, 0x30]);
    }
}
