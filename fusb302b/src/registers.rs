//! FUSB302B registers
//!
//! Setters/getters generated using macros, `Default` for each register is its reset value.

use {
    crate::transport::Transport,
    proc_bitfield::bitfield,
    usb_pd::{DataRole, PowerRole},
};

macro_rules! generate_register_read {
    ($reg:ident, $fn:ident) => {
        pub fn $fn(&mut self) -> Result<$reg, T::Error> {
            self.transport
                .read_register(Register::$reg as u8)
                .map($reg)
        }
    };
}

macro_rules! generate_register_write {
    ($reg:ident, $fn:ident) => {
        paste::item! {
            pub fn [<set_ $fn>](&mut self, value: $reg) -> Result<(), T::Error> {
                self.transport.write_register(Register::$reg as u8, value.0)
            }
        }
    };
}

macro_rules! generate_register_accessors {
    () => {};

    (($reg:ident, $fn:ident, r), $($tail:tt)*) => {
        generate_register_read!($reg, $fn);

        generate_register_accessors!($($tail)*);
    };

    (($reg:ident, $fn:ident, w), $($tail:tt)*) => {
        generate_register_write!($reg, $fn);

        generate_register_accessors!($($tail)*);
    };

    (($reg:ident, $fn:ident, rw), $($tail:tt)*) => {
        generate_register_read!($reg, $fn);
        generate_register_write!($reg, $fn);

        generate_register_accessors!($($tail)*);
    };
}

/// Typed register access over a transport
pub struct Registers<T> {
    transport: T,
}

impl<T: Transport> Registers<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn release(self) -> T {
        self.transport
    }

    pub fn transport(&mut self) -> &mut T {
        &mut self.transport
    }

    generate_register_accessors!(
        (DeviceId, device_id, r),
        (Switches0, switches0, rw),
        (Switches1, switches1, rw),
        (Control0, control0, rw),
        (Control1, control1, rw),
        (Control2, control2, rw),
        (Control3, control3, rw),
        (Power, power, rw),
        (Reset, reset, w),
        (Control4, control4, rw),
        (Status0, status0, r),
        (Status1, status1, r),
    );

    /// Reads `buf.len()` bytes from the RX FIFO
    pub fn read_fifo(&mut self, buf: &mut [u8]) -> Result<(), T::Error> {
        self.transport.read_fifo(buf)
    }

    /// Writes `data` to the TX FIFO
    pub fn write_fifo(&mut self, data: &[u8]) -> Result<(), T::Error> {
        self.transport.write_fifo(data)
    }
}

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Register {
    DeviceId = 0x01,
    Switches0 = 0x02,
    Switches1 = 0x03,
    Control0 = 0x06,
    Control1 = 0x07,
    Control2 = 0x08,
    Control3 = 0x09,
    Power = 0x0b,
    Reset = 0x0c,
    Control4 = 0x10,
    Status0 = 0x40,
    Status1 = 0x41,
    Fifo = 0x43,
}

bitfield! {
    #[derive(Clone, Copy, PartialEq, Eq)]
    pub struct DeviceId(pub u8): Debug, FromRaw, IntoRaw {
        /// Device version ID by Trim or etc
        pub version_id: u8 [read_only] @ 4..=7,
        pub product_id: u8 [read_only] @ 2..=3,
        /// Revision History of each version
        pub revision_id: u8 [read_only] @ 0..=1,
    }
}

impl Default for DeviceId {
    fn default() -> Self {
        Self(0b1001_0000)
    }
}

bitfield! {
    #[derive(Clone, Copy, PartialEq, Eq)]
    pub struct Switches0(pub u8): Debug, FromRaw, IntoRaw {
        /// Apply host pull up current to CC2 pin
        pub pu_en2: bool @ 7,
        /// Apply host pull up current to CC1 pin
        pub pu_en1: bool @ 6,
        /// Turn on the VCONN current to CC2 pin
        pub vconn_cc2: bool @ 5,
        /// Turn on the VCONN current to CC1 pin
        pub vconn_cc1: bool @ 4,
        /// Use the measure block to monitor or measure the voltage on CC2
        pub meas_cc2: bool @ 3,
        /// Use the measure block to monitor or measure the voltage on CC1
        pub meas_cc1: bool @ 2,
        /// Device pull down on CC2
        pub pdwn2: bool @ 1,
        /// Device pull down on CC1
        pub pdwn1: bool @ 0,
    }
}

impl Default for Switches0 {
    fn default() -> Self {
        Self(0b0000_0011)
    }
}

/// Value of the SPECREV field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Revision {
    R1_0,
    R2_0,
    /// `10` and `11` are marked do not use
    Reserved,
}

impl From<u8> for Revision {
    fn from(value: u8) -> Self {
        match value {
            0b00 => Self::R1_0,
            0b01 => Self::R2_0,
            _ => Self::Reserved,
        }
    }
}

impl From<Revision> for u8 {
    fn from(revision: Revision) -> Self {
        match revision {
            Revision::R1_0 => 0b00,
            Revision::R2_0 => 0b01,
            Revision::Reserved => 0b10,
        }
    }
}

bitfield! {
    #[derive(Clone, Copy, PartialEq, Eq)]
    pub struct Switches1(pub u8): Debug, FromRaw, IntoRaw {
        /// Bit used for constructing the GoodCRC acknowledge packet. This bit corresponds to the
        /// Port Power Role bit in the message header if an SOP packet is received.
        pub powerrole: bool [get PowerRole, set PowerRole] @ 7,
        /// Bits used for constructing the GoodCRC acknowledge packet. These bits correspond to the
        /// Specification Revision bits in the message header.
        pub specrev: u8 [get Revision, set Revision] @ 5..=6,
        /// Bit used for constructing the GoodCRC acknowledge packet. This bit corresponds to the
        /// Port Data Role bit in the message header.
        pub datarole: bool [get DataRole, set DataRole] @ 4,
        /// Starts the transmitter automatically when a message with a good CRC is received and
        /// automatically sends a GoodCRC acknowledge packet back to the relevant SOP*
        pub auto_crc: bool @ 2,
        /// Enable BMC transmit driver on CC2 pin
        pub txcc2: bool @ 1,
        /// Enable BMC transmit driver on CC1 pin
        pub txcc1: bool @ 0,
    }
}

impl Default for Switches1 {
    fn default() -> Self {
        Self(0b0010_0000)
    }
}

bitfield! {
    #[derive(Clone, Copy, PartialEq, Eq)]
    pub struct Control0(pub u8): Debug, FromRaw, IntoRaw {
        /// Self clearing bit to flush the content of the transmit FIFO
        pub tx_flush: bool @ 6,
        /// Masks all interrupts, when false interrupts to host are enabled
        pub int_mask: bool @ 5,
        /// Controls the host pull up current enabled by PU_EN
        ///
        /// * `00`: No current
        /// * `01`: 80 mA – Default USB power
        /// * `10`: 180 mA – Medium Current Mode: 1.5 A
        /// * `11`: 330 mA – High Current Mode: 3 A
        pub host_cur: u8 @ 2..=3,
        /// Starts the transmitter automatically when a message with a good CRC is received
        pub auto_pre: bool @ 1,
        /// Start transmitter using the data in the transmit FIFO. Preamble is started first.
        /// Self clearing.
        pub tx_start: bool @ 0,
    }
}

impl Default for Control0 {
    fn default() -> Self {
        Self(0b0010_0100)
    }
}

bitfield! {
    #[derive(Clone, Copy, PartialEq, Eq)]
    pub struct Control1(pub u8): Debug, FromRaw, IntoRaw {
        /// Enable SOP''_DEBUG (SOP double prime debug) packets, false for ignore
        pub ensop2db: bool @ 6,
        /// Enable SOP'_DEBUG (SOP prime debug) packets, false for ignore
        pub ensop1db: bool @ 5,
        /// Sent BIST Mode 01s pattern for testing
        pub bist_mode2: bool @ 4,
        /// Self clearing bit to flush the content of the receive FIFO
        pub rx_flush: bool @ 2,
        /// Enable SOP'' (SOP double prime) packets, false for ignore
        pub ensop2: bool @ 1,
        /// Enable SOP' (SOP prime) packets, false for ignore
        pub ensop1: bool @ 0,
    }
}

impl Default for Control1 {
    fn default() -> Self {
        Self(0b0000_0000)
    }
}

bitfield! {
    #[derive(Clone, Copy, PartialEq, Eq)]
    pub struct Control2(pub u8): Debug, FromRaw, IntoRaw {
        /// * `00`: Don’t go into the DISABLE state after one cycle of toggle
        /// * `01`: Wait between toggle cycles for tDIS time of 40 ms
        /// * `10`: Wait between toggle cycles for tDIS time of 80 ms
        /// * `11`: Wait between toggle cycles for tDIS time of 160 ms
        pub tog_save_pwr: u8 @ 6..=7,
        /// Only Rd values stop the toggle state machine
        pub tog_rd_only: bool @ 5,
        /// Enable Wake Detection functionality if the power state is correct
        pub wake_en: bool @ 3,
        /// * `11`: Enable SRC polling functionality if TOGGLE=1
        /// * `10`: Enable SNK polling functionality if TOGGLE=1
        /// * `01`: Enable DRP polling functionality if TOGGLE=1
        /// * `00`: Do Not Use
        pub mode: u8 @ 1..=2,
        /// Enable DRP, SNK or SRC Toggle autonomous functionality
        pub toggle: bool @ 0,
    }
}

impl Default for Control2 {
    fn default() -> Self {
        Self(0b0000_0010)
    }
}

bitfield! {
    #[derive(Clone, Copy, PartialEq, Eq)]
    pub struct Control3(pub u8): Debug, FromRaw, IntoRaw {
        /// Send a hard reset packet, self clearing
        pub send_hard_reset: bool @ 6,
        /// Reroute the BIST 01 pattern through the TX FIFO
        pub bist_tmode: bool @ 5,
        /// Automatically respond to a received hard reset
        pub auto_hardreset: bool @ 4,
        /// Automatically respond to a received soft reset
        pub auto_softreset: bool @ 3,
        /// Number of packet retries when no GoodCRC is received
        pub n_retries: u8 @ 1..=2,
        /// Retransmit automatically when no GoodCRC is received
        pub auto_retry: bool @ 0,
    }
}

impl Default for Control3 {
    fn default() -> Self {
        Self(0b0000_0110)
    }
}

bitfield! {
    #[derive(Clone, Copy, PartialEq, Eq)]
    pub struct Power(pub u8): Debug, FromRaw, IntoRaw {
        /// Internal oscillator
        pub internal_oscillator: bool @ 3,
        /// Measure block
        pub measure_block: bool @ 2,
        /// Receiver and current references for the measure block
        pub receiver: bool @ 1,
        /// Bandgap and wake circuit
        pub bandgap_wake: bool @ 0,
    }
}

impl Power {
    /// Every block powered up
    pub fn all() -> Self {
        Self(0)
            .with_internal_oscillator(true)
            .with_measure_block(true)
            .with_receiver(true)
            .with_bandgap_wake(true)
    }
}

impl Default for Power {
    fn default() -> Self {
        Self(0b0000_0001)
    }
}

bitfield! {
    #[derive(Clone, Copy, PartialEq, Eq)]
    pub struct Reset(pub u8): Debug, FromRaw, IntoRaw {
        /// Reset just the PD logic for both the PD transmitter and receiver
        pub pd_reset: bool @ 1,
        /// Reset the FUSB302B including the I2C registers to their default values
        pub sw_reset: bool @ 0,
    }
}

impl Default for Reset {
    fn default() -> Self {
        Self(0b0000_0000)
    }
}

bitfield! {
    #[derive(Clone, Copy, PartialEq, Eq)]
    pub struct Control4(pub u8): Debug, FromRaw, IntoRaw {
        /// Exit the toggle state machine on detecting an audio accessory
        pub tog_exit_aud: bool @ 0,
    }
}

impl Default for Control4 {
    fn default() -> Self {
        Self(0b0000_0000)
    }
}

bitfield! {
    #[derive(Clone, Copy, PartialEq, Eq)]
    pub struct Status0(pub u8): Debug, FromRaw, IntoRaw {
        /// VBUS above vVBUSthr
        pub vbusok: bool [read_only] @ 7,
        /// Transitions are detected on the active CC line
        pub activity: bool [read_only] @ 6,
        /// Measured CC voltage is above the MDAC level
        pub comp: bool [read_only] @ 5,
        /// Last received packet had a correct CRC
        pub crc_chk: bool [read_only] @ 4,
        /// Alert software an error condition has occurred
        pub alert: bool [read_only] @ 3,
        /// Voltage on CC indicated a device attempting to attach
        pub wake: bool [read_only] @ 2,
        /// Current voltage status of the measured CC pin, interpreted as host current levels
        ///
        /// * `00`: < 200 mV
        /// * `01`: > 200 mV, < 660 mV
        /// * `10`: > 660 mV, < 1.23 V
        /// * `11`: > 1.23 V
        pub bc_lvl: u8 [read_only] @ 0..=1,
    }
}

impl Default for Status0 {
    fn default() -> Self {
        Self(0b0000_0000)
    }
}

bitfield! {
    #[derive(Clone, Copy, PartialEq, Eq)]
    pub struct Status1(pub u8): Debug, FromRaw, IntoRaw {
        /// First data byte in the RX FIFO belongs to an SOP'' packet
        pub rxsop2: bool [read_only] @ 7,
        /// First data byte in the RX FIFO belongs to an SOP' packet
        pub rxsop1: bool [read_only] @ 6,
        /// The receive FIFO is empty
        pub rx_empty: bool [read_only] @ 5,
        /// The receive FIFO is full
        pub rx_full: bool [read_only] @ 4,
        /// The transmit FIFO is empty
        pub tx_empty: bool [read_only] @ 3,
        /// The transmit FIFO is full
        pub tx_full: bool [read_only] @ 2,
        /// Temperature of the device is too high
        pub ovrtemp: bool [read_only] @ 1,
        /// Over-current on the VCONN switch
        pub ocp: bool [read_only] @ 0,
    }
}

impl Default for Status1 {
    fn default() -> Self {
        Self(0b0010_1000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn switches1_for_cc1() {
        let switches1 = Switches1::default()
            .with_specrev(Revision::R2_0)
            .with_auto_crc(true)
            .with_txcc1(true);

        assert_eq!(switches1.0, 0b0010_0101);
        assert_eq!(switches1.powerrole(), PowerRole::Sink);
        assert_eq!(switches1.datarole(), DataRole::Ufp);
    }

    #[test]
    fn control3_retries() {
        let control3 = Control3(0).with_auto_retry(true).with_n_retries(3);
        assert_eq!(control3.0, 0b0000_0111);

        let control3 = Control3::default().with_send_hard_reset(true);
        assert_eq!(control3.0, 0b0100_0110);
    }

    #[test]
    fn power_all() {
        assert_eq!(Power::all().0, 0x0f);
    }

    #[test]
    fn control1_flush_bit() {
        assert_eq!(Control1::default().with_rx_flush(true).0, 0b0000_0100);
        assert_eq!(Control1(0).with_ensop1(true).0, 0b0000_0001);
    }

    #[test]
    fn status_fields() {
        assert_eq!(Status0(0b1001_0010).bc_lvl(), 0b10);
        assert!(Status0(0b1001_0010).vbusok());
        assert!(Status1::default().rx_empty());
        assert!(Status1::default().tx_empty());
        assert!(!Status1(0b0000_1000).rx_empty());
    }

    #[test]
    fn device_id_fields() {
        let id = DeviceId(0b1001_0010);
        assert_eq!(id.version_id(), 0b1001);
        assert_eq!(id.product_id(), 0b00);
        assert_eq!(id.revision_id(), 0b10);
    }
}
