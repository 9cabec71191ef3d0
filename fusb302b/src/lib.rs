#![cfg_attr(not(test), no_std)]

// This mod MUST go first, so that the others see its macros.
#[macro_use]
mod fmt;

use {
    crate::{
        codec::{DecodeError, EncodeError, Source, FRAME_CAPACITY},
        registers::{Control1, Control3, Power, Registers, Reset, Revision, Switches0, Switches1},
        transport::Transport,
    },
    embedded_hal::blocking::delay::DelayMs,
    usb_pd::{
        message::{Message, ParseError},
        session::{AUTO_RETRY, RETRY_COUNT},
        sink::Driver,
        CcPin,
    },
};

pub mod codec;
pub mod registers;
pub mod token;
pub mod transport;

#[cfg(test)]
mod dummy;

/// I2C address of FUSB302BMPX
pub const DEVICE_ADDRESS: u8 = 0b0100010;

/// Settling time after resets, power changes and switch changes
pub const SETTLE_DELAY_MS: u8 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Transport failure
    Bus(E),
    /// Both CC lines show a pull-up
    AmbiguousOrientation,
    /// Received message could not be parsed, the RX FIFO has been flushed
    Parse(ParseError),
    Encode(EncodeError),
}

/// FUSB302B Programmable USB Type‐C Controller w/PD
pub struct Fusb302b<T> {
    registers: Registers<T>,
}

impl<T: Transport> Fusb302b<T> {
    pub fn new(transport: T) -> Self {
        Self {
            registers: Registers::new(transport),
        }
    }

    pub fn release(self) -> T {
        self.registers.release()
    }

    pub fn registers(&mut self) -> &mut Registers<T> {
        &mut self.registers
    }

    /// Finds the CC line carrying PD traffic and sets the transceiver up to use it
    ///
    /// Blocks for a few tens of milliseconds while each line settles.
    pub fn attach<D: DelayMs<u8>>(&mut self, delay: &mut D) -> Result<CcPin, Error<T::Error>> {
        let id = self.registers.device_id().map_err(Error::Bus)?;
        info!(
            "FUSB302B version {:x} product {:x} revision {:x}",
            id.version_id(),
            id.product_id(),
            id.revision_id()
        );

        let [cc1, cc2] = self.measure(delay).map_err(Error::Bus)?;
        debug!("bc_lvl cc1: {}, cc2: {}", cc1, cc2);

        let cc = match (cc1, cc2) {
            (0, 0) => {
                warn!("no pull-up on either CC line, using CC2");
                CcPin::CC2
            }
            (_, 0) => CcPin::CC1,
            (0, _) => CcPin::CC2,
            _ => {
                error!("pull-up on both CC lines");
                return Err(Error::AmbiguousOrientation);
            }
        };

        self.configure(cc, delay).map_err(Error::Bus)?;
        info!("attached on {}", cc);

        Ok(cc)
    }

    /// Reads one message from the RX FIFO, `None` if it is empty
    ///
    /// Frames not starting with an SOP token are dropped along with the rest of the FIFO.
    pub fn receive(&mut self) -> Result<Option<Message>, Error<T::Error>> {
        if self.registers.status1().map_err(Error::Bus)?.rx_empty() {
            return Ok(None);
        }

        match codec::decode(&mut Fifo(&mut self.registers)) {
            Ok(message) => {
                trace!("rx {}", message);
                Ok(Some(message))
            }
            Err(DecodeError::Source(e)) => Err(Error::Bus(e)),
            Err(DecodeError::UnexpectedToken(token)) => {
                warn!("unexpected token {:x}, flushing rx", token);
                self.flush_rx().map_err(Error::Bus)?;
                Ok(None)
            }
            Err(DecodeError::Parse(e)) => {
                error!("malformed message {}, flushing rx", e);
                self.flush_rx().map_err(Error::Bus)?;
                Err(Error::Parse(e))
            }
        }
    }

    /// Queues `message` in the TX FIFO and starts the transmitter
    ///
    /// Returns without waiting for GoodCRC, retries are handled by the transceiver.
    pub fn transmit(&mut self, message: &Message) -> Result<(), Error<T::Error>> {
        let mut frame = [0u8; FRAME_CAPACITY];
        let len = codec::encode(message, &mut frame).map_err(Error::Encode)?;
        trace!("tx {} bytes", len);

        self.registers
            .write_fifo(&frame[..len])
            .map_err(Error::Bus)?;

        let control0 = self.registers.control0().map_err(Error::Bus)?;
        self.registers
            .set_control0(control0.with_tx_start(true))
            .map_err(Error::Bus)
    }

    /// Measures BC_LVL on CC1 then CC2 from a freshly reset, powered up transceiver
    fn measure<D: DelayMs<u8>>(&mut self, delay: &mut D) -> Result<[u8; 2], T::Error> {
        self.reset(delay)?;
        self.registers.set_power(Power::all())?;
        delay.delay_ms(SETTLE_DELAY_MS);

        let cc1 = self.measure_cc(CcPin::CC1, delay)?;
        let cc2 = self.measure_cc(CcPin::CC2, delay)?;

        Ok([cc1, cc2])
    }

    fn measure_cc<D: DelayMs<u8>>(&mut self, cc: CcPin, delay: &mut D) -> Result<u8, T::Error> {
        let switches0 = match cc {
            CcPin::CC1 => Switches0::default().with_meas_cc1(true),
            CcPin::CC2 => Switches0::default().with_meas_cc2(true),
        };
        self.registers.set_switches0(switches0)?;
        delay.delay_ms(SETTLE_DELAY_MS);

        let level = self.registers.status0()?.bc_lvl();

        // measurement off, pull-downs stay
        self.registers.set_switches0(Switches0::default())?;

        Ok(level)
    }

    fn configure<D: DelayMs<u8>>(&mut self, cc: CcPin, delay: &mut D) -> Result<(), T::Error> {
        // start from a clean PD state on the partner's side too
        self.registers
            .set_control3(Control3::default().with_send_hard_reset(true))?;
        delay.delay_ms(SETTLE_DELAY_MS);
        self.reset(delay)?;

        self.registers.set_control3(
            Control3::default()
                .with_auto_retry(AUTO_RETRY)
                .with_n_retries(RETRY_COUNT),
        )?;
        // PD logic only, Control3 must survive
        self.registers
            .set_reset(Reset::default().with_pd_reset(true))?;

        let (switches0, switches1) = match cc {
            CcPin::CC1 => (
                Switches0::default().with_meas_cc1(true),
                Switches1::default().with_txcc1(true),
            ),
            CcPin::CC2 => (
                Switches0::default().with_meas_cc2(true),
                Switches1::default().with_txcc2(true),
            ),
        };
        self.registers.set_switches0(switches0)?;
        self.registers.set_switches1(
            switches1
                .with_specrev(Revision::R2_0)
                .with_auto_crc(true),
        )?;
        self.registers.set_power(Power::all())
    }

    /// PD logic reset followed by a full register reset
    fn reset<D: DelayMs<u8>>(&mut self, delay: &mut D) -> Result<(), T::Error> {
        self.registers
            .set_reset(Reset::default().with_pd_reset(true))?;
        self.registers
            .set_reset(Reset::default().with_pd_reset(true).with_sw_reset(true))?;
        delay.delay_ms(SETTLE_DELAY_MS);

        Ok(())
    }

    fn flush_rx(&mut self) -> Result<(), T::Error> {
        self.registers
            .set_control1(Control1::default().with_rx_flush(true))
    }
}

impl<T: Transport> Driver for Fusb302b<T> {
    type Error = Error<T::Error>;

    fn receive(&mut self) -> Result<Option<Message>, Self::Error> {
        Fusb302b::receive(self)
    }

    fn transmit(&mut self, message: &Message) -> Result<(), Self::Error> {
        Fusb302b::transmit(self, message)
    }
}

/// RX FIFO as a byte source
struct Fifo<'a, T>(&'a mut Registers<T>);

impl<T: Transport> Source for Fifo<'_, T> {
    type Error = T::Error;

    fn read(&mut self, buf: &mut [u8]) -> Result<(), T::Error> {
        self.0.read_fifo(buf)
    }
}
