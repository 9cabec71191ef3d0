//! Simulated FUSB302B for tests

use {
    crate::{
        registers::{Control1, Register, Reset, Status0, Status1, Switches0},
        token::{self, SOP, TRAILER},
        transport::Transport,
    },
    embedded_hal::blocking::delay::DelayMs,
    std::{cell::RefCell, collections::VecDeque, rc::Rc, vec::Vec},
};

/// Bus traffic and delays, in the order they happened
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Read(u8),
    Write(u8, u8),
    WriteFifo(Vec<u8>),
    Delay(u8),
}

type Log = Rc<RefCell<Vec<Access>>>;

pub struct Dummy {
    registers: [u8; 0x44],
    /// BC_LVL reported while measuring CC1 and CC2
    pub cc_levels: [u8; 2],
    pub rx_fifo: VecDeque<u8>,
    pub tx_fifo: Vec<u8>,
    log: Log,
}

impl Dummy {
    pub fn new(cc_levels: [u8; 2]) -> Self {
        let mut dummy = Self {
            registers: [0; 0x44],
            cc_levels,
            rx_fifo: VecDeque::new(),
            tx_fifo: Vec::new(),
            log: Log::default(),
        };
        dummy.restore_defaults();
        dummy
    }

    fn restore_defaults(&mut self) {
        self.registers = [0; 0x44];
        for (register, value) in [
            (Register::DeviceId, 0b1001_0010),
            (Register::Switches0, 0b0000_0011),
            (Register::Switches1, 0b0010_0000),
            (Register::Control0, 0b0010_0100),
            (Register::Control2, 0b0000_0010),
            (Register::Control3, 0b0000_0110),
            (Register::Power, 0b0000_0001),
        ] {
            self.registers[register as usize] = value;
        }
    }

    pub fn register(&self, register: Register) -> u8 {
        self.registers[register as usize]
    }

    /// Delay whose waits are logged alongside this transceiver's accesses
    pub fn delay(&self) -> Delay {
        Delay {
            log: self.log.clone(),
        }
    }

    pub fn accesses(&self) -> Vec<Access> {
        self.log.borrow().clone()
    }

    pub fn clear_accesses(&mut self) {
        self.log.borrow_mut().clear();
    }

    fn record(&self, access: Access) {
        self.log.borrow_mut().push(access);
    }

    /// Values written to `register`, in order
    pub fn writes_to(&self, register: Register) -> Vec<u8> {
        self.accesses()
            .iter()
            .filter_map(|access| match access {
                Access::Write(address, value) if *address == register as u8 => Some(*value),
                _ => None,
            })
            .collect()
    }

    /// Number of RX FIFO flushes requested
    pub fn rx_flushes(&self) -> usize {
        self.writes_to(Register::Control1)
            .into_iter()
            .filter(|value| Control1(*value).rx_flush())
            .count()
    }

    pub fn queue_rx(&mut self, bytes: &[u8]) {
        self.rx_fifo.extend(bytes);
    }
}

impl Transport for Dummy {
    type Error = ();

    fn read_register(&mut self, register: u8) -> Result<u8, ()> {
        self.record(Access::Read(register));

        let value = match register {
            r if r == Register::Status0 as u8 => {
                let switches0 = Switches0(self.register(Register::Switches0));
                let level = match (switches0.meas_cc1(), switches0.meas_cc2()) {
                    (true, false) => self.cc_levels[0],
                    (false, true) => self.cc_levels[1],
                    _ => 0,
                };
                Status0::default().0 | level
            }
            r if r == Register::Status1 as u8 => {
                let status1 = Status1::default().0 & !(1 << 5);
                if self.rx_fifo.is_empty() {
                    status1 | 1 << 5
                } else {
                    status1
                }
            }
            r if r == Register::Reset as u8 || r == Register::Fifo as u8 => return Err(()),
            r => self.registers[usize::from(r)],
        };

        Ok(value)
    }

    fn write_register(&mut self, register: u8, value: u8) -> Result<(), ()> {
        self.record(Access::Write(register, value));

        match register {
            r if r == Register::Reset as u8 => {
                if Reset(value).sw_reset() {
                    self.restore_defaults();
                    self.rx_fifo.clear();
                    self.tx_fifo.clear();
                }
            }
            r if r == Register::Control1 as u8 => {
                if Control1(value).rx_flush() {
                    self.rx_fifo.clear();
                }
                self.registers[usize::from(r)] = Control1(value).with_rx_flush(false).0;
            }
            r if r == Register::Control0 as u8 => {
                // TX_START and TX_FLUSH self clear
                self.registers[usize::from(r)] = value & !0b0100_0001;
            }
            r if r == Register::DeviceId as u8
                || r == Register::Status0 as u8
                || r == Register::Status1 as u8 =>
            {
                return Err(())
            }
            r => self.registers[usize::from(r)] = value,
        }

        Ok(())
    }

    fn read_fifo(&mut self, buf: &mut [u8]) -> Result<(), ()> {
        // a zero length I2C read is a bus error on real hardware
        if buf.is_empty() || self.rx_fifo.len() < buf.len() {
            return Err(());
        }

        for byte in buf {
            *byte = self.rx_fifo.pop_front().ok_or(())?;
        }

        Ok(())
    }

    fn write_fifo(&mut self, data: &[u8]) -> Result<(), ()> {
        self.record(Access::WriteFifo(data.to_vec()));
        self.tx_fifo.extend_from_slice(data);
        Ok(())
    }
}

/// Converts a TX frame to what the receiving transceiver places in its RX FIFO
pub fn rx_frame(tx: &[u8]) -> Vec<u8> {
    assert_eq!(&tx[..SOP.len()], &SOP);

    let len = usize::from(tx[SOP.len()] & token::MAX_PACKED_LEN as u8);
    let start = SOP.len() + 1;
    assert_eq!(&tx[start + len..], &TRAILER);

    let mut rx = vec![token::RX_SOP];
    rx.extend_from_slice(&tx[start..start + len]);
    rx.extend_from_slice(&[0xde, 0xad, 0xbe, 0xef]);
    rx
}

/// Records requested delays without waiting
pub struct Delay {
    log: Log,
}

impl DelayMs<u8> for Delay {
    fn delay_ms(&mut self, ms: u8) {
        self.log.borrow_mut().push(Access::Delay(ms));
    }
}
