//! Register and FIFO access to the transceiver

use {
    crate::{codec::FRAME_CAPACITY, registers::Register, DEVICE_ADDRESS},
    embedded_hal::blocking::i2c::{Write, WriteRead},
};

/// Byte-level access to the transceiver's registers and FIFOs
pub trait Transport {
    type Error;

    fn read_register(&mut self, register: u8) -> Result<u8, Self::Error>;

    fn write_register(&mut self, register: u8, value: u8) -> Result<(), Self::Error>;

    /// Fills `buf` from the RX FIFO
    fn read_fifo(&mut self, buf: &mut [u8]) -> Result<(), Self::Error>;

    /// Pushes `data` into the TX FIFO
    fn write_fifo(&mut self, data: &[u8]) -> Result<(), Self::Error>;
}

/// FUSB302B on a blocking I2C bus
pub struct I2cTransport<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C> I2cTransport<I2C> {
    pub fn new(i2c: I2C) -> Self {
        Self {
            i2c,
            address: DEVICE_ADDRESS,
        }
    }

    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C, E> Transport for I2cTransport<I2C>
where
    I2C: Write<Error = E> + WriteRead<Error = E>,
{
    type Error = E;

    fn read_register(&mut self, register: u8) -> Result<u8, E> {
        let mut buf = [0u8; 1];
        self.i2c.write_read(self.address, &[register], &mut buf)?;
        Ok(buf[0])
    }

    fn write_register(&mut self, register: u8, value: u8) -> Result<(), E> {
        self.i2c.write(self.address, &[register, value])
    }

    fn read_fifo(&mut self, buf: &mut [u8]) -> Result<(), E> {
        // some bus implementations reject zero length transfers
        if buf.is_empty() {
            return Ok(());
        }

        self.i2c
            .write_read(self.address, &[Register::Fifo as u8], buf)
    }

    fn write_fifo(&mut self, data: &[u8]) -> Result<(), E> {
        // register address followed by at most one full frame
        let mut buf = [0u8; 1 + FRAME_CAPACITY];
        buf[0] = Register::Fifo as u8;

        for chunk in data.chunks(FRAME_CAPACITY) {
            buf[1..=chunk.len()].copy_from_slice(chunk);
            self.i2c.write(self.address, &buf[..=chunk.len()])?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use {super::*, std::vec::Vec};

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Transaction {
        Write(u8, Vec<u8>),
        WriteRead(u8, Vec<u8>, usize),
    }

    #[derive(Default)]
    struct FakeI2c {
        transactions: Vec<Transaction>,
        response: u8,
    }

    impl Write for FakeI2c {
        type Error = ();

        fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), ()> {
            if bytes.is_empty() {
                return Err(());
            }
            self.transactions
                .push(Transaction::Write(address, bytes.to_vec()));
            Ok(())
        }
    }

    impl WriteRead for FakeI2c {
        type Error = ();

        fn write_read(&mut self, address: u8, bytes: &[u8], buffer: &mut [u8]) -> Result<(), ()> {
            if bytes.is_empty() || buffer.is_empty() {
                return Err(());
            }
            self.transactions.push(Transaction::WriteRead(
                address,
                bytes.to_vec(),
                buffer.len(),
            ));
            buffer.fill(self.response);
            Ok(())
        }
    }

    #[test]
    fn register_access() {
        let mut transport = I2cTransport::new(FakeI2c {
            response: 0x91,
            ..Default::default()
        });

        assert_eq!(transport.read_register(0x01), Ok(0x91));
        transport.write_register(0x0c, 0x03).unwrap();

        assert_eq!(
            transport.release().transactions,
            [
                Transaction::WriteRead(0x22, vec![0x01], 1),
                Transaction::Write(0x22, vec![0x0c, 0x03]),
            ]
        );
    }

    #[test]
    fn fifo_access() {
        let mut transport = I2cTransport::new(FakeI2c::default());

        let mut buf = [0xff; 3];
        transport.read_fifo(&mut buf).unwrap();
        transport.write_fifo(&[0x12, 0x12, 0x12, 0x13]).unwrap();

        assert_eq!(
            transport.release().transactions,
            [
                Transaction::WriteRead(0x22, vec![0x43], 3),
                Transaction::Write(0x22, vec![0x43, 0x12, 0x12, 0x12, 0x13]),
            ]
        );
    }

    #[test]
    fn empty_fifo_access_skips_the_bus() {
        let mut transport = I2cTransport::new(FakeI2c::default());

        assert_eq!(transport.read_fifo(&mut []), Ok(()));
        assert_eq!(transport.write_fifo(&[]), Ok(()));

        assert!(transport.release().transactions.is_empty());
    }

    #[test]
    fn long_fifo_write_is_split() {
        let mut transport = I2cTransport::new(FakeI2c::default());

        let data = [0xaa; FRAME_CAPACITY + 2];
        transport.write_fifo(&data).unwrap();

        let transactions = transport.release().transactions;
        assert_eq!(transactions.len(), 2);
        assert_eq!(
            transactions[1],
            Transaction::Write(0x22, vec![0x43, 0xaa, 0xaa])
        );
    }
}
