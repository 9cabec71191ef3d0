//! Sink side negotiation: watches for source capabilities and requests a fixed supply

use {
    crate::{
        header::{ControlMessageType, DataMessageType, Header, MessageType},
        message::{Message, MAX_DATA_OBJECTS},
        pdo::{FixedSupply, Kind, PowerDataObjectRaw, RequestDataObject},
        session::Session,
    },
    heapless::Vec,
};

/// Requested operating current in 10mA units
pub const OPERATING_CURRENT: u16 = 20;

/// Requested maximum operating current in 10mA units
pub const MAX_OPERATING_CURRENT: u16 = 50;

/// Message transport towards the port partner
pub trait Driver {
    type Error;

    /// Returns the next pending message, `None` once nothing is queued
    fn receive(&mut self) -> Result<Option<Message>, Self::Error>;

    /// Queues a message for transmission without waiting for completion
    fn transmit(&mut self, message: &Message) -> Result<(), Self::Error>;
}

impl<D: Driver + ?Sized> Driver for &mut D {
    type Error = D::Error;

    fn receive(&mut self) -> Result<Option<Message>, Self::Error> {
        (**self).receive()
    }

    fn transmit(&mut self, message: &Message) -> Result<(), Self::Error> {
        (**self).transmit(message)
    }
}

/// Sink events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// A request for the PDO at `position` (1-based) has been sent
    PowerRequested { position: u8 },
}

/// Negotiation state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// Waiting for source capabilities
    Idle,
    /// Source capabilities received, PDO at `index` will be requested
    CapabilitiesSeen { index: usize },
}

pub struct Sink<DRIVER> {
    driver: DRIVER,
    session: Session,
    state: State,
}

impl<DRIVER: Driver> Sink<DRIVER> {
    pub fn new(driver: DRIVER, session: Session) -> Self {
        Self {
            driver,
            session,
            state: State::Idle,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn driver(&mut self) -> &mut DRIVER {
        &mut self.driver
    }

    /// Runs one negotiation cycle: drains all pending messages, then sends at most one request.
    pub fn poll(&mut self) -> Result<Option<Event>, DRIVER::Error> {
        while let Some(message) = self.driver.receive()? {
            self.handle_message(&message);
        }

        let State::CapabilitiesSeen { index } = self.state else {
            return Ok(None);
        };

        let position = self.request_power(index)?;
        self.state = State::Idle;

        Ok(Some(Event::PowerRequested { position }))
    }

    fn handle_message(&mut self, message: &Message) {
        match message.message_type() {
            MessageType::Data(DataMessageType::SourceCapabilities) => {
                if let Some(index) = select_fixed_supply(message.data_objects()) {
                    debug!("selected PDO {}", index);
                    self.state = State::CapabilitiesSeen { index };
                } else {
                    warn!("no fixed supply offered");
                }
            }
            MessageType::Control(ControlMessageType::GoodCRC) => trace!("good crc"),
            MessageType::Control(ControlMessageType::Accept) => info!("power accepted"),
            MessageType::Control(ControlMessageType::Reject) => info!("power rejected"),
            MessageType::Control(ControlMessageType::PsRdy) => info!("power ready"),
            other => debug!("ignoring {}", other),
        }
    }

    fn request_power(&mut self, index: usize) -> Result<u8, DRIVER::Error> {
        let position = index as u8 + 1;

        let rdo = RequestDataObject(0)
            .with_object_position(position)
            .with_operating_current(OPERATING_CURRENT)
            .with_maximum_operating_current(MAX_OPERATING_CURRENT);

        let header = Header::data(
            DataMessageType::Request,
            1,
            self.session.next_message_id(),
            self.session.spec_revision(),
        );

        let objects: Vec<u32, MAX_DATA_OBJECTS> = core::iter::once(rdo.0).collect();

        info!("requesting PDO {}", position);
        self.driver.transmit(&Message::standard(header, objects))?;

        Ok(position)
    }
}

/// Index of the last fixed supply PDO
fn select_fixed_supply(pdos: &[u32]) -> Option<usize> {
    let mut selected = None;

    for (index, pdo) in pdos.iter().copied().enumerate() {
        match PowerDataObjectRaw(pdo).kind() {
            Kind::FixedSupply => {
                let supply = FixedSupply(pdo);
                debug!(
                    "supply @ {}: {}mV {}mA",
                    index,
                    supply.voltage_mv(),
                    supply.max_current_ma()
                );
                selected = Some(index);
            }
            kind => debug!("supply @ {}: {}", index, kind),
        }
    }

    selected
}
