//! In-memory driver for exercising the sink without a transceiver

use {
    crate::{message::Message, sink::Driver},
    std::{collections::VecDeque, vec::Vec},
};

pub struct DummyDriver {
    pub inbound: VecDeque<Message>,
    pub transmitted: Vec<Message>,
    pub fail_next_receive: bool,
}

impl DummyDriver {
    pub fn new(messages: &[Message]) -> Self {
        Self {
            inbound: messages.iter().cloned().collect(),
            transmitted: Vec::new(),
            fail_next_receive: false,
        }
    }
}

impl Driver for DummyDriver {
    type Error = ();

    fn receive(&mut self) -> Result<Option<Message>, Self::Error> {
        if core::mem::take(&mut self.fail_next_receive) {
            return Err(());
        }

        Ok(self.inbound.pop_front())
    }

    fn transmit(&mut self, message: &Message) -> Result<(), Self::Error> {
        self.transmitted.push(message.clone());
        Ok(())
    }
}
