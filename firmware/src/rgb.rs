//! Status LED, each channel active low

use embedded_hal::digital::v2::{OutputPin, PinState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum Color {
    Black = 0b000,
    Red = 0b100,
    Green = 0b010,
    Blue = 0b001,
    Magenta = 0b101,
}

pub struct Rgb<R, G, B> {
    red: R,
    green: G,
    blue: B,
    color: Color,
}

impl<R: OutputPin, G: OutputPin, B: OutputPin> Rgb<R, G, B> {
    /// Takes the three channel pins and switches the LED off
    pub fn new(red: R, green: G, blue: B) -> Self {
        let mut rgb = Self {
            red,
            green,
            blue,
            color: Color::Black,
        };
        rgb.set(Color::Black);
        rgb
    }

    pub fn set(&mut self, color: Color) {
        if color != self.color {
            defmt::debug!("led: {}", color);
        }
        self.color = color;

        let value = color as u8;
        // GPIO writes on this part cannot fail
        self.red.set_state(channel(value, 2)).ok();
        self.green.set_state(channel(value, 1)).ok();
        self.blue.set_state(channel(value, 0)).ok();
    }
}

/// Pin level lighting bit `k` of `value`
fn channel(value: u8, k: u8) -> PinState {
    (value & (1 << k) == 0).into()
}
