#![no_main]
#![no_std]

use {defmt_rtt as _, panic_probe as _};

mod rgb;

#[rtic::app(device = stm32f0xx_hal::pac, peripherals = true)]
mod app {
    use {
        crate::rgb::{Color, Rgb},
        bitbang_hal::i2c::I2cBB,
        defmt::Debug2Format,
        embedded_hal::blocking::delay::DelayMs,
        fusb302b::{transport::I2cTransport, Fusb302b},
        stm32f0xx_hal::{
            gpio::{
                gpioa::{PA10, PA5, PA6, PA7, PA9},
                OpenDrain, Output, PushPull,
            },
            pac::TIM3,
            prelude::*,
            timers::Timer,
        },
        systick_monotonic::{fugit::ExtU64, Systick},
        usb_pd::{
            session::Session,
            sink::{Event, Sink},
        },
    };

    type Led = Rgb<PA5<Output<PushPull>>, PA6<Output<PushPull>>, PA7<Output<PushPull>>>;

    /// FUSB302B on PA10 (SCL) and PA9 (SDA), clocked by TIM3
    type Transceiver =
        Fusb302b<I2cTransport<I2cBB<PA10<Output<PushPull>>, PA9<Output<OpenDrain>>, Timer<TIM3>>>>;

    #[shared]
    struct Shared {}

    #[local]
    struct Local {
        led: Led,
        fusb: Transceiver,
    }

    #[monotonic(binds = SysTick, default = true)]
    type MonoTimer = Systick<1000>;

    #[init]
    fn init(cx: init::Context) -> (Shared, Local, init::Monotonics) {
        let mut flash = cx.device.FLASH;
        let mut rcc = cx.device.RCC.configure().sysclk(8.mhz()).freeze(&mut flash);

        let mono = Systick::new(cx.core.SYST, rcc.clocks.sysclk().0);

        defmt::info!("init");

        let gpioa = cx.device.GPIOA.split(&mut rcc);
        let (red, green, blue, scl, sda) = cortex_m::interrupt::free(move |cs| {
            (
                gpioa.pa5.into_push_pull_output(cs),
                gpioa.pa6.into_push_pull_output(cs),
                gpioa.pa7.into_push_pull_output(cs),
                gpioa.pa10.into_push_pull_output(cs),
                gpioa.pa9.into_open_drain_output(cs),
            )
        });

        // bit clock, two ticks per SCL period
        let clk = Timer::tim3(cx.device.TIM3, 200.khz(), &mut rcc);
        let fusb = Fusb302b::new(I2cTransport::new(I2cBB::new(scl, sda, clk)));

        (
            Shared {},
            Local {
                led: Rgb::new(red, green, blue),
                fusb,
            },
            init::Monotonics(mono),
        )
    }

    #[idle(local = [led, fusb])]
    fn idle(cx: idle::Context) -> ! {
        let led = cx.local.led;
        let fusb = cx.local.fusb;

        led.set(Color::Magenta);

        let cc = match fusb.attach(&mut MonoDelay) {
            Ok(cc) => cc,
            Err(e) => {
                defmt::error!("attach failed: {}", Debug2Format(&e));
                halt(led)
            }
        };

        led.set(Color::Blue);

        let mut sink = Sink::new(fusb, Session::new(cc));

        let session = sink.session();
        defmt::info!(
            "sink on {}, revision {}, {} retries (auto {})",
            session.cc(),
            session.spec_revision(),
            session.retries(),
            session.auto_retry()
        );

        loop {
            match sink.poll() {
                Ok(Some(Event::PowerRequested { position })) => {
                    defmt::info!("requested PDO {}", position);
                    led.set(Color::Green);
                }
                Ok(None) => (),
                Err(e) => defmt::error!("{}", Debug2Format(&e)),
            }
        }
    }

    fn halt(led: &mut Led) -> ! {
        led.set(Color::Red);

        loop {
            cortex_m::asm::wfi();
        }
    }

    /// Busy waits on the monotonic, which is only advanced by the SysTick interrupt
    struct MonoDelay;

    impl DelayMs<u8> for MonoDelay {
        fn delay_ms(&mut self, ms: u8) {
            let until = monotonics::now() + u64::from(ms).millis();
            while monotonics::now() < until {}
        }
    }
}
