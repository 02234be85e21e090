//! HC-SR04 ultrasonic ranger with a SSD1306 128x32 OLED readout.
//!
//! TRIG = GP17, ECHO = GP16 (through a divider, the sensor drives 5V),
//! OLED on I2C0 with SDA = GP4, SCL = GP5.
//!
//! Echo edges are captured on a high priority interrupt executor, the
//! trigger, estimator and display tasks share the thread mode executor.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::{Executor, InterruptExecutor};
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use embassy_rp::peripherals::I2C0;
use embassy_time::Delay;
use rp_ranger::config::{I2C_FREQUENCY, OLED_ADDR};
use rp_ranger::{DisplayPresenter, DistanceEstimator, EdgeCapture, Pipeline, RangeTrigger};
use ssd1306::{mode::BufferedGraphicsMode, prelude::*, I2CDisplayInterface, Ssd1306};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

type Oled = Ssd1306<
    I2CInterface<I2c<'static, I2C0, i2c::Blocking>>,
    DisplaySize128x32,
    BufferedGraphicsMode<DisplaySize128x32>,
>;

static EXECUTOR_HIGH: InterruptExecutor = InterruptExecutor::new();
static EXECUTOR_LOW: StaticCell<Executor> = StaticCell::new();

static PIPELINE: Pipeline = Pipeline::new();

#[interrupt]
unsafe fn SWI_IRQ_1() {
    EXECUTOR_HIGH.on_interrupt()
}

#[embassy_executor::task]
async fn edge_capture(mut echo: Input<'static>) {
    let capture = EdgeCapture::new(&PIPELINE.edges, &PIPELINE.drops.edges);
    capture.run(&mut echo).await
}

#[embassy_executor::task]
async fn range_trigger(trig: Output<'static>) {
    let mut trigger = RangeTrigger::new(trig, Delay, &PIPELINE.ready);
    trigger.run().await
}

#[embassy_executor::task]
async fn distance_estimator() {
    let mut estimator = DistanceEstimator::new(&PIPELINE.edges, &PIPELINE.distances, &PIPELINE.drops.distances);
    estimator.run().await
}

#[embassy_executor::task]
async fn display_presenter(display: Oled) {
    let mut presenter = DisplayPresenter::new(display, &PIPELINE.distances, &PIPELINE.ready, &PIPELINE.drops);
    presenter.run().await
}

#[cortex_m_rt::entry]
fn main() -> ! {
    let p = embassy_rp::init(Default::default());

    let trig = Output::new(p.PIN_17, Level::Low);
    let echo = Input::new(p.PIN_16, Pull::Down);

    info!("set up i2c ");
    let mut config = i2c::Config::default();
    config.frequency = I2C_FREQUENCY;
    let i2c = I2c::new_blocking(p.I2C0, p.PIN_5, p.PIN_4, config);
    let interface = I2CDisplayInterface::new_custom_address(i2c, OLED_ADDR);
    let mut display =
        Ssd1306::new(interface, DisplaySize128x32, DisplayRotation::Rotate0).into_buffered_graphics_mode();
    if display.init().is_err() {
        defmt::panic!("no OLED answering at {=u8:#x}", OLED_ADDR);
    }
    // blank whatever was left in the controller RAM
    if display.flush().is_err() {
        warn!("initial OLED flush failed");
    }

    interrupt::SWI_IRQ_1.set_priority(Priority::P2);
    let spawner = EXECUTOR_HIGH.start(interrupt::SWI_IRQ_1);
    unwrap!(spawner.spawn(edge_capture(echo)));

    info!("ranging every 500ms");
    let executor = EXECUTOR_LOW.init(Executor::new());
    executor.run(|spawner| {
        unwrap!(spawner.spawn(range_trigger(trig)));
        unwrap!(spawner.spawn(distance_estimator()));
        unwrap!(spawner.spawn(display_presenter(display)));
    })
}
