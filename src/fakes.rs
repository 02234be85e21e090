//! Stand-ins for pins, delays and the display used by the unit tests.

use core::cell::RefCell;
use core::convert::Infallible;
use std::collections::VecDeque;

use embassy_time::Instant;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::{DrawTarget, OriginDimensions, Pixel, Size};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorKind, ErrorType, InputPin, OutputPin};
use embedded_hal_async::digital::Wait;

use crate::presenter::Frame;

/// Echo input that walks through a fixed list of levels, one per edge, and
/// then goes quiet forever.
pub struct ScriptedEcho {
    levels: VecDeque<bool>,
    high: bool,
}

impl ScriptedEcho {
    pub fn new(levels: &[bool]) -> Self {
        Self {
            levels: levels.iter().copied().collect(),
            high: false,
        }
    }
}

impl ErrorType for ScriptedEcho {
    type Error = Infallible;
}

impl InputPin for ScriptedEcho {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(self.high)
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(!self.high)
    }
}

impl Wait for ScriptedEcho {
    async fn wait_for_high(&mut self) -> Result<(), Infallible> {
        while !self.high {
            self.wait_for_any_edge().await?;
        }
        Ok(())
    }

    async fn wait_for_low(&mut self) -> Result<(), Infallible> {
        while self.high {
            self.wait_for_any_edge().await?;
        }
        Ok(())
    }

    async fn wait_for_rising_edge(&mut self) -> Result<(), Infallible> {
        loop {
            self.wait_for_any_edge().await?;
            if self.high {
                return Ok(());
            }
        }
    }

    async fn wait_for_falling_edge(&mut self) -> Result<(), Infallible> {
        loop {
            self.wait_for_any_edge().await?;
            if !self.high {
                return Ok(());
            }
        }
    }

    async fn wait_for_any_edge(&mut self) -> Result<(), Infallible> {
        match self.levels.pop_front() {
            Some(level) => {
                self.high = level;
                Ok(())
            }
            None => core::future::pending().await,
        }
    }
}

/// Trigger output that logs every level change with the time it happened.
pub struct RecordingPin<'a> {
    pub log: &'a RefCell<Vec<(bool, Instant)>>,
}

impl ErrorType for RecordingPin<'_> {
    type Error = Infallible;
}

impl OutputPin for RecordingPin<'_> {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.log.borrow_mut().push((false, Instant::now()));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.log.borrow_mut().push((true, Instant::now()));
        Ok(())
    }
}

/// Output pin whose driver always reports a fault.
pub struct BrokenPin;

impl ErrorType for BrokenPin {
    type Error = ErrorKind;
}

impl OutputPin for BrokenPin {
    fn set_low(&mut self) -> Result<(), ErrorKind> {
        Err(ErrorKind::Other)
    }

    fn set_high(&mut self) -> Result<(), ErrorKind> {
        Err(ErrorKind::Other)
    }
}

/// Delay that only sums up what it was asked to wait.
#[derive(Default)]
pub struct TallyDelay {
    pub waited_ns: Vec<u32>,
}

impl DelayNs for TallyDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.waited_ns.push(ns);
    }
}

pub const FRAME_WIDTH: usize = 128;
pub const FRAME_HEIGHT: usize = 32;

/// 128x32 monochrome frame buffer that counts how often it was presented.
#[derive(Debug, Clone, PartialEq)]
pub struct FakeFrame {
    pub pixels: [[bool; FRAME_WIDTH]; FRAME_HEIGHT],
    pub presented: usize,
}

impl FakeFrame {
    pub fn new() -> Self {
        Self {
            pixels: [[false; FRAME_WIDTH]; FRAME_HEIGHT],
            presented: 0,
        }
    }

    pub fn lit(&self, x: i32, y: i32) -> bool {
        self.pixels[y as usize][x as usize]
    }

    pub fn lit_in_row(&self, y: usize) -> usize {
        self.pixels[y].iter().filter(|&&on| on).count()
    }

    pub fn lit_in_rows(&self, rows: core::ops::Range<usize>) -> usize {
        rows.map(|y| self.lit_in_row(y)).sum()
    }
}

impl OriginDimensions for FakeFrame {
    fn size(&self) -> Size {
        Size::new(FRAME_WIDTH as u32, FRAME_HEIGHT as u32)
    }
}

impl DrawTarget for FakeFrame {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x < 0 || point.y < 0 || point.x >= FRAME_WIDTH as i32 || point.y >= FRAME_HEIGHT as i32 {
                continue;
            }
            self.pixels[point.y as usize][point.x as usize] = color.is_on();
        }
        Ok(())
    }
}

impl Frame for FakeFrame {
    fn present(&mut self) -> Result<(), Infallible> {
        self.presented += 1;
        Ok(())
    }
}
