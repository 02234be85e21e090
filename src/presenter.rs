//! OLED readout of the latest distance.

use core::fmt::Write;

use display_interface::{DisplayError, WriteOnlyDataCommand};
use embedded_graphics::{
    mono_font::{ascii::FONT_6X10, MonoTextStyle},
    pixelcolor::BinaryColor,
    prelude::DrawTarget,
    text::{Baseline, Text},
    Drawable,
};
use heapless::String;
use ssd1306::{mode::BufferedGraphicsMode, size::DisplaySize, Ssd1306};

use crate::config::{BAR_MAX_CM, BAR_ORIGIN, FAULT_LABEL, LABEL_ORIGIN, STATS_EVERY};
use crate::estimator::Distance;
use crate::pipeline::{DistanceChannel, DropStats, ReadySignal};
use crate::ui::BarGauge;

/// A monochrome draw target whose content only becomes visible on `present`.
pub trait Frame: DrawTarget<Color = BinaryColor> {
    fn present(&mut self) -> Result<(), Self::Error>;
}

impl<DI, SIZE> Frame for Ssd1306<DI, SIZE, BufferedGraphicsMode<SIZE>>
where
    DI: WriteOnlyDataCommand,
    SIZE: DisplaySize,
{
    fn present(&mut self) -> Result<(), DisplayError> {
        self.flush()
    }
}

/// What goes on the panel for one reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Fault,
    Reading { label: String<32>, bar: u32 },
}

impl Screen {
    pub fn for_distance(distance: Distance) -> Self {
        if distance.is_fault() {
            return Screen::Fault;
        }

        let cm = distance.cm();
        let mut label = String::new();
        // "Dist: 400.00 cm" is the longest it gets
        let _ = core::write!(label, "Dist: {:.2} cm", cm);
        let bar = cm.clamp(0.0, BAR_MAX_CM) as u32;

        Screen::Reading { label, bar }
    }
}

/// Clears `frame`, draws `screen` and presents it.
pub fn render<F: Frame>(frame: &mut F, screen: &Screen) -> Result<(), F::Error> {
    let style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);

    frame.clear(BinaryColor::Off)?;
    match screen {
        Screen::Fault => {
            Text::with_baseline(FAULT_LABEL, LABEL_ORIGIN, style, Baseline::Top).draw(frame)?;
        }
        Screen::Reading { label, bar } => {
            Text::with_baseline(label.as_str(), LABEL_ORIGIN, style, Baseline::Top).draw(frame)?;
            BarGauge::new(BinaryColor::On, BAR_ORIGIN, *bar).draw(frame)?;
        }
    }
    frame.present()
}

/// Owns the display. Wakes on every trigger cycle and shows whatever
/// distance is waiting, if any.
pub struct DisplayPresenter<'a, F> {
    frame: F,
    distances: &'a DistanceChannel,
    ready: &'a ReadySignal,
    drops: &'a DropStats,
    rendered: u32,
}

impl<'a, F: Frame> DisplayPresenter<'a, F> {
    pub fn new(frame: F, distances: &'a DistanceChannel, ready: &'a ReadySignal, drops: &'a DropStats) -> Self {
        Self {
            frame,
            distances,
            ready,
            drops,
            rendered: 0,
        }
    }

    pub fn frame(&self) -> &F {
        &self.frame
    }

    /// Waits for the next ready token, then renders one queued distance.
    ///
    /// With nothing queued the panel keeps its previous frame and
    /// `Ok(None)` is returned.
    pub async fn step(&mut self) -> Result<Option<Distance>, F::Error> {
        self.ready.wait().await;

        let Ok(distance) = self.distances.try_receive() else {
            trace!("no distance this cycle");
            return Ok(None);
        };

        render(&mut self.frame, &Screen::for_distance(distance))?;

        self.rendered = self.rendered.wrapping_add(1);
        if self.rendered % STATS_EVERY == 0 {
            debug!(
                "dropped so far: {} edges, {} distances",
                self.drops.edges.get(),
                self.drops.distances.get()
            );
        }
        Ok(Some(distance))
    }

    pub async fn run(&mut self) -> ! {
        loop {
            if self.step().await.is_err() {
                warn!("display refresh failed");
            }
        }
    }
}
