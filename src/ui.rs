use embedded_graphics::{
    prelude::{DrawTarget, PixelColor, Point},
    primitives::{Line, Primitive, PrimitiveStyle},
    Drawable,
};

/// Horizontal one pixel high gauge growing to the right of `origin`.
pub struct BarGauge<C>
where
    C: PixelColor,
{
    color: C,
    origin: Point,
    length: u32,
}

impl<C> BarGauge<C>
where
    C: PixelColor,
{
    pub fn new(color: C, origin: Point, length: u32) -> Self {
        Self { color, origin, length }
    }

    pub fn end(&self) -> Point {
        self.origin + Point::new(self.length as i32, 0)
    }
}

impl<C> Drawable for BarGauge<C>
where
    C: PixelColor,
{
    type Color = C;

    type Output = ();

    fn draw<D>(&self, target: &mut D) -> Result<Self::Output, D::Error>
    where
        D: DrawTarget<Color = Self::Color>,
    {
        Line::new(self.origin, self.end())
            .into_styled(PrimitiveStyle::with_stroke(self.color, 1))
            .draw(target)
    }
}
