//! Drawing of a single complication

use embedded_graphics::{
    image::{Image, ImageRaw},
    mono_font::MonoTextStyle,
    pixelcolor::{Rgb565, RgbColor},
    prelude::*,
    primitives::{Arc, Circle, ContainsPoint, Line, PrimitiveStyle, PrimitiveStyleBuilder, Rectangle},
    text::{Alignment, Baseline, Text, TextStyleBuilder},
};

use crate::{
    complication::data::{ComplicationData, ComplicationType, Icon, RangedValue},
    system::config::WatchFaceConfig,
};

/// Per-slot drawable state
///
/// Holds where and how a complication is drawn. What is drawn comes from
/// the engine's bindings on every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComplicationVisual {
    bounds: Rectangle,
    ambient: bool,
    low_bit_ambient: bool,
    burn_in_protection: bool,
}

impl Default for ComplicationVisual {
    fn default() -> Self {
        Self::new()
    }
}

impl ComplicationVisual {
    pub const fn new() -> Self {
        Self {
            bounds: Rectangle::zero(),
            ambient: false,
            low_bit_ambient: false,
            burn_in_protection: false,
        }
    }

    pub fn bounds(&self) -> Rectangle {
        self.bounds
    }

    pub fn set_bounds(&mut self, bounds: Rectangle) {
        self.bounds = bounds;
    }

    pub fn is_in_ambient_mode(&self) -> bool {
        self.ambient
    }

    pub fn set_in_ambient_mode(&mut self, ambient: bool) {
        self.ambient = ambient;
    }

    pub fn set_low_bit_ambient(&mut self, low_bit_ambient: bool) {
        self.low_bit_ambient = low_bit_ambient;
    }

    pub fn set_burn_in_protection(&mut self, burn_in_protection: bool) {
        self.burn_in_protection = burn_in_protection;
    }

    /// Whether a tap at `point` lands on this complication
    pub fn contains(&self, point: Point) -> bool {
        self.bounds.contains(point)
    }

    /// Draw the frame and `data`, or the "add" placeholder when unbound
    pub fn draw<D>(
        &self,
        target: &mut D,
        data: Option<&ComplicationData>,
        now_millis: i64,
        config: &WatchFaceConfig,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        if self.diameter() == 0 {
            return Ok(());
        }

        self.draw_frame(target, config)?;

        let Some(data) = data else {
            return self.draw_placeholder(target, config);
        };
        if !data.is_active(now_millis) {
            return Ok(());
        }

        match data.kind() {
            ComplicationType::NotConfigured => self.draw_placeholder(target, config),
            ComplicationType::NoData | ComplicationType::Empty => Ok(()),
            ComplicationType::NoPermission => self.draw_text(target, "!", config),
            ComplicationType::RangedValue => {
                if let Some(range) = data.ranged_value() {
                    self.draw_range(target, range, config)?;
                }
                self.draw_short_text(target, data, config)
            }
            ComplicationType::ShortText | ComplicationType::LongText => {
                self.draw_short_text(target, data, config)
            }
            ComplicationType::Icon | ComplicationType::SmallImage | ComplicationType::LargeImage => {
                // Burn-in protection only allows outlines while ambient
                let hide_image = self.ambient && self.burn_in_protection;
                match data.icon() {
                    Some(icon) if !hide_image => self.draw_icon(target, icon),
                    _ => self.draw_short_text(target, data, config),
                }
            }
        }
    }

    fn content_color(&self, config: &WatchFaceConfig) -> Rgb565 {
        match (self.ambient, self.low_bit_ambient) {
            (false, _) => config.complication_color,
            (true, false) => config.ambient_color,
            (true, true) => Rgb565::WHITE,
        }
    }

    fn diameter(&self) -> u32 {
        self.bounds.size.width.min(self.bounds.size.height)
    }

    fn draw_frame<D>(&self, target: &mut D, config: &WatchFaceConfig) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let style = if self.ambient {
            PrimitiveStyle::with_stroke(self.content_color(config), 1)
        } else {
            PrimitiveStyleBuilder::new()
                .fill_color(config.complication_background)
                .stroke_color(config.complication_color)
                .stroke_width(2)
                .build()
        };
        Circle::with_center(self.bounds.center(), self.diameter())
            .into_styled(style)
            .draw(target)
    }

    fn draw_placeholder<D>(&self, target: &mut D, config: &WatchFaceConfig) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let center = self.bounds.center();
        let arm = (self.diameter() / 6) as i32;
        let style = PrimitiveStyle::with_stroke(self.content_color(config), 2);

        Line::new(center - Point::new(arm, 0), center + Point::new(arm, 0))
            .into_styled(style)
            .draw(target)?;
        Line::new(center - Point::new(0, arm), center + Point::new(0, arm))
            .into_styled(style)
            .draw(target)
    }

    fn draw_range<D>(
        &self,
        target: &mut D,
        range: &RangedValue,
        config: &WatchFaceConfig,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let sweep = range.fraction() * 360.0;
        if sweep <= 0.0 {
            return Ok(());
        }
        Arc::with_center(
            self.bounds.center(),
            self.diameter().saturating_sub(6),
            (-90.0f32).deg(),
            sweep.deg(),
        )
        .into_styled(PrimitiveStyle::with_stroke(self.content_color(config), 3))
        .draw(target)
    }

    fn draw_short_text<D>(
        &self,
        target: &mut D,
        data: &ComplicationData,
        config: &WatchFaceConfig,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        match data.short_text() {
            Some(text) => self.draw_text(target, text, config),
            None => Ok(()),
        }
    }

    fn draw_text<D>(&self, target: &mut D, text: &str, config: &WatchFaceConfig) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let character_style =
            MonoTextStyle::new(config.complication_font, self.content_color(config));
        let text_style = TextStyleBuilder::new()
            .alignment(Alignment::Center)
            .baseline(Baseline::Middle)
            .build();
        Text::with_text_style(text, self.bounds.center(), character_style, text_style)
            .draw(target)?;
        Ok(())
    }

    fn draw_icon<D>(&self, target: &mut D, icon: &Icon) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let raw = ImageRaw::<Rgb565>::new(icon.data, icon.width);
        let size = raw.size();
        let top_left =
            self.bounds.center() - Point::new(size.width as i32 / 2, size.height as i32 / 2);
        Image::new(&raw, top_left).draw(target)
    }
}
