//! Time text of the digital face

use chrono::{NaiveTime, Timelike};
use embedded_graphics::{
    mono_font::{MonoFont, MonoTextStyle},
    pixelcolor::{Rgb565, RgbColor},
    prelude::*,
    text::{Alignment, Baseline, Text, TextStyleBuilder},
};

use crate::error::Error;

const BUF_LEN: usize = 16;

/// Text style state of the time label
#[derive(Clone, Copy)]
pub struct TextPaint {
    pub font: &'static MonoFont<'static>,
    pub color: Rgb565,
    /// Horizontal shift from the surface center
    pub x_offset: i32,
    /// Off while ambient on low-bit displays, which only show full
    /// intensity pixels
    pub anti_alias: bool,
}

impl TextPaint {
    /// Color actually drawn with
    pub fn effective_color(&self) -> Rgb565 {
        if self.anti_alias {
            self.color
        } else {
            Rgb565::WHITE
        }
    }
}

/// Formats and draws `H:MM` / `H:MM:SS`
pub struct TimeLabel {
    str_buf: [u8; BUF_LEN],
}

impl Default for TimeLabel {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeLabel {
    pub const fn new() -> Self {
        Self {
            str_buf: [0; BUF_LEN],
        }
    }

    /// Text for `time`, without seconds in ambient mode
    ///
    /// Hours count from 0 to 11 within each half of the day.
    pub fn format(&mut self, time: NaiveTime, ambient: bool) -> Result<&str, Error> {
        let hour = time.hour() % 12;
        let text = if ambient {
            format_no_std::show(
                &mut self.str_buf,
                format_args!("{}:{:02}", hour, time.minute()),
            )?
        } else {
            format_no_std::show(
                &mut self.str_buf,
                format_args!("{}:{:02}:{:02}", hour, time.minute(), time.second()),
            )?
        };
        Ok(text)
    }

    /// Draw `time` centered at `center`, shifted by the paint's offset
    pub fn draw<D>(
        &mut self,
        target: &mut D,
        time: NaiveTime,
        ambient: bool,
        paint: &TextPaint,
        center: Point,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let text = match self.format(time, ambient) {
            Ok(text) => text,
            Err(e) => {
                error!("Cannot format time: {}", e);
                return Ok(());
            }
        };

        let character_style = MonoTextStyle::new(paint.font, paint.effective_color());
        let text_style = TextStyleBuilder::new()
            .alignment(Alignment::Center)
            .baseline(Baseline::Middle)
            .build();
        let position = center + Point::new(paint.x_offset, 0);

        Text::with_text_style(text, position, character_style, text_style).draw(target)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interactive_shows_seconds() {
        let mut label = TimeLabel::new();
        let time = NaiveTime::from_hms_opt(9, 5, 3).unwrap();
        assert_eq!(label.format(time, false), Ok("9:05:03"));
    }

    #[test]
    fn ambient_hides_seconds() {
        let mut label = TimeLabel::new();
        let time = NaiveTime::from_hms_opt(9, 5, 3).unwrap();
        assert_eq!(label.format(time, true), Ok("9:05"));
    }

    #[test]
    fn hours_restart_at_noon() {
        let mut label = TimeLabel::new();
        let time = NaiveTime::from_hms_opt(21, 30, 0).unwrap();
        assert_eq!(label.format(time, true), Ok("9:30"));
        let time = NaiveTime::from_hms_opt(12, 0, 59).unwrap();
        assert_eq!(label.format(time, false), Ok("0:00:59"));
    }

    #[test]
    fn low_bit_text_is_full_intensity() {
        let mut paint = TextPaint {
            font: &profont::PROFONT_18_POINT,
            color: Rgb565::new(10, 20, 10),
            x_offset: 0,
            anti_alias: true,
        };
        assert_eq!(paint.effective_color(), Rgb565::new(10, 20, 10));
        paint.anti_alias = false;
        assert_eq!(paint.effective_color(), Rgb565::WHITE);
    }
}
