//! Watch face configuration

use embedded_graphics::{
    mono_font::{ascii::FONT_6X10, MonoFont},
    pixelcolor::Rgb565,
};
use embassy_time::Duration;
use profont::{PROFONT_18_POINT, PROFONT_24_POINT};

use crate::platform::WatchFaceComponent;

/// Capacity of the host event queue
pub const EVENT_QUEUE_DEPTH: usize = 8;

/// Settings for the render engine and the configuration surface
#[derive(Clone, Copy)]
pub struct WatchFaceConfig {
    /// Name the watch face is known by to the host
    pub component: WatchFaceComponent,
    /// Redraw period while interactive and visible
    pub interactive_update_rate: Duration,

    /// Complication edge length is surface width divided by this
    pub complication_divisor: u32,
    /// How far below the screen center the complications sit
    pub complication_y_shift: i32,

    /// Horizontal shift of the time text on round displays
    pub x_offset_round: i32,
    /// Horizontal shift of the time text on rectangular displays
    pub x_offset_rect: i32,
    /// Time font on round displays
    pub font_round: &'static MonoFont<'static>,
    /// Time font on rectangular displays
    pub font_rect: &'static MonoFont<'static>,
    /// Font for complication text
    pub complication_font: &'static MonoFont<'static>,

    /// Interactive background
    pub background_color: Rgb565,
    /// Interactive time text
    pub text_color: Rgb565,
    /// Interactive complication fill
    pub complication_background: Rgb565,
    /// Complication outline and content
    pub complication_color: Rgb565,
    /// Complication outline in ambient mode
    pub ambient_color: Rgb565,
}

impl Default for WatchFaceConfig {
    fn default() -> Self {
        Self {
            component: WatchFaceComponent {
                package: "pinetime.watchface",
                name: "DigitalWatchFace",
            },
            // Seconds are shown in interactive mode
            interactive_update_rate: Duration::from_millis(1000),

            complication_divisor: 5,
            complication_y_shift: 80,

            x_offset_round: 0,
            x_offset_rect: 0,
            font_round: &PROFONT_24_POINT,
            font_rect: &PROFONT_18_POINT,
            complication_font: &FONT_6X10,

            background_color: Rgb565::new(0, 6, 8),
            text_color: Rgb565::new(29, 58, 29),
            complication_background: Rgb565::new(3, 8, 10),
            complication_color: Rgb565::new(29, 58, 29),
            ambient_color: Rgb565::new(16, 32, 16),
        }
    }
}
