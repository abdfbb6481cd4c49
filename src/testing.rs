//! Recording fakes of the host services and an in-memory display

use std::{cell::RefCell, rc::Rc};

use chrono::{FixedOffset, Offset, Utc};
use embassy_time::Duration;
use embedded_graphics::{
    pixelcolor::{Rgb565, RgbColor},
    prelude::*,
};

use crate::{
    complication::data::{ComplicationType, Icon, ProviderInfo, TapAction},
    complication::registry::ComplicationId,
    error::Error,
    platform::{
        BindingObserver, Clock, ProviderChooser, ProviderInfoRetriever, Scheduler, TimerToken,
        WatchFaceComponent, WatchFaceHost,
    },
};

pub const COMPONENT: WatchFaceComponent = WatchFaceComponent {
    package: "test",
    name: "Face",
};

static PROVIDER_ICON: [u8; 8] = [0xF8, 0x00, 0xF8, 0x00, 0xF8, 0x00, 0xF8, 0x00];

pub fn provider(name: &str) -> ProviderInfo {
    ProviderInfo::new(
        "Provider App",
        name,
        Icon::new(&PROVIDER_ICON, 2),
        ComplicationType::ShortText,
    )
}

pub struct MockHost {
    pub now: i64,
    pub offset: FixedOffset,
    pub active: Vec<ComplicationId>,
    pub redraws: usize,
    pub scheduled: Option<(TimerToken, Duration)>,
    pub cancelled: Vec<TimerToken>,
    pub tz_registered: bool,
    pub tz_registrations: usize,
    pub sent_actions: Vec<TapAction>,
    /// Actions the provider revoked
    pub stale_actions: Vec<TapAction>,
    pub permission_requests: usize,
}

impl Default for MockHost {
    fn default() -> Self {
        Self {
            now: 0,
            offset: Utc.fix(),
            active: Vec::new(),
            redraws: 0,
            scheduled: None,
            cancelled: Vec::new(),
            tz_registered: false,
            tz_registrations: 0,
            sent_actions: Vec::new(),
            stale_actions: Vec::new(),
            permission_requests: 0,
        }
    }
}

impl MockHost {
    /// The one-shot wake-up for `token` went off
    pub fn fire(&mut self, token: TimerToken) {
        if matches!(self.scheduled, Some((scheduled, _)) if scheduled == token) {
            self.scheduled = None;
        }
    }
}

impl Clock for MockHost {
    fn now_millis(&self) -> i64 {
        self.now
    }

    fn local_offset(&self) -> FixedOffset {
        self.offset
    }
}

impl Scheduler for MockHost {
    fn schedule_wake(&mut self, token: TimerToken, delay: Duration) {
        self.scheduled = Some((token, delay));
    }

    fn cancel_wake(&mut self, token: TimerToken) {
        self.fire(token);
        self.cancelled.push(token);
    }
}

impl WatchFaceHost for MockHost {
    fn set_active_complications(&mut self, ids: &[ComplicationId]) {
        self.active = ids.to_vec();
    }

    fn request_redraw(&mut self) {
        self.redraws += 1;
    }

    fn register_time_zone_receiver(&mut self) {
        self.tz_registered = true;
        self.tz_registrations += 1;
    }

    fn unregister_time_zone_receiver(&mut self) {
        self.tz_registered = false;
    }

    fn send_tap_action(&mut self, action: TapAction) -> Result<(), Error> {
        if self.stale_actions.contains(&action) {
            return Err(Error::StaleTapAction);
        }
        self.sent_actions.push(action);
        Ok(())
    }

    fn launch_permission_request(&mut self, _component: &WatchFaceComponent) {
        self.permission_requests += 1;
    }
}

#[derive(Default)]
pub struct RecordingChooser {
    pub launches: Vec<(ComplicationId, Vec<ComplicationType>, u32)>,
}

impl ProviderChooser for RecordingChooser {
    fn launch_provider_chooser(
        &mut self,
        _component: &WatchFaceComponent,
        id: ComplicationId,
        supported_types: &[ComplicationType],
        request_code: u32,
    ) {
        self.launches
            .push((id, supported_types.to_vec(), request_code));
    }
}

#[derive(Debug, Default, Clone)]
pub struct RetrieverLog {
    pub inits: usize,
    pub releases: usize,
    pub queries: Vec<Vec<ComplicationId>>,
}

/// Retriever whose clones share one log, so it can be inspected after the
/// surface dropped its copy
#[derive(Default, Clone)]
pub struct RecordingRetriever {
    log: Rc<RefCell<RetrieverLog>>,
}

impl RecordingRetriever {
    pub fn log(&self) -> RetrieverLog {
        self.log.borrow().clone()
    }
}

impl ProviderInfoRetriever for RecordingRetriever {
    fn init(&mut self) {
        self.log.borrow_mut().inits += 1;
    }

    fn retrieve_provider_info(&mut self, _component: &WatchFaceComponent, ids: &[ComplicationId]) {
        self.log.borrow_mut().queries.push(ids.to_vec());
    }

    fn release(&mut self) {
        self.log.borrow_mut().releases += 1;
    }
}

#[derive(Default)]
pub struct RecordingObserver {
    pub changes: Vec<(ComplicationId, Option<ProviderInfo>)>,
}

impl BindingObserver for RecordingObserver {
    fn on_binding_changed(&mut self, id: ComplicationId, info: Option<&ProviderInfo>) {
        self.changes.push((id, info.cloned()));
    }
}

/// Rgb565 frame buffer that starts out black
#[derive(Debug, Clone, PartialEq)]
pub struct Framebuffer {
    size: Size,
    pixels: Vec<Rgb565>,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: Size::new(width, height),
            pixels: vec![Rgb565::BLACK; (width * height) as usize],
        }
    }

    pub fn pixel(&self, point: Point) -> Rgb565 {
        self.pixels[self.index(point).expect("point outside framebuffer")]
    }

    pub fn count(&self, color: Rgb565) -> usize {
        self.pixels.iter().filter(|&&c| c == color).count()
    }

    /// Smallest x of any pixel painted `color`
    pub fn leftmost(&self, color: Rgb565) -> Option<i32> {
        let width = self.size.width as usize;
        self.pixels
            .iter()
            .enumerate()
            .filter(|(_, &c)| c == color)
            .map(|(index, _)| (index % width) as i32)
            .min()
    }

    fn index(&self, point: Point) -> Option<usize> {
        let x = usize::try_from(point.x).ok()?;
        let y = usize::try_from(point.y).ok()?;
        let width = self.size.width as usize;
        (x < width && y < self.size.height as usize).then_some(y * width + x)
    }
}

impl OriginDimensions for Framebuffer {
    fn size(&self) -> Size {
        self.size
    }
}

impl DrawTarget for Framebuffer {
    type Color = Rgb565;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let Some(index) = self.index(point) {
                self.pixels[index] = color;
            }
        }
        Ok(())
    }
}
