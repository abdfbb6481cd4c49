//! Render engine of the digital watch face
//!
//! The engine is a small state machine driven by host callbacks. It keeps
//! track of the display mode (interactive or ambient), whether the face is on
//! screen, the complication data pushed by providers and where each
//! complication is drawn. While the face is visible and interactive it keeps
//! a one-shot wake-up armed at the next whole second so the seconds advance.
//! In ambient mode the host's minute tick is the only redraw source.
//!
//! All callbacks are delivered one after another from a single queue, so the
//! engine owns its state without any locking.

use embassy_time::Duration;
use embedded_graphics::{
    pixelcolor::{Rgb565, RgbColor},
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle},
};
use heapless::LinearMap;

use crate::{
    complication::{
        data::{ComplicationData, ComplicationType, ProviderInfo},
        registry::{self, ComplicationId, Slot, SLOT_COUNT},
    },
    error::Error,
    platform::{BindingObserver, TimerToken, WatchFaceHost},
    system::{config::WatchFaceConfig, queue::EngineEvent, time::WallClock},
    ui::{
        label::{TextPaint, TimeLabel},
        layout,
        visual::ComplicationVisual,
    },
};

/// Display mode toggled by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayMode {
    Interactive,
    /// Low power mode with reduced redraws and simplified styling
    Ambient,
}

/// Kind of touch event reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TapKind {
    /// Finger down
    Touch,
    /// Gesture turned into something else, e.g. a swipe
    TouchCancel,
    /// Completed tap, the only actionable kind
    Tap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
enum Lifecycle {
    New,
    Created,
    Destroyed,
}

/// Watch face engine
pub struct RenderEngine<H: WatchFaceHost> {
    host: H,
    config: WatchFaceConfig,
    lifecycle: Lifecycle,

    mode: DisplayMode,
    visible: bool,
    /// Display only shows full intensity pixels while ambient
    low_bit_ambient: bool,
    /// Display needs mostly dark pixels while ambient
    burn_in_protection: bool,
    time_zone_registered: bool,

    clock: WallClock,
    text_paint: TextPaint,
    time_label: TimeLabel,

    /// Latest data per complication, absent until a provider delivers
    bindings: LinearMap<ComplicationId, ComplicationData, SLOT_COUNT>,
    visuals: LinearMap<ComplicationId, ComplicationVisual, SLOT_COUNT>,

    /// Token of the armed wake-up
    timer: Option<TimerToken>,
    last_token: u32,
}

impl<H: WatchFaceHost> RenderEngine<H> {
    pub fn new(host: H, config: WatchFaceConfig) -> Self {
        Self {
            host,
            lifecycle: Lifecycle::New,
            mode: DisplayMode::Interactive,
            visible: false,
            low_bit_ambient: false,
            burn_in_protection: false,
            time_zone_registered: false,
            clock: WallClock::default(),
            text_paint: default_paint(&config),
            time_label: TimeLabel::new(),
            bindings: LinearMap::new(),
            visuals: LinearMap::new(),
            timer: None,
            last_token: 0,
            config,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_timer_running(&self) -> bool {
        self.timer.is_some()
    }

    pub fn text_paint(&self) -> &TextPaint {
        &self.text_paint
    }

    pub fn clock(&self) -> &WallClock {
        &self.clock
    }

    /// Latest data for `id`, `None` while the slot shows its placeholder
    pub fn binding(&self, id: ComplicationId) -> Option<&ComplicationData> {
        self.bindings.get(&id)
    }

    pub fn visual(&self, id: ComplicationId) -> Option<&ComplicationVisual> {
        self.visuals.get(&id)
    }

    /// Dispatch one queued host event
    pub fn handle(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::Create => self.on_create(),
            EngineEvent::Destroy => self.on_destroy(),
            EngineEvent::PropertiesChanged {
                low_bit_ambient,
                burn_in_protection,
            } => self.on_properties_changed(low_bit_ambient, burn_in_protection),
            EngineEvent::ComplicationData { id, data } => self.on_complication_data_update(id, data),
            EngineEvent::AmbientModeChanged(ambient) => self.on_ambient_mode_changed(ambient),
            EngineEvent::VisibilityChanged(visible) => self.on_visibility_changed(visible),
            EngineEvent::SurfaceChanged { width, height } => self.on_surface_changed(width, height),
            EngineEvent::ApplyInsets { round } => self.on_apply_insets(round),
            EngineEvent::TimeTick => self.on_time_tick(),
            EngineEvent::TimeZoneChanged => self.on_time_zone_changed(),
            EngineEvent::Tap { kind, x, y, time } => {
                self.on_tap_command(kind, x, y, time);
            }
            EngineEvent::TimerFired(token) => self.on_timer_fired(token),
        }
    }

    /// Set up styles, clock and complications
    pub fn on_create(&mut self) {
        if self.lifecycle != Lifecycle::New {
            warn!("Engine already created ({})", self.lifecycle);
            return;
        }

        self.text_paint = default_paint(&self.config);
        self.clock = WallClock::new(self.host.now_millis(), self.host.local_offset());
        self.initialize_complications();
        self.lifecycle = Lifecycle::Created;
    }

    fn initialize_complications(&mut self) {
        debug!("Initializing complications");
        self.bindings.clear();
        self.visuals.clear();
        for &id in registry::all_identifiers() {
            if self.visuals.insert(id, ComplicationVisual::new()).is_err() {
                error!("No room for complication {}", id);
            }
        }
        self.host.set_active_complications(registry::all_identifiers());
    }

    /// Stop the timer for good; later callbacks are ignored
    pub fn on_destroy(&mut self) {
        self.cancel_timer();
        self.unregister_receiver();
        self.lifecycle = Lifecycle::Destroyed;
        info!("Engine destroyed");
    }

    /// Latch the display capabilities
    pub fn on_properties_changed(&mut self, low_bit_ambient: bool, burn_in_protection: bool) {
        if !self.is_running() {
            return;
        }
        self.low_bit_ambient = low_bit_ambient;
        self.burn_in_protection = burn_in_protection;
        for (_, visual) in self.visuals.iter_mut() {
            visual.set_low_bit_ambient(low_bit_ambient);
            visual.set_burn_in_protection(burn_in_protection);
        }
    }

    /// Replace the data of `id`; `None` removes it
    pub fn on_complication_data_update(&mut self, id: ComplicationId, data: Option<ComplicationData>) {
        if !self.is_running() {
            return;
        }
        debug!("Complication data update for {}", id);
        if let Err(e) = self.replace_binding(id, data) {
            warn!("Ignoring complication data: {}", e);
            return;
        }
        self.host.request_redraw();
    }

    fn replace_binding(&mut self, id: ComplicationId, data: Option<ComplicationData>) -> Result<(), Error> {
        if !self.visuals.contains_key(&id) {
            return Err(Error::UnknownComplication(id));
        }
        match data {
            Some(data) => {
                self.bindings
                    .insert(id, data)
                    .map_err(|_| Error::UnknownComplication(id))?;
            }
            None => {
                self.bindings.remove(&id);
            }
        }
        Ok(())
    }

    pub fn on_ambient_mode_changed(&mut self, ambient: bool) {
        if !self.is_running() {
            return;
        }
        self.mode = if ambient {
            DisplayMode::Ambient
        } else {
            DisplayMode::Interactive
        };

        if self.low_bit_ambient {
            self.text_paint.anti_alias = !ambient;
        }
        for (_, visual) in self.visuals.iter_mut() {
            visual.set_in_ambient_mode(ambient);
        }

        // The timer depends on the mode as well as on visibility
        self.update_timer();
        self.host.request_redraw();
    }

    pub fn on_visibility_changed(&mut self, visible: bool) {
        if !self.is_running() {
            return;
        }
        self.visible = visible;

        if visible {
            self.register_receiver();
            // The time zone may have changed while hidden
            self.clock.set_offset(self.host.local_offset());
            self.host.request_redraw();
        } else {
            self.unregister_receiver();
        }

        self.update_timer();
    }

    /// Time zone change notification
    pub fn on_time_zone_changed(&mut self) {
        if !self.is_running() || !self.time_zone_registered {
            return;
        }
        self.clock.set_offset(self.host.local_offset());
        self.host.request_redraw();
    }

    /// Lay out the complications for a new surface size
    pub fn on_surface_changed(&mut self, width: u32, height: u32) {
        if !self.is_running() {
            return;
        }
        let bounds = layout::complication_bounds(Size::new(width, height), &self.config);
        for (slot, bounds) in Slot::ALL.into_iter().zip(bounds) {
            if let Some(visual) = self.visuals.get_mut(&slot.complication_id()) {
                visual.set_bounds(bounds);
            }
        }
        debug!("Surface changed to {}x{}", width, height);
    }

    /// Pick the text variant for round or rectangular screens
    pub fn on_apply_insets(&mut self, round: bool) {
        if !self.is_running() {
            return;
        }
        if round {
            self.text_paint.font = self.config.font_round;
            self.text_paint.x_offset = self.config.x_offset_round;
        } else {
            self.text_paint.font = self.config.font_rect;
            self.text_paint.x_offset = self.config.x_offset_rect;
        }
    }

    /// Minute tick of the host, the redraw source in ambient mode
    pub fn on_time_tick(&mut self) {
        if self.is_running() {
            self.host.request_redraw();
        }
    }

    /// Route a completed tap to the complication under it
    ///
    /// Returns the tapped complication, if any.
    pub fn on_tap_command(&mut self, kind: TapKind, x: i32, y: i32, time: i64) -> Option<ComplicationId> {
        if !self.is_running() || kind != TapKind::Tap {
            return None;
        }
        let id = self.tapped_complication(Point::new(x, y), time)?;
        self.on_complication_tap(id);
        Some(id)
    }

    /// First complication in registry order that accepts a tap at `point`
    fn tapped_complication(&self, point: Point, time: i64) -> Option<ComplicationId> {
        for &id in registry::all_identifiers() {
            let Some(data) = self.bindings.get(&id) else {
                continue;
            };
            if !data.accepts_tap(time) {
                continue;
            }
            let Some(visual) = self.visuals.get(&id) else {
                error!("Not a recognized complication id: {}", id);
                continue;
            };
            if visual.bounds().size.width == 0 {
                error!("Complication {} has not been laid out", id);
                continue;
            }
            if visual.contains(point) {
                return Some(id);
            }
        }
        None
    }

    fn on_complication_tap(&mut self, id: ComplicationId) {
        let Some(data) = self.bindings.get(&id) else {
            debug!("No tap action for complication {}", id);
            return;
        };

        if let Some(action) = data.tap_action() {
            if let Err(e) = self.host.send_tap_action(action) {
                error!("Tap action of complication {} failed: {}", id, e);
            }
        } else if data.kind() == ComplicationType::NoPermission {
            info!("Requesting complication permission");
            self.host.launch_permission_request(&self.config.component);
        }
    }

    /// Wake-up scheduled by the engine itself
    pub fn on_timer_fired(&mut self, token: TimerToken) {
        if self.timer != Some(token) {
            trace!("Ignoring outdated timer {}", token);
            return;
        }
        self.timer = None;
        self.host.request_redraw();
        if self.should_timer_be_running() {
            self.schedule_timer();
        }
    }

    /// Draw a frame into `target`, filling `bounds`
    pub fn on_draw<D>(&mut self, target: &mut D, bounds: Rectangle) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let ambient = self.mode == DisplayMode::Ambient;

        // Background
        if ambient {
            target.clear(Rgb565::BLACK)?;
        } else {
            Rectangle::new(Point::zero(), bounds.size)
                .into_styled(PrimitiveStyle::with_fill(self.config.background_color))
                .draw(target)?;
        }

        // Same instant for the text and the complications' activity checks
        let now = self.host.now_millis();
        self.clock.refresh(now);

        self.time_label.draw(
            target,
            self.clock.local_time(),
            ambient,
            &self.text_paint,
            bounds.center(),
        )?;

        for id in registry::all_identifiers() {
            if let Some(visual) = self.visuals.get(id) {
                visual.draw(target, self.bindings.get(id), now, &self.config)?;
            }
        }
        Ok(())
    }

    fn is_running(&self) -> bool {
        if self.lifecycle != Lifecycle::Created {
            trace!("Callback ignored while {}", self.lifecycle);
            return false;
        }
        true
    }

    fn register_receiver(&mut self) {
        if self.time_zone_registered {
            return;
        }
        self.time_zone_registered = true;
        self.host.register_time_zone_receiver();
    }

    fn unregister_receiver(&mut self) {
        if !self.time_zone_registered {
            return;
        }
        self.time_zone_registered = false;
        self.host.unregister_time_zone_receiver();
    }

    /// The timer runs only while visible and interactive
    fn should_timer_be_running(&self) -> bool {
        self.lifecycle == Lifecycle::Created
            && self.visible
            && self.mode == DisplayMode::Interactive
    }

    /// Start or stop the timer as the current state requires
    fn update_timer(&mut self) {
        self.cancel_timer();
        if self.should_timer_be_running() {
            self.schedule_timer();
        }
    }

    fn cancel_timer(&mut self) {
        if let Some(token) = self.timer.take() {
            self.host.cancel_wake(token);
        }
    }

    /// Arm a wake-up at the next multiple of the update rate
    fn schedule_timer(&mut self) {
        let rate = (self.config.interactive_update_rate.as_millis() as i64).max(1);
        let delay = rate - self.host.now_millis().rem_euclid(rate);

        self.last_token = self.last_token.wrapping_add(1);
        let token = TimerToken(self.last_token);
        self.host
            .schedule_wake(token, Duration::from_millis(delay as u64));
        self.timer = Some(token);
    }
}

impl<H: WatchFaceHost> BindingObserver for RenderEngine<H> {
    /// A removed provider clears the slot at once, a new one only needs a
    /// redraw since its data arrives by push
    fn on_binding_changed(&mut self, id: ComplicationId, info: Option<&ProviderInfo>) {
        if info.is_none() {
            self.on_complication_data_update(id, None);
        } else if self.is_running() {
            self.host.request_redraw();
        }
    }
}

fn default_paint(config: &WatchFaceConfig) -> TextPaint {
    TextPaint {
        font: config.font_rect,
        color: config.text_color,
        x_offset: config.x_offset_rect,
        anti_alias: true,
    }
}
