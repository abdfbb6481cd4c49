//! Services consumed from the host
//!
//! Everything the watch face needs from the outside world goes through the
//! traits in this module: time, wake-up scheduling, complication plumbing and
//! the provider chooser. Firmware implements them on top of its drivers, the
//! tests implement them with recording fakes.

use chrono::FixedOffset;
use embassy_time::Duration;

use crate::{
    complication::{
        data::{ComplicationType, ProviderInfo, TapAction},
        registry::ComplicationId,
    },
    error::Error,
};

/// Identifies the watch face towards the host, e.g. when asking for
/// provider info or permissions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WatchFaceComponent {
    pub package: &'static str,
    pub name: &'static str,
}

/// Handle of one scheduled wake-up
///
/// A token only stays valid until the engine disarms its timer or is
/// destroyed. Firing an outdated token does nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerToken(pub(crate) u32);

/// Wall clock of the host
pub trait Clock {
    /// Current UTC time in milliseconds since the Unix epoch
    fn now_millis(&self) -> i64;
    /// Offset of the time zone currently configured on the device
    fn local_offset(&self) -> FixedOffset;
}

/// One-shot, delay based wake-ups
pub trait Scheduler {
    /// Call back into the engine with `token` after `delay`
    fn schedule_wake(&mut self, token: TimerToken, delay: Duration);
    /// Drop the wake-up scheduled for `token` if it has not fired yet
    fn cancel_wake(&mut self, token: TimerToken);
}

/// Everything the render engine needs from its host
pub trait WatchFaceHost: Clock + Scheduler {
    /// Declare which complications should receive data pushes
    fn set_active_complications(&mut self, ids: &[ComplicationId]);
    /// Ask for a new frame to be drawn
    fn request_redraw(&mut self);
    /// Start delivering time zone change notifications
    fn register_time_zone_receiver(&mut self);
    /// Stop delivering time zone change notifications
    fn unregister_time_zone_receiver(&mut self);
    /// Fire a provider's tap action
    ///
    /// Fails with [`Error::StaleTapAction`] when the provider has revoked it.
    fn send_tap_action(&mut self, action: TapAction) -> Result<(), Error>;
    /// Start the flow that asks the user to grant complication permission
    fn launch_permission_request(&mut self, component: &WatchFaceComponent);
}

/// Launches the host's provider chooser
///
/// The outcome arrives later through
/// [`ConfigurationSurface::on_chooser_result`](crate::ConfigurationSurface::on_chooser_result).
pub trait ProviderChooser {
    fn launch_provider_chooser(
        &mut self,
        component: &WatchFaceComponent,
        id: ComplicationId,
        supported_types: &[ComplicationType],
        request_code: u32,
    );
}

/// Background lookup of the providers currently bound to complications
///
/// Answers arrive through
/// [`ConfigurationSurface::on_provider_info_received`](crate::ConfigurationSurface::on_provider_info_received).
pub trait ProviderInfoRetriever {
    /// Open the lookup channel
    fn init(&mut self);
    /// Query the providers for `ids`, one answer per id
    fn retrieve_provider_info(&mut self, component: &WatchFaceComponent, ids: &[ComplicationId]);
    /// Close the lookup channel, pending answers are dropped
    fn release(&mut self);
}

/// Receives the outcome of a provider selection
pub trait BindingObserver {
    fn on_binding_changed(&mut self, id: ComplicationId, info: Option<&ProviderInfo>);
}
