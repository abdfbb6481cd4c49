//! Digital watch face with two user-configurable complications.
//!
//! The crate is hardware independent: the host (firmware or simulator)
//! forwards its lifecycle callbacks into [`RenderEngine`], supplies the
//! services listed in [`platform`] and hands over a `DrawTarget` when a frame
//! has to be painted. The companion [`ConfigurationSurface`] lets the user
//! pick a data provider per slot.

#![cfg_attr(not(test), no_std)]

// Must come first so the logging macros are visible to all modules
#[macro_use]
mod fmt;

pub mod complication;
pub mod engine;
pub mod error;
pub mod platform;
pub mod system;
pub mod ui;

#[cfg(test)]
mod testing;

pub use complication::{
    binding::{ComplicationProviderBinding, SelectionStatus},
    data::{ComplicationData, ComplicationType, Icon, ProviderInfo, RangedValue, TapAction},
    registry::{ComplicationId, Slot},
};
pub use engine::{DisplayMode, RenderEngine, TapKind};
pub use error::Error;
pub use platform::{
    BindingObserver, Clock, ProviderChooser, ProviderInfoRetriever, Scheduler, TimerToken,
    WatchFaceComponent, WatchFaceHost,
};
pub use system::config::WatchFaceConfig;
pub use ui::config_surface::ConfigurationSurface;
