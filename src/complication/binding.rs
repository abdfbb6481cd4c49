//! Selection of complication data providers

use super::{
    data::ProviderInfo,
    registry::{self, ComplicationId, Slot},
};
use crate::platform::{BindingObserver, ProviderChooser, WatchFaceComponent};

/// Request code the chooser result is tagged with
pub const COMPLICATION_CONFIG_REQUEST_CODE: u32 = 1001;

/// Outcome reported by the provider chooser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SelectionStatus {
    Success,
    Cancelled,
}

/// Two step handshake between the user, the chooser and the watch face
///
/// At most one selection is outstanding. Starting a new one before the last
/// one completed replaces it.
#[derive(Debug, Default)]
pub struct ComplicationProviderBinding {
    /// Complication the chooser was opened for
    pending: Option<ComplicationId>,
}

impl ComplicationProviderBinding {
    pub const fn new() -> Self {
        Self { pending: None }
    }

    /// Complication waiting for a chooser result
    pub fn pending(&self) -> Option<ComplicationId> {
        self.pending
    }

    /// Open the chooser for `slot`, limited to the types the slot supports
    pub fn begin_selection<C>(
        &mut self,
        slot: Slot,
        chooser: &mut C,
        component: &WatchFaceComponent,
    ) where
        C: ProviderChooser + ?Sized,
    {
        let id = registry::identifier_for(slot);
        if !registry::is_registered(id) {
            warn!("Complication {} not supported by watch face", id);
            return;
        }

        chooser.launch_provider_chooser(
            component,
            id,
            registry::supported_types_for(slot),
            COMPLICATION_CONFIG_REQUEST_CODE,
        );
        if let Some(previous) = self.pending.replace(id) {
            debug!("Selection for {} replaced by {}", previous, id);
        }
    }

    /// Hand the chooser result to `observer`
    ///
    /// Anything but a successful selection with provider info reverts the
    /// complication to its placeholder.
    pub fn complete_selection<O>(
        &mut self,
        status: SelectionStatus,
        info: Option<&ProviderInfo>,
        observer: &mut O,
    ) where
        O: BindingObserver + ?Sized,
    {
        let Some(id) = self.pending.take() else {
            debug!("Chooser result without pending selection");
            return;
        };

        let info = match status {
            SelectionStatus::Success => info,
            SelectionStatus::Cancelled => None,
        };
        info!("Provider for {} selected: {}", id, info.is_some());
        observer.on_binding_changed(id, info);
    }
}
