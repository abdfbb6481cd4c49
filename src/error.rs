//! Error type shared by the watch face components

use crate::complication::registry::ComplicationId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Identifier that is not part of the complication registry
    #[error("complication {0} is not handled by this watch face")]
    UnknownComplication(ComplicationId),
    /// The provider revoked the tap action before it could be sent
    #[error("tap action is no longer valid")]
    StaleTapAction,
    /// Formatted text did not fit into its buffer
    #[error("text does not fit into its buffer")]
    TextOverflow,
    /// The event queue has no free slot left
    #[error("event queue is full")]
    QueueFull,
}

impl From<core::fmt::Error> for Error {
    fn from(_: core::fmt::Error) -> Self {
        Error::TextOverflow
    }
}
