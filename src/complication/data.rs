//! Complication payloads delivered by data providers

use heapless::String;

/// Maximum length of short text shown inside a complication
pub const SHORT_TEXT_LEN: usize = 16;
/// Maximum length of provider names
pub const NAME_LEN: usize = 32;

/// Kind of data carried by a complication payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ComplicationType {
    RangedValue,
    ShortText,
    LongText,
    Icon,
    SmallImage,
    LargeImage,
    /// Provider is set but has nothing to show right now
    NoData,
    /// No provider chosen for the slot
    NotConfigured,
    /// Provider deliberately shows nothing
    Empty,
    /// The watch face is not allowed to receive this provider's data
    NoPermission,
}

impl ComplicationType {
    /// Kinds that represent "nothing to show" and are never tappable
    pub fn is_placeholder(self) -> bool {
        matches!(
            self,
            ComplicationType::NoData | ComplicationType::NotConfigured | ComplicationType::Empty
        )
    }
}

/// Raw big endian Rgb565 image supplied by a provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Icon {
    pub data: &'static [u8],
    pub width: u32,
}

impl Icon {
    pub const fn new(data: &'static [u8], width: u32) -> Self {
        Self { data, width }
    }
}

/// Handle of an action registered by the provider, sent when the
/// complication is tapped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TapAction(pub u32);

/// Progress style value, e.g. battery level
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RangedValue {
    pub value: f32,
    pub min: f32,
    pub max: f32,
}

impl RangedValue {
    /// Position of `value` between `min` and `max`, clamped to 0..=1
    pub fn fraction(&self) -> f32 {
        let span = self.max - self.min;
        if span <= 0.0 {
            return 0.0;
        }
        ((self.value - self.min) / span).clamp(0.0, 1.0)
    }
}

/// Data pushed by the host for one complication
///
/// Replaced as a whole on every update, never edited in place.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplicationData {
    kind: ComplicationType,
    short_text: Option<String<SHORT_TEXT_LEN>>,
    icon: Option<Icon>,
    ranged_value: Option<RangedValue>,
    tap_action: Option<TapAction>,
    /// Start of the validity window in epoch milliseconds
    start_millis: Option<i64>,
    /// End of the validity window in epoch milliseconds
    end_millis: Option<i64>,
}

impl ComplicationData {
    pub fn new(kind: ComplicationType) -> Self {
        Self {
            kind,
            short_text: None,
            icon: None,
            ranged_value: None,
            tap_action: None,
            start_millis: None,
            end_millis: None,
        }
    }

    /// Set the short text, cut off at [`SHORT_TEXT_LEN`] bytes
    pub fn with_short_text(mut self, text: &str) -> Self {
        self.short_text = Some(truncated(text));
        self
    }

    pub fn with_icon(mut self, icon: Icon) -> Self {
        self.icon = Some(icon);
        self
    }

    pub fn with_ranged_value(mut self, value: f32, min: f32, max: f32) -> Self {
        self.ranged_value = Some(RangedValue { value, min, max });
        self
    }

    pub fn with_tap_action(mut self, action: TapAction) -> Self {
        self.tap_action = Some(action);
        self
    }

    /// Limit the payload to `start..=end` (epoch milliseconds)
    pub fn with_validity(mut self, start: Option<i64>, end: Option<i64>) -> Self {
        self.start_millis = start;
        self.end_millis = end;
        self
    }

    pub fn kind(&self) -> ComplicationType {
        self.kind
    }

    pub fn short_text(&self) -> Option<&str> {
        self.short_text.as_deref()
    }

    pub fn icon(&self) -> Option<&Icon> {
        self.icon.as_ref()
    }

    pub fn ranged_value(&self) -> Option<&RangedValue> {
        self.ranged_value.as_ref()
    }

    pub fn tap_action(&self) -> Option<TapAction> {
        self.tap_action
    }

    /// Whether the payload should be shown at `now_millis`
    pub fn is_active(&self, now_millis: i64) -> bool {
        self.start_millis.map_or(true, |start| start <= now_millis)
            && self.end_millis.map_or(true, |end| now_millis <= end)
    }

    /// Whether a tap on this payload may be dispatched at `now_millis`
    pub fn accepts_tap(&self, now_millis: i64) -> bool {
        self.is_active(now_millis) && !self.kind.is_placeholder()
    }
}

/// Description of the provider bound to a complication
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderInfo {
    pub app_name: String<NAME_LEN>,
    pub provider_name: String<NAME_LEN>,
    pub icon: Icon,
    pub complication_type: ComplicationType,
}

impl ProviderInfo {
    pub fn new(
        app_name: &str,
        provider_name: &str,
        icon: Icon,
        complication_type: ComplicationType,
    ) -> Self {
        Self {
            app_name: truncated(app_name),
            provider_name: truncated(provider_name),
            icon,
            complication_type,
        }
    }
}

/// Copy as many whole characters of `text` as fit into `N` bytes
fn truncated<const N: usize>(text: &str) -> String<N> {
    let mut out = String::new();
    for c in text.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_window_is_always_active() {
        let data = ComplicationData::new(ComplicationType::ShortText);
        assert!(data.is_active(i64::MIN));
        assert!(data.is_active(0));
        assert!(data.is_active(i64::MAX));
    }

    #[test]
    fn validity_window_is_inclusive() {
        let data =
            ComplicationData::new(ComplicationType::ShortText).with_validity(Some(100), Some(200));
        assert!(!data.is_active(99));
        assert!(data.is_active(100));
        assert!(data.is_active(200));
        assert!(!data.is_active(201));
    }

    #[test]
    fn placeholder_kinds_never_accept_taps() {
        for kind in [
            ComplicationType::NoData,
            ComplicationType::NotConfigured,
            ComplicationType::Empty,
        ] {
            let data = ComplicationData::new(kind).with_tap_action(TapAction(1));
            assert!(!data.accepts_tap(0));
        }
        let data = ComplicationData::new(ComplicationType::NoPermission);
        assert!(data.accepts_tap(0));
    }

    #[test]
    fn long_text_is_cut_on_char_boundary() {
        let data = ComplicationData::new(ComplicationType::ShortText)
            .with_short_text("ääääääääääääääääää");
        let text = data.short_text().unwrap();
        assert_eq!(text.len(), SHORT_TEXT_LEN);
        assert!(text.chars().all(|c| c == 'ä'));
    }

    #[test]
    fn ranged_fraction_is_clamped() {
        let value = RangedValue {
            value: 150.0,
            min: 0.0,
            max: 100.0,
        };
        assert_eq!(value.fraction(), 1.0);
        let value = RangedValue {
            value: 25.0,
            min: 0.0,
            max: 100.0,
        };
        assert_eq!(value.fraction(), 0.25);
        let empty = RangedValue {
            value: 3.0,
            min: 5.0,
            max: 5.0,
        };
        assert_eq!(empty.fraction(), 0.0);
    }
}
