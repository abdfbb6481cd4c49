//! Fixed complication slots of the watch face

use core::fmt;

use super::data::ComplicationType;

/// Numeric identifier the host uses to address a complication
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ComplicationId(pub u8);

impl fmt::Display for ComplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Placement region on the face that can host a complication
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Slot {
    Left,
    Right,
}

/// Number of complication slots
pub const SLOT_COUNT: usize = 2;

const LEFT_COMPLICATION_ID: ComplicationId = ComplicationId(0);
const RIGHT_COMPLICATION_ID: ComplicationId = ComplicationId(1);

/// All identifiers, in drawing and hit-test order
const COMPLICATION_IDS: [ComplicationId; SLOT_COUNT] =
    [LEFT_COMPLICATION_ID, RIGHT_COMPLICATION_ID];

// Both dials accept the same data types
const LEFT_SUPPORTED_TYPES: [ComplicationType; 4] = [
    ComplicationType::RangedValue,
    ComplicationType::Icon,
    ComplicationType::ShortText,
    ComplicationType::SmallImage,
];
const RIGHT_SUPPORTED_TYPES: [ComplicationType; 4] = [
    ComplicationType::RangedValue,
    ComplicationType::Icon,
    ComplicationType::ShortText,
    ComplicationType::SmallImage,
];

impl Slot {
    /// All slots, in the same order as [`all_identifiers`]
    pub const ALL: [Slot; SLOT_COUNT] = [Slot::Left, Slot::Right];

    pub const fn complication_id(self) -> ComplicationId {
        identifier_for(self)
    }
}

/// Identifier assigned to `slot`
pub const fn identifier_for(slot: Slot) -> ComplicationId {
    match slot {
        Slot::Left => LEFT_COMPLICATION_ID,
        Slot::Right => RIGHT_COMPLICATION_ID,
    }
}

/// Every identifier in use, LEFT first
pub fn all_identifiers() -> &'static [ComplicationId] {
    &COMPLICATION_IDS
}

/// Data types a provider for `slot` may deliver
pub fn supported_types_for(slot: Slot) -> &'static [ComplicationType] {
    match slot {
        Slot::Left => &LEFT_SUPPORTED_TYPES,
        Slot::Right => &RIGHT_SUPPORTED_TYPES,
    }
}

/// Reverse lookup of [`identifier_for`]
pub fn slot_for(id: ComplicationId) -> Option<Slot> {
    Slot::ALL.into_iter().find(|slot| identifier_for(*slot) == id)
}

/// Whether `id` belongs to this watch face
pub fn is_registered(id: ComplicationId) -> bool {
    COMPLICATION_IDS.contains(&id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_are_stable_and_distinct() {
        for slot in Slot::ALL {
            assert_eq!(identifier_for(slot), identifier_for(slot));
            assert_eq!(slot_for(identifier_for(slot)), Some(slot));
        }
        assert_ne!(identifier_for(Slot::Left), identifier_for(Slot::Right));
    }

    #[test]
    fn identifiers_follow_slot_order() {
        let ids: Vec<_> = Slot::ALL.iter().map(|s| s.complication_id()).collect();
        assert_eq!(ids.as_slice(), all_identifiers());
        assert_eq!(all_identifiers(), &[ComplicationId(0), ComplicationId(1)]);
    }

    #[test]
    fn unknown_identifier_has_no_slot() {
        assert_eq!(slot_for(ComplicationId(7)), None);
        assert!(!is_registered(ComplicationId(7)));
    }

    #[test]
    fn dials_accept_the_four_small_types() {
        for slot in Slot::ALL {
            let types = supported_types_for(slot);
            assert_eq!(types.len(), 4);
            assert_eq!(types[0], ComplicationType::RangedValue);
            assert!(!types.contains(&ComplicationType::LongText));
        }
    }
}
