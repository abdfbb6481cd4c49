//! Placement of the complications on the face

use embedded_graphics::{
    geometry::{Point, Size},
    primitives::Rectangle,
};

use crate::{
    complication::registry::{Slot, SLOT_COUNT},
    system::config::WatchFaceConfig,
};

/// Bounds of each slot's complication, in [`Slot::ALL`] order
///
/// Most watches have square surfaces so only the width is used. Both
/// complications share a row below the time text and mirror each other
/// around the vertical center line.
pub fn complication_bounds(surface: Size, config: &WatchFaceConfig) -> [Rectangle; SLOT_COUNT] {
    let width = surface.width as i32;
    let size = width
        .checked_div(config.complication_divisor as i32)
        .unwrap_or(0)
        .max(0);
    let midpoint = width / 2;

    let horizontal_offset = (midpoint - size) / 2;
    let vertical_offset = midpoint + config.complication_y_shift - size / 2;

    Slot::ALL.map(|slot| {
        let left = match slot {
            Slot::Left => horizontal_offset,
            Slot::Right => midpoint + horizontal_offset,
        };
        Rectangle::new(
            Point::new(left, vertical_offset),
            Size::new(size as u32, size as u32),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complications_take_a_fifth_of_the_width() {
        let config = WatchFaceConfig::default();
        let [left, right] = complication_bounds(Size::new(400, 400), &config);

        assert_eq!(left.size, Size::new(80, 80));
        assert_eq!(right.size, left.size);
        assert_eq!(left.top_left, Point::new(60, 240));
        // Mirrored around x = 200
        assert_eq!(400 - (left.top_left.x + left.size.width as i32), right.top_left.x);
        assert_eq!(left.top_left.y, right.top_left.y);
    }

    #[test]
    fn divisor_is_configurable() {
        let config = WatchFaceConfig {
            complication_divisor: 4,
            ..Default::default()
        };
        let [left, right] = complication_bounds(Size::new(240, 240), &config);

        assert_eq!(left.size.width, 60);
        assert_eq!(left.top_left, Point::new(30, 170));
        assert_eq!(right.top_left, Point::new(150, 170));
    }

    #[test]
    fn zero_divisor_collapses_bounds() {
        let config = WatchFaceConfig {
            complication_divisor: 0,
            ..Default::default()
        };
        let [left, _] = complication_bounds(Size::new(240, 240), &config);
        assert_eq!(left.size, Size::zero());
    }
}
