//! Configuration screen for choosing complication providers
//!
//! Shows one click target per slot. A slot with a provider shows the
//! provider's icon on a highlighted background, an empty slot shows the
//! "add complication" glyph. Clicking a target opens the provider chooser.

use embedded_graphics::{
    image::{Image, ImageRaw},
    pixelcolor::Rgb565,
    prelude::*,
    primitives::{Circle, ContainsPoint, Line, PrimitiveStyle, Rectangle},
};

use super::layout;
use crate::{
    complication::{
        binding::{ComplicationProviderBinding, SelectionStatus, COMPLICATION_CONFIG_REQUEST_CODE},
        data::{Icon, ProviderInfo},
        registry::{self, ComplicationId, Slot, SLOT_COUNT},
    },
    platform::{BindingObserver, ProviderChooser, ProviderInfoRetriever},
    system::config::WatchFaceConfig,
};

/// Image shown in a slot's click target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewIcon {
    /// No provider chosen yet
    AddComplication,
    /// Icon of the bound provider
    Provider(Icon),
}

/// Visible state of one click target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotPreview {
    pub icon: PreviewIcon,
    pub background_visible: bool,
}

impl SlotPreview {
    const PLACEHOLDER: SlotPreview = SlotPreview {
        icon: PreviewIcon::AddComplication,
        background_visible: false,
    };
}

/// Previews of all slots
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplicationPreviews {
    slots: [SlotPreview; SLOT_COUNT],
}

impl Default for ComplicationPreviews {
    fn default() -> Self {
        Self {
            slots: [SlotPreview::PLACEHOLDER; SLOT_COUNT],
        }
    }
}

impl ComplicationPreviews {
    pub fn get(&self, slot: Slot) -> &SlotPreview {
        &self.slots[slot_index(slot)]
    }

    /// Show `info`'s icon for `id`, or the placeholder when there is none
    pub fn update_complication_view(&mut self, id: ComplicationId, info: Option<&ProviderInfo>) {
        let Some(slot) = registry::slot_for(id) else {
            warn!("No preview for complication {}", id);
            return;
        };
        debug!("Updating preview of {}: {}", id, info.is_some());

        self.slots[slot_index(slot)] = match info {
            Some(info) => SlotPreview {
                icon: PreviewIcon::Provider(info.icon),
                background_visible: true,
            },
            None => SlotPreview::PLACEHOLDER,
        };
    }
}

impl BindingObserver for ComplicationPreviews {
    fn on_binding_changed(&mut self, id: ComplicationId, info: Option<&ProviderInfo>) {
        self.update_complication_view(id, info);
    }
}

/// Hands a binding change to the previews and to the face's observer
struct Notify<'a, O: ?Sized> {
    previews: &'a mut ComplicationPreviews,
    observer: &'a mut O,
}

impl<O: BindingObserver + ?Sized> BindingObserver for Notify<'_, O> {
    fn on_binding_changed(&mut self, id: ComplicationId, info: Option<&ProviderInfo>) {
        self.previews.on_binding_changed(id, info);
        self.observer.on_binding_changed(id, info);
    }
}

/// Open provider lookup channel, released when dropped
struct ProviderInfoChannel<R: ProviderInfoRetriever> {
    retriever: R,
}

impl<R: ProviderInfoRetriever> ProviderInfoChannel<R> {
    fn open(mut retriever: R) -> Self {
        retriever.init();
        Self { retriever }
    }
}

impl<R: ProviderInfoRetriever> Drop for ProviderInfoChannel<R> {
    fn drop(&mut self) {
        self.retriever.release();
    }
}

/// Configuration screen state
pub struct ConfigurationSurface<C, R>
where
    C: ProviderChooser,
    R: ProviderInfoRetriever,
{
    config: WatchFaceConfig,
    chooser: C,
    /// Only open while the surface is active
    channel: Option<ProviderInfoChannel<R>>,
    binding: ComplicationProviderBinding,
    previews: ComplicationPreviews,
    /// Click targets, in [`Slot::ALL`] order
    targets: [Rectangle; SLOT_COUNT],
}

impl<C, R> ConfigurationSurface<C, R>
where
    C: ProviderChooser,
    R: ProviderInfoRetriever,
{
    pub fn new(config: WatchFaceConfig, chooser: C) -> Self {
        Self {
            config,
            chooser,
            channel: None,
            binding: ComplicationProviderBinding::new(),
            previews: ComplicationPreviews::default(),
            targets: [Rectangle::zero(); SLOT_COUNT],
        }
    }

    /// Open the lookup channel and ask for the current provider of every
    /// slot
    pub fn activate(&mut self, retriever: R) {
        // Release a channel left over from an earlier activation first
        self.channel = None;
        self.previews = ComplicationPreviews::default();

        let channel = self.channel.insert(ProviderInfoChannel::open(retriever));
        channel
            .retriever
            .retrieve_provider_info(&self.config.component, registry::all_identifiers());
        info!("Configuration surface active");
    }

    /// Release the lookup channel and forget an unfinished selection
    pub fn deactivate(&mut self) {
        self.channel = None;
        self.binding = ComplicationProviderBinding::new();
        info!("Configuration surface inactive");
    }

    pub fn is_active(&self) -> bool {
        self.channel.is_some()
    }

    /// Answer of the lookup started by [`activate`](Self::activate)
    pub fn on_provider_info_received(&mut self, id: ComplicationId, info: Option<&ProviderInfo>) {
        if !self.is_active() {
            debug!("Dropping provider info for {} after release", id);
            return;
        }
        self.previews.update_complication_view(id, info);
    }

    /// Open the provider chooser for `slot`
    pub fn on_slot_clicked(&mut self, slot: Slot) {
        if !self.is_active() {
            debug!("Ignoring click on {} while inactive", slot);
            return;
        }
        info!("{} complication clicked", slot);
        self.binding
            .begin_selection(slot, &mut self.chooser, &self.config.component);
    }

    /// Route a tap to the click target under `point`
    pub fn on_tap(&mut self, point: Point) -> Option<Slot> {
        if !self.is_active() {
            return None;
        }
        let slot = Slot::ALL
            .into_iter()
            .zip(self.targets)
            .find(|(_, target)| target.contains(point))
            .map(|(slot, _)| slot)?;
        self.on_slot_clicked(slot);
        Some(slot)
    }

    /// Result of the chooser opened by [`on_slot_clicked`](Self::on_slot_clicked)
    ///
    /// The previews and `observer` (usually the face's
    /// [`RenderEngine`](crate::RenderEngine)) both learn the new binding.
    pub fn on_chooser_result<O>(
        &mut self,
        request_code: u32,
        status: SelectionStatus,
        info: Option<&ProviderInfo>,
        observer: &mut O,
    ) where
        O: BindingObserver + ?Sized,
    {
        if request_code != COMPLICATION_CONFIG_REQUEST_CODE {
            return;
        }
        let mut notify = Notify {
            previews: &mut self.previews,
            observer,
        };
        self.binding.complete_selection(status, info, &mut notify);
    }

    /// Lay out the click targets like the complications on the face
    pub fn on_surface_changed(&mut self, width: u32, height: u32) {
        self.targets = layout::complication_bounds(Size::new(width, height), &self.config);
    }

    pub fn preview(&self, slot: Slot) -> &SlotPreview {
        self.previews.get(slot)
    }

    pub fn pending_selection(&self) -> Option<ComplicationId> {
        self.binding.pending()
    }

    pub fn target(&self, slot: Slot) -> Rectangle {
        self.targets[slot_index(slot)]
    }

    pub fn chooser(&self) -> &C {
        &self.chooser
    }

    /// Paint both click targets
    pub fn draw<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        target.clear(self.config.background_color)?;

        for slot in Slot::ALL {
            let bounds = self.target(slot);
            let diameter = bounds.size.width.min(bounds.size.height);
            if diameter == 0 {
                continue;
            }
            let preview = self.preview(slot);
            let center = bounds.center();

            if preview.background_visible {
                Circle::with_center(center, diameter)
                    .into_styled(PrimitiveStyle::with_fill(self.config.complication_background))
                    .draw(target)?;
            }

            match preview.icon {
                PreviewIcon::Provider(icon) => {
                    let raw = ImageRaw::<Rgb565>::new(icon.data, icon.width);
                    let size = raw.size();
                    let top_left =
                        center - Point::new(size.width as i32 / 2, size.height as i32 / 2);
                    Image::new(&raw, top_left).draw(target)?;
                }
                PreviewIcon::AddComplication => {
                    let arm = (diameter / 4) as i32;
                    let style = PrimitiveStyle::with_stroke(self.config.complication_color, 3);
                    Line::new(center - Point::new(arm, 0), center + Point::new(arm, 0))
                        .into_styled(style)
                        .draw(target)?;
                    Line::new(center - Point::new(0, arm), center + Point::new(0, arm))
                        .into_styled(style)
                        .draw(target)?;
                }
            }
        }
        Ok(())
    }
}

fn slot_index(slot: Slot) -> usize {
    match slot {
        Slot::Left => 0,
        Slot::Right => 1,
    }
}
