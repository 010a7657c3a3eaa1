//! A single ring slot
//!
//! `CardItem` turns the shared scroll position into this card's pose on the
//! bent ring, recycles it to the opposite end when it leaves the viewport,
//! and keeps the per-card shader inputs (hover blend, clock, speed).

use std::sync::Arc;

use glam::{Vec2, Vec3};
use rand::Rng;

use super::bend::{ArcPose, arc_pose};
use super::camera::{Screen, Viewport};
use super::label::LabelBitmap;
use super::scene_graph::Transform;
use super::scroll::{ScrollDirection, lerp};
use crate::infra::constants::{card as card_cfg, label as label_cfg, motion};
use crate::infra::image_loader::CardImage;

/// Shared per-frame inputs every card lays itself out against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutInput {
    pub current: f32,
    pub direction: ScrollDirection,
    pub viewport: Viewport,
    pub bend: f32,
}

/// Where a card sits this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardPlacement {
    /// Horizontal centre in world units, wraparound applied.
    pub x: f32,
    pub pose: ArcPose,
    /// Whole ring lengths the card has been shifted by.
    pub wrap_laps: i32,
}

#[derive(Debug, Clone)]
pub struct CardItem {
    index: usize,
    item_index: usize,
    ring_len: usize,
    pixel_size: Vec2,
    plane_size: Vec2,
    slot_width: f32,
    ring_width: f32,
    wrap_laps: i32,
    placement: CardPlacement,
    velocity: f32,
    hovered: bool,
    hover_blend: f32,
    time: f32,
    image: Option<Arc<CardImage>>,
    label: Option<Arc<LabelBitmap>>,
}

/// Card size in container pixels: the nominal card scaled by
/// `screen_height / 1500`.
pub fn card_pixel_size(screen: Screen) -> Vec2 {
    let scale = screen.height / card_cfg::REFERENCE_SCREEN_HEIGHT;
    Vec2::new(
        card_cfg::NOMINAL_WIDTH * scale,
        card_cfg::NOMINAL_HEIGHT * scale,
    )
}

/// Card size in world units for the current screen/viewport pair.
pub fn card_plane_size(screen: Screen, viewport: Viewport) -> Vec2 {
    let pixels = card_pixel_size(screen);
    Vec2::new(
        viewport.width * pixels.x / screen.width,
        viewport.height * pixels.y / screen.height,
    )
}

impl CardItem {
    /// `index` is the slot in the doubled ring, `item_index` the input item
    /// it shows.
    pub fn new(
        index: usize,
        item_index: usize,
        ring_len: usize,
        screen: Screen,
        viewport: Viewport,
        label: Option<Arc<LabelBitmap>>,
    ) -> Self {
        let mut card = Self {
            index,
            item_index,
            ring_len,
            pixel_size: Vec2::ZERO,
            plane_size: Vec2::ZERO,
            slot_width: 0.0,
            ring_width: 0.0,
            wrap_laps: 0,
            placement: CardPlacement {
                x: 0.0,
                pose: ArcPose::FLAT,
                wrap_laps: 0,
            },
            velocity: 0.0,
            hovered: false,
            hover_blend: 0.0,
            time: rand::rng().random_range(0.0..motion::TIME_PHASE_MAX),
            image: None,
            label,
        };
        card.resize(screen, viewport);
        card
    }

    /// Recompute size, slot and ring width from scratch.
    pub fn resize(&mut self, screen: Screen, viewport: Viewport) {
        self.pixel_size = card_pixel_size(screen);
        self.plane_size = card_plane_size(screen, viewport);
        self.slot_width = self.plane_size.x + card_cfg::SLOT_PADDING;
        self.ring_width = self.slot_width * self.ring_len as f32;
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn item_index(&self) -> usize {
        self.item_index
    }

    pub fn pixel_size(&self) -> Vec2 {
        self.pixel_size
    }

    pub fn plane_size(&self) -> Vec2 {
        self.plane_size
    }

    pub fn slot_width(&self) -> f32 {
        self.slot_width
    }

    pub fn ring_width(&self) -> f32 {
        self.ring_width
    }

    pub fn base_offset(&self) -> f32 {
        self.slot_width * self.index as f32
    }

    pub fn wrap_laps(&self) -> i32 {
        self.wrap_laps
    }

    pub fn placement(&self) -> CardPlacement {
        self.placement
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn hovered(&self) -> bool {
        self.hovered
    }

    pub fn hover_blend(&self) -> f32 {
        self.hover_blend
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn image(&self) -> Option<&Arc<CardImage>> {
        self.image.as_ref()
    }

    pub fn set_image(&mut self, image: Arc<CardImage>) {
        self.image = Some(image);
    }

    pub fn label(&self) -> Option<&Arc<LabelBitmap>> {
        self.label.as_ref()
    }

    /// Placement for this frame, including a recycle if the card has fully
    /// left the viewport on the trailing edge. Does not change the card.
    pub fn layout(&self, input: &LayoutInput) -> CardPlacement {
        let LayoutInput {
            current,
            direction,
            viewport,
            bend,
        } = *input;
        let half_viewport = viewport.half_width();
        let half_plane = self.plane_size.x / 2.0;
        let mut wrap_laps = self.wrap_laps;
        let mut x = self.position_for(current, wrap_laps);

        if self.ring_len >= 2 && self.ring_width > 0.0 {
            match direction {
                ScrollDirection::Right if x + half_plane < -half_viewport => {
                    wrap_laps += 1;
                }
                ScrollDirection::Left if x - half_plane > half_viewport => {
                    wrap_laps -= 1;
                }
                _ => {}
            }
            x = self.position_for(current, wrap_laps);
        }

        CardPlacement {
            x,
            pose: arc_pose(x, half_viewport, bend),
            wrap_laps,
        }
    }

    fn position_for(&self, current: f32, wrap_laps: i32) -> f32 {
        self.base_offset() - current + wrap_laps as f32 * self.ring_width
    }

    /// Commit this frame's placement and hover result.
    pub fn update(
        &mut self,
        placement: CardPlacement,
        hovered: bool,
        velocity: f32,
    ) {
        self.wrap_laps = placement.wrap_laps;
        self.placement = placement;
        self.hovered = hovered;
        let goal = if hovered { 1.0 } else { 0.0 };
        self.hover_blend = lerp(self.hover_blend, goal, motion::HOVER_EASING);
        self.velocity = velocity;
        self.time += motion::TIME_STEP;
    }

    /// Local transform of the card plane (unit quad scaled to card size).
    pub fn transform(&self) -> Transform {
        self.transform_for(&self.placement)
    }

    /// Transform the card would have at `placement`.
    pub fn transform_for(&self, placement: &CardPlacement) -> Transform {
        Transform {
            translation: Vec3::new(placement.x, placement.pose.y, 0.0),
            rotation_z: placement.pose.rotation_z,
            scale: self.plane_size.extend(1.0),
        }
    }

    /// Transform of the label relative to the card: a quarter of the card
    /// height, aspect-locked, just below the lower edge.
    pub fn label_transform(&self) -> Option<Transform> {
        let label = self.label.as_ref()?;
        label_transform(self.plane_size, label.aspect())
    }
}

/// Label placement in the parent card's local space, where the card spans
/// `-0.5..0.5` on both axes.
pub fn label_transform(
    plane_size: Vec2,
    label_aspect: f32,
) -> Option<Transform> {
    if plane_size.x <= 0.0 || plane_size.y <= 0.0 || label_aspect <= 0.0 {
        return None;
    }
    let height = label_cfg::HEIGHT_FRACTION;
    let world_height = plane_size.y * height;
    let world_width = world_height * label_aspect;
    let gap = label_cfg::GAP / plane_size.y;
    Some(Transform {
        translation: Vec3::new(0.0, -0.5 - height / 2.0 - gap, 0.0),
        rotation_z: 0.0,
        scale: Vec3::new(world_width / plane_size.x, height, 1.0),
    })
}
