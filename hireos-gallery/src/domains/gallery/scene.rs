//! The per-frame orchestrator
//!
//! `CarouselScene` owns the camera, scene graph, cards and scroll state.
//! Input handlers only touch `scroll.target` (and the drag/settle state);
//! `frame` then runs the fixed per-frame order:
//!
//! 1. settle check, then idle drift when not dragging
//! 2. smooth `current` toward `target` and derive the direction
//! 3. hit-test the pointer ray against this frame's card placements
//! 4. commit placements, hover and clocks on every card
//! 5. mark the frame done (`previous = current`)
//!
//! Rendering reads a [`FrameSnapshot`] taken after `frame`.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use glam::{Mat4, Vec2};
use iced::Point;

use super::camera::{Camera, Ray, Screen, Viewport, to_ndc};
use super::card::{CardItem, CardPlacement, LayoutInput};
use super::config::{GalleryConfig, GalleryItem};
use super::hit_test::hit_cards;
use super::input::{DragState, wheel_step};
use super::label::{LabelBitmap, TextureLabelRenderer};
use super::scene_graph::{NodeId, SceneGraph};
use super::scroll::{ScrollState, SettleTimer};
use crate::infra::constants::motion;
use crate::infra::image_loader::CardImage;

static NEXT_SCENE_ID: AtomicU64 = AtomicU64::new(1);

/// Identifies one mounted scene; never reused within a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SceneId(u64);

impl SceneId {
    pub fn next() -> Self {
        SceneId(NEXT_SCENE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

/// What the renderer needs for one label quad.
#[derive(Debug, Clone)]
pub struct LabelDraw {
    pub model: Mat4,
    pub bitmap: Arc<LabelBitmap>,
}

/// What the renderer needs for one card.
#[derive(Debug, Clone)]
pub struct CardDraw {
    pub model: Mat4,
    pub plane_size: Vec2,
    pub image: Option<Arc<CardImage>>,
    pub corner_radius: f32,
    pub hover_blend: f32,
    pub speed: f32,
    pub time: f32,
    pub label: Option<LabelDraw>,
}

/// Immutable copy of a frame, in ring order.
#[derive(Debug, Clone)]
pub struct FrameSnapshot {
    pub scene: SceneId,
    pub view_projection: Mat4,
    pub cards: Vec<CardDraw>,
}

#[derive(Debug)]
pub struct CarouselScene {
    id: SceneId,
    config: GalleryConfig,
    items: Vec<GalleryItem>,
    screen: Screen,
    camera: Camera,
    viewport: Viewport,
    graph: SceneGraph,
    cards: Vec<CardItem>,
    card_nodes: Vec<NodeId>,
    label_nodes: Vec<Option<NodeId>>,
    scroll: ScrollState,
    settle: SettleTimer,
    drag: DragState,
    /// Container-local pointer position; `None` while outside.
    pointer: Option<Point>,
}

impl CarouselScene {
    /// Build a scene, rasterizing labels with the configured font. Only a
    /// font file that fails to parse leaves every card without a label.
    pub fn new(screen: Screen, config: GalleryConfig) -> Self {
        let config = config.normalized();
        let color = config.text_rgba();
        let renderer = match TextureLabelRenderer::from_spec(
            &config.font,
            color,
        ) {
            Ok(renderer) => Some(renderer),
            Err(e) => {
                log::warn!("Card labels disabled: {e}");
                None
            }
        };
        Self::with_label_renderer(screen, config, renderer.as_ref())
    }

    pub fn with_label_renderer(
        screen: Screen,
        config: GalleryConfig,
        renderer: Option<&TextureLabelRenderer>,
    ) -> Self {
        let config = config.normalized();
        let items = config.resolved_items();
        let camera = Camera::new(screen);
        let viewport = camera.viewport();

        // One bitmap per input item; both ring copies share it.
        let labels: Vec<Option<Arc<LabelBitmap>>> = items
            .iter()
            .map(|item| {
                let renderer = renderer?;
                match renderer.render(&item.text, &item.caption) {
                    Ok(bitmap) => Some(Arc::new(bitmap)),
                    Err(e) => {
                        log::warn!("Label for `{}` skipped: {e}", item.text);
                        None
                    }
                }
            })
            .collect();

        let ring_len = items.len() * 2;
        let mut graph = SceneGraph::new();
        let mut cards = Vec::with_capacity(ring_len);
        let mut card_nodes = Vec::with_capacity(ring_len);
        let mut label_nodes = Vec::with_capacity(ring_len);

        for index in 0..ring_len {
            let item_index = index % items.len();
            let label = labels[item_index].clone();
            let node = graph.add_child(graph.root());
            label_nodes.push(label.as_ref().map(|_| graph.add_child(node)));
            card_nodes.push(node);
            cards.push(CardItem::new(
                index, item_index, ring_len, screen, viewport, label,
            ));
        }

        let mut scene = Self {
            id: SceneId::next(),
            scroll: ScrollState::new(config.scroll_easing),
            config,
            items,
            screen,
            camera,
            viewport,
            graph,
            cards,
            card_nodes,
            label_nodes,
            settle: SettleTimer::default(),
            drag: DragState::Idle,
            pointer: None,
        };
        scene.sync_graph();
        scene
    }

    pub fn id(&self) -> SceneId {
        self.id
    }

    pub fn config(&self) -> &GalleryConfig {
        &self.config
    }

    pub fn items(&self) -> &[GalleryItem] {
        &self.items
    }

    pub fn cards(&self) -> &[CardItem] {
        &self.cards
    }

    pub fn ring_len(&self) -> usize {
        self.cards.len()
    }

    pub fn scroll(&self) -> &ScrollState {
        &self.scroll
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    pub fn is_settling(&self) -> bool {
        self.settle.is_scrolling()
    }

    /// Slot width used for snapping: the first card's.
    fn snap_width(&self) -> Option<f32> {
        self.cards.first().map(CardItem::slot_width)
    }

    fn snap(&mut self) {
        if let Some(width) = self.snap_width() {
            self.scroll.snap_target(width);
            log::trace!("Gallery settled on target {}", self.scroll.target);
        }
    }

    /// Advance one display frame.
    pub fn frame(&mut self, now: Instant) {
        if self.settle.poll(now) {
            self.snap();
        }
        if self.config.auto_scroll_enabled && !self.drag.is_dragging() {
            self.scroll.target += motion::AUTO_SCROLL_STEP;
        }

        let direction = self.scroll.advance();
        let input = LayoutInput {
            current: self.scroll.current,
            direction,
            viewport: self.viewport,
            bend: self.config.bend_amount,
        };

        let placements: Vec<CardPlacement> =
            self.cards.iter().map(|card| card.layout(&input)).collect();
        let root = self.graph.world_matrix(self.graph.root());
        let models: Vec<Mat4> = self
            .cards
            .iter()
            .zip(&placements)
            .map(|(card, placement)| {
                root * card.transform_for(placement).matrix()
            })
            .collect();
        let ray = self.pointer_ray();
        let hits = hit_cards(ray.as_ref(), &models);

        let velocity = self.scroll.velocity();
        for ((card, placement), hovered) in
            self.cards.iter_mut().zip(placements).zip(hits)
        {
            card.update(placement, hovered, velocity);
        }
        self.sync_graph();
        self.scroll.commit();
    }

    fn pointer_ray(&self) -> Option<Ray> {
        let pointer = self.pointer?;
        let ndc = to_ndc(pointer.x, pointer.y, self.screen);
        Some(self.camera.ray_through(ndc))
    }

    fn sync_graph(&mut self) {
        for (index, card) in self.cards.iter().enumerate() {
            self.graph.set_local(self.card_nodes[index], card.transform());
            if let (Some(node), Some(local)) =
                (self.label_nodes[index], card.label_transform())
            {
                self.graph.set_local(node, local);
            }
        }
    }

    /// Wheel notch with a browser-convention delta (positive advances).
    pub fn on_wheel(&mut self, delta: f32, now: Instant) {
        if delta == 0.0 || !delta.is_finite() {
            return;
        }
        self.scroll.target +=
            wheel_step(delta, self.config.scroll_speed_multiplier);
        self.settle.arm(now);
    }

    pub fn on_press(&mut self, x: f32) {
        self.drag = DragState::begin(x, self.scroll.current);
    }

    pub fn on_move(&mut self, x: f32) {
        if let Some(target) =
            self.drag.target_for(x, self.config.scroll_speed_multiplier)
        {
            self.scroll.target = target;
        }
    }

    pub fn on_release(&mut self) {
        if self.drag.is_dragging() {
            self.drag = DragState::Idle;
            self.snap();
        }
    }

    /// Container-local pointer for hover ray casting.
    pub fn set_pointer(&mut self, pointer: Option<Point>) {
        self.pointer = pointer;
    }

    pub fn resize(&mut self, screen: Screen) {
        if screen == self.screen {
            return;
        }
        log::debug!(
            "Gallery resized to {}x{}",
            screen.width,
            screen.height
        );
        self.screen = screen;
        self.camera.resize(screen);
        self.viewport = self.camera.viewport();
        for card in &mut self.cards {
            card.resize(screen, self.viewport);
        }
        self.sync_graph();
    }

    /// Attach a decoded image to every ring slot showing `item_index`.
    /// Returns `false` when no slot matches.
    pub fn apply_image(
        &mut self,
        item_index: usize,
        image: Arc<CardImage>,
    ) -> bool {
        let mut applied = false;
        for card in &mut self.cards {
            if card.item_index() == item_index {
                card.set_image(Arc::clone(&image));
                applied = true;
            }
        }
        applied
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        let world = self.graph.world_matrices();
        let cards = self
            .cards
            .iter()
            .enumerate()
            .map(|(index, card)| CardDraw {
                model: world[self.card_nodes[index].index()],
                plane_size: card.plane_size(),
                image: card.image().cloned(),
                corner_radius: self.config.card_corner_radius,
                hover_blend: card.hover_blend(),
                speed: card.velocity(),
                time: card.time(),
                label: self.label_nodes[index].zip(card.label()).map(
                    |(node, bitmap)| LabelDraw {
                        model: world[node.index()],
                        bitmap: Arc::clone(bitmap),
                    },
                ),
            })
            .collect();

        FrameSnapshot {
            scene: self.id,
            view_projection: self.camera.view_projection(),
            cards,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::gallery::Rgba;
    use crate::domains::gallery::hit_test::intersect_card;
    use crate::domains::gallery::scroll::snap_to_boundary;
    use std::time::Duration;

    fn items(n: usize) -> Vec<GalleryItem> {
        (0..n)
            .map(|i| {
                GalleryItem::new(format!("img-{i}.png"), format!("T{i}"), "c")
            })
            .collect()
    }

    fn scene(n: usize, auto: bool) -> CarouselScene {
        let config = GalleryConfig {
            auto_scroll_enabled: auto,
            ..GalleryConfig::default()
        }
        .with_items(items(n));
        CarouselScene::with_label_renderer(
            Screen::new(1600.0, 900.0),
            config,
            None,
        )
    }

    #[test]
    fn ring_is_doubled() {
        for n in 1..6 {
            let scene = scene(n, true);
            assert_eq!(scene.ring_len(), 2 * n);
            for (i, card) in scene.cards().iter().enumerate() {
                assert_eq!(card.index(), i);
                assert_eq!(card.item_index(), i % n);
            }
        }
    }

    #[test]
    fn empty_items_use_placeholder_pair() {
        let scene = CarouselScene::with_label_renderer(
            Screen::new(800.0, 600.0),
            GalleryConfig::default(),
            None,
        );
        assert_eq!(scene.ring_len(), 2);
        assert_eq!(scene.items(), &[GalleryItem::placeholder()]);
    }

    #[test]
    fn idle_drift_raises_target_and_converges() {
        let mut scene = scene(3, true);
        let start = Instant::now();
        let mut last_current = scene.scroll().current;
        for frame in 1..=400 {
            scene.frame(start);
            let scroll = scene.scroll();
            assert!((scroll.target - 0.1 * frame as f32).abs() < 1e-2);
            assert!(scroll.current >= last_current);
            assert!(scroll.current <= scroll.target);
            last_current = scroll.current;
        }
    }

    #[test]
    fn drag_then_release_snaps() {
        let mut scene = scene(3, false);
        let now = Instant::now();
        scene.on_press(400.0);
        scene.on_move(300.0);
        assert!((scene.scroll().target - 5.0).abs() < 1e-6);
        scene.frame(now);
        assert!(scene.is_dragging());

        scene.on_release();
        assert!(!scene.is_dragging());
        let width = scene.cards()[0].slot_width();
        assert_eq!(scene.scroll().target, snap_to_boundary(5.0, width));
    }

    #[test]
    fn drag_suspends_drift() {
        let mut scene = scene(2, true);
        scene.on_press(0.0);
        let before = scene.scroll().target;
        scene.frame(Instant::now());
        assert_eq!(scene.scroll().target, before);
    }

    #[test]
    fn wheel_snaps_after_quiet_period() {
        let mut scene = scene(3, false);
        let start = Instant::now();
        scene.on_wheel(1.0, start);
        assert!((scene.scroll().target - 0.4).abs() < 1e-6);
        assert!(scene.is_settling());

        scene.frame(start + Duration::from_millis(100));
        assert!((scene.scroll().target - 0.4).abs() < 1e-6);

        scene.frame(start + Duration::from_millis(250));
        assert!(!scene.is_settling());
        assert_eq!(scene.scroll().target, 0.0);

        scene.on_wheel(0.0, start);
        assert!(!scene.is_settling());
    }

    #[test]
    fn hover_matches_pointer_ray_each_frame() {
        let mut scene = scene(3, true);
        let now = Instant::now();
        scene.set_pointer(Some(Point::new(800.0, 450.0)));
        scene.frame(now);

        let snapshot = scene.snapshot();
        let ray = scene
            .camera()
            .ray_through(to_ndc(800.0, 450.0, scene.screen()));
        for (card, draw) in scene.cards().iter().zip(&snapshot.cards) {
            let hit = intersect_card(&ray, &draw.model).is_some();
            assert_eq!(card.hovered(), hit);
        }
        assert!(scene.cards()[0].hovered());
        assert_eq!(scene.cards().iter().filter(|c| c.hovered()).count(), 1);

        scene.set_pointer(None);
        scene.frame(now);
        assert!(scene.cards().iter().all(|c| !c.hovered()));
    }

    #[test]
    fn drift_keeps_ring_contiguous() {
        let mut scene = scene(3, true);
        let now = Instant::now();
        for _ in 0..3000 {
            scene.frame(now);
            for card in scene.cards() {
                let wrapped = card.placement().x
                    - (card.base_offset() - scene.scroll().current);
                let laps = wrapped / card.ring_width();
                assert!((laps - laps.round()).abs() < 1e-3);
                assert_eq!(laps.round() as i32, card.wrap_laps());
            }
        }
        let mut xs: Vec<f32> =
            scene.cards().iter().map(|c| c.placement().x).collect();
        xs.sort_by(f32::total_cmp);
        let slot = scene.cards()[0].slot_width();
        for pair in xs.windows(2) {
            assert!((pair[1] - pair[0] - slot).abs() < 1e-2);
        }
        assert!(scene.cards().iter().any(|c| c.wrap_laps() > 0));
    }

    #[test]
    fn resize_reflows_every_card() {
        let mut scene = scene(4, true);
        let before: Vec<_> =
            scene.cards().iter().map(|c| c.pixel_size()).collect();
        scene.resize(Screen::new(1600.0, 450.0));
        for (card, old) in scene.cards().iter().zip(before) {
            assert!((card.pixel_size() - old * 0.5).length() < 1e-3);
            let expected = card.slot_width() * scene.ring_len() as f32;
            assert!((card.ring_width() - expected).abs() < 1e-4);
        }
        assert_eq!(scene.ring_len(), 8);
    }

    #[test]
    fn images_apply_to_both_ring_copies() {
        let mut scene = scene(2, true);
        let image = Arc::new(CardImage::from_rgba(image::RgbaImage::new(2, 2)));
        assert!(scene.apply_image(1, Arc::clone(&image)));
        let with_image: Vec<usize> = scene
            .cards()
            .iter()
            .filter(|c| c.image().is_some())
            .map(|c| c.index())
            .collect();
        assert_eq!(with_image, vec![1, 3]);
        assert!(!scene.apply_image(7, image));
    }

    #[test]
    fn snapshot_is_in_ring_order() {
        let mut scene = scene(2, true);
        scene.frame(Instant::now());
        let snapshot = scene.snapshot();
        assert_eq!(snapshot.scene, scene.id());
        assert_eq!(snapshot.cards.len(), 4);
        for (card, draw) in scene.cards().iter().zip(&snapshot.cards) {
            let origin = draw.model.transform_point3(glam::Vec3::ZERO);
            assert!((origin.x - card.placement().x).abs() < 1e-4);
            assert!(draw.label.is_none());
        }
    }

    #[test]
    fn oversized_label_only_drops_its_own_cards() {
        let renderer =
            TextureLabelRenderer::embedded(30.0, Rgba::WHITE).unwrap();
        let config = GalleryConfig::default().with_items(vec![
            GalleryItem::new("a.png", "Alex - Google", "Engineer"),
            GalleryItem::new("b.png", "W".repeat(1000), ""),
            GalleryItem::new("c.png", "Sarah - OpenAI", ""),
        ]);
        let scene = CarouselScene::with_label_renderer(
            Screen::new(1600.0, 900.0),
            config,
            Some(&renderer),
        );

        assert_eq!(scene.label_nodes.len(), 6);
        for (card, node) in scene.cards().iter().zip(&scene.label_nodes) {
            if card.item_index() == 1 {
                assert!(node.is_none(), "card {} kept a label", card.index());
                assert!(card.label().is_none());
            } else {
                assert!(node.is_some(), "card {} lost its label", card.index());
            }
        }
    }
}
