//! Drives the public mount API the way a host does: frame ticks, pointer
//! input, image results and teardown.

use std::sync::Arc;
use std::time::{Duration, Instant};

use hireos_gallery::domains::gallery::handle::take_retired_scenes;
use hireos_gallery::domains::gallery::{
    GalleryConfig, GalleryItem, GalleryMessage, SceneId, mount,
};
use hireos_gallery::infra::image_loader::CardImage;
use iced::{Point, Size};

fn items() -> Vec<GalleryItem> {
    (0..3)
        .map(|i| {
            GalleryItem::new(
                format!("file:///nonexistent/{i}.png"),
                format!("Card {i}"),
                "",
            )
        })
        .collect()
}

fn still_config() -> GalleryConfig {
    GalleryConfig {
        auto_scroll_enabled: false,
        ..GalleryConfig::default()
    }
    .with_items(items())
}

fn run_frames(
    handle: &mut hireos_gallery::domains::gallery::CarouselHandle,
    start: Instant,
    frames: u32,
) -> Instant {
    let mut now = start;
    for _ in 0..frames {
        now += Duration::from_millis(16);
        handle.update(GalleryMessage::Frame(now));
    }
    now
}

#[test]
fn mount_builds_doubled_ring() {
    let (handle, _loads) = mount(Size::new(1200.0, 600.0), still_config());

    assert!(handle.is_running());
    assert_eq!(handle.scene().ring_len(), 6);
    let item_indices: Vec<usize> =
        handle.scene().cards().iter().map(|c| c.item_index()).collect();
    assert_eq!(item_indices, vec![0, 1, 2, 0, 1, 2]);
}

#[test]
fn drift_advances_until_destroyed() {
    let config = still_config();
    let config = GalleryConfig {
        auto_scroll_enabled: true,
        ..config
    };
    let (mut handle, _loads) = mount(Size::new(1200.0, 600.0), config);

    let now = run_frames(&mut handle, Instant::now(), 60);
    let target = handle.scene().scroll().target;
    assert!((target - 6.0).abs() < 1e-3, "target after 60 frames: {target}");
    assert!(handle.scene().scroll().current > 0.0);

    handle.destroy();
    assert!(!handle.is_running());

    run_frames(&mut handle, now, 60);
    assert_eq!(handle.scene().scroll().target, target);

    // Destroying twice is harmless.
    handle.destroy();
}

#[test]
fn drag_release_snaps_to_slot() {
    let (mut handle, _loads) = mount(Size::new(1200.0, 600.0), still_config());
    let slot = handle.scene().cards()[0].slot_width();

    handle.update(GalleryMessage::PointerPressed(Some(500.0)));
    handle.update(GalleryMessage::PointerMoved(380.0));
    assert!(handle.scene().is_dragging());
    let dragged = handle.scene().scroll().target;
    assert!(dragged > 0.0);

    handle.update(GalleryMessage::PointerReleased);
    let snapped = handle.scene().scroll().target;
    let slots = snapped / slot;
    assert!((slots - slots.round()).abs() < 1e-4);
    assert!((snapped - dragged).abs() <= slot / 2.0 + 1e-4);

    run_frames(&mut handle, Instant::now(), 600);
    assert!((handle.scene().scroll().current - snapped).abs() < 1e-2);
}

#[test]
fn mouse_press_uses_last_cursor_position() {
    let (mut handle, _loads) = mount(Size::new(1200.0, 600.0), still_config());

    handle.update(GalleryMessage::PointerMoved(300.0));
    handle.update(GalleryMessage::PointerPressed(None));
    handle.update(GalleryMessage::PointerMoved(300.0));
    assert_eq!(handle.scene().scroll().target, 0.0);

    handle.update(GalleryMessage::PointerMoved(340.0));
    assert!(handle.scene().scroll().target < 0.0);
}

#[test]
fn hover_follows_pointer() {
    let (mut handle, _loads) = mount(Size::new(1200.0, 600.0), still_config());

    run_frames(&mut handle, Instant::now(), 1);
    assert!(handle.scene().cards().iter().all(|c| !c.hovered()));

    handle.update(GalleryMessage::HoverMoved(Some(Point::new(600.0, 300.0))));
    run_frames(&mut handle, Instant::now(), 1);
    assert_eq!(
        handle.scene().cards().iter().filter(|c| c.hovered()).count(),
        1
    );

    handle.update(GalleryMessage::HoverMoved(None));
    run_frames(&mut handle, Instant::now(), 1);
    assert!(handle.scene().cards().iter().all(|c| !c.hovered()));
}

#[test]
fn image_results_route_by_scene() {
    let (mut handle, _loads) = mount(Size::new(1200.0, 600.0), still_config());
    let image = Arc::new(CardImage::from_rgba(image::RgbaImage::new(4, 4)));

    handle.update(GalleryMessage::ImageLoaded {
        scene: SceneId::next(),
        item: 1,
        result: Ok(Arc::clone(&image)),
    });
    assert!(handle.scene().cards().iter().all(|c| c.image().is_none()));

    handle.update(GalleryMessage::ImageLoaded {
        scene: handle.scene().id(),
        item: 1,
        result: Ok(image),
    });
    let with_image: Vec<usize> = handle
        .scene()
        .cards()
        .iter()
        .filter(|c| c.image().is_some())
        .map(|c| c.index())
        .collect();
    assert_eq!(with_image, vec![1, 4]);
}

// One test owns the retired-scene queue so parallel tests cannot drain it.
#[test]
fn destroyed_scenes_are_retired_and_ignore_late_images() {
    let (mut handle, _loads) = mount(Size::new(1200.0, 600.0), still_config());
    let destroyed = handle.scene().id();
    handle.destroy();

    handle.update(GalleryMessage::ImageLoaded {
        scene: destroyed,
        item: 0,
        result: Ok(Arc::new(CardImage::from_rgba(image::RgbaImage::new(2, 2)))),
    });
    assert!(handle.scene().cards().iter().all(|c| c.image().is_none()));

    let (dropped, _loads) = mount(Size::new(800.0, 600.0), still_config());
    let dropped_id = dropped.scene().id();
    drop(dropped);

    let retired = take_retired_scenes();
    assert!(retired.contains(&destroyed));
    assert!(retired.contains(&dropped_id));
}

#[test]
fn container_resize_reflows_cards() {
    let (mut handle, _loads) = mount(Size::new(1200.0, 600.0), still_config());
    let before = handle.scene().cards()[0].pixel_size();
    let plane_before = handle.scene().cards()[0].plane_size();

    handle.update(GalleryMessage::ContainerResized {
        size: Size::new(1200.0, 300.0),
        hover: None,
    });
    let after = handle.scene().cards()[0].pixel_size();

    assert!((after.y - before.y / 2.0).abs() < 1e-3);
    let plane_after = handle.scene().cards()[0].plane_size();
    assert!((plane_after - plane_before).length() < 1e-3);
}

#[test]
fn resize_carries_hover_into_the_scene() {
    let (mut handle, _loads) = mount(Size::new(1200.0, 600.0), still_config());
    run_frames(&mut handle, Instant::now(), 1);

    handle.update(GalleryMessage::ContainerResized {
        size: Size::new(1000.0, 500.0),
        hover: Some(Point::new(500.0, 250.0)),
    });
    run_frames(&mut handle, Instant::now(), 1);
    assert_eq!(
        handle.scene().cards().iter().filter(|c| c.hovered()).count(),
        1
    );
}
