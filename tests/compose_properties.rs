//! Placement and blending properties over coordinate-tagged pixels.
//!
//! Every source pixel encodes its image id and (x, y) origin in its color
//! channels, making any placement error immediately detectable — a wrong
//! offset, a swapped axis, or a dropped gap all show up as a mismatched
//! tag at some destination coordinate.

use zencompose::*;

/// Image `id` whose pixel at (x, y) carries the tag color `(id, x, y)`.
///
/// Channels stay raw 16-bit so the tag survives opaque pastes exactly.
fn tagged(id: u16, width: u32, height: u32) -> PixelBuffer {
    let mut buf = PixelBuffer::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let c = Color::new(id, x as u16, y as u16, Color::MAX_CHANNEL);
            buf.set_color(x, y, c).unwrap();
        }
    }
    buf
}

/// Assert the pixel at (x, y) is source pixel (sx, sy) of image `id`.
fn assert_tag(out: &PixelBuffer, x: u32, y: u32, id: u16, sx: u16, sy: u16) {
    assert_eq!(
        out.color_at(x, y).unwrap(),
        Color::new(id, sx, sy, Color::MAX_CHANNEL),
        "wrong source pixel at ({x}, {y})"
    );
}

// ── merge: dimension accumulation ───────────────────────────────────────

#[test]
fn merge_main_axis_is_sum_plus_gaps() {
    let sizes = [(10u32, 4u32), (3, 9), (25, 1), (7, 7)];
    let images: Vec<PixelBuffer> = sizes
        .iter()
        .enumerate()
        .map(|(i, &(w, h))| tagged(i as u16, w, h))
        .collect();
    let refs: Vec<&dyn Raster> = images.iter().map(|i| i as &dyn Raster).collect();

    for gap in [0u32, 1, 13] {
        let out = merge(&refs, &MergeOptions::new().gap(gap)).unwrap();
        let sum: u32 = sizes.iter().map(|&(w, _)| w).sum();
        assert_eq!(out.width(), sum + gap * (sizes.len() as u32 - 1));
        assert_eq!(out.height(), 9);

        let vertical = MergeOptions::new()
            .direction(Direction::Vertical)
            .gap(gap);
        let out = merge(&refs, &vertical).unwrap();
        let sum: u32 = sizes.iter().map(|&(_, h)| h).sum();
        assert_eq!(out.height(), sum + gap * (sizes.len() as u32 - 1));
        assert_eq!(out.width(), 25);
    }
}

#[test]
fn merge_single_image_round_trips_every_pixel() {
    let img = tagged(7, 13, 5);
    let out = merge(&[&img], &MergeOptions::new().gap(99)).unwrap();
    assert_eq!(out, img);
}

// ── merge: placement ────────────────────────────────────────────────────

#[test]
fn merge_places_each_image_at_its_running_offset() {
    let a = tagged(0, 4, 6);
    let b = tagged(1, 3, 6);
    let c = tagged(2, 5, 6);
    let opts = MergeOptions::new().gap(2).alignment(Alignment::Start);
    let out = merge(&[&a, &b, &c], &opts).unwrap();

    // a at x=0, b at x=4+2, c at x=4+2+3+2.
    assert_tag(&out, 0, 0, 0, 0, 0);
    assert_tag(&out, 3, 5, 0, 3, 5);
    assert_tag(&out, 6, 0, 1, 0, 0);
    assert_tag(&out, 8, 2, 1, 2, 2);
    assert_tag(&out, 11, 0, 2, 0, 0);
    assert_tag(&out, 15, 5, 2, 4, 5);
}

#[test]
fn merge_center_alignment_floors_half_pixel() {
    // Heights 10 and 20: the short image starts at y = (20 − 10) / 2 = 5.
    let a = tagged(0, 2, 10);
    let b = tagged(1, 2, 20);
    let out = merge(&[&a, &b], &MergeOptions::new()).unwrap();
    assert_tag(&out, 0, 5, 0, 0, 0);
    assert_tag(&out, 0, 14, 0, 0, 9);
    assert_eq!(out.color_at(0, 4).unwrap(), Color::TRANSPARENT);

    // Odd leftover: (20 − 15) / 2 = 2, not 2.5.
    let c = tagged(2, 2, 15);
    let out = merge(&[&c, &b], &MergeOptions::new()).unwrap();
    assert_tag(&out, 0, 2, 2, 0, 0);
}

#[test]
fn merge_end_alignment_flushes_to_far_edge() {
    let a = tagged(0, 3, 4);
    let b = tagged(1, 3, 10);
    let opts = MergeOptions::new()
        .direction(Direction::Vertical)
        .alignment(Alignment::End);
    // Equal widths: End degenerates to offset 0.
    let out = merge(&[&a, &b], &opts).unwrap();
    assert_tag(&out, 0, 0, 0, 0, 0);

    // Cross axis is width here; the narrow image flushes right.
    let narrow = tagged(2, 2, 4);
    let out = merge(&[&narrow, &b], &opts).unwrap();
    assert_eq!(out.width(), 3);
    assert_eq!(out.color_at(0, 0).unwrap(), Color::TRANSPARENT);
    assert_tag(&out, 1, 0, 2, 0, 0);
    assert_tag(&out, 2, 3, 2, 1, 3);
}

// ── grid ────────────────────────────────────────────────────────────────

#[test]
fn grid_seven_uniform_images_in_three_columns() {
    let images: Vec<PixelBuffer> = (0..7).map(|i| tagged(i, 50, 50)).collect();
    let refs: Vec<&dyn Raster> = images.iter().map(|i| i as &dyn Raster).collect();
    let out = grid(&refs, 3, 10, Some(Color::white())).unwrap();

    assert_eq!(out.width(), 3 * 50 + 2 * 10);
    assert_eq!(out.height(), 3 * 50 + 2 * 10);

    // Row-major: image 5 sits at row 1, column 2.
    assert_tag(&out, 2 * 60, 60, 5, 0, 0);
    // Image 6 opens the partial last row; its right-hand neighbors are empty.
    assert_tag(&out, 0, 2 * 60, 6, 0, 0);
    assert_eq!(out.color_at(60 + 25, 2 * 60 + 25).unwrap(), Color::white());
    assert_eq!(out.color_at(2 * 60 + 25, 2 * 60 + 25).unwrap(), Color::white());
}

#[test]
fn grid_centers_small_images_in_shared_cell() {
    // Cell is 9×9 (max over both); the 4×5 image centers at (2, 2).
    let big = tagged(0, 9, 9);
    let small = tagged(1, 4, 5);
    let out = grid(&[&big, &small], 2, 0, None).unwrap();
    assert_tag(&out, 9 + 2, 2, 1, 0, 0);
    assert_tag(&out, 9 + 5, 6, 1, 3, 4);
    assert_eq!(out.color_at(9 + 1, 2).unwrap(), Color::TRANSPARENT);
}

// ── overlay ─────────────────────────────────────────────────────────────

#[test]
fn overlay_writes_only_the_in_bounds_region() {
    let mut base = PixelBuffer::new(100, 100);
    base.fill(Color::black());
    let mut over = PixelBuffer::new(20, 20);
    over.fill(Color::white());

    let out = overlay(&base, &over, 90, 90, 1.0).unwrap();
    let mut touched = 0;
    for y in 0..100 {
        for x in 0..100 {
            if out.color_at(x, y).unwrap() != Color::black() {
                assert!(x >= 90 && y >= 90, "write outside overlay region");
                touched += 1;
            }
        }
    }
    assert_eq!(touched, 10 * 10);
}

#[test]
fn overlay_blend_matches_the_pointwise_formula() {
    let mut base = PixelBuffer::new(1, 1);
    base.set_color(0, 0, Color::rgba8(40, 80, 120, 255)).unwrap();
    let mut over = PixelBuffer::new(1, 1);
    over.set_color(0, 0, Color::rgba8(200, 100, 0, 255)).unwrap();

    let out = overlay(&base, &over, 0, 0, 0.25).unwrap();
    let expected = blend(
        Color::rgba8(40, 80, 120, 255),
        Color::rgba8(200, 100, 0, 255),
        0.25,
    );
    assert_eq!(out.color_at(0, 0).unwrap(), expected);
    // 40 × 0.75 + 200 × 0.25 = 80; 80 × 0.75 + 100 × 0.25 = 85;
    // 120 × 0.75 + 0 × 0.25 = 90.
    assert_eq!(expected.to_rgba8(), [80, 85, 90, 255]);
}

// ── determinism ─────────────────────────────────────────────────────────

#[test]
fn operations_are_idempotent_over_identical_inputs() {
    let a = tagged(0, 8, 3);
    let b = tagged(1, 2, 11);
    let opts = MergeOptions::new()
        .alignment(Alignment::Center)
        .gap(4)
        .background(Color::rgba8(1, 2, 3, 4));

    assert_eq!(merge(&[&a, &b], &opts).unwrap(), merge(&[&a, &b], &opts).unwrap());
    assert_eq!(
        grid(&[&a, &b], 1, 2, None).unwrap(),
        grid(&[&a, &b], 1, 2, None).unwrap()
    );
    assert_eq!(
        overlay(&a, &b, 3, -2, 0.6).unwrap(),
        overlay(&a, &b, 3, -2, 0.6).unwrap()
    );
}

#[test]
fn inputs_are_never_mutated() {
    let a = tagged(0, 4, 4);
    let b = tagged(1, 4, 4);
    let before = (a.clone(), b.clone());
    let _ = merge(&[&a, &b], &MergeOptions::new().background(Color::white())).unwrap();
    let _ = grid(&[&a, &b], 2, 1, Some(Color::black())).unwrap();
    let _ = overlay(&a, &b, 1, 1, 0.5).unwrap();
    assert_eq!((a, b), before);
}
