// Copyright 2025 the Quire Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Screen-to-document and document-to-screen mappings agree.

use kurbo::{Point, Size, Vec2};
use quire_geometry::{LayoutParams, PageLayout, Viewport, layout_pages};
use quire_hit::{HitParams, caret_rect_for, hit_test_click, range_rects};
use quire_scene::{FontSpec, GlyphRun, PageRender, RenderItem, RenderModel, TextPosition, TextSource};
use quire_surface::TextMeasure;

/// Proportional metrics: narrow letters are 3 wide, wide ones 11, the rest 7,
/// scaled by the font size in the font string.
struct Proportional;

impl TextMeasure for Proportional {
    fn measure_text(&self, text: &str, font: &str) -> f64 {
        let size: f64 = font
            .split_whitespace()
            .find_map(|part| part.strip_suffix("px"))
            .and_then(|px| px.parse().ok())
            .unwrap_or(16.0);
        let units: f64 = text
            .chars()
            .map(|c| match c {
                'i' | 'l' | 'j' | '.' | ' ' => 3.0,
                'm' | 'w' | 'M' | 'W' => 11.0,
                _ => 7.0,
            })
            .sum();
        units * size / 16.0
    }
}

fn line(text: &str, x: f64, baseline: f64, size: f64, paragraph: usize, offset: usize) -> RenderItem {
    RenderItem::GlyphRun(
        GlyphRun::new(text, Point::new(x, baseline), FontSpec::new("Serif", size))
            .with_source(TextSource::new(paragraph, offset, text))
            .with_line_height(size * 1.4),
    )
}

fn document() -> (RenderModel, Vec<PageLayout>) {
    let pages = vec![
        PageRender::new(
            0,
            500.0,
            700.0,
            vec![
                line("Hello world", 60.0, 80.0, 16.0, 0, 0),
                line("A mixed line with wide Ms", 60.0, 110.0, 14.0, 1, 0),
                line("and a bold tail.", 60.0, 134.0, 14.0, 1, 25),
            ],
        ),
        PageRender::new(
            1,
            500.0,
            700.0,
            vec![
                line("Heading", 60.0, 90.0, 28.0, 2, 0),
                line("Body text follows", 60.0, 130.0, 12.0, 3, 0),
            ],
        ),
    ];
    let model = RenderModel::new(pages);
    let layouts = layout_pages(
        &model,
        &LayoutParams {
            container_width: 900.0,
            zoom: 1.5,
            top_offset: 16.0,
            ..LayoutParams::default()
        },
    );
    (model, layouts)
}

fn viewport() -> Viewport {
    let mut viewport = Viewport::new(Size::new(900.0, 700.0));
    viewport.set_zoom(1.5);
    viewport.set_scroll(Vec2::new(0.0, 230.5));
    viewport
}

fn runs(model: &RenderModel) -> impl Iterator<Item = &GlyphRun> + '_ {
    model
        .pages()
        .iter()
        .flat_map(|page| page.glyph_runs().map(|(_, run)| run))
}

#[test]
fn caret_centre_hits_its_own_position() {
    let (model, layouts) = document();
    let viewport = viewport();
    let params = HitParams::default();
    for run in runs(&model) {
        let source = run.source.as_ref().unwrap();
        for index in 0..=run.char_len() {
            let position = TextPosition::new(source.paragraph, source.offset + index);
            let rect = caret_rect_for(&model, &layouts, &viewport, &Proportional, position)
                .unwrap_or_else(|| panic!("no caret rect for {position:?}"));
            let hit = hit_test_click(&model, &layouts, &viewport, &Proportional, rect.center(), &params)
                .unwrap_or_else(|| panic!("no hit for {position:?}"));
            assert_eq!(hit.position, position, "round trip through {rect:?}");
        }
    }
}

#[test]
fn character_box_centre_is_within_one_character() {
    let (model, layouts) = document();
    let viewport = viewport();
    let params = HitParams::default();
    for run in runs(&model) {
        let source = run.source.as_ref().unwrap();
        for index in 0..run.char_len() {
            let start = TextPosition::new(source.paragraph, source.offset + index);
            let end = TextPosition::new(source.paragraph, source.offset + index + 1);
            let rects = range_rects(&model, &layouts, &viewport, &Proportional, start, end);
            assert_eq!(rects.len(), 1);
            let hit = hit_test_click(&model, &layouts, &viewport, &Proportional, rects[0].center(), &params)
                .unwrap();
            assert_eq!(hit.position.paragraph, start.paragraph);
            assert!(hit.position.offset.abs_diff(start.offset) <= 1);
        }
    }
}

#[test]
fn both_halves_of_the_fifth_character() {
    let (model, layouts) = document();
    let viewport = viewport();
    let params = HitParams::default();
    // "Hello world": the fifth character, 'o', spans boundaries 4 and 5.
    let o = range_rects(
        &model,
        &layouts,
        &viewport,
        &Proportional,
        TextPosition::new(0, 4),
        TextPosition::new(0, 5),
    )[0];
    let y = o.center().y;
    let left = Point::new(o.x0 + o.width() * 0.25, y);
    let right = Point::new(o.x0 + o.width() * 0.75, y);
    let hit = |pt| hit_test_click(&model, &layouts, &viewport, &Proportional, pt, &params).unwrap();
    assert_eq!(hit(left).position, TextPosition::new(0, 4));
    assert_eq!(hit(right).position, TextPosition::new(0, 5));

    // Same for the first character: offsets 0 and 1.
    let h = range_rects(
        &model,
        &layouts,
        &viewport,
        &Proportional,
        TextPosition::new(0, 0),
        TextPosition::new(0, 1),
    )[0];
    assert_eq!(hit(Point::new(h.x0 + 1.0, y)).position, TextPosition::new(0, 0));
    assert_eq!(hit(Point::new(h.x1 - 1.0, y)).position, TextPosition::new(0, 1));
}
