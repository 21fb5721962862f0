// Copyright 2025 the Quire Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use kurbo::{Point, Size};
use quire_geometry::{LayoutParams, PageLayout, Viewport, layout_pages};
use quire_hit::{HitParams, hit_test_click, hit_test_hyperlink};
use quire_scene::{FontSpec, GlyphRun, Hyperlink, PageRender, RenderItem, RenderModel, TextSource};
use quire_surface::RecordingSurface;

const LINE: &str = "The quick brown fox jumps over the lazy dog while the canvas keeps every page";

/// Pages of `lines_per_page` full-width lines, every tenth line a link.
fn document(pages: usize, lines_per_page: usize) -> (RenderModel, Vec<PageLayout>) {
    let font = FontSpec::new("Inter", 12.0);
    let model = RenderModel::new(
        (0..pages)
            .map(|page| {
                let items = (0..lines_per_page)
                    .map(|line| {
                        let paragraph = page * lines_per_page + line;
                        let y = 72.0 + line as f64 * 16.0;
                        let mut run = GlyphRun::new(LINE, Point::new(72.0, y), font.clone())
                            .with_source(TextSource::new(paragraph, 0, LINE))
                            .with_line_height(16.0);
                        if line % 10 == 0 {
                            run = run.with_hyperlink(Hyperlink::url("https://example.com"));
                        }
                        RenderItem::GlyphRun(run)
                    })
                    .collect();
                PageRender::new(page, 612.0, 792.0, items)
            })
            .collect(),
    );
    let layouts = layout_pages(
        &model,
        &LayoutParams {
            container_width: 1200.0,
            ..LayoutParams::default()
        },
    );
    (model, layouts)
}

fn bench_hit_test(c: &mut Criterion) {
    let mut group = c.benchmark_group("hit/click");
    let measure = RecordingSurface::new(6.5);
    let params = HitParams::default();

    for lines in [10_usize, 40] {
        let (model, layouts) = document(200, lines);
        let mut viewport = Viewport::new(Size::new(1200.0, 900.0));
        viewport.set_scroll(kurbo::Vec2::new(0.0, 100.0 * 812.0));
        let first = &layouts[100];
        let points: Vec<Point> = (0..64)
            .map(|i| {
                let doc = Point::new(
                    first.x + 40.0 + f64::from(i % 8) * 60.0,
                    first.y + 60.0 + f64::from(i / 8) * 70.0,
                );
                viewport.document_to_screen(doc)
            })
            .collect();

        group.bench_with_input(BenchmarkId::new("hit_test_click", lines), &points, |b, points| {
            b.iter(|| {
                for &pt in points {
                    black_box(hit_test_click(&model, &layouts, &viewport, &measure, pt, &params));
                }
            });
        });

        // Runs on every pointer move.
        group.bench_with_input(
            BenchmarkId::new("hit_test_hyperlink", lines),
            &points,
            |b, points| {
                b.iter(|| {
                    for &pt in points {
                        black_box(hit_test_hyperlink(&model, &layouts, &viewport, &measure, pt));
                    }
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_hit_test);
criterion_main!(benches);
