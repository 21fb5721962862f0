// Copyright 2025 the Quire Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::sync::Arc;

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use kurbo::{Point, Size};
use quire_geometry::{LayoutParams, Viewport, layout_pages};
use quire_render::{RenderScheduler, SchedulerConfig};
use quire_scene::{FontSpec, GlyphRun, PageRender, RenderItem, RenderModel};
use quire_surface::RecordingSurface;

fn model(pages: usize) -> Arc<RenderModel> {
    let font = FontSpec::new("Inter", 12.0);
    Arc::new(RenderModel::new(
        (0..pages)
            .map(|page| {
                let items = (0..40)
                    .map(|line| {
                        let run = GlyphRun::new(
                            "Lorem ipsum dolor sit amet, consectetur adipiscing elit",
                            Point::new(72.0, 72.0 + f64::from(line) * 16.0),
                            font.clone(),
                        );
                        RenderItem::GlyphRun(run)
                    })
                    .collect();
                PageRender::new(page, 612.0, 792.0, items)
            })
            .collect(),
    ))
}

fn scheduler(pages: usize, enable_caching: bool) -> RenderScheduler<RecordingSurface> {
    let model = model(pages);
    let mut scheduler = RenderScheduler::new(SchedulerConfig {
        enable_caching,
        ..SchedulerConfig::default()
    });
    scheduler.set_surface(RecordingSurface::default());
    scheduler.set_render_model(Arc::clone(&model));
    scheduler.set_page_layouts(layout_pages(
        &model,
        &LayoutParams {
            container_width: 1200.0,
            ..LayoutParams::default()
        },
    ));
    scheduler.set_viewport(&Viewport::new(Size::new(1200.0, 900.0)));
    scheduler
}

fn bench_scroll_ticks(c: &mut Criterion) {
    let mut group = c.benchmark_group("render/scroll_ticks");
    group.sample_size(20);

    for caching in [true, false] {
        group.bench_function(format!("1000_pages(caching={caching})"), |b| {
            b.iter_batched(
                || scheduler(1_000, caching),
                |mut scheduler| {
                    // Scroll down and back up a stretch of the document.
                    let steps = (0..200).chain((0..200).rev());
                    for step in steps {
                        scheduler.handle_scroll(0.0, f64::from(step) * 300.0, 1200.0, 900.0);
                        if !caching {
                            scheduler.mark_global_dirty();
                        }
                        black_box(scheduler.tick());
                        if let Some(surface) = scheduler.surface_mut() {
                            surface.clear_events();
                        }
                    }
                    black_box(scheduler);
                },
                BatchSize::LargeInput,
            );
        });
    }

    group.bench_function("idle_tick", |b| {
        let mut scheduler = scheduler(1_000, true);
        let _ = scheduler.tick();
        b.iter(|| black_box(scheduler.tick()));
    });

    group.finish();
}

criterion_group!(benches, bench_scroll_ticks);
criterion_main!(benches);
