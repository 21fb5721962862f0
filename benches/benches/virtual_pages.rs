// Copyright 2025 the Quire Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use quire_virtual_pages::{PageExtents, PageVirtualizer, compute_visible_range};

#[derive(Clone)]
struct Lcg(u64);

impl Lcg {
    fn next_u32(&mut self) -> u32 {
        // Numerical Recipes LCG parameters.
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 32) as u32
    }
}

/// Letter pages with the occasional landscape or legal page mixed in.
fn mixed_heights(count: usize, seed: u64) -> Vec<f64> {
    let mut rng = Lcg(seed);
    (0..count)
        .map(|_| match rng.next_u32() % 10 {
            0 => 612.0,
            1 => 1008.0,
            _ => 792.0,
        })
        .collect()
}

fn bench_visible_range(c: &mut Criterion) {
    let mut group = c.benchmark_group("virtual_pages/compute_visible_range");

    for count in [50_usize, 1_000, 10_000] {
        let heights = mixed_heights(count, 0x0A11_0000_0000_0001);
        let total = PageExtents::new(&heights, 20.0, 0.0).total_height();
        group.throughput(Throughput::Elements(1));

        // Rebuilds the prefix sums every call, as a one-shot query does.
        group.bench_with_input(BenchmarkId::new("one_shot", count), &heights, |b, heights| {
            let mut scroll = 0.0;
            b.iter(|| {
                scroll = (scroll + 977.0) % total;
                black_box(compute_visible_range(heights, 2400.0, scroll, 2, 20.0));
            });
        });

        let extents = PageExtents::new(&heights, 20.0, 0.0);
        group.bench_with_input(BenchmarkId::new("prebuilt", count), &extents, |b, extents| {
            let mut scroll = 0.0;
            b.iter(|| {
                scroll = (scroll + 977.0) % total;
                black_box(extents.range(scroll, 2400.0, 2));
            });
        });
    }

    group.finish();
}

fn bench_scroll_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("virtual_pages/scroll_sweep");
    group.sample_size(30);

    for count in [1_000_usize, 10_000] {
        let heights = mixed_heights(count, 0x0A11_0000_0000_0002);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &heights, |b, heights| {
            let mut virtualizer = PageVirtualizer::new(2);
            virtualizer.set_pages(heights, 20.0);
            let total = virtualizer.extents().total_height();
            b.iter(|| {
                let mut scroll = 0.0;
                let mut drawn = 0_usize;
                while scroll < total {
                    drawn += virtualizer.visible_range(scroll, 1200.0).buffered.len();
                    scroll += 800.0;
                }
                black_box(drawn);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_visible_range, bench_scroll_sweep);
criterion_main!(benches);
