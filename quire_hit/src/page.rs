// Copyright 2025 the Quire Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hit testing inside one page, in page-local coordinates.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _; // for `abs`
use kurbo::{Point, Rect};
use quire_scene::{GlyphRun, PageRender, TextPosition};
use quire_surface::TextMeasure;

use crate::text::{closest_char_boundary, run_width};
use crate::HitParams;

/// Baselines closer than this are treated as the same visual line.
const SAME_LINE: f64 = 1e-6;

/// Result of hit testing a page-local point.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PageHit {
    /// The document position under the point.
    pub position: TextPosition,
    /// Index into `page.items` of the glyph run hit, or `None` for the
    /// empty-line fallback.
    pub run: Option<usize>,
}

/// Maps a page-local point to a document position.
///
/// The glyph run whose line box contains `pt.y` wins; when several do, the
/// run with the nearest baseline wins, and among runs on that baseline the
/// one horizontally nearest `pt.x`. The offset inside the run is the closest
/// measured character boundary.
///
/// When no run spans `pt.y` (an empty line, the space between paragraphs or
/// the page margins), the nearest visual line is chosen using
/// [`HitParams::fallback_line_height`] for runs without a line height, and
/// its start position is returned. Points below all content give the end of
/// the last paragraph on the page.
///
/// Returns `None` if the page has no hit-testable runs.
#[must_use]
pub fn hit_test_page<M: TextMeasure + ?Sized>(
    page: &PageRender,
    pt: Point,
    measure: &M,
    params: &HitParams,
) -> Option<PageHit> {
    if !pt.is_finite() {
        return None;
    }
    if let Some((index, run)) = run_at(page, pt, measure) {
        let boundary = closest_char_boundary(run, pt.x, measure);
        return run.position_at(boundary).map(|position| PageHit {
            position,
            run: Some(index),
        });
    }
    fallback(page, pt.y, params)
}

/// The run on the line under `pt`, with its item index.
fn run_at<'a, M: TextMeasure + ?Sized>(
    page: &'a PageRender,
    pt: Point,
    measure: &M,
) -> Option<(usize, &'a GlyphRun)> {
    let mut best: Option<(usize, &GlyphRun, f64, f64)> = None;
    for (index, run) in page.glyph_runs() {
        if run.source.is_none() {
            continue;
        }
        // Vertical extent does not depend on the width.
        let line = run.line_box(0.0);
        if pt.y < line.y0 || pt.y > line.y1 {
            continue;
        }
        let dy = (pt.y - run.baseline()).abs();
        let width = run_width(run, measure);
        let dx = horizontal_distance(run.origin.x, run.origin.x + width, pt.x);
        let better = match best {
            None => true,
            Some((_, _, best_dy, best_dx)) => {
                dy < best_dy - SAME_LINE || ((dy - best_dy).abs() <= SAME_LINE && dx < best_dx)
            }
        };
        if better {
            best = Some((index, run, dy, dx));
        }
    }
    best.map(|(index, run, _, _)| (index, run))
}

fn horizontal_distance(x0: f64, x1: f64, x: f64) -> f64 {
    if x < x0 {
        x0 - x
    } else if x > x1 {
        x - x1
    } else {
        0.0
    }
}

/// Vertical band a run's line occupies for the fallback search.
fn fallback_band(run: &GlyphRun, params: &HitParams) -> Rect {
    let text = run.text_box(0.0);
    let height = run.line_height.unwrap_or(params.fallback_line_height);
    let center = text.center().y;
    Rect::new(text.x0, center - height * 0.5, text.x0, center + height * 0.5)
}

fn fallback(page: &PageRender, y: f64, params: &HitParams) -> Option<PageHit> {
    let runs = || page.glyph_runs().filter(|(_, run)| run.source.is_some());

    let bottom = runs()
        .map(|(_, run)| fallback_band(run, params).y1)
        .fold(f64::NEG_INFINITY, f64::max);
    if y > bottom {
        // Below everything: the end of the last paragraph.
        return runs()
            .filter_map(|(_, run)| run.position_at(run.char_len()))
            .max()
            .map(|position| PageHit {
                position,
                run: None,
            });
    }

    let mut nearest: Option<(&GlyphRun, f64)> = None;
    for (_, run) in runs() {
        let band = fallback_band(run, params);
        let distance = if y < band.y0 {
            band.y0 - y
        } else if y > band.y1 {
            y - band.y1
        } else {
            0.0
        };
        let closer = match nearest {
            None => true,
            Some((best, best_distance)) => {
                distance < best_distance
                    || (distance <= best_distance && run.position_at(0) < best.position_at(0))
            }
        };
        if closer {
            nearest = Some((run, distance));
        }
    }
    nearest
        .and_then(|(run, _)| run.position_at(0))
        .map(|position| PageHit {
            position,
            run: None,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use quire_scene::{FontSpec, RenderItem, TextSource};
    use quire_surface::RecordingSurface;

    fn run(text: &str, x: f64, baseline: f64, paragraph: usize, offset: usize) -> RenderItem {
        RenderItem::GlyphRun(
            GlyphRun::new(text, Point::new(x, baseline), FontSpec::new("Inter", 10.0))
                .with_source(TextSource::new(paragraph, offset, text))
                .with_line_height(14.0),
        )
    }

    /// Two paragraphs; an empty one sits between them around y = 60.
    fn page() -> PageRender {
        PageRender::new(
            0,
            400.0,
            400.0,
            vec![
                run("Hello ", 50.0, 40.0, 0, 0),
                run("world", 110.0, 40.0, 0, 6),
                run("Second", 50.0, 80.0, 2, 0),
            ],
        )
    }

    #[test]
    fn picks_run_on_the_clicked_line() {
        let m = RecordingSurface::new(10.0);
        let params = HitParams::default();
        let hit = hit_test_page(&page(), Point::new(134.0, 38.0), &m, &params).unwrap();
        assert_eq!(hit.run, Some(1));
        assert_eq!(hit.position, TextPosition::new(0, 8));

        let hit = hit_test_page(&page(), Point::new(76.0, 82.0), &m, &params).unwrap();
        assert_eq!(hit.run, Some(2));
        assert_eq!(hit.position, TextPosition::new(2, 3));
    }

    #[test]
    fn clicks_past_line_end_snap_to_nearest_run() {
        let m = RecordingSurface::new(10.0);
        let hit = hit_test_page(&page(), Point::new(390.0, 40.0), &m, &HitParams::default())
            .unwrap();
        assert_eq!(hit.position, TextPosition::new(0, 11));
    }

    #[test]
    fn empty_line_falls_back_to_nearest_line_start() {
        let m = RecordingSurface::new(10.0);
        let params = HitParams {
            fallback_line_height: 14.0,
        };
        // Line boxes are [30, 44] and [70, 84]; 55 is nearer the first.
        let hit = hit_test_page(&page(), Point::new(200.0, 55.0), &m, &params).unwrap();
        assert_eq!(hit.run, None);
        assert_eq!(hit.position, TextPosition::new(0, 0));
        let hit = hit_test_page(&page(), Point::new(200.0, 66.0), &m, &params).unwrap();
        assert_eq!(hit.position, TextPosition::new(2, 0));
    }

    #[test]
    fn below_content_is_end_of_last_paragraph() {
        let m = RecordingSurface::new(10.0);
        let hit = hit_test_page(&page(), Point::new(10.0, 300.0), &m, &HitParams::default())
            .unwrap();
        assert_eq!(hit.position, TextPosition::new(2, 6));
    }

    #[test]
    fn nothing_to_hit() {
        let m = RecordingSurface::new(10.0);
        let blank = PageRender::new(0, 100.0, 100.0, vec![]);
        assert!(hit_test_page(&blank, Point::new(10.0, 10.0), &m, &HitParams::default()).is_none());
        assert!(hit_test_page(&page(), Point::new(f64::NAN, 10.0), &m, &HitParams::default()).is_none());
    }
}
