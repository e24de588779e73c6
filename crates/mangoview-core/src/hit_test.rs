//! Nearest-symbol queries over a page.
//!
//! Pages carry at most a few hundred symbols, so the default
//! [`LinearScan`] simply visits every box. Callers go through the
//! [`HitTester`] trait, which lets an indexed implementation replace the scan
//! without touching call sites.

use crate::geometry::Point;
use crate::page::Page;

/// Default click tolerance radius in image pixels.
pub const DEFAULT_HIT_RADIUS: f64 = 20.0;

/// Result of a nearest-symbol query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SymbolHit {
    pub para_index: usize,
    pub sym_index: usize,
    /// Squared distance from the query point to the symbol box.
    pub distance_sq: f64,
}

impl SymbolHit {
    pub fn distance(&self) -> f64 {
        self.distance_sq.sqrt()
    }
}

/// Spatial query interface used by the selection controller.
pub trait HitTester: Send + Sync {
    /// Finds the symbol closest to `point`.
    ///
    /// Returns `None` when no symbol lies within `max_distance`. Ties resolve
    /// to the first symbol in paragraph-then-symbol order.
    fn nearest_symbol(&self, page: &Page, point: Point, max_distance: f64) -> Option<SymbolHit>;
}

/// Exhaustive scan over every symbol of the page.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearScan;

impl HitTester for LinearScan {
    fn nearest_symbol(&self, page: &Page, point: Point, max_distance: f64) -> Option<SymbolHit> {
        if !point.is_finite() || max_distance.is_nan() || max_distance < 0.0 {
            return None;
        }

        let mut best: Option<SymbolHit> = None;
        for (para_index, para) in page.paragraphs().iter().enumerate() {
            for (sym_index, sym) in para.symbols.iter().enumerate() {
                let distance_sq = sym.bounds.squared_distance_to(point);
                // Strict comparison keeps the earliest symbol on ties
                if best.is_none_or(|b| distance_sq < b.distance_sq) {
                    best = Some(SymbolHit {
                        para_index,
                        sym_index,
                        distance_sq,
                    });
                }
            }
        }

        best.filter(|b| b.distance_sq <= max_distance * max_distance)
    }
}

/// Convenience wrapper running the default scan.
pub fn nearest_symbol(page: &Page, point: Point, max_distance: f64) -> Option<SymbolHit> {
    LinearScan.nearest_symbol(page, point, max_distance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Aabb;
    use crate::page::{Cluster, PageData, Paragraph, Symbol};

    fn page(boxes: Vec<Vec<Aabb>>) -> Page {
        let n = boxes.len();
        Page::from_data(PageData {
            paragraphs: boxes
                .into_iter()
                .map(|b| Paragraph {
                    symbols: b.into_iter().map(Symbol::new).collect(),
                    ..Default::default()
                })
                .collect(),
            clusters: vec![Cluster {
                paragraphs: (0..n).collect(),
                bounds: Aabb::new(0.0, 0.0, 1000.0, 1000.0),
                translation: String::new(),
            }],
            resolution: None,
        })
        .unwrap()
    }

    #[test]
    fn test_inside_box_is_hit() {
        let p = page(vec![vec![Aabb::new(0.0, 0.0, 10.0, 10.0), Aabb::new(20.0, 0.0, 30.0, 10.0)]]);
        let hit = nearest_symbol(&p, Point::new(25.0, 5.0), 0.0).unwrap();
        assert_eq!((hit.para_index, hit.sym_index), (0, 1));
        assert_eq!(hit.distance_sq, 0.0);
    }

    #[test]
    fn test_outside_radius_is_miss() {
        let p = page(vec![vec![Aabb::new(0.0, 0.0, 10.0, 10.0)]]);
        assert!(nearest_symbol(&p, Point::new(31.0, 5.0), DEFAULT_HIT_RADIUS).is_none());
        assert!(nearest_symbol(&p, Point::new(30.0, 5.0), DEFAULT_HIT_RADIUS).is_some());
    }

    #[test]
    fn test_tie_prefers_first_paragraph() {
        // Point sits exactly between the two boxes
        let p = page(vec![
            vec![Aabb::new(0.0, 0.0, 10.0, 10.0)],
            vec![Aabb::new(20.0, 0.0, 30.0, 10.0)],
        ]);
        let hit = nearest_symbol(&p, Point::new(15.0, 5.0), DEFAULT_HIT_RADIUS).unwrap();
        assert_eq!((hit.para_index, hit.sym_index), (0, 0));
        assert_eq!(hit.distance(), 5.0);
    }

    #[test]
    fn test_empty_page_and_bad_input() {
        let p = page(vec![]);
        assert!(nearest_symbol(&p, Point::new(0.0, 0.0), 100.0).is_none());

        let p = page(vec![vec![Aabb::new(0.0, 0.0, 10.0, 10.0)]]);
        assert!(nearest_symbol(&p, Point::new(f64::NAN, 0.0), 100.0).is_none());
        assert!(nearest_symbol(&p, Point::new(5.0, 5.0), -1.0).is_none());
    }
}
