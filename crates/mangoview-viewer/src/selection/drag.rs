//! Edge-handle drag geometry.
//!
//! Pure span arithmetic used by the controller while a drag is tracked.

use mangoview_core::Selection;

/// Which ends of the anchor span follow the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragEdges {
    pub begin: bool,
    pub end: bool,
}

impl DragEdges {
    pub fn both() -> Self {
        Self {
            begin: true,
            end: true,
        }
    }
}

/// Resolves the handles grabbed by pressing `symbol` inside `span`.
///
/// Short spans (up to three symbols) expose only their first and last symbol
/// as handles; longer spans expose the first two and the last two. Returns
/// `None` for interior symbols and symbols outside the span.
pub fn grab_edges(span: &Selection, symbol: usize) -> Option<DragEdges> {
    if symbol < span.sym_begin || symbol >= span.sym_end {
        return None;
    }

    let (begin, end) = if span.len() <= 3 {
        (symbol == span.sym_begin, symbol == span.last())
    } else {
        (symbol <= span.sym_begin + 1, symbol + 1 >= span.last())
    };

    (begin || end).then_some(DragEdges { begin, end })
}

/// Span produced by dragging the active `edges` of `anchor` onto symbol `hit`.
///
/// The result is never empty: a moving begin stops one short of the anchor
/// end and a moving end stops one past the anchor begin.
pub fn extend(anchor: &Selection, edges: DragEdges, hit: usize) -> Selection {
    let (b, e) = (anchor.sym_begin, anchor.sym_end);
    let (begin, end) = match (edges.begin, edges.end) {
        (true, true) => (hit.min(b), (hit + 1).max(e)),
        (true, false) => (hit.min(e - 1), e),
        (false, true) => (b, (hit + 1).max(b + 1)),
        (false, false) => (b, e),
    };
    Selection::new(anchor.para_index, begin, end).unwrap_or(*anchor)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(b: usize, e: usize) -> Selection {
        Selection::new(0, b, e).unwrap()
    }

    #[test]
    fn test_short_span_handles() {
        let s = span(2, 5);
        assert_eq!(
            grab_edges(&s, 2),
            Some(DragEdges {
                begin: true,
                end: false
            })
        );
        assert_eq!(grab_edges(&s, 3), None);
        assert_eq!(
            grab_edges(&s, 4),
            Some(DragEdges {
                begin: false,
                end: true
            })
        );
        assert_eq!(grab_edges(&s, 5), None);
        assert_eq!(grab_edges(&s, 1), None);
    }

    #[test]
    fn test_single_symbol_grabs_both_edges() {
        assert_eq!(grab_edges(&span(3, 4), 3), Some(DragEdges::both()));
    }

    #[test]
    fn test_long_span_handles() {
        let s = span(0, 5);
        assert!(grab_edges(&s, 0).is_some_and(|e| e.begin && !e.end));
        assert!(grab_edges(&s, 1).is_some_and(|e| e.begin && !e.end));
        assert_eq!(grab_edges(&s, 2), None);
        assert!(grab_edges(&s, 3).is_some_and(|e| !e.begin && e.end));
        assert!(grab_edges(&s, 4).is_some_and(|e| !e.begin && e.end));
    }

    #[test]
    fn test_four_symbol_span_middle_touches_both_handles() {
        // [0, 4): symbols 0,1 are begin handles and 2,3 are end handles
        let s = span(0, 4);
        assert!(grab_edges(&s, 1).is_some_and(|e| e.begin && !e.end));
        assert!(grab_edges(&s, 2).is_some_and(|e| !e.begin && e.end));
    }

    #[test]
    fn test_extend_both_edges() {
        let anchor = span(3, 4);
        assert_eq!(extend(&anchor, DragEdges::both(), 1), span(1, 4));
        assert_eq!(extend(&anchor, DragEdges::both(), 6), span(3, 7));
        assert_eq!(extend(&anchor, DragEdges::both(), 3), anchor);
    }

    #[test]
    fn test_extend_begin_only() {
        let anchor = span(2, 5);
        let begin = DragEdges {
            begin: true,
            end: false,
        };
        assert_eq!(extend(&anchor, begin, 0), span(0, 5));
        assert_eq!(extend(&anchor, begin, 3), span(3, 5));
        // Dragging the begin past the end stops one short of it
        assert_eq!(extend(&anchor, begin, 9), span(4, 5));
    }

    #[test]
    fn test_extend_end_only() {
        let anchor = span(2, 5);
        let end = DragEdges {
            begin: false,
            end: true,
        };
        assert_eq!(extend(&anchor, end, 7), span(2, 8));
        assert_eq!(extend(&anchor, end, 3), span(2, 4));
        assert_eq!(extend(&anchor, end, 0), span(2, 3));
    }
}
