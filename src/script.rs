//! Input scripts for headless replay.
//!
//! A script is a JSON array of steps, for example:
//!
//! ```json
//! [
//!   {"resize": {"width": 1280, "height": 800}},
//!   {"click": {"x": 115, "y": 115, "t": 0}},
//!   {"advance": {"t": 250}},
//!   {"down": {"pointer": {"touch": 1}, "x": 115, "y": 115, "t": 1000}},
//!   {"move": {"pointer": {"touch": 1}, "x": 195, "y": 115, "t": 1010}},
//!   {"up": {"pointer": {"touch": 1}, "x": 195, "y": 115, "t": 1020}},
//!   {"tick": {}},
//!   {"navigate": {"index": 2}}
//! ]
//! ```

use std::path::Path;

use anyhow::Context;
use mangoview_core::Point;
use mangoview_viewer::{OverlayView, PageSource, PointerId, ViewerSession};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

fn mouse() -> PointerId {
    PointerId::Mouse
}

/// One scripted input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Click {
        x: f64,
        y: f64,
        t: u64,
    },
    Advance {
        t: u64,
    },
    Down {
        #[serde(default = "mouse")]
        pointer: PointerId,
        x: f64,
        y: f64,
        t: u64,
    },
    Move {
        #[serde(default = "mouse")]
        pointer: PointerId,
        x: f64,
        y: f64,
        t: u64,
    },
    Up {
        #[serde(default = "mouse")]
        pointer: PointerId,
        x: f64,
        y: f64,
        t: u64,
    },
    Cancel {
        #[serde(default = "mouse")]
        pointer: PointerId,
    },
    Scroll {
        x: f64,
        y: f64,
    },
    Resize {
        width: f64,
        height: f64,
    },
    /// Runs `count` settle ticks, or until the overlay rests.
    Tick {
        #[serde(default)]
        count: Option<u32>,
    },
    Navigate {
        index: usize,
    },
}

/// Parses a script from JSON.
pub fn parse_script(json: &str) -> anyhow::Result<Vec<Step>> {
    serde_json::from_str(json).context("invalid input script")
}

/// Reads and parses a script file.
pub fn load_script(path: &Path) -> anyhow::Result<Vec<Step>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read script {}", path.display()))?;
    parse_script(&json)
}

/// What a replay did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplaySummary {
    pub steps: usize,
    pub ticks: usize,
    pub page: Option<usize>,
}

/// Feeds `steps` into `session`, serving page loads from `source`.
pub async fn run_script<V, S>(
    session: &mut ViewerSession<V>,
    source: &S,
    steps: &[Step],
) -> ReplaySummary
where
    V: OverlayView,
    S: PageSource + ?Sized,
{
    let mut ticks = 0;

    for step in steps {
        debug!("Step {:?}", step);
        match *step {
            Step::Click { x, y, t } => session.click(Point::new(x, y), t),
            Step::Advance { t } => session.advance(t),
            Step::Down { pointer, x, y, t } => session.pointer_down(pointer, Point::new(x, y), t),
            Step::Move { pointer, x, y, t } => session.pointer_move(pointer, Point::new(x, y), t),
            Step::Up { pointer, x, y, t } => session.pointer_up(pointer, Point::new(x, y), t),
            Step::Cancel { pointer } => session.pointer_cancel(pointer),
            Step::Scroll { x, y } => session.scroll(x, y),
            Step::Resize { width, height } => session.resize(width, height),
            Step::Tick { count } => {
                let limit = count.map_or(usize::MAX, |c| c as usize);
                let mut ran = 0;
                while ran < limit && session.positioner().is_settling() {
                    session.tick();
                    ran += 1;
                }
                ticks += ran;
            }
            Step::Navigate { index } => {
                session.load(source, index).await;
            }
        }

        session.serve_requests(source).await;
        // Let async bus receivers drain before the next step
        tokio::task::yield_now().await;
    }

    info!(
        "Replayed {} steps, {} ticks, on page {:?}",
        steps.len(),
        ticks,
        session.current_page()
    );
    ReplaySummary {
        steps: steps.len(),
        ticks,
        page: session.current_page(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_steps() {
        let steps = parse_script(
            r#"[
                {"click": {"x": 1, "y": 2, "t": 3}},
                {"down": {"x": 1, "y": 2, "t": 4}},
                {"move": {"pointer": {"touch": 9}, "x": 5, "y": 2, "t": 5}},
                {"tick": {}},
                {"tick": {"count": 3}},
                {"cancel": {"pointer": {"touch": 9}}}
            ]"#,
        )
        .unwrap();

        assert_eq!(steps.len(), 6);
        assert_eq!(
            steps[1],
            Step::Down {
                pointer: PointerId::Mouse,
                x: 1.0,
                y: 2.0,
                t: 4
            }
        );
        assert!(matches!(
            steps[2],
            Step::Move {
                pointer: PointerId::Touch(9),
                ..
            }
        ));
        assert_eq!(steps[3], Step::Tick { count: None });
        assert_eq!(steps[4], Step::Tick { count: Some(3) });
        assert_eq!(
            steps[5],
            Step::Cancel {
                pointer: PointerId::Touch(9)
            }
        );
    }

    #[test]
    fn test_unknown_step_rejected() {
        assert!(parse_script(r#"[{"jump": {}}]"#).is_err());
    }
}
