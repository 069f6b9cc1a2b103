//! Chaos-game point generator for the Sierpinski triangle.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Inset of the three anchors from the surface edges, in pixels.
pub const ANCHOR_PADDING: f64 = 5.0;

/// A position on the drawing surface. Produced once, never mutated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Arithmetic midpoint between `self` and `other`.
    pub fn midpoint(&self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// The three fixed corner points of one fractal run, ordered left, top, right.
/// Order only matters for initial placement; selection treats all three alike.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnchorSet {
    points: [Point; 3],
}

impl AnchorSet {
    pub const LEN: usize = 3;

    pub fn new(left: Point, top: Point, right: Point) -> Self {
        Self {
            points: [left, top, right],
        }
    }

    /// Corner layout for a `width` x `height` surface: bottom-left, top-center
    /// and bottom-right, inset by [`ANCHOR_PADDING`].
    pub fn for_surface(width: f64, height: f64) -> Self {
        Self::new(
            Point::new(ANCHOR_PADDING, height - ANCHOR_PADDING),
            Point::new(width / 2.0, ANCHOR_PADDING),
            Point::new(width - ANCHOR_PADDING, height - ANCHOR_PADDING),
        )
    }

    pub fn get(&self, index: usize) -> Point {
        self.points[index]
    }

    pub fn points(&self) -> [Point; 3] {
        self.points
    }
}

/// Uniform anchor-index provider. Injected into [`RunState::step`] so tests
/// can force specific selections.
pub trait AnchorSelector {
    /// Returns an index in `0..len`, each equally likely, independent of any
    /// previous call.
    fn select(&mut self, len: usize) -> usize;
}

/// Production selector backed by a seedable RNG.
pub struct UniformSelector {
    rng: StdRng,
}

impl UniformSelector {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl AnchorSelector for UniformSelector {
    fn select(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

/// Complete state of one fractal generation session. Replaced wholesale by
/// [`RunState::step`]; never partially mutated.
#[derive(Clone, Copy, Debug)]
pub struct RunState {
    pub anchors: AnchorSet,
    pub current: Point,
    pub iterations: u64,
}

impl RunState {
    /// Fresh run starting at `start` with zero iterations. Callers substitute
    /// the surface center when the user has not picked a start.
    pub fn new(anchors: AnchorSet, start: Point) -> Self {
        Self {
            anchors,
            current: start,
            iterations: 0,
        }
    }

    /// One chaos-game step: pick an anchor uniformly at random and move
    /// halfway toward it. Returns the successor state and the emitted
    /// midpoint. Infallible for finite coordinates.
    pub fn step<S: AnchorSelector>(&self, selector: &mut S) -> (RunState, Point) {
        let anchor = self.anchors.get(selector.select(AnchorSet::LEN));
        let mid = self.current.midpoint(anchor);
        (
            RunState {
                anchors: self.anchors,
                current: mid,
                iterations: self.iterations + 1,
            },
            mid,
        )
    }
}
