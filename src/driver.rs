//! Pacing and mode control: decides when chaos-game steps run and relays
//! each emitted point to the drawing surface.

use std::ops::RangeInclusive;
use std::time::{Duration, Instant};

use log::debug;

use crate::engine::{AnchorSelector, AnchorSet, Point, RunState};
use crate::surface::{Surface, INK, MARKER};

/// Delay between steps at speed 1, in milliseconds. The speed setting
/// divides it, so speed 400 steps every millisecond.
pub const BASE_STEP_DELAY_MS: u64 = 400;
pub const SPEED_RANGE: RangeInclusive<u32> = 1..=400;
/// Upper bound on catch-up steps per poll so a long stall cannot wedge the
/// frame loop; whatever backlog remains is dropped.
const MAX_STEPS_PER_POLL: u32 = 256;

fn clamp_speed(speed: u32) -> u32 {
    speed.clamp(*SPEED_RANGE.start(), *SPEED_RANGE.end())
}

fn step_interval(speed: u32) -> Duration {
    Duration::from_millis(BASE_STEP_DELAY_MS) / clamp_speed(speed)
}

/// Re-armed one-shot deadline timer. At most one deadline is pending at a
/// time, and cancellation is synchronous: a cancelled ticker never fires.
#[derive(Debug)]
pub struct Ticker {
    interval: Duration,
    deadline: Option<Instant>,
}

impl Ticker {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            deadline: None,
        }
    }

    /// Arms the ticker to fire on the next poll.
    pub fn arm(&mut self, now: Instant) {
        self.deadline = Some(now);
    }

    /// Drops any pending deadline.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Takes effect when the next deadline is scheduled; a pending deadline
    /// keeps its original due time.
    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    /// Fires if the pending deadline has elapsed and schedules the next one.
    /// Scheduling is relative to the due time, not `now`, so the cadence does
    /// not drift with poll jitter.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(due) if now >= due => {
                self.deadline = Some(due + self.interval);
                true
            }
            _ => false,
        }
    }

    /// Forgets any backlog and schedules the next fire one interval from now.
    pub fn rebase(&mut self, now: Instant) {
        if self.deadline.is_some() {
            self.deadline = Some(now + self.interval);
        }
    }
}

/// Owns the run state, the selector and the ticker. All methods run on the
/// UI thread; `poll` is called once per frame.
pub struct Driver<S: AnchorSelector> {
    run: RunState,
    selector: S,
    ticker: Ticker,
    playing: bool,
    speed: u32,
    draw_lines: bool,
}

impl<S: AnchorSelector> Driver<S> {
    pub fn new(anchors: AnchorSet, start: Point, selector: S) -> Self {
        let speed = *SPEED_RANGE.start();
        Self {
            run: RunState::new(anchors, start),
            selector,
            ticker: Ticker::new(step_interval(speed)),
            playing: false,
            speed,
            draw_lines: false,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn iterations(&self) -> u64 {
        self.run.iterations
    }

    /// Enters the playing mode and arms an immediate first step. The run
    /// resumes from its current point; nothing is skipped or repeated.
    pub fn start(&mut self, now: Instant) {
        if self.playing {
            return;
        }
        self.playing = true;
        self.ticker.arm(now);
        debug!("playing at speed {}", self.speed);
    }

    /// Halts stepping without touching the run state. The pending deadline is
    /// cancelled before this returns, so no further step can fire.
    pub fn stop(&mut self) {
        if !self.playing {
            return;
        }
        self.playing = false;
        self.ticker.cancel();
        debug!("stopped after {} iterations", self.run.iterations);
    }

    /// Runs every step whose deadline has elapsed, up to the catch-up bound.
    /// Returns how many steps fired.
    pub fn poll<T: Surface>(&mut self, now: Instant, surface: &mut T) -> u32 {
        let mut fired = 0;
        // Playing is re-checked before every fire; a cancelled run never advances.
        while self.playing && fired < MAX_STEPS_PER_POLL && self.ticker.fire(now) {
            self.advance(surface);
            fired += 1;
        }
        if fired == MAX_STEPS_PER_POLL {
            self.ticker.rebase(now);
            debug!("dropped step backlog after {} catch-up steps", fired);
        }
        fired
    }

    /// Runs exactly one step. Ignored while playing.
    pub fn step_once<T: Surface>(&mut self, surface: &mut T) -> bool {
        if self.playing {
            return false;
        }
        self.advance(surface);
        true
    }

    /// Discards the run and begins a fresh one: clears the surface, marks the
    /// three anchors in ink and the start point in red. When already playing
    /// (a resize mid-animation), the new run keeps animating.
    pub fn restart<T: Surface>(
        &mut self,
        anchors: AnchorSet,
        start: Point,
        surface: &mut T,
        now: Instant,
    ) {
        self.run = RunState::new(anchors, start);
        self.ticker.cancel();
        surface.clear();
        for anchor in anchors.points() {
            surface.draw_point(anchor.x, anchor.y, INK);
        }
        surface.draw_point(start.x, start.y, MARKER);
        if self.playing {
            self.ticker.arm(now);
        }
        debug!("run reset, start ({:.0}, {:.0})", start.x, start.y);
    }

    /// Clamped to [`SPEED_RANGE`]; applies when the next step is scheduled.
    pub fn set_speed(&mut self, speed: u32) {
        let clamped = clamp_speed(speed);
        if clamped != self.speed {
            self.speed = clamped;
            self.ticker.set_interval(step_interval(clamped));
        }
    }

    /// Chooses segment drawing over point drawing for subsequent steps.
    pub fn set_draw_lines(&mut self, draw_lines: bool) {
        self.draw_lines = draw_lines;
    }

    fn advance<T: Surface>(&mut self, surface: &mut T) {
        let previous = self.run.current;
        let (next, emitted) = self.run.step(&mut self.selector);
        self.run = next;
        if self.draw_lines {
            surface.draw_segment(previous.x, previous.y, emitted.x, emitted.y);
        } else {
            surface.draw_point(emitted.x, emitted.y, INK);
        }
    }
}
