// Segment ordering and the animation loop
//
// Every triangle becomes one `SegmentTask`: a queue of segments that draws
// one entry per timer tick and cancels its own timer once the queue runs dry.
// All tasks live on a single-threaded `EventLoop` with a millisecond clock.
// Nothing runs in parallel here. The drawing context is lent to whichever
// task's timer fires next, so tasks never hold it and never need a lock.

use crate::error::DrawError;
use crate::geometry::{Color, Point};
use crate::surface::{draw_line, DrawingContext};
use crate::triangles::Triangle;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, VecDeque};
use std::time::{Duration, Instant};

/// One line to draw, coloured by its triangle
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
    pub color: Color,
}

/// Ordered segments for one filled triangle
///
/// The three sides come first: (0,1), (1,2), (2,0). Then the interior chain
/// (k, k+1) for k = 2 ..= n-2. A triangle of n points therefore yields
/// exactly n segments, all sharing `color`. A `Triangle` always holds its
/// three corners, so the sides are always there.
pub fn schedule(triangle: &Triangle, color: Color) -> Vec<Segment> {
    let points = triangle.points();
    let segment = |a: usize, b: usize| Segment {
        from: points[a],
        to: points[b],
        color,
    };

    let mut segments = Vec::with_capacity(points.len());
    segments.push(segment(0, 1));
    segments.push(segment(1, 2));
    segments.push(segment(2, 0));
    segments.extend((2..points.len() - 1).map(|k| segment(k, k + 1)));
    segments
}

/// What a task reports back after one tick
#[derive(Clone, Debug, PartialEq)]
pub enum TaskStatus {
    /// Drew a segment, more remain
    Pending,
    /// Drew my last segment; cancel my timer
    Done,
    /// Had nothing left to draw; cancel my timer
    Empty,
    /// The surface refused a draw; drop the rest of my queue
    Failed(DrawError),
}

/// A unit of cooperative work resumed by a recurring timer
pub trait Task {
    fn tick(&mut self, ctx: &mut dyn DrawingContext) -> TaskStatus;
}

impl<T: Task + ?Sized> Task for Box<T> {
    fn tick(&mut self, ctx: &mut dyn DrawingContext) -> TaskStatus {
        (**self).tick(ctx)
    }
}

/// Draws one triangle's segments, one per tick
pub struct SegmentTask {
    queue: VecDeque<Segment>,
    use_color: bool,
}

impl SegmentTask {
    /// `use_color` false leaves the stroke colour alone for every segment
    pub fn new(segments: Vec<Segment>, use_color: bool) -> Self {
        Self {
            queue: segments.into(),
            use_color,
        }
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl Task for SegmentTask {
    fn tick(&mut self, ctx: &mut dyn DrawingContext) -> TaskStatus {
        let Some(segment) = self.queue.pop_front() else {
            return TaskStatus::Empty;
        };

        let color = self.use_color.then_some(segment.color);
        if let Err(err) = draw_line(ctx, segment.from, segment.to, color) {
            self.queue.clear();
            return TaskStatus::Failed(err);
        }

        if self.queue.is_empty() {
            TaskStatus::Done
        } else {
            TaskStatus::Pending
        }
    }
}

/// Whether the loop waits for real time to pass between ticks
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Pacing {
    /// Advance the clock instantly; the result is identical, only faster
    #[default]
    Virtual,
    /// Sleep until each deadline, so frames appear at the configured speed
    RealTime,
}

/// Handle returned by [`EventLoop::set_interval`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(usize);

/// Passed to the observer after every tick
#[derive(Clone, Debug, PartialEq)]
pub struct Tick {
    /// Clock time of this tick in milliseconds
    pub now_ms: u64,
    pub timer: TimerId,
    pub status: TaskStatus,
}

/// Outcome of running a loop to completion
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunReport {
    /// Ticks that drew a segment
    pub segments_drawn: usize,
    pub tasks_completed: usize,
    /// Tasks stopped by a draw failure, with the error that stopped them
    pub failures: Vec<(TimerId, DrawError)>,
    /// Clock time when the last timer was cancelled
    pub elapsed_ms: u64,
}

struct Timer<T> {
    task: T,
    interval: u64,
}

/// Single-threaded loop of recurring timers
///
/// Ticks are delivered in deadline order; ties go to the timer that was
/// scheduled first. That order between different tasks is an artefact of
/// the loop, not something callers should depend on.
pub struct EventLoop<T: Task = SegmentTask> {
    timers: Vec<Option<Timer<T>>>,
    // (deadline, sequence, timer index)
    queue: BinaryHeap<Reverse<(u64, u64, usize)>>,
    now_ms: u64,
    sequence: u64,
}

impl<T: Task> Default for EventLoop<T> {
    fn default() -> Self {
        Self {
            timers: Vec::new(),
            queue: BinaryHeap::new(),
            now_ms: 0,
            sequence: 0,
        }
    }
}

impl<T: Task> EventLoop<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `task` every `interval_ms`, first firing one interval from now
    pub fn set_interval(&mut self, task: T, interval_ms: u64) -> TimerId {
        let index = self.timers.len();
        self.timers.push(Some(Timer {
            task,
            interval: interval_ms,
        }));
        self.push_deadline(self.now_ms.saturating_add(interval_ms), index);
        TimerId(index)
    }

    /// Stop a timer and drop its task; cancelling twice is harmless
    pub fn clear_interval(&mut self, id: TimerId) {
        if let Some(slot) = self.timers.get_mut(id.0) {
            *slot = None;
        }
    }

    /// Timers that have not been cancelled yet
    pub fn active(&self) -> usize {
        self.timers.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Deliver ticks until every timer has been cancelled
    ///
    /// A failing task is logged and cancelled; its siblings keep running.
    pub fn run<F>(
        &mut self,
        ctx: &mut dyn DrawingContext,
        pacing: Pacing,
        mut observer: F,
    ) -> RunReport
    where
        F: FnMut(&Tick, &dyn DrawingContext),
    {
        let started = Instant::now();
        let start_ms = self.now_ms;
        let mut report = RunReport::default();

        while let Some(Reverse((deadline, _, index))) = self.queue.pop() {
            // Deadlines of cancelled timers are dropped lazily
            let Some(timer) = self.timers[index].as_mut() else {
                continue;
            };

            if pacing == Pacing::RealTime {
                let target = Duration::from_millis(deadline - start_ms);
                if let Some(wait) = target.checked_sub(started.elapsed()) {
                    std::thread::sleep(wait);
                }
            }
            self.now_ms = deadline;

            let status = timer.task.tick(ctx);
            let interval = timer.interval;
            let id = TimerId(index);

            match &status {
                TaskStatus::Pending => {
                    report.segments_drawn += 1;
                    // Huge intervals pin the deadline at the end of the clock
                    self.push_deadline(deadline.saturating_add(interval), index);
                }
                TaskStatus::Done => {
                    report.segments_drawn += 1;
                    report.tasks_completed += 1;
                    log::debug!("task {} finished at {}ms", index, deadline);
                    self.clear_interval(id);
                }
                TaskStatus::Empty => {
                    report.tasks_completed += 1;
                    self.clear_interval(id);
                }
                TaskStatus::Failed(err) => {
                    log::warn!("task {} stopped at {}ms: {}", index, deadline, err);
                    report.failures.push((id, err.clone()));
                    self.clear_interval(id);
                }
            }

            observer(
                &Tick {
                    now_ms: deadline,
                    timer: id,
                    status,
                },
                &*ctx,
            );
        }

        report.elapsed_ms = self.now_ms - start_ms;
        report
    }

    fn push_deadline(&mut self, deadline: u64, index: usize) {
        self.queue.push(Reverse((deadline, self.sequence, index)));
        self.sequence += 1;
    }
}
