use core::cell::Cell;
use core::cmp::Ordering;
use rand::Rng;
use std::collections::BinaryHeap;
use web_time::{Duration, Instant};

/// A game whose timed sequences are split into discrete steps.
///
/// Each call applies exactly one step to the state and may hand back the follow-up step together
/// with the delay after which it should run. Steps that no longer match the current phase must be
/// ignored, which is how a reset abandons a pending sequence.
pub trait Animated {
    type Step;

    fn advance<R: Rng + ?Sized>(
        &mut self,
        step: Self::Step,
        rng: &mut R,
    ) -> Option<(Duration, Self::Step)>;
}

/// Source of monotonic time for driving a [`Scheduler`].
pub trait Clock {
    fn now(&self) -> Duration;
}

/// Wall-clock time elapsed since construction.
#[derive(Copy, Clone, Debug)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Clock that only moves when told to, for tests and replays.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    elapsed: Cell<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.elapsed.set(self.elapsed.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.elapsed.get()
    }
}

#[derive(Debug)]
struct Pending<T> {
    due: Duration,
    seq: u64,
    task: T,
}

impl<T> PartialEq for Pending<T> {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl<T> Eq for Pending<T> {}

impl<T> PartialOrd for Pending<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// reversed so the heap yields the earliest due step first, then insertion order
impl<T> Ord for Pending<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due
            .cmp(&self.due)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Cooperative queue of delayed steps.
///
/// Nothing runs on its own: the embedding shell calls [`Scheduler::pump`] with the current clock
/// reading, and every step that has come due is applied in order, one at a time.
#[derive(Debug)]
pub struct Scheduler<T> {
    now: Duration,
    next_seq: u64,
    queue: BinaryHeap<Pending<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_seq: 0,
            queue: BinaryHeap::new(),
        }
    }

    /// Time of the last pump.
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn is_idle(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn next_due(&self) -> Option<Duration> {
        self.queue.peek().map(|pending| pending.due)
    }

    /// Queues `task` to run `delay` after the scheduler's current time.
    pub fn schedule(&mut self, delay: Duration, task: T) {
        self.schedule_at(self.now + delay, task);
    }

    /// Drops every pending step.
    pub fn clear(&mut self) {
        if !self.queue.is_empty() {
            log::trace!("abandoning {} pending steps", self.queue.len());
        }
        self.queue.clear();
    }

    fn schedule_at(&mut self, due: Duration, task: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Pending { due, seq, task });
    }

    /// Applies every step due by `now` to `game`, returning how many ran.
    ///
    /// Follow-up steps are timed from the due time of the step that produced them, so a late pump
    /// catches up on a whole sequence without drifting.
    pub fn pump<G, R>(&mut self, now: Duration, game: &mut G, rng: &mut R) -> usize
    where
        G: Animated<Step = T>,
        R: Rng + ?Sized,
    {
        let mut applied = 0;
        while self.next_due().is_some_and(|due| due <= now) {
            let Some(pending) = self.queue.pop() else {
                break;
            };
            self.now = pending.due;
            if let Some((delay, next)) = game.advance(pending.task, rng) {
                self.schedule_at(pending.due + delay, next);
            }
            applied += 1;
        }
        self.now = self.now.max(now);
        applied
    }

    /// Pumps using a [`Clock`] reading.
    pub fn pump_with<C, G, R>(&mut self, clock: &C, game: &mut G, rng: &mut R) -> usize
    where
        C: Clock + ?Sized,
        G: Animated<Step = T>,
        R: Rng + ?Sized,
    {
        self.pump(clock.now(), game, rng)
    }

    /// Runs the whole queue regardless of delays, skipping the clock ahead as needed.
    pub fn run_until_idle<G, R>(&mut self, game: &mut G, rng: &mut R) -> usize
    where
        G: Animated<Step = T>,
        R: Rng + ?Sized,
    {
        let mut applied = 0;
        while let Some(due) = self.next_due() {
            applied += self.pump(due, game, rng);
        }
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[derive(Default)]
    struct Countdown {
        ticks: Vec<u32>,
    }

    impl Animated for Countdown {
        type Step = u32;

        fn advance<R: Rng + ?Sized>(&mut self, step: u32, _rng: &mut R) -> Option<(Duration, u32)> {
            self.ticks.push(step);
            (step > 0).then(|| (Duration::from_millis(100), step - 1))
        }
    }

    #[test]
    fn steps_run_only_when_due() {
        let clock = ManualClock::new();
        let mut rng = SmallRng::seed_from_u64(0);
        let mut game = Countdown::default();
        let mut scheduler = Scheduler::new();
        scheduler.schedule(Duration::from_millis(100), 2);

        assert_eq!(scheduler.pump_with(&clock, &mut game, &mut rng), 0);
        clock.advance(Duration::from_millis(99));
        assert_eq!(scheduler.pump_with(&clock, &mut game, &mut rng), 0);
        clock.advance(Duration::from_millis(1));
        assert_eq!(scheduler.pump_with(&clock, &mut game, &mut rng), 1);
        assert_eq!(game.ticks, vec![2]);
        assert_eq!(scheduler.next_due(), Some(Duration::from_millis(200)));
    }

    #[test]
    fn late_pump_catches_up_in_order() {
        let mut rng = SmallRng::seed_from_u64(0);
        let mut game = Countdown::default();
        let mut scheduler = Scheduler::new();
        scheduler.schedule(Duration::from_millis(100), 3);

        assert_eq!(scheduler.pump(Duration::from_secs(10), &mut game, &mut rng), 4);
        assert_eq!(game.ticks, vec![3, 2, 1, 0]);
        assert!(scheduler.is_idle());
    }

    #[test]
    fn equal_due_times_keep_insertion_order() {
        let mut rng = SmallRng::seed_from_u64(0);
        let mut game = Countdown::default();
        let mut scheduler = Scheduler::new();
        scheduler.schedule(Duration::from_millis(500), 2);
        scheduler.schedule(Duration::from_millis(500), 1);
        scheduler.schedule(Duration::from_millis(10), 0);

        assert_eq!(scheduler.pump(Duration::from_millis(500), &mut game, &mut rng), 3);
        assert_eq!(game.ticks, vec![0, 2, 1]);
        assert_eq!(scheduler.run_until_idle(&mut game, &mut rng), 3);
        assert_eq!(game.ticks, vec![0, 2, 1, 1, 0, 0]);
    }

    #[test]
    fn clear_abandons_pending_steps() {
        let mut rng = SmallRng::seed_from_u64(0);
        let mut game = Countdown::default();
        let mut scheduler = Scheduler::new();
        scheduler.schedule(Duration::from_millis(10), 5);
        scheduler.clear();

        assert_eq!(scheduler.run_until_idle(&mut game, &mut rng), 0);
        assert!(game.ticks.is_empty());
    }
}
