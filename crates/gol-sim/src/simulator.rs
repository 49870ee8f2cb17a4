//! Play/pause simulator driving the grid engine from clock timers.

use crate::clock::{Clock, Firing, TimerHandle};
use crate::fps::FpsEstimator;
use crate::render::RenderSink;
use gol_core::{Error, Result, SeedConfig, SimulationConfig};
use gol_world::{GridEngine, Rule};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, instrument, trace, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimulatorState {
    Stopped,
    Running,
}

pub struct Simulator<C: Clock, R: RenderSink> {
    engine: GridEngine,
    clock: C,
    sink: R,
    state: SimulatorState,
    step_size: usize,
    tick_interval: Duration,
    fps_report_interval: Duration,
    render_enabled: bool,
    fps: FpsEstimator,
    tick_timer: Option<TimerHandle>,
    fps_timer: Option<TimerHandle>,
    ticks: u64,
    fps_reports: u64,
}

impl<C: Clock, R: RenderSink> Simulator<C, R> {
    /// Create a stopped simulator over a freshly seeded `width` x `height` grid
    pub fn new(
        width: usize,
        height: usize,
        rule: Rule,
        seed: &SeedConfig,
        clock: C,
        sink: R,
    ) -> Result<Self> {
        let mut engine = GridEngine::with_rule(width, height, rule)?;
        engine.apply_seed(seed)?;
        Ok(Self::from_engine(engine, clock, sink))
    }

    pub fn from_config(config: &SimulationConfig, clock: C, sink: R) -> Result<Self> {
        config.validate()?;
        let engine = GridEngine::from_config(config)?;
        let mut sim = Self::with_settings(
            engine,
            clock,
            sink,
            config.step_size,
            Duration::from_millis(config.tick_interval_ms),
            Duration::from_millis(config.fps_report_interval_ms),
            config.render_enabled,
        );
        sim.render();
        Ok(sim)
    }

    /// Wrap an existing engine with default timing: one generation per
    /// zero-delay tick and an FPS report every 500 ms
    pub fn from_engine(engine: GridEngine, clock: C, sink: R) -> Self {
        let defaults = SimulationConfig::default();
        let mut sim = Self::with_settings(
            engine,
            clock,
            sink,
            defaults.step_size,
            Duration::from_millis(defaults.tick_interval_ms),
            Duration::from_millis(defaults.fps_report_interval_ms),
            defaults.render_enabled,
        );
        sim.render();
        sim
    }

    fn with_settings(
        engine: GridEngine,
        clock: C,
        sink: R,
        step_size: usize,
        tick_interval: Duration,
        fps_report_interval: Duration,
        render_enabled: bool,
    ) -> Self {
        Self {
            engine,
            clock,
            sink,
            state: SimulatorState::Stopped,
            step_size,
            tick_interval,
            fps_report_interval,
            render_enabled,
            fps: FpsEstimator::new(),
            tick_timer: None,
            fps_timer: None,
            ticks: 0,
            fps_reports: 0,
        }
    }

    pub fn state(&self) -> SimulatorState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == SimulatorState::Running
    }

    /// Start the tick and FPS-report timers. No-op when already running.
    #[instrument(skip(self))]
    pub fn play(&mut self) {
        if self.is_playing() {
            return;
        }

        self.fps.restart(self.clock.now());
        self.tick_timer = Some(self.clock.schedule(self.tick_interval));
        self.fps_timer = Some(self.clock.schedule(self.fps_report_interval));
        self.state = SimulatorState::Running;

        info!(
            step_size = self.step_size,
            generation = self.engine.generation(),
            "Simulation playing"
        );
    }

    /// Cancel both timers, leaving the grid as it is. No-op when stopped.
    #[instrument(skip(self))]
    pub fn pause(&mut self) {
        if let Some(handle) = self.tick_timer.take() {
            self.clock.cancel(handle);
        }
        if let Some(handle) = self.fps_timer.take() {
            self.clock.cancel(handle);
        }

        if self.state == SimulatorState::Running {
            self.state = SimulatorState::Stopped;
            info!(
                generation = self.engine.generation(),
                ticks = self.ticks,
                "Simulation paused"
            );
        }
    }

    /// Play when stopped, pause when running; returns the new state
    pub fn toggle(&mut self) -> SimulatorState {
        if self.is_playing() {
            self.pause();
        } else {
            self.play();
        }
        self.state
    }

    pub fn step_size(&self) -> usize {
        self.step_size
    }

    /// Generations per tick from the next tick on. Non-positive values are
    /// rejected and the previous size kept.
    pub fn set_step_size(&mut self, n: i64) -> Result<()> {
        if n < 1 {
            warn!("Rejected step size {}; keeping {}", n, self.step_size);
            return Err(Error::InvalidStepSize(n));
        }
        self.step_size = n as usize;
        debug!("Step size set to {}", self.step_size);
        Ok(())
    }

    pub fn render_enabled(&self) -> bool {
        self.render_enabled
    }

    pub fn set_render_enabled(&mut self, enabled: bool) {
        self.render_enabled = enabled;
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// Change the tick period; a running tick timer is rescheduled
    pub fn set_tick_interval(&mut self, interval: Duration) {
        self.tick_interval = interval;
        if let Some(handle) = self.tick_timer.take() {
            self.clock.cancel(handle);
            self.tick_timer = Some(self.clock.schedule(interval));
        }
    }

    pub fn fps_report_interval(&self) -> Duration {
        self.fps_report_interval
    }

    /// Change the FPS report period; a running report timer is rescheduled
    pub fn set_fps_report_interval(&mut self, interval: Duration) -> Result<()> {
        if interval.is_zero() {
            return Err(Error::Config(
                "FPS report interval must be greater than zero".to_string(),
            ));
        }
        self.fps_report_interval = interval;
        if let Some(handle) = self.fps_timer.take() {
            self.clock.cancel(handle);
            self.fps_timer = Some(self.clock.schedule(interval));
        }
        Ok(())
    }

    /// Run every timer firing that has come due. Returns the number of ticks run.
    pub fn pump(&mut self) -> usize {
        let firings = self.clock.poll_due();
        let before = self.ticks;
        for firing in firings {
            self.on_timer(firing);
        }
        (self.ticks - before) as usize
    }

    /// Dispatch one firing. Firings of cancelled timers are ignored.
    pub fn on_timer(&mut self, firing: Firing) {
        if Some(firing.handle) == self.tick_timer {
            self.tick();
        } else if Some(firing.handle) == self.fps_timer {
            self.report_fps();
        } else {
            trace!(handle = ?firing.handle, "Ignoring stale timer firing");
        }
    }

    fn tick(&mut self) {
        // Measured time between ticks, not the scheduled period.
        self.fps.record_tick(self.clock.now());
        self.engine.advance(self.step_size);
        self.ticks += 1;
        self.render();
    }

    fn report_fps(&mut self) {
        self.fps_reports += 1;
        info!(fps = self.fps.rounded(), "FPS");
    }

    fn render(&mut self) {
        if self.render_enabled {
            self.sink.render(self.engine.snapshot());
        }
    }

    /// Smoothed ticks-per-second estimate
    pub fn fps(&self) -> f64 {
        self.fps.fps()
    }

    /// Ticks run since construction
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn engine(&self) -> &GridEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut GridEngine {
        &mut self.engine
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    pub fn sink(&self) -> &R {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut R {
        &mut self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use gol_core::Position;
    use gol_world::{RelativePattern, Snapshot};

    #[derive(Default)]
    struct Recorder {
        generations: Vec<u64>,
    }

    impl RenderSink for Recorder {
        fn render(&mut self, snapshot: Snapshot<'_>) {
            self.generations.push(snapshot.generation);
        }
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    /// Advance the clock in `step_ms` increments, pumping after each one
    fn run_for(
        sim: &mut Simulator<ManualClock, Recorder>,
        step_ms: u64,
        steps: usize,
    ) -> usize {
        (0..steps)
            .map(|_| {
                sim.clock_mut().advance(ms(step_ms));
                sim.pump()
            })
            .sum()
    }

    fn blinker_sim(tick_ms: u64) -> Simulator<ManualClock, Recorder> {
        let config = SimulationConfig {
            width: 10,
            height: 10,
            tick_interval_ms: tick_ms,
            fps_report_interval_ms: 500,
            seed: SeedConfig::Pattern {
                name: "blinker".to_string(),
                row: Some(5),
                col: Some(5),
            },
            ..Default::default()
        };
        Simulator::from_config(&config, ManualClock::new(), Recorder::default()).unwrap()
    }

    #[test]
    fn test_construction_renders_initial_grid() {
        let sim = blinker_sim(10);
        assert_eq!(sim.state(), SimulatorState::Stopped);
        assert_eq!(sim.sink().generations, vec![0]);
        assert_eq!(sim.engine().population(), 3);
    }

    #[test]
    fn test_new_rejects_bad_dimensions() {
        let result = Simulator::new(
            0,
            4,
            Rule::conway(),
            &SeedConfig::Empty,
            ManualClock::new(),
            Recorder::default(),
        );
        assert!(matches!(result, Err(Error::InvalidDimension { .. })));
    }

    #[test]
    fn test_tick_advances_and_renders_once() {
        let mut sim = blinker_sim(10);
        sim.set_step_size(3).unwrap();
        sim.play();

        sim.clock_mut().advance(ms(10));
        assert_eq!(sim.pump(), 1);
        assert_eq!(sim.engine().generation(), 3);
        // One render per tick, not per generation.
        assert_eq!(sim.sink().generations, vec![0, 3]);

        assert_eq!(run_for(&mut sim, 10, 2), 2);
        assert_eq!(sim.sink().generations, vec![0, 3, 6, 9]);
    }

    #[test]
    fn test_play_then_pause_leaves_grid_untouched() {
        let mut sim = blinker_sim(10);
        let before = sim.engine().grid().clone();

        sim.play();
        sim.pause();
        sim.clock_mut().advance(ms(1000));
        assert_eq!(sim.pump(), 0);
        assert_eq!(sim.engine().grid(), &before);
        assert_eq!(sim.clock().active_timers(), 0);
    }

    #[test]
    fn test_no_tick_after_pause() {
        let mut sim = blinker_sim(10);
        sim.play();
        sim.clock_mut().advance(ms(50));
        sim.pause();
        assert_eq!(sim.pump(), 0);
        assert_eq!(sim.engine().generation(), 0);
    }

    #[test]
    fn test_stale_firing_is_ignored() {
        let mut sim = blinker_sim(10);
        sim.play();
        let stale = sim.tick_timer.unwrap();
        sim.pause();

        sim.on_timer(Firing {
            handle: stale,
            at: ms(10),
        });
        assert_eq!(sim.ticks(), 0);
    }

    #[test]
    fn test_pause_is_idempotent() {
        let mut sim = blinker_sim(10);
        sim.pause();
        assert_eq!(sim.state(), SimulatorState::Stopped);

        sim.play();
        sim.pause();
        sim.pause();
        assert_eq!(sim.state(), SimulatorState::Stopped);
        assert!(sim.tick_timer.is_none());
        assert!(sim.fps_timer.is_none());
    }

    #[test]
    fn test_play_is_idempotent_and_issues_fresh_handles() {
        let mut sim = blinker_sim(10);
        sim.play();
        let first = sim.tick_timer;
        sim.play();
        assert_eq!(sim.tick_timer, first);
        assert_eq!(sim.clock().active_timers(), 2);

        sim.pause();
        sim.play();
        assert_ne!(sim.tick_timer, first);
        assert_eq!(sim.clock().active_timers(), 2);
    }

    #[test]
    fn test_toggle() {
        let mut sim = blinker_sim(10);
        assert_eq!(sim.toggle(), SimulatorState::Running);
        assert!(sim.is_playing());
        assert_eq!(sim.toggle(), SimulatorState::Stopped);
        assert!(!sim.is_playing());
    }

    #[test]
    fn test_invalid_step_size_keeps_previous() {
        let mut sim = blinker_sim(10);
        sim.set_step_size(2).unwrap();
        assert!(matches!(sim.set_step_size(0), Err(Error::InvalidStepSize(0))));
        assert!(matches!(sim.set_step_size(-4), Err(Error::InvalidStepSize(-4))));
        assert_eq!(sim.step_size(), 2);
    }

    #[test]
    fn test_step_size_applies_from_next_tick() {
        let mut sim = blinker_sim(10);
        sim.play();
        sim.clock_mut().advance(ms(10));
        sim.pump();
        sim.set_step_size(2).unwrap();
        assert_eq!(sim.engine().generation(), 1);

        sim.clock_mut().advance(ms(10));
        sim.pump();
        assert_eq!(sim.engine().generation(), 3);
    }

    #[test]
    fn test_blinker_oscillates_under_play() {
        let mut sim = blinker_sim(10);
        let start = sim.engine().grid().clone();
        sim.play();

        sim.clock_mut().advance(ms(10));
        sim.pump();
        assert_ne!(sim.engine().grid(), &start);

        sim.clock_mut().advance(ms(10));
        sim.pump();
        assert_eq!(sim.engine().grid(), &start);
    }

    #[test]
    fn test_render_disabled() {
        let mut sim = blinker_sim(10);
        sim.set_render_enabled(false);
        sim.play();
        assert_eq!(run_for(&mut sim, 10, 3), 3);
        assert_eq!(sim.sink().generations, vec![0]);
    }

    #[test]
    fn test_fps_estimate_converges() {
        let mut sim = blinker_sim(10);
        sim.play();
        assert_eq!(run_for(&mut sim, 10, 10), 10);

        // 100 * (1 - 2^-10)
        let fps = sim.fps();
        assert!(fps > 99.0 && fps < 100.0, "fps {}", fps);
    }

    #[test]
    fn test_fps_reports_on_own_schedule() {
        let mut sim = blinker_sim(10);
        sim.play();
        assert_eq!(run_for(&mut sim, 10, 100), 100);
        assert_eq!(sim.fps_reports, 2);

        sim.set_fps_report_interval(ms(100)).unwrap();
        run_for(&mut sim, 10, 30);
        assert_eq!(sim.fps_reports, 5);
        assert!(sim.set_fps_report_interval(Duration::ZERO).is_err());
    }

    #[test]
    fn test_host_stall_runs_one_tick() {
        let mut sim = blinker_sim(10);
        sim.play();

        sim.clock_mut().advance(ms(1000));
        assert_eq!(sim.pump(), 1);
        assert_eq!(sim.engine().generation(), 1);
        // dt was the full second: 0.5 * (0 + 1000 / 1000)
        assert!((sim.fps() - 0.5).abs() < 1e-9, "fps {}", sim.fps());
        assert_eq!(sim.fps_reports, 1);

        // Regular cadence resumes one period after the stall.
        assert_eq!(sim.pump(), 0);
        assert_eq!(run_for(&mut sim, 10, 1), 1);
    }

    #[test]
    fn test_zero_interval_ticks_once_per_pump() {
        let mut sim = blinker_sim(0);
        sim.play();
        assert_eq!(sim.pump(), 1);
        assert_eq!(sim.pump(), 1);
        assert_eq!(sim.engine().generation(), 2);
        // No time passed, so no rate sample was taken.
        assert_eq!(sim.fps(), 0.0);
    }

    #[test]
    fn test_set_tick_interval_reschedules() {
        let mut sim = blinker_sim(10);
        sim.play();
        sim.set_tick_interval(ms(50));
        sim.clock_mut().advance(ms(40));
        assert_eq!(sim.pump(), 0);
        sim.clock_mut().advance(ms(10));
        assert_eq!(sim.pump(), 1);
    }

    #[test]
    fn test_from_engine_with_glider() {
        let mut engine = GridEngine::new(10, 10).unwrap();
        let glider =
            RelativePattern::from_mask(&[0, 0, 1, 1, 0, 1, 0, 1, 1], 3, Position::new(0, 0))
                .unwrap();
        engine.paste(&glider, Position::new(1, 1));
        let start = engine.snapshot().alive_positions();

        let mut sim = Simulator::from_engine(engine, ManualClock::new(), Recorder::default());
        sim.set_step_size(4).unwrap();
        sim.play();
        sim.clock_mut().advance(Duration::from_millis(1));
        sim.pump();

        let moved: std::collections::BTreeSet<Position> = start
            .iter()
            .map(|p| Position::new(p.r + 1, p.c + 1).wrap(10, 10))
            .collect();
        assert_eq!(sim.engine().snapshot().alive_positions(), moved);
    }
}
