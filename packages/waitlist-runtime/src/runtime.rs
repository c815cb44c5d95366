//! Runtime loop with tick phases and timing enforcement.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, FixedOffset, Utc};
use parking_lot::Mutex;
use tokio::sync::mpsc::{self, error::TryRecvError};
use tokio::sync::watch;
use waitlist_core::config::RosterConfig;
use waitlist_core::time_utils::display_offset;
use waitlist_core::{CountdownBoard, RosterError, RosterStore};

use crate::handlers::{Clock, RequestHandlers};
use crate::request::RosterRequest;
use crate::Result;

/// Counters exposed for monitoring.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct RuntimeStats {
    /// Ticks executed
    pub ticks: u64,
    /// Requests applied
    pub processed_requests: u64,
    /// Requests rejected because the queue was full
    pub dropped_requests: u64,
    /// Requests waiting for a later tick
    pub queued_requests: usize,
    /// When the countdown board was last refreshed
    pub last_board_refresh: Option<DateTime<Utc>>,
}

/// Main runtime loop
pub struct Runtime {
    /// Roster store
    store: Arc<RosterStore>,
    /// Configuration
    config: RosterConfig,
    /// Tick duration
    tick_duration: Duration,
    /// Request receiver
    request_rx: mpsc::Receiver<RosterRequest>,
    /// Requests waiting to be applied
    queue: VecDeque<RosterRequest>,
    /// Maximum queued requests (tickrate * 100)
    queue_capacity: usize,
    /// Request handlers
    handlers: RequestHandlers,
    /// Countdown board publisher
    board_tx: watch::Sender<CountdownBoard>,
    /// Countdown refresh interval
    countdown_interval: Duration,
    /// Last countdown refresh
    last_refresh: Option<Instant>,
    /// Offset for arrival labels
    display_offset: FixedOffset,
    /// Set once every request sender is gone
    disconnected: bool,
    /// Monitoring counters
    stats: Arc<Mutex<RuntimeStats>>,
}

impl Runtime {
    /// Create a new runtime
    pub fn new(
        store: Arc<RosterStore>,
        config: RosterConfig,
        request_rx: mpsc::Receiver<RosterRequest>,
    ) -> Self {
        let tickrate = config.tickrate.max(1);
        let tick_duration = Duration::from_secs_f64(1.0 / tickrate as f64);
        let queue_capacity = tickrate as usize * 100;
        let offset = display_offset(config.display_utc_offset_minutes);
        let handlers = RequestHandlers::new(store.clone());
        let (board_tx, _) = watch::channel(store.board(handlers.now(), offset));

        Self {
            store,
            countdown_interval: Duration::from_millis(config.countdown_interval_ms),
            config,
            tick_duration,
            request_rx,
            queue: VecDeque::new(),
            queue_capacity,
            handlers,
            board_tx,
            last_refresh: None,
            display_offset: offset,
            disconnected: false,
            stats: Arc::new(Mutex::new(RuntimeStats::default())),
        }
    }

    /// Replace the clock used for signups and countdown refresh
    pub fn set_clock(&mut self, clock: Clock) {
        self.handlers.set_clock(clock);
    }

    /// Subscribe to countdown board refreshes
    pub fn board_receiver(&self) -> watch::Receiver<CountdownBoard> {
        self.board_tx.subscribe()
    }

    /// Shared monitoring counters
    pub fn stats(&self) -> Arc<Mutex<RuntimeStats>> {
        Arc::clone(&self.stats)
    }

    /// Roster store driven by this runtime
    pub fn store(&self) -> &Arc<RosterStore> {
        &self.store
    }

    /// Get queue size for testing
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Drain request channel into the queue, respecting capacity.
    fn drain_request_channel(&mut self) {
        loop {
            match self.request_rx.try_recv() {
                Ok(req) => {
                    if self.queue.len() >= self.queue_capacity {
                        tracing::warn!("Request queue full, dropping {} request", req.kind());
                        self.stats.lock().dropped_requests += 1;
                        req.reject(RosterError::Timeout);
                        continue;
                    }
                    self.queue.push_back(req);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if !self.disconnected {
                        tracing::info!("All request senders closed");
                    }
                    self.disconnected = true;
                    break;
                }
            }
        }
    }

    /// Process request phase (80% of tick)
    pub fn process_request_phase(&mut self, tick_start: Instant) -> Result<()> {
        let time_budget = self.tick_duration.mul_f32(0.8);

        self.drain_request_channel();

        let max_requests = self.config.max_requests_per_tick;
        let mut processed = 0;
        while processed < max_requests {
            if tick_start.elapsed() > time_budget {
                break;
            }
            let Some(req) = self.queue.pop_front() else {
                break;
            };
            tracing::debug!("Applying {} request", req.kind());
            self.stats.lock().processed_requests += 1;
            self.handlers.handle_request(req);
            processed += 1;
        }

        self.stats.lock().queued_requests = self.queue.len();
        Ok(())
    }

    /// Process countdown phase: refresh the board when the interval elapsed
    pub fn process_countdown_phase(&mut self, tick_start: Instant) -> Result<()> {
        let due = self
            .last_refresh
            .map_or(true, |last| tick_start.duration_since(last) >= self.countdown_interval);
        if due {
            self.refresh_board();
            self.last_refresh = Some(tick_start);
        }
        Ok(())
    }

    /// Re-project the countdown board now and publish it
    pub fn refresh_board(&mut self) {
        let now = self.handlers.now();
        let board = self.store.board(now, self.display_offset);
        tracing::trace!("Countdown board refreshed with {} rows", board.rows.len());
        self.board_tx.send_replace(board);
        self.stats.lock().last_board_refresh = Some(now);
    }

    /// Sleep remaining tick time
    fn sleep_remaining(&self, tick_start: Instant) {
        if let Some(remaining) = self.tick_duration.checked_sub(tick_start.elapsed()) {
            std::thread::sleep(remaining);
        }
    }

    /// Execute a single tick of the runtime without sleeping
    pub fn step(&mut self) -> Result<()> {
        let tick_start = Instant::now();

        // Phase 1: roster requests
        self.process_request_phase(tick_start)?;

        // Phase 2: countdown refresh
        self.process_countdown_phase(tick_start)?;

        self.stats.lock().ticks += 1;
        Ok(())
    }

    /// Execute a single tick of the runtime
    pub fn tick(&mut self) -> Result<()> {
        let tick_start = Instant::now();
        self.step()?;
        self.sleep_remaining(tick_start);
        Ok(())
    }

    /// Run the runtime loop (blocking) until every sender is dropped and
    /// the queue is empty
    pub fn run(&mut self) -> Result<()> {
        tracing::info!(
            "Runtime started at {} Hz with {} guests",
            self.config.tickrate,
            self.store.len()
        );
        while !(self.disconnected && self.queue.is_empty()) {
            self.tick()?;
        }
        tracing::info!("Runtime stopped");
        Ok(())
    }
}
