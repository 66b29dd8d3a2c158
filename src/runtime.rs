//! Session runtime: the host event loop.
//!
//! One worker thread owns the [`GateSession`] and services four event
//! kinds: user edits, marker ticks, hazard ticks, and live-collaborator
//! resolutions. Events are delivered over bounded channels and processed
//! to completion one at a time, so every handler is an atomic
//! read-modify-write of the session; a tick can never clobber a keystroke
//! serviced before it. Subscribers receive update events over bounded
//! streams and are never allowed to block the worker.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use chrono::{DateTime, Utc};
use crossbeam_channel::{bounded, select, tick, Receiver, RecvTimeoutError, Sender, TrySendError};
use log::{debug, info};
use serde::Serialize;
use uuid::Uuid;

use crate::automaton::{MarkerStatus, SpawnOutcome, TickOutcome};
use crate::error::{GateError, GateResult, RuntimeError, ValidationError};
use crate::live::{Definition, LiveStatus, Reading};
use crate::rules::RuleId;
use crate::session::{GateSession, Snapshot};

/// Runtime configuration.
#[derive(Debug, Clone)]
pub struct GateRuntimeConfig {
    /// Period between marker advances.
    pub marker_period: Duration,
    /// Period between hazard spawn attempts.
    pub hazard_period: Duration,
    /// Maximum queued commands before backpressure applies.
    pub command_queue_capacity: usize,
    /// Per-subscription stream buffer capacity.
    pub stream_capacity: usize,
}

impl Default for GateRuntimeConfig {
    fn default() -> Self {
        Self {
            marker_period: Duration::from_secs(12),
            hazard_period: Duration::from_secs(10),
            command_queue_capacity: 256,
            stream_capacity: 1024,
        }
    }
}

impl GateRuntimeConfig {
    fn validate(&self) -> GateResult<()> {
        if self.marker_period.is_zero() {
            return Err(GateError::Validation(ValidationError::ZeroTickPeriod {
                task: "marker".to_string(),
            }));
        }
        if self.hazard_period.is_zero() {
            return Err(GateError::Validation(ValidationError::ZeroTickPeriod {
                task: "hazard".to_string(),
            }));
        }
        Ok(())
    }
}

/// Which handler produced an update event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateCause {
    /// A user edit was applied.
    Edit,
    /// A rule was toggled.
    Toggle,
    /// The marker automaton serviced a tick.
    MarkerTick,
    /// The hazard spawner serviced a tick.
    HazardTick,
    /// A live collaborator resolved.
    LiveResolved,
}

/// User-visible notices attached to an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Notice {
    /// The marker collided with a hazard; the buffer was fully reset.
    AutomatonReset,
    /// The marker reached home.
    MarkerArrived,
    /// Every active rule is satisfied.
    Completed,
}

/// An update pushed to subscribers after a mutation.
#[derive(Debug, Clone, Serialize)]
pub struct SessionEvent {
    /// Unique event id.
    pub event_id: Uuid,
    /// When the event was produced.
    pub timestamp: DateTime<Utc>,
    /// Which handler produced it.
    pub cause: UpdateCause,
    /// Attached notice, if the mutation crossed a threshold.
    pub notice: Option<Notice>,
    /// The session state after the mutation.
    pub snapshot: Snapshot,
}

/// Unique identifier for a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

enum Command {
    Edit {
        text: String,
        reply: Sender<Snapshot>,
    },
    Toggle {
        id: RuleId,
        reply: Sender<GateResult<Snapshot>>,
    },
    ResolveDictionary {
        status: LiveStatus<Definition>,
        reply: Sender<Snapshot>,
    },
    ResolveTemperature {
        status: LiveStatus<Reading>,
        reply: Sender<Snapshot>,
    },
    Snapshot {
        reply: Sender<Snapshot>,
    },
    Subscribe {
        subscription_id: SubscriptionId,
        stream_tx: Sender<SessionEvent>,
        reply: Sender<()>,
    },
    Unsubscribe {
        subscription_id: SubscriptionId,
    },
}

/// Handle returned by `subscribe`.
#[derive(Debug)]
pub struct UpdateRegistration {
    /// The subscription backing the stream.
    pub subscription_id: SubscriptionId,
    /// The event stream.
    pub stream: UpdateStream,
}

/// A subscription stream for session update events.
///
/// Dropping this stream attempts best-effort unregistration.
#[derive(Debug)]
pub struct UpdateStream {
    subscription_id: SubscriptionId,
    rx: Receiver<SessionEvent>,
    control_tx: Sender<Command>,
    unregistered: AtomicBool,
}

impl UpdateStream {
    fn new(
        subscription_id: SubscriptionId,
        rx: Receiver<SessionEvent>,
        control_tx: Sender<Command>,
    ) -> Self {
        Self {
            subscription_id,
            rx,
            control_tx,
            unregistered: AtomicBool::new(false),
        }
    }

    /// The subscription id backing this stream.
    #[must_use]
    pub const fn subscription_id(&self) -> SubscriptionId {
        self.subscription_id
    }

    /// Best-effort explicit unregistration; non-blocking and idempotent.
    pub fn unsubscribe(&self) {
        if self.unregistered.swap(true, Ordering::AcqRel) {
            return;
        }
        let _ = self.control_tx.try_send(Command::Unsubscribe {
            subscription_id: self.subscription_id,
        });
    }

    /// Receive the next event (blocking).
    pub fn recv(&self) -> GateResult<SessionEvent> {
        self.rx.recv().map_err(|_| {
            GateError::Runtime(RuntimeError::Disconnected {
                path: "update_stream".to_string(),
            })
        })
    }

    /// Receive the next event with a timeout.
    pub fn recv_timeout(&self, timeout: Duration) -> GateResult<SessionEvent> {
        self.rx.recv_timeout(timeout).map_err(|err| match err {
            RecvTimeoutError::Timeout => GateError::Runtime(RuntimeError::Timeout {
                duration_ms: timeout.as_millis().min(u128::from(u64::MAX)) as u64,
            }),
            RecvTimeoutError::Disconnected => GateError::Runtime(RuntimeError::Disconnected {
                path: "update_stream".to_string(),
            }),
        })
    }
}

impl Drop for UpdateStream {
    fn drop(&mut self) {
        // Best-effort: do not block on shutdown.
        if !self.unregistered.swap(true, Ordering::AcqRel) {
            let _ = self.control_tx.try_send(Command::Unsubscribe {
                subscription_id: self.subscription_id,
            });
        }
    }
}

/// The session runtime handle.
///
/// Command surface over the single worker thread. Dropping the handle
/// closes the command channel; the worker drains queued commands and
/// exits, cancelling both ticker tasks with it.
#[derive(Debug)]
pub struct GateRuntime {
    command_tx: Sender<Command>,
    queue_capacity: usize,
    stream_capacity: usize,
    dropped_events: Arc<AtomicU64>,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl GateRuntime {
    /// Starts a runtime around a fresh session.
    pub fn start(config: GateRuntimeConfig) -> GateResult<Self> {
        Self::with_session(GateSession::new(), config)
    }

    /// Starts a runtime around an explicit session, for deterministic
    /// tests and replays.
    pub fn with_session(session: GateSession, config: GateRuntimeConfig) -> GateResult<Self> {
        config.validate()?;

        let queue_capacity = config.command_queue_capacity.max(1);
        let stream_capacity = config.stream_capacity.max(1);
        let (command_tx, command_rx) = bounded::<Command>(queue_capacity);
        let dropped_events = Arc::new(AtomicU64::new(0));

        let worker_dropped = Arc::clone(&dropped_events);
        let join = thread::Builder::new()
            .name("rulegate-session".to_string())
            .spawn(move || worker_loop(session, config, worker_dropped, command_rx))
            .map_err(|e| GateError::internal(format!("failed to spawn session worker: {e}")))?;

        Ok(Self {
            command_tx,
            queue_capacity,
            stream_capacity,
            dropped_events,
            join: Mutex::new(Some(join)),
        })
    }

    /// Applies a user edit and returns the resulting snapshot.
    pub fn edit(&self, text: impl Into<String>) -> GateResult<Snapshot> {
        self.request(|reply| Command::Edit {
            text: text.into(),
            reply,
        })
    }

    /// Toggles a rule and returns the resulting snapshot.
    pub fn toggle(&self, id: RuleId) -> GateResult<Snapshot> {
        self.request(|reply| Command::Toggle { id, reply })?
    }

    /// Delivers the dictionary collaborator's resolution.
    pub fn resolve_dictionary(&self, status: LiveStatus<Definition>) -> GateResult<Snapshot> {
        self.request(|reply| Command::ResolveDictionary { status, reply })
    }

    /// Delivers the temperature collaborator's resolution.
    pub fn resolve_temperature(&self, status: LiveStatus<Reading>) -> GateResult<Snapshot> {
        self.request(|reply| Command::ResolveTemperature { status, reply })
    }

    /// Takes a snapshot without mutating anything.
    pub fn snapshot(&self) -> GateResult<Snapshot> {
        self.request(|reply| Command::Snapshot { reply })
    }

    /// Registers an update stream.
    ///
    /// The stream is built here so the worker never holds a sender to its
    /// own command channel; only streams keep one, for unregistration.
    pub fn subscribe(&self) -> GateResult<UpdateRegistration> {
        let subscription_id = SubscriptionId::new();
        let (stream_tx, stream_rx) = bounded::<SessionEvent>(self.stream_capacity);
        let stream = UpdateStream::new(subscription_id, stream_rx, self.command_tx.clone());

        self.request(|reply| Command::Subscribe {
            subscription_id,
            stream_tx,
            reply,
        })?;

        Ok(UpdateRegistration {
            subscription_id,
            stream,
        })
    }

    /// Events dropped because a subscriber was slow or gone.
    #[must_use]
    pub fn dropped_events(&self) -> u64 {
        self.dropped_events.load(Ordering::Relaxed)
    }

    fn request<T>(&self, build: impl FnOnce(Sender<T>) -> Command) -> GateResult<T> {
        let (reply_tx, reply_rx) = bounded::<T>(1);
        match self.command_tx.try_send(build(reply_tx)) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                return Err(GateError::Runtime(RuntimeError::QueueFull {
                    capacity: self.queue_capacity,
                }));
            }
            Err(TrySendError::Disconnected(_)) => {
                return Err(GateError::Runtime(RuntimeError::Disconnected {
                    path: "session_commands".to_string(),
                }));
            }
        }

        reply_rx.recv().map_err(|_| {
            GateError::Runtime(RuntimeError::Disconnected {
                path: "session_commands".to_string(),
            })
        })
    }
}

impl Drop for GateRuntime {
    fn drop(&mut self) {
        // Close our command sender so the worker can terminate.
        let (dummy_tx, _) = bounded::<Command>(1);
        let old = std::mem::replace(&mut self.command_tx, dummy_tx);
        drop(old);

        if let Ok(mut guard) = self.join.lock() {
            if let Some(handle) = guard.take() {
                // Do not join here.
                //
                // Callers may keep an `UpdateStream` alive beyond the
                // runtime's lifetime, and the stream holds a command-sender
                // clone for unregistration. Joining would deadlock while the
                // channel stays open. Detaching is safe: the worker exits
                // once the last sender is dropped.
                drop(handle);
            }
        }
    }
}

struct Subscribers {
    streams: HashMap<SubscriptionId, Sender<SessionEvent>>,
    dropped: Arc<AtomicU64>,
    all_satisfied: bool,
}

impl Subscribers {
    fn broadcast(&mut self, cause: UpdateCause, notice: Option<Notice>, snapshot: &Snapshot) {
        // A completion transition is a notice of its own unless the
        // mutation already carries one.
        let notice = match notice {
            Some(n) => Some(n),
            None if snapshot.all_satisfied && !self.all_satisfied => Some(Notice::Completed),
            None => None,
        };
        self.all_satisfied = snapshot.all_satisfied;

        if self.streams.is_empty() {
            return;
        }

        let event = SessionEvent {
            event_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            cause,
            notice,
            snapshot: snapshot.clone(),
        };

        let mut gone = Vec::new();
        for (id, tx) in &self.streams {
            match tx.try_send(event.clone()) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    self.dropped.fetch_add(1, Ordering::Relaxed);
                }
                Err(TrySendError::Disconnected(_)) => {
                    self.dropped.fetch_add(1, Ordering::Relaxed);
                    gone.push(*id);
                }
            }
        }
        for id in gone {
            self.streams.remove(&id);
        }
    }
}

fn worker_loop(
    mut session: GateSession,
    config: GateRuntimeConfig,
    dropped_events: Arc<AtomicU64>,
    command_rx: Receiver<Command>,
) {
    let marker_ticks = tick(config.marker_period);
    let hazard_ticks = tick(config.hazard_period);
    let mut subscribers = Subscribers {
        streams: HashMap::new(),
        dropped: dropped_events,
        all_satisfied: false,
    };

    info!("session {} started", session.id());

    loop {
        select! {
            recv(command_rx) -> msg => {
                match msg {
                    Ok(command) => handle_command(&mut session, &mut subscribers, command),
                    Err(_) => break,
                }
            }
            recv(marker_ticks) -> _ => {
                let (outcome, snapshot) = session.marker_tick();
                match outcome {
                    TickOutcome::Suspended | TickOutcome::Arrived => {
                        // No state change; nothing to publish.
                    }
                    TickOutcome::Activated => {
                        debug!("marker entered the buffer");
                        subscribers.broadcast(UpdateCause::MarkerTick, None, &snapshot);
                    }
                    TickOutcome::Advanced => {
                        let arrived = snapshot.marker_status == Some(MarkerStatus::Arrived);
                        if arrived {
                            info!("marker arrived home");
                        }
                        let notice = arrived.then_some(Notice::MarkerArrived);
                        subscribers.broadcast(UpdateCause::MarkerTick, notice, &snapshot);
                    }
                    TickOutcome::Collided => {
                        info!("marker collided with a hazard; buffer reset");
                        subscribers.broadcast(
                            UpdateCause::MarkerTick,
                            Some(Notice::AutomatonReset),
                            &snapshot,
                        );
                    }
                }
            }
            recv(hazard_ticks) -> _ => {
                let (outcome, snapshot) = session.hazard_tick();
                match outcome {
                    SpawnOutcome::Suspended | SpawnOutcome::Saturated => {
                        // Suppressed spawn; nothing to publish.
                    }
                    SpawnOutcome::Activated => {
                        debug!("hazard spawner activated the buffer");
                        subscribers.broadcast(UpdateCause::HazardTick, None, &snapshot);
                    }
                    SpawnOutcome::Spawned { index } => {
                        debug!("hazard spawned at core index {index}");
                        subscribers.broadcast(UpdateCause::HazardTick, None, &snapshot);
                    }
                }
            }
        }
    }

    info!("session {} stopped", session.id());
}

fn handle_command(session: &mut GateSession, subscribers: &mut Subscribers, command: Command) {
    match command {
        Command::Edit { text, reply } => {
            let snapshot = session.apply_edit(&text);
            let _ = reply.send(snapshot.clone());
            subscribers.broadcast(UpdateCause::Edit, None, &snapshot);
        }
        Command::Toggle { id, reply } => {
            let result = session.toggle_rule(id);
            match result {
                Ok(snapshot) => {
                    let _ = reply.send(Ok(snapshot.clone()));
                    subscribers.broadcast(UpdateCause::Toggle, None, &snapshot);
                }
                Err(err) => {
                    let _ = reply.send(Err(err));
                }
            }
        }
        Command::ResolveDictionary { status, reply } => {
            let snapshot = session.resolve_dictionary(status);
            let _ = reply.send(snapshot.clone());
            subscribers.broadcast(UpdateCause::LiveResolved, None, &snapshot);
        }
        Command::ResolveTemperature { status, reply } => {
            let snapshot = session.resolve_temperature(status);
            let _ = reply.send(snapshot.clone());
            subscribers.broadcast(UpdateCause::LiveResolved, None, &snapshot);
        }
        Command::Snapshot { reply } => {
            let _ = reply.send(session.snapshot());
        }
        Command::Subscribe {
            subscription_id,
            stream_tx,
            reply,
        } => {
            subscribers.streams.insert(subscription_id, stream_tx);
            let _ = reply.send(());
        }
        Command::Unsubscribe { subscription_id } => {
            subscribers.streams.remove(&subscription_id);
        }
    }
}
