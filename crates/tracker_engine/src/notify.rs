use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tracker_logging::{tracker_debug, tracker_trace};

const CHANNEL_CAPACITY: usize = 16;

/// Identity of one surface observing the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(u64);

/// Invalidation signal; receivers re-read the whole store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    JobDetailsUpdated,
}

impl StoreEvent {
    pub fn name(self) -> &'static str {
        match self {
            StoreEvent::JobDetailsUpdated => "jobDetailsUpdated",
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Envelope {
    origin: SurfaceId,
    event: StoreEvent,
}

/// Fire-and-forget broadcast of store changes to every other surface.
#[derive(Debug, Clone)]
pub struct ChangeNotifier {
    tx: broadcast::Sender<Envelope>,
    next_surface: Arc<AtomicU64>,
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeNotifier {
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            tx,
            next_surface: Arc::new(AtomicU64::new(1)),
        }
    }

    pub fn register(&self) -> SurfaceId {
        SurfaceId(self.next_surface.fetch_add(1, Ordering::Relaxed))
    }

    /// Sends `event` to all listeners except those of `origin`. Dropped
    /// silently when nobody listens.
    pub fn notify(&self, origin: SurfaceId, event: StoreEvent) {
        match self.tx.send(Envelope { origin, event }) {
            Ok(receivers) => {
                tracker_debug!("Broadcast {} to {} listener(s)", event.name(), receivers)
            }
            Err(_) => tracker_trace!("Dropped {}: no listeners", event.name()),
        }
    }

    pub fn subscribe(&self, surface: SurfaceId) -> ChangeListener {
        ChangeListener {
            rx: self.tx.subscribe(),
            surface,
        }
    }
}

/// Receives change events emitted by other surfaces.
#[derive(Debug)]
pub struct ChangeListener {
    rx: broadcast::Receiver<Envelope>,
    surface: SurfaceId,
}

impl ChangeListener {
    /// Waits for the next foreign change. A listener that fell behind gets
    /// one event for everything it missed. Returns `None` once every
    /// notifier is gone.
    pub async fn recv(&mut self) -> Option<StoreEvent> {
        loop {
            match self.rx.recv().await {
                Ok(envelope) if envelope.origin == self.surface => continue,
                Ok(envelope) => return Some(envelope.event),
                Err(RecvError::Lagged(missed)) => {
                    tracker_debug!("Listener lagged by {} event(s); coalescing", missed);
                    return Some(StoreEvent::JobDetailsUpdated);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Non-blocking variant of [`recv`](Self::recv).
    pub fn try_recv(&mut self) -> Option<StoreEvent> {
        loop {
            match self.rx.try_recv() {
                Ok(envelope) if envelope.origin == self.surface => continue,
                Ok(envelope) => return Some(envelope.event),
                Err(TryRecvError::Lagged(_)) => return Some(StoreEvent::JobDetailsUpdated),
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return None,
            }
        }
    }
}
