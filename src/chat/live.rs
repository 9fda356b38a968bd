//! Live chat session with simulated typing
//!
//! A [`LiveChat`] is either idle or composing. Submitting a message appends
//! it to the transcript right away and queues it for the session's worker
//! task, which waits a random typing delay and then appends exactly one bot
//! reply. Messages submitted while a reply is still being composed are queued
//! and answered strictly in submission order.

use rand::Rng;
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, Notify};
use tokio::task::JoinHandle;

use super::{ChatMessage, ChatSession, Responder, Sender};
use crate::config::ChatConfig;

/// Whether a reply is on its way
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatState {
    Idle,
    Composing,
}

/// Uniformly distributed delay before each bot reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypingDelay {
    min: Duration,
    max: Duration,
}

impl TypingDelay {
    pub fn new(min: Duration, max: Duration) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Reply immediately
    pub fn none() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    pub fn from_config(config: &ChatConfig) -> Self {
        let (min, max) = config.delay_window();
        Self::new(min, max)
    }

    pub fn sample(&self) -> Duration {
        if self.min == self.max {
            return self.min;
        }
        let lo = self.min.as_millis() as u64;
        let hi = self.max.as_millis() as u64;
        Duration::from_millis(rand::thread_rng().gen_range(lo..=hi))
    }
}

/// A chat session driven by a background worker
///
/// Dropping it stops the worker; pending replies are discarded.
pub struct LiveChat {
    session: Arc<Mutex<ChatSession>>,
    pending: Arc<AtomicUsize>,
    idle: Arc<Notify>,
    events: broadcast::Sender<ChatMessage>,
    queue: mpsc::UnboundedSender<String>,
    worker: JoinHandle<()>,
}

impl LiveChat {
    /// Start a session seeded with `welcome`; must be called within a tokio runtime
    pub fn start(responder: Responder, welcome: &str, delay: TypingDelay) -> Self {
        let session = Arc::new(Mutex::new(ChatSession::new(welcome)));
        let pending = Arc::new(AtomicUsize::new(0));
        let idle = Arc::new(Notify::new());
        let (events, _) = broadcast::channel(64);
        let (queue, rx) = mpsc::unbounded_channel();

        let worker = tokio::spawn(compose_replies(
            rx,
            responder,
            delay,
            session.clone(),
            pending.clone(),
            idle.clone(),
            events.clone(),
        ));

        Self {
            session,
            pending,
            idle,
            events,
            queue,
            worker,
        }
    }

    /// Append a user message and schedule its reply
    ///
    /// Input that is empty or only whitespace is ignored and returns `None`.
    pub fn submit(&self, text: &str) -> Option<ChatMessage> {
        if text.trim().is_empty() {
            return None;
        }

        let message = {
            let mut session = lock(&self.session);
            self.pending.fetch_add(1, Ordering::SeqCst);
            session.append(Sender::User, text)
        };
        // Published before the worker can see it, so its reply comes after
        let _ = self.events.send(message.clone());

        if self.queue.send(text.to_string()).is_err() {
            // Worker is gone; nothing will ever answer
            self.pending.fetch_sub(1, Ordering::SeqCst);
            tracing::warn!("Chat worker stopped, message {} will not be answered", message.id);
        } else {
            tracing::debug!(id = %message.id, "User message queued for a reply");
        }

        Some(message)
    }

    pub fn state(&self) -> ChatState {
        if self.pending.load(Ordering::SeqCst) == 0 {
            ChatState::Idle
        } else {
            ChatState::Composing
        }
    }

    /// Copy of the transcript so far
    pub fn transcript(&self) -> Vec<ChatMessage> {
        lock(&self.session).messages().to_vec()
    }

    /// Messages appended from now on, user and bot alike
    pub fn subscribe(&self) -> broadcast::Receiver<ChatMessage> {
        self.events.subscribe()
    }

    /// Resolve once every queued message has been answered
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.idle.notified();
            if self.pending.load(Ordering::SeqCst) == 0 {
                return;
            }
            notified.await;
        }
    }
}

impl Drop for LiveChat {
    fn drop(&mut self) {
        self.worker.abort();
    }
}

async fn compose_replies(
    mut rx: mpsc::UnboundedReceiver<String>,
    responder: Responder,
    delay: TypingDelay,
    session: Arc<Mutex<ChatSession>>,
    pending: Arc<AtomicUsize>,
    idle: Arc<Notify>,
    events: broadcast::Sender<ChatMessage>,
) {
    while let Some(text) = rx.recv().await {
        tokio::time::sleep(delay.sample()).await;

        let resolution = responder.resolve(&text);
        tracing::debug!(kind = ?resolution.kind, "Composed reply");

        let message = lock(&session).append(Sender::Bot, resolution.reply);
        let _ = events.send(message);

        if pending.fetch_sub(1, Ordering::SeqCst) == 1 {
            idle.notify_waiters();
        }
    }
}

fn lock(session: &Mutex<ChatSession>) -> MutexGuard<'_, ChatSession> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}
