use std::sync::Arc;
use std::time::{Duration, Instant};

use clinic_core::{
    Message, SessionPhase, SessionSnapshot, Translator, Urgency, QUICK_SUGGESTIONS,
};
use clinic_observability::ChatMetrics;
use clinic_transport::ChatTransport;
use parking_lot::Mutex;
use tracing::{debug, info, instrument, warn};

pub const GREETING_KEY: &str = "botHello";
pub const CONNECTION_APOLOGY: &str =
    "Sorry, I'm having trouble connecting to the server. Please try again later.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Draft was blank or another send is in flight; nothing changed.
    Ignored,
    Delivered { urgency: Urgency },
    /// Transport failed and the apology was appended instead of a reply.
    Failed,
}

#[derive(Debug, Default)]
struct SessionState {
    messages: Vec<Message>,
    phase: SessionPhase,
    draft: String,
}

/// One conversation for the lifetime of the process. All mutations go through
/// [`start`](Self::start), [`update_draft`](Self::update_draft) and
/// [`send`](Self::send); readers take a [`SessionSnapshot`].
pub struct ChatSession<T> {
    transport: T,
    translator: Arc<dyn Translator>,
    metrics: Arc<ChatMetrics>,
    state: Mutex<SessionState>,
}

impl<T> ChatSession<T>
where
    T: ChatTransport,
{
    pub fn new(transport: T, translator: Arc<dyn Translator>, metrics: Arc<ChatMetrics>) -> Self {
        Self {
            transport,
            translator,
            metrics,
            state: Mutex::new(SessionState::default()),
        }
    }

    /// Leaves the welcome phase and seeds the greeting. Returns `false` when
    /// the session was already started.
    pub fn start(&self) -> bool {
        let mut state = self.state.lock();
        if state.phase != SessionPhase::Welcome {
            return false;
        }

        state.phase = SessionPhase::Idle;
        if state.messages.is_empty() {
            state
                .messages
                .push(Message::greeting(self.translator.t(GREETING_KEY)));
        }

        info!(messages = state.messages.len(), "chat session started");
        true
    }

    pub fn update_draft(&self, text: impl Into<String>) {
        self.state.lock().draft = text.into();
    }

    pub fn apply_suggestion(&self, index: usize) -> Option<&'static str> {
        let suggestion = QUICK_SUGGESTIONS.get(index).copied()?;
        self.update_draft(suggestion);
        Some(suggestion)
    }

    #[instrument(skip(self))]
    pub async fn send(&self) -> SendOutcome {
        let Some(text) = self.begin_send() else {
            return SendOutcome::Ignored;
        };

        let in_flight = InFlight::new(&self.state, &self.metrics);
        self.metrics.inc_send();

        let result = self.transport.send(&text).await;
        self.metrics.observe_latency(in_flight.elapsed());

        let (message, outcome) = match result {
            Ok(reply) => {
                let message = Message::bot_reply(reply);
                match message.urgency {
                    Urgency::Emergency => self.metrics.inc_emergency_reply(),
                    Urgency::Urgent => self.metrics.inc_urgent_reply(),
                    Urgency::Normal => {}
                }
                let urgency = message.urgency;
                (message, SendOutcome::Delivered { urgency })
            }
            Err(err) => {
                self.metrics.inc_failure();
                warn!(kind = err.kind(), "send failed; appending apology");
                (Message::bot_notice(CONNECTION_APOLOGY), SendOutcome::Failed)
            }
        };

        in_flight.settle(message);
        info!(outcome = ?outcome, "send settled");
        outcome
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.lock();
        SessionSnapshot {
            messages: state.messages.clone(),
            phase: state.phase,
            draft: state.draft.clone(),
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.lock().phase
    }

    pub fn message_count(&self) -> usize {
        self.state.lock().messages.len()
    }

    pub fn metrics(&self) -> &Arc<ChatMetrics> {
        &self.metrics
    }

    // Appends the user message and enters `Sending`, or returns `None` when
    // the single-flight or blank-draft guard rejects the send.
    fn begin_send(&self) -> Option<String> {
        let mut state = self.state.lock();
        if state.phase != SessionPhase::Idle {
            debug!(phase = ?state.phase, "send ignored");
            return None;
        }

        let text = state.draft.trim().to_string();
        if text.is_empty() {
            debug!("send ignored: blank draft");
            return None;
        }

        state.messages.push(Message::user(text.clone()));
        state.draft.clear();
        state.phase = SessionPhase::Sending;
        Some(text)
    }
}

// Returns the session to `Idle` even if the send future is dropped mid-flight.
struct InFlight<'a> {
    state: &'a Mutex<SessionState>,
    metrics: &'a ChatMetrics,
    started: Instant,
    settled: bool,
}

impl<'a> InFlight<'a> {
    fn new(state: &'a Mutex<SessionState>, metrics: &'a ChatMetrics) -> Self {
        Self {
            state,
            metrics,
            started: Instant::now(),
            settled: false,
        }
    }

    fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    fn settle(mut self, message: Message) {
        let mut state = self.state.lock();
        state.messages.push(message);
        state.phase = SessionPhase::Idle;
        self.settled = true;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }

        warn!("send abandoned before the reply arrived");
        self.metrics.observe_latency(self.elapsed());
        self.metrics.inc_abandoned();

        let mut state = self.state.lock();
        state
            .messages
            .push(Message::bot_notice(CONNECTION_APOLOGY));
        state.phase = SessionPhase::Idle;
    }
}
