//! Conversation orchestrator.
//!
//! The single entry point for inbound messages. Classifies the text against
//! the session's state, consults the flow table, runs the state's handler
//! and persists the mutated session exactly once per message. Messages of
//! the same session are serialized through a per-session lock; different
//! sessions proceed concurrently.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, error};

use crate::application::handlers::StateHandlers;
use crate::application::prompts;
use crate::config::AppConfig;
use crate::domain::conversation::{
    classify, ConversationState, FlowEngine, MessageKind, OutboundMessage, RequestContext,
    Session, TransitionRecord,
};
use crate::domain::foundation::SessionId;
use crate::ports::{FeedbackStore, Generator, Retriever, SessionStore, SessionStoreError};

/// Errors the orchestrator cannot absorb.
///
/// Collaborator failures and broken invariants are handled internally and
/// degrade to canned messages; only session persistence failures surface.
#[derive(Debug, thiserror::Error)]
pub enum ConversationError {
    #[error("session store failed: {0}")]
    Store(#[from] SessionStoreError),
}

/// Drives conversations across their whole lifecycle.
pub struct ConversationService {
    store: Arc<dyn SessionStore>,
    engine: FlowEngine,
    handlers: StateHandlers,
    // One lock per session so a session's messages are processed strictly
    // in order while unrelated sessions run in parallel.
    locks: Mutex<HashMap<SessionId, Arc<Mutex<()>>>>,
}

impl ConversationService {
    /// Wires the service from its collaborators and configuration.
    pub fn new(
        store: Arc<dyn SessionStore>,
        generator: Arc<dyn Generator>,
        retriever: Arc<dyn Retriever>,
        feedback_store: Arc<dyn FeedbackStore>,
        config: AppConfig,
    ) -> Self {
        Self {
            store,
            engine: FlowEngine::new(),
            handlers: StateHandlers::new(generator, retriever, feedback_store, config),
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Opens a new conversation: creates a session and delivers the
    /// greeting as if the user had sent their first (empty) message.
    pub async fn start_conversation(
        &self,
    ) -> Result<(SessionId, Vec<OutboundMessage>), ConversationError> {
        let session = self.store.create_session().await?;
        let session_id = session.id;
        let messages = self.process_message(session_id, "").await?;
        Ok((session_id, messages))
    }

    /// Processes one inbound message and returns the outbound replies.
    ///
    /// Unknown session ids start a fresh session under that id, so a client
    /// reconnecting after a store wipe is greeted instead of rejected. A
    /// handler invariant failure resets the session to the greeting state
    /// with a generic recovery line; it never surfaces to the caller.
    #[tracing::instrument(skip(self, raw_text), fields(%session_id))]
    pub async fn process_message(
        &self,
        session_id: SessionId,
        raw_text: &str,
    ) -> Result<Vec<OutboundMessage>, ConversationError> {
        let lock = self.session_lock(session_id).await;
        let _guard = lock.lock().await;

        let mut session = match self.store.get(session_id).await? {
            Some(session) => session,
            None => {
                debug!(%session_id, "unknown session, starting fresh");
                let mut session = Session::new();
                session.id = session_id;
                session
            }
        };

        if !raw_text.trim().is_empty() {
            session.record_user_line(raw_text.trim());
        }

        let mut ctx = RequestContext::new(session_id, raw_text)
            .with_active_symptom(session.active_symptom.clone())
            .with_feedback_answers(session.feedback_answers.clone());
        if session.state == ConversationState::AwaitingContext {
            ctx.context_text = Some(ctx.trimmed_text().to_string());
        }

        let event = classify(session.state, raw_text);
        ctx.set_metadata("event", event.to_string());
        if let Some(confidence) = session.last_confidence {
            ctx.set_metadata("last_confidence", format!("{confidence:.4}"));
        }
        ctx.transition_allowed = self.engine.can_transition(session.state, event, &ctx);

        let state_before = session.state;
        let messages = match self.handlers.dispatch(&mut session, event, &ctx).await {
            Ok(outcome) => {
                if outcome.next_state != state_before {
                    let (target, applied) = self.engine.transition(state_before, event, &ctx);
                    if !applied || target != outcome.next_state {
                        debug!(
                            from = %state_before,
                            %event,
                            to = %outcome.next_state,
                            "handler moved outside the flow table"
                        );
                    }
                }
                session.set_state(outcome.next_state);
                outcome.messages
            }
            Err(err) => {
                error!(%session_id, state = %state_before, error = %err, "handler failed, resetting session");
                session.reset_topic();
                session.set_state(ConversationState::Greeting);
                vec![OutboundMessage::companion(
                    MessageKind::Fallback,
                    prompts::START_OVER,
                )]
            }
        };

        session.record_outbound(&messages);
        self.store.save(session).await?;

        Ok(messages)
    }

    /// Snapshot of the applied transitions, for diagnostics.
    pub fn transition_history(&self) -> Vec<TransitionRecord> {
        self.engine.history()
    }

    async fn session_lock(&self, session_id: SessionId) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        Arc::clone(locks.entry(session_id).or_default())
    }
}
