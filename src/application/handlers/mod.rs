//! Per-state message handlers.
//!
//! One handler per conversation state. A handler receives the mutable
//! session, the classified event and the request context, talks to the
//! collaborators where its state requires it, and returns the next state
//! together with the outbound messages. The returned state is authoritative:
//! a handler may stay put even when the flow table would allow a move, e.g.
//! when retrieval finds no acceptable match.
//!
//! Collaborator failures never escape a handler; they degrade to canned
//! lines. `HandlerError` is reserved for broken invariants that the
//! orchestrator answers with a session reset.

mod confirmation;
mod context;
mod end_or_restart;
mod exercise;
mod feedback;
mod greeting;
mod symptom;

use std::cmp::Ordering;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use crate::application::prompts;
use crate::config::AppConfig;
use crate::domain::conversation::{
    ConversationState, Event, MessageKind, OutboundMessage, RequestContext, Session,
};
use crate::ports::{CompletionRequest, FeedbackStore, Generator, Retriever, SearchHit};

/// What a handler decided: where the session goes and what the user sees.
#[derive(Debug, Clone, PartialEq)]
pub struct HandlerOutcome {
    pub next_state: ConversationState,
    pub messages: Vec<OutboundMessage>,
}

impl HandlerOutcome {
    /// Creates an outcome.
    pub fn new(next_state: ConversationState, messages: Vec<OutboundMessage>) -> Self {
        Self {
            next_state,
            messages,
        }
    }

    /// Stays in `state` with a single re-prompt or fallback line.
    pub fn stay(state: ConversationState, message: OutboundMessage) -> Self {
        Self::new(state, vec![message])
    }
}

/// A broken conversation invariant, e.g. a feedback handler running outside
/// a feedback state. The orchestrator resets the session when it sees one.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("conversation invariant violated: {0}")]
    Invariant(String),
}

impl HandlerError {
    pub fn invariant(message: impl Into<String>) -> Self {
        Self::Invariant(message.into())
    }
}

/// The handler set, sharing the collaborators and configuration.
pub struct StateHandlers {
    pub(super) generator: Arc<dyn Generator>,
    pub(super) retriever: Arc<dyn Retriever>,
    pub(super) feedback_store: Arc<dyn FeedbackStore>,
    pub(super) config: AppConfig,
}

impl StateHandlers {
    /// Creates the handler set.
    pub fn new(
        generator: Arc<dyn Generator>,
        retriever: Arc<dyn Retriever>,
        feedback_store: Arc<dyn FeedbackStore>,
        config: AppConfig,
    ) -> Self {
        Self {
            generator,
            retriever,
            feedback_store,
            config,
        }
    }

    /// Routes one classified message to the handler of the session's state.
    ///
    /// The global restart command is resolved here so the individual
    /// handlers never need to know about it.
    pub async fn dispatch(
        &self,
        session: &mut Session,
        event: Event,
        ctx: &RequestContext,
    ) -> Result<HandlerOutcome, HandlerError> {
        if event == Event::RestartCommand && session.state != ConversationState::Greeting {
            session.reset_topic();
            return Ok(HandlerOutcome::new(
                ConversationState::Greeting,
                vec![OutboundMessage::companion(
                    MessageKind::Fallback,
                    prompts::RESTART_ACK,
                )],
            ));
        }

        match session.state {
            ConversationState::Greeting => self.handle_greeting(session, ctx).await,
            ConversationState::AwaitingSymptom => {
                self.handle_awaiting_symptom(session, event, ctx).await
            }
            ConversationState::AwaitingConfirmation => {
                self.handle_awaiting_confirmation(session, event, ctx).await
            }
            ConversationState::AwaitingContext => {
                self.handle_awaiting_context(session, event, ctx).await
            }
            ConversationState::AwaitingExerciseChoice => {
                self.handle_awaiting_exercise_choice(session, event, ctx)
                    .await
            }
            ConversationState::EndOrRestart => {
                self.handle_end_or_restart(session, event, ctx).await
            }
            ConversationState::Feedback1
            | ConversationState::Feedback2
            | ConversationState::Feedback3
            | ConversationState::Feedback4
            | ConversationState::Feedback5 => self.handle_feedback(session, event, ctx).await,
        }
    }

    /// Generates a line in the dog's voice, falling back to `fallback` when
    /// the collaborator fails, times out or returns an empty completion.
    pub(super) async fn generate_or(&self, prompt: String, fallback: String) -> String {
        let request = CompletionRequest::new(prompt)
            .with_system_prompt(prompts::DOG_VOICE)
            .with_temperature(self.config.generation.temperature);

        bounded(
            "generation",
            self.config.generation.timeout(),
            self.generator.complete(request),
        )
        .await
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .unwrap_or(fallback)
    }

    /// The closest hit that actually carries a distance. Hits without
    /// metadata cannot be checked against the acceptance threshold.
    pub(super) fn best_hit(hits: &[SearchHit]) -> Option<&SearchHit> {
        hits.iter()
            .filter(|hit| hit.distance().is_some())
            .min_by(|a, b| {
                a.distance()
                    .partial_cmp(&b.distance())
                    .unwrap_or(Ordering::Equal)
            })
    }

    /// The instinct named most often across the hits. Ties go to the
    /// instinct seen first, i.e. the one with the closer match.
    pub(super) fn dominant_instinct(hits: &[SearchHit]) -> Option<String> {
        let mut counts: Vec<(&str, usize)> = Vec::new();
        for hit in hits {
            if let Some(name) = hit.property_str("instinct") {
                match counts.iter_mut().find(|(seen, _)| *seen == name) {
                    Some((_, count)) => *count += 1,
                    None => counts.push((name, 1)),
                }
            }
        }

        let mut best: Option<(&str, usize)> = None;
        for (name, count) in counts {
            if best.map_or(true, |(_, top)| count > top) {
                best = Some((name, count));
            }
        }
        best.map(|(name, _)| name.to_string())
    }
}

/// Runs a collaborator call under a time bound. Failures and timeouts are
/// logged and collapse to `None`; the caller substitutes its fallback.
pub(super) async fn bounded<T, E, F>(call: &'static str, limit: Duration, fut: F) -> Option<T>
where
    F: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(Ok(value)) => Some(value),
        Ok(Err(err)) => {
            warn!(call, error = %err, "collaborator call failed");
            None
        }
        Err(_) => {
            warn!(call, timeout_secs = limit.as_secs(), "collaborator call timed out");
            None
        }
    }
}
