//! Feedback handler: walks through the five-question questionnaire.

use tracing::{debug, warn};

use super::{bounded, HandlerError, HandlerOutcome, StateHandlers};
use crate::application::prompts;
use crate::domain::conversation::{
    ConversationState, Event, MessageKind, OutboundMessage, RequestContext, Session,
};

impl StateHandlers {
    /// Handles an answer in any of the five feedback states.
    ///
    /// Empty answers re-prompt the same question. The fifth answer
    /// completes the record, persists it best-effort and thanks the user;
    /// a failed save is logged and never blocks the thank-you.
    pub(super) async fn handle_feedback(
        &self,
        session: &mut Session,
        event: Event,
        ctx: &RequestContext,
    ) -> Result<HandlerOutcome, HandlerError> {
        let index = session.state.feedback_index().ok_or_else(|| {
            HandlerError::invariant(format!("feedback handler in state {}", session.state))
        })?;

        if event != Event::FeedbackProvided || ctx.trimmed_text().is_empty() {
            return Ok(HandlerOutcome::stay(
                session.state,
                OutboundMessage::companion(MessageKind::Question, prompts::FEEDBACK_EMPTY),
            ));
        }

        if !session.push_feedback_answer(ctx.trimmed_text()) {
            return Err(HandlerError::invariant(
                "feedback questionnaire already full",
            ));
        }

        if session.state == ConversationState::Feedback5 {
            let record = session.feedback_record();
            match bounded(
                "feedback save",
                self.config.feedback.timeout(),
                self.feedback_store.save(session.id, &record),
            )
            .await
            {
                Some(true) => debug!(session_id = %session.id, "feedback stored"),
                Some(false) => warn!(session_id = %session.id, "feedback save reported no write"),
                None => {}
            }

            session.reset_topic();
            return Ok(HandlerOutcome::new(
                ConversationState::Greeting,
                vec![OutboundMessage::dog(
                    MessageKind::Thanks,
                    prompts::FEEDBACK_THANKS,
                )],
            ));
        }

        let next = session.state.next_feedback_state().ok_or_else(|| {
            HandlerError::invariant(format!("no successor for state {}", session.state))
        })?;

        Ok(HandlerOutcome::new(
            next,
            vec![OutboundMessage::companion(
                MessageKind::Question,
                prompts::FEEDBACK_QUESTIONS[index + 1],
            )],
        ))
    }
}
