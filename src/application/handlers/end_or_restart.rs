//! End-or-restart handler: another topic, or into the questionnaire.

use super::{HandlerError, HandlerOutcome, StateHandlers};
use crate::application::prompts;
use crate::domain::conversation::{
    ConversationState, Event, MessageKind, OutboundMessage, RequestContext, Session,
};

impl StateHandlers {
    /// Handles the yes/no answer to the new-topic offer. Yes clears the
    /// per-topic fields and loops back to the symptom question, no starts
    /// the feedback questionnaire.
    pub(super) async fn handle_end_or_restart(
        &self,
        session: &mut Session,
        event: Event,
        _ctx: &RequestContext,
    ) -> Result<HandlerOutcome, HandlerError> {
        let outcome = match event {
            Event::RestartYes => {
                session.reset_topic();
                HandlerOutcome::new(
                    ConversationState::AwaitingSymptom,
                    vec![OutboundMessage::companion(
                        MessageKind::Question,
                        prompts::ASK_NEXT_SYMPTOM,
                    )],
                )
            }
            Event::RestartNo => HandlerOutcome::new(
                ConversationState::Feedback1,
                vec![OutboundMessage::companion(
                    MessageKind::Question,
                    prompts::FEEDBACK_QUESTIONS[0],
                )],
            ),
            _ => HandlerOutcome::stay(
                ConversationState::EndOrRestart,
                OutboundMessage::companion(MessageKind::Question, prompts::ASK_YES_NO),
            ),
        };
        Ok(outcome)
    }
}
