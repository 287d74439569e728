//! Greeting handler: opens the conversation and asks for a behaviour.

use super::{HandlerError, HandlerOutcome, StateHandlers};
use crate::application::prompts;
use crate::domain::conversation::{
    ConversationState, MessageKind, OutboundMessage, RequestContext, Session,
};

impl StateHandlers {
    /// Greets the user in the dog's voice and moves on to the symptom
    /// question. Any first message triggers this, including an empty one.
    pub(super) async fn handle_greeting(
        &self,
        _session: &mut Session,
        _ctx: &RequestContext,
    ) -> Result<HandlerOutcome, HandlerError> {
        let greeting = self
            .generate_or(
                prompts::greeting_prompt(),
                prompts::GREETING_FALLBACK.to_string(),
            )
            .await;

        Ok(HandlerOutcome::new(
            ConversationState::AwaitingSymptom,
            vec![
                OutboundMessage::dog(MessageKind::Greeting, greeting),
                OutboundMessage::companion(MessageKind::Question, prompts::ASK_SYMPTOM),
            ],
        ))
    }
}
