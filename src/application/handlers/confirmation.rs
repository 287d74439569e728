//! Confirmation handler: was the perspective on point?

use super::{HandlerError, HandlerOutcome, StateHandlers};
use crate::application::prompts;
use crate::domain::conversation::{
    ConversationState, Event, MessageKind, OutboundMessage, RequestContext, Session,
};

impl StateHandlers {
    /// Handles a yes/no answer to the perspective. Yes moves on to context
    /// gathering, no closes the topic politely, anything else re-prompts.
    pub(super) async fn handle_awaiting_confirmation(
        &self,
        _session: &mut Session,
        event: Event,
        _ctx: &RequestContext,
    ) -> Result<HandlerOutcome, HandlerError> {
        let outcome = match event {
            Event::ConfirmYes => HandlerOutcome::new(
                ConversationState::AwaitingContext,
                vec![OutboundMessage::companion(
                    MessageKind::Question,
                    prompts::ASK_CONTEXT,
                )],
            ),
            Event::ConfirmNo => HandlerOutcome::new(
                ConversationState::EndOrRestart,
                vec![
                    OutboundMessage::dog(MessageKind::Thanks, prompts::CLOSING_REMARK),
                    OutboundMessage::companion(MessageKind::Question, prompts::OFFER_NEW_TOPIC),
                ],
            ),
            _ => HandlerOutcome::stay(
                ConversationState::AwaitingConfirmation,
                OutboundMessage::companion(MessageKind::Question, prompts::ASK_YES_NO),
            ),
        };
        Ok(outcome)
    }
}
