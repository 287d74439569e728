//! Context handler: combines symptom and situation into an instinct
//! diagnosis.

use super::{bounded, HandlerError, HandlerOutcome, StateHandlers};
use crate::application::prompts;
use crate::domain::conversation::{
    ConversationState, Event, MessageKind, OutboundMessage, RequestContext, Session,
};

impl StateHandlers {
    /// Handles a message in `AwaitingContext`.
    ///
    /// Searches the instinct collection with the combined symptom and
    /// context text and names the instinct represented most often among the
    /// hits. Stays put when the detail is too short or the lookup yields
    /// nothing usable, so the user can simply try again.
    pub(super) async fn handle_awaiting_context(
        &self,
        session: &mut Session,
        event: Event,
        ctx: &RequestContext,
    ) -> Result<HandlerOutcome, HandlerError> {
        if event != Event::ContextProvided || !ctx.transition_allowed {
            return Ok(HandlerOutcome::stay(
                ConversationState::AwaitingContext,
                OutboundMessage::companion(MessageKind::Question, prompts::CONTEXT_TOO_SHORT),
            ));
        }

        let context_text = ctx
            .context_text
            .clone()
            .unwrap_or_else(|| ctx.trimmed_text().to_string());
        let symptom = session.active_symptom.clone().unwrap_or_default();
        let combined = format!("{} {}", symptom, context_text).trim().to_string();

        let retrieval = &self.config.retrieval;
        let hits = bounded(
            "instinct search",
            retrieval.timeout(),
            self.retriever.search(
                &retrieval.instinct_collection,
                &combined,
                retrieval.top_k,
                true,
            ),
        )
        .await
        .unwrap_or_default();

        let instinct = match Self::dominant_instinct(&hits) {
            Some(instinct) => instinct,
            None => {
                return Ok(HandlerOutcome::stay(
                    ConversationState::AwaitingContext,
                    OutboundMessage::companion(
                        MessageKind::Fallback,
                        prompts::DIAGNOSIS_UNAVAILABLE,
                    ),
                ));
            }
        };

        let diagnosis = self
            .generate_or(
                prompts::diagnosis_prompt(&symptom, &context_text, &instinct),
                prompts::diagnosis_fallback(&instinct),
            )
            .await;

        Ok(HandlerOutcome::new(
            ConversationState::AwaitingExerciseChoice,
            vec![
                OutboundMessage::dog(MessageKind::Diagnosis, diagnosis)
                    .with_metadata("instinct", &instinct),
                OutboundMessage::companion(MessageKind::Question, prompts::OFFER_EXERCISE),
            ],
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::handlers;
    use crate::adapters::{MockGenerator, MockRetriever};
    use crate::application::prompts;
    use crate::domain::conversation::{
        ConversationState, Event, MessageKind, RequestContext, Session,
    };

    fn session_awaiting_context() -> Session {
        let mut session = Session::new();
        session.set_state(ConversationState::AwaitingContext);
        session.set_active_symptom("Mein Hund bellt, wenn es klingelt");
        session
    }

    fn ctx_allowed(session: &Session, text: &str) -> RequestContext {
        let mut ctx = RequestContext::new(session.id, text);
        ctx.context_text = Some(text.trim().to_string());
        ctx.transition_allowed = true;
        ctx
    }

    #[tokio::test]
    async fn diagnosis_names_the_dominant_instinct() {
        let handlers = handlers(
            MockGenerator::new().with_reply("Ich passe auf unser Rudel auf."),
            MockRetriever::new().with_hits(
                "Instinct",
                vec![
                    MockRetriever::instinct_hit("besucher anmelden", "Rudel", 0.2),
                    MockRetriever::instinct_hit("beute fixieren", "Jagd", 0.3),
                    MockRetriever::instinct_hit("revier melden", "Rudel", 0.4),
                ],
            ),
        );
        let mut session = session_awaiting_context();
        let ctx = ctx_allowed(&session, "Es ist meist bei Besuch, sehr aufgeregt");

        let outcome = handlers
            .dispatch(&mut session, Event::ContextProvided, &ctx)
            .await
            .unwrap();

        assert_eq!(outcome.next_state, ConversationState::AwaitingExerciseChoice);
        assert_eq!(outcome.messages[0].kind, MessageKind::Diagnosis);
        assert_eq!(
            outcome.messages[0].metadata.get("instinct").map(String::as_str),
            Some("Rudel")
        );
        assert_eq!(outcome.messages[1].text, prompts::OFFER_EXERCISE);
    }

    #[tokio::test]
    async fn query_combines_symptom_and_context() {
        let retriever = MockRetriever::new().with_hits(
            "Instinct",
            vec![MockRetriever::instinct_hit("x", "Rudel", 0.2)],
        );
        let handlers = handlers(MockGenerator::new(), retriever.clone());
        let mut session = session_awaiting_context();
        let ctx = ctx_allowed(&session, "bei Besuch");

        handlers
            .dispatch(&mut session, Event::ContextProvided, &ctx)
            .await
            .unwrap();

        let calls = retriever.calls();
        assert_eq!(
            calls[0].1,
            "Mein Hund bellt, wenn es klingelt bei Besuch"
        );
    }

    #[tokio::test]
    async fn prefilled_context_field_feeds_the_query() {
        let retriever = MockRetriever::new().with_hits(
            "Instinct",
            vec![MockRetriever::instinct_hit("x", "Rudel", 0.2)],
        );
        let handlers = handlers(MockGenerator::new(), retriever.clone());
        let mut session = session_awaiting_context();

        let mut ctx = RequestContext::new(session.id, "  bei Besuch  ");
        ctx.context_text = Some("bei Besuch an der Tür".to_string());
        ctx.transition_allowed = true;

        handlers
            .dispatch(&mut session, Event::ContextProvided, &ctx)
            .await
            .unwrap();

        let calls = retriever.calls();
        assert_eq!(
            calls[0].1,
            "Mein Hund bellt, wenn es klingelt bei Besuch an der Tür"
        );
    }

    #[tokio::test]
    async fn lookup_outage_stays_with_apology() {
        let handlers = handlers(
            MockGenerator::new(),
            MockRetriever::new().with_failure("Instinct", "down"),
        );
        let mut session = session_awaiting_context();
        let ctx = ctx_allowed(&session, "Es ist meist bei Besuch");

        let outcome = handlers
            .dispatch(&mut session, Event::ContextProvided, &ctx)
            .await
            .unwrap();

        assert_eq!(outcome.next_state, ConversationState::AwaitingContext);
        assert_eq!(outcome.messages[0].text, prompts::DIAGNOSIS_UNAVAILABLE);
    }

    #[tokio::test]
    async fn too_short_context_is_re_prompted() {
        let handlers = handlers(MockGenerator::new(), MockRetriever::new());
        let mut session = session_awaiting_context();
        let ctx = RequestContext::new(session.id, "oft");

        let outcome = handlers
            .dispatch(&mut session, Event::Invalid, &ctx)
            .await
            .unwrap();

        assert_eq!(outcome.next_state, ConversationState::AwaitingContext);
        assert_eq!(outcome.messages[0].text, prompts::CONTEXT_TOO_SHORT);
    }
}
