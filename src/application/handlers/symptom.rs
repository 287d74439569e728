//! Symptom handler: matches the behaviour description against the
//! knowledge base and answers with the dog's perspective.

use super::{bounded, HandlerError, HandlerOutcome, StateHandlers};
use crate::application::prompts;
use crate::domain::conversation::{
    ConversationState, Event, MessageKind, OutboundMessage, RequestContext, Session,
};

impl StateHandlers {
    /// Handles a message in `AwaitingSymptom`.
    ///
    /// Stays put with a re-prompt when the description is too short, when
    /// retrieval is unavailable, and when no hit clears the acceptance
    /// threshold. Only a sufficiently close match produces a perspective
    /// and moves to confirmation.
    pub(super) async fn handle_awaiting_symptom(
        &self,
        session: &mut Session,
        event: Event,
        ctx: &RequestContext,
    ) -> Result<HandlerOutcome, HandlerError> {
        if event != Event::SymptomReceived || !ctx.transition_allowed {
            return Ok(HandlerOutcome::stay(
                ConversationState::AwaitingSymptom,
                OutboundMessage::companion(MessageKind::Question, prompts::SYMPTOM_TOO_SHORT),
            ));
        }

        let symptom = ctx.trimmed_text().to_string();
        session.set_active_symptom(&symptom);

        let retrieval = &self.config.retrieval;
        let hits = match bounded(
            "symptom search",
            retrieval.timeout(),
            self.retriever.search(
                &retrieval.symptom_collection,
                &symptom,
                retrieval.top_k,
                true,
            ),
        )
        .await
        {
            Some(hits) => hits,
            None => {
                return Ok(HandlerOutcome::stay(
                    ConversationState::AwaitingSymptom,
                    OutboundMessage::companion(
                        MessageKind::Fallback,
                        prompts::DIAGNOSIS_UNAVAILABLE,
                    ),
                ));
            }
        };

        let accepted = Self::best_hit(&hits).filter(|hit| {
            hit.distance()
                .map_or(false, |d| d <= retrieval.match_threshold)
        });

        let hit = match accepted {
            Some(hit) => hit,
            None => {
                return Ok(HandlerOutcome::stay(
                    ConversationState::AwaitingSymptom,
                    OutboundMessage::companion(MessageKind::Fallback, prompts::NO_MATCH),
                ));
            }
        };

        let matched = hit.property_str("text").unwrap_or(&symptom).to_string();
        let distance = hit.distance();
        if let Some(distance) = distance {
            session.set_last_confidence(distance);
        }

        let perspective = self
            .generate_or(
                prompts::perspective_prompt(&symptom, &matched),
                prompts::perspective_fallback(&matched),
            )
            .await;

        let mut message = OutboundMessage::dog(MessageKind::Perspective, perspective);
        if let Some(distance) = distance {
            message = message.with_metadata("distance", format!("{distance:.4}"));
        }

        Ok(HandlerOutcome::new(
            ConversationState::AwaitingConfirmation,
            vec![
                message,
                OutboundMessage::companion(MessageKind::Question, prompts::ASK_CONFIRMATION),
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
    use std::time::Duration;

    fn session_awaiting_symptom() -> Session {
        let mut session = Session::new();
        session.set_state(ConversationState::AwaitingSymptom);
        session
    }

    fn ctx_allowed(session: &Session, text: &str) -> RequestContext {
        let mut ctx = RequestContext::new(session.id, text);
        ctx.transition_allowed = true;
        ctx
    }

    #[tokio::test]
    async fn good_match_produces_perspective_and_confirmation() {
        let handlers = handlers(
            MockGenerator::new().with_reply("Ich beschütze unser Zuhause."),
            MockRetriever::new().with_hits(
                "Symptom",
                vec![MockRetriever::text_hit("bellen bei besuch", 0.3)],
            ),
        );
        let mut session = session_awaiting_symptom();
        let ctx = ctx_allowed(&session, "Mein Hund bellt, wenn es klingelt");

        let outcome = handlers
            .dispatch(&mut session, Event::SymptomReceived, &ctx)
            .await
            .unwrap();

        assert_eq!(outcome.next_state, ConversationState::AwaitingConfirmation);
        assert_eq!(outcome.messages[0].kind, MessageKind::Perspective);
        assert_eq!(outcome.messages[0].text, "Ich beschütze unser Zuhause.");
        assert_eq!(
            outcome.messages[0].metadata.get("distance").map(String::as_str),
            Some("0.3000")
        );
        assert_eq!(outcome.messages[1].text, prompts::ASK_CONFIRMATION);
        assert_eq!(
            session.active_symptom.as_deref(),
            Some("Mein Hund bellt, wenn es klingelt")
        );
        assert_eq!(session.last_confidence, Some(0.3));
    }

    #[tokio::test]
    async fn distant_match_stays_with_no_match_line() {
        let handlers = handlers(
            MockGenerator::new(),
            MockRetriever::new().with_hits(
                "Symptom",
                vec![MockRetriever::text_hit("irgendwas anderes", 0.9)],
            ),
        );
        let mut session = session_awaiting_symptom();
        let ctx = ctx_allowed(&session, "Mein Hund dreht sich dauernd im Kreis");

        let outcome = handlers
            .dispatch(&mut session, Event::SymptomReceived, &ctx)
            .await
            .unwrap();

        assert_eq!(outcome.next_state, ConversationState::AwaitingSymptom);
        assert_eq!(outcome.messages[0].text, prompts::NO_MATCH);
    }

    #[tokio::test]
    async fn empty_hit_list_stays_with_no_match_line() {
        let handlers = handlers(MockGenerator::new(), MockRetriever::new());
        let mut session = session_awaiting_symptom();
        let ctx = ctx_allowed(&session, "Mein Hund dreht sich dauernd im Kreis");

        let outcome = handlers
            .dispatch(&mut session, Event::SymptomReceived, &ctx)
            .await
            .unwrap();

        assert_eq!(outcome.next_state, ConversationState::AwaitingSymptom);
        assert_eq!(outcome.messages[0].text, prompts::NO_MATCH);
    }

    #[tokio::test(start_paused = true)]
    async fn retrieval_timeout_behaves_like_an_outage() {
        let handlers = handlers(
            MockGenerator::new(),
            MockRetriever::new()
                .with_hits(
                    "Symptom",
                    vec![MockRetriever::text_hit("bellen bei besuch", 0.3)],
                )
                .with_delay(Duration::from_secs(600)),
        );
        let mut session = session_awaiting_symptom();
        let ctx = ctx_allowed(&session, "Mein Hund bellt, wenn es klingelt");

        let outcome = handlers
            .dispatch(&mut session, Event::SymptomReceived, &ctx)
            .await
            .unwrap();

        assert_eq!(outcome.next_state, ConversationState::AwaitingSymptom);
        assert_eq!(outcome.messages[0].text, prompts::DIAGNOSIS_UNAVAILABLE);
    }

    #[tokio::test]
    async fn retrieval_outage_stays_with_apology() {
        let handlers = handlers(
            MockGenerator::new(),
            MockRetriever::new().with_failure("Symptom", "down"),
        );
        let mut session = session_awaiting_symptom();
        let ctx = ctx_allowed(&session, "Mein Hund bellt, wenn es klingelt");

        let outcome = handlers
            .dispatch(&mut session, Event::SymptomReceived, &ctx)
            .await
            .unwrap();

        assert_eq!(outcome.next_state, ConversationState::AwaitingSymptom);
        assert_eq!(outcome.messages[0].text, prompts::DIAGNOSIS_UNAVAILABLE);
    }

    #[tokio::test]
    async fn too_short_description_is_re_prompted() {
        let handlers = handlers(MockGenerator::new(), MockRetriever::new());
        let mut session = session_awaiting_symptom();
        let ctx = RequestContext::new(session.id, "bellt");

        let outcome = handlers
            .dispatch(&mut session, Event::Invalid, &ctx)
            .await
            .unwrap();

        assert_eq!(outcome.next_state, ConversationState::AwaitingSymptom);
        assert_eq!(outcome.messages[0].text, prompts::SYMPTOM_TOO_SHORT);
        assert!(session.active_symptom.is_none());
    }

    #[tokio::test]
    async fn generator_outage_degrades_to_canned_perspective() {
        let handlers = handlers(
            MockGenerator::new().with_failure("503"),
            MockRetriever::new().with_hits(
                "Symptom",
                vec![MockRetriever::text_hit("bellen bei besuch", 0.3)],
            ),
        );
        let mut session = session_awaiting_symptom();
        let ctx = ctx_allowed(&session, "Mein Hund bellt, wenn es klingelt");

        let outcome = handlers
            .dispatch(&mut session, Event::SymptomReceived, &ctx)
            .await
            .unwrap();

        assert_eq!(outcome.next_state, ConversationState::AwaitingConfirmation);
        assert!(outcome.messages[0].text.contains("bellen bei besuch"));
    }
}
