//! Exercise handler: optionally recommends an exercise for the topic.

use super::{bounded, HandlerError, HandlerOutcome, StateHandlers};
use crate::application::prompts;
use crate::domain::conversation::{
    ConversationState, Event, MessageKind, OutboundMessage, RequestContext, Session,
};

impl StateHandlers {
    /// Handles the yes/no answer to the exercise offer.
    ///
    /// On yes the exercise collection is searched with the active symptom;
    /// a failed or empty lookup degrades to an apology but still closes the
    /// topic. On no the feedback questionnaire starts immediately.
    pub(super) async fn handle_awaiting_exercise_choice(
        &self,
        session: &mut Session,
        event: Event,
        _ctx: &RequestContext,
    ) -> Result<HandlerOutcome, HandlerError> {
        match event {
            Event::ExerciseYes => {
                let query = session.active_symptom.clone().unwrap_or_default();
                let retrieval = &self.config.retrieval;
                let hits = bounded(
                    "exercise search",
                    retrieval.timeout(),
                    self.retriever.search(
                        &retrieval.exercise_collection,
                        &query,
                        retrieval.top_k,
                        true,
                    ),
                )
                .await
                .unwrap_or_default();

                let exercise = Self::best_hit(&hits)
                    .and_then(|hit| hit.property_str("text"))
                    .map(prompts::format_exercise);

                let first = match exercise {
                    Some(text) => OutboundMessage::companion(MessageKind::Exercise, text),
                    None => OutboundMessage::companion(
                        MessageKind::Fallback,
                        prompts::EXERCISE_UNAVAILABLE,
                    ),
                };

                Ok(HandlerOutcome::new(
                    ConversationState::EndOrRestart,
                    vec![
                        first,
                        OutboundMessage::companion(MessageKind::Question, prompts::OFFER_NEW_TOPIC),
                    ],
                ))
            }
            Event::ExerciseNo => Ok(HandlerOutcome::new(
                ConversationState::Feedback1,
                vec![OutboundMessage::companion(
                    MessageKind::Question,
                    prompts::FEEDBACK_QUESTIONS[0],
                )],
            )),
            _ => Ok(HandlerOutcome::stay(
                ConversationState::AwaitingExerciseChoice,
                OutboundMessage::companion(MessageKind::Question, prompts::ASK_YES_NO),
            )),
        }
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

    fn session_awaiting_choice() -> Session {
        let mut session = Session::new();
        session.set_state(ConversationState::AwaitingExerciseChoice);
        session.set_active_symptom("Mein Hund bellt, wenn es klingelt");
        session
    }

    #[tokio::test]
    async fn yes_recommends_the_closest_exercise() {
        let handlers = handlers(
            MockGenerator::new(),
            MockRetriever::new().with_hits(
                "Exercise",
                vec![
                    MockRetriever::text_hit("Klingel-Training mit Leckerli", 0.2),
                    MockRetriever::text_hit("Rückruf üben", 0.5),
                ],
            ),
        );
        let mut session = session_awaiting_choice();
        let ctx = RequestContext::new(session.id, "ja");

        let outcome = handlers
            .dispatch(&mut session, Event::ExerciseYes, &ctx)
            .await
            .unwrap();

        assert_eq!(outcome.next_state, ConversationState::EndOrRestart);
        assert_eq!(outcome.messages[0].kind, MessageKind::Exercise);
        assert!(outcome.messages[0].text.contains("Klingel-Training"));
        assert_eq!(outcome.messages[1].text, prompts::OFFER_NEW_TOPIC);
    }

    #[tokio::test]
    async fn yes_with_outage_still_closes_the_topic() {
        let handlers = handlers(
            MockGenerator::new(),
            MockRetriever::new().with_failure("Exercise", "down"),
        );
        let mut session = session_awaiting_choice();
        let ctx = RequestContext::new(session.id, "ja");

        let outcome = handlers
            .dispatch(&mut session, Event::ExerciseYes, &ctx)
            .await
            .unwrap();

        assert_eq!(outcome.next_state, ConversationState::EndOrRestart);
        assert_eq!(outcome.messages[0].text, prompts::EXERCISE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn no_starts_the_questionnaire() {
        let handlers = handlers(MockGenerator::new(), MockRetriever::new());
        let mut session = session_awaiting_choice();
        let ctx = RequestContext::new(session.id, "nein");

        let outcome = handlers
            .dispatch(&mut session, Event::ExerciseNo, &ctx)
            .await
            .unwrap();

        assert_eq!(outcome.next_state, ConversationState::Feedback1);
        assert_eq!(outcome.messages[0].text, prompts::FEEDBACK_QUESTIONS[0]);
    }

    #[tokio::test]
    async fn anything_else_re_prompts() {
        let handlers = handlers(MockGenerator::new(), MockRetriever::new());
        let mut session = session_awaiting_choice();
        let ctx = RequestContext::new(session.id, "vielleicht morgen");

        let outcome = handlers
            .dispatch(&mut session, Event::Invalid, &ctx)
            .await
            .unwrap();

        assert_eq!(outcome.next_state, ConversationState::AwaitingExerciseChoice);
        assert_eq!(outcome.messages[0].text, prompts::ASK_YES_NO);
    }
}
