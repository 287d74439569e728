//! Fixed conversation texts.
//!
//! Canned questions, re-prompts and fallback lines in the conversation's
//! voice, plus the prompt builders for the generation collaborator. Keeping
//! them in one place keeps the handlers free of string soup and makes the
//! re-prompt idempotence guarantee trivial to uphold.

/// Fallback greeting when the generation collaborator is unavailable.
pub const GREETING_FALLBACK: &str =
    "Wuff! Schön, dass du da bist. Ich bin die Stimme deines Hundes.";

/// Follow-up prompt after the greeting.
pub const ASK_SYMPTOM: &str =
    "Erzähl mir: Welches Verhalten deines Hundes beschäftigt dich gerade? \
     Beschreibe es bitte in ein bis zwei Sätzen.";

/// Re-prompt when the behaviour description is too short.
pub const SYMPTOM_TOO_SHORT: &str =
    "Das war mir ein bisschen zu knapp. Magst du das Verhalten etwas \
     ausführlicher beschreiben?";

/// Friendly no-match line when retrieval finds nothing close enough.
pub const NO_MATCH: &str =
    "Hm, dazu habe ich leider noch keine passende Einschätzung gefunden. \
     Magst du es mit anderen Worten beschreiben?";

/// Confirmation question after a perspective.
pub const ASK_CONFIRMATION: &str =
    "Klingt das für dich stimmig? Antworte bitte mit ja oder nein.";

/// Re-prompt when a yes/no answer was expected.
pub const ASK_YES_NO: &str = "Bitte antworte kurz mit ja oder nein.";

/// Context-gathering question after a confirmed perspective.
pub const ASK_CONTEXT: &str =
    "Gut! In welchen Situationen zeigt sich das Verhalten genau? \
     Jedes Detail hilft mir.";

/// Re-prompt when the context detail is too short.
pub const CONTEXT_TOO_SHORT: &str =
    "Magst du mir noch ein kleines bisschen mehr dazu erzählen?";

/// Apology when the instinct lookup fails.
pub const DIAGNOSIS_UNAVAILABLE: &str =
    "Entschuldige, gerade komme ich nicht an mein Wissen heran. \
     Magst du die Situation gleich noch einmal beschreiben?";

/// Exercise offer after a diagnosis.
pub const OFFER_EXERCISE: &str =
    "Soll ich dir eine passende Übung dazu empfehlen? Ja oder nein?";

/// Apology when the exercise lookup fails.
pub const EXERCISE_UNAVAILABLE: &str =
    "Entschuldige, ich finde gerade keine passende Übung. \
     Frag mich später gern noch einmal.";

/// Restart offer at the end of a topic.
pub const OFFER_NEW_TOPIC: &str =
    "Möchtest du noch ein anderes Verhalten besprechen? Ja oder nein?";

/// Closing remark when the perspective was rejected.
pub const CLOSING_REMARK: &str =
    "Schade, dann habe ich dich wohl falsch verstanden. Trotzdem danke, \
     dass du mir zugehört hast!";

/// Prompt for describing the next behaviour after a restart decision.
pub const ASK_NEXT_SYMPTOM: &str =
    "Prima! Welches Verhalten möchtest du als Nächstes besprechen?";

/// Acknowledgement of the global restart command.
pub const RESTART_ACK: &str =
    "Alles klar, wir fangen von vorne an. Schreib mir einfach, wenn du \
     bereit bist.";

/// Generic recovery line after an unexpected internal error.
pub const START_OVER: &str =
    "Entschuldige, da ist bei mir etwas durcheinandergeraten. \
     Lass uns von vorne anfangen.";

/// Thank-you line after the completed questionnaire.
pub const FEEDBACK_THANKS: &str =
    "Danke dir für dein Feedback! Bis zum nächsten Mal - wuff!";

/// Re-prompt when a feedback answer was empty.
pub const FEEDBACK_EMPTY: &str = "Magst du dazu kurz etwas schreiben?";

/// The fixed feedback questionnaire, asked in order.
pub const FEEDBACK_QUESTIONS: [&str; 5] = [
    "Zum Abschluss habe ich fünf kurze Fragen. Erstens: Wie hilfreich war \
     meine Einschätzung für dich?",
    "Zweitens: Wie verständlich fandest du meine Erklärungen?",
    "Drittens: Hat dir etwas gefehlt?",
    "Viertens: Würdest du mich weiterempfehlen?",
    "Und zuletzt: Magst du uns eine Kontaktadresse dalassen? \
     Das ist freiwillig.",
];

/// System prompt for every generated line: the dog's voice.
pub const DOG_VOICE: &str =
    "Du bist die innere Stimme eines Hundes und sprichst mit deinem \
     Menschen. Antworte warmherzig, kurz und auf Deutsch, in der \
     Ich-Perspektive des Hundes.";

/// Prompt for the opening greeting.
pub fn greeting_prompt() -> String {
    "Begrüße deinen Menschen in zwei kurzen Sätzen und sag, dass du ihm \
     helfen möchtest, dich besser zu verstehen."
        .to_string()
}

/// Prompt for the perspective on a matched behaviour.
pub fn perspective_prompt(symptom: &str, matched: &str) -> String {
    format!(
        "Dein Mensch beschreibt dein Verhalten so: \"{}\". Aus deiner Sicht \
         als Hund steckt Folgendes dahinter: \"{}\". Erkläre ihm in zwei bis \
         drei Sätzen, wie sich das für dich anfühlt.",
        symptom, matched
    )
}

/// Prompt for the instinct diagnosis.
pub fn diagnosis_prompt(symptom: &str, context: &str, instinct: &str) -> String {
    format!(
        "Dein Mensch beschreibt dein Verhalten so: \"{}\" und ergänzt: \
         \"{}\". Dahinter steckt vor allem dein {}instinkt. Erkläre ihm in \
         zwei bis drei Sätzen, was dich antreibt.",
        symptom, context, instinct
    )
}

/// Canned perspective when generation is unavailable but retrieval matched.
pub fn perspective_fallback(matched: &str) -> String {
    format!("Aus meiner Sicht als Hund: {}", matched)
}

/// Canned diagnosis when generation is unavailable.
pub fn diagnosis_fallback(instinct: &str) -> String {
    format!(
        "Hinter deinem Eindruck steckt vor allem mein {}instinkt. \
         Er bestimmt gerade, wie ich mich verhalte.",
        instinct
    )
}

/// Formats a retrieved exercise for the user.
pub fn format_exercise(text: &str) -> String {
    format!("Hier ist eine Übung für euch beide: {}", text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn questionnaire_has_five_questions() {
        assert_eq!(FEEDBACK_QUESTIONS.len(), 5);
    }

    #[test]
    fn prompt_builders_embed_their_inputs() {
        let p = perspective_prompt("bellt bei besuch", "ich beschütze mein rudel");
        assert!(p.contains("bellt bei besuch"));
        assert!(p.contains("ich beschütze mein rudel"));

        let d = diagnosis_prompt("bellt", "bei besuch", "Rudel");
        assert!(d.contains("Rudelinstinkt"));
    }

    #[test]
    fn fallbacks_stay_in_the_dogs_voice() {
        assert!(perspective_fallback("x").starts_with("Aus meiner Sicht"));
        assert!(diagnosis_fallback("Jagd").contains("Jagdinstinkt"));
    }
}
