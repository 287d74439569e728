//! Flow engine.
//!
//! Holds the transition table `(state, event) -> (state, guard?, action?)`,
//! validates guards, executes registered entry/exit hooks and records an
//! append-only transition history. Stateless apart from the table, the hook
//! registry and the diagnostic history.
//!
//! A missing transition is an expected, frequent outcome (the user gave
//! confusing input) and is a quiet "stay put", never an error.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, warn};

use super::classifier::{MIN_CONTEXT_LEN, MIN_SYMPTOM_LEN};
use super::{ConversationState, Event, RequestContext};

/// Predicate gating a transition.
pub type Guard = Box<dyn Fn(&RequestContext) -> bool + Send + Sync>;

/// Side effect attached to a transition or a state boundary. Failures are
/// advisory: they are logged and never abort the transition.
pub type Hook = Box<dyn Fn(&RequestContext) -> Result<(), String> + Send + Sync>;

struct TransitionRule {
    target: ConversationState,
    guard: Option<Guard>,
    action: Option<Hook>,
}

/// One recorded transition, diagnostics only.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionRecord {
    pub from: ConversationState,
    pub event: Event,
    pub to: ConversationState,
    pub at: DateTime<Utc>,
}

/// The conversation state machine.
///
/// Initial state is `Greeting`. There is no terminal state: `Feedback5`
/// transitions back to `Greeting`, making the machine cyclic by design.
pub struct FlowEngine {
    table: HashMap<(ConversationState, Event), TransitionRule>,
    entry_hooks: HashMap<ConversationState, Hook>,
    exit_hooks: HashMap<ConversationState, Hook>,
    history: Mutex<Vec<TransitionRecord>>,
}

impl FlowEngine {
    /// Builds the engine with the canonical transition table.
    ///
    /// The symptom and context length guards duplicate the classifier's own
    /// checks; that belt-and-suspenders duplication is intentional.
    pub fn new() -> Self {
        use ConversationState::*;
        use Event::*;

        let mut engine = Self {
            table: HashMap::new(),
            entry_hooks: HashMap::new(),
            exit_hooks: HashMap::new(),
            history: Mutex::new(Vec::new()),
        };

        engine.register(Greeting, Start, AwaitingSymptom);
        engine.register_guarded(
            AwaitingSymptom,
            SymptomReceived,
            AwaitingConfirmation,
            Box::new(|ctx| ctx.trimmed_text().chars().count() >= MIN_SYMPTOM_LEN),
        );
        engine.register(AwaitingConfirmation, ConfirmYes, AwaitingContext);
        engine.register(AwaitingConfirmation, ConfirmNo, EndOrRestart);
        engine.register_guarded(
            AwaitingContext,
            ContextProvided,
            AwaitingExerciseChoice,
            Box::new(|ctx| ctx.trimmed_text().chars().count() >= MIN_CONTEXT_LEN),
        );
        engine.register(AwaitingExerciseChoice, ExerciseYes, EndOrRestart);
        engine.register(AwaitingExerciseChoice, ExerciseNo, Feedback1);
        engine.register(EndOrRestart, RestartYes, AwaitingSymptom);
        engine.register(EndOrRestart, RestartNo, Feedback1);
        engine.register(Feedback1, FeedbackProvided, Feedback2);
        engine.register(Feedback2, FeedbackProvided, Feedback3);
        engine.register(Feedback3, FeedbackProvided, Feedback4);
        engine.register(Feedback4, FeedbackProvided, Feedback5);
        engine.register(Feedback5, FeedbackProvided, Greeting);

        // Synthetic global rule: restart always succeeds from any state
        // except Greeting itself.
        for state in ConversationState::all() {
            if state != Greeting {
                engine.register(state, RestartCommand, Greeting);
            }
        }

        engine
    }

    /// Registers an unguarded transition, replacing any existing rule for
    /// the `(from, event)` pair.
    pub fn register(&mut self, from: ConversationState, event: Event, to: ConversationState) {
        self.table.insert(
            (from, event),
            TransitionRule {
                target: to,
                guard: None,
                action: None,
            },
        );
    }

    /// Registers a guarded transition.
    pub fn register_guarded(
        &mut self,
        from: ConversationState,
        event: Event,
        to: ConversationState,
        guard: Guard,
    ) {
        self.table.insert(
            (from, event),
            TransitionRule {
                target: to,
                guard: Some(guard),
                action: None,
            },
        );
    }

    /// Attaches an action to an already registered transition.
    pub fn set_action(&mut self, from: ConversationState, event: Event, action: Hook) {
        if let Some(rule) = self.table.get_mut(&(from, event)) {
            rule.action = Some(action);
        }
    }

    /// Registers a hook that runs when a state is entered.
    pub fn on_entry(&mut self, state: ConversationState, hook: Hook) {
        self.entry_hooks.insert(state, hook);
    }

    /// Registers a hook that runs when a state is exited.
    pub fn on_exit(&mut self, state: ConversationState, hook: Hook) {
        self.exit_hooks.insert(state, hook);
    }

    /// True iff a transition exists for `(state, event)` and its guard, if
    /// any, passes against `ctx`.
    pub fn can_transition(
        &self,
        state: ConversationState,
        event: Event,
        ctx: &RequestContext,
    ) -> bool {
        match self.table.get(&(state, event)) {
            Some(rule) => rule.guard.as_ref().map_or(true, |g| g(ctx)),
            None => false,
        }
    }

    /// Applies the transition for `(state, event)`.
    ///
    /// Returns `(state, false)` when no transition exists or the guard
    /// fails; the caller must treat that as "no state change". On success
    /// the exit hook of `state`, the transition's own action and the entry
    /// hook of the target run in that order, each advisory, and the
    /// transition is recorded in the history.
    pub fn transition(
        &self,
        state: ConversationState,
        event: Event,
        ctx: &RequestContext,
    ) -> (ConversationState, bool) {
        let rule = match self.table.get(&(state, event)) {
            Some(rule) => rule,
            None => {
                debug!(%state, %event, "no transition registered, staying put");
                return (state, false);
            }
        };

        if let Some(guard) = &rule.guard {
            if !guard(ctx) {
                debug!(%state, %event, "guard rejected transition, staying put");
                return (state, false);
            }
        }

        if let Some(hook) = self.exit_hooks.get(&state) {
            if let Err(err) = hook(ctx) {
                warn!(%state, %event, error = %err, "exit hook failed");
            }
        }
        if let Some(action) = &rule.action {
            if let Err(err) = action(ctx) {
                warn!(%state, %event, error = %err, "transition action failed");
            }
        }
        if let Some(hook) = self.entry_hooks.get(&rule.target) {
            if let Err(err) = hook(ctx) {
                warn!(%state, %event, target = %rule.target, error = %err, "entry hook failed");
            }
        }

        let record = TransitionRecord {
            from: state,
            event,
            to: rule.target,
            at: Utc::now(),
        };
        self.history
            .lock()
            .expect("flow history mutex poisoned")
            .push(record);

        (rule.target, true)
    }

    /// Snapshot of the diagnostic transition history.
    pub fn history(&self) -> Vec<TransitionRecord> {
        self.history
            .lock()
            .expect("flow history mutex poisoned")
            .clone()
    }
}

impl Default for FlowEngine {
    fn default() -> Self {
        Self::new()
    }
}
