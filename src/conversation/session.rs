//! Conversation session: the single writer for one conversation.

use std::sync::Arc;

use uuid::Uuid;

use super::engine::{self, Action, Transition, TurnStatus};
use super::message::{Message, MessageLog, Step};
use super::state::{DetailField, PersonalDetails, SelectionState};
use crate::error::FlowError;
use crate::gateway::Responder;

/// Outcome of [`Conversation::begin`].
#[derive(Debug, Clone)]
pub enum Turn {
    /// Both messages are in the log.
    Complete(Vec<Message>),
    /// The user message is in the log; the reply must come from the
    /// responder and be handed back through [`Conversation::complete`].
    Pending(PendingTurn),
}

/// A delegated turn waiting for the assistant responder.
#[derive(Debug, Clone)]
pub struct PendingTurn {
    /// Id of the user message that opened the turn.
    pub turn: u64,
    /// Full history to send to the responder, ending with the user message.
    pub history: Vec<Message>,
    state: SelectionState,
}

/// One conversation: message log, selections, form, and the responding flag.
///
/// Starts with the greeting. While a delegated turn is outstanding
/// `is_responding` is true and every new action is rejected with
/// [`FlowError::Busy`].
pub struct Conversation {
    id: Uuid,
    log: MessageLog,
    selection: SelectionState,
    form: PersonalDetails,
    pending_turn: Option<u64>,
    responder: Arc<dyn Responder>,
}

impl Conversation {
    pub fn new(responder: Arc<dyn Responder>) -> Self {
        let mut log = MessageLog::new();
        log.append(engine::greeting());
        let id = Uuid::new_v4();
        tracing::info!(conversation_id = %id, responder = responder.name(), "Conversation started");
        Self {
            id,
            log,
            selection: SelectionState::default(),
            form: PersonalDetails::default(),
            pending_turn: None,
            responder,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn messages(&self) -> &[Message] {
        self.log.messages()
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn form(&self) -> &PersonalDetails {
        &self.form
    }

    pub fn responder(&self) -> Arc<dyn Responder> {
        Arc::clone(&self.responder)
    }

    pub fn is_responding(&self) -> bool {
        self.pending_turn.is_some()
    }

    /// Step of the latest assistant message. Nothing is selectable while
    /// the responder is working or when the user spoke last.
    pub fn active_step(&self) -> Option<&Step> {
        if self.is_responding() {
            return None;
        }
        self.log.last_assistant()?.step.as_ref()
    }

    /// Edit one field of the personal-details form.
    pub fn update_field(&mut self, field: DetailField, value: impl Into<String>) {
        self.form.set(field, value);
    }

    /// Start a turn.
    ///
    /// Scripted turns complete immediately. Delegated turns append the user
    /// message, raise the responding flag, and return what the responder
    /// needs.
    pub fn begin(&mut self, action: Action) -> Result<Turn, FlowError> {
        self.check(&action)?;

        let Transition {
            user_message,
            reply,
            state,
        } = engine::transition(&self.selection, &action);

        match engine::open_turn(&mut self.log, user_message, reply) {
            TurnStatus::Answered { turn } => {
                self.selection = state;
                Ok(Turn::Complete(engine::turn_messages(&self.log, turn)))
            }
            TurnStatus::Awaiting { turn } => {
                self.pending_turn = Some(turn);
                tracing::debug!(conversation_id = %self.id, turn, "Waiting for assistant responder");
                Ok(Turn::Pending(PendingTurn {
                    turn,
                    history: self.log.messages().to_vec(),
                    state,
                }))
            }
        }
    }

    /// Finish a delegated turn with the responder's reply.
    pub fn complete(&mut self, pending: PendingTurn, reply: String) -> Result<Vec<Message>, FlowError> {
        if self.pending_turn != Some(pending.turn) {
            return Err(FlowError::UnknownTurn { turn: pending.turn });
        }
        self.selection = pending.state;
        self.pending_turn = None;
        Ok(engine::close_turn(&mut self.log, pending.turn, reply))
    }

    /// Submit the personal-details form. Every field is required.
    pub fn submit_details(&mut self) -> Result<Vec<Message>, FlowError> {
        match self.begin(Action::submit_details(self.form.clone()))? {
            Turn::Complete(messages) => Ok(messages),
            // Submissions are always scripted.
            Turn::Pending(pending) => Err(FlowError::UnknownTurn { turn: pending.turn }),
        }
    }

    /// Run a whole turn, calling the responder if needed.
    pub async fn dispatch(&mut self, action: Action) -> Result<Vec<Message>, FlowError> {
        match self.begin(action)? {
            Turn::Complete(messages) => Ok(messages),
            Turn::Pending(pending) => {
                let reply = self.responder.respond(&pending.history).await;
                self.complete(pending, reply)
            }
        }
    }

    /// Reject actions that must not reach the engine.
    fn check(&self, action: &Action) -> Result<(), FlowError> {
        if self.is_responding() {
            return Err(FlowError::Busy);
        }
        match action {
            Action::Text { text: content } | Action::PickFaq { question: content }
                if content.trim().is_empty() =>
            {
                Err(FlowError::EmptyMessage)
            }
            Action::SubmitDetails { details } => {
                let missing = details.missing_fields();
                if missing.is_empty() {
                    Ok(())
                } else {
                    Err(FlowError::IncompleteDetails {
                        missing: missing.iter().map(ToString::to_string).collect(),
                    })
                }
            }
            _ => Ok(()),
        }
    }
}
