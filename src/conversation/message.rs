//! Conversation messages and the append-only message log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::state::Plan;

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Assistant,
}

impl std::fmt::Display for Sender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// A labelled quick-reply button.
///
/// Only `WorkOut` and `NeedAssistance` have scripted handling; every other
/// choice is sent on to the assistant responder as if the user had typed
/// its label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Choice {
    WorkOut,
    NeedAssistance,
    MembershipQuestions,
    FacilityInformation,
    ClassSchedule,
    ContactUs,
    AskAnotherQuestion,
    SelectDifferentMembership,
    CompleteRegistration,
}

impl Choice {
    /// Openers shown with the greeting.
    pub const OPENERS: [Choice; 2] = [Choice::WorkOut, Choice::NeedAssistance];

    /// Offered after "I need assistance".
    pub const ASSISTANCE_TOPICS: [Choice; 4] = [
        Choice::MembershipQuestions,
        Choice::FacilityInformation,
        Choice::ClassSchedule,
        Choice::ContactUs,
    ];

    /// Offered after an FAQ answer.
    pub const FAQ_FOLLOW_UPS: [Choice; 3] = [
        Choice::AskAnotherQuestion,
        Choice::SelectDifferentMembership,
        Choice::CompleteRegistration,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::WorkOut => "I'd like to work out",
            Self::NeedAssistance => "I need assistance",
            Self::MembershipQuestions => "Membership questions",
            Self::FacilityInformation => "Facility information",
            Self::ClassSchedule => "Class schedule",
            Self::ContactUs => "Contact us",
            Self::AskAnotherQuestion => "Ask another question",
            Self::SelectDifferentMembership => "Select different membership",
            Self::CompleteRegistration => "Complete registration",
        }
    }
}

/// Interactive widget attached to an assistant message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Step {
    /// Quick-reply buttons.
    Choices { choices: Vec<Choice> },
    /// Recurring membership vs. day pass.
    MembershipTypes,
    /// Comfort / Premium / Ultimate.
    Plans,
    /// Day Pass / Day Pass Plus.
    DayPasses,
    /// FAQ list scoped to a membership.
    Faqs { membership: Plan },
    /// Personal-details form.
    DetailsForm,
}

/// A message that has not been appended yet.
///
/// Constructed through [`MessageDraft::user`] and [`MessageDraft::assistant`]
/// so that only assistant messages can carry a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDraft {
    content: String,
    sender: Sender,
    step: Option<Step>,
}

impl MessageDraft {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            sender: Sender::User,
            step: None,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            sender: Sender::Assistant,
            step: None,
        }
    }

    pub fn with_step(mut self, step: Step) -> Self {
        debug_assert_eq!(self.sender, Sender::Assistant, "steps belong to assistant messages");
        if self.sender == Sender::Assistant {
            self.step = Some(step);
        }
        self
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn sender(&self) -> Sender {
        self.sender
    }

    pub fn step(&self) -> Option<&Step> {
        self.step.as_ref()
    }
}

/// One conversation turn, as stored in the log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: u64,
    pub content: String,
    pub sender: Sender,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<Step>,
    pub created_at: DateTime<Utc>,
}

/// Append-only, ordered message history.
///
/// Identifiers start at 1 and increase by one per append. The log only
/// hands out shared references, so appended messages never change.
#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    messages: Vec<Message>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a draft and return the stored message.
    pub fn append(&mut self, draft: MessageDraft) -> &Message {
        let id = self.messages.last().map_or(1, |m| m.id + 1);
        self.messages.push(Message {
            id,
            content: draft.content,
            sender: draft.sender,
            step: draft.step,
            created_at: Utc::now(),
        });
        let stored = &self.messages[self.messages.len() - 1];
        tracing::trace!(message_id = stored.id, sender = %stored.sender, "Message appended");
        stored
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Messages with an id greater than `id`.
    pub fn since(&self, id: u64) -> &[Message] {
        let start = self.messages.partition_point(|m| m.id <= id);
        &self.messages[start..]
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Latest assistant message, if any.
    pub fn last_assistant(&self) -> Option<&Message> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.sender == Sender::Assistant)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
