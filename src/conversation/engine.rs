//! Transition engine: decides the assistant's next message.
//!
//! [`transition`] is pure: given the selection state and a user action it
//! returns the user-side message, the next selection state, and either a
//! scripted reply or a request to delegate to the assistant responder.
//! [`advance`] runs a transition against a message log, calling the
//! responder for delegated turns.

use serde::{Deserialize, Serialize};

use super::message::{Choice, Message, MessageDraft, MessageLog, Step};
use super::state::{MembershipType, PersonalDetails, Plan, SelectionState};
use crate::catalog;
use crate::gateway::Responder;

pub const GREETING: &str = "Hi there! I'm Ruby. How can I help you today?";

const WORK_OUT_REPLY: &str = "Great! Would you like a recurring membership or a day pass?";
const ASSISTANCE_REPLY: &str = "I'm here to help! What do you need assistance with?";
const RECURRING_REPLY: &str = "Excellent! Please select a membership plan that suits your needs:";
const DAY_PASS_REPLY: &str = "Great choice! Here are our day pass options:";
const DETAILS_SUBMITTED: &str = "I've submitted my personal details.";

/// Something the user did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// Typed into the message box.
    Text { text: String },
    /// Clicked a quick-reply button.
    Choose { choice: Choice },
    /// Picked recurring membership or day pass.
    PickMembershipType { membership_type: MembershipType },
    /// Picked a plan card.
    PickPlan { plan: Plan },
    /// Submitted the personal-details form.
    SubmitDetails { details: PersonalDetails },
    /// Clicked an FAQ question.
    PickFaq { question: String },
}

impl Action {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn choose(choice: Choice) -> Self {
        Self::Choose { choice }
    }

    pub fn pick_membership_type(membership_type: MembershipType) -> Self {
        Self::PickMembershipType { membership_type }
    }

    pub fn pick_plan(plan: Plan) -> Self {
        Self::PickPlan { plan }
    }

    pub fn submit_details(details: PersonalDetails) -> Self {
        Self::SubmitDetails { details }
    }

    pub fn pick_faq(question: impl Into<String>) -> Self {
        Self::PickFaq {
            question: question.into(),
        }
    }

    /// What the user appears to have said.
    pub fn user_text(&self) -> String {
        match self {
            Self::Text { text } => text.clone(),
            Self::Choose { choice } => choice.label().to_string(),
            Self::PickMembershipType {
                membership_type: MembershipType::Recurring,
            } => "I want a recurring membership".to_string(),
            Self::PickMembershipType {
                membership_type: MembershipType::DayPass,
            } => "I'd like a day pass".to_string(),
            Self::PickPlan { plan } => format!("I'm interested in the {plan}"),
            Self::SubmitDetails { .. } => DETAILS_SUBMITTED.to_string(),
            Self::PickFaq { question } => question.clone(),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::Choose { .. } => "choose",
            Self::PickMembershipType { .. } => "pick_membership_type",
            Self::PickPlan { .. } => "pick_plan",
            Self::SubmitDetails { .. } => "submit_details",
            Self::PickFaq { .. } => "pick_faq",
        }
    }
}

/// How the assistant answers a turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Fixed reply, known without any I/O.
    Scripted(MessageDraft),
    /// Ask the assistant responder.
    Delegate,
}

/// Result of a pure transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub user_message: MessageDraft,
    pub reply: Reply,
    pub state: SelectionState,
}

/// Opening message of every conversation.
pub fn greeting() -> MessageDraft {
    MessageDraft::assistant(GREETING).with_step(Step::Choices {
        choices: Choice::OPENERS.to_vec(),
    })
}

/// Pure transition function.
///
/// Same state and action always give the same messages and next state.
pub fn transition(state: &SelectionState, action: &Action) -> Transition {
    let mut next = state.clone();

    let reply = match action {
        Action::Choose {
            choice: Choice::WorkOut,
        } => Reply::Scripted(MessageDraft::assistant(WORK_OUT_REPLY).with_step(Step::MembershipTypes)),

        Action::Choose {
            choice: Choice::NeedAssistance,
        } => Reply::Scripted(MessageDraft::assistant(ASSISTANCE_REPLY).with_step(Step::Choices {
            choices: Choice::ASSISTANCE_TOPICS.to_vec(),
        })),

        Action::PickMembershipType { membership_type } => {
            next.membership_type = Some(*membership_type);
            let draft = match membership_type {
                MembershipType::Recurring => {
                    MessageDraft::assistant(RECURRING_REPLY).with_step(Step::Plans)
                }
                MembershipType::DayPass => {
                    MessageDraft::assistant(DAY_PASS_REPLY).with_step(Step::DayPasses)
                }
            };
            Reply::Scripted(draft)
        }

        Action::PickPlan { plan } => {
            next.plan = Some(*plan);
            Reply::Scripted(
                MessageDraft::assistant(format!(
                    "Excellent choice! To proceed with your {plan} {}, please fill in your personal details:",
                    next.purchase_noun()
                ))
                .with_step(Step::DetailsForm),
            )
        }

        Action::SubmitDetails { details } => {
            let first_name = details.first_name.clone();
            next.details = Some(details.clone());
            Reply::Scripted(
                MessageDraft::assistant(format!(
                    "Thank you, {first_name}! Your {} request has been received. Here are some frequently asked questions about your selection:",
                    next.purchase_noun()
                ))
                .with_step(Step::Faqs {
                    membership: next.faq_plan(),
                }),
            )
        }

        Action::PickFaq { question } => match catalog::find_faq(question) {
            Some(faq) => Reply::Scripted(MessageDraft::assistant(faq.answer).with_step(
                Step::Choices {
                    choices: Choice::FAQ_FOLLOW_UPS.to_vec(),
                },
            )),
            None => Reply::Delegate,
        },

        // Assistance topics, FAQ follow-ups and typed text
        Action::Choose { .. } | Action::Text { .. } => Reply::Delegate,
    };

    tracing::debug!(
        action = action.kind(),
        delegated = matches!(reply, Reply::Delegate),
        "Transition computed"
    );

    Transition {
        user_message: MessageDraft::user(action.user_text()),
        reply,
        state: next,
    }
}

/// Run one action against the log.
///
/// Appends the user message, then the assistant reply (scripted, or from
/// `responder` with the full history), and returns both appended messages
/// together with the next selection state.
pub async fn advance(
    log: &mut MessageLog,
    state: &SelectionState,
    action: &Action,
    responder: &dyn Responder,
) -> (Vec<Message>, SelectionState) {
    let Transition {
        user_message,
        reply,
        state: next,
    } = transition(state, action);

    let messages = match open_turn(log, user_message, reply) {
        TurnStatus::Answered { turn } => turn_messages(log, turn),
        TurnStatus::Awaiting { turn } => {
            tracing::info!(responder = responder.name(), "Delegating turn to assistant responder");
            let reply = responder.respond(log.messages()).await;
            close_turn(log, turn, reply)
        }
    };

    (messages, next)
}

/// Where a turn stands once its user message is in the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnStatus {
    /// The scripted reply was appended too.
    Answered { turn: u64 },
    /// The reply has to come from the responder.
    Awaiting { turn: u64 },
}

/// Append the user message of a transition, and its reply when scripted.
///
/// `turn` is the id of the user message.
pub fn open_turn(log: &mut MessageLog, user_message: MessageDraft, reply: Reply) -> TurnStatus {
    let turn = log.append(user_message).id;
    match reply {
        Reply::Scripted(draft) => {
            log.append(draft);
            TurnStatus::Answered { turn }
        }
        Reply::Delegate => TurnStatus::Awaiting { turn },
    }
}

/// Append the responder's reply to an awaiting turn and return the turn.
pub fn close_turn(log: &mut MessageLog, turn: u64, reply: impl Into<String>) -> Vec<Message> {
    log.append(MessageDraft::assistant(reply));
    turn_messages(log, turn)
}

/// Messages of a turn: the user message with id `turn` and what follows it.
pub fn turn_messages(log: &MessageLog, turn: u64) -> Vec<Message> {
    log.since(turn.saturating_sub(1)).to_vec()
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::catalog::{FaqCategory, faqs};
    use crate::conversation::message::Sender;
    use crate::gateway::FALLBACK_REPLY;

    /// Records every history it is asked about.
    struct StubResponder {
        reply: String,
        calls: Mutex<Vec<Vec<String>>>,
    }

    impl StubResponder {
        fn new(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<Vec<String>> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Responder for StubResponder {
        fn name(&self) -> &str {
            "stub"
        }

        async fn respond(&self, history: &[Message]) -> String {
            self.calls
                .lock()
                .unwrap()
                .push(history.iter().map(|m| m.content.clone()).collect());
            self.reply.clone()
        }
    }

    fn scripted(t: &Transition) -> &MessageDraft {
        match &t.reply {
            Reply::Scripted(draft) => draft,
            Reply::Delegate => panic!("expected a scripted reply"),
        }
    }

    fn ada() -> PersonalDetails {
        PersonalDetails {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: "555-0100".to_string(),
            date_of_birth: "1815-12-10".to_string(),
        }
    }

    fn recurring() -> SelectionState {
        SelectionState {
            membership_type: Some(MembershipType::Recurring),
            ..Default::default()
        }
    }

    #[test]
    fn greeting_offers_openers() {
        let draft = greeting();
        assert_eq!(draft.content(), GREETING);
        assert_eq!(
            draft.step(),
            Some(&Step::Choices {
                choices: vec![Choice::WorkOut, Choice::NeedAssistance]
            })
        );
    }

    #[test]
    fn work_out_offers_membership_types_without_state_change() {
        let state = SelectionState::default();
        let t = transition(&state, &Action::choose(Choice::WorkOut));
        assert_eq!(t.user_message.content(), "I'd like to work out");
        assert_eq!(t.user_message.sender(), Sender::User);
        let reply = scripted(&t);
        assert_eq!(reply.content(), WORK_OUT_REPLY);
        assert_eq!(reply.step(), Some(&Step::MembershipTypes));
        assert_eq!(t.state, state);
    }

    #[test]
    fn need_assistance_offers_four_topics() {
        let t = transition(&SelectionState::default(), &Action::choose(Choice::NeedAssistance));
        let reply = scripted(&t);
        let Some(Step::Choices { choices }) = reply.step() else {
            panic!("expected choices");
        };
        let labels: Vec<_> = choices.iter().map(|c| c.label()).collect();
        assert_eq!(
            labels,
            vec!["Membership questions", "Facility information", "Class schedule", "Contact us"]
        );
    }

    #[test]
    fn unscripted_choices_delegate() {
        for choice in Choice::ASSISTANCE_TOPICS
            .into_iter()
            .chain(Choice::FAQ_FOLLOW_UPS)
        {
            let t = transition(&SelectionState::default(), &Action::choose(choice));
            assert_eq!(t.reply, Reply::Delegate, "{choice:?}");
            assert_eq!(t.user_message.content(), choice.label());
        }
    }

    #[test]
    fn typed_text_delegates_even_when_it_matches_a_label() {
        let t = transition(&SelectionState::default(), &Action::text("I'd like to work out"));
        assert_eq!(t.reply, Reply::Delegate);
    }

    #[test]
    fn membership_type_pick_records_category() {
        let t = transition(
            &SelectionState::default(),
            &Action::pick_membership_type(MembershipType::Recurring),
        );
        assert_eq!(t.user_message.content(), "I want a recurring membership");
        assert_eq!(t.state.membership_type, Some(MembershipType::Recurring));
        assert_eq!(scripted(&t).step(), Some(&Step::Plans));

        let t = transition(
            &SelectionState::default(),
            &Action::pick_membership_type(MembershipType::DayPass),
        );
        assert_eq!(t.user_message.content(), "I'd like a day pass");
        assert_eq!(t.state.membership_type, Some(MembershipType::DayPass));
        assert_eq!(scripted(&t).content(), DAY_PASS_REPLY);
        assert_eq!(scripted(&t).step(), Some(&Step::DayPasses));
    }

    #[test]
    fn premium_after_recurring_mentions_membership() {
        let t = transition(&recurring(), &Action::pick_plan(Plan::Premium));
        assert_eq!(t.user_message.content(), "I'm interested in the Premium");
        let reply = scripted(&t);
        assert!(reply.content().contains("Premium"));
        assert!(reply.content().contains("membership"));
        assert!(!reply.content().contains("day pass"));
        assert_eq!(reply.step(), Some(&Step::DetailsForm));
        assert_eq!(t.state.plan, Some(Plan::Premium));
    }

    #[test]
    fn day_pass_plus_mentions_day_pass() {
        let state = SelectionState {
            membership_type: Some(MembershipType::DayPass),
            ..Default::default()
        };
        let t = transition(&state, &Action::pick_plan(Plan::DayPassPlus));
        assert_eq!(
            scripted(&t).content(),
            "Excellent choice! To proceed with your Day Pass Plus day pass, please fill in your personal details:"
        );
    }

    #[test]
    fn submission_thanks_by_first_name_and_scopes_faqs_to_plan() {
        let state = SelectionState {
            plan: Some(Plan::Ultimate),
            ..recurring()
        };
        let t = transition(&state, &Action::submit_details(ada()));
        assert_eq!(t.user_message.content(), "I've submitted my personal details.");
        let reply = scripted(&t);
        assert_eq!(
            reply.content(),
            "Thank you, Ada! Your membership request has been received. Here are some frequently asked questions about your selection:"
        );
        assert_eq!(
            reply.step(),
            Some(&Step::Faqs {
                membership: Plan::Ultimate
            })
        );
        assert_eq!(t.state.details, Some(ada()));
    }

    #[test]
    fn submission_without_plan_scopes_faqs_to_day_pass() {
        let t = transition(&SelectionState::default(), &Action::submit_details(ada()));
        let reply = scripted(&t);
        assert!(reply.content().contains("Ada"));
        assert!(reply.content().contains("day pass"));
        assert_eq!(
            reply.step(),
            Some(&Step::Faqs {
                membership: Plan::DayPass
            })
        );
    }

    #[test]
    fn every_faq_answer_is_returned_verbatim() {
        for category in FaqCategory::ALL {
            for faq in faqs(category) {
                let t = transition(&SelectionState::default(), &Action::pick_faq(faq.question));
                assert_eq!(t.user_message.content(), faq.question);
                let reply = scripted(&t);
                assert_eq!(reply.content().as_bytes(), faq.answer.as_bytes());
                assert_eq!(
                    reply.step(),
                    Some(&Step::Choices {
                        choices: Choice::FAQ_FOLLOW_UPS.to_vec()
                    })
                );
            }
        }
    }

    #[test]
    fn unknown_faq_question_delegates() {
        let t = transition(&SelectionState::default(), &Action::pick_faq("Is there a pool?"));
        assert_eq!(t.reply, Reply::Delegate);
    }

    #[test]
    fn scripted_transitions_are_deterministic() {
        let actions = [
            Action::choose(Choice::WorkOut),
            Action::choose(Choice::NeedAssistance),
            Action::pick_membership_type(MembershipType::DayPass),
            Action::pick_plan(Plan::Comfort),
            Action::submit_details(ada()),
            Action::pick_faq("Do Premium members get guest passes?"),
        ];
        let state = recurring();
        for action in &actions {
            assert_eq!(transition(&state, action), transition(&state, action));
        }
    }

    #[test]
    fn action_json_shape() {
        let json = serde_json::to_value(Action::pick_plan(Plan::DayPassPlus)).unwrap();
        assert_eq!(json, serde_json::json!({"type": "pick_plan", "plan": "Day Pass Plus"}));

        let parsed: Action = serde_json::from_value(serde_json::json!({
            "type": "pick_membership_type",
            "membership_type": "day-pass"
        }))
        .unwrap();
        assert_eq!(parsed, Action::pick_membership_type(MembershipType::DayPass));

        let parsed: Action =
            serde_json::from_value(serde_json::json!({"type": "choose", "choice": "work_out"}))
                .unwrap();
        assert_eq!(parsed, Action::choose(Choice::WorkOut));
    }

    #[tokio::test]
    async fn advance_scripted_appends_two_without_responder() {
        let responder = StubResponder::new("unused");
        let mut log = MessageLog::new();
        log.append(greeting());

        let (messages, state) = advance(
            &mut log,
            &SelectionState::default(),
            &Action::choose(Choice::WorkOut),
            &responder,
        )
        .await;

        assert_eq!(log.len(), 3);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].id, 2);
        assert_eq!(messages[0].sender, Sender::User);
        assert_eq!(messages[1].id, 3);
        assert_eq!(messages[1].sender, Sender::Assistant);
        assert_eq!(state, SelectionState::default());
        assert!(responder.calls().is_empty());
    }

    #[tokio::test]
    async fn advance_delegates_with_full_history() {
        let responder = StubResponder::new("We open at 6am.");
        let mut log = MessageLog::new();
        log.append(greeting());

        let (messages, _) = advance(
            &mut log,
            &SelectionState::default(),
            &Action::text("When do you open?"),
            &responder,
        )
        .await;

        assert_eq!(messages[1].content, "We open at 6am.");
        assert_eq!(messages[1].step, None);
        assert_eq!(
            responder.calls(),
            vec![vec![GREETING.to_string(), "When do you open?".to_string()]]
        );
    }

    #[tokio::test]
    async fn advance_passes_fallback_through_verbatim() {
        let responder = StubResponder::new(FALLBACK_REPLY);
        let mut log = MessageLog::new();

        let (messages, _) = advance(
            &mut log,
            &SelectionState::default(),
            &Action::choose(Choice::ContactUs),
            &responder,
        )
        .await;

        assert_eq!(messages[0].content, "Contact us");
        assert_eq!(messages[1].content, FALLBACK_REPLY);
    }

    #[test]
    fn open_turn_leaves_delegated_turns_awaiting() {
        let mut log = MessageLog::new();
        log.append(greeting());

        let t = transition(&SelectionState::default(), &Action::choose(Choice::WorkOut));
        assert_eq!(
            open_turn(&mut log, t.user_message, t.reply),
            TurnStatus::Answered { turn: 2 }
        );
        assert_eq!(log.len(), 3);

        let t = transition(&SelectionState::default(), &Action::text("Parking?"));
        assert_eq!(
            open_turn(&mut log, t.user_message, t.reply),
            TurnStatus::Awaiting { turn: 4 }
        );
        assert_eq!(log.last().unwrap().sender, Sender::User);

        let closed = close_turn(&mut log, 4, "Yes, free parking.");
        let ids: Vec<_> = closed.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![4, 5]);
        assert_eq!(closed[1].sender, Sender::Assistant);
        assert_eq!(turn_messages(&log, 2).len(), 4);
    }
}
