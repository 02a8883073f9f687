//! Conversation flow: the scripted sign-up dialogue.
//!
//! The flow walks the user from the greeting through membership type, plan,
//! and personal details to plan-specific FAQs. Every step is an assistant
//! message carrying a [`Step`] that tells the channel which widget to show.
//! Anything off-script goes to the assistant responder.

pub mod engine;
pub mod message;
pub mod routes;
pub mod session;
pub mod state;

pub use engine::{Action, GREETING, Reply, Transition, advance, transition};
pub use message::{Choice, Message, MessageDraft, MessageLog, Sender, Step};
pub use routes::{ApiState, conversation_routes};
pub use session::{Conversation, PendingTurn, Turn};
pub use state::{DetailField, MembershipType, PersonalDetails, Plan, SelectionState};
