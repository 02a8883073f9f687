//! Text rendering of messages and their steps.

use crate::catalog::{self, PlanCard};
use crate::conversation::{Action, DetailField, MembershipType, Message, Sender, Step};

/// A selectable entry of a step, numbered from 1 when rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOption {
    pub label: String,
    pub action: Action,
}

/// Selectable options of a step. The details form has none.
pub fn options(step: &Step) -> Vec<StepOption> {
    match step {
        Step::Choices { choices } => choices
            .iter()
            .map(|c| StepOption {
                label: c.label().to_string(),
                action: Action::choose(*c),
            })
            .collect(),
        Step::MembershipTypes => catalog::membership_types()
            .iter()
            .map(|card| StepOption {
                label: card.title.to_string(),
                action: Action::pick_membership_type(card.membership_type),
            })
            .collect(),
        Step::Plans => plan_options(catalog::plans_for(MembershipType::Recurring)),
        Step::DayPasses => plan_options(catalog::plans_for(MembershipType::DayPass)),
        Step::Faqs { membership } => catalog::faqs(membership.faq_category())
            .iter()
            .map(|faq| StepOption {
                label: faq.question.to_string(),
                action: Action::pick_faq(faq.question),
            })
            .collect(),
        Step::DetailsForm => Vec::new(),
    }
}

fn plan_options(cards: &[PlanCard]) -> Vec<StepOption> {
    cards
        .iter()
        .map(|card| StepOption {
            label: format!("{} ({})", card.title, card.price_label()),
            action: Action::pick_plan(card.plan),
        })
        .collect()
}

/// Render a message and its step as terminal text.
pub fn render_message(msg: &Message) -> String {
    let who = match msg.sender {
        Sender::User => "You",
        Sender::Assistant => "Ruby",
    };
    let mut lines = vec![format!("{who}: {}", msg.content)];

    if let Some(ref step) = msg.step {
        lines.extend(render_step(step));
    }
    lines.join("\n")
}

fn render_step(step: &Step) -> Vec<String> {
    let mut lines = Vec::new();
    match step {
        Step::MembershipTypes => {
            for (i, card) in catalog::membership_types().iter().enumerate() {
                lines.push(format!("  [{}] {}", i + 1, card.title));
                lines.push(format!("      {}", card.description));
                for perk in card.perks {
                    lines.push(format!("      ✓ {perk}"));
                }
            }
        }
        Step::Plans | Step::DayPasses => {
            let cards = if *step == Step::Plans {
                catalog::plans_for(MembershipType::Recurring)
            } else {
                catalog::plans_for(MembershipType::DayPass)
            };
            for (i, card) in cards.iter().enumerate() {
                lines.push(format!("  [{}] {} — {}", i + 1, card.title, card.price_label()));
                lines.push(format!("      {}", card.tagline));
                for feature in card.features {
                    lines.push(format!("      ✓ {feature}"));
                }
            }
        }
        Step::DetailsForm => {
            let labels: Vec<_> = DetailField::ALL.iter().map(|f| f.label()).collect();
            lines.push(format!("  (form: {})", labels.join(", ")));
        }
        Step::Choices { .. } | Step::Faqs { .. } => {
            for (i, option) in options(step).iter().enumerate() {
                lines.push(format!("  [{}] {}", i + 1, option.label));
            }
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::conversation::{Choice, MembershipType, Plan};

    fn assistant(content: &str, step: Option<Step>) -> Message {
        Message {
            id: 1,
            content: content.to_string(),
            sender: Sender::Assistant,
            step,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn choice_options_map_to_choose_actions() {
        let step = Step::Choices {
            choices: Choice::OPENERS.to_vec(),
        };
        let opts = options(&step);
        assert_eq!(opts.len(), 2);
        assert_eq!(opts[0].label, "I'd like to work out");
        assert_eq!(opts[1].action, Action::choose(Choice::NeedAssistance));
    }

    #[test]
    fn membership_type_options() {
        let opts = options(&Step::MembershipTypes);
        assert_eq!(
            opts.iter().map(|o| o.action.clone()).collect::<Vec<_>>(),
            vec![
                Action::pick_membership_type(MembershipType::Recurring),
                Action::pick_membership_type(MembershipType::DayPass),
            ]
        );
    }

    #[test]
    fn plan_options_include_prices() {
        let opts = options(&Step::Plans);
        assert_eq!(opts.len(), 3);
        assert_eq!(opts[1].label, "Premium ($49.99/mo)");
        assert_eq!(opts[1].action, Action::pick_plan(Plan::Premium));

        let opts = options(&Step::DayPasses);
        assert_eq!(opts[1].action, Action::pick_plan(Plan::DayPassPlus));
    }

    #[test]
    fn faq_options_follow_plan_category() {
        let opts = options(&Step::Faqs {
            membership: Plan::DayPassPlus,
        });
        assert_eq!(opts.len(), 3);
        assert_eq!(opts[0].label, "What's included in the Day Pass?");
    }

    #[test]
    fn details_form_has_no_options() {
        assert!(options(&Step::DetailsForm).is_empty());
    }

    #[test]
    fn renders_user_message_without_step() {
        let msg = Message {
            sender: Sender::User,
            ..assistant("I want a recurring membership", None)
        };
        assert_eq!(render_message(&msg), "You: I want a recurring membership");
    }

    #[test]
    fn renders_plan_cards() {
        let text = render_message(&assistant("Pick one:", Some(Step::Plans)));
        assert!(text.starts_with("Ruby: Pick one:"));
        assert!(text.contains("[3] Ultimate — $79.99/mo"));
        assert!(text.contains("✓ Sauna & steam room"));
    }

    #[test]
    fn renders_form_fields() {
        let text = render_message(&assistant("Details please", Some(Step::DetailsForm)));
        assert!(text.contains("First Name, Last Name, Email, Phone Number, Date of Birth"));
    }
}
