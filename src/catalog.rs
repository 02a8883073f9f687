//! Flow step catalog: plan cards, membership types, and FAQs.
//!
//! Pure reference data consumed by the renderers and the transition engine.
//! Loaded once on first use and never mutated.

use std::sync::LazyLock;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::conversation::state::{MembershipType, Plan};
use crate::error::CatalogError;

/// How often a plan is billed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Billing {
    Monthly,
    OneDay,
}

/// Card shown by the membership-type chooser.
#[derive(Debug, Clone, Serialize)]
pub struct MembershipTypeCard {
    pub membership_type: MembershipType,
    pub title: &'static str,
    pub description: &'static str,
    pub perks: [&'static str; 3],
    pub button: &'static str,
}

/// Card shown by the plan and day-pass choosers.
#[derive(Debug, Clone, Serialize)]
pub struct PlanCard {
    pub plan: Plan,
    pub title: &'static str,
    pub tagline: &'static str,
    pub price: Decimal,
    pub billing: Billing,
    pub features: [&'static str; 3],
    pub button: &'static str,
}

impl PlanCard {
    /// Price as shown on the card, e.g. `$49.99/mo` or `$19.99`.
    pub fn price_label(&self) -> String {
        match self.billing {
            Billing::Monthly => format!("${}/mo", self.price),
            Billing::OneDay => format!("${}", self.price),
        }
    }
}

/// A question/answer pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Faq {
    pub question: &'static str,
    pub answer: &'static str,
}

/// FAQ groups, keyed by membership name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FaqCategory {
    Comfort,
    Premium,
    Ultimate,
    #[serde(rename = "Day Pass")]
    DayPass,
}

impl FaqCategory {
    pub const ALL: [FaqCategory; 4] = [
        FaqCategory::Comfort,
        FaqCategory::Premium,
        FaqCategory::Ultimate,
        FaqCategory::DayPass,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Comfort => "Comfort",
            Self::Premium => "Premium",
            Self::Ultimate => "Ultimate",
            Self::DayPass => "Day Pass",
        }
    }

    /// Resolve a membership name to its FAQ group.
    pub fn from_name(name: &str) -> Result<FaqCategory, CatalogError> {
        Self::ALL
            .into_iter()
            .find(|c| c.name() == name)
            .ok_or_else(|| CatalogError::UnknownMembership(name.to_string()))
    }
}

static MEMBERSHIP_TYPES: [MembershipTypeCard; 2] = [
    MembershipTypeCard {
        membership_type: MembershipType::Recurring,
        title: "Recurring Membership",
        description: "Join our community with a monthly or annual membership",
        perks: ["Flexible membership options", "Cancel anytime", "Member-only perks"],
        button: "Select Recurring",
    },
    MembershipTypeCard {
        membership_type: MembershipType::DayPass,
        title: "Day Pass",
        description: "Try our facilities with a single-day access pass",
        perks: ["No commitment", "Full facility access", "Perfect for visitors"],
        button: "Select Day Pass",
    },
];

static PLANS: LazyLock<[PlanCard; 5]> = LazyLock::new(|| {
    [
        PlanCard {
            plan: Plan::Comfort,
            title: "Comfort",
            tagline: "Basic gym access with essential amenities",
            price: dec!(29.99),
            billing: Billing::Monthly,
            features: ["Gym floor access", "Cardio equipment", "Basic weights"],
            button: "Select Comfort",
        },
        PlanCard {
            plan: Plan::Premium,
            title: "Premium",
            tagline: "Enhanced experience with added benefits",
            price: dec!(49.99),
            billing: Billing::Monthly,
            features: ["All Comfort features", "Unlimited classes", "Sauna & steam room"],
            button: "Select Premium",
        },
        PlanCard {
            plan: Plan::Ultimate,
            title: "Ultimate",
            tagline: "Complete luxury fitness experience",
            price: dec!(79.99),
            billing: Billing::Monthly,
            features: ["All Premium features", "1 PT session monthly", "24/7 access"],
            button: "Select Ultimate",
        },
        PlanCard {
            plan: Plan::DayPass,
            title: "Standard Day Pass",
            tagline: "Full access for one day",
            price: dec!(19.99),
            billing: Billing::OneDay,
            features: ["Gym floor access", "Cardio equipment", "Locker room"],
            button: "Select Standard",
        },
        PlanCard {
            plan: Plan::DayPassPlus,
            title: "Day Pass Plus",
            tagline: "Premium day access with extras",
            price: dec!(29.99),
            billing: Billing::OneDay,
            features: ["All standard features", "One fitness class", "Sauna & steam room"],
            button: "Select Plus",
        },
    ]
});

static COMFORT_FAQS: [Faq; 3] = [
    Faq {
        question: "What facilities are included in Comfort?",
        answer: "Comfort membership includes access to the gym floor, cardio equipment, and basic weights. Group classes are available at an additional fee.",
    },
    Faq {
        question: "What are the opening hours for Comfort members?",
        answer: "Comfort members can access the gym from 6am to 10pm on weekdays, and 8am to 8pm on weekends.",
    },
    Faq {
        question: "Can I freeze my Comfort membership?",
        answer: "Yes, you can freeze your Comfort membership for up to 1 month per year at no additional cost.",
    },
];

static PREMIUM_FAQS: [Faq; 3] = [
    Faq {
        question: "What additional benefits do Premium members get?",
        answer: "Premium members get everything in Comfort plus unlimited group classes, towel service, and access to the sauna and steam room.",
    },
    Faq {
        question: "Is there a limit on how many classes I can attend?",
        answer: "No, Premium members can attend unlimited classes, subject to availability.",
    },
    Faq {
        question: "Do Premium members get guest passes?",
        answer: "Yes, Premium members receive 2 guest passes per month.",
    },
];

static ULTIMATE_FAQS: [Faq; 3] = [
    Faq {
        question: "What makes Ultimate membership special?",
        answer: "Ultimate members get all Premium benefits plus 1 personal training session per month, priority booking for classes, and 24/7 gym access.",
    },
    Faq {
        question: "How do I book my personal training session?",
        answer: "You can book your monthly personal training session through our app or at the reception desk.",
    },
    Faq {
        question: "Can I use Ultimate membership at other locations?",
        answer: "Yes, Ultimate membership includes access to all our locations nationwide.",
    },
];

static DAY_PASS_FAQS: [Faq; 3] = [
    Faq {
        question: "What's included in the Day Pass?",
        answer: "The Day Pass gives you full access to the gym floor, cardio equipment, weights, and locker rooms for one day.",
    },
    Faq {
        question: "Can I attend classes with a Day Pass?",
        answer: "Classes are not included in the standard Day Pass, but you can purchase a Day Pass Plus which includes one class.",
    },
    Faq {
        question: "What are the hours for Day Pass users?",
        answer: "Day Pass users can access the gym from 8am to 8pm, seven days a week.",
    },
];

/// Both membership-type cards, recurring first.
pub fn membership_types() -> &'static [MembershipTypeCard] {
    &MEMBERSHIP_TYPES
}

/// The three recurring plans.
pub fn recurring_plans() -> &'static [PlanCard] {
    &PLANS[..3]
}

/// The two day-pass tiers.
pub fn day_passes() -> &'static [PlanCard] {
    &PLANS[3..]
}

/// Plans offered for a membership type.
pub fn plans_for(membership_type: MembershipType) -> &'static [PlanCard] {
    match membership_type {
        MembershipType::Recurring => recurring_plans(),
        MembershipType::DayPass => day_passes(),
    }
}

/// FAQs for a category.
pub fn faqs(category: FaqCategory) -> &'static [Faq] {
    match category {
        FaqCategory::Comfort => &COMFORT_FAQS,
        FaqCategory::Premium => &PREMIUM_FAQS,
        FaqCategory::Ultimate => &ULTIMATE_FAQS,
        FaqCategory::DayPass => &DAY_PASS_FAQS,
    }
}

/// FAQs by membership name. Only the four category names resolve.
pub fn faqs_by_name(name: &str) -> Result<&'static [Faq], CatalogError> {
    FaqCategory::from_name(name).map(faqs)
}

/// Find a stored FAQ by its exact question text.
pub fn find_faq(question: &str) -> Option<&'static Faq> {
    FaqCategory::ALL
        .into_iter()
        .flat_map(|c| faqs(c).iter())
        .find(|faq| faq.question == question)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn every_category_has_three_faqs() {
        for category in FaqCategory::ALL {
            assert_eq!(faqs(category).len(), 3, "{}", category.name());
            assert_eq!(faqs_by_name(category.name()).unwrap().len(), 3);
        }
    }

    #[test]
    fn unknown_membership_name_is_an_error() {
        assert_eq!(
            faqs_by_name("Day Pass Plus").unwrap_err(),
            CatalogError::UnknownMembership("Day Pass Plus".to_string())
        );
        assert!(faqs_by_name("premium").is_err());
    }

    #[test]
    fn questions_are_unique_across_categories() {
        let mut seen = HashSet::new();
        for category in FaqCategory::ALL {
            for faq in faqs(category) {
                assert!(seen.insert(faq.question), "duplicate: {}", faq.question);
            }
        }
    }

    #[test]
    fn find_faq_returns_stored_answer() {
        let faq = find_faq("Is there a limit on how many classes I can attend?").unwrap();
        assert_eq!(
            faq.answer,
            "No, Premium members can attend unlimited classes, subject to availability."
        );
        assert!(find_faq("Do you have a pool?").is_none());
    }

    #[test]
    fn plan_groups_match_membership_type() {
        for card in recurring_plans() {
            assert_eq!(card.plan.membership_type(), MembershipType::Recurring);
        }
        for card in day_passes() {
            assert_eq!(card.plan.membership_type(), MembershipType::DayPass);
        }
        assert_eq!(plans_for(MembershipType::DayPass).len(), 2);
        assert_eq!(plans_for(MembershipType::Recurring).len(), 3);
    }

    fn card(plan: Plan) -> &'static PlanCard {
        plans_for(plan.membership_type())
            .iter()
            .find(|c| c.plan == plan)
            .unwrap()
    }

    #[test]
    fn every_plan_has_one_card() {
        let plans: Vec<_> = PLANS.iter().map(|c| c.plan).collect();
        assert_eq!(
            plans,
            vec![Plan::Comfort, Plan::Premium, Plan::Ultimate, Plan::DayPass, Plan::DayPassPlus]
        );
        for plan in plans {
            assert_eq!(card(plan).plan, plan);
        }
    }

    #[test]
    fn price_labels() {
        assert_eq!(card(Plan::Premium).price_label(), "$49.99/mo");
        assert_eq!(card(Plan::DayPass).price_label(), "$19.99");
        assert_eq!(card(Plan::DayPassPlus).price, dec!(29.99));
    }

    #[test]
    fn membership_types_cover_both_kinds() {
        let kinds: Vec<_> = membership_types().iter().map(|c| c.membership_type).collect();
        assert_eq!(kinds, vec![MembershipType::Recurring, MembershipType::DayPass]);
    }
}
