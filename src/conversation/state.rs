//! Selection state: what the user has picked so far in one conversation.

use serde::{Deserialize, Serialize};

use crate::catalog::FaqCategory;

/// Recurring membership or single-day access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MembershipType {
    Recurring,
    DayPass,
}

impl MembershipType {
    /// Noun used when talking about the purchase ("membership" / "day pass").
    pub fn noun(self) -> &'static str {
        match self {
            Self::Recurring => "membership",
            Self::DayPass => "day pass",
        }
    }
}

impl std::fmt::Display for MembershipType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Recurring => write!(f, "recurring"),
            Self::DayPass => write!(f, "day-pass"),
        }
    }
}

/// A purchasable plan. Serialized by display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Plan {
    Comfort,
    Premium,
    Ultimate,
    #[serde(rename = "Day Pass")]
    DayPass,
    #[serde(rename = "Day Pass Plus")]
    DayPassPlus,
}

impl Plan {
    pub fn name(self) -> &'static str {
        match self {
            Self::Comfort => "Comfort",
            Self::Premium => "Premium",
            Self::Ultimate => "Ultimate",
            Self::DayPass => "Day Pass",
            Self::DayPassPlus => "Day Pass Plus",
        }
    }

    /// Which kind of membership this plan belongs to.
    pub fn membership_type(self) -> MembershipType {
        match self {
            Self::Comfort | Self::Premium | Self::Ultimate => MembershipType::Recurring,
            Self::DayPass | Self::DayPassPlus => MembershipType::DayPass,
        }
    }

    /// FAQ group shown after sign-up. Day Pass Plus shares the Day Pass FAQs.
    pub fn faq_category(self) -> FaqCategory {
        match self {
            Self::Comfort => FaqCategory::Comfort,
            Self::Premium => FaqCategory::Premium,
            Self::Ultimate => FaqCategory::Ultimate,
            Self::DayPass | Self::DayPassPlus => FaqCategory::DayPass,
        }
    }
}

impl std::fmt::Display for Plan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One field of the personal-details form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailField {
    FirstName,
    LastName,
    Email,
    Phone,
    DateOfBirth,
}

impl DetailField {
    pub const ALL: [DetailField; 5] = [
        DetailField::FirstName,
        DetailField::LastName,
        DetailField::Email,
        DetailField::Phone,
        DetailField::DateOfBirth,
    ];

    /// Form label.
    pub fn label(self) -> &'static str {
        match self {
            Self::FirstName => "First Name",
            Self::LastName => "Last Name",
            Self::Email => "Email",
            Self::Phone => "Phone Number",
            Self::DateOfBirth => "Date of Birth",
        }
    }
}

impl std::fmt::Display for DetailField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::DateOfBirth => "date_of_birth",
        };
        write!(f, "{s}")
    }
}

/// Personal details, edited one field at a time while the form is open.
///
/// Values are kept exactly as typed. The only rule is that every field is
/// required, and that is checked by whoever submits the form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalDetails {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub date_of_birth: String,
}

impl PersonalDetails {
    pub fn get(&self, field: DetailField) -> &str {
        match field {
            DetailField::FirstName => &self.first_name,
            DetailField::LastName => &self.last_name,
            DetailField::Email => &self.email,
            DetailField::Phone => &self.phone,
            DetailField::DateOfBirth => &self.date_of_birth,
        }
    }

    pub fn set(&mut self, field: DetailField, value: impl Into<String>) {
        let slot = match field {
            DetailField::FirstName => &mut self.first_name,
            DetailField::LastName => &mut self.last_name,
            DetailField::Email => &mut self.email,
            DetailField::Phone => &mut self.phone,
            DetailField::DateOfBirth => &mut self.date_of_birth,
        };
        *slot = value.into();
    }

    /// Fields that are still empty (whitespace counts as empty).
    pub fn missing_fields(&self) -> Vec<DetailField> {
        DetailField::ALL
            .into_iter()
            .filter(|f| self.get(*f).trim().is_empty())
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

/// Everything the user has chosen so far.
///
/// Threaded explicitly through every transition: the engine takes the
/// current value and hands back the next one. Fields are only ever set,
/// never cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub membership_type: Option<MembershipType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<Plan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<PersonalDetails>,
}

impl SelectionState {
    /// "membership" for recurring sign-ups, "day pass" otherwise
    /// (including when no category was picked).
    pub fn purchase_noun(&self) -> &'static str {
        match self.membership_type {
            Some(MembershipType::Recurring) => MembershipType::Recurring.noun(),
            _ => MembershipType::DayPass.noun(),
        }
    }

    /// Plan the FAQs are scoped to; Day Pass if nothing was picked.
    pub fn faq_plan(&self) -> Plan {
        self.plan.unwrap_or(Plan::DayPass)
    }
}
