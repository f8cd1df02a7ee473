//! Test Data Builders
//!
//! Builders for the payloads tests construct most often. Each starts from a
//! valid generated value so a test only spells out the fields it cares
//! about.

use chrono::NaiveDate;

use core_kernel::UserId;
use domain_admin::{Role, UserProfile};
use domain_claims::CreateClaimRequest;
use domain_items::{ItemDetails, NewFoundItem, NewLostItem, NewShareItem};

use crate::fixtures::{ItemFixtures, REFERENCE_DATE};

/// Builder for item report payloads of any kind
#[derive(Debug, Clone)]
pub struct ItemReportBuilder {
    details: ItemDetails,
    date: NaiveDate,
    condition: Option<String>,
}

impl Default for ItemReportBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ItemReportBuilder {
    pub fn new() -> Self {
        Self {
            details: ItemFixtures::details(),
            date: *REFERENCE_DATE,
            condition: None,
        }
    }

    /// Replaces every descriptive field at once
    pub fn with_details(mut self, details: ItemDetails) -> Self {
        self.details = details;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.details.title = title.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.details.description = Some(description.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.details.category = category.into();
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.details.location = Some(location.into());
        self
    }

    /// Sets the found/lost date
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    pub fn found(self) -> NewFoundItem {
        NewFoundItem {
            details: self.details,
            date_found: self.date,
        }
    }

    pub fn lost(self) -> NewLostItem {
        NewLostItem {
            details: self.details,
            date_lost: self.date,
        }
    }

    pub fn share(self) -> NewShareItem {
        NewShareItem {
            details: self.details,
            condition: self.condition,
        }
    }
}

/// Builder for claim requests
#[derive(Debug, Clone, Default)]
pub struct ClaimRequestBuilder {
    message: Option<String>,
    contact_info: Option<String>,
}

impl ClaimRequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_contact(mut self, contact: impl Into<String>) -> Self {
        self.contact_info = Some(contact.into());
        self
    }

    pub fn build(self) -> CreateClaimRequest {
        CreateClaimRequest {
            message: self.message,
            contact_info: self.contact_info,
        }
    }
}

/// Builder for user profiles
#[derive(Debug, Clone)]
pub struct ProfileBuilder {
    profile: UserProfile,
}

impl Default for ProfileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileBuilder {
    pub fn new() -> Self {
        Self {
            profile: crate::ProfileFixtures::user(),
        }
    }

    pub fn with_id(mut self, id: UserId) -> Self {
        self.profile.id = id;
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.profile.email = email.into();
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.profile.name = name.into();
        self
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.profile.role = role;
        self
    }

    pub fn verified(mut self) -> Self {
        self.profile.is_verified = true;
        self
    }

    pub fn build(self) -> UserProfile {
        self.profile
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_builder_overrides() {
        let found = ItemReportBuilder::new()
            .with_title("Blue umbrella")
            .with_category("accessories")
            .found();

        assert_eq!(found.details.title, "Blue umbrella");
        assert_eq!(found.details.category, "accessories");
        assert_eq!(found.date_found, *REFERENCE_DATE);
    }

    #[test]
    fn test_share_builder_keeps_condition() {
        let share = ItemReportBuilder::new().with_condition("new").share();
        assert_eq!(share.condition.as_deref(), Some("new"));
    }

    #[test]
    fn test_profile_builder() {
        let profile = ProfileBuilder::new()
            .with_name("Dana")
            .with_role(Role::Moderator)
            .verified()
            .build();

        assert_eq!(profile.name, "Dana");
        assert_eq!(profile.role, Role::Moderator);
        assert!(profile.is_verified);
    }
}
