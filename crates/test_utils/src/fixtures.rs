//! Pre-built Test Fixtures
//!
//! Ready-to-use test data. Free text is generated with `fake` so tests do
//! not accidentally depend on specific wording; dates are fixed.

use chrono::NaiveDate;
use fake::faker::address::en::StreetName;
use fake::faker::internet::en::SafeEmail;
use fake::faker::lorem::en::{Sentence, Word};
use fake::Fake;
use once_cell::sync::Lazy;

use core_kernel::UserId;
use domain_admin::{Role, UserProfile};
use domain_claims::CreateClaimRequest;
use domain_items::{ItemDetails, NewFoundItem, NewLostItem, NewShareItem};

/// Categories used by the campus front end
pub const CATEGORIES: &[&str] = &[
    "electronics",
    "clothing",
    "books",
    "keys",
    "id-cards",
    "bags",
    "accessories",
    "other",
];

/// Fixed date most fixtures report against
pub static REFERENCE_DATE: Lazy<NaiveDate> =
    Lazy::new(|| NaiveDate::from_ymd_opt(2024, 9, 16).unwrap_or_default());

/// Fixture for item report payloads
pub struct ItemFixtures;

impl ItemFixtures {
    /// Valid details with generated text
    pub fn details() -> ItemDetails {
        let noun: String = Word().fake();
        let index = (0..CATEGORIES.len()).fake::<usize>();
        ItemDetails {
            title: format!("Lost {}", noun),
            description: Some(Sentence(4..10).fake()),
            category: CATEGORIES[index].to_string(),
            location: Some(format!("{} building", StreetName().fake::<String>())),
            image_url: None,
        }
    }

    /// Valid details with a fixed title
    pub fn titled(title: &str) -> ItemDetails {
        ItemDetails {
            title: title.to_string(),
            ..Self::details()
        }
    }

    pub fn new_found_item() -> NewFoundItem {
        NewFoundItem {
            details: Self::details(),
            date_found: *REFERENCE_DATE,
        }
    }

    pub fn new_lost_item() -> NewLostItem {
        NewLostItem {
            details: Self::details(),
            date_lost: *REFERENCE_DATE,
        }
    }

    pub fn new_share_item() -> NewShareItem {
        NewShareItem {
            details: Self::details(),
            condition: Some("Lightly used".to_string()),
        }
    }
}

/// Fixture for claim payloads
pub struct ClaimFixtures;

impl ClaimFixtures {
    /// A claim with a generated message and contact
    pub fn request() -> CreateClaimRequest {
        CreateClaimRequest {
            message: Some(Sentence(6..12).fake()),
            contact_info: Some(SafeEmail().fake()),
        }
    }

    /// A message one character over the limit
    pub fn oversized_message() -> CreateClaimRequest {
        CreateClaimRequest {
            message: Some("m".repeat(1001)),
            contact_info: None,
        }
    }
}

/// Fixture for user profiles
pub struct ProfileFixtures;

impl ProfileFixtures {
    pub fn with_role(role: Role) -> UserProfile {
        let mut profile = UserProfile::new(UserId::new(), SafeEmail().fake::<String>());
        profile.role = role;
        profile
    }

    pub fn user() -> UserProfile {
        Self::with_role(Role::User)
    }

    pub fn moderator() -> UserProfile {
        Self::with_role(Role::Moderator)
    }

    pub fn admin() -> UserProfile {
        Self::with_role(Role::Admin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_generated_details_are_valid() {
        for _ in 0..20 {
            assert!(ItemFixtures::details().validate().is_ok());
        }
    }

    #[test]
    fn test_claim_fixtures() {
        assert!(ClaimFixtures::request().validate().is_ok());
        assert!(ClaimFixtures::oversized_message().validate().is_err());
    }

    #[test]
    fn test_profile_roles() {
        assert_eq!(ProfileFixtures::admin().role, Role::Admin);
        assert!(ProfileFixtures::user().email.contains('@'));
    }
}
