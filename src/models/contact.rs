use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What a contact submission is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum InquiryType {
    General,
    Volunteer,
    Partnership,
    Donation,
    Membership,
    Other,
}

impl InquiryType {
    pub const ALL: [InquiryType; 6] = [
        InquiryType::General,
        InquiryType::Volunteer,
        InquiryType::Partnership,
        InquiryType::Donation,
        InquiryType::Membership,
        InquiryType::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            InquiryType::General => "general",
            InquiryType::Volunteer => "volunteer",
            InquiryType::Partnership => "partnership",
            InquiryType::Donation => "donation",
            InquiryType::Membership => "membership",
            InquiryType::Other => "other",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            InquiryType::General => "General Inquiry",
            InquiryType::Volunteer => "Volunteer Opportunities",
            InquiryType::Partnership => "Partnership",
            InquiryType::Donation => "Donation",
            InquiryType::Membership => "Membership",
            InquiryType::Other => "Other",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == value)
    }
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Contact {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub inquiry_type: InquiryType,
    pub message: String,
    pub responded: bool,
    pub response_notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Contact {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    pub fn view(self) -> ContactView {
        ContactView {
            full_name: self.full_name(),
            inquiry_type_display: self.inquiry_type.label(),
            contact: self,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ContactView {
    #[serde(flatten)]
    pub contact: Contact,
    pub full_name: String,
    pub inquiry_type_display: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inquiry_type_parses_its_own_codes() {
        for kind in InquiryType::ALL {
            assert_eq!(InquiryType::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(InquiryType::parse("General"), None);
        assert_eq!(InquiryType::General.label(), "General Inquiry");
    }
}
