pub mod audit_event;
pub mod contact;
pub mod faq;
pub mod partner;
pub mod project;
pub mod project_image;
pub mod project_outcome;
pub mod project_phase;
pub mod refresh_token;
pub mod tag;
pub mod team_member;
pub mod testimonial;
pub mod user;

pub use audit_event::AuditEvent;
pub use contact::{Contact, ContactView, InquiryType};
pub use faq::{Faq, FaqKind};
pub use partner::{Partner, PartnerView};
pub use project::{
    CategoryChoice, Project, ProjectCategory, ProjectDetail, ProjectSummary, RelatedProject,
    TaggedProject,
};
pub use project_image::{ProjectImage, ProjectImageView};
pub use project_outcome::ProjectOutcome;
pub use project_phase::ProjectPhase;
pub use refresh_token::RefreshToken;
pub use tag::{ProjectTag, Tag};
pub use team_member::{TeamMember, TeamMemberView};
pub use testimonial::{Rating, Testimonial, TestimonialView};
pub use user::User;
