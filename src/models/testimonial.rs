use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::media::MediaUrls;

/// Star rating, one to five.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, sqlx::Type, Serialize, Deserialize)]
#[repr(i32)]
#[serde(try_from = "i32", into = "i32")]
pub enum Rating {
    One = 1,
    Two = 2,
    Three = 3,
    Four = 4,
    Five = 5,
}

impl Rating {
    pub const ALL: [Rating; 5] = [
        Rating::One,
        Rating::Two,
        Rating::Three,
        Rating::Four,
        Rating::Five,
    ];

    pub fn stars(self) -> i32 {
        self as i32
    }

    pub fn label(self) -> &'static str {
        match self {
            Rating::One => "1 - Poor",
            Rating::Two => "2 - Fair",
            Rating::Three => "3 - Good",
            Rating::Four => "4 - Very Good",
            Rating::Five => "5 - Excellent",
        }
    }
}

impl TryFrom<i32> for Rating {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Rating::ALL
            .into_iter()
            .find(|r| r.stars() == value)
            .ok_or_else(|| format!("\"{value}\" is not a valid choice."))
    }
}

impl From<Rating> for i32 {
    fn from(rating: Rating) -> Self {
        rating.stars()
    }
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Testimonial {
    pub id: Uuid,
    pub name: String,
    pub designation: String,
    pub company: String,
    pub message: String,
    #[serde(skip)]
    pub image: Option<String>,
    pub is_featured: bool,
    pub rating: Rating,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct TestimonialView {
    #[serde(flatten)]
    pub testimonial: Testimonial,
    pub image: Option<String>,
}

impl Testimonial {
    pub fn view(self, urls: &MediaUrls) -> TestimonialView {
        let image = urls.optional(self.image.as_deref());
        TestimonialView {
            testimonial: self,
            image,
        }
    }
}
