use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Partner {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct PartnerView {
    #[serde(flatten)]
    pub partner: Partner,
    pub projects: Vec<Uuid>,
}
