use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub price_cents: i64,
    pub old_price_cents: Option<i64>,
    pub image_url: String,
    pub is_active: bool,
    pub is_featured: bool,

    // JSON array of strings
    #[sea_orm(column_type = "Text")]
    pub tags: String,

    pub created_at: i64,
    pub updated_at: i64,
}

impl Model {
    /// Decode the stored tag list, treating malformed JSON as no tags
    pub fn tag_list(&self) -> Vec<String> {
        serde_json::from_str(&self.tags).unwrap_or_default()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
