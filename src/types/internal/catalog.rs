/// Fields for a new catalog entry
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price_cents: i64,
    pub old_price_cents: Option<i64>,
    pub image_url: String,
    pub is_active: bool,
    pub is_featured: bool,
    pub tags: Vec<String>,
}

/// Partial product update; `None` leaves a field unchanged
///
/// `old_price_cents` is doubly optional so the old price can be cleared.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price_cents: Option<i64>,
    pub old_price_cents: Option<Option<i64>>,
    pub image_url: Option<String>,
    pub is_active: Option<bool>,
    pub is_featured: Option<bool>,
    pub tags: Option<Vec<String>>,
}

impl ProductChanges {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
