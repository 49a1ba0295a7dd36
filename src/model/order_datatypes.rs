use serde::{Deserialize, Serialize};

/// Order direction of catalog listings.
#[derive(Debug, Serialize, Deserialize, Copy, Clone, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum OrderDirection {
    /// Ascending order direction.
    Asc,
    /// Descending order direction.
    Desc,
}

impl Default for OrderDirection {
    fn default() -> Self {
        Self::Asc
    }
}

/// Implements conversion to `i32` for MongoDB document sorting.
impl From<OrderDirection> for i32 {
    fn from(value: OrderDirection) -> Self {
        match value {
            OrderDirection::Asc => 1,
            OrderDirection::Desc => -1,
        }
    }
}

/// Describes the fields that a videogame listing can be ordered by.
#[derive(Debug, Serialize, Deserialize, Copy, Clone, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum VideogameOrderField {
    /// Orders by "id".
    Id,
    /// Orders by "name".
    Name,
    /// Orders by "price".
    Price,
}

impl VideogameOrderField {
    pub fn as_str(&self) -> &'static str {
        match self {
            VideogameOrderField::Id => "id",
            VideogameOrderField::Name => "name",
            VideogameOrderField::Price => "price",
        }
    }
}

impl Default for VideogameOrderField {
    fn default() -> Self {
        Self::Id
    }
}

/// Specifies the order of videogame listings.
#[derive(Debug, Copy, Clone)]
pub struct CatalogOrder {
    /// Order direction of videogames.
    pub direction: Option<OrderDirection>,
    /// Field that videogames should be ordered by.
    pub field: Option<VideogameOrderField>,
}

impl Default for CatalogOrder {
    fn default() -> Self {
        Self {
            direction: Some(Default::default()),
            field: Some(Default::default()),
        }
    }
}
