use serde::Serialize;

/// One page of a catalog listing.
#[derive(Debug, Serialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Page<Node> {
    /// The resulting entities.
    pub nodes: Vec<Node>,
    /// Whether this page has a next page.
    pub has_next_page: bool,
    /// The total amount of entities matching the listing.
    pub total_count: u64,
}
