use serde::Deserialize;

/// A workspace project. Immutable from this client's point of view.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    /// The client (customer) this project belongs to, when one is assigned.
    #[serde(default)]
    pub client_id: Option<String>,
}
