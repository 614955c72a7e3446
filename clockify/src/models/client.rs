use serde::Deserialize;

/// A client (customer) registered on the workspace. Projects may belong to
/// one via their `client_id`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceClient {
    pub id: String,
    pub name: String,
}
