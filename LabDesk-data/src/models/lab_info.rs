use serde::{Deserialize, Serialize};

/// Lab profile as kept by the administration screens
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LabInfoRecord {
    pub name: Option<String>,
    pub slogan: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,

    /// Person signing reports
    pub signatory: Option<SignatoryRecord>,

    /// Lab director named in the report footer
    pub director: Option<String>,
}

/// Signature block details
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SignatoryRecord {
    pub name: Option<String>,
    pub credentials: Option<String>,
    pub title: Option<String>,
}
