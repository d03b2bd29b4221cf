use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Board {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BoardList {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Label {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Colorless labels come back as `null`.
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Card {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub due: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct NewLabelRequest<'a> {
    pub name: &'a str,
    pub color: &'a str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewCardRequest {
    #[serde(rename = "idList")]
    pub id_list: String,
    pub name: String,
    pub due: String,
    #[serde(rename = "idLabels")]
    pub id_labels: Vec<String>,
    pub pos: String,
}

/// Partial card update; only the fields that are set are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdateCardRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pos: Option<u32>,
}

impl UpdateCardRequest {
    pub fn due(due: impl Into<String>) -> Self {
        Self {
            due: Some(due.into()),
            ..Self::default()
        }
    }

    pub fn pos(pos: u32) -> Self {
        Self {
            pos: Some(pos),
            ..Self::default()
        }
    }
}
