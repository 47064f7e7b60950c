use serde::{Deserialize, Serialize};

/// A toolbox entry advertised by `/tools/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tool {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub entry: Option<ToolEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolEntry {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub view: Option<String>,
}

impl Tool {
    /// The client view this tool opens, if it declares one.
    pub fn view(&self) -> Option<&str> {
        self.entry
            .as_ref()
            .and_then(|entry| entry.view.as_deref())
            .filter(|view| !view.is_empty())
    }
}
