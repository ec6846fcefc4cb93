use serde::{Deserialize, Serialize};

/// Lifecycle bindings. Every entry names a command id of the document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Events {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pre_start: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub post_start: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pre_stop: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub post_stop: Vec<String>,
}

impl Events {
    pub fn is_empty(&self) -> bool {
        self.lists().iter().all(|(_, ids)| ids.is_empty())
    }

    /// The four lists paired with their wire names.
    pub fn lists(&self) -> [(&'static str, &Vec<String>); 4] {
        [
            ("preStart", &self.pre_start),
            ("postStart", &self.post_start),
            ("preStop", &self.pre_stop),
            ("postStop", &self.post_stop),
        ]
    }

    pub fn lists_mut(&mut self) -> [(&'static str, &mut Vec<String>); 4] {
        [
            ("preStart", &mut self.pre_start),
            ("postStart", &mut self.post_start),
            ("preStop", &mut self.pre_stop),
            ("postStop", &mut self.post_stop),
        ]
    }
}
