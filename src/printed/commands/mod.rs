use crate::material::Material;
use crate::model::Print;
use crate::state::Summary;

pub mod add;
pub mod helpers;
pub mod history;
pub mod links;
pub mod list;
pub mod material;
pub mod record;
pub mod remove;
pub mod update;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }
}

/// What a command did, for the caller to render.
#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected_prints: Vec<Print>,
    pub listed_prints: Vec<Print>,
    pub affected_materials: Vec<Material>,
    pub listed_materials: Vec<Material>,
    pub summary: Option<Summary>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected_print(mut self, print: Print) -> Self {
        self.affected_prints.push(print);
        self
    }

    pub fn with_listed_prints(mut self, prints: Vec<Print>) -> Self {
        self.listed_prints = prints;
        self
    }

    pub fn with_affected_material(mut self, material: Material) -> Self {
        self.affected_materials.push(material);
        self
    }

    pub fn with_listed_materials(mut self, materials: Vec<Material>) -> Self {
        self.listed_materials = materials;
        self
    }

    pub fn with_summary(mut self, summary: Summary) -> Self {
        self.summary = Some(summary);
        self
    }
}
