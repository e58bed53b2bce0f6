use serde::{Deserialize, Serialize};

/// Editor configuration, usually read from `pagetree.toml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig {
    #[serde(default)]
    pub drag: DragConfig,
    #[serde(default)]
    pub expansion: ExpansionConfig,
}

/// Thresholds and policies for interpreting drag gestures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragConfig {
    /// Horizontal pixels per nesting level
    #[serde(default = "default_indent_width")]
    pub indent_width: f64,
    /// Pixels the pointer must travel left before a node is un-nested
    #[serde(default = "default_outdent_threshold")]
    pub outdent_threshold: f64,
    /// Deepest depth any node may reach; no limit when absent
    #[serde(default)]
    pub max_depth: Option<usize>,
    /// Also require the projected depth to drop below the current depth
    /// before outdenting. Stops a held left drag from walking the node all
    /// the way to the root, one level per pointer event.
    #[serde(default)]
    pub outdent_requires_depth_drop: bool,
    /// Restore the tree as it was at drag start when the drag is cancelled
    #[serde(default)]
    pub revert_on_cancel: bool,
}

impl Default for DragConfig {
    fn default() -> Self {
        DragConfig {
            indent_width: default_indent_width(),
            outdent_threshold: default_outdent_threshold(),
            max_depth: None,
            outdent_requires_depth_drop: false,
            revert_on_cancel: false,
        }
    }
}

fn default_indent_width() -> f64 {
    50.0
}

fn default_outdent_threshold() -> f64 {
    50.0
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpansionConfig {
    /// Folder ids shown expanded when an editor opens
    #[serde(default)]
    pub default_expanded: Vec<String>,
}
