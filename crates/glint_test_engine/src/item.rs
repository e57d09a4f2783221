//! Submitted UI items as seen by the test engine

use glint_platform::Rect;
use rustc_hash::FxHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Stable identity of an item, derived from its full path
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub u64);

impl ItemId {
    pub fn from_path<S: AsRef<str>>(path: &[S]) -> Self {
        let mut hasher = FxHasher::default();
        for segment in path {
            segment.as_ref().hash(&mut hasher);
        }
        path.len().hash(&mut hasher);
        ItemId(hasher.finish())
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:016x}", self.0)
    }
}

/// What kind of widget an item is
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Window,
    Menu,
    MenuItem,
    CollapsingHeader,
    TreeNode,
    Button,
    Text,
}

impl ItemKind {
    /// Items with an open/closed state
    pub fn is_openable(self) -> bool {
        matches!(
            self,
            ItemKind::Menu | ItemKind::CollapsingHeader | ItemKind::TreeNode
        )
    }
}

/// One item submitted during the last frame
#[derive(Clone, Debug, PartialEq)]
pub struct ItemInfo {
    pub id: ItemId,
    /// Window name first, then every id scope down to the item's own label
    pub path: Vec<String>,
    pub kind: ItemKind,
    /// Open state for openable items
    pub open: Option<bool>,
    /// Checked state for toggle menu items
    pub checked: Option<bool>,
    /// Screen rect in surface pixels
    pub rect: Rect,
}

impl ItemInfo {
    pub fn label(&self) -> &str {
        self.path.last().map(String::as_str).unwrap_or_default()
    }

    /// Name of the window the item was submitted in
    pub fn window(&self) -> &str {
        self.path.first().map(String::as_str).unwrap_or_default()
    }

    /// Whether `ancestor` is a strict prefix of this item's path
    pub fn is_descendant_of(&self, ancestor: &[String]) -> bool {
        self.path.len() > ancestor.len() && self.path.starts_with(ancestor)
    }

    /// Path joined with `/`, slashes inside segments escaped
    pub fn display_path(&self) -> String {
        crate::path::join_segments(&self.path)
    }
}

/// Interactions the engine injects into the UI
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ItemAction {
    Click,
    Open,
    Close,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_depends_on_segment_boundaries() {
        let a = ItemId::from_path(&["ab", "c"]);
        let b = ItemId::from_path(&["a", "bc"]);
        assert_ne!(a, b);
        assert_eq!(a, ItemId::from_path(&["ab".to_string(), "c".to_string()]));
    }

    #[test]
    fn test_descendants() {
        let item = ItemInfo {
            id: ItemId::from_path(&["Win", "Basic", "Inner"]),
            path: vec!["Win".into(), "Basic".into(), "Inner".into()],
            kind: ItemKind::TreeNode,
            open: Some(false),
            checked: None,
            rect: Rect::default(),
        };
        assert!(item.is_descendant_of(&["Win".to_string(), "Basic".to_string()]));
        assert!(!item.is_descendant_of(&item.path));
        assert_eq!(item.label(), "Inner");
        assert_eq!(item.window(), "Win");
    }
}
