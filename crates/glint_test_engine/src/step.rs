//! Scripted step vocabulary

use crate::capture::CaptureFlags;
use std::fmt;

/// One scripted interaction
///
/// Paths are item path patterns (see [`ItemPath`](crate::ItemPath)),
/// resolved against the reference set by the last [`Step::SetRef`].
#[derive(Clone, Debug, PartialEq)]
pub enum Step {
    /// Set the reference that later relative paths resolve against
    SetRef(String),
    /// Open the menus along the path and make sure the leaf is checked
    MenuCheck(String),
    /// Open the menus along the path and make sure the leaf is unchecked
    MenuUncheck(String),
    /// Open the menus along the path and click the leaf
    MenuToggle(String),
    ItemOpen(String),
    ItemClose(String),
    /// Open an item and every openable descendant
    ItemOpenAll(String),
    ItemClick(String),
    /// Capture a window into the capture sink
    CaptureScreenshotWindow { window: String, flags: CaptureFlags },
    /// Let this many frames go by
    Yield(u32),
}

impl Step {
    pub fn set_ref(name: impl Into<String>) -> Self {
        Step::SetRef(name.into())
    }

    pub fn menu_check(path: impl Into<String>) -> Self {
        Step::MenuCheck(path.into())
    }

    pub fn menu_uncheck(path: impl Into<String>) -> Self {
        Step::MenuUncheck(path.into())
    }

    pub fn menu_toggle(path: impl Into<String>) -> Self {
        Step::MenuToggle(path.into())
    }

    pub fn item_open(path: impl Into<String>) -> Self {
        Step::ItemOpen(path.into())
    }

    pub fn item_close(path: impl Into<String>) -> Self {
        Step::ItemClose(path.into())
    }

    pub fn item_open_all(path: impl Into<String>) -> Self {
        Step::ItemOpenAll(path.into())
    }

    pub fn item_click(path: impl Into<String>) -> Self {
        Step::ItemClick(path.into())
    }

    pub fn capture_window(window: impl Into<String>, flags: CaptureFlags) -> Self {
        Step::CaptureScreenshotWindow {
            window: window.into(),
            flags,
        }
    }

    /// Whether the step waits on UI state and is therefore subject to the
    /// step timeout
    pub fn is_conditional(&self) -> bool {
        !matches!(self, Step::SetRef(_) | Step::Yield(_))
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::SetRef(name) => write!(f, "SetRef({name})"),
            Step::MenuCheck(path) => write!(f, "MenuCheck({path})"),
            Step::MenuUncheck(path) => write!(f, "MenuUncheck({path})"),
            Step::MenuToggle(path) => write!(f, "MenuToggle({path})"),
            Step::ItemOpen(path) => write!(f, "ItemOpen({path})"),
            Step::ItemClose(path) => write!(f, "ItemClose({path})"),
            Step::ItemOpenAll(path) => write!(f, "ItemOpenAll({path})"),
            Step::ItemClick(path) => write!(f, "ItemClick({path})"),
            Step::CaptureScreenshotWindow { window, flags } => {
                write!(f, "CaptureScreenshotWindow({window}, {flags:?})")
            }
            Step::Yield(frames) => write!(f, "Yield({frames})"),
        }
    }
}
