//! Graphics context selection
//!
//! Backends describe the context they want during setup with a
//! [`ContextAttributes`] value; nothing here touches a real graphics API.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Graphics API family a backend renders with
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GraphicsApi {
    /// The platform's primary modern API (Vulkan, Metal, DX12) via wgpu
    Native,
    /// Desktop OpenGL
    OpenGl,
    /// OpenGL ES / WebGL
    OpenGlEs,
    /// CPU rasterization, no GPU context
    Software,
}

/// Context profile
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContextProfile {
    Core,
    Compatibility,
    Es,
}

/// API family plus version and profile
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GraphicsVersion {
    pub api: GraphicsApi,
    pub major: u8,
    pub minor: u8,
    pub profile: ContextProfile,
}

impl GraphicsVersion {
    /// Desktop OpenGL core profile
    pub const fn gl_core(major: u8, minor: u8) -> Self {
        Self {
            api: GraphicsApi::OpenGl,
            major,
            minor,
            profile: ContextProfile::Core,
        }
    }

    /// OpenGL ES (WebGL 1 is ES 2.0, WebGL 2 is ES 3.0)
    pub const fn gles(major: u8, minor: u8) -> Self {
        Self {
            api: GraphicsApi::OpenGlEs,
            major,
            minor,
            profile: ContextProfile::Es,
        }
    }

    /// The platform's primary API; the version is chosen by the driver
    pub const fn native() -> Self {
        Self {
            api: GraphicsApi::Native,
            major: 0,
            minor: 0,
            profile: ContextProfile::Core,
        }
    }

    /// CPU rasterization
    pub const fn software() -> Self {
        Self {
            api: GraphicsApi::Software,
            major: 0,
            minor: 0,
            profile: ContextProfile::Core,
        }
    }
}

impl fmt::Display for GraphicsVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.api {
            GraphicsApi::Native => write!(f, "native"),
            GraphicsApi::Software => write!(f, "software"),
            GraphicsApi::OpenGl => {
                let profile = match self.profile {
                    ContextProfile::Compatibility => "compatibility",
                    _ => "core",
                };
                write!(f, "OpenGL {}.{} {}", self.major, self.minor, profile)
            }
            GraphicsApi::OpenGlEs => write!(f, "OpenGL ES {}.{}", self.major, self.minor),
        }
    }
}

/// Attributes the context is created with
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContextAttributes {
    pub version: GraphicsVersion,
    /// Request a forward-compatible context (required for core GL on macOS)
    pub forward_compatible: bool,
    /// Request a debug context
    pub debug: bool,
    pub double_buffer: bool,
    pub depth_bits: u8,
    pub stencil_bits: u8,
}

impl ContextAttributes {
    /// Double-buffered, 24-bit depth, 8-bit stencil
    pub const fn new(version: GraphicsVersion) -> Self {
        Self {
            version,
            forward_compatible: false,
            debug: false,
            double_buffer: true,
            depth_bits: 24,
            stencil_bits: 8,
        }
    }

    pub const fn forward_compatible(mut self, forward_compatible: bool) -> Self {
        self.forward_compatible = forward_compatible;
        self
    }

    pub const fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

/// Swap interval (vsync) requested from the backend
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwapInterval {
    /// Present as soon as possible
    Immediate,
    /// Wait for vertical blank
    #[default]
    VSync,
}

impl SwapInterval {
    /// Interval in the classic `SetSwapInterval(n)` form
    pub fn as_interval(self) -> i32 {
        match self {
            SwapInterval::Immediate => 0,
            SwapInterval::VSync => 1,
        }
    }

    /// Any non-zero interval means vsync
    pub fn from_interval(interval: i32) -> Self {
        if interval == 0 {
            SwapInterval::Immediate
        } else {
            SwapInterval::VSync
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_display() {
        assert_eq!(GraphicsVersion::gl_core(3, 3).to_string(), "OpenGL 3.3 core");
        assert_eq!(GraphicsVersion::gles(2, 0).to_string(), "OpenGL ES 2.0");
        assert_eq!(GraphicsVersion::native().to_string(), "native");
    }

    #[test]
    fn test_swap_interval_round_trip() {
        assert_eq!(SwapInterval::from_interval(0), SwapInterval::Immediate);
        assert_eq!(SwapInterval::from_interval(2), SwapInterval::VSync);
        assert_eq!(SwapInterval::VSync.as_interval(), 1);
    }

    #[test]
    fn test_attribute_defaults() {
        let attrs = ContextAttributes::new(GraphicsVersion::gl_core(3, 3)).forward_compatible(true);
        assert!(attrs.double_buffer);
        assert!(attrs.forward_compatible);
        assert!(!attrs.debug);
    }
}
