//! Canvas lookup and WebGL2 presentation
//!
//! Rects are filled with scissored clears, which needs no shader program.

use glint_platform::{DrawCommand, DrawList, PlatformError, Rect, Result};
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, WebGl2RenderingContext as Gl};

const CURSOR_SIZE: f32 = 8.0;
const CURSOR_COLOR: [u8; 4] = [255, 255, 255, 255];

/// The `<canvas>` with the given element id
pub fn find_canvas(id: &str) -> Result<HtmlCanvasElement> {
    let window = web_sys::window()
        .ok_or_else(|| PlatformError::InitFailed("no global window".to_string()))?;
    let document = window
        .document()
        .ok_or_else(|| PlatformError::InitFailed("no document".to_string()))?;
    document
        .get_element_by_id(id)
        .ok_or_else(|| PlatformError::WindowCreation(format!("canvas '#{}' not found", id)))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| PlatformError::WindowCreation(format!("'#{}' is not a canvas", id)))
}

pub fn webgl2_context(canvas: &HtmlCanvasElement) -> Result<Gl> {
    canvas
        .get_context("webgl2")
        .map_err(|e| PlatformError::ContextCreation(format!("{:?}", e)))?
        .ok_or_else(|| PlatformError::ContextCreation("WebGL2 is not available".to_string()))?
        .dyn_into::<Gl>()
        .map_err(|_| PlatformError::ContextCreation("unexpected context type".to_string()))
}

fn normalize(color: [u8; 4]) -> [f32; 4] {
    color.map(|c| c as f32 / 255.0)
}

/// GL scissor box (origin bottom-left) for `rect` on a `height` tall surface,
/// clamped to the surface
pub fn scissor_box(rect: Rect, width: u32, height: u32) -> Option<[i32; 4]> {
    let clipped = rect.intersect(&Rect::new(0.0, 0.0, width as f32, height as f32));
    if clipped.is_empty() {
        return None;
    }
    let x = clipped.x.floor() as i32;
    let top = clipped.y.floor() as i32;
    let w = (clipped.right().ceil() as i32 - x).max(1);
    let h = (clipped.bottom().ceil() as i32 - top).max(1);
    Some([x, height as i32 - top - h, w, h])
}

/// Present one frame
pub fn paint(gl: &Gl, list: &DrawList, width: u32, height: u32) {
    gl.viewport(0, 0, width as i32, height as i32);
    gl.disable(Gl::SCISSOR_TEST);
    let [r, g, b, a] = normalize(list.clear_color);
    gl.clear_color(r, g, b, a);
    gl.clear(Gl::COLOR_BUFFER_BIT);

    gl.enable(Gl::SCISSOR_TEST);
    for command in &list.commands {
        let (rect, color) = match command {
            DrawCommand::Rect { rect, color } => (*rect, *color),
            DrawCommand::Cursor { x, y } => {
                (Rect::new(*x, *y, CURSOR_SIZE, CURSOR_SIZE), CURSOR_COLOR)
            }
        };
        if color[3] == 0 {
            continue;
        }
        let Some([x, y, w, h]) = scissor_box(rect, width, height) else {
            continue;
        };
        let [r, g, b, a] = normalize(color);
        gl.scissor(x, y, w, h);
        gl.clear_color(r, g, b, a);
        gl.clear(Gl::COLOR_BUFFER_BIT);
    }
    gl.disable(Gl::SCISSOR_TEST);
}
