//! Canvas 2D backend

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use super::scene::{DrawCommand, HUD_FONT, Scene, colors};

/// Draws scenes onto a `<canvas>` element
pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    background: HtmlImageElement,
}

impl CanvasRenderer {
    /// Grab the 2D context and start loading the background image
    pub fn new(canvas: &HtmlCanvasElement, background_src: &str) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;

        let background = HtmlImageElement::new()?;
        background.set_src(background_src);

        Ok(Self { ctx, background })
    }

    fn background_ready(&self) -> bool {
        self.background.complete() && self.background.natural_width() > 0
    }

    /// Replay a scene, back to front
    pub fn draw(&self, scene: &Scene) {
        for command in &scene.commands {
            if let Err(e) = self.draw_command(command) {
                log::warn!("Draw failed: {:?}", e);
            }
        }
    }

    fn draw_command(&self, command: &DrawCommand) -> Result<(), JsValue> {
        match command {
            DrawCommand::Background { width, height } => {
                let (w, h) = (*width as f64, *height as f64);
                if self.background_ready() {
                    self.ctx.draw_image_with_html_image_element_and_dw_and_dh(
                        &self.background,
                        0.0,
                        0.0,
                        w,
                        h,
                    )?;
                } else {
                    self.ctx.set_fill_style_str(colors::BACKGROUND);
                    self.ctx.fill_rect(0.0, 0.0, w, h);
                }
            }
            DrawCommand::Rect { square, color } => {
                self.ctx.set_fill_style_str(color);
                self.ctx.fill_rect(
                    square.pos.x as f64,
                    square.pos.y as f64,
                    square.size as f64,
                    square.size as f64,
                );
            }
            DrawCommand::Text { text, x, y, color } => {
                self.ctx.set_fill_style_str(color);
                self.ctx.set_font(HUD_FONT);
                self.ctx.fill_text(text, *x as f64, *y as f64)?;
            }
        }
        Ok(())
    }
}
