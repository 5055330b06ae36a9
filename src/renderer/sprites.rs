//! Sprite image handles.
//!
//! Images load asynchronously out-of-band; the render pass only performs a
//! same-thread readiness check per frame. "Still loading" and "failed to
//! load" are indistinguishable on purpose - both skip the blit, and gameplay
//! is unaffected because hitboxes are geometry-based.

use wasm_bindgen::JsValue;
use web_sys::HtmlImageElement;

const PLAYER_SPRITE: &str = "assets/player.png";
const ENEMY_SPRITE: &str = "assets/enemy.png";

/// The drawable handles the render pass blits from once loaded
pub struct SpriteSet {
    pub player: HtmlImageElement,
    pub enemy: HtmlImageElement,
}

impl SpriteSet {
    /// Kick off the loads; readiness is polled at draw time
    pub fn load() -> Result<Self, JsValue> {
        Ok(Self {
            player: start_load(PLAYER_SPRITE)?,
            enemy: start_load(ENEMY_SPRITE)?,
        })
    }
}

fn start_load(src: &str) -> Result<HtmlImageElement, JsValue> {
    let image = HtmlImageElement::new()?;
    image.set_src(src);
    Ok(image)
}

/// A handle is drawable once the decode finished with actual pixels
pub fn ready(image: &HtmlImageElement) -> bool {
    image.complete() && image.natural_width() > 0
}
