//! The per-frame render pass.
//!
//! Draw order, back to front: background, stars, entry portal, exit portal,
//! player sprite, enemy sprites, loop-counter overlay. Portal gradients are
//! realized from the static palette descriptors and cached; they are only
//! rebuilt when the surface size (and with it the portal centers) changes.

use std::f64::consts::TAU;

use glam::Vec2;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasGradient, CanvasRenderingContext2d, HtmlCanvasElement};

use super::palette::{self, GradientSpec, PortalPalette};
use super::sprites::{self, SpriteSet};
use crate::consts::*;
use crate::settings::Settings;
use crate::sim::{GameState, PortalParticle};
use crate::{entry_portal_center, exit_portal_center};

/// Render state: the 2D context, sprite handles and the cached gradients
pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    sprites: SpriteSet,
    entry_fill: CanvasGradient,
    exit_fill: CanvasGradient,
    /// Surface size the cached gradients were realized for
    built_for: (f32, f32),
}

impl CanvasRenderer {
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("no 2d context"))?
            .dyn_into()?;

        let w = canvas.width() as f32;
        let h = canvas.height() as f32;
        let entry_fill = realize(&ctx, &palette::ENTRY.fill, entry_portal_center(w, h))?;
        let exit_fill = realize(&ctx, &palette::EXIT.fill, exit_portal_center(w, h))?;

        Ok(Self {
            ctx,
            sprites: SpriteSet::load()?,
            entry_fill,
            exit_fill,
            built_for: (w, h),
        })
    }

    /// Draw one frame from the current state
    pub fn render(&mut self, state: &GameState, settings: &Settings) -> Result<(), JsValue> {
        self.refresh_gradients(state)?;

        let ctx = &self.ctx;
        let (w, h) = (state.surface_w as f64, state.surface_h as f64);

        // (1) background
        ctx.set_fill_style_str(palette::BACKGROUND);
        ctx.fill_rect(0.0, 0.0, w, h);

        // (2) stars
        self.draw_stars(state, settings)?;

        // (3) entry portal, (4) exit portal
        let entry = entry_portal_center(state.surface_w, state.surface_h);
        let exit = exit_portal_center(state.surface_w, state.surface_h);
        self.draw_portal(entry, &state.entry_particles, &palette::ENTRY, &self.entry_fill)?;
        self.draw_portal(exit, &state.exit_particles, &palette::EXIT, &self.exit_fill)?;

        // (5) player, (6) enemies - skipped until their sprite is drawable
        if sprites::ready(&self.sprites.player) {
            ctx.draw_image_with_html_image_element_and_dw_and_dh(
                &self.sprites.player,
                state.player.pos.x as f64,
                state.player.pos.y as f64,
                state.player.width as f64,
                state.player.height as f64,
            )?;
        }
        if sprites::ready(&self.sprites.enemy) {
            for enemy in &state.enemies {
                ctx.draw_image_with_html_image_element_and_dw_and_dh(
                    &self.sprites.enemy,
                    enemy.pos.x as f64,
                    enemy.pos.y as f64,
                    enemy.width as f64,
                    enemy.height as f64,
                )?;
            }
        }

        // (7) loop counter overlay
        ctx.set_fill_style_str(palette::HUD_TEXT);
        ctx.set_font(palette::HUD_FONT);
        ctx.fill_text(&format!("Loops: {}", state.loop_count()), 24.0, 36.0)?;

        Ok(())
    }

    /// Rebuild the cached portal gradients if the surface size moved under us
    fn refresh_gradients(&mut self, state: &GameState) -> Result<(), JsValue> {
        let dims = (state.surface_w, state.surface_h);
        if dims == self.built_for {
            return Ok(());
        }
        self.entry_fill = realize(
            &self.ctx,
            &palette::ENTRY.fill,
            entry_portal_center(dims.0, dims.1),
        )?;
        self.exit_fill = realize(
            &self.ctx,
            &palette::EXIT.fill,
            exit_portal_center(dims.0, dims.1),
        )?;
        self.built_for = dims;
        Ok(())
    }

    fn draw_stars(&self, state: &GameState, settings: &Settings) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let halos = settings.star_halo();

        for star in &state.stars {
            let brightness = star.brightness() as f64;

            if halos {
                ctx.set_global_alpha(brightness * 0.25);
                ctx.set_fill_style_str(palette::STAR_HALO);
                ctx.begin_path();
                ctx.arc(
                    star.pos.x as f64,
                    star.pos.y as f64,
                    star.radius as f64 * 4.0,
                    0.0,
                    TAU,
                )?;
                ctx.fill();
            }

            ctx.set_global_alpha(brightness);
            ctx.set_fill_style_str(palette::STAR_CORE);
            ctx.begin_path();
            ctx.arc(
                star.pos.x as f64,
                star.pos.y as f64,
                star.radius as f64,
                0.0,
                TAU,
            )?;
            ctx.fill();
        }

        ctx.set_global_alpha(1.0);
        Ok(())
    }

    /// One portal: halo, glow particles, gradient ellipse, border stroke,
    /// inner particles - in that order.
    fn draw_portal(
        &self,
        center: Vec2,
        particles: &[PortalParticle],
        colors: &PortalPalette,
        fill: &CanvasGradient,
    ) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let (cx, cy) = (center.x as f64, center.y as f64);
        let rx = (PORTAL_RADIUS * PORTAL_WIDTH_RATIO) as f64;
        let ry = (PORTAL_RADIUS * PORTAL_HEIGHT_RATIO) as f64;

        // Outer glow
        ctx.set_fill_style_str(colors.halo);
        ctx.begin_path();
        ctx.ellipse(cx, cy, rx * 1.8, ry * 1.4, 0.0, 0.0, TAU)?;
        ctx.fill();

        // Pulsing glow layer behind the ellipse
        ctx.set_fill_style_str(colors.glow_particle);
        for p in particles.iter().filter(|p| p.is_glow()) {
            ctx.set_global_alpha((0.7 + 0.3 * p.pulse) as f64);
            ctx.begin_path();
            ctx.arc(
                p.pos.x as f64,
                p.pos.y as f64,
                (p.size * (1.0 + 0.25 * p.pulse)) as f64,
                0.0,
                TAU,
            )?;
            ctx.fill();
        }
        ctx.set_global_alpha(1.0);

        // Main ellipse with the cached gradient fill
        ctx.set_fill_style_canvas_gradient(fill);
        ctx.begin_path();
        ctx.ellipse(cx, cy, rx, ry, 0.0, 0.0, TAU)?;
        ctx.fill();

        // Border stroke
        ctx.set_stroke_style_str(colors.border);
        ctx.set_line_width(3.0);
        ctx.begin_path();
        ctx.ellipse(cx, cy, rx, ry, 0.0, 0.0, TAU)?;
        ctx.stroke();

        // Inner particles on top, fading with depth
        ctx.set_fill_style_str(colors.inner_particle);
        for p in particles.iter().filter(|p| !p.is_glow()) {
            ctx.set_global_alpha((1.0 - 0.75 * p.z) as f64);
            ctx.begin_path();
            ctx.arc(p.pos.x as f64, p.pos.y as f64, p.size as f64, 0.0, TAU)?;
            ctx.fill();
        }
        ctx.set_global_alpha(1.0);

        Ok(())
    }
}

/// Realize a gradient descriptor as a radial gradient centered on a portal
fn realize(
    ctx: &CanvasRenderingContext2d,
    spec: &GradientSpec,
    center: Vec2,
) -> Result<CanvasGradient, JsValue> {
    let (cx, cy) = (center.x as f64, center.y as f64);
    let gradient = ctx.create_radial_gradient(
        cx,
        cy,
        0.0,
        cx,
        cy,
        (PORTAL_RADIUS * PORTAL_HEIGHT_RATIO) as f64,
    )?;
    for (offset, color) in spec.stops {
        gradient.add_color_stop(offset, color)?;
    }
    Ok(gradient)
}
