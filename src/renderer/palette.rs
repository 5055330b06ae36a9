//! Color ramps for the render pass.
//!
//! Gradient descriptors are declared once per portal and realized into
//! canvas gradients only when the portal centers move (resize), never per
//! draw call.

/// A 3-stop radial gradient descriptor
#[derive(Debug, Clone, Copy)]
pub struct GradientSpec {
    pub stops: [(f32, &'static str); 3],
}

/// Everything the render pass needs to paint one portal
#[derive(Debug, Clone, Copy)]
pub struct PortalPalette {
    /// Main ellipse fill
    pub fill: GradientSpec,
    /// Border stroke around the main ellipse
    pub border: &'static str,
    /// Large translucent halo behind the portal
    pub halo: &'static str,
    /// Tightly orbiting bright particles
    pub inner_particle: &'static str,
    /// Pulsing outer particles
    pub glow_particle: &'static str,
}

/// Blue entry portal
pub const ENTRY: PortalPalette = PortalPalette {
    fill: GradientSpec {
        stops: [
            (0.0, "rgba(150, 200, 255, 0.95)"),
            (0.55, "rgba(40, 110, 240, 0.55)"),
            (1.0, "rgba(10, 25, 80, 0.0)"),
        ],
    },
    border: "rgba(120, 180, 255, 0.9)",
    halo: "rgba(60, 130, 255, 0.12)",
    inner_particle: "rgba(190, 220, 255, 1.0)",
    glow_particle: "rgba(80, 150, 255, 0.35)",
};

/// Orange exit portal
pub const EXIT: PortalPalette = PortalPalette {
    fill: GradientSpec {
        stops: [
            (0.0, "rgba(255, 210, 150, 0.95)"),
            (0.55, "rgba(240, 130, 40, 0.55)"),
            (1.0, "rgba(80, 30, 10, 0.0)"),
        ],
    },
    border: "rgba(255, 180, 110, 0.9)",
    halo: "rgba(255, 140, 50, 0.12)",
    inner_particle: "rgba(255, 225, 190, 1.0)",
    glow_particle: "rgba(255, 160, 70, 0.35)",
};

/// Deep space background (rich black with a subtle blue tone)
pub const BACKGROUND: &str = "#050510";

/// Star core and halo colors; per-star alpha comes from the twinkle phase
pub const STAR_CORE: &str = "#ffffff";
pub const STAR_HALO: &str = "#c8dcff";

/// Loop-counter overlay
pub const HUD_TEXT: &str = "#e0e6ff";
pub const HUD_FONT: &str = "20px monospace";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gradient_stops_are_ordered() {
        for palette in [ENTRY, EXIT] {
            let offsets: Vec<f32> = palette.fill.stops.iter().map(|(o, _)| *o).collect();
            assert_eq!(offsets.first(), Some(&0.0));
            assert_eq!(offsets.last(), Some(&1.0));
            assert!(offsets.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn test_edges_fade_to_transparent() {
        for palette in [ENTRY, EXIT] {
            let (_, edge) = palette.fill.stops[2];
            assert!(edge.ends_with("0.0)"));
        }
    }
}
