//! Display colors for comparison groups
//!
//! Survival charts sit on a light background, so every palette entry is a
//! dark named CSS color: the sum of its RGB channels stays under 1.5, which
//! keeps a thin curve readable against white. Colors are assigned by group
//! position and cycle when a comparison has more groups than the palette.

/// A display color with channels in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    /// Renders the color as a `#rrggbb` hex string.
    #[must_use]
    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn to_hex(self) -> String {
        format!(
            "#{:02x}{:02x}{:02x}",
            (self.r * 255.0).round() as u8,
            (self.g * 255.0).round() as u8,
            (self.b * 255.0).round() as u8
        )
    }
}

const fn rgb(r: f32, g: f32, b: f32) -> Rgb {
    Rgb { r, g, b }
}

/// Dark named CSS colors, ordered so neighboring groups get distinct hues.
pub const DARK_COLORS: &[Rgb] = &[
    rgb(0.0, 0.0, 0.804),     // mediumblue
    rgb(0.698, 0.133, 0.133), // firebrick
    rgb(0.133, 0.545, 0.133), // forestgreen
    rgb(0.545, 0.0, 0.545),   // darkmagenta
    rgb(0.545, 0.271, 0.075), // saddlebrown
    rgb(0.0, 0.545, 0.545),   // darkcyan
    rgb(0.294, 0.0, 0.510),   // indigo
    rgb(0.333, 0.420, 0.184), // darkolivegreen
    rgb(0.863, 0.078, 0.235), // crimson
    rgb(0.275, 0.510, 0.706), // steelblue
    rgb(0.180, 0.545, 0.341), // seagreen
    rgb(0.502, 0.0, 0.0),     // maroon
    rgb(0.282, 0.239, 0.545), // darkslateblue
    rgb(0.502, 0.502, 0.0),   // olive
    rgb(0.412, 0.412, 0.412), // dimgray
    rgb(0.0, 0.0, 0.0),       // black
];

/// Color for the group at `index`, cycling through the palette.
#[must_use]
pub fn color_for(index: usize) -> Rgb {
    DARK_COLORS[index % DARK_COLORS.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_color_is_dark() {
        for color in DARK_COLORS {
            assert!(
                color.r + color.g + color.b < 1.5,
                "{} is too light for a white background",
                color.to_hex()
            );
        }
    }

    #[test]
    fn test_hex_rendering() {
        assert_eq!(rgb(0.0, 0.0, 0.0).to_hex(), "#000000");
        assert_eq!(rgb(0.698, 0.133, 0.133).to_hex(), "#b22222");
        assert_eq!(rgb(0.0, 0.0, 0.804).to_hex(), "#0000cd");
    }

    #[test]
    fn test_palette_cycles() {
        assert_eq!(color_for(0), color_for(DARK_COLORS.len()));
        assert_eq!(color_for(3), color_for(3 + 2 * DARK_COLORS.len()));
    }
}
