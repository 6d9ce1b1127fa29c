use anyhow::{Context, Result};

/// Multiplier to expand hex color shorthand (e.g., F -> FF)
const HEX_SHORTHAND_MULTIPLIER: u8 = 17;

/// RGB color represented as [R, G, B] with values 0-255
pub type Color = [u8; 3];

/// Parse a hex color string into RGB
/// Supports: "#ff0000", "ff0000", "#f00", "f00"
pub fn parse_hex_color(hex: &str) -> Result<Color> {
  let hex = hex.trim_start_matches('#');

  let (r, g, b) = match hex.len() {
    3 => {
      // Expand shorthand: "f00" -> "ff0000"
      let r = u8::from_str_radix(&hex[0..1], 16).context("Invalid red component")?;
      let g = u8::from_str_radix(&hex[1..2], 16).context("Invalid green component")?;
      let b = u8::from_str_radix(&hex[2..3], 16).context("Invalid blue component")?;
      (
        r * HEX_SHORTHAND_MULTIPLIER,
        g * HEX_SHORTHAND_MULTIPLIER,
        b * HEX_SHORTHAND_MULTIPLIER,
      )
    }
    6 => {
      // Full hex color
      let r = u8::from_str_radix(&hex[0..2], 16).context("Invalid red component")?;
      let g = u8::from_str_radix(&hex[2..4], 16).context("Invalid green component")?;
      let b = u8::from_str_radix(&hex[4..6], 16).context("Invalid blue component")?;
      (r, g, b)
    }
    _ => anyhow::bail!("Hex color must be 3 or 6 characters long (got: {})", hex),
  };

  Ok([r, g, b])
}

/// Format an RGB color as an uppercase "#RRGGBB" string
pub fn format_hex_color(color: Color) -> String {
  format!("#{:02X}{:02X}{:02X}", color[0], color[1], color[2])
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_full_hex() {
    assert_eq!(parse_hex_color("#3d3634").unwrap(), [0x3d, 0x36, 0x34]);
    assert_eq!(parse_hex_color("FF8000").unwrap(), [255, 128, 0]);
  }

  #[test]
  fn expands_shorthand_hex() {
    assert_eq!(parse_hex_color("#f00").unwrap(), [255, 0, 0]);
    assert_eq!(parse_hex_color("abc").unwrap(), [0xaa, 0xbb, 0xcc]);
  }

  #[test]
  fn rejects_invalid_hex() {
    assert!(parse_hex_color("#12345").is_err());
    assert!(parse_hex_color("zzzzzz").is_err());
    assert!(parse_hex_color("").is_err());
  }

  #[test]
  fn formats_uppercase_with_padding() {
    assert_eq!(format_hex_color([255, 128, 0]), "#FF8000");
    assert_eq!(format_hex_color([0, 10, 255]), "#000AFF");
  }

  #[test]
  fn format_round_trips_parse() {
    let color = [0x12, 0xab, 0xef];
    assert_eq!(parse_hex_color(&format_hex_color(color)).unwrap(), color);
  }
}
