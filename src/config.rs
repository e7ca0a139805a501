use bon::Builder;
use thiserror::Error;

/// Color representation for gauge elements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn as_tuple(self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }

    pub const BLACK: Color = Color::new(0x00, 0x00, 0x00);
    pub const WHITE: Color = Color::new(0xff, 0xff, 0xff);
    pub const RED: Color = Color::new(0xd0, 0x20, 0x20);
    pub const BLUE: Color = Color::new(0x20, 0x40, 0xd0);
}

/// Raised when a [`GaugeSpec`] describes a thermometer that cannot be drawn.
#[derive(Debug, Error)]
pub enum SpecError {
    #[error("axis span is not positive: min {min} >= max {max}")]
    InvalidSpan { min: f64, max: f64 },
    #[error("bar width {width} leaves no interior at outline thickness {thickness}")]
    DegenerateBar { width: f64, thickness: f64 },
    #[error("bulb diameter {diameter} leaves no interior at outline thickness {thickness}")]
    DegenerateBulb { diameter: f64, thickness: f64 },
}

/// Immutable description of a thermometer gauge.
///
/// All sizes (`bar_width`, `outline_thickness`, paddings, ...) are in data
/// units, i.e. the same units as the displayed temperature.
#[derive(Debug, Clone, Builder)]
pub struct GaugeSpec {
    /// Lowest temperature on the axis.
    #[builder(default = -273.15)]
    pub min_value: f64,
    /// Highest temperature on the axis.
    #[builder(default = 100.0)]
    pub max_value: f64,
    /// Width of the rectangular bar.
    #[builder(default = 40.0)]
    pub bar_width: f64,
    /// Diameter of the circular bulb at the bottom. Defaults to twice the
    /// bar width when not set.
    pub bulb_diameter: Option<f64>,
    /// Stroke width of the outline, consumed inward.
    #[builder(default = 3.0)]
    pub outline_thickness: f64,
    #[builder(default = Color::RED)]
    pub fill_color: Color,
    #[builder(default = Color::BLACK)]
    pub outline_color: Color,
    /// Margin around the drawable extent in the x-direction.
    #[builder(default = 5.0)]
    pub padding_x: f64,
    /// Margin around the drawable extent in the y-direction.
    #[builder(default = 8.0)]
    pub padding_y: f64,
    /// Suffix appended to the numeric label and tick labels.
    #[builder(default = "°C".to_string())]
    pub units: String,
    /// Pixel size of the reading label and tick labels.
    #[builder(default = 16.0)]
    pub label_font_size: f32,
}

impl GaugeSpec {
    /// Bulb diameter with the `2 × bar_width` fallback applied.
    pub fn bulb_diameter(&self) -> f64 {
        self.bulb_diameter.unwrap_or(2.0 * self.bar_width)
    }

    /// Check the geometric invariants. A spec that passes here always
    /// produces a non-degenerate inner region.
    pub fn validate(&self) -> Result<(), SpecError> {
        if self.max_value <= self.min_value {
            return Err(SpecError::InvalidSpan {
                min: self.min_value,
                max: self.max_value,
            });
        }
        if self.bar_width <= 2.0 * self.outline_thickness {
            return Err(SpecError::DegenerateBar {
                width: self.bar_width,
                thickness: self.outline_thickness,
            });
        }
        let bulb = self.bulb_diameter();
        if bulb <= 2.0 * self.outline_thickness {
            return Err(SpecError::DegenerateBulb {
                diameter: bulb,
                thickness: self.outline_thickness,
            });
        }
        Ok(())
    }
}

/// Configuration for the panel window
#[derive(Debug, Clone, Builder)]
pub struct WindowConfig {
    /// Width per gauge; the window is `gauge_count × gauge_width` wide.
    #[builder(default = 260)]
    pub gauge_width: usize,
    #[builder(default = 520)]
    pub window_height: usize,
    #[builder(default = 60.0)]
    pub max_framerate: f64,
    #[builder(default = Color::WHITE)]
    pub background_color: Color,
    /// Raw bytes of a TTF/OTF font for labels, ticks and titles. Text is
    /// skipped when no font is given.
    pub font_data: Option<Vec<u8>>,
    #[builder(default = 24.0)]
    pub title_font_size: f32,
    #[builder(default = 16.0)]
    pub caption_font_size: f32,
    /// Reserved band at the top of the window for the shared title.
    #[builder(default = 36)]
    pub title_band: usize,
}
