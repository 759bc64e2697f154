use std::fmt;
use std::str::FromStr;

/// Surface color format handed to the engine at pipeline creation.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PixelFormat {
    Bgra8Unorm,
    Bgra8UnormSrgb,
    Rgba8Unorm,
    Rgba8UnormSrgb,
    Rgba16Float,
    Rgb10a2Unorm,
    /// Platform format without a named variant, identified by its raw value.
    Other(u32),
}

impl PixelFormat {
    /// Short name as accepted by [`FromStr`].
    pub fn short_name(self) -> &'static str {
        match self {
            Self::Bgra8Unorm => "BGRA8",
            Self::Bgra8UnormSrgb => "BGRA8_SRGB",
            Self::Rgba8Unorm => "RGBA8",
            Self::Rgba8UnormSrgb => "RGBA8_SRGB",
            Self::Rgba16Float => "RGBA16F",
            Self::Rgb10a2Unorm => "RGB10A2",
            Self::Other(_) => "OTHER",
        }
    }

    /// True for 8-bit-per-channel formats.
    pub fn is_8bit(self) -> bool {
        matches!(
            self,
            Self::Bgra8Unorm | Self::Bgra8UnormSrgb | Self::Rgba8Unorm | Self::Rgba8UnormSrgb
        )
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Other(raw) => write!(f, "OTHER({raw})"),
            named => f.write_str(named.short_name()),
        }
    }
}

/// Unrecognised pixel format name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsePixelFormatError(pub String);

impl fmt::Display for ParsePixelFormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown pixel format: {:?}", self.0)
    }
}

impl std::error::Error for ParsePixelFormatError {}

impl FromStr for PixelFormat {
    type Err = ParsePixelFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        let format = match normalized.as_str() {
            "BGRA8" | "BGRA8UNORM" => Self::Bgra8Unorm,
            "BGRA8_SRGB" | "BGRA8UNORM_SRGB" => Self::Bgra8UnormSrgb,
            "RGBA8" | "RGBA8UNORM" => Self::Rgba8Unorm,
            "RGBA8_SRGB" | "RGBA8UNORM_SRGB" => Self::Rgba8UnormSrgb,
            "RGBA16F" | "RGBA16FLOAT" => Self::Rgba16Float,
            "RGB10A2" | "RGB10A2UNORM" => Self::Rgb10a2Unorm,
            _ => return Err(ParsePixelFormatError(s.to_string())),
        };
        Ok(format)
    }
}
