use crate::error::{Result, ThumbnailError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Variation counts offered to the user.
pub const VARIATION_OPTIONS: [u32; 3] = [1, 2, 3];

pub const MISSING_TITLE: &str = "Please enter a video title.";
pub const MISSING_REFERENCES: &str = "Please upload at least one headshot image.";
pub const INVALID_VARIATION_COUNT: &str = "Please choose between 1 and 3 thumbnails.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "16:9")]
    Widescreen,
    #[serde(rename = "4:3")]
    Standard,
    #[serde(rename = "1:1")]
    Square,
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 3] = [
        AspectRatio::Widescreen,
        AspectRatio::Standard,
        AspectRatio::Square,
    ];

    pub fn token(&self) -> &'static str {
        match self {
            AspectRatio::Widescreen => "16:9",
            AspectRatio::Standard => "4:3",
            AspectRatio::Square => "1:1",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AspectRatio::Widescreen => "Widescreen",
            AspectRatio::Standard => "Standard",
            AspectRatio::Square => "Square",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for AspectRatio {
    type Err = ThumbnailError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|ratio| ratio.token() == s.trim() || ratio.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ThumbnailError::Validation(format!("Unsupported aspect ratio '{}'", s)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ThumbnailStyle {
    #[default]
    Vibrant,
    Minimalist,
    Cinematic,
    Cartoonish,
}

impl ThumbnailStyle {
    pub const ALL: [ThumbnailStyle; 4] = [
        ThumbnailStyle::Vibrant,
        ThumbnailStyle::Minimalist,
        ThumbnailStyle::Cinematic,
        ThumbnailStyle::Cartoonish,
    ];

    pub fn token(&self) -> &'static str {
        match self {
            ThumbnailStyle::Vibrant => "Vibrant",
            ThumbnailStyle::Minimalist => "Minimalist",
            ThumbnailStyle::Cinematic => "Cinematic",
            ThumbnailStyle::Cartoonish => "Cartoonish",
        }
    }

    pub fn label(&self) -> &'static str {
        self.token()
    }
}

impl fmt::Display for ThumbnailStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for ThumbnailStyle {
    type Err = ThumbnailError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|style| style.token().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ThumbnailError::Validation(format!("Unsupported style '{}'", s)))
    }
}

/// User choices for one generate action. Built fresh from UI state each time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationParameters {
    pub title: String,
    pub aspect_ratio: AspectRatio,
    pub style: ThumbnailStyle,
    pub variation_count: u32,
}

impl Default for GenerationParameters {
    fn default() -> Self {
        GenerationParameters {
            title: String::new(),
            aspect_ratio: AspectRatio::default(),
            style: ThumbnailStyle::default(),
            variation_count: VARIATION_OPTIONS[0],
        }
    }
}

impl GenerationParameters {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_aspect_ratio(mut self, aspect_ratio: AspectRatio) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    pub fn with_style(mut self, style: ThumbnailStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_variation_count(mut self, count: u32) -> Self {
        self.variation_count = count;
        self
    }

    pub fn has_title(&self) -> bool {
        !self.title.trim().is_empty()
    }

    pub fn validate_title(&self) -> Result<()> {
        if !self.has_title() {
            return Err(ThumbnailError::Validation(MISSING_TITLE.into()));
        }
        Ok(())
    }

    pub fn validate_variation_count(&self) -> Result<()> {
        if !VARIATION_OPTIONS.contains(&self.variation_count) {
            return Err(ThumbnailError::Validation(INVALID_VARIATION_COUNT.into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aspect_ratio_tokens() {
        assert_eq!("16:9".parse::<AspectRatio>().unwrap(), AspectRatio::Widescreen);
        assert_eq!("square".parse::<AspectRatio>().unwrap(), AspectRatio::Square);
        assert_eq!(AspectRatio::Standard.to_string(), "4:3");
        assert!("21:9".parse::<AspectRatio>().is_err());
    }

    #[test]
    fn test_style_tokens() {
        assert_eq!("cinematic".parse::<ThumbnailStyle>().unwrap(), ThumbnailStyle::Cinematic);
        assert_eq!(ThumbnailStyle::default().to_string(), "Vibrant");
        assert!("Noir".parse::<ThumbnailStyle>().is_err());
    }

    #[test]
    fn test_serde_uses_tokens() {
        let params = GenerationParameters::new("Trip").with_aspect_ratio(AspectRatio::Square);
        let value = serde_json::to_value(&params).unwrap();
        assert_eq!(value["aspect_ratio"], "1:1");
        assert_eq!(value["style"], "Vibrant");
    }

    #[test]
    fn test_title_validation_trims() {
        assert!(GenerationParameters::new("   ").validate_title().is_err());
        assert!(GenerationParameters::new(" ok ").validate_title().is_ok());
    }

    #[test]
    fn test_variation_count_bounds() {
        let params = GenerationParameters::new("t");
        assert!(params.clone().with_variation_count(0).validate_variation_count().is_err());
        assert!(params.clone().with_variation_count(4).validate_variation_count().is_err());
        for count in VARIATION_OPTIONS {
            assert!(params.clone().with_variation_count(count).validate_variation_count().is_ok());
        }
    }
}
