//! Image generation parameters passed as custom request fields

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Provider-specific request fields merged verbatim into the completion body
pub type CustomFields = Map<String, Value>;

/// Size of the generated image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageSize {
    #[serde(rename = "1024x1024")]
    Square,
    #[serde(rename = "1024x1792")]
    HeightRectangle,
    #[serde(rename = "1792x1024")]
    WidthRectangle,
}

impl ImageSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSize::Square => "1024x1024",
            ImageSize::HeightRectangle => "1024x1792",
            ImageSize::WidthRectangle => "1792x1024",
        }
    }
}

/// Quality of the generated image; `hd` gives finer detail and consistency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageQuality {
    Standard,
    Hd,
}

impl ImageQuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageQuality::Standard => "standard",
            ImageQuality::Hd => "hd",
        }
    }
}

/// Style of the generated image
///
/// `Vivid` leans towards hyper-real, dramatic images; `Natural` produces
/// more natural, less hyper-real ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageStyle {
    Natural,
    Vivid,
}

impl ImageStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageStyle::Natural => "natural",
            ImageStyle::Vivid => "vivid",
        }
    }
}

/// Optional text-to-image parameters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImageOptions {
    pub size: Option<ImageSize>,
    pub quality: Option<ImageQuality>,
    pub style: Option<ImageStyle>,
}

impl ImageOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_size(mut self, size: ImageSize) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_quality(mut self, quality: ImageQuality) -> Self {
        self.quality = Some(quality);
        self
    }

    pub fn with_style(mut self, style: ImageStyle) -> Self {
        self.style = Some(style);
        self
    }

    /// Convert to custom fields; unset options are left out
    pub fn into_custom_fields(self) -> CustomFields {
        let mut fields = CustomFields::new();
        if let Some(size) = self.size {
            fields.insert("size".to_string(), Value::from(size.as_str()));
        }
        if let Some(quality) = self.quality {
            fields.insert("quality".to_string(), Value::from(quality.as_str()));
        }
        if let Some(style) = self.style {
            fields.insert("style".to_string(), Value::from(style.as_str()));
        }
        fields
    }
}

impl From<ImageOptions> for CustomFields {
    fn from(options: ImageOptions) -> Self {
        options.into_custom_fields()
    }
}
