// Transform settings as read from a configuration file

use crate::core::color::{ColorConfiguration, ColorSpec};
use crate::core::compression::ResampleFilter;
use crate::core::constants::DEFAULT_IMAGE_FORMAT;
use crate::core::error::Result;
use crate::core::transform::{GridTransformer, ScaleTarget};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaletteConfig {
    pub occupied: Option<ColorSpec>,
    pub free: Option<ColorSpec>,
    pub unknown: Option<ColorSpec>,
}

impl PaletteConfig {
    pub fn build(&self) -> Result<ColorConfiguration> {
        ColorConfiguration::new(
            self.occupied.map(Into::into),
            self.free.map(Into::into),
            self.unknown.map(Into::into),
        )
    }
}

/// Either `resolution` or `width` + `height`; the rest is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformConfig {
    pub resolution: Option<f64>,
    pub width: Option<u32>,
    pub height: Option<u32>,

    #[serde(default = "default_format")]
    pub format: String,

    #[serde(default)]
    pub colors: PaletteConfig,

    #[serde(default)]
    pub filter: ResampleFilter,
}

fn default_format() -> String {
    DEFAULT_IMAGE_FORMAT.to_string()
}

impl TransformConfig {
    pub fn target(&self) -> Result<ScaleTarget> {
        ScaleTarget::from_parameters(self.resolution, self.width, self.height)
    }

    /// Validates every setting and returns the transformer they describe.
    pub fn build(&self) -> Result<GridTransformer> {
        let transformer = GridTransformer::new(self.target()?)
            .with_palette(self.colors.build()?)
            .with_filter(self.filter)
            .with_format(self.format.as_str())?;
        Ok(transformer)
    }
}
