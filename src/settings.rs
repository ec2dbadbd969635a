use log::{info, warn};
use serde::{Deserialize, Serialize};

/// Start-up configuration of a [`Renderer`](crate::renderer::Renderer).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RendererSettings {
    #[serde(default = "RendererSettings::default_depth_bits")]
    pub depth_bits: u8,
    #[serde(default = "RendererSettings::default_max_lights")]
    pub max_lights: usize,
    #[serde(default = "RendererSettings::default_max_texture_layers")]
    pub max_texture_layers: usize,
    #[serde(default = "RendererSettings::default_polygon_offset_units")]
    pub polygon_offset_units: f32,
    #[serde(default)]
    pub resolution: Resolution,
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self {
            depth_bits: Self::default_depth_bits(),
            max_lights: Self::default_max_lights(),
            max_texture_layers: Self::default_max_texture_layers(),
            polygon_offset_units: Self::default_polygon_offset_units(),
            resolution: Resolution::default(),
        }
    }
}

impl RendererSettings {
    pub fn load() -> Self {
        Self::load_from_path("renderer.json")
    }

    /// Reads settings from a JSON file. A missing or unreadable file yields
    /// the defaults; out-of-range values are replaced individually.
    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Self {
        use std::fs;

        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => Self::from_json(&contents).unwrap_or_else(|err| {
                warn!(
                    "Failed to parse {:?} ({}). Falling back to default renderer settings.",
                    path, err
                );
                RendererSettings::default()
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                info!(
                    "Renderer settings file {:?} not found. Using default settings.",
                    path
                );
                RendererSettings::default()
            }
            Err(err) => {
                warn!(
                    "Failed to read {:?} ({}). Falling back to default renderer settings.",
                    path, err
                );
                RendererSettings::default()
            }
        }
    }

    pub fn from_json(contents: &str) -> serde_json::Result<Self> {
        let settings = serde_json::from_str::<RendererSettings>(contents)?;
        Ok(settings.validate())
    }

    fn validate(mut self) -> Self {
        if self.depth_bits == 0 || self.depth_bits > 32 {
            warn!(
                "Depth buffer precision of {} bits is unsupported. Using {}.",
                self.depth_bits,
                Self::default_depth_bits()
            );
            self.depth_bits = Self::default_depth_bits();
        }

        if self.max_lights == 0 {
            warn!("At least one light slot is required. Using default light count.");
            self.max_lights = Self::default_max_lights();
        }

        if self.max_texture_layers == 0 {
            warn!("At least one texture layer is required. Using default layer count.");
            self.max_texture_layers = Self::default_max_texture_layers();
        }

        if !self.polygon_offset_units.is_finite() || self.polygon_offset_units <= 0.0 {
            warn!("Polygon offset units must be positive. Using default value.");
            self.polygon_offset_units = Self::default_polygon_offset_units();
        }

        if self.resolution.width == 0 || self.resolution.height == 0 {
            warn!("Resolution must be greater than zero. Using default resolution.");
            self.resolution = Resolution::default();
        }

        self
    }

    const fn default_depth_bits() -> u8 {
        24
    }

    const fn default_max_lights() -> usize {
        8
    }

    const fn default_max_texture_layers() -> usize {
        crate::params::STANDARD_TEXTURE_LAYERS
    }

    const fn default_polygon_offset_units() -> f32 {
        1.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Default for Resolution {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}
