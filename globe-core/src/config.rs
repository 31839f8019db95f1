//! Viewer configuration.
//!
//! Every section falls back to its defaults, so a host only needs to supply
//! the fields it wants to change:
//!
//! ```json
//! { "sphere": { "latitude_bands": 64 }, "texture": { "url": "/moon.jpeg" } }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{GlobeError, Result};
use crate::geometry::MAX_BANDS;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasSettings {
    pub width: u32,
    pub height: u32,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SphereSettings {
    pub radius: f32,
    pub latitude_bands: u32,
    pub longitude_bands: u32,
}

impl Default for SphereSettings {
    fn default() -> Self {
        Self {
            radius: 1.0,
            latitude_bands: 30,
            longitude_bands: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureSettings {
    pub url: String,
    /// Texel shown until the image has been decoded
    pub placeholder_rgba: [u8; 4],
}

impl Default for TextureSettings {
    fn default() -> Self {
        Self {
            url: "/earth.jpeg".to_string(),
            placeholder_rgba: [0, 0, 0, 255],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Distance from the viewer to the globe center
    pub distance: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            fov_y_degrees: 45.0,
            near: 0.1,
            far: 100.0,
            distance: 4.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionSettings {
    /// Radians of rotation per unit of pointer travel
    pub rotate_sensitivity: f32,
    pub zoom_out_factor: f32,
    pub zoom_in_factor: f32,
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self {
            rotate_sensitivity: 0.01,
            zoom_out_factor: 1.1,
            zoom_in_factor: 0.9,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub canvas: CanvasSettings,
    pub sphere: SphereSettings,
    pub texture: TextureSettings,
    pub camera: CameraSettings,
    pub interaction: InteractionSettings,
    pub clear_color: ClearColor,
}

/// RGBA clear color in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClearColor(pub [f32; 4]);

impl Default for ClearColor {
    fn default() -> Self {
        Self([0.0, 0.0, 0.0, 1.0])
    }
}

impl ViewerConfig {
    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| GlobeError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| GlobeError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(GlobeError::Config(format!(
                "canvas must be non-empty, got {}x{}",
                self.canvas.width, self.canvas.height
            )));
        }
        if self.sphere.radius <= 0.0 {
            return Err(GlobeError::Config(format!(
                "sphere radius must be positive, got {}",
                self.sphere.radius
            )));
        }
        if self.sphere.latitude_bands > MAX_BANDS || self.sphere.longitude_bands > MAX_BANDS {
            return Err(GlobeError::Config(format!(
                "sphere bands must be at most {}, got {}x{}",
                MAX_BANDS, self.sphere.latitude_bands, self.sphere.longitude_bands
            )));
        }

        let camera = &self.camera;
        if camera.near <= 0.0 || camera.near >= camera.far {
            return Err(GlobeError::Config(format!(
                "clip planes must satisfy 0 < near < far, got near={} far={}",
                camera.near, camera.far
            )));
        }
        if camera.fov_y_degrees <= 0.0 || camera.fov_y_degrees >= 180.0 {
            return Err(GlobeError::Config(format!(
                "vertical field of view must be within (0, 180) degrees, got {}",
                camera.fov_y_degrees
            )));
        }

        let interaction = &self.interaction;
        if interaction.rotate_sensitivity <= 0.0 {
            return Err(GlobeError::Config(
                "rotate_sensitivity must be positive".to_string(),
            ));
        }
        if interaction.zoom_out_factor <= 0.0 || interaction.zoom_in_factor <= 0.0 {
            return Err(GlobeError::Config(
                "zoom factors must be positive".to_string(),
            ));
        }

        Ok(())
    }
}
