use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::animation::{AnimationLoop, DEFAULT_HUE_STEP, DEFAULT_TICK_PERIOD};
use crate::interaction::DRAG_THRESHOLD_PX;
use crate::session::{Canvas, ParameterSet, SessionConfig};

// ---------------------------------------------------------------------------
// Application preferences
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    /// Side length of each square canvas in pixels.
    #[serde(default = "default_canvas_size")]
    pub canvas_size: u32,
    #[serde(default = "default_tick_period_ms")]
    pub tick_period_ms: u64,
    /// Degrees of hue per animation tick.
    #[serde(default = "default_hue_step")]
    pub hue_step: u32,
    #[serde(default = "default_drag_threshold")]
    pub drag_threshold_px: f64,
    #[serde(default)]
    pub animate_mandelbrot: bool,
    #[serde(default)]
    pub animate_julia: bool,
    /// Parameters in effect when the app last closed.
    #[serde(default)]
    pub last_parameters: Option<ParameterSet>,
}

fn default_canvas_size() -> u32 {
    400
}
fn default_tick_period_ms() -> u64 {
    DEFAULT_TICK_PERIOD.as_millis() as u64
}
fn default_hue_step() -> u32 {
    DEFAULT_HUE_STEP
}
fn default_drag_threshold() -> f64 {
    DRAG_THRESHOLD_PX
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            canvas_size: default_canvas_size(),
            tick_period_ms: default_tick_period_ms(),
            hue_step: default_hue_step(),
            drag_threshold_px: default_drag_threshold(),
            animate_mandelbrot: false,
            animate_julia: false,
            last_parameters: None,
        }
    }
}

impl Preferences {
    /// Load preferences from next to the executable, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&crate::app_dir::preferences_path())
    }

    /// Persist preferences next to the executable.
    pub fn save(&self) {
        self.save_to(&crate::app_dir::preferences_path());
    }

    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            debug!("No preferences file at {}", path.display());
            return Self::default();
        }
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str::<Preferences>(&json) {
                Ok(prefs) => {
                    info!("Loaded preferences from {}", path.display());
                    return prefs.sanitized();
                }
                Err(e) => error!("Failed to parse preferences: {e}"),
            },
            Err(e) => error!("Failed to read preferences file: {e}"),
        }
        Self::default()
    }

    pub fn save_to(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                error!("Failed to create config directory: {e}");
                return;
            }
        }
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = fs::write(path, &json) {
                    error!("Failed to write preferences: {e}");
                } else {
                    debug!("Saved preferences to {}", path.display());
                }
            }
            Err(e) => error!("Failed to serialize preferences: {e}"),
        }
    }

    /// Replace out-of-range values with their defaults.
    fn sanitized(mut self) -> Self {
        if self.canvas_size == 0 {
            self.canvas_size = default_canvas_size();
        }
        if self.tick_period_ms == 0 {
            self.tick_period_ms = default_tick_period_ms();
        }
        if !(self.drag_threshold_px.is_finite() && self.drag_threshold_px >= 0.0) {
            self.drag_threshold_px = default_drag_threshold();
        }
        if let Some(params) = self.last_parameters {
            if let Err(e) = params.validate() {
                error!("Discarding saved parameters: {e}");
                self.last_parameters = None;
            }
        }
        self
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            width: self.canvas_size,
            height: self.canvas_size,
            drag_threshold: self.drag_threshold_px,
        }
    }

    /// A stopped animation loop with this configuration's period, step and
    /// per-canvas flags.
    pub fn animation_loop(&self) -> AnimationLoop {
        let mut animation =
            AnimationLoop::new(Duration::from_millis(self.tick_period_ms), self.hue_step);
        animation.set_enabled(Canvas::Mandelbrot, self.animate_mandelbrot);
        animation.set_enabled(Canvas::Julia, self.animate_julia);
        animation
    }

    /// Starting parameters: the last session's, or the defaults.
    pub fn initial_parameters(&self) -> ParameterSet {
        self.last_parameters.unwrap_or_default()
    }
}
