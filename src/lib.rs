pub mod basis;
pub mod config;
pub mod dsp;
pub mod error;
pub mod linalg;
pub mod supersede;

use crate::basis::{BasisEngine, BasisEvent};
use crate::config::ExplorerConfig;
use crate::dsp::sampling::{SamplingEngine, SamplingEvent};
use crate::dsp::signum::{SignumEngine, SignumEvent};
use crate::linalg::Vec2;
use wasm_bindgen::prelude::*;

/// The crate version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// WASM-exposed: return the mathviz-core version string.
#[wasm_bindgen]
pub fn core_version() -> String {
    VERSION.to_string()
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&format!("{e}")))
}

/// Parse a JSON config, falling back to defaults when none is given.
fn load_config(json: Option<String>) -> Result<ExplorerConfig, JsValue> {
    match json {
        Some(source) => ExplorerConfig::from_json_str(&source)
            .map_err(|e| JsValue::from_str(&e.render_report(&source))),
        None => Ok(ExplorerConfig::default()),
    }
}

/// WASM-exposed: validate a JSON config. Returns the rendered diagnostic on failure.
#[wasm_bindgen]
pub fn validate_config(json: &str) -> Result<(), JsValue> {
    ExplorerConfig::from_json_str(json)
        .map(|_| ())
        .map_err(|e| JsValue::from_str(&e.render_report(json)))
}

// ── Basis explorer ──────────────────────────────────────────

/// WASM-exposed handle on a [`BasisEngine`].
#[wasm_bindgen]
pub struct BasisExplorer {
    engine: BasisEngine,
}

#[wasm_bindgen]
impl BasisExplorer {
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<BasisExplorer, JsValue> {
        let config = load_config(config_json)?;
        Ok(BasisExplorer {
            engine: BasisEngine::new(config.basis),
        })
    }

    pub fn set_e1(&mut self, x: f64, y: f64) {
        self.engine.set_e1(Vec2::new(x, y));
    }

    pub fn set_e2(&mut self, x: f64, y: f64) {
        self.engine.set_e2(Vec2::new(x, y));
    }

    pub fn set_probe(&mut self, x: f64, y: f64) {
        self.engine.set_probe(Vec2::new(x, y));
    }

    pub fn reset(&mut self) {
        self.engine.reset();
    }

    /// Apply a control event object such as `{ type: "component", vector: "e1", axis: "x", value: 1.2 }`.
    pub fn apply(&mut self, event: JsValue) -> Result<(), JsValue> {
        let event: BasisEvent =
            serde_wasm_bindgen::from_value(event).map_err(|e| JsValue::from_str(&format!("{e}")))?;
        self.engine.apply(event);
        Ok(())
    }

    pub fn invertible(&self) -> bool {
        self.engine.state().invertible
    }

    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        to_js(self.engine.state())
    }
}

// ── Sampling demo ───────────────────────────────────────────

/// WASM-exposed handle on a [`SamplingEngine`].
#[wasm_bindgen]
pub struct SamplingExplorer {
    engine: SamplingEngine,
}

#[wasm_bindgen]
impl SamplingExplorer {
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<SamplingExplorer, JsValue> {
        let config = load_config(config_json)?;
        Ok(SamplingExplorer {
            engine: SamplingEngine::new(config.sampling),
        })
    }

    pub fn set_pointer_x(&mut self, x: f64) {
        self.engine.apply(SamplingEvent::PointerMoved { x });
    }

    pub fn set_canvas_size(&mut self, width: f64, height: f64) {
        self.engine.apply(SamplingEvent::CanvasResized { width, height });
    }

    pub fn sampling_frequency(&self) -> f64 {
        self.engine.derived().sampling_frequency
    }

    pub fn is_aliasing(&self) -> bool {
        self.engine.derived().is_aliasing
    }

    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        to_js(&self.engine.snapshot())
    }
}

// ── Signum approximation ────────────────────────────────────

/// WASM-exposed handle on a [`SignumEngine`].
#[wasm_bindgen]
pub struct SignumExplorer {
    engine: SignumEngine,
}

#[wasm_bindgen]
impl SignumExplorer {
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<SignumExplorer, JsValue> {
        let config = load_config(config_json)?;
        Ok(SignumExplorer {
            engine: SignumEngine::new(config.signum),
        })
    }

    /// Slider input; snapped to the configured alpha range.
    pub fn set_alpha(&mut self, value: f64) {
        self.engine.apply(SignumEvent::Alpha { value });
    }

    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        to_js(self.engine.state())
    }
}
