// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Rotables Kit Engine

pub mod types;
pub mod world;
pub mod config;
pub mod protocol;
pub mod registry;
pub mod ledger;
pub mod processing;
pub mod forecast;
pub mod engine;
pub mod allocation;
pub mod purchasing;
pub mod session;
pub mod logging;

pub use types::*;
pub use config::{ConfigError, EngineConfig, PurchaseTunables};
pub use engine::{EngineError, KitEngine};
pub use protocol::{FlightEventKind, FlightUpdate, Penalty, RoundRequest, RoundResponse};
pub use session::{run_session, RoundTransport, SessionError, SessionSummary};
pub use world::{AircraftType, Airport, WorldError, WorldReference};

use wasm_bindgen::prelude::*;

// ─── WASM Interface ──────────────────────────────────────────────────────────

/// Browser handle around a `KitEngine`. The JS side owns the round loop and
/// calls `play_tick` / `ingest_round` alternately.
#[wasm_bindgen]
pub struct WasmKitEngine {
    inner: KitEngine,
}

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[wasm_bindgen]
impl WasmKitEngine {
    #[wasm_bindgen(constructor)]
    pub fn new(world_json: &str, config_json: Option<String>) -> Result<WasmKitEngine, JsValue> {
        #[cfg(target_arch = "wasm32")]
        std::panic::set_hook(Box::new(console_error_panic_hook::hook));

        let world = WorldReference::from_json_str(world_json).map_err(js_err)?;
        let config = match config_json {
            Some(json) => EngineConfig::from_json_str(&json).map_err(js_err)?,
            None => EngineConfig::default(),
        };
        let inner = KitEngine::new(world, config).map_err(js_err)?;
        Ok(Self { inner })
    }

    /// Decide one tick; returns the `RoundRequest` body to submit.
    pub fn play_tick(&mut self, day: u32, hour: u32) -> JsValue {
        let tick = Tick::new(day, hour);
        let decision = self.inner.play_tick(tick);
        let request = RoundRequest::new(tick, decision.loads, decision.purchases);
        serde_wasm_bindgen::to_value(&request).unwrap_or(JsValue::NULL)
    }

    /// Feed a `RoundResponse` object back into the engine.
    pub fn ingest_round(&mut self, response: JsValue) -> Result<(), JsValue> {
        let response: RoundResponse = serde_wasm_bindgen::from_value(response)?;
        self.inner.update_state(&response);
        Ok(())
    }

    /// Replace purchase tunables from a JSON object keyed by class; classes
    /// it leaves out keep their current values.
    pub fn set_tunables(&mut self, tunables_json: &str) -> Result<(), JsValue> {
        let overrides: PerClass<Option<PurchaseTunables>> = serde_json::from_str(tunables_json).map_err(js_err)?;
        let current = self.inner.config().purchase;
        let merged = PerClass::from_fn(|class| overrides[class].unwrap_or(current[class]));
        self.inner.set_tunables(merged).map_err(js_err)
    }

    pub fn set_endgame(&mut self, on: bool) {
        self.inner.set_endgame(on);
    }

    pub fn stock(&self, airport: &str, class: &str) -> Result<f64, JsValue> {
        let class: ServiceClass = class.parse().map_err(js_err)?;
        Ok(self.inner.stock(&AirportCode::from(airport), class) as f64)
    }

    /// All four class balances at `airport`, keyed like the round API.
    pub fn airport_stock(&self, airport: &str) -> JsValue {
        let balances = self.inner.stock_at(&AirportCode::from(airport));
        serde_wasm_bindgen::to_value(&balances).unwrap_or(JsValue::NULL)
    }

    pub fn stats(&self) -> JsValue {
        serde_wasm_bindgen::to_value(self.inner.stats()).unwrap_or(JsValue::NULL)
    }

    pub fn pending_jobs(&self) -> u32 {
        self.inner.pending_jobs().count() as u32
    }

    pub fn known_flights(&self) -> u32 {
        self.inner.known_flights() as u32
    }

    pub fn reset(&mut self) {
        self.inner.reset();
    }
}
