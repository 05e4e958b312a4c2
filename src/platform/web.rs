//! wasm-bindgen surface for a browser UI
//!
//! Structured results cross the boundary as JSON strings; errors become
//! string `JsValue`s.

use std::fmt::Display;

use wasm_bindgen::prelude::*;

use crate::settings::{Difficulty, Settings};
use crate::sim::state::{Puzzle, PuzzlePhase};

fn js_err(e: impl Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(js_err)
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        log::warn!("Logger was already initialized");
    }
    log::info!("Gemlight core loaded");
}

/// A puzzle session owned by the page
#[wasm_bindgen]
pub struct WebPuzzle {
    inner: Puzzle,
}

#[wasm_bindgen]
impl WebPuzzle {
    /// New puzzle at a difficulty; the seed defaults to the current time
    #[wasm_bindgen(constructor)]
    pub fn new(difficulty: &str, seed: Option<f64>) -> Result<WebPuzzle, JsValue> {
        let difficulty = Difficulty::from_str(difficulty)
            .ok_or_else(|| js_err(format!("unknown difficulty {difficulty:?}")))?;
        let seed = seed.unwrap_or_else(js_sys::Date::now) as u64;
        let inner = Puzzle::from_difficulty(Settings::from_difficulty(difficulty), seed).map_err(js_err)?;
        Ok(Self { inner })
    }

    /// New puzzle from JSON settings
    #[wasm_bindgen(js_name = fromSettings)]
    pub fn from_settings(json: &str, seed: f64) -> Result<WebPuzzle, JsValue> {
        let settings = Settings::from_json(json).map_err(js_err)?;
        let inner = Puzzle::from_difficulty(settings, seed as u64).map_err(js_err)?;
        Ok(Self { inner })
    }

    pub fn width(&self) -> i32 {
        self.inner.settings().width
    }

    pub fn height(&self) -> i32 {
        self.inner.settings().height
    }

    /// Hidden gem names as a JSON array
    #[wasm_bindgen(js_name = gemNames)]
    pub fn gem_names(&self) -> Result<String, JsValue> {
        to_json(self.inner.gem_names())
    }

    /// Fire a probe; returns the probe record as JSON
    pub fn probe(&mut self, emitter: &str) -> Result<String, JsValue> {
        let record = self.inner.probe_id(emitter).map_err(js_err)?;
        to_json(record)
    }

    #[wasm_bindgen(js_name = probeCount)]
    pub fn probe_count(&self) -> u32 {
        self.inner.probe_count()
    }

    #[wasm_bindgen(js_name = addGem)]
    pub fn add_gem(&mut self, name: &str, x: i32, y: i32) -> Result<u32, JsValue> {
        self.inner.add_gem(name, x, y).map_err(js_err)
    }

    #[wasm_bindgen(js_name = moveGem)]
    pub fn move_gem(&mut self, id: u32, x: i32, y: i32) -> Result<(), JsValue> {
        self.inner.move_gem(id, x, y).map_err(js_err)
    }

    #[wasm_bindgen(js_name = rotateGem)]
    pub fn rotate_gem(&mut self, id: u32) -> Result<(), JsValue> {
        self.inner.rotate_gem(id).map_err(js_err)
    }

    /// Returns false when the gem looks the same mirrored
    #[wasm_bindgen(js_name = flipGem)]
    pub fn flip_gem(&mut self, id: u32) -> Result<bool, JsValue> {
        self.inner.flip_gem(id).map_err(js_err)
    }

    #[wasm_bindgen(js_name = removeGem)]
    pub fn remove_gem(&mut self, id: u32) -> Result<(), JsValue> {
        self.inner.remove_gem(id).map(|_| ()).map_err(js_err)
    }

    /// Player placements (with validity flags) as JSON
    #[wasm_bindgen(js_name = playerGems)]
    pub fn player_gems(&self) -> Result<String, JsValue> {
        to_json(self.inner.player_gems())
    }

    /// Hidden placements as JSON, only once the puzzle is over
    #[wasm_bindgen(js_name = secretGems)]
    pub fn secret_gems(&self) -> Result<String, JsValue> {
        if self.inner.phase() == PuzzlePhase::Playing {
            return Err(js_err("the puzzle is still running"));
        }
        to_json(self.inner.secret())
    }

    #[wasm_bindgen(js_name = canCheck)]
    pub fn can_check(&self) -> bool {
        self.inner.can_check()
    }

    #[wasm_bindgen(js_name = checkSolution)]
    pub fn check_solution(&mut self) -> Result<bool, JsValue> {
        self.inner.check_solution().map_err(js_err)
    }

    #[wasm_bindgen(js_name = giveUp)]
    pub fn give_up(&mut self) {
        self.inner.give_up();
    }

    /// `Playing`, `Solved`, `Failed` or `GaveUp`
    pub fn phase(&self) -> String {
        format!("{:?}", self.inner.phase())
    }

    pub fn rating(&self) -> u32 {
        self.inner.rating()
    }
}
