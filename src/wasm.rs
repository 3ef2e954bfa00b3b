//! JavaScript bindings, for driving the engine from a browser game.
//!
//! Coordinates cross the boundary as plain `x, y` numbers and step logs as parsed JSON values,
//! in the same shape [`serde_json`] writes them.

use js_sys::JSON;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::{Engine, EngineError, Location, ResolveStep};

fn to_js_error(error: EngineError) -> JsError {
    JsError::new(&error.to_string())
}

fn to_js_value(value: &impl Serialize) -> Result<JsValue, JsError> {
    let json = serde_json::to_string(value).map_err(|err| to_js_error(err.into()))?;
    JSON::parse(&json).map_err(|_| JsError::new("could not hand JSON to the host"))
}

/// An [`Engine`] owned by JavaScript.
#[wasm_bindgen]
pub struct WasmEngine {
    engine: Engine,
}

#[wasm_bindgen]
impl WasmEngine {
    /// Build an engine from a JSON stage.
    #[wasm_bindgen(constructor)]
    pub fn new(stage_json: &str) -> Result<WasmEngine, JsError> {
        Engine::from_json(stage_json)
            .map(|engine| Self { engine })
            .map_err(to_js_error)
    }

    /// Columns.
    pub fn width(&self) -> usize {
        self.engine.width()
    }

    /// Rows.
    pub fn height(&self) -> usize {
        self.engine.height()
    }

    /// Flows cleared so far.
    #[wasm_bindgen(js_name = flowsGained)]
    pub fn flows_gained(&self) -> u32 {
        self.engine.flows_gained()
    }

    /// Whether the stage goal has been reached.
    #[wasm_bindgen(js_name = isGoalMet)]
    pub fn is_goal_met(&self) -> bool {
        self.engine.is_goal_met()
    }

    /// The tile at `(x, y)` as `{ piece, rotation }`, or `null`.
    pub fn cell(&self, x: usize, y: usize) -> Result<JsValue, JsError> {
        to_js_value(&self.engine.get_cell(Location(x, y)))
    }

    /// Whether `(x, y)` lies on the board.
    #[wasm_bindgen(js_name = inBounds)]
    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        self.engine.in_bounds(Location(x, y))
    }

    /// Rotate the tile at `(x, y)` a quarter clockwise.
    #[wasm_bindgen(js_name = rotateCW)]
    pub fn rotate_cw(&mut self, x: usize, y: usize) {
        self.engine.rotate_cw(Location(x, y))
    }

    /// Swap two cells.
    #[wasm_bindgen(js_name = swapCells)]
    pub fn swap_cells(&mut self, ax: usize, ay: usize, bx: usize, by: usize) {
        self.engine.swap_cells(Location(ax, ay), Location(bx, by))
    }

    /// Carry tiles along a drag path given as a flat `[x0, y0, x1, y1, ...]` array.
    /// Returns a `SHIFT` step, or `null` if the path was rejected.
    #[wasm_bindgen(js_name = shiftAlongPath)]
    pub fn shift_along_path(&mut self, path: &[usize]) -> Result<JsValue, JsError> {
        let path = path.chunks_exact(2).map(|pair| Location(pair[0], pair[1])).collect::<Vec<_>>();
        to_js_value(&ResolveStep::shift(self.engine.shift_along_path(&path)))
    }

    /// Resolve the board; returns `{ steps, flowsGained }`.
    #[wasm_bindgen(js_name = resolveAll)]
    pub fn resolve_all(&mut self) -> Result<JsValue, JsError> {
        let outcome = self.engine.resolve_all().map_err(to_js_error)?;
        to_js_value(&outcome)
    }

    /// Fire the trigger at `(x, y)`; returns the steps.
    #[wasm_bindgen(js_name = triggerAt)]
    pub fn trigger_at(&mut self, x: usize, y: usize) -> Result<JsValue, JsError> {
        let steps = self.engine.trigger_at(Location(x, y)).map_err(to_js_error)?;
        to_js_value(&steps)
    }

    /// The board as box-drawing text, one line per row.
    #[wasm_bindgen(js_name = boardText)]
    pub fn board_text(&self) -> String {
        self.engine.to_string()
    }
}
