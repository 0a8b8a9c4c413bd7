use js_sys::Array;
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;
use web_sys::HtmlVideoElement;

use vizij_video_core::{MediaPlayer, PlayerConfig, PlayerError};

mod media;

pub use media::HtmlVideoMedia;

#[wasm_bindgen]
pub struct VizijVideoPlayer {
    core: MediaPlayer<HtmlVideoMedia>,
}

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

fn player_error(e: PlayerError) -> JsError {
    JsError::new(&format!("{} error: {e}", e.category()))
}

fn to_js<T: serde::Serialize + ?Sized>(value: &T, what: &str) -> Result<JsValue, JsError> {
    swb::to_value(value).map_err(|e| JsError::new(&format!("{what} error: {e}")))
}

#[wasm_bindgen]
impl VizijVideoPlayer {
    /// Create a player backed by a hidden `<video>` element. Pass a config
    /// object or undefined/null for defaults.
    /// Example:
    ///   new VizijVideoPlayer({ source: "coffee.mp4", play_btn_color: "#6EABDD" })
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<VizijVideoPlayer, JsError> {
        console_error_panic_hook::set_once();

        let cfg: PlayerConfig = if jsvalue_is_undefined_or_null(&config) {
            PlayerConfig::default()
        } else {
            swb::from_value(config).map_err(|e| JsError::new(&format!("config error: {e}")))?
        };
        let media = HtmlVideoMedia::new().map_err(|e| player_error(e.into()))?;
        let core = MediaPlayer::new(media, cfg).map_err(player_error)?;
        Ok(VizijVideoPlayer { core })
    }

    /// Start loading `uri`. Anything other than a non-empty string is rejected.
    /// Returns the load ticket.
    #[wasm_bindgen(js_name = setSource)]
    pub fn set_source(&mut self, uri: JsValue) -> Result<f64, JsError> {
        let Some(uri) = uri.as_string() else {
            return Err(player_error(PlayerError::invalid_argument(
                "source must be a string",
            )));
        };
        let ticket = self.core.set_source(&uri).map_err(player_error)?;
        Ok(ticket.0 as f64)
    }

    #[wasm_bindgen(js_name = clearSource)]
    pub fn clear_source(&mut self) -> Result<(), JsError> {
        self.core.clear_source().map_err(player_error)
    }

    #[wasm_bindgen]
    pub fn play(&mut self) -> Result<(), JsError> {
        self.core.play().map_err(player_error)
    }

    #[wasm_bindgen]
    pub fn pause(&mut self) -> Result<(), JsError> {
        self.core.pause().map_err(player_error)
    }

    /// Click behaviour: play when paused, pause when playing. Returns whether
    /// playback was requested.
    #[wasm_bindgen(js_name = togglePlayback)]
    pub fn toggle_playback(&mut self) -> Result<bool, JsError> {
        self.core.toggle_playback().map_err(player_error)
    }

    #[wasm_bindgen(js_name = canPlay)]
    pub fn can_play(&self) -> bool {
        self.core.can_play()
    }

    #[wasm_bindgen(js_name = isPaused)]
    pub fn is_paused(&self) -> bool {
        self.core.is_paused()
    }

    #[wasm_bindgen(js_name = setVolume)]
    pub fn set_volume(&mut self, volume: f32) {
        self.core.set_volume(volume);
    }

    #[wasm_bindgen(js_name = getVolume)]
    pub fn volume(&self) -> f32 {
        self.core.volume()
    }

    #[wasm_bindgen(js_name = setMuted)]
    pub fn set_muted(&mut self, muted: bool) {
        self.core.set_muted(muted);
    }

    #[wasm_bindgen(js_name = isMuted)]
    pub fn is_muted(&self) -> bool {
        self.core.is_muted()
    }

    #[wasm_bindgen(js_name = setAutoplay)]
    pub fn set_autoplay(&mut self, autoplay: bool) {
        self.core.set_autoplay(autoplay);
    }

    #[wasm_bindgen(js_name = isAutoplay)]
    pub fn is_autoplay(&self) -> bool {
        self.core.is_autoplay()
    }

    #[wasm_bindgen(js_name = setLoop)]
    pub fn set_loop(&mut self, looping: bool) {
        self.core.set_loop(looping);
    }

    #[wasm_bindgen(js_name = isLoop)]
    pub fn is_loop(&self) -> bool {
        self.core.is_loop()
    }

    /// Current state as a snake_case string ("no_source", "loading", ...).
    #[wasm_bindgen]
    pub fn state(&self) -> Result<JsValue, JsError> {
        to_js(&self.core.state(), "state")
    }

    /// Apply pending element signals. Call once per animation frame.
    /// Returns the number of signals handled.
    #[wasm_bindgen]
    pub fn update(&mut self, dt: f32) -> u32 {
        self.core.update(dt) as u32
    }

    /// Surface descriptor: visibility, aspect ratio, texture binding and
    /// geometry revision.
    #[wasm_bindgen]
    pub fn surface(&self) -> Result<JsValue, JsError> {
        to_js(self.core.surface(), "surface")
    }

    #[wasm_bindgen]
    pub fn affordance(&self) -> Result<JsValue, JsError> {
        to_js(self.core.affordance(), "affordance")
    }

    /// Take the notifications raised since the last call.
    #[wasm_bindgen(js_name = drainEvents)]
    pub fn drain_events(&mut self) -> Result<Array, JsError> {
        let out = Array::new();
        for event in self.core.drain_events() {
            out.push(&to_js(&event, "event")?);
        }
        Ok(out)
    }

    /// The backing element, for building a video texture on the JS side.
    #[wasm_bindgen(js_name = videoElement)]
    pub fn video_element(&self) -> HtmlVideoElement {
        self.core.resource().element().clone()
    }
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
