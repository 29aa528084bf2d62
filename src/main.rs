//! Target Range entry point
//!
//! Handles platform-specific initialization. On the web the A-Frame scene is
//! bound once it has loaded; natively a scripted round runs headless.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use target_range::platform::scene::SCENE;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;

    fn start() {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document; cannot start");
            return;
        };
        if let Err(e) = target_range::platform::web::run(&document) {
            log::error!("Refusing to start: {}", e);
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Target Range starting...");

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let Some(scene) = document.query_selector(SCENE).ok().flatten() else {
            log::error!("Refusing to start: required scene element '{}' not found", SCENE);
            return;
        };

        // A-Frame sets `hasLoaded` once every entity is initialized
        let loaded = js_sys::Reflect::get(&scene, &JsValue::from_str("hasLoaded"))
            .ok()
            .and_then(|v| v.as_bool())
            .unwrap_or(false);
        if loaded {
            start();
            return;
        }

        let closure = Closure::once(move |_event: web_sys::Event| start());
        let _ = scene.add_event_listener_with_callback("loaded", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Target Range (native) starting...");
    log::info!("Native mode has no scene - run with `trunk serve` for the VR version");

    let settings = std::env::args()
        .nth(1)
        .map(|path| {
            std::fs::read_to_string(&path)
                .map_err(|e| target_range::GameError::SettingsParse(format!("{}: {}", path, e)))
                .and_then(|json| target_range::Settings::from_json(&json))
        })
        .transpose();

    match settings.and_then(|s| demo_round(s.unwrap_or_default())) {
        Ok(score) => println!("\nDemo round finished with {} points", score),
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    }
}

/// Play one round headless, shooting every target as soon as it falls
#[cfg(not(target_arch = "wasm32"))]
fn demo_round(settings: target_range::Settings) -> target_range::GameResult<u32> {
    use target_range::sim::{Effect, Game, InputEvent};

    let mut game = Game::new(settings)?;
    game.start_round();

    let mut falling = Vec::new();
    while game.is_active() {
        game.advance(100);
        for effect in game.drain_effects() {
            match effect {
                Effect::AnimateFall { target, .. } => falling.push(target),
                Effect::TimerUpdate { seconds_left, .. } if seconds_left % 10 == 0 => {
                    log::info!("{}s left, score {}", seconds_left, game.round_state().score);
                }
                _ => {}
            }
        }
        for target in falling.drain(..) {
            game.handle_input(InputEvent::DestroyRequested(target));
        }
    }
    Ok(game.round_state().score)
}
