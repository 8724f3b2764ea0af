//! Voice Arcade entry point
//!
//! Handles platform-specific initialization and starts the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, Window};

    use voice_arcade::audio::AudioManager;
    use voice_arcade::highscores::LocalStorageHighScores;
    use voice_arcade::platform::{AnimationFrameScheduler, FrameScheduler, MicrophoneVolume, run_loop};
    use voice_arcade::renderer::CanvasRenderer;
    use voice_arcade::{Arcade, GameConfig, GameVariant, Settings};

    type Game = Arcade<MicrophoneVolume, LocalStorageHighScores, CanvasRenderer>;

    pub fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Voice Arcade starting...");

        let Some(window) = web_sys::window() else {
            log::error!("no window");
            return;
        };
        let Some(document) = window.document() else {
            log::error!("no document");
            return;
        };

        let variant = GameVariant::from_query(&window.location().search().unwrap_or_default());

        let settings = Settings::load();
        let mut config = GameConfig::for_variant(variant);
        settings.apply(&mut config);

        let Some(canvas) = document
            .get_element_by_id("gameCanvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("no #gameCanvas element");
            return;
        };
        canvas.set_width(config.field.x as u32);
        canvas.set_height(config.field.y as u32);

        let Some(renderer) = CanvasRenderer::new(&canvas) else {
            log::error!("Canvas 2D context unavailable");
            return;
        };

        let microphone = MicrophoneVolume::new();
        let store = LocalStorageHighScores::load(variant);
        let game = match Arcade::new(config, microphone.clone(), store, renderer) {
            Ok(game) => game.with_sound(AudioManager::from_settings(&settings)),
            Err(err) => {
                log::error!("Invalid {} config: {}", variant.as_str(), err);
                return;
            }
        };
        let game = Rc::new(RefCell::new(game));
        let scheduler: Rc<dyn FrameScheduler> = Rc::new(AnimationFrameScheduler);

        setup_keyboard(&window, game.clone(), Rc::new(RefCell::new(settings)));
        setup_start_button(&document, "start-btn", game.clone(), scheduler.clone(), microphone.clone());
        setup_start_button(&document, "retry-btn", game, scheduler, microphone);

        log::info!("Voice Arcade ready: {}", variant.as_str());
    }

    fn now_ms(window: &Window) -> f64 {
        window.performance().map(|p| p.now()).unwrap_or(0.0)
    }

    fn setup_keyboard(window: &Window, game: Rc<RefCell<Game>>, settings: Rc<RefCell<Settings>>) {
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = event.key();
                if matches!(key.as_str(), "m" | "M") && !event.repeat() {
                    toggle_mute(&game, &settings);
                } else if game.borrow_mut().key_down(&key) {
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().key_up(&event.key());
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn toggle_mute(game: &Rc<RefCell<Game>>, settings: &Rc<RefCell<Settings>>) {
        let mut settings = settings.borrow_mut();
        settings.muted = !settings.muted;
        settings.save();
        log::info!("Sound {}", if settings.muted { "muted" } else { "on" });
        if let Err(err) = game.borrow_mut().apply_settings(&settings) {
            log::error!("Settings rejected: {}", err);
        }
    }

    /// Start and retry both begin a fresh session
    fn setup_start_button(
        document: &Document,
        id: &str,
        game: Rc<RefCell<Game>>,
        scheduler: Rc<dyn FrameScheduler>,
        microphone: MicrophoneVolume,
    ) {
        let Some(btn) = document.get_element_by_id(id) else {
            log::warn!("no #{} button", id);
            return;
        };

        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            let Some(window) = web_sys::window() else {
                return;
            };
            // getUserMedia needs a user gesture; repeat clicks while pending are ignored
            microphone.connect();
            hide_overlays(&window);

            let seed = js_sys::Date::now() as u64;
            let needs_loop = game.borrow_mut().start(seed, now_ms(&window));
            if needs_loop {
                run_loop(game.clone(), scheduler.clone());
            }
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn hide_overlays(window: &Window) {
        let Some(document) = window.document() else {
            return;
        };
        for id in ["controls", "gameOverScreen"] {
            if let Some(el) = document.get_element_by_id(id) {
                let _ = el.set_attribute("style", "display: none");
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

/// Headless demo: play each game with a scripted voice and print the results
#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::cell::RefCell;
    use std::rc::Rc;

    use voice_arcade::input::ScriptedVolume;
    use voice_arcade::platform::{ManualScheduler, run_loop};
    use voice_arcade::renderer::LogRenderer;
    use voice_arcade::{Arcade, GameConfig, GameVariant, MemoryHighScores, SessionSummary, Settings};

    /// One minute at 60 fps
    const MAX_FRAMES: usize = 3600;
    const FRAME_MS: f64 = 1000.0 / 60.0;

    /// Loudness per frame for each game
    fn voice(variant: GameVariant) -> ScriptedVolume {
        let frames = 0..MAX_FRAMES;
        match variant {
            // A short shout every 18 frames keeps the bird roughly level
            GameVariant::Bird => {
                ScriptedVolume::new(frames.map(|i| if i % 18 == 0 { 40.0 } else { 0.0 }))
            }
            // Alternate between cruising and flooring it
            GameVariant::Car => {
                ScriptedVolume::new(frames.map(|i| if (i / 120) % 2 == 0 { 50.0 } else { 70.0 }))
            }
            // Keep shouting to fire
            GameVariant::Spaceship => ScriptedVolume::new(frames.map(|_| 80.0)),
        }
    }

    pub fn play(variant: GameVariant, seed: u64) -> Option<SessionSummary> {
        let mut config = GameConfig::for_variant(variant);
        Settings::load().apply(&mut config);

        let game = match Arcade::new(config, voice(variant), MemoryHighScores::new(), LogRenderer::new()) {
            Ok(game) => Rc::new(RefCell::new(game)),
            Err(err) => {
                log::error!("Invalid {} config: {}", variant.as_str(), err);
                return None;
            }
        };
        let scheduler = Rc::new(ManualScheduler::new());

        game.borrow_mut().start(seed, 0.0);
        run_loop(game.clone(), scheduler.clone());

        let mut frame = 0;
        while scheduler.pending() > 0 && frame < MAX_FRAMES {
            scheduler.fire(frame as f64 * FRAME_MS);
            frame += 1;
        }

        let mut game = game.borrow_mut();
        game.end().or_else(|| game.session().last_summary())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use voice_arcade::GameVariant;

    env_logger::init();
    log::info!("Voice Arcade (native) starting...");
    log::info!("Native mode runs a headless demo - use `trunk serve` for the playable web version");

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(42);

    for variant in GameVariant::ALL {
        let Some(summary) = demo::play(variant, seed) else {
            continue;
        };
        match serde_json::to_string(&summary) {
            Ok(json) => println!("{}", json),
            Err(err) => log::error!("Failed to encode {} summary: {}", variant.as_str(), err),
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
