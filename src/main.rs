//! Candy Blaster entry point
//!
//! On the web this wires the page (instructions box, start button, keyboard,
//! spawn timer) to the game and runs the frame loop. Natively it serves the
//! built web files over HTTP.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use candy_blaster::consts::*;
    use candy_blaster::persistence::LocalStorage;
    use candy_blaster::renderer::CanvasRenderer;
    use candy_blaster::{FrameOutcome, Game};

    const BACKGROUND_SRC: &str = "candy_world.jpg";

    /// Game plus its drawing surface, shared by every callback
    struct App {
        game: Game<LocalStorage>,
        renderer: CanvasRenderer,
    }

    impl App {
        fn draw(&self) {
            self.renderer.draw(&self.game.scene());
        }
    }

    type SharedApp = Rc<RefCell<App>>;

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn element(document: &Document, id: &str) -> Option<Element> {
        let el = document.get_element_by_id(id);
        if el.is_none() {
            log::error!("Missing #{} element", id);
        }
        el
    }

    fn show(el: &Element) {
        let _ = el.class_list().remove_1("hidden");
    }

    fn hide(el: &Element) {
        let _ = el.class_list().add_1("hidden");
    }

    /// Rebuild the `<li>` items of the leaderboard list
    fn update_leaderboard_list(lines: &[String]) {
        let Some(document) = document() else { return };
        let Some(list) = element(&document, "leaderboardList") else {
            return;
        };
        list.set_inner_html("");
        for line in lines {
            if let Ok(item) = document.create_element("li") {
                item.set_text_content(Some(line.as_str()));
                let _ = list.append_child(&item);
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Candy Blaster starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        canvas.set_width(CANVAS_WIDTH as u32);
        canvas.set_height(CANVAS_HEIGHT as u32);

        let renderer = CanvasRenderer::new(&canvas, BACKGROUND_SRC).expect("no 2d context");
        let seed = js_sys::Date::now() as u64;
        let app = Rc::new(RefCell::new(App {
            game: Game::new(LocalStorage::open(), seed),
            renderer,
        }));

        log::info!("Game initialized with seed: {}", seed);

        update_leaderboard_list(&app.borrow().game.leaderboard_lines());
        app.borrow().draw();

        setup_instructions(&document, app.clone());
        setup_start_button(&document, app.clone());
        setup_keyboard(app.clone());
        setup_spawner(app);

        log::info!("Candy Blaster ready!");
    }

    fn setup_instructions(document: &Document, app: SharedApp) {
        let Some(instructions) = element(document, "instructions") else {
            return;
        };
        if app.borrow().game.should_show_instructions() {
            show(&instructions);
        }

        let Some(btn) = element(document, "closeInstructions") else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            hide(&instructions);
            app.borrow_mut().game.dismiss_instructions();
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_start_button(document: &Document, app: SharedApp) {
        let Some(btn) = element(document, "startButton") else {
            return;
        };
        let start_button = btn.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            let Some(window) = web_sys::window() else { return };
            if app.borrow().game.is_started() {
                return;
            }

            let name = window
                .prompt_with_message("Enter your name:")
                .ok()
                .flatten()
                .unwrap_or_default();

            let started = app.borrow_mut().game.start(&name);
            match started {
                Ok(()) => {
                    hide(&start_button);
                    request_animation_frame(app.clone());
                }
                Err(e) => {
                    log::warn!("Start refused: {}", e);
                    let _ = window.alert_with_message("A name is required to play!");
                }
            }
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_keyboard(app: SharedApp) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let handled = app.borrow_mut().game.handle_key(&event.key());
            if handled {
                // Keep arrows and space from scrolling the page
                event.prevent_default();
            }
        });
        let _ =
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_spawner(app: SharedApp) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::<dyn FnMut()>::new(move || {
            app.borrow_mut().game.spawn_tick();
        });
        if let Err(e) = window.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            SPAWN_INTERVAL_MS,
        ) {
            log::error!("Failed to start spawner: {:?}", e);
        }
        closure.forget();
    }

    fn request_animation_frame(app: SharedApp) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |_time: f64| {
            game_loop(app);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: SharedApp) {
        let outcome = {
            let mut a = app.borrow_mut();
            let outcome = a.game.frame();
            a.draw();
            outcome
        };

        match outcome {
            FrameOutcome::Running { .. } => request_animation_frame(app),
            FrameOutcome::GameOver { message, leaderboard, .. } => {
                game_over(&message, &leaderboard)
            }
            FrameOutcome::Idle => {}
        }
    }

    fn game_over(message: &str, leaderboard: &[String]) {
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(message);
        }
        if let Some(btn) = document().and_then(|d| element(&d, "startButton")) {
            show(&btn);
        }
        update_leaderboard_list(leaderboard);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use candy_blaster::host::{HostConfig, run};
    use clap::Parser;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Candy Blaster asset host starting...");

    let config = HostConfig::parse();
    run(&config)
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
