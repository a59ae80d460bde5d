//! Drill Defense entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, PointerEvent};

    use drill_defense::platform::StartError;
    use drill_defense::renderer::{RenderState, build_scene};
    use drill_defense::{Game, LoopControl, Phase, Settings, Tuning, Viewport};

    const CANVAS_ID: &str = "game-canvas";

    /// Everything the browser callbacks share
    struct App {
        game: Game,
        settings: Settings,
        canvas: HtmlCanvasElement,
        render_state: RenderState,
        /// Pending requestAnimationFrame handle
        raf_id: Option<i32>,
        /// Window resize listener, installed while playing
        on_resize: Option<Closure<dyn FnMut(web_sys::Event)>>,
    }

    impl App {
        /// Draw the current session (also used for the frozen final frame)
        fn render(&mut self, time: f64) {
            let Some(session) = self.game.session() else {
                return;
            };
            let vertices = build_scene(session, &self.settings, time);
            match self.render_state.render(&vertices) {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost) => {
                    let (w, h) = self.render_state.size;
                    let logical = self.render_state.logical;
                    self.render_state.resize(w, h, logical);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }

        /// Match the canvas backing store to its CSS size
        fn fit_canvas(&mut self) -> Viewport {
            let (viewport, width, height) = size_canvas(&self.canvas);
            if viewport.is_valid() {
                self.render_state.resize(width, height, viewport);
            }
            viewport
        }
    }

    /// CSS-pixel viewport of the canvas
    fn canvas_viewport(canvas: &HtmlCanvasElement) -> Viewport {
        Viewport::new(canvas.client_width() as f32, canvas.client_height() as f32)
    }

    /// Resize the backing store for the device pixel ratio
    fn size_canvas(canvas: &HtmlCanvasElement) -> (Viewport, u32, u32) {
        let dpr = web_sys::window()
            .map(|w| w.device_pixel_ratio())
            .unwrap_or(1.0);
        let viewport = canvas_viewport(canvas);
        let width = (viewport.width as f64 * dpr) as u32;
        let height = (viewport.height as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);
        (viewport, width, height)
    }

    fn set_hidden(id: &str, hidden: bool) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        if let Some(el) = document.get_element_by_id(id) {
            let classes = el.class_list();
            let _ = if hidden {
                classes.add_1("hidden")
            } else {
                classes.remove_1("hidden")
            };
        }
    }

    fn set_text(id: &str, text: &str) {
        if let Some(el) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(id))
        {
            el.set_text_content(Some(text));
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Drill Defense starting...");

        match setup().await {
            Ok(()) => log::info!("Drill Defense ready"),
            Err(e) => log::warn!("Not starting: {}", e),
        }
    }

    async fn setup() -> Result<(), StartError> {
        let window = web_sys::window().ok_or(StartError::NoWindow)?;
        let document = window.document().ok_or(StartError::NoDocument)?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id(CANVAS_ID)
            .and_then(|el| el.dyn_into().ok())
            .ok_or(StartError::NoCanvas(CANVAS_ID))?;

        let (viewport, width, height) = size_canvas(&canvas);
        if !viewport.is_valid() {
            return Err(StartError::EmptyViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| StartError::Surface(e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|_| StartError::NoAdapter)?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height, viewport).await?;

        let app = Rc::new(RefCell::new(App {
            game: Game::new(Tuning::load()),
            settings: Settings::load(),
            canvas: canvas.clone(),
            render_state,
            raf_id: None,
            on_resize: None,
        }));

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.class_list().add_1("hidden");
        }
        set_hidden("menu", false);

        setup_pointer_handlers(&canvas, &app);
        setup_buttons(&app);
        setup_settings_keys(&app);

        Ok(())
    }

    fn setup_pointer_handlers(canvas: &HtmlCanvasElement, app: &Rc<RefCell<App>>) {
        for event_name in ["pointermove", "pointerdown"] {
            let port = app.borrow().game.input_port();
            let target = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let rect = target.get_bounding_client_rect();
                port.post((event.client_x() as f64 - rect.left()) as f32);
            });
            let _ = canvas
                .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(app: &Rc<RefCell<App>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        for id in ["start-btn", "retry-btn"] {
            if let Some(btn) = document.get_element_by_id(id) {
                let app = app.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                    start_session(&app);
                });
                let _ =
                    btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    /// `S` screen shake, `P` particles, `M` reduced motion
    fn setup_settings_keys(app: &Rc<RefCell<App>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        let app = app.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let mut a = app.borrow_mut();
            let settings = &mut a.settings;
            match event.key().as_str() {
                "s" | "S" => settings.screen_shake = !settings.screen_shake,
                "p" | "P" => settings.particles = !settings.particles,
                "m" | "M" => settings.reduced_motion = !settings.reduced_motion,
                _ => return,
            }
            settings.save();
            log::debug!("Settings changed: {:?}", settings);
        });
        let _ = document.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Start or retry: fresh session, fresh loop
    fn start_session(app: &Rc<RefCell<App>>) {
        stop_loop(app);

        {
            let mut a = app.borrow_mut();
            let viewport = a.fit_canvas();
            let seed = js_sys::Date::now() as u64;
            if let Err(e) = a.game.reset(seed, viewport) {
                log::warn!("Cannot start session: {}", e);
                return;
            }
        }

        set_hidden("menu", true);
        set_hidden("result", true);
        install_resize_listener(app);
        schedule_frame(app);
    }

    fn install_resize_listener(app: &Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let handle = app.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            handle.borrow_mut().fit_canvas();
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        app.borrow_mut().on_resize = Some(closure);
    }

    /// Cancel the pending frame and drop the resize listener
    fn stop_loop(app: &Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let mut a = app.borrow_mut();
        if let Some(id) = a.raf_id.take() {
            let _ = window.cancel_animation_frame(id);
        }
        if let Some(closure) = a.on_resize.take() {
            let _ = window
                .remove_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        }
    }

    fn schedule_frame(app: &Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let handle = app.clone();
        let closure = Closure::once(move |time: f64| {
            game_loop(handle, time);
        });
        match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            Ok(id) => app.borrow_mut().raf_id = Some(id),
            Err(e) => log::warn!("requestAnimationFrame failed: {:?}", e),
        }
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        let control = {
            let mut a = app.borrow_mut();
            a.raf_id = None;
            let viewport = canvas_viewport(&a.canvas);
            let control = a.game.frame(time, viewport);
            a.render(time);
            control
        };

        match control {
            LoopControl::Continue => schedule_frame(&app),
            LoopControl::Stop => {
                stop_loop(&app);
                show_result(&app);
            }
        }
    }

    fn show_result(app: &Rc<RefCell<App>>) {
        let Some(result) = app.borrow().game.result() else {
            return;
        };
        let title = match result.phase {
            Phase::Clear => "Village saved!",
            _ => "Game over",
        };
        set_text("result-title", title);
        set_text("result-score", &result.score.to_string());
        set_text("result-time", &format!("{}s", result.time));
        set_hidden("result", false);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Drill Defense (native) starting...");
    log::info!("Native mode runs a headless autopilot - run with `trunk serve` for the web version");

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(42);
    autopilot::run(seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use drill_defense::sim::GameSession;
    use drill_defense::{Game, LoopControl, Tuning, Viewport};

    const FRAME_MS: f64 = 1000.0 / 60.0;

    /// Chase the lowest falling meteorite
    fn target_x(session: &GameSession) -> Option<f32> {
        session
            .meteorites
            .iter()
            .filter(|m| m.is_falling())
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
            .map(|m| m.pos.x)
    }

    pub fn run(seed: u64) {
        let viewport = Viewport::new(800.0, 600.0);
        let mut game = Game::new(Tuning::load());
        if let Err(e) = game.start(seed, viewport) {
            log::error!("Cannot start: {}", e);
            return;
        }

        let port = game.input_port();
        let mut now = 0.0;
        loop {
            if let Some(x) = game.session().and_then(target_x) {
                port.post(x);
            }
            if game.frame(now, viewport) == LoopControl::Stop {
                break;
            }
            now += FRAME_MS;
        }

        if let Some(result) = game.result() {
            log::info!(
                "{:?}: score {} after {}s (seed {})",
                result.phase,
                result.score,
                result.time,
                seed
            );
        }
    }
}
