//! Substrate entry point
//!
//! Native: grows a picture headlessly and saves it as PNG.
//! Web: draws onto the page's `<canvas>` through its 2D context.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod web {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

    use substrate::{Canvas, Rgba, Settings, Substrate};

    /// Cap on catch-up ticks after the tab was in the background
    const MAX_TICKS_PER_FRAME: u32 = 8;

    /// `Canvas` over an HTML canvas 2D context
    struct Context2dCanvas {
        element: HtmlCanvasElement,
        ctx: CanvasRenderingContext2d,
    }

    impl Canvas for Context2dCanvas {
        fn width(&self) -> u32 {
            self.element.width()
        }

        fn height(&self) -> u32 {
            self.element.height()
        }

        fn clear(&mut self, color: Rgba) {
            self.ctx.set_fill_style_str(&color.to_css());
            self.ctx
                .fill_rect(0.0, 0.0, self.width() as f64, self.height() as f64);
        }

        fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Rgba) {
            self.ctx.set_fill_style_str(&color.to_css());
            self.ctx.fill_rect(x as f64, y as f64, w as f64, h as f64);
        }

        fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
            self.ctx.set_stroke_style_str(&color.to_css());
            self.ctx.set_line_width(width as f64);
            self.ctx.set_line_cap("round");
            self.ctx.begin_path();
            self.ctx.move_to(from.x as f64, from.y as f64);
            self.ctx.line_to(to.x as f64, to.y as f64);
            self.ctx.stroke();
        }
    }

    struct Host {
        sim: Substrate,
        canvas: Context2dCanvas,
        last_time: f64,
        accumulator: f64,
    }

    impl Host {
        /// Run however many ticks are due since the last animation frame
        fn update(&mut self, time: f64) {
            let interval = self.sim.settings().tick_interval().as_secs_f64() * 1000.0;
            if self.last_time > 0.0 {
                self.accumulator += time - self.last_time;
            } else {
                self.accumulator = interval;
            }
            self.last_time = time;

            let mut ticks = 0;
            while self.accumulator >= interval && ticks < MAX_TICKS_PER_FRAME {
                self.sim.tick(&mut self.canvas);
                self.accumulator -= interval;
                ticks += 1;
            }
            if ticks == MAX_TICKS_PER_FRAME {
                self.accumulator = 0.0;
            }
        }
    }

    fn fit_to_window(canvas: &HtmlCanvasElement) {
        canvas.set_width(canvas.client_width().max(0) as u32);
        canvas.set_height(canvas.client_height().max(0) as u32);
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Substrate starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let element: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;
        fit_to_window(&element);

        let ctx: CanvasRenderingContext2d = element
            .get_context("2d")?
            .ok_or("no 2d context")?
            .dyn_into()?;

        let seed = js_sys::Date::now() as u64;
        let settings = Settings::load().clamped();
        settings.save();
        log::info!("Seed {}, settings {:?}", seed, settings);

        let host = Rc::new(RefCell::new(Host {
            sim: Substrate::new(settings, seed),
            canvas: Context2dCanvas { element, ctx },
            last_time: 0.0,
            accumulator: 0.0,
        }));

        // Resizing the element is enough: the next tick notices and restarts
        {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                fit_to_window(&host.borrow().canvas.element);
            });
            window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        request_animation_frame(host);
        Ok(())
    }

    fn request_animation_frame(host: Rc<RefCell<Host>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            frame_loop(host, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame_loop(host: Rc<RefCell<Host>>, time: f64) {
        host.borrow_mut().update(time);
        request_animation_frame(host);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    web::run()
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    use anyhow::{Context, Result};
    use clap::Parser;

    use substrate::{GainSeed, RasterCanvas, Settings, Substrate};

    fn parse_gain_seed(s: &str) -> Result<GainSeed, String> {
        GainSeed::from_str(s).ok_or_else(|| format!("unknown gain seed '{s}' (truncated, uniform)"))
    }

    #[derive(Debug, Parser)]
    #[command(author, version, about = "Grow a Substrate picture and save it as PNG")]
    struct Cli {
        /// Canvas width in pixels
        #[arg(long, default_value_t = 800)]
        width: u32,

        /// Canvas height in pixels
        #[arg(long, default_value_t = 600)]
        height: u32,

        /// Ticks to run (defaults to one whole run, stopping just before the restart)
        #[arg(long)]
        ticks: Option<u64>,

        /// RNG seed (defaults to the current time)
        #[arg(long)]
        seed: Option<u64>,

        /// Settings JSON file
        #[arg(long)]
        settings: Option<PathBuf>,

        /// Override the crack count
        #[arg(long)]
        cracks: Option<u32>,

        /// Override the grains per crack per tick
        #[arg(long)]
        grains: Option<u32>,

        /// Override the arc percentage
        #[arg(long)]
        circle_percent: Option<u32>,

        /// Initial gain of new cracks: truncated or uniform
        #[arg(long, value_parser = parse_gain_seed)]
        gain_seed: Option<GainSeed>,

        /// Write the effective settings to this file
        #[arg(long)]
        save_settings: Option<PathBuf>,

        /// Output PNG path
        #[arg(long, short, default_value = "substrate.png")]
        out: PathBuf,
    }

    impl Cli {
        fn settings(&self) -> Result<Settings> {
            let mut settings = match &self.settings {
                Some(path) => Settings::load_from(path)?,
                None => Settings::default(),
            };
            if let Some(n) = self.cracks {
                settings.crack_count = n;
            }
            if let Some(n) = self.grains {
                settings.grain_count = n;
            }
            if let Some(p) = self.circle_percent {
                settings.circle_percent = p;
            }
            if let Some(g) = self.gain_seed {
                settings.gain_seed = g;
            }
            if !settings.is_in_range() {
                log::warn!("Settings outside slider ranges, clamping: {:?}", settings);
            }
            Ok(settings.clamped())
        }
    }

    pub fn run() -> Result<()> {
        env_logger::init();
        let cli = Cli::parse();

        let settings = cli.settings()?;
        if let Some(path) = &cli.save_settings {
            settings.save_to(path)?;
        }

        let seed = cli.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or_default()
        });
        let ticks = cli
            .ticks
            .unwrap_or(u64::from(settings.duration_ticks) - 1);

        log::info!(
            "Substrate {}x{}, seed {}, {} ticks, {} gain",
            cli.width,
            cli.height,
            seed,
            ticks,
            settings.gain_seed.as_str()
        );

        let mut canvas = RasterCanvas::new(cli.width, cli.height);
        let mut sim = Substrate::new(settings, seed);
        let mut respawned = 0u64;
        for t in 0..ticks {
            respawned += u64::from(sim.tick(&mut canvas).respawned);
            if t > 0 && t % 1000 == 0 {
                log::info!(
                    "tick {}: {} cells claimed, {} cracks replaced",
                    t,
                    sim.grid().claimed_count(),
                    respawned
                );
            }
        }

        canvas
            .save_png(&cli.out)
            .with_context(|| format!("failed to write {}", cli.out.display()))?;
        println!(
            "Wrote {} ({} ticks, seed {}, {} restarts)",
            cli.out.display(),
            ticks,
            seed,
            sim.restarts()
        );
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
