#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

use log::{debug, info, warn};
use rand::Rng;

mod app;
pub use app::{
    Blend, Canvas, Cloud, NebulaHue, PixelCanvas, Rgba, Star, StarSprite, Starfield,
    StarfieldApp, Surface, Viewport,
};
#[cfg(target_arch = "wasm32")]
pub use app::WebCanvas;

pub mod config;
pub use config::{ConfigError, StarfieldConfig};

mod error;
pub use error::RenderError;

pub mod scheduler;
pub use scheduler::{FrameScheduler, TickScheduler};

pub mod report;

cfg_if::cfg_if! {
    if #[cfg(target_arch = "wasm32")] {
        struct ConsoleLogger;

        impl log::Log for ConsoleLogger {
            fn enabled(&self, metadata: &log::Metadata) -> bool {
                metadata.level() <= log::max_level()
            }

            fn log(&self, record: &log::Record) {
                if !self.enabled(record.metadata()) {
                    return;
                }
                let line = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
                match record.level() {
                    log::Level::Error => web_sys::console::error_1(&line),
                    log::Level::Warn => web_sys::console::warn_1(&line),
                    log::Level::Info => web_sys::console::info_1(&line),
                    _ => web_sys::console::debug_1(&line),
                }
            }

            fn flush(&self) {}
        }

        static LOGGER: ConsoleLogger = ConsoleLogger;

        /// Routes `log` records to the browser console.
        pub fn init_logging() {
            if log::set_logger(&LOGGER).is_ok() {
                log::set_max_level(log::LevelFilter::Info);
            }
        }

        #[wasm_bindgen(start)]
        pub fn run() {
            console_error_panic_hook::set_once();
            init_logging();
        }
    } else {
        /// Installs `env_logger`, defaulting to `info` unless `RUST_LOG` says otherwise.
        pub fn init_logging() {
            let _ = env_logger::Builder::from_env(
                env_logger::Env::default().default_filter_or("info"),
            )
            .try_init();
        }
    }
}
