// SPDX-License-Identifier: MPL-2.0
//! Headless demo: submits a burst of toasts to one window and logs each one
//! as it is shown and hidden.
//!
//! ```text
//! toast-relay [--count N] [--duration MS] [--fade-in MS] [--fade-out MS] [TEXT]
//! ```

use std::sync::Arc;
use std::time::Duration;

use iced_core::Rectangle;
use toast_relay::config;
use toast_relay::headless::HeadlessHost;
use toast_relay::timer::{ThreadTimer, Timer};
use toast_relay::toast::{self, Target, Toast, Toaster};
use toast_relay::ToastDuration;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

struct Args {
    count: usize,
    duration: u64,
    fade_in: Option<u64>,
    fade_out: Option<u64>,
    text: Option<String>,
}

fn parse_args() -> Result<Args, pico_args::Error> {
    let mut args = pico_args::Arguments::from_env();
    Ok(Args {
        count: args.opt_value_from_str("--count")?.unwrap_or(3),
        duration: args
            .opt_value_from_str("--duration")?
            .unwrap_or(config::SHORT_DURATION_MS),
        fade_in: args.opt_value_from_str("--fade-in")?,
        fade_out: args.opt_value_from_str("--fade-out")?,
        text: args
            .finish()
            .into_iter()
            .next()
            .and_then(|s| s.into_string().ok()),
    })
}

fn main() -> toast_relay::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(err) => {
            eprintln!("toast-relay: {err}");
            std::process::exit(2);
        }
    };

    match config::load() {
        Ok(settings) => settings.apply(),
        Err(err) => log::warn!("using built-in toast defaults: {err}"),
    }
    if let Some(ms) = args.fade_in {
        toast::set_default_fade_in(Duration::from_millis(ms.min(config::MAX_FADE_MS)));
    }
    if let Some(ms) = args.fade_out {
        toast::set_default_fade_out(Duration::from_millis(ms.min(config::MAX_FADE_MS)));
    }
    let duration = ToastDuration::from_millis(args.duration)?;

    let timer: Arc<dyn Timer> = ThreadTimer::shared()?;
    let mut host = HeadlessHost::new(timer);
    let window = host.add_window(Rectangle {
        x: 0.0,
        y: 0.0,
        width: 1280.0,
        height: 720.0,
    });
    let mut toaster = Toaster::new(host)?;

    let text = args.text.unwrap_or_else(|| "Hello".to_string());
    for n in 1..=args.count {
        let toast = Toast::text(format!("{text} {n}/{}", args.count), duration);
        toaster.request_show(toast, Target::Window(window))?;
    }
    log::info!(
        "{} toast(s) submitted, {} waiting",
        args.count,
        toaster.queued_count()
    );

    while !toaster.is_idle() {
        toaster.handle_next(POLL_INTERVAL);
    }
    Ok(())
}
