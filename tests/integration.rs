// SPDX-License-Identifier: MPL-2.0
use std::sync::Arc;
use std::time::Duration;

use iced_core::{Rectangle, Size};
use toast_relay::headless::{HeadlessHost, HostEvent, WindowId};
use toast_relay::scheduler::Scheduler;
use toast_relay::timer::{ManualTimer, ThreadTimer, Timer};
use toast_relay::{Error, Target, Toast, ToastDuration, ToastState, Toaster};

fn toaster(timer: &Arc<ManualTimer>, scheduler: Scheduler) -> (Toaster<HeadlessHost>, WindowId) {
    let mut host = HeadlessHost::new(Arc::clone(timer) as Arc<dyn Timer>);
    let window = host.add_window(Rectangle {
        x: 0.0,
        y: 0.0,
        width: 1024.0,
        height: 768.0,
    });
    let toaster = Toaster::with_parts(host, scheduler, Arc::clone(timer) as Arc<dyn Timer>);
    (toaster, window)
}

fn toast(text: &str, millis: u64) -> Toast<String> {
    Toast::text(text, ToastDuration::from_millis(millis).expect("positive duration"))
        .with_fade_in(Duration::from_millis(600))
        .with_fade_out(Duration::from_millis(300))
        .with_content_opacity(0.9)
}

fn step(timer: &ManualTimer, toaster: &mut Toaster<HeadlessHost>, millis: u64) {
    for _ in 0..millis {
        timer.advance(Duration::from_millis(1));
        toaster.process_pending();
    }
}

#[test]
fn test_toasts_are_shown_one_at_a_time_in_order() {
    let timer = Arc::new(ManualTimer::new());
    let (mut toaster, window) = toaster(&timer, Scheduler::new());

    let ids: Vec<_> = ["a", "b", "c"]
        .into_iter()
        .map(|text| {
            toaster
                .request_show(toast(text, 1000), Target::Window(window))
                .expect("window is open")
        })
        .collect();
    assert_eq!(toaster.queued_count(), 2);

    // Each toast occupies the slot for 1000 ms plus a 300 ms fade-out.
    step(&timer, &mut toaster, 3 * 1300);
    assert!(toaster.is_idle());

    let shown: Vec<_> = toaster
        .host()
        .events()
        .iter()
        .filter_map(|event| match event {
            HostEvent::Shown { id, .. } => Some(*id),
            _ => None,
        })
        .collect();
    assert_eq!(shown, ids);

    // Every show is preceded by the previous hide.
    let mut on_screen = 0;
    for event in toaster.host().events() {
        match event {
            HostEvent::Shown { .. } => on_screen += 1,
            HostEvent::Hidden(_) => on_screen -= 1,
            _ => {}
        }
        assert!(on_screen <= 1);
    }
}

#[test]
fn test_hide_from_visible_reaches_idle_and_admits_next() {
    let timer = Arc::new(ManualTimer::new());
    let (mut toaster, window) = toaster(&timer, Scheduler::new());

    let first = toaster
        .request_show(toast("first", 4000), Target::Window(window))
        .expect("window is open");
    let second = toaster
        .request_show(toast("second", 4000), Target::Window(window))
        .expect("window is open");

    step(&timer, &mut toaster, 1000);
    assert_eq!(toaster.state(first), ToastState::Visible);

    toaster.hide(first);
    step(&timer, &mut toaster, 300);
    assert_eq!(toaster.state(first), ToastState::Idle);
    assert_eq!(toaster.state(second), ToastState::FadingIn);
}

#[test]
fn test_resize_recenters_shown_toast() {
    let timer = Arc::new(ManualTimer::new());
    let (mut toaster, window) = toaster(&timer, Scheduler::new());
    let id = toaster
        .request_show(toast("resizing", 2000), Target::Window(window))
        .expect("window is open");

    toaster.host_mut().set_content_size(Size::new(100.0, 20.0));
    assert!(toaster.sender().resized(id, Size::new(100.0, 20.0)));
    toaster.process_pending();

    let popup = toaster.host().popup(id).expect("toast is shown");
    assert_eq!(popup.at, iced_core::Point::new(462.0, 374.0));
}

#[test]
fn test_closed_window_is_rejected() {
    let timer = Arc::new(ManualTimer::new());
    let (mut toaster, window) = toaster(&timer, Scheduler::new());
    toaster.host_mut().close_window(window);

    let result = toaster.request_show(toast("late", 2000), Target::Window(window));
    assert!(matches!(result, Err(Error::UnresolvableTarget(_))));
}

#[test]
fn test_thread_timer_drives_real_lifecycle() {
    let timer: Arc<dyn Timer> = Arc::new(ThreadTimer::spawn().expect("timer thread starts"));
    let mut host = HeadlessHost::new(Arc::clone(&timer));
    let window = host.add_window(Rectangle {
        x: 0.0,
        y: 0.0,
        width: 640.0,
        height: 480.0,
    });
    let mut toaster = Toaster::with_parts(host, Scheduler::new(), timer);

    let quick = |text: &str| {
        Toast::text(text, ToastDuration::from_millis(20).expect("positive duration"))
            .with_fade_in(Duration::from_millis(5))
            .with_fade_out(Duration::from_millis(5))
    };
    toaster
        .request_show(quick("one"), Target::Window(window))
        .expect("window is open");
    toaster
        .request_show(quick("two"), Target::Window(window))
        .expect("window is open");

    let deadline = std::time::Instant::now() + Duration::from_secs(5);
    while !toaster.is_idle() && std::time::Instant::now() < deadline {
        toaster.handle_next(Duration::from_millis(50));
    }
    assert!(toaster.is_idle());
    assert_eq!(toaster.host().on_screen(), 0);
    assert!(!toaster.scheduler().is_showing());
}
