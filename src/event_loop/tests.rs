// src/event_loop/tests.rs

use super::*;
use crate::color::Color;
use crate::ops::{green_fill, operation_fn, white_fill, Update};
use crate::surface::{Point, Rect};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

type FillLog = Arc<Mutex<Vec<Color>>>;

/// Records the color of every fill instead of keeping pixels.
struct RecordingSurface {
    log: FillLog,
}

impl Surface for RecordingSurface {
    fn size(&self) -> Size {
        DEFAULT_SURFACE_SIZE
    }

    fn fill(&mut self, _rect: Rect, color: Color) {
        self.log.lock().unwrap().push(color);
    }

    fn pixel(&self, _p: Point) -> Option<Color> {
        self.log.lock().unwrap().last().copied()
    }
}

struct RecordingProvider {
    log: FillLog,
}

impl SurfaceProvider for RecordingProvider {
    fn new_surface(&self, _size: Size) -> Result<Box<dyn Surface>> {
        Ok(Box::new(RecordingSurface {
            log: self.log.clone(),
        }))
    }
}

struct FailingProvider;

impl SurfaceProvider for FailingProvider {
    fn new_surface(&self, _size: Size) -> Result<Box<dyn Surface>> {
        bail!("no display available")
    }
}

/// Keeps a copy of the fill log as it was at each readiness notification.
struct RecordingReceiver {
    log: FillLog,
    snapshots: Mutex<Vec<Vec<Color>>>,
}

impl RecordingReceiver {
    fn new(log: FillLog) -> Arc<Self> {
        Arc::new(Self {
            log,
            snapshots: Mutex::new(Vec::new()),
        })
    }

    fn snapshots(&self) -> Vec<Vec<Color>> {
        self.snapshots.lock().unwrap().clone()
    }
}

impl Receiver for RecordingReceiver {
    fn on_ready(&self, _surface: &dyn Surface) {
        let current = self.log.lock().unwrap().clone();
        self.snapshots.lock().unwrap().push(current);
    }
}

fn started_loop() -> (Loop, Arc<RecordingReceiver>, FillLog) {
    let log = FillLog::default();
    let receiver = RecordingReceiver::new(log.clone());
    let painter_loop = Loop::new(receiver.clone());
    painter_loop
        .start(&RecordingProvider { log: log.clone() })
        .expect("loop should start");
    (painter_loop, receiver, log)
}

#[test_log::test]
fn post_applies_operations_and_notifies_on_update() {
    let (painter_loop, receiver, log) = started_loop();

    painter_loop.post(operation_fn(white_fill));
    painter_loop.post(operation_fn(green_fill));
    painter_loop.post(Box::new(Update));

    let producers: Vec<_> = (0..3)
        .map(|_| {
            let handle = painter_loop.handle();
            thread::spawn(move || handle.post(operation_fn(green_fill)))
        })
        .collect();
    for producer in producers {
        producer.join().unwrap();
    }

    painter_loop.stop_and_wait();

    assert_eq!(receiver.snapshots(), vec![vec![Color::WHITE, Color::GREEN]]);
    let fills = log.lock().unwrap().clone();
    assert_eq!(fills.len(), 5);
    assert_eq!(fills[0], Color::WHITE);
    assert!(fills[1..].iter().all(|c| *c == Color::GREEN));
}

#[test_log::test]
fn nested_posts_run_after_their_poster() {
    let (painter_loop, _receiver, _log) = started_loop();
    let order = Arc::new(Mutex::new(Vec::new()));

    let handle = painter_loop.handle();
    let first_order = order.clone();
    painter_loop.post(operation_fn(move |_: &mut dyn Surface| {
        first_order.lock().unwrap().push("op 1");
        let nested_order = first_order.clone();
        handle.post(operation_fn(move |_: &mut dyn Surface| {
            nested_order.lock().unwrap().push("op 2");
        }));
    }));
    let third_order = order.clone();
    painter_loop.post(operation_fn(move |_: &mut dyn Surface| {
        third_order.lock().unwrap().push("op 3");
    }));

    painter_loop.stop_and_wait();

    // Per-producer FIFO is the only guarantee: whether "op 2" lands before
    // "op 3" depends on when the worker picks up "op 1".
    let order = order.lock().unwrap().clone();
    assert_eq!(order.len(), 3, "every operation must run: {order:?}");
    assert_eq!(order[0], "op 1");
    assert!(order.contains(&"op 2"));
    assert!(order.contains(&"op 3"));
}

#[test_log::test]
fn every_ready_operation_notifies() {
    let (painter_loop, receiver, _log) = started_loop();

    painter_loop.post_all(vec![
        Box::new(Update) as BoxedOperation,
        operation_fn(white_fill),
        Box::new(Update),
        Box::new(Update),
    ]);
    painter_loop.stop_and_wait();

    assert_eq!(
        receiver.snapshots(),
        vec![vec![], vec![Color::WHITE], vec![Color::WHITE]]
    );
}

#[test_log::test]
fn stop_drains_queued_operations() {
    let (painter_loop, _receiver, _log) = started_loop();
    let applied = Arc::new(AtomicUsize::new(0));

    for _ in 0..200 {
        let applied = applied.clone();
        painter_loop.post(operation_fn(move |_: &mut dyn Surface| {
            applied.fetch_add(1, Ordering::SeqCst);
        }));
    }
    painter_loop.stop_and_wait();

    assert_eq!(applied.load(Ordering::SeqCst), 200);
    assert!(painter_loop.is_stopped());
}

#[test_log::test]
fn stop_and_wait_unblocks_an_idle_worker_and_is_idempotent() {
    let (painter_loop, _receiver, _log) = started_loop();
    assert_eq!(painter_loop.state(), LoopState::Running);

    // Let the worker park on the empty queue first.
    thread::sleep(Duration::from_millis(20));
    painter_loop.stop_and_wait();
    assert!(painter_loop.is_stopped());

    painter_loop.stop_and_wait();
    assert_eq!(painter_loop.state(), LoopState::Stopped);
}

#[test_log::test]
fn concurrent_stop_requests_all_return() {
    let (painter_loop, _receiver, _log) = started_loop();
    let painter_loop = Arc::new(painter_loop);

    let stoppers: Vec<_> = (0..4)
        .map(|_| {
            let painter_loop = painter_loop.clone();
            thread::spawn(move || painter_loop.stop_and_wait())
        })
        .collect();
    for stopper in stoppers {
        stopper.join().unwrap();
    }
    assert!(painter_loop.is_stopped());
}

#[test_log::test]
fn stop_without_start_is_immediate() {
    let painter_loop = Loop::new(RecordingReceiver::new(FillLog::default()));
    assert_eq!(painter_loop.state(), LoopState::NotStarted);

    painter_loop.stop_and_wait();
    assert!(painter_loop.is_stopped());
}

#[test_log::test]
fn surface_failure_keeps_loop_not_started() {
    let painter_loop = Loop::new(RecordingReceiver::new(FillLog::default()));

    let err = painter_loop.start(&FailingProvider).unwrap_err();
    assert!(format!("{err:#}").contains("no display available"));
    assert_eq!(painter_loop.state(), LoopState::NotStarted);
}

#[test_log::test]
fn second_start_is_rejected() {
    let (painter_loop, _receiver, log) = started_loop();

    assert!(painter_loop.start(&RecordingProvider { log }).is_err());
    assert_eq!(painter_loop.state(), LoopState::Running);
    painter_loop.stop_and_wait();
}

#[test_log::test]
fn operations_posted_before_start_run_once_started() {
    let log = FillLog::default();
    let receiver = RecordingReceiver::new(log.clone());
    let painter_loop = Loop::new(receiver.clone());

    painter_loop.post(operation_fn(green_fill));
    painter_loop.post(Box::new(Update));
    painter_loop
        .start(&RecordingProvider { log: log.clone() })
        .unwrap();
    painter_loop.stop_and_wait();

    assert_eq!(receiver.snapshots(), vec![vec![Color::GREEN]]);
}

#[test_log::test]
fn panicking_operation_still_completes_shutdown() {
    let (painter_loop, _receiver, _log) = started_loop();

    painter_loop.post(operation_fn(|_: &mut dyn Surface| panic!("broken operation")));
    painter_loop.stop_and_wait();

    assert!(painter_loop.is_stopped());
}

#[test_log::test]
fn dropping_a_running_loop_drains_it() {
    let ran = Arc::new(AtomicBool::new(false));
    {
        let (painter_loop, _receiver, _log) = started_loop();
        let ran = ran.clone();
        painter_loop.post(operation_fn(move |_: &mut dyn Surface| {
            ran.store(true, Ordering::SeqCst);
        }));
    }
    assert!(ran.load(Ordering::SeqCst));
}

#[test_log::test]
fn stop_from_inside_an_operation_does_not_deadlock() {
    let log = FillLog::default();
    let painter_loop = Arc::new(Loop::new(RecordingReceiver::new(log.clone())));
    let returned = Arc::new(AtomicBool::new(false));
    let after_stop = Arc::new(AtomicBool::new(false));

    let inner_loop = painter_loop.clone();
    let inner_returned = returned.clone();
    painter_loop.post(operation_fn(move |_: &mut dyn Surface| {
        inner_loop.stop_and_wait();
        inner_returned.store(true, Ordering::SeqCst);
    }));
    // Queued before the stop request is made, so it still runs.
    let queued_after = after_stop.clone();
    painter_loop.post(operation_fn(move |_: &mut dyn Surface| {
        queued_after.store(true, Ordering::SeqCst);
    }));
    painter_loop.start(&RecordingProvider { log }).unwrap();

    painter_loop.stop_and_wait();
    assert!(returned.load(Ordering::SeqCst));
    assert!(after_stop.load(Ordering::SeqCst));
    assert!(painter_loop.is_stopped());
}
