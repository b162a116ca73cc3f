use std::cell::Cell;
use std::rc::Rc;

use distkit::progress::Progress;

fn ticking(start: f64) -> (Rc<Cell<f64>>, Progress, u64) {
    let max = 100_000;
    let time = Rc::new(Cell::new(start));
    let handle = Rc::clone(&time);
    let progress = Progress::with_clock(0, Some(max), Box::new(move || handle.get()));
    (time, progress, max)
}

#[test]
fn tracks_percentage_eta_and_speed() {
    let (time, mut progress, _max) = ticking(0.0);
    progress.start();

    time.set(1.0);
    progress.update(10_000);
    assert_eq!(progress.value(), 10_000);
    assert_eq!(progress.percentage(), " 10 %");
    assert_eq!(progress.eta(), "ETA : 00:00:09");
    assert_eq!(progress.speed(), "10 KB/s");
}

#[test]
fn stop_snaps_to_the_maximum() {
    let (time, mut progress, max) = ticking(0.0);
    progress.start();

    time.set(1.0);
    progress.update(10_000);
    time.set(2.0);
    progress.stop();

    assert_eq!(progress.value(), max);
    assert_eq!(progress.percentage(), "100 %");
    assert_eq!(progress.eta(), "Done: 00:00:02");
    assert_eq!(progress.speed(), "50 KB/s");
}

#[test]
fn update_clamps_to_the_bounds() {
    let (time, mut progress, max) = ticking(0.0);
    progress.start();

    time.set(1.0);
    progress.update(2 * max);
    assert_eq!(progress.value(), max);

    let time = Rc::new(Cell::new(0.0));
    let handle = Rc::clone(&time);
    let mut progress = Progress::with_clock(10, None, Box::new(move || handle.get()));
    progress.start();
    progress.update(5);
    assert_eq!(progress.value(), 10);
}

#[test]
fn increments_accumulate() {
    let (time, mut progress, _max) = ticking(0.0);
    progress.start();

    time.set(1.0);
    progress.increment(4_000);
    progress.increment(6_000);
    assert_eq!(progress.value(), 10_000);
    assert_eq!(progress.percentage(), " 10 %");
}

#[test]
fn unknown_maximum_has_unknown_percentage_and_eta() {
    let time = Rc::new(Cell::new(0.0));
    let handle = Rc::clone(&time);
    let mut progress = Progress::with_clock(0, None, Box::new(move || handle.get()));
    progress.start();

    time.set(1.0);
    progress.update(19_000);
    assert_eq!(progress.percentage(), " ?? %");
    assert_eq!(progress.eta(), "ETA : ??:??:??");
    assert_eq!(progress.speed(), "19 KB/s");
}

#[test]
fn an_empty_range_is_immediately_complete() {
    let mut progress = Progress::new(0, Some(0));
    progress.start();
    assert_eq!(progress.percentage(), "100 %");
}

#[test]
fn speed_scales_through_the_units() {
    let time = Rc::new(Cell::new(0.0));
    let handle = Rc::clone(&time);
    let mut progress = Progress::with_clock(0, None, Box::new(move || handle.get()));
    progress.start();

    time.set(1.0);
    progress.update(999);
    assert_eq!(progress.speed(), "999 B/s");

    time.set(1.0);
    progress.update(2_500_000);
    assert_eq!(progress.speed(), "2 MB/s");
}
