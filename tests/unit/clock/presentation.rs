use super::*;
use crate::clock::time_base::ManualTimeBase;
use parking_lot::Condvar;
use std::sync::atomic::AtomicI64;
use std::time::Duration;

fn clock() -> (Arc<ManualTimeBase>, SystemPresentationClock) {
    let tb = Arc::new(ManualTimeBase::new(1_000));
    let clock = SystemPresentationClock::new(tb.clone());
    (tb, clock)
}

fn r(num: i32, den: u32) -> Rational {
    Rational::new(num, den).unwrap()
}

#[test]
fn starts_stopped_at_zero() {
    let (tb, clock) = clock();
    assert_eq!(clock.presentation_time(), 0);
    tb.advance(1_000_000);
    assert_eq!(clock.presentation_time(), 0);
    assert!(clock.speed().is_zero());
}

#[test]
fn advances_at_speed() {
    let (tb, clock) = clock();
    clock.play(Rational::ONE);
    tb.advance(500);
    assert_eq!(clock.presentation_time(), 500);

    clock.play(r(-1, 2));
    tb.advance(100);
    assert_eq!(clock.presentation_time(), 450);
}

#[test]
fn speed_change_keeps_time_continuous() {
    let (tb, clock) = clock();
    clock.play(r(3, 1));
    tb.advance(333);
    let before = clock.presentation_time();
    clock.play(r(1, 7));
    assert_eq!(clock.presentation_time(), before);
    clock.stop();
    assert_eq!(clock.presentation_time(), before);
}

#[test]
fn seek_keeps_speed() {
    let (tb, clock) = clock();
    clock.play(r(2, 1));
    clock.seek(10_000);
    assert_eq!(clock.speed(), r(2, 1));
    assert_eq!(clock.presentation_time(), 10_000);
    tb.advance(10);
    assert_eq!(clock.presentation_time(), 10_020);
}

#[test]
fn fractional_speed_rounds_down() {
    let snap = ClockSnapshot {
        base_time: 0,
        seek_time: 0,
        speed: r(1, 3),
    };
    assert_eq!(snap.time_at(2), 0);
    assert_eq!(snap.time_at(3), 1);
    assert_eq!(snap.time_at(-1), -1);
}

#[test]
fn system_time_for_inverts_time_at() {
    let snap = ClockSnapshot {
        base_time: 100,
        seek_time: 5_000,
        speed: r(2, 3),
    };
    for target in [5_000i64, 5_001, 5_777, 6_000] {
        let sys = snap.system_time_for(target).unwrap();
        assert!(snap.time_at(sys) >= target, "target {target}");
        assert!(snap.time_at(sys - 1) < target, "target {target}");
    }

    let reverse = ClockSnapshot {
        speed: r(-1, 1),
        ..snap
    };
    let sys = reverse.system_time_for(4_000).unwrap();
    assert_eq!(reverse.time_at(sys), 4_000);

    let stopped = ClockSnapshot {
        speed: Rational::ZERO,
        ..snap
    };
    assert_eq!(stopped.system_time_for(0), None);
}

#[test]
fn callbacks_fire_in_order_with_event_data() {
    let (tb, clock) = clock();
    let log = Arc::new(Mutex::new(Vec::<(usize, ClockEvent)>::new()));
    for idx in 0..2 {
        let log = Arc::clone(&log);
        clock.subscribe(Arc::new(move |e: &ClockEvent| log.lock().push((idx, *e))));
    }

    clock.play(Rational::ONE);
    tb.advance(40);
    clock.seek(7);
    clock.set(r(-2, 1), 99);

    let log = log.lock();
    let kinds: Vec<_> = log.iter().map(|(i, e)| (*i, e.kind)).collect();
    assert_eq!(
        kinds,
        vec![
            (0, ClockEventKind::SpeedChange),
            (1, ClockEventKind::SpeedChange),
            (0, ClockEventKind::Seek),
            (1, ClockEventKind::Seek),
            (0, ClockEventKind::Set),
            (1, ClockEventKind::Set),
        ]
    );
    assert_eq!(log[2].1.time, 7);
    assert_eq!(log[2].1.speed, Rational::ONE);
    assert_eq!(log[4].1.speed, r(-2, 1));
}

#[test]
fn callbacks_may_query_the_clock() {
    let (_tb, clock) = clock();
    let clock = Arc::new(clock);
    let seen = Arc::new(Mutex::new(None));
    {
        let weak = Arc::downgrade(&clock);
        let seen = Arc::clone(&seen);
        clock.subscribe(Arc::new(move |_e: &ClockEvent| {
            if let Some(c) = weak.upgrade() {
                *seen.lock() = Some(c.presentation_time());
            }
        }));
    }
    clock.seek(1234);
    assert_eq!(*seen.lock(), Some(1234));
}

#[test]
fn unsubscribe_stops_delivery() {
    let (_tb, clock) = clock();
    let count = Arc::new(AtomicU64::new(0));
    let handle = {
        let count = Arc::clone(&count);
        clock.subscribe(Arc::new(move |_e: &ClockEvent| {
            count.fetch_add(1, Ordering::SeqCst);
        }))
    };
    clock.seek(1);
    assert!(clock.unsubscribe(handle));
    assert!(!clock.unsubscribe(handle));
    clock.seek(2);
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[derive(Default)]
struct Gate {
    armed: bool,
    held: bool,
    open: bool,
}

/// Time base that can park the next reader until released.
struct GatedTimeBase {
    now: AtomicI64,
    gate: Mutex<Gate>,
    cv: Condvar,
}

impl GatedTimeBase {
    fn new(now: i64) -> Self {
        Self {
            now: AtomicI64::new(now),
            gate: Mutex::new(Gate::default()),
            cv: Condvar::new(),
        }
    }

    fn arm(&self) {
        self.gate.lock().armed = true;
    }

    fn wait_held(&self) {
        let mut g = self.gate.lock();
        while !g.held {
            self.cv.wait(&mut g);
        }
    }

    fn release(&self) {
        self.gate.lock().open = true;
        self.cv.notify_all();
    }
}

impl TimeBase for GatedTimeBase {
    fn now_ns(&self) -> i64 {
        let now = self.now.load(Ordering::SeqCst);
        let mut g = self.gate.lock();
        if g.armed {
            g.armed = false;
            g.held = true;
            self.cv.notify_all();
            while !g.open {
                self.cv.wait(&mut g);
            }
        }
        now
    }
}

#[test]
fn concurrent_speed_changes_keep_time_continuous() {
    let tb = Arc::new(GatedTimeBase::new(100));
    let clock = Arc::new(SystemPresentationClock::new(tb.clone()));
    clock.play(Rational::ONE);

    tb.arm();
    let first = {
        let clock = Arc::clone(&clock);
        std::thread::spawn(move || clock.play(Rational::ONE))
    };
    tb.wait_held();

    tb.now.store(110, Ordering::SeqCst);
    let second = {
        let clock = Arc::clone(&clock);
        std::thread::spawn(move || clock.play(r(2, 1)))
    };
    std::thread::sleep(Duration::from_millis(10));
    tb.release();
    first.join().unwrap();
    second.join().unwrap();

    assert_eq!(clock.speed(), r(2, 1));
    assert_eq!(clock.presentation_time(), 10);
    tb.now.store(115, Ordering::SeqCst);
    assert_eq!(clock.presentation_time(), 20);
}
