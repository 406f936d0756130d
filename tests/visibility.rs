#[cfg(loom)]
use loom::sync::Arc;
#[cfg(loom)]
use loom::thread;

#[cfg(not(loom))]
use proptest::prelude::*;
#[cfg(not(loom))]
use std::sync::Arc;
#[cfg(not(loom))]
use std::thread;
#[cfg(not(loom))]
use std::time::{Duration, Instant};

use volatile_transient::visibility::reader_loop;
use volatile_transient::{RecordingSink, SharedCounter, StopSignal};
#[cfg(not(loom))]
use volatile_transient::{ProgressEvent, VisibilityConfig, VisibilityDemo};

#[cfg(loom)]
#[test]
fn loom_final_increment_visible_to_reader() {
    loom::model(|| {
        let counter = Arc::new(SharedCounter::new());
        let done = Arc::new(StopSignal::new());

        let writer = thread::spawn({
            let counter = counter.clone();
            let done = done.clone();
            move || {
                counter.increment();
                counter.increment();
                done.stop();
            }
        });

        let sink = RecordingSink::new();
        let stats = reader_loop(&counter, &sink, &done);
        writer.join().unwrap();

        assert_eq!(stats.last_seen, 2);
        assert!(sink.observations().iter().all(|value| *value <= 2));
    });
}

#[cfg(not(loom))]
fn assert_reader_caught_up(sink: &RecordingSink, expected_last: u64) {
    let observations = sink.observations();
    assert!(
        observations.windows(2).all(|pair| pair[0] < pair[1]),
        "reader went backwards: {observations:?}"
    );
    // Empty when the writer finished before the reader took its baseline.
    if let Some(last) = observations.last() {
        assert_eq!(*last, expected_last);
    }
}

#[cfg(not(loom))]
#[test]
fn bounded_run_reader_sees_final_increment() {
    let sink = Arc::new(RecordingSink::new());
    let config = VisibilityConfig::bounded(5).with_interval(Duration::from_millis(2));

    let report = VisibilityDemo::spawn(config, sink.clone())
        .unwrap()
        .join()
        .unwrap();

    assert_eq!(report.writer.increments, 5);
    assert_eq!(report.final_value, 5);
    assert_eq!(report.reader.last_seen, 5);
    assert_eq!(sink.increments(), vec![1, 2, 3, 4, 5]);
    assert_reader_caught_up(&sink, 5);
}

#[cfg(not(loom))]
#[test]
fn reader_sees_second_increment_before_third() {
    let sink = Arc::new(RecordingSink::new());
    let config = VisibilityConfig::bounded(3).with_interval(Duration::from_millis(100));

    let report = VisibilityDemo::spawn(config, sink.clone())
        .unwrap()
        .join()
        .unwrap();
    assert_eq!(report.writer.increments, 3);

    let events = sink.events();
    let position = |wanted: ProgressEvent| events.iter().position(|event| *event == wanted);
    let seen_two = position(ProgressEvent::Observed(2)).expect("reader never reported 2");
    let third = position(ProgressEvent::Incremented(3)).expect("writer never reached 3");
    assert!(seen_two < third, "events: {events:?}");
}

#[cfg(not(loom))]
#[test]
fn interrupted_pause_does_not_stop_writer() {
    let interval = Duration::from_millis(300);
    let sink = Arc::new(RecordingSink::new());
    let config = VisibilityConfig::bounded(4).with_interval(interval);

    let started = Instant::now();
    let demo = VisibilityDemo::spawn(config, sink.clone()).unwrap();

    // One interrupt per pause, each sent after the matching increment.
    for increments in 1..=3 {
        while demo.counter().load() < increments {
            thread::yield_now();
        }
        demo.interrupt_writer();
    }

    let report = demo.join().unwrap();
    let elapsed = started.elapsed();

    assert_eq!(report.writer.increments, 4);
    assert_eq!(report.writer.interruptions, 3);
    assert_eq!(report.reader.last_seen, 4);
    assert_eq!(sink.increments(), vec![1, 2, 3, 4]);
    // Four full pauses would take four intervals; only the last one ran out.
    assert!(elapsed < interval * 4, "run took {elapsed:?}");
}

#[cfg(not(loom))]
#[test]
fn cancel_ends_unbounded_run_without_losing_last_value() {
    let sink = Arc::new(RecordingSink::new());
    let config = VisibilityConfig::default().with_interval(Duration::from_millis(5));
    let demo = VisibilityDemo::spawn(config, sink.clone()).unwrap();

    let deadline = Instant::now() + Duration::from_secs(10);
    while demo.counter().load() < 3 && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(1));
    }
    demo.cancel();

    let report = demo.join().unwrap();
    assert!(report.writer.increments >= 3);
    assert_eq!(report.final_value, report.writer.increments);
    assert_eq!(report.reader.last_seen, report.final_value);
    assert_reader_caught_up(&sink, report.final_value);
}

#[cfg(not(loom))]
#[test]
fn reader_alone_returns_once_writer_is_done() {
    let counter = SharedCounter::new();
    let done = StopSignal::new();
    let sink = RecordingSink::new();
    done.stop();

    let stats = reader_loop(&counter, &sink, &done);
    assert_eq!(stats.last_seen, 0);
    assert!(sink.events().is_empty());
}

#[cfg(not(loom))]
proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn reader_last_value_matches_writer(increments in 1u64..200) {
        let sink = Arc::new(RecordingSink::new());
        let config = VisibilityConfig::bounded(increments).with_interval(Duration::ZERO);

        let report = VisibilityDemo::spawn(config, sink.clone())
            .unwrap()
            .join()
            .unwrap();

        prop_assert_eq!(report.writer.increments, increments);
        prop_assert_eq!(report.final_value, increments);
        prop_assert_eq!(report.reader.last_seen, increments);
        prop_assert_eq!(sink.increments().len() as u64, increments);
    }
}
