use std::time::Duration;

use bloodnet_core::{DelayQueue, Scheduled};

#[test]
fn due_tasks_pop_in_deadline_then_insertion_order() {
    let mut queue = DelayQueue::new();
    queue.push(Scheduled::after(Duration::from_secs(3), "c"));
    queue.push(Scheduled::after(Duration::from_secs(1), "a"));
    queue.push(Scheduled::after(Duration::from_secs(1), "b"));

    let deadline = Duration::from_secs(5);
    let order: Vec<_> = std::iter::from_fn(|| queue.pop_due(deadline)).collect();
    assert_eq!(order, ["a", "b", "c"]);
    assert_eq!(queue.elapsed(), Duration::from_secs(3));
}

#[test]
fn cancelled_task_never_runs() {
    let mut queue = DelayQueue::new();
    let keep = queue.push(Scheduled::after(Duration::from_millis(10), 1));
    let dropped = queue.push(Scheduled::after(Duration::from_millis(5), 2));

    assert!(queue.cancel(dropped));
    assert!(!queue.cancel(dropped));
    assert_eq!(queue.pop_due(Duration::from_millis(20)), Some(1));
    assert!(!queue.cancel(keep));
    assert!(queue.is_empty());
}

#[test]
fn tasks_beyond_deadline_stay_pending() {
    let mut queue = DelayQueue::new();
    queue.push(Scheduled::after(Duration::from_secs(30), ()));
    assert_eq!(queue.pop_due(Duration::from_secs(29)), None);
    queue.settle(Duration::from_secs(29));
    assert_eq!(queue.len(), 1);

    queue.push(Scheduled::after(Duration::from_secs(2), ()));
    assert_eq!(queue.pop_due(Duration::from_secs(30)), Some(()));
    assert_eq!(queue.len(), 1);
}

#[test]
fn huge_delays_saturate_instead_of_overflowing() {
    let mut queue = DelayQueue::new();
    queue.push(Scheduled::after(Duration::MAX, "far"));
    queue.settle(Duration::from_secs(10));
    queue.push(Scheduled::after(Duration::MAX, "farther"));

    assert_eq!(queue.len(), 2);
    assert_eq!(queue.pop_due(Duration::MAX), None);
}
