use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam::channel::{unbounded, RecvTimeoutError};

use chilli_bowl::{MenuItem, Order, OrderQueue, WorkItem};

fn wait_until(what: &str, mut condition: impl FnMut() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !condition() {
        assert!(Instant::now() < deadline, "timed out waiting for {what}");
        thread::sleep(Duration::from_millis(1));
    }
}

#[test]
fn five_parked_cooks_one_order() {
    let queue = Arc::new(OrderQueue::open(4, 1).unwrap());
    let (tx, rx) = unbounded();

    let cooks: Vec<_> = (0..5)
        .map(|_| {
            let queue = Arc::clone(&queue);
            let tx = tx.clone();
            thread::spawn(move || {
                let taken = queue.take().map(WorkItem::into_payload);
                tx.send(taken).unwrap();
            })
        })
        .collect();
    drop(tx);

    wait_until("all cooks to park", || queue.stats().waiting_consumers == 5);
    queue.submit(Order::new(0, MenuItem::HalfSmoke));

    assert_eq!(
        rx.recv_timeout(Duration::from_secs(5)).unwrap(),
        Some(Order::new(0, MenuItem::HalfSmoke))
    );
    // The other four are still parked until the broadcast.
    assert_eq!(
        rx.recv_timeout(Duration::from_millis(50)),
        Err(RecvTimeoutError::Timeout)
    );
    assert_eq!(queue.stats().waiting_consumers, 4);

    queue.close_production();

    let rest: Vec<_> = rx.iter().collect();
    assert_eq!(rest, vec![None; 4]);
    for cook in cooks {
        cook.join().unwrap();
    }

    let queue = Arc::try_unwrap(queue).ok().unwrap();
    assert!(queue.close().is_drained());
}

#[test]
fn drained_queue_releases_parked_cook_without_close_production() {
    let queue = Arc::new(OrderQueue::open(4, 1).unwrap());
    let (tx, rx) = unbounded();

    let cooks: Vec<_> = (0..2)
        .map(|_| {
            let queue = Arc::clone(&queue);
            let tx = tx.clone();
            thread::spawn(move || {
                let taken = queue.take().map(WorkItem::into_payload);
                tx.send(taken).unwrap();
            })
        })
        .collect();
    drop(tx);

    wait_until("both cooks to park", || queue.stats().waiting_consumers == 2);
    queue.submit(Order::new(3, MenuItem::Cake));
    wait_until("the order to be handled", || queue.stats().handled == 1);
    assert_eq!(
        rx.recv_timeout(Duration::from_secs(5)).unwrap(),
        Some(Order::new(3, MenuItem::Cake))
    );
    assert_eq!(queue.stats().waiting_consumers, 1);

    // A late cook finds the queue drained and wakes the one still parked.
    assert!(queue.take().is_none());

    assert_eq!(rx.recv_timeout(Duration::from_secs(2)), Ok(None));
    for cook in cooks {
        cook.join().unwrap();
    }
    assert!(!queue.stats().production_closed);
}

#[test]
fn exhausted_queue_answers_every_late_cook() {
    let queue = Arc::new(OrderQueue::open(2, 2).unwrap());
    queue.submit(1);
    queue.submit(2);
    assert!(queue.take().is_some());
    assert!(queue.take().is_some());
    queue.close_production();

    let late: Vec<_> = (0..8)
        .map(|_| {
            let queue = Arc::clone(&queue);
            thread::spawn(move || queue.take())
        })
        .collect();

    for cook in late {
        assert!(cook.join().unwrap().is_none());
    }
}

#[test]
fn many_customers_many_cooks_lose_nothing() {
    const CUSTOMERS: usize = 12;
    const PER_CUSTOMER: usize = 25;
    const COOKS: usize = 5;

    let queue = Arc::new(OrderQueue::open(3, (CUSTOMERS * PER_CUSTOMER) as u64).unwrap());
    let (tx, rx) = unbounded();

    let customers: Vec<_> = (0..CUSTOMERS)
        .map(|customer_id| {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
                for n in 0..PER_CUSTOMER {
                    let item = MenuItem::ALL[n % MenuItem::ALL.len()];
                    queue.submit(Order::new(customer_id, item));
                }
            })
        })
        .collect();

    let cooks: Vec<_> = (0..COOKS)
        .map(|_| {
            let queue = Arc::clone(&queue);
            let tx = tx.clone();
            thread::spawn(move || {
                while let Some(work) = queue.take() {
                    assert!(queue.len() <= queue.capacity());
                    tx.send(work).unwrap();
                }
            })
        })
        .collect();
    drop(tx);

    for customer in customers {
        customer.join().unwrap();
    }
    queue.close_production();
    for cook in cooks {
        cook.join().unwrap();
    }

    let mut sequence_numbers: Vec<_> = rx.iter().map(|work| work.sequence_number()).collect();
    sequence_numbers.sort_unstable();
    let expected: Vec<u64> = (0..(CUSTOMERS * PER_CUSTOMER) as u64).collect();
    assert_eq!(sequence_numbers, expected);

    let queue = Arc::try_unwrap(queue).ok().unwrap();
    let stats = queue.close();
    assert_eq!(stats.handled, (CUSTOMERS * PER_CUSTOMER) as u64);
}

#[test]
fn single_cook_sees_fifo_order_across_customers() {
    let queue = Arc::new(OrderQueue::open(2, 40).unwrap());

    let customers: Vec<_> = (0..4)
        .map(|customer_id| {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
                for _ in 0..10 {
                    queue.submit(customer_id);
                }
            })
        })
        .collect();

    let mut last = None;
    let mut count = 0;
    while let Some(work) = queue.take() {
        if let Some(previous) = last {
            assert!(work.sequence_number() > previous);
        }
        last = Some(work.sequence_number());
        count += 1;
    }
    assert_eq!(count, 40);

    for customer in customers {
        customer.join().unwrap();
    }
}
