use std::sync::{Arc, Barrier};
use std::thread;

use llist::{List, ListError, Position, SortOrder};
use rstest::rstest;

const THREADS: usize = 4;
const PER_THREAD: usize = 500;

fn numbers(concurrent: bool) -> List<usize> {
    List::builder().ordered().concurrent(concurrent).build()
}

#[rstest]
#[case::local(false)]
#[case::shared(true)]
fn scenario_add_find_delete(#[case] concurrent: bool) {
    let list = numbers(concurrent);
    for i in 1..=5 {
        list.add_node(i, Position::Front).unwrap();
    }
    assert_eq!(list.to_vec().unwrap(), vec![5, 4, 3, 2, 1]);
    assert_eq!(list.find_node(&3).map(|e| *e), Ok(3));
    assert_eq!(list.find_node(&99).err(), Some(ListError::NodeNotFound));
    assert_eq!(list.delete_node(&3), Ok(3));
    assert_eq!(list.to_vec().unwrap(), vec![5, 4, 2, 1]);
    assert_eq!(list.size(), Ok(4));
}

#[rstest]
#[case::local(false)]
#[case::shared(true)]
fn scenario_sort_both_ways(#[case] concurrent: bool) {
    let list = numbers(concurrent);
    list.extend_from([3, 2, 1, 4, 5]).unwrap();
    list.sort(SortOrder::Ascending).unwrap();
    assert_eq!(list.to_vec().unwrap(), vec![1, 2, 3, 4, 5]);
    list.sort(SortOrder::Descending).unwrap();
    assert_eq!(list.to_vec().unwrap(), vec![5, 4, 3, 2, 1]);
}

#[rstest]
#[case::local(false)]
#[case::shared(true)]
fn scenario_stack(#[case] concurrent: bool) {
    let list = numbers(concurrent);
    for i in 0..1000 {
        list.push(i).unwrap();
    }
    for i in (0..1000).rev() {
        assert_eq!(list.pop(), Ok(Some(i)));
    }
    assert_eq!(list.pop(), Ok(None));
}

#[rstest]
#[case::local(false)]
#[case::shared(true)]
fn scenario_concat(#[case] concurrent: bool) {
    let a = numbers(concurrent);
    let b = numbers(concurrent);
    a.extend_from([1, 2]).unwrap();
    b.extend_from([3, 4]).unwrap();
    a.concat(&b).unwrap();
    assert_eq!(a.to_vec().unwrap(), vec![1, 2, 3, 4]);
    assert_eq!(b.is_empty(), Ok(true));
    assert_eq!(a.concat(&a), Err(ListError::SameList));
}

#[rstest]
#[case::local(false)]
#[case::shared(true)]
fn readers_share_the_list(#[case] concurrent: bool) {
    let list = numbers(concurrent);
    list.extend_from([1, 2, 3]).unwrap();
    let head = list.get_head().unwrap().unwrap();
    let max = list.get_max().unwrap();
    let view = list.view().unwrap();
    assert_eq!((*head, *max, view.len()), (1, 3, 3));
}

#[test]
fn local_list_refuses_overlapping_writes() {
    let list = numbers(false);
    list.extend_from([1, 2, 3]).unwrap();

    let view = list.view().unwrap();
    assert_eq!(list.push(0), Err(ListError::MultithreadIssue));
    assert_eq!(list.sort(SortOrder::Descending), Err(ListError::MultithreadIssue));
    assert_eq!(list.delete_node(&1), Err(ListError::MultithreadIssue));
    drop(view);

    let other = numbers(false);
    let mut results = Vec::new();
    list.for_each(|_| results.push(other.concat(&list))).unwrap();
    assert!(results.iter().all(|r| *r == Err(ListError::MultithreadIssue)));
    assert_eq!(list.size(), Ok(3));
    assert_eq!(other.size(), Ok(0));
}

#[test]
fn local_list_moves_between_threads() {
    let list = numbers(false);
    list.extend_from(0..10).unwrap();
    let list = thread::spawn(move || {
        list.reverse().unwrap();
        list
    })
    .join()
    .unwrap();
    assert_eq!(list.pop(), Ok(Some(9)));
}

#[test]
fn stress_concurrent_push() {
    let list = Arc::new(numbers(true));
    let barrier = Arc::new(Barrier::new(THREADS));

    thread::scope(|s| {
        for t in 0..THREADS {
            let list = Arc::clone(&list);
            let barrier = Arc::clone(&barrier);
            s.spawn(move || {
                barrier.wait();
                for i in 0..PER_THREAD {
                    let position = if i % 2 == 0 { Position::Front } else { Position::Rear };
                    list.add_node(t * PER_THREAD + i, position).unwrap();
                }
            });
        }
    });

    assert_eq!(list.size(), Ok(THREADS * PER_THREAD));
    list.sort(SortOrder::Ascending).unwrap();
    assert_eq!(list.to_vec().unwrap(), (0..THREADS * PER_THREAD).collect::<Vec<_>>());
}

#[test]
fn stress_producer_consumer() {
    let list = Arc::new(numbers(true));
    let barrier = Arc::new(Barrier::new(THREADS * 2));

    let consumed: Vec<usize> = thread::scope(|s| {
        for t in 0..THREADS {
            let list = Arc::clone(&list);
            let barrier = Arc::clone(&barrier);
            s.spawn(move || {
                barrier.wait();
                for i in 0..PER_THREAD {
                    list.push(t * PER_THREAD + i).unwrap();
                }
            });
        }
        let consumers: Vec<_> = (0..THREADS)
            .map(|_| {
                let list = Arc::clone(&list);
                let barrier = Arc::clone(&barrier);
                s.spawn(move || {
                    barrier.wait();
                    let mut popped = Vec::new();
                    while popped.len() < PER_THREAD {
                        if let Some(element) = list.pop().unwrap() {
                            popped.push(element);
                        } else {
                            thread::yield_now();
                        }
                    }
                    popped
                })
            })
            .collect();
        consumers
            .into_iter()
            .flat_map(|consumer| consumer.join().unwrap())
            .collect()
    });

    assert_eq!(list.is_empty(), Ok(true));
    let mut consumed = consumed;
    consumed.sort_unstable();
    assert_eq!(consumed, (0..THREADS * PER_THREAD).collect::<Vec<_>>());
}

#[test]
fn stress_concat_both_directions() {
    let a = Arc::new(numbers(true));
    let b = Arc::new(numbers(true));
    let barrier = Arc::new(Barrier::new(2));
    const ROUNDS: usize = 200;

    thread::scope(|s| {
        for (into, from) in [(&a, &b), (&b, &a)] {
            let into = Arc::clone(into);
            let from = Arc::clone(from);
            let barrier = Arc::clone(&barrier);
            s.spawn(move || {
                barrier.wait();
                for i in 0..ROUNDS {
                    from.push(i).unwrap();
                    into.concat(&from).unwrap();
                }
            });
        }
    });

    assert_eq!(a.size().unwrap() + b.size().unwrap(), 2 * ROUNDS);
}

#[test]
fn stress_readers_and_abort() {
    let list = Arc::new(numbers(true));
    list.extend_from(0..PER_THREAD).unwrap();
    let barrier = Arc::new(Barrier::new(THREADS + 1));

    thread::scope(|s| {
        for _ in 0..THREADS {
            let list = Arc::clone(&list);
            let barrier = Arc::clone(&barrier);
            s.spawn(move || {
                barrier.wait();
                loop {
                    let mut sum = 0;
                    match list.for_each_with_argument(|e, sum| *sum += e, &mut sum) {
                        Ok(()) => assert_eq!(sum, PER_THREAD * (PER_THREAD - 1) / 2),
                        Err(error) => {
                            assert_eq!(error, ListError::IterationsAborted);
                            break;
                        }
                    }
                }
            });
        }
        barrier.wait();
        list.abort_iterations();
    });

    assert!(list.is_aborted());
    list.reset_abort();
    assert_eq!(list.for_each(|_| {}), Ok(()));
}
