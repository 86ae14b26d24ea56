use llist::{List, ListError, Position, Side, SortOrder};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    AddFront(i32),
    AddRear(i32),
    Push(i32),
    Pop,
    Delete(i32),
    Insert(i32, i32),
    Reverse,
    Sort(bool),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<i32>().prop_map(Op::AddFront),
        any::<i32>().prop_map(Op::AddRear),
        any::<i32>().prop_map(Op::Push),
        Just(Op::Pop),
        (0..8i32).prop_map(Op::Delete),
        (any::<i32>(), 0..8i32).prop_map(|(value, at)| Op::Insert(value, at)),
        Just(Op::Reverse),
        any::<bool>().prop_map(Op::Sort),
    ]
}

fn ordered() -> List<i32> {
    List::builder().ordered().build()
}

/// Keyed elements, compared by key only, so that stability is observable.
fn keyed(input: &[(u8, usize)]) -> List<(u8, usize)> {
    let list = List::builder()
        .comparator(|a: &(u8, usize), b: &(u8, usize)| a.0.cmp(&b.0))
        .build();
    list.extend_from(input.iter().copied()).unwrap();
    list
}

proptest! {
    #[test]
    fn size_tracks_a_model(ops in prop::collection::vec(op(), 0..64)) {
        let list = ordered();
        let mut model = Vec::new();
        for op in ops {
            match op {
                Op::AddFront(value) => {
                    list.add_node(value, Position::Front).unwrap();
                    model.insert(0, value);
                }
                Op::Push(value) => {
                    list.push(value).unwrap();
                    model.insert(0, value);
                }
                Op::AddRear(value) => {
                    list.add_node(value, Position::Rear).unwrap();
                    model.push(value);
                }
                Op::Pop => {
                    let expected = if model.is_empty() { None } else { Some(model.remove(0)) };
                    prop_assert_eq!(list.pop(), Ok(expected));
                }
                Op::Delete(value) => match model.iter().position(|&e| e == value) {
                    Some(index) => {
                        prop_assert_eq!(list.delete_node(&value), Ok(value));
                        model.remove(index);
                    }
                    None => {
                        prop_assert_eq!(list.delete_node(&value), Err(ListError::NodeNotFound));
                    }
                },
                Op::Insert(value, at) => match model.iter().position(|&e| e == at) {
                    Some(index) => {
                        list.insert_node(value, |&e| e == at, Side::After).unwrap();
                        model.insert(index + 1, value);
                    }
                    None => {
                        prop_assert_eq!(
                            list.insert_node(value, |&e| e == at, Side::After),
                            Err(ListError::NodeNotFound)
                        );
                    }
                },
                Op::Reverse => {
                    list.reverse().unwrap();
                    model.reverse();
                }
                Op::Sort(ascending) => {
                    if ascending {
                        list.sort(SortOrder::Ascending).unwrap();
                        model.sort();
                    } else {
                        list.sort(SortOrder::Descending).unwrap();
                        model.sort_by(|a, b| b.cmp(a));
                    }
                }
            }
            prop_assert_eq!(list.size(), Ok(model.len()));
            prop_assert_eq!(list.is_empty(), Ok(model.is_empty()));
            prop_assert_eq!(list.get_head().unwrap().map(|e| *e), model.first().copied());
            prop_assert_eq!(list.get_tail().unwrap().map(|e| *e), model.last().copied());
        }
        prop_assert_eq!(list.to_vec().unwrap(), model);
    }

    #[test]
    fn reverse_is_an_involution(input in prop::collection::vec(any::<i32>(), 0..100)) {
        let list = List::from_iter(input.clone());
        list.reverse().unwrap();
        let mut reversed = input.clone();
        reversed.reverse();
        prop_assert_eq!(list.to_vec().unwrap(), reversed);
        list.reverse().unwrap();
        prop_assert_eq!(list.to_vec().unwrap(), input);
    }

    #[test]
    fn sort_is_stable_both_ways(keys in prop::collection::vec(0u8..4, 0..100)) {
        let input: Vec<_> = keys.into_iter().enumerate().map(|(i, k)| (k, i)).collect();
        let list = keyed(&input);

        let mut expected = input.clone();
        expected.sort_by_key(|&(k, _)| k);
        list.sort(SortOrder::Ascending).unwrap();
        prop_assert_eq!(list.to_vec().unwrap(), expected.clone());

        expected.sort_by(|a, b| b.0.cmp(&a.0));
        list.sort(SortOrder::Descending).unwrap();
        prop_assert_eq!(list.to_vec().unwrap(), expected);
    }

    #[test]
    fn sorting_twice_changes_nothing(input in prop::collection::vec(any::<i16>(), 0..100)) {
        let list = List::builder().ordered().build();
        list.extend_from(input).unwrap();
        list.sort(SortOrder::Ascending).unwrap();
        let once = list.to_vec().unwrap();
        list.sort(SortOrder::Ascending).unwrap();
        prop_assert_eq!(list.to_vec().unwrap(), once);
    }

    #[test]
    fn concat_moves_every_node(
        front in prop::collection::vec(any::<i32>(), 0..50),
        back in prop::collection::vec(any::<i32>(), 0..50),
    ) {
        let first = List::from_iter(front.clone());
        let second = List::from_iter(back.clone());
        first.concat(&second).unwrap();

        prop_assert_eq!(first.size(), Ok(front.len() + back.len()));
        prop_assert_eq!(second.size(), Ok(0));
        let expected: Vec<_> = front.iter().chain(back.iter()).copied().collect();
        prop_assert_eq!(first.get_tail().unwrap().map(|e| *e), expected.last().copied());
        prop_assert_eq!(first.to_vec().unwrap(), expected);

        second.push(1).unwrap();
        prop_assert_eq!(second.to_vec().unwrap(), vec![1]);
        second.destroy();
    }

    #[test]
    fn merge_matches_a_stable_sort(
        mut front in prop::collection::vec(0u8..8, 0..50),
        mut back in prop::collection::vec(0u8..8, 0..50),
    ) {
        front.sort();
        back.sort();
        let tag = |side: usize| move |(i, k): (usize, u8)| (k, side * 100 + i);
        let left: Vec<_> = front.into_iter().enumerate().map(tag(0)).collect();
        let right: Vec<_> = back.into_iter().enumerate().map(tag(1)).collect();

        let first = keyed(&left);
        let second = keyed(&right);
        first.merge(&second).unwrap();

        let mut expected: Vec<_> = left.iter().chain(right.iter()).copied().collect();
        expected.sort_by_key(|&(k, _)| k);
        prop_assert_eq!(first.to_vec().unwrap(), expected);
        prop_assert_eq!(second.is_empty(), Ok(true));
    }

    #[test]
    fn min_max_match_the_iterator(input in prop::collection::vec(any::<i32>(), 1..100)) {
        let list = ordered();
        list.extend_from(input.iter().copied()).unwrap();
        prop_assert_eq!(*list.get_min().unwrap(), *input.iter().min().unwrap());
        prop_assert_eq!(*list.get_max().unwrap(), *input.iter().max().unwrap());
    }
}
