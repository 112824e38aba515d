use std::{cell::Cell, rc::Rc};

use super::*;
use crate::collections::{Pow2ReserveStrategy, ThreeHalvesReserveStrategy};
use crate::dynseq;

fn one_to_five() -> DynamicSequence<i32> {
    let mut seq = DynamicSequence::new();
    for i in 1..=5 {
        seq.append(i);
    }
    seq
}

#[test]
fn dynseq_new() {
    let seq = DynamicSequence::<i32>::new();
    assert_eq!(seq.capacity(), DEFAULT_CAPACITY);
    assert_eq!(seq.len(), 0);
    assert!(seq.is_empty());

    let seq = DynamicSequence::<i32>::with_capacity(21).unwrap();
    assert_eq!(seq.capacity(), 21);
    assert_eq!(seq.size(), 0);
}

#[test]
fn dynseq_invalid_capacity() {
    assert_eq!(DynamicSequence::<i32>::with_capacity(0).err(), Some(SequenceError::InvalidCapacity(0)));
    assert_eq!(DynamicSequence::<u64>::with_capacity(usize::MAX).err(), Some(SequenceError::CapacityOverflow));
}

#[test]
fn dynseq_append() {
    let mut seq = DynamicSequence::new();
    for i in 1..=25 {
        seq.append(i);
        assert_eq!(seq.size(), i as usize);
    }
    for i in 0..25 {
        assert_eq!(seq.get(i), Ok(&(i as i32 + 1)));
    }
}

#[test]
fn dynseq_growth_boundary() {
    let mut seq = DynamicSequence::with_capacity(4).unwrap();
    for i in 0..4 {
        seq.append(i);
        assert_eq!(seq.capacity(), 4);
    }

    seq.append(4);
    assert_eq!(seq.capacity(), 8);
    assert_eq!(seq, [0, 1, 2, 3, 4]);

    let mut seq = DynamicSequence::with_capacity(1).unwrap();
    seq.append('a');
    assert_eq!(seq.capacity(), 1);
    seq.append('b');
    assert_eq!(seq.capacity(), 2);
}

#[test]
fn dynseq_insert_grows_when_full() {
    let mut seq = DynamicSequence::with_capacity(3).unwrap();
    seq.extend([1, 2, 3]);
    assert_eq!(seq.capacity(), 3);

    seq.insert_at(0, 0).unwrap();
    assert_eq!(seq.capacity(), 6);
    assert_eq!(seq, [0, 1, 2, 3]);
}

#[test]
fn dynseq_reserve() {
    let mut seq = DynamicSequence::<i32>::new();
    seq.reserve(21);
    assert_eq!(seq.capacity(), 21);

    seq.reserve(5);
    assert_eq!(seq.capacity(), 21);

    seq.extend(0..21);
    assert!(matches!(seq.try_reserve(1), Ok(())));
    assert_eq!(seq.capacity(), 42);

    assert_eq!(seq.try_reserve(usize::MAX), Err(SequenceError::CapacityOverflow));
    assert_eq!(seq.capacity(), 42);
    assert_eq!(seq.len(), 21);
}

#[test]
fn dynseq_strategies() {
    let mut seq = DynamicSequence::<i32, Pow2ReserveStrategy>::with_capacity_and_strategy(3).unwrap();
    seq.extend([1, 2, 3, 4]);
    assert_eq!(seq.capacity(), 4);
    seq.append(5);
    assert_eq!(seq.capacity(), 8);

    let mut seq = DynamicSequence::<i32, ThreeHalvesReserveStrategy>::with_strategy();
    seq.extend(0..11);
    assert_eq!(seq.capacity(), 15);

    let other: DynamicSequence<i32> = (0..11).collect();
    assert_eq!(seq, other);
}

#[test]
fn dynseq_insert_at_front() {
    let mut seq = DynamicSequence::new();
    seq.append(1);
    seq.insert_at(0, 2).unwrap();

    assert_eq!(seq.size(), 2);
    assert_eq!(seq.get(0), Ok(&2));
    assert_eq!(seq.get(1), Ok(&1));

    for i in 3..=5 {
        seq.insert_at(0, i).unwrap();
        assert_eq!(seq.size(), i as usize);
        assert_eq!(seq.get(0), Ok(&i));
    }
    assert_eq!(seq, [5, 4, 3, 2, 1]);
}

#[test]
fn dynseq_insert_at_shift() {
    let mut seq = one_to_five();
    seq.insert_at(2, 10).unwrap();

    assert_eq!(seq.size(), 6);
    assert_eq!(seq, [1, 2, 10, 3, 4, 5]);
}

#[test]
fn dynseq_insert_at_end() {
    let mut seq = one_to_five();
    seq.insert_at(5, 6).unwrap();
    assert_eq!(seq, [1, 2, 3, 4, 5, 6]);
}

#[test]
fn dynseq_update_at() {
    let mut seq = DynamicSequence::new();
    seq.append(1);

    for i in 2..=5 {
        assert_eq!(seq.update_at(0, i), Ok(i - 1));
        assert_eq!(seq.size(), 1);
        assert_eq!(seq.get(0), Ok(&i));
    }

    let mut seq = one_to_five();
    assert_eq!(seq.update_at(3, 40), Ok(4));
    assert_eq!(seq, [1, 2, 3, 40, 5]);
}

#[test]
fn dynseq_delete_at() {
    let mut seq = one_to_five();
    for i in (0..5).rev() {
        assert_eq!(seq.delete_at(i), Ok(i as i32 + 1));
        assert_eq!(seq.size(), i);
    }
    assert!(seq.is_empty());

    let mut seq = one_to_five();
    assert_eq!(seq.delete_at(1), Ok(2));
    assert_eq!(seq, [1, 3, 4, 5]);
    assert_eq!(seq.delete_at(0), Ok(1));
    assert_eq!(seq, [3, 4, 5]);
}

#[test]
fn dynseq_out_of_range() {
    let mut seq = one_to_five();
    let oob = |index| SequenceError::IndexOutOfRange { index, len: 5 };

    assert_eq!(seq.get(5), Err(oob(5)));
    assert_eq!(seq.get(usize::MAX), Err(oob(usize::MAX)));
    assert_eq!(seq.insert_at(6, 0), Err(oob(6)));
    assert_eq!(seq.update_at(5, 0), Err(oob(5)));
    assert_eq!(seq.delete_at(5), Err(oob(5)));

    // Nothing changed
    assert_eq!(seq, [1, 2, 3, 4, 5]);
    assert_eq!(seq.capacity(), DEFAULT_CAPACITY);
}

#[test]
fn dynseq_insert_out_of_range_when_full() {
    let mut seq = DynamicSequence::with_capacity(2).unwrap();
    seq.extend([1, 2]);

    assert_eq!(seq.insert_at(3, 3), Err(SequenceError::IndexOutOfRange { index: 3, len: 2 }));
    assert_eq!(seq.capacity(), 2);
}

#[test]
fn dynseq_clear() {
    let mut seq = DynamicSequence::new();
    seq.extend(0..50);
    assert!(seq.capacity() > DEFAULT_CAPACITY);

    seq.clear();
    assert_eq!(seq.size(), 0);
    assert_eq!(seq.capacity(), DEFAULT_CAPACITY);
    assert_eq!(seq.get(0), Err(SequenceError::IndexOutOfRange { index: 0, len: 0 }));

    seq.append(7);
    assert_eq!(seq, [7]);
}

#[test]
fn dynseq_sort() {
    let mut seq = DynamicSequence::new();
    for i in (1..=5).rev() {
        seq.append(i);
    }

    seq.sort();
    assert_eq!(seq, [1, 2, 3, 4, 5]);

    seq.sort_by(|a, b| b.cmp(a));
    assert_eq!(seq, [5, 4, 3, 2, 1]);
}

#[test]
fn dynseq_sort_with_comparator() {
    let mut seq = one_to_five();
    seq.sort_by(|a, b| b.cmp(a));
    assert_eq!(seq, [5, 4, 3, 2, 1]);
}

#[test]
fn dynseq_sort_properties() {
    // Deterministic pseudo-random fill (LCG)
    let mut val: u32 = 42;
    let input: Vec<i32> = (0..500).map(|_| {
        val = val.wrapping_mul(1103515245).wrapping_add(12345);
        (val % 100) as i32
    }).collect();

    let mut seq: DynamicSequence<i32> = input.iter().copied().collect();
    seq.sort();
    assert!(seq.as_slice().windows(2).all(|w| w[0] <= w[1]));

    // Same multiset
    let mut expected = input.clone();
    expected.sort_unstable();
    assert_eq!(seq, expected);

    // Idempotent
    let once = seq.clone();
    seq.sort();
    assert_eq!(seq, once);

    // Reverse comparator gives the reversed ascending result
    let mut desc: DynamicSequence<i32> = input.iter().copied().collect();
    desc.sort_by(|a, b| b.cmp(a));
    let reversed: Vec<i32> = expected.iter().rev().copied().collect();
    assert_eq!(desc, reversed);
}

#[test]
fn dynseq_sort_small() {
    let mut empty = DynamicSequence::<i32>::new();
    empty.sort();
    assert!(empty.is_empty());

    let mut single = dynseq![1];
    single.sort();
    assert_eq!(single, [1]);

    let mut dups = dynseq![2, 1, 2, 1, 2];
    dups.sort();
    assert_eq!(dups, [1, 1, 2, 2, 2]);
}

#[test]
fn dynseq_sort_by_key_like_comparator() {
    #[derive(Debug, PartialEq)]
    struct Item {
        name: &'static str,
        weight: u32,
    }

    let mut seq = dynseq![
        Item { name: "c", weight: 3 },
        Item { name: "a", weight: 1 },
        Item { name: "b", weight: 2 },
    ];
    seq.sort_by(|a, b| a.weight.cmp(&b.weight));

    let names: Vec<_> = seq.iter().map(|item| item.name).collect();
    assert_eq!(names, ["a", "b", "c"]);
}

#[test]
fn dynseq_sort_range() {
    let mut seq = dynseq![9, 8, 7, 6, 5, 4];
    seq.sort_range_by(1..4, Ord::cmp).unwrap();
    assert_eq!(seq, [9, 6, 7, 8, 5, 4]);

    seq.sort_range_by(3.., Ord::cmp).unwrap();
    assert_eq!(seq, [9, 6, 7, 4, 5, 8]);

    seq.sort_range_by(..=1, Ord::cmp).unwrap();
    assert_eq!(seq, [6, 9, 7, 4, 5, 8]);

    seq.sort_range_by(.., |a: &i32, b: &i32| b.cmp(a)).unwrap();
    assert_eq!(seq, [9, 8, 7, 6, 5, 4]);

    assert_eq!(seq.sort_range_by(2..7, Ord::cmp), Err(SequenceError::IndexOutOfRange { index: 7, len: 6 }));
    assert_eq!(seq.sort_range_by(4..2, Ord::cmp), Err(SequenceError::IndexOutOfRange { index: 4, len: 6 }));
    assert_eq!(seq.sort_range_by(6..6, Ord::cmp), Ok(()));
}

#[test]
fn dynseq_try_sort() {
    let mut seq = dynseq![2.5, -1.0, 3.25, 0.0];
    assert_eq!(seq.try_sort(), Ok(()));
    assert_eq!(seq, [-1.0, 0.0, 2.5, 3.25]);
}

#[test]
fn dynseq_try_sort_nan_is_untouched() {
    let mut seq = dynseq![3.0, 1.0, f64::NAN, 2.0];
    assert_eq!(seq.try_sort(), Err(SequenceError::Unsortable { index: 2 }));

    assert_eq!(seq.get(0), Ok(&3.0));
    assert_eq!(seq.get(1), Ok(&1.0));
    assert!(seq.get(2).unwrap().is_nan());
    assert_eq!(seq.get(3), Ok(&2.0));
}

#[test]
fn dynseq_try_sort_by_lazy_failure() {
    // Every element orders with itself, but 5 has no ordering with anything else
    let mut seq = dynseq![4, 5, 1, 3];
    let res = seq.try_sort_by(|a, b| {
        if a != b && (*a == 5 || *b == 5) { None } else { Some(a.cmp(b)) }
    });
    assert_eq!(res, Err(SequenceError::Unsortable { index: 1 }));

    // Possibly rearranged, but nothing was lost
    let mut elems: Vec<i32> = seq.iter().copied().collect();
    elems.sort_unstable();
    assert_eq!(elems, [1, 3, 4, 5]);
}

#[test]
fn dynseq_drop_count() {
    struct Droppable(Rc<Cell<usize>>);

    impl Drop for Droppable {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    let counter = Rc::new(Cell::new(0));
    {
        let mut seq = DynamicSequence::with_capacity(2).unwrap();
        for _ in 0..10 {
            seq.append(Droppable(counter.clone()));
        }

        drop(seq.delete_at(3).unwrap());
        assert_eq!(counter.get(), 1);

        drop(seq.update_at(0, Droppable(counter.clone())).unwrap());
        assert_eq!(counter.get(), 2);

        seq.clear();
        assert_eq!(counter.get(), 11);

        seq.append(Droppable(counter.clone()));
        seq.append(Droppable(counter.clone()));
    }
    assert_eq!(counter.get(), 13);
}

#[test]
fn dynseq_zero_sized() {
    let mut seq = DynamicSequence::with_capacity(1).unwrap();
    for _ in 0..20 {
        seq.append(());
    }
    assert_eq!(seq.len(), 20);
    assert_eq!(seq.delete_at(19), Ok(()));
    assert_eq!(seq.len(), 19);
}

#[test]
#[cfg(target_pointer_width = "64")]
fn dynseq_zero_sized_large_capacity() {
    let mut seq = DynamicSequence::<()>::with_capacity(1 << 34).unwrap();
    assert_eq!(seq.capacity(), 1 << 34);

    seq.append(());
    seq.reserve(1 << 40);
    assert_eq!(seq.capacity(), (1 << 40) + 1);
    assert_eq!(seq.len(), 1);

    seq.clear();
    assert_eq!(seq.capacity(), DEFAULT_CAPACITY);
}

#[test]
fn dynseq_owned_elements() {
    let mut seq = DynamicSequence::new();
    for word in ["delta", "alpha", "charlie", "bravo"] {
        seq.append(word.to_string());
    }
    seq.sort();
    assert_eq!(seq, ["alpha", "bravo", "charlie", "delta"]);

    let removed = seq.delete_at(0).unwrap();
    assert_eq!(removed, "alpha");
    seq.insert_at(3, removed).unwrap();
    assert_eq!(seq, ["bravo", "charlie", "delta", "alpha"]);
}

#[test]
fn dynseq_macro_and_conversions() {
    let seq: DynamicSequence<i32> = dynseq![];
    assert!(seq.is_empty());

    let seq = dynseq![0; 12];
    assert_eq!(seq.len(), 12);
    assert_eq!(seq.capacity(), 12);
    assert!(seq.iter().all(|&x| x == 0));

    let seq = dynseq![1, 2, 3];
    assert_eq!(seq.capacity(), DEFAULT_CAPACITY);
    assert_eq!(seq, vec![1, 2, 3]);
    assert_eq!(seq, &[1, 2, 3][..]);
    assert_eq!(seq, DynamicSequence::<i32>::from(&[1, 2, 3][..]));

    let mut ext = seq.clone();
    ext.extend(&[4, 5]);
    assert_eq!(ext, [1, 2, 3, 4, 5]);
    assert_eq!(ext.as_ref(), &[1, 2, 3, 4, 5]);
}

#[test]
fn dynseq_clone_keeps_capacity() {
    let mut seq = DynamicSequence::with_capacity(3).unwrap();
    seq.extend(["a", "b"]);
    let copy = seq.clone();
    assert_eq!(copy.capacity(), 3);
    assert_eq!(copy, seq);
}

#[test]
fn dynseq_index() {
    let seq = dynseq![10, 20, 30];
    assert_eq!(seq[0], 10);
    assert_eq!(seq[2], 30);

    let sum: i32 = (&seq).into_iter().sum();
    assert_eq!(sum, 60);
}

#[test]
#[should_panic(expected = "index out of range: the len is 3 but the index is 3")]
fn dynseq_index_out_of_range() {
    let seq = dynseq![10, 20, 30];
    let _value = seq[3];
}

#[test]
#[should_panic(expected = "failed to reserve storage")]
fn dynseq_reserve_overflow_panics() {
    let mut seq = dynseq![1u64];
    seq.reserve(usize::MAX);
}

#[test]
fn dynseq_formatting() {
    let seq = dynseq![1, 2, 3];
    assert_eq!(format!("{seq}"), "[1, 2, 3]");
    assert_eq!(format!("{seq:?}"), "[1, 2, 3]");

    let names = dynseq!["a", "b"];
    assert_eq!(names.to_string(), "[a, b]");
    assert_eq!(format!("{names:?}"), "[\"a\", \"b\"]");

    assert_eq!(DynamicSequence::<i32>::new().to_string(), "[]");
}
