use avl::Tree;
use rand::{rngs::StdRng, Rng, SeedableRng};

use std::collections::HashSet;

use crate::Op;

const SEED: u64 = 1000;

/// Applies a set of operations to a tree and a hashset, checking the tree after every step.
/// This way we can ensure that after a random smattering of inserts
/// and deletes we have the same set of values in both.
fn do_ops<T>(ops: &[Op<T>], tree: &mut Tree<T>, set: &mut HashSet<T>) -> bool
where
    T: std::hash::Hash + Eq + Clone + Ord,
{
    ops.iter().all(|op| {
        let agrees = match op {
            Op::Insert(v) => tree.insert(v.clone()) == set.insert(v.clone()),
            Op::Remove(v) => tree.delete(v) == set.remove(v),
        };
        agrees && tree.validate() && tree.is_ordered()
    })
}

/// The AVL height bound for a tree holding `len` values.
fn height_bound(len: usize) -> f64 {
    1.44 * ((len + 2) as f64).log2()
}

#[quickcheck]
fn fuzz_multiple_operations_i16(ops: Vec<Op<i16>>) -> bool {
    let mut tree = Tree::new();
    let mut set = HashSet::new();

    do_ops(&ops, &mut tree, &mut set)
        && set.iter().all(|v| tree.contains(v))
        && tree.len() == set.len()
}

#[quickcheck]
fn contains(xs: Vec<i8>) -> bool {
    let tree: Tree<_> = xs.iter().copied().collect();

    xs.iter().all(|x| tree.contains(x))
}

#[quickcheck]
fn contains_not(xs: Vec<i8>, nots: Vec<i8>) -> bool {
    let tree: Tree<_> = xs.iter().copied().collect();
    let added: HashSet<_> = xs.into_iter().collect();
    let nots: HashSet<_> = nots.into_iter().collect();
    let mut nots = nots.difference(&added);

    nots.all(|x| !tree.contains(x))
}

#[quickcheck]
fn with_deletions(xs: Vec<i8>, deletes: Vec<i8>) -> bool {
    let mut tree: Tree<_> = xs.iter().copied().collect();
    for delete in &deletes {
        tree.delete(delete);
    }

    let mut still_present = xs;
    for delete in &deletes {
        // We may have inserted the same value multiple times - delete each one.
        while let Some(pos) = still_present.iter().position(|x| x == delete) {
            still_present.swap_remove(pos);
        }
    }

    tree.validate()
        && deletes.iter().all(|x| !tree.contains(x))
        && still_present.iter().all(|x| tree.contains(x))
}

#[quickcheck]
fn in_order_matches_membership(ops: Vec<Op<i8>>) -> bool {
    let mut tree = Tree::new();
    let mut set = HashSet::new();
    do_ops(&ops, &mut tree, &mut set);

    let values = tree.to_vec();
    let mut expected: Vec<_> = set.into_iter().collect();
    expected.sort_unstable();

    values.windows(2).all(|w| w[0] < w[1]) && values == expected
}

#[quickcheck]
fn height_is_logarithmic(ops: Vec<Op<i16>>) -> bool {
    let mut tree = Tree::new();
    ops.iter().all(|op| {
        match op {
            Op::Insert(v) => {
                tree.insert(*v);
            }
            Op::Remove(v) => {
                tree.delete(v);
            }
        }
        tree.height() as f64 <= height_bound(tree.len())
    })
}

#[quickcheck]
fn deleting_absent_values_changes_nothing(xs: Vec<i8>, misses: Vec<i8>) -> bool {
    let mut tree: Tree<_> = xs.iter().copied().collect();
    let before = tree.to_string();

    misses
        .iter()
        .filter(|m| !xs.contains(*m))
        .all(|m| !tree.delete(m))
        && tree.to_string() == before
}

#[quickcheck]
fn min_and_max_are_the_ends(xs: Vec<i8>) -> bool {
    let tree: Tree<_> = xs.iter().copied().collect();

    tree.minimum() == xs.iter().min() && tree.maximum() == xs.iter().max()
}

#[quickcheck]
fn deleting_everything_empties(xs: Vec<i8>) -> bool {
    let mut tree: Tree<_> = xs.iter().copied().collect();
    for x in xs.iter().rev() {
        tree.delete(x);
        if !tree.validate() {
            return false;
        }
    }

    tree.is_empty() && tree.root().is_none()
}

#[test]
fn round_trip_in_any_order() {
    let values = [5, 3, 8, 1, 4, 7, 9];
    let orders: [[usize; 7]; 4] = [
        [0, 1, 2, 3, 4, 5, 6],
        [6, 5, 4, 3, 2, 1, 0],
        [3, 0, 6, 1, 5, 2, 4],
        [1, 4, 0, 6, 2, 5, 3],
    ];
    for order in orders {
        let mut tree = Tree::from(values);
        for i in order {
            assert!(tree.delete(&values[i]));
            assert!(tree.validate());
        }
        assert!(tree.is_empty());
    }
}

#[test]
fn seed_duplicates_are_dropped() {
    let tree = Tree::from([4, 2, 4, 6, 2, 4]);

    assert_eq!(tree.len(), 3);
    assert_eq!(tree.to_vec(), vec![2, 4, 6]);
}

#[test]
fn randomized_stress() {
    for iteration in 0..20 {
        // Seeded so a failing iteration can be replayed.
        let mut rng = StdRng::seed_from_u64(SEED + iteration);
        let values: Vec<u32> = (0..900).map(|_| rng.gen_range(0..20_000)).collect();
        let mut tree: Tree<_> = values.iter().copied().collect();
        assert_eq!(tree.check(), Ok(()));

        for value in values.iter().step_by(2) {
            tree.delete(value);
            assert_eq!(tree.check(), Ok(()));
        }
        assert!(tree.height() as f64 <= height_bound(tree.len()));
    }
}
