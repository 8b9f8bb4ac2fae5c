//! The object-diff kernel: partition two snapshots of one object kind into
//! created / dropped / altered sets, keyed and iterated by stable id.

use std::collections::BTreeMap;

/// The three-way partition of one object kind.
#[derive(Debug)]
pub struct DiffPartition<'a, T> {
    pub created: Vec<&'a T>,
    pub dropped: Vec<&'a T>,
    /// `(main, branch)` pairs whose data fields differ.
    pub altered: Vec<(&'a T, &'a T)>,
}

/// Partition `main` and `branch`. Identity fields never differ within one
/// id, so `altered` membership reduces to deep equality of the models.
pub fn partition<'a, T, I: Ord>(
    main: &'a [T],
    branch: &'a [T],
    id_of: impl Fn(&T) -> I,
    data_eq: impl Fn(&T, &T) -> bool,
) -> DiffPartition<'a, T> {
    let main_map: BTreeMap<I, &T> = main.iter().map(|t| (id_of(t), t)).collect();
    let branch_map: BTreeMap<I, &T> = branch.iter().map(|t| (id_of(t), t)).collect();

    let mut result = DiffPartition {
        created: Vec::new(),
        dropped: Vec::new(),
        altered: Vec::new(),
    };

    for (id, branch_obj) in &branch_map {
        match main_map.get(id) {
            None => result.created.push(*branch_obj),
            Some(main_obj) if !data_eq(main_obj, branch_obj) => {
                result.altered.push((*main_obj, *branch_obj));
            }
            Some(_) => {}
        }
    }

    for (id, main_obj) in &main_map {
        if !branch_map.contains_key(id) {
            result.dropped.push(*main_obj);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition() {
        let main = vec![("a", 1), ("b", 2), ("c", 3)];
        let branch = vec![("b", 2), ("c", 9), ("d", 4)];

        let partition = partition(&main, &branch, |t| t.0, |x, y| x.1 == y.1);

        assert_eq!(partition.created, vec![&("d", 4)]);
        assert_eq!(partition.dropped, vec![&("a", 1)]);
        assert_eq!(partition.altered, vec![(&("c", 3), &("c", 9))]);
    }

    #[test]
    fn test_identical_inputs_partition_empty() {
        let items = vec![("a", 1), ("b", 2)];
        let partition = partition(&items, &items, |t| t.0, |x, y| x.1 == y.1);
        assert!(partition.created.is_empty());
        assert!(partition.dropped.is_empty());
        assert!(partition.altered.is_empty());
    }
}
