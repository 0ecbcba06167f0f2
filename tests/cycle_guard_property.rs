//! Property tests for the dependency cycle guard.

use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::collections::{HashMap, HashSet};

use tasktrack::domain::models::TaskDependency;
use tasktrack::services::CycleGuard;

fn reachable(edges: &[TaskDependency], from: i64, to: i64) -> bool {
    let mut adjacency: HashMap<i64, Vec<i64>> = HashMap::new();
    for e in edges {
        adjacency.entry(e.task_id).or_default().push(e.dependent_task_id);
    }
    let mut stack = vec![from];
    let mut seen = HashSet::new();
    while let Some(node) = stack.pop() {
        if node == to {
            return true;
        }
        if seen.insert(node) {
            stack.extend(adjacency.get(&node).into_iter().flatten().copied());
        }
    }
    false
}

fn is_acyclic(edges: &[TaskDependency]) -> bool {
    edges.iter().all(|e| !reachable(edges, e.dependent_task_id, e.task_id))
}

proptest! {
    /// Property: accepting only edges the guard allows keeps the graph acyclic
    #[test]
    fn prop_accepted_edges_stay_acyclic(
        candidates in prop::collection::vec((0i64..12, 0i64..12), 0..60)
    ) {
        let mut edges: Vec<TaskDependency> = Vec::new();
        for (source, target) in candidates {
            let guard = CycleGuard::new(edges.clone());
            if guard.check(source, target, None).is_ok() {
                let id = edges.len() as i64 + 1;
                edges.push(TaskDependency::new(id, source, target));
            }
        }
        prop_assert!(is_acyclic(&edges));
    }

    /// Property: a rejected edge comes with a closed path of existing edges
    #[test]
    fn prop_cycle_path_is_closed_and_real(
        candidates in prop::collection::vec((0i64..8, 0i64..8), 1..40),
        probe in (0i64..8, 0i64..8)
    ) {
        let mut edges: Vec<TaskDependency> = Vec::new();
        for (source, target) in candidates {
            if CycleGuard::new(edges.clone()).check(source, target, None).is_ok() {
                let id = edges.len() as i64 + 1;
                edges.push(TaskDependency::new(id, source, target));
            }
        }

        let (source, target) = probe;
        let guard = CycleGuard::new(edges.clone());
        let expected = source == target || reachable(&edges, target, source);
        prop_assert_eq!(guard.would_create_cycle(source, target), expected);

        if let Some(path) = guard.cycle_path(source, target) {
            prop_assert!(expected);
            prop_assert_eq!(path.first(), Some(&source));
            prop_assert_eq!(path.last(), Some(&source));
            prop_assert_eq!(path.get(1), Some(&target));

            let pairs: HashSet<(i64, i64)> = edges.iter().map(TaskDependency::endpoints).collect();
            for hop in path.windows(2).skip(1) {
                if !pairs.contains(&(hop[0], hop[1])) {
                    return Err(TestCaseError::fail(format!("hop {hop:?} is not an edge")));
                }
            }
        } else {
            prop_assert!(!expected);
        }
    }

    /// Property: an existing pair is a duplicate unless it is the ignored edge
    #[test]
    fn prop_duplicate_respects_ignore(
        pairs in prop::collection::hash_set((0i64..10, 0i64..10), 1..20)
    ) {
        let edges: Vec<TaskDependency> = pairs
            .iter()
            .enumerate()
            .map(|(i, &(s, t))| TaskDependency::new(i as i64 + 1, s, t))
            .collect();
        let guard = CycleGuard::new(edges.clone());
        for edge in &edges {
            prop_assert!(guard.is_duplicate(edge.task_id, edge.dependent_task_id, None));
            prop_assert!(!guard.is_duplicate(edge.task_id, edge.dependent_task_id, Some(edge.id)));
        }
    }
}
