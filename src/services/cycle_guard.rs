//! Duplicate and cycle checks for dependency edges.
//!
//! A guard is a read-only snapshot of the edge set. Building one never touches
//! storage; callers load the edges, build the guard, check the candidate edge
//! and only then write.

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::info;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::TaskDependency;

/// Snapshot of the dependency graph used to vet a candidate edge.
#[derive(Debug, Default, Clone)]
pub struct CycleGuard {
    edges: Vec<TaskDependency>,
    adjacency: HashMap<i64, Vec<i64>>,
}

impl CycleGuard {
    pub fn new(edges: impl IntoIterator<Item = TaskDependency>) -> Self {
        let edges: Vec<TaskDependency> = edges.into_iter().collect();
        let mut adjacency: HashMap<i64, Vec<i64>> = HashMap::new();
        for edge in &edges {
            adjacency.entry(edge.task_id).or_default().push(edge.dependent_task_id);
        }
        Self { edges, adjacency }
    }

    /// Snapshot of every edge except the one with `excluded_id`.
    ///
    /// Used when re-pointing an edge, so the edge being edited neither counts
    /// as a duplicate of itself nor closes a cycle through its old endpoints.
    pub fn without(edges: impl IntoIterator<Item = TaskDependency>, excluded_id: i64) -> Self {
        Self::new(edges.into_iter().filter(|e| e.id != excluded_id))
    }

    /// Whether an edge `source -> target` exists other than `ignore_id`.
    pub fn is_duplicate(&self, source: i64, target: i64, ignore_id: Option<i64>) -> bool {
        self.edges
            .iter()
            .any(|e| e.endpoints() == (source, target) && Some(e.id) != ignore_id)
    }

    /// Whether adding `source -> target` would close a cycle.
    pub fn would_create_cycle(&self, source: i64, target: i64) -> bool {
        self.cycle_path(source, target).is_some()
    }

    /// The cycle `source -> target -> ... -> source` that adding the edge
    /// would close, if any. A self-loop yields `[source, source]`.
    pub fn cycle_path(&self, source: i64, target: i64) -> Option<Vec<i64>> {
        if source == target {
            return Some(vec![source, source]);
        }

        let mut visited = HashSet::from([target]);
        let mut predecessor: HashMap<i64, i64> = HashMap::new();
        let mut queue = VecDeque::from([target]);

        while let Some(current) = queue.pop_front() {
            for &next in self.adjacency.get(&current).into_iter().flatten() {
                if !visited.insert(next) {
                    continue;
                }
                predecessor.insert(next, current);
                if next == source {
                    return Some(reconstruct(source, target, &predecessor));
                }
                queue.push_back(next);
            }
        }
        None
    }

    /// Reject `source -> target` if it duplicates an edge or closes a cycle.
    pub fn check(&self, source: i64, target: i64, ignore_id: Option<i64>) -> DomainResult<()> {
        if self.is_duplicate(source, target, ignore_id) {
            info!(source, target, "rejected duplicate dependency");
            return Err(DomainError::DuplicateDependency {
                task_id: source,
                dependent_task_id: target,
            });
        }
        if let Some(path) = self.cycle_path(source, target) {
            info!(source, target, ?path, "rejected circular dependency");
            return Err(DomainError::DependencyCycle(path));
        }
        Ok(())
    }
}

/// Walk predecessors back from `source` to `target`, then close the loop.
fn reconstruct(source: i64, target: i64, predecessor: &HashMap<i64, i64>) -> Vec<i64> {
    let mut tail = vec![source];
    let mut node = source;
    while node != target {
        match predecessor.get(&node) {
            Some(&prev) => {
                tail.push(prev);
                node = prev;
            }
            None => break,
        }
    }
    tail.reverse();

    let mut path = Vec::with_capacity(tail.len() + 1);
    path.push(source);
    path.extend(tail);
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guard(pairs: &[(i64, i64)]) -> CycleGuard {
        CycleGuard::new(
            pairs
                .iter()
                .enumerate()
                .map(|(i, &(s, t))| TaskDependency::new(i as i64 + 1, s, t)),
        )
    }

    #[test]
    fn test_back_edge_closes_cycle() {
        let g = guard(&[(2, 3), (3, 1)]);
        assert!(g.would_create_cycle(1, 2));
        assert!(!guard(&[(1, 3), (2, 4)]).would_create_cycle(1, 2));
    }

    #[test]
    fn test_chain_rejects_reverse_accepts_shortcut() {
        let g = guard(&[(1, 2), (2, 3)]);
        assert!(g.would_create_cycle(3, 1));
        assert!(!g.would_create_cycle(1, 3));
    }

    #[test]
    fn test_self_loop() {
        let g = CycleGuard::default();
        assert_eq!(g.cycle_path(5, 5), Some(vec![5, 5]));
    }

    #[test]
    fn test_cycle_path_is_closed() {
        let g = guard(&[(1, 2), (2, 3)]);
        assert_eq!(g.cycle_path(3, 1), Some(vec![3, 1, 2, 3]));
    }

    #[test]
    fn test_diamond_terminates() {
        // 1 -> {2, 3} -> 4, every node reachable twice.
        let g = guard(&[(1, 2), (1, 3), (2, 4), (3, 4)]);
        assert!(!g.would_create_cycle(5, 1));
        assert!(g.would_create_cycle(4, 1));
    }

    #[test]
    fn test_duplicate_ignores_own_edge() {
        let g = guard(&[(1, 2)]);
        assert!(g.is_duplicate(1, 2, None));
        assert!(!g.is_duplicate(1, 2, Some(1)));
        assert!(!g.is_duplicate(2, 1, None));
    }

    #[test]
    fn test_check_reports_duplicate_before_cycle() {
        let g = guard(&[(1, 2), (2, 1)]);
        assert!(matches!(g.check(1, 2, None), Err(DomainError::DuplicateDependency { .. })));

        let g = guard(&[(1, 2), (2, 3)]);
        match g.check(3, 1, None) {
            Err(DomainError::DependencyCycle(path)) => assert_eq!(path, vec![3, 1, 2, 3]),
            other => panic!("expected cycle, got {other:?}"),
        }
        assert!(g.check(1, 3, None).is_ok());
    }

    #[test]
    fn test_without_drops_edited_edge() {
        let edges = vec![TaskDependency::new(1, 1, 2), TaskDependency::new(2, 2, 3)];
        // Re-pointing edge 1 to 3 -> 1 only conflicts through edge 2.
        let g = CycleGuard::without(edges.clone(), 1);
        assert!(g.check(3, 2, Some(1)).is_err());
        assert!(g.check(2, 1, Some(1)).is_ok());
    }
}
