use crate::domain::models::{DependencyConstraint, PhaseDefinition};
use std::collections::{HashMap, HashSet};

/// In-memory view of the dependency edges between a set of phases.
///
/// Built per call from the in-scope phase list. Edges pointing at phases
/// outside the set are kept on the phase definition but never surface here,
/// so a scoped-out prerequisite counts as satisfied.
#[derive(Debug, Clone)]
pub struct DependencyGraph<'a> {
    /// Phases in input order.
    order: Vec<&'a str>,
    phases: HashMap<&'a str, &'a PhaseDefinition>,
    dependents: HashMap<&'a str, Vec<&'a str>>,
}

// Standalone helper for cycle detection (no self needed)
fn detect_cycle_util<'a>(
    node: &'a str,
    graph: &HashMap<&'a str, Vec<&'a str>>,
    visited: &mut HashSet<&'a str>,
    rec_stack: &mut HashSet<&'a str>,
    path: &mut Vec<&'a str>,
) -> bool {
    visited.insert(node);
    rec_stack.insert(node);
    path.push(node);

    if let Some(neighbors) = graph.get(node) {
        for &neighbor in neighbors {
            if !visited.contains(neighbor) {
                if detect_cycle_util(neighbor, graph, visited, rec_stack, path) {
                    return true;
                }
            } else if rec_stack.contains(neighbor) {
                // Cycle detected, keep only the looping part and close it
                if let Some(cycle_start) = path.iter().position(|&id| id == neighbor) {
                    path.drain(0..cycle_start);
                    path.push(neighbor);
                    return true;
                }
            }
        }
    }

    rec_stack.remove(node);
    path.pop();
    false
}

impl<'a> DependencyGraph<'a> {
    /// Build the graph over `phases`.
    pub fn build(phases: &'a [PhaseDefinition]) -> Self {
        let phase_map: HashMap<&str, &PhaseDefinition> =
            phases.iter().map(|p| (p.id.as_str(), p)).collect();

        let mut dependents: HashMap<&str, Vec<&str>> = HashMap::new();
        for phase in phases {
            for dep in &phase.dependencies {
                if let Some((&required, _)) = phase_map.get_key_value(dep.requires_phase_id.as_str()) {
                    let entry = dependents.entry(required).or_default();
                    if !entry.contains(&phase.id.as_str()) {
                        entry.push(phase.id.as_str());
                    }
                }
            }
        }

        Self {
            order: phases.iter().map(|p| p.id.as_str()).collect(),
            phases: phase_map,
            dependents,
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, phase_id: &str) -> bool {
        self.phases.contains_key(phase_id)
    }

    pub fn phase(&self, phase_id: &str) -> Option<&'a PhaseDefinition> {
        self.phases.get(phase_id).copied()
    }

    /// Display name of a phase, falling back to its id for unknown phases.
    pub fn display_name(&self, phase_id: &str) -> String {
        self.phase(phase_id)
            .map_or_else(|| phase_id.to_string(), |p| p.name.clone())
    }

    /// Constraints of `phase_id` whose prerequisite is part of the graph.
    pub fn dependencies_of(&self, phase_id: &str) -> Vec<&'a DependencyConstraint> {
        self.phase(phase_id)
            .map(|p| {
                p.dependencies
                    .iter()
                    .filter(|d| self.contains(&d.requires_phase_id))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Ids of phases that declare a dependency on `phase_id`, in input order.
    pub fn dependents_of(&self, phase_id: &str) -> Vec<&'a str> {
        self.dependents.get(phase_id).cloned().unwrap_or_default()
    }

    /// Detect a dependency cycle (hard and soft edges alike).
    ///
    /// Returns the closed cycle path, e.g. `["a", "b", "a"]`.
    pub fn detect_cycle(&self) -> Option<Vec<String>> {
        let graph: HashMap<&str, Vec<&str>> = self
            .order
            .iter()
            .map(|&id| {
                let deps = self
                    .dependencies_of(id)
                    .into_iter()
                    .map(|d| d.requires_phase_id.as_str())
                    .collect();
                (id, deps)
            })
            .collect();

        // DFS-based cycle detection, visiting in input order for stable output
        let mut visited = HashSet::new();
        let mut rec_stack = HashSet::new();
        let mut path = Vec::new();

        for &phase_id in &self.order {
            if !visited.contains(phase_id)
                && detect_cycle_util(phase_id, &graph, &mut visited, &mut rec_stack, &mut path)
            {
                return Some(path.into_iter().map(ToString::to_string).collect());
            }
        }

        None
    }
}
