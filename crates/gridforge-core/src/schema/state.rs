//! State machine documents.
//!
//! A state document holds:
//! - `transitions`: named state pairs with an optional condition, each
//!   owning its own typed variable list
//! - `manager` / `base`: variable lists scoped to the whole machine
//! - `nodes` / `edges`: an optional layout graph for visualization,
//!   maintained by [`crate::graph`]
//!
//! State names are implicit: the set of distinct `fromState` / `toState`
//! values, in first-appearance order.

use serde::{Deserialize, Serialize};

use crate::errors::{GridforgeError, GridforgeResult};
use crate::field::FieldType;
use crate::graph::{self, GraphEdge, GraphNode};
use crate::schema::class::{push_variable, VariableRow};
use crate::schema::next_id;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    #[serde(default)]
    pub id: u64,
    #[serde(rename = "fromState")]
    pub from_state: String,
    #[serde(rename = "toState")]
    pub to_state: String,
    #[serde(default)]
    pub condition: String,
    #[serde(default)]
    pub variables: Vec<VariableRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateDocument {
    #[serde(default)]
    pub transitions: Vec<Transition>,
    #[serde(default)]
    pub manager: Vec<VariableRow>,
    #[serde(default)]
    pub base: Vec<VariableRow>,
    #[serde(default)]
    pub nodes: Vec<GraphNode>,
    #[serde(default)]
    pub edges: Vec<GraphEdge>,
    /// Transition currently opened for variable editing. Not persisted.
    #[serde(skip)]
    selected: Option<u64>,
}

impl StateDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_transition(
        &mut self,
        from_state: impl Into<String>,
        to_state: impl Into<String>,
        condition: impl Into<String>,
    ) -> GridforgeResult<&Transition> {
        let from_state = from_state.into();
        let to_state = to_state.into();
        if from_state.trim().is_empty() || to_state.trim().is_empty() {
            return Err(GridforgeError::validation(
                "from state and to state are required",
            ));
        }
        let id = next_id(self.transitions.iter().map(|t| t.id));
        self.transitions.push(Transition {
            id,
            from_state,
            to_state,
            condition: condition.into(),
            variables: Vec::new(),
        });
        Ok(self.transitions.last().expect("transition just pushed"))
    }

    /// Remove a transition and its variable list. Clears the selection when
    /// it pointed at the removed transition.
    pub fn remove_transition(&mut self, id: u64) -> bool {
        let before = self.transitions.len();
        self.transitions.retain(|t| t.id != id);
        let removed = self.transitions.len() != before;
        if removed && self.selected == Some(id) {
            self.selected = None;
        }
        removed
    }

    pub fn select_transition(&mut self, id: u64) -> GridforgeResult<()> {
        if !self.transitions.iter().any(|t| t.id == id) {
            return Err(GridforgeError::invalid_argument(format!(
                "no such transition id: {id}"
            )));
        }
        self.selected = Some(id);
        Ok(())
    }

    pub fn selected_transition(&self) -> Option<u64> {
        self.selected
    }

    /// Replace the transition list wholesale, carrying over stored variable
    /// lists for surviving ids when the incoming list omits them. Editors
    /// save transitions and variables through separate operations; without
    /// the carry-over a transition save would silently drop variables.
    pub fn replace_transitions(&mut self, mut incoming: Vec<Transition>) {
        for transition in incoming.iter_mut() {
            if transition.variables.is_empty() {
                if let Some(existing) = self.transitions.iter().find(|t| t.id == transition.id) {
                    transition.variables = existing.variables.clone();
                }
            }
        }
        if let Some(selected) = self.selected {
            if !incoming.iter().any(|t| t.id == selected) {
                self.selected = None;
            }
        }
        self.transitions = incoming;
    }

    pub fn transition(&self, id: u64) -> Option<&Transition> {
        self.transitions.iter().find(|t| t.id == id)
    }

    fn transition_mut(&mut self, id: u64) -> GridforgeResult<&mut Transition> {
        self.transitions
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| GridforgeError::invalid_argument(format!("no such transition id: {id}")))
    }

    pub fn add_transition_variable(
        &mut self,
        transition_id: u64,
        ty: FieldType,
        name: impl Into<String>,
        description: impl Into<String>,
        array_size: i64,
    ) -> GridforgeResult<()> {
        let transition = self.transition_mut(transition_id)?;
        push_variable(&mut transition.variables, ty, name, description, array_size)?;
        Ok(())
    }

    pub fn replace_transition_variables(
        &mut self,
        transition_id: u64,
        variables: Vec<VariableRow>,
    ) -> GridforgeResult<()> {
        self.transition_mut(transition_id)?.variables = variables;
        Ok(())
    }

    pub fn add_manager_variable(
        &mut self,
        ty: FieldType,
        name: impl Into<String>,
        description: impl Into<String>,
        array_size: i64,
    ) -> GridforgeResult<()> {
        push_variable(&mut self.manager, ty, name, description, array_size)?;
        Ok(())
    }

    pub fn add_base_variable(
        &mut self,
        ty: FieldType,
        name: impl Into<String>,
        description: impl Into<String>,
        array_size: i64,
    ) -> GridforgeResult<()> {
        push_variable(&mut self.base, ty, name, description, array_size)?;
        Ok(())
    }

    /// Distinct state names in first-appearance order across transitions.
    pub fn states(&self) -> Vec<String> {
        let mut states: Vec<String> = Vec::new();
        for transition in &self.transitions {
            for name in [&transition.from_state, &transition.to_state] {
                if !states.iter().any(|s| s == name) {
                    states.push(name.clone());
                }
            }
        }
        states
    }

    /// Delete a layout node, repairing edges and adjacency and renumbering
    /// the survivors contiguously.
    pub fn delete_node(&mut self, id: u64) -> bool {
        graph::delete_node(&mut self.nodes, &mut self.edges, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with_transitions() -> StateDocument {
        let mut doc = StateDocument::new();
        doc.add_transition("Idle", "Run", "speed > 0").unwrap();
        doc.add_transition("Run", "Idle", "speed == 0").unwrap();
        doc
    }

    #[test]
    fn transitions_require_both_states() {
        let mut doc = StateDocument::new();
        assert!(doc.add_transition("", "Run", "").is_err());
        assert!(doc.add_transition("Idle", "  ", "").is_err());
        assert!(doc.transitions.is_empty());
    }

    #[test]
    fn removing_selected_transition_clears_selection() {
        let mut doc = doc_with_transitions();
        doc.select_transition(2).unwrap();
        assert!(doc.remove_transition(2));
        assert_eq!(doc.selected_transition(), None);
        assert!(!doc.remove_transition(2));
        // surviving id untouched
        assert_eq!(doc.transitions[0].id, 1);
    }

    #[test]
    fn transition_variables_validate_like_class_rows() {
        let mut doc = doc_with_transitions();
        doc.add_transition_variable(1, FieldType::Float, "Speed", "", 0)
            .unwrap();
        assert!(doc
            .add_transition_variable(1, FieldType::Float, "Bad", "", -2)
            .is_err());
        assert!(doc
            .add_transition_variable(9, FieldType::Float, "Ghost", "", 0)
            .is_err());
        assert_eq!(doc.transition(1).unwrap().variables.len(), 1);
    }

    #[test]
    fn replace_transitions_keeps_stored_variables() {
        let mut doc = doc_with_transitions();
        doc.add_transition_variable(1, FieldType::Int, "Frames", "", 0)
            .unwrap();

        let incoming = vec![
            Transition {
                id: 1,
                from_state: "Idle".to_string(),
                to_state: "Run".to_string(),
                condition: "edited".to_string(),
                variables: Vec::new(),
            },
            Transition {
                id: 3,
                from_state: "Run".to_string(),
                to_state: "Fall".to_string(),
                condition: String::new(),
                variables: Vec::new(),
            },
        ];
        doc.replace_transitions(incoming);

        assert_eq!(doc.transitions[0].condition, "edited");
        assert_eq!(doc.transitions[0].variables.len(), 1);
        assert!(doc.transitions[1].variables.is_empty());
    }

    #[test]
    fn states_are_distinct_in_first_appearance_order() {
        let mut doc = doc_with_transitions();
        doc.add_transition("Run", "Fall", "").unwrap();
        assert_eq!(doc.states(), vec!["Idle", "Run", "Fall"]);
    }

    #[test]
    fn node_deletion_flows_through_the_document() {
        let mut doc = StateDocument::new();
        doc.nodes = vec![
            GraphNode { id: 1, name: "Idle".into(), x: 0.0, y: 0.0, targets: vec![2] },
            GraphNode { id: 2, name: "Run".into(), x: 1.0, y: 0.0, targets: vec![] },
            GraphNode { id: 3, name: "Fall".into(), x: 2.0, y: 0.0, targets: vec![1] },
        ];
        doc.edges = vec![
            GraphEdge { source: 1, target: 2 },
            GraphEdge { source: 3, target: 1 },
        ];
        assert!(doc.delete_node(2));
        let ids: Vec<u64> = doc.nodes.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(doc.edges, vec![GraphEdge { source: 2, target: 1 }]);
    }
}
