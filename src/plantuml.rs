//! PlantUML diagram generation

use crate::state::{StateId, StateRegistry};

/// One registered transition, ready to be drawn.
pub(crate) struct Edge {
    pub from: StateId,
    pub to: StateId,
    pub label: String,
}

// Labels may contain spaces, so states are declared once under an `S<n>` alias.
fn alias(id: StateId) -> String {
    format!("S{}", id.index())
}

fn quoted(states: &StateRegistry, id: StateId) -> String {
    format!("\"{}\"", states.label(id).replace('"', "'"))
}

/// Generate a PlantUML diagram of the registered transition graph
pub(crate) fn generate_plantuml(
    states: &StateRegistry,
    edges: impl Iterator<Item = Edge>,
    current_state: StateId,
) -> String {
    let mut plantuml = String::new();
    plantuml.push_str("@startuml\n");
    plantuml.push_str("skinparam state {\n");
    plantuml.push_str("  BackgroundColor<<Current>> YellowGreen\n");
    plantuml.push_str("}\n\n");

    // Declare every state, including those with no edges
    for id in states.ids() {
        let stereotype = if id == current_state { " <<Current>>" } else { "" };
        plantuml.push_str(&format!(
            "state {} as {}{}\n",
            quoted(states, id),
            alias(id),
            stereotype
        ));
    }
    plantuml.push('\n');

    for edge in edges {
        plantuml.push_str(&format!(
            "{} --> {} : {}\n",
            alias(edge.from),
            alias(edge.to),
            edge.label
        ));
    }

    plantuml.push_str("@enduml\n");
    plantuml
}
