//! Graphviz `digraph` text for Morse graphs and lattices.
//!
//! One statement per vertex, `v [label="v : label", ...];`, and one per edge,
//! `u -> v;`. Morse graphs additionally group their sinks on one rank and
//! color vertices from a cyclic palette.

use crate::morse_error::MorseError;
use crate::topology::dag::DirectedAcyclicGraph;
use std::io::Write;

/// Default Morse-graph palette, cycled when there are more vertices than colors.
pub const DEFAULT_PALETTE: [&str; 40] = [
    "#1f77b4", "#e6550d", "#31a354", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#80b1d3", "#ffffb3", "#fccde5", "#b3de69", "#fdae6b", "#6a3d9a", "#c49c94",
    "#fb8072", "#dbdb8d", "#bc80bd", "#ffed6f", "#637939", "#c5b0d5", "#636363", "#c7c7c7",
    "#8dd3c7", "#b15928", "#e8cb32", "#9e9ac8", "#74c476", "#ff7f0e", "#9edae5", "#90d743",
    "#e7969c", "#17becf", "#7b4173", "#8ca252", "#ad494a", "#8c6d31", "#a55194", "#00cc49",
];

/// Rendering options for [`write_dot`].
#[derive(Clone, Debug, PartialEq)]
pub struct DotOptions {
    pub shape: String,
    pub margin: String,
    /// Fill colors indexed by vertex modulo their count; white when empty.
    pub palette: Vec<String>,
    /// Emit `{rank=same; ...}` for the vertices without successors.
    pub rank_sinks: bool,
}

impl Default for DotOptions {
    fn default() -> Self {
        Self {
            shape: "ellipse".into(),
            margin: "0.0, 0.04".into(),
            palette: Vec::new(),
            rank_sinks: false,
        }
    }
}

impl DotOptions {
    /// Colored vertices with sinks on a common rank.
    pub fn morse_graph() -> Self {
        Self {
            shape: "ellipse".into(),
            margin: "0.11, 0.055".into(),
            palette: DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
            rank_sinks: true,
        }
    }

    pub fn shape(mut self, shape: impl Into<String>) -> Self {
        self.shape = shape.into();
        self
    }

    pub fn palette<I, S>(mut self, colors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.palette = colors.into_iter().map(Into::into).collect();
        self
    }

    fn fill(&self, v: usize) -> &str {
        if self.palette.is_empty() {
            "white"
        } else {
            &self.palette[v % self.palette.len()]
        }
    }
}

fn vertex_text(graph: &DirectedAcyclicGraph, v: usize) -> Result<String, MorseError> {
    let label = graph.vertex_label(v)?;
    if label.is_empty() {
        Ok(v.to_string())
    } else {
        Ok(format!("{v} : {label}"))
    }
}

/// Write `graph` as a Graphviz digraph.
pub fn write_dot<W: Write>(
    mut writer: W,
    graph: &DirectedAcyclicGraph,
    opts: &DotOptions,
) -> Result<(), MorseError> {
    writeln!(writer, "digraph {{")?;
    for v in graph.vertices() {
        writeln!(
            writer,
            "{v} [label=\"{}\", shape={}, style=filled, fillcolor=\"{}\", margin=\"{}\"];",
            vertex_text(graph, v)?,
            opts.shape,
            opts.fill(v),
            opts.margin
        )?;
    }
    if opts.rank_sinks {
        write!(writer, "{{rank=same; ")?;
        for v in graph.sinks() {
            write!(writer, "{v} ")?;
        }
        writeln!(writer, "}}; ")?;
    }
    for (u, v) in graph.edges() {
        writeln!(writer, "{u} -> {v};")?;
    }
    writeln!(writer, "}}")?;
    Ok(())
}

fn render(graph: &DirectedAcyclicGraph, opts: &DotOptions) -> Result<String, MorseError> {
    let mut buf = Vec::new();
    write_dot(&mut buf, graph, opts)?;
    String::from_utf8(buf).map_err(|e| MorseError::Io(e.to_string()))
}

/// Plain description with white vertices, as used for lattices.
pub fn graph_to_dot(graph: &DirectedAcyclicGraph) -> Result<String, MorseError> {
    render(graph, &DotOptions::default())
}

/// Colored description with the sinks (attractors) on one rank.
pub fn morse_graph_to_dot(graph: &DirectedAcyclicGraph) -> Result<String, MorseError> {
    render(graph, &DotOptions::morse_graph())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_graph() {
        let mut g = DirectedAcyclicGraph::new();
        g.add_vertex_with_label(0, "{0, 1}");
        g.add_edge(0, 1);
        let dot = graph_to_dot(&g).unwrap();
        let expected = "digraph {\n\
            0 [label=\"0 : {0, 1}\", shape=ellipse, style=filled, fillcolor=\"white\", margin=\"0.0, 0.04\"];\n\
            1 [label=\"1\", shape=ellipse, style=filled, fillcolor=\"white\", margin=\"0.0, 0.04\"];\n\
            0 -> 1;\n\
            }\n";
        assert_eq!(dot, expected);
    }

    #[test]
    fn morse_graph_ranks_sinks_and_cycles_colors() {
        let g = DirectedAcyclicGraph::from_edges([(0, 1), (0, 2)]);
        let dot = morse_graph_to_dot(&g).unwrap();
        assert!(dot.contains("{rank=same; 1 2 }; \n"));
        assert!(dot.contains("0 [label=\"0\", shape=ellipse, style=filled, fillcolor=\"#1f77b4\""));

        let opts = DotOptions::morse_graph().palette(["red", "blue"]).shape("box");
        let mut buf = Vec::new();
        write_dot(&mut buf, &g, &opts).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("2 [label=\"2\", shape=box, style=filled, fillcolor=\"red\""));
    }
}
