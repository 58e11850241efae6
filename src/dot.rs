//! Graphviz DOT rendering of keyword trees.
//!
//! The renderer only reads the public state accessors of a
//! [`KeywordTree`]; it works on finalized and unfinalized trees alike.
//!
//! ```rust
//! use libahocorasick::prelude::*;
//!
//! let tree = KeywordTree::from_keywords(["he", "she"]);
//! let dot = DotRenderer::new().failure_links(true).render(&tree);
//! assert!(dot.starts_with("digraph keyword_tree {"));
//! ```

use std::fmt::{self, Write};

use crate::automaton::KeywordTree;

/// Renders the state graph of a tree as DOT text.
#[derive(Debug, Clone, Copy, Default)]
pub struct DotRenderer {
    failure_links: bool,
    shortcuts: bool,
}

impl DotRenderer {
    /// Trie edges only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Also draw failure links as dashed edges.
    pub fn failure_links(mut self, enabled: bool) -> Self {
        self.failure_links = enabled;
        self
    }

    /// Also draw shortcut transitions as dotted edges.
    pub fn shortcuts(mut self, enabled: bool) -> Self {
        self.shortcuts = enabled;
        self
    }

    /// Render `tree` to a DOT string.
    pub fn render(&self, tree: &KeywordTree) -> String {
        Graph {
            renderer: self,
            tree,
        }
        .to_string()
    }

    /// Render `tree` into any formatter sink.
    pub fn write_to<W: Write>(&self, tree: &KeywordTree, out: &mut W) -> fmt::Result {
        writeln!(out, "digraph keyword_tree {{")?;
        writeln!(out, "    rankdir=LR;")?;

        for state in tree.states() {
            match state.keyword() {
                Some(keyword) => writeln!(
                    out,
                    "    {} [shape=doublecircle, label=\"{}\\n{}\"];",
                    state.id(),
                    state.id(),
                    escape(keyword)
                )?,
                None => writeln!(out, "    {} [shape=circle];", state.id())?,
            }
        }

        for state in tree.states() {
            for (symbol, target) in state.transitions() {
                let trie_edge = tree.is_trie_edge(state.id(), symbol, target);
                if !trie_edge && !self.shortcuts {
                    continue;
                }
                let style = if trie_edge { "" } else { ", style=dotted" };
                writeln!(
                    out,
                    "    {} -> {} [label=\"{}\"{}];",
                    state.id(),
                    target,
                    escape(&symbol.to_string()),
                    style
                )?;
            }
        }

        if self.failure_links {
            for state in tree.states().iter().skip(1) {
                if let Some(failure) = state.failure_link() {
                    writeln!(
                        out,
                        "    {} -> {} [style=dashed, color=gray];",
                        state.id(),
                        failure
                    )?;
                }
            }
        }

        writeln!(out, "}}")
    }
}

struct Graph<'a> {
    renderer: &'a DotRenderer,
    tree: &'a KeywordTree,
}

impl fmt::Display for Graph<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.renderer.write_to(self.tree, f)
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
