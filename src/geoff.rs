
//! Geoff subgraph format support.
//!
//! Geoff is a line-oriented text format for graph data: one rule per line,
//! an entity descriptor followed by a JSON property map.
//!
//! ```text
//! (1)	{"name":"Alice"}
//! (2)	{"name":"Bob"}
//! (1)-[9:KNOWS]->(2)	{"since":2011}
//! ```
//!
//! [`Subgraph`] parses and accumulates rules; [`dumps`] serializes the
//! entities of one or more [`Path`]s to Geoff text.

use std::collections::{BTreeMap, HashMap};

use serde_json::Value as Json;

use neorest_core::value::type_name;
use neorest_core::{NeorestError, NodeRef, Path, RelRef, Value};

/// One Geoff rule: an entity descriptor plus its property data.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    /// Entity descriptor, e.g. `(17)` or `(1)-[9:KNOWS]->(2)`.
    pub descriptor: String,
    /// Property data attached to the rule.
    pub data: HashMap<String, Value>,
}

impl Rule {
    /// Serialize this rule as one Geoff line: descriptor, a tab, and the
    /// property data as compact JSON with keys in sorted order.
    pub fn to_line(&self) -> Result<String, NeorestError> {
        Ok(format!("{}\t{}", self.descriptor, data_json(&self.data)?))
    }
}

/// The Geoff rule for a node: `(17)` plus its property snapshot.
pub fn node_rule(node: &NodeRef) -> Rule {
    Rule {
        descriptor: format!("({})", node.id),
        data: node.properties.clone(),
    }
}

/// The Geoff rule for a relationship: `(1)-[9:KNOWS]->(2)` plus its
/// property snapshot.
pub fn rel_rule(rel: &RelRef) -> Rule {
    Rule {
        descriptor: format!("({})-[{}:{}]->({})", rel.start, rel.id, rel.rel_type, rel.end),
        data: rel.properties.clone(),
    }
}

/// An ordered collection of Geoff rules.
///
/// Built up with [`add`](Subgraph::add), or parsed from text with
/// [`parse`](Subgraph::parse) — either delimited lines or a JSON array of
/// rule strings, matching the two shapes Geoff files come in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Subgraph {
    rules: Vec<Rule>,
}

impl Subgraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a whole Geoff document.
    ///
    /// The text is either a JSON array of rule strings or plain
    /// line-delimited rules; both forms feed every rule through
    /// [`add`](Subgraph::add).
    pub fn parse(text: &str) -> Result<Self, NeorestError> {
        let mut subgraph = Self::new();
        if let Ok(lines) = serde_json::from_str::<Vec<String>>(text) {
            for line in lines {
                subgraph.add(&line)?;
            }
        } else {
            for line in text.lines() {
                subgraph.add(line)?;
            }
        }
        Ok(subgraph)
    }

    /// Add one rule line.
    ///
    /// Blank lines and `#` comments are ignored. The descriptor runs to the
    /// first whitespace; anything after it must parse as a JSON object and
    /// becomes the rule's property data.
    pub fn add(&mut self, rule: &str) -> Result<(), NeorestError> {
        let rule = rule.trim();
        if rule.is_empty() || rule.starts_with('#') {
            return Ok(());
        }
        let (descriptor, tail) = match rule.split_once(char::is_whitespace) {
            Some((descriptor, tail)) => (descriptor, tail.trim_start()),
            None => (rule, ""),
        };
        let data = if tail.is_empty() {
            HashMap::new()
        } else {
            match serde_json::from_str::<Json>(tail)? {
                Json::Object(obj) => {
                    let mut data = HashMap::with_capacity(obj.len());
                    for (k, v) in &obj {
                        data.insert(k.clone(), Value::decode(v)?);
                    }
                    data
                }
                other => {
                    let got = type_name(&Value::decode(&other)?);
                    return Err(NeorestError::Mapping(format!(
                        "geoff rule data must be a JSON object, got {got}"
                    )));
                }
            }
        };
        self.rules.push(Rule {
            descriptor: descriptor.to_owned(),
            data,
        });
        Ok(())
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Serialize every rule, one line each, joined by `\n`.
    pub fn to_text(&self) -> Result<String, NeorestError> {
        let lines = self
            .rules
            .iter()
            .map(Rule::to_line)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(lines.join("\n"))
    }
}

/// Serialize the entities of `paths` to Geoff text with `\r\n` line
/// endings (the format's conventional terminator).
pub fn dumps(paths: &[Path]) -> Result<String, NeorestError> {
    dumps_with_eol(paths, "\r\n")
}

/// Like [`dumps`] with an explicit line terminator.
///
/// Node rules come first, then relationship rules, each entity exactly once
/// even when several paths share it, ordered by identifier.
pub fn dumps_with_eol(paths: &[Path], eol: &str) -> Result<String, NeorestError> {
    let mut nodes: BTreeMap<u64, &NodeRef> = BTreeMap::new();
    let mut rels: BTreeMap<u64, &RelRef> = BTreeMap::new();
    for path in paths {
        for node in &path.nodes {
            nodes.entry(node.id).or_insert(node);
        }
        for rel in &path.rels {
            rels.entry(rel.id).or_insert(rel);
        }
    }
    let mut lines = Vec::with_capacity(nodes.len() + rels.len());
    for node in nodes.values() {
        lines.push(node_rule(node).to_line()?);
    }
    for rel in rels.values() {
        lines.push(rel_rule(rel).to_line()?);
    }
    Ok(lines.join(eol))
}

// Compact JSON with keys inserted in sorted order, so output is stable
// regardless of property map iteration order.
fn data_json(data: &HashMap<String, Value>) -> Result<String, NeorestError> {
    let mut keys: Vec<&String> = data.keys().collect();
    keys.sort();
    let mut out = serde_json::Map::with_capacity(data.len());
    for key in keys {
        out.insert(key.clone(), data[key].clone().into_json()?);
    }
    Ok(serde_json::to_string(&out)?)
}
