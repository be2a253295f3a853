//! Pipelines of ops that process records one at a time.
//!
//! A [`Graph`] is an ordered list of nodes. Every node is either a *transform*, which edits the
//! record it is given and always hands it on, or a *filter*, which may remove the record from the
//! main stream (and may log it to a side output for curation). Nodes run in the order they were
//! added, so a node only ever sees fields produced by the nodes before it.
//!
//! [`Graph::stream`] chains a record source through the graph lazily: pulling one record out of
//! the [`Stream`] pulls exactly one source record through every node. Nothing is buffered.

pub mod ops;

pub use crate::errors::*;
pub use crate::record::*;
pub use ops::*;

use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Maps a record to a record, never removes it.
    Transform,
    /// Maps a record to a record or removes it.
    Filter,
}

pub trait GraphNode {
    /// Process one record. `Ok(None)` removes the record from the main stream.
    fn run(&mut self, record: Record) -> Result<Option<Record>>;

    fn kind(&self) -> NodeKind;

    fn name(&self) -> &'static str;

    /// Called once after the last record, to flush side outputs.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// What to do with a feed line that cannot be parsed into a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedPolicy {
    /// Log the line and carry on with the next one.
    #[default]
    Skip,
    /// Stop the run.
    Fail,
    /// Skip without logging, for a feed that was already read once.
    Ignore,
}

#[derive(Default)]
pub struct Graph {
    nodes: Vec<Box<dyn GraphNode>>,
    removed: Vec<usize>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node. Nodes run in the order they are added.
    pub fn add(&mut self, node: impl GraphNode + 'static) -> &mut Self {
        self.nodes.push(Box::new(node));
        self.removed.push(0);
        self
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Run one record through every node, stopping at the first node that removes it.
    pub fn run_one(&mut self, record: Record) -> Result<Option<Record>> {
        let mut curr = record;

        for (i, node) in self.nodes.iter_mut().enumerate() {
            let line_number = curr.line_number();
            match node.run(curr)? {
                Some(r) => curr = r,
                None => {
                    if node.kind() == NodeKind::Transform {
                        return Err(Error::TransformDropped {
                            node: node.name(),
                            line_number,
                        });
                    }
                    debug!(node = node.name(), line_number, "record removed");
                    self.removed[i] += 1;
                    return Ok(None);
                }
            }
        }

        Ok(Some(curr))
    }

    /// Lazily pull records from `source` through the graph.
    pub fn stream<I>(&mut self, source: I, policy: MalformedPolicy) -> Stream<'_, I>
    where
        I: Iterator<Item = Result<Record>>,
    {
        Stream {
            graph: self,
            source,
            policy,
            read: 0,
            malformed: 0,
        }
    }

    /// Flush every node's side outputs.
    pub fn finish(&mut self) -> Result<()> {
        self.nodes.iter_mut().try_for_each(|n| n.finish())
    }

    /// How many records each node removed so far, in node order.
    pub fn removed_counts(&self) -> impl Iterator<Item = (&'static str, usize)> + '_ {
        self.nodes
            .iter()
            .zip(self.removed.iter())
            .map(|(n, &c)| (n.name(), c))
    }
}

pub struct Stream<'g, I> {
    graph: &'g mut Graph,
    source: I,
    policy: MalformedPolicy,
    read: usize,
    malformed: usize,
}

impl<'g, I> Stream<'g, I> {
    /// Number of records pulled from the source, including malformed lines.
    pub fn read(&self) -> usize {
        self.read
    }

    /// Number of source lines skipped because they could not be parsed.
    pub fn malformed(&self) -> usize {
        self.malformed
    }
}

impl<'g, I> Iterator for Stream<'g, I>
where
    I: Iterator<Item = Result<Record>>,
{
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let record = match self.source.next()? {
                Ok(r) => r,
                Err(e @ Error::ParseRecord { .. }) => {
                    self.read += 1;
                    match self.policy {
                        MalformedPolicy::Fail => return Some(Err(e)),
                        MalformedPolicy::Skip => warn!("skipping malformed record: {e}"),
                        MalformedPolicy::Ignore => {}
                    }
                    self.malformed += 1;
                    continue;
                }
                Err(e) => return Some(Err(e)),
            };
            self.read += 1;

            match self.graph.run_one(record) {
                Ok(Some(r)) => return Some(Ok(r)),
                Ok(None) => continue,
                Err(e) => return Some(Err(e)),
            }
        }
    }
}
