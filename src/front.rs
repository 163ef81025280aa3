// Copyright 2025 Lars Brubaker
// License: MIT (sweep algorithm derived from Poly2Tri, BSD 3-Clause)
//
// The advancing front: the lower-to-upper boundary of the partially built
// mesh, kept as a doubly linked list of nodes sorted by ascending x.
//
// Nodes live in a Vec arena and are never reused. A removed node keeps its own
// prev/next links; only its neighbors are re-linked around it. Lookups start
// from a search hint (the last node found) and walk left or right.

use crate::error::TriangulationError;
use crate::geom::Real;
use crate::mesh::{PointIdx, TriIdx};

/// Index into AdvancingFront::nodes
pub type NodeIdx = u32;

#[derive(Clone, Debug)]
pub struct FrontNode {
    pub point: PointIdx,
    /// x of `point`, cached for the directed search.
    pub x: Real,
    /// The triangle filling the wedge to the right of this node.
    pub triangle: Option<TriIdx>,
    pub next: Option<NodeIdx>,
    pub prev: Option<NodeIdx>,
}

impl FrontNode {
    pub fn new(point: PointIdx, x: Real) -> Self {
        FrontNode {
            point,
            x,
            triangle: None,
            next: None,
            prev: None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct AdvancingFront {
    pub nodes: Vec<FrontNode>,
    pub head: NodeIdx,
    pub tail: NodeIdx,
    search: NodeIdx,
}

impl AdvancingFront {
    /// Build the three-node front `head -> middle -> tail`. Head and middle
    /// both start out owning `triangle`; the tail has nothing to its right.
    pub fn seed(head: FrontNode, middle: FrontNode, tail: FrontNode, triangle: TriIdx) -> Self {
        let mut nodes = vec![head, middle, tail];
        nodes[0].triangle = Some(triangle);
        nodes[0].next = Some(1);
        nodes[0].prev = None;
        nodes[1].triangle = Some(triangle);
        nodes[1].prev = Some(0);
        nodes[1].next = Some(2);
        nodes[2].triangle = None;
        nodes[2].prev = Some(1);
        nodes[2].next = None;
        AdvancingFront {
            nodes,
            head: 0,
            tail: 2,
            search: 0,
        }
    }

    #[inline]
    pub fn node(&self, n: NodeIdx) -> &FrontNode {
        &self.nodes[n as usize]
    }

    #[inline]
    pub fn node_mut(&mut self, n: NodeIdx) -> &mut FrontNode {
        &mut self.nodes[n as usize]
    }

    #[inline]
    pub fn point(&self, n: NodeIdx) -> PointIdx {
        self.nodes[n as usize].point
    }

    #[inline]
    pub fn next(&self, n: NodeIdx) -> Option<NodeIdx> {
        self.nodes[n as usize].next
    }

    #[inline]
    pub fn prev(&self, n: NodeIdx) -> Option<NodeIdx> {
        self.nodes[n as usize].prev
    }

    #[inline]
    pub fn triangle(&self, n: NodeIdx) -> Option<TriIdx> {
        self.nodes[n as usize].triangle
    }

    pub fn search_node(&self) -> NodeIdx {
        self.search
    }

    /// Link a new node for `point` directly after `node`.
    pub fn insert_after(&mut self, node: NodeIdx, point: PointIdx, x: Real) -> NodeIdx {
        let idx = self.nodes.len() as NodeIdx;
        let next = self.next(node);
        let mut n = FrontNode::new(point, x);
        n.prev = Some(node);
        n.next = next;
        self.nodes.push(n);
        if let Some(next) = next {
            self.node_mut(next).prev = Some(idx);
        }
        self.node_mut(node).next = Some(idx);
        idx
    }

    /// Unlink `node` from the list. Its own links are left as they were.
    pub fn remove(&mut self, node: NodeIdx) {
        let prev = self.prev(node);
        let next = self.next(node);
        if let Some(p) = prev {
            self.node_mut(p).next = next;
        }
        if let Some(n) = next {
            self.node_mut(n).prev = prev;
        }
        if self.search == node {
            self.search = prev.or(next).unwrap_or(self.head);
        }
    }

    /// The node whose x-range `[node.x, node.next.x)` contains `x`.
    pub fn locate_node(&mut self, x: Real) -> Option<NodeIdx> {
        let mut node = self.search;
        if x < self.node(node).x {
            while let Some(p) = self.prev(node) {
                node = p;
                if x >= self.node(node).x {
                    self.search = node;
                    return Some(node);
                }
            }
        } else {
            while let Some(n) = self.next(node) {
                if x < self.node(n).x {
                    self.search = node;
                    return Some(node);
                }
                node = n;
            }
        }
        None
    }

    /// The node holding `point`, or None when the point is not on the front.
    ///
    /// Two adjacent nodes may briefly share the same x; when the hint has the
    /// same x but a different point, only its direct neighbors are checked.
    pub fn locate_point(
        &mut self,
        point: PointIdx,
        x: Real,
    ) -> Result<Option<NodeIdx>, TriangulationError> {
        let mut node = self.search;
        let nx = self.node(node).x;
        let found = if x == nx {
            if self.point(node) == point {
                Some(node)
            } else if let Some(p) = self.prev(node).filter(|&p| self.point(p) == point) {
                Some(p)
            } else if let Some(n) = self.next(node).filter(|&n| self.point(n) == point) {
                Some(n)
            } else {
                return Err(TriangulationError::MissingFrontNode { point });
            }
        } else if x < nx {
            loop {
                match self.prev(node) {
                    Some(p) if self.point(p) == point => break Some(p),
                    Some(p) => node = p,
                    None => break None,
                }
            }
        } else {
            loop {
                match self.next(node) {
                    Some(n) if self.point(n) == point => break Some(n),
                    Some(n) => node = n,
                    None => break None,
                }
            }
        };
        if let Some(n) = found {
            self.search = n;
        }
        Ok(found)
    }

    /// Live nodes from head to tail.
    pub fn iter(&self) -> FrontIter<'_> {
        FrontIter {
            front: self,
            cur: Some(self.head),
        }
    }
}

impl Default for AdvancingFront {
    /// An empty front. Only usable once replaced by `seed`.
    fn default() -> Self {
        AdvancingFront {
            nodes: Vec::new(),
            head: 0,
            tail: 0,
            search: 0,
        }
    }
}

pub struct FrontIter<'a> {
    front: &'a AdvancingFront,
    cur: Option<NodeIdx>,
}

impl Iterator for FrontIter<'_> {
    type Item = NodeIdx;

    fn next(&mut self) -> Option<NodeIdx> {
        let n = self.cur?;
        self.cur = self.front.next(n);
        Some(n)
    }
}
