//! Dive profile segments.

use std::ops::{Index, IndexMut};

use crate::gas::Gas;

/// A timed leg of the dive with linear depth change.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    /// Depth in meters at the start of the segment
    pub start_depth: f64,
    /// Depth in meters at the end of the segment
    pub end_depth: f64,
    /// Duration in seconds
    pub duration: f64,
    pub gas: Gas,
    /// Index of the tank breathed from, if the diver assigned one.
    pub tank: Option<usize>,
}

impl Segment {
    pub fn new(start_depth: f64, end_depth: f64, gas: Gas, duration: f64) -> Self {
        Self {
            start_depth,
            end_depth,
            duration: duration.max(0.0),
            gas,
            tank: None,
        }
    }

    pub fn with_tank(mut self, tank: usize) -> Self {
        self.tank = Some(tank);
        self
    }

    pub fn average_depth(&self) -> f64 {
        (self.start_depth + self.end_depth) / 2.0
    }

    pub fn is_flat(&self) -> bool {
        self.start_depth == self.end_depth
    }

    /// Depth change in meters per second, positive when descending.
    pub fn speed(&self) -> f64 {
        if self.duration <= 0.0 {
            return 0.0;
        }

        (self.end_depth - self.start_depth) / self.duration
    }
}

/// Ordered, continuous list of segments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Segments {
    items: Vec<Segment>,
}

impl Segments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_vec(items: Vec<Segment>) -> Self {
        Self { items }
    }

    pub fn push(&mut self, segment: Segment) -> &mut Segment {
        self.items.push(segment);
        let last = self.items.len() - 1;
        &mut self.items[last]
    }

    /// Adds a segment changing depth from the current end depth (surface if empty).
    pub fn add_change_depth(&mut self, end_depth: f64, gas: Gas, duration: f64) -> &mut Segment {
        let start_depth = self.end_depth();
        self.push(Segment::new(start_depth, end_depth, gas, duration))
    }

    /// Adds a flat segment at the current end depth.
    pub fn add_flat(&mut self, gas: Gas, duration: f64) -> &mut Segment {
        let depth = self.end_depth();
        self.push(Segment::new(depth, depth, gas, duration))
    }

    pub fn last(&self) -> Option<&Segment> {
        self.items.last()
    }

    pub fn last_mut(&mut self) -> Option<&mut Segment> {
        self.items.last_mut()
    }

    /// Depth at the end of the profile, surface for an empty profile.
    pub fn end_depth(&self) -> f64 {
        self.items.last().map_or(0.0, |s| s.end_depth)
    }

    /// Total duration in seconds.
    pub fn duration(&self) -> f64 {
        self.items.iter().map(|s| s.duration).sum()
    }

    pub fn max_depth(&self) -> f64 {
        max_depth(&self.items)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Segment> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Segment] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<Segment> {
        self.items
    }
}

impl Index<usize> for Segments {
    type Output = Segment;

    fn index(&self, index: usize) -> &Segment {
        &self.items[index]
    }
}

impl IndexMut<usize> for Segments {
    fn index_mut(&mut self, index: usize) -> &mut Segment {
        &mut self.items[index]
    }
}

impl From<Vec<Segment>> for Segments {
    fn from(items: Vec<Segment>) -> Self {
        Self::from_vec(items)
    }
}

impl<'a> IntoIterator for &'a Segments {
    type Item = &'a Segment;
    type IntoIter = std::slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Deepest point reached by the segments in meters.
pub fn max_depth(segments: &[Segment]) -> f64 {
    segments
        .iter()
        .map(|s| s.start_depth.max(s.end_depth))
        .fold(0.0_f64, f64::max)
}
