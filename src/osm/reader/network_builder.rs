// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::HashMap;

use super::model;
use super::Options;
use crate::osm::Error;
use crate::{Edge, Network, Point};

/// Helper object used for storing state related to converting [OSM features](model::Feature)
/// into [Edges](Edge) of a [Network].
///
/// Ways can only be cut into edges once it is known which of their nodes are shared
/// with other ways, so routable ways are buffered until all features have been read.
pub(super) struct NetworkBuilder<'a> {
    n: &'a mut Network,
    options: &'a Options<'a>,
    nodes: HashMap<i64, Point>,
    ways: Vec<model::Way>,
    ignore_bbox: bool,
}

impl<'a> NetworkBuilder<'a> {
    /// Create a new, empty network builder.
    pub(super) fn new(n: &'a mut Network, options: &'a Options<'a>) -> Self {
        let ignore_bbox =
            options.bbox.iter().all(|&x| x == 0.0) || options.bbox.iter().any(|x| !x.is_finite());

        Self {
            n,
            options,
            nodes: HashMap::default(),
            ways: Vec::default(),
            ignore_bbox,
        }
    }

    /// Add all features from the provided iterator, and then append the resulting
    /// edges to the network.
    pub(super) fn add_features<I, E>(mut self, features: I) -> Result<(), Error>
    where
        I: Iterator<Item = Result<model::Feature, E>>,
        E: Into<Error>,
    {
        for f in features {
            match f.map_err(Into::into)? {
                model::Feature::Node(n) => self.add_node(n),
                model::Feature::Way(w) => self.add_way(w),
            }
        }

        self.build();
        Ok(())
    }

    fn add_node(&mut self, n: model::Node) {
        if n.id != 0 && self.is_in_bbox(n.lat, n.lon) {
            self.nodes.insert(n.id, Point::new(n.lon, n.lat));
        }
    }

    fn is_in_bbox(&self, lat: f64, lon: f64) -> bool {
        if self.ignore_bbox {
            return true;
        }
        let [min_lon, min_lat, max_lon, max_lat] = self.options.bbox;
        lat >= min_lat && lat <= max_lat && lon >= min_lon && lon <= max_lon
    }

    fn add_way(&mut self, mut w: model::Way) {
        if self.options.profile.way_penalty(&w.tags).is_infinite() {
            return;
        }

        w.nodes.dedup();
        self.ways.push(w);
    }

    /// Removes references to unknown nodes (and the consecutive duplicates
    /// this might create) from all buffered ways, dropping ways which become too short.
    fn retain_known_nodes(&mut self) {
        let nodes = &self.nodes;
        self.ways.retain_mut(|w| {
            w.nodes.retain(|id| nodes.contains_key(id));
            w.nodes.dedup();

            if w.nodes.len() < 2 {
                log::debug!("skipping way {} with less than 2 known nodes", w.id);
                false
            } else {
                true
            }
        });
    }

    /// Counts how many times every node is referenced by all buffered ways.
    fn node_usage(&self) -> HashMap<i64, u32> {
        let mut usage = HashMap::<i64, u32>::default();
        for node_id in self.ways.iter().flat_map(|w| w.nodes.iter()) {
            *usage.entry(*node_id).or_default() += 1;
        }
        usage
    }

    fn build(mut self) {
        self.retain_known_nodes();
        let usage = self.node_usage();
        let mut edges: usize = 0;

        for w in &self.ways {
            let mut piece: Vec<Point> = Vec::default();

            for (idx, node_id) in w.nodes.iter().enumerate() {
                let Some(&at) = self.nodes.get(node_id) else {
                    continue;
                };
                piece.push(at);

                let is_last = idx == w.nodes.len() - 1;
                let is_shared = usage.get(node_id).is_some_and(|&count| count > 1);

                if piece.len() >= 2 && (is_last || is_shared) {
                    let geometry = std::mem::replace(&mut piece, vec![at]);
                    if self.n.add_edge(Edge::with_tags(w.id, geometry, w.tags.clone())) {
                        edges += 1;
                    }
                }
            }
        }

        log::debug!(
            "loaded {} edges out of {} ways and {} nodes",
            edges,
            self.ways.len(),
            self.nodes.len()
        );
    }
}
