// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::HashMap;

/// Represents an [OSM node](https://wiki.openstreetmap.org/wiki/Node).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node {
    pub id: i64,
    pub lat: f64,
    pub lon: f64,
}

/// Represents an [OSM way](https://wiki.openstreetmap.org/wiki/Way).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Way {
    pub id: i64,
    pub nodes: Vec<i64>,
    pub tags: HashMap<String, String>,
}

/// OSM features relevant for building a [Network](crate::Network).
/// [Relations](https://wiki.openstreetmap.org/wiki/Relation) are skipped by readers.
#[derive(Debug, Clone)]
pub enum Feature {
    Node(Node),
    Way(Way),
}
