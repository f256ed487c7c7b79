// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::HashMap;

use crate::{CostModel, Direction, Edge};

/// Describes how to interpret OSM ways as [Edges](Edge), and how expensive
/// those edges are to traverse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Profile<'a> {
    /// Human readable name of the routing profile,
    /// customary the most specific [access tag](https://wiki.openstreetmap.org/wiki/Key:access).
    ///
    /// The name is mostly informative,
    /// except when set to "foot", which adds the following logic:
    /// `oneway` tags are ignored and only `oneway:foot` tags are considered, except on
    /// `highway=footway`, `highway=path`, `highway=steps`, `highway=platform`,
    /// `public_transport=platform` and `railway=platform`.
    pub name: &'a str,

    /// Array of tags which OSM ways can be used for routing.
    ///
    /// A way is matched against all [Penalty] objects in order, and
    /// once an exact key and value match is found, the way is used for routing
    /// and its edges get a [weight](CostModel::weight) proportional to the penalty.
    /// Ways not matching any [Penalty] are not routable.
    ///
    /// All penalties must be finite and not less than one.
    pub penalties: &'a [Penalty<'a>],

    /// Array of OSM [access tags](https://wiki.openstreetmap.org/wiki/Key:access#Land-based_transportation)
    /// (in order from least to most specific) to consider when checking for road prohibitions.
    ///
    /// Used for the access tags, and for finding mode-specific
    /// one-way restrictions (see [Profile::is_allowed] and [Profile::way_direction]).
    pub access: &'a [&'a str],

    /// Force no routing over [motorroad=yes](https://wiki.openstreetmap.org/wiki/Key:motorroad) ways.
    pub disallow_motorroad: bool,
}

/// Numeric multiplier for OSM ways with specific keys and values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Penalty<'a> {
    /// Key of an OSM way for which this Penalty applies,
    /// used for [Penalty::value] comparison (e.g. "highway" or "railway")
    pub key: &'a str,

    /// Value under [Penalty::key] of an OSM way for which this Penalty applies.
    /// E.g. "motorway", "residential" or "rail".
    pub value: &'a str,

    /// Multiplier of the length, to express preference for a specific way.
    /// Must be not less than one and a finite floating-point number.
    pub penalty: f64,
}

impl<'a> Penalty<'a> {
    pub const fn new(key: &'a str, value: &'a str, penalty: f64) -> Self {
        Self {
            key,
            value,
            penalty,
        }
    }

    fn is_valid(&self) -> bool {
        self.penalty.is_finite() && self.penalty >= 1.0
    }
}

impl<'a> Profile<'a> {
    /// Returns the penalty of the first [Penalty] matching the way's tags.
    /// Ways without a matching penalty, with an invalid penalty, or disallowed
    /// by [Profile::is_allowed] get [f64::INFINITY].
    pub fn way_penalty(&self, tags: &HashMap<String, String>) -> f64 {
        let matching = self
            .penalties
            .iter()
            .find(|p| tags.get(p.key).is_some_and(|v| v == p.value));

        match matching {
            Some(p) if p.is_valid() && self.is_allowed(tags) => p.penalty,
            _ => f64::INFINITY,
        }
    }

    fn valid_penalties(&self) -> impl Iterator<Item = f64> + '_ {
        self.penalties
            .iter()
            .filter(|p| p.is_valid())
            .map(|p| p.penalty)
    }

    /// Lowest valid penalty of the profile, or `None` if there are no valid penalties.
    pub fn min_penalty(&self) -> Option<f64> {
        self.valid_penalties().reduce(f64::min)
    }

    /// Highest valid penalty of the profile, or `None` if there are no valid penalties.
    pub fn max_penalty(&self) -> Option<f64> {
        self.valid_penalties().reduce(f64::max)
    }

    /// Checks [motorroad](Profile::disallow_motorroad) and the most specific
    /// [access tag](Profile::access) present on the way.
    pub fn is_allowed(&self, tags: &HashMap<String, String>) -> bool {
        if self.disallow_motorroad && tags.get("motorroad").is_some_and(|v| v == "yes") {
            return false;
        }

        let most_specific = self.access.iter().rev().find_map(|&mode| tags.get(mode));
        !most_specific.is_some_and(|v| v == "no" || v == "private")
    }

    /// Returns whether the way can be traversed along its nodes (first flag)
    /// and against them (second flag).
    ///
    /// An explicit `oneway` (or `oneway:MODE`) value wins. Otherwise, motorways,
    /// motorway links and roundabouts are one-way, except on foot.
    pub fn way_direction(&self, tags: &HashMap<String, String>) -> (bool, bool) {
        if let Some(flags) = self.active_oneway(tags).and_then(oneway_flags) {
            return flags;
        }

        let tag = |key: &str| tags.get(key).map(|v| v.as_str());
        let implied_oneway = !self.is_foot()
            && (matches!(tag("highway"), Some("motorway" | "motorway_link"))
                || matches!(tag("junction"), Some("roundabout" | "circular")));

        (true, !implied_oneway)
    }

    /// Picks the oneway tag relevant for this profile: the most specific `oneway:MODE`
    /// tag, falling back to `oneway`. On foot only `oneway:foot` counts, and `oneway`
    /// only on ways dedicated to pedestrians.
    fn active_oneway<'t>(&self, tags: &'t HashMap<String, String>) -> Option<&'t str> {
        let value = if self.is_foot() {
            tags.get("oneway:foot").or_else(|| {
                if is_pedestrian_way(tags) {
                    tags.get("oneway")
                } else {
                    None
                }
            })
        } else {
            self.access
                .iter()
                .rev()
                .filter(|&&mode| mode != "access")
                .find_map(|mode| tags.get(&format!("oneway:{mode}")))
                .or_else(|| tags.get("oneway"))
        };

        value.map(|v| v.as_str())
    }

    fn is_foot(&self) -> bool {
        self.name == "foot"
    }
}

/// Interprets a oneway tag value; `None` for unknown values.
fn oneway_flags(value: &str) -> Option<(bool, bool)> {
    match value {
        "yes" | "true" | "1" => Some((true, false)),
        "-1" | "reverse" => Some((false, true)),
        "no" => Some((true, true)),
        _ => None,
    }
}

fn is_pedestrian_way(tags: &HashMap<String, String>) -> bool {
    let tag = |key: &str| tags.get(key).map(|v| v.as_str());
    matches!(tag("highway"), Some("footway" | "path" | "steps" | "platform"))
        || tag("public_transport") == Some("platform")
        || tag("railway") == Some("platform")
}

/// Weights edges by the penalty of their tags, scaled by the profile's highest penalty,
/// so that the least preferred ways have a weight of 1.
impl CostModel for Profile<'_> {
    fn weight(&self, edge: &Edge) -> f64 {
        let penalty = self.way_penalty(&edge.tags);
        match self.max_penalty() {
            Some(max) if penalty.is_finite() => penalty / max,
            _ => 1.0,
        }
    }

    fn min_weight(&self) -> f64 {
        match (self.min_penalty(), self.max_penalty()) {
            (Some(min), Some(max)) => min / max,
            _ => 1.0,
        }
    }

    fn direction(&self, edge: &Edge) -> Direction {
        if self.way_penalty(&edge.tags).is_infinite() {
            return Direction::Blocked;
        }

        let (forward, backward) = self.way_direction(&edge.tags);
        Direction::from_flags(forward, backward)
    }
}

const fn highway(value: &str, penalty: f64) -> Penalty<'_> {
    Penalty::new("highway", value, penalty)
}

/// Car [Profile], strongly preferring major roads.
pub const CAR_PROFILE: Profile = Profile {
    name: "motorcar",
    penalties: &[
        highway("motorway", 1.0),
        highway("motorway_link", 1.0),
        highway("trunk", 2.0),
        highway("trunk_link", 2.0),
        highway("primary", 5.0),
        highway("primary_link", 5.0),
        highway("secondary", 6.5),
        highway("secondary_link", 6.5),
        highway("tertiary", 10.0),
        highway("tertiary_link", 10.0),
        highway("unclassified", 10.0),
        highway("residential", 15.0),
        highway("living_street", 20.0),
        highway("service", 20.0),
    ],
    access: &["access", "vehicle", "motor_vehicle", "motorcar"],
    disallow_motorroad: false,
};

/// Bicycle [Profile], preferring cycleways and quiet streets.
pub const BICYCLE_PROFILE: Profile = Profile {
    name: "bicycle",
    penalties: &[
        highway("cycleway", 1.0),
        highway("residential", 1.0),
        highway("living_street", 1.5),
        highway("path", 2.0),
        highway("track", 2.0),
        highway("service", 2.0),
        highway("unclassified", 2.5),
        highway("tertiary", 2.5),
        highway("secondary", 3.0),
        highway("footway", 3.0),
        highway("primary", 10.0),
        highway("trunk", 50.0),
    ],
    access: &["access", "vehicle", "bicycle"],
    disallow_motorroad: true,
};

/// Walking [Profile], preferring pedestrian ways and avoiding major roads.
pub const FOOT_PROFILE: Profile = Profile {
    name: "foot",
    penalties: &[
        highway("pedestrian", 1.0),
        highway("footway", 1.05),
        highway("path", 1.05),
        highway("platform", 1.1),
        Penalty::new("railway", "platform", 1.1),
        Penalty::new("public_transport", "platform", 1.1),
        highway("steps", 1.15),
        highway("residential", 1.2),
        highway("living_street", 1.2),
        highway("service", 1.2),
        highway("track", 1.2),
        highway("unclassified", 1.2),
        highway("tertiary", 1.2),
        highway("secondary", 1.3),
        highway("primary", 2.0),
        highway("trunk", 4.0),
    ],
    access: &["access", "foot"],
    disallow_motorroad: true,
};
