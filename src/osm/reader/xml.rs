// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::io;
use std::str::{from_utf8, FromStr};

use quick_xml::events::{BytesStart, Event};

use super::model::{self, Feature};

/// Streams OSM [nodes and ways](Feature) out of an XML document.
///
/// A feature is only yielded once its closing tag has been seen, as `tag` and `nd`
/// children need to be attached first. Relations (and their children) are skipped.
pub(super) struct Reader<R: io::BufRead> {
    xml: quick_xml::Reader<R>,
    buf: Vec<u8>,
    pending: Option<Feature>,
    done: bool,
}

impl<R: io::BufRead> Reader<R> {
    pub(super) fn from_io(reader: R) -> Self {
        Self {
            xml: quick_xml::Reader::from_reader(reader),
            buf: Vec::default(),
            pending: None,
            done: false,
        }
    }
}

impl<R: io::BufRead> Iterator for Reader<R> {
    type Item = Result<Feature, quick_xml::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.done {
                return self.pending.take().map(Ok);
            }

            self.buf.clear();
            let event = match self.xml.read_event_into(&mut self.buf) {
                Ok(e) => e,
                Err(e) => {
                    self.done = true;
                    self.pending = None;
                    return Some(Err(e));
                }
            };

            let completed = match event {
                Event::Start(e) => {
                    open(&mut self.pending, &e);
                    None
                }
                Event::Empty(e) => {
                    open(&mut self.pending, &e);
                    close(&mut self.pending, e.local_name().as_ref())
                }
                Event::End(e) => close(&mut self.pending, e.local_name().as_ref()),
                Event::Eof => {
                    self.done = true;
                    None
                }
                _ => None,
            };

            if let Some(f) = completed {
                return Some(Ok(f));
            }
        }
    }
}

fn open(pending: &mut Option<Feature>, e: &BytesStart<'_>) {
    match e.local_name().as_ref() {
        b"node" => *pending = parse_node(e).map(Feature::Node),
        b"way" => *pending = parse_way(e).map(Feature::Way),
        b"relation" => *pending = None,

        b"tag" => {
            if let (Some(Feature::Way(w)), Some((k, v))) = (pending.as_mut(), parse_tag(e)) {
                w.tags.insert(k, v);
            }
        }

        b"nd" => {
            if let (Some(Feature::Way(w)), Some(node_id)) = (pending.as_mut(), attr::<i64>(e, "ref"))
            {
                if node_id != 0 {
                    w.nodes.push(node_id);
                }
            }
        }

        _ => {}
    }
}

fn close(pending: &mut Option<Feature>, name: &[u8]) -> Option<Feature> {
    match name {
        b"node" | b"way" => pending.take(),
        _ => None,
    }
}

/// Parses the value of a numeric attribute; `None` if it's missing or malformed.
fn attr<T: FromStr>(e: &BytesStart<'_>, key: &str) -> Option<T> {
    let a = e.try_get_attribute(key).ok()??;
    from_utf8(&a.value).ok()?.parse().ok()
}

fn parse_node(e: &BytesStart<'_>) -> Option<model::Node> {
    let node = match (attr::<i64>(e, "id"), attr::<f64>(e, "lat"), attr::<f64>(e, "lon")) {
        (Some(id), Some(lat), Some(lon)) if id != 0 && lat.is_finite() && lon.is_finite() => {
            Some(model::Node { id, lat, lon })
        }
        _ => None,
    };

    if node.is_none() {
        log::debug!("skipping node with invalid attributes");
    }
    node
}

fn parse_way(e: &BytesStart<'_>) -> Option<model::Way> {
    match attr::<i64>(e, "id") {
        Some(id) if id != 0 => Some(model::Way {
            id,
            nodes: Vec::default(),
            tags: HashMap::default(),
        }),
        _ => {
            log::debug!("skipping way without a valid id");
            None
        }
    }
}

fn parse_tag(e: &BytesStart<'_>) -> Option<(String, String)> {
    let k = e.try_get_attribute("k").ok()??.unescape_value().ok()?;
    let v = match e.try_get_attribute("v").ok()? {
        Some(v) => v.unescape_value().ok()?.into_owned(),
        None => String::default(),
    };
    Some((k.into_owned(), v))
}
