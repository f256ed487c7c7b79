// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::fs::File;
use std::io::{self, BufRead};
use std::path::Path;

use network_builder::NetworkBuilder;

use super::{Error, Profile};
use crate::Network;

mod model;
mod network_builder;
mod xml;

/// Format of the input OSM file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Unknown format - guess the format based on the content
    Unknown,

    /// Force uncompressed [OSM XML](https://wiki.openstreetmap.org/wiki/OSM_XML)
    Xml,

    /// Force [OSM XML](https://wiki.openstreetmap.org/wiki/OSM_XML)
    /// with [gzip](https://en.wikipedia.org/wiki/Gzip) compression
    XmlGz,

    /// Force [OSM XML](https://wiki.openstreetmap.org/wiki/OSM_XML)
    /// with [bzip2](https://en.wikipedia.org/wiki/Bzip2) compression
    XmlBz2,
}

impl FileFormat {
    /// Guesses the format of a file from its first bytes.
    ///
    /// [OSM PBF](https://wiki.openstreetmap.org/wiki/PBF_Format) files are recognized
    /// (by the "OSMHeader" blob type near the start), but can't be read.
    fn detect(head: &[u8]) -> Result<Self, Error> {
        if head.starts_with(&[0x1f, 0x8b]) {
            Ok(Self::XmlGz)
        } else if head.starts_with(b"BZh") {
            Ok(Self::XmlBz2)
        } else if head.len() >= 16 && head[..16].windows(9).any(|w| w == b"OSMHeader") {
            Err(Error::UnsupportedFormat("osm.pbf"))
        } else {
            Ok(Self::Xml)
        }
    }
}

/// Additional controls for interpreting OSM data as a [Network].
#[derive(Debug)]
pub struct Options<'a> {
    /// Which ways are routable. Only ways with a [penalty](Profile::way_penalty)
    /// are added to the network.
    pub profile: &'a Profile<'a>,

    /// Format of the input data.
    pub file_format: FileFormat,

    /// Filter features by a specific bounding box. In order: left (min lon), bottom (min lat),
    /// right (max lon), top (max lat). Ignored if all values are set to zero, or at least one
    /// of them is not finite.
    pub bbox: [f64; 4],
}

/// Parse OSM features from a reader into a [Network] as per the provided [Options].
///
/// The provided stream will be automatically wrapped in a buffered reader when needed.
pub fn add_features_from_io<'a, R: io::Read>(
    n: &'a mut Network,
    options: &'a Options<'a>,
    reader: R,
) -> Result<(), Error> {
    let mut b = io::BufReader::new(reader);
    let format = match options.file_format {
        FileFormat::Unknown => FileFormat::detect(b.fill_buf()?)?,
        format => format,
    };
    log::debug!("reading osm data as {:?}", format);

    match format {
        FileFormat::Unknown | FileFormat::Xml => {
            let r = xml::Reader::from_io(b);
            NetworkBuilder::new(n, options).add_features(r)
        }

        FileFormat::XmlGz => {
            let d = flate2::read::MultiGzDecoder::new(b);
            let r = xml::Reader::from_io(io::BufReader::new(d));
            NetworkBuilder::new(n, options).add_features(r)
        }

        FileFormat::XmlBz2 => {
            let d = bzip2::read::MultiBzDecoder::new(b);
            let r = xml::Reader::from_io(io::BufReader::new(d));
            NetworkBuilder::new(n, options).add_features(r)
        }
    }
}

/// Parse OSM features from a file at the provided path into a [Network] as per the provided [Options].
pub fn add_features_from_file<'a, P: AsRef<Path>>(
    n: &'a mut Network,
    options: &'a Options<'a>,
    path: P,
) -> Result<(), Error> {
    let f = File::open(path)?;
    add_features_from_io(n, options, f)
}

/// Parse OSM features from a static buffer into a [Network] as per the provided [Options].
pub fn add_features_from_buffer<'a>(
    n: &'a mut Network,
    options: &'a Options<'a>,
    data: &[u8],
) -> Result<(), Error> {
    let format = match options.file_format {
        FileFormat::Unknown => FileFormat::detect(data)?,
        format => format,
    };

    if format == FileFormat::Xml {
        // Slices are already buffered
        let r = xml::Reader::from_io(data);
        NetworkBuilder::new(n, options).add_features(r)
    } else {
        // Wrap the buffer in a cursor and use the IO path
        add_features_from_io(n, options, io::Cursor::new(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_format() {
        assert_eq!(
            FileFormat::detect(b"<?xml version='1.0'?>").ok(),
            Some(FileFormat::Xml)
        );
        assert_eq!(
            FileFormat::detect(&[0x1f, 0x8b, 0x08, 0x00]).ok(),
            Some(FileFormat::XmlGz)
        );
        assert_eq!(
            FileFormat::detect(b"BZh91AY&SY").ok(),
            Some(FileFormat::XmlBz2)
        );
        assert_eq!(FileFormat::detect(b"").ok(), Some(FileFormat::Xml));
        assert!(matches!(
            FileFormat::detect(b"\x00\x00\x00\x0d\x0a\x09OSMHeader\x18\x9e\x01"),
            Err(Error::UnsupportedFormat(_))
        ));
    }
}
