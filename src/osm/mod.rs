// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Loading [Networks](crate::Network) from [OpenStreetMap](https://www.openstreetmap.org/) data.
//!
//! Nodes are used as points without any reprojection (`x` is the longitude and `y`
//! the latitude), and every routable way is cut into [Edges](crate::Edge) at the nodes
//! it shares with other ways. Relations (and thus turn restrictions) are ignored.

use std::io;

mod profile;
mod reader;

pub use profile::{Penalty, Profile, BICYCLE_PROFILE, CAR_PROFILE, FOOT_PROFILE};
pub use reader::{
    add_features_from_buffer, add_features_from_file, add_features_from_io, FileFormat, Options,
};

/// Error which can occur when loading OSM data.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("xml: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("unsupported file format: {0}")]
    UnsupportedFormat(&'static str),
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::{EdgeSource, Network, Point};

    const SIMPLE_XML: &[u8] = br#"<?xml version='1.0' encoding='UTF-8'?>
<osm version='0.6'>
  <node id='-1' lat='0.0' lon='0.0' />
  <node id='-2' lat='0.0' lon='0.001' />
  <node id='-3' lat='0.0' lon='0.002' />
  <node id='-4' lat='0.001' lon='0.001' />
  <node id='-5' lat='0.001' lon='0.002' />
  <way id='-100'>
    <nd ref='-1' />
    <nd ref='-2' />
    <nd ref='-3' />
    <tag k='highway' v='primary' />
  </way>
  <way id='-101'>
    <nd ref='-2' />
    <nd ref='-4' />
    <tag k='highway' v='residential' />
    <tag k='oneway' v='yes' />
  </way>
  <way id='-102'>
    <nd ref='-4' />
    <nd ref='-5' />
    <tag k='highway' v='footway' />
  </way>
  <way id='-103'>
    <nd ref='-3' />
    <nd ref='-5' />
    <tag k='highway' v='service' />
    <tag k='access' v='private' />
  </way>
  <relation id='-200'>
    <member type='way' ref='-100' role='from' />
    <member type='node' ref='-2' role='via' />
    <member type='way' ref='-101' role='to' />
    <tag k='type' v='restriction' />
    <tag k='restriction' v='no_left_turn' />
  </relation>
</osm>
"#;

    fn load(data: &[u8], file_format: FileFormat) -> Result<Network, Error> {
        let mut n = Network::default();
        let options = Options {
            profile: &CAR_PROFILE,
            file_format,
            bbox: [0.0; 4],
        };
        add_features_from_buffer(&mut n, &options, data)?;
        Ok(n)
    }

    fn check_simple_network(n: &Network) {
        // -100 is cut in two at -2; -102 isn't routable by car, and -103 is private
        let ids: Vec<i64> = n.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![-100, -100, -101]);

        let touching: Vec<i64> = n
            .edges_touching(Point::new(0.001, 0.0), 1e-9)
            .iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(touching, vec![-100, -100, -101]);

        let oneway = n.get(2).unwrap();
        assert_eq!(oneway.first(), Point::new(0.001, 0.0));
        assert_eq!(oneway.last(), Point::new(0.001, 0.001));
        assert_eq!(oneway.tags.get("oneway").map(|v| v.as_str()), Some("yes"));
    }

    #[test]
    fn load_xml() -> Result<(), Error> {
        check_simple_network(&load(SIMPLE_XML, FileFormat::Xml)?);
        check_simple_network(&load(SIMPLE_XML, FileFormat::Unknown)?);
        Ok(())
    }

    #[test]
    fn load_xml_gz() -> Result<(), Error> {
        let mut e = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::fast());
        e.write_all(SIMPLE_XML)?;
        let data = e.finish()?;

        check_simple_network(&load(&data, FileFormat::XmlGz)?);
        check_simple_network(&load(&data, FileFormat::Unknown)?);
        Ok(())
    }

    #[test]
    fn load_xml_bz2() -> Result<(), Error> {
        let mut e = bzip2::write::BzEncoder::new(Vec::new(), bzip2::Compression::fast());
        e.write_all(SIMPLE_XML)?;
        let data = e.finish()?;

        check_simple_network(&load(&data, FileFormat::Unknown)?);
        Ok(())
    }

    #[test]
    fn load_from_io() -> Result<(), Error> {
        let mut n = Network::default();
        let options = Options {
            profile: &CAR_PROFILE,
            file_format: FileFormat::Unknown,
            bbox: [0.0; 4],
        };
        add_features_from_io(&mut n, &options, io::Cursor::new(SIMPLE_XML))?;
        check_simple_network(&n);
        Ok(())
    }

    #[test]
    fn rejects_pbf() {
        let data = b"\x00\x00\x00\x0d\x0a\x09OSMHeader\x18\x9e\x01\x00\x00\x00";
        assert!(matches!(
            load(data, FileFormat::Unknown),
            Err(Error::UnsupportedFormat("osm.pbf"))
        ));
    }

    #[test]
    fn reports_malformed_xml() {
        let data = b"<osm><way id='1'><nd ref='1'/></node></osm>";
        assert!(matches!(load(data, FileFormat::Xml), Err(Error::Xml(_))));
    }
}
