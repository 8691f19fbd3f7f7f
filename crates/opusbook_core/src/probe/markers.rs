//! OverDrive MediaMarkers XML parsing.
//!
//! The `OverDrive MediaMarkers` tag embeds a small XML document:
//!
//! ```xml
//! <metadata>
//!   <Marker>
//!     <Name>Chapter 1</Name>
//!     <Time>0:00.000</Time>
//!   </Marker>
//! </metadata>
//! ```
//!
//! Marker times use colon-separated base-60 components.

use crate::timecode::parse_clock;

use super::types::{ChapterMarker, ProbeError, ProbeResult};

/// Payload used when a file carries no MediaMarkers tag at all.
pub const EMPTY_MARKERS: &str = "<?xml version=\"1.0\" ?>\n<metadata/>";

/// Parse a MediaMarkers payload into chapter markers.
///
/// An unparsable document is fatal; individually malformed `Marker`
/// elements (missing name or time) are logged and skipped.
pub fn parse_media_markers(xml: &str) -> ProbeResult<Vec<ChapterMarker>> {
    let doc = roxmltree::Document::parse(xml)
        .map_err(|e| ProbeError::MarkerXml(e.to_string()))?;

    let mut markers = Vec::new();

    for node in doc.root_element().children().filter(|n| n.is_element()) {
        if node.tag_name().name() != "Marker" {
            tracing::warn!("unexpected element <{}> in media markers", node.tag_name().name());
            continue;
        }

        let mut name: Option<String> = None;
        let mut time: Option<f64> = None;

        for child in node.children().filter(|n| n.is_element()) {
            match child.tag_name().name() {
                "Name" => name = child.text().map(|s| s.to_string()),
                "Time" => time = child.text().and_then(|s| parse_clock(s.trim())),
                _ => {}
            }
        }

        match (name, time) {
            (Some(name), Some(time)) => markers.push(ChapterMarker::new(name, time)),
            (name, _) => {
                tracing::warn!("skipping malformed marker element (name = {:?})", name);
            }
        }
    }

    Ok(markers)
}
