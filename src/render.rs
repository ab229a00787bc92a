//! Renders classified stops onto a Leaflet map saved as a standalone HTML page.

use std::fs;
use std::path::Path;

use anyhow::Result;
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::feed::Feed;
use crate::params::RunParameters;
use crate::pipeline::{FrequencyResult, Tier};

pub const DEFAULT_MAP_PATH: &str = "Output/map.html";

const TEMPLATE: &str = r##"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>__TITLE__</title>
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css">
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<style>
  html, body, #map { height: 100%; margin: 0; }
  .legend { background: white; padding: 6px 10px; line-height: 20px; font: 13px sans-serif; }
  .legend i { display: inline-block; width: 12px; height: 12px; margin-right: 6px; border-radius: 50%; }
</style>
</head>
<body>
<div id="map"></div>
<script>
const stops = __STOPS__;
const tiers = __LEGEND__;
const escape = (s) => String(s).replace(/[&<>"']/g, (c) => "&#" + c.charCodeAt(0) + ";");

const map = L.map("map");
L.tileLayer("https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png", {
  maxZoom: 19,
  attribution: "&copy; OpenStreetMap contributors",
}).addTo(map);

const markers = stops.features.map((f) => {
  const [lon, lat] = f.geometry.coordinates;
  const p = f.properties;
  return L.circleMarker([lat, lon], {
    radius: 5,
    color: p.color,
    fillColor: p.color,
    fillOpacity: 0.8,
    weight: 1,
  }).bindPopup(
    "<b>" + escape(p.name) + "</b><br>" +
    p.count + " trips, " + p.frequency.toFixed(2) + " trips/hour"
  );
});
const group = L.featureGroup(markers).addTo(map);
if (markers.length > 0) {
  map.fitBounds(group.getBounds());
} else {
  map.setView([0, 0], 2);
}

const legend = L.control({ position: "bottomright" });
legend.onAdd = () => {
  const div = L.DomUtil.create("div", "legend");
  div.innerHTML = "<b>__TITLE__</b><br>" + tiers
    .map((t) => '<i style="background:' + t.color + '"></i>' + escape(t.label))
    .join("<br>");
  return div;
};
legend.addTo(map);
</script>
</body>
</html>
"##;

/// GeoJSON points for every classified stop with coordinates.
fn stop_features(feed: &Feed, result: &FrequencyResult) -> Vec<Value> {
    feed.stops
        .iter()
        .filter_map(|stop| {
            let (lat, lon) = stop.coordinates()?;
            let freq = result.get(&stop.stop_id)?;
            Some(json!({
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [lon, lat] },
                "properties": {
                    "stop_id": stop.stop_id,
                    "name": stop.display_name(),
                    "count": freq.count,
                    "frequency": freq.frequency,
                    "tier": freq.tier,
                    "color": freq.tier.color(),
                },
            }))
        })
        .collect()
}

/// Keeps embedded JSON from closing the surrounding `<script>` element.
fn script_safe(value: &Value) -> String {
    value.to_string().replace("</", "<\\/")
}

/// Builds the HTML page; returns it with the number of markers drawn.
pub fn map_html(feed: &Feed, result: &FrequencyResult, params: &RunParameters) -> (String, usize) {
    let features = stop_features(feed, result);
    let drawn = features.len();
    let stops = json!({ "type": "FeatureCollection", "features": features });
    let legend: Vec<Value> = Tier::ALL
        .iter()
        .map(|t| json!({ "color": t.color(), "label": t.label() }))
        .collect();
    let title = format!(
        "Trips per hour, {} {} to {}",
        params.date,
        params.window.start(),
        params.window.end()
    );

    let html = fill_template(
        TEMPLATE,
        &[
            ("__TITLE__", title),
            ("__STOPS__", script_safe(&stops)),
            ("__LEGEND__", script_safe(&Value::from(legend))),
        ],
    );
    (html, drawn)
}

/// Substitutes placeholders in one pass over `template`, so inserted values
/// are never scanned for further placeholders.
fn fill_template(template: &str, values: &[(&str, String)]) -> String {
    let mut html = String::with_capacity(template.len());
    let mut rest = template;
    loop {
        let next = values
            .iter()
            .filter_map(|(key, value)| rest.find(key).map(|at| (at, *key, value)))
            .min_by_key(|(at, _, _)| *at);
        let Some((at, key, value)) = next else {
            html.push_str(rest);
            return html;
        };
        html.push_str(&rest[..at]);
        html.push_str(value);
        rest = &rest[at + key.len()..];
    }
}

/// Writes the map to `path`, creating parent directories.
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn render_map(
    path: &Path,
    feed: &Feed,
    result: &FrequencyResult,
    params: &RunParameters,
) -> Result<usize> {
    let (html, drawn) = map_html(feed, result, params);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, html)?;

    let skipped = result.len().saturating_sub(drawn);
    if skipped > 0 {
        debug!(skipped, "Stops without coordinates were not drawn");
    }
    info!(path = %path.display(), markers = drawn, "Map saved");
    Ok(drawn)
}
