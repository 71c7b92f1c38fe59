//! Leaflet page template and the iframe wrapper used to embed it.

use crate::render::error::RenderError;
use serde_json::Value;

const CONFIG_PLACEHOLDER: &str = "__MAP_CONFIG__";
const HEIGHT_PLACEHOLDER: &str = "__MAP_HEIGHT__";

const MAP_TEMPLATE: &str = r##"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/leaflet/1.9.4/leaflet.css" crossorigin="anonymous" />
  <script src="https://cdnjs.cloudflare.com/ajax/libs/leaflet/1.9.4/leaflet.js" crossorigin="anonymous"></script>
  <style>
    html, body { width: 100%; height: 100%; margin: 0; padding: 0; }
    #map { position: relative; width: 100%; height: __MAP_HEIGHT__; }
    .aire-tooltip {
      background-color: white;
      color: #333333;
      font-family: arial;
      font-size: 12px;
      padding: 10px;
    }
    .aire-tooltip th { text-align: left; padding-right: 4px; }
    .aire-legend {
      background: rgba(255, 255, 255, 0.85);
      padding: 6px 8px;
      font-family: arial;
      font-size: 11px;
      border-radius: 4px;
    }
    .aire-legend .swatch { display: inline-block; width: 18px; height: 10px; margin-right: 4px; }
  </style>
</head>
<body>
  <div id="map"></div>
  <script>
    const config = __MAP_CONFIG__;

    const escapeHtml = (value) => String(value)
      .replace(/&/g, '&amp;')
      .replace(/</g, '&lt;')
      .replace(/>/g, '&gt;')
      .replace(/"/g, '&quot;');

    const map = L.map('map', { center: config.center, zoom: config.zoom });
    const tiles = L.tileLayer('https://tile.openstreetmap.org/{z}/{x}/{y}.png', {
      maxZoom: 18,
      attribution: '&copy; <a href="https://www.openstreetmap.org/copyright">OpenStreetMap</a> contributors',
    }).addTo(map);

    const choropleth = L.geoJSON(config.geojson, {
      style: (feature) => ({
        fillColor: config.choropleth.colors[feature.properties[config.key]] || config.choropleth.nanFillColor,
        color: 'black',
        weight: 1,
        opacity: config.choropleth.lineOpacity,
        fillOpacity: config.choropleth.fillOpacity,
      }),
    }).addTo(map);

    const overlay = L.geoJSON(config.geojson, {
      style: () => config.overlay.style,
      onEachFeature: (feature, layer) => {
        const rows = config.overlay.fields
          .map((field, i) => [config.overlay.aliases[i], feature.properties[field]])
          .filter(([, value]) => value !== undefined && value !== null);
        const body = rows
          .map(([alias, value]) => `<tr><th>${escapeHtml(alias)}</th><td>${escapeHtml(value)}</td></tr>`)
          .join('');
        layer.bindTooltip(`<table>${body}</table>`, { sticky: true, className: 'aire-tooltip' });
        layer.on('mouseover', () => layer.setStyle(config.overlay.highlight));
        layer.on('mouseout', () => overlay.resetStyle(layer));
      },
    }).addTo(map);
    overlay.bringToFront();
    map.on('overlayadd', () => overlay.bringToFront());

    const legend = L.control({ position: 'topright' });
    legend.onAdd = () => {
      const div = L.DomUtil.create('div', 'aire-legend');
      let html = `<strong>${escapeHtml(config.legend.title)}</strong>`;
      const t = config.legend.thresholds;
      for (let i = 0; i + 1 < t.length; i++) {
        html += `<br><span class="swatch" style="background:${config.legend.colors[i]}"></span>`
          + `${t[i].toFixed(1)} &ndash; ${t[i + 1].toFixed(1)}`;
      }
      div.innerHTML = html;
      return div;
    };
    legend.addTo(map);

    L.control.layers({ openstreetmap: tiles }, { [config.choropleth.name]: choropleth }).addTo(map);
  </script>
</body>
</html>
"##;

/// Fills the page template with the map configuration.
pub(crate) fn render_page(config: &Value, height: &str) -> Result<String, RenderError> {
    // A raw "<" inside the script could start "</script" or "<!--".
    let config = serde_json::to_string(config)?.replace('<', "\\u003c");
    Ok(MAP_TEMPLATE
        .replace(HEIGHT_PLACEHOLDER, height)
        .replace(CONFIG_PLACEHOLDER, &config))
}

pub(crate) fn embed_in_iframe(page: &str, height: &str) -> String {
    format!(
        "<div style=\"width:100%;\"><iframe srcdoc=\"{}\" style=\"width:100%; height:{}; border:none !important;\" allowfullscreen webkitallowfullscreen mozallowfullscreen></iframe></div>",
        escape_attribute(page),
        escape_attribute(height)
    )
}

fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
