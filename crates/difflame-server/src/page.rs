//! HTML shell for the flame graph.

use crate::config::ServeMode;

const FLAMEGRAPH_CSS: &str =
    "https://cdn.jsdelivr.net/gh/spiermar/d3-flame-graph@1.0.10/dist/d3.flameGraph.min.css";

const SCRIPTS: &[&str] = &[
    "https://cdnjs.cloudflare.com/ajax/libs/d3/4.10.0/d3.min.js",
    "https://cdnjs.cloudflare.com/ajax/libs/d3-tip/0.7.1/d3-tip.min.js",
    "https://cdn.jsdelivr.net/gh/spiermar/d3-flame-graph@1.0.10/dist/d3.flameGraph.min.js",
];

/// Escape HTML special characters.
fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn render_form(mode: &ServeMode) -> String {
    let mut form = String::from("    <form method=\"GET\">\n");

    match mode {
        ServeMode::Diffs { .. } => {
            form.push_str("      From: <input type=\"text\" name=\"from\" placeholder=\"HEAD~1\">\n");
            form.push_str("      To: <input type=\"text\" name=\"to\" placeholder=\"HEAD\">\n");
        }
        ServeMode::Files { files } => {
            form.push_str("      <select name=\"file\">\n");
            for name in files.names() {
                let name = escape_html(name);
                form.push_str(&format!("        <option value=\"{name}\">{name}</option>\n"));
            }
            form.push_str("      </select>\n");
        }
    }

    form.push_str("      <input type=\"submit\" value=\"Generate\">\n    </form>\n");
    form
}

const CHART_SCRIPT: &str = r##"
    function label(d) {
      return d.data.name + " (" +
             d.data.added + " added, " +
             d.data.removed + " removed, " +
             d3.format(".3f")(100 * (d.x1 - d.x0)) + "%)";
    }

    var flamegraph = d3.flameGraph()
      .width(960)
      .label(label)
      .tooltip(false)
      .details(document.getElementById("details"));

    d3.json("data" + window.location.search, function(error, data) {
      if (error) return console.warn(error);
      d3.select("#chart").datum(data).call(flamegraph);
    });
"##;

/// Render the index page for `mode`.
///
/// The page fetches `data` with its own query string, so submitting the form
/// re-renders the graph for the chosen revisions or file.
pub fn render_page(mode: &ServeMode) -> String {
    let mut html = String::with_capacity(2048);

    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n  <meta charset=\"utf-8\">\n");
    html.push_str("  <title>difflame</title>\n");
    html.push_str(&format!(
        "  <link rel=\"stylesheet\" type=\"text/css\" href=\"{FLAMEGRAPH_CSS}\">\n"
    ));
    html.push_str("</head>\n<body>\n  <div style=\"text-align: center\">\n");
    html.push_str(&render_form(mode));
    html.push_str("    <div id=\"chart\"></div>\n    <div id=\"details\"></div>\n  </div>\n");

    for src in SCRIPTS {
        html.push_str(&format!(
            "  <script type=\"text/javascript\" src=\"{src}\"></script>\n"
        ));
    }
    html.push_str("  <script type=\"text/javascript\">");
    html.push_str(CHART_SCRIPT);
    html.push_str("  </script>\n</body>\n</html>\n");

    html
}
