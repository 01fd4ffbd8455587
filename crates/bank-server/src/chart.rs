//! Category Chart
//!
//! Renders the transaction count per category as a donut-style SVG pie and
//! encodes it as base64 for inline embedding in the dashboard.

use std::f64::consts::{PI, TAU};
use std::fmt::Write;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use bank_advisor::rules::{CategorizedTransactions, Category};

const WIDTH: f64 = 640.0;
const HEIGHT: f64 = 420.0;
const CENTER_X: f64 = 240.0;
const CENTER_Y: f64 = 230.0;
const RADIUS: f64 = 150.0;

/// Inner radius as a fraction of the outer radius
const HOLE: f64 = 0.3;

/// Offset of a pulled slice as a fraction of the outer radius
const PULL: f64 = 0.1;

pub const TITLE: &str = "Transaction Categories Distribution";

const fn color(category: Category) -> &'static str {
    match category {
        Category::Groceries => "#636efa",
        Category::Entertainment => "#ef553b",
        Category::Utilities => "#00cc96",
        Category::Shopping => "#ab63fa",
        Category::Others => "#ffa15a",
    }
}

/// Every category except the catch-all is pulled out of the pie
const fn pulled(category: Category) -> bool {
    !matches!(category, Category::Others)
}

fn label(category: Category) -> String {
    let name = category.as_str();
    let mut chars = name.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

fn point(cx: f64, cy: f64, radius: f64, angle: f64) -> (f64, f64) {
    (cx + radius * angle.cos(), cy + radius * angle.sin())
}

/// Path for one donut slice between two angles (radians, clockwise from 12 o'clock)
fn slice_path(cx: f64, cy: f64, start: f64, end: f64) -> String {
    let inner = RADIUS * HOLE;
    let large = i32::from(end - start > PI);
    let (ox1, oy1) = point(cx, cy, RADIUS, start);
    let (ox2, oy2) = point(cx, cy, RADIUS, end);
    let (ix2, iy2) = point(cx, cy, inner, end);
    let (ix1, iy1) = point(cx, cy, inner, start);

    format!(
        "M {ox1:.2} {oy1:.2} A {RADIUS:.2} {RADIUS:.2} 0 {large} 1 {ox2:.2} {oy2:.2} \
         L {ix2:.2} {iy2:.2} A {inner:.2} {inner:.2} 0 {large} 0 {ix1:.2} {iy1:.2} Z"
    )
}

/// Build the SVG document
pub fn render_svg(categories: &CategorizedTransactions) -> String {
    let counts: Vec<(Category, usize)> = categories
        .counts()
        .into_iter()
        .filter(|(_, n)| *n > 0)
        .collect();
    let total: usize = counts.iter().map(|(_, n)| n).sum();

    let mut svg = String::new();
    let _ = write!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{WIDTH}\" height=\"{HEIGHT}\" \
         viewBox=\"0 0 {WIDTH} {HEIGHT}\" font-family=\"sans-serif\">\
         <rect width=\"100%\" height=\"100%\" fill=\"#111111\"/>\
         <text x=\"{}\" y=\"36\" fill=\"#f2f5fa\" font-size=\"20\" text-anchor=\"middle\">{TITLE}</text>",
        WIDTH / 2.0
    );

    if total == 0 {
        let _ = write!(
            svg,
            "<circle cx=\"{CENTER_X}\" cy=\"{CENTER_Y}\" r=\"{RADIUS}\" fill=\"none\" \
             stroke=\"#444444\" stroke-width=\"2\"/>\
             <text x=\"{CENTER_X}\" y=\"{CENTER_Y}\" fill=\"#f2f5fa\" font-size=\"16\" \
             text-anchor=\"middle\">No transactions</text></svg>"
        );
        return svg;
    }

    let mut angle = -PI / 2.0;
    #[allow(clippy::cast_precision_loss)]
    for (category, count) in &counts {
        let fraction = *count as f64 / total as f64;
        let sweep = fraction * TAU;
        let mid = angle + sweep / 2.0;
        let (cx, cy) = if pulled(*category) && counts.len() > 1 {
            point(CENTER_X, CENTER_Y, RADIUS * PULL, mid)
        } else {
            (CENTER_X, CENTER_Y)
        };

        if counts.len() == 1 {
            // A full ring cannot be drawn as a single arc
            let _ = write!(
                svg,
                "<circle cx=\"{cx}\" cy=\"{cy}\" r=\"{:.2}\" fill=\"none\" stroke=\"{}\" \
                 stroke-width=\"{:.2}\"/>",
                RADIUS * (1.0 + HOLE) / 2.0,
                color(*category),
                RADIUS * (1.0 - HOLE),
            );
        } else {
            let _ = write!(
                svg,
                "<path d=\"{}\" fill=\"{}\" stroke=\"#111111\" stroke-width=\"1\"/>",
                slice_path(cx, cy, angle, angle + sweep),
                color(*category),
            );
        }

        let (lx, ly) = point(cx, cy, RADIUS * (1.0 + HOLE) / 2.0, mid);
        let _ = write!(
            svg,
            "<text x=\"{lx:.2}\" y=\"{ly:.2}\" fill=\"#ffffff\" font-size=\"12\" \
             text-anchor=\"middle\">{}<tspan x=\"{lx:.2}\" dy=\"14\">{:.1}%</tspan></text>",
            label(*category),
            fraction * 100.0,
        );
        angle += sweep;
    }

    // Legend
    for (row, (category, count)) in counts.iter().enumerate() {
        #[allow(clippy::cast_precision_loss)]
        let y = 110.0 + row as f64 * 26.0;
        let _ = write!(
            svg,
            "<rect x=\"470\" y=\"{:.0}\" width=\"14\" height=\"14\" fill=\"{}\"/>\
             <text x=\"492\" y=\"{y:.0}\" fill=\"#f2f5fa\" font-size=\"13\">{} ({count})</text>",
            y - 12.0,
            color(*category),
            label(*category),
        );
    }

    svg.push_str("</svg>");
    svg
}

/// The chart as a base64 SVG
pub fn render_base64(categories: &CategorizedTransactions) -> String {
    STANDARD.encode(render_svg(categories))
}

/// The chart as a `data:` URI for an `<img>` tag
pub fn data_uri(categories: &CategorizedTransactions) -> String {
    format!("data:image/svg+xml;base64,{}", render_base64(categories))
}
