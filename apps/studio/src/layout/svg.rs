//! Code to convert a [`Fragment`] to an SVG document.
//!
//! The SVG is the one visual artifact both paths share: the preview embeds it
//! and scales it with CSS, the exporter hands it to the rasterizer. Geometry is
//! emitted in CSS pixels with a `viewBox`; the outer `width`/`height` carry
//! physical millimetres so the document keeps its A4 width wherever it lands.

use simple_xml_builder::XMLElement;

use crate::layout::fragment::{Element, Fragment, TextAnchor, TextRun};

/// Formats a coordinate without trailing noise (`12.5`, not `12.500001`).
fn num(v: f32) -> String {
    let rounded = (v * 100.0).round() / 100.0;
    if rounded.fract() == 0.0 {
        format!("{}", rounded as i64)
    } else {
        format!("{rounded}")
    }
}

/// Generates the SVG root element for a fragment.
pub fn gen_svg(fragment: &Fragment) -> XMLElement {
    let mut root = XMLElement::new("svg");
    root.add_attribute("xmlns", "http://www.w3.org/2000/svg");
    root.add_attribute("xmlns:xlink", "http://www.w3.org/1999/xlink");
    root.add_attribute("width", &format!("{}mm", num(fragment.width_mm())));
    root.add_attribute("height", &format!("{}mm", num(fragment.height_mm())));
    root.add_attribute(
        "viewBox",
        &format!("0 0 {} {}", num(fragment.width), num(fragment.height)),
    );
    root.add_attribute("data-template", &fragment.template_id);

    let mut defs = XMLElement::new("defs");
    let mut photo_count = 0usize;
    let mut body: Vec<XMLElement> = Vec::with_capacity(fragment.elements.len() + 1);

    // Page background first, so nothing else depends on the viewer's canvas colour.
    let mut background = XMLElement::new("rect");
    background.add_attribute("x", "0");
    background.add_attribute("y", "0");
    background.add_attribute("width", &num(fragment.width));
    background.add_attribute("height", &num(fragment.height));
    background.add_attribute("fill", &fragment.background);
    body.push(background);

    for element in &fragment.elements {
        match element {
            Element::Photo { cx, cy, r, href, border } => {
                let clip_id = format!("photo-clip-{photo_count}");
                photo_count += 1;

                let mut clip = XMLElement::new("clipPath");
                clip.add_attribute("id", &clip_id);
                let mut circle = XMLElement::new("circle");
                circle.add_attribute("cx", &num(*cx));
                circle.add_attribute("cy", &num(*cy));
                circle.add_attribute("r", &num(*r));
                clip.add_child(circle);
                defs.add_child(clip);

                body.push(gen_photo(*cx, *cy, *r, href, &clip_id));
                if let Some((color, width)) = border {
                    let mut ring = XMLElement::new("circle");
                    ring.add_attribute("cx", &num(*cx));
                    ring.add_attribute("cy", &num(*cy));
                    ring.add_attribute("r", &num(*r - width / 2.0));
                    ring.add_attribute("fill", "none");
                    ring.add_attribute("stroke", color);
                    ring.add_attribute("stroke-width", &num(*width));
                    body.push(ring);
                }
            }
            other => body.push(gen_svg_elem(other)),
        }
    }

    if photo_count > 0 {
        root.add_child(defs);
    }
    for child in body {
        root.add_child(child);
    }
    root
}

/// Serialized SVG markup for a fragment.
pub fn to_svg_string(fragment: &Fragment) -> String {
    gen_svg(fragment).to_string()
}

fn gen_photo(cx: f32, cy: f32, r: f32, href: &str, clip_id: &str) -> XMLElement {
    let mut image = XMLElement::new("image");
    image.add_attribute("x", &num(cx - r));
    image.add_attribute("y", &num(cy - r));
    image.add_attribute("width", &num(r * 2.0));
    image.add_attribute("height", &num(r * 2.0));
    // object-cover
    image.add_attribute("preserveAspectRatio", "xMidYMid slice");
    image.add_attribute("href", href);
    image.add_attribute("xlink:href", href);
    image.add_attribute("clip-path", &format!("url(#{clip_id})"));
    image
}

/// Creates an [`XMLElement`] for every element kind except photos.
fn gen_svg_elem(element: &Element) -> XMLElement {
    match element {
        Element::Rect { x, y, w, h, fill } => {
            let mut elem = XMLElement::new("rect");
            elem.add_attribute("x", &num(*x));
            elem.add_attribute("y", &num(*y));
            elem.add_attribute("width", &num(*w));
            elem.add_attribute("height", &num(*h));
            elem.add_attribute("fill", fill);
            elem
        }
        Element::Line { x1, y1, x2, y2, stroke, width } => {
            let mut elem = XMLElement::new("line");
            elem.add_attribute("x1", &num(*x1));
            elem.add_attribute("y1", &num(*y1));
            elem.add_attribute("x2", &num(*x2));
            elem.add_attribute("y2", &num(*y2));
            elem.add_attribute("stroke", stroke);
            elem.add_attribute("stroke-width", &num(*width));
            elem
        }
        Element::Dot { cx, cy, r, fill } => {
            let mut elem = XMLElement::new("circle");
            elem.add_attribute("cx", &num(*cx));
            elem.add_attribute("cy", &num(*cy));
            elem.add_attribute("r", &num(*r));
            elem.add_attribute("fill", fill);
            elem
        }
        Element::Text(run) => gen_text(run),
        Element::Photo { .. } => XMLElement::new("g"),
    }
}

fn gen_text(run: &TextRun) -> XMLElement {
    let anchor = match run.anchor {
        TextAnchor::Start => "start",
        TextAnchor::Middle => "middle",
        TextAnchor::End => "end",
    };
    let style = &run.style;
    let mut elem = XMLElement::new("text");
    elem.add_attribute("x", &num(run.x));
    elem.add_attribute("y", &num(run.y));
    elem.add_attribute("font-family", style.font.css_stack());
    elem.add_attribute("font-size", &num(style.size_px));
    elem.add_attribute("font-weight", &style.weight.css_value().to_string());
    elem.add_attribute("fill", &style.fill);
    elem.add_attribute("text-anchor", anchor);
    if style.letter_spacing_em != 0.0 {
        elem.add_attribute("letter-spacing", &num(style.letter_spacing_em * style.size_px));
    }
    elem.add_text(&style.display_text(&run.text));
    elem
}
