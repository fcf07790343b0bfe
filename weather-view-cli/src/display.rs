use weather_view_core::dom::{Element, Node};

/// Flatten the result container into terminal lines, one per block element.
pub fn format_results(results: &Element) -> Vec<String> {
    let mut lines = Vec::new();
    for node in results.children() {
        match node {
            Node::Text(t) => push_line(&mut lines, t.clone()),
            Node::Element(el) => format_block(el, &mut lines),
        }
    }
    lines
}

fn format_block(el: &Element, lines: &mut Vec<String>) {
    match el.tag_name() {
        "div" => {
            if el.child_elements().next().is_none() {
                push_line(lines, el.text_content());
            } else {
                for child in el.child_elements() {
                    format_block(child, lines);
                }
            }
        }
        "h2" => {
            let heading = el.text_content();
            let rule = "=".repeat(heading.chars().count());
            push_line(lines, heading);
            lines.push(rule);
        }
        "a" => push_line(
            lines,
            format!("{}: {}", el.text_content(), el.attribute("href").unwrap_or_default()),
        ),
        "img" => push_line(lines, format!("[icon] {}", el.attribute("src").unwrap_or_default())),
        "br" => {}
        _ => push_line(lines, el.text_content()),
    }
}

fn push_line(lines: &mut Vec<String>, line: String) {
    if !line.trim().is_empty() {
        lines.push(line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weather_view_core::{WeatherReading, render::render_view};

    #[test]
    fn formats_rendered_view() {
        let reading = WeatherReading {
            latitude: 21.3069,
            longitude: -157.8583,
            location_name: "Honolulu".into(),
            country: "US".into(),
            icon: "04n".into(),
            description: "broken clouds".into(),
            temperature: 73.67,
            feels_like: 74.88,
            updated_at: 1647845849,
        };
        let results = Element::new("div")
            .with_child(render_view(&reading, chrono::FixedOffset::east_opt(0)));

        assert_eq!(
            format_results(&results),
            [
                "Honolulu , US",
                "=============",
                "Click to View Map: \
                 https://www.google.com/maps/search/?api=1&query=21.3069,-157.8583",
                "[icon] https://openweathermap.org/img/wn/04n@2x.png",
                "broken clouds",
                "Current: 73.67° F",
                "Feels like: 74.88° F",
                "Last updated: 6:57 AM",
            ]
        );
    }

    #[test]
    fn formats_error_message() {
        let results =
            Element::new("div").with_child(Element::new("div").with_text("Location Not Found"));
        assert_eq!(format_results(&results), ["Location Not Found"]);
    }

    #[test]
    fn empty_results_print_nothing() {
        assert!(format_results(&Element::new("div")).is_empty());
    }
}
