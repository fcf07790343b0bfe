use chrono::{DateTime, FixedOffset, Local, TimeZone};

use crate::{
    dom::{Element, Node},
    model::WeatherReading,
    provider::openweather::{icon_url, map_url},
};

pub const MAP_LINK_LABEL: &str = "Click to View Map";

/// en-US `h:mm AM/PM` for a Unix timestamp, in `offset` or the local zone.
///
/// Timestamps chrono can't represent render as "Invalid Date".
pub fn format_local_time(unix_seconds: i64, offset: Option<FixedOffset>) -> String {
    match offset {
        Some(offset) => format_in(&offset, unix_seconds),
        None => format_in(&Local, unix_seconds),
    }
}

fn format_in<Tz: TimeZone>(tz: &Tz, unix_seconds: i64) -> String
where
    Tz::Offset: std::fmt::Display,
{
    match DateTime::from_timestamp(unix_seconds, 0) {
        Some(utc) => utc.with_timezone(tz).format("%-I:%M %p").to_string(),
        None => "Invalid Date".to_string(),
    }
}

/// Build the view for one reading, in display order.
pub fn render_view(reading: &WeatherReading, offset: Option<FixedOffset>) -> Element {
    let heading =
        Element::new("h2").with_text(format!("{} , {}", reading.location_name, reading.country));

    let map_link = Element::new("a")
        .with_attr("href", map_url(reading.latitude, reading.longitude))
        .with_attr("target", "_blank")
        .with_text(MAP_LINK_LABEL);

    let icon = Element::new("img")
        .with_attr("src", icon_url(&reading.icon))
        .with_attr("alt", reading.description.clone());

    let last_updated = format_local_time(reading.updated_at, offset);

    let children: Vec<Node> = vec![
        heading.into(),
        map_link.into(),
        Element::new("br").into(),
        icon.into(),
        Element::new("p").with_text(reading.description.clone()).into(),
        Element::new("p")
            .with_text(format!("Current: {}° F", reading.temperature))
            .into(),
        Element::new("p")
            .with_text(format!("Feels like: {}° F", reading.feels_like))
            .into(),
        Element::new("p")
            .with_text(format!("Last updated: {last_updated}"))
            .into(),
    ];

    let mut view = Element::new("div");
    view.replace_children(children);
    view
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokyo() -> WeatherReading {
        WeatherReading {
            latitude: 35.6895,
            longitude: 139.6917,
            location_name: "Tokyo".into(),
            country: "JP".into(),
            icon: "02d".into(),
            description: "few clouds".into(),
            temperature: 55.42,
            feels_like: 52.74,
            updated_at: 1647843122,
        }
    }

    fn utc() -> Option<FixedOffset> {
        FixedOffset::east_opt(0)
    }

    #[test]
    fn time_is_twelve_hour_without_leading_zero() {
        // 2022-03-21T06:12:02Z
        assert_eq!(format_local_time(1647843122, utc()), "6:12 AM");
        assert_eq!(format_local_time(1647843122, FixedOffset::east_opt(9 * 3600)), "3:12 PM");
        assert_eq!(format_local_time(1647845849, FixedOffset::west_opt(10 * 3600)), "8:57 PM");
    }

    #[test]
    fn midnight_and_noon() {
        assert_eq!(format_local_time(0, utc()), "12:00 AM");
        assert_eq!(format_local_time(12 * 3600 + 5 * 60, utc()), "12:05 PM");
    }

    #[test]
    fn unrepresentable_timestamp() {
        assert_eq!(format_local_time(i64::MAX, utc()), "Invalid Date");
    }

    #[test]
    fn view_children_in_display_order() {
        let view = render_view(&tokyo(), utc());
        let tags: Vec<&str> = view.child_elements().map(Element::tag_name).collect();

        assert_eq!(tags, ["h2", "a", "br", "img", "p", "p", "p", "p"]);
    }

    #[test]
    fn view_content() {
        let view = render_view(&tokyo(), utc());

        assert_eq!(view.query_selector("h2").unwrap().text_content(), "Tokyo , JP");

        let link = view.query_selector("a").unwrap();
        assert_eq!(
            link.attribute("href"),
            Some("https://www.google.com/maps/search/?api=1&query=35.6895,139.6917")
        );
        assert_eq!(link.attribute("target"), Some("_blank"));
        assert_eq!(link.text_content(), "Click to View Map");

        let img = view.query_selector("img").unwrap();
        assert_eq!(img.attribute("src"), Some("https://openweathermap.org/img/wn/02d@2x.png"));
        assert_eq!(img.attribute("alt"), Some("few clouds"));

        let paragraphs: Vec<String> = view
            .child_elements()
            .filter(|el| el.tag_name() == "p")
            .map(Element::text_content)
            .collect();
        assert_eq!(
            paragraphs,
            [
                "few clouds",
                "Current: 55.42° F",
                "Feels like: 52.74° F",
                "Last updated: 6:12 AM",
            ]
        );
    }

    #[test]
    fn whole_degrees_have_no_fraction() {
        let mut reading = tokyo();
        reading.temperature = 55.0;
        reading.feels_like = -3.5;

        let text = render_view(&reading, utc()).text_content();
        assert!(text.contains("Current: 55° F"));
        assert!(text.contains("Feels like: -3.5° F"));
    }
}
