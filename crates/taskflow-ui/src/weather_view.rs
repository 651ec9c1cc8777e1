use taskflow_weather::WidgetView;

fn icon_glyph(icon: &str) -> &'static str {
    match icon {
        "sun" => "☀",
        "cloud" => "☁",
        "cloud_fog" => "🌫",
        "cloud_rain" => "🌧",
        "cloud_snow" => "🌨",
        "cloud_lightning" => "🌩",
        _ => "·",
    }
}

/// Text for the weather panel, or `None` when the panel shows nothing.
pub fn render_weather(view: &WidgetView) -> Option<String> {
    match view {
        WidgetView::Skeleton => Some("Loading weather...".to_string()),
        WidgetView::Failure(message) => Some(format!("Weather Error\n  ! {}", message)),
        WidgetView::Blank => None,
        WidgetView::Card {
            title,
            temperature,
            description,
            icon,
            observed_at,
        } => {
            let mut card = format!(
                "@ {}\n  {}°C  {}  {}",
                title,
                temperature,
                description,
                icon_glyph(icon)
            );
            if let Some(at) = observed_at {
                card.push_str(&format!("  (updated {})", at.format("%H:%M")));
            }
            Some(card)
        }
    }
}
