use ratatui::style::{Color, Modifier, Style};

use crate::calendar::DayTiming;

pub(super) fn text_color_for_bg(bg_color: Color) -> Color {
    if let Color::Rgb(r, g, b) = bg_color {
        let brightness = (299 * r as u32 + 587 * g as u32 + 114 * b as u32) / 1000;
        if brightness > 128 {
            Color::Black
        } else {
            Color::White
        }
    } else {
        Color::White
    }
}

/// Terminal color for a CSS background made of `rgba(...)` stops: each stop
/// is composited over black and the stops are averaged.
pub(super) fn tint_to_color(css: &str) -> Option<Color> {
    let stops: Vec<(f32, f32, f32)> = css
        .split("rgba(")
        .skip(1)
        .filter_map(|rest| rest.split(')').next())
        .filter_map(parse_rgba_body)
        .collect();

    if stops.is_empty() {
        return None;
    }

    let count = stops.len() as f32;
    let (r, g, b) = stops
        .iter()
        .fold((0.0f32, 0.0f32, 0.0f32), |(r, g, b), &(sr, sg, sb)| {
            (r + sr, g + sg, b + sb)
        });
    Some(Color::Rgb(
        (r / count).round() as u8,
        (g / count).round() as u8,
        (b / count).round() as u8,
    ))
}

fn parse_rgba_body(body: &str) -> Option<(f32, f32, f32)> {
    let parts: Vec<f32> = body
        .split(',')
        .map(|part| part.trim().parse::<f32>().ok())
        .collect::<Option<_>>()?;
    let [r, g, b, a] = parts.as_slice() else {
        return None;
    };
    let alpha = (*a).clamp(0.0, 1.0);
    Some((r * alpha, g * alpha, b * alpha))
}

pub(super) fn day_number_style(timing: DayTiming, active: bool) -> Style {
    if timing.is_overflow {
        Style::default().fg(Color::DarkGray)
    } else if timing.is_today {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    } else if active {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else if timing.is_past {
        Style::default().fg(Color::Gray)
    } else {
        Style::default().fg(Color::White)
    }
}

pub(super) fn cell_border_color(selected: bool, timing: DayTiming) -> Color {
    if selected {
        Color::White
    } else if timing.is_today {
        Color::Yellow
    } else {
        Color::DarkGray
    }
}
