//! Insight tooltip: a titled list of colored series lines.
//!
//! The tooltip is stateless. Given a title source and an ordered list of
//! [`BodyLine`]s it renders a header, one row per line with a color swatch,
//! and an optional footer hint.

use super::theme::{colors, Styles};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};
use std::fmt;
use std::str::FromStr;
use unicode_width::UnicodeWidthStr;

/// Footer shown when the chart point can be clicked through.
pub const INSPECT_USERS_HINT: &str = "Click to inspect users";

const SWATCH: &str = "■ ";

/// Bucket size of the chart the tooltip belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Interval {
    Minute,
    Hour,
    #[default]
    Day,
    Week,
    Month,
}

impl Interval {
    const fn date_format(self) -> &'static str {
        match self {
            Self::Minute => "%-d %b %Y %H:%M",
            Self::Hour => "%-d %b %Y %H:00",
            Self::Day => "%a, %-d %b %Y",
            Self::Week => "Week of %-d %b %Y",
            Self::Month => "%B %Y",
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Minute => "minute",
            Self::Hour => "hour",
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
        })
    }
}

impl FromStr for Interval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "minute" => Ok(Self::Minute),
            "hour" => Ok(Self::Hour),
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            other => Err(format!("unknown interval '{other}'")),
        }
    }
}

/// Format a reference date for the given interval.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS` and
/// `YYYY-MM-DD`. Anything else is returned verbatim.
#[must_use]
pub fn format_reference_date(date: &str, interval: Interval) -> String {
    parse_reference_date(date).map_or_else(
        || date.to_string(),
        |dt| dt.format(interval.date_format()).to_string(),
    )
}

fn parse_reference_date(date: &str) -> Option<NaiveDateTime> {
    let date = date.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(date) {
        return Some(dt.naive_local());
    }
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(date, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}

/// One row of the tooltip.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyLine {
    /// Stable key for the row; not used for ordering or deduplication
    pub id: String,
    pub content: Line<'static>,
    pub border_color: Color,
    pub background_color: Option<Color>,
}

impl BodyLine {
    pub fn new(id: impl Into<String>, content: impl Into<Line<'static>>, border_color: Color) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            border_color,
            background_color: None,
        }
    }

    #[must_use]
    pub const fn with_background(mut self, color: Color) -> Self {
        self.background_color = Some(color);
        self
    }

    /// Background color when set, otherwise the border color.
    #[must_use]
    pub fn swatch_color(&self) -> Color {
        self.background_color.unwrap_or(self.border_color)
    }
}

/// Tooltip for a chart data point.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InsightTooltip {
    /// Title used when there is no reference date
    pub alt_title: Option<String>,
    pub reference_date: Option<String>,
    pub interval: Interval,
    pub body_lines: Vec<BodyLine>,
    pub inspect_users_label: bool,
}

impl InsightTooltip {
    #[must_use]
    pub fn new(body_lines: Vec<BodyLine>) -> Self {
        Self {
            body_lines,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn alt_title(mut self, title: impl Into<String>) -> Self {
        self.alt_title = Some(title.into());
        self
    }

    #[must_use]
    pub fn reference_date(mut self, date: impl Into<String>, interval: Interval) -> Self {
        self.reference_date = Some(date.into());
        self.interval = interval;
        self
    }

    #[must_use]
    pub const fn inspect_users_label(mut self, show: bool) -> Self {
        self.inspect_users_label = show;
        self
    }

    /// Header text: the formatted reference date when present, else the
    /// alternate title, else empty.
    #[must_use]
    pub fn title(&self) -> String {
        match self.reference_date.as_deref().filter(|d| !d.is_empty()) {
            Some(date) => format_reference_date(date, self.interval),
            None => self.alt_title.clone().unwrap_or_default(),
        }
    }

    /// One line per body line, in input order.
    #[must_use]
    pub fn item_lines(&self) -> Vec<Line<'static>> {
        self.body_lines
            .iter()
            .map(|line| {
                let mut spans = vec![Span::styled(
                    SWATCH,
                    Style::default().fg(line.swatch_color()),
                )];
                spans.extend(line.content.spans.iter().cloned());
                Line::from(spans)
            })
            .collect()
    }

    /// Footer line, present only when the inspect hint is enabled.
    #[must_use]
    pub fn footer_line(&self) -> Option<Line<'static>> {
        self.inspect_users_label
            .then(|| Line::styled(INSPECT_USERS_HINT, Styles::text_muted().italic()))
    }

    /// All rendered lines: header, items, optional footer.
    #[must_use]
    pub fn lines(&self) -> Vec<Line<'static>> {
        let mut lines = Vec::with_capacity(self.body_lines.len() + 2);
        lines.push(Line::styled(self.title(), Styles::header_title()));
        lines.extend(self.item_lines());
        lines.extend(self.footer_line());
        lines
    }

    /// Width and height needed to show the tooltip without clipping,
    /// including borders.
    #[must_use]
    pub fn desired_size(&self) -> (u16, u16) {
        let lines = self.lines();
        let width = lines
            .iter()
            .map(|l| {
                l.spans
                    .iter()
                    .map(|s| UnicodeWidthStr::width(s.content.as_ref()))
                    .sum::<usize>()
            })
            .max()
            .unwrap_or(0);
        (
            u16::try_from(width + 2).unwrap_or(u16::MAX),
            u16::try_from(lines.len() + 2).unwrap_or(u16::MAX),
        )
    }

    /// Area of the desired size anchored at the top-right corner of `area`.
    #[must_use]
    pub fn anchored_area(&self, area: Rect) -> Rect {
        let (width, height) = self.desired_size();
        let width = width.min(area.width);
        let height = height.min(area.height);
        Rect {
            x: area.x + area.width - width,
            y: area.y,
            width,
            height,
        }
    }
}

impl Widget for &InsightTooltip {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 3 || area.height < 3 {
            return;
        }
        let scheme = colors();
        Clear.render(area, buf);
        Paragraph::new(self.lines())
            .style(Style::default().bg(scheme.tooltip_bg))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Styles::border_focused()),
            )
            .render(area, buf);
    }
}
