// Date-time layout descriptors
//
// Platforms describe their date-time text with `date()`-style letters
// (`Y-m-d H:i:s`). Descriptors containing `%` are taken as strftime verbatim.

use super::zone::Zone;
use chrono::format::{Fixed, Item, ParseErrorKind, StrftimeItems};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use std::fmt::Write;

/// A platform layout translated into chrono's strftime dialect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatDescriptor {
    raw: String,
    strftime: String,
}

impl FormatDescriptor {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let strftime = if raw.contains('%') {
            raw.clone()
        } else {
            translate(&raw)
        };
        Self { raw, strftime }
    }

    /// The layout exactly as the platform supplied it.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The equivalent strftime layout.
    pub fn strftime(&self) -> &str {
        &self.strftime
    }

    /// True when chrono cannot interpret the layout.
    pub fn is_malformed(&self) -> bool {
        StrftimeItems::new(&self.strftime).any(|item| matches!(item, Item::Error))
    }

    /// True when the layout carries its own UTC offset.
    pub fn has_offset(&self) -> bool {
        StrftimeItems::new(&self.strftime).any(|item| {
            matches!(
                item,
                Item::Fixed(
                    Fixed::TimezoneOffset
                        | Fixed::TimezoneOffsetColon
                        | Fixed::TimezoneOffsetDoubleColon
                        | Fixed::TimezoneOffsetTripleColon
                        | Fixed::TimezoneOffsetColonZ
                        | Fixed::TimezoneOffsetZ
                        | Fixed::RFC2822
                        | Fixed::RFC3339
                )
            )
        })
    }

    /// True when the layout writes a zone abbreviation (`T`, `e`, `%Z`).
    ///
    /// Abbreviations are ambiguous and chrono does not resolve them, so such
    /// layouts can be rendered but never parsed.
    pub fn has_zone_name(&self) -> bool {
        StrftimeItems::new(&self.strftime)
            .any(|item| matches!(item, Item::Fixed(Fixed::TimezoneName)))
    }

    /// Renders `value` with this layout, or `None` if the layout is malformed.
    pub fn render(&self, value: &DateTime<FixedOffset>) -> Option<String> {
        if self.is_malformed() {
            return None;
        }
        let mut out = String::new();
        write!(out, "{}", value.format(&self.strftime)).ok()?;
        Some(out)
    }

    /// Parses `text` strictly against this layout.
    ///
    /// Text without an offset is read as wall-clock time in `zone`. Text with
    /// an offset keeps the instant it names and the offset it was written in.
    /// Layouts carrying a zone abbreviation never parse.
    pub fn parse(&self, text: &str, zone: &Zone) -> Option<DateTime<FixedOffset>> {
        if self.has_zone_name() {
            return None;
        }
        if self.has_offset() {
            return DateTime::parse_from_str(text, &self.strftime).ok();
        }

        let naive = match NaiveDateTime::parse_from_str(text, &self.strftime) {
            Ok(naive) => naive,
            // Date-only layouts start at midnight
            Err(e) if e.kind() == ParseErrorKind::NotEnough => {
                NaiveDate::parse_from_str(text, &self.strftime)
                    .ok()?
                    .and_time(NaiveTime::MIN)
            }
            Err(_) => return None,
        };

        zone.offset().from_local_datetime(&naive).single()
    }
}

impl std::fmt::Display for FormatDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Translates `date()`-style letters into strftime specifiers.
fn translate(layout: &str) -> String {
    let mut out = String::with_capacity(layout.len() * 2);
    let mut chars = layout.chars();

    while let Some(c) = chars.next() {
        let spec = match c {
            'Y' => "%Y",
            'y' => "%y",
            'm' => "%m",
            'n' => "%-m",
            'd' => "%d",
            'j' => "%-d",
            'H' => "%H",
            'G' => "%-H",
            'h' => "%I",
            'g' => "%-I",
            'A' => "%p",
            'a' => "%P",
            'i' => "%M",
            's' => "%S",
            'u' => "%6f",
            'v' => "%3f",
            'P' | 'p' => "%:z",
            'O' => "%z",
            'T' | 'e' => "%Z",
            'M' => "%b",
            'F' => "%B",
            'D' => "%a",
            'l' => "%A",
            'U' => "%s",
            '%' => "%%",
            '\\' => {
                // escaped literal
                if let Some(next) = chars.next() {
                    push_literal(&mut out, next);
                }
                continue;
            }
            other => {
                push_literal(&mut out, other);
                continue;
            }
        };
        out.push_str(spec);
    }

    out
}

fn push_literal(out: &mut String, c: char) {
    if c == '%' {
        out.push_str("%%");
    } else {
        out.push(c);
    }
}
