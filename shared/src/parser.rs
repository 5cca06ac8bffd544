//! Best-effort parser for AI-generated plan text
//!
//! Generated plans are free-form markdown-ish text. The parser looks for
//! weekday headers (`Monday:`, `**Tuesday - Upper body**`, `### Day 3 -
//! Wednesday`), falling back to `Day N` headers, and extracts exercise or
//! meal lines from each section. Anything it does not recognize is dropped.
//!
//! Degradation rules:
//! - a weekday with no section at all becomes a rest day
//! - a section with no items and a rest marker in its header or body is a
//!   rest day ("Saturday - Active recovery" with listed items stays active)
//! - a section with no items and no rest marker stays an active day with an
//!   empty item list
//! - an item repeated within one day gets a numbered name (`Running (2)`) so
//!   every item has its own completion key
//!
//! Parsing never fails; the result always has 7 template days.

use crate::plan::{template_day_names, DayTemplate, Plan, PlanItem, PlanKind, DAYS_PER_WEEK};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex_lite::Regex;

/// Plan length used when the text does not state one
pub const DEFAULT_TOTAL_WEEKS: u32 = 4;

/// Longest plan the parser will accept from text
pub const MAX_TOTAL_WEEKS: u32 = 52;

const MAX_ITEM_NAME_LEN: usize = 80;

static WEEKDAY_HEADER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^\s*(?:#{1,6}\s*)?(?:\*\*|__)?\s*(?:week\s*\d+\s*[,:\-–—]?\s*)?(?:day\s*\d+\s*[:\-–—(]?\s*)?(monday|tuesday|wednesday|thursday|friday|saturday|sunday)\b(.*)$",
    )
    .expect("weekday header regex")
});

static DAY_NUMBER_HEADER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(?:#{1,6}\s*)?(?:\*\*|__)?\s*day\s*([1-7])\b(.*)$")
        .expect("day number header regex")
});

static REST_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(rest|recovery|off)\b").expect("rest regex"));

static GOAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)^\s*(?:#{1,6}\s*)?(?:\*\*)?\s*goal\s*(?:\*\*)?\s*:\s*(?:\*\*)?\s*(.+?)\s*$")
        .expect("goal regex")
});

static WEEKS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(\d{1,3})\s*-?\s*weeks?\b").expect("weeks regex"));

static BULLET_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:[-*•+]|\d{1,2}[.)])\s+(.+)$").expect("bullet regex")
});

static SETS_REPS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(\d{1,2})\s*(?:sets?)?\s*(?:x|×|of)\s*(\d{1,3}(?:\s*-\s*\d{1,3})?\s*(?:reps?|seconds?|secs?|sec|s|minutes?|mins?|min)?)",
    )
    .expect("sets/reps regex")
});

static MEAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^\s*(?:[-*•+]\s*)?(?:\*\*|__)?\s*(breakfast|lunch|dinner|snacks?)\s*(?:\*\*|__)?\s*[:\-–—]\s*(?:\*\*|__)?\s*(.+)$",
    )
    .expect("meal regex")
});

static CALORIES_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d{2,4})\s*(?:kcal|calories|cals?)\b").expect("calories regex")
});

static PAREN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\([^)]*\)").expect("paren regex"));

/// Counters describing how much of the text was understood
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseReport {
    /// Template slots filled from a recognized section
    pub recognized_days: usize,
    /// Template slots that fell back to a rest day for lack of a section
    pub defaulted_rest_days: usize,
    pub items: usize,
    /// Non-empty section lines that matched no item grammar
    pub dropped_lines: usize,
}

/// Partially parsed day: whatever a section yielded
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DaySection {
    pub slot: usize,
    pub header_rest: bool,
    pub body_rest: bool,
    pub items: Vec<PlanItem>,
    pub dropped_lines: usize,
}

impl DaySection {
    fn into_template(self, day_name: &str) -> DayTemplate {
        if self.items.is_empty() && (self.header_rest || self.body_rest) {
            DayTemplate::rest(day_name)
        } else {
            DayTemplate::active(day_name, self.items)
        }
    }
}

struct RawSection<'a> {
    slot: usize,
    header_tail: &'a str,
    lines: Vec<&'a str>,
}

/// Parse generated text into a plan starting at `start_date`
pub fn parse_plan(kind: PlanKind, text: &str, start_date: NaiveDate) -> Plan {
    parse_plan_with_report(kind, text, start_date).0
}

/// Parse a workout plan
pub fn parse_workout_plan(text: &str, start_date: NaiveDate) -> Plan {
    parse_plan(PlanKind::Workout, text, start_date)
}

/// Parse a diet plan
pub fn parse_diet_plan(text: &str, start_date: NaiveDate) -> Plan {
    parse_plan(PlanKind::Diet, text, start_date)
}

/// Parse generated text and report how much of it was recognized
pub fn parse_plan_with_report(kind: PlanKind, text: &str, start_date: NaiveDate) -> (Plan, ParseReport) {
    let names = template_day_names(kind);
    let mut sections: [Option<DaySection>; DAYS_PER_WEEK] = Default::default();
    let mut report = ParseReport::default();

    for raw in split_sections(kind, text) {
        // Multi-week texts repeat weekdays; the first occurrence wins.
        if sections[raw.slot].is_some() {
            continue;
        }
        let section = parse_section(kind, &raw);
        report.items += section.items.len();
        report.dropped_lines += section.dropped_lines;
        sections[raw.slot] = Some(section);
    }

    let weekly_template: [DayTemplate; DAYS_PER_WEEK] = std::array::from_fn(|slot| {
        match sections[slot].take() {
            Some(section) => {
                report.recognized_days += 1;
                section.into_template(names[slot])
            }
            None => {
                report.defaulted_rest_days += 1;
                DayTemplate::rest(names[slot])
            }
        }
    });

    let plan = Plan {
        kind,
        goal: parse_goal(text).unwrap_or_else(|| default_goal(kind).to_string()),
        start_date,
        total_weeks: parse_total_weeks(text),
        weekly_template,
    };

    (plan, report)
}

fn default_goal(kind: PlanKind) -> &'static str {
    match kind {
        PlanKind::Workout => "General fitness",
        PlanKind::Diet => "Balanced nutrition",
    }
}

/// `Goal:` line, stripped of markdown
pub fn parse_goal(text: &str) -> Option<String> {
    GOAL_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| clean(m.as_str()))
        .filter(|goal| !goal.is_empty())
}

/// First `N weeks` mention, clamped to `1..=MAX_TOTAL_WEEKS`
pub fn parse_total_weeks(text: &str) -> u32 {
    WEEKS_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .map(|weeks| weeks.clamp(1, MAX_TOTAL_WEEKS))
        .unwrap_or(DEFAULT_TOTAL_WEEKS)
}

fn weekday_slot(kind: PlanKind, weekday: &str) -> Option<usize> {
    template_day_names(kind)
        .iter()
        .position(|name| name.eq_ignore_ascii_case(weekday))
}

fn split_sections(kind: PlanKind, text: &str) -> Vec<RawSection<'_>> {
    let by_weekday = split_by(text, |line| {
        WEEKDAY_HEADER_RE.captures(line).and_then(|caps| {
            let slot = weekday_slot(kind, caps.get(1)?.as_str())?;
            Some((slot, caps.get(2).map_or("", |m| m.as_str())))
        })
    });
    if !by_weekday.is_empty() {
        return by_weekday;
    }

    // `Day N` headers map to template slots in order.
    split_by(text, |line| {
        DAY_NUMBER_HEADER_RE.captures(line).and_then(|caps| {
            let number: usize = caps.get(1)?.as_str().parse().ok()?;
            Some((number - 1, caps.get(2).map_or("", |m| m.as_str())))
        })
    })
}

fn split_by<'a, F>(text: &'a str, header: F) -> Vec<RawSection<'a>>
where
    F: Fn(&'a str) -> Option<(usize, &'a str)>,
{
    let mut sections: Vec<RawSection<'a>> = Vec::new();

    for line in text.lines() {
        if let Some((slot, header_tail)) = header(line) {
            sections.push(RawSection {
                slot,
                header_tail,
                lines: Vec::new(),
            });
        } else if let Some(current) = sections.last_mut() {
            current.lines.push(line);
        }
    }

    sections
}

fn parse_section(kind: PlanKind, raw: &RawSection<'_>) -> DaySection {
    let mut section = DaySection {
        slot: raw.slot,
        header_rest: REST_RE.is_match(raw.header_tail),
        ..Default::default()
    };

    for line in raw.lines.iter().map(|l| l.trim()).filter(|l| !l.is_empty()) {
        let item = match kind {
            PlanKind::Workout => parse_exercise_line(line),
            PlanKind::Diet => parse_meal_line(line),
        };
        match item {
            Some(item) => {
                let item = disambiguate(&section.items, item);
                section.items.push(item);
            }
            None => {
                if REST_RE.is_match(line) {
                    section.body_rest = true;
                }
                section.dropped_lines += 1;
            }
        }
    }

    section
}

/// Give `item` a numbered name when its identifier is already taken that day
fn disambiguate(existing: &[PlanItem], item: PlanItem) -> PlanItem {
    let taken = |candidate: &PlanItem| {
        let id = candidate.identifier();
        existing.iter().any(|other| other.identifier() == id)
    };
    if !taken(&item) {
        return item;
    }

    let base = item.name().to_string();
    (2..)
        .map(|n| item.clone().renamed(format!("{} ({})", base, n)))
        .find(|candidate| !taken(candidate))
        .unwrap_or(item)
}

/// Parse one bullet or numbered exercise line
pub fn parse_exercise_line(line: &str) -> Option<PlanItem> {
    let body = BULLET_RE.captures(line)?.get(1)?.as_str();
    let (name_part, detail) = split_name_detail(body);

    let name = clean(&PAREN_RE.replace_all(name_part, ""));
    if !is_plausible_name(&name) {
        return None;
    }

    let detail = detail.map(clean).filter(|d| !d.is_empty());
    let (sets, reps) = detail
        .as_deref()
        .or(Some(body))
        .and_then(|text| SETS_REPS_RE.captures(text))
        .map(|caps| {
            let sets = caps.get(1).and_then(|m| m.as_str().parse::<u32>().ok());
            let reps = caps.get(2).map(|m| m.as_str().trim().to_string());
            (sets, reps)
        })
        .unwrap_or((None, None));

    let notes = if sets.is_none() { detail } else { None };

    Some(PlanItem::Exercise {
        name,
        sets,
        reps,
        notes,
    })
}

/// Parse one `Breakfast: ...` style meal line
pub fn parse_meal_line(line: &str) -> Option<PlanItem> {
    let caps = MEAL_RE.captures(line)?;
    let meal_type = caps.get(1)?.as_str().parse().ok()?;
    let rest = caps.get(2)?.as_str();

    let calories = CALORIES_RE
        .captures(rest)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok());

    let without_calories = CALORIES_RE.replace_all(rest, "");
    let name = clean(&PAREN_RE.replace_all(&without_calories, ""));
    let name = name.trim_end_matches(['-', '–', ',', '~']).trim().to_string();
    if !is_plausible_name(&name) {
        return None;
    }

    Some(PlanItem::Meal {
        meal_type,
        name,
        calories,
    })
}

fn split_name_detail(body: &str) -> (&str, Option<&str>) {
    for separator in [":", " - ", " – ", " — "] {
        if let Some((name, detail)) = body.split_once(separator) {
            return (name, Some(detail));
        }
    }
    (body, None)
}

fn is_plausible_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= MAX_ITEM_NAME_LEN
        && name.chars().any(|c| c.is_alphabetic())
}

/// Strip markdown emphasis, heading marks and surrounding punctuation
fn clean(text: &str) -> String {
    text.replace("**", "")
        .replace("__", "")
        .trim_matches(|c: char| c.is_whitespace() || matches!(c, '*' | '#' | ':' | '_'))
        .to_string()
}
