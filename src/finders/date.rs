//! Date finder - detects calendar dates in common layouts.

use super::PatternFinder;
use crate::collection::PatternCollection;
use crate::pattern::{Pattern, PatternKind};

const SEPARATORS: &[char] = &['.', '/', '-', '_', '\\', ' '];

const MIN_DATE_LEN: usize = 6;
const MAX_DATE_LEN: usize = 10;

const DAYS_PER_YEAR: f64 = 366.0;
const MIN_YEAR: u32 = 1900;
const MAX_YEAR: u32 = 2099;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearDigits {
    Two,
    Four,
}

/// Bits needed to enumerate every date whose year has `digits` digits.
pub fn date_space_bits(digits: YearDigits) -> f64 {
    let years = match digits {
        YearDigits::Two => 100.0,
        YearDigits::Four => f64::from(MAX_YEAR - MIN_YEAR + 1),
    };
    (DAYS_PER_YEAR * years).log2()
}

#[derive(Debug, Clone, Copy)]
enum Field {
    Day,
    Month,
    Year,
}

use Field::{Day, Month, Year};

const FIELD_ORDERS: &[[Field; 3]] = &[[Day, Month, Year], [Month, Day, Year], [Year, Month, Day]];

struct DateMatch {
    digits: YearDigits,
    layout: String,
}

#[derive(Debug, Clone, Default)]
pub struct DateFinder;

impl DateFinder {
    pub fn new() -> Self {
        Self
    }
}

impl PatternFinder for DateFinder {
    fn name(&self) -> &str {
        "date"
    }

    fn search(&self, text: &str) -> PatternCollection {
        let chars: Vec<char> = text.chars().collect();
        let mut collection = PatternCollection::new(text);

        for start in 0..chars.len() {
            for len in MIN_DATE_LEN..=MAX_DATE_LEN {
                let end = start + len;
                if end > chars.len() {
                    break;
                }
                if let Some(m) = parse_date(&chars[start..end]) {
                    collection.push(Pattern::spanning(
                        start,
                        end,
                        PatternKind::Date,
                        date_space_bits(m.digits),
                        format!("date ({})", m.layout),
                    ));
                }
            }
        }

        collection.filter();
        collection
    }
}

fn parse_date(span: &[char]) -> Option<DateMatch> {
    if span.iter().all(char::is_ascii_digit) {
        parse_unseparated(span)
    } else {
        parse_separated(span)
    }
}

fn parse_unseparated(span: &[char]) -> Option<DateMatch> {
    let year_len = match span.len() {
        6 => 2,
        8 => 4,
        _ => return None,
    };
    FIELD_ORDERS.iter().find_map(|order| {
        let mut rest = span;
        let mut groups: [&[char]; 3] = [&[]; 3];
        for (slot, field) in groups.iter_mut().zip(order.iter()) {
            let width = if matches!(field, Year) { year_len } else { 2 };
            let (head, tail) = rest.split_at(width);
            *slot = head;
            rest = tail;
        }
        try_order(order, groups, None)
    })
}

fn parse_separated(span: &[char]) -> Option<DateMatch> {
    let mut separators = span.iter().filter(|c| !c.is_ascii_digit());
    let sep = *separators.next()?;
    if !SEPARATORS.contains(&sep) || separators.any(|&c| c != sep) {
        return None;
    }

    let parts: Vec<&[char]> = span.split(|&c| c == sep).collect();
    let groups: [&[char]; 3] = parts.try_into().ok()?;
    if groups.iter().any(|g| g.is_empty()) {
        return None;
    }

    FIELD_ORDERS
        .iter()
        .find_map(|order| try_order(order, groups, Some(sep)))
}

fn try_order(order: &[Field; 3], groups: [&[char]; 3], sep: Option<char>) -> Option<DateMatch> {
    let (mut day, mut month, mut year) = (0, 0, None);
    for (field, group) in order.iter().zip(groups.iter()) {
        let value = digits_value(group)?;
        match field {
            Day if group.len() <= 2 => day = value,
            Month if group.len() <= 2 => month = value,
            Year if group.len() == 2 => year = Some((value, YearDigits::Two)),
            Year if group.len() == 4 && (MIN_YEAR..=MAX_YEAR).contains(&value) => {
                year = Some((value, YearDigits::Four))
            }
            _ => return None,
        }
    }
    let (_, digits) = year?;
    if !is_valid_day(day, month) {
        return None;
    }

    let sep = sep.map(String::from).unwrap_or_default();
    let layout = order
        .iter()
        .zip(groups.iter())
        .map(|(field, group)| match field {
            Day => "dd".to_string(),
            Month => "mm".to_string(),
            Year => "y".repeat(group.len()),
        })
        .collect::<Vec<_>>()
        .join(sep.as_str());

    Some(DateMatch { digits, layout })
}

fn digits_value(group: &[char]) -> Option<u32> {
    group
        .iter()
        .try_fold(0u32, |acc, c| Some(acc * 10 + c.to_digit(10)?))
}

/// February always admits the 29th, since two-digit years leave leapness open.
fn is_valid_day(day: u32, month: u32) -> bool {
    let max_day = match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => 29,
        _ => return false,
    };
    (1..=max_day).contains(&day)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find(text: &str, span: (usize, usize)) -> Option<Pattern> {
        DateFinder::new()
            .search(text)
            .patterns()
            .iter()
            .find(|p| (p.start(), p.end()) == span)
            .cloned()
    }

    #[test]
    fn test_separated_four_digit_year() {
        let p = find("11.05.1997", (0, 10)).expect("full date");
        assert_eq!(p.kind(), PatternKind::Date);
        assert_eq!(p.cost(), date_space_bits(YearDigits::Four));
        assert_eq!(p.label(), "date (dd.mm.yyyy)");
    }

    #[test]
    fn test_inner_date_with_same_cost_is_filtered() {
        let result = DateFinder::new().search("11.05.1997");
        assert!(!result.patterns().iter().any(|p| p.start() == 1 && p.end() == 10));
    }

    #[test]
    fn test_year_first_and_month_first() {
        let p = find("1997-05-11", (0, 10)).expect("iso date");
        assert_eq!(p.label(), "date (yyyy-mm-dd)");
        let p = find("12/31/99", (0, 8)).expect("us date");
        assert_eq!(p.label(), "date (mm/dd/yy)");
        assert_eq!(p.cost(), date_space_bits(YearDigits::Two));
    }

    #[test]
    fn test_single_digit_day_and_month() {
        assert!(find("1.5.97", (0, 6)).is_some());
    }

    #[test]
    fn test_unseparated_dates() {
        assert_eq!(find("19970511", (0, 8)).expect("date").label(), "date (yyyymmdd)");
        assert_eq!(find("110597", (0, 6)).expect("date").label(), "date (ddmmyy)");
        assert!(find("310299", (0, 6)).is_none());
    }

    #[test]
    fn test_rejects_invalid_dates() {
        assert!(find("32.01.1990", (0, 10)).is_none());
        assert!(find("31.13.1990", (0, 10)).is_none());
        assert!(find("11.05.1850", (0, 10)).is_none());
        assert!(find("11.05/1997", (0, 10)).is_none());
        assert!(find("11:05:1997", (0, 10)).is_none());
    }

    #[test]
    fn test_finds_date_inside_text() {
        let p = find("born11.05.1997!", (4, 14)).expect("embedded date");
        assert_eq!(p.kind(), PatternKind::Date);
    }

    #[test]
    fn test_no_dates() {
        assert!(DateFinder::new().search("hello world").is_empty());
        assert!(DateFinder::new().search("").is_empty());
    }

    #[test]
    fn test_date_space_bits() {
        assert_eq!(date_space_bits(YearDigits::Two), 36_600f64.log2());
        assert_eq!(date_space_bits(YearDigits::Four), 73_200f64.log2());
    }
}
