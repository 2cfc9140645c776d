//! Meetings list parser.
//!
//! Line layout: meetingId ^ track ^ railPosition ^ isTABMeeting ^
//! meetingDate ^ isBarrierTrial ^ hasSectionals ^ trackAbbrev ^ resulted,
//! plus trailing fields we ignore. Lines with fewer than 10 fields are
//! dropped as truncated.

use crate::error::CaretError;
use crate::types::Meeting;

use super::{bool_field, int_field, record_lines, ParsePolicy};

const MIN_FIELDS: usize = 10;

/// Parse a caret-delimited meetings list body.
pub fn parse_meetings(body: &str, policy: ParsePolicy) -> Result<Vec<Meeting>, CaretError> {
    let mut meetings = Vec::new();

    for (line_no, line) in record_lines(body) {
        let parts: Vec<&str> = line.split('^').collect();
        if parts.len() < MIN_FIELDS {
            continue;
        }

        meetings.push(Meeting {
            meeting_id: int_field(policy, parts[0], line_no, 0)?,
            track: parts[1].to_string(),
            rail_position: parts[2].to_string(),
            is_tab_meeting: bool_field(parts[3]),
            meeting_date: parts[4].to_string(),
            is_barrier_trial: bool_field(parts[5]),
            has_sectionals: bool_field(parts[6]),
            track_abbrev: parts[7].to_string(),
            resulted: bool_field(parts[8]),
            races: Vec::new(),
        });
    }

    Ok(meetings)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHORT_LINE: &str =
        "176739^Coffs Harbour^+4m^True^2025-03-26T00:00:00.000Z^False^False^COFF^True";

    #[test]
    fn drops_line_below_minimum_field_count() {
        // 9 fields, one short of the minimum.
        let meetings = parse_meetings(SHORT_LINE, ParsePolicy::Lenient).unwrap();
        assert!(meetings.is_empty());
    }

    #[test]
    fn parses_line_at_minimum_field_count() {
        let line = format!("{}^0", SHORT_LINE);
        let meetings = parse_meetings(&line, ParsePolicy::Lenient).unwrap();
        assert_eq!(meetings.len(), 1);

        let meeting = &meetings[0];
        assert_eq!(meeting.meeting_id, 176739);
        assert_eq!(meeting.track, "Coffs Harbour");
        assert_eq!(meeting.rail_position, "+4m");
        assert!(meeting.is_tab_meeting);
        assert_eq!(meeting.meeting_date, "2025-03-26T00:00:00.000Z");
        assert!(!meeting.is_barrier_trial);
        assert!(!meeting.has_sectionals);
        assert_eq!(meeting.track_abbrev, "COFF");
        assert!(meeting.resulted);
        assert!(meeting.races.is_empty());
    }

    #[test]
    fn preserves_input_order_and_skips_blank_lines() {
        let body = format!("{a}^0\n\n  \n{b}^0\n", a = SHORT_LINE, b = SHORT_LINE.replace("176739", "176742"));
        let meetings = parse_meetings(&body, ParsePolicy::Lenient).unwrap();
        assert_eq!(meetings.len(), 2);
        assert_eq!(meetings[0].meeting_id, 176739);
        assert_eq!(meetings[1].meeting_id, 176742);
    }

    #[test]
    fn lenient_defaults_bad_meeting_id() {
        let line = SHORT_LINE.replace("176739", "oops") + "^0";
        let meetings = parse_meetings(&line, ParsePolicy::Lenient).unwrap();
        assert_eq!(meetings[0].meeting_id, 0);
    }

    #[test]
    fn strict_rejects_bad_meeting_id() {
        let line = SHORT_LINE.replace("176739", "oops") + "^0";
        let err = parse_meetings(&line, ParsePolicy::Strict).unwrap_err();
        assert_eq!(
            err,
            CaretError::BadNumeric {
                line: 1,
                column: 0,
                value: "oops".to_string()
            }
        );
    }
}
