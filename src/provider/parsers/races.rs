//! Race list parser.
//!
//! Line layout: raceId ^ meetingId ^ raceName ^ raceNo ^ prizeMoney ^
//! starters ^ startTime ^ class ^ distance ^ ageRestrictions ^
//! sexRestrictions ^ weightType, plus trailing fields we ignore. Lines with
//! fewer than 15 fields are dropped.

use crate::error::CaretError;
use crate::types::Race;

use super::{int_field, record_lines, uint_field, ParsePolicy};

const MIN_FIELDS: usize = 15;

/// Parse a caret-delimited race list body.
pub fn parse_races(body: &str, policy: ParsePolicy) -> Result<Vec<Race>, CaretError> {
    let mut races = Vec::new();

    for (line_no, line) in record_lines(body) {
        let parts: Vec<&str> = line.split('^').collect();
        if parts.len() < MIN_FIELDS {
            continue;
        }

        races.push(Race {
            race_id: int_field(policy, parts[0], line_no, 0)?,
            meeting_id: int_field(policy, parts[1], line_no, 1)?,
            race_name: parts[2].to_string(),
            race_no: uint_field(policy, parts[3], line_no, 3)?,
            prize_money: int_field(policy, parts[4], line_no, 4)?,
            starters: uint_field(policy, parts[5], line_no, 5)?,
            start_time: parts[6].to_string(),
            class: parts[7].to_string(),
            distance: uint_field(policy, parts[8], line_no, 8)?,
            age_restrictions: parts[9].to_string(),
            sex_restrictions: parts[10].to_string(),
            weight_type: parts[11].to_string(),
        });
    }

    Ok(races)
}
