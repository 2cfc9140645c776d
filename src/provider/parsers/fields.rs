//! Fields (race entries/results) parser.
//!
//! Line layout: fieldId ^ raceId ^ tabNo ^ position ^ margin ^ horse ^
//! trainer ^ jockey ^ weight ^ barrier ^ inRun ^ flucs ^ priceSP ^
//! priceTAB, plus trailing fields we ignore. Lines with fewer than 15
//! fields are dropped.

use crate::error::CaretError;
use crate::types::Field;

use super::{float_field, int_field, record_lines, uint_field, ParsePolicy};

const MIN_FIELDS: usize = 15;

/// Parse a caret-delimited fields list body.
pub fn parse_fields(body: &str, policy: ParsePolicy) -> Result<Vec<Field>, CaretError> {
    let mut fields = Vec::new();

    for (line_no, line) in record_lines(body) {
        let parts: Vec<&str> = line.split('^').collect();
        if parts.len() < MIN_FIELDS {
            continue;
        }

        fields.push(Field {
            field_id: int_field(policy, parts[0], line_no, 0)?,
            race_id: int_field(policy, parts[1], line_no, 1)?,
            tab_no: uint_field(policy, parts[2], line_no, 2)?,
            position: uint_field(policy, parts[3], line_no, 3)?,
            margin: float_field(policy, parts[4], line_no, 4)?,
            horse: parts[5].to_string(),
            trainer: parts[6].to_string(),
            jockey: parts[7].to_string(),
            weight: float_field(policy, parts[8], line_no, 8)?,
            barrier: uint_field(policy, parts[9], line_no, 9)?,
            in_run: parts[10].to_string(),
            flucs: parts[11].to_string(),
            price_sp: float_field(policy, parts[12], line_no, 12)?,
            price_tab: float_field(policy, parts[13], line_no, 13)?,
        });
    }

    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINE: &str =
        "55001^912345^4^1^0.2^Fast Mover^J Smith^B Avdulla^56.5^7^4-3-1^6.0,5.5,5.0^5.0^4.8^x";

    #[test]
    fn parses_positional_fields() {
        let fields = parse_fields(LINE, ParsePolicy::Lenient).unwrap();
        assert_eq!(fields.len(), 1);

        let field = &fields[0];
        assert_eq!(field.field_id, 55001);
        assert_eq!(field.race_id, 912345);
        assert_eq!(field.tab_no, 4);
        assert_eq!(field.position, 1);
        assert_eq!(field.margin, 0.2);
        assert_eq!(field.horse, "Fast Mover");
        assert_eq!(field.trainer, "J Smith");
        assert_eq!(field.jockey, "B Avdulla");
        assert_eq!(field.weight, 56.5);
        assert_eq!(field.barrier, 7);
        assert_eq!(field.in_run, "4-3-1");
        assert_eq!(field.flucs, "6.0,5.5,5.0");
        assert_eq!(field.price_sp, 5.0);
        assert_eq!(field.price_tab, 4.8);
    }

    #[test]
    fn returned_length_reflects_well_formed_lines_only() {
        let body = format!("{}\n55002^912345^too^short\n{}", LINE, LINE.replace("55001", "55003"));
        let fields = parse_fields(&body, ParsePolicy::Lenient).unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].field_id, 55001);
        assert_eq!(fields[1].field_id, 55003);
    }

    #[test]
    fn lenient_defaults_bad_prices() {
        let line = LINE.replace("^5.0^", "^SP^");
        let fields = parse_fields(&line, ParsePolicy::Lenient).unwrap();
        assert_eq!(fields[0].price_sp, 0.0);
        assert_eq!(fields[0].price_tab, 4.8);
    }
}
