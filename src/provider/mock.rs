//! Mock fallback data.
//!
//! Synthetic fixtures returned when the provider is unreachable or the
//! response cannot be parsed. Each generator honors the same filter
//! parameters as the real endpoint so route code is agnostic to the data
//! source. Nothing is persisted; fixtures are rebuilt on every call, with
//! small random jitter on prices.

use chrono::{Datelike, NaiveDate};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::types::{Comment, Field, Meeting, Race};

use super::{dates, FetchParams};

const TRACKS: [(&str, &str, &str); 4] = [
    ("Randwick", "RAND", "+2m"),
    ("Flemington", "FLEM", "True"),
    ("Caulfield", "CAUL", "+4m"),
    ("Coffs Harbour", "COFF", "+6m 1000m-W/P"),
];

const HORSES: [&str; 10] = [
    "Fast Mover",
    "Midnight Rail",
    "Saltbush Lad",
    "Harbour Mist",
    "Golden Furlong",
    "Stormy Verdict",
    "Clockwise",
    "Redwood Run",
    "Pavilion End",
    "True North",
];

const JOCKEYS: [&str; 5] = ["B Avdulla", "J McDonald", "R King", "T Berry", "K McEvoy"];
const TRAINERS: [&str; 5] = ["C Waller", "G Waterhouse", "J Pride", "B Baker", "M Freedman"];

const COMMENT_PHRASES: [&str; 5] = [
    "Settled midfield, ran on strongly late.",
    "Led throughout, kept finding under pressure.",
    "Slow into stride, never a factor.",
    "Trapped wide without cover, weakened.",
    "Held up at the turn, closed off well.",
];

fn base_meeting_id(date: NaiveDate) -> i64 {
    // Stable per-day ids so repeated calls line up.
    176_000 + i64::from(date.ordinal())
}

/// Mock meetings for a date, optionally filtered by track name.
pub fn meetings(params: &FetchParams) -> Vec<Meeting> {
    let date = params.date.unwrap_or_else(dates::today);
    let iso = format!("{}T00:00:00.000Z", date.format("%Y-%m-%d"));
    let base = base_meeting_id(date);

    TRACKS
        .iter()
        .enumerate()
        .map(|(i, (track, abbrev, rail))| Meeting {
            meeting_id: base + i as i64,
            track: track.to_string(),
            rail_position: rail.to_string(),
            is_tab_meeting: i < 3,
            meeting_date: iso.clone(),
            is_barrier_trial: false,
            has_sectionals: i % 2 == 0,
            track_abbrev: abbrev.to_string(),
            resulted: false,
            races: Vec::new(),
        })
        .filter(|m| match &params.track {
            Some(track) => m.track.eq_ignore_ascii_case(track),
            None => true,
        })
        .collect()
}

/// Mock race card for a meeting.
pub fn races(params: &FetchParams) -> Vec<Race> {
    let meeting_id = params.meeting_id.unwrap_or_else(|| base_meeting_id(dates::today()));
    let distances = [1000, 1200, 1400, 1600, 2000, 2400];

    distances
        .iter()
        .enumerate()
        .map(|(i, &distance)| {
            let race_no = i as u32 + 1;
            Race {
                race_id: meeting_id * 100 + race_no as i64,
                meeting_id,
                race_name: format!("Race {} Handicap", race_no),
                race_no,
                prize_money: 50_000 + 25_000 * i as i64,
                starters: 8 + (i as u32 % 4),
                start_time: format!("{:02}:{:02}", 12 + i / 2, if i % 2 == 0 { 0 } else { 35 }),
                class: if i < 3 { "BM66" } else { "BM78" }.to_string(),
                distance,
                age_restrictions: "3YO+".to_string(),
                sex_restrictions: "No".to_string(),
                weight_type: "Handicap".to_string(),
            }
        })
        .collect()
}

/// Mock field (runners) for a race, with jittered prices.
pub fn fields(params: &FetchParams) -> Vec<Field> {
    let race_id = params.race_id.unwrap_or(1);
    let mut rng = SmallRng::from_entropy();

    HORSES
        .iter()
        .enumerate()
        .map(|(i, horse)| {
            let tab_no = i as u32 + 1;
            let sp = 2.5 + i as f64 * 1.8 + rng.gen_range(-0.4..0.4);
            Field {
                field_id: race_id * 100 + tab_no as i64,
                race_id,
                tab_no,
                position: 0,
                margin: 0.0,
                horse: horse.to_string(),
                trainer: TRAINERS[i % TRAINERS.len()].to_string(),
                jockey: JOCKEYS[i % JOCKEYS.len()].to_string(),
                weight: 54.0 + (i % 5) as f64 * 0.5,
                barrier: ((i * 3) % HORSES.len()) as u32 + 1,
                in_run: String::new(),
                flucs: format!("{:.1},{:.1}", sp + 0.5, sp),
                price_sp: (sp * 10.0).round() / 10.0,
                price_tab: ((sp * 1.05) * 10.0).round() / 10.0,
            }
        })
        .collect()
}

/// Mock per-runner comments for a race.
pub fn comments(params: &FetchParams) -> Vec<Comment> {
    let race_id = params.race_id.unwrap_or(1);

    HORSES
        .iter()
        .enumerate()
        .map(|(i, horse)| Comment {
            race_id,
            tab_no: i as u32 + 1,
            horse: horse.to_string(),
            comment: COMMENT_PHRASES[i % COMMENT_PHRASES.len()].to_string(),
        })
        .collect()
}
