use csv::{ReaderBuilder, Trim};
use std::collections::HashMap;
use std::fs::File;
use std::io;
use std::path::Path;

use log::warn;

use crate::bracket::types::{Gender, Player, MAX_SKILL, MIN_SKILL};
use crate::error::LoadError;

/// Parses a gender cell. Empty and "any" mean the player has no preference.
pub fn parse_gender(value: &str) -> Option<Gender> {
    match value.trim().to_lowercase().as_str() {
        "m" | "male" | "man" | "남" | "남자" => Some(Gender::Male),
        "f" | "female" | "woman" | "여" | "여자" => Some(Gender::Female),
        "" | "any" | "unspecified" | "상관없음" => Some(Gender::Unspecified),
        _ => None,
    }
}

fn parse_skill(value: &str) -> Option<u8> {
    let skill: u8 = value.trim().parse().ok()?;
    (MIN_SKILL..=MAX_SKILL).contains(&skill).then_some(skill)
}

/// Loads a roster from a CSV file with a `name,gender,skill` header
pub fn load_roster<P: AsRef<Path>>(csv_path: P) -> Result<Vec<Player>, LoadError> {
    let file = File::open(csv_path)?;
    read_roster(file)
}

/// Reads a roster from any CSV source.
///
/// Rows without a name are skipped. When a name appears twice, the later row
/// replaces the earlier one but keeps its position.
pub fn read_roster<R: io::Read>(source: R) -> Result<Vec<Player>, LoadError> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).flexible(true).from_reader(source);

    let headers = reader.headers()?.clone();
    let column = |name: &'static str| {
        headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .ok_or(LoadError::MissingColumn(name))
    };
    let name_col = column("name")?;
    let gender_col = column("gender")?;
    let skill_col = column("skill")?;

    let mut players: Vec<Player> = Vec::new();
    let mut by_name: HashMap<String, usize> = HashMap::new(); // name -> position in players

    for (i, result) in reader.records().enumerate() {
        let record = result?;
        let row = i + 2; // header is row 1

        let name = record.get(name_col).unwrap_or("").trim().to_string();
        if name.is_empty() {
            continue;
        }
        let gender_raw = record.get(gender_col).unwrap_or("");
        let gender = parse_gender(gender_raw).ok_or_else(|| LoadError::UnknownGender {
            row,
            value: gender_raw.to_string(),
        })?;
        let skill_raw = record.get(skill_col).unwrap_or("");
        let skill = parse_skill(skill_raw).ok_or_else(|| LoadError::InvalidSkill {
            row,
            value: skill_raw.to_string(),
        })?;

        let player = Player::new(name, gender, skill);
        match by_name.get(&player.name) {
            Some(&pos) => {
                warn!("row {}: {} appears again, replacing earlier entry", row, player.name);
                players[pos] = player;
            }
            None => {
                by_name.insert(player.name.clone(), players.len());
                players.push(player);
            }
        }
    }

    Ok(players)
}
