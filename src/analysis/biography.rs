// Squad biography: player-season rows rolled up into squad totals,
// position and age distributions and minutes leaders.

use serde::{Deserialize, Serialize};

use crate::aggregate::{count_by, distinct, sum_by, Buckets};
use crate::classify::AgeBand;
use crate::stats::round_half_up;
use crate::types::{CategoryBucket, PlayerRecord};

pub const TOP_PLAYERS: usize = 5;

/// Named players, sorted alphabetically. Rows without a name are skipped.
pub fn unique_players(records: &[PlayerRecord]) -> Vec<String> {
    let mut players = distinct(records, |r| r.player.as_str());
    players.retain(|p| !p.is_empty());
    players.sort();
    players
}

pub fn player_seasons<'a>(records: &'a [PlayerRecord], player: &str) -> Vec<&'a PlayerRecord> {
    records.iter().filter(|r| r.player == player).collect()
}

pub fn player_total_games(records: &[PlayerRecord], player: &str) -> i64 {
    player_seasons(records, player).iter().map(|r| r.games).sum()
}

pub fn player_total_minutes(records: &[PlayerRecord], player: &str) -> i64 {
    player_seasons(records, player).iter().map(|r| r.minutes).sum()
}

/// Rows per position, most common first; ties keep first-seen order.
pub fn position_distribution(records: &[PlayerRecord]) -> Vec<CategoryBucket> {
    let with_position: Vec<&PlayerRecord> =
        records.iter().filter(|r| !r.position.is_empty()).collect();
    let mut buckets = count_by(&with_position, |r| r.position.as_str());
    buckets.sort_by(|a, b| b.count.cmp(&a.count));
    buckets
}

/// Rows per age band; all five bands are present even when empty.
pub fn age_distribution(records: &[PlayerRecord]) -> Vec<CategoryBucket> {
    let mut buckets = Buckets::with_keys(AgeBand::ALL.iter().map(|b| b.as_str()));
    for record in records {
        buckets.add(AgeBand::from_age(record.age).as_str(), 0.0);
    }
    buckets.finish()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerMinutes {
    pub player: String,
    pub minutes: i64,
}

/// Players with the most minutes summed across seasons.
pub fn top_players_by_minutes(records: &[PlayerRecord], limit: usize) -> Vec<PlayerMinutes> {
    let named: Vec<&PlayerRecord> = records.iter().filter(|r| !r.player.is_empty()).collect();
    let mut totals: Vec<PlayerMinutes> = sum_by(&named, |r| r.player.as_str(), |r| r.minutes as f64)
        .into_iter()
        .map(|b| PlayerMinutes {
            player: b.key,
            minutes: b.sum as i64,
        })
        .collect();
    totals.sort_by(|a, b| b.minutes.cmp(&a.minutes));
    totals.truncate(limit);
    totals
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SquadTotals {
    pub players: usize,
    pub total_minutes: i64,
    pub total_games: i64,
    /// Mean over rows, one decimal.
    pub average_age: f64,
}

pub fn squad_totals(records: &[PlayerRecord]) -> SquadTotals {
    if records.is_empty() {
        return SquadTotals::default();
    }
    let total_age: i64 = records.iter().map(|r| r.age).sum();
    SquadTotals {
        players: unique_players(records).len(),
        total_minutes: records.iter().map(|r| r.minutes).sum(),
        total_games: records.iter().map(|r| r.games).sum(),
        average_age: round_half_up(total_age as f64 / records.len() as f64, 1),
    }
}

/// Flag code for an FBref nationality such as `"eng ENG"`. Unmapped codes
/// are returned lowercased; an empty nationality is `"unknown"`.
pub fn country_code(nationality: &str) -> String {
    let code = nationality
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    if code.is_empty() {
        return "unknown".to_string();
    }
    let mapped = match code.as_str() {
        "eng" => "gb-eng",
        "sco" => "gb-sct",
        "wal" => "gb-wls",
        "nir" => "gb-nir",
        "esp" | "es" => "es",
        "fra" | "fr" => "fr",
        "ger" | "de" => "de",
        "ita" | "it" => "it",
        "por" | "pt" => "pt",
        "bra" => "br",
        "arg" => "ar",
        "usa" => "us",
        "ned" => "nl",
        "bel" => "be",
        "den" | "dk" => "dk",
        "swe" => "se",
        "nor" => "no",
        "sui" => "ch",
        "cro" => "hr",
        "srb" => "rs",
        "pol" => "pl",
        "aut" => "at",
        "cze" => "cz",
        "hun" => "hu",
        "gre" => "gr",
        "tur" => "tr",
        "rus" => "ru",
        "ukr" => "ua",
        "jap" => "jp",
        "kor" => "kr",
        "aus" => "au",
        "can" => "ca",
        "mex" => "mx",
        "egy" => "eg",
        "sen" => "sn",
        "nga" => "ng",
        "mar" => "ma",
        "gha" => "gh",
        "civ" => "ci",
        "cmr" => "cm",
        "col" => "co",
        "uru" => "uy",
        "chi" => "cl",
        "per" => "pe",
        "ecu" => "ec",
        "ven" => "ve",
        "par" => "py",
        "bol" => "bo",
        other => other,
    };
    mapped.to_string()
}

/// Distinct players per flag code, first-seen order.
pub fn nationality_breakdown(records: &[PlayerRecord]) -> Vec<CategoryBucket> {
    let mut seen: Vec<&str> = Vec::new();
    let firsts: Vec<&PlayerRecord> = records
        .iter()
        .filter(|r| {
            if r.player.is_empty() || seen.contains(&r.player.as_str()) {
                return false;
            }
            seen.push(r.player.as_str());
            true
        })
        .collect();
    count_by(&firsts, |r| country_code(&r.nationality))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(
        season: &str,
        player: &str,
        nation: &str,
        pos: &str,
        age: i64,
        games: i64,
        minutes: i64,
    ) -> PlayerRecord {
        PlayerRecord {
            season: season.to_string(),
            player: player.to_string(),
            nationality: nation.to_string(),
            position: pos.to_string(),
            age,
            games,
            games_starts: games,
            minutes,
            minutes_90s: minutes as f64 / 90.0,
        }
    }

    fn squad() -> Vec<PlayerRecord> {
        vec![
            row("2022-2023", "Reece James", "eng ENG", "DF", 22, 16, 1184),
            row("2023-2024", "Reece James", "eng ENG", "DF", 23, 10, 620),
            row("2023-2024", "Cole Palmer", "eng ENG", "FW,MF", 21, 34, 2846),
            row("2023-2024", "Enzo Fernández", "ar ARG", "MF", 22, 29, 2391),
            row("2023-2024", "Thiago Silva", "br BRA", "DF", 39, 27, 2276),
            row("2023-2024", "Djordje Petrovic", "rs SRB", "GK", 24, 23, 2007),
            row("2023-2024", "", "", "", 0, 0, 0),
        ]
    }

    #[test]
    fn players_are_sorted_and_named() {
        let players = unique_players(&squad());
        assert_eq!(players.len(), 5);
        assert_eq!(players[0], "Cole Palmer");
        assert!(!players.contains(&String::new()));
    }

    #[test]
    fn per_player_totals_span_seasons() {
        let data = squad();
        assert_eq!(player_total_games(&data, "Reece James"), 26);
        assert_eq!(player_total_minutes(&data, "Reece James"), 1804);
        assert_eq!(player_total_minutes(&data, "Nobody"), 0);
        assert_eq!(player_seasons(&data, "Reece James").len(), 2);
    }

    #[test]
    fn positions_most_common_first() {
        let positions = position_distribution(&squad());
        assert_eq!(positions[0].key, "DF");
        assert_eq!(positions[0].count, 3);
        // ties keep first-seen order
        let rest: Vec<&str> = positions[1..].iter().map(|b| b.key.as_str()).collect();
        assert_eq!(rest, vec!["FW,MF", "MF", "GK"]);
    }

    #[test]
    fn age_bands_cover_every_row() {
        let ages = age_distribution(&squad());
        assert_eq!(ages.len(), 5);
        let counts: Vec<usize> = ages.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![1, 4, 1, 0, 1]);
        assert_eq!(counts.iter().sum::<usize>(), squad().len());
    }

    #[test]
    fn top_minutes_across_seasons() {
        let top = top_players_by_minutes(&squad(), 3);
        let names: Vec<&str> = top.iter().map(|p| p.player.as_str()).collect();
        assert_eq!(names, vec!["Cole Palmer", "Enzo Fernández", "Thiago Silva"]);
        assert_eq!(top_players_by_minutes(&squad(), TOP_PLAYERS)[3].minutes, 2007);
    }

    #[test]
    fn totals_and_average_age() {
        let totals = squad_totals(&squad());
        assert_eq!(totals.players, 5);
        assert_eq!(totals.total_minutes, 11324);
        assert_eq!(totals.total_games, 139);
        // 151 / 7
        assert_eq!(totals.average_age, 21.6);
        assert_eq!(squad_totals(&[]), SquadTotals::default());
    }

    #[test]
    fn country_codes() {
        assert_eq!(country_code("eng ENG"), "gb-eng");
        assert_eq!(country_code("ar ARG"), "ar");
        assert_eq!(country_code("BRA"), "br");
        assert_eq!(country_code("xyz XYZ"), "xyz");
        assert_eq!(country_code(""), "unknown");
    }

    #[test]
    fn nationalities_count_players_once() {
        let nations = nationality_breakdown(&squad());
        assert_eq!(nations[0].key, "gb-eng");
        assert_eq!(nations[0].count, 2);
        assert_eq!(nations.iter().map(|b| b.count).sum::<usize>(), 5);
    }
}
