//! Legality of 2-vs-2 groupings.
//!
//! A grouping is legal when both teams share a gender signature: both "MM",
//! both "FF", or both "MF". Unspecified players are wildcards, so a grouping
//! is legal when some assignment of their genders makes it so.

use super::types::{GameKind, Gender, Player};

/// Sorted gender signature of a team whose members all have a definite gender.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signature {
    MM,
    FF,
    MF,
}

fn signature(a: Gender, b: Gender) -> Option<Signature> {
    match (a, b) {
        (Gender::Male, Gender::Male) => Some(Signature::MM),
        (Gender::Female, Gender::Female) => Some(Signature::FF),
        (Gender::Male, Gender::Female) | (Gender::Female, Gender::Male) => Some(Signature::MF),
        _ => None,
    }
}

fn resolutions(gender: Gender) -> &'static [Gender] {
    match gender {
        Gender::Male => &[Gender::Male],
        Gender::Female => &[Gender::Female],
        Gender::Unspecified => &[Gender::Male, Gender::Female],
    }
}

/// Signatures a team can take once its unspecified members are resolved.
fn team_signatures(team: [&Player; 2]) -> Vec<Signature> {
    let mut out = Vec::with_capacity(3);
    for &a in resolutions(team[0].gender) {
        for &b in resolutions(team[1].gender) {
            if let Some(sig) = signature(a, b) {
                if !out.contains(&sig) {
                    out.push(sig);
                }
            }
        }
    }
    out
}

/// Whether the two teams may play each other.
pub fn is_legal_grouping(team_a: [&Player; 2], team_b: [&Player; 2]) -> bool {
    let a = team_signatures(team_a);
    let b = team_signatures(team_b);
    a.iter().any(|sig| b.contains(sig))
}

/// Whether the grouping can be played as the given kind.
pub fn admits(kind: GameKind, team_a: [&Player; 2], team_b: [&Player; 2]) -> bool {
    let all = [team_a[0], team_a[1], team_b[0], team_b[1]];
    match kind {
        GameKind::MaleOnly => all.iter().all(|p| p.gender != Gender::Female),
        GameKind::FemaleOnly => all.iter().all(|p| p.gender != Gender::Male),
        GameKind::Mixed => can_be_mixed_team(team_a) && can_be_mixed_team(team_b),
    }
}

fn can_be_mixed_team(team: [&Player; 2]) -> bool {
    !(team[0].gender == team[1].gender && team[0].gender != Gender::Unspecified)
}

/// Kind of a legal grouping, or `None` if the grouping is illegal.
pub fn derive_kind(team_a: [&Player; 2], team_b: [&Player; 2]) -> Option<GameKind> {
    if !is_legal_grouping(team_a, team_b) {
        return None;
    }
    Some(classify([team_a[0], team_a[1], team_b[0], team_b[1]]))
}

/// Kind implied by the definite genders of four players, without checking legality.
pub fn classify(players: [&Player; 4]) -> GameKind {
    let has_male = players.iter().any(|p| p.gender == Gender::Male);
    let has_female = players.iter().any(|p| p.gender == Gender::Female);
    match (has_male, has_female) {
        (true, false) => GameKind::MaleOnly,
        (false, true) => GameKind::FemaleOnly,
        _ => GameKind::Mixed,
    }
}
