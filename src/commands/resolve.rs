//! Season and roster lookup commands

use serde::Serialize;

use super::common::build_client;
use crate::{
    cli::ClientArgs,
    football::{resolve_roster, resolve_season, Roster, Team},
    LeagueConfig, LeagueId, Result, Season,
};

#[derive(Debug, Serialize)]
struct RosterOutput<'a> {
    league: LeagueId,
    season: Season,
    teams: &'a [Team],
}

/// Handle the season command
pub async fn handle_season(league: LeagueConfig, client: ClientArgs) -> Result<()> {
    let client = build_client(&client)?;
    let resolved = resolve_season(&client, &league.league).await?;
    println!("{} ({}): season {}", resolved.name, resolved.id, resolved.season);
    Ok(())
}

/// Plain-text roster, one team per line.
pub fn format_roster_text(league: LeagueId, roster: &Roster) -> String {
    let mut lines = vec![format!(
        "League {} season {}: {} teams",
        league,
        roster.season,
        roster.teams.len()
    )];
    lines.extend(
        roster
            .teams
            .iter()
            .map(|t| format!("  {:>6}  {}", t.id, t.name)),
    );
    lines.join("\n")
}

/// Handle the roster command
pub async fn handle_roster(
    league: LeagueConfig,
    season: Option<Season>,
    as_json: bool,
    client: ClientArgs,
) -> Result<()> {
    let client = build_client(&client)?;

    let resolved = resolve_season(&client, &league.league).await?;
    let season = season.unwrap_or(resolved.season);
    let roster = resolve_roster(&client, resolved.id, season).await?;

    if as_json {
        let output = RosterOutput {
            league: resolved.id,
            season: roster.season,
            teams: &roster.teams,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", format_roster_text(resolved.id, &roster));
    }
    Ok(())
}
