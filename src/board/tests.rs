//! Unit tests for board assembly

use super::*;
use crate::error::FetchError;
use crate::football::fake::{
    card_events, fixture_row, league_rows, statistics_rows, team_rows, FakeUpstream,
};
use serde_json::{json, Value};

const DAY: i64 = 86_400;
const T0: i64 = 1_755_000_000;

fn bulk_key(league: u32, season: u16) -> String {
    format!("/fixtures?league={league}&season={season}&status=FT-AET-PEN")
}

/// A league with teams 1 (Alpha) and 2 (Beta) and `rounds` finished meetings.
fn two_team_league(upstream: FakeUpstream, league: u32, rounds: u64) -> FakeUpstream {
    let fixtures: Vec<Value> = (1..=rounds)
        .map(|i| {
            fixture_row(
                league as u64 * 1000 + i,
                T0 + i as i64 * DAY,
                (1, "Alpha"),
                (2, "Beta"),
                (1, 0),
                "FT",
            )
        })
        .collect();
    upstream
        .with(
            &format!("/leagues?id={league}"),
            league_rows(league, &format!("League {league}"), &[(2025, true)]),
        )
        .with(
            &format!("/teams?league={league}&season=2025"),
            team_rows(&[(2, "Beta"), (1, "Alpha")]),
        )
        .with(&bulk_key(league, 2025), Value::Array(fixtures))
}

#[test]
fn test_blank_slot() {
    let slot = MatchSlot::blank();
    assert!(slot.is_blank());
    assert_eq!(slot.opponent, "-");
    assert_eq!(slot.goals, None);
    assert_eq!(slot.corners, None);
    assert_eq!(slot.cards, None);
}

#[test]
fn test_slot_json_shape() {
    let value = serde_json::to_value(MatchSlot::blank()).unwrap();
    assert_eq!(
        value,
        json!({
            "fixtureId": 0,
            "date": null,
            "opponent": "-",
            "isHome": null,
            "score": null,
            "goals": null,
            "corners": null,
            "cards": null
        })
    );
}

#[tokio::test]
async fn test_every_team_has_exactly_seven_slots() {
    for rounds in [0, 3, 7, 12] {
        let upstream = two_team_league(FakeUpstream::new(), 39, rounds);
        let config = BoardConfig {
            merge_previous_season: false,
            ..BoardConfig::immediate()
        };
        let boards = get_league_boards(&upstream, &[LeagueConfig::new(39, "EPL")], &config).await;

        assert_eq!(boards[0].teams.len(), 2);
        for team in &boards[0].teams {
            assert_eq!(team.matches.len(), 7, "{rounds} rounds");
            let real = team.matches.iter().filter(|m| !m.is_blank()).count();
            assert_eq!(real, (rounds as usize).min(7));
            assert!(team.matches[real..].iter().all(MatchSlot::is_blank));
        }
    }
}

#[tokio::test]
async fn test_teams_sorted_by_name_and_matches_newest_first() {
    let upstream = two_team_league(FakeUpstream::new(), 39, 4);
    let boards = get_league_boards(
        &upstream,
        &[LeagueConfig::new(39, "EPL")],
        &BoardConfig::immediate(),
    )
    .await;

    let board = &boards[0];
    assert_eq!(board.teams[0].name, "Alpha");
    assert_eq!(board.teams[1].name, "Beta");

    let ids: Vec<u64> = board.teams[0]
        .matches
        .iter()
        .take(4)
        .map(|m| m.fixture_id.as_u64())
        .collect();
    assert_eq!(ids, vec![39004, 39003, 39002, 39001]);
    assert_eq!(board.teams[0].matches[0].is_home, Some(true));
    assert_eq!(board.teams[1].matches[0].is_home, Some(false));
    assert_eq!(board.teams[1].matches[0].opponent, "Alpha");
    assert_eq!(board.teams[0].matches[0].score.as_deref(), Some("1-0"));
}

#[tokio::test]
async fn test_shared_fixtures_fetch_stats_once() {
    let upstream = two_team_league(FakeUpstream::new(), 39, 3)
        .with("/fixtures/statistics?fixture=39001", statistics_rows((3, 1, 0), (2, 0, 0)))
        .with("/fixtures/statistics?fixture=39002", statistics_rows((4, 0, 0), (4, 2, 0)))
        .with("/fixtures/statistics?fixture=39003", statistics_rows((1, 1, 1), (0, 0, 0)));

    let boards = get_league_boards(
        &upstream,
        &[LeagueConfig::new(39, "EPL")],
        &BoardConfig::immediate(),
    )
    .await;

    for id in [39001, 39002, 39003] {
        assert_eq!(
            upstream.calls_to(&format!("/fixtures/statistics?fixture={id}")),
            1
        );
    }
    let alpha = &boards[0].teams[0];
    let beta = &boards[0].teams[1];
    assert_eq!(alpha.matches[0].corners, Some(1));
    assert_eq!(alpha.matches[0].cards, Some(2));
    assert_eq!(alpha.matches[1].corners, Some(8));
    for (a, b) in alpha.matches.iter().zip(&beta.matches).take(3) {
        assert_eq!(a.fixture_id, b.fixture_id);
        assert_eq!((a.goals, a.corners, a.cards), (b.goals, b.corners, b.cards));
    }
}

#[tokio::test]
async fn test_failed_league_does_not_abort_others() {
    let upstream = two_team_league(FakeUpstream::new(), 39, 7)
        .failing("/leagues?id=140", FetchError::status(500, "internal error"));
    let upstream = two_team_league(upstream, 135, 7);

    let leagues = [
        LeagueConfig::new(39, "Premier League"),
        LeagueConfig::new(140, "La Liga"),
        LeagueConfig::new(135, "Serie A"),
    ];
    let boards = get_league_boards(&upstream, &leagues, &BoardConfig::immediate()).await;

    assert_eq!(boards.len(), 3);
    assert_eq!(boards[0].league_name, "Premier League");
    assert_eq!(boards[1].league_name, "La Liga");
    assert_eq!(boards[2].league_name, "Serie A");

    assert!(boards[0].is_ok());
    assert_eq!(boards[0].teams.len(), 2);
    assert!(boards[2].is_ok());
    assert_eq!(boards[2].teams.len(), 2);

    assert!(boards[1].teams.is_empty());
    let error = boards[1].error.as_deref().unwrap();
    assert!(error.contains("500"), "{error}");
    assert_eq!(boards[1].league_id, Some(LeagueId::new(140)));
}

#[tokio::test]
async fn test_missing_credential_is_reported_per_league() {
    let credential = FetchError::MissingCredential {
        env_var: "API_FOOTBALL_KEY".to_string(),
    };
    let upstream = FakeUpstream::new()
        .failing("/leagues?id=39", credential.clone())
        .failing("/leagues?id=140", credential);

    let leagues = [LeagueConfig::new(39, "EPL"), LeagueConfig::new(140, "La Liga")];
    let boards = get_league_boards(&upstream, &leagues, &BoardConfig::immediate()).await;

    for board in &boards {
        assert!(board.teams.is_empty());
        assert!(board.error.as_deref().unwrap().contains("API_FOOTBALL_KEY"));
    }
}

#[tokio::test]
async fn test_empty_roster_keeps_season() {
    let upstream = FakeUpstream::new().with(
        "/leagues?id=39",
        league_rows(39, "Premier League", &[(2025, true)]),
    );

    let boards = get_league_boards(
        &upstream,
        &[LeagueConfig::new(39, "EPL")],
        &BoardConfig::immediate(),
    )
    .await;

    assert_eq!(boards[0].season, Some(Season::new(2025)));
    assert!(boards[0].teams.is_empty());
    assert!(boards[0].error.as_deref().unwrap().contains("empty roster"));
}

#[tokio::test]
async fn test_bulk_failure_keeps_fallback_teams() {
    let upstream = FakeUpstream::new()
        .with("/leagues?id=39", league_rows(39, "Premier League", &[(2025, true)]))
        .with("/teams?league=39&season=2025", team_rows(&[(1, "Alpha")]))
        .failing(&bulk_key(39, 2025), FetchError::status(503, "unavailable"))
        .with(
            "/fixtures?last=7&team=1",
            json!([fixture_row(77, T0, (5, "Cup Side"), (1, "Alpha"), (0, 2), "FT")]),
        );

    let boards = get_league_boards(
        &upstream,
        &[LeagueConfig::new(39, "EPL")],
        &BoardConfig::immediate(),
    )
    .await;

    let board = &boards[0];
    assert!(board.error.as_deref().unwrap().contains("503"));
    assert_eq!(board.teams.len(), 1);
    assert_eq!(board.teams[0].matches[0].fixture_id, FixtureId::new(77));
    assert_eq!(board.teams[0].matches[0].opponent, "Cup Side");
    assert_eq!(board.teams[0].matches[0].goals, Some(2));
    assert_eq!(board.teams[0].matches.len(), 7);
}

#[tokio::test]
async fn test_failed_team_fallback_keeps_team_padded() {
    let upstream = two_team_league(FakeUpstream::new(), 39, 2)
        .with(
            "/teams?league=39&season=2025",
            team_rows(&[(1, "Alpha"), (2, "Beta"), (3, "Gamma")]),
        )
        .failing(
            "/fixtures?last=7&team=3",
            FetchError::status(503, "unavailable"),
        );

    let boards = get_league_boards(
        &upstream,
        &[LeagueConfig::new(39, "EPL")],
        &BoardConfig::immediate(),
    )
    .await;

    let board = &boards[0];
    assert_eq!(board.error, None);
    assert_eq!(board.teams.len(), 3);

    let gamma = &board.teams[2];
    assert_eq!(gamma.name, "Gamma");
    assert_eq!(gamma.matches.len(), 7);
    assert!(gamma.matches.iter().all(MatchSlot::is_blank));
    assert_eq!(upstream.calls_to("/fixtures?last=7&team=3"), 1);

    assert_eq!(board.teams[0].matches.iter().filter(|m| !m.is_blank()).count(), 2);
}

#[tokio::test]
async fn test_name_reconciliation_fills_team() {
    let upstream = FakeUpstream::new()
        .with("/leagues?id=262", league_rows(262, "Liga MX", &[(2025, true)]))
        .with(
            "/teams?league=262&season=2025",
            team_rows(&[(2287, "Club América"), (2282, "Monterrey")]),
        )
        .with(
            &bulk_key(262, 2025),
            json!([
                fixture_row(1, T0, (9001, "America"), (2282, "Monterrey"), (2, 2), "FT"),
                fixture_row(2, T0 + DAY, (2282, "Monterrey"), (9001, "America"), (1, 0), "PEN"),
            ]),
        );

    let boards = get_league_boards(
        &upstream,
        &[LeagueConfig::new(262, "Liga MX")],
        &BoardConfig::immediate(),
    )
    .await;

    let america = &boards[0].teams[0];
    assert_eq!(america.name, "Club América");
    assert_eq!(america.matches[0].fixture_id, FixtureId::new(2));
    assert_eq!(america.matches[1].fixture_id, FixtureId::new(1));
    assert_eq!(america.matches[1].opponent, "Monterrey");
    assert_eq!(upstream.calls_with_prefix("/fixtures?last"), 0);
}

#[tokio::test]
async fn test_build_is_idempotent() {
    let upstream = two_team_league(FakeUpstream::new(), 39, 5)
        .with("/fixtures/statistics?fixture=39005", statistics_rows((2, 0, 0), (5, 1, 0)))
        .with("/fixtures/events?fixture=39005&type=Card", card_events(3, 0));
    let leagues = [LeagueConfig::new(39, "EPL")];
    let config = BoardConfig::immediate();

    let first = get_league_boards(&upstream, &leagues, &config).await;
    let second = get_league_boards(&upstream, &leagues, &config).await;

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_assemble_truncates_and_pads() {
    use crate::football::{
        types::{FixtureRow, Venue},
        Fixture, RosterTeam, Team,
    };

    let team = |id: u64, name: &str| {
        RosterTeam::new(Team {
            id: TeamId::new(id),
            name: name.to_string(),
            logo: None,
        })
    };
    let entry = |id: u64| {
        let row: FixtureRow = serde_json::from_value(fixture_row(
            id,
            T0 - id as i64 * DAY,
            (1, "Alpha"),
            (9, "Other"),
            (3, 1),
            "FT",
        ))
        .unwrap();
        TeamFixture {
            fixture: Fixture::from_row(row),
            venue: Venue::Home,
        }
    };

    let teams = vec![
        TeamMatches {
            team: team(1, "zeta"),
            fixtures: (1..=9).map(entry).collect(),
        },
        TeamMatches {
            team: team(2, "Alpha"),
            fixtures: vec![entry(1)],
        },
    ];
    let stats = BTreeMap::from([(
        FixtureId::new(1),
        FixtureStats {
            corners: Some(0),
            cards: None,
        },
    )]);

    let boards = assemble_teams(&teams, &stats, 7);

    assert_eq!(boards[0].name, "Alpha");
    assert_eq!(boards[1].name, "zeta");
    assert!(boards.iter().all(|b| b.matches.len() == 7));
    assert_eq!(boards[1].matches[6].fixture_id, FixtureId::new(7));
    assert_eq!(boards[0].matches[0].corners, Some(0));
    assert_eq!(boards[0].matches[0].cards, None);
    assert_eq!(boards[0].matches[0].goals, Some(4));
    assert_eq!(boards[0].matches[0].date.as_deref(), Some("2025-08-11"));
    assert!(boards[0].matches[1..].iter().all(MatchSlot::is_blank));
}
