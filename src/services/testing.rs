//! Shared fixtures for service tests: a deterministic state (fixed clock,
//! in-memory store, canned provider) and the January 2020 slate the tests
//! replay.
//!
//! The slate mirrors a real game night: polling provider date 2020-01-18
//! yields two evening games for that day plus seven early-morning games
//! belonging to the 17th, and polling 2020-01-19 yields the nine
//! early-morning games that complete the 18th's eleven-game slate.

use std::sync::Arc;

use time::{Duration, OffsetDateTime, macros::datetime};

use crate::{
    clock::FixedClock,
    config::AppConfig,
    dao::pick_store::memory::MemoryPickStore,
    provider::{
        mock::MockProviderClient,
        models::{ProviderGame, ProviderScore, ProviderTeam, ScheduleEnvelope, ScheduleResponse},
    },
    state::{AppState, SharedState},
};

/// Deterministic application state plus direct handles to its doubles.
pub struct TestHarness {
    pub state: SharedState,
    pub store: MemoryPickStore,
    pub provider: MockProviderClient,
}

impl TestHarness {
    /// Harness with the clock pinned to `now` and an installed empty store.
    pub fn at(now: OffsetDateTime) -> Self {
        let store = MemoryPickStore::new();
        let provider = MockProviderClient::new();
        let state = AppState::new(
            AppConfig::default(),
            Arc::new(FixedClock::new(now)),
            Arc::new(provider.clone()),
        );
        futures::executor::block_on(state.set_pick_store(Arc::new(store.clone())));
        Self {
            state,
            store,
            provider,
        }
    }

    /// Canned responses for Jan 17-19 with every game still scheduled.
    pub fn load_scheduled_slate(&self) {
        for (date, games) in slate("Scheduled") {
            self.provider.set_response(date, schedule(games));
        }
    }

    /// Canned responses for Jan 17-19 with every game finished and scored.
    pub fn load_finished_slate(&self) {
        for (date, games) in slate("Finished") {
            self.provider.set_response(date, schedule(games));
        }
    }
}

/// Wrap games into the provider's response envelope.
pub fn schedule(games: Vec<ProviderGame>) -> ScheduleResponse {
    ScheduleResponse {
        api: ScheduleEnvelope {
            status: 200,
            message: "GET games/date".to_owned(),
            results: games.len() as i64,
            filters: vec!["date".to_owned()],
            games,
        },
    }
}

/// Low-level provider game builder; points are raw wire strings.
pub fn provider_game(
    id: &str,
    start: OffsetDateTime,
    status: &str,
    home: (i64, &str),
    away: (i64, &str),
) -> ProviderGame {
    ProviderGame {
        season_year: "2019".to_owned(),
        game_id: id.to_owned(),
        start_time_utc: start,
        arena: "Test Arena".to_owned(),
        city: "Testville".to_owned(),
        country: "USA".to_owned(),
        season_stage: "2".to_owned(),
        status_game: status.to_owned(),
        v_team: provider_team(away.0, away.1),
        h_team: provider_team(home.0, home.1),
    }
}

fn provider_team(id: i64, points: &str) -> ProviderTeam {
    ProviderTeam {
        team_id: id.to_string(),
        short_name: format!("T{id}"),
        full_name: format!("Team {id}"),
        nick_name: format!("Team {id}"),
        logo: format!("https://example.test/{id}.png"),
        score: ProviderScore {
            points: points.to_owned(),
        },
    }
}

/// Home and away team ids of a slate game.
pub fn slate_teams(game_id: i64) -> (i64, i64) {
    match game_id {
        7015 => (23, 16),
        7016 => (21, 17),
        other => (other - 6900, other - 6800),
    }
}

/// Whether the home side wins the slate game once finished. Exactly seven of
/// the eleven games on the 18th (7015-7021) go to the home team.
pub fn home_wins(game_id: i64) -> bool {
    game_id <= 7021
}

fn slate_game(id: i64, start: OffsetDateTime, status: &str) -> ProviderGame {
    let (home_id, away_id) = slate_teams(id);
    let (home_points, away_points) = if status == "Finished" {
        if home_wins(id) {
            ("110", "100")
        } else {
            ("100", "110")
        }
    } else {
        ("", "")
    };

    provider_game(
        &id.to_string(),
        start,
        status,
        (home_id, home_points),
        (away_id, away_points),
    )
}

fn slate(status: &str) -> Vec<(&'static str, Vec<ProviderGame>)> {
    // Provider date 2020-01-17: the 17th's own evening games.
    let seventeenth = vec![
        slate_game(7001, datetime!(2020-01-17 19:00 UTC), status),
        slate_game(7002, datetime!(2020-01-17 21:00 UTC), status),
    ];

    // Provider date 2020-01-18: seven early-morning leftovers of the 17th
    // followed by the first two games of the 18th.
    let mut eighteenth = Vec::new();
    for (offset, id) in (7008..=7014).enumerate() {
        let start = datetime!(2020-01-18 00:00 UTC) + Duration::minutes(20 * offset as i64);
        eighteenth.push(slate_game(id, start, status));
    }
    eighteenth.push(slate_game(7015, datetime!(2020-01-18 20:30 UTC), status));
    eighteenth.push(slate_game(7016, datetime!(2020-01-18 23:00 UTC), status));

    // Provider date 2020-01-19: nine early games completing the 18th, then
    // the 19th's own evening games.
    let mut nineteenth = Vec::new();
    for (offset, id) in (7017..=7025).enumerate() {
        let start = datetime!(2020-01-19 00:30 UTC) + Duration::minutes(20 * offset as i64);
        nineteenth.push(slate_game(id, start, status));
    }
    nineteenth.push(slate_game(7026, datetime!(2020-01-19 20:00 UTC), status));
    nineteenth.push(slate_game(7027, datetime!(2020-01-19 22:00 UTC), status));

    vec![
        ("2020-01-17", seventeenth),
        ("2020-01-18", eighteenth),
        ("2020-01-19", nineteenth),
    ]
}
