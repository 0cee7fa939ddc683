//! Unit tests for storage functionality.

use super::*;
use crate::league::{PlayerId, Season, Week};

fn create_test_db() -> PlayerDatabase {
    PlayerDatabase::new_in_memory().unwrap()
}

fn create_test_db_with_player() -> PlayerDatabase {
    let mut db = create_test_db();
    let player = Player {
        player_id: PlayerId::new(12345),
        name: "Test Player".to_string(),
        position: "QB".to_string(),
        team: Some("TEST".to_string()),
    };
    db.upsert_player(&player).unwrap();
    db
}

#[test]
fn test_database_creation() {
    let _db = create_test_db();
}

#[test]
fn test_upsert_player() {
    let mut db = create_test_db();
    let player = Player {
        player_id: PlayerId::new(12345),
        name: "Test Player".to_string(),
        position: "QB".to_string(),
        team: Some("TEST".to_string()),
    };
    assert!(db.upsert_player(&player).is_ok());

    let updated_player = Player {
        player_id: PlayerId::new(12345),
        name: "Updated Player".to_string(),
        position: "RB".to_string(),
        team: Some("NEW".to_string()),
    };
    assert!(db.upsert_player(&updated_player).is_ok());
}

#[test]
fn test_upsert_weekly_stats_new() {
    let mut db = create_test_db_with_player();
    let stats = PlayerWeeklyStats {
        player_id: PlayerId::new(12345),
        season: Season::new(2023),
        week: Week::new(1),
        projected_points: Some(15.5),
        actual_points: Some(18.2),
        created_at: 0,
        updated_at: 0,
    };
    let result = db.upsert_weekly_stats(&stats, false);
    assert!(result.is_ok());
    assert!(result.unwrap());
}

#[test]
fn test_upsert_weekly_stats_existing_no_force() {
    let mut db = create_test_db_with_player();
    let stats = PlayerWeeklyStats {
        player_id: PlayerId::new(12345),
        season: Season::new(2023),
        week: Week::new(1),
        projected_points: Some(15.5),
        actual_points: Some(18.2),
        created_at: 0,
        updated_at: 0,
    };
    db.upsert_weekly_stats(&stats, false).unwrap();

    let updated_stats = PlayerWeeklyStats {
        player_id: PlayerId::new(12345),
        season: Season::new(2023),
        week: Week::new(1),
        projected_points: Some(20.0),
        actual_points: Some(25.0),
        created_at: 0,
        updated_at: 0,
    };
    let result = db.upsert_weekly_stats(&updated_stats, false);
    assert!(result.is_ok());
    assert!(!result.unwrap());
}

#[test]
fn test_upsert_weekly_stats_existing_with_force() {
    let mut db = create_test_db_with_player();
    let stats = PlayerWeeklyStats {
        player_id: PlayerId::new(12345),
        season: Season::new(2023),
        week: Week::new(1),
        projected_points: Some(15.5),
        actual_points: Some(18.2),
        created_at: 0,
        updated_at: 0,
    };
    db.upsert_weekly_stats(&stats, false).unwrap();

    let updated_stats = PlayerWeeklyStats {
        player_id: PlayerId::new(12345),
        season: Season::new(2023),
        week: Week::new(1),
        projected_points: Some(20.0),
        actual_points: Some(25.0),
        created_at: 0,
        updated_at: 0,
    };
    let result = db.upsert_weekly_stats(&updated_stats, true);
    assert!(result.is_ok());
    assert!(result.unwrap());
}

#[test]
fn test_get_weekly_stats_existing() {
    let mut db = create_test_db_with_player();
    let stats = PlayerWeeklyStats {
        player_id: PlayerId::new(12345),
        season: Season::new(2023),
        week: Week::new(1),
        projected_points: Some(15.5),
        actual_points: Some(18.2),
        created_at: 0,
        updated_at: 0,
    };
    db.upsert_weekly_stats(&stats, false).unwrap();

    let retrieved = db.get_weekly_stats(PlayerId::new(12345), Season::new(2023), Week::new(1)).unwrap();
    assert!(retrieved.is_some());
    let retrieved_stats = retrieved.unwrap();
    assert_eq!(retrieved_stats.player_id, PlayerId::new(12345));
    assert_eq!(retrieved_stats.projected_points, Some(15.5));
    assert_eq!(retrieved_stats.actual_points, Some(18.2));
}

#[test]
fn test_get_weekly_stats_nonexistent() {
    let db = create_test_db();
    let result = db.get_weekly_stats(PlayerId::new(99999), Season::new(2023), Week::new(1)).unwrap();
    assert!(result.is_none());
}

#[test]
fn test_get_player_season_stats_ordered_by_week() {
    let mut db = create_test_db_with_player();
    for week in 1..=5u16 {
        let stats = PlayerWeeklyStats {
            player_id: PlayerId::new(12345),
            season: Season::new(2023),
            week: Week::new(week),
            projected_points: Some(15.0 + week as f64),
            actual_points: Some(18.0 + week as f64),
            created_at: 0,
            updated_at: 0,
        };
        db.upsert_weekly_stats(&stats, false).unwrap();
    }

    let season_stats = db.get_player_season_stats(PlayerId::new(12345), Season::new(2023)).unwrap();
    assert_eq!(season_stats.len(), 5);
    for (i, stats) in season_stats.iter().enumerate() {
        assert_eq!(stats.week, Week::new((i + 1) as u16));
    }
}

#[test]
fn test_merge_weekly_stats_preserves_existing_field() {
    let mut db = create_test_db_with_player();
    db.merge_weekly_stats(&PlayerWeeklyStats {
        player_id: PlayerId::new(12345),
        season: Season::new(2023),
        week: Week::new(1),
        projected_points: Some(15.0),
        actual_points: None,
        created_at: 0,
        updated_at: 0,
    })
    .unwrap();

    db.merge_weekly_stats(&PlayerWeeklyStats {
        player_id: PlayerId::new(12345),
        season: Season::new(2023),
        week: Week::new(1),
        projected_points: None,
        actual_points: Some(22.0),
        created_at: 0,
        updated_at: 0,
    })
    .unwrap();

    let stats = db.get_weekly_stats(PlayerId::new(12345), Season::new(2023), Week::new(1)).unwrap().unwrap();
    assert_eq!(stats.projected_points, Some(15.0));
    assert_eq!(stats.actual_points, Some(22.0));
}

#[test]
fn test_clear_all_data() {
    let mut db = create_test_db_with_player();
    let stats = PlayerWeeklyStats {
        player_id: PlayerId::new(12345),
        season: Season::new(2023),
        week: Week::new(1),
        projected_points: Some(15.0),
        actual_points: Some(18.0),
        created_at: 0,
        updated_at: 0,
    };
    db.upsert_weekly_stats(&stats, false).unwrap();

    let retrieved_stats = db.get_weekly_stats(PlayerId::new(12345), Season::new(2023), Week::new(1)).unwrap();
    assert!(retrieved_stats.is_some());

    db.clear_all_data().unwrap();

    let retrieved_stats_after = db.get_weekly_stats(PlayerId::new(12345), Season::new(2023), Week::new(1)).unwrap();
    assert!(retrieved_stats_after.is_none());
}
