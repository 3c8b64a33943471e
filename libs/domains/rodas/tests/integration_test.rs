//! Integration tests against a real PostgreSQL container
//!
//! Run with: cargo test -p domain_rodas -- --ignored

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use domain_rodas::models::{Finalization, NewRoda};
use domain_rodas::*;
use test_utils::{TestDataBuilder, TestDatabase};
use uuid::Uuid;

fn new_roda(organizer_id: Uuid, municipality: &str, day: u32) -> NewRoda {
    let date = NaiveDate::from_ymd_opt(2025, 3, day).unwrap();
    NewRoda {
        organizer_id,
        theme: format!("Roda em {municipality}"),
        date,
        start_time: date.and_time(NaiveTime::from_hms_opt(14, 30, 0).unwrap()),
        municipality: municipality.to_string(),
        address: "Praça do Ferreira".to_string(),
        target_audience: "Comunidade".to_string(),
        expected_participants: Some(25),
        latitude: Some(-3.7319),
        longitude: Some(-38.5267),
    }
}

fn finalization(ids: Vec<i32>) -> Finalization {
    Finalization {
        attendance_photo_url: Some("https://files.example/freq.jpg".to_string()),
        circle_photo_url: None,
        summary: Some("Boa participação".to_string()),
        age_bracket_ids: ids,
    }
}

async fn setup(test_name: &str) -> (TestDatabase, PgRodaRepository, Uuid) {
    let db = TestDatabase::new().await;
    let builder = TestDataBuilder::from_test_name(test_name);
    let organizer_id = db
        .create_test_organizer(builder.organizer_id(), &builder.cpf())
        .await;
    let repo = PgRodaRepository::new(db.connection());
    (db, repo, organizer_id)
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_age_brackets_are_seeded() {
    let (_db, repo, _) = setup("test_age_brackets_are_seeded").await;

    let names: Vec<_> = repo
        .list_age_brackets()
        .await
        .unwrap()
        .into_iter()
        .map(|b| b.name)
        .collect();

    assert_eq!(names, ["0-12", "13-17", "18-29", "30-59", "60+"]);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_create_and_list_active_with_organizer() {
    let (_db, repo, organizer_id) = setup("test_create_and_list_active_with_organizer").await;

    let later = repo.create(new_roda(organizer_id, "Sobral", 20)).await.unwrap();
    let earlier = repo.create(new_roda(organizer_id, "Fortaleza", 10)).await.unwrap();

    assert_eq!(earlier.roda.status, RodaStatus::Active);
    assert_eq!(earlier.organizer.id, organizer_id);

    let active = repo.list_active().await.unwrap();
    let ids: Vec<_> = active.iter().map(|r| r.roda.id).collect();
    assert_eq!(ids, [earlier.roda.id, later.roda.id]);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_create_for_missing_organizer_is_not_found() {
    let (_db, repo, _) = setup("test_create_for_missing_organizer_is_not_found").await;
    let stranger = Uuid::now_v7();

    let err = repo.create(new_roda(stranger, "Fortaleza", 10)).await.unwrap_err();

    assert!(matches!(err, RodaError::OrganizerNotFound(id) if id == stranger));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_finalize_writes_record_and_links_in_one_transaction() {
    let (_db, repo, organizer_id) =
        setup("test_finalize_writes_record_and_links_in_one_transaction").await;
    let created = repo.create(new_roda(organizer_id, "Fortaleza", 10)).await.unwrap();

    let closed = repo
        .finalize(created.roda.id, organizer_id, finalization(vec![2, 4]))
        .await
        .unwrap();

    assert_eq!(closed.roda.status, RodaStatus::Finalized);
    assert_eq!(closed.roda.summary.as_deref(), Some("Boa participação"));
    let ids: Vec<_> = closed.age_brackets.iter().map(|b| b.id).collect();
    assert_eq!(ids, [2, 4]);

    let history = repo.list_finalized_with_brackets(organizer_id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert!(repo.list_active().await.unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_finalize_rolls_back_on_unknown_bracket() {
    let (_db, repo, organizer_id) = setup("test_finalize_rolls_back_on_unknown_bracket").await;
    let created = repo.create(new_roda(organizer_id, "Fortaleza", 10)).await.unwrap();

    let err = repo
        .finalize(created.roda.id, organizer_id, finalization(vec![1, 99]))
        .await
        .unwrap_err();
    assert!(matches!(err, RodaError::Persistence(_)));

    let roda = repo.find_by_id(created.roda.id).await.unwrap().unwrap();
    assert_eq!(roda.status, RodaStatus::Active);
    assert!(roda.summary.is_none());
    assert!(repo.list_finalized_with_brackets(organizer_id).await.unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_finalize_by_other_organizer_is_forbidden() {
    let (db, repo, owner) = setup("test_finalize_by_other_organizer_is_forbidden").await;
    let other = db.create_test_organizer(Uuid::now_v7(), "00000000191").await;
    let created = repo.create(new_roda(owner, "Fortaleza", 10)).await.unwrap();

    let err = repo
        .finalize(created.roda.id, other, finalization(vec![1]))
        .await
        .unwrap_err();

    assert!(matches!(err, RodaError::Forbidden(_)));
    let roda = repo.find_by_id(created.roda.id).await.unwrap().unwrap();
    assert!(roda.is_active());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_concurrent_closures_finalize_once() {
    let (_db, repo, organizer_id) = setup("test_concurrent_closures_finalize_once").await;
    let created = repo.create(new_roda(organizer_id, "Fortaleza", 10)).await.unwrap();
    let repo = Arc::new(repo);

    let (a, b) = tokio::join!(
        repo.finalize(created.roda.id, organizer_id, finalization(vec![1])),
        repo.finalize(created.roda.id, organizer_id, finalization(vec![5])),
    );

    let outcomes = [a, b];
    assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(
        outcomes
            .iter()
            .any(|r| matches!(r, Err(RodaError::AlreadyFinalized(_))))
    );

    let history = repo.list_finalized_with_brackets(organizer_id).await.unwrap();
    assert_eq!(history[0].age_brackets.len(), 1);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_update_coordinates_skips_finalized_rodas() {
    let (_db, repo, organizer_id) = setup("test_update_coordinates_skips_finalized_rodas").await;
    let active = repo.create(new_roda(organizer_id, "Fortaleza", 10)).await.unwrap();
    let closed = repo.create(new_roda(organizer_id, "Sobral", 11)).await.unwrap();
    repo.finalize(closed.roda.id, organizer_id, finalization(vec![3]))
        .await
        .unwrap();

    let point = GeoPoint::new(-3.70, -38.50);
    assert!(repo.update_coordinates(active.roda.id, point).await.unwrap());
    assert!(!repo.update_coordinates(closed.roda.id, point).await.unwrap());

    let moved = repo.find_by_id(active.roda.id).await.unwrap().unwrap();
    assert_eq!(moved.latitude, Some(-3.70));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_service_statistics_over_postgres() {
    let (_db, repo, organizer_id) = setup("test_service_statistics_over_postgres").await;
    let service = RodaService::new(repo, Arc::new(NoopGeocoder));

    for (day, municipio) in [(10, "Fortaleza"), (11, "Fortaleza"), (12, "Crato")] {
        let created = service
            .create_roda(
                organizer_id,
                CreateRoda {
                    theme: Some("Cidadania".into()),
                    date: Some(format!("2025-03-{day}")),
                    start_time: Some("09:00".into()),
                    municipality: Some(municipio.into()),
                    address: Some("Centro".into()),
                    target_audience: Some("Jovens".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        service
            .close_roda(
                organizer_id,
                &created.roda.id.to_string(),
                CloseRoda {
                    age_bracket_ids: vec![3, 3],
                    ..Default::default()
                },
            )
            .await
            .unwrap();
    }

    let stats = service.statistics(organizer_id).await.unwrap();
    assert_eq!(stats.total_rodas, 3);
    assert_eq!(stats.municipalities["Fortaleza"], 2);
    assert_eq!(stats.age_brackets["18-29"], 3);
    assert_eq!(stats.municipalities_count, 2);
}
