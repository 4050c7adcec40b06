//! Tests for the deck service.

use std::sync::Arc;

use mockall::predicate::eq;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::MockDeckRepository;
use crate::domain::service_test_support::{fixture_clock, fixture_timestamp, sample_deck};

#[fixture]
fn owner() -> UserId {
    UserId::random()
}

fn make_service(repo: MockDeckRepository) -> DeckService<MockDeckRepository> {
    DeckService::new(Arc::new(repo), fixture_clock())
}

#[rstest]
#[tokio::test]
async fn create_deck_forces_owner_and_timestamps(owner: UserId) {
    let expected_owner = owner.clone();
    let mut repo = MockDeckRepository::new();
    repo.expect_insert()
        .withf(move |deck| {
            deck.owner == expected_owner
                && deck.name.as_ref() == "Capitals"
                && deck.created_at == fixture_timestamp()
        })
        .times(1)
        .returning(|deck| Ok(sample_deck(&deck.owner, 1, deck.name.as_ref())));

    let deck = make_service(repo)
        .create_deck(CreateDeckRequest {
            owner: owner.clone(),
            name: Some("  Capitals ".to_owned()),
            description: None,
        })
        .await
        .expect("deck created");

    assert_eq!(deck.owner(), &owner);
}

#[rstest]
#[case(None)]
#[case(Some(""))]
#[case(Some("   "))]
#[tokio::test]
async fn create_deck_rejects_missing_or_blank_name(owner: UserId, #[case] name: Option<&str>) {
    let mut repo = MockDeckRepository::new();
    repo.expect_insert().times(0);

    let err = make_service(repo)
        .create_deck(CreateDeckRequest {
            owner,
            name: name.map(str::to_owned),
            description: None,
        })
        .await
        .expect_err("validation error");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    let details = err.details().expect("field details");
    assert!(details["fields"]["name"].is_array());
}

#[rstest]
#[tokio::test]
async fn create_deck_maps_connection_errors(owner: UserId) {
    let mut repo = MockDeckRepository::new();
    repo.expect_insert()
        .times(1)
        .returning(|_| Err(DeckRepositoryError::connection("pool exhausted")));

    let err = make_service(repo)
        .create_deck(CreateDeckRequest {
            owner,
            name: Some("Verbs".to_owned()),
            description: None,
        })
        .await
        .expect_err("service unavailable");

    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[tokio::test]
async fn get_deck_reports_foreign_decks_as_not_found(owner: UserId) {
    let mut repo = MockDeckRepository::new();
    repo.expect_find_for_owner()
        .with(eq(owner.clone()), eq(DeckId::new(9)))
        .times(1)
        .returning(|_, _| Ok(None));

    let err = make_service(repo)
        .get_deck(&owner, DeckId::new(9))
        .await
        .expect_err("not found");

    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn replace_requires_name(owner: UserId) {
    let mut repo = MockDeckRepository::new();
    repo.expect_update_for_owner().times(0);

    let err = make_service(repo)
        .update_deck(UpdateDeckRequest {
            owner,
            deck_id: DeckId::new(1),
            mode: UpdateMode::Replace,
            name: None,
            description: Some(Some("new".to_owned())),
        })
        .await
        .expect_err("name required");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn partial_update_passes_only_supplied_fields(owner: UserId) {
    let mut repo = MockDeckRepository::new();
    repo.expect_update_for_owner()
        .withf(|_, id, changes| {
            *id == DeckId::new(4)
                && changes.name.is_none()
                && changes.description == Some(None)
                && changes.updated_at == fixture_timestamp()
        })
        .times(1)
        .returning(|owner, id, _| Ok(Some(sample_deck(owner, id.get(), "Kept"))));

    let deck = make_service(repo)
        .update_deck(UpdateDeckRequest {
            owner,
            deck_id: DeckId::new(4),
            mode: UpdateMode::Partial,
            name: None,
            description: Some(None),
        })
        .await
        .expect("deck updated");

    assert_eq!(deck.name().as_ref(), "Kept");
}

#[rstest]
#[tokio::test]
async fn update_of_foreign_deck_is_not_found(owner: UserId) {
    let mut repo = MockDeckRepository::new();
    repo.expect_update_for_owner()
        .times(1)
        .returning(|_, _, _| Ok(None));

    let err = make_service(repo)
        .update_deck(UpdateDeckRequest {
            owner,
            deck_id: DeckId::new(2),
            mode: UpdateMode::Partial,
            name: Some("Renamed".to_owned()),
            description: None,
        })
        .await
        .expect_err("not found");

    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[case(true, None)]
#[case(false, Some(ErrorCode::NotFound))]
#[tokio::test]
async fn delete_deck_reports_missing_rows(
    owner: UserId,
    #[case] deleted: bool,
    #[case] expected: Option<ErrorCode>,
) {
    let mut repo = MockDeckRepository::new();
    repo.expect_delete_for_owner()
        .times(1)
        .returning(move |_, _| Ok(deleted));

    let result = make_service(repo).delete_deck(&owner, DeckId::new(3)).await;

    assert_eq!(result.err().map(|err| err.code()), expected);
}

#[rstest]
#[tokio::test]
async fn list_decks_maps_query_errors(owner: UserId) {
    let mut repo = MockDeckRepository::new();
    repo.expect_list_for_owner()
        .times(1)
        .returning(|_| Err(DeckRepositoryError::query("syntax error")));

    let err = make_service(repo)
        .list_decks(&owner)
        .await
        .expect_err("internal error");

    assert_eq!(err.code(), ErrorCode::InternalError);
}
