use super::*;
use crate::registry::RegistryError;
use crate::reservations::EngineError;
use chrono::Duration;

#[test]
fn test_create_confirms_with_smallest_fitting_table() {
    let (registry, engine) = create_test_engine();
    add_table(&registry, 1, 8);
    let small = add_table(&registry, 2, 4);
    add_table(&registry, 3, 2);

    let now = fixed_now();
    let reservation = engine
        .create(create_request(3, now + Duration::hours(2)), now)
        .unwrap();

    assert_eq!(reservation.status, ReservationStatus::Confirmed);
    assert_eq!(reservation.table_id, Some(small));
    assert!(reservation.qr_token.is_some());

    let table = registry.get(small).unwrap();
    assert_eq!(table.status, TableStatus::Reserved);
    assert_eq!(table.current_reservation_id, Some(reservation.id));
    assert!(table.binding_consistent());
}

#[test]
fn test_create_stays_pending_without_table() {
    let (registry, engine) = create_test_engine();
    add_table(&registry, 1, 2);

    let now = fixed_now();
    let reservation = engine
        .create(create_request(6, now + Duration::hours(2)), now)
        .unwrap();

    assert_eq!(reservation.status, ReservationStatus::Pending);
    assert_eq!(reservation.table_id, None);
    // The token is minted regardless so the QR can go out with the
    // confirmation email
    assert!(reservation.qr_token.is_some());
}

#[test]
fn test_create_group_reservation_mints_member_tokens() {
    let (registry, engine) = create_test_engine();
    add_table(&registry, 1, 6);

    let now = fixed_now();
    let mut request = create_request(3, now + Duration::hours(2));
    request.group_emails = Some(vec!["anna@example.com".into(), "ben@example.com".into()]);

    let reservation = engine.create(request, now).unwrap();

    assert!(reservation.is_group);
    assert_eq!(reservation.group_members.len(), 2);
    assert_eq!(reservation.group_members[0].guest_id, 1);
    assert_eq!(reservation.group_members[1].guest_id, 2);
    assert!(!reservation.group_members[0].checked_in);
    assert_ne!(
        reservation.group_members[0].qr_token,
        reservation.group_members[1].qr_token
    );
}

#[test]
fn test_create_rejects_bad_email_and_party_size() {
    let (registry, engine) = create_test_engine();
    add_table(&registry, 1, 6);
    let now = fixed_now();

    let mut request = create_request(2, now + Duration::hours(2));
    request.group_emails = Some(vec!["not-an-email".into()]);
    assert!(matches!(
        engine.create(request, now),
        Err(EngineError::InvalidEmail(_))
    ));

    assert!(matches!(
        engine.create(create_request(0, now + Duration::hours(2)), now),
        Err(EngineError::InvalidPartySize(0))
    ));
}

#[test]
fn test_check_in_occupies_table() {
    let (registry, engine) = create_test_engine();
    let table_id = add_table(&registry, 1, 4);
    let now = fixed_now();

    let reservation = engine
        .create(create_request(2, now + Duration::hours(2)), now)
        .unwrap();
    let checked_in = engine.check_in(reservation.id, now).unwrap();

    assert_eq!(checked_in.status, ReservationStatus::CheckedIn);
    assert_eq!(checked_in.checked_in_at, Some(now));
    assert_eq!(registry.get(table_id).unwrap().status, TableStatus::Occupied);
}

#[test]
fn test_check_in_requires_table() {
    let (_registry, engine) = create_test_engine();
    let now = fixed_now();

    // No tables registered at all: reservation stays PENDING, check-in
    // must name the missing table rather than panic downstream
    let reservation = engine
        .create(create_request(2, now + Duration::hours(2)), now)
        .unwrap();
    assert!(matches!(
        engine.check_in(reservation.id, now),
        Err(EngineError::MissingTable(_))
    ));
}

#[test]
fn test_check_in_rejected_from_terminal_states() {
    let (registry, engine) = create_test_engine();
    add_table(&registry, 1, 4);
    let now = fixed_now();

    let reservation = engine
        .create(create_request(2, now + Duration::hours(2)), now)
        .unwrap();
    engine.cancel(reservation.id, now).unwrap();

    match engine.check_in(reservation.id, now) {
        Err(EngineError::InvalidState { actual, .. }) => {
            assert_eq!(actual, ReservationStatus::Cancelled)
        }
        other => panic!("expected InvalidState, got {:?}", other.map(|r| r.status)),
    }
}

#[test]
fn test_complete_sends_table_to_cleaning() {
    let (registry, engine) = create_test_engine();
    let table_id = add_table(&registry, 1, 4);
    let now = fixed_now();

    let reservation = engine
        .create(create_request(2, now + Duration::hours(2)), now)
        .unwrap();
    engine.check_in(reservation.id, now).unwrap();
    let completed = engine.complete(reservation.id).unwrap();

    assert_eq!(completed.status, ReservationStatus::Completed);
    let table = registry.get(table_id).unwrap();
    assert_eq!(table.status, TableStatus::Cleaning);
    assert_eq!(table.current_reservation_id, None);
}

#[test]
fn test_complete_only_from_seated_states() {
    let (registry, engine) = create_test_engine();
    add_table(&registry, 1, 4);
    let now = fixed_now();

    let reservation = engine
        .create(create_request(2, now + Duration::hours(2)), now)
        .unwrap();
    assert!(matches!(
        engine.complete(reservation.id),
        Err(EngineError::InvalidState { .. })
    ));
}

#[test]
fn test_complete_allowed_from_timeout_warning() {
    let (registry, engine) = create_test_engine();
    add_table(&registry, 1, 4);
    let now = fixed_now();

    let reservation = engine
        .create(create_request(2, now + Duration::hours(2)), now)
        .unwrap();
    engine.check_in(reservation.id, now).unwrap();
    engine.mark_timeout_warning(reservation.id).unwrap();

    let completed = engine.complete(reservation.id).unwrap();
    assert_eq!(completed.status, ReservationStatus::Completed);
}

#[test]
fn test_walk_in_is_checked_in_immediately() {
    let (registry, engine) = create_test_engine();
    let table_id = add_table(&registry, 1, 4);
    let now = fixed_now();

    let walk_in = engine.create_walk_in(table_id, 3, now).unwrap();

    assert_eq!(walk_in.status, ReservationStatus::CheckedIn);
    assert_eq!(walk_in.customer_id, shared::models::WALK_IN_CUSTOMER_ID);
    assert_eq!(walk_in.reservation_time, now);
    assert_eq!(walk_in.qr_token, None);
    assert_eq!(registry.get(table_id).unwrap().status, TableStatus::Occupied);
}

#[test]
fn test_walk_in_rejected_on_held_table() {
    let (registry, engine) = create_test_engine();
    let table_id = add_table(&registry, 1, 4);
    let now = fixed_now();

    engine
        .create(create_request(2, now + Duration::hours(2)), now)
        .unwrap();

    assert!(matches!(
        engine.create_walk_in(table_id, 2, now),
        Err(EngineError::Registry(RegistryError::Conflict { .. }))
    ));
}

#[test]
fn test_assign_table_promotes_pending() {
    let (registry, engine) = create_test_engine();
    let now = fixed_now();

    let reservation = engine
        .create(create_request(4, now + Duration::hours(2)), now)
        .unwrap();
    assert_eq!(reservation.status, ReservationStatus::Pending);

    // Staff adds a table afterwards and assigns it manually
    let table_id = add_table(&registry, 7, 6);
    let assigned = engine.assign_table(reservation.id, table_id).unwrap();

    assert_eq!(assigned.status, ReservationStatus::Confirmed);
    assert_eq!(assigned.table_id, Some(table_id));
    assert_eq!(registry.get(table_id).unwrap().status, TableStatus::Reserved);
}

#[test]
fn test_assign_table_conflict_names_holder() {
    let (registry, engine) = create_test_engine();
    let table_id = add_table(&registry, 1, 4);
    let now = fixed_now();

    let first = engine
        .create(create_request(2, now + Duration::hours(2)), now)
        .unwrap();
    let second = engine
        .create(create_request(2, now + Duration::hours(3)), now)
        .unwrap();
    assert_eq!(second.status, ReservationStatus::Pending);

    match engine.assign_table(second.id, table_id) {
        Err(EngineError::Registry(RegistryError::Conflict { held_by, .. })) => {
            assert_eq!(held_by, first.id)
        }
        other => panic!("expected conflict, got {:?}", other.map(|r| r.status)),
    }
}

#[test]
fn test_group_member_check_in() {
    let (registry, engine) = create_test_engine();
    let table_id = add_table(&registry, 1, 6);
    let now = fixed_now();

    let mut request = create_request(3, now + Duration::hours(1));
    request.group_emails = Some(vec!["anna@example.com".into(), "ben@example.com".into()]);
    let reservation = engine.create(request, now).unwrap();

    // First guest scan checks in the whole reservation
    let after_first = engine.check_in_guest(reservation.id, 1, now).unwrap();
    assert_eq!(after_first.status, ReservationStatus::CheckedIn);
    assert!(after_first.group_members[0].checked_in);
    assert!(!after_first.group_members[1].checked_in);
    assert_eq!(registry.get(table_id).unwrap().status, TableStatus::Occupied);

    // Second scan only flags the member
    let after_second = engine.check_in_guest(reservation.id, 2, now).unwrap();
    assert!(after_second.group_members[1].checked_in);
    assert_eq!(after_second.status, ReservationStatus::CheckedIn);

    // Unknown guest id is a NotFound, not a panic
    assert!(matches!(
        engine.check_in_guest(reservation.id, 9, now),
        Err(EngineError::GuestNotFound { .. })
    ));
}

#[test]
fn test_delete_releases_table() {
    let (registry, engine) = create_test_engine();
    let table_id = add_table(&registry, 1, 4);
    let now = fixed_now();

    let reservation = engine
        .create(create_request(2, now + Duration::hours(2)), now)
        .unwrap();
    engine.delete(reservation.id).unwrap();

    assert!(matches!(
        engine.get(reservation.id),
        Err(EngineError::NotFound(_))
    ));
    assert_eq!(registry.get(table_id).unwrap().status, TableStatus::Available);
}

#[test]
fn test_query_surface() {
    let (registry, engine) = create_test_engine();
    add_table(&registry, 1, 4);
    add_table(&registry, 2, 4);
    let now = fixed_now();

    let first = engine
        .create(create_request(2, now + Duration::hours(2)), now)
        .unwrap();
    let mut other = create_request(2, now + Duration::hours(2));
    other.customer_id = 20;
    other.restaurant_id = 2;
    let second = engine.create(other, now).unwrap();

    assert_eq!(engine.list().len(), 2);
    assert_eq!(engine.list_by_restaurant(1).len(), 1);
    assert_eq!(engine.list_by_customer(20)[0].id, second.id);
    assert_eq!(
        engine.list_by_status(ReservationStatus::Confirmed).len(),
        1
    );
    assert_eq!(
        engine.list_by_status(ReservationStatus::Pending)[0].id,
        second.id
    );

    engine.check_in(first.id, now).unwrap();
    let active = engine.list_active();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, first.id);
}
