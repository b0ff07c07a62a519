//! Redemption semantics under contention: idempotency, usage-limit
//! enforcement with concurrent joiners, and the bounded race retry.

mod common;

use chrono::{Duration, Utc};
use uuid::Uuid;

use common::{harness, harness_with_flaky_redeem, is_invalid_or_expired, TestHarness};
use talk_core::value_objects::ChatRole;
use talk_service::dto::{CreateInviteLinkRequest, InviteLinkResponse};
use talk_service::{InviteService, ServiceError};

async fn issue_link(h: &TestHarness, usage_limit: Option<i32>) -> (InviteLinkResponse, Uuid) {
    let owner = h.seed_user("owner");
    let chat = h.seed_chat(&owner);
    let link = InviteService::new(&h.ctx)
        .create_invite(
            owner.id,
            CreateInviteLinkRequest {
                chat_id: chat.id,
                expires_at: None,
                usage_limit,
            },
        )
        .await
        .expect("create");
    (link, chat.id)
}

#[tokio::test]
async fn redeeming_twice_is_idempotent() {
    let h = harness();
    let (link, chat_id) = issue_link(&h, None).await;
    let service = InviteService::new(&h.ctx);
    let joiner = h.seed_user("joiner");

    let first = service
        .redeem_invite(&link.invite_code, joiner.id)
        .await
        .expect("first redemption");
    assert_eq!(first.role, ChatRole::Member);

    let second = service
        .redeem_invite(&link.invite_code, joiner.id)
        .await
        .expect("second redemption");
    assert_eq!(second.id, first.id, "same membership handed back");

    let link_id = Uuid::parse_str(&link.id).expect("uuid");
    assert_eq!(h.store.invite(link_id).expect("stored").used_count, 1);
    assert_eq!(h.store.member_count(chat_id), 2, "owner plus one joiner");

    // Only the first redemption announces a membership change.
    assert_eq!(h.events.count_of("MEMBERSHIP_CHANGED"), 1);
}

#[tokio::test]
async fn expired_links_never_redeem_even_with_unused_quota() {
    let h = harness();
    let owner = h.seed_user("owner");
    let chat = h.seed_chat(&owner);
    let service = InviteService::new(&h.ctx);

    let link = service
        .create_invite(
            owner.id,
            CreateInviteLinkRequest {
                chat_id: chat.id,
                expires_at: Some(Utc::now() - Duration::hours(1)),
                usage_limit: Some(100),
            },
        )
        .await
        .expect("create");

    let joiner = h.seed_user("joiner");
    let err = service
        .redeem_invite(&link.invite_code, joiner.id)
        .await
        .expect_err("expired link");
    assert!(is_invalid_or_expired(&err));

    // The failed attempt must leave no trace.
    let link_id = Uuid::parse_str(&link.id).expect("uuid");
    assert_eq!(h.store.invite(link_id).expect("stored").used_count, 0);
    assert!(h.store.member(chat.id, joiner.id).is_none());
}

#[tokio::test]
async fn limit_one_scenario_first_wins_second_rejected_first_stays_idempotent() {
    let h = harness();
    let (link, chat_id) = issue_link(&h, Some(1)).await;
    let service = InviteService::new(&h.ctx);
    let alice = h.seed_user("alice");
    let bob = h.seed_user("bob");

    service
        .redeem_invite(&link.invite_code, alice.id)
        .await
        .expect("alice joins");
    let link_id = Uuid::parse_str(&link.id).expect("uuid");
    assert_eq!(h.store.invite(link_id).expect("stored").used_count, 1);

    let err = service
        .redeem_invite(&link.invite_code, bob.id)
        .await
        .expect_err("link exhausted for bob");
    assert!(is_invalid_or_expired(&err));
    assert!(h.store.member(chat_id, bob.id).is_none());

    // Alice re-clicking still succeeds without moving the counter.
    service
        .redeem_invite(&link.invite_code, alice.id)
        .await
        .expect("alice idempotent");
    assert_eq!(h.store.invite(link_id).expect("stored").used_count, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_redemptions_never_exceed_the_usage_limit() {
    const LIMIT: i32 = 3;
    const ATTEMPTS: usize = 8;

    let h = harness();
    let (link, chat_id) = issue_link(&h, Some(LIMIT)).await;

    let joiners: Vec<_> = (0..ATTEMPTS).map(|i| h.seed_user(&format!("joiner{i}"))).collect();

    let mut handles = Vec::with_capacity(ATTEMPTS);
    for joiner in &joiners {
        let ctx = h.ctx.clone();
        let code = link.invite_code.clone();
        let user_id = joiner.id;
        handles.push(tokio::spawn(async move {
            InviteService::new(&ctx).redeem_invite(&code, user_id).await
        }));
    }

    let mut successes = 0;
    let mut rejections = 0;
    for handle in handles {
        match handle.await.expect("task") {
            Ok(_) => successes += 1,
            Err(err) => {
                assert!(is_invalid_or_expired(&err), "unexpected error: {err}");
                rejections += 1;
            }
        }
    }

    assert_eq!(successes, LIMIT as usize);
    assert_eq!(rejections, ATTEMPTS - LIMIT as usize);

    let link_id = Uuid::parse_str(&link.id).expect("uuid");
    assert_eq!(h.store.invite(link_id).expect("stored").used_count, LIMIT);

    // Owner plus exactly LIMIT admitted joiners.
    assert_eq!(h.store.member_count(chat_id), 1 + LIMIT as usize);
    let admitted = joiners
        .iter()
        .filter(|j| h.store.member(chat_id, j.id).is_some())
        .count();
    assert_eq!(admitted, LIMIT as usize);
}

#[tokio::test]
async fn transient_races_are_retried_transparently() {
    // Two faked races, three allowed retries: the caller never notices.
    let h = harness_with_flaky_redeem(2);
    let (link, chat_id) = issue_link(&h, None).await;
    let joiner = h.seed_user("joiner");

    let membership = InviteService::new(&h.ctx)
        .redeem_invite(&link.invite_code, joiner.id)
        .await
        .expect("redeems after internal retries");
    assert_eq!(membership.chat_id, chat_id.to_string());
}

#[tokio::test]
async fn exhausted_retries_surface_as_conflict_not_invalid() {
    // More faked races than the retry budget.
    let h = harness_with_flaky_redeem(10);
    let (link, chat_id) = issue_link(&h, None).await;
    let joiner = h.seed_user("joiner");

    let err = InviteService::new(&h.ctx)
        .redeem_invite(&link.invite_code, joiner.id)
        .await
        .expect_err("retry budget exhausted");
    assert!(matches!(err, ServiceError::Conflict(_)));
    assert_eq!(err.status_code(), 409);
    assert!(!is_invalid_or_expired(&err));

    // No partial admission happened.
    assert!(h.store.member(chat_id, joiner.id).is_none());
    let link_id = Uuid::parse_str(&link.id).expect("uuid");
    assert_eq!(h.store.invite(link_id).expect("stored").used_count, 0);
}

#[tokio::test]
async fn unknown_codes_are_not_found() {
    let h = harness();
    let joiner = h.seed_user("joiner");

    let err = InviteService::new(&h.ctx)
        .redeem_invite("zzzz9999", joiner.id)
        .await
        .expect_err("unknown code");
    assert!(common::is_not_found(&err));
}

#[tokio::test]
async fn membership_store_rejects_duplicates_independently() {
    // Defense in depth: even bypassing the engine, the store refuses a
    // second membership for the same (chat, user) pair.
    let h = harness();
    let owner = h.seed_user("owner");
    let chat = h.seed_chat(&owner);
    let user = h.seed_user("user");

    let member = talk_core::entities::ChatMember::new(chat.id, user.id, ChatRole::Member);
    h.ctx.member_repo().create(&member).await.expect("first insert");

    let duplicate = talk_core::entities::ChatMember::new(chat.id, user.id, ChatRole::Member);
    let err = h
        .ctx
        .member_repo()
        .create(&duplicate)
        .await
        .expect_err("duplicate membership");
    assert!(matches!(err, talk_core::DomainError::AlreadyMember));
}
