//! Poll storage tests against a real `PostgreSQL`.
//!
//! These need a reachable server (see `TEST_DB_*` in `test_utils`):
//!
//! ```bash
//! docker run -d -p 5433:5432 -e POSTGRES_USER=flashpoll_test \
//!     -e POSTGRES_PASSWORD=flashpoll_test postgres:16
//! cargo test -p flashpoll-db --test poll_concurrency -- --ignored
//! ```

#![allow(clippy::unwrap_used, clippy::expect_used)]

use chrono::{Duration, Utc};
use flashpoll_db::entities::{PollComment, PollComments, PollOption, PollOptions, ReactionKind, poll};
use flashpoll_db::repositories::PollRepository;
use flashpoll_db::test_utils::TestDatabase;
use futures::future::join_all;
use sea_orm::EntityTrait;

const POLL_ID: &str = "01hq3w2v0t9y5x6z7a8b9c0d1e";
const OPTION_A: &str = "01hq3w2v0t9y5x6z7a8b9c0d1f";
const OPTION_B: &str = "01hq3w2v0t9y5x6z7a8b9c0d1g";

fn new_poll(id: &str, expires_in: Duration) -> poll::Model {
    let now = Utc::now();
    poll::Model {
        id: id.to_string(),
        question: "Coffee or tea?".to_string(),
        options: PollOptions(vec![
            PollOption {
                id: OPTION_A.to_string(),
                text: "Coffee".to_string(),
                votes: 0,
            },
            PollOption {
                id: OPTION_B.to_string(),
                text: "Tea".to_string(),
                votes: 0,
            },
        ]),
        expires_at: (now + expires_in).into(),
        hide_results: false,
        is_private: false,
        created_at: now.into(),
        likes_count: 0,
        trending_count: 0,
        comments: PollComments::default(),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore = "requires PostgreSQL"]
async fn concurrent_votes_are_not_lost() {
    const VOTERS: usize = 64;

    let db = TestDatabase::create_unique().await.unwrap();
    let repo = PollRepository::new(db.gateway().await.unwrap());
    repo.insert(new_poll(POLL_ID, Duration::hours(1))).await.unwrap();

    let votes = (0..VOTERS).map(|_| {
        let repo = repo.clone();
        tokio::spawn(async move {
            repo.increment_option_votes(POLL_ID, 1, OPTION_B, Utc::now())
                .await
        })
    });
    for matched in join_all(votes).await {
        assert!(matched.unwrap().unwrap());
    }

    let poll = repo.find_live(POLL_ID, Utc::now()).await.unwrap().unwrap();
    assert_eq!(poll.options.0[0].votes, 0);
    assert_eq!(poll.options.0[1].votes, VOTERS as i64);

    db.drop_database().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore = "requires PostgreSQL"]
async fn concurrent_reactions_and_comments_all_land() {
    const CALLS: usize = 32;

    let db = TestDatabase::create_unique().await.unwrap();
    let repo = PollRepository::new(db.gateway().await.unwrap());
    repo.insert(new_poll(POLL_ID, Duration::hours(1))).await.unwrap();

    let likes = (0..CALLS).map(|_| {
        let repo = repo.clone();
        tokio::spawn(async move {
            repo.increment_reaction(POLL_ID, ReactionKind::Likes, Utc::now())
                .await
        })
    });
    let comments = (0..CALLS).map(|i| {
        let repo = repo.clone();
        tokio::spawn(async move {
            let comment = PollComment {
                text: format!("comment {i}"),
                created_at: Utc::now(),
            };
            repo.append_comment(POLL_ID, &comment).await
        })
    });

    for matched in join_all(likes).await {
        assert!(matched.unwrap().unwrap());
    }
    for matched in join_all(comments).await {
        assert!(matched.unwrap().unwrap());
    }

    let poll = repo.find_live(POLL_ID, Utc::now()).await.unwrap().unwrap();
    assert_eq!(poll.likes_count, CALLS as i64);
    assert_eq!(poll.trending_count, 0);
    assert_eq!(poll.comments.0.len(), CALLS);

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn expired_poll_rejects_votes_but_takes_comments() {
    let db = TestDatabase::create_unique().await.unwrap();
    let repo = PollRepository::new(db.gateway().await.unwrap());
    repo.insert(new_poll(POLL_ID, Duration::seconds(-5))).await.unwrap();

    let now = Utc::now();
    assert!(repo.find_live(POLL_ID, now).await.unwrap().is_none());
    assert!(!repo.increment_option_votes(POLL_ID, 0, OPTION_A, now).await.unwrap());
    assert!(!repo.increment_reaction(POLL_ID, ReactionKind::Trending, now).await.unwrap());

    let comment = PollComment {
        text: "too late?".to_string(),
        created_at: now,
    };
    assert!(repo.append_comment(POLL_ID, &comment).await.unwrap());

    let poll = poll::Entity::find_by_id(POLL_ID)
        .one(&db.conn)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(poll.comments.0.len(), 1);
    assert_eq!(poll.comments.0[0].text, "too late?");

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn vote_guard_rejects_mismatched_position() {
    let db = TestDatabase::create_unique().await.unwrap();
    let repo = PollRepository::new(db.gateway().await.unwrap());
    repo.insert(new_poll(POLL_ID, Duration::hours(1))).await.unwrap();

    let now = Utc::now();
    // OPTION_A lives at position 0, not 1.
    assert!(!repo.increment_option_votes(POLL_ID, 1, OPTION_A, now).await.unwrap());

    let poll = repo.find_live(POLL_ID, now).await.unwrap().unwrap();
    assert!(poll.options.0.iter().all(|o| o.votes == 0));

    db.drop_database().await.unwrap();
}
