//! Scripted simulation of the invite lifecycle against the in-memory backend.
//!
//! Two rivals challenge the same player in quick succession; the first
//! invite is left to expire, the promoted one is accepted, and every UI
//! event the engine emits is logged along the way.

use std::{sync::Arc, time::Duration};

use anyhow::Context;
use futures::StreamExt;
use tokio::time::sleep;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use duel_invites::{
    CoordinatorConfig, SessionCoordinator,
    dao::{
        memory::{MemoryStore, QuestionBank},
        realtime::RealtimeHub,
    },
    dto::{invite::Topic, profile::PlayerProfile},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let mut config = CoordinatorConfig::load();
    // keep the demo watchable; a full countdown is dead air on a terminal
    config.countdown_seconds = config.countdown_seconds.min(6);

    let hub = Arc::new(RealtimeHub::new(
        config.realtime_channel_capacity,
        config.realtime_channel_capacity,
    ));
    let store = MemoryStore::with_hub(hub.clone());

    let me = seed_profile(&store, "bo", 5, 2100);
    let ada = seed_profile(&store, "ada", 7, 4200);
    let cal = seed_profile(&store, "cal", 3, 800);

    let session = SessionCoordinator::start(
        &me.auth_id,
        Arc::new(store.clone()),
        Arc::new(QuestionBank),
        &hub,
        config,
    )
    .await
    .context("starting session")?;

    let mut ui = session.state().ui().stream();
    let printer = tokio::spawn(async move {
        while let Some(event) = ui.next().await {
            match event {
                Ok(event) => info!(?event, "ui event"),
                Err(err) => warn!(error = %err, "ui stream lagged"),
            }
        }
    });
    let mut remaining = session.state().remaining_watcher();
    let ticker = tokio::spawn(async move {
        while remaining.changed().await.is_ok() {
            let seconds = *remaining.borrow();
            if seconds > 0 {
                info!(seconds, "countdown");
            }
        }
    });

    info!("ada challenges bo on saving");
    store.push_invite(ada.id, me.id, Topic::Saving);
    sleep(Duration::from_secs(2)).await;

    info!("cal challenges bo on debt; the invite waits its turn");
    let second = store.push_invite(cal.id, me.id, Topic::Debt);

    let mut current = session.state().current_watcher();
    while current.borrow_and_update().id != Some(second) {
        current.changed().await.context("session state gone")?;
    }
    info!("ada's invite expired; cal's was promoted");

    let duel_id = session.accept().await.context("accepting invite")?;
    info!(%duel_id, "duel is on");

    // let the delayed navigation events land before tearing down
    sleep(Duration::from_secs(3)).await;
    session.shutdown().await;
    printer.abort();
    ticker.abort();

    Ok(())
}

fn seed_profile(store: &MemoryStore, nickname: &str, level: u32, xp: u64) -> PlayerProfile {
    let profile = PlayerProfile {
        id: Uuid::new_v4(),
        auth_id: format!("auth-{nickname}"),
        nickname: nickname.to_string(),
        level,
        xp,
        avatar: None,
    };
    store.insert_profile(profile.clone());
    profile
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
