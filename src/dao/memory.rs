//! In-memory backend adapter used by tests and the simulation binary.

use std::sync::Arc;

use dashmap::DashMap;
use futures::future::BoxFuture;
use rand::seq::SliceRandom;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    dao::{
        backend::{BackendError, BackendResult, CreateDuel, DuelStore, QuestionSource},
        realtime::RealtimeHub,
    },
    dto::{
        duel::{Duel, DuelId, DuelStatus, Question},
        invite::{ChallengerProfile, Invite, InviteId, InviteStatus, ProfileId, Topic},
        profile::PlayerProfile,
        realtime::{ChangeKind, DuelChange, DuelRow, InviteChange, InviteRow},
    },
};

/// `DashMap`-backed stand-in for the managed store.
///
/// When constructed with a hub, every mutation publishes the corresponding
/// row change, mirroring the change feed a managed database would emit.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    profiles: DashMap<ProfileId, PlayerProfile>,
    invites: DashMap<InviteId, InviteRow>,
    duels: DashMap<DuelId, Duel>,
    hub: Option<Arc<RealtimeHub>>,
}

impl MemoryStore {
    /// Build an empty store with no change feed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an empty store that publishes row changes to the given hub.
    pub fn with_hub(hub: Arc<RealtimeHub>) -> Self {
        Self {
            inner: Arc::new(Inner {
                hub: Some(hub),
                ..Inner::default()
            }),
        }
    }

    /// Seed a player profile.
    pub fn insert_profile(&self, profile: PlayerProfile) {
        self.inner.profiles.insert(profile.id, profile);
    }

    /// Create a pending invite row and publish its insert notification,
    /// standing in for the challenger's action happening outside this core.
    pub fn push_invite(
        &self,
        challenger_id: ProfileId,
        challenged_id: ProfileId,
        topic: Topic,
    ) -> InviteId {
        let row = InviteRow {
            id: Uuid::new_v4(),
            challenger_id,
            challenged_id,
            topic,
            status: InviteStatus::Pending,
            created_at: OffsetDateTime::now_utc(),
        };
        let id = row.id;
        self.inner.invites.insert(id, row.clone());
        self.publish_invite(ChangeKind::Insert, row);
        id
    }

    /// Current status of an invite row, if it exists.
    pub fn invite_status(&self, id: InviteId) -> Option<InviteStatus> {
        self.inner.invites.get(&id).map(|row| row.status)
    }

    fn publish_invite(&self, kind: ChangeKind, row: InviteRow) {
        if let Some(hub) = &self.inner.hub {
            hub.publish_invite(InviteChange { kind, row });
        }
    }

    fn publish_duel(&self, kind: ChangeKind, duel: &Duel) {
        if let Some(hub) = &self.inner.hub {
            hub.publish_duel(DuelChange {
                kind,
                row: DuelRow {
                    id: duel.id,
                    challenger_id: duel.challenger_id,
                    challenged_id: duel.challenged_id,
                    status: duel.status,
                },
            });
        }
    }
}

impl DuelStore for MemoryStore {
    fn resolve_profile(&self, auth_id: &str) -> BoxFuture<'static, BackendResult<PlayerProfile>> {
        let store = self.clone();
        let auth_id = auth_id.to_string();
        Box::pin(async move {
            store
                .inner
                .profiles
                .iter()
                .find(|entry| entry.auth_id == auth_id)
                .map(|entry| entry.clone())
                .ok_or_else(|| BackendError::not_found(format!("profile for `{auth_id}`")))
        })
    }

    fn fetch_invite(&self, id: InviteId) -> BoxFuture<'static, BackendResult<Invite>> {
        let store = self.clone();
        Box::pin(async move {
            let row = store
                .inner
                .invites
                .get(&id)
                .map(|entry| entry.clone())
                .ok_or_else(|| BackendError::not_found(format!("invite `{id}`")))?;
            let challenger = store
                .inner
                .profiles
                .get(&row.challenger_id)
                .map(|entry| ChallengerProfile::from(&*entry))
                .ok_or_else(|| {
                    BackendError::not_found(format!("profile `{}`", row.challenger_id))
                })?;
            Ok(Invite {
                id: row.id,
                challenger_id: row.challenger_id,
                challenged_id: row.challenged_id,
                topic: row.topic,
                status: row.status,
                created_at: row.created_at,
                challenger,
            })
        })
    }

    fn set_invite_status(
        &self,
        id: InviteId,
        status: InviteStatus,
    ) -> BoxFuture<'static, BackendResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            let row = {
                let mut entry = store
                    .inner
                    .invites
                    .get_mut(&id)
                    .ok_or_else(|| BackendError::not_found(format!("invite `{id}`")))?;
                entry.status = status;
                entry.clone()
            };
            store.publish_invite(ChangeKind::Update, row);
            Ok(())
        })
    }

    fn create_duel(&self, request: CreateDuel) -> BoxFuture<'static, BackendResult<DuelId>> {
        let store = self.clone();
        Box::pin(async move {
            let duel = Duel {
                id: Uuid::new_v4(),
                challenger_id: request.challenger_id,
                challenged_id: request.challenged_id,
                topic: request.topic,
                status: DuelStatus::Waiting,
                created_at: OffsetDateTime::now_utc(),
            };
            let id = duel.id;
            // the row must be queryable before subscribers hear about it
            store.inner.duels.insert(id, duel.clone());
            store.publish_duel(ChangeKind::Insert, &duel);
            Ok(id)
        })
    }

    fn find_duel_between(
        &self,
        a: ProfileId,
        b: ProfileId,
        status: DuelStatus,
    ) -> BoxFuture<'static, BackendResult<Option<Duel>>> {
        let store = self.clone();
        Box::pin(async move {
            let found = store
                .inner
                .duels
                .iter()
                .filter(|duel| {
                    duel.status == status
                        && ((duel.challenger_id == a && duel.challenged_id == b)
                            || (duel.challenger_id == b && duel.challenged_id == a))
                })
                .max_by_key(|duel| duel.created_at)
                .map(|duel| duel.clone());
            Ok(found)
        })
    }
}

/// Canned financial-literacy question bank.
///
/// Questions are shuffled per request and cycled when `count` exceeds the
/// bank size, so callers always receive the amount they asked for.
#[derive(Clone, Copy, Default)]
pub struct QuestionBank;

impl QuestionSource for QuestionBank {
    fn generate(
        &self,
        topic: Topic,
        count: usize,
    ) -> BoxFuture<'static, BackendResult<Vec<Question>>> {
        Box::pin(async move {
            let mut pool = bank(topic);
            pool.shuffle(&mut rand::rng());
            Ok(pool.into_iter().cycle().take(count).collect())
        })
    }
}

fn question(prompt: &str, choices: [&str; 3], answer_index: usize, explanation: &str) -> Question {
    Question {
        prompt: prompt.to_string(),
        choices: choices.into_iter().map(str::to_string).collect(),
        answer_index,
        explanation: Some(explanation.to_string()),
    }
}

fn bank(topic: Topic) -> Vec<Question> {
    match topic {
        Topic::Budgeting => vec![
            question(
                "In the 50/30/20 rule, what does the 20 stand for?",
                ["Wants", "Savings and debt repayment", "Housing"],
                1,
                "50% needs, 30% wants, 20% goes to savings and paying down debt.",
            ),
            question(
                "What is a zero-based budget?",
                [
                    "A budget with no savings",
                    "Every unit of income is assigned a job",
                    "Spending nothing for a month",
                ],
                1,
                "Income minus all allocations equals zero.",
            ),
            question(
                "Which expense is typically fixed?",
                ["Rent", "Groceries", "Entertainment"],
                0,
                "Rent stays the same each month; the others vary.",
            ),
        ],
        Topic::Saving => vec![
            question(
                "How many months of expenses should an emergency fund cover?",
                ["One week", "Three to six months", "Five years"],
                1,
                "Three to six months is the common guideline.",
            ),
            question(
                "What makes compound interest powerful?",
                [
                    "Interest earns interest over time",
                    "It is tax free",
                    "Banks double it yearly",
                ],
                0,
                "Earnings are reinvested and grow on themselves.",
            ),
            question(
                "Where should an emergency fund live?",
                ["Stocks", "An accessible savings account", "Real estate"],
                1,
                "It must stay liquid and stable.",
            ),
        ],
        Topic::Investing => vec![
            question(
                "What does diversification reduce?",
                ["Fees", "Unsystematic risk", "Taxes"],
                1,
                "Spreading across assets limits single-holding risk.",
            ),
            question(
                "What is an index fund?",
                [
                    "A fund tracking a market index",
                    "A single company's stock",
                    "A savings account",
                ],
                0,
                "It passively mirrors an index like the S&P 500.",
            ),
            question(
                "Historically, which asset class grows most over decades?",
                ["Cash", "Bonds", "Stocks"],
                2,
                "Equities have outpaced bonds and cash long term.",
            ),
        ],
        Topic::Credit => vec![
            question(
                "Which factor weighs most in a credit score?",
                ["Payment history", "Number of cards", "Age"],
                0,
                "Paying on time is the single largest component.",
            ),
            question(
                "What is credit utilization?",
                [
                    "Share of available credit in use",
                    "Number of loans held",
                    "Card annual fee",
                ],
                0,
                "Keeping it under roughly 30% helps your score.",
            ),
            question(
                "Paying only the minimum on a card mostly covers what?",
                ["Principal", "Interest", "Rewards"],
                1,
                "Minimum payments go largely to interest charges.",
            ),
        ],
        Topic::Debt => vec![
            question(
                "The avalanche method pays off which debt first?",
                ["Smallest balance", "Highest interest rate", "Oldest loan"],
                1,
                "Targeting the highest rate minimizes total interest.",
            ),
            question(
                "What is refinancing?",
                [
                    "Replacing a loan with one on better terms",
                    "Skipping payments",
                    "Selling debt to a friend",
                ],
                0,
                "A new loan pays off the old one, ideally at a lower rate.",
            ),
            question(
                "Which debt is usually the most expensive to carry?",
                ["Mortgage", "Credit card balance", "Student loan"],
                1,
                "Card APRs are typically far above other consumer rates.",
            ),
        ],
        Topic::Taxes => vec![
            question(
                "What is a marginal tax rate?",
                [
                    "Rate applied to your last unit of income",
                    "Average rate on all income",
                    "A flat fee",
                ],
                0,
                "Only income inside a bracket is taxed at that bracket's rate.",
            ),
            question(
                "What does a tax deduction reduce?",
                ["Taxable income", "Tax owed directly", "Gross salary"],
                0,
                "Deductions shrink the income the tax is computed on.",
            ),
            question(
                "What does a tax credit reduce?",
                ["Taxable income", "Tax owed directly", "Gross salary"],
                1,
                "Credits subtract from the tax bill itself.",
            ),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn generate_cycles_to_requested_count() {
        let bank = QuestionBank;
        let questions = bank.generate(Topic::Saving, 5).await.unwrap();
        assert_eq!(questions.len(), 5);
    }

    #[tokio::test]
    async fn find_duel_between_matches_either_order() {
        let store = MemoryStore::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let id = store
            .create_duel(CreateDuel {
                challenger_id: a,
                challenged_id: b,
                topic: Topic::Credit,
                questions: Vec::new(),
            })
            .await
            .unwrap();

        let found = store
            .find_duel_between(b, a, DuelStatus::Waiting)
            .await
            .unwrap();
        assert_eq!(found.map(|duel| duel.id), Some(id));

        let none = store
            .find_duel_between(b, a, DuelStatus::Active)
            .await
            .unwrap();
        assert!(none.is_none());
    }

    #[tokio::test]
    async fn created_duel_is_queryable_when_its_change_arrives() {
        let hub = Arc::new(RealtimeHub::new(16, 16));
        let store = MemoryStore::with_hub(hub.clone());
        let mut duels = hub.subscribe_duels();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        let id = store
            .create_duel(CreateDuel {
                challenger_id: a,
                challenged_id: b,
                topic: Topic::Saving,
                questions: Vec::new(),
            })
            .await
            .unwrap();

        let change = duels.recv().await.unwrap();
        assert_eq!(change.row.id, id);
        // a subscriber reacting to the change immediately must find the row
        let found = store
            .find_duel_between(a, b, DuelStatus::Waiting)
            .await
            .unwrap();
        assert_eq!(found.map(|duel| duel.id), Some(id));
    }

    #[tokio::test]
    async fn fetch_invite_joins_challenger_profile() {
        let store = MemoryStore::new();
        let challenger = PlayerProfile {
            id: Uuid::new_v4(),
            auth_id: "auth-a".into(),
            nickname: "ada".into(),
            level: 7,
            xp: 4200,
            avatar: None,
        };
        let challenged = Uuid::new_v4();
        store.insert_profile(challenger.clone());
        let id = store.push_invite(challenger.id, challenged, Topic::Budgeting);

        let invite = store.fetch_invite(id).await.unwrap();
        assert_eq!(invite.challenger.nickname, "ada");
        assert_eq!(invite.status, InviteStatus::Pending);
    }
}
