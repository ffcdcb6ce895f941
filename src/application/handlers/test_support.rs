//! Shared fixtures for handler tests.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::adapters::memory::{InMemoryClubRepository, InMemorySettingsRepository};
use crate::application::SettingsStore;
use crate::config::SubscriptionConfig;
use crate::domain::club::{Club, ClubMember, ClubRole, ClubTier, ClubType};
use crate::domain::foundation::{DomainError, ErrorCode, EventEnvelope, UserId};
use crate::ports::EventPublisher;

pub struct MockEventPublisher {
    published_events: Mutex<Vec<EventEnvelope>>,
    fail_publish: bool,
}

impl MockEventPublisher {
    pub fn new() -> Self {
        Self {
            published_events: Mutex::new(Vec::new()),
            fail_publish: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            published_events: Mutex::new(Vec::new()),
            fail_publish: true,
        }
    }

    pub fn published_events(&self) -> Vec<EventEnvelope> {
        self.published_events.lock().unwrap().clone()
    }

    pub fn event_types(&self) -> Vec<String> {
        self.published_events()
            .into_iter()
            .map(|e| e.event_type)
            .collect()
    }
}

#[async_trait]
impl EventPublisher for MockEventPublisher {
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError> {
        if self.fail_publish {
            return Err(DomainError::new(
                ErrorCode::InternalError,
                "Simulated publish failure",
            ));
        }
        self.published_events.lock().unwrap().push(event);
        Ok(())
    }
}

pub fn user(id: &str) -> UserId {
    UserId::new(id).unwrap()
}

pub fn admin() -> UserId {
    user("admin-1")
}

/// A club owned by `owner` with the given tier.
pub async fn seeded_club(clubs: &InMemoryClubRepository, tier: ClubTier) -> Club {
    let mut club = Club::new(user("owner"), "Iron Wolves MC", ClubType::Public).unwrap();
    club.tier = tier;
    clubs.insert_club(club.clone()).await;
    clubs
        .insert_member(member(&club, "owner", ClubRole::President))
        .await;
    club
}

pub fn member(club: &Club, user_id: &str, role: ClubRole) -> ClubMember {
    let mut member = ClubMember::join(club.id, user(user_id));
    member.assign_role(role);
    member
}

pub fn settings() -> Arc<SettingsStore> {
    Arc::new(SettingsStore::new(
        Arc::new(InMemorySettingsRepository::new()),
        SubscriptionConfig::default(),
    ))
}
