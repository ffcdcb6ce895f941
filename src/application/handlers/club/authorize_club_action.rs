//! AuthorizeClubActionHandler - Query answering "may this user do X here?".
//!
//! Loads the membership facts and delegates to [`ClubPolicy`]. A denial is
//! a normal result carrying its reason, not an error.

use std::sync::Arc;
use tracing::debug;

use crate::domain::club::{ClubAction, ClubError, ClubPolicy};
use crate::domain::foundation::{AuthorizationResult, ClubId, UserId};
use crate::ports::ClubRepository;

#[derive(Debug, Clone)]
pub struct AuthorizeClubActionQuery {
    pub club_id: ClubId,
    pub user_id: UserId,
    pub action: ClubAction,
}

pub struct AuthorizeClubActionHandler {
    clubs: Arc<dyn ClubRepository>,
}

impl AuthorizeClubActionHandler {
    pub fn new(clubs: Arc<dyn ClubRepository>) -> Self {
        Self { clubs }
    }

    pub async fn handle(
        &self,
        query: AuthorizeClubActionQuery,
    ) -> Result<AuthorizationResult, ClubError> {
        let club = self
            .clubs
            .find_by_id(&query.club_id)
            .await?
            .ok_or_else(|| ClubError::not_found(query.club_id))?;
        let role = self
            .clubs
            .find_member(&club.id, &query.user_id)
            .await?
            .map(|m| m.role);
        let blocked = self.clubs.is_blocked(&club.id, &query.user_id).await?;

        let result = ClubPolicy::new(&club, &query.user_id, role, blocked).authorize(query.action);

        debug!(
            club_id = %club.id,
            user_id = %query.user_id,
            action = %query.action,
            granted = result.is_granted(),
            reason = result.denial_reason.unwrap_or(""),
            "Club authorization decided"
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryClubRepository;
    use crate::application::handlers::test_support::{member, user};
    use crate::domain::club::{Club, ClubRole, ClubType};

    async fn setup(club_type: ClubType) -> (Arc<InMemoryClubRepository>, AuthorizeClubActionHandler, Club) {
        let clubs = Arc::new(InMemoryClubRepository::new());
        let club = Club::new(user("owner"), "Desert Vipers", club_type).unwrap();
        clubs.insert_club(club.clone()).await;
        let handler = AuthorizeClubActionHandler::new(clubs.clone());
        (clubs, handler, club)
    }

    fn query(club: &Club, user_id: &str, action: ClubAction) -> AuthorizeClubActionQuery {
        AuthorizeClubActionQuery {
            club_id: club.id,
            user_id: user(user_id),
            action,
        }
    }

    #[tokio::test]
    async fn secret_club_is_hidden_from_outsiders() {
        let (clubs, handler, club) = setup(ClubType::Secret).await;
        clubs.insert_member(member(&club, "rider", ClubRole::Member)).await;

        let outsider = handler.handle(query(&club, "stranger", ClubAction::View)).await.unwrap();
        let insider = handler.handle(query(&club, "rider", ClubAction::View)).await.unwrap();

        assert!(!outsider.is_granted());
        assert!(outsider.denial_reason.is_some());
        assert!(insider.is_granted());
    }

    #[tokio::test]
    async fn blocked_user_cannot_join() {
        let (clubs, handler, club) = setup(ClubType::Public).await;
        clubs.block(club.id, user("troll")).await;

        let result = handler.handle(query(&club, "troll", ClubAction::Join)).await.unwrap();
        assert!(!result.is_granted());
        assert_eq!(result.denial_reason, Some("User is blocked from this club"));
    }

    #[tokio::test]
    async fn moderator_manages_posts_but_not_members() {
        let (clubs, handler, club) = setup(ClubType::Public).await;
        clubs.insert_member(member(&club, "mod", ClubRole::Moderator)).await;

        let posts = handler
            .handle(query(&club, "mod", ClubAction::ManagePosts))
            .await
            .unwrap();
        let members = handler
            .handle(query(&club, "mod", ClubAction::ManageMembers))
            .await
            .unwrap();

        assert!(posts.is_granted());
        assert!(!members.is_granted());
    }

    #[tokio::test]
    async fn owner_without_membership_row_may_delete() {
        let (_, handler, club) = setup(ClubType::Private).await;
        let result = handler.handle(query(&club, "owner", ClubAction::Delete)).await.unwrap();
        assert!(result.is_granted());
    }

    #[tokio::test]
    async fn unknown_club_is_not_found() {
        let (_, handler, _) = setup(ClubType::Public).await;
        let err = handler
            .handle(AuthorizeClubActionQuery {
                club_id: ClubId::new(),
                user_id: user("owner"),
                action: ClubAction::View,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ClubError::NotFound(_)));
    }
}
