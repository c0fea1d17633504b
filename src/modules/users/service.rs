use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use social_core::{AppError, Page, paginate, with_deadline};
use social_db::{RepositoryError, UserRepository, WriteScope};
use social_models::{Role, UpdateUserDto, User, UserId};
use tracing::instrument;

use crate::middleware::auth::Identity;

/// Rows an actor with `role` may update. Clients are additionally limited to
/// themselves before the write is attempted.
fn update_scope(role: Role) -> WriteScope {
    match role {
        Role::Client | Role::Admin => WriteScope::OnlyRole(Role::Client),
        Role::Super => WriteScope::Any,
    }
}

/// Clients get no scope at all. The route gate already keeps them out, so
/// this only matters for callers that bypass the router.
fn delete_scope(role: Role) -> Option<WriteScope> {
    match role {
        Role::Client => None,
        Role::Admin => Some(WriteScope::OnlyRole(Role::Client)),
        Role::Super => Some(WriteScope::Any),
    }
}

fn parse_follow_ids(following: &str, follower: &str) -> Result<(UserId, UserId), AppError> {
    if following == follower {
        return Err(AppError::cannot_follow_self());
    }

    let following = UserId::parse(following)?;
    let follower = UserId::parse(follower)?;
    if following == follower {
        return Err(AppError::cannot_follow_self());
    }

    Ok((following, follower))
}

pub struct UserService {
    repo: Arc<dyn UserRepository>,
    budget: Duration,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>, budget: Duration) -> Self {
        Self { repo, budget }
    }

    /// Stores a new account: validates the email, hashes the password,
    /// assigns an id if missing, marks it active and stamps both timestamps.
    #[instrument(skip(self, user), fields(email = %user.email, role = %user.role))]
    pub async fn create(&self, mut user: User) -> Result<User, AppError> {
        with_deadline(self.budget, async move {
            if !user.has_valid_email() {
                return Err(AppError::invalid_email());
            }

            user.encrypt_password().map_err(|_| AppError::could_not_insert())?;

            if user.id.is_nil() {
                user.id = UserId::new();
            }
            let now = Utc::now();
            user.active = true;
            user.created_at = now;
            user.updated_at = now;

            self.repo.insert(&user).await.map_err(|e| {
                tracing::error!(error = %e, "failed to insert user");
                AppError::could_not_insert()
            })?;

            Ok(user)
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn find(&self, id: &str) -> Result<User, AppError> {
        let id = UserId::parse(id)?;
        with_deadline(self.budget, self.find_by_id(id)).await
    }

    async fn find_by_id(&self, id: UserId) -> Result<User, AppError> {
        self.repo
            .find_by_id(id)
            .await?
            .map(User::without_credentials)
            .ok_or_else(AppError::not_found)
    }

    /// Client accounts, optionally including deactivated ones.
    #[instrument(skip(self))]
    pub async fn list_clients(&self, include_inactive: bool) -> Result<Vec<User>, AppError> {
        let listing = self.repo.list(Role::Client, !include_inactive);
        with_deadline(self.budget, async { listing.await.map_err(AppError::from) }).await
    }

    #[instrument(skip(self))]
    pub async fn list_by_role(&self, role: Role) -> Result<Vec<User>, AppError> {
        let listing = self.repo.list(role, false);
        with_deadline(self.budget, async { listing.await.map_err(AppError::from) }).await
    }

    /// Applies a profile patch to `target` on behalf of `actor`.
    ///
    /// A client may only update themself. Admins may update clients and
    /// supers anyone; a target outside the actor's reach is `Not Found`.
    #[instrument(skip(self, patch), fields(actor = %actor.subject))]
    pub async fn update(
        &self,
        target: &str,
        actor: &Identity,
        patch: UpdateUserDto,
    ) -> Result<User, AppError> {
        if actor.role == Role::Client && !actor.is(target) {
            return Err(AppError::unauthorized());
        }
        let id = UserId::parse(target)?;

        with_deadline(self.budget, async {
            self.repo
                .update_profile(id, update_scope(actor.role), &patch, Utc::now())
                .await?
                .map(User::without_credentials)
                .ok_or_else(AppError::not_found)
        })
        .await
    }

    /// Removes `target`. Admins reach client accounts only, supers any.
    /// There is no self-check; a client actor is refused outright.
    #[instrument(skip(self))]
    pub async fn delete(&self, actor_role: Role, target: &str) -> Result<(), AppError> {
        let id = UserId::parse(target)?;
        let scope = delete_scope(actor_role).ok_or_else(AppError::unauthorized)?;

        with_deadline(self.budget, async {
            if self.repo.delete(id, scope).await? {
                Ok(())
            } else {
                Err(AppError::not_found())
            }
        })
        .await
    }

    /// Adds `following` to `follower`'s set and returns the follower.
    #[instrument(skip(self))]
    pub async fn follow_to(&self, following: &str, follower: &str) -> Result<User, AppError> {
        let (following, follower) = parse_follow_ids(following, follower)?;

        with_deadline(self.budget, async {
            self.repo.add_following(follower, following).await?;
            self.find_by_id(follower).await
        })
        .await
    }

    /// Removes `following` from `follower`'s set and returns the follower.
    #[instrument(skip(self))]
    pub async fn unfollow_to(&self, following: &str, follower: &str) -> Result<User, AppError> {
        let (following, follower) = parse_follow_ids(following, follower)?;

        with_deadline(self.budget, async {
            self.repo.remove_following(follower, following).await?;
            self.find_by_id(follower).await
        })
        .await
    }

    pub fn with_pagination(users: Vec<User>, page: i64, limit: i64) -> Result<Page<User>, AppError> {
        paginate(users, page, limit)
    }

    pub(crate) async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        self.repo.find_by_email(email).await
    }

    pub(crate) async fn find_by_uid(&self, uid: &str) -> Result<Option<User>, RepositoryError> {
        self.repo.find_by_uid(uid).await
    }
}
