//! Account use cases

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};
use trellis_domain::error::{Error, Result};
use trellis_infrastructure::crypto::{JwtService, PasswordService};
use trellis_infrastructure::di::{Declaration, Inject, Injectable, Named};
use trellis_infrastructure::session::SessionService;

use super::access::AccessControl;
use super::constants::{DEFAULT_PAGE_SIZE, DEFAULT_ROLE};
use super::dto::{LoginDto, LoginView, RegisterDto, UpdateUserDto, UserQueryDto, UserView};
use super::store::{NewUser, UserFilter, UserStore};

#[derive(Debug, Default)]
pub struct UserService {
    store: Inject<UserStore>,
    passwords: Inject<PasswordService>,
    tokens: Inject<JwtService>,
    sessions: Inject<SessionService>,
    access: Inject<AccessControl>,
}

impl Named for UserService {
    const NAME: &'static str = "UserService";
}

impl Injectable for UserService {
    fn instantiate() -> Self {
        Self::default()
    }

    fn declare(declaration: Declaration<Self>) -> Declaration<Self> {
        declaration
            .inject::<UserStore>(|this| &this.store)
            .inject::<PasswordService>(|this| &this.passwords)
            .inject::<JwtService>(|this| &this.tokens)
            .inject::<SessionService>(|this| &this.sessions)
            .inject_deferred::<AccessControl>(|this| &this.access)
            .circular_inject(4, || AccessControl::NAME)
    }
}

impl UserService {
    fn store(&self) -> Result<&Arc<UserStore>> {
        self.store.get()
    }

    fn sessions(&self) -> Result<&Arc<SessionService>> {
        self.sessions.get()
    }

    /// Whether account `user_id` exists
    pub fn exists(&self, user_id: u64) -> Result<bool> {
        Ok(self.store()?.find(user_id)?.is_some())
    }

    /// Create an account holding the default role
    pub async fn register(&self, dto: RegisterDto) -> Result<UserView> {
        if dto.password != dto.confirmed_password {
            return Err(Error::service(
                "`password` is not matched with `confirmedPassword`.",
            ));
        }
        let store = self.store()?;
        if store.find_by_username(&dto.username)?.is_some() {
            return Err(Error::service("`username` has exists."));
        }

        let passwords = self.passwords.get()?;
        let salt = passwords.generate_salt();
        let password_hash = passwords.hash_password(&dto.password, &salt);
        let record = store.insert(NewUser {
            username: dto.username,
            nickname: dto.nickname,
            age: dto.age,
            salt,
            password_hash,
        })?;
        self.access.get()?.assign_role(record.id, DEFAULT_ROLE)?;

        info!(user_id = record.id, username = %record.username, "user registered");
        Ok(UserView::from(&record))
    }

    /// Verify credentials, issue a token and open the session
    pub async fn login(&self, dto: LoginDto) -> Result<LoginView> {
        let store = self.store()?;
        let user = store
            .find_by_username(&dto.username)?
            .ok_or_else(|| Error::service("`username` not found."))?;
        if !user.active {
            return Err(Error::service("Account is deactivated."));
        }
        if !self
            .passwords
            .get()?
            .verify_password(&dto.password, &user.salt, &user.password_hash)
        {
            return Err(Error::service("Password is not matched."));
        }

        let user_id = user.id.to_string();
        let token = self.tokens.get()?.sign(&user_id)?;
        self.sessions()?.open(&user_id, &token).await?;
        store.update(user.id, |record| record.last_login_at = Some(Utc::now()))?;

        info!(user_id = user.id, "user logged in");
        Ok(LoginView {
            user_id: user.id,
            token,
        })
    }

    /// Close the session of `user_id`; `true` if one was open
    pub async fn logout(&self, user_id: &str) -> Result<bool> {
        let closed = self.sessions()?.close(user_id).await?;
        debug!(user_id, closed, "user logged out");
        Ok(closed)
    }

    pub async fn list(&self, query: UserQueryDto) -> Result<Vec<UserView>> {
        let limit = query
            .page_size
            .and_then(|size| usize::try_from(size).ok())
            .unwrap_or(DEFAULT_PAGE_SIZE);
        let page = query
            .page
            .and_then(|page| usize::try_from(page).ok())
            .unwrap_or(1);
        let filter = UserFilter {
            username: query.username,
            age: query.age,
            active: query.active,
            offset: page.saturating_sub(1).saturating_mul(limit),
            limit,
        };
        Ok(self
            .store()?
            .search(&filter)?
            .iter()
            .map(UserView::from)
            .collect())
    }

    pub async fn find(&self, user_id: u64) -> Result<UserView> {
        self.store()?
            .find(user_id)?
            .map(|record| UserView::from(&record))
            .ok_or_else(|| Error::not_found(format!("user {user_id}")))
    }

    pub async fn update(&self, user_id: u64, changes: UpdateUserDto) -> Result<UserView> {
        let updated = self
            .store()?
            .update(user_id, |record| {
                if let Some(nickname) = changes.nickname {
                    record.nickname = Some(nickname);
                }
                if let Some(age) = changes.age {
                    record.age = Some(age);
                }
                if let Some(active) = changes.active {
                    record.active = active;
                }
            })?
            .ok_or_else(|| Error::not_found(format!("user {user_id}")))?;
        if !updated.active {
            self.sessions()?.close(&user_id.to_string()).await?;
        }
        Ok(UserView::from(&updated))
    }

    /// Delete an account with its session and roles
    pub async fn remove(&self, user_id: u64) -> Result<UserView> {
        let removed = self
            .store()?
            .remove(user_id)?
            .ok_or_else(|| Error::not_found(format!("user {user_id}")))?;
        self.sessions()?.close(&user_id.to_string()).await?;
        self.access.get()?.forget(user_id)?;
        info!(user_id, "user removed");
        Ok(UserView::from(&removed))
    }

    /// Delete deactivated accounts; returns how many were removed
    pub async fn purge_inactive(&self) -> Result<usize> {
        let removed = self.store()?.purge_inactive()?;
        let access = self.access.get()?;
        for user_id in &removed {
            access.forget(*user_id)?;
        }
        Ok(removed.len())
    }
}
