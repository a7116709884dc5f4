//! `/users` endpoints

use std::sync::Arc;

use serde_json::json;
use trellis_domain::error::{Error, Result};
use trellis_domain::value_objects::{ArgSlots, CachePolicy, ContextSource};
use trellis_infrastructure::di::{Declaration, Inject, Injectable, Named};

use crate::accounts::constants::{
    PERMISSION_USER_DELETE, PERMISSION_USER_READ, PERMISSION_USER_UPDATE, USER_CACHE_SCOPE,
    USER_CACHE_TTL_SECS,
};
use crate::accounts::dto::{LoginDto, RegisterDto, UpdateUserDto, UserQueryDto};
use crate::accounts::service::UserService;

fn profile_cache() -> CachePolicy {
    CachePolicy::new(USER_CACHE_SCOPE)
        .key(":userId")
        .ttl(USER_CACHE_TTL_SECS)
}

fn signed_in(user_id: Option<String>) -> Result<String> {
    user_id.ok_or_else(|| Error::authorization("Please login first."))
}

#[derive(Debug, Default)]
pub struct UserController {
    users: Inject<UserService>,
}

impl Named for UserController {
    const NAME: &'static str = "UserController";
}

impl Injectable for UserController {
    fn instantiate() -> Self {
        Self::default()
    }

    fn declare(declaration: Declaration<Self>) -> Declaration<Self> {
        declaration
            .controller("/users")
            .inject::<UserService>(|this| &this.users)
            .method("register", |m| {
                m.post("/register")
                    .non_auth()
                    .body::<RegisterDto>(0)
                    .status(201)
                    .handler(|this: Arc<Self>, mut args: ArgSlots| async move {
                        this.users.get()?.register(args.take(0)?).await
                    })
            })
            .method("login", |m| {
                m.put("/login")
                    .non_auth()
                    .body::<LoginDto>(0)
                    .handler(|this: Arc<Self>, mut args: ArgSlots| async move {
                        this.users.get()?.login(args.take(0)?).await
                    })
            })
            .method("logout", |m| {
                m.put("/logout")
                    .context(0, Some(ContextSource::UserId))
                    .handler(|this: Arc<Self>, mut args: ArgSlots| async move {
                        let user_id = signed_in(args.take(0)?)?;
                        let closed = this.users.get()?.logout(&user_id).await?;
                        Ok::<_, Error>(json!({ "loggedOut": closed }))
                    })
            })
            .method("me", |m| {
                m.get("/me")
                    .context(0, Some(ContextSource::UserId))
                    .handler(|this: Arc<Self>, mut args: ArgSlots| async move {
                        let user_id = signed_in(args.take(0)?)?;
                        let user_id = user_id
                            .parse::<u64>()
                            .map_err(|_| Error::authorization("Please login first."))?;
                        this.users.get()?.find(user_id).await
                    })
            })
            .method("list", |m| {
                m.get("/")
                    .permissions([PERMISSION_USER_READ])
                    .query::<UserQueryDto>(0)
                    .handler(|this: Arc<Self>, mut args: ArgSlots| async move {
                        this.users.get()?.list(args.take(0)?).await
                    })
            })
            .method("find", |m| {
                m.get("/:id")
                    .permissions([PERMISSION_USER_READ])
                    .param::<u64>(0, "id")
                    .signature("user_id: u64")
                    .cacheable(profile_cache())
                    .handler(|this: Arc<Self>, mut args: ArgSlots| async move {
                        this.users.get()?.find(args.take(0)?).await
                    })
            })
            .method("update", |m| {
                m.put("/:id")
                    .permissions([PERMISSION_USER_UPDATE])
                    .param::<u64>(0, "id")
                    .body::<UpdateUserDto>(1)
                    .signature("user_id: u64, changes: UpdateUserDto")
                    .cache_evict(profile_cache())
                    .handler(|this: Arc<Self>, mut args: ArgSlots| async move {
                        let user_id: u64 = args.take(0)?;
                        this.users.get()?.update(user_id, args.take(1)?).await
                    })
            })
            .method("remove", |m| {
                m.delete("/:id")
                    .permissions([PERMISSION_USER_DELETE])
                    .param::<u64>(0, "id")
                    .signature("user_id: u64")
                    .cache_evict(profile_cache())
                    .handler(|this: Arc<Self>, mut args: ArgSlots| async move {
                        this.users.get()?.remove(args.take(0)?).await
                    })
            })
    }
}
