//! `/roles` and `/permissions` endpoints

use std::sync::Arc;

use serde_json::json;
use trellis_domain::error::{Error, Result};
use trellis_domain::ports::PermissionProvider;
use trellis_domain::value_objects::{ArgSlots, ContextSource};
use trellis_infrastructure::di::{Declaration, Inject, Injectable, Named};

use crate::accounts::access::AccessControl;
use crate::accounts::constants::{PERMISSION_ROLE_READ, PERMISSION_ROLE_UPDATE};
use crate::accounts::dto::RoleAssignmentDto;

#[derive(Debug, Default)]
pub struct RoleController {
    access: Inject<AccessControl>,
}

impl Named for RoleController {
    const NAME: &'static str = "RoleController";
}

impl Injectable for RoleController {
    fn instantiate() -> Self {
        Self::default()
    }

    fn declare(declaration: Declaration<Self>) -> Declaration<Self> {
        declaration
            .controller("/roles")
            .inject::<AccessControl>(|this| &this.access)
            .method("permissions", |m| {
                m.get("/:role/permissions")
                    .permissions([PERMISSION_ROLE_READ])
                    .param::<String>(0, "role")
                    .handler(|this: Arc<Self>, mut args: ArgSlots| async move {
                        let role: String = args.take(0)?;
                        this.access.get()?.permissions_of_role(&role)
                    })
            })
            .method("grant", |m| {
                m.post("/:role/permissions")
                    .permissions([PERMISSION_ROLE_UPDATE])
                    .param::<String>(0, "role")
                    .body_field::<String>(1, "permission")
                    .status(201)
                    .handler(|this: Arc<Self>, mut args: ArgSlots| async move {
                        let role: String = args.take(0)?;
                        let permission: String = args.take(1)?;
                        let access = this.access.get()?;
                        access.grant_permission(&role, &permission)?;
                        access.permissions_of_role(&role)
                    })
            })
            .method("withdraw", |m| {
                m.delete("/:role/permissions/:permission")
                    .permissions([PERMISSION_ROLE_UPDATE])
                    .param::<String>(0, "role")
                    .param::<String>(1, "permission")
                    .handler(|this: Arc<Self>, mut args: ArgSlots| async move {
                        let role: String = args.take(0)?;
                        let permission: String = args.take(1)?;
                        let revoked = this.access.get()?.revoke_permission(&role, &permission)?;
                        Ok::<_, Error>(json!({ "revoked": revoked }))
                    })
            })
            .method("assign", |m| {
                m.put("/assign")
                    .permissions([PERMISSION_ROLE_UPDATE])
                    .body::<RoleAssignmentDto>(0)
                    .handler(|this: Arc<Self>, mut args: ArgSlots| async move {
                        let assignment: RoleAssignmentDto = args.take(0)?;
                        this.access
                            .get()?
                            .assign_role(assignment.user_id, &assignment.role)?;
                        Ok::<_, Error>(json!({ "assigned": true }))
                    })
            })
            .method("revoke", |m| {
                m.put("/revoke")
                    .permissions([PERMISSION_ROLE_UPDATE])
                    .body::<RoleAssignmentDto>(0)
                    .handler(|this: Arc<Self>, mut args: ArgSlots| async move {
                        let assignment: RoleAssignmentDto = args.take(0)?;
                        let revoked = this
                            .access
                            .get()?
                            .revoke_role(assignment.user_id, &assignment.role)?;
                        Ok::<_, Error>(json!({ "revoked": revoked }))
                    })
            })
    }
}

#[derive(Debug, Default)]
pub struct PermissionController {
    access: Inject<AccessControl>,
}

impl Named for PermissionController {
    const NAME: &'static str = "PermissionController";
}

impl PermissionController {
    async fn grants_of(&self, user_id: &str) -> Result<serde_json::Value> {
        let access = self.access.get()?;
        Ok(json!({
            "userId": user_id,
            "roles": access.roles_of(user_id).await?,
            "permissions": access.permissions_of(user_id).await?,
        }))
    }
}

impl Injectable for PermissionController {
    fn instantiate() -> Self {
        Self::default()
    }

    fn declare(declaration: Declaration<Self>) -> Declaration<Self> {
        declaration
            .controller("/permissions")
            .inject::<AccessControl>(|this| &this.access)
            .method("mine", |m| {
                m.get("/me")
                    .context(0, Some(ContextSource::UserId))
                    .handler(|this: Arc<Self>, mut args: ArgSlots| async move {
                        let user_id: Option<String> = args.take(0)?;
                        let user_id =
                            user_id.ok_or_else(|| Error::authorization("Please login first."))?;
                        this.grants_of(&user_id).await
                    })
            })
            .method("of_user", |m| {
                m.get("/users/:id")
                    .permissions([PERMISSION_ROLE_READ])
                    .param::<u64>(0, "id")
                    .handler(|this: Arc<Self>, mut args: ArgSlots| async move {
                        let user_id: u64 = args.take(0)?;
                        this.grants_of(&user_id.to_string()).await
                    })
            })
    }
}
