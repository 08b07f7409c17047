//! Caller resolution shared by handlers.
//!
//! The session only stores a user id; the role is looked up on every request
//! so a role change takes effect without logging out.

use crate::domain::{Actor, Error};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Resolve the signed-in caller, or fail with `401 Unauthorized`.
pub async fn current_actor(state: &HttpState, session: &SessionContext) -> Result<Actor, Error> {
    let user_id = session.require_user_id()?;
    let profile = state.profiles.fetch_profile(&user_id).await?;
    Ok(profile.actor())
}

/// Resolve the caller and require the admin role.
pub async fn require_admin(state: &HttpState, session: &SessionContext) -> Result<Actor, Error> {
    let actor = current_actor(state, session).await?;
    if actor.is_admin() {
        Ok(actor)
    } else {
        Err(Error::forbidden("administrator role required"))
    }
}
