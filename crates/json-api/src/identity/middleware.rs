//! Identity middleware.

use salvo::prelude::*;
use uuid::Uuid;

use crate::{
    extensions::*,
    identity::{ACTOR_ROLE_HEADER, ACTOR_UUID_HEADER, Identity, Role},
};

#[salvo::handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let Some(identity) = extract_identity(req) else {
        res.render(StatusError::unauthorized().brief("Missing or invalid actor headers"));
        ctrl.skip_rest();

        return;
    };

    depot.insert_identity(identity);

    ctrl.call_next(req, depot, res).await;
}

fn extract_identity(req: &Request) -> Option<Identity> {
    let uuid = req
        .headers()
        .get(ACTOR_UUID_HEADER)?
        .to_str()
        .ok()
        .and_then(|value| Uuid::parse_str(value.trim()).ok())?;

    let role = req
        .headers()
        .get(ACTOR_ROLE_HEADER)?
        .to_str()
        .ok()
        .and_then(|value| value.trim().parse::<Role>().ok())?;

    Some(Identity { uuid, role })
}
