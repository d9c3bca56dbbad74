//! Gateway callback authentication.
//!
//! The callback route sits outside the actor identity middleware; instead the gateway proves
//! itself with the shared secret configured as `PAYMENT_CALLBACK_TOKEN`.

use salvo::prelude::*;
use tracing::warn;

pub(crate) const CALLBACK_TOKEN_HEADER: &str = "x-callback-token";

/// Rejects callbacks that do not carry the configured token.
#[derive(Debug, Clone)]
pub(crate) struct CallbackTokenGuard {
    token: String,
}

impl CallbackTokenGuard {
    pub(crate) fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    fn accepts(&self, presented: Option<&str>) -> bool {
        presented
            .is_some_and(|presented| tokens_match(presented.as_bytes(), self.token.as_bytes()))
    }
}

#[salvo::handler]
impl CallbackTokenGuard {
    async fn handle(
        &self,
        req: &mut Request,
        depot: &mut Depot,
        res: &mut Response,
        ctrl: &mut FlowCtrl,
    ) {
        let presented = req
            .headers()
            .get(CALLBACK_TOKEN_HEADER)
            .and_then(|value| value.to_str().ok());

        if !self.accepts(presented) {
            warn!(
                token_present = presented.is_some(),
                "rejected payment callback without a valid token"
            );

            res.render(StatusError::unauthorized().brief("Missing or invalid callback token"));
            ctrl.skip_rest();

            return;
        }

        ctrl.call_next(req, depot, res).await;
    }
}

/// Compares every byte so the time taken does not depend on where the first mismatch is.
fn tokens_match(presented: &[u8], expected: &[u8]) -> bool {
    presented.len() == expected.len()
        && presented
            .iter()
            .zip(expected)
            .fold(0_u8, |diff, (a, b)| diff | (a ^ b))
            == 0
}
