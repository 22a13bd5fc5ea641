//! Prompt driver: shows the password prompt whenever a sign request awaits
//! one and feeds the answer back into the coordinator.

use crate::domain::prompt::{PasswordPrompt, PromptAnswer};
use crate::domain::state::SignPhase;
use crate::ports::inbound::SigningApi;
use crate::ports::outbound::PromptPresenter;
use crate::service::SignCoordinator;
use std::sync::Arc;
use tracing::{debug, warn};

/// Run until the coordinator's state channel closes.
pub async fn drive_prompt(coordinator: Arc<SignCoordinator>, presenter: Arc<dyn PromptPresenter>) {
    let mut states = coordinator.subscribe();

    loop {
        let state = states.borrow_and_update().clone();

        if state.phase == SignPhase::AwaitingPassword {
            let prompt = PasswordPrompt::from_state(&state, coordinator.text());
            match presenter.ask_password(&prompt).await {
                PromptAnswer::Password(password) => {
                    if let Err(e) = coordinator.set_password(password) {
                        debug!(error = %e, "Password discarded");
                        continue;
                    }
                    match coordinator.confirm().await {
                        Ok(outcome) => debug!(?outcome, "Password confirmed"),
                        Err(e) => warn!(error = %e, "Confirm refused"),
                    }
                }
                PromptAnswer::Cancel => {
                    if let Err(e) = coordinator.cancel() {
                        debug!(error = %e, "Cancel refused");
                    }
                }
            }
            continue;
        }

        if states.changed().await.is_err() {
            break;
        }
    }

    debug!("Prompt driver stopped");
}
