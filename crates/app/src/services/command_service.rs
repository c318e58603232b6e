//! Command service: renaming devices and driving actuators.

use greenhub_domain::actuator::{Actuator, ActuatorMode};
use greenhub_domain::command::{ActuatorCommand, DeviceName, RenameCommand};
use greenhub_domain::error::{GreenhubError, TransportError, ValidationError};
use greenhub_domain::id::DeviceId;

use crate::ports::DeviceCommands;
use crate::state::DashboardState;

/// Result of a rename that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameOutcome {
    /// The server accepted the new name.
    Sent { name: String },
    /// The request failed; the local override is kept until the next rename.
    Failed { name: String, error: TransportError },
}

/// Validate a rename and apply it locally.
///
/// The submitted text is the pending draft, or the text currently shown in
/// the input when there is none. On success the draft is cleared and the
/// trimmed name becomes a local override, so it displays before the server
/// round-trip completes.
///
/// # Errors
///
/// Returns [`ValidationError::EmptyName`] when the trimmed text is empty. In
/// that case the state is left untouched and nothing must be sent.
pub fn prepare_rename(
    device: &DeviceId,
    state: &mut DashboardState,
) -> Result<RenameCommand, ValidationError> {
    let raw = state.rename_input(device);
    let name = DeviceName::parse(&raw)?;
    state.renames.confirm(device, name.as_str());
    Ok(RenameCommand {
        device: device.clone(),
        name,
    })
}

/// Application service for commands that mutate server-side device state.
pub struct CommandService<C> {
    commands: C,
}

impl<C: DeviceCommands> CommandService<C> {
    /// Create a new service backed by the given command port.
    pub fn new(commands: C) -> Self {
        Self { commands }
    }

    /// Ask the server to change an actuator's mode.
    ///
    /// Fire-and-forget: nothing is updated locally and failures are only
    /// logged. The next poll shows the authoritative mode.
    pub async fn toggle(&self, device: DeviceId, actuator: Actuator, mode: ActuatorMode) {
        let command = ActuatorCommand {
            device,
            actuator,
            mode,
        };
        tracing::info!(device = %command.device, %actuator, %mode, "sending actuator command");
        if let Err(err) = self.commands.set_actuator(command).await {
            tracing::warn!(error = %err, "actuator command failed");
        }
    }

    /// Send a rename already prepared with [`prepare_rename`].
    pub async fn send_rename(&self, command: RenameCommand) -> RenameOutcome {
        let name = command.name.to_string();
        tracing::info!(device = %command.device, %name, "renaming device");
        match self.commands.rename(command).await {
            Ok(()) => RenameOutcome::Sent { name },
            Err(error) => {
                tracing::warn!(error = %error, "rename failed");
                RenameOutcome::Failed { name, error }
            }
        }
    }

    /// Validate, apply locally, and send a rename in one step.
    ///
    /// The caller should re-fetch the snapshot once this returns.
    ///
    /// # Errors
    ///
    /// Returns [`GreenhubError::Validation`] for an empty name, in which case
    /// no request is sent.
    pub async fn rename_device(
        &self,
        device: &DeviceId,
        state: &mut DashboardState,
    ) -> Result<RenameOutcome, GreenhubError> {
        let command = prepare_rename(device, state)?;
        Ok(self.send_rename(command).await)
    }
}
