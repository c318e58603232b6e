//! Command port: mutations of server-side device state.

use std::future::Future;

use greenhub_domain::command::{ActuatorCommand, RenameCommand};
use greenhub_domain::error::TransportError;

/// Sends commands that change device state on the server.
pub trait DeviceCommands {
    /// Assign a new display name to a device.
    fn rename(&self, command: RenameCommand) -> impl Future<Output = Result<(), TransportError>>;

    /// Change the mode of a pump or light.
    fn set_actuator(
        &self,
        command: ActuatorCommand,
    ) -> impl Future<Output = Result<(), TransportError>>;
}
