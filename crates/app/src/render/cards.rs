//! Device cards, reconciled in place against each snapshot.
//!
//! Cards are created lazily and then patched field by field. A card is never
//! rebuilt, and its rename input is left alone while the user has a pending
//! edit for that device.

use std::collections::BTreeMap;

use greenhub_domain::actuator::ActuatorMode;
use greenhub_domain::id::DeviceId;
use greenhub_domain::sensor::SensorField;
use greenhub_domain::time::{Timestamp, format_clock};

use crate::format::{self, DASH};
use crate::state::{Column, DashboardState};

/// Sensor rows a card can show, subject to column visibility.
pub const CARD_FIELDS: [SensorField; 5] = SensorField::CHARTED;

/// One labelled value on a card.
#[derive(Debug, Clone, PartialEq)]
pub struct CardValue {
    pub field: SensorField,
    pub text: String,
}

/// View model for one device card.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceCard {
    /// Assigned once at creation and never changed.
    pub mount_id: u64,
    pub title: String,
    pub values: Vec<CardValue>,
    pub last_seen: String,
    pub pump: Option<ActuatorMode>,
    pub light: Option<ActuatorMode>,
    pub offline: bool,
    /// Contents of the rename text box.
    pub rename_input: String,
}

/// Summary of one reconcile pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Devices that got a new card.
    pub created: Vec<DeviceId>,
    /// Existing cards whose content changed.
    pub updated: usize,
    /// Cards currently marked offline.
    pub offline: usize,
}

/// All cards on screen, keyed by device.
#[derive(Debug, Clone, Default)]
pub struct CardBoard {
    cards: BTreeMap<DeviceId, DeviceCard>,
    next_mount_id: u64,
}

impl CardBoard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bring every card in line with the state at `now`.
    ///
    /// Devices missing from the snapshot keep their card, rendered from their
    /// last report, so they still go offline once that report ages out.
    pub fn reconcile(&mut self, state: &DashboardState, now: Timestamp) -> ReconcileReport {
        let mut report = ReconcileReport::default();

        for id in state.known_ids() {
            let desired = Self::desired(state, id, now);
            match self.cards.get_mut(id) {
                Some(card) => {
                    if patch(card, desired, state.renames.is_pending(id)) {
                        report.updated += 1;
                    }
                }
                None => {
                    self.next_mount_id += 1;
                    let card = DeviceCard {
                        mount_id: self.next_mount_id,
                        ..desired
                    };
                    tracing::debug!(device = %id, mount_id = card.mount_id, "creating device card");
                    self.cards.insert(id.clone(), card);
                    report.created.push(id.clone());
                }
            }
        }

        report.offline = self.cards.values().filter(|card| card.offline).count();
        report
    }

    fn desired(state: &DashboardState, id: &DeviceId, now: Timestamp) -> DeviceCard {
        let device = state.known_device(id);
        let offline = state.presence(id, now).is_offline();

        let values = CARD_FIELDS
            .into_iter()
            .filter(|field| state.columns.is_visible(Column::Sensor(*field)))
            .map(|field| {
                let value = if offline {
                    None
                } else {
                    device.and_then(|d| d.readings.get(field))
                };
                CardValue {
                    field,
                    text: format::reading_with_unit(field, value),
                }
            })
            .collect();

        let last_seen = device
            .and_then(|d| d.last_seen)
            .map_or_else(|| DASH.to_string(), |ts| format_clock(&ts));

        DeviceCard {
            mount_id: 0,
            title: format!("{} ({id})", state.display_name(id)),
            values,
            last_seen,
            pump: device.and_then(|d| d.pump),
            light: device.and_then(|d| d.light),
            offline,
            rename_input: state.rename_input(id),
        }
    }

    #[must_use]
    pub fn get(&self, id: &DeviceId) -> Option<&DeviceCard> {
        self.cards.get(id)
    }

    /// Cards in device order.
    pub fn iter(&self) -> impl Iterator<Item = (&DeviceId, &DeviceCard)> {
        self.cards.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// Copy `desired` into `card`, skipping the rename input while an edit is
/// pending. Returns whether anything changed.
fn patch(card: &mut DeviceCard, desired: DeviceCard, edit_pending: bool) -> bool {
    let mut changed = false;

    macro_rules! sync {
        ($field:ident) => {
            if card.$field != desired.$field {
                card.$field = desired.$field;
                changed = true;
            }
        };
    }

    sync!(title);
    sync!(values);
    sync!(last_seen);
    sync!(pump);
    sync!(light);
    sync!(offline);
    if !edit_pending {
        sync!(rename_input);
    }

    changed
}
