//! Orientation viewer model.
//!
//! The dashboard publishes one [`OrientationFrame`] per applied snapshot on a
//! named message channel. The viewer window listens on that channel and never
//! touches the dashboard's state directly, so closing or reloading the
//! dashboard simply stops the frames.

use greenhub_domain::id::DeviceId;
use greenhub_domain::sensor::SensorField;
use serde::{Deserialize, Serialize};

use crate::state::DashboardState;

/// Name of the channel shared by the dashboard and viewer windows.
pub const ORIENTATION_CHANNEL: &str = "greenhub-orientation";

/// Rotation in radians about each axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rotation {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Latest orientation of one device, as sent over the channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrientationFrame {
    pub device: DeviceId,
    pub rotation: Rotation,
    /// Snapshot sequence the frame was taken from.
    pub seq: u64,
}

impl OrientationFrame {
    /// Take a frame for `device` from the snapshot on screen.
    ///
    /// Missing axes read as zero. Returns `None` if the device is unknown.
    #[must_use]
    pub fn from_state(state: &DashboardState, device: &DeviceId) -> Option<Self> {
        let readings = &state.device(device)?.readings;
        let axis = |field| readings.get(field).unwrap_or(0.0);
        Some(Self {
            device: device.clone(),
            rotation: Rotation {
                x: axis(SensorField::OrientationX),
                y: axis(SensorField::OrientationY),
                z: axis(SensorField::OrientationZ),
            },
            seq: state.snapshot_seq(),
        })
    }

    /// Frames for every device in the current snapshot.
    #[must_use]
    pub fn all_from_state(state: &DashboardState) -> Vec<Self> {
        state
            .snapshot()
            .ids()
            .filter_map(|id| Self::from_state(state, id))
            .collect()
    }

    /// Encode for the channel.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decode a channel message.
    ///
    /// # Errors
    ///
    /// Returns an error if `text` is not a valid frame.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// State of one viewer window.
#[derive(Debug, Clone)]
pub struct OrientationViewer {
    device: DeviceId,
    rotation: Rotation,
    last_seq: Option<u64>,
}

impl OrientationViewer {
    /// Create a viewer for `device`, starting at the default pose.
    #[must_use]
    pub fn new(device: DeviceId) -> Self {
        Self {
            device,
            rotation: Rotation::default(),
            last_seq: None,
        }
    }

    #[must_use]
    pub fn device(&self) -> &DeviceId {
        &self.device
    }

    #[must_use]
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Apply a frame. Frames for other devices or older snapshots are ignored.
    ///
    /// Returns whether the rotation was updated.
    pub fn apply(&mut self, frame: &OrientationFrame) -> bool {
        if frame.device != self.device {
            return false;
        }
        if self.last_seq.is_some_and(|seq| frame.seq < seq) {
            return false;
        }
        self.last_seq = Some(frame.seq);
        self.rotation = frame.rotation;
        true
    }

    /// Return the model to its default pose until the next frame arrives.
    pub fn reset(&mut self) {
        self.rotation = Rotation::default();
    }
}

/// A 3D point.
type Vec3 = [f64; 3];

/// A line to draw, in canvas pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub from: (f64, f64),
    pub to: (f64, f64),
}

const CAMERA_DISTANCE: f64 = 5.0;
const FIELD_OF_VIEW_DEG: f64 = 75.0;

/// Unit-cube body with a short "nose" on +Z so the heading is visible.
const VERTICES: [Vec3; 10] = [
    [-1.0, -0.6, -1.0],
    [1.0, -0.6, -1.0],
    [1.0, 0.6, -1.0],
    [-1.0, 0.6, -1.0],
    [-1.0, -0.6, 1.0],
    [1.0, -0.6, 1.0],
    [1.0, 0.6, 1.0],
    [-1.0, 0.6, 1.0],
    [0.0, 0.0, 1.0],
    [0.0, 0.0, 1.6],
];

const EDGES: [(usize, usize); 13] = [
    (0, 1),
    (1, 2),
    (2, 3),
    (3, 0),
    (4, 5),
    (5, 6),
    (6, 7),
    (7, 4),
    (0, 4),
    (1, 5),
    (2, 6),
    (3, 7),
    (8, 9),
];

/// Rotate `p` by `r`, applying X, then Y, then Z intrinsic rotations.
#[must_use]
pub fn rotate(p: Vec3, r: Rotation) -> Vec3 {
    let (sx, cx) = r.x.sin_cos();
    let (sy, cy) = r.y.sin_cos();
    let (sz, cz) = r.z.sin_cos();

    // R = Rx * Ry * Rz
    let [x, y, z] = p;
    let (x, y) = (x * cz - y * sz, x * sz + y * cz);
    let (x, z) = (x * cy + z * sy, -x * sy + z * cy);
    let (y, z) = (y * cx - z * sx, y * sx + z * cx);
    [x, y, z]
}

/// Project the rotated model onto a `width` × `height` canvas.
#[must_use]
pub fn project_model(rotation: Rotation, width: f64, height: f64) -> Vec<Segment> {
    let focal = (height / 2.0) / (FIELD_OF_VIEW_DEG.to_radians() / 2.0).tan();
    let project = |p: Vec3| {
        let [x, y, z] = rotate(p, rotation);
        let depth = CAMERA_DISTANCE - z;
        (
            width / 2.0 + focal * x / depth,
            height / 2.0 - focal * y / depth,
        )
    };
    EDGES
        .iter()
        .map(|&(a, b)| Segment {
            from: project(VERTICES[a]),
            to: project(VERTICES[b]),
        })
        .collect()
}
