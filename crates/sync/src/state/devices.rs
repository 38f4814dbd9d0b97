//! The room → devices map.
//!
//! Rooms are stored as `Arc`-shared vectors so a single-device patch
//! re-wraps only the touched room; every other room keeps its allocation
//! and its pointer identity. Downstream renderers key change detection on
//! that identity.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use haven_protocol::{DeviceState, RoomDevices};

use super::{read_lock, write_lock};

/// Render-ready view: room name to its shared device list.
pub type RoomView = HashMap<String, Arc<Vec<DeviceState>>>;

/// Client-side mirror of the device registry, patched event-by-event.
#[derive(Default)]
pub struct DeviceMap {
    rooms: RwLock<RoomView>,
}

impl DeviceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the entire map from a snapshot (`initial_state` or the
    /// periodic `GET /devices` poll). Applying the same snapshot twice
    /// yields the same state.
    pub fn apply_snapshot(&self, rooms: RoomDevices) {
        let next: RoomView = rooms
            .into_iter()
            .map(|(room, devices)| (room, Arc::new(devices)))
            .collect();
        *write_lock(&self.rooms) = next;
    }

    /// Patch a single device in place.
    ///
    /// Only the device's own room is rebuilt; sibling rooms keep their
    /// `Arc` identity. An event naming a room we don't know - or a device
    /// its room doesn't contain - is a no-op: topology comes from
    /// snapshots, never from bare device events.
    pub fn apply_device(&self, device: DeviceState) {
        let mut rooms = write_lock(&self.rooms);
        let Some(devices) = rooms.get_mut(&device.room) else {
            return;
        };
        let Some(index) = devices.iter().position(|d| d.device_id == device.device_id) else {
            return;
        };

        let mut next = devices.as_ref().clone();
        next[index] = device;
        *devices = Arc::new(next);
    }

    /// Cheap clone of the current view (per-room `Arc`s, not device data).
    pub fn rooms(&self) -> RoomView {
        read_lock(&self.rooms).clone()
    }

    /// The shared device list of one room.
    pub fn room(&self, name: &str) -> Option<Arc<Vec<DeviceState>>> {
        read_lock(&self.rooms).get(name).cloned()
    }

    /// Find one device by id, scanning all rooms.
    pub fn device(&self, device_id: &str) -> Option<DeviceState> {
        read_lock(&self.rooms)
            .values()
            .flat_map(|devices| devices.iter())
            .find(|d| d.device_id == device_id)
            .cloned()
    }

    pub fn room_count(&self) -> usize {
        read_lock(&self.rooms).len()
    }

    pub fn device_count(&self) -> usize {
        read_lock(&self.rooms).values().map(|d| d.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        read_lock(&self.rooms).is_empty()
    }
}
