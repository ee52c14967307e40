//! DeviceRegistry: the in-memory map of every device in the configuration.
//!
//! The registry is the source of truth for devices while the process runs.
//! The `devices` array of the configuration file is only a snapshot of it,
//! produced by [`DeviceRegistry::all`] whenever the configuration is read or
//! written.
//!
//! # HashMap choice
//!
//! A `HashMap<String, Device>` provides O(1) lookup by id.  Iteration order is
//! not guaranteed, so snapshots are sorted by id: the `devices` array written
//! to disk is deterministic, though not necessarily in the order it was read.

use std::collections::{BTreeSet, HashMap};

use y2m_core::{generate_device_id, Device, DeviceFields};

/// In-memory registry of devices keyed by id.
#[derive(Debug, Default)]
pub struct DeviceRegistry {
    devices: HashMap<String, Device>,
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from a device list.  For duplicate ids the last
    /// occurrence wins.
    pub fn from_devices(devices: impl IntoIterator<Item = Device>) -> Self {
        let mut registry = Self::new();
        registry.replace_all(devices);
        registry
    }

    /// Discards every device and loads `devices` instead.
    pub fn replace_all(&mut self, devices: impl IntoIterator<Item = Device>) {
        self.devices.clear();
        for device in devices {
            self.upsert(device);
        }
    }

    /// Removes every device.
    pub fn clear(&mut self) {
        self.devices.clear();
    }

    /// Inserts or replaces a device.
    pub fn upsert(&mut self, device: Device) {
        self.devices.insert(device.id.clone(), device);
    }

    /// Returns a snapshot of all devices, ordered by id.
    pub fn all(&self) -> Vec<Device> {
        let mut devices: Vec<Device> = self.devices.values().cloned().collect();
        devices.sort_by(|a, b| a.id.cmp(&b.id));
        devices
    }

    /// Returns the device with the given id.
    pub fn get(&self, id: &str) -> Option<&Device> {
        self.devices.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.devices.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Creates a device from `fields` under a freshly generated id.
    ///
    /// Any `id` in `fields` is ignored.  Ids are regenerated until one is
    /// found that the registry does not already hold.
    pub fn create(&mut self, fields: DeviceFields) -> Device {
        let id = loop {
            let candidate = generate_device_id();
            if !self.contains(&candidate) {
                break candidate;
            }
        };
        let device = Device::from_fields(id, fields);
        self.upsert(device.clone());
        device
    }

    /// Merges `partial` onto the device with the given id.
    ///
    /// Returns the merged device, or `None` when the id is unknown.  The id of
    /// a stored device never changes.
    pub fn update(&mut self, id: &str, partial: DeviceFields) -> Option<Device> {
        let device = self.devices.get_mut(id)?;
        *device = device.merged(partial);
        Some(device.clone())
    }

    /// Removes a device, returning `true` if it was present.
    pub fn remove(&mut self, id: &str) -> bool {
        self.devices.remove(id).is_some()
    }

    /// Returns the distinct rooms of all devices in ascending order.
    pub fn rooms(&self) -> Vec<String> {
        self.devices
            .values()
            .map(|device| device.room.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}
