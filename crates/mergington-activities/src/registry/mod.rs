//! In-memory activity registry.

mod catalog;

pub use catalog::{default_catalog, load_catalog, SeedActivity};

use crate::error::ServiceError;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::info;

/// An extracurricular activity and its participant roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub description: String,
    pub schedule: String,
    /// Declared capacity. Only checked when capacity enforcement is enabled.
    pub max_participants: u32,
    /// Participant emails, each at most once.
    pub participants: Vec<String>,
}

impl Activity {
    /// Check whether an email is on the roster.
    pub fn has_participant(&self, email: &str) -> bool {
        self.participants.iter().any(|p| p == email)
    }

    /// Check whether the roster has reached the declared capacity.
    pub fn is_full(&self) -> bool {
        self.participants.len() >= self.max_participants as usize
    }
}

/// Point-in-time copy of the whole catalog, in seed order.
///
/// Serializes as a JSON object keyed by activity name.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    entries: Vec<(String, Activity)>,
}

impl Snapshot {
    pub fn get(&self, name: &str) -> Option<&Activity> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, activity)| activity)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Activity)> {
        self.entries.iter().map(|(n, a)| (n.as_str(), a))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for Snapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, activity) in &self.entries {
            map.serialize_entry(name, activity)?;
        }
        map.end()
    }
}

/// Activity registry.
///
/// The set of activities is fixed at construction. Each activity sits behind
/// its own lock, and signup/unregister hold that lock across the membership
/// check and the mutation.
#[derive(Debug)]
pub struct Registry {
    activities: HashMap<String, Mutex<Activity>>,
    /// Activity names in seed order
    order: Vec<String>,
    enforce_capacity: bool,
}

impl Registry {
    /// Build a registry from a seed catalog.
    ///
    /// Later entries with a name already seen are ignored; `load_catalog`
    /// rejects such files before they get here.
    pub fn new(seed: Vec<SeedActivity>) -> Self {
        let mut activities = HashMap::with_capacity(seed.len());
        let mut order = Vec::with_capacity(seed.len());

        for entry in seed {
            if activities.contains_key(&entry.name) {
                continue;
            }
            let (name, activity) = entry.into_parts();
            order.push(name.clone());
            activities.insert(name, Mutex::new(activity));
        }

        Self {
            activities,
            order,
            enforce_capacity: false,
        }
    }

    /// Registry seeded with the built-in catalog.
    pub fn with_default_catalog() -> Self {
        Self::new(default_catalog())
    }

    /// Reject signups once an activity reaches `max_participants`.
    pub fn enforce_capacity(mut self, enabled: bool) -> Self {
        self.enforce_capacity = enabled;
        self
    }

    /// Copy of every activity, in seed order.
    pub fn list(&self) -> Snapshot {
        let entries = self
            .order
            .iter()
            .filter_map(|name| {
                self.activities
                    .get(name)
                    .map(|slot| (name.clone(), lock(slot).clone()))
            })
            .collect();

        Snapshot { entries }
    }

    /// Copy of a single activity.
    pub fn get(&self, name: &str) -> Option<Activity> {
        self.activities.get(name).map(|slot| lock(slot).clone())
    }

    /// Number of activities in the catalog.
    pub fn count(&self) -> usize {
        self.order.len()
    }

    /// Add a student to an activity's roster.
    pub fn signup(&self, activity_name: &str, email: &str) -> Result<String, ServiceError> {
        let slot = self
            .activities
            .get(activity_name)
            .ok_or(ServiceError::NotFound)?;
        let mut activity = lock(slot);

        if activity.has_participant(email) {
            return Err(ServiceError::AlreadyRegistered);
        }
        if self.enforce_capacity && activity.is_full() {
            return Err(ServiceError::ActivityFull);
        }

        activity.participants.push(email.to_string());
        info!(activity = %activity_name, %email, "Student signed up");

        Ok(format!("Signed up {} for {}", email, activity_name))
    }

    /// Remove a student from an activity's roster.
    pub fn unregister(&self, activity_name: &str, email: &str) -> Result<String, ServiceError> {
        let slot = self
            .activities
            .get(activity_name)
            .ok_or(ServiceError::NotFound)?;
        let mut activity = lock(slot);

        let position = activity
            .participants
            .iter()
            .position(|p| p == email)
            .ok_or(ServiceError::NotRegistered)?;
        activity.participants.remove(position);
        info!(activity = %activity_name, %email, "Student unregistered");

        Ok(format!("Unregistered {} from {}", email, activity_name))
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::with_default_catalog()
    }
}

/// Rosters are plain lists and stay consistent even if a holder panicked.
fn lock(slot: &Mutex<Activity>) -> MutexGuard<'_, Activity> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}
