//! Seed catalog the registry starts from.

use super::Activity;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// An activity entry in a seed catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedActivity {
    pub name: String,
    pub description: String,
    pub schedule: String,
    pub max_participants: u32,
    #[serde(default)]
    pub participants: Vec<String>,
}

impl SeedActivity {
    fn new(
        name: &str,
        description: &str,
        schedule: &str,
        max_participants: u32,
        participants: &[&str],
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            schedule: schedule.into(),
            max_participants,
            participants: participants.iter().map(|p| p.to_string()).collect(),
        }
    }

    pub(super) fn into_parts(self) -> (String, Activity) {
        (
            self.name,
            Activity {
                description: self.description,
                schedule: self.schedule,
                max_participants: self.max_participants,
                participants: self.participants,
            },
        )
    }
}

/// The built-in Mergington High School catalog.
pub fn default_catalog() -> Vec<SeedActivity> {
    vec![
        SeedActivity::new(
            "Chess Club",
            "Learn strategies and compete in chess tournaments",
            "Fridays, 3:30 PM - 5:00 PM",
            12,
            &["michael@mergington.edu", "daniel@mergington.edu"],
        ),
        SeedActivity::new(
            "Programming Class",
            "Learn programming fundamentals and build software projects",
            "Tuesdays and Thursdays, 3:30 PM - 4:30 PM",
            20,
            &["emma@mergington.edu", "sophia@mergington.edu"],
        ),
        SeedActivity::new(
            "Gym Class",
            "Physical education and sports activities",
            "Mondays, Wednesdays, Fridays, 2:00 PM - 3:00 PM",
            30,
            &["john@mergington.edu", "olivia@mergington.edu"],
        ),
        SeedActivity::new(
            "Basketball Team",
            "Practice and compete in inter-school basketball games",
            "Mondays and Wednesdays, 4:00 PM - 5:30 PM",
            15,
            &["james@mergington.edu"],
        ),
        SeedActivity::new(
            "Soccer Club",
            "Train together and play matches in the regional league",
            "Tuesdays and Thursdays, 4:00 PM - 5:30 PM",
            22,
            &["lucas@mergington.edu", "mia@mergington.edu"],
        ),
        SeedActivity::new(
            "Art Club",
            "Explore painting, drawing and sculpture",
            "Wednesdays, 3:30 PM - 5:00 PM",
            15,
            &["amelia@mergington.edu"],
        ),
        SeedActivity::new(
            "Drama Club",
            "Act, direct and stage the school's theater productions",
            "Thursdays, 3:30 PM - 5:30 PM",
            20,
            &["ella@mergington.edu", "henry@mergington.edu"],
        ),
        SeedActivity::new(
            "Math Club",
            "Solve challenging problems and prepare for math competitions",
            "Tuesdays, 3:30 PM - 4:30 PM",
            10,
            &["liam@mergington.edu"],
        ),
        SeedActivity::new(
            "Debate Team",
            "Develop public speaking and argumentation skills",
            "Fridays, 4:00 PM - 5:30 PM",
            12,
            &["ava@mergington.edu", "noah@mergington.edu"],
        ),
    ]
}

/// Load a seed catalog from a JSON file.
///
/// The file holds an array of activities. Duplicate activity names and
/// duplicate participants within one activity are rejected.
pub fn load_catalog(path: &Path) -> Result<Vec<SeedActivity>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read seed catalog {}", path.display()))?;
    let catalog: Vec<SeedActivity> = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse seed catalog {}", path.display()))?;

    validate(&catalog)?;
    Ok(catalog)
}

fn validate(catalog: &[SeedActivity]) -> Result<()> {
    let mut names = HashSet::new();
    for entry in catalog {
        if !names.insert(entry.name.as_str()) {
            bail!("Duplicate activity in seed catalog: {}", entry.name);
        }

        let mut emails = HashSet::new();
        for email in &entry.participants {
            if !emails.insert(email.as_str()) {
                bail!(
                    "Duplicate participant {} in seed activity {}",
                    email,
                    entry.name
                );
            }
        }
    }
    Ok(())
}
