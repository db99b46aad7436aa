// Response unit models

use serde::{Deserialize, Serialize};

/// Kind of deployable resource. Accepts the dispatch agents' spellings ("EMS", "FIRE", "POLICE").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitType {
    #[serde(alias = "ems", alias = "EMS", alias = "amb", alias = "AMBULANCE")]
    Ambulance,
    #[serde(alias = "FIRE")]
    Fire,
    #[serde(alias = "pd", alias = "PD", alias = "POLICE")]
    Police,
}

impl UnitType {
    pub const ALL: [UnitType; 3] = [UnitType::Ambulance, UnitType::Fire, UnitType::Police];
}

/// Unit availability; serializes snake_case (e.g. "out_of_service").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    Available,
    Active,
    OutOfService,
}

impl Availability {
    /// Parse from a unit agent status string (e.g. "Available", "En_Route", "On_Scene").
    pub fn from_unit_status(s: &str) -> Self {
        match s.to_lowercase().replace(['-', ' '], "_").as_str() {
            "available" => Availability::Available,
            "dispatched" | "en_route" | "enroute" | "on_scene" | "onscene" | "active" => {
                Availability::Active
            }
            _ => Availability::OutOfService,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    pub id: String,
    pub unit_type: UnitType,
    pub availability: Availability,
    /// The one active incident this unit works, if any.
    #[serde(default)]
    pub assigned_incident: Option<String>,
}
