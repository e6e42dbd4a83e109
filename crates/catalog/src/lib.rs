use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Race {
    Protoss,
    Terran,
    Zerg,
}

impl Race {
    pub const ALL: [Race; 3] = [Race::Protoss, Race::Terran, Race::Zerg];

    pub fn as_str(&self) -> &'static str {
        match self {
            Race::Protoss => "protoss",
            Race::Terran => "terran",
            Race::Zerg => "zerg",
        }
    }

    fn parse(s: &str) -> Option<Race> {
        match s {
            "protoss" => Some(Race::Protoss),
            "terran" => Some(Race::Terran),
            "zerg" => Some(Race::Zerg),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Unit,
    Building,
    Upgrade,
}

impl EntityKind {
    pub const ALL: [EntityKind; 3] = [EntityKind::Unit, EntityKind::Building, EntityKind::Upgrade];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Unit => "unit",
            EntityKind::Building => "building",
            EntityKind::Upgrade => "upgrade",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    pub race: Race,
    pub kind: EntityKind,
    pub minerals: u32,
    pub gas: u32,
    /// Build or research time in game seconds.
    pub duration: f32,
    pub supply: f32,
    pub requires: Vec<String>,
    pub produces: Vec<String>,
    pub unlocks: Vec<String>,
    pub icon: Option<String>,
}

impl Entity {
    fn matches(&self, term: &str) -> bool {
        self.name.to_lowercase().contains(term)
            || self.minerals.to_string().contains(term)
            || self.gas.to_string().contains(term)
            || self.duration.to_string().contains(term)
    }
}

// Wire format: { "races": { "<race>": { "detailed_data": {..}, "upgrades": {..} } } }
// with `type` discriminating unit vs building inside detailed_data.

#[derive(Deserialize)]
struct CatalogDoc {
    races: BTreeMap<String, RaceDoc>,
}

#[derive(Deserialize, Default)]
struct RaceDoc {
    #[serde(default)]
    detailed_data: BTreeMap<String, EntityDoc>,
    #[serde(default)]
    upgrades: BTreeMap<String, EntityDoc>,
}

#[derive(Deserialize)]
struct EntityDoc {
    name: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    race: Option<String>,
    #[serde(default)]
    minerals: f64,
    #[serde(default)]
    gas: f64,
    build_time: Option<f64>,
    research_time: Option<f64>,
    #[serde(default)]
    supply: f64,
    #[serde(default)]
    requires: Vec<String>,
    #[serde(default)]
    produces: Vec<String>,
    #[serde(default)]
    unlocks: Vec<String>,
    href: Option<String>,
}

impl EntityDoc {
    fn into_entity(self, key: &str, race: Race, kind: EntityKind) -> Entity {
        let race = self
            .race
            .as_deref()
            .and_then(Race::parse)
            .unwrap_or(race);
        Entity {
            name: self.name.unwrap_or_else(|| key.to_string()),
            race,
            kind,
            minerals: self.minerals.max(0.0) as u32,
            gas: self.gas.max(0.0) as u32,
            duration: self.build_time.or(self.research_time).unwrap_or(0.0) as f32,
            supply: self.supply as f32,
            requires: self.requires,
            produces: self.produces,
            unlocks: self.unlocks,
            icon: self.href,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entities: Vec<Entity>,
}

impl Catalog {
    pub fn load(path: &Path) -> Result<Catalog, CatalogError> {
        let text = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Catalog::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Catalog, CatalogError> {
        let doc: CatalogDoc = serde_json::from_str(text)?;
        let mut entities = Vec::new();
        for (race_key, race_doc) in doc.races {
            let Some(race) = Race::parse(&race_key) else {
                tracing::warn!(race = %race_key, "skipping unknown race in catalog");
                continue;
            };
            for (key, entry) in race_doc.detailed_data {
                let kind = match entry.kind.as_deref() {
                    Some("unit") => EntityKind::Unit,
                    Some("building") => EntityKind::Building,
                    other => {
                        tracing::warn!(entry = %key, kind = ?other, "skipping entry with unknown type");
                        continue;
                    }
                };
                entities.push(entry.into_entity(&key, race, kind));
            }
            for (key, entry) in race_doc.upgrades {
                entities.push(entry.into_entity(&key, race, EntityKind::Upgrade));
            }
        }
        Ok(Catalog { entities })
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// All entries for one race and kind, sorted by name.
    pub fn entities(&self, race: Race, kind: EntityKind) -> Vec<&Entity> {
        let mut out: Vec<&Entity> = self
            .entities
            .iter()
            .filter(|e| e.race == race && e.kind == kind)
            .collect();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        out
    }

    /// Same as [`Catalog::entities`] filtered by a case-insensitive search term
    /// matched against the name and the cost/time numbers.
    pub fn search(&self, race: Race, kind: EntityKind, term: &str) -> Vec<&Entity> {
        let term = term.to_lowercase();
        let term = term.trim();
        let mut out = self.entities(race, kind);
        if !term.is_empty() {
            out.retain(|e| e.matches(term));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"{
        "races": {
            "protoss": {
                "detailed_data": {
                    "Zealot": {
                        "name": "Zealot", "type": "unit", "race": "protoss",
                        "minerals": 100, "gas": 0, "build_time": 27, "supply": 2,
                        "requires": ["Gateway"], "href": "icons/protoss/units/zealot.jpg"
                    },
                    "Gateway": {
                        "name": "Gateway", "type": "building",
                        "minerals": 150, "gas": 0, "build_time": 46
                    },
                    "Mystery": { "name": "Mystery", "minerals": 1 }
                },
                "upgrades": {
                    "Charge": {
                        "name": "Charge", "minerals": 100, "gas": 100, "research_time": 100
                    }
                }
            },
            "zerg": {
                "detailed_data": {
                    "Zergling": {
                        "name": "Zergling", "type": "unit",
                        "minerals": 50, "build_time": 17, "supply": 0.5
                    }
                },
                "upgrades": {}
            },
            "unknown_race": { "detailed_data": {}, "upgrades": {} }
        }
    }"#;

    #[test]
    fn parses_units_buildings_and_upgrades() {
        let catalog = Catalog::from_json_str(DOC).unwrap();
        // Mystery has no type and is skipped; unknown_race contributes nothing.
        assert_eq!(catalog.len(), 4);

        let units = catalog.entities(Race::Protoss, EntityKind::Unit);
        assert_eq!(units.len(), 1);
        let zealot = units[0];
        assert_eq!(zealot.name, "Zealot");
        assert_eq!(zealot.minerals, 100);
        assert_eq!(zealot.duration, 27.0);
        assert_eq!(zealot.supply, 2.0);
        assert_eq!(zealot.requires, vec!["Gateway".to_string()]);
        assert_eq!(zealot.icon.as_deref(), Some("icons/protoss/units/zealot.jpg"));

        let upgrades = catalog.entities(Race::Protoss, EntityKind::Upgrade);
        assert_eq!(upgrades.len(), 1);
        assert_eq!(upgrades[0].duration, 100.0);
        assert_eq!(upgrades[0].kind, EntityKind::Upgrade);
    }

    #[test]
    fn race_falls_back_to_map_key() {
        let catalog = Catalog::from_json_str(DOC).unwrap();
        let buildings = catalog.entities(Race::Protoss, EntityKind::Building);
        assert_eq!(buildings.len(), 1);
        assert_eq!(buildings[0].race, Race::Protoss);
    }

    #[test]
    fn fractional_supply_survives() {
        let catalog = Catalog::from_json_str(DOC).unwrap();
        let lings = catalog.entities(Race::Zerg, EntityKind::Unit);
        assert_eq!(lings[0].supply, 0.5);
    }

    #[test]
    fn search_matches_name_and_numbers() {
        let catalog = Catalog::from_json_str(DOC).unwrap();
        assert_eq!(catalog.search(Race::Protoss, EntityKind::Unit, "zea").len(), 1);
        assert_eq!(catalog.search(Race::Protoss, EntityKind::Unit, "27").len(), 1);
        assert_eq!(catalog.search(Race::Protoss, EntityKind::Unit, "nope").len(), 0);
        // Empty / whitespace terms leave the list untouched.
        assert_eq!(catalog.search(Race::Protoss, EntityKind::Unit, "  ").len(), 1);
    }

    #[test]
    fn missing_document_is_an_io_error() {
        let err = Catalog::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = Catalog::from_json_str("{").unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
    }
}
