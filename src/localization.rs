use crate::CivError;
use serde::{de, Deserialize, Deserializer};
use std::fmt;

/// A map name as stored in a Civ VII save
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapLocalization {
    /// The name was written without localization
    Text(String),

    /// Localized names by identifier, in document order
    Table(Vec<(String, Vec<LocalizedText>)>),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LocalizedText {
    pub locale: String,
    pub text: String,
}

const DEFAULT_LOCALE: &str = "en_US";

impl MapLocalization {
    pub fn parse(json: &str) -> Result<Self, CivError> {
        let mut deserializer = serde_json::Deserializer::from_str(json);
        let result = serde_path_to_error::deserialize(&mut deserializer)?;
        Ok(result)
    }

    /// Text for the locale from the first identifier that has it
    pub fn text(&self, locale: &str) -> Option<&str> {
        match self {
            MapLocalization::Text(x) => Some(x.as_str()),
            MapLocalization::Table(entries) => entries
                .iter()
                .flat_map(|(_, texts)| texts.iter())
                .find(|x| x.locale == locale)
                .map(|x| x.text.as_str()),
        }
    }

    /// The english name of the map, or failing that the first identifier
    pub fn map_name(&self) -> Option<&str> {
        match self {
            MapLocalization::Text(x) => Some(x.as_str()),
            MapLocalization::Table(entries) => self
                .text(DEFAULT_LOCALE)
                .or_else(|| entries.first().map(|(id, _)| id.as_str())),
        }
    }
}

impl<'de> Deserialize<'de> for MapLocalization {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct MapLocalizationVisitor;

        impl<'de> de::Visitor<'de> for MapLocalizationVisitor {
            type Value = MapLocalization;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a localization table or string")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(MapLocalization::Text(String::from(v)))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut entries = Vec::new();
                while let Some((id, texts)) = map.next_entry::<String, Vec<LocalizedText>>()? {
                    entries.push((id, texts));
                }
                Ok(MapLocalization::Table(entries))
            }
        }

        deserializer.deserialize_any(MapLocalizationVisitor)
    }
}
