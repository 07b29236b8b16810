#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum XaiModel {
    #[default]
    GrokBeta,    // "grok-beta"
    Grok2,       // "grok-2-latest"
    Grok2Mini,   // "grok-2-mini"
    Override(String),
}

impl XaiModel {
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::GrokBeta => "grok-beta",
            Self::Grok2 => "grok-2-latest",
            Self::Grok2Mini => "grok-2-mini",
            Self::Override(s) => s.as_str(),
        }
    }

    /// Map a configured model id to a known model, or carry it through as-is.
    #[must_use]
    pub fn from_id(id: &str) -> Self {
        match id {
            "grok-beta" => Self::GrokBeta,
            "grok-2-latest" | "grok-2" => Self::Grok2,
            "grok-2-mini" => Self::Grok2Mini,
            other => Self::Override(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_ids_map_to_variants() {
        assert_eq!(XaiModel::from_id("grok-2-latest"), XaiModel::Grok2);
        assert_eq!(XaiModel::from_id("grok-2"), XaiModel::Grok2);
        assert_eq!(XaiModel::from_id("grok-2-mini"), XaiModel::Grok2Mini);
        assert_eq!(XaiModel::from_id("grok-beta"), XaiModel::default());
        assert_eq!(XaiModel::from_id("grok-3").id(), "grok-3");
    }
}
