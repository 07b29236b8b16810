#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ClaudeModel {
    #[default]
    Haiku35,
    Sonnet35,
    Sonnet4,
    Override(String),
}

impl ClaudeModel {
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Haiku35 => "claude-3-5-haiku-latest",
            Self::Sonnet35 => "claude-3-5-sonnet-latest",
            Self::Sonnet4 => "claude-sonnet-4-20250514",
            Self::Override(s) => s.as_str(),
        }
    }

    /// Map a configured model id to a known model, or carry it through as-is.
    #[must_use]
    pub fn from_id(id: &str) -> Self {
        match id {
            "claude-3-5-haiku-latest" => Self::Haiku35,
            "claude-3-5-sonnet-latest" => Self::Sonnet35,
            "claude-sonnet-4-20250514" | "claude-sonnet-4" => Self::Sonnet4,
            other => Self::Override(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_ids_map_to_variants() {
        assert_eq!(ClaudeModel::from_id("claude-3-5-sonnet-latest"), ClaudeModel::Sonnet35);
        assert_eq!(ClaudeModel::from_id("claude-sonnet-4"), ClaudeModel::Sonnet4);
        assert_eq!(ClaudeModel::Sonnet4.id(), "claude-sonnet-4-20250514");
        assert_eq!(ClaudeModel::from_id("claude-3-5-haiku-latest"), ClaudeModel::default());
        assert_eq!(
            ClaudeModel::from_id("claude-opus-4-1"),
            ClaudeModel::Override("claude-opus-4-1".to_string())
        );
    }
}
