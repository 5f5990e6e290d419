use serde::Serialize;
use strum::{Display, EnumIter, EnumString};

/// The kind of artifact a URL refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString, Serialize)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    /// A model hosted on the model hub
    Model,

    /// A dataset hosted on the model hub
    Dataset,

    /// A source-control repository
    Code,
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::str::FromStr;

    #[test]
    fn test_display_is_uppercase() {
        assert_eq!(Category::Model.to_string(), "MODEL");
        assert_eq!(Category::Dataset.to_string(), "DATASET");
        assert_eq!(Category::Code.to_string(), "CODE");
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(Category::from_str("model").unwrap(), Category::Model);
        assert_eq!(Category::from_str("Dataset").unwrap(), Category::Dataset);
        assert!(Category::from_str("space").is_err());
    }

    #[test]
    fn test_serialize_uppercase() {
        assert_eq!(serde_json::to_string(&Category::Code).unwrap(), "\"CODE\"");
    }
}
