//! CommandStat entity <-> model mapper

use latte_core::{CommandStat, CommandType, DomainError};

use crate::models::CommandStatModel;

/// Convert CommandStatModel to CommandStat entity
impl TryFrom<CommandStatModel> for CommandStat {
    type Error = DomainError;

    fn try_from(model: CommandStatModel) -> Result<Self, Self::Error> {
        Ok(CommandStat {
            name: model.name,
            command_type: model.command_type.parse::<CommandType>()?,
            // CHECK (uses >= 0) holds this up
            uses: u64::try_from(model.uses).unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_to_entity() {
        let stat = CommandStat::try_from(CommandStatModel {
            name: "store".to_string(),
            command_type: "slash".to_string(),
            uses: 42,
        })
        .unwrap();
        assert_eq!(stat.command_type, CommandType::Slash);
        assert_eq!(stat.uses, 42);
    }

    #[test]
    fn test_unknown_type_is_an_error() {
        let result = CommandStat::try_from(CommandStatModel {
            name: "store".to_string(),
            command_type: "button".to_string(),
            uses: 1,
        });
        assert!(result.is_err());
    }
}
