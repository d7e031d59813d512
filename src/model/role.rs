use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, EnumString, Display, ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Employee,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_names_round_through_strum() {
        assert_eq!(Role::Admin.to_string(), "ADMIN");
        assert_eq!("EMPLOYEE".parse::<Role>().unwrap(), Role::Employee);
        assert!("Hr".parse::<Role>().is_err());
    }
}
