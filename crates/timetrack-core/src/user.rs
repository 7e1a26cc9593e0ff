use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Error, Result, UserInfo};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub passport_serie: i64,
    pub passport_number: i64,
    pub surname: String,
    pub name: String,
    pub patronymic: String,
    pub address: String,
}

/// Passport serie/number pair identifying a real person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Passport {
    pub serie: i64,
    pub number: i64,
}

impl Passport {
    pub fn new(serie: i64, number: i64) -> Self {
        Self { serie, number }
    }

    /// Parse the `"<serie> <number>"` form, e.g. `"1234 567890"`.
    pub fn parse(raw: &str) -> Result<Self> {
        let parts: Vec<&str> = raw.split_whitespace().collect();
        let [serie, number] = parts.as_slice() else {
            return Err(Error::InvalidPassport(format!(
                "expected \"<serie> <number>\", got {:?}",
                raw
            )));
        };

        let serie = serie
            .parse::<i64>()
            .map_err(|e| Error::InvalidPassport(format!("serie {:?}: {}", serie, e)))?;
        let number = number
            .parse::<i64>()
            .map_err(|e| Error::InvalidPassport(format!("number {:?}: {}", number, e)))?;

        Ok(Self { serie, number })
    }
}

impl fmt::Display for Passport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.serie, self.number)
    }
}

/// Field set written by user creation and full-replace update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub passport_serie: i64,
    pub passport_number: i64,
    pub surname: String,
    pub name: String,
    pub patronymic: String,
    pub address: String,
}

impl NewUser {
    pub fn from_info(passport: Passport, info: UserInfo) -> Self {
        Self {
            passport_serie: passport.serie,
            passport_number: passport.number,
            surname: info.surname,
            name: info.name,
            patronymic: info.patronymic,
            address: info.address,
        }
    }

    pub fn passport(&self) -> Passport {
        Passport::new(self.passport_serie, self.passport_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_passport() {
        let passport = Passport::parse("1234 567890").unwrap();
        assert_eq!(passport, Passport::new(1234, 567890));
        assert_eq!(passport.to_string(), "1234 567890");
    }

    #[test]
    fn test_parse_passport_extra_whitespace() {
        let passport = Passport::parse("  1234\t 567890 ").unwrap();
        assert_eq!(passport, Passport::new(1234, 567890));
    }

    #[test]
    fn test_parse_passport_rejects_wrong_shape() {
        for raw in ["", "1234", "1234 567890 1", "12a4 567890", "1234 five"] {
            assert!(
                matches!(Passport::parse(raw), Err(Error::InvalidPassport(_))),
                "{:?} should be rejected",
                raw
            );
        }
    }

    #[test]
    fn test_new_user_from_info() {
        let info = UserInfo {
            surname: "Ivanov".to_string(),
            name: "Ivan".to_string(),
            patronymic: "Ivanovich".to_string(),
            address: "Moscow, Lenina 5".to_string(),
        };

        let user = NewUser::from_info(Passport::new(1234, 567890), info);
        assert_eq!(user.passport_serie, 1234);
        assert_eq!(user.passport_number, 567890);
        assert_eq!(user.surname, "Ivanov");
        assert_eq!(user.passport(), Passport::new(1234, 567890));
    }
}
