use serde::{Deserialize, Deserializer, Serialize};

/// A single optional equality criterion.
///
/// `Absent` means "no constraint". `Present` always constrains, even when
/// the value is empty, so `Present(String::new())` matches only empty
/// columns. When deserialized, a missing key is `Absent` and any value
/// (including `""`) is `Present`; `null` is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Field<T> {
    #[default]
    Absent,
    Present(T),
}

impl<T> Field<T> {
    pub fn is_present(&self) -> bool {
        matches!(self, Field::Present(_))
    }

    pub fn is_absent(&self) -> bool {
        !self.is_present()
    }

    pub fn as_present(&self) -> Option<&T> {
        match self {
            Field::Present(value) => Some(value),
            Field::Absent => None,
        }
    }
}

impl<T> From<Option<T>> for Field<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Field::Absent, Field::Present)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Field<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        T::deserialize(deserializer).map(Field::Present)
    }
}

impl<T: Serialize> Serialize for Field<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Field::Present(value) => value.serialize(serializer),
            Field::Absent => serializer.serialize_none(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub offset: Option<i64>,
    #[serde(default)]
    pub limit: Option<i64>,
}

/// Filter Spec for user lookups: equality predicates plus pagination.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserFilter {
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub id: Field<i64>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub passport_serie: Field<i64>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub passport_number: Field<i64>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub surname: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub name: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub patronymic: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub address: Field<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
}

impl UserFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: i64) -> Self {
        self.id = Field::Present(id);
        self
    }

    pub fn passport_serie(mut self, serie: i64) -> Self {
        self.passport_serie = Field::Present(serie);
        self
    }

    pub fn passport_number(mut self, number: i64) -> Self {
        self.passport_number = Field::Present(number);
        self
    }

    pub fn surname(mut self, surname: impl Into<String>) -> Self {
        self.surname = Field::Present(surname.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Field::Present(name.into());
        self
    }

    pub fn patronymic(mut self, patronymic: impl Into<String>) -> Self {
        self.patronymic = Field::Present(patronymic.into());
        self
    }

    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Field::Present(address.into());
        self
    }

    pub fn paginate(mut self, pagination: Pagination) -> Self {
        self.offset = pagination.offset;
        self.limit = pagination.limit;
        self
    }

    pub fn pagination(&self) -> Pagination {
        Pagination {
            offset: self.offset,
            limit: self.limit,
        }
    }

    /// Number of equality predicates this filter contributes.
    pub fn predicate_count(&self) -> usize {
        [
            self.id.is_present(),
            self.passport_serie.is_present(),
            self.passport_number.is_present(),
            self.surname.is_present(),
            self.name.is_present(),
            self.patronymic.is_present(),
            self.address.is_present(),
        ]
        .into_iter()
        .filter(|present| *present)
        .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_keys_are_absent() {
        let filter: UserFilter = serde_json::from_str("{}").unwrap();
        assert_eq!(filter, UserFilter::default());
        assert_eq!(filter.predicate_count(), 0);
    }

    #[test]
    fn test_empty_string_is_present() {
        let filter: UserFilter = serde_json::from_str(r#"{"surname": ""}"#).unwrap();
        assert_eq!(filter.surname, Field::Present(String::new()));
        assert_eq!(filter.predicate_count(), 1);
    }

    #[test]
    fn test_null_is_rejected() {
        let result = serde_json::from_str::<UserFilter>(r#"{"name": null}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_and_pagination() {
        let filter = UserFilter::new()
            .passport_serie(1234)
            .name("Ivan")
            .paginate(Pagination {
                offset: Some(10),
                limit: Some(5),
            });

        assert_eq!(filter.predicate_count(), 2);
        assert_eq!(filter.pagination().offset, Some(10));
        assert_eq!(filter.pagination().limit, Some(5));
        assert_eq!(filter.name.as_present().map(String::as_str), Some("Ivan"));
    }

    #[test]
    fn test_serialize_skips_absent_fields() {
        let filter = UserFilter::new().id(3);
        let json = serde_json::to_value(&filter).unwrap();
        assert_eq!(json, serde_json::json!({"id": 3}));
    }
}
