use std::{fmt, marker::PhantomData, str::FromStr};

/// pixiv is inconsistent about quoting numbers: `illustType` and frame delays
/// show up both as JSON numbers and as strings depending on the page.
pub fn deserialize_number_unconditionally<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: FromStr + TryFrom<u64>,
{
    struct StringOrNumberVisitor<T>(PhantomData<T>);

    impl<'de, T> serde::de::Visitor<'de> for StringOrNumberVisitor<T>
    where
        T: FromStr + TryFrom<u64>,
    {
        type Value = T;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("string or number")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            value
                .trim()
                .parse()
                .map_err(|_| E::invalid_value(serde::de::Unexpected::Str(value), &self))
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            T::try_from(value)
                .map_err(|_| E::invalid_value(serde::de::Unexpected::Unsigned(value), &self))
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            u64::try_from(value)
                .ok()
                .and_then(|value| T::try_from(value).ok())
                .ok_or_else(|| E::invalid_value(serde::de::Unexpected::Signed(value), &self))
        }
    }

    deserializer.deserialize_any(StringOrNumberVisitor(PhantomData))
}
