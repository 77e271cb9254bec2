use serde::de::DeserializeOwned;

/// Deserialize a JSON document with the failing JSON path included in the
/// error message. Used for config files and validator schemas, where "which
/// field" matters more than the bare serde error.
pub fn from_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T, String> {
    let de = &mut serde_json::Deserializer::from_str(src);
    match serde_path_to_error::deserialize::<_, T>(de) {
        Ok(v) => Ok(v),
        Err(err) => {
            let path = err.path().to_string();
            Err(format!("at JSON path {path} → {}", err.into_inner()))
        }
    }
}
