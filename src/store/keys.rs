use crate::store::StoreError;

/// Composite keys join segments with ':'. The leading segment must stay
/// colon-free or prefix scans would bleed across entities.
fn require_plain_segment(value: &str, what: &str) -> Result<(), StoreError> {
    if value.is_empty() {
        return Err(StoreError::Validation(format!("{what} must not be empty")));
    }
    if value.contains(':') {
        return Err(StoreError::Validation(format!(
            "{what} must not contain ':' (got {value:?})"
        )));
    }
    Ok(())
}

pub fn unit_key(uid: &str) -> String {
    uid.to_string()
}

/// Index entry mapping (language, content) to a unit uid. Content may contain
/// ':'; the language segment is validated instead so the key stays unambiguous.
pub fn unit_key_index_key(language: &str, content: &str) -> Result<String, StoreError> {
    require_plain_segment(language, "language")?;
    Ok(format!("{language}:{content}"))
}

pub fn translation_key(uid: &str) -> String {
    uid.to_string()
}

/// Progress records sort ascending by level under one unit prefix. Levels are
/// stored shifted by one so -1 (unseen) encodes as "00".
pub fn progress_key(unit_uid: &str, level: i32) -> Result<String, StoreError> {
    require_plain_segment(unit_uid, "unit uid")?;
    if !(-1..=98).contains(&level) {
        return Err(StoreError::Validation(format!(
            "level out of range: {level}"
        )));
    }
    Ok(format!("{unit_uid}:{:02}", level + 1))
}

pub fn progress_prefix(unit_uid: &str) -> Result<String, StoreError> {
    require_plain_segment(unit_uid, "unit uid")?;
    Ok(format!("{unit_uid}:"))
}

pub fn parse_progress_key(key: &[u8]) -> Option<(String, i32)> {
    let text = std::str::from_utf8(key).ok()?;
    let (unit_uid, encoded) = text.split_once(':')?;
    let shifted: i32 = encoded.parse().ok()?;
    Some((unit_uid.to_string(), shifted - 1))
}

pub fn task_key(uid: &str) -> String {
    uid.to_string()
}

pub fn task_unit_index_key(unit_uid: &str, task_uid: &str) -> Result<String, StoreError> {
    require_plain_segment(unit_uid, "unit uid")?;
    Ok(format!("{unit_uid}:{task_uid}"))
}

pub fn task_unit_index_prefix(unit_uid: &str) -> Result<String, StoreError> {
    require_plain_segment(unit_uid, "unit uid")?;
    Ok(format!("{unit_uid}:"))
}

pub fn parse_task_unit_index_key(key: &[u8]) -> Option<(String, String)> {
    let text = std::str::from_utf8(key).ok()?;
    let (unit_uid, task_uid) = text.split_once(':')?;
    Some((unit_uid.to_string(), task_uid.to_string()))
}

pub fn resource_key(uid: &str) -> String {
    uid.to_string()
}

pub fn example_key(uid: &str) -> String {
    uid.to_string()
}
