pub const UNITS: &str = "units";
pub const TRANSLATIONS: &str = "translations";
pub const PROGRESS: &str = "progress";
pub const TASKS: &str = "tasks";
pub const RESOURCES: &str = "resources";
pub const EXAMPLES: &str = "examples";

// Secondary index trees
pub const UNIT_KEY_INDEX: &str = "unit_key_index";
pub const TASKS_BY_UNIT: &str = "tasks_by_unit";
