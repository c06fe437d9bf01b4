//! Stable defaults shared by config, CLI and parser.

/// Tag of the distinguished form element whose subtree is compared.
pub const DEFAULT_FORM_TAG: &str = "formular";

/// Attribute of the form element carrying the form identifier.
pub const DEFAULT_FORM_ID_ATTRIBUTE: &str = "id";

/// Tag of the descendant element whose text is the contract number.
pub const DEFAULT_CONTRACT_TAG: &str = "v_vertragsnummer";

/// Directory scanned by `formdiff run` when none is given.
pub const DEFAULT_DATA_DIR: &str = "data";
